//! Timeline pointer interaction.
//!
//! A small state machine turns pointer events on the timeline strip into
//! playhead scrubs and item moves/resizes. Hosts hit-test the pointer and
//! hand in a [`PointerTarget`]; the machine never sees a window or a DOM.
//!
//! Drags apply their edit on every move, so a release has nothing left to
//! commit. Pressing the same item in the same mode again while its drag is
//! still live cancels the drag and restores the item as it was when the
//! drag began.

use cursorflow_project_model::{
    ClipId, ClipPatch, TimelineStore, ZoomId, ZoomPatch, MIN_ITEM_DURATION,
};

use crate::playback::PlaybackDriver;

/// A draggable timeline item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragTarget {
    Zoom(ZoomId),
    Clip(ClipId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragMode {
    /// Drag the body: shifts `start_time`.
    Move,
    /// Drag the trailing handle: changes `duration`.
    Resize,
}

/// What the pointer was pressed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// Ruler or empty track area.
    Background,
    Body(DragTarget),
    ResizeHandle(DragTarget),
}

/// Pointer input in timeline pixels (0 = timeline start).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f64, target: PointerTarget },
    Move { x: f64 },
    Up { x: f64 },
}

/// An in-progress item drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemDrag {
    pub target: DragTarget,
    pub mode: DragMode,
    pub start_x: f64,
    pub initial_start: f64,
    pub initial_duration: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    DraggingPlayhead,
    DraggingItem(ItemDrag),
}

/// What a dispatched event did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionOutcome {
    /// Nothing changed.
    Ignored,
    /// The playhead moved to this time.
    Seeked(f64),
    DragStarted(DragTarget, DragMode),
    /// The dragged item was updated.
    Dragged(DragTarget),
    /// The drag ended and its last edit stands.
    Committed(DragTarget),
    /// The drag was abandoned and the item restored.
    Cancelled(DragTarget),
    /// A playhead scrub ended.
    Released,
}

/// Routes pointer moves and releases to the interaction while a drag is
/// live, whatever the pointer is over.
pub trait PointerCapture {
    fn acquire(&mut self);
    fn release(&mut self);
}

/// No-op capture for hosts that always deliver pointer events.
#[derive(Debug, Default)]
pub struct NoCapture;

impl PointerCapture for NoCapture {
    fn acquire(&mut self) {}
    fn release(&mut self) {}
}

/// Everything an event may touch.
pub struct InteractionContext<'a> {
    pub timeline: &'a mut TimelineStore,
    pub playback: &'a mut PlaybackDriver,
    pub capture: &'a mut dyn PointerCapture,
}

/// The drag/scrub state machine plus the current selection.
#[derive(Debug, Clone)]
pub struct TimelineInteraction {
    state: DragState,
    pixels_per_second: f64,
    selection: Option<DragTarget>,
}

impl TimelineInteraction {
    pub fn new(pixels_per_second: f64) -> Self {
        Self {
            state: DragState::Idle,
            pixels_per_second: sanitize_pps(pixels_per_second),
            selection: None,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn selection(&self) -> Option<DragTarget> {
        self.selection
    }

    pub fn select(&mut self, target: Option<DragTarget>) {
        self.selection = target;
    }

    pub fn pixels_per_second(&self) -> f64 {
        self.pixels_per_second
    }

    pub fn set_pixels_per_second(&mut self, pixels_per_second: f64) {
        self.pixels_per_second = sanitize_pps(pixels_per_second);
    }

    /// Convert a pixel offset into seconds.
    pub fn pixels_to_secs(&self, px: f64) -> f64 {
        px / self.pixels_per_second
    }

    pub fn dispatch(
        &mut self,
        event: PointerEvent,
        ctx: &mut InteractionContext<'_>,
    ) -> InteractionOutcome {
        match event {
            PointerEvent::Down { x, target } => self.pointer_down(x, target, ctx),
            PointerEvent::Move { x } => self.pointer_move(x, ctx),
            PointerEvent::Up { .. } => self.pointer_up(ctx),
        }
    }

    fn pointer_down(
        &mut self,
        x: f64,
        target: PointerTarget,
        ctx: &mut InteractionContext<'_>,
    ) -> InteractionOutcome {
        let (item, mode) = match target {
            PointerTarget::Background => {
                self.abandon_item_drag(ctx);
                if self.state == DragState::Idle {
                    ctx.capture.acquire();
                }
                self.state = DragState::DraggingPlayhead;
                self.selection = None;
                return InteractionOutcome::Seeked(self.seek_to(x, ctx));
            }
            PointerTarget::Body(item) => (item, DragMode::Move),
            PointerTarget::ResizeHandle(item) => (item, DragMode::Resize),
        };

        if let DragState::DraggingItem(drag) = self.state {
            if drag.target == item && drag.mode == mode {
                restore(&drag, ctx.timeline);
                self.finish(ctx);
                tracing::debug!(?item, ?mode, "Drag toggled off");
                return InteractionOutcome::Cancelled(item);
            }
        }

        self.abandon_item_drag(ctx);
        let Some((initial_start, initial_duration)) = timing_of(item, ctx.timeline) else {
            tracing::debug!(?item, "Ignoring press on a missing item");
            self.finish(ctx);
            return InteractionOutcome::Ignored;
        };

        if self.state == DragState::Idle {
            ctx.capture.acquire();
        }
        self.state = DragState::DraggingItem(ItemDrag {
            target: item,
            mode,
            start_x: x,
            initial_start,
            initial_duration,
        });
        self.selection = Some(item);
        InteractionOutcome::DragStarted(item, mode)
    }

    fn pointer_move(&mut self, x: f64, ctx: &mut InteractionContext<'_>) -> InteractionOutcome {
        match self.state {
            DragState::Idle => InteractionOutcome::Ignored,
            DragState::DraggingPlayhead => InteractionOutcome::Seeked(self.seek_to(x, ctx)),
            DragState::DraggingItem(drag) => {
                let delta = self.pixels_to_secs(x - drag.start_x);
                if apply_delta(&drag, delta, ctx.timeline) {
                    InteractionOutcome::Dragged(drag.target)
                } else {
                    tracing::debug!(item = ?drag.target, "Dragged item disappeared; ending drag");
                    self.finish(ctx);
                    InteractionOutcome::Ignored
                }
            }
        }
    }

    fn pointer_up(&mut self, ctx: &mut InteractionContext<'_>) -> InteractionOutcome {
        match self.state {
            DragState::Idle => InteractionOutcome::Ignored,
            DragState::DraggingPlayhead => {
                self.finish(ctx);
                InteractionOutcome::Released
            }
            DragState::DraggingItem(drag) => {
                self.finish(ctx);
                InteractionOutcome::Committed(drag.target)
            }
        }
    }

    /// Cancel an item drag that is being replaced by a different drag.
    fn abandon_item_drag(&mut self, ctx: &mut InteractionContext<'_>) {
        if let DragState::DraggingItem(drag) = self.state {
            tracing::debug!(item = ?drag.target, mode = ?drag.mode, "Drag pre-empted");
            restore(&drag, ctx.timeline);
        }
    }

    fn finish(&mut self, ctx: &mut InteractionContext<'_>) {
        if self.state != DragState::Idle {
            ctx.capture.release();
        }
        self.state = DragState::Idle;
    }

    fn seek_to(&self, x: f64, ctx: &mut InteractionContext<'_>) -> f64 {
        ctx.playback.set_duration(ctx.timeline.duration());
        ctx.playback.seek(self.pixels_to_secs(x))
    }
}

fn sanitize_pps(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        80.0
    }
}

fn timing_of(target: DragTarget, timeline: &TimelineStore) -> Option<(f64, f64)> {
    match target {
        DragTarget::Zoom(id) => timeline.zoom(id).map(|z| (z.start_time, z.duration)),
        DragTarget::Clip(id) => timeline.clip(id).map(|c| (c.start_time, c.duration)),
    }
}

/// Apply a drag of `delta` seconds. Returns false if the item is gone.
fn apply_delta(drag: &ItemDrag, delta: f64, timeline: &mut TimelineStore) -> bool {
    let (start, duration) = match drag.mode {
        DragMode::Move => (Some((drag.initial_start + delta).max(0.0)), None),
        DragMode::Resize => (
            None,
            Some((drag.initial_duration + delta).max(MIN_ITEM_DURATION)),
        ),
    };
    set_timing(drag.target, start, duration, timeline)
}

fn restore(drag: &ItemDrag, timeline: &mut TimelineStore) {
    match drag.target {
        DragTarget::Zoom(_) => {
            set_timing(
                drag.target,
                Some(drag.initial_start),
                Some(drag.initial_duration),
                timeline,
            );
        }
        // Split tails can be shorter than the edit minimum.
        DragTarget::Clip(id) => {
            if let Err(e) = timeline.reset_clip_timing(id, drag.initial_start, drag.initial_duration)
            {
                tracing::debug!(error = %e, "Nothing to restore");
            }
        }
    }
}

fn set_timing(
    target: DragTarget,
    start_time: Option<f64>,
    duration: Option<f64>,
    timeline: &mut TimelineStore,
) -> bool {
    let result = match target {
        DragTarget::Zoom(id) => timeline.update_zoom(
            id,
            &ZoomPatch {
                start_time,
                duration,
                ..Default::default()
            },
        ),
        DragTarget::Clip(id) => timeline.update_clip(
            id,
            &ClipPatch {
                start_time,
                duration,
                ..Default::default()
            },
        ),
    };
    result.is_ok()
}

#[cfg(test)]
mod tests {
    use cursorflow_project_model::{Clip, MediaSource, ZoomEvent};

    use super::*;

    #[derive(Default)]
    struct CountingCapture {
        acquired: usize,
        released: usize,
    }

    impl PointerCapture for CountingCapture {
        fn acquire(&mut self) {
            self.acquired += 1;
        }
        fn release(&mut self) {
            self.released += 1;
        }
    }

    struct Harness {
        timeline: TimelineStore,
        playback: PlaybackDriver,
        capture: CountingCapture,
        interaction: TimelineInteraction,
    }

    impl Harness {
        fn new() -> Self {
            let timeline = TimelineStore::new(15.0);
            let playback = PlaybackDriver::new(timeline.duration());
            Self {
                timeline,
                playback,
                capture: CountingCapture::default(),
                interaction: TimelineInteraction::new(80.0),
            }
        }

        fn send(&mut self, event: PointerEvent) -> InteractionOutcome {
            let mut ctx = InteractionContext {
                timeline: &mut self.timeline,
                playback: &mut self.playback,
                capture: &mut self.capture,
            };
            self.interaction.dispatch(event, &mut ctx)
        }

        fn zoom_at(&mut self, start: f64, duration: f64) -> ZoomId {
            let mut zoom = ZoomEvent::new(start);
            zoom.duration = duration;
            self.timeline.insert_zoom(zoom)
        }
    }

    #[test]
    fn test_resize_by_one_second_of_pixels() {
        let mut h = Harness::new();
        let id = h.zoom_at(2.0, 3.0);
        let target = DragTarget::Zoom(id);

        h.send(PointerEvent::Down {
            x: 400.0,
            target: PointerTarget::ResizeHandle(target),
        });
        assert_eq!(h.send(PointerEvent::Move { x: 480.0 }), InteractionOutcome::Dragged(target));
        assert_eq!(h.timeline.zoom(id).unwrap().duration, 4.0);

        h.send(PointerEvent::Move { x: 0.0 });
        assert_eq!(h.timeline.zoom(id).unwrap().duration, MIN_ITEM_DURATION);

        assert_eq!(h.send(PointerEvent::Up { x: 0.0 }), InteractionOutcome::Committed(target));
        assert_eq!(h.interaction.state(), DragState::Idle);
        assert_eq!(h.timeline.zoom(id).unwrap().duration, MIN_ITEM_DURATION);
        assert_eq!((h.capture.acquired, h.capture.released), (1, 1));
    }

    #[test]
    fn test_move_clamps_at_zero() {
        let mut h = Harness::new();
        let id = h
            .timeline
            .add_clip(Clip::video("Take", MediaSource::new("a.webm"), 1.0, 4.0, None));
        let target = DragTarget::Clip(id);

        h.send(PointerEvent::Down {
            x: 100.0,
            target: PointerTarget::Body(target),
        });
        h.send(PointerEvent::Move { x: 140.0 });
        assert_eq!(h.timeline.clip(id).unwrap().start_time, 1.5);
        h.send(PointerEvent::Move { x: -500.0 });
        assert_eq!(h.timeline.clip(id).unwrap().start_time, 0.0);
        assert_eq!(h.timeline.clip(id).unwrap().duration, 4.0);
    }

    #[test]
    fn test_pressing_same_target_and_mode_cancels() {
        let mut h = Harness::new();
        let id = h.zoom_at(2.0, 3.0);
        let before = h.timeline.zoom(id).cloned();
        let target = DragTarget::Zoom(id);

        h.send(PointerEvent::Down {
            x: 200.0,
            target: PointerTarget::Body(target),
        });
        h.send(PointerEvent::Move { x: 360.0 });
        assert_eq!(h.timeline.zoom(id).unwrap().start_time, 4.0);

        let outcome = h.send(PointerEvent::Down {
            x: 360.0,
            target: PointerTarget::Body(target),
        });
        assert_eq!(outcome, InteractionOutcome::Cancelled(target));
        assert_eq!(h.interaction.state(), DragState::Idle);
        assert_eq!(h.timeline.zoom(id).cloned(), before);
        assert_eq!(h.capture.acquired, h.capture.released);

        // Moves after cancelling do nothing.
        assert_eq!(h.send(PointerEvent::Move { x: 800.0 }), InteractionOutcome::Ignored);
        assert_eq!(h.timeline.zoom(id).cloned(), before);
    }

    #[test]
    fn test_same_target_other_mode_switches_drag() {
        let mut h = Harness::new();
        let id = h.zoom_at(2.0, 3.0);
        let target = DragTarget::Zoom(id);

        h.send(PointerEvent::Down {
            x: 200.0,
            target: PointerTarget::Body(target),
        });
        h.send(PointerEvent::Move { x: 280.0 });
        let outcome = h.send(PointerEvent::Down {
            x: 400.0,
            target: PointerTarget::ResizeHandle(target),
        });
        assert_eq!(outcome, InteractionOutcome::DragStarted(target, DragMode::Resize));
        // The abandoned move is rolled back.
        assert_eq!(h.timeline.zoom(id).unwrap().start_time, 2.0);
        assert_eq!(h.capture.acquired, 1);
    }

    #[test]
    fn test_background_press_seeks_and_clears_selection() {
        let mut h = Harness::new();
        let id = h.zoom_at(2.0, 3.0);
        h.interaction.select(Some(DragTarget::Zoom(id)));

        let outcome = h.send(PointerEvent::Down {
            x: 240.0,
            target: PointerTarget::Background,
        });
        assert_eq!(outcome, InteractionOutcome::Seeked(3.0));
        assert_eq!(h.playback.current_time(), 3.0);
        assert_eq!(h.interaction.selection(), None);
        assert_eq!(h.interaction.state(), DragState::DraggingPlayhead);

        assert_eq!(h.send(PointerEvent::Move { x: 99_999.0 }), InteractionOutcome::Seeked(15.0));
        assert_eq!(h.send(PointerEvent::Up { x: 0.0 }), InteractionOutcome::Released);
        assert_eq!(h.interaction.state(), DragState::Idle);
    }

    #[test]
    fn test_scrub_pre_empts_item_drag() {
        let mut h = Harness::new();
        let id = h.zoom_at(2.0, 3.0);
        h.send(PointerEvent::Down {
            x: 400.0,
            target: PointerTarget::ResizeHandle(DragTarget::Zoom(id)),
        });
        h.send(PointerEvent::Move { x: 560.0 });
        assert_eq!(h.timeline.zoom(id).unwrap().duration, 5.0);

        h.send(PointerEvent::Down {
            x: 80.0,
            target: PointerTarget::Background,
        });
        assert_eq!(h.timeline.zoom(id).unwrap().duration, 3.0);
        assert_eq!(h.interaction.state(), DragState::DraggingPlayhead);
    }

    #[test]
    fn test_press_on_missing_item_is_ignored() {
        let mut h = Harness::new();
        let outcome = h.send(PointerEvent::Down {
            x: 0.0,
            target: PointerTarget::Body(DragTarget::Zoom(ZoomId::new())),
        });
        assert_eq!(outcome, InteractionOutcome::Ignored);
        assert_eq!(h.interaction.state(), DragState::Idle);
        assert_eq!(h.capture.acquired, 0);
    }

    #[test]
    fn test_item_deleted_mid_drag_ends_drag() {
        let mut h = Harness::new();
        let id = h.zoom_at(2.0, 3.0);
        h.send(PointerEvent::Down {
            x: 200.0,
            target: PointerTarget::Body(DragTarget::Zoom(id)),
        });
        h.timeline.delete_zoom(id).unwrap();
        assert_eq!(h.send(PointerEvent::Move { x: 300.0 }), InteractionOutcome::Ignored);
        assert_eq!(h.interaction.state(), DragState::Idle);
        assert_eq!(h.capture.released, 1);
    }

    mod properties {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            #[test]
            fn test_toggle_cancel_restores_timeline(
                start in 0.0..20.0f64,
                duration in 0.5..10.0f64,
                moves in proptest::collection::vec(-2000.0..2000.0f64, 0..8),
                resize in any::<bool>(),
            ) {
                let mut h = Harness::new();
                let id = h.zoom_at(start, duration);
                let before = h.timeline.zoom(id).cloned();
                let target = DragTarget::Zoom(id);
                let press = if resize {
                    PointerTarget::ResizeHandle(target)
                } else {
                    PointerTarget::Body(target)
                };

                h.send(PointerEvent::Down { x: 500.0, target: press });
                for x in &moves {
                    h.send(PointerEvent::Move { x: *x });
                }
                let outcome = h.send(PointerEvent::Down { x: 0.0, target: press });

                prop_assert_eq!(outcome, InteractionOutcome::Cancelled(target));
                prop_assert_eq!(h.interaction.state(), DragState::Idle);
                prop_assert_eq!(h.timeline.zoom(id).cloned(), before);
            }

            #[test]
            fn test_toggle_cancel_restores_split_tail(
                split_at in 9.0..9.9f64,
                moves in proptest::collection::vec(-2000.0..2000.0f64, 0..8),
                resize in any::<bool>(),
            ) {
                let mut h = Harness::new();
                h.timeline.add_clip(Clip::video(
                    "Recording",
                    MediaSource::new("take.webm"),
                    0.0,
                    10.0,
                    None,
                ));
                let tail = h.timeline.split_clip(split_at).unwrap();
                let before = h.timeline.clips().to_vec();
                let duration_before = h.timeline.duration();
                let target = DragTarget::Clip(tail);
                let press = if resize {
                    PointerTarget::ResizeHandle(target)
                } else {
                    PointerTarget::Body(target)
                };

                h.send(PointerEvent::Down { x: 800.0, target: press });
                for x in &moves {
                    h.send(PointerEvent::Move { x: *x });
                }
                let outcome = h.send(PointerEvent::Down { x: 0.0, target: press });

                prop_assert_eq!(outcome, InteractionOutcome::Cancelled(target));
                prop_assert_eq!(h.timeline.clips(), before.as_slice());
                prop_assert_eq!(h.timeline.duration(), duration_before);
            }
        }
    }
}
