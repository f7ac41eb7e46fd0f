//! The timeline store: sole owner of clips and zoom events.
//!
//! All mutation goes through [`TimelineStore`] methods. Readers either
//! borrow the store or subscribe to [`TimelineChange`] notifications.
//!
//! # Active-item resolution
//!
//! Both collections use the same half-open membership rule,
//! `start <= t < start + duration`, so an item stops being active exactly at
//! its end time. Ties between overlapping items are broken by
//! [`ActivePolicy`]: zooms resolve to the first-created match, clips to the
//! last-created match (the clip drawn on top).

use crate::clip::{Clip, ClipId, ClipPatch, TitleStyle};
use crate::zoom::{ZoomEvent, ZoomId, ZoomPatch};

/// Lower bound for the derived timeline duration (seconds).
pub const DEFAULT_MIN_TIMELINE_SECS: f64 = 10.0;

/// A split must leave at least this much on both sides (seconds).
pub const MIN_SPLIT_MARGIN: f64 = 0.1;

/// Anything that occupies a span of the timeline.
pub trait Timed {
    fn start_time(&self) -> f64;
    fn duration(&self) -> f64;

    fn end_time(&self) -> f64 {
        self.start_time() + self.duration()
    }

    /// Half-open membership: `start <= t < end`.
    fn contains(&self, t: f64) -> bool {
        t >= self.start_time() && t < self.end_time()
    }
}

impl Timed for ZoomEvent {
    fn start_time(&self) -> f64 {
        self.start_time
    }

    fn duration(&self) -> f64 {
        self.duration
    }
}

impl Timed for Clip {
    fn start_time(&self) -> f64 {
        self.start_time
    }

    fn duration(&self) -> f64 {
        self.duration
    }
}

/// Tie-break rule when several items contain the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivePolicy {
    /// The earliest item in creation order wins.
    FirstCreated,
    /// The latest item in creation order wins.
    LastCreated,
}

impl ActivePolicy {
    /// Policy used for zoom events.
    pub const ZOOMS: ActivePolicy = ActivePolicy::FirstCreated;

    /// Policy used for clips.
    pub const CLIPS: ActivePolicy = ActivePolicy::LastCreated;

    /// Pick the active item at `t` from `items` (in creation order).
    pub fn resolve<T: Timed>(self, items: &[T], t: f64) -> Option<&T> {
        match self {
            ActivePolicy::FirstCreated => items.iter().find(|item| item.contains(t)),
            ActivePolicy::LastCreated => items.iter().rev().find(|item| item.contains(t)),
        }
    }
}

/// A mutation that happened on the store.
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineChange {
    ZoomAdded(ZoomId),
    ZoomUpdated(ZoomId),
    ZoomRemoved(ZoomId),
    ClipAdded(ClipId),
    ClipUpdated(ClipId),
    ClipRemoved(ClipId),
    ClipSplit { original: ClipId, created: ClipId },
    Cleared,
    Replaced,
}

/// Handle returned by [`TimelineStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type ChangeListener = Box<dyn FnMut(&TimelineChange) + Send>;

/// Errors from timeline mutations addressed by id.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimelineError {
    #[error("No zoom event with id {0}")]
    ZoomNotFound(ZoomId),

    #[error("No clip with id {0}")]
    ClipNotFound(ClipId),
}

/// Ordered collections of zoom events and clips.
///
/// Vector order is creation order. A split inserts the new tail clip
/// directly after its head so the pair keeps the original's stacking slot.
pub struct TimelineStore {
    zooms: Vec<ZoomEvent>,
    clips: Vec<Clip>,
    min_duration: f64,
    revision: u64,
    listeners: Vec<(ListenerId, ChangeListener)>,
    next_listener: u64,
}

impl std::fmt::Debug for TimelineStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimelineStore")
            .field("zooms", &self.zooms)
            .field("clips", &self.clips)
            .field("min_duration", &self.min_duration)
            .field("revision", &self.revision)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for TimelineStore {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_TIMELINE_SECS)
    }
}

impl TimelineStore {
    /// Create an empty store with a minimum timeline duration.
    pub fn new(min_duration: f64) -> Self {
        Self {
            zooms: Vec::new(),
            clips: Vec::new(),
            min_duration: min_duration.max(0.0),
            revision: 0,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    /// Create a store pre-populated with items (e.g. from a loaded project).
    pub fn with_items(min_duration: f64, zooms: Vec<ZoomEvent>, clips: Vec<Clip>) -> Self {
        let mut store = Self::new(min_duration);
        store.zooms = zooms.into_iter().map(ZoomEvent::sanitized).collect();
        store.clips = clips.into_iter().map(Clip::sanitized).collect();
        store
    }

    pub fn zooms(&self) -> &[ZoomEvent] {
        &self.zooms
    }

    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    pub fn zoom(&self, id: ZoomId) -> Option<&ZoomEvent> {
        self.zooms.iter().find(|z| z.id == id)
    }

    pub fn clip(&self, id: ClipId) -> Option<&Clip> {
        self.clips.iter().find(|c| c.id == id)
    }

    /// Monotonic counter bumped on every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Configured lower bound on [`TimelineStore::duration`].
    pub fn min_duration(&self) -> f64 {
        self.min_duration
    }

    /// Derived total duration: the configured minimum, the furthest clip end,
    /// or the furthest zoom end, whichever is largest.
    pub fn duration(&self) -> f64 {
        let clip_end = self.clips.iter().map(Timed::end_time).fold(0.0, f64::max);
        let zoom_end = self.zooms.iter().map(Timed::end_time).fold(0.0, f64::max);
        self.min_duration.max(clip_end).max(zoom_end)
    }

    /// The zoom event active at `t`, if any.
    pub fn active_zoom_at(&self, t: f64) -> Option<&ZoomEvent> {
        ActivePolicy::ZOOMS.resolve(&self.zooms, t)
    }

    /// The clip active at `t`, if any.
    pub fn active_clip_at(&self, t: f64) -> Option<&Clip> {
        ActivePolicy::CLIPS.resolve(&self.clips, t)
    }

    /// Add a centered zoom with default duration and scale at `at_time`.
    pub fn add_zoom(&mut self, at_time: f64) -> ZoomId {
        self.insert_zoom(ZoomEvent::new(at_time))
    }

    /// Insert a fully specified zoom event (clamped into range).
    pub fn insert_zoom(&mut self, zoom: ZoomEvent) -> ZoomId {
        let zoom = zoom.sanitized();
        let id = zoom.id;
        self.zooms.push(zoom);
        self.notify(TimelineChange::ZoomAdded(id));
        id
    }

    pub fn update_zoom(&mut self, id: ZoomId, patch: &ZoomPatch) -> Result<(), TimelineError> {
        let zoom = self
            .zooms
            .iter_mut()
            .find(|z| z.id == id)
            .ok_or(TimelineError::ZoomNotFound(id))?;
        zoom.apply(patch);
        self.notify(TimelineChange::ZoomUpdated(id));
        Ok(())
    }

    pub fn delete_zoom(&mut self, id: ZoomId) -> Result<ZoomEvent, TimelineError> {
        let index = self
            .zooms
            .iter()
            .position(|z| z.id == id)
            .ok_or(TimelineError::ZoomNotFound(id))?;
        let removed = self.zooms.remove(index);
        self.notify(TimelineChange::ZoomRemoved(id));
        Ok(removed)
    }

    /// Append a clip (clamped into range).
    pub fn add_clip(&mut self, clip: Clip) -> ClipId {
        let clip = clip.sanitized().at_least_min_duration();
        let id = clip.id;
        self.clips.push(clip);
        self.notify(TimelineChange::ClipAdded(id));
        id
    }

    /// Add a title card showing `text` at `at_time`.
    pub fn add_title_clip(
        &mut self,
        text: impl Into<String>,
        style: TitleStyle,
        at_time: f64,
    ) -> ClipId {
        self.add_clip(Clip::title(text, style, at_time))
    }

    pub fn update_clip(&mut self, id: ClipId, patch: &ClipPatch) -> Result<(), TimelineError> {
        let clip = self
            .clips
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(TimelineError::ClipNotFound(id))?;
        clip.apply(patch);
        self.notify(TimelineChange::ClipUpdated(id));
        Ok(())
    }

    /// Put a clip's timing back to values it held earlier.
    ///
    /// Unlike [`TimelineStore::update_clip`] this does not raise the
    /// duration to the edit minimum, so a short split tail comes back
    /// exactly as it was.
    pub fn reset_clip_timing(
        &mut self,
        id: ClipId,
        start_time: f64,
        duration: f64,
    ) -> Result<(), TimelineError> {
        let clip = self
            .clips
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(TimelineError::ClipNotFound(id))?;
        clip.start_time = start_time;
        clip.duration = duration;
        *clip = clip.clone().sanitized();
        self.notify(TimelineChange::ClipUpdated(id));
        Ok(())
    }

    pub fn delete_clip(&mut self, id: ClipId) -> Result<Clip, TimelineError> {
        let index = self
            .clips
            .iter()
            .position(|c| c.id == id)
            .ok_or(TimelineError::ClipNotFound(id))?;
        let removed = self.clips.remove(index);
        self.notify(TimelineChange::ClipRemoved(id));
        Ok(removed)
    }

    /// Split the active clip at `at_time`.
    ///
    /// Returns the id of the new tail clip. Splits closer than
    /// [`MIN_SPLIT_MARGIN`] to either clip boundary, or at a time with no
    /// active clip, are ignored and return `None`.
    pub fn split_clip(&mut self, at_time: f64) -> Option<ClipId> {
        let index = self.active_clip_index(at_time)?;
        let original = &self.clips[index];

        let head_duration = at_time - original.start_time;
        let tail_duration = original.duration - head_duration;
        if head_duration < MIN_SPLIT_MARGIN || tail_duration < MIN_SPLIT_MARGIN {
            tracing::debug!(
                at_time,
                clip = %original.id,
                "Ignoring split too close to a clip boundary"
            );
            return None;
        }

        let mut tail = original.clone();
        tail.id = ClipId::new();
        tail.start_time = at_time;
        tail.duration = tail_duration;

        let original_id = original.id;
        let created = tail.id;
        self.clips[index].duration = head_duration;
        self.clips.insert(index + 1, tail);

        self.notify(TimelineChange::ClipSplit {
            original: original_id,
            created,
        });
        Some(created)
    }

    /// Remove every clip and zoom event.
    pub fn clear_all(&mut self) {
        self.zooms.clear();
        self.clips.clear();
        self.notify(TimelineChange::Cleared);
    }

    /// Replace the whole contents (used when loading a project).
    pub fn replace_all(&mut self, zooms: Vec<ZoomEvent>, clips: Vec<Clip>) {
        self.zooms = zooms.into_iter().map(ZoomEvent::sanitized).collect();
        self.clips = clips.into_iter().map(Clip::sanitized).collect();
        self.notify(TimelineChange::Replaced);
    }

    /// Register a change listener. Listeners run synchronously after each
    /// mutation, in registration order.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&TimelineChange) + Send + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    fn active_clip_index(&self, t: f64) -> Option<usize> {
        let active = self.active_clip_at(t)?.id;
        self.clips.iter().position(|c| c.id == active)
    }

    fn notify(&mut self, change: TimelineChange) {
        self.revision += 1;
        for (_, listener) in self.listeners.iter_mut() {
            listener(&change);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::clip::{ClipKind, MediaSource};
    use crate::zoom::{ZoomId, MIN_ITEM_DURATION};

    fn zoom(start: f64, duration: f64) -> ZoomEvent {
        ZoomEvent {
            id: ZoomId::new(),
            start_time: start,
            duration,
            x: 50.0,
            y: 50.0,
            scale: 2.0,
        }
    }

    fn video(start: f64, duration: f64) -> Clip {
        Clip::video("Recording", MediaSource::new("take.webm"), start, duration, None)
    }

    #[test]
    fn test_duration_is_max_of_minimum_and_item_ends() {
        let mut store = TimelineStore::new(15.0);
        assert_eq!(store.duration(), 15.0);
        store.add_clip(video(0.0, 12.0));
        assert_eq!(store.duration(), 15.0);
        store.insert_zoom(zoom(16.0, 3.0));
        assert_eq!(store.duration(), 19.0);
        store.add_clip(video(18.0, 4.0));
        assert_eq!(store.duration(), 22.0);
    }

    #[test]
    fn test_zoom_is_inactive_exactly_at_its_end() {
        let mut store = TimelineStore::default();
        let id = store.insert_zoom(zoom(2.0, 3.0));
        assert!(store.active_zoom_at(1.999).is_none());
        assert_eq!(store.active_zoom_at(2.0).map(|z| z.id), Some(id));
        assert_eq!(store.active_zoom_at(4.999).map(|z| z.id), Some(id));
        assert!(store.active_zoom_at(5.0).is_none());
    }

    #[test]
    fn test_overlapping_zooms_resolve_to_first_created() {
        let mut store = TimelineStore::default();
        let first = store.insert_zoom(zoom(1.0, 4.0));
        let second = store.insert_zoom(zoom(2.0, 4.0));
        assert_eq!(store.active_zoom_at(3.0).map(|z| z.id), Some(first));
        assert_eq!(store.active_zoom_at(5.5).map(|z| z.id), Some(second));
    }

    #[test]
    fn test_overlapping_clips_resolve_to_last_created() {
        let mut store = TimelineStore::default();
        let below = store.add_clip(video(0.0, 10.0));
        let above = store.add_clip(video(4.0, 2.0));
        assert_eq!(store.active_clip_at(5.0).map(|c| c.id), Some(above));
        assert_eq!(store.active_clip_at(6.0).map(|c| c.id), Some(below));
    }

    #[test]
    fn test_split_at_four_seconds() {
        let mut store = TimelineStore::default();
        let original = store.add_clip(video(0.0, 10.0));
        let created = store.split_clip(4.0).unwrap();

        assert_ne!(original, created);
        let head = store.clip(original).unwrap();
        let tail = store.clip(created).unwrap();
        assert_eq!((head.start_time, head.duration), (0.0, 4.0));
        assert_eq!((tail.start_time, tail.duration), (4.0, 6.0));
        assert_eq!(head.kind, tail.kind);
        assert_eq!(head.name, tail.name);
        assert_eq!(tail.kind, ClipKind::Video);
        // Tail sits right after its head.
        assert_eq!(store.clips()[1].id, created);
    }

    #[test]
    fn test_split_near_boundary_is_ignored() {
        let mut store = TimelineStore::default();
        store.add_clip(video(2.0, 5.0));
        let revision = store.revision();

        assert_eq!(store.split_clip(2.05), None);
        assert_eq!(store.split_clip(6.95), None);
        assert_eq!(store.split_clip(20.0), None);
        assert_eq!(store.clips().len(), 1);
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_short_split_tail_keeps_its_duration_through_edits() {
        let mut store = TimelineStore::default();
        store.add_clip(video(0.0, 10.0));
        let tail = store.split_clip(9.8).unwrap();
        let before = store.clip(tail).cloned().unwrap();
        assert!(before.duration < MIN_ITEM_DURATION);

        store
            .update_clip(
                tail,
                &ClipPatch {
                    name: Some("Outro".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(store.clip(tail).unwrap().duration, before.duration);
        assert!((store.duration() - 10.0).abs() < 1e-9);

        store
            .update_clip(
                tail,
                &ClipPatch {
                    duration: Some(0.0),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(store.clip(tail).unwrap().duration, MIN_ITEM_DURATION);

        store
            .reset_clip_timing(tail, before.start_time, before.duration)
            .unwrap();
        assert_eq!(store.clip(tail).unwrap().start_time, before.start_time);
        assert_eq!(store.clip(tail).unwrap().duration, before.duration);
    }

    #[test]
    fn test_reloaded_items_keep_short_split_tails() {
        let mut store = TimelineStore::default();
        store.add_clip(video(0.0, 10.0));
        store.split_clip(9.8).unwrap();
        let saved = store.clips().to_vec();

        let reloaded = TimelineStore::with_items(10.0, vec![], saved.clone());
        assert_eq!(reloaded.clips(), saved.as_slice());
        assert!((reloaded.duration() - 10.0).abs() < 1e-9);

        let mut replaced = TimelineStore::default();
        replaced.replace_all(vec![], saved.clone());
        assert_eq!(replaced.clips(), saved.as_slice());
    }

    #[test]
    fn test_update_and_delete_unknown_ids() {
        let mut store = TimelineStore::default();
        let ghost = ZoomId::new();
        assert_eq!(
            store.update_zoom(ghost, &ZoomPatch::default()),
            Err(TimelineError::ZoomNotFound(ghost))
        );
        let ghost_clip = ClipId::new();
        assert!(matches!(
            store.delete_clip(ghost_clip),
            Err(TimelineError::ClipNotFound(_))
        ));
    }

    #[test]
    fn test_update_zoom_keeps_minimum_duration() {
        let mut store = TimelineStore::default();
        let id = store.add_zoom(1.0);
        store
            .update_zoom(
                id,
                &ZoomPatch {
                    duration: Some(0.1),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(store.zoom(id).unwrap().duration, MIN_ITEM_DURATION);
    }

    #[test]
    fn test_title_clip_and_clear_all() {
        let mut store = TimelineStore::default();
        let id = store.add_title_clip("Intro", TitleStyle::default(), 0.0);
        store.add_zoom(0.0);
        assert_eq!(store.clip(id).unwrap().text.as_deref(), Some("Intro"));

        store.clear_all();
        assert!(store.clips().is_empty());
        assert!(store.zooms().is_empty());
        assert_eq!(store.duration(), DEFAULT_MIN_TIMELINE_SECS);
    }

    #[test]
    fn test_listeners_receive_changes_until_unsubscribed() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();

        let mut store = TimelineStore::default();
        let listener = store.subscribe(move |change| sink.lock().unwrap().push(change.clone()));

        let zoom = store.add_zoom(1.0);
        store.delete_zoom(zoom).unwrap();
        assert!(store.unsubscribe(listener));
        store.add_zoom(2.0);

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![TimelineChange::ZoomAdded(zoom), TimelineChange::ZoomRemoved(zoom)]
        );
        assert_eq!(store.revision(), 3);
    }

    mod properties {
        use proptest::prelude::*;

        use super::*;

        fn zoom_strategy() -> impl Strategy<Value = ZoomEvent> {
            (0.0..30.0f64, 0.5..10.0f64, 0.0..=100.0f64, 0.0..=100.0f64, 1.0..4.0f64).prop_map(
                |(start, duration, x, y, scale)| ZoomEvent {
                    id: ZoomId::new(),
                    start_time: start,
                    duration,
                    x,
                    y,
                    scale,
                },
            )
        }

        proptest! {
            #[test]
            fn test_at_most_one_active_zoom_and_it_contains_t(
                zooms in proptest::collection::vec(zoom_strategy(), 0..12),
                t in 0.0..45.0f64,
            ) {
                let store = TimelineStore::with_items(10.0, zooms, vec![]);
                let containing: Vec<_> = store.zooms().iter().filter(|z| z.contains(t)).collect();
                match store.active_zoom_at(t) {
                    Some(active) => {
                        prop_assert!(active.contains(t));
                        prop_assert_eq!(active.id, containing[0].id);
                    }
                    None => prop_assert!(containing.is_empty()),
                }
            }

            #[test]
            fn test_split_preserves_covered_duration(
                start in 0.0..20.0f64,
                duration in 0.5..30.0f64,
                fraction in 0.0..1.0f64,
            ) {
                let mut store = TimelineStore::default();
                let original = store.add_clip(video(start, duration));
                let at = start + duration * fraction;

                match store.split_clip(at) {
                    Some(created) => {
                        let head = store.clip(original).unwrap();
                        let tail = store.clip(created).unwrap();
                        prop_assert!((head.duration + tail.duration - duration).abs() < 1e-9);
                        prop_assert_eq!(head.start_time, start);
                        prop_assert_eq!(tail.start_time, at);
                        prop_assert!((tail.end_time() - (start + duration)).abs() < 1e-9);
                    }
                    None => {
                        prop_assert!(
                            at - start < MIN_SPLIT_MARGIN || start + duration - at < MIN_SPLIT_MARGIN
                        );
                        prop_assert_eq!(store.clips().len(), 1);
                    }
                }
            }
        }
    }
}
