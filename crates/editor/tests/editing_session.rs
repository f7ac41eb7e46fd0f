use std::time::{Duration, Instant};

use cursorflow_common::{EditorDefaults, FlowError};
use cursorflow_editor::{
    DragMode, DragTarget, EditorEngine, InteractionOutcome, NoCapture, PointerEvent,
    PointerTarget,
};
use cursorflow_project_model::{Clip, MediaSource, ProjectState};

fn engine_with_recording() -> EditorEngine {
    let mut engine = EditorEngine::with_defaults(EditorDefaults::default());
    engine.add_recording(Clip::video(
        "Recording 1",
        MediaSource::new("blob:recording-1"),
        0.0,
        12.0,
        Some((1280, 800)),
    ));
    engine
}

#[test]
fn test_record_split_zoom_and_drag() {
    let mut engine = engine_with_recording();
    assert_eq!(engine.timeline().duration(), 12.0);

    engine.seek(4.0);
    let tail = engine.split_at_playhead().unwrap();
    let clips = engine.timeline().clips();
    assert_eq!(clips.len(), 2);
    assert_eq!((clips[0].start_time, clips[0].duration), (0.0, 4.0));
    assert_eq!((clips[1].start_time, clips[1].duration), (4.0, 8.0));
    assert_eq!(clips[1].id, tail);

    let zoom = engine.add_zoom_at_playhead();
    assert_eq!(engine.timeline().zoom(zoom).unwrap().start_time, 4.0);

    // 80 px/s: dragging the body 80px right moves the zoom by one second.
    let mut capture = NoCapture;
    let target = DragTarget::Zoom(zoom);
    assert_eq!(
        engine.pointer(
            PointerEvent::Down {
                x: 320.0,
                target: PointerTarget::Body(target),
            },
            &mut capture,
        ),
        InteractionOutcome::DragStarted(target, DragMode::Move)
    );
    engine.pointer(PointerEvent::Move { x: 400.0 }, &mut capture);
    assert_eq!(
        engine.pointer(PointerEvent::Up { x: 400.0 }, &mut capture),
        InteractionOutcome::Committed(target)
    );
    assert_eq!(engine.timeline().zoom(zoom).unwrap().start_time, 5.0);
}

#[test]
fn test_degenerate_split_is_rejected_without_change() {
    let mut engine = engine_with_recording();
    engine.seek(0.05);
    let revision = engine.timeline().revision();

    let err = engine.split_at_playhead().unwrap_err();
    assert!(matches!(err, FlowError::InvalidEdit { .. }));
    assert_eq!(engine.timeline().clips().len(), 1);
    assert_eq!(engine.timeline().revision(), revision);
}

#[test]
fn test_playback_reports_active_items_and_zoom_settles() {
    let mut engine = engine_with_recording();
    engine.seek(1.0);
    let zoom = engine.add_zoom_at_playhead();
    engine.seek(0.0);

    let t0 = Instant::now();
    engine.toggle_playback();
    engine.frame(t0);
    let update = engine.frame(t0 + Duration::from_millis(1500));
    assert!(update.playing);
    assert!((update.time - 1.5).abs() < 1e-9);
    assert_eq!(update.active_zoom, Some(zoom));
    assert!(update.active_clip.is_some());

    // Past the zoom the camera heads back to neutral framing.
    engine.toggle_playback();
    engine.seek(6.0);
    let mut now = t0 + Duration::from_secs(2);
    let mut update = engine.frame(now);
    for _ in 0..600 {
        now += Duration::from_millis(16);
        update = engine.frame(now);
    }
    assert_eq!(update.active_zoom, None);
    assert!((update.camera.scale - 1.0).abs() < 1e-3);
}

#[test]
fn test_snapshot_round_trips_without_transient_media() {
    let mut engine = engine_with_recording();
    engine.add_zoom_at_playhead();

    let json = engine.snapshot().to_json().unwrap();
    let restored = ProjectState::from_json(&json).unwrap();
    assert_eq!(restored.zooms.len(), 1);
    assert_eq!(restored.clips.len(), 1);
    assert_eq!(restored.clips[0].source, None);
    assert_eq!(restored.clips[0].name, "Recording 1");

    let reopened = EditorEngine::new(restored, EditorDefaults::default());
    assert_eq!(reopened.timeline().duration(), 12.0);
}

#[test]
fn test_reload_keeps_short_split_tail() {
    let mut engine = EditorEngine::with_defaults(EditorDefaults::default());
    engine.add_recording(Clip::video(
        "Recording 1",
        MediaSource::new("take1.webm"),
        0.0,
        10.0,
        Some((1280, 800)),
    ));
    engine.seek(9.8);
    engine.split_at_playhead().unwrap();
    let saved: Vec<(f64, f64)> = engine
        .timeline()
        .clips()
        .iter()
        .map(|c| (c.start_time, c.duration))
        .collect();
    assert!(saved[1].1 < 0.5);

    let json = engine.snapshot().to_json().unwrap();
    let restored = ProjectState::from_json(&json).unwrap();
    let reopened = EditorEngine::new(restored, EditorDefaults::default());
    let reloaded: Vec<(f64, f64)> = reopened
        .timeline()
        .clips()
        .iter()
        .map(|c| (c.start_time, c.duration))
        .collect();
    assert_eq!(reloaded.len(), saved.len());
    for ((start, duration), (saved_start, saved_duration)) in reloaded.iter().zip(&saved) {
        assert!((start - saved_start).abs() < 1e-9);
        assert!((duration - saved_duration).abs() < 1e-9);
    }
    assert!(reloaded[1].1 < 0.5);
    assert!((reopened.timeline().duration() - engine.timeline().duration()).abs() < 1e-9);
}
