//! Sample camera motion over a project's timeline.

use std::path::PathBuf;

use cursorflow_common::AppConfig;
use cursorflow_editor::EditorEngine;
use cursorflow_processing_core::{simulate_camera_motion, CursorSmoother};
use cursorflow_project_model::{parse_samples, PointerSample, ProjectState};
use serde_json::json;

pub fn run(
    path: PathBuf,
    fps: f64,
    output: Option<PathBuf>,
    cursor: Option<PathBuf>,
    config: &AppConfig,
) -> anyhow::Result<()> {
    if !(fps.is_finite() && fps >= 1.0) {
        anyhow::bail!("fps must be at least 1");
    }

    let project =
        ProjectState::load(&path).map_err(|e| anyhow::anyhow!("Failed to load project: {e}"))?;
    let engine = EditorEngine::new(project, config.editor.clone());
    let settings = engine.settings();

    let frames = simulate_camera_motion(
        engine.timeline(),
        engine.camera().stage(),
        settings.physics_config,
        settings.content_scale,
        fps,
    );
    tracing::info!(frames = frames.len(), fps, "Simulated camera motion");

    let cursor_path: Vec<PointerSample> = match cursor {
        Some(file) => {
            let raw = std::fs::read_to_string(&file)
                .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", file.display()))?;
            let samples = parse_samples(&raw)
                .map_err(|e| anyhow::anyhow!("Invalid pointer samples: {e}"))?;
            CursorSmoother::service_default().smooth(&samples)
        }
        None => Vec::new(),
    };

    match output {
        Some(out) => {
            let rows: Vec<_> = frames
                .iter()
                .map(|frame| {
                    let pointer = CursorSmoother::position_at(&cursor_path, frame.time_secs);
                    json!({
                        "time": frame.time_secs,
                        "translateX": frame.translate_x,
                        "translateY": frame.translate_y,
                        "scale": frame.scale,
                        "transform": frame.css_transform(),
                        "cursor": pointer.map(|p| json!({ "x": p.x, "y": p.y })),
                    })
                })
                .collect();
            std::fs::write(&out, serde_json::to_string_pretty(&rows)?)?;
            println!("Wrote {} frames to {}", frames.len(), out.display());
        }
        None => {
            for frame in &frames {
                match CursorSmoother::position_at(&cursor_path, frame.time_secs) {
                    Some(p) => println!(
                        "{:>8.3}s  {}  cursor ({:.3}, {:.3})",
                        frame.time_secs,
                        frame.css_transform(),
                        p.x,
                        p.y
                    ),
                    None => println!("{:>8.3}s  {}", frame.time_secs, frame.css_transform()),
                }
            }
        }
    }

    Ok(())
}
