//! Show project information.

use std::path::PathBuf;

use cursorflow_common::AppConfig;
use cursorflow_editor::EditorEngine;
use cursorflow_project_model::{ClipKind, ProjectState};

pub fn run(path: PathBuf, config: &AppConfig) -> anyhow::Result<()> {
    let project =
        ProjectState::load(&path).map_err(|e| anyhow::anyhow!("Failed to load project: {e}"))?;
    let engine = EditorEngine::new(project, config.editor.clone());
    let settings = engine.settings();
    let timeline = engine.timeline();

    println!("Project: {}", path.display());
    println!("  Duration: {:.2}s", timeline.duration());
    println!(
        "  Physics: {} (stiffness {}, damping {}, mass {})",
        settings.preset_name.name(),
        settings.physics_config.stiffness,
        settings.physics_config.damping,
        settings.physics_config.mass
    );
    println!();

    let (container, fitted) = engine.layout();
    println!("Layout:");
    println!("  Aspect: {}", settings.aspect_ratio.label());
    println!("  Container: {:.0}x{:.0}", container.width, container.height);
    println!(
        "  Content: {:.0}x{:.0} (frame header: {})",
        fitted.width,
        fitted.content_height,
        if settings.show_window_frame { "on" } else { "off" }
    );
    println!("  Content scale: {}", settings.content_scale);
    println!();

    println!("Clips: {}", timeline.clips().len());
    for clip in timeline.clips() {
        let label = match clip.kind {
            ClipKind::Video => "video",
            ClipKind::Title => "title",
        };
        println!(
            "  [{label}] {} {:.2}s..{:.2}s",
            clip.name,
            clip.start_time,
            clip.end_time()
        );
    }

    println!("Zooms: {}", timeline.zooms().len());
    for zoom in timeline.zooms() {
        println!(
            "  {:.2}s..{:.2}s at ({:.0}%, {:.0}%) x{:.2}",
            zoom.start_time,
            zoom.end_time(),
            zoom.x,
            zoom.y,
            zoom.scale
        );
    }

    Ok(())
}
