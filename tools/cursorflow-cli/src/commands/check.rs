//! Check configuration and service health.

use cursorflow_common::AppConfig;
use cursorflow_export_service::{HttpProcessingClient, VideoProcessingService};
use cursorflow_project_model::PhysicsPreset;

pub async fn run(config: &AppConfig) -> anyhow::Result<()> {
    println!("Cursor Flow System Check");
    println!("{}", "=".repeat(50));

    match PhysicsPreset::from_name(&config.editor.default_preset) {
        Some(preset) => println!("[OK] Default preset: {}", preset.name()),
        None => println!(
            "[WARN] Unknown default preset '{}', falling back to smooth",
            config.editor.default_preset
        ),
    }
    println!(
        "[OK] Timeline: min {}s, {} px/s",
        config.editor.min_timeline_secs, config.editor.pixels_per_second
    );
    println!(
        "[OK] Capture: {} fps, pointer sampling {} Hz",
        config.capture.fps, config.capture.pointer_sample_rate_hz
    );

    let client = HttpProcessingClient::from_config(&config.service)?;
    let healthy = client.health().await.unwrap_or_else(|e| {
        tracing::debug!(error = %e, "Health check errored");
        false
    });

    println!();
    if healthy {
        println!("[OK] Processing service: {}", client.base_url());
        match client.cursor_styles().await {
            Ok(styles) => {
                let ids: Vec<&str> = styles.iter().map(|s| s.id.as_str()).collect();
                println!("[OK] Cursor styles: {}", ids.join(", "));
            }
            Err(e) => println!("[WARN] Could not list cursor styles: {e}"),
        }
        println!("Exports are available.");
    } else {
        println!("[WARN] Processing service unreachable: {}", client.base_url());
        println!("Start the service or pass --url to `cursorflow export`.");
    }

    Ok(())
}
