//! Export a recording through the processing service.

use std::path::PathBuf;
use std::sync::Arc;

use cursorflow_capture_engine::CapturedMedia;
use cursorflow_common::AppConfig;
use cursorflow_export_service::{
    ExportOptions, ExportPipeline, ExportProgress, ExportStage, HttpProcessingClient,
    ProgressCallback,
};
use cursorflow_project_model::{parse_samples, MediaSource};

pub fn parse_options(
    style: &str,
    size: u32,
    color: &str,
    smooth: bool,
    quality: &str,
) -> anyhow::Result<ExportOptions> {
    Ok(ExportOptions {
        cursor_style: style.parse()?,
        cursor_size: size,
        cursor_color: color.parse()?,
        smooth,
        quality: quality.parse()?,
    })
}

fn mime_for(path: &std::path::Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("mp4") => "video/mp4",
        Some("mov") => "video/quicktime",
        Some("mkv") => "video/x-matroska",
        _ => "video/webm",
    }
}

pub async fn run(
    video: PathBuf,
    cursor: Option<PathBuf>,
    output: PathBuf,
    options: ExportOptions,
    config: &AppConfig,
) -> anyhow::Result<()> {
    println!("Exporting recording: {}", video.display());

    let data = std::fs::read(&video)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", video.display()))?;
    let samples = match &cursor {
        Some(cursor) => {
            let samples_json = std::fs::read_to_string(cursor)
                .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", cursor.display()))?;
            parse_samples(&samples_json)
                .map_err(|e| anyhow::anyhow!("Invalid pointer samples: {e}"))?
        }
        None => Vec::new(),
    };

    let file_name = video
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("recording.webm")
        .to_string();
    let media = CapturedMedia {
        source: MediaSource::new(video.display().to_string()),
        file_name,
        mime_type: mime_for(&video).to_string(),
        data,
        native_size: None,
        duration_secs: samples.last().map(|s| s.time).unwrap_or(0.0),
    };

    println!("  Service: {}", config.service.base_url);
    if samples.is_empty() {
        println!("  Samples: none, cursor will be detected");
    } else {
        println!("  Samples: {}", samples.len());
    }
    println!(
        "  Cursor: {} {} {}px{}",
        options.cursor_style,
        options.cursor_color,
        options.cursor_size,
        if options.smooth { ", smoothed" } else { "" }
    );
    println!("  Quality: {}", options.quality);

    let client = HttpProcessingClient::from_config(&config.service)?;
    let pipeline = ExportPipeline::from_config(Arc::new(client), &config.service);

    let progress_cb: ProgressCallback = Box::new(|p: ExportProgress| match p.stage {
        ExportStage::Detecting => print!("\r  Detecting cursor: {:.0}%   ", p.progress * 100.0),
        ExportStage::Processing => print!("\r  Processing: {:.0}%   ", p.progress * 100.0),
        ExportStage::Downloading => print!("\r  Downloading...      "),
        _ => {}
    });

    match pipeline
        .export(&media, &samples, &options, Some(&progress_cb))
        .await
    {
        Ok(video) => {
            std::fs::write(&output, &video.data)?;
            println!("\nExport complete: {}", output.display());
        }
        Err(e) => {
            println!("\nExport failed: {e}");
        }
    }

    Ok(())
}
