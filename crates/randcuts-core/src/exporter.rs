//! Clip report export

use std::fs;
use std::path::Path;

use chrono::Local;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::types::{AudioInfo, ClipMetadata, CutReport};

/// Export errors
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Report exporter
pub struct Exporter;

impl Exporter {
    /// Write a JSON report of the clip placements
    pub fn to_json<P: AsRef<Path>>(
        report: &CutReport,
        output_path: P,
        pretty: bool,
    ) -> Result<(), ExportError> {
        let output_path = output_path.as_ref();

        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let data = JsonReport::from_report(report);

        let json = if pretty {
            serde_json::to_string_pretty(&data)?
        } else {
            serde_json::to_string(&data)?
        };

        fs::write(output_path, json)?;
        info!("Wrote clip report to {}", output_path.display());
        Ok(())
    }
}

/// JSON report document
#[derive(Serialize)]
struct JsonReport {
    version: String,
    generated_at: String,
    source: AudioInfo,
    output: String,
    total_ms: u64,
    clip_count: usize,
    clips: Vec<ClipMetadata>,
}

impl JsonReport {
    fn from_report(report: &CutReport) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: Local::now().to_rfc3339(),
            source: report.source.clone(),
            output: report.output_path.clone(),
            total_ms: report.total_ms,
            clip_count: report.clips.len(),
            clips: report.clips.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_report_contains_clip_placements() {
        let report = CutReport {
            source: AudioInfo {
                path: "speech.wav".to_string(),
                length_ms: 4000,
                sample_rate: 48000,
                channels: 2,
            },
            output_path: "out.wav".to_string(),
            total_ms: 700,
            clips: vec![
                ClipMetadata {
                    index: 0,
                    duration_ms: 500,
                    start_ms: 120,
                    fade_ms: 250,
                },
                ClipMetadata {
                    index: 1,
                    duration_ms: 200,
                    start_ms: 40,
                    fade_ms: 100,
                },
            ],
        };
        let path = std::env::temp_dir().join("randcuts_report.json");

        Exporter::to_json(&report, &path, false).unwrap();
        let data = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).ok();

        let value: serde_json::Value = serde_json::from_str(&data).unwrap();
        assert_eq!(value["clip_count"], 2);
        assert_eq!(value["total_ms"], 700);
        assert_eq!(value["clips"][1]["start_ms"], 40);
        assert_eq!(value["source"]["channels"], 2);
    }
}
