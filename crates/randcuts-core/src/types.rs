//! Shared type definitions

use serde::{Deserialize, Serialize};

/// Placement of one generated clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipMetadata {
    /// Position in the request order
    pub index: usize,
    /// Clip length (ms)
    pub duration_ms: u64,
    /// Offset into the source (ms)
    pub start_ms: u64,
    /// Edge fade length (ms)
    pub fade_ms: u64,
}

/// Source audio properties
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioInfo {
    /// File path
    pub path: String,
    /// Length (ms)
    pub length_ms: u64,
    /// Sample rate (Hz)
    pub sample_rate: u32,
    /// Channel count
    pub channels: u16,
}

/// Outcome of one cut run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CutReport {
    /// Source audio
    pub source: AudioInfo,
    /// Output file path
    pub output_path: String,
    /// Total output length (ms)
    pub total_ms: u64,
    /// Per-clip placements, in request order
    pub clips: Vec<ClipMetadata>,
}
