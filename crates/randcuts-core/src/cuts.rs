//! Random clip selection and concatenation

use rand::Rng;
use thiserror::Error;
use tracing::debug;

use crate::audio::AudioBuffer;
use crate::types::ClipMetadata;

/// Longest edge fade applied to a clip (ms)
pub const MAX_FADE_MS: u64 = 300;

/// Clip selection errors
#[derive(Error, Debug)]
pub enum CutError {
    #[error("Duration at position {index} must be greater than 0 (got {value})")]
    InvalidDuration { index: usize, value: f64 },

    #[error("Duration at position {index} ({requested_ms} ms) exceeds source length ({source_ms} ms)")]
    DurationExceedsSource {
        index: usize,
        requested_ms: u64,
        source_ms: u64,
    },
}

/// Convert durations in seconds to validated integer milliseconds
///
/// Order is preserved; each value must be positive and must still be at
/// least 1 ms after rounding to the nearest millisecond.
pub fn normalize_durations(durations: &[f64]) -> Result<Vec<u64>, CutError> {
    let mut durations_ms = Vec::with_capacity(durations.len());

    for (index, &seconds) in durations.iter().enumerate() {
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(CutError::InvalidDuration {
                index,
                value: seconds,
            });
        }

        let ms = (seconds * 1000.0).round();
        if ms <= 0.0 {
            return Err(CutError::InvalidDuration {
                index,
                value: seconds,
            });
        }

        durations_ms.push(ms as u64);
    }

    Ok(durations_ms)
}

/// Slice clips at random start offsets and concatenate them in request order
///
/// Draws exactly one value from `rng` per clip that has more than one valid
/// placement. A clip spanning the whole source is pinned to offset 0 and
/// consumes no draw, so the draw count is data-dependent; identical seeds
/// and identical duration lists reproduce identical output.
pub fn assemble_clips<R: Rng>(
    source: &AudioBuffer,
    durations_ms: &[u64],
    rng: &mut R,
) -> Result<(AudioBuffer, Vec<ClipMetadata>), CutError> {
    let source_ms = source.len_ms();

    let mut concatenated = AudioBuffer::silent(source.channels, source.sample_rate);
    let mut metadata = Vec::with_capacity(durations_ms.len());

    for (index, &duration_ms) in durations_ms.iter().enumerate() {
        if duration_ms > source_ms {
            return Err(CutError::DurationExceedsSource {
                index,
                requested_ms: duration_ms,
                source_ms,
            });
        }

        let max_start = source_ms - duration_ms;
        let start_ms = if max_start > 0 {
            rng.gen_range(0..=max_start)
        } else {
            0
        };

        let mut clip = source.slice_ms(start_ms, duration_ms);
        let fade_ms = MAX_FADE_MS.min(duration_ms / 2);
        if fade_ms > 0 {
            clip.fade_in(fade_ms);
            clip.fade_out(fade_ms);
        }

        debug!(
            "clip {}: start={} ms dur={} ms fade={} ms",
            index, start_ms, duration_ms, fade_ms
        );

        concatenated.append(&clip);
        metadata.push(ClipMetadata {
            index,
            duration_ms,
            start_ms,
            fade_ms,
        });
    }

    Ok((concatenated, metadata))
}

/// Normalize raw second durations and assemble in one step
pub fn build_random_clips<R: Rng>(
    source: &AudioBuffer,
    durations: &[f64],
    rng: &mut R,
) -> Result<(AudioBuffer, Vec<ClipMetadata>), CutError> {
    let durations_ms = normalize_durations(durations)?;
    assemble_clips(source, &durations_ms, rng)
}
