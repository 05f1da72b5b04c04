//! randcuts-core - Random audio clip concatenation library
//!
//! Slices randomly placed, fixed-duration clips out of one source recording,
//! fades their edges and joins them into a single track.

pub mod audio;
pub mod cuts;
pub mod exporter;
pub mod types;

pub use audio::{AudioBuffer, AudioError, AudioProcessor};
pub use cuts::{assemble_clips, build_random_clips, normalize_durations, CutError};
pub use exporter::{ExportError, Exporter};
pub use types::*;
