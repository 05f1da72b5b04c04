//! Audio buffer and file I/O

use std::fs::File;
use std::path::Path;

use hound::{WavReader, WavSpec, WavWriter};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use thiserror::Error;

/// Audio processing errors
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Source file does not exist: {0}")]
    FileNotFound(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Output path must include a file extension to infer format: {0}")]
    MissingFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV error: {0}")]
    Hound(#[from] hound::Error),

    #[error("Decode error: {0}")]
    Decode(String),
}

/// Interleaved PCM audio
///
/// Channel layout and sample rate are carried alongside the samples so that
/// slices and concatenations preserve the source format exactly.
#[derive(Debug, Clone)]
pub struct AudioBuffer {
    /// Interleaved f32 samples
    pub samples: Vec<f32>,
    /// Channel count
    pub channels: u16,
    /// Sample rate (Hz)
    pub sample_rate: u32,
}

impl AudioBuffer {
    /// Zero-length buffer with the given layout
    pub fn silent(channels: u16, sample_rate: u32) -> Self {
        Self {
            samples: Vec::new(),
            channels,
            sample_rate,
        }
    }

    /// Number of frames (one sample per channel)
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels.max(1) as usize
    }

    /// Length in milliseconds, rounded to nearest
    pub fn len_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        let rate = self.sample_rate as u64;
        (self.frames() as u64 * 1000 + rate / 2) / rate
    }

    /// Duration in seconds
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / self.sample_rate as f64
    }

    /// Convert a millisecond offset to a frame index, rounded to nearest
    pub fn ms_to_frames(&self, ms: u64) -> usize {
        ((ms * self.sample_rate as u64 + 500) / 1000) as usize
    }

    /// Extract `duration_ms` of audio starting at `start_ms`
    ///
    /// The range is clamped at the buffer end, so a slice never reads past
    /// the last frame.
    pub fn slice_ms(&self, start_ms: u64, duration_ms: u64) -> AudioBuffer {
        let channels = self.channels.max(1) as usize;
        let start = self.ms_to_frames(start_ms).min(self.frames());
        let end = (start + self.ms_to_frames(duration_ms)).min(self.frames());

        AudioBuffer {
            samples: self.samples[start * channels..end * channels].to_vec(),
            channels: self.channels,
            sample_rate: self.sample_rate,
        }
    }

    /// Linear fade-in over the first `fade_ms`
    pub fn fade_in(&mut self, fade_ms: u64) {
        let fade_frames = self.ms_to_frames(fade_ms).min(self.frames());
        if fade_frames == 0 {
            return;
        }

        let channels = self.channels.max(1) as usize;
        for frame in 0..fade_frames {
            let gain = (frame + 1) as f32 / fade_frames as f32;
            for sample in &mut self.samples[frame * channels..(frame + 1) * channels] {
                *sample *= gain;
            }
        }
    }

    /// Linear fade-out over the last `fade_ms`
    pub fn fade_out(&mut self, fade_ms: u64) {
        let fade_frames = self.ms_to_frames(fade_ms).min(self.frames());
        if fade_frames == 0 {
            return;
        }

        let channels = self.channels.max(1) as usize;
        let offset = self.frames() - fade_frames;
        for frame in 0..fade_frames {
            let gain = (fade_frames - frame) as f32 / fade_frames as f32;
            let at = (offset + frame) * channels;
            for sample in &mut self.samples[at..at + channels] {
                *sample *= gain;
            }
        }
    }

    /// Append another buffer's samples (layouts must match)
    pub fn append(&mut self, other: &AudioBuffer) {
        self.samples.extend_from_slice(&other.samples);
    }
}

/// Audio file loader and writer
pub struct AudioProcessor;

impl AudioProcessor {
    /// Load an audio file into memory
    pub fn load<P: AsRef<Path>>(path: P) -> Result<AudioBuffer, AudioError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AudioError::FileNotFound(path.display().to_string()));
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match extension.as_deref() {
            // Use hound for WAV files (faster)
            Some("wav") => Self::load_wav(path),
            Some("mp3") | Some("m4a") | Some("aac") | Some("flac") | Some("ogg") => {
                Self::load_symphonia(path)
            }
            Some(ext) => Err(AudioError::UnsupportedFormat(ext.to_string())),
            None => Err(AudioError::UnsupportedFormat("unknown".to_string())),
        }
    }

    /// Load a WAV file
    fn load_wav(path: &Path) -> Result<AudioBuffer, AudioError> {
        let mut reader = WavReader::open(path)?;
        let spec = reader.spec();

        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Int => {
                let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / max_val))
                    .collect::<Result<Vec<_>, _>>()?
            }
            hound::SampleFormat::Float => {
                reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?
            }
        };

        Ok(AudioBuffer {
            samples,
            channels: spec.channels,
            sample_rate: spec.sample_rate,
        })
    }

    /// Load a compressed audio file using symphonia
    fn load_symphonia(path: &Path) -> Result<AudioBuffer, AudioError> {
        let file = File::open(path)?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
            .map_err(|e| AudioError::Decode(format!("Probe failed: {}", e)))?;

        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != symphonia::core::codecs::CODEC_TYPE_NULL)
            .ok_or_else(|| AudioError::Decode("No audio track found".to_string()))?;

        let track_id = track.id;
        let codec_params = track.codec_params.clone();

        let sample_rate = codec_params
            .sample_rate
            .ok_or_else(|| AudioError::Decode("No sample rate".to_string()))?;

        let channels = codec_params
            .channels
            .map(|c| c.count() as u16)
            .unwrap_or(2);

        let mut decoder = symphonia::default::get_codecs()
            .make(&codec_params, &DecoderOptions::default())
            .map_err(|e| AudioError::Decode(format!("Decoder error: {}", e)))?;

        let mut all_samples: Vec<f32> = Vec::new();

        loop {
            let packet = match format.next_packet() {
                Ok(p) => p,
                Err(symphonia::core::errors::Error::IoError(ref e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(e) => {
                    tracing::warn!("Packet read error: {}", e);
                    continue;
                }
            };

            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(d) => d,
                Err(e) => {
                    tracing::warn!("Packet decode error: {}", e);
                    continue;
                }
            };

            let spec = *decoded.spec();
            let duration = decoded.capacity() as u64;

            let mut sample_buf = SampleBuffer::<f32>::new(duration, spec);
            sample_buf.copy_interleaved_ref(decoded);

            // Keep the interleaved layout as-is; clip extraction must not
            // alter the source channel arrangement.
            all_samples.extend_from_slice(sample_buf.samples());
        }

        Ok(AudioBuffer {
            samples: all_samples,
            channels,
            sample_rate,
        })
    }

    /// Save an audio buffer to a file
    ///
    /// The container format is inferred from the output path extension. The
    /// extension is checked before anything touches the filesystem.
    pub fn save<P: AsRef<Path>>(
        audio: &AudioBuffer,
        path: P,
        bits_per_sample: u16,
    ) -> Result<(), AudioError> {
        let path = path.as_ref();

        let format = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => ext.to_lowercase(),
            None => return Err(AudioError::MissingFormat(path.display().to_string())),
        };

        if format != "wav" {
            return Err(AudioError::UnsupportedFormat(format));
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let spec = WavSpec {
            channels: audio.channels,
            sample_rate: audio.sample_rate,
            bits_per_sample,
            sample_format: if bits_per_sample == 32 {
                hound::SampleFormat::Float
            } else {
                hound::SampleFormat::Int
            },
        };

        let mut writer = WavWriter::create(path, spec)?;

        match spec.sample_format {
            hound::SampleFormat::Float => {
                for &sample in &audio.samples {
                    writer.write_sample(sample)?;
                }
            }
            hound::SampleFormat::Int => {
                let max_val = (1i64 << (bits_per_sample - 1)) as f32;
                for &sample in &audio.samples {
                    let int_sample = (sample * max_val).clamp(-max_val, max_val - 1.0) as i32;
                    writer.write_sample(int_sample)?;
                }
            }
        }

        writer.finalize()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(frames: usize, channels: u16, sample_rate: u32) -> AudioBuffer {
        AudioBuffer {
            samples: (0..frames * channels as usize).map(|i| i as f32).collect(),
            channels,
            sample_rate,
        }
    }

    #[test]
    fn len_ms_rounds_to_nearest() {
        assert_eq!(ramp(48000, 1, 48000).len_ms(), 1000);
        assert_eq!(ramp(24, 1, 48000).len_ms(), 1); // 0.5 ms rounds up
        assert_eq!(ramp(0, 2, 48000).len_ms(), 0);
    }

    #[test]
    fn slice_is_frame_accurate() {
        let buffer = ramp(48000, 2, 48000); // 1000 ms stereo
        let slice = buffer.slice_ms(250, 500);

        assert_eq!(slice.frames(), 24000);
        assert_eq!(slice.channels, 2);
        assert_eq!(slice.samples[0], (12000 * 2) as f32);
    }

    #[test]
    fn slice_clamps_at_the_buffer_end() {
        let buffer = ramp(48000, 1, 48000);
        let tail = buffer.slice_ms(900, 500);
        assert_eq!(tail.frames(), 4800);
    }

    #[test]
    fn fades_stay_inside_the_buffer() {
        let mut buffer = AudioBuffer {
            samples: vec![1.0; 480], // 10 ms mono
            channels: 1,
            sample_rate: 48000,
        };
        buffer.fade_in(2);
        buffer.fade_out(2);

        assert!(buffer.samples[0] < 0.02);
        assert_eq!(buffer.samples[200], 1.0);
        assert!(buffer.samples[479] < 0.02);
    }

    #[test]
    fn append_concatenates_samples() {
        let mut buffer = AudioBuffer::silent(2, 44100);
        buffer.append(&ramp(100, 2, 44100));
        buffer.append(&ramp(50, 2, 44100));

        assert_eq!(buffer.frames(), 150);
        assert_eq!(buffer.channels, 2);
    }

    #[test]
    fn load_missing_file_fails() {
        let result = AudioProcessor::load("definitely_missing.wav");
        assert!(matches!(result, Err(AudioError::FileNotFound(_))));
    }

    #[test]
    fn save_requires_an_extension() {
        let buffer = ramp(100, 1, 44100);
        let path = std::env::temp_dir().join("randcuts_no_extension");

        let result = AudioProcessor::save(&buffer, &path, 16);

        assert!(matches!(result, Err(AudioError::MissingFormat(_))));
        assert!(!path.exists());
    }

    #[test]
    fn save_rejects_unknown_containers() {
        let buffer = ramp(100, 1, 44100);
        let path = std::env::temp_dir().join("randcuts_out.xyz");

        let result = AudioProcessor::save(&buffer, &path, 16);

        assert!(matches!(result, Err(AudioError::UnsupportedFormat(_))));
    }

    #[test]
    fn wav_round_trip_preserves_layout() {
        let buffer = AudioBuffer {
            samples: (0..2000).map(|i| i as f32 / 2000.0 - 0.5).collect(),
            channels: 2,
            sample_rate: 44100,
        };
        let path = std::env::temp_dir().join("randcuts_round_trip.wav");

        AudioProcessor::save(&buffer, &path, 16).unwrap();
        let loaded = AudioProcessor::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.channels, 2);
        assert_eq!(loaded.sample_rate, 44100);
        assert_eq!(loaded.frames(), 1000);
    }
}
