//! randcuts command-line tool
//!
//! Cuts randomly placed clips out of one audio file and joins them into a
//! single output track.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use randcuts_core::audio::AudioProcessor;
use randcuts_core::cuts::build_random_clips;
use randcuts_core::exporter::Exporter;
use randcuts_core::types::{AudioInfo, CutReport};

/// Create a random concatenation of audio clips.
#[derive(Parser, Debug)]
#[command(name = "randcuts", version, about, long_about = None)]
struct Args {
    /// Path to the source audio file.
    src_path: PathBuf,

    /// Durations in seconds for each clip.
    #[arg(value_name = "duration", required = true)]
    durations: Vec<f64>,

    /// Seed for random start positions.
    #[arg(long)]
    seed: Option<u64>,

    /// Output audio path (format inferred from extension).
    #[arg(long, default_value = "out.wav")]
    out: PathBuf,

    /// Write a JSON report of the clip placements.
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let source = AudioProcessor::load(&args.src_path)?;
    println!(
        "Loaded {} ({} ms, {} ch, {} Hz)",
        args.src_path.display(),
        source.len_ms(),
        source.channels,
        source.sample_rate
    );

    let (concatenated, metadata) = build_random_clips(&source, &args.durations, &mut rng)?;

    for clip in &metadata {
        println!(
            "Clip {}: dur={} ms | start={} ms | fade={} ms",
            clip.index, clip.duration_ms, clip.start_ms, clip.fade_ms
        );
    }

    AudioProcessor::save(&concatenated, &args.out, 16)?;

    if let Some(report_path) = &args.report {
        let report = CutReport {
            source: AudioInfo {
                path: args.src_path.display().to_string(),
                length_ms: source.len_ms(),
                sample_rate: source.sample_rate,
                channels: source.channels,
            },
            output_path: args.out.display().to_string(),
            total_ms: concatenated.len_ms(),
            clips: metadata,
        };
        Exporter::to_json(&report, report_path, true)?;
    }

    println!(
        "Exported concatenated audio to {} ({} ms)",
        args.out.display(),
        concatenated.len_ms()
    );

    Ok(())
}
