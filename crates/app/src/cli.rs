//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "symmetra")]
#[command(about = "Replay a symmetric drawing session, optionally with audio-reactive playback", long_about = None)]
pub struct Args {
    /// Session script (JSON list of pointer events and UI commands)
    #[arg(long, value_name = "FILE")]
    pub script: PathBuf,

    /// WAV clip driving reactive playback
    #[arg(long, value_name = "FILE")]
    pub audio: Option<PathBuf>,

    /// Configuration overrides (JSON)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// After the script, play for up to this many reactive frames
    #[arg(long, value_name = "N")]
    pub frames: Option<u32>,

    /// Pace frames in real time instead of as fast as possible
    #[arg(long)]
    pub realtime: bool,

    /// Enable debug logging (RUST_LOG may override)
    #[arg(long)]
    pub debug: bool,
}
