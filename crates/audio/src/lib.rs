//! Symmetra audio - the audio-side collaborators of the reactive canvas
//!
//! This crate provides:
//! - [`features`] - Bass/mid level extraction from a byte spectrum snapshot
//! - [`analyser`] - FFT spectrum analyser and its analysis context
//! - [`clip`] - Decoded WAV clips and a clip-backed playback transport
//! - [`transport`] - The playback transport interface the session drives

pub mod analyser;
pub mod clip;
pub mod error;
pub mod features;
pub mod transport;

pub use analyser::{AnalysisContext, ContextState, SpectrumAnalyser};
pub use clip::{AudioClip, ClipTransport};
pub use error::AudioError;
pub use features::{AudioFeatures, BASS_BINS, MID_BINS, band_level};
pub use transport::PlaybackTransport;
