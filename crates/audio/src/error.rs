//! Error types for audio analysis and playback.

/// Errors that can occur while analysing or playing audio.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("Audio analysis unsupported: {0}")]
    Unsupported(String),

    #[error("Analysis context is closed")]
    ContextClosed,

    #[error("Failed to decode WAV: {0}")]
    Decode(#[from] hound::Error),

    #[error("Clip contains no samples")]
    EmptyClip,

    #[error("Playback blocked: {0}")]
    PlaybackBlocked(String),
}
