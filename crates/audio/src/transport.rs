//! Playback transport interface.

use crate::error::AudioError;

/// Transport controls for the backing track of reactive playback.
///
/// The session treats [`PlaybackTransport::is_ended`] as an implicit stop
/// request. Samples returned by [`PlaybackTransport::advance`] are what the
/// listener heard during that interval and feed the analysis context.
pub trait PlaybackTransport {
    /// Start (or continue) playback
    fn play(&mut self) -> Result<(), AudioError>;

    /// Pause playback, keeping the position
    fn pause(&mut self);

    /// Rewind to the first sample
    fn seek_to_start(&mut self);

    /// Whether playback is currently running
    fn is_playing(&self) -> bool;

    /// Whether playback ran to the end of the track
    fn is_ended(&self) -> bool;

    /// Advance playback by `seconds`, returning the samples played
    fn advance(&mut self, seconds: f32) -> Vec<f32>;
}
