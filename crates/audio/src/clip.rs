//! Decoded audio clips and a clip-backed playback transport.

use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use crate::error::AudioError;
use crate::transport::PlaybackTransport;

/// Mono audio clip held in memory
#[derive(Debug, Clone)]
pub struct AudioClip {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl AudioClip {
    /// Wrap already-decoded mono samples
    pub fn from_samples(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// A clip of silence lasting `seconds`
    pub fn silence(seconds: f32, sample_rate: u32) -> Self {
        let len = (seconds.max(0.0) * sample_rate as f32).round() as usize;
        Self::from_samples(vec![0.0; len], sample_rate)
    }

    /// Decode a WAV file, mixing all channels down to mono
    pub fn from_wav(path: impl AsRef<Path>) -> Result<Self, AudioError> {
        let reader = hound::WavReader::open(path.as_ref())?;
        let clip = Self::decode(reader)?;
        info!(
            "Loaded clip {:?}: {:.2}s at {} Hz",
            path.as_ref(),
            clip.duration_seconds(),
            clip.sample_rate
        );
        Ok(clip)
    }

    /// Decode WAV data from any reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, AudioError> {
        Self::decode(hound::WavReader::new(reader)?)
    }

    fn decode<R: Read>(reader: hound::WavReader<R>) -> Result<Self, AudioError> {
        let spec = reader.spec();
        let channels = spec.channels.max(1) as usize;

        let interleaved: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader.into_samples::<f32>().collect::<Result<_, _>>()?,
            hound::SampleFormat::Int => {
                let full_scale = (1i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / full_scale))
                    .collect::<Result<_, _>>()?
            }
        };

        let samples = interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect::<Vec<_>>();

        debug!(
            "AudioClip::decode: {} channels, {} frames, {:?}",
            channels,
            samples.len(),
            spec.sample_format
        );

        Ok(Self::from_samples(samples, spec.sample_rate))
    }

    /// Samples per second
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of mono samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the clip holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Clip length in seconds
    pub fn duration_seconds(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Raw mono samples
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }
}

/// Playback transport that plays an [`AudioClip`] in simulated time
#[derive(Debug, Clone)]
pub struct ClipTransport {
    clip: AudioClip,
    position: usize,
    playing: bool,
    volume: f32,
}

impl ClipTransport {
    /// Create a paused transport at the start of the clip
    pub fn new(clip: AudioClip, volume: f32) -> Self {
        Self {
            clip,
            position: 0,
            playing: false,
            volume: volume.clamp(0.0, 1.0),
        }
    }

    /// Current playback position in samples
    pub fn position(&self) -> usize {
        self.position
    }

    /// The clip being played
    pub fn clip(&self) -> &AudioClip {
        &self.clip
    }
}

impl PlaybackTransport for ClipTransport {
    fn play(&mut self) -> Result<(), AudioError> {
        if self.clip.is_empty() || self.clip.sample_rate() == 0 {
            return Err(AudioError::EmptyClip);
        }
        if self.is_ended() {
            return Err(AudioError::PlaybackBlocked(
                "clip already finished; seek to start first".to_string(),
            ));
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn seek_to_start(&mut self) {
        self.position = 0;
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn is_ended(&self) -> bool {
        !self.clip.is_empty() && self.position >= self.clip.len()
    }

    fn advance(&mut self, seconds: f32) -> Vec<f32> {
        if !self.playing {
            return Vec::new();
        }

        let count = (seconds.max(0.0) * self.clip.sample_rate() as f32).round() as usize;
        let end = (self.position + count).min(self.clip.len());
        let played = self.clip.samples()[self.position..end]
            .iter()
            .map(|s| s * self.volume)
            .collect();
        self.position = end;

        if self.is_ended() {
            debug!("ClipTransport::advance: reached end of clip");
            self.playing = false;
        }

        played
    }
}
