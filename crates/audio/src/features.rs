//! Bass and mid level extraction from a frequency-magnitude snapshot.

use std::ops::Range;

use symmetra_config::AudioConfig;

/// Bins averaged into the bass level
pub const BASS_BINS: Range<usize> = 0..10;

/// Bins averaged into the mid level
pub const MID_BINS: Range<usize> = 20..100;

/// Per-frame audio levels, each in 0..=255
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AudioFeatures {
    pub bass_level: f32,
    pub mid_level: f32,
}

impl AudioFeatures {
    /// Extract levels using the default bass and mid bands
    pub fn extract(spectrum: &[u8]) -> Self {
        Self::extract_with(spectrum, BASS_BINS, MID_BINS)
    }

    /// Extract levels using the bands named in the audio config
    pub fn from_config(spectrum: &[u8], config: &AudioConfig) -> Self {
        Self::extract_with(spectrum, config.bass_range(), config.mid_range())
    }

    /// Extract levels over explicit bin ranges
    pub fn extract_with(spectrum: &[u8], bass: Range<usize>, mid: Range<usize>) -> Self {
        Self {
            bass_level: band_level(spectrum, bass),
            mid_level: band_level(spectrum, mid),
        }
    }
}

/// Arithmetic mean of the bins in `band`.
///
/// The mean always divides by the band width; bins past the end of a short
/// snapshot count as zero. An empty band yields 0.
pub fn band_level(spectrum: &[u8], band: Range<usize>) -> f32 {
    let width = band.len();
    if width == 0 {
        return 0.0;
    }
    let start = band.start.min(spectrum.len());
    let end = band.end.min(spectrum.len());
    let sum: u32 = spectrum[start..end].iter().map(|&b| b as u32).sum();
    sum as f32 / width as f32
}
