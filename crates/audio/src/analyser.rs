//! FFT spectrum analyser producing byte magnitude snapshots
//!
//! The analyser keeps the most recent `fft_size` time-domain samples,
//! applies a Blackman window, and converts bin magnitudes to bytes by
//! mapping the `[min_decibels, max_decibels]` range onto 0..=255 after
//! exponential smoothing between snapshots.

use std::f32::consts::PI;
use std::sync::Arc;

use rustfft::{Fft, FftPlanner, num_complex::Complex};
use symmetra_config::AudioConfig;
use tracing::{debug, info};

use crate::error::AudioError;
use crate::features::AudioFeatures;

/// Smallest FFT window the analyser accepts
pub const MIN_FFT_SIZE: usize = 32;

/// Largest FFT window the analyser accepts
pub const MAX_FFT_SIZE: usize = 32768;

/// Spectrum analyser over a sliding window of samples
pub struct SpectrumAnalyser {
    fft: Arc<dyn Fft<f32>>,
    fft_size: usize,
    window: Vec<f32>,
    /// Most recent samples, oldest first, at most `fft_size` long
    samples: Vec<f32>,
    scratch: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
    bytes: Vec<u8>,
    smoothing: f32,
    min_decibels: f32,
    max_decibels: f32,
}

impl std::fmt::Debug for SpectrumAnalyser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpectrumAnalyser")
            .field("fft_size", &self.fft_size)
            .field("buffered", &self.samples.len())
            .field("smoothing", &self.smoothing)
            .finish()
    }
}

impl SpectrumAnalyser {
    /// Create an analyser from the audio config
    ///
    /// Fails with [`AudioError::Unsupported`] when the FFT size is not a power
    /// of two within range, the smoothing constant is outside 0..=1 or the
    /// decibel range is empty.
    pub fn new(config: &AudioConfig) -> Result<Self, AudioError> {
        let fft_size = config.fft_size;
        if !fft_size.is_power_of_two() || !(MIN_FFT_SIZE..=MAX_FFT_SIZE).contains(&fft_size) {
            return Err(AudioError::Unsupported(format!(
                "fft size {} must be a power of two in {}..={}",
                fft_size, MIN_FFT_SIZE, MAX_FFT_SIZE
            )));
        }
        if !(0.0..=1.0).contains(&config.smoothing) {
            return Err(AudioError::Unsupported(format!(
                "smoothing {} outside 0..=1",
                config.smoothing
            )));
        }
        if config.min_decibels >= config.max_decibels {
            return Err(AudioError::Unsupported(format!(
                "decibel range {}..{} is empty",
                config.min_decibels, config.max_decibels
            )));
        }

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);
        let bins = fft_size / 2;

        Ok(Self {
            fft,
            fft_size,
            window: (0..fft_size).map(|i| blackman_window(i, fft_size)).collect(),
            samples: Vec::with_capacity(fft_size * 2),
            scratch: vec![Complex::new(0.0, 0.0); fft_size],
            smoothed: vec![0.0; bins],
            bytes: vec![0; bins],
            smoothing: config.smoothing,
            min_decibels: config.min_decibels,
            max_decibels: config.max_decibels,
        })
    }

    /// FFT window length
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Number of frequency bins in a snapshot
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Append time-domain samples, keeping only the newest `fft_size`
    pub fn push_samples(&mut self, samples: &[f32]) {
        self.samples.extend_from_slice(samples);
        if self.samples.len() > self.fft_size {
            let excess = self.samples.len() - self.fft_size;
            self.samples.drain(..excess);
        }
    }

    /// Recompute the byte snapshot from the buffered samples
    ///
    /// Missing history (fewer than `fft_size` samples buffered) is treated
    /// as leading silence.
    pub fn refresh(&mut self) -> &[u8] {
        let padding = self.fft_size - self.samples.len();
        for (i, slot) in self.scratch.iter_mut().enumerate() {
            let sample = if i < padding {
                0.0
            } else {
                self.samples[i - padding]
            };
            *slot = Complex::new(sample * self.window[i], 0.0);
        }

        self.fft.process(&mut self.scratch);

        let scale = 1.0 / self.fft_size as f32;
        let range = self.max_decibels - self.min_decibels;
        for (bin, (smoothed, byte)) in self
            .smoothed
            .iter_mut()
            .zip(self.bytes.iter_mut())
            .enumerate()
        {
            let magnitude = self.scratch[bin].norm() * scale;
            *smoothed = self.smoothing * *smoothed + (1.0 - self.smoothing) * magnitude;
            let decibels = 20.0 * smoothed.log10();
            let scaled = 255.0 / range * (decibels - self.min_decibels);
            *byte = scaled.clamp(0.0, 255.0) as u8;
        }

        &self.bytes
    }

    /// Last computed snapshot
    pub fn snapshot(&self) -> &[u8] {
        &self.bytes
    }

    /// Forget buffered samples and smoothing history
    pub fn reset(&mut self) {
        self.samples.clear();
        self.smoothed.fill(0.0);
        self.bytes.fill(0);
    }
}

/// Blackman window coefficient (periodic form)
pub fn blackman_window(index: usize, size: usize) -> f32 {
    let phase = 2.0 * PI * index as f32 / size as f32;
    0.42 - 0.5 * phase.cos() + 0.08 * (2.0 * phase).cos()
}

/// Lifecycle of an analysis context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    Suspended,
    Running,
    Closed,
}

/// Analysis context wrapping a spectrum analyser
///
/// Samples are only accepted while the context is running; a suspended
/// context keeps returning its last snapshot.
#[derive(Debug)]
pub struct AnalysisContext {
    analyser: SpectrumAnalyser,
    config: AudioConfig,
    state: ContextState,
}

impl AnalysisContext {
    /// Create a suspended analysis context
    pub fn new(config: &AudioConfig) -> Result<Self, AudioError> {
        let analyser = SpectrumAnalyser::new(config)?;
        debug!(
            "AnalysisContext::new: fft_size={}, bins={}",
            analyser.fft_size(),
            analyser.bin_count()
        );
        Ok(Self {
            analyser,
            config: config.clone(),
            state: ContextState::Suspended,
        })
    }

    /// Current lifecycle state
    pub fn state(&self) -> ContextState {
        self.state
    }

    /// Start or resume analysis
    pub fn resume(&mut self) -> Result<(), AudioError> {
        match self.state {
            ContextState::Closed => Err(AudioError::ContextClosed),
            ContextState::Running => Ok(()),
            ContextState::Suspended => {
                info!("Audio analysis context running");
                self.state = ContextState::Running;
                Ok(())
            }
        }
    }

    /// Pause analysis, keeping the last snapshot
    pub fn suspend(&mut self) {
        if self.state == ContextState::Running {
            info!("Audio analysis context suspended");
            self.state = ContextState::Suspended;
        }
    }

    /// Shut the context down permanently
    pub fn close(&mut self) {
        self.state = ContextState::Closed;
        self.analyser.reset();
    }

    /// Feed played samples to the analyser (ignored unless running)
    pub fn feed(&mut self, samples: &[f32]) {
        if self.state == ContextState::Running {
            self.analyser.push_samples(samples);
        }
    }

    /// Refresh and return the byte spectrum snapshot
    pub fn snapshot(&mut self) -> &[u8] {
        if self.state == ContextState::Running {
            self.analyser.refresh()
        } else {
            self.analyser.snapshot()
        }
    }

    /// Refresh the snapshot and extract bass/mid levels from it
    pub fn features(&mut self) -> AudioFeatures {
        let bass = self.config.bass_range();
        let mid = self.config.mid_range();
        AudioFeatures::extract_with(self.snapshot(), bass, mid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(frequency: f32, sample_rate: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * PI * frequency * i as f32 / sample_rate).sin())
            .collect()
    }

    #[test]
    fn test_blackman_window() {
        let size = 256;
        assert!(blackman_window(0, size).abs() < 0.001);
        assert!((blackman_window(size / 2, size) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_rejects_unsupported_fft_size() {
        let config = AudioConfig {
            fft_size: 300,
            ..Default::default()
        };
        assert!(matches!(
            SpectrumAnalyser::new(&config),
            Err(AudioError::Unsupported(_))
        ));

        let config = AudioConfig {
            fft_size: 16,
            ..Default::default()
        };
        assert!(SpectrumAnalyser::new(&config).is_err());
    }

    #[test]
    fn test_rejects_empty_decibel_range() {
        let config = AudioConfig {
            min_decibels: -30.0,
            max_decibels: -30.0,
            ..Default::default()
        };
        assert!(SpectrumAnalyser::new(&config).is_err());
    }

    #[test]
    fn test_silence_is_zero() {
        let mut analyser = SpectrumAnalyser::new(&AudioConfig::default()).unwrap();
        analyser.push_samples(&[0.0; 256]);
        let snapshot = analyser.refresh();
        assert_eq!(snapshot.len(), 128);
        assert!(snapshot.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_sine_peaks_at_its_bin() {
        let mut analyser = SpectrumAnalyser::new(&AudioConfig::default()).unwrap();
        // 25.6 kHz / 256 = 100 Hz per bin, so 500 Hz lands on bin 5
        analyser.push_samples(&sine(500.0, 25_600.0, 256));
        let snapshot = analyser.refresh().to_vec();

        assert_eq!(snapshot[5], 255);
        assert_eq!(snapshot[60], 0);
        assert!(snapshot[5] > snapshot[40]);
    }

    #[test]
    fn test_push_keeps_latest_window() {
        let mut analyser = SpectrumAnalyser::new(&AudioConfig::default()).unwrap();
        analyser.push_samples(&sine(500.0, 25_600.0, 256));
        analyser.push_samples(&[0.0; 256]);
        // The tone has scrolled out of the window
        analyser.smoothing = 0.0;
        let snapshot = analyser.refresh();
        assert!(snapshot.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_context_ignores_samples_while_suspended() {
        let mut context = AnalysisContext::new(&AudioConfig::default()).unwrap();
        assert_eq!(context.state(), ContextState::Suspended);

        context.feed(&sine(500.0, 25_600.0, 256));
        assert!(context.snapshot().iter().all(|&b| b == 0));

        context.resume().unwrap();
        context.feed(&sine(500.0, 25_600.0, 256));
        let features = context.features();
        assert!(features.bass_level > 0.0);
    }

    #[test]
    fn test_closed_context_cannot_resume() {
        let mut context = AnalysisContext::new(&AudioConfig::default()).unwrap();
        context.close();
        assert!(matches!(context.resume(), Err(AudioError::ContextClosed)));
    }
}
