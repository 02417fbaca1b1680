//! Session - the single owner of all application state
//!
//! A [`Session`] holds the painting pipeline, the playback flag, the
//! reactive animation state, particles, the lazily created analysis context,
//! the playback transport and the frame scheduler. Hosts drive it with
//! pointer events, UI commands and frame ticks.

use symmetra_audio::{AnalysisContext, PlaybackTransport};
use symmetra_config::SymmetraConfig;
use symmetra_painting::{
    Modulation, PaintingPipeline, ParticleBurst, ReactiveState, Selection, ValidationError,
};
use tracing::{debug, info, warn};

use crate::input::{ElementRect, PointerEvent, PointerMapper};
use crate::scheduler::{FrameHandle, FrameScheduler};

/// Seed for the particle rng
const PARTICLE_SEED: u64 = 0x5EED;

/// Drawing and playback state for one canvas
pub struct Session<S: FrameScheduler, T: PlaybackTransport> {
    pipeline: PaintingPipeline,
    config: SymmetraConfig,
    mapper: PointerMapper,
    scheduler: S,
    transport: T,
    analysis: Option<AnalysisContext>,
    /// Set once analysis could not be created; static drawing continues
    reactive_unavailable: bool,
    reactive: ReactiveState,
    particles: ParticleBurst,
    playing: bool,
    pending_frame: Option<FrameHandle>,
    frames_rendered: u64,
}

impl<S: FrameScheduler, T: PlaybackTransport> Session<S, T> {
    pub fn new(
        config: SymmetraConfig,
        scheduler: S,
        transport: T,
    ) -> Result<Self, ValidationError> {
        let mut pipeline = PaintingPipeline::new(&config)?;
        pipeline.add_event_listener(|event| debug!("history: {:?}", event));
        Ok(Self {
            mapper: PointerMapper::new(config.canvas.width, config.canvas.height),
            reactive: ReactiveState::new(&config.reactive),
            particles: ParticleBurst::new(&config.reactive, PARTICLE_SEED),
            pipeline,
            config,
            scheduler,
            transport,
            analysis: None,
            reactive_unavailable: false,
            playing: false,
            pending_frame: None,
            frames_rendered: 0,
        })
    }

    pub fn pipeline(&self) -> &PaintingPipeline {
        &self.pipeline
    }

    #[cfg(test)]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    #[cfg(test)]
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    #[cfg(test)]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn reactive(&self) -> &ReactiveState {
        &self.reactive
    }

    pub fn particles(&self) -> &ParticleBurst {
        &self.particles
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_reactive_available(&self) -> bool {
        !self.reactive_unavailable
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn set_element_rect(&mut self, rect: ElementRect) {
        self.mapper.set_rect(rect);
    }

    /// Feed one pointer event; ignored while playback is active
    ///
    /// Returns the history index when the event committed a stroke.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Option<usize> {
        if self.playing {
            debug!("handle_pointer: playback active, ignoring {:?}", event);
            return None;
        }

        match event {
            PointerEvent::Down { x, y } => {
                let at = self.mapper.to_canvas(x, y)?;
                self.pipeline.pointer_down(at);
                None
            }
            PointerEvent::Move { x, y } => {
                let to = self.mapper.to_canvas(x, y)?;
                self.pipeline.pointer_move(to);
                None
            }
            PointerEvent::Up => self.pipeline.pointer_up(),
            PointerEvent::Leave => self.pipeline.pointer_leave(),
        }
    }

    pub fn cycle_color(&mut self) -> Selection {
        self.pipeline.cycle_color()
    }

    pub fn cycle_symmetry(&mut self) -> Selection {
        self.pipeline.cycle_symmetry()
    }

    pub fn cycle_size(&mut self) -> Selection {
        self.pipeline.cycle_size()
    }

    pub fn cycle_style(&mut self) -> Selection {
        self.pipeline.cycle_style()
    }

    pub fn cycle_tool(&mut self) -> Selection {
        self.pipeline.cycle_tool()
    }

    /// Clear the drawing; ignored while playback is active
    pub fn clear(&mut self) -> usize {
        if self.playing {
            debug!("clear: playback active, ignoring");
            return 0;
        }
        self.pipeline.clear_history()
    }

    /// Start or stop playback, returning whether it is now playing
    pub fn toggle_playback(&mut self) -> bool {
        if self.playing {
            self.stop_playback();
        } else {
            self.start_playback();
        }
        self.playing
    }

    /// Start reactive playback
    ///
    /// If analysis is unavailable or the transport refuses to play, a
    /// warning is logged and the session stays stopped.
    pub fn start_playback(&mut self) {
        if self.playing {
            return;
        }

        let Some(analysis) = self.analysis_context() else {
            warn!("Reactive mode unavailable, staying in static mode");
            return;
        };
        if let Err(e) = analysis.resume() {
            warn!("Failed to resume audio analysis: {}", e);
            return;
        }

        self.pipeline.cancel_capture();
        self.transport.seek_to_start();
        if let Err(e) = self.transport.play() {
            warn!("Playback failed to start: {}", e);
            if let Some(analysis) = self.analysis.as_mut() {
                analysis.suspend();
            }
            return;
        }

        self.playing = true;
        self.pending_frame = Some(self.scheduler.request_frame());
        info!("Playback started");
    }

    /// Stop playback and return to the static drawing
    ///
    /// Cancels the pending frame, resets rotation and scale, drops all
    /// particles and redraws the history statically.
    pub fn stop_playback(&mut self) {
        if !self.playing {
            return;
        }
        self.playing = false;
        self.transport.pause();
        if let Some(handle) = self.pending_frame.take() {
            self.scheduler.cancel_frame(handle);
        }
        if let Some(analysis) = self.analysis.as_mut() {
            analysis.suspend();
        }
        self.reactive.reset();
        self.particles.clear();
        self.pipeline.render_all();
        info!("Playback stopped after {} frames", self.frames_rendered);
    }

    /// The transport reached the end of the track
    pub fn on_playback_ended(&mut self) {
        debug!("on_playback_ended");
        self.stop_playback();
    }

    /// Render one reactive frame for `handle`
    ///
    /// Stale or cancelled handles are ignored. Returns whether a frame was
    /// rendered.
    pub fn tick(&mut self, handle: FrameHandle) -> bool {
        if !self.playing || self.pending_frame != Some(handle) {
            debug!("tick: stale frame {:?}, ignoring", handle);
            return false;
        }
        self.pending_frame = None;

        let samples = self.transport.advance(self.config.reactive.frame_seconds());
        let features = match self.analysis.as_mut() {
            Some(analysis) => {
                analysis.feed(&samples);
                analysis.features()
            }
            None => Default::default(),
        };

        let modulation: Modulation = self.reactive.advance(features);
        if modulation.beat {
            debug!("tick: beat (bass {:.0})", features.bass_level);
        }
        self.pipeline.render_frame(&modulation, &mut self.particles);
        self.frames_rendered += 1;

        if self.transport.is_ended() {
            self.on_playback_ended();
        } else {
            self.pending_frame = Some(self.scheduler.request_frame());
        }
        true
    }

    /// Deliver up to `max_frames` due frames, returning how many rendered
    pub fn run_frames(&mut self, max_frames: u32) -> u32 {
        let mut rendered = 0;
        for _ in 0..max_frames {
            let Some(handle) = self.scheduler.take_due_frame() else {
                break;
            };
            if self.tick(handle) {
                rendered += 1;
            }
        }
        rendered
    }

    /// Create the analysis context on first use
    fn analysis_context(&mut self) -> Option<&mut AnalysisContext> {
        if self.reactive_unavailable {
            return None;
        }
        if self.analysis.is_none() {
            match AnalysisContext::new(&self.config.audio) {
                Ok(context) => self.analysis = Some(context),
                Err(e) => {
                    warn!("Audio analysis unavailable: {}", e);
                    self.reactive_unavailable = true;
                    return None;
                }
            }
        }
        self.analysis.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ManualScheduler;
    use symmetra_audio::{AudioClip, ClipTransport};
    use symmetra_config::AudioConfig;

    fn tone(seconds: f32) -> AudioClip {
        let rate = 8000;
        let samples = (0..(seconds * rate as f32) as usize)
            .map(|i| (i as f32 * 0.3).sin())
            .collect();
        AudioClip::from_samples(samples, rate)
    }

    fn session(clip: AudioClip) -> Session<ManualScheduler, ClipTransport> {
        let config = SymmetraConfig::default();
        let transport = ClipTransport::new(clip, config.audio.volume);
        Session::new(config, ManualScheduler::new(), transport).unwrap()
    }

    fn draw_line(session: &mut Session<ManualScheduler, ClipTransport>) {
        session.handle_pointer(PointerEvent::Down { x: 320.0, y: 300.0 });
        session.handle_pointer(PointerEvent::Move { x: 340.0, y: 310.0 });
        session.handle_pointer(PointerEvent::Up);
    }

    #[test]
    fn test_stop_cancels_pending_frame_and_resets() {
        let mut session = session(tone(2.0));
        draw_line(&mut session);

        assert!(session.toggle_playback());
        assert_eq!(session.scheduler().pending_frames(), 1);

        for _ in 0..5 {
            let handle = session.scheduler_mut().fire_next().unwrap();
            assert!(session.tick(handle));
        }
        assert!(session.reactive().rotation() > 0.0);

        assert!(!session.toggle_playback());
        assert_eq!(session.scheduler().pending_frames(), 0);
        assert_eq!(session.reactive().rotation(), 0.0);
        assert_eq!(session.reactive().scale(), 1.0);
        assert!(session.particles().is_empty());
        assert!(!session.transport().is_playing());
    }

    #[test]
    fn test_stale_tick_is_ignored() {
        let mut session = session(tone(2.0));
        session.start_playback();
        let handle = session.scheduler_mut().fire_next().unwrap();
        session.stop_playback();

        assert!(!session.tick(handle));
        assert_eq!(session.frames_rendered(), 0);
        assert_eq!(session.scheduler().pending_frames(), 0);
    }

    #[test]
    fn test_play_failure_reverts_to_stopped() {
        let mut session = session(AudioClip::from_samples(Vec::new(), 8000));
        assert!(!session.toggle_playback());
        assert!(!session.is_playing());
        assert_eq!(session.scheduler().pending_frames(), 0);

        // Drawing still works
        draw_line(&mut session);
        assert_eq!(session.pipeline().history().len(), 1);
    }

    #[test]
    fn test_analysis_failure_disables_reactive_mode() {
        let config = SymmetraConfig {
            audio: AudioConfig {
                fft_size: 100,
                ..AudioConfig::default()
            },
            ..SymmetraConfig::default()
        };
        let transport = ClipTransport::new(tone(1.0), 0.6);
        let mut session = Session::new(config, ManualScheduler::new(), transport).unwrap();

        assert!(!session.toggle_playback());
        assert!(!session.is_reactive_available());

        draw_line(&mut session);
        assert_eq!(session.pipeline().history().len(), 1);
    }

    #[test]
    fn test_pointer_and_clear_ignored_while_playing() {
        let mut session = session(tone(2.0));
        draw_line(&mut session);
        session.start_playback();

        draw_line(&mut session);
        assert_eq!(session.clear(), 0);
        assert_eq!(session.pipeline().history().len(), 1);

        session.stop_playback();
        assert_eq!(session.clear(), 1);
    }

    #[test]
    fn test_clip_end_stops_playback() {
        // 133 samples per frame at 8 kHz and 60 fps
        let mut session = session(AudioClip::from_samples(vec![0.1; 399], 8000));
        session.start_playback();

        let rendered = session.run_frames(10);
        assert_eq!(rendered, 3);
        assert!(!session.is_playing());
        assert_eq!(session.scheduler().pending_frames(), 0);
        assert_eq!(session.reactive().rotation(), 0.0);
    }

    #[test]
    fn test_render_frame_keeps_history() {
        let mut session = session(tone(1.0));
        draw_line(&mut session);
        let before = session.pipeline().history().strokes().to_vec();

        session.start_playback();
        session.run_frames(4);
        assert_eq!(session.pipeline().history().strokes(), &before[..]);
    }
}
