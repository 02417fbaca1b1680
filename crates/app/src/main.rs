//! Symmetra - scripted driver for the symmetric drawing canvas
//!
//! Replays a session script against a headless canvas, optionally runs
//! audio-reactive playback over a WAV clip, and logs a summary.

use anyhow::Context;
use clap::Parser;
use sha2::{Digest, Sha256};
use symmetra_audio::{AudioClip, ClipTransport};
use symmetra_config::SymmetraConfig;
use tracing::{info, warn};

mod cli;
mod input;
mod logging;
mod scheduler;
mod script;
mod session;

use cli::Args;
use scheduler::{FrameScheduler, ManualScheduler, PacedScheduler};
use script::SessionScript;
use session::Session;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(args.debug);

    let config = match &args.config {
        Some(path) => SymmetraConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SymmetraConfig::default(),
    };
    let script = SessionScript::load(&args.script)?;

    let clip = match &args.audio {
        Some(path) => AudioClip::from_wav(path)
            .with_context(|| format!("decoding audio {}", path.display()))?,
        None => {
            if args.frames.is_some() {
                warn!("--frames given without --audio; playback will not start");
            }
            AudioClip::from_samples(Vec::new(), 0)
        }
    };
    let transport = ClipTransport::new(clip, config.audio.volume);

    if args.realtime {
        let scheduler = PacedScheduler::new(config.reactive.frame_rate);
        info!("Pacing frames every {:?}", scheduler.interval());
        run(config, scheduler, transport, &script, args.frames)
    } else {
        run(config, ManualScheduler::new(), transport, &script, args.frames)
    }
}

fn run<S: FrameScheduler>(
    config: SymmetraConfig,
    scheduler: S,
    transport: ClipTransport,
    script: &SessionScript,
    frames: Option<u32>,
) -> anyhow::Result<()> {
    info!(
        "Starting Symmetra session on a {}x{} canvas",
        config.canvas.width, config.canvas.height
    );
    let mut session = Session::new(config, scheduler, transport)?;

    let replay = script.replay(&mut session);
    info!(
        "Replayed {} steps, {} strokes committed, {} frames",
        replay.steps, replay.committed, replay.frames
    );

    if let Some(max_frames) = frames {
        session.start_playback();
        if !session.is_reactive_available() {
            warn!("Audio analysis could not be created; skipping reactive frames");
        } else if !session.is_playing() {
            warn!("Playback did not start; skipping reactive frames");
        }
        let rendered = session.run_frames(max_frames);
        info!(
            "Reactive playback rendered {} frames (rotation {:.3}, scale {:.3}, {} particles)",
            rendered,
            session.reactive().rotation(),
            session.reactive().scale(),
            session.particles().len()
        );
    }
    session.stop_playback();

    let digest = Sha256::digest(session.pipeline().surface_bytes());
    info!(
        "Summary: {} strokes in history, {} frames rendered, surface sha256 {:x}",
        session.pipeline().history().len(),
        session.frames_rendered(),
        digest
    );
    Ok(())
}
