// Module declarations
mod animator;
mod canvas;
mod color;
mod config;
mod controls;
mod display;
mod elements;
mod emotion;
mod face;
mod feed;
mod scheduler;
mod state;

use std::fs::File;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use animator::{CancelToken, EyeTask, LoopSettings};
use config::{Backend, Cli, Config};
use controls::{print_control_mapping, ControlSource, KeyboardControls};
use emotion::EmotionDispatcher;
use feed::FeedSource;
use state::{EyeState, SharedEyes};

// ============================================================================
// MAIN ENTRY POINT
// ============================================================================

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli).context("failed to load configuration")?;
    init_logging(&config)?;

    // Eye state shared by the animation loop and the emotion feed
    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut eye_state = EyeState::new(config.width, config.height, rng, Instant::now());
    eye_state.set_idle(config.idle);
    let eyes: SharedEyes = Arc::new(Mutex::new(eye_state));

    info!(
        "👀 RoboEyes {}x{} @ {} FPS, idle drift {}, palette {}",
        config.width, config.height, config.fps,
        if config.idle { "ON" } else { "OFF" },
        config.palette.name()
    );

    let cancel = CancelToken::new();

    let feed = match &config.feed {
        Some(path) => {
            let source = FeedSource::from_path(path);
            let dispatcher = EmotionDispatcher::new(eyes.clone());
            Some(feed::spawn(source, dispatcher, cancel.clone(), config.feed_pace())
                .context("failed to start emotion feed")?)
        }
        None => {
            info!("No emotion feed configured, manual controls only");
            None
        }
    };

    if config.backend == Backend::Terminal {
        print_control_mapping();
    }

    let settings = LoopSettings {
        frame_interval: config.frame_interval(),
        scheme: config.palette,
        max_frames: config.frames,
    };

    let setup_config = config.clone();
    let task = EyeTask::spawn(eyes, settings, cancel, move || {
        let display = display::open(&setup_config)?;

        let mut controls: Vec<Box<dyn ControlSource>> = Vec::new();
        if setup_config.backend == Backend::Terminal {
            controls.push(Box::new(KeyboardControls));
        }
        #[cfg(feature = "gamepad")]
        match controls::GamepadControls::new() {
            Ok(gamepad) => controls.push(Box::new(gamepad)),
            Err(e) => warn!("⚠️  Could not initialize gamepad: {}", e),
        }

        Ok((display, controls))
    })
    .context("failed to start animation loop")?;

    let reason = task.join().context("animation loop failed")?;
    info!(?reason, "RoboEyes stopped");

    // A feed still blocked on input is left behind; the process is exiting
    if let Some(handle) = feed.filter(|handle| handle.is_finished()) {
        match handle.join() {
            Ok(Ok(dispatched)) => info!(dispatched, "emotion feed done"),
            Ok(Err(e)) => warn!("emotion feed failed: {}", e),
            Err(_) => warn!("emotion feed thread panicked"),
        }
    }

    Ok(())
}

fn init_logging(config: &Config) -> Result<()> {
    let filter = log_filter(config, std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref());

    match &config.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    Ok(())
}

/// `RUST_LOG` when set and valid, else the default level for the backend
fn log_filter(config: &Config, rust_log: Option<&str>) -> EnvFilter {
    // Log lines would tear through the terminal display, keep them quiet there
    let default_level = if config.backend == Backend::Terminal && config.log_file.is_none() {
        tracing::Level::WARN
    } else {
        tracing::Level::INFO
    };

    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::default().add_directive(default_level.into()))
}
