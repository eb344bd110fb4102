// Driving loop
// Poll controls, advance, render and present once per frame on an owned thread

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use crate::color::ColorScheme;
use crate::controls::{Control, ControlSource};
use crate::display::{Display, DisplayError};
use crate::face::RoboFace;
use crate::scheduler;
use crate::state::{self, Expression, Phase, SharedEyes};

/// Upper bound on how long a tick waits for input
pub const CONTROL_POLL_TIMEOUT: Duration = Duration::from_millis(1);

/// Shared stop flag, checked once per tick
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Loop settings taken from the config. The frame size comes from the
/// eye state.
#[derive(Debug, Clone)]
pub struct LoopSettings {
    pub frame_interval: Duration,
    pub scheme: ColorScheme,
    pub max_frames: Option<u64>,
}

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Cancelled,
    Quit,
    FrameLimit,
}

pub struct Animator {
    eyes: SharedEyes,
    face: RoboFace,
    display: Box<dyn Display>,
    controls: Vec<Box<dyn ControlSource>>,
    settings: LoopSettings,
    cancel: CancelToken,
    frames: u64,
    // Expression and phase shown by the last frame
    shown: (Option<Expression>, Option<Phase>),
}

impl Animator {
    pub fn new(eyes: SharedEyes, display: Box<dyn Display>,
               controls: Vec<Box<dyn ControlSource>>,
               settings: LoopSettings, cancel: CancelToken) -> Self {
        let (width, height) = {
            let state = state::lock(&eyes);
            (state.width() as usize, state.height() as usize)
        };
        Self {
            face: RoboFace::new(width, height, settings.scheme),
            eyes,
            display,
            controls,
            settings,
            cancel,
            frames: 0,
            shown: (None, None),
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn run(&mut self) -> Result<StopReason, DisplayError> {
        info!(
            "🚀 Starting animation loop on {} display ({:?} per frame, {})",
            self.display.name(), self.settings.frame_interval, self.face.scheme().name()
        );

        loop {
            if self.cancel.is_cancelled() {
                return Ok(StopReason::Cancelled);
            }
            if self.settings.max_frames.is_some_and(|max| self.frames >= max) {
                return Ok(StopReason::FrameLimit);
            }

            let started = Instant::now();
            if self.handle_controls(started) {
                self.cancel.cancel();
                return Ok(StopReason::Quit);
            }

            self.tick(started)?;

            let elapsed = started.elapsed();
            if elapsed < self.settings.frame_interval {
                thread::sleep(self.settings.frame_interval - elapsed);
            }
        }
    }

    /// Advance and draw one frame at `now`
    pub fn tick(&mut self, now: Instant) -> Result<(), DisplayError> {
        // Scheduler and renderer see the state under one lock
        let mut eyes = state::lock(&self.eyes);
        scheduler::advance(&mut eyes, now);
        let shown = (eyes.expression(), eyes.phase());
        if shown != self.shown {
            match shown {
                (Some(expression), Some(phase)) => {
                    info!("🎭 Showing {} (phase {})", expression.name(), phase.index())
                }
                _ => info!(blinking = eyes.is_blinking(), "🙂 Back to neutral eyes"),
            }
            self.shown = shown;
        }
        let frame = self.face.render(&eyes);
        drop(eyes);

        self.display.present(frame)?;
        self.frames += 1;
        Ok(())
    }

    // Returns true when a quit was requested
    fn handle_controls(&mut self, now: Instant) -> bool {
        let mut pending = Vec::new();
        for source in self.controls.iter_mut() {
            match source.poll(CONTROL_POLL_TIMEOUT) {
                Ok(controls) => pending.extend(controls),
                Err(e) => warn!("failed to poll {} controls: {}", source.name(), e),
            }
        }

        for control in pending {
            match control {
                Control::Quit => {
                    info!("👋 Quit requested");
                    return true;
                }
                Control::Trigger(expression) => {
                    info!("🎭 Manual {}", expression.name());
                    state::lock(&self.eyes).enter(expression, now);
                }
                Control::ToggleIdle => {
                    let enabled = state::lock(&self.eyes).toggle_idle();
                    info!("👀 Idle drift {}", if enabled { "ON" } else { "OFF" });
                }
                Control::CyclePalette => {
                    let scheme = self.face.cycle_palette();
                    info!("🎨 Color: {}", scheme.name());
                }
            }
        }

        debug!(frames = self.frames, "controls handled");
        false
    }
}

// ============================================================================
// EYE TASK
// ============================================================================

/// Animation loop running on its own thread
pub struct EyeTask {
    handle: JoinHandle<Result<StopReason, DisplayError>>,
}

impl EyeTask {
    /// Spawn the loop. `setup` runs on the new thread and builds the display
    /// and control sources, so backends that must stay on one thread can.
    pub fn spawn<F>(eyes: SharedEyes, settings: LoopSettings, cancel: CancelToken, setup: F)
        -> std::io::Result<Self>
    where
        F: FnOnce() -> Result<(Box<dyn Display>, Vec<Box<dyn ControlSource>>), DisplayError>
            + Send + 'static,
    {
        let handle = thread::Builder::new()
            .name("eyes".to_string())
            .spawn(move || {
                let (display, controls) = match setup() {
                    Ok(parts) => parts,
                    Err(e) => {
                        error!("❌ {}", e);
                        cancel.cancel();
                        return Err(e);
                    }
                };
                let mut animator = Animator::new(eyes, display, controls, settings, cancel.clone());
                let result = animator.run();
                // Let the feed and any other workers know the loop is gone
                cancel.cancel();
                info!(frames = animator.frames(), "animation loop stopped");
                result
            })?;

        Ok(Self { handle })
    }

    /// Wait for the loop to finish
    pub fn join(self) -> Result<StopReason, DisplayError> {
        match self.handle.join() {
            Ok(result) => result,
            Err(_) => Err(DisplayError::Io(std::io::Error::other("animation thread panicked"))),
        }
    }
}
