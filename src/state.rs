// Eye animation state
// Everything the scheduler advances and the renderer reads lives here

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;
use rand::Rng;
use rand::rngs::StdRng;

// Timer ranges, in seconds
pub const BLINK_INTERVAL_SECS: (f64, f64) = (3.0, 6.0);
pub const BLINK_DURATION_SECS: (f64, f64) = (0.2, 0.4);
pub const IDLE_INTERVAL_SECS: (f64, f64) = (2.0, 5.0);
pub const MODE_DURATION_SECS: (f64, f64) = (3.0, 6.0);
pub const IDLE_MAX_DRIFT: i32 = 10;

/// State shared between the animation loop and the emotion dispatcher
pub type SharedEyes = Arc<Mutex<EyeState>>;

/// Lock the shared state, recovering it if a holder panicked
pub fn lock(eyes: &SharedEyes) -> MutexGuard<'_, EyeState> {
    eyes.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Eye centre in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EyePosition {
    pub x: i32,
    pub y: i32,
}

/// Timed expressions that can be triggered from outside
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Expression {
    Happiness,
    Sadness,
}

impl Expression {
    pub fn name(&self) -> &str {
        match self {
            Expression::Happiness => "happiness",
            Expression::Sadness => "sadness",
        }
    }
}

/// Sub-state of a timed expression, each covering one third of its duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Onset,
    Peak,
    Recovery,
}

impl Phase {
    /// Phase for `elapsed` seconds into an expression lasting `duration`
    pub fn at(elapsed: f64, duration: f64) -> Self {
        if elapsed < duration / 3.0 {
            Phase::Onset
        } else if elapsed < 2.0 * duration / 3.0 {
            Phase::Peak
        } else {
            Phase::Recovery
        }
    }

    pub fn index(&self) -> u8 {
        match self {
            Phase::Onset => 0,
            Phase::Peak => 1,
            Phase::Recovery => 2,
        }
    }
}

/// One activation of a timed expression
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Activation {
    pub started: Instant,
    pub duration: f64,
    pub phase: Phase,
}

impl Activation {
    pub fn new(started: Instant, duration: f64) -> Self {
        Self {
            started,
            duration,
            phase: Phase::Onset,
        }
    }

    pub fn elapsed(&self, now: Instant) -> f64 {
        now.saturating_duration_since(self.started).as_secs_f64()
    }
}

/// Active eye mode. Start time, duration and phase only exist while an
/// expression runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mode {
    Normal,
    Happiness(Activation),
    Sadness(Activation),
}

impl Mode {
    pub fn expression(&self) -> Option<Expression> {
        match self {
            Mode::Normal => None,
            Mode::Happiness(_) => Some(Expression::Happiness),
            Mode::Sadness(_) => Some(Expression::Sadness),
        }
    }

    pub fn activation(&self) -> Option<&Activation> {
        match self {
            Mode::Normal => None,
            Mode::Happiness(activation) | Mode::Sadness(activation) => Some(activation),
        }
    }

    pub fn activation_mut(&mut self) -> Option<&mut Activation> {
        match self {
            Mode::Normal => None,
            Mode::Happiness(activation) | Mode::Sadness(activation) => Some(activation),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BlinkTimer {
    pub blinking: bool,
    pub started: Instant,
    pub duration: f64,
    pub last: Instant,
    pub next_interval: f64,
}

#[derive(Debug, Clone)]
pub struct IdleTimer {
    pub enabled: bool,
    pub interval: f64,
    pub last: Instant,
}

pub struct EyeState {
    width: i32,
    height: i32,
    pub left: EyePosition,
    pub right: EyePosition,
    pub left_open: bool,
    pub right_open: bool,
    pub mode: Mode,
    pub blink: BlinkTimer,
    pub idle: IdleTimer,
    rng: StdRng,
}

impl EyeState {
    pub fn new(width: i32, height: i32, mut rng: StdRng, now: Instant) -> Self {
        let blink = BlinkTimer {
            blinking: false,
            started: now,
            duration: rng.random_range(BLINK_DURATION_SECS.0..BLINK_DURATION_SECS.1),
            last: now,
            next_interval: rng.random_range(BLINK_INTERVAL_SECS.0..BLINK_INTERVAL_SECS.1),
        };
        let idle = IdleTimer {
            enabled: false,
            interval: rng.random_range(IDLE_INTERVAL_SECS.0..IDLE_INTERVAL_SECS.1),
            last: now,
        };

        Self {
            width,
            height,
            left: EyePosition {
                x: (width as f64 * 0.25) as i32,
                y: (height as f64 * 0.5) as i32,
            },
            right: EyePosition {
                x: (width as f64 * 0.75) as i32,
                y: (height as f64 * 0.5) as i32,
            },
            left_open: true,
            right_open: true,
            mode: Mode::Normal,
            blink,
            idle,
            rng,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn expression(&self) -> Option<Expression> {
        self.mode.expression()
    }

    pub fn phase(&self) -> Option<Phase> {
        self.mode.activation().map(|activation| activation.phase)
    }

    pub fn is_blinking(&self) -> bool {
        self.blink.blinking
    }

    /// Start (or restart) an expression with a random duration
    pub fn enter(&mut self, expression: Expression, now: Instant) {
        let duration = self.random_f64(MODE_DURATION_SECS);
        self.enter_for(expression, now, duration);
    }

    /// Start (or restart) an expression lasting `duration` seconds
    pub fn enter_for(&mut self, expression: Expression, now: Instant, duration: f64) {
        let activation = Activation::new(now, duration);
        self.mode = match expression {
            Expression::Happiness => Mode::Happiness(activation),
            Expression::Sadness => Mode::Sadness(activation),
        };
    }

    pub fn set_idle(&mut self, enabled: bool) {
        self.idle.enabled = enabled;
    }

    pub fn toggle_idle(&mut self) -> bool {
        self.idle.enabled = !self.idle.enabled;
        self.idle.enabled
    }

    pub(crate) fn random_f64(&mut self, (low, high): (f64, f64)) -> f64 {
        self.rng.random_range(low..high)
    }

    pub(crate) fn random_drift(&mut self) -> i32 {
        self.rng.random_range(-IDLE_MAX_DRIFT..=IDLE_MAX_DRIFT)
    }
}
