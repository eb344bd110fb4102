// Emotion-driven behaviour
// Picks the dominant emotion of a recognition result and switches the eyes to match

use std::collections::HashMap;
use std::fmt;
use std::time::Instant;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::state::{self, Expression, SharedEyes};

#[derive(Debug, Error)]
pub enum EmotionError {
    #[error("malformed emotion record: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Emotions recognised in a prediction, in tie-break order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Emotion {
    Neutral,
    Anger,
    Happiness,
    Sadness,
    Frustration,
}

impl Emotion {
    /// Earlier entries win ties in `EmotionProbabilities::dominant`
    pub const ALL: [Emotion; 5] = [
        Emotion::Neutral,
        Emotion::Anger,
        Emotion::Happiness,
        Emotion::Sadness,
        Emotion::Frustration,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Emotion::Neutral => "neutral",
            Emotion::Anger => "anger",
            Emotion::Happiness => "happiness",
            Emotion::Sadness => "sadness",
            Emotion::Frustration => "frustration",
        }
    }

    /// Eye expression for this emotion, if it has one
    pub fn expression(&self) -> Option<Expression> {
        match self {
            Emotion::Happiness => Some(Expression::Happiness),
            Emotion::Sadness => Some(Expression::Sadness),
            Emotion::Neutral | Emotion::Anger | Emotion::Frustration => None,
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// Wire shape of a recognition result. Everything is optional.
#[derive(Debug, Default, Deserialize)]
struct SerResult {
    #[serde(default)]
    prediction: Prediction,
}

#[derive(Debug, Default, Deserialize)]
struct Prediction {
    #[serde(default)]
    prob: HashMap<String, Value>,
}

/// Probability of each recognised emotion; absent emotions are 0.0
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EmotionProbabilities {
    pub neutral: f64,
    pub anger: f64,
    pub happiness: f64,
    pub sadness: f64,
    pub frustration: f64,
}

impl EmotionProbabilities {
    /// Parse one recognition result. Missing or non-numeric probabilities
    /// become 0.0; only input that is not JSON at all is rejected.
    pub fn from_json(input: &str) -> Result<Self, EmotionError> {
        let value: Value = serde_json::from_str(input)?;
        Ok(Self::from_value(&value))
    }

    pub fn from_value(value: &Value) -> Self {
        let result = SerResult::deserialize(value).unwrap_or_default();
        let mut probs = Self::default();
        for emotion in Emotion::ALL {
            let p = result.prediction.prob.get(emotion.key())
                .and_then(probability)
                .unwrap_or(0.0);
            probs.set(emotion, p);
        }
        probs
    }

    pub fn get(&self, emotion: Emotion) -> f64 {
        match emotion {
            Emotion::Neutral => self.neutral,
            Emotion::Anger => self.anger,
            Emotion::Happiness => self.happiness,
            Emotion::Sadness => self.sadness,
            Emotion::Frustration => self.frustration,
        }
    }

    pub fn set(&mut self, emotion: Emotion, p: f64) {
        match emotion {
            Emotion::Neutral => self.neutral = p,
            Emotion::Anger => self.anger = p,
            Emotion::Happiness => self.happiness = p,
            Emotion::Sadness => self.sadness = p,
            Emotion::Frustration => self.frustration = p,
        }
    }

    /// Emotion with the highest probability, first in `Emotion::ALL` on ties
    pub fn dominant(&self) -> Emotion {
        let mut best = Emotion::ALL[0];
        for emotion in Emotion::ALL.into_iter().skip(1) {
            if self.get(emotion) > self.get(best) {
                best = emotion;
            }
        }
        best
    }
}

// Numbers and numeric strings are accepted
fn probability(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// ============================================================================
// ACTUATORS
// ============================================================================

/// Speech and motion outputs of the robot
pub trait Actuator: Send {
    fn speak(&mut self, message: &str);
    fn move_robot(&mut self, action: &str);
}

/// Actuator that only logs what the robot would do
pub struct LogActuator;

impl Actuator for LogActuator {
    fn speak(&mut self, message: &str) {
        info!("🗣️  Speaking: {}", message);
    }

    fn move_robot(&mut self, action: &str) {
        info!("🤖 Moving robot: {}", action);
    }
}

/// What the robot says and does for an expression
pub fn reaction(expression: Expression) -> (&'static str, &'static str) {
    match expression {
        Expression::Sadness => ("I'm here for you.", "console"),
        Expression::Happiness => ("You seem happy!", "dance"),
    }
}

// ============================================================================
// DISPATCHER
// ============================================================================

pub struct EmotionDispatcher<A: Actuator = LogActuator> {
    eyes: SharedEyes,
    actuator: A,
}

impl EmotionDispatcher<LogActuator> {
    pub fn new(eyes: SharedEyes) -> Self {
        Self::with_actuator(eyes, LogActuator)
    }
}

impl<A: Actuator> EmotionDispatcher<A> {
    pub fn with_actuator(eyes: SharedEyes, actuator: A) -> Self {
        Self { eyes, actuator }
    }

    pub fn dispatch(&mut self, probs: &EmotionProbabilities) -> Emotion {
        self.dispatch_at(probs, Instant::now())
    }

    /// React to the dominant emotion of `probs`. Happiness and sadness
    /// (re)start their eye expression; other emotions change nothing.
    pub fn dispatch_at(&mut self, probs: &EmotionProbabilities, now: Instant) -> Emotion {
        let emotion = probs.dominant();
        info!(%emotion, "SER dominant emotion");

        let Some(expression) = emotion.expression() else {
            debug!(%emotion, "no eye behaviour for emotion");
            return emotion;
        };

        state::lock(&self.eyes).enter(expression, now);

        let (message, action) = reaction(expression);
        self.actuator.speak(message);
        self.actuator.move_robot(action);
        emotion
    }
}
