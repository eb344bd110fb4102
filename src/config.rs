// Runtime configuration
// An optional TOML file, then command-line overrides

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;
use thiserror::Error;

use crate::color::ColorScheme;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Where frames are presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    #[default]
    Terminal,
    LedMatrix,
    Headless,
}

/// LED panel chain settings, used by the `led-matrix` backend
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LedMatrixConfig {
    pub rows: u32,
    pub cols: u32,
    pub chain_length: u32,
    pub hardware_mapping: String,
}

impl Default for LedMatrixConfig {
    fn default() -> Self {
        Self {
            rows: 32,
            cols: 64,
            chain_length: 2,
            hardware_mapping: "adafruit-hat".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub width: i32,
    pub height: i32,
    pub fps: u32,
    /// Random idle drift of both eyes
    pub idle: bool,
    /// Fixed seed for the animation timers, random when unset
    pub seed: Option<u64>,
    pub backend: Backend,
    pub palette: ColorScheme,
    /// JSON-lines emotion feed, `-` for stdin
    pub feed: Option<PathBuf>,
    /// Seconds to wait after each feed record, 0 dispatches as fast as read
    pub feed_pace: f64,
    /// Stop after this many frames
    pub frames: Option<u64>,
    pub log_file: Option<PathBuf>,
    pub led_matrix: LedMatrixConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            fps: 50,
            idle: false,
            seed: None,
            backend: Backend::Terminal,
            palette: ColorScheme::Classic,
            feed: None,
            feed_pace: 0.0,
            frames: None,
            log_file: None,
            led_matrix: LedMatrixConfig::default(),
        }
    }
}

impl Config {
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let input = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&input)
    }

    /// Config file (if any) with the command-line overrides applied
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply(cli);
        config.validate()?;
        Ok(config)
    }

    pub fn apply(&mut self, cli: &Cli) {
        if let Some(width) = cli.width {
            self.width = width;
        }
        if let Some(height) = cli.height {
            self.height = height;
        }
        if let Some(fps) = cli.fps {
            self.fps = fps;
        }
        if cli.idle {
            self.idle = true;
        }
        if cli.seed.is_some() {
            self.seed = cli.seed;
        }
        if let Some(backend) = cli.backend {
            self.backend = backend;
        }
        if let Some(palette) = cli.palette {
            self.palette = palette;
        }
        if cli.feed.is_some() {
            self.feed = cli.feed.clone();
        }
        if let Some(pace) = cli.feed_pace {
            self.feed_pace = pace;
        }
        if cli.frames.is_some() {
            self.frames = cli.frames;
        }
        if cli.log_file.is_some() {
            self.log_file = cli.log_file.clone();
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(ConfigError::Invalid(format!(
                "canvas must be at least 1x1, got {}x{}", self.width, self.height
            )));
        }
        if self.fps == 0 {
            return Err(ConfigError::Invalid("fps must be greater than zero".to_string()));
        }
        if !self.feed_pace.is_finite() || self.feed_pace < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "feed_pace must be a non-negative number of seconds, got {}", self.feed_pace
            )));
        }
        Ok(())
    }

    /// Pause between two feed records
    pub fn feed_pace(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(self.feed_pace)
    }

    /// Time between two animation ticks
    pub fn frame_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / self.fps as f64)
    }
}

#[derive(Debug, Default, Parser)]
#[command(name = "robo_eyes")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Animated robot eyes driven by speech emotion recognition", long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Canvas width in pixels
    #[arg(long)]
    pub width: Option<i32>,

    /// Canvas height in pixels
    #[arg(long)]
    pub height: Option<i32>,

    /// Animation frame rate
    #[arg(long)]
    pub fps: Option<u32>,

    /// Enable random idle eye drift
    #[arg(long)]
    pub idle: bool,

    /// Seed for the animation timers
    #[arg(long)]
    pub seed: Option<u64>,

    /// Display backend
    #[arg(short, long, value_enum)]
    pub backend: Option<Backend>,

    /// Colour scheme
    #[arg(short, long, value_enum)]
    pub palette: Option<ColorScheme>,

    /// JSON-lines file of emotion predictions, `-` reads stdin
    #[arg(short, long)]
    pub feed: Option<PathBuf>,

    /// Seconds to wait after each feed record
    #[arg(long)]
    pub feed_pace: Option<f64>,

    /// Stop after this many frames
    #[arg(long)]
    pub frames: Option<u64>,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!((config.width, config.height, config.fps), (640, 480, 50));
        assert!(!config.idle);
        assert_eq!(config.backend, Backend::Terminal);
        assert_eq!(config.frame_interval(), std::time::Duration::from_millis(20));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(r#"
            fps = 30
            idle = true
            backend = "led-matrix"
            palette = "fire"

            [led_matrix]
            chain_length = 1
        "#).unwrap();

        assert_eq!(config.fps, 30);
        assert!(config.idle);
        assert_eq!(config.width, 640);
        assert_eq!(config.backend, Backend::LedMatrix);
        assert_eq!(config.palette, ColorScheme::Fire);
        assert_eq!(config.led_matrix.chain_length, 1);
        assert_eq!(config.led_matrix.hardware_mapping, "adafruit-hat");
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(Config::from_toml("fps = \"fast\""), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "robo_eyes", "--width", "320", "--fps", "25", "--idle",
            "--backend", "headless", "--seed", "42", "--frames", "10",
        ]);
        let config = Config::from_cli(&cli).unwrap();

        assert_eq!(config.width, 320);
        assert_eq!(config.height, 480);
        assert_eq!(config.fps, 25);
        assert!(config.idle);
        assert_eq!(config.backend, Backend::Headless);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.frames, Some(10));
    }

    #[test]
    fn test_validation() {
        let mut config = Config::default();
        config.fps = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.height = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.feed_pace = -1.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_feed_pace() {
        assert_eq!(Config::default().feed_pace(), std::time::Duration::ZERO);

        let cli = Cli::parse_from(["robo_eyes", "--feed", "-", "--feed-pace", "1.5"]);
        let config = Config::from_cli(&cli).unwrap();
        assert_eq!(config.feed, Some(PathBuf::from("-")));
        assert_eq!(config.feed_pace(), std::time::Duration::from_millis(1500));
    }

    #[test]
    fn test_missing_config_file() {
        let err = Config::load(Path::new("/nonexistent/robo_eyes.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
