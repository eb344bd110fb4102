// Display backends
// Every backend takes a finished RGB frame and shows it somewhere

mod headless;
#[cfg(feature = "led-matrix")]
mod led_matrix;
mod terminal;

pub use headless::HeadlessDisplay;
#[cfg(feature = "led-matrix")]
pub use led_matrix::LedMatrixDisplay;
pub use terminal::TerminalDisplay;

use thiserror::Error;

use crate::canvas::Frame;
use crate::config::{Backend, Config};

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("failed to initialise {backend} display: {reason}")]
    Init { backend: &'static str, reason: String },
    #[error("display I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Somewhere a frame can be presented
pub trait Display {
    fn name(&self) -> &str;

    /// Show `frame`, replacing whatever was shown before
    fn present(&mut self, frame: &Frame) -> Result<(), DisplayError>;
}

/// Open the backend selected in `config`
pub fn open(config: &Config) -> Result<Box<dyn Display>, DisplayError> {
    match config.backend {
        Backend::Terminal => Ok(Box::new(TerminalDisplay::new()?)),
        Backend::Headless => Ok(Box::new(HeadlessDisplay::new())),
        #[cfg(feature = "led-matrix")]
        Backend::LedMatrix => Ok(Box::new(LedMatrixDisplay::new(&config.led_matrix)?)),
        #[cfg(not(feature = "led-matrix"))]
        Backend::LedMatrix => Err(DisplayError::Init {
            backend: "led-matrix",
            reason: "built without the `led-matrix` feature".to_string(),
        }),
    }
}

/// Nearest-neighbour sample of `frame` for a target of `target_w` x `target_h`
pub(crate) fn sample(frame: &Frame, x: usize, y: usize, target_w: usize, target_h: usize)
    -> crate::color::Rgb {
    let src_x = if target_w == 0 { 0 } else { x * frame.width / target_w };
    let src_y = if target_h == 0 { 0 } else { y * frame.height / target_h };
    frame.get_pixel(src_x, src_y)
}
