use tracing::info;

use super::{Display, DisplayError};
use crate::canvas::Frame;

/// Discards frames, keeping only a count and the last frame size
#[derive(Debug, Default)]
pub struct HeadlessDisplay {
    frames: u64,
    last_size: Option<(usize, usize)>,
}

impl HeadlessDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_size(&self) -> Option<(usize, usize)> {
        self.last_size
    }
}

impl Display for HeadlessDisplay {
    fn name(&self) -> &str {
        "headless"
    }

    fn present(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        self.frames += 1;
        self.last_size = Some((frame.width, frame.height));
        Ok(())
    }
}

impl Drop for HeadlessDisplay {
    fn drop(&mut self) {
        info!(frames = self.frames(), last_size = ?self.last_size(), "headless display closed");
    }
}
