use rpi_led_matrix::{LedCanvas, LedColor, LedMatrix, LedMatrixOptions};
use tracing::info;

use super::{sample, Display, DisplayError};
use crate::canvas::Frame;
use crate::config::LedMatrixConfig;

/// Chain of HUB75 panels driven through an RGB matrix HAT.
/// The whole frame is scaled onto the chain.
pub struct LedMatrixDisplay {
    matrix: LedMatrix,
    canvas: Option<LedCanvas>,
}

impl LedMatrixDisplay {
    pub fn new(config: &LedMatrixConfig) -> Result<Self, DisplayError> {
        let mut options = LedMatrixOptions::new();
        options.set_rows(config.rows);
        options.set_cols(config.cols);
        options.set_chain_length(config.chain_length);
        options.set_hardware_mapping(&config.hardware_mapping);

        let matrix = LedMatrix::new(Some(options), None).map_err(|e| DisplayError::Init {
            backend: "led-matrix",
            reason: e.to_string(),
        })?;
        let canvas = matrix.offscreen_canvas();
        info!(
            "💡 LED matrix ready: {}x{} x{} ({})",
            config.cols, config.rows, config.chain_length, config.hardware_mapping
        );

        Ok(Self {
            matrix,
            canvas: Some(canvas),
        })
    }
}

impl Display for LedMatrixDisplay {
    fn name(&self) -> &str {
        "led-matrix"
    }

    fn present(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        let mut canvas = match self.canvas.take() {
            Some(canvas) => canvas,
            None => self.matrix.offscreen_canvas(),
        };

        let (width, height) = canvas.canvas_size();
        let (width, height) = (width.max(0) as usize, height.max(0) as usize);
        canvas.clear();

        for y in 0..height {
            for x in 0..width {
                let rgb = sample(frame, x, y, width, height);
                let color = LedColor { red: rgb.red, green: rgb.green, blue: rgb.blue };
                canvas.set(x as i32, y as i32, &color);
            }
        }

        self.canvas = Some(self.matrix.swap(canvas));
        Ok(())
    }
}
