// Face rendering
// Turns the eye state into draw commands and rasterizes them into a frame

use crate::canvas::{DrawCommand, Frame};
use crate::color::{ColorScheme, Palette};
use crate::elements::{accessories, eyes};
use crate::state::{EyeState, Mode};

/// Draw commands for the current state, in paint order:
/// background, eyes, then teardrops while sad. Reads the state only.
pub fn compose(state: &EyeState, palette: &Palette) -> Vec<DrawCommand> {
    let mut commands = vec![DrawCommand::Clear(palette.background)];

    match &state.mode {
        Mode::Normal => eyes::neutral::draw(state, palette, &mut commands),
        Mode::Happiness(activation) => {
            eyes::happy::draw(state, activation.phase, palette, &mut commands)
        }
        Mode::Sadness(activation) => {
            eyes::sad::draw(state, activation.phase, palette, &mut commands);
            accessories::teardrops(state, palette, &mut commands);
        }
    }

    commands
}

// ============================================================================
// ROBO FACE
// ============================================================================

/// Owns the framebuffer and the active colour scheme
pub struct RoboFace {
    frame: Frame,
    scheme: ColorScheme,
    palette: Palette,
}

impl RoboFace {
    pub fn new(width: usize, height: usize, scheme: ColorScheme) -> Self {
        Self {
            frame: Frame::new(width, height),
            scheme,
            palette: scheme.palette(),
        }
    }

    /// Repaint the whole frame from `state`
    pub fn render(&mut self, state: &EyeState) -> &Frame {
        let commands = compose(state, &self.palette);
        self.frame.draw_all(&commands);
        &self.frame
    }

    pub fn scheme(&self) -> ColorScheme {
        self.scheme
    }

    pub fn cycle_palette(&mut self) -> ColorScheme {
        self.scheme = self.scheme.next();
        self.palette = self.scheme.palette();
        self.scheme
    }
}
