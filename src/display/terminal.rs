// Terminal display
// Upper-half-block cells: foreground is the top pixel, background the bottom one

use std::io::{self, Stdout, Write};

use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue};
use tracing::warn;

use super::{sample, Display, DisplayError};
use crate::canvas::Frame;
use crate::color::Rgb;

const HALF_BLOCK: char = '▀';

pub struct TerminalDisplay {
    out: Stdout,
}

impl TerminalDisplay {
    /// Enter raw mode and the alternate screen
    pub fn new() -> Result<Self, DisplayError> {
        let init = |e: io::Error| DisplayError::Init {
            backend: "terminal",
            reason: e.to_string(),
        };

        terminal::enable_raw_mode().map_err(init)?;
        let mut out = io::stdout();
        if let Err(e) = execute!(out, EnterAlternateScreen, cursor::Hide,
                                 terminal::Clear(terminal::ClearType::All)) {
            let _ = terminal::disable_raw_mode();
            return Err(init(e));
        }

        Ok(Self { out })
    }
}

impl Display for TerminalDisplay {
    fn name(&self) -> &str {
        "terminal"
    }

    fn present(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        let (cols, rows) = terminal::size()?;
        let (cols, rows) = (cols as usize, rows as usize);
        let pixel_rows = rows * 2;

        for row in 0..rows {
            queue!(self.out, cursor::MoveTo(0, row as u16))?;
            let mut current: Option<(Rgb, Rgb)> = None;

            for col in 0..cols {
                let top = sample(frame, col, row * 2, cols, pixel_rows);
                let bottom = sample(frame, col, row * 2 + 1, cols, pixel_rows);

                // Only emit colour changes
                if current != Some((top, bottom)) {
                    queue!(
                        self.out,
                        SetForegroundColor(to_color(top)),
                        SetBackgroundColor(to_color(bottom))
                    )?;
                    current = Some((top, bottom));
                }
                queue!(self.out, Print(HALF_BLOCK))?;
            }
        }

        queue!(self.out, ResetColor)?;
        self.out.flush()?;
        Ok(())
    }
}

impl Drop for TerminalDisplay {
    fn drop(&mut self) {
        let restored = execute!(self.out, ResetColor, cursor::Show, LeaveAlternateScreen)
            .and_then(|_| terminal::disable_raw_mode());
        if let Err(e) = restored {
            warn!("failed to restore terminal: {}", e);
        }
    }
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.red,
        g: rgb.green,
        b: rgb.blue,
    }
}
