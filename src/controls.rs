// Manual controls
// Keyboard and gamepad input mapped onto a small set of actions

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::debug;

use crate::state::Expression;

/// Action requested from the keyboard or a gamepad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Quit,
    Trigger(Expression),
    ToggleIdle,
    CyclePalette,
}

/// Polled once per animation tick
pub trait ControlSource {
    fn name(&self) -> &str;

    /// Collect pending controls, waiting at most `timeout` for the first one
    fn poll(&mut self, timeout: Duration) -> std::io::Result<Vec<Control>>;
}

// ============================================================================
// KEYBOARD
// ============================================================================

/// Keyboard input through crossterm. Expects raw mode to be enabled,
/// which the terminal display does.
pub struct KeyboardControls;

impl ControlSource for KeyboardControls {
    fn name(&self) -> &str {
        "keyboard"
    }

    fn poll(&mut self, timeout: Duration) -> std::io::Result<Vec<Control>> {
        let mut controls = Vec::new();
        let mut wait = timeout;

        while event::poll(wait)? {
            if let Event::Key(key) = event::read()? {
                if let Some(control) = map_key(&key) {
                    debug!(?key, ?control, "key control");
                    controls.push(control);
                }
            }
            // Drain whatever else is queued without waiting again
            wait = Duration::ZERO;
        }

        Ok(controls)
    }
}

pub fn map_key(key: &KeyEvent) -> Option<Control> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Control::Quit),
        KeyCode::Char('q') | KeyCode::Esc => Some(Control::Quit),
        KeyCode::Char('h') => Some(Control::Trigger(Expression::Happiness)),
        KeyCode::Char('s') => Some(Control::Trigger(Expression::Sadness)),
        KeyCode::Char('i') => Some(Control::ToggleIdle),
        KeyCode::Char('c') => Some(Control::CyclePalette),
        _ => None,
    }
}

// ============================================================================
// GAMEPAD
// ============================================================================

#[cfg(feature = "gamepad")]
pub use gamepad::GamepadControls;

#[cfg(feature = "gamepad")]
mod gamepad {
    use std::time::Duration;

    use gilrs::{Button, Event, EventType, Gilrs};
    use tracing::{info, warn};

    use super::{Control, ControlSource};
    use crate::state::Expression;

    pub struct GamepadControls {
        gilrs: Gilrs,
    }

    impl GamepadControls {
        pub fn new() -> Result<Self, gilrs::Error> {
            let gilrs = Gilrs::new()?;

            let mut found = false;
            for (id, gamepad) in gilrs.gamepads() {
                info!("🎮 Connected: {} (ID: {:?}, Power: {:?})", gamepad.name(), id, gamepad.power_info());
                found = true;
            }
            if !found {
                warn!("🎮 No gamepad detected. Gamepad controls disabled until one connects.");
            }

            Ok(Self { gilrs })
        }
    }

    impl ControlSource for GamepadControls {
        fn name(&self) -> &str {
            "gamepad"
        }

        // gilrs queues events itself, so this never waits
        fn poll(&mut self, _timeout: Duration) -> std::io::Result<Vec<Control>> {
            let mut controls = Vec::new();
            while let Some(Event { event, .. }) = self.gilrs.next_event() {
                if let EventType::ButtonPressed(button, _) = event {
                    if let Some(control) = map_button(button) {
                        controls.push(control);
                    }
                }
            }
            Ok(controls)
        }
    }

    pub fn map_button(button: Button) -> Option<Control> {
        match button {
            Button::Start => Some(Control::Quit),
            Button::North => Some(Control::Trigger(Expression::Happiness)),  // Y/Triangle
            Button::South => Some(Control::Trigger(Expression::Sadness)),    // A/Cross
            Button::East => Some(Control::ToggleIdle),                       // B/Circle
            Button::West => Some(Control::CyclePalette),                     // X/Square
            _ => None,
        }
    }
}

pub fn print_control_mapping() {
    println!("\n⌨️  Controls:");
    println!("  q / Esc / Ctrl-C   Quit");
    println!("  h                  Happiness");
    println!("  s                  Sadness");
    println!("  i                  Toggle idle drift");
    println!("  c                  Cycle colour scheme");
    #[cfg(feature = "gamepad")]
    {
        println!("\n🎮 Gamepad:");
        println!("  Start              Quit");
        println!("  Y/Triangle         Happiness");
        println!("  A/Cross            Sadness");
        println!("  B/Circle           Toggle idle drift");
        println!("  X/Square           Cycle colour scheme");
    }
}
