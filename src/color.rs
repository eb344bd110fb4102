use serde::Deserialize;

/// 24-bit RGB colour as stored in the framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

/// Colours used by the expression renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb,
    pub normal: Rgb,
    pub happy: Rgb,
    pub sad: Rgb,
    /// Teardrops keep this colour whatever the sad colour is
    pub tear: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        ColorScheme::Classic.palette()
    }
}

// Colour schemes, cycled from the keyboard or gamepad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Classic,     // Green / cyan / yellow
    Ocean,       // Blue/Cyan
    Fire,        // Red/Orange
    Purple,      // Purple/Pink
}

impl ColorScheme {
    pub fn next(&self) -> Self {
        match self {
            ColorScheme::Classic => ColorScheme::Ocean,
            ColorScheme::Ocean => ColorScheme::Fire,
            ColorScheme::Fire => ColorScheme::Purple,
            ColorScheme::Purple => ColorScheme::Classic,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ColorScheme::Classic => "Classic (Green)",
            ColorScheme::Ocean => "Ocean (Blue/Cyan)",
            ColorScheme::Fire => "Fire (Red/Orange)",
            ColorScheme::Purple => "Purple/Pink",
        }
    }

    pub fn palette(&self) -> Palette {
        let (normal, happy, sad, tear) = match self {
            ColorScheme::Classic => (
                Rgb::new(0, 255, 0), Rgb::new(0, 255, 255),
                Rgb::new(255, 255, 0), Rgb::new(0, 255, 255),
            ),
            ColorScheme::Ocean => (
                Rgb::new(32, 128, 255), Rgb::new(128, 192, 255),
                Rgb::new(0, 64, 128), Rgb::new(64, 160, 255),
            ),
            ColorScheme::Fire => (
                Rgb::new(255, 96, 0), Rgb::new(255, 160, 64),
                Rgb::new(128, 32, 0), Rgb::new(0, 160, 255),
            ),
            ColorScheme::Purple => (
                Rgb::new(192, 64, 192), Rgb::new(255, 128, 255),
                Rgb::new(128, 0, 128), Rgb::new(0, 255, 255),
            ),
        };

        Palette {
            background: Rgb::BLACK,
            normal,
            happy,
            sad,
            tear,
        }
    }
}
