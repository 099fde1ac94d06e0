use std::time::Duration;

/// Slowest speed the dial can show, in MPH
pub const MIN_SPEED: i32 = 0;
/// Fastest speed the dial can show, in MPH
pub const MAX_SPEED: i32 = 120;
/// Needle angle at `MIN_SPEED`, degrees clockwise from 12 o'clock
pub const MIN_ANGLE: i32 = -150;
/// Needle angle at `MAX_SPEED`, degrees clockwise from 12 o'clock
pub const MAX_ANGLE: i32 = 150;
/// Interval between animation frames
pub const TICK_INTERVAL: Duration = Duration::from_millis(10);

/// Every radius is this multiple of a fraction of the dial basis
pub const GAUGE_SIZE: f64 = 1.3;

pub const MPH_LABEL: &str = "MPH";
pub const TRANSMISSION_LABEL: &str = "P  R  D";

/// Color representation for dial elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::new(0xff, 0xff, 0xff);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn as_tuple(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

/// Colors by role. The hues are cosmetic, the roles are not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Window background behind the dial
    pub background: Color,
    /// Outer disc and face
    pub face: Color,
    /// Colored arc ring showing the active range
    pub arc: Color,
    /// Tick marks and digit labels
    pub marks: Color,
    pub needle: Color,
    /// Active gear letter
    pub highlight: Color,
    pub hub: Color,
    pub hub_outline: Color,
    /// "MPH" and the inactive gear letters
    pub label: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::BLACK,
            face: Color::new(32, 32, 32),
            arc: Color::new(0, 128, 0),
            marks: Color::new(0, 128, 0),
            needle: Color::new(255, 0, 0),
            highlight: Color::new(200, 0, 0),
            hub: Color::new(50, 50, 50),
            hub_outline: Color::BLACK,
            label: Color::WHITE,
        }
    }
}
