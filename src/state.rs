use crate::config::{MAX_ANGLE, MAX_SPEED, MIN_ANGLE, MIN_SPEED};
use crate::mapping::map_linear;

/// Transmission gear shown under the needle hub
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Gear {
    #[default]
    Park,
    Reverse,
    Drive,
}

impl Gear {
    pub const ALL: [Gear; 3] = [Gear::Park, Gear::Reverse, Gear::Drive];

    /// Letter used both on the wire and on the dial
    pub const fn symbol(self) -> char {
        match self {
            Gear::Park => 'P',
            Gear::Reverse => 'R',
            Gear::Drive => 'D',
        }
    }

    /// Case-insensitive lookup by symbol
    pub fn from_symbol(c: char) -> Option<Gear> {
        let c = c.to_ascii_uppercase();
        Self::ALL.into_iter().find(|gear| gear.symbol() == c)
    }
}

/// Speed and gear as last reported by the device.
///
/// Owned by the render thread; writers go through the token queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DialState {
    speed: i32,
    gear: Gear,
}

impl DialState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn speed(&self) -> i32 {
        self.speed
    }

    pub fn gear(&self) -> Gear {
        self.gear
    }

    /// Store `speed` saturated to `[MIN_SPEED, MAX_SPEED]`
    pub fn set_speed(&mut self, speed: i32) {
        self.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
    }

    pub fn set_gear(&mut self, gear: Gear) {
        if gear != self.gear {
            log::debug!("gear {:?} -> {:?}", self.gear, gear);
        }
        self.gear = gear;
    }

    /// Needle angle in whole degrees, clockwise from 12 o'clock
    pub fn needle_angle(&self) -> i32 {
        speed_to_angle(self.speed)
    }
}

/// Map a speed onto the dial sweep, truncating toward zero.
///
/// Speeds outside `[MIN_SPEED, MAX_SPEED]` land on `MIN_ANGLE`; see
/// [`map_linear`].
pub fn speed_to_angle(speed: i32) -> i32 {
    map_linear(
        speed as f64,
        MIN_SPEED as f64,
        MAX_SPEED as f64,
        MIN_ANGLE as f64,
        MAX_ANGLE as f64,
    ) as i32
}
