//! Dial measurements derived from the viewport.
//!
//! Every length is a fixed fraction of `GAUGE_SIZE * min(width, height)`, so
//! the dial stays circular and centered whatever the aspect ratio. Nothing is
//! cached: the window may resize between any two frames.

use crate::config::{GAUGE_SIZE, MAX_ANGLE, MAX_SPEED, MIN_ANGLE};

const OUTER_DIAMETER: f64 = 0.75;
const DIAL_DIAMETER: f64 = 0.70;
const RIM_DIAMETER: f64 = 0.69;
const INNER_DIAMETER: f64 = 0.05;

/// Needle starts this fraction of the rim radius in from the rim
const NEEDLE_OFFSET: f64 = 0.1;
/// Needle width as a fraction of the hub radius
const NEEDLE_WIDTH: f64 = 0.15;
const MARK_HEIGHT: f64 = 0.4;
const MARK_WIDTH_OFFSET: f64 = 0.2;
const MPH_FONT_SIZE: f64 = 0.06;
const MPH_OFFSET: f64 = 0.25;
const TRANSMISSION_FONT_SCALE: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Snapshot of every measurement the renderer needs for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialGeometry {
    pub center: Point,
    pub outer_diameter: f64,
    pub outer_radius: f64,
    /// Colored arc
    pub diameter: f64,
    pub radius: f64,
    /// Face disc drawn over the arc
    pub rim_diameter: f64,
    pub rim_radius: f64,
    /// Needle hub
    pub inner_diameter: f64,
    pub inner_radius: f64,
    pub needle_offset: f64,
    pub needle_width: f64,
    pub mark_height: f64,
    pub mark_width_offset: f64,
    pub mph_font_size: f32,
    pub mph_offset: f64,
    pub transmission_font_size: f32,
    /// Degrees available for tick placement
    pub usable_sweep: f64,
}

impl DialGeometry {
    pub fn compute(width: u32, height: u32) -> Self {
        let basis = width.min(height) as f64;
        let center = Point::new(width as f64 / 2.0, height as f64 / 2.0);

        let outer_diameter = OUTER_DIAMETER * GAUGE_SIZE * basis;
        let diameter = DIAL_DIAMETER * GAUGE_SIZE * basis;
        let rim_diameter = RIM_DIAMETER * GAUGE_SIZE * basis;
        let inner_diameter = INNER_DIAMETER * GAUGE_SIZE * basis;
        let rim_radius = 0.5 * rim_diameter;
        let inner_radius = 0.5 * inner_diameter;

        let needle_offset = NEEDLE_OFFSET * rim_radius;
        // never thinner than one pixel
        let needle_width = (NEEDLE_WIDTH * inner_radius).max(1.0);
        let mark_height = MARK_HEIGHT * needle_offset;
        let mark_width_offset = MARK_WIDTH_OFFSET * mark_height;

        let mph_font_size = MPH_FONT_SIZE * rim_radius;

        Self {
            center,
            outer_diameter,
            outer_radius: 0.5 * outer_diameter,
            diameter,
            radius: 0.5 * diameter,
            rim_diameter,
            rim_radius,
            inner_diameter,
            inner_radius,
            needle_offset,
            needle_width,
            mark_height,
            mark_width_offset,
            mph_font_size: mph_font_size as f32,
            mph_offset: MPH_OFFSET * rim_radius,
            transmission_font_size: (TRANSMISSION_FONT_SCALE * mph_font_size) as f32,
            usable_sweep: usable_sweep(needle_width, rim_radius),
        }
    }

    /// Degrees between consecutive speed marks
    pub fn tick_increment(&self) -> f64 {
        self.usable_sweep / MAX_SPEED as f64
    }

    /// Distance from the center to the digit label anchors
    pub fn label_radius(&self) -> f64 {
        self.rim_radius - self.needle_offset
    }

    pub fn is_degenerate(&self) -> bool {
        self.rim_radius < 1.0
    }
}

/// Full sweep less the angle the needle stroke covers at the rim, so the end
/// marks clear the needle at both stops
fn usable_sweep(needle_width: f64, rim_radius: f64) -> f64 {
    let sweep = (MAX_ANGLE - MIN_ANGLE) as f64;
    if rim_radius <= 0.0 {
        return sweep;
    }
    sweep - ((needle_width + 2.0) / rim_radius).to_degrees()
}
