//! Anti-aliased primitives over an RGBA8 frame.
//!
//! Angles are dial degrees: 0 at 12 o'clock, positive clockwise on screen.

use crate::config::Color;
use crate::geometry::Point;

/// Axis-aligned rectangle in local (unrotated) space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.x + self.width, self.y),
            Point::new(self.x, self.y + self.height),
            Point::new(self.x + self.width, self.y + self.height),
        ]
    }

    /// Signed distance from `p` to the rectangle with rounded corners;
    /// negative inside
    fn signed_distance(&self, p: Point, corner_radius: f64) -> f64 {
        let (hw, hh) = (self.width / 2.0, self.height / 2.0);
        let r = corner_radius.min(hw).min(hh).max(0.0);
        let qx = (p.x - (self.x + hw)).abs() - (hw - r);
        let qy = (p.y - (self.y + hh)).abs() - (hh - r);
        let outside = qx.max(0.0).hypot(qy.max(0.0));
        outside + qx.max(qy).min(0.0) - r
    }
}

/// Rotation by `degrees` about `pivot`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    pub degrees: f64,
    pub pivot: Point,
}

impl Rotation {
    pub const fn new(degrees: f64, pivot: Point) -> Self {
        Self { degrees, pivot }
    }

    /// Local space to screen space
    pub fn apply(&self, p: Point) -> Point {
        self.turn(p, self.degrees)
    }

    /// Screen space back to local space
    pub fn invert(&self, p: Point) -> Point {
        self.turn(p, -self.degrees)
    }

    fn turn(&self, p: Point, degrees: f64) -> Point {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let (dx, dy) = (p.x - self.pivot.x, p.y - self.pivot.y);
        Point::new(
            self.pivot.x + dx * cos - dy * sin,
            self.pivot.y + dx * sin + dy * cos,
        )
    }
}

/// Dial angle of `p` as seen from `center`, in `(-180, 180]`
pub fn dial_angle(center: Point, p: Point) -> f64 {
    (p.x - center.x).atan2(center.y - p.y).to_degrees()
}

pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        debug_assert!(frame.len() >= width * height * 4);
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        self.frame
            .get(idx..idx + 4)
            .and_then(|px| px.try_into().ok())
    }

    /// Blend `color` over the pixel at `(x, y)`; out-of-frame writes are dropped
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Color, alpha: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let a = alpha.clamp(0.0, 1.0);
        let idx = (y as usize * self.width + x as usize) * 4;
        let Some(dst) = self.frame.get_mut(idx..idx + 4) else {
            return;
        };
        let (r, g, b) = color.as_tuple();
        for (d, s) in dst.iter_mut().zip([r, g, b]) {
            *d = (s as f32 * a + *d as f32 * (1.0 - a)).round() as u8;
        }
        dst[3] = 0xff;
    }

    /// Visit every pixel center in the clipped box, handing `coverage` the
    /// center point and blending by what it returns
    fn shade<F>(&mut self, min: Point, max: Point, color: Color, coverage: F)
    where
        F: Fn(Point) -> f64,
    {
        let x0 = (min.x.floor() as i64 - 1).max(0);
        let y0 = (min.y.floor() as i64 - 1).max(0);
        let x1 = (max.x.ceil() as i64 + 1).min(self.width as i64 - 1);
        let y1 = (max.y.ceil() as i64 + 1).min(self.height as i64 - 1);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let aa = coverage(Point::new(x as f64 + 0.5, y as f64 + 0.5));
                if aa > 0.01 {
                    self.blend_pixel(x as i32, y as i32, color, aa as f32);
                }
            }
        }
    }

    pub fn fill_disc(&mut self, center: Point, radius: f64, color: Color) {
        if radius <= 0.0 {
            return;
        }
        let min = Point::new(center.x - radius, center.y - radius);
        let max = Point::new(center.x + radius, center.y + radius);
        self.shade(min, max, color, |p| {
            let dist = (p.x - center.x).hypot(p.y - center.y);
            (radius - dist + 0.5).clamp(0.0, 1.0)
        });
    }

    /// One-pixel outline of a circle
    pub fn stroke_circle(&mut self, center: Point, radius: f64, color: Color) {
        if radius <= 0.0 {
            return;
        }
        let min = Point::new(center.x - radius - 1.0, center.y - radius - 1.0);
        let max = Point::new(center.x + radius + 1.0, center.y + radius + 1.0);
        self.shade(min, max, color, |p| {
            let dist = (p.x - center.x).hypot(p.y - center.y);
            (1.0 - (dist - radius).abs()).clamp(0.0, 1.0)
        });
    }

    /// Pie slice from the center out to `radius`, between two dial angles
    pub fn fill_sector(&mut self, center: Point, radius: f64, start: f64, end: f64, color: Color) {
        if radius <= 0.0 || start > end {
            return;
        }
        let min = Point::new(center.x - radius, center.y - radius);
        let max = Point::new(center.x + radius, center.y + radius);
        self.shade(min, max, color, |p| {
            let angle = dial_angle(center, p);
            if angle < start || angle > end {
                return 0.0;
            }
            let dist = (p.x - center.x).hypot(p.y - center.y);
            (radius - dist + 0.5).clamp(0.0, 1.0)
        });
    }

    /// Fill `rect` after rotating it into place; the frame is untouched by
    /// the rotation itself
    pub fn fill_rect(&mut self, rect: Rect, corner_radius: f64, rotation: Rotation, color: Color) {
        if rect.width <= 0.0 || rect.height <= 0.0 {
            return;
        }
        let corners = rect.corners().map(|c| rotation.apply(c));
        let min = corners
            .iter()
            .fold(Point::new(f64::MAX, f64::MAX), |m, c| {
                Point::new(m.x.min(c.x), m.y.min(c.y))
            });
        let max = corners
            .iter()
            .fold(Point::new(f64::MIN, f64::MIN), |m, c| {
                Point::new(m.x.max(c.x), m.y.max(c.y))
            });
        self.shade(min, max, color, |p| {
            let local = rotation.invert(p);
            (0.5 - rect.signed_distance(local, corner_radius)).clamp(0.0, 1.0)
        });
    }
}
