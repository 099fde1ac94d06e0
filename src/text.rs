use std::path::Path;

use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::config::Color;
use crate::error::SpeedometerError;
use crate::geometry::Point;
use crate::raster::Canvas;

/// Sans-serif faces tried in order when no font is configured, each with
/// its bold sibling
pub const SYSTEM_FONT_PATHS: &[(&str, &str)] = &[
    (
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    ),
    (
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    ),
    (
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    ),
    (
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    ),
    (
        "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
        "/usr/share/fonts/liberation/LiberationSans-Bold.ttf",
    ),
    (
        "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
        "/usr/share/fonts/truetype/noto/NotoSans-Bold.ttf",
    ),
    (
        "/usr/share/fonts/noto/NotoSans-Regular.ttf",
        "/usr/share/fonts/noto/NotoSans-Bold.ttf",
    ),
    (
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    ),
    ("C:\\Windows\\Fonts\\arial.ttf", "C:\\Windows\\Fonts\\arialbd.ttf"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Weight {
    #[default]
    Regular,
    Bold,
}

/// Text measurement and drawing, anchored at the left end of the baseline
pub trait Typeface {
    /// Advance width of `text` in pixels
    fn text_width(&self, text: &str, size: f32, weight: Weight) -> f64;

    /// Distance between consecutive baselines
    fn line_height(&self, size: f32, weight: Weight) -> f64;

    fn draw_text(
        &self,
        canvas: &mut Canvas<'_>,
        origin: Point,
        text: &str,
        size: f32,
        weight: Weight,
        color: Color,
    );
}

fn load_font(path: &Path) -> Result<Font<'static>, SpeedometerError> {
    let data = std::fs::read(path)?;
    Font::try_from_vec(data).ok_or_else(|| SpeedometerError::InvalidFont(path.to_path_buf()))
}

/// A regular face and, when one was found, its bold sibling.
///
/// Bold text falls back to the regular face.
pub struct FontFace {
    regular: Font<'static>,
    bold: Option<Font<'static>>,
}

impl FontFace {
    pub fn load(regular: &Path, bold: Option<&Path>) -> Result<Self, SpeedometerError> {
        let regular = load_font(regular)?;
        let bold = bold.map(load_font).transpose()?;
        Ok(Self { regular, bold })
    }

    /// Load the configured faces if given, otherwise the first loadable
    /// system font. A missing system bold sibling is not an error.
    pub fn discover(
        regular: Option<&Path>,
        bold: Option<&Path>,
    ) -> Result<Self, SpeedometerError> {
        if let Some(path) = regular {
            let face = Self::load(path, bold)?;
            log::info!("using font {}", path.display());
            return Ok(face);
        }
        for (regular, bold) in SYSTEM_FONT_PATHS {
            let regular = Path::new(regular);
            match load_font(regular) {
                Ok(font) => {
                    log::info!("using font {}", regular.display());
                    let bold = match load_font(Path::new(bold)) {
                        Ok(font) => Some(font),
                        Err(err) => {
                            log::debug!("no bold face at {bold}: {err}");
                            None
                        }
                    };
                    return Ok(Self {
                        regular: font,
                        bold,
                    });
                }
                Err(err) => log::debug!("skipping {}: {err}", regular.display()),
            }
        }
        Err(SpeedometerError::FontNotFound)
    }

    fn font(&self, weight: Weight) -> &Font<'static> {
        match weight {
            Weight::Bold => self.bold.as_ref().unwrap_or(&self.regular),
            Weight::Regular => &self.regular,
        }
    }

    fn layout(
        &self,
        text: &str,
        size: f32,
        weight: Weight,
        origin: (f32, f32),
    ) -> Vec<PositionedGlyph<'_>> {
        self.font(weight)
            .layout(text, Scale::uniform(size), point(origin.0, origin.1))
            .collect()
    }
}

impl Typeface for FontFace {
    fn text_width(&self, text: &str, size: f32, weight: Weight) -> f64 {
        let glyphs = self.layout(text, size, weight, (0.0, 0.0));
        match (glyphs.first(), glyphs.last()) {
            (Some(first), Some(last)) => (last.position().x - first.position().x
                + last.unpositioned().h_metrics().advance_width)
                as f64,
            _ => 0.0,
        }
    }

    fn line_height(&self, size: f32, weight: Weight) -> f64 {
        let v = self.font(weight).v_metrics(Scale::uniform(size));
        (v.ascent - v.descent + v.line_gap) as f64
    }

    fn draw_text(
        &self,
        canvas: &mut Canvas<'_>,
        origin: Point,
        text: &str,
        size: f32,
        weight: Weight,
        color: Color,
    ) {
        let origin = (origin.x as f32, origin.y as f32);
        for glyph in self.layout(text, size, weight, origin) {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| {
                    canvas.blend_pixel(bb.min.x + gx as i32, bb.min.y + gy as i32, color, v);
                });
            }
        }
    }
}
