//! Dial renderer.
//!
//! A frame is first composed into a [`Scene`], an ordered list of draw
//! commands where later commands occlude earlier ones, and then replayed onto
//! a [`Canvas`]. Composition reads the state and geometry but never writes
//! either.

use crate::config::{
    Color, Palette, MAX_ANGLE, MAX_SPEED, MIN_ANGLE, MPH_LABEL, TRANSMISSION_LABEL,
};
use crate::geometry::{DialGeometry, Point};
use crate::raster::{Canvas, Rect, Rotation};
use crate::state::DialState;
use crate::text::{Typeface, Weight};

/// Needle corner rounding, in pixels
const NEEDLE_CORNER_RADIUS: f64 = 3.0;

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Disc {
        center: Point,
        radius: f64,
        color: Color,
    },
    Circle {
        center: Point,
        radius: f64,
        color: Color,
    },
    Sector {
        center: Point,
        radius: f64,
        start: f64,
        end: f64,
        color: Color,
    },
    Rect {
        rect: Rect,
        corner_radius: f64,
        rotation: Rotation,
        color: Color,
    },
    Text {
        x: f64,
        baseline: f64,
        text: String,
        size: f32,
        weight: Weight,
        color: Color,
    },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn render(&self, canvas: &mut Canvas<'_>, typeface: &dyn Typeface) {
        for command in &self.commands {
            match command {
                DrawCommand::Clear(color) => canvas.clear(*color),
                DrawCommand::Disc {
                    center,
                    radius,
                    color,
                } => canvas.fill_disc(*center, *radius, *color),
                DrawCommand::Circle {
                    center,
                    radius,
                    color,
                } => canvas.stroke_circle(*center, *radius, *color),
                DrawCommand::Sector {
                    center,
                    radius,
                    start,
                    end,
                    color,
                } => canvas.fill_sector(*center, *radius, *start, *end, *color),
                DrawCommand::Rect {
                    rect,
                    corner_radius,
                    rotation,
                    color,
                } => canvas.fill_rect(*rect, *corner_radius, *rotation, *color),
                DrawCommand::Text {
                    x,
                    baseline,
                    text,
                    size,
                    weight,
                    color,
                } => typeface.draw_text(
                    canvas,
                    Point::new(*x, *baseline),
                    text,
                    *size,
                    *weight,
                    *color,
                ),
            }
        }
    }
}

// ============================================================================
// TICK MARKS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkKind {
    /// Multiples of ten, tallest and labelled
    Tens,
    Fives,
    Ones,
}

impl MarkKind {
    pub fn for_speed(speed: i32) -> Self {
        if speed % 10 == 0 {
            MarkKind::Tens
        } else if speed % 5 == 0 {
            MarkKind::Fives
        } else {
            MarkKind::Ones
        }
    }

    /// The mark's rectangle at 12 o'clock, hanging inward from the rim
    fn rect(self, g: &DialGeometry) -> Rect {
        let (width, height) = match self {
            MarkKind::Tens => (g.needle_width + g.mark_width_offset, 2.0 * g.mark_height),
            MarkKind::Fives => (g.needle_width + g.mark_width_offset, g.mark_height),
            MarkKind::Ones => (g.needle_width / 2.0, g.mark_height),
        };
        Rect::new(g.center.x, g.center.y - g.rim_radius, width, height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickMark {
    pub speed: i32,
    /// Dial degrees
    pub theta: f64,
    pub kind: MarkKind,
}

impl TickMark {
    pub fn is_labelled(&self) -> bool {
        self.kind == MarkKind::Tens
    }
}

/// One mark per whole speed, stepping a fixed increment from `MIN_ANGLE`
pub fn tick_marks(g: &DialGeometry) -> Vec<TickMark> {
    let increment = g.tick_increment();
    (0..=MAX_SPEED)
        .map(|speed| TickMark {
            speed,
            theta: MIN_ANGLE as f64 + speed as f64 * increment,
            kind: MarkKind::for_speed(speed),
        })
        .collect()
}

// ============================================================================
// DIGIT LABELS
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum SpeedMatch {
    Exactly(i32),
    Above(i32),
    /// Exclusive on both ends
    Between(i32, i32),
}

impl SpeedMatch {
    fn matches(self, speed: i32) -> bool {
        match self {
            SpeedMatch::Exactly(s) => speed == s,
            SpeedMatch::Above(s) => speed > s,
            SpeedMatch::Between(lo, hi) => speed > lo && speed < hi,
        }
    }
}

/// Pixel correction applied to a label anchor, in label widths (x) and line
/// heights (y)
#[derive(Debug, Clone, Copy)]
struct LabelRule {
    when: SpeedMatch,
    dx: f64,
    dy: f64,
}

const MID_SPEED: i32 = MAX_SPEED / 2;

/// Tuned for fixed-pitch digits; every matching rule is applied in order.
const LABEL_RULES: [LabelRule; 6] = [
    // top center
    LabelRule {
        when: SpeedMatch::Exactly(MID_SPEED),
        dx: -0.5,
        dy: 0.25,
    },
    // right half anchors at the label's right end
    LabelRule {
        when: SpeedMatch::Above(MID_SPEED),
        dx: -1.0,
        dy: 0.0,
    },
    LabelRule {
        when: SpeedMatch::Between(10, 110),
        dx: 0.0,
        dy: 0.5,
    },
    LabelRule {
        when: SpeedMatch::Between(10, 40),
        dx: 0.0,
        dy: -0.25,
    },
    LabelRule {
        when: SpeedMatch::Exactly(50),
        dx: -0.25,
        dy: 0.25,
    },
    LabelRule {
        when: SpeedMatch::Exactly(70),
        dx: 0.25,
        dy: 0.25,
    },
];

/// Baseline-left point for the digit label of `speed` drawn at `theta`
pub fn label_anchor(
    g: &DialGeometry,
    speed: i32,
    theta: f64,
    label_width: f64,
    line_height: f64,
) -> Point {
    let r = g.label_radius();
    let phi = (90.0 - theta.trunc()).to_radians();
    let mut x = g.center.x + r * phi.cos();
    let mut y = g.center.y - r * phi.sin();
    for rule in LABEL_RULES.iter().filter(|rule| rule.when.matches(speed)) {
        x += rule.dx * label_width;
        y += rule.dy * line_height;
    }
    Point::new(x, y)
}

// ============================================================================
// NEEDLE
// ============================================================================

/// Drawing rotation for a needle angle.
///
/// The angle is taken relative to `MIN_ANGLE` and re-centred with a
/// remainder, so angles past either stop wrap rather than saturate.
pub fn needle_rotation(angle: i32) -> i32 {
    ((angle - MIN_ANGLE) - MAX_ANGLE) % (MAX_ANGLE + 1)
}

fn needle_rect(g: &DialGeometry) -> Rect {
    Rect::new(
        g.center.x,
        g.center.y - g.rim_radius + g.needle_offset,
        g.needle_width,
        g.rim_radius - g.needle_offset,
    )
}

// ============================================================================
// COMPOSITION
// ============================================================================

/// Build the full draw list for one frame
pub fn compose(
    g: &DialGeometry,
    state: &DialState,
    palette: &Palette,
    typeface: &dyn Typeface,
) -> Scene {
    let mut scene = Scene::new();
    scene.add_command(DrawCommand::Clear(palette.background));
    if g.is_degenerate() {
        return scene;
    }

    add_face(&mut scene, g, palette);
    add_ticks(&mut scene, g, palette, typeface);
    scene.add_command(DrawCommand::Rect {
        rect: needle_rect(g),
        corner_radius: NEEDLE_CORNER_RADIUS,
        rotation: Rotation::new(needle_rotation(state.needle_angle()) as f64, g.center),
        color: palette.needle,
    });
    scene.add_command(DrawCommand::Disc {
        center: g.center,
        radius: g.inner_radius,
        color: palette.hub,
    });
    scene.add_command(DrawCommand::Circle {
        center: g.center,
        radius: g.inner_radius,
        color: palette.hub_outline,
    });

    let mph_width = typeface.text_width(MPH_LABEL, g.mph_font_size, Weight::Regular);
    scene.add_command(DrawCommand::Text {
        x: g.center.x - mph_width / 2.0,
        baseline: g.center.y + g.mph_offset,
        text: MPH_LABEL.to_string(),
        size: g.mph_font_size,
        weight: Weight::Regular,
        color: palette.label,
    });
    add_transmission(&mut scene, g, state, palette, typeface);
    scene
}

/// Compose and rasterize one frame
pub fn render(
    canvas: &mut Canvas<'_>,
    g: &DialGeometry,
    state: &DialState,
    palette: &Palette,
    typeface: &dyn Typeface,
) {
    compose(g, state, palette, typeface).render(canvas, typeface);
}

fn add_face(scene: &mut Scene, g: &DialGeometry, palette: &Palette) {
    scene.add_command(DrawCommand::Disc {
        center: g.center,
        radius: g.outer_radius,
        color: palette.face,
    });
    scene.add_command(DrawCommand::Sector {
        center: g.center,
        radius: g.radius,
        start: MIN_ANGLE as f64,
        end: MAX_ANGLE as f64,
        color: palette.arc,
    });
    // covers all but the outer ring of the arc
    scene.add_command(DrawCommand::Disc {
        center: g.center,
        radius: g.rim_radius,
        color: palette.face,
    });
}

fn add_ticks(scene: &mut Scene, g: &DialGeometry, palette: &Palette, typeface: &dyn Typeface) {
    let size = g.transmission_font_size;
    let line_height = typeface.line_height(size, Weight::Bold);
    for mark in tick_marks(g) {
        scene.add_command(DrawCommand::Rect {
            rect: mark.kind.rect(g),
            corner_radius: 0.0,
            rotation: Rotation::new(mark.theta, g.center),
            color: palette.marks,
        });
        if mark.is_labelled() {
            let text = mark.speed.to_string();
            let width = typeface.text_width(&text, size, Weight::Bold);
            let anchor = label_anchor(g, mark.speed, mark.theta, width, line_height);
            scene.add_command(DrawCommand::Text {
                x: anchor.x,
                baseline: anchor.y,
                text,
                size,
                weight: Weight::Bold,
                color: palette.marks,
            });
        }
    }
}

/// Horizontal offset of `gear`'s letter within the bold transmission label
pub fn gear_offset(typeface: &dyn Typeface, symbol: char, size: f32) -> f64 {
    TRANSMISSION_LABEL.find(symbol).map_or(0.0, |i| {
        typeface.text_width(&TRANSMISSION_LABEL[..i], size, Weight::Bold)
    })
}

fn add_transmission(
    scene: &mut Scene,
    g: &DialGeometry,
    state: &DialState,
    palette: &Palette,
    typeface: &dyn Typeface,
) {
    let size = g.transmission_font_size;
    let start = g.center.x - typeface.text_width(TRANSMISSION_LABEL, size, Weight::Bold) / 2.0;
    let baseline = g.center.y + 3.0 * g.mph_offset;
    scene.add_command(DrawCommand::Text {
        x: start,
        baseline,
        text: TRANSMISSION_LABEL.to_string(),
        size,
        weight: Weight::Bold,
        color: palette.label,
    });
    let symbol = state.gear().symbol();
    scene.add_command(DrawCommand::Text {
        x: start + gear_offset(typeface, symbol, size),
        baseline,
        text: symbol.to_string(),
        size,
        weight: Weight::Bold,
        color: palette.highlight,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Gear;
    use crate::text::testing::BlockFace;

    fn geometry() -> DialGeometry {
        DialGeometry::compute(800, 600)
    }

    fn tick_rects(scene: &Scene) -> Vec<&DrawCommand> {
        scene
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Rect { corner_radius, .. } if *corner_radius == 0.0))
            .collect()
    }

    fn texts(scene: &Scene) -> Vec<(f64, f64, String, Color)> {
        scene
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text {
                    x,
                    baseline,
                    text,
                    color,
                    ..
                } => Some((*x, *baseline, text.clone(), *color)),
                _ => None,
            })
            .collect()
    }

    fn needle(scene: &Scene) -> Rotation {
        scene
            .commands()
            .iter()
            .find_map(|c| match c {
                DrawCommand::Rect {
                    corner_radius,
                    rotation,
                    ..
                } if *corner_radius > 0.0 => Some(*rotation),
                _ => None,
            })
            .expect("needle drawn")
    }

    #[test]
    fn test_tick_count_and_labels() {
        let marks = tick_marks(&geometry());
        assert_eq!(marks.len(), 121);
        assert_eq!(marks.iter().filter(|m| m.is_labelled()).count(), 13);
        assert_eq!(marks.iter().filter(|m| m.kind == MarkKind::Fives).count(), 12);
        assert_eq!(marks.iter().filter(|m| m.kind == MarkKind::Ones).count(), 96);
    }

    #[test]
    fn test_ticks_step_evenly_from_min_angle() {
        let g = geometry();
        let marks = tick_marks(&g);
        assert_eq!(marks[0].theta, MIN_ANGLE as f64);
        for pair in marks.windows(2) {
            let step = pair[1].theta - pair[0].theta;
            assert!((step - g.tick_increment()).abs() < 1e-9);
        }
        assert!(marks[120].theta < MAX_ANGLE as f64);
    }

    #[test]
    fn test_mark_sizes_by_kind() {
        let g = geometry();
        let tens = MarkKind::Tens.rect(&g);
        let fives = MarkKind::Fives.rect(&g);
        let ones = MarkKind::Ones.rect(&g);
        assert!(tens.height > fives.height);
        assert_eq!(fives.height, ones.height);
        assert!(fives.width > ones.width);
        // anchored at the top of the rim
        assert_eq!(tens.y, g.center.y - g.rim_radius);
        assert_eq!(tens.x, g.center.x);
    }

    #[test]
    fn test_scene_draws_every_tick_and_label() {
        let g = geometry();
        let scene = compose(&g, &DialState::new(), &Palette::default(), &BlockFace);
        assert_eq!(tick_rects(&scene).len(), 121);
        let digits: Vec<String> = texts(&scene)
            .into_iter()
            .filter(|(_, _, t, _)| t.parse::<i32>().is_ok())
            .map(|(_, _, t, _)| t)
            .collect();
        let expected: Vec<String> = (0..=120).step_by(10).map(|s: i32| s.to_string()).collect();
        assert_eq!(digits, expected);
    }

    #[test]
    fn test_draw_order() {
        let g = geometry();
        let palette = Palette::default();
        let scene = compose(&g, &DialState::new(), &palette, &BlockFace);
        let cmds = scene.commands();
        assert_eq!(cmds[0], DrawCommand::Clear(palette.background));
        assert!(matches!(cmds[1], DrawCommand::Disc { radius, .. } if radius == g.outer_radius));
        assert!(matches!(cmds[2], DrawCommand::Sector { start, end, .. } if start == -150.0 && end == 150.0));
        assert!(matches!(cmds[3], DrawCommand::Disc { radius, .. } if radius == g.rim_radius));

        let needle_at = cmds
            .iter()
            .position(|c| matches!(c, DrawCommand::Rect { corner_radius, .. } if *corner_radius > 0.0))
            .unwrap();
        let last_tick = cmds
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Rect { corner_radius, .. } if *corner_radius == 0.0))
            .unwrap();
        assert!(last_tick < needle_at);
        assert!(matches!(cmds[needle_at + 1], DrawCommand::Disc { radius, .. } if radius == g.inner_radius));
        assert!(matches!(cmds[needle_at + 2], DrawCommand::Circle { .. }));

        let tail = texts(&scene);
        let labels: Vec<&str> = tail[tail.len() - 3..].iter().map(|t| t.2.as_str()).collect();
        assert_eq!(labels, ["MPH", "P  R  D", "P"]);
    }

    #[test]
    fn test_digits_and_gears_are_bold_caption_is_regular() {
        let g = geometry();
        let scene = compose(&g, &DialState::new(), &Palette::default(), &BlockFace);
        for command in scene.commands() {
            if let DrawCommand::Text { text, weight, .. } = command {
                let expected = if text == MPH_LABEL {
                    Weight::Regular
                } else {
                    Weight::Bold
                };
                assert_eq!(*weight, expected, "{text:?}");
            }
        }
    }

    #[test]
    fn test_needle_rotation_at_stops() {
        assert_eq!(needle_rotation(-150), -150);
        assert_eq!(needle_rotation(0), 0);
        assert_eq!(needle_rotation(150), 150);
    }

    #[test]
    fn test_needle_rotation_wraps_out_of_envelope() {
        assert_eq!(needle_rotation(200), 49);
        assert_eq!(needle_rotation(-200), -49);
        assert_eq!(needle_rotation(151), 0);
    }

    #[test]
    fn test_needle_pivots_on_center() {
        let g = geometry();
        let mut state = DialState::new();
        state.set_speed(60);
        let rot = needle(&compose(&g, &state, &Palette::default(), &BlockFace));
        assert_eq!(rot, Rotation::new(0.0, g.center));
    }

    #[test]
    fn test_label_rules_left_half() {
        let g = geometry();
        let (w, h) = (20.0, 10.0);
        let plain = |theta: f64| {
            let phi = (90.0 - theta.trunc()).to_radians();
            Point::new(
                g.center.x + g.label_radius() * phi.cos(),
                g.center.y - g.label_radius() * phi.sin(),
            )
        };
        let theta = -150.0;
        assert_eq!(label_anchor(&g, 0, theta, w, h), plain(theta));

        let p = label_anchor(&g, 10, -125.0, w, h);
        assert_eq!(p, plain(-125.0));

        let base = plain(-100.0);
        let p = label_anchor(&g, 20, -100.0, w, h);
        assert!((p.x - base.x).abs() < 1e-9);
        assert!((p.y - (base.y + 0.25 * h)).abs() < 1e-9);

        let base = plain(-25.0);
        let p = label_anchor(&g, 50, -25.0, w, h);
        assert!((p.x - (base.x - 0.25 * w)).abs() < 1e-9);
        assert!((p.y - (base.y + 0.75 * h)).abs() < 1e-9);
    }

    #[test]
    fn test_label_rules_top_and_right_half() {
        let g = geometry();
        let (w, h) = (20.0, 10.0);
        let plain = |theta: f64| {
            let phi = (90.0 - theta.trunc()).to_radians();
            Point::new(
                g.center.x + g.label_radius() * phi.cos(),
                g.center.y - g.label_radius() * phi.sin(),
            )
        };

        let base = plain(-0.4);
        let p = label_anchor(&g, 60, -0.4, w, h);
        assert!((p.x - (base.x - 0.5 * w)).abs() < 1e-9);
        assert!((p.y - (base.y + 0.75 * h)).abs() < 1e-9);

        let base = plain(24.0);
        let p = label_anchor(&g, 70, 24.0, w, h);
        assert!((p.x - (base.x - 0.75 * w)).abs() < 1e-9);
        assert!((p.y - (base.y + 0.75 * h)).abs() < 1e-9);

        let base = plain(99.0);
        let p = label_anchor(&g, 100, 99.0, w, h);
        assert!((p.x - (base.x - w)).abs() < 1e-9);
        assert!((p.y - (base.y + 0.5 * h)).abs() < 1e-9);

        let base = plain(148.0);
        let p = label_anchor(&g, 120, 148.0, w, h);
        assert!((p.x - (base.x - w)).abs() < 1e-9);
        assert!((p.y - base.y).abs() < 1e-9);
    }

    #[test]
    fn test_label_anchor_truncates_theta() {
        let g = geometry();
        assert_eq!(
            label_anchor(&g, 0, -149.7, 10.0, 10.0),
            label_anchor(&g, 0, -149.0, 10.0, 10.0)
        );
    }

    #[test]
    fn test_gear_offsets() {
        let face = BlockFace;
        assert_eq!(gear_offset(&face, Gear::Park.symbol(), 10.0), 0.0);
        assert!((gear_offset(&face, Gear::Reverse.symbol(), 10.0) - 18.0).abs() < 1e-9);
        assert!((gear_offset(&face, Gear::Drive.symbol(), 10.0) - 36.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_viewport_only_clears() {
        let g = DialGeometry::compute(0, 0);
        let scene = compose(&g, &DialState::new(), &Palette::default(), &BlockFace);
        assert_eq!(scene.commands().len(), 1);
    }

    #[test]
    fn test_render_is_idempotent() {
        let (w, h) = (160usize, 120usize);
        let g = DialGeometry::compute(w as u32, h as u32);
        let mut state = DialState::new();
        state.set_speed(73);
        state.set_gear(Gear::Reverse);
        let palette = Palette::default();

        let mut first = vec![0u8; w * h * 4];
        render(&mut Canvas::new(&mut first, w, h), &g, &state, &palette, &BlockFace);
        let mut second = vec![0x5a; w * h * 4];
        render(&mut Canvas::new(&mut second, w, h), &g, &state, &palette, &BlockFace);
        render(&mut Canvas::new(&mut second, w, h), &g, &state, &palette, &BlockFace);
        assert_eq!(first, second);
    }

    #[test]
    fn test_needle_pixels_follow_speed() {
        let (w, h) = (600usize, 600usize);
        let g = DialGeometry::compute(w as u32, h as u32);
        let palette = Palette::default();
        let needle_px = [palette.needle.r, palette.needle.g, palette.needle.b, 0xff];
        // a point halfway up the needle when it points straight up
        let (px, py) = (
            g.center.x as usize + 1,
            (g.center.y - g.rim_radius / 2.0) as usize,
        );

        let mut state = DialState::new();
        state.set_speed(60);
        let mut buf = vec![0u8; w * h * 4];
        let mut canvas = Canvas::new(&mut buf, w, h);
        render(&mut canvas, &g, &state, &palette, &BlockFace);
        assert_eq!(canvas.pixel(px, py), Some(needle_px));

        state.set_speed(0);
        render(&mut canvas, &g, &state, &palette, &BlockFace);
        assert_ne!(canvas.pixel(px, py), Some(needle_px));
    }
}
