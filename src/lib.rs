// ============================================================================
// CRATE CONFIGURATION & IMPORTS
// ============================================================================

pub mod animation;
pub mod config;
pub mod error;
pub mod geometry;
pub mod mapping;
pub mod raster;
pub mod scene;
pub mod state;
pub mod text;
pub mod token;

// External crate imports
use bon::Builder;
use pixels::{Pixels, SurfaceTexture};

// Standard library imports
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

// Window management imports
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowBuilder;

pub use animation::FrameClock;
pub use config::{Color, Palette, MAX_ANGLE, MAX_SPEED, MIN_ANGLE, MIN_SPEED, TICK_INTERVAL};
pub use error::SpeedometerError;
pub use geometry::DialGeometry;
pub use raster::Canvas;
pub use scene::{DrawCommand, Scene};
pub use state::{DialState, Gear};
pub use text::{FontFace, Typeface, Weight};
pub use token::{Delivery, Token, TokenSource};

// ============================================================================
// PUBLIC API - MAIN INTERFACE
// ============================================================================

/// Window and appearance settings. The dial's scale and timing are fixed.
#[derive(Debug, Clone, Builder)]
pub struct SpeedometerConfig {
    #[builder(into, default = "Speedometer Graphics".to_string())]
    pub title: String,

    // Window configuration
    #[builder(default = 800)]
    pub window_width: u32,
    #[builder(default = 600)]
    pub window_height: u32,
    #[builder(default = false)]
    pub maximized: bool,
    #[builder(default = true)]
    pub decorations: bool,

    /// Font file for labels; system fonts are searched when unset
    #[builder(into)]
    pub font_path: Option<PathBuf>,

    /// Bold face for digits and gear letters, used with `font_path`
    #[builder(into)]
    pub bold_font_path: Option<PathBuf>,

    #[builder(default)]
    pub palette: Palette,
}

impl Default for SpeedometerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Main speedometer struct - the primary public interface
#[derive(Debug, Clone)]
pub struct Speedometer {
    config: SpeedometerConfig,
    state: DialState,
}

impl Speedometer {
    pub fn new(config: SpeedometerConfig) -> Self {
        Self {
            config,
            state: DialState::new(),
        }
    }

    pub fn config(&self) -> &SpeedometerConfig {
        &self.config
    }

    pub fn state(&self) -> &DialState {
        &self.state
    }

    pub fn min_speed(&self) -> i32 {
        MIN_SPEED
    }

    pub fn max_speed(&self) -> i32 {
        MAX_SPEED
    }

    /// Out-of-range speeds are clamped to the dial
    pub fn set_speed(&mut self, speed: i32) {
        self.state.set_speed(speed);
    }

    pub fn set_transmission(&mut self, gear: Gear) {
        self.state.set_gear(gear);
    }

    /// Classify one device token and apply it
    pub fn apply_token(&mut self, raw: &str) -> Token {
        token::interpret(raw, &mut self.state)
    }

    /// Apply what `source` has queued. The first time it reports closed
    /// the speed drops to zero and `open` is cleared; after that this does
    /// nothing.
    pub fn pump<S: TokenSource + ?Sized>(&mut self, source: &mut S, open: &mut bool) {
        if !*open {
            return;
        }
        if !token::drain(source, &mut self.state) {
            *open = false;
            self.state.set_speed(0);
            log::info!("token source closed, speed reset");
        }
    }

    /// Draw list for a `width` x `height` viewport
    pub fn compose(&self, width: u32, height: u32, typeface: &dyn Typeface) -> Scene {
        let geometry = DialGeometry::compute(width, height);
        scene::compose(&geometry, &self.state, &self.config.palette, typeface)
    }

    /// Render one frame into an RGBA8 buffer of `width` x `height` pixels
    pub fn render(&self, frame: &mut [u8], width: u32, height: u32, typeface: &dyn Typeface) {
        let mut canvas = Canvas::new(frame, width as usize, height as usize);
        self.compose(width, height, typeface).render(&mut canvas, typeface);
    }

    /// Open the window with a dial that only changes through this handle
    pub fn show(&mut self) -> Result<(), SpeedometerError> {
        self.run_window(None)
    }

    /// Open the window and feed it tokens from `source` once per frame tick
    pub fn show_with_tokens<S: TokenSource>(
        &mut self,
        mut source: S,
    ) -> Result<(), SpeedometerError> {
        self.run_window(Some(&mut source))
    }

    fn run_window(
        &mut self,
        mut source: Option<&mut dyn TokenSource>,
    ) -> Result<(), SpeedometerError> {
        let face = FontFace::discover(
            self.config.font_path.as_deref(),
            self.config.bold_font_path.as_deref(),
        )?;

        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(
                self.config.window_width as f64,
                self.config.window_height as f64,
            ))
            .with_resizable(true)
            .with_maximized(self.config.maximized)
            .with_decorations(self.config.decorations)
            .build(&event_loop)?;

        let window = Arc::new(window);
        let window_clone = window.clone();

        let size = window.inner_size();
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let mut pixels = Pixels::new(size.width, size.height, surface_texture)?;
        let mut buffer = (size.width, size.height);

        let palette = self.config.palette;
        let mut clock = FrameClock::new(TICK_INTERVAL, Instant::now());
        let mut source_open = source.is_some();

        log::info!(
            "speedometer window {}x{}, frame every {:?}",
            size.width,
            size.height,
            clock.interval()
        );

        event_loop.run(move |event, window_target| match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested
                | WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            logical_key: Key::Named(NamedKey::Escape),
                            state: ElementState::Pressed,
                            ..
                        },
                    ..
                } => {
                    log::info!("shutting down after {} frames", clock.ticks());
                    clock.stop();
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    log::debug!("viewport {}x{}", new_size.width, new_size.height);
                    if new_size.width == 0 || new_size.height == 0 {
                        buffer = (0, 0);
                        return;
                    }
                    if let Err(err) = pixels.resize_surface(new_size.width, new_size.height) {
                        log::warn!("surface resize failed: {err}");
                    }
                    match pixels.resize_buffer(new_size.width, new_size.height) {
                        Ok(()) => buffer = (new_size.width, new_size.height),
                        Err(err) => log::warn!("buffer resize failed: {err}"),
                    }
                }
                WindowEvent::RedrawRequested => {
                    let (width, height) = buffer;
                    if width == 0 || height == 0 {
                        return;
                    }
                    let geometry = DialGeometry::compute(width, height);
                    let mut canvas = Canvas::new(pixels.frame_mut(), width as usize, height as usize);
                    scene::render(&mut canvas, &geometry, &self.state, &palette, &face);
                    if let Err(err) = pixels.render() {
                        log::error!("render failed: {err}");
                        clock.stop();
                        window_target.exit();
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                if clock.poll(Instant::now()) {
                    if let Some(source) = source.as_deref_mut() {
                        self.pump(source, &mut source_open);
                    }
                    window_clone.request_redraw();
                }
                match clock.next_deadline() {
                    Some(deadline) => window_target.set_control_flow(ControlFlow::WaitUntil(deadline)),
                    None => window_target.exit(),
                }
            }
            _ => {}
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::Rotation;
    use crate::text::testing::BlockFace;

    fn needle_rotation(scene: &Scene) -> f64 {
        scene
            .commands()
            .iter()
            .find_map(|c| match c {
                DrawCommand::Rect {
                    corner_radius,
                    rotation: Rotation { degrees, .. },
                    ..
                } if *corner_radius > 0.0 => Some(*degrees),
                _ => None,
            })
            .expect("needle drawn")
    }

    /// Gear label x, highlighted letter x and the highlighted letter
    fn transmission(scene: &Scene, highlight: Color) -> (f64, f64, String) {
        let mut label_x = None;
        let mut lit = None;
        for c in scene.commands() {
            if let DrawCommand::Text { x, text, color, .. } = c {
                if text == config::TRANSMISSION_LABEL {
                    label_x = Some(*x);
                } else if *color == highlight {
                    lit = Some((*x, text.clone()));
                }
            }
        }
        let (x, text) = lit.expect("highlight drawn");
        (label_x.expect("label drawn"), x, text)
    }

    #[test]
    fn test_builder_defaults() {
        let config = SpeedometerConfig::builder().build();
        assert_eq!(config.title, "Speedometer Graphics");
        assert_eq!((config.window_width, config.window_height), (800, 600));
        assert!(config.font_path.is_none());
        assert!(config.bold_font_path.is_none());
        assert!(config.decorations);
        assert_eq!(config.palette, Palette::default());

        let custom = SpeedometerConfig::builder()
            .title("Dash")
            .font_path("/tmp/face.ttf")
            .maximized(true)
            .build();
        assert_eq!(custom.title, "Dash");
        assert_eq!(custom.font_path, Some(PathBuf::from("/tmp/face.ttf")));
        assert!(custom.maximized);
    }

    #[test]
    fn test_end_to_end_scenario() {
        let face = BlockFace;
        let mut speedometer = Speedometer::new(SpeedometerConfig::default());
        let highlight = speedometer.config().palette.highlight;
        let size = DialGeometry::compute(800, 600).transmission_font_size;

        let scene = speedometer.compose(800, 600, &face);
        assert_eq!(needle_rotation(&scene), -150.0);
        let (start, x, text) = transmission(&scene, highlight);
        assert_eq!(text, "P");
        assert_eq!(x, start);

        speedometer.set_speed(120);
        let scene = speedometer.compose(800, 600, &face);
        assert_eq!(needle_rotation(&scene), 150.0);

        assert_eq!(speedometer.apply_token("d"), Token::Transmission(Gear::Drive));
        let scene = speedometer.compose(800, 600, &face);
        let (start, x, text) = transmission(&scene, highlight);
        assert_eq!(text, "D");
        assert!((x - start - face.text_width("P  R  ", size, Weight::Bold)).abs() < 1e-9);
    }

    #[test]
    fn test_tokens_drive_state() {
        let mut speedometer = Speedometer::new(SpeedometerConfig::default());
        for raw in ["45", "r", "bogus", "pr", ""] {
            speedometer.apply_token(raw);
        }
        assert_eq!(speedometer.state().speed(), 45);
        assert_eq!(speedometer.state().gear(), Gear::Reverse);
        speedometer.apply_token("-12");
        assert_eq!(speedometer.state().speed(), speedometer.min_speed());
        speedometer.apply_token("9000");
        assert_eq!(speedometer.state().speed(), speedometer.max_speed());
    }

    #[test]
    fn test_pump_resets_speed_once_when_source_closes() {
        let mut speedometer = Speedometer::new(SpeedometerConfig::default());
        let (tx, mut rx) = std::sync::mpsc::channel::<String>();
        let mut open = true;

        tx.send("80".to_string()).unwrap();
        speedometer.pump(&mut rx, &mut open);
        assert!(open);
        assert_eq!(speedometer.state().speed(), 80);

        tx.send("d".to_string()).unwrap();
        drop(tx);
        speedometer.pump(&mut rx, &mut open);
        assert!(!open);
        assert_eq!(speedometer.state().speed(), 0);
        assert_eq!(speedometer.state().gear(), Gear::Drive);

        speedometer.set_speed(30);
        speedometer.pump(&mut rx, &mut open);
        assert_eq!(speedometer.state().speed(), 30);
        assert_eq!(speedometer.state().gear(), Gear::Drive);
    }

    #[test]
    fn test_pump_on_open_empty_source_keeps_state() {
        let mut speedometer = Speedometer::new(SpeedometerConfig::default());
        speedometer.set_speed(45);
        let mut queue = std::collections::VecDeque::<String>::new();
        let mut open = true;
        speedometer.pump(&mut queue, &mut open);
        assert!(open);
        assert_eq!(speedometer.state().speed(), 45);
    }

    #[test]
    fn test_render_entry_point_is_repeatable() {
        let (w, h) = (120u32, 90u32);
        let mut speedometer = Speedometer::new(SpeedometerConfig::default());
        speedometer.set_speed(37);
        speedometer.set_transmission(Gear::Drive);
        let mut a = vec![0u8; (w * h * 4) as usize];
        let mut b = vec![0u8; (w * h * 4) as usize];
        speedometer.render(&mut a, w, h, &BlockFace);
        speedometer.render(&mut b, w, h, &BlockFace);
        speedometer.render(&mut b, w, h, &BlockFace);
        assert_eq!(a, b);
        assert_eq!(speedometer.state().speed(), 37);
    }
}
