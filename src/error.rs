use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while setting up or running the speedometer window
#[derive(Error, Debug)]
pub enum SpeedometerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not a usable font file: {}", .0.display())]
    InvalidFont(PathBuf),

    #[error("No usable system font found; pass a font path")]
    FontNotFound,

    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("Window creation failed: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("Surface error: {0}")]
    Surface(#[from] pixels::Error),
}
