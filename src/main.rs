use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use clap::Parser;
use speedometer::{Speedometer, SpeedometerConfig};

/// Tokens buffered between stdin and the dial; the reader blocks when full
const TOKEN_QUEUE_DEPTH: usize = 1024;

/// Animated speedometer driven by whitespace-separated tokens on stdin.
///
/// Integers set the speed in MPH, a single `P`, `R` or `D` selects the gear.
#[derive(Parser, Debug)]
#[command(name = "speedometer")]
#[command(about = "Speedometer dial fed from stdin", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "Speedometer Graphics")]
    title: String,

    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 600)]
    height: u32,

    #[arg(long)]
    maximized: bool,

    /// Hide the window title bar and borders
    #[arg(long)]
    undecorated: bool,

    /// TrueType font for the dial labels
    #[arg(short, long)]
    font: Option<PathBuf>,

    /// Bold TrueType font for the digits and gear letters
    #[arg(long, requires = "font")]
    bold_font: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = SpeedometerConfig::builder()
        .title(args.title)
        .window_width(args.width)
        .window_height(args.height)
        .maximized(args.maximized)
        .decorations(!args.undecorated)
        .maybe_font_path(args.font)
        .maybe_bold_font_path(args.bold_font)
        .build();

    // Dropping the sender at end of input closes the source and parks the needle.
    let (sender, receiver) = mpsc::sync_channel(TOKEN_QUEUE_DEPTH);
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    log::warn!("stdin read failed: {err}");
                    break;
                }
            };
            for token in line.split_whitespace() {
                if sender.send(token.to_string()).is_err() {
                    return;
                }
            }
        }
        log::debug!("stdin closed");
    });

    Speedometer::new(config)
        .show_with_tokens(receiver)
        .context("speedometer window failed")
}
