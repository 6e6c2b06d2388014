// Hand Pointer: steer the mouse with one hand in front of the webcam.
// • Mouse mode: the index fingertip moves the cursor; raise only the index finger
//   to left-click, only the middle finger to right-click.
// • Draw mode: the cursor follows the same way and the index finger paints strokes
//   into the preview window. C clears the drawing.
// • Q (or ESC) quits. RUST_LOG=debug shows FPS and click events.

mod analyzer;
mod app;
mod camera;
mod canvas;
mod config;
mod debounce;
mod detector;
mod draw;
mod engine;
mod error;
mod frame_slot;
mod geometry;
mod mode;
mod pointer;
mod session;
mod smoother;
mod stroke;
mod types;

use clap::Parser;
use config::{Args, Config};
use error::Error;
use log::error;

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::try_from(Args::parse())?;
    app::run(config).inspect_err(|e| error!("{e}"))
}
