//! hand_theremin - Terminal theremin played with (simulated) hands
//!
//! Run with: cargo run
//! Logs go to stderr: RUST_LOG=hand_theremin=debug cargo run 2> theremin.log

mod app;
mod input;
mod ui;

use std::time::Duration;

use app::App;
use hand_theremin::ThereminConfig;
use tracing_subscriber::EnvFilter;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    // The TUI owns stdout; logging stays off unless asked for
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = ThereminConfig::new()
        .pitch_range(200.0, 2000.0)
        .max_volume(0.4)
        .fade_out(Duration::from_millis(100));

    let mut terminal = ratatui::init();
    let result = App::new(config).run(&mut terminal);
    ratatui::restore();
    result
}
