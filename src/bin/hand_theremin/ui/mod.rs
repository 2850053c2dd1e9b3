//! TUI module for hand_theremin
//!
//! One panel per tracked hand, status badges, and a live view of the output.

mod hands;
mod spectrum;
mod status;
mod waveform;

use hand_theremin::HandReading;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

pub use spectrum::SpectrumAnalyzer;

use hands::{render_hands, render_start_screen};
use spectrum::render_spectrum;
use status::render_status;
use waveform::render_waveform;

/// Audio visualization buffer size (also the FFT size)
pub const VIS_BUFFER_SIZE: usize = 1024;

/// Everything a redraw needs, borrowed from the app
pub struct View<'a> {
    pub readings: &'a [HandReading],
    pub running: bool,
    pub audio_ready: bool,
    pub hand_count: usize,
    pub active_voices: usize,
    pub fading_voices: usize,
    pub max_volume: f32,
    pub status: &'a str,
    pub audio_buffer: &'a [f32],
    pub spectrum: Option<&'a [(f64, f64)]>,
    pub sample_rate: Option<f32>,
}

/// Render the UI
pub fn render(frame: &mut Frame, view: &View) {
    let area = frame.area();

    // Main layout: status, hands, scope, help
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Status badges
            Constraint::Min(9),     // Hand panels
            Constraint::Length(10), // Waveform + spectrum
            Constraint::Length(1),  // Help bar
        ])
        .split(area);

    render_status(frame, chunks[0], view);

    if view.running {
        render_hands(frame, chunks[1], view.readings, view.max_volume);
    } else {
        render_start_screen(frame, chunks[1]);
    }

    let scope = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);
    render_waveform(frame, scope[0], view.audio_buffer);
    render_spectrum(frame, scope[1], view.spectrum.unwrap_or(&[]));

    // Help bar
    let help = Paragraph::new(
        " [Space] Start  [S] Stop  [1/2] Show hand  [A/D W/X] Hand 1  [J/L I/M] Hand 2  [Q] Quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[3]);
}
