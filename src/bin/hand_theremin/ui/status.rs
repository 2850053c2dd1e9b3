//! Status bar widget - audio state, hand count, voices, output level

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use hand_theremin::dsp::gain::peak;

use super::View;

/// Render the status badges
pub fn render_status(frame: &mut Frame, area: Rect, view: &View) {
    let block = Block::default()
        .title(" hand_theremin ")
        .borders(Borders::ALL);

    let (audio_label, audio_color) = if view.audio_ready {
        ("● Audio ready", Color::Green)
    } else {
        ("○ No audio", Color::Yellow)
    };

    let rate = view
        .sample_rate
        .map(|sr| format!("{:.1}kHz  ", sr / 1000.0))
        .unwrap_or_default();

    let line = Line::from(vec![
        Span::styled(format!(" {audio_label}  "), Style::default().fg(audio_color)),
        Span::styled(
            format!("Hands: {}  ", view.hand_count),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("Voices: {} (+{} fading)  ", view.active_voices, view.fading_voices),
            Style::default().fg(Color::White),
        ),
        Span::styled(rate, Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("Peak: {:.2}  ", peak(view.audio_buffer)),
            Style::default().fg(Color::Magenta),
        ),
        Span::styled(view.status.to_string(), Style::default().fg(Color::DarkGray)),
    ]);

    let paragraph = Paragraph::new(line).block(block);
    frame.render_widget(paragraph, area);
}
