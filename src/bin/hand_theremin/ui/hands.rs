//! Per-hand panels: position, distance, pitch and volume

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use hand_theremin::HandReading;

const HAND_COLORS: [Color; 4] = [Color::Cyan, Color::Magenta, Color::Green, Color::Yellow];

/// Render one panel per reading, side by side
pub fn render_hands(frame: &mut Frame, area: Rect, readings: &[HandReading], max_volume: f32) {
    if readings.is_empty() {
        let empty = Paragraph::new("No hands detected. Press 1 or 2 to raise a hand.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().title(" Hands ").borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, readings.len() as u32); readings.len()])
        .split(area);

    for (reading, &column) in readings.iter().zip(columns.iter()) {
        render_hand(frame, column, reading, max_volume);
    }
}

fn render_hand(frame: &mut Frame, area: Rect, reading: &HandReading, max_volume: f32) {
    let color = HAND_COLORS[reading.hand_id.0 as usize % HAND_COLORS.len()];
    let block = Block::default()
        .title(format!(" {} ", reading.label()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Values
            Constraint::Length(1), // Pitch gauge
            Constraint::Length(1), // Volume gauge
            Constraint::Min(0),
        ])
        .split(inner);

    let values = vec![
        Line::from(vec![
            Span::styled(
                format!(" {}", reading.frequency_label()),
                Style::default().fg(color),
            ),
            Span::raw("   "),
            Span::styled(reading.volume_label(), Style::default().fg(Color::White)),
        ]),
        Line::from(Span::styled(
            format!(
                " x {}   distance {}",
                reading.position_label(),
                reading.distance_label()
            ),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(Paragraph::new(values), rows[0]);

    // Pitch rises toward the player's right, which is the mirrored x
    let pitch = Gauge::default()
        .gauge_style(Style::default().fg(color))
        .ratio(reading.mirrored_x().clamp(0.0, 1.0) as f64)
        .label("pitch");
    frame.render_widget(pitch, rows[1]);

    let volume = Gauge::default()
        .gauge_style(Style::default().fg(Color::White))
        .ratio(reading.volume_fraction(max_volume))
        .label("volume");
    frame.render_widget(volume, rows[2]);
}

/// Shown while stopped
pub fn render_start_screen(frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Hand Theremin",
            Style::default().fg(Color::Cyan),
        )),
        Line::from(""),
        Line::from(" Move a hand left and right to change pitch."),
        Line::from(" Bring it closer to play louder."),
        Line::from(""),
        Line::from(Span::styled(
            " Press Space to start",
            Style::default().fg(Color::Green),
        )),
    ];
    let paragraph =
        Paragraph::new(text).block(Block::default().title(" Hands ").borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}
