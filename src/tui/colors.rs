use ratatui::style::{Color, Modifier, Style};

pub const ACCENT: Color = Color::Cyan;
pub const MUTED: Color = Color::DarkGray;
pub const WARNING: Color = Color::Yellow;
pub const ERROR: Color = Color::Red;
pub const OK: Color = Color::Green;

/// Style for the row the cursor is on
pub fn highlight() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(ACCENT)
        .add_modifier(Modifier::BOLD)
}

/// Style for a disabled (processing) submit button
pub fn busy_button() -> Style {
    Style::default().fg(MUTED).add_modifier(Modifier::DIM)
}

pub fn field_label() -> Style {
    Style::default().fg(Color::Gray)
}

pub fn warning_text() -> Style {
    Style::default().fg(WARNING).add_modifier(Modifier::BOLD)
}
