use crate::search::Dropdown;
use crate::tui::app::{App, CheckoutRow, Screen, StatusKind};
use crate::tui::colors;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Screen tabs
            Constraint::Min(5),    // Body
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_tabs(frame, app, chunks[0]);

    match app.screen {
        Screen::Shop => draw_shop(frame, app, chunks[1]),
        Screen::Checkout => draw_checkout(frame, app, chunks[1]),
        Screen::Listing => draw_listing(frame, app, chunks[1]),
        Screen::Signup => draw_signup(frame, app, chunks[1]),
    }

    draw_status_bar(frame, app, chunks[2]);
}

fn draw_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let screens = [
        Screen::Shop,
        Screen::Checkout,
        Screen::Listing,
        Screen::Signup,
    ];

    let mut spans = Vec::new();
    for screen in screens {
        let style = if screen == app.screen {
            colors::highlight()
        } else {
            Style::default()
                .fg(Color::White)
                .bg(Color::Rgb(40, 40, 50))
        };
        spans.push(Span::styled(screen.title(), style));
    }

    let labels_width: usize = screens.iter().map(|s| s.title().len()).sum();
    let remaining = (area.width as usize).saturating_sub(labels_width);
    if remaining > 0 {
        spans.push(Span::styled(
            " ".repeat(remaining),
            Style::default().bg(Color::Rgb(40, 40, 50)),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_shop(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    // Search input
    let input = Paragraph::new(app.search_input.value.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors::ACCENT))
            .title(" Search products "),
    );
    frame.render_widget(input, chunks[0]);

    let cursor_x = chunks[0].x + 1 + app.search_input.cursor_column();
    frame.set_cursor_position(Position::new(cursor_x, chunks[0].y + 1));

    // Dropdown beneath the input
    let block = Block::default().borders(Borders::ALL).title(" Products ");
    let inner = block.inner(chunks[1]);
    frame.render_widget(block, chunks[1]);

    match app.search.dropdown() {
        Dropdown::Hidden => {
            let hint = Paragraph::new("Start typing to search the shop")
                .style(Style::default().fg(colors::MUTED));
            frame.render_widget(hint, inner);
        }
        Dropdown::Results(hits) => {
            for (i, hit) in hits.iter().enumerate() {
                if i as u16 >= inner.height {
                    break;
                }
                let row = Rect::new(inner.x, inner.y + i as u16, inner.width, 1);
                let style = if i == app.dropdown_cursor {
                    colors::highlight()
                } else {
                    Style::default()
                };
                let line = Line::from(vec![
                    Span::styled(format!(" {} ", hit.name), style),
                    Span::styled(hit.href.clone(), Style::default().fg(colors::MUTED)),
                ]);
                frame.render_widget(Paragraph::new(line).style(style), row);
            }
        }
        Dropdown::NoMatches { browse_all } => {
            let row = Rect::new(inner.x, inner.y, inner.width, 1);
            let line = Line::from(vec![
                Span::styled(" No matches — browse all products ", colors::highlight()),
                Span::styled(browse_all.clone(), Style::default().fg(colors::MUTED)),
            ]);
            frame.render_widget(Paragraph::new(line), row);
        }
    }
}

fn draw_checkout(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Checkout ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = app.checkout_rows();
    let visible = inner.height as usize;
    let offset = app
        .checkout_cursor
        .saturating_sub(visible.saturating_sub(1));

    for (i, row) in rows.iter().enumerate().skip(offset).take(visible) {
        let y = inner.y + (i - offset) as u16;
        let rect = Rect::new(inner.x, y, inner.width, 1);
        let selected = i == app.checkout_cursor;

        let line = match row {
            CheckoutRow::Field { key, label } => {
                let marker = if app.checkout_form.is_required(key) {
                    "*"
                } else {
                    " "
                };
                Line::from(vec![
                    Span::styled(format!(" {:<26}{} ", label, marker), colors::field_label()),
                    Span::raw(app.checkout_form.value(key).to_string()),
                ])
            }
            CheckoutRow::ShippingToggle => {
                let mark = if app.checkout_form.use_different_shipping_address {
                    "[x]"
                } else {
                    "[ ]"
                };
                Line::from(format!(
                    " {} Is shipping address different from billing address?",
                    mark
                ))
            }
            CheckoutRow::Submit => {
                let style = if app.checkout.is_busy() {
                    colors::busy_button()
                } else {
                    Style::default().fg(colors::OK).add_modifier(Modifier::BOLD)
                };
                Line::from(Span::styled(
                    format!(" [ {} ] ", app.checkout.button_label()),
                    style,
                ))
            }
        };

        let style = if selected {
            colors::highlight()
        } else {
            Style::default()
        };
        frame.render_widget(Paragraph::new(line).style(style), rect);
    }
}

fn draw_listing(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" List Gear ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut y = inner.y;
    let fields = [(0usize, &app.listing.brand), (1usize, &app.listing.category)];

    for (index, field) in fields {
        if y >= inner.y + inner.height {
            return;
        }

        let selected = app.listing_cursor == index;
        let style = if selected {
            colors::highlight()
        } else {
            Style::default()
        };
        let line = Line::from(vec![
            Span::styled(
                format!(" {:<10} ", field.kind().label()),
                colors::field_label(),
            ),
            Span::raw(field.value().to_string()),
        ]);
        frame.render_widget(
            Paragraph::new(line).style(style),
            Rect::new(inner.x, y, inner.width, 1),
        );
        y += 1;

        if field.warning_visible() && y < inner.y + inner.height {
            frame.render_widget(
                Paragraph::new(format!("   {}", field.kind().warning_text()))
                    .style(colors::warning_text()),
                Rect::new(inner.x, y, inner.width, 1),
            );
            y += 1;
        }

        if selected {
            for suggestion in field.suggestions().iter().take(5) {
                if y >= inner.y + inner.height {
                    return;
                }
                frame.render_widget(
                    Paragraph::new(format!("   {} (Tab to pick)", suggestion))
                        .style(Style::default().fg(colors::MUTED)),
                    Rect::new(inner.x, y, inner.width, 1),
                );
                y += 1;
            }
        }
    }

    if y + 1 < inner.y + inner.height {
        let selected = app.listing_cursor == 2;
        let style = if selected {
            colors::highlight()
        } else {
            Style::default().fg(colors::OK).add_modifier(Modifier::BOLD)
        };
        frame.render_widget(
            Paragraph::new(" [ Check listing ] ").style(style),
            Rect::new(inner.x, y + 1, inner.width, 1),
        );
    }
}

fn draw_signup(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Sign Up ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let total = app.signup_rows();
    for i in 0..total {
        if i as u16 >= inner.height {
            break;
        }
        let rect = Rect::new(inner.x, inner.y + i as u16, inner.width, 1);
        let selected = i == app.signup_cursor;

        let line = if let Some((key, label)) = app.signup_field_at(i) {
            let value = app.signup_value(key);
            let shown = if key.starts_with("password") {
                "\u{2022}".repeat(value.chars().count())
            } else {
                value.to_string()
            };
            Line::from(vec![
                Span::styled(format!(" {:<16} ", label), colors::field_label()),
                Span::raw(shown),
            ])
        } else {
            let style = if app.signup_guard.is_engaged() {
                colors::busy_button()
            } else {
                Style::default().fg(colors::OK).add_modifier(Modifier::BOLD)
            };
            Line::from(Span::styled(
                format!(" [ {} ] ", app.signup_guard.label()),
                style,
            ))
        };

        let style = if selected {
            colors::highlight()
        } else {
            Style::default()
        };
        frame.render_widget(Paragraph::new(line).style(style), rect);
    }
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status_style = match app.status_kind {
        StatusKind::Info => Style::default().fg(Color::White),
        StatusKind::Good => Style::default().fg(colors::OK),
        StatusKind::Warn => Style::default().fg(colors::WARNING),
        StatusKind::Bad => Style::default().fg(colors::ERROR),
    };

    let hints = " F2 Shop  F3 Checkout  F4 List  F5 Sign Up  Ctrl+Q Quit";
    let hint_width = hints.len() as u16;

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(hint_width)])
        .split(area);

    frame.render_widget(
        Paragraph::new(format!(" {}", app.status_message)).style(status_style),
        chunks[0],
    );
    frame.render_widget(
        Paragraph::new(hints).style(Style::default().fg(colors::MUTED)),
        chunks[1],
    );
}
