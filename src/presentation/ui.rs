use crate::application::{App, AppMode, BrewSnapshot, BATCH_MULTIPLIERS};
use crate::domain::BrewMode;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

pub fn render_ui(f: &mut Frame, app: &App) {
    let snapshot = app.snapshot();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, &snapshot, chunks[0]);
    render_clock(f, &snapshot, chunks[1]);
    render_steps(f, &snapshot, chunks[2]);
    render_status_bar(f, app, &snapshot, chunks[3]);

    if matches!(app.mode, AppMode::Help) {
        render_help_popup(f, app.help_scroll);
    }
    if matches!(app.mode, AppMode::WaterInput) {
        render_water_popup(f, app);
    }
}

pub fn format_clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

pub fn format_grams(grams: f64) -> String {
    if grams.fract() == 0.0 {
        format!("{:.0}", grams)
    } else {
        format!("{:.1}", grams)
    }
}

pub fn multiplier_label(multiplier: f64) -> String {
    if multiplier == 0.5 {
        "1 cup".to_string()
    } else if multiplier == 1.0 {
        "2 cups".to_string()
    } else {
        format!("x{}", multiplier)
    }
}

fn mode_accent(mode: BrewMode) -> Color {
    match mode {
        BrewMode::Hot => Color::Blue,
        BrewMode::Iced => Color::Cyan,
    }
}

fn mode_badge_color(mode: BrewMode) -> Color {
    match mode {
        BrewMode::Hot => Color::Red,
        BrewMode::Iced => Color::Cyan,
    }
}

fn render_header(f: &mut Frame, snapshot: &BrewSnapshot, area: Rect) {
    let mut selectors: Vec<Span> = vec![Span::styled(
        "tbrew - V60 Recipe  ",
        Style::default().fg(Color::Cyan),
    )];
    for mode in BrewMode::all() {
        let style = if mode == snapshot.mode {
            Style::default()
                .fg(Color::Black)
                .bg(mode_badge_color(mode))
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        selectors.push(Span::styled(format!(" {} ", mode.label()), style));
        selectors.push(Span::raw(" "));
    }
    selectors.push(Span::raw("  "));
    for multiplier in BATCH_MULTIPLIERS {
        let style = if multiplier == snapshot.multiplier {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        selectors.push(Span::styled(format!(" {} ", multiplier_label(multiplier)), style));
        selectors.push(Span::raw(" "));
    }

    let mut quantities = format!(
        "{}g coffee • {}g water",
        format_grams(snapshot.coffee_g),
        format_grams(snapshot.water_g)
    );
    if snapshot.ice_g > 0.0 {
        quantities.push_str(&format!(" • {}g ice", format_grams(snapshot.ice_g)));
    }
    if snapshot.water_override_g.is_some() {
        quantities.push_str(" (water override)");
    }

    let header = Paragraph::new(vec![
        Line::from(selectors),
        Line::from(Span::styled(quantities, Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            format!("Grind: {}", snapshot.grind),
            Style::default().fg(Color::DarkGray),
        )),
    ]);
    f.render_widget(header, area);
}

fn render_clock(f: &mut Frame, snapshot: &BrewSnapshot, area: Rect) {
    let style = if snapshot.running {
        Style::default()
            .fg(mode_accent(snapshot.mode))
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let clock = Paragraph::new(format_clock(snapshot.elapsed_secs))
        .style(style)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP | Borders::BOTTOM));
    f.render_widget(clock, area);
}

fn render_steps(f: &mut Frame, snapshot: &BrewSnapshot, area: Rect) {
    let accent = mode_accent(snapshot.mode);

    let rows: Vec<Row> = snapshot
        .steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let is_done = i < snapshot.current_step_index;
            let is_current = i == snapshot.current_step_index;

            let marker_style = if is_current {
                Style::default().fg(accent)
            } else if is_done {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::DarkGray)
            };

            let row_style = if is_done {
                Style::default().fg(Color::DarkGray)
            } else if is_current {
                if snapshot.running && snapshot.blink_phase {
                    Style::default().bg(accent).fg(Color::White)
                } else {
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
                }
            } else {
                Style::default().fg(Color::Gray)
            };

            Row::new(vec![
                Cell::from("●").style(marker_style),
                Cell::from(format_clock(step.offset_secs)),
                Cell::from(step.instruction.clone()),
                Cell::from(format!("{}g", step.water_g)),
            ])
            .style(row_style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(2),
            Constraint::Length(6),
            Constraint::Min(16),
            Constraint::Length(6),
        ],
    )
    .block(Block::default().borders(Borders::NONE));
    f.render_widget(table, area);
}

fn render_status_bar(f: &mut Frame, app: &App, snapshot: &BrewSnapshot, area: Rect) {
    let text = if let Some(message) = &app.status_message {
        message.clone()
    } else if snapshot.running {
        "r: reset | q: quit".to_string()
    } else {
        "s: start | h/i: hot/iced | 1/2: cups | w: water | c: clear | ?: help | q: quit".to_string()
    };

    let status = Paragraph::new(text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(status, area);
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = centered_rect(60, 70, f.area());
    f.render_widget(Clear, area);

    let lines = vec![
        Line::from("Brew timer keys"),
        Line::from(""),
        Line::from("  s / Space   start the brew"),
        Line::from("  r           reset to idle"),
        Line::from("  h           hot recipe"),
        Line::from("  i           iced recipe"),
        Line::from("  1           half batch (1 cup)"),
        Line::from("  2           full batch (2 cups)"),
        Line::from("  w           set actual poured water (g)"),
        Line::from("  c           clear the water override"),
        Line::from("  q           quit"),
        Line::from(""),
        Line::from("Recipe changes are locked while a brew is running."),
        Line::from("The timer advances the highlighted step automatically"),
        Line::from("and resets itself shortly after the final step."),
        Line::from(""),
        Line::from("Esc closes this help."),
    ];

    let help = Paragraph::new(lines)
        .scroll((scroll as u16, 0))
        .block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(help, area);
}

fn render_water_popup(f: &mut Frame, app: &App) {
    let area = centered_rect(40, 20, f.area());
    let area = Rect {
        height: 3.min(area.height),
        ..area
    };
    f.render_widget(Clear, area);

    let input = Paragraph::new(app.input.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Poured water (g) - empty clears"),
    );
    f.render_widget(input, area);
    f.set_cursor_position((area.x + 1 + app.cursor_position as u16, area.y + 1));
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(9), "0:09");
        assert_eq!(format_clock(75), "1:15");
        assert_eq!(format_clock(210), "3:30");
        assert_eq!(format_clock(600), "10:00");
    }

    #[test]
    fn test_format_grams() {
        assert_eq!(format_grams(500.0), "500");
        assert_eq!(format_grams(15.0), "15");
        assert_eq!(format_grams(12.5), "12.5");
    }

    #[test]
    fn test_multiplier_label() {
        assert_eq!(multiplier_label(0.5), "1 cup");
        assert_eq!(multiplier_label(1.0), "2 cups");
        assert_eq!(multiplier_label(1.5), "x1.5");
    }
}
