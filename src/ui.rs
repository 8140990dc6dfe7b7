use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use std::time::{Duration, Instant};
use unicode_width::UnicodeWidthStr;

use crate::app::{format_date_for_display, App};
use crate::types::{Aircraft, AppState, FormField, InputMode};

// Clean color palette for better visibility and modern look
const BASE_FG: Color = Color::Rgb(216, 222, 233); // Main text
const BASE_BG: Color = Color::Rgb(46, 52, 64); // Background
const ACCENT_COLOR: Color = Color::Rgb(136, 192, 208); // Primary accent
const SUCCESS_COLOR: Color = Color::Rgb(163, 190, 140); // Success/green
const WARNING_COLOR: Color = Color::Rgb(235, 203, 139); // Warning/yellow
const HIGHLIGHT_BG: Color = Color::Rgb(59, 66, 82); // Selection background
const BORDER_COLOR: Color = Color::Rgb(76, 86, 106); // Inactive borders
const INPUT_TEXT: Color = Color::Rgb(235, 203, 139); // Input text while editing

pub async fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    app.initialize().await?;
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(250);

    loop {
        terminal.draw(|f| ui(f, &mut app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if crossterm::event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match app.input_mode {
                        InputMode::Normal => {
                            handle_normal_input(&mut app, key.code, key.modifiers).await?;
                        }
                        InputMode::Editing => {
                            handle_edit_input(&mut app, key.code).await?;
                        }
                    }
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

pub async fn handle_normal_input(
    app: &mut App,
    key: KeyCode,
    _modifiers: KeyModifiers,
) -> Result<()> {
    match key {
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Esc => {
            if app.error.is_some() {
                app.dismiss_error();
            } else if app.show_help {
                app.toggle_help();
            } else {
                match app.state {
                    AppState::SelectingSeats => app.cancel_regenerate(),
                    AppState::Results => app.back_to_form(),
                    _ => {}
                }
            }
        }
        KeyCode::Char('h') => app.toggle_help(),
        KeyCode::Up | KeyCode::BackTab => match app.state {
            AppState::Form => app.form.focus_prev(),
            AppState::SelectingSeats => app.seat_cursor_up(),
            _ => {}
        },
        KeyCode::Down | KeyCode::Tab => match app.state {
            AppState::Form => app.form.focus_next(),
            AppState::SelectingSeats => app.seat_cursor_down(),
            _ => {}
        },
        KeyCode::Left => {
            if app.state == AppState::Form && app.form.focused == FormField::Aircraft {
                app.form.aircraft = app.form.aircraft.prev();
            }
        }
        KeyCode::Right => {
            if app.state == AppState::Form && app.form.focused == FormField::Aircraft {
                app.form.aircraft = app.form.aircraft.next();
            }
        }
        KeyCode::Enter => match app.state {
            AppState::Form => {
                if app.form.focused == FormField::Aircraft {
                    app.form.aircraft = app.form.aircraft.next();
                } else {
                    app.start_editing();
                }
            }
            AppState::SelectingSeats => app.regenerate().await?,
            _ => {}
        },
        KeyCode::Char(' ') => {
            if app.state == AppState::SelectingSeats {
                app.toggle_selected_seat();
            }
        }
        KeyCode::Char('g') => {
            if app.state == AppState::Form {
                app.submit().await?;
            }
        }
        KeyCode::Char('r') => {
            if app.state == AppState::Results {
                app.enter_regenerate_mode();
            }
        }
        KeyCode::Char('n') => app.reset(),
        _ => {}
    }
    Ok(())
}

pub async fn handle_edit_input(app: &mut App, key: KeyCode) -> Result<()> {
    match key {
        KeyCode::Enter | KeyCode::Tab => {
            app.stop_editing();
            app.form.focus_next();
        }
        KeyCode::Esc => {
            app.stop_editing();
        }
        KeyCode::Char(c) => {
            app.form.push_char(c);
        }
        KeyCode::Backspace => {
            app.form.pop_char();
        }
        _ => {}
    }
    Ok(())
}

fn ui(f: &mut Frame, app: &mut App) {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, main_chunks[0], app);
    render_content(f, main_chunks[1], app);
    render_footer(f, main_chunks[2], app);

    if app.show_help {
        render_help_popup(f, app);
    }
    if app.error.is_some() {
        render_error_popup(f, app);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let title = " Crew Voucher Generator ";

    let subtitle = match app.state {
        AppState::Form => "Fill in flight and crew details",
        AppState::Loading => "Generating vouchers...",
        AppState::Results => "Vouchers generated successfully",
        AppState::SelectingSeats => "Select seats to regenerate",
        AppState::Regenerating => "Regenerating selected seats...",
    };

    let header_block = Block::default()
        .title(title)
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .style(Style::default().fg(BASE_FG).bg(BASE_BG));

    let header_content = Paragraph::new(subtitle)
        .style(Style::default().fg(ACCENT_COLOR))
        .alignment(Alignment::Center)
        .block(header_block);

    f.render_widget(header_content, area);
}

fn render_content(f: &mut Frame, area: Rect, app: &mut App) {
    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_form_section(f, main_chunks[0], app);
    render_results_section(f, main_chunks[1], app);
}

fn render_form_section(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Crew name
            Constraint::Length(3), // Crew ID
            Constraint::Length(3), // Flight number
            Constraint::Length(3), // Date
            Constraint::Length(3), // Aircraft
            Constraint::Length(2), // Date preview
            Constraint::Min(0),
        ])
        .split(area);

    for (i, field) in FormField::ORDER.iter().enumerate() {
        render_form_field(f, chunks[i], app, *field);
    }

    render_date_preview(f, chunks[FormField::ORDER.len()], app);
}

fn render_form_field(f: &mut Frame, area: Rect, app: &App, field: FormField) {
    let value = app.form.field_value(field);
    let focused = app.form.focused == field;
    let editing = focused && app.input_mode == InputMode::Editing;

    let style = if editing {
        Style::default().fg(INPUT_TEXT)
    } else if focused {
        Style::default().fg(ACCENT_COLOR)
    } else if field != FormField::Aircraft && !value.is_empty() {
        Style::default().fg(SUCCESS_COLOR)
    } else {
        Style::default().fg(BORDER_COLOR)
    };

    let content = if field == FormField::Aircraft {
        if focused {
            format!("< {} >", value)
        } else {
            value.to_string()
        }
    } else if value.is_empty() && focused && !editing {
        "Press Enter to type...".to_string()
    } else {
        value.to_string()
    };

    f.render_widget(
        Paragraph::new(content)
            .block(
                Block::default()
                    .title(format!("{} *", field.label()))
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .style(style),
            )
            .wrap(Wrap { trim: true }),
        area,
    );

    if editing {
        f.set_cursor_position((area.x + value.width() as u16 + 1, area.y + 1));
    }
}

fn render_date_preview(f: &mut Frame, area: Rect, app: &App) {
    let lines = if app.form.date.is_empty() {
        vec![Line::from(Span::styled(
            "Date format: YYYY-MM-DD",
            Style::default().fg(BORDER_COLOR),
        ))]
    } else {
        vec![Line::from(vec![
            Span::styled("Display format: ", Style::default().fg(BORDER_COLOR)),
            Span::styled(
                format_date_for_display(&app.form.date),
                Style::default().fg(WARNING_COLOR),
            ),
        ])]
    };

    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        area,
    );
}

fn render_results_section(f: &mut Frame, area: Rect, app: &mut App) {
    match app.state {
        AppState::Form | AppState::Loading => render_status_panel(f, area, app),
        AppState::Results => render_seat_list(f, area, app),
        AppState::SelectingSeats | AppState::Regenerating => {
            render_seat_selection(f, area, app);
        }
    }
}

fn render_status_panel(f: &mut Frame, area: Rect, app: &App) {
    let mut lines = vec![Line::from("")];

    if app.loading {
        lines.push(Line::from(Span::styled(
            "Generating vouchers...",
            Style::default()
                .fg(WARNING_COLOR)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
        lines.push(Line::from("Please wait..."));
    } else {
        lines.push(Line::from("Fill in all required fields,"));
        lines.push(Line::from("then press [g] to generate vouchers."));
    }

    if let Some(status) = &app.backend_status {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Backend: {}", status),
            Style::default().fg(SUCCESS_COLOR),
        )));
    }

    let style = if app.loading {
        Style::default().fg(WARNING_COLOR)
    } else {
        Style::default().fg(BORDER_COLOR)
    };

    f.render_widget(
        Paragraph::new(lines)
            .block(
                Block::default()
                    .title("Vouchers")
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .style(style),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_seat_list(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(4)])
        .split(area);

    let items: Vec<ListItem> = app
        .seats
        .iter()
        .enumerate()
        .map(|(i, seat)| {
            ListItem::new(format!(
                "  {}. Seat {}  -  Assigned to: {}",
                i + 1,
                seat,
                app.form.crew_id
            ))
            .style(Style::default().fg(BASE_FG))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title("Vouchers Generated")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .style(Style::default().fg(SUCCESS_COLOR)),
    );

    f.render_widget(list, chunks[0]);

    let summary = vec![
        Line::from(vec![
            Span::styled("Flight: ", Style::default().fg(ACCENT_COLOR)),
            Span::raw(app.form.flight_number.clone()),
            Span::styled("  Date: ", Style::default().fg(ACCENT_COLOR)),
            Span::raw(format_date_for_display(&app.form.date)),
        ]),
        Line::from(vec![
            Span::styled("Aircraft: ", Style::default().fg(ACCENT_COLOR)),
            Span::raw(app.form.aircraft.label()),
        ]),
    ];

    f.render_widget(
        Paragraph::new(summary)
            .block(
                Block::default()
                    .title("Flight")
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .style(Style::default().fg(BORDER_COLOR)),
            )
            .alignment(Alignment::Center),
        chunks[1],
    );
}

fn render_seat_selection(f: &mut Frame, area: Rect, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    let items: Vec<ListItem> = app
        .seats
        .iter()
        .enumerate()
        .map(|(i, seat)| {
            let marker = if app.regenerate_flow.is_selected(seat) {
                "[x]"
            } else {
                "[ ]"
            };
            let style = if i == app.regenerate_flow.cursor {
                Style::default()
                    .fg(ACCENT_COLOR)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(BASE_FG)
            };
            ListItem::new(format!("  {} Seat {}", marker, seat)).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title("Select Seats to Regenerate")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(ACCENT_COLOR)),
        )
        .highlight_style(
            Style::default()
                .bg(HIGHLIGHT_BG)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.regenerate_flow.cursor));

    f.render_stateful_widget(list, chunks[0], &mut state);

    let status = if app.loading {
        Span::styled(
            "Regenerating selected seats...",
            Style::default().fg(WARNING_COLOR),
        )
    } else {
        Span::styled(
            format!(
                "{} seat(s) selected",
                app.regenerate_flow.selected_seats.len()
            ),
            Style::default().fg(BASE_FG),
        )
    };

    f.render_widget(
        Paragraph::new(Line::from(status))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .style(Style::default().fg(BORDER_COLOR)),
            )
            .alignment(Alignment::Center),
        chunks[1],
    );
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let help_text = if app.input_mode == InputMode::Editing {
        " [Enter] Next Field | [Esc] Done Typing "
    } else {
        match app.state {
            AppState::Form => {
                " [Tab/Up/Down] Field | [Enter] Edit | [Left/Right] Aircraft | [g] Generate | [h] Help | [q] Quit "
            }
            AppState::Loading | AppState::Regenerating => " Please wait... ",
            AppState::Results => {
                " [r] Regenerate Seats | [n] New Voucher | [Esc] Edit Form | [h] Help | [q] Quit "
            }
            AppState::SelectingSeats => {
                " [Up/Down] Navigate | [Space] Toggle | [Enter] Regenerate | [Esc] Cancel | [q] Quit "
            }
        }
    };

    f.render_widget(
        Paragraph::new(help_text)
            .block(
                Block::default()
                    .title("Controls")
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .style(Style::default().fg(BORDER_COLOR)),
            )
            .alignment(Alignment::Center)
            .style(Style::default().fg(BASE_FG)),
        area,
    );
}

fn render_error_popup(f: &mut Frame, app: &App) {
    if let Some(error_msg) = &app.error {
        let popup_area = centered_rect(60, 25, f.area());
        f.render_widget(Clear, popup_area);

        let error_text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "ERROR",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(error_msg.as_str()),
            Line::from(""),
            Line::from(Span::styled(
                "Press Esc to dismiss",
                Style::default().fg(Color::Yellow),
            )),
        ];

        let block = Block::default()
            .title("Error")
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .style(Style::default().fg(Color::Red));

        let paragraph = Paragraph::new(error_text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        f.render_widget(paragraph, popup_area);
    }
}

fn render_help_popup(f: &mut Frame, _app: &App) {
    let popup_area = centered_rect(80, 70, f.area());
    f.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(Span::styled(
            "HELP - Crew Voucher Generator",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Form:",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from("  Tab/Up/Down   Move between fields"),
        Line::from("  Enter         Edit the focused field"),
        Line::from("  Left/Right    Change the aircraft type"),
        Line::from("  G             Generate vouchers"),
        Line::from(format!(
            "  Aircraft types: {}",
            Aircraft::ALL.map(|a| a.label()).join(", ")
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Results:",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from("  R             Pick seats to regenerate"),
        Line::from("  Space         Toggle a seat in the selection"),
        Line::from("  Enter         Regenerate the selected seats"),
        Line::from("  Esc           Cancel selection / edit the form"),
        Line::from("  N             Start a new voucher"),
        Line::from(""),
        Line::from(Span::styled(
            "General:",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from("  H             Toggle this help screen"),
        Line::from("  Q             Quit application"),
        Line::from(""),
        Line::from(Span::styled(
            "Press H or Esc to close this help",
            Style::default().fg(Color::Yellow),
        )),
    ];

    let help = Paragraph::new(help_text)
        .block(Block::default().borders(Borders::ALL).title("Help"))
        .wrap(Wrap { trim: true })
        .style(Style::default().bg(Color::Black));

    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockVoucherApi;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn create_test_app() -> App {
        let mock_api = MockVoucherApi::new();
        App::new(Box::new(mock_api))
    }

    #[tokio::test]
    async fn test_quit_key_sets_flag() {
        let mut app = create_test_app();
        assert!(!app.should_quit);

        handle_normal_input(&mut app, KeyCode::Char('q'), KeyModifiers::NONE)
            .await
            .unwrap();
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_arrows_cycle_aircraft_when_focused() {
        let mut app = create_test_app();
        app.form.focused = FormField::Aircraft;

        handle_normal_input(&mut app, KeyCode::Right, KeyModifiers::NONE)
            .await
            .unwrap();
        assert_eq!(app.form.aircraft, Aircraft::Airbus320);

        handle_normal_input(&mut app, KeyCode::Left, KeyModifiers::NONE)
            .await
            .unwrap();
        assert_eq!(app.form.aircraft, Aircraft::Atr);
    }

    #[tokio::test]
    async fn test_space_toggles_seat_in_selection_mode() {
        let mut app = create_test_app();
        app.seats = vec!["1A".to_string(), "1B".to_string()];
        app.state = AppState::SelectingSeats;

        handle_normal_input(&mut app, KeyCode::Char(' '), KeyModifiers::NONE)
            .await
            .unwrap();
        assert!(app.regenerate_flow.is_selected("1A"));

        handle_normal_input(&mut app, KeyCode::Char(' '), KeyModifiers::NONE)
            .await
            .unwrap();
        assert!(!app.regenerate_flow.is_selected("1A"));
    }

    #[tokio::test]
    async fn test_escape_dismisses_error_before_leaving_selection() {
        let mut app = create_test_app();
        app.seats = vec!["1A".to_string()];
        app.state = AppState::SelectingSeats;
        app.error = Some("boom".to_string());

        handle_normal_input(&mut app, KeyCode::Esc, KeyModifiers::NONE)
            .await
            .unwrap();
        assert!(app.error.is_none());
        assert_eq!(app.state, AppState::SelectingSeats);

        handle_normal_input(&mut app, KeyCode::Esc, KeyModifiers::NONE)
            .await
            .unwrap();
        assert_eq!(app.state, AppState::Results);
    }
}
