use crew_voucher_tui::api::MockVoucherApi;
use crew_voucher_tui::app::App;
use crew_voucher_tui::types::{Aircraft, AppState, FormField, InputMode};
use crew_voucher_tui::ui::{handle_edit_input, handle_normal_input};
use crossterm::event::{KeyCode, KeyModifiers};

fn create_test_app() -> App {
    let mock_api = MockVoucherApi::new();
    App::new(Box::new(mock_api))
}

#[tokio::test]
async fn test_handle_normal_input_toggle_help() {
    let mut app = create_test_app();
    assert!(!app.show_help);

    handle_normal_input(&mut app, KeyCode::Char('h'), KeyModifiers::NONE)
        .await
        .unwrap();
    assert!(app.show_help);

    handle_normal_input(&mut app, KeyCode::Char('h'), KeyModifiers::NONE)
        .await
        .unwrap();
    assert!(!app.show_help);
}

#[tokio::test]
async fn test_enter_starts_editing_on_text_field() {
    let mut app = create_test_app();
    assert_eq!(app.form.focused, FormField::CrewName);

    handle_normal_input(&mut app, KeyCode::Enter, KeyModifiers::NONE)
        .await
        .unwrap();
    assert_eq!(app.input_mode, InputMode::Editing);
}

#[tokio::test]
async fn test_enter_cycles_aircraft_instead_of_editing() {
    let mut app = create_test_app();
    app.form.focused = FormField::Aircraft;

    handle_normal_input(&mut app, KeyCode::Enter, KeyModifiers::NONE)
        .await
        .unwrap();
    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.form.aircraft, Aircraft::Airbus320);
}

#[tokio::test]
async fn test_handle_edit_input_char_and_backspace() {
    let mut app = create_test_app();
    app.start_editing();

    handle_edit_input(&mut app, KeyCode::Char('a')).await.unwrap();
    assert_eq!(app.form.crew_name, "a");

    handle_edit_input(&mut app, KeyCode::Char('b')).await.unwrap();
    assert_eq!(app.form.crew_name, "ab");

    handle_edit_input(&mut app, KeyCode::Backspace).await.unwrap();
    assert_eq!(app.form.crew_name, "a");

    handle_edit_input(&mut app, KeyCode::Backspace).await.unwrap();
    assert_eq!(app.form.crew_name, "");
}

#[tokio::test]
async fn test_handle_edit_input_enter_advances_focus() {
    let mut app = create_test_app();
    app.start_editing();

    handle_edit_input(&mut app, KeyCode::Char('J')).await.unwrap();
    handle_edit_input(&mut app, KeyCode::Enter).await.unwrap();

    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.form.focused, FormField::CrewId);
    assert_eq!(app.form.crew_name, "J");
}

#[tokio::test]
async fn test_handle_edit_input_escape_keeps_value() {
    let mut app = create_test_app();
    app.start_editing();

    handle_edit_input(&mut app, KeyCode::Char('x')).await.unwrap();
    handle_edit_input(&mut app, KeyCode::Esc).await.unwrap();

    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.form.focused, FormField::CrewName);
    assert_eq!(app.form.crew_name, "x");
}

#[tokio::test]
async fn test_date_field_accepts_only_digits_and_dashes() {
    let mut app = create_test_app();
    app.form.focused = FormField::Date;
    app.start_editing();

    for c in "2024-05-01".chars() {
        handle_edit_input(&mut app, KeyCode::Char(c)).await.unwrap();
    }
    handle_edit_input(&mut app, KeyCode::Char('x')).await.unwrap();

    assert_eq!(app.form.date, "2024-05-01");
}

#[tokio::test]
async fn test_tab_cycles_through_fields() {
    let mut app = create_test_app();
    assert_eq!(app.form.focused, FormField::CrewName);

    for expected in [
        FormField::CrewId,
        FormField::FlightNumber,
        FormField::Date,
        FormField::Aircraft,
        FormField::CrewName,
    ] {
        handle_normal_input(&mut app, KeyCode::Tab, KeyModifiers::NONE)
            .await
            .unwrap();
        assert_eq!(app.form.focused, expected);
    }
}

#[tokio::test]
async fn test_results_keys_enter_regenerate_and_reset() {
    let mut app = create_test_app();
    app.form.crew_name = "Jane Doe".to_string();
    app.seats = vec!["1A".to_string(), "1B".to_string()];
    app.state = AppState::Results;

    handle_normal_input(&mut app, KeyCode::Char('r'), KeyModifiers::NONE)
        .await
        .unwrap();
    assert_eq!(app.state, AppState::SelectingSeats);

    handle_normal_input(&mut app, KeyCode::Char('n'), KeyModifiers::NONE)
        .await
        .unwrap();
    assert_eq!(app.state, AppState::Form);
    assert!(app.seats.is_empty());
    assert!(app.form.crew_name.is_empty());
}

#[tokio::test]
async fn test_results_escape_returns_to_form_and_clears_seats() {
    let mut app = create_test_app();
    app.form.flight_number = "FL100".to_string();
    app.seats = vec!["1A".to_string()];
    app.state = AppState::Results;

    handle_normal_input(&mut app, KeyCode::Esc, KeyModifiers::NONE)
        .await
        .unwrap();

    assert_eq!(app.state, AppState::Form);
    assert!(app.seats.is_empty());
    assert_eq!(app.form.flight_number, "FL100");
}

#[tokio::test]
async fn test_seat_selection_navigation_keys() {
    let mut app = create_test_app();
    app.seats = vec!["1A".to_string(), "1B".to_string(), "1C".to_string()];
    app.state = AppState::Results;
    app.enter_regenerate_mode();

    handle_normal_input(&mut app, KeyCode::Down, KeyModifiers::NONE)
        .await
        .unwrap();
    assert_eq!(app.regenerate_flow.cursor, 1);

    handle_normal_input(&mut app, KeyCode::Char(' '), KeyModifiers::NONE)
        .await
        .unwrap();
    assert!(app.regenerate_flow.is_selected("1B"));

    handle_normal_input(&mut app, KeyCode::Up, KeyModifiers::NONE)
        .await
        .unwrap();
    assert_eq!(app.regenerate_flow.cursor, 0);
}
