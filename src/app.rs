use anyhow::Result;
use chrono::NaiveDate;

use crate::api::VoucherApi;
use crate::state::regenerate_flow::RegenerateFlow;
use crate::state::voucher_form::VoucherForm;
use crate::types::{AppState, FormField, InputMode};

pub struct App {
    pub state: AppState,
    pub input_mode: InputMode,
    pub api: Box<dyn VoucherApi>,
    pub form: VoucherForm,
    pub regenerate_flow: RegenerateFlow,
    pub seats: Vec<String>,
    pub error: Option<String>,
    pub loading: bool,
    pub backend_status: Option<String>,
    pub show_help: bool,
    pub should_quit: bool,
}

/// Renders a YYYY-MM-DD form date as DD-MM-YY for on-screen confirmation.
/// The value sent to the backend is always the raw form input.
pub fn format_date_for_display(date: &str) -> String {
    if date.is_empty() {
        return String::new();
    }

    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(parsed) => parsed.format("%d-%m-%y").to_string(),
        Err(_) => date.to_string(),
    }
}

impl App {
    pub fn new(api: Box<dyn VoucherApi>) -> Self {
        Self {
            state: AppState::Form,
            input_mode: InputMode::Normal,
            api,
            form: VoucherForm::new(),
            regenerate_flow: RegenerateFlow::new(),
            seats: Vec::new(),
            error: None,
            loading: false,
            backend_status: None,
            show_help: false,
            should_quit: false,
        }
    }

    /// One-shot backend probe at startup. A failing backend surfaces an
    /// error message but never blocks the form.
    pub async fn initialize(&mut self) -> Result<()> {
        match self.api.health_check().await {
            Ok(payload) => {
                self.backend_status = payload
                    .get("status")
                    .and_then(|s| s.as_str())
                    .map(str::to_string);
            }
            Err(e) => {
                self.error = Some(e.to_string());
            }
        }

        Ok(())
    }

    pub async fn submit(&mut self) -> Result<()> {
        if self.loading {
            return Ok(());
        }

        if !self.form.is_complete() {
            self.error = Some("Please fill in all required fields".to_string());
            return Ok(());
        }

        self.loading = true;
        self.error = None;
        self.seats.clear();
        self.regenerate_flow = RegenerateFlow::new();
        self.state = AppState::Loading;

        let request = self.form.to_request();

        match self
            .api
            .check_exists(&request.flight_number, &request.date)
            .await
        {
            Ok(check) if check.exists => {
                self.error = Some(
                    "Vouchers have already been generated for this flight date".to_string(),
                );
                self.loading = false;
                self.state = AppState::Form;
                return Ok(());
            }
            Ok(_) => {}
            Err(e) => {
                self.fail_submit(e);
                return Ok(());
            }
        }

        match self.api.generate(&request).await {
            Ok(response) if response.success => {
                self.seats = response.seats;
                self.loading = false;
                self.state = AppState::Results;
            }
            Ok(_) => {
                self.error = Some("Failed to generate vouchers".to_string());
                self.loading = false;
                self.state = AppState::Form;
            }
            Err(e) => self.fail_submit(e),
        }

        Ok(())
    }

    fn fail_submit(&mut self, err: anyhow::Error) {
        let message = err.to_string();
        self.error = Some(if message.is_empty() {
            "An error occurred while generating vouchers".to_string()
        } else {
            message
        });
        self.loading = false;
        self.state = AppState::Form;
    }

    pub fn enter_regenerate_mode(&mut self) {
        if self.state != AppState::Results {
            return;
        }

        self.regenerate_flow = RegenerateFlow::new();
        self.state = AppState::SelectingSeats;
    }

    pub fn toggle_seat_selection(&mut self, seat: &str) {
        if self.state != AppState::SelectingSeats {
            return;
        }

        self.regenerate_flow.toggle(seat);
    }

    pub fn toggle_selected_seat(&mut self) {
        if let Some(seat) = self.seats.get(self.regenerate_flow.cursor).cloned() {
            self.toggle_seat_selection(&seat);
        }
    }

    pub fn seat_cursor_up(&mut self) {
        if self.regenerate_flow.cursor > 0 {
            self.regenerate_flow.cursor -= 1;
        }
    }

    pub fn seat_cursor_down(&mut self) {
        if self.regenerate_flow.cursor < self.seats.len().saturating_sub(1) {
            self.regenerate_flow.cursor += 1;
        }
    }

    pub async fn regenerate(&mut self) -> Result<()> {
        if self.loading {
            return Ok(());
        }

        if self.regenerate_flow.selected_seats.is_empty() {
            self.error = Some("Please select at least one seat to regenerate".to_string());
            return Ok(());
        }

        self.loading = true;
        self.error = None;
        self.state = AppState::Regenerating;

        let request = self.form.to_request();

        match self
            .api
            .regenerate(&request, &self.regenerate_flow.selected_seats)
            .await
        {
            Ok(response) if response.success => {
                // The backend returns the complete updated list, not just
                // the regenerated subset.
                self.seats = response.seats;
                self.regenerate_flow = RegenerateFlow::new();
                self.loading = false;
                self.state = AppState::Results;
            }
            Ok(_) => {
                self.error = Some("Failed to regenerate vouchers".to_string());
                self.loading = false;
                self.state = AppState::SelectingSeats;
            }
            Err(e) => {
                self.error = Some(e.to_string());
                self.loading = false;
                self.state = AppState::SelectingSeats;
            }
        }

        Ok(())
    }

    pub fn cancel_regenerate(&mut self) {
        if self.state != AppState::SelectingSeats {
            return;
        }

        self.regenerate_flow = RegenerateFlow::new();
        self.state = AppState::Results;
    }

    /// Seats are only displayed in result states, so leaving the results
    /// screen drops them; the form fields stay for editing and resubmission.
    pub fn back_to_form(&mut self) {
        self.seats.clear();
        self.regenerate_flow = RegenerateFlow::new();
        self.state = AppState::Form;
    }

    pub fn reset(&mut self) {
        self.form = VoucherForm::new();
        self.seats.clear();
        self.error = None;
        self.regenerate_flow = RegenerateFlow::new();
        self.loading = false;
        self.input_mode = InputMode::Normal;
        self.state = AppState::Form;
    }

    pub fn start_editing(&mut self) {
        if self.state == AppState::Form && self.form.focused != FormField::Aircraft {
            self.input_mode = InputMode::Editing;
        }
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_display_format_is_dd_mm_yy() {
        assert_eq!(format_date_for_display("2024-05-01"), "01-05-24");
        assert_eq!(format_date_for_display("1999-12-31"), "31-12-99");
    }

    #[test]
    fn date_display_leaves_unparseable_input_alone() {
        assert_eq!(format_date_for_display(""), "");
        assert_eq!(format_date_for_display("05/01/2024"), "05/01/2024");
    }
}
