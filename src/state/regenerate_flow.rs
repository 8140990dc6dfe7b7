#[derive(Default)]
pub struct RegenerateFlow {
    pub selected_seats: Vec<String>,
    pub cursor: usize,
}

impl RegenerateFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, seat: &str) {
        if let Some(idx) = self.selected_seats.iter().position(|s| s == seat) {
            self.selected_seats.remove(idx);
        } else {
            self.selected_seats.push(seat.to_string());
        }
    }

    pub fn is_selected(&self, seat: &str) -> bool {
        self.selected_seats.iter().any(|s| s == seat)
    }
}
