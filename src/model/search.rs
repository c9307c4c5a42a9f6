//! Pending search input and the confirm/dedup rule

/// Text typed into the search bar and the last query actually sent
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PendingQuery {
    current_input: String,
    last_confirmed: String,
}

impl PendingQuery {
    pub fn input(&self) -> &str {
        &self.current_input
    }

    pub fn last_confirmed(&self) -> &str {
        &self.last_confirmed
    }

    /// Replace the pending input. Called on every keystroke; never fires a search.
    pub fn submit(&mut self, text: impl Into<String>) {
        self.current_input = text.into();
    }

    pub fn push_char(&mut self, c: char) {
        let mut text = std::mem::take(&mut self.current_input);
        text.push(c);
        self.submit(text);
    }

    pub fn pop_char(&mut self) {
        let mut text = std::mem::take(&mut self.current_input);
        text.pop();
        self.submit(text);
    }

    /// Returns the query to send, or `None` if the input is blank or was already confirmed.
    pub fn confirm(&mut self) -> Option<String> {
        if self.current_input.trim().is_empty() || self.current_input == self.last_confirmed {
            return None;
        }
        self.last_confirmed = self.current_input.clone();
        Some(self.current_input.clone())
    }

    /// Back to a blank query, as on re-entering the search screen
    pub fn reset(&mut self) {
        self.current_input.clear();
        self.last_confirmed.clear();
    }
}
