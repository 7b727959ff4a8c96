use serde::Serialize;

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

impl SessionProgress {
    /// One-based number of the round on screen, capped at `total`.
    #[must_use]
    pub fn round_number(&self) -> usize {
        (self.answered + 1).min(self.total)
    }
}
