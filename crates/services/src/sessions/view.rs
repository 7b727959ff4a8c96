use quiz_core::model::{Museum, PaintingRecord, SharedResult};
use serde::Serialize;

/// Final numbers of a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionOutcome {
    pub correct: u32,
    pub total: u32,
    pub accuracy_percent: u32,
    pub best_streak: u32,
}

/// Presentation-agnostic results screen.
///
/// `best_streak` is `None` for a friend's shared result, where it is unknown;
/// the UI should show a placeholder rather than zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResultView {
    pub correct: u32,
    pub total: u32,
    pub accuracy_percent: u32,
    pub best_streak: Option<u32>,
    pub is_shared: bool,
}

impl From<SessionOutcome> for ResultView {
    fn from(outcome: SessionOutcome) -> Self {
        Self {
            correct: outcome.correct,
            total: outcome.total,
            accuracy_percent: outcome.accuracy_percent,
            best_streak: Some(outcome.best_streak),
            is_shared: false,
        }
    }
}

impl From<SharedResult> for ResultView {
    fn from(shared: SharedResult) -> Self {
        Self {
            correct: shared.correct_count(),
            total: shared.total(),
            accuracy_percent: shared.accuracy_percent(),
            best_streak: None,
            is_shared: true,
        }
    }
}

/// Outcome of answering one round, used for transient feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub painting: PaintingRecord,
    pub choice: Museum,
    pub expected: Museum,
    pub is_correct: bool,
    pub streak: u32,
}

impl AnswerFeedback {
    #[must_use]
    pub fn popup_title(&self) -> &'static str {
        if self.is_correct {
            "Correct ✅"
        } else {
            "Wrong ❌"
        }
    }

    /// `title — museum`, or just the title when the museum is unknown.
    #[must_use]
    pub fn popup_message(&self) -> String {
        let museum = self.painting.museum();
        if museum.is_empty() {
            self.painting.title().to_owned()
        } else {
            format!("{} — {museum}", self.painting.title())
        }
    }
}
