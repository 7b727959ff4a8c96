use std::fmt;

use quiz_core::model::{Museum, PaintingRecord, accuracy_percent};
use rand::Rng;

use super::plan::shuffle_in_place;
use super::progress::SessionProgress;
use super::view::{AnswerFeedback, SessionOutcome};
use crate::error::SessionError;

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One play-through over a fixed, shuffled list of paintings.
///
/// Answering is two-step: [`GameSession::answer`] scores the current round and
/// locks input, [`GameSession::advance`] moves to the next round. The gap
/// between them is where front-ends show feedback.
#[derive(Clone, PartialEq, Eq)]
pub struct GameSession {
    items: Vec<PaintingRecord>,
    index: usize,
    correct: u32,
    streak: u32,
    best_streak: u32,
    awaiting_advance: bool,
}

impl GameSession {
    /// Start a session over `items` in a uniformly random order.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if no items are provided.
    pub fn new(items: Vec<PaintingRecord>) -> Result<Self, SessionError> {
        Self::new_with_rng(items, &mut rand::rng())
    }

    /// Like [`GameSession::new`] with a caller-provided random source.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if no items are provided.
    pub fn new_with_rng<R: Rng + ?Sized>(
        mut items: Vec<PaintingRecord>,
        rng: &mut R,
    ) -> Result<Self, SessionError> {
        shuffle_in_place(&mut items, rng);
        Self::in_order(items)
    }

    /// Start a session that keeps the given order.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if no items are provided.
    pub fn in_order(items: Vec<PaintingRecord>) -> Result<Self, SessionError> {
        if items.is_empty() {
            return Err(SessionError::Empty);
        }

        Ok(Self {
            items,
            index: 0,
            correct: 0,
            streak: 0,
            best_streak: 0,
            awaiting_advance: false,
        })
    }

    #[must_use]
    pub fn items(&self) -> &[PaintingRecord] {
        &self.items
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn streak(&self) -> u32 {
        self.streak
    }

    #[must_use]
    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.index >= self.items.len()
    }

    /// True between an answer and the matching [`GameSession::advance`].
    #[must_use]
    pub fn is_awaiting_advance(&self) -> bool {
        self.awaiting_advance
    }

    #[must_use]
    pub fn current_item(&self) -> Option<&PaintingRecord> {
        self.items.get(self.index)
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.total(),
            answered: self.index,
            remaining: self.total().saturating_sub(self.index),
            is_complete: self.is_finished(),
        }
    }

    /// Score the current round against `choice`.
    ///
    /// Returns `None` without touching any state when the session is finished
    /// or a previous answer has not been advanced past yet.
    pub fn answer(&mut self, choice: Museum) -> Option<AnswerFeedback> {
        if self.awaiting_advance {
            return None;
        }
        let painting = self.current_item()?.clone();
        let expected = Museum::classify(painting.museum());
        let is_correct = choice == expected;

        if is_correct {
            self.correct += 1;
            self.streak += 1;
            self.best_streak = self.best_streak.max(self.streak);
        } else {
            self.streak = 0;
        }
        self.awaiting_advance = true;

        Some(AnswerFeedback {
            painting,
            choice,
            expected,
            is_correct,
            streak: self.streak,
        })
    }

    /// Move past an answered round. Returns false when nothing was pending.
    pub fn advance(&mut self) -> bool {
        if !self.awaiting_advance {
            return false;
        }
        self.awaiting_advance = false;
        self.index += 1;
        true
    }

    /// Final numbers, once every round has been answered.
    #[must_use]
    pub fn outcome(&self) -> Option<SessionOutcome> {
        if !self.is_finished() {
            return None;
        }
        let total = u32::try_from(self.total()).unwrap_or(u32::MAX);
        Some(SessionOutcome {
            correct: self.correct,
            total,
            accuracy_percent: accuracy_percent(self.correct, total),
            best_streak: self.best_streak,
        })
    }
}

impl fmt::Debug for GameSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameSession")
            .field("items_len", &self.items.len())
            .field("index", &self.index)
            .field("correct", &self.correct)
            .field("streak", &self.streak)
            .field("best_streak", &self.best_streak)
            .field("awaiting_advance", &self.awaiting_advance)
            .finish()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
