use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use quiz_core::model::{Museum, PaintingRecord, SharedResult};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::progress::SessionProgress;
use super::service::GameSession;
use super::view::{AnswerFeedback, ResultView};
use crate::bridge::{self, HapticKind, HostBridge};
use crate::config::GameConfig;
use crate::error::{GameError, SessionError};
use crate::fetch::DocumentFetcher;
use crate::image::ImageResolver;
use crate::share::{ShareOutcome, ShareService};
use crate::source::ItemSourceResolver;

//
// ─── PHASES & SNAPSHOTS ────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    #[default]
    Loading,
    Playing,
    Finished,
    /// No data source yielded paintings; gameplay is disabled.
    Unavailable,
    /// Showing a friend's result decoded at startup. Terminal.
    ViewingSharedResult,
}

/// Identifies one round of one load. Async work tagged with a ticket is
/// discarded once the ticket no longer matches the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundTicket {
    generation: u64,
    index: usize,
}

impl RoundTicket {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }
}

/// The round on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundView {
    pub painting: PaintingRecord,
    /// Resolved image, `""` while resolving or when there is nothing to show.
    pub image_url: String,
    pub number: usize,
    pub total: usize,
}

/// Everything a front-end needs to render the current state.
///
/// Serializes to JSON for web front-ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub phase: GamePhase,
    pub generation: u64,
    pub round: Option<RoundView>,
    pub progress: Option<SessionProgress>,
    pub streak: u32,
    pub best_streak: u32,
    pub input_enabled: bool,
    pub result: Option<ResultView>,
}

#[derive(Debug, Default)]
struct GameState {
    phase: GamePhase,
    generation: u64,
    session: Option<GameSession>,
    shared: Option<SharedResult>,
    image: Option<(RoundTicket, String)>,
    input_enabled: bool,
}

impl GameState {
    fn ticket(&self) -> Option<RoundTicket> {
        let session = self.session.as_ref()?;
        (!session.is_finished()).then_some(RoundTicket {
            generation: self.generation,
            index: session.index(),
        })
    }

    fn is_current(&self, ticket: RoundTicket) -> bool {
        self.phase == GamePhase::Playing && self.ticket() == Some(ticket)
    }

    fn reset(&mut self, phase: GamePhase) -> u64 {
        self.generation += 1;
        self.phase = phase;
        self.session = None;
        self.shared = None;
        self.image = None;
        self.input_enabled = false;
        self.generation
    }
}

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

/// Drives a game from startup to results.
///
/// Cheap to clone; clones share state. The state lock is never held across an
/// `.await`, and every load bumps a generation so late results from a previous
/// load (image lookups, post-answer advances) are dropped.
#[derive(Clone)]
pub struct GameController {
    state: Arc<Mutex<GameState>>,
    source: ItemSourceResolver,
    images: ImageResolver,
    share: ShareService,
    bridge: Arc<dyn HostBridge>,
    feedback_delay: Duration,
    shuffle: bool,
}

impl GameController {
    #[must_use]
    pub fn new(
        config: &GameConfig,
        fetcher: Arc<dyn DocumentFetcher>,
        bridge: Arc<dyn HostBridge>,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(GameState::default())),
            source: ItemSourceResolver::new(
                Arc::clone(&fetcher),
                config.base_url.clone(),
                config.sources.clone(),
            ),
            images: ImageResolver::new(fetcher, config.proxy_prefix.clone())
                .with_timeout(config.image_timeout),
            share: ShareService::new(Arc::clone(&bridge), config.share_link.clone()),
            bridge,
            feedback_delay: config.feedback_delay,
            shuffle: true,
        }
    }

    /// Keep the source order instead of shuffling (deterministic decks, tests).
    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    #[must_use]
    pub fn with_share_service(mut self, share: ShareService) -> Self {
        self.share = share;
        self
    }

    fn lock(&self) -> MutexGuard<'_, GameState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.lock().phase
    }

    /// Ticket of the round on screen, if a round is being played.
    #[must_use]
    pub fn current_ticket(&self) -> Option<RoundTicket> {
        let state = self.lock();
        if state.phase == GamePhase::Playing {
            state.ticket()
        } else {
            None
        }
    }

    /// Start the game.
    ///
    /// A valid shared payload short-circuits to `ViewingSharedResult` and no
    /// data is loaded; a malformed one is ignored.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Source` when no data source is available. The
    /// controller is then in `GamePhase::Unavailable`.
    pub async fn start(&self, start_param: Option<&str>) -> Result<GamePhase, GameError> {
        bridge::initialize(self.bridge.as_ref());

        if let Some(raw) = start_param.filter(|raw| !raw.is_empty()) {
            match SharedResult::parse(raw) {
                Ok(shared) => {
                    let mut state = self.lock();
                    state.reset(GamePhase::ViewingSharedResult);
                    state.shared = Some(shared);
                    info!(payload = raw, "showing shared result");
                    return Ok(GamePhase::ViewingSharedResult);
                }
                Err(err) => debug!(%err, "ignoring shared payload"),
            }
        }

        self.load().await?;
        Ok(self.phase())
    }

    /// Reload and reshuffle. A shared-result view never turns into a game.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Source` when no data source is available.
    pub async fn restart(&self) -> Result<GamePhase, GameError> {
        if self.phase() == GamePhase::ViewingSharedResult {
            return Ok(GamePhase::ViewingSharedResult);
        }
        self.load().await?;
        Ok(self.phase())
    }

    async fn load(&self) -> Result<(), GameError> {
        let generation = self.lock().reset(GamePhase::Loading);
        let loaded = self.source.load_paintings().await;

        let ticket = {
            let mut state = self.lock();
            if state.generation != generation {
                debug!(generation, "discarding superseded load");
                return Ok(());
            }

            let session = loaded
                .map_err(GameError::from)
                .and_then(|items| self.build_session(items).map_err(GameError::from));
            match session {
                Ok(session) => {
                    info!(generation, rounds = session.total(), "session started");
                    state.session = Some(session);
                    state.phase = GamePhase::Playing;
                    state.ticket()
                }
                Err(err) => {
                    warn!(%err, "no paintings available, gameplay disabled");
                    state.phase = GamePhase::Unavailable;
                    return Err(err);
                }
            }
        };

        if let Some(ticket) = ticket {
            self.present_round(ticket).await;
        }
        Ok(())
    }

    fn build_session(&self, items: Vec<PaintingRecord>) -> Result<GameSession, SessionError> {
        if self.shuffle {
            GameSession::new(items)
        } else {
            GameSession::in_order(items)
        }
    }

    /// Resolve the image for `ticket`'s round, then enable input.
    ///
    /// Returns false when the round went stale before it could be presented.
    pub async fn present_round(&self, ticket: RoundTicket) -> bool {
        let Some(raw) = self.begin_round(ticket) else {
            return false;
        };
        let image_url = self.images.resolve(&raw).await;
        self.finish_round(ticket, image_url)
    }

    /// First half of [`GameController::present_round`]: lock input and hand
    /// out the raw image URL to resolve.
    #[must_use]
    pub fn begin_round(&self, ticket: RoundTicket) -> Option<String> {
        let mut guard = self.lock();
        let state = &mut *guard;
        if !state.is_current(ticket) {
            return None;
        }
        state.input_enabled = false;
        state.image = None;
        state
            .session
            .as_ref()
            .and_then(GameSession::current_item)
            .map(|painting| painting.image_url().to_owned())
    }

    /// Second half of [`GameController::present_round`]: install the resolved
    /// image unless the round is stale.
    pub fn finish_round(&self, ticket: RoundTicket, image_url: String) -> bool {
        let mut state = self.lock();
        if !state.is_current(ticket) {
            debug!(?ticket, "discarding stale image resolution");
            return false;
        }
        state.image = Some((ticket, image_url));
        state.input_enabled = true;
        true
    }

    /// Answer the current round, show feedback, wait out the feedback delay and
    /// move on.
    ///
    /// Returns `None` (and changes nothing) when no round is accepting answers.
    pub async fn answer(&self, choice: Museum) -> Option<AnswerFeedback> {
        let (ticket, feedback) = self.submit_answer(choice)?;
        self.emit_feedback(&feedback);
        tokio::time::sleep(self.feedback_delay).await;
        self.complete_answer(ticket).await;
        Some(feedback)
    }

    /// Score the current round and lock input until the matching
    /// [`GameController::complete_answer`].
    pub fn submit_answer(&self, choice: Museum) -> Option<(RoundTicket, AnswerFeedback)> {
        let mut guard = self.lock();
        let state = &mut *guard;
        if state.phase != GamePhase::Playing || !state.input_enabled {
            return None;
        }
        let ticket = state.ticket()?;
        let feedback = state.session.as_mut()?.answer(choice)?;
        state.input_enabled = false;
        Some((ticket, feedback))
    }

    /// Advance past the round answered under `ticket` and present the next one.
    ///
    /// Returns false when the ticket belongs to a previous load or was already
    /// applied.
    pub async fn complete_answer(&self, ticket: RoundTicket) -> bool {
        let next = {
            let mut guard = self.lock();
            let state = &mut *guard;
            if state.generation != ticket.generation {
                debug!(?ticket, "discarding advance from a previous session");
                return false;
            }
            let Some(session) = state.session.as_mut() else {
                return false;
            };
            if session.index() != ticket.index || !session.advance() {
                return false;
            }

            if let Some(outcome) = session.outcome() {
                info!(
                    correct = outcome.correct,
                    total = outcome.total,
                    best_streak = outcome.best_streak,
                    "session finished"
                );
                state.phase = GamePhase::Finished;
                state.image = None;
                state.input_enabled = false;
                None
            } else {
                state.ticket()
            }
        };

        if let Some(next) = next {
            self.present_round(next).await;
        }
        true
    }

    fn emit_feedback(&self, feedback: &AnswerFeedback) {
        let kind = if feedback.is_correct {
            HapticKind::Success
        } else {
            HapticKind::Error
        };
        bridge::haptic(self.bridge.as_ref(), kind);
        bridge::notify(
            self.bridge.as_ref(),
            feedback.popup_title(),
            &feedback.popup_message(),
        );
    }

    /// Share the finished session. `None` outside `GamePhase::Finished`.
    pub async fn share(&self) -> Option<ShareOutcome> {
        let outcome = {
            let state = self.lock();
            if state.phase != GamePhase::Finished {
                return None;
            }
            state.session.as_ref()?.outcome()?
        };
        Some(self.share.share(&outcome).await)
    }

    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        let state = self.lock();
        let session = state.session.as_ref();

        let round = match (state.phase, session) {
            (GamePhase::Playing, Some(session)) => session.current_item().map(|painting| {
                let image_url = state
                    .image
                    .as_ref()
                    .filter(|(ticket, _)| state.is_current(*ticket))
                    .map(|(_, url)| url.clone())
                    .unwrap_or_default();
                RoundView {
                    painting: painting.clone(),
                    image_url,
                    number: session.index() + 1,
                    total: session.total(),
                }
            }),
            _ => None,
        };

        let result = match state.phase {
            GamePhase::Finished => session.and_then(GameSession::outcome).map(ResultView::from),
            GamePhase::ViewingSharedResult => state.shared.map(ResultView::from),
            _ => None,
        };

        GameSnapshot {
            phase: state.phase,
            generation: state.generation,
            round,
            progress: session.map(GameSession::progress),
            streak: session.map_or(0, GameSession::streak),
            best_streak: session.map_or(0, GameSession::best_streak),
            input_enabled: state.input_enabled,
            result,
        }
    }
}
