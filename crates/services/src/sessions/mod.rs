mod plan;
mod progress;
mod service;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use plan::shuffle_in_place;
pub use progress::SessionProgress;
pub use service::GameSession;
pub use view::{AnswerFeedback, ResultView, SessionOutcome};
pub use workflow::{GameController, GamePhase, GameSnapshot, RoundTicket, RoundView};
