#![forbid(unsafe_code)]

pub mod bridge;
pub mod config;
pub mod error;
pub mod fetch;
pub mod image;
pub mod sessions;
pub mod share;
pub mod source;


pub use bridge::{HapticKind, HeadlessBridge, HostBridge};
pub use config::GameConfig;
pub use error::{BridgeError, ConfigError, FetchError, GameError, SessionError, SourceError};
pub use fetch::{DocumentFetcher, HttpFetcher, InMemoryFetcher};
pub use image::ImageResolver;
pub use share::{ShareMessage, ShareOutcome, ShareService, ShareStrategy};
pub use source::ItemSourceResolver;

pub use sessions::{
    AnswerFeedback, GameController, GamePhase, GameSession, GameSnapshot, ResultView,
    RoundTicket, RoundView, SessionOutcome,
};
