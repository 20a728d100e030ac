//! Error types shared by the game core, the speech layer and configuration loading.

use thiserror::Error;

/// Failures of the speech-recognition capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpeechError {
    #[error("speech recognition is not available on this host")]
    CapabilityUnavailable,
}

/// Rejected game transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("the game has already been started")]
    AlreadyStarted,

    #[error("player names can only be edited before the game starts")]
    NotIdle,

    #[error(transparent)]
    Speech(#[from] SpeechError),
}

impl GameError {
    /// Stable code sent to clients alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            GameError::AlreadyStarted => "ALREADY_STARTED",
            GameError::NotIdle => "NOT_IDLE",
            GameError::Speech(SpeechError::CapabilityUnavailable) => "SPEECH_UNAVAILABLE",
        }
    }
}

/// Problems with the prompt deck, detected once at load time.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read prompt file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed prompt file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("prompt deck is empty")]
    EmptyDeck,

    #[error("prompt #{index} has an empty answer")]
    EmptyAnswer { index: usize },

    #[error("answer '{answer}' appears more than once")]
    DuplicateAnswer { answer: String },
}

pub type GameResult<T> = Result<T, GameError>;
