use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GameError {
    #[error("Level {level} is outside 1..={max}")]
    InvalidLevelRange { level: u32, max: u32 },

    #[error("Insufficient balance: need {needed:.2}, have {available:.2}")]
    InsufficientBalance { needed: f64, available: f64 },

    #[error("No pending reward to settle")]
    NoPendingReward,

    #[error("Malformed persisted state: {0}")]
    MalformedPersistedState(String),

    #[error("Could not map selection back to a canonical answer: {0}")]
    UnresolvedAnswerLocale(String),

    #[error("All levels completed")]
    GameComplete,

    #[error("Level {level} has no hint")]
    NoHint { level: u32 },

    #[error("Could not build four distinct options: {0}")]
    OptionSynthesis(String),

    #[error("Invalid redemption: {0}")]
    InvalidRedemption(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Message catalog error: {0}")]
    Catalog(String),

    #[error("Remote mirror error: {0}")]
    Remote(String),
}

impl GameError {
    /// Stable machine-readable code for the JSON boundary.
    pub fn code(&self) -> &'static str {
        match self {
            GameError::InvalidLevelRange { .. } => "INVALID_LEVEL_RANGE",
            GameError::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            GameError::NoPendingReward => "NO_PENDING_REWARD",
            GameError::MalformedPersistedState(_) => "MALFORMED_PERSISTED_STATE",
            GameError::UnresolvedAnswerLocale(_) => "UNRESOLVED_ANSWER_LOCALE",
            GameError::GameComplete => "GAME_COMPLETE",
            GameError::NoHint { .. } => "NO_HINT",
            GameError::OptionSynthesis(_) => "OPTION_SYNTHESIS",
            GameError::InvalidRedemption(_) => "INVALID_REDEMPTION",
            GameError::InvalidConfig(_) => "INVALID_CONFIG",
            GameError::Storage(_) => "STORAGE",
            GameError::Catalog(_) => "CATALOG",
            GameError::Remote(_) => "REMOTE",
        }
    }

    pub fn is_recoverable(&self) -> bool {
        match self {
            GameError::InsufficientBalance { .. } => true,
            GameError::NoPendingReward => true,
            GameError::MalformedPersistedState(_) => true, // Falls back to defaults
            GameError::UnresolvedAnswerLocale(_) => true,
            GameError::NoHint { .. } => true,
            GameError::InvalidRedemption(_) => true,
            GameError::Storage(_) => true,
            GameError::Remote(_) => true,
            GameError::InvalidLevelRange { .. } => false,
            GameError::GameComplete => false,
            GameError::InvalidConfig(_) => false,
            GameError::OptionSynthesis(_) => false,
            GameError::Catalog(_) => false,
        }
    }
}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            GameError::MalformedPersistedState(err.to_string())
        } else {
            GameError::Storage(err.to_string())
        }
    }
}

impl From<std::io::Error> for GameError {
    fn from(err: std::io::Error) -> Self {
        GameError::Storage(err.to_string())
    }
}

pub type GameResult<T> = std::result::Result<T, GameError>;
