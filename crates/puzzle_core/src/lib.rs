//! # puzzle_core - Puzzle Levels and Reward-Gated Progress
//!
//! Core of a 3,200-level puzzle game for web and Telegram Mini-App hosts.
//!
//! ## Features
//! - Level generator over four puzzle families (math, riddle, word, pattern)
//!   with a hand-authored table for the first levels
//! - Four-option multiple choice with similarity filtering
//! - English/Arabic content rendered from one puzzle instance
//! - Progress ledger where rewards stay pending until an ad completes
//! - Locally cached leaderboard and point redemptions
//! - JSON API for host integration

pub mod api;
pub mod config;
pub mod error;
pub mod identity;
pub mod leaderboard;
pub mod level;
pub mod localization;
pub mod progress;
pub mod remote;
pub mod shop;
pub mod storage;

pub use api::{ApiError, ApiResponse, GameApi, LevelView};
pub use config::GameConfig;
pub use error::{GameError, GameResult};
pub use identity::{referral_code, PlayerIdentity};
pub use leaderboard::{Leaderboard, LeaderboardEntry};
pub use level::{AnswerOption, LevelGenerator, PuzzleFamily, PuzzleLevel};
pub use localization::{from_arabic, to_arabic, Locale, LocalizedText, MessageCatalog};
pub use progress::{
    AdSettlement, HintReveal, ProgressEngine, ProgressState, ProgressStats, Progression,
    SkipOutcome, SubmitOutcome,
};
pub use remote::{ChannelMirror, MirrorEvent, NoopMirror, RemoteMirror};
pub use shop::{OrderStatus, ShopItem, ShopOrder};
pub use storage::{FileStore, KeyValueStore, MemoryStore};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
