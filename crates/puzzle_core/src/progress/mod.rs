//! Player progress: the persisted record, its migrations, the engine that
//! mutates it and the statistics derived from it.

pub mod engine;
pub mod migration;
pub mod state;
pub mod stats;

pub use engine::{
    AdSettlement, HintReveal, ProgressEngine, Progression, SkipOutcome, SubmitOutcome, STATE_KEY,
};
pub use migration::migrate_state;
pub use state::{PendingReward, ProgressState, STATE_VERSION};
pub use stats::ProgressStats;
