//! Level content: types, curated pools, option synthesis, the procedural
//! generator and the hand-authored table.

pub mod embedded;
pub mod generator;
pub mod options;
pub mod pools;
pub mod types;

pub use generator::{LevelGenerator, MathFacts};
pub use options::{synthesize, OPTION_COUNT};
pub use types::{normalize_answer, AnswerOption, PuzzleFamily, PuzzleLevel};
