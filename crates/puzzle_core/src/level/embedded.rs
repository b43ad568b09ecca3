//! Hand-authored levels embedded at compile time.
//!
//! `data/levels.json` covers the lowest level numbers. Entries may leave out
//! `options`; the generator synthesizes them on demand.

use super::types::PuzzleFamily;
use crate::localization::LocalizedText;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub const LEVELS_JSON: &str = include_str!("../../data/levels.json");

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthoredLevel {
    pub level_number: u32,
    pub family: PuzzleFamily,
    pub question: LocalizedText,
    pub answer: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub hint: Option<LocalizedText>,
    #[serde(default)]
    pub scrambled: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthoredTable {
    pub version: u32,
    pub levels: Vec<AuthoredLevel>,
}

// ============================================================================
// Cached table (parsed once)
// ============================================================================

static AUTHORED: OnceLock<AuthoredTable> = OnceLock::new();

/// The embedded table. A corrupt resource is logged and treated as empty so
/// every level falls through to the generator.
pub fn authored_table() -> &'static AuthoredTable {
    AUTHORED.get_or_init(|| match serde_json::from_str(LEVELS_JSON) {
        Ok(table) => table,
        Err(e) => {
            tracing::error!(error = %e, "embedded level table is corrupted; ignoring it");
            AuthoredTable::default()
        }
    })
}

pub fn authored_level(level_number: u32) -> Option<&'static AuthoredLevel> {
    authored_table().levels.iter().find(|l| l.level_number == level_number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::types::normalize_answer;

    #[test]
    fn test_table_parses() {
        let table = authored_table();
        assert_eq!(table.version, 1);
        assert!(table.levels.len() >= 6);
    }

    #[test]
    fn test_level_one_is_seven_plus_five() {
        let level = authored_level(1).unwrap();
        assert_eq!(level.family, PuzzleFamily::Math);
        assert_eq!(level.question.en, "What is 7 + 5?");
        assert_eq!(level.answer, "12");
    }

    #[test]
    fn test_reserved_labels_are_used() {
        assert_eq!(authored_level(5).unwrap().family, PuzzleFamily::Detective);
        assert_eq!(authored_level(6).unwrap().family, PuzzleFamily::Logic);
    }

    #[test]
    fn test_authored_options_contain_answer() {
        for level in &authored_table().levels {
            if level.options.is_empty() {
                continue;
            }
            let answer = normalize_answer(&level.answer);
            assert!(level.options.iter().any(|o| normalize_answer(o) == answer));
        }
    }

    #[test]
    fn test_missing_level() {
        assert!(authored_level(9999).is_none());
    }
}
