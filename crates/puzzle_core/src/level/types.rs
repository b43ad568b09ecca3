use crate::error::GameResult;
use crate::localization::{glossary, Locale, LocalizedText};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Puzzle family. The generator only produces the first four; `Detective`
/// and `Logic` label hand-authored content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PuzzleFamily {
    Math,
    Riddle,
    Word,
    Pattern,
    Detective,
    Logic,
}

impl PuzzleFamily {
    pub const GENERATED: [PuzzleFamily; 4] =
        [PuzzleFamily::Math, PuzzleFamily::Riddle, PuzzleFamily::Word, PuzzleFamily::Pattern];

    /// Round-robin family for a generated level, period 4 starting at level 1.
    pub fn for_level(level_number: u32) -> Self {
        Self::GENERATED[(level_number.saturating_sub(1) % 4) as usize]
    }

    pub fn key(self) -> &'static str {
        match self {
            PuzzleFamily::Math => "math",
            PuzzleFamily::Riddle => "riddle",
            PuzzleFamily::Word => "word",
            PuzzleFamily::Pattern => "pattern",
            PuzzleFamily::Detective => "detective",
            PuzzleFamily::Logic => "logic",
        }
    }

    /// Seconds of estimated solve time per difficulty tier.
    pub fn seconds_per_tier(self) -> u32 {
        match self {
            PuzzleFamily::Math => 30,
            PuzzleFamily::Riddle => 40,
            PuzzleFamily::Word => 45,
            PuzzleFamily::Pattern => 50,
            PuzzleFamily::Detective | PuzzleFamily::Logic => 60,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            PuzzleFamily::Math => "🔢",
            PuzzleFamily::Riddle => "🧩",
            PuzzleFamily::Word => "📝",
            PuzzleFamily::Pattern => "🔀",
            PuzzleFamily::Detective => "🔍",
            PuzzleFamily::Logic => "🧠",
        }
    }
}

impl fmt::Display for PuzzleFamily {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A multiple-choice option: the English/numeral value used for correctness
/// plus its Arabic display form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub en: String,
    pub ar: String,
}

impl AnswerOption {
    pub fn from_english(en: impl Into<String>) -> Self {
        let en = en.into();
        let ar = glossary::to_arabic_one(&en);
        Self { en, ar }
    }

    pub fn display(&self, locale: Locale) -> &str {
        match locale {
            Locale::En => &self.en,
            Locale::Ar => &self.ar,
        }
    }

    pub fn canonical(&self) -> String {
        normalize_answer(&self.en)
    }
}

/// Lowercase-trimmed comparison form.
pub fn normalize_answer(s: &str) -> String {
    s.trim().to_lowercase()
}

/// A fully formed level as served to the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleLevel {
    pub level_number: u32,
    pub title: LocalizedText,
    pub family: PuzzleFamily,
    pub question: LocalizedText,
    /// Single source of truth for correctness checks.
    pub canonical_answer: String,
    pub options: Vec<AnswerOption>,
    pub hint: Option<LocalizedText>,
    pub difficulty_tier: u8,
    pub reward: f64,
    pub estimated_time_seconds: u32,
    /// Letters shown for word puzzles (a permutation of the answer).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scrambled: Option<String>,
}

impl PuzzleLevel {
    pub fn question_text(&self) -> &str {
        &self.question.en
    }

    pub fn question_text_ar(&self) -> &str {
        &self.question.ar
    }

    /// English option list.
    pub fn options_en(&self) -> Vec<&str> {
        self.options.iter().map(|o| o.en.as_str()).collect()
    }

    /// Arabic option list, positionally aligned with [`Self::options_en`].
    pub fn options_ar(&self) -> Vec<&str> {
        self.options.iter().map(|o| o.ar.as_str()).collect()
    }

    pub fn options_for(&self, locale: Locale) -> Vec<&str> {
        self.options.iter().map(|o| o.display(locale)).collect()
    }

    pub fn has_answer_option(&self) -> bool {
        self.options.iter().any(|o| o.canonical() == self.canonical_answer)
    }

    pub fn is_correct(&self, answer: &str) -> bool {
        normalize_answer(answer) == self.canonical_answer
    }

    /// Map a player selection to its English value. An exact match against a
    /// displayed Arabic option is a direct lookup; anything else goes through
    /// the glossary.
    pub fn resolve_selection(&self, selected: &str) -> GameResult<String> {
        let trimmed = selected.trim();
        if let Some(option) = self.options.iter().find(|o| o.ar == trimmed) {
            return Ok(option.en.clone());
        }
        glossary::resolve_answer(trimmed, &self.options_en())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_level() -> PuzzleLevel {
        PuzzleLevel {
            level_number: 2,
            title: LocalizedText::new("Riddle 2", "لغز 2"),
            family: PuzzleFamily::Riddle,
            question: LocalizedText::new("What has keys but no locks?", "ما الذي له مفاتيح لكن لا أقفال؟"),
            canonical_answer: "keyboard".to_string(),
            options: ["piano", "keyboard", "safe", "door"]
                .into_iter()
                .map(AnswerOption::from_english)
                .collect(),
            hint: None,
            difficulty_tier: 1,
            reward: 1.002,
            estimated_time_seconds: 40,
            scrambled: None,
        }
    }

    #[test]
    fn test_family_cycle() {
        assert_eq!(PuzzleFamily::for_level(1), PuzzleFamily::Math);
        assert_eq!(PuzzleFamily::for_level(2), PuzzleFamily::Riddle);
        assert_eq!(PuzzleFamily::for_level(3), PuzzleFamily::Word);
        assert_eq!(PuzzleFamily::for_level(4), PuzzleFamily::Pattern);
        assert_eq!(PuzzleFamily::for_level(5), PuzzleFamily::Math);
    }

    #[test]
    fn test_option_lists_are_aligned() {
        let level = sample_level();
        assert_eq!(level.options_en()[1], "keyboard");
        assert_eq!(level.options_ar()[1], "لوحة مفاتيح");
        assert!(level.has_answer_option());
    }

    #[test]
    fn test_resolve_selection_arabic_option() {
        let level = sample_level();
        assert_eq!(level.resolve_selection("لوحة مفاتيح").unwrap(), "keyboard");
        assert_eq!(level.resolve_selection(" Keyboard ").unwrap(), "keyboard");
        assert!(level.is_correct("KEYBOARD "));
    }

    #[test]
    fn test_family_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&PuzzleFamily::Detective).unwrap(), "\"detective\"");
    }
}
