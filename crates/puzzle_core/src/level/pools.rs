//! Curated content pools for the riddle, word and pattern families.
//!
//! Every pool has seven entries. Each family occupies every fourth level, and
//! seven is coprime with four, so `(level - 1) % 7` reaches every entry.

use super::types::PuzzleFamily;

pub const POOL_SIZE: usize = 7;

#[derive(Debug, Clone, Copy)]
pub struct RiddleEntry {
    /// Catalog id; the prompt is `riddle-{key}`, the hint `riddle-{key}-hint`.
    pub key: &'static str,
    pub answer: &'static str,
    pub decoys: [&'static str; 3],
}

#[derive(Debug, Clone, Copy)]
pub struct WordEntry {
    pub word: &'static str,
    pub decoys: [&'static str; 3],
}

#[derive(Debug, Clone, Copy)]
pub struct PatternEntry {
    pub key: &'static str,
    pub sequence: &'static [u64],
    /// Stored continuation. Served as-is, never recomputed.
    pub next: u64,
}

pub const RIDDLES: [RiddleEntry; POOL_SIZE] = [
    RiddleEntry { key: "echo", answer: "echo", decoys: ["shadow", "whisper", "wind"] },
    RiddleEntry { key: "keyboard", answer: "keyboard", decoys: ["piano", "safe", "door"] },
    RiddleEntry { key: "map", answer: "map", decoys: ["globe", "atlas", "book"] },
    RiddleEntry { key: "towel", answer: "towel", decoys: ["sponge", "tissue", "cloth"] },
    RiddleEntry { key: "clock", answer: "clock", decoys: ["robot", "doll", "glove"] },
    RiddleEntry { key: "egg", answer: "egg", decoys: ["nut", "shell", "window"] },
    RiddleEntry { key: "footsteps", answer: "footsteps", decoys: ["photos", "breaths", "coins"] },
];

pub const WORDS: [WordEntry; POOL_SIZE] = [
    WordEntry { word: "apple", decoys: ["grape", "lemon", "mango"] },
    WordEntry { word: "water", decoys: ["juice", "milk", "coffee"] },
    WordEntry { word: "music", decoys: ["noise", "rhythm", "song"] },
    WordEntry { word: "light", decoys: ["night", "lamp", "sight"] },
    WordEntry { word: "happy", decoys: ["sad", "angry", "tired"] },
    WordEntry { word: "bread", decoys: ["cake", "rice", "beard"] },
    WordEntry { word: "planet", decoys: ["star", "moon", "plant"] },
];

pub const PATTERNS: [PatternEntry; POOL_SIZE] = [
    PatternEntry { key: "doubling", sequence: &[2, 4, 8, 16], next: 32 },
    PatternEntry { key: "squares", sequence: &[1, 4, 9, 16], next: 25 },
    PatternEntry { key: "triangular", sequence: &[1, 3, 6, 10], next: 15 },
    PatternEntry { key: "fibonacci", sequence: &[1, 1, 2, 3, 5], next: 8 },
    PatternEntry { key: "cubes", sequence: &[1, 8, 27, 64], next: 125 },
    PatternEntry { key: "tripling", sequence: &[1, 3, 9, 27], next: 81 },
    PatternEntry { key: "primes", sequence: &[2, 3, 5, 7, 11], next: 13 },
];

pub fn pool_index(level_number: u32) -> usize {
    level_number.saturating_sub(1) as usize % POOL_SIZE
}

pub fn riddle_for(level_number: u32) -> &'static RiddleEntry {
    &RIDDLES[pool_index(level_number)]
}

pub fn word_for(level_number: u32) -> &'static WordEntry {
    &WORDS[pool_index(level_number)]
}

pub fn pattern_for(level_number: u32) -> &'static PatternEntry {
    &PATTERNS[pool_index(level_number)]
}

/// Curated decoys for a riddle or word answer.
pub fn curated_decoys(family: PuzzleFamily, answer: &str) -> Option<&'static [&'static str; 3]> {
    let answer = answer.trim().to_lowercase();
    match family {
        PuzzleFamily::Riddle => RIDDLES.iter().find(|r| r.answer == answer).map(|r| &r.decoys),
        PuzzleFamily::Word => WORDS.iter().find(|w| w.word == answer).map(|w| &w.decoys),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::localization::glossary;
    use std::collections::HashSet;

    #[test]
    fn test_every_pool_entry_is_reachable() {
        for family_offset in 0..4u32 {
            let reached: HashSet<usize> =
                (0..POOL_SIZE as u32).map(|k| pool_index(1 + family_offset + 4 * k)).collect();
            assert_eq!(reached.len(), POOL_SIZE);
        }
    }

    #[test]
    fn test_stored_pattern_continuations() {
        let squares = &PATTERNS[1];
        assert_eq!(squares.next, 25);
        let fib = &PATTERNS[3];
        let n = fib.sequence.len();
        assert_eq!(fib.next, fib.sequence[n - 1] + fib.sequence[n - 2]);
    }

    #[test]
    fn test_curated_entries_have_distinct_glosses() {
        for riddle in &RIDDLES {
            let mut words = vec![riddle.answer];
            words.extend(riddle.decoys);
            let ar: HashSet<String> = glossary::to_arabic(&words).into_iter().collect();
            assert_eq!(ar.len(), 4, "riddle {}", riddle.key);
        }
        for entry in &WORDS {
            let mut words = vec![entry.word];
            words.extend(entry.decoys);
            let ar: HashSet<String> = glossary::to_arabic(&words).into_iter().collect();
            assert_eq!(ar.len(), 4, "word {}", entry.word);
        }
    }

    #[test]
    fn test_curated_lookup() {
        assert_eq!(curated_decoys(PuzzleFamily::Riddle, "Echo"), Some(&["shadow", "whisper", "wind"]));
        assert!(curated_decoys(PuzzleFamily::Word, "echo").is_none());
        assert!(curated_decoys(PuzzleFamily::Math, "12").is_none());
    }
}
