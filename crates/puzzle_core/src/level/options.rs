//! Multiple-choice option synthesis.
//!
//! Always four options: the canonical answer plus three decoys, unique by
//! English value (case-insensitive) and by Arabic rendering, in uniformly
//! random order.

use super::pools;
use super::types::{normalize_answer, AnswerOption, PuzzleFamily};
use crate::error::{GameError, GameResult};
use rand::seq::SliceRandom;
use rand::Rng;

pub const OPTION_COUNT: usize = 4;
const DECOY_COUNT: usize = OPTION_COUNT - 1;

/// Length window for lexically derived decoys.
const MIN_DECOY_LEN: usize = 3;
const MAX_DECOY_LEN: usize = 15;

const GENERIC_WORDS: [&str; 8] =
    ["answer", "solution", "result", "choice", "question", "puzzle", "challenge", "game"];

const SUFFIXES: [&str; 4] = ["s", "er", "ing", "y"];

/// Build the shuffled option set for `answer`.
pub fn synthesize<R: Rng + ?Sized>(
    answer: &str,
    family: PuzzleFamily,
    rng: &mut R,
) -> GameResult<Vec<AnswerOption>> {
    let answer = normalize_answer(answer);
    if answer.is_empty() {
        return Err(GameError::OptionSynthesis("empty canonical answer".into()));
    }

    let candidates = match answer.parse::<i64>() {
        Ok(value) => numeric_decoys(value, rng),
        Err(_) => match pools::curated_decoys(family, &answer) {
            Some(curated) => curated.iter().map(|d| d.to_string()).collect(),
            None => lexical_decoys(&answer),
        },
    };

    let mut set = OptionSet::new(&answer);
    for candidate in candidates {
        if set.is_full() {
            break;
        }
        set.try_push(&candidate);
    }

    if !set.is_full() {
        return Err(GameError::OptionSynthesis(format!(
            "only {} distinct options for '{}'",
            set.options.len(),
            answer
        )));
    }

    let mut options = set.options;
    options.shuffle(rng);
    Ok(options)
}

/// Accepts candidates that are new both in English and in Arabic.
struct OptionSet {
    options: Vec<AnswerOption>,
}

impl OptionSet {
    fn new(answer: &str) -> Self {
        Self { options: vec![AnswerOption::from_english(answer)] }
    }

    fn is_full(&self) -> bool {
        self.options.len() >= OPTION_COUNT
    }

    fn try_push(&mut self, candidate: &str) -> bool {
        let option = AnswerOption::from_english(candidate.trim());
        let canonical = option.canonical();
        if canonical.is_empty() {
            return false;
        }
        if self.options.iter().any(|o| o.canonical() == canonical || o.ar == option.ar) {
            return false;
        }
        self.options.push(option);
        true
    }
}

fn numeric_decoys<R: Rng + ?Sized>(value: i64, rng: &mut R) -> Vec<String> {
    let mut candidates = vec![
        value + rng.gen_range(1..=5),
        value - rng.gen_range(1..=5),
        half_up(value * 3, 2),
        half_up(value, 2),
        value + 10,
        value - 10,
    ];
    candidates.shuffle(rng);

    let mut survivors: Vec<i64> = Vec::with_capacity(DECOY_COUNT);
    for candidate in candidates.into_iter().map(|c| c.max(0)) {
        if candidate != value && !survivors.contains(&candidate) {
            survivors.push(candidate);
        }
        if survivors.len() == DECOY_COUNT {
            break;
        }
    }

    let mut position = 1;
    while survivors.len() < DECOY_COUNT {
        let padded = value + 10 * position;
        if !survivors.contains(&padded) {
            survivors.push(padded);
        }
        position += 1;
    }

    survivors.into_iter().map(|n| n.to_string()).collect()
}

/// `round(n / d)` with halves rounded up, for `n >= 0`, `d > 0`.
pub(crate) fn half_up(numerator: i64, denominator: i64) -> i64 {
    (2 * numerator + denominator).div_euclid(2 * denominator)
}

fn lexical_decoys(answer: &str) -> Vec<String> {
    let chars: Vec<char> = answer.chars().collect();
    let mut variants = Vec::new();

    variants.push(chars.iter().rev().collect::<String>());
    if chars.len() > 2 {
        let stem: String = chars[..chars.len() - 1].iter().collect();
        let short: String = chars[..chars.len() - 2].iter().collect();
        for suffix in SUFFIXES {
            variants.push(format!("{stem}{suffix}"));
            variants.push(format!("{short}{suffix}"));
        }
    }

    variants
        .into_iter()
        .filter(|v| {
            let len = v.chars().count();
            (MIN_DECOY_LEN..=MAX_DECOY_LEN).contains(&len)
                && !v.contains(answer)
                && !answer.contains(v.as_str())
        })
        .chain(
            GENERIC_WORDS
                .iter()
                .map(|w| w.to_string())
                .filter(|w| !w.contains(answer) && !answer.contains(w.as_str())),
        )
        .collect()
}

/// Ensure a hand-authored level's options are usable, synthesizing them when
/// missing or malformed.
pub fn ensure_options<R: Rng + ?Sized>(
    answer: &str,
    family: PuzzleFamily,
    existing: Vec<AnswerOption>,
    rng: &mut R,
) -> GameResult<Vec<AnswerOption>> {
    let canonical = normalize_answer(answer);
    let valid = existing.len() == OPTION_COUNT
        && existing.iter().any(|o| o.canonical() == canonical)
        && existing.iter().enumerate().all(|(i, o)| {
            existing[..i].iter().all(|p| p.canonical() != o.canonical() && p.ar != o.ar)
        });

    if valid {
        let mut existing = existing;
        existing.shuffle(rng);
        return Ok(existing);
    }
    if !existing.is_empty() {
        tracing::debug!(answer = %canonical, "replacing malformed authored options");
    }
    synthesize(&canonical, family, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::localization::glossary;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    fn assert_well_formed(options: &[AnswerOption], answer: &str) {
        assert_eq!(options.len(), OPTION_COUNT);
        assert!(options.iter().any(|o| o.en == answer));
        let en: HashSet<_> = options.iter().map(|o| o.canonical()).collect();
        let ar: HashSet<_> = options.iter().map(|o| o.ar.clone()).collect();
        assert_eq!(en.len(), OPTION_COUNT);
        assert_eq!(ar.len(), OPTION_COUNT);
    }

    #[test]
    fn test_numeric_options() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let options = synthesize("12", PuzzleFamily::Math, &mut rng).unwrap();
        assert_well_formed(&options, "12");
        assert!(options.iter().all(|o| o.en.parse::<i64>().unwrap() >= 0));
        assert!(options.iter().all(|o| glossary::is_arabic_numeral_token(&o.ar)));
    }

    #[test]
    fn test_zero_answer_pads_with_offsets() {
        for seed in 0..32 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let options = synthesize("0", PuzzleFamily::Math, &mut rng).unwrap();
            assert_well_formed(&options, "0");
        }
    }

    #[test]
    fn test_riddle_uses_curated_decoys() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let options = synthesize("echo", PuzzleFamily::Riddle, &mut rng).unwrap();
        assert_well_formed(&options, "echo");
        let en: HashSet<_> = options.iter().map(|o| o.en.as_str()).collect();
        assert_eq!(en, HashSet::from(["echo", "shadow", "whisper", "wind"]));
    }

    #[test]
    fn test_lexical_fallback_rejects_overlap() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let options = synthesize("door", PuzzleFamily::Detective, &mut rng).unwrap();
        assert_well_formed(&options, "door");
        for option in options.iter().filter(|o| o.en != "door") {
            assert!(!option.en.contains("door"));
            assert!(!"door".contains(option.en.as_str()));
        }
    }

    #[test]
    fn test_short_answers_fall_back_to_generic_bank() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let options = synthesize("no", PuzzleFamily::Logic, &mut rng).unwrap();
        assert_well_formed(&options, "no");
    }

    #[test]
    fn test_generic_bank_skips_words_inside_the_answer() {
        let decoys = lexical_decoys("answers");
        assert!(!decoys.iter().any(|d| d == "answer"));
        assert!(decoys.iter().all(|d| !"answers".contains(d.as_str())));
    }

    #[test]
    fn test_half_up_rounding() {
        assert_eq!(half_up(5, 2), 3);
        assert_eq!(half_up(4, 2), 2);
        assert_eq!(half_up(7, 3), 2);
        assert_eq!(half_up(0, 9), 0);
    }

    #[test]
    fn test_ensure_options_keeps_valid_and_repairs_invalid() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let authored: Vec<_> =
            ["12", "10", "13", "21"].into_iter().map(AnswerOption::from_english).collect();
        let kept = ensure_options("12", PuzzleFamily::Math, authored.clone(), &mut rng).unwrap();
        let kept_set: HashSet<_> = kept.iter().map(|o| o.en.as_str()).collect();
        assert_eq!(kept_set, HashSet::from(["12", "10", "13", "21"]));

        let broken = vec![AnswerOption::from_english("10")];
        let repaired = ensure_options("12", PuzzleFamily::Math, broken, &mut rng).unwrap();
        assert_well_formed(&repaired, "12");
    }

    #[test]
    fn test_empty_answer_is_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(matches!(
            synthesize("  ", PuzzleFamily::Riddle, &mut rng),
            Err(GameError::OptionSynthesis(_))
        ));
    }
}
