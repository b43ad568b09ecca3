//! Level generator: `level_number -> PuzzleLevel`.
//!
//! Generation is split in two stages. The puzzle *facts* (operands, pool
//! entry, hence the canonical answer) come from an RNG seeded only by the
//! level number. Decoys, option order and word scrambles come from a second
//! RNG seeded by the configured decoy seed, the level number and a call
//! counter, so they may differ between calls.

use super::embedded::{self, AuthoredLevel};
use super::options::{self, half_up};
use super::pools::{self, PatternEntry, RiddleEntry, WordEntry};
use super::types::{AnswerOption, PuzzleFamily, PuzzleLevel};
use crate::config::GameConfig;
use crate::error::{GameError, GameResult};
use crate::localization::glossary::to_arabic_numerals;
use crate::localization::{Locale, LocalizedText, MessageCatalog};
use fluent::FluentArgs;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::cell::Cell;

/// Scramble attempts before falling back to a rotation.
const MAX_SCRAMBLE_ATTEMPTS: usize = 16;

/// Operands for a math level. Both locale renderings are produced from the
/// same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathFacts {
    Add { a: i64, b: i64 },
    /// `a >= b`, so the answer is never negative.
    Sub { a: i64, b: i64 },
    Mul { a: i64, b: i64 },
    /// `coeff * x + constant = result`
    Equation { coeff: i64, constant: i64, x: i64 },
    /// `start, start*r, start*r^2, ?`
    Geometric { start: i64, ratio: i64 },
    /// `round_half_up(a * b / c)`
    Composite { a: i64, b: i64, c: i64 },
}

impl MathFacts {
    pub fn draw<R: Rng + ?Sized>(tier: u8, rng: &mut R) -> Self {
        match tier {
            0..=2 => {
                let a = rng.gen_range(1..=50);
                let b = rng.gen_range(1..=50);
                match rng.gen_range(0..3) {
                    0 => MathFacts::Add { a, b },
                    1 => MathFacts::Sub { a: a.max(b), b: a.min(b) },
                    _ => MathFacts::Mul { a, b },
                }
            }
            3 => MathFacts::Equation {
                x: rng.gen_range(1..=20),
                coeff: rng.gen_range(2..=11),
                constant: rng.gen_range(1..=50),
            },
            4 => MathFacts::Geometric { start: rng.gen_range(1..=10), ratio: rng.gen_range(2..=6) },
            _ => MathFacts::Composite {
                a: rng.gen_range(1..=100),
                b: rng.gen_range(1..=100),
                c: rng.gen_range(1..=50),
            },
        }
    }

    pub fn answer(&self) -> i64 {
        match *self {
            MathFacts::Add { a, b } => a + b,
            MathFacts::Sub { a, b } => a - b,
            MathFacts::Mul { a, b } => a * b,
            MathFacts::Equation { x, .. } => x,
            MathFacts::Geometric { start, ratio } => start * ratio.pow(3),
            MathFacts::Composite { a, b, c } => half_up(a * b, c),
        }
    }

    fn prompt_key(&self) -> &'static str {
        match self {
            MathFacts::Add { .. } => "math-add",
            MathFacts::Sub { .. } => "math-sub",
            MathFacts::Mul { .. } => "math-mul",
            MathFacts::Equation { .. } => "math-equation",
            MathFacts::Geometric { .. } => "math-sequence",
            MathFacts::Composite { .. } => "math-composite",
        }
    }

    fn hint_key(&self) -> &'static str {
        match self {
            MathFacts::Add { .. } | MathFacts::Sub { .. } | MathFacts::Mul { .. } => {
                "math-hint-arithmetic"
            }
            MathFacts::Equation { .. } => "math-hint-equation",
            MathFacts::Geometric { .. } => "math-hint-geometric",
            MathFacts::Composite { .. } => "math-hint-composite",
        }
    }

    fn args(&self, locale: Locale) -> FluentArgs<'static> {
        let mut args = FluentArgs::new();
        match *self {
            MathFacts::Add { a, b } | MathFacts::Sub { a, b } | MathFacts::Mul { a, b } => {
                args.set("a", numeral(locale, a));
                args.set("b", numeral(locale, b));
            }
            MathFacts::Equation { coeff, constant, x } => {
                args.set("coeff", numeral(locale, coeff));
                args.set("constant", numeral(locale, constant));
                args.set("result", numeral(locale, coeff * x + constant));
            }
            MathFacts::Geometric { start, ratio } => {
                let terms: Vec<i64> = (0..3).map(|k| start * ratio.pow(k)).collect();
                args.set("sequence", sequence(locale, &terms));
                args.set("ratio", numeral(locale, ratio));
            }
            MathFacts::Composite { a, b, c } => {
                args.set("a", numeral(locale, a));
                args.set("b", numeral(locale, b));
                args.set("c", numeral(locale, c));
            }
        }
        args
    }
}

/// The deterministic part of a generated level.
#[derive(Debug, Clone)]
enum PuzzleFacts {
    Math(MathFacts),
    Riddle(&'static RiddleEntry),
    Word(&'static WordEntry),
    Pattern(&'static PatternEntry),
}

impl PuzzleFacts {
    fn family(&self) -> PuzzleFamily {
        match self {
            PuzzleFacts::Math(_) => PuzzleFamily::Math,
            PuzzleFacts::Riddle(_) => PuzzleFamily::Riddle,
            PuzzleFacts::Word(_) => PuzzleFamily::Word,
            PuzzleFacts::Pattern(_) => PuzzleFamily::Pattern,
        }
    }

    fn answer(&self) -> String {
        match self {
            PuzzleFacts::Math(m) => m.answer().to_string(),
            PuzzleFacts::Riddle(r) => r.answer.to_string(),
            PuzzleFacts::Word(w) => w.word.to_string(),
            PuzzleFacts::Pattern(p) => p.next.to_string(),
        }
    }
}

pub struct LevelGenerator {
    config: GameConfig,
    catalog: MessageCatalog,
    calls: Cell<u64>,
}

impl LevelGenerator {
    pub fn new(config: GameConfig) -> GameResult<Self> {
        config.validate()?;
        Ok(Self { config, catalog: MessageCatalog::embedded()?, calls: Cell::new(0) })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn catalog(&self) -> &MessageCatalog {
        &self.catalog
    }

    pub fn max_level(&self) -> u32 {
        self.config.max_level
    }

    fn check_range(&self, level_number: u32) -> GameResult<()> {
        if level_number == 0 || level_number > self.config.max_level {
            return Err(GameError::InvalidLevelRange {
                level: level_number,
                max: self.config.max_level,
            });
        }
        Ok(())
    }

    /// Resolve a level for play: the hand-authored table first (when enabled),
    /// then the generator.
    pub fn level(&self, level_number: u32) -> GameResult<PuzzleLevel> {
        self.check_range(level_number)?;
        if self.config.use_embedded_levels {
            if let Some(authored) = embedded::authored_level(level_number) {
                return self.build_authored(authored);
            }
        }
        self.generate(level_number)
    }

    /// Generate a level purely from the round-robin families.
    pub fn generate(&self, level_number: u32) -> GameResult<PuzzleLevel> {
        self.check_range(level_number)?;

        let tier = self.config.tier_for(level_number);
        let facts = Self::facts_for(level_number, tier);
        let family = facts.family();
        let answer = facts.answer();
        let mut decoy_rng = self.decoy_rng(level_number);

        let (question, hint, scrambled) = match &facts {
            PuzzleFacts::Math(math) => {
                let question = self.render(math.prompt_key(), |l| math.args(l));
                let hint = self.render(math.hint_key(), |l| math.args(l));
                (question, hint, None)
            }
            PuzzleFacts::Riddle(riddle) => {
                let question = self.render(&format!("riddle-{}", riddle.key), |_| FluentArgs::new());
                let hint = self.render(&format!("riddle-{}-hint", riddle.key), |_| FluentArgs::new());
                (question, hint, None)
            }
            PuzzleFacts::Word(entry) => {
                let letters = scramble(entry.word, &mut decoy_rng);
                let question = self.render("word-unscramble", |_| {
                    let mut args = FluentArgs::new();
                    args.set("letters", letters.clone());
                    args
                });
                let hint = self.render(&format!("word-{}-hint", entry.word), |_| FluentArgs::new());
                (question, hint, Some(letters))
            }
            PuzzleFacts::Pattern(pattern) => {
                let terms: Vec<i64> = pattern.sequence.iter().map(|&n| n as i64).collect();
                let question = self.render("pattern-next", |l| {
                    let mut args = FluentArgs::new();
                    args.set("sequence", sequence(l, &terms));
                    args
                });
                let hint = self.render(&format!("pattern-{}-hint", pattern.key), |_| FluentArgs::new());
                (question, hint, None)
            }
        };

        let options = options::synthesize(&answer, family, &mut decoy_rng)?;

        tracing::debug!(level = level_number, %family, tier, "generated level");

        Ok(PuzzleLevel {
            level_number,
            title: self.title(family, level_number),
            family,
            question,
            canonical_answer: answer,
            options,
            hint: Some(hint),
            difficulty_tier: tier,
            reward: self.config.reward_for(level_number),
            estimated_time_seconds: tier as u32 * family.seconds_per_tier(),
            scrambled,
        })
    }

    /// Generate `count` consecutive levels starting at `start`, stopping at
    /// the last level.
    pub fn generate_range(&self, start: u32, count: u32) -> GameResult<Vec<PuzzleLevel>> {
        self.check_range(start)?;
        let end = start.saturating_add(count.saturating_sub(1)).min(self.config.max_level);
        (start..=end).map(|n| self.generate(n)).collect()
    }

    fn facts_for(level_number: u32, tier: u8) -> PuzzleFacts {
        match level_number.saturating_sub(1) % 4 {
            0 => {
                let mut fact_rng = ChaCha8Rng::seed_from_u64(level_number as u64);
                PuzzleFacts::Math(MathFacts::draw(tier, &mut fact_rng))
            }
            1 => PuzzleFacts::Riddle(pools::riddle_for(level_number)),
            2 => PuzzleFacts::Word(pools::word_for(level_number)),
            _ => PuzzleFacts::Pattern(pools::pattern_for(level_number)),
        }
    }

    fn decoy_rng(&self, level_number: u32) -> ChaCha8Rng {
        let call = self.calls.get();
        self.calls.set(call.wrapping_add(1));
        ChaCha8Rng::seed_from_u64(self.config.decoy_seed ^ ((level_number as u64) << 32) ^ call)
    }

    fn build_authored(&self, authored: &AuthoredLevel) -> GameResult<PuzzleLevel> {
        let level_number = authored.level_number;
        let tier = self.config.tier_for(level_number);
        let existing: Vec<AnswerOption> =
            authored.options.iter().map(|o| AnswerOption::from_english(o.as_str())).collect();
        let mut decoy_rng = self.decoy_rng(level_number);
        let options =
            options::ensure_options(&authored.answer, authored.family, existing, &mut decoy_rng)?;

        Ok(PuzzleLevel {
            level_number,
            title: self.title(authored.family, level_number),
            family: authored.family,
            question: authored.question.clone(),
            canonical_answer: authored.answer.trim().to_lowercase(),
            options,
            hint: authored.hint.clone(),
            difficulty_tier: tier,
            reward: self.config.reward_for(level_number),
            estimated_time_seconds: tier as u32 * authored.family.seconds_per_tier(),
            scrambled: authored.scrambled.clone(),
        })
    }

    fn title(&self, family: PuzzleFamily, level_number: u32) -> LocalizedText {
        self.render(&format!("title-{}", family.key()), |l| {
            let mut args = FluentArgs::new();
            args.set("level", numeral(l, level_number as i64));
            args
        })
    }

    /// Render one catalog message in both locales from the same arguments.
    fn render<F>(&self, key: &str, args: F) -> LocalizedText
    where
        F: Fn(Locale) -> FluentArgs<'static>,
    {
        let en = args(Locale::En);
        let ar = args(Locale::Ar);
        LocalizedText::new(
            self.catalog.format(Locale::En, key, Some(&en)),
            self.catalog.format(Locale::Ar, key, Some(&ar)),
        )
    }
}

fn numeral(locale: Locale, n: i64) -> String {
    match locale {
        Locale::En => n.to_string(),
        Locale::Ar => to_arabic_numerals(&n.to_string()),
    }
}

fn sequence(locale: Locale, terms: &[i64]) -> String {
    let separator = match locale {
        Locale::En => ", ",
        Locale::Ar => "، ",
    };
    terms.iter().map(|&n| numeral(locale, n)).collect::<Vec<_>>().join(separator)
}

/// Uppercase permutation of `word`'s letters that differs from the word
/// whenever the letters allow it.
pub fn scramble<R: Rng + ?Sized>(word: &str, rng: &mut R) -> String {
    let original: Vec<char> = word.to_uppercase().chars().collect();
    let mut letters = original.clone();

    for _ in 0..MAX_SCRAMBLE_ATTEMPTS {
        letters.shuffle(rng);
        if letters != original {
            return letters.into_iter().collect();
        }
    }

    letters.rotate_left(1);
    letters.into_iter().collect()
}
