//! English→Arabic answer glossary and numeral transliteration.
//!
//! Lookups never fail: unknown tokens are mirrored unchanged. Several English
//! keys share one Arabic gloss (e.g. `clock`/`hour`), so reverse lookups
//! consider every matching key and prefer the one present in the option list.

use crate::error::{GameError, GameResult};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Ordered table; on reverse-lookup ties the earlier key wins.
pub const GLOSSARY_ENTRIES: &[(&str, &str)] = &[
    // Sounds and senses
    ("echo", "صدى"),
    ("shadow", "ظل"),
    ("wind", "ريح"),
    ("mirror", "مرآة"),
    ("sound", "صوت"),
    ("voice", "صوت"),
    ("light", "ضوء"),
    ("dark", "ظلام"),
    ("silence", "صمت"),
    ("music", "موسيقى"),
    ("noise", "ضجيج"),
    ("whisper", "همس"),
    ("rhythm", "إيقاع"),
    ("song", "أغنية"),
    ("sight", "بصر"),
    // House
    ("door", "باب"),
    ("key", "مفتاح"),
    ("lock", "قفل"),
    ("window", "نافذة"),
    ("house", "بيت"),
    ("room", "غرفة"),
    ("roof", "سقف"),
    ("chimney", "مدخنة"),
    ("lamp", "مصباح"),
    ("piano", "بيانو"),
    ("glove", "قفاز"),
    // Time
    ("clock", "ساعة"),
    ("time", "وقت"),
    ("hour", "ساعة"),
    ("minute", "دقيقة"),
    ("second", "ثانية"),
    ("night", "ليل"),
    // World
    ("map", "خريطة"),
    ("globe", "كرة أرضية"),
    ("world", "عالم"),
    ("earth", "أرض"),
    ("planet", "كوكب"),
    ("star", "نجمة"),
    ("moon", "قمر"),
    ("plant", "نبات"),
    // Bathroom
    ("towel", "منشفة"),
    ("cloth", "قماش"),
    ("sponge", "إسفنج"),
    ("paper", "ورق"),
    ("tissue", "مناديل"),
    // Objects
    ("keyboard", "لوحة مفاتيح"),
    ("safe", "خزنة"),
    ("car", "سيارة"),
    ("atlas", "أطلس"),
    ("book", "كتاب"),
    ("person", "شخص"),
    ("robot", "روبوت"),
    ("doll", "دمية"),
    ("egg", "بيضة"),
    ("nut", "جوزة"),
    ("shell", "صدفة"),
    ("footsteps", "خطوات"),
    ("photos", "صور"),
    ("breaths", "أنفاس"),
    ("coins", "عملات"),
    // Food
    ("apple", "تفاحة"),
    ("grape", "عنب"),
    ("lemon", "ليمون"),
    ("mango", "مانجو"),
    ("water", "ماء"),
    ("juice", "عصير"),
    ("milk", "حليب"),
    ("coffee", "قهوة"),
    ("bread", "خبز"),
    ("cake", "كعكة"),
    ("rice", "أرز"),
    ("beard", "لحية"),
    // Feelings
    ("happy", "سعيد"),
    ("sad", "حزين"),
    ("angry", "غاضب"),
    ("tired", "متعب"),
    // Language
    ("word", "كلمة"),
    ("text", "نص"),
    ("letter", "حرف"),
    ("sentence", "جملة"),
    ("phrase", "عبارة"),
    ("page", "صفحة"),
    ("read", "قرأ"),
    ("write", "كتب"),
    ("draw", "رسم"),
    ("paint", "رسم"),
    ("poison", "سم"),
    // Logic
    ("yes", "نعم"),
    ("no", "لا"),
    ("maybe", "ربما"),
    ("never", "أبداً"),
    // Game vocabulary
    ("answer", "إجابة"),
    ("solution", "حل"),
    ("result", "نتيجة"),
    ("choice", "خيار"),
    ("option", "خيار"),
    ("question", "سؤال"),
    ("puzzle", "لغز"),
    ("riddle", "لغز"),
    ("challenge", "تحدي"),
    ("game", "لعبة"),
];

static GLOSSARY: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut map = HashMap::with_capacity(GLOSSARY_ENTRIES.len());
    for (en, ar) in GLOSSARY_ENTRIES {
        map.entry(*en).or_insert(*ar);
    }
    map
});

const ARABIC_INDIC_DIGITS: [char; 10] = ['٠', '١', '٢', '٣', '٤', '٥', '٦', '٧', '٨', '٩'];

/// Arabic gloss for a canonical English token (case-insensitive).
pub fn gloss(english: &str) -> Option<&'static str> {
    GLOSSARY.get(english.trim().to_lowercase().as_str()).copied()
}

/// Western-digit numeral such as `12`, `-3` or `1.5`.
pub fn is_numeric_token(s: &str) -> bool {
    let s = s.trim();
    s.chars().any(|c| c.is_ascii_digit())
        && s.chars().all(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.'))
}

/// Numeral written with Arabic-Indic digits (`١٢`, `-٣`).
pub fn is_arabic_numeral_token(s: &str) -> bool {
    let s = s.trim();
    s.chars().any(|c| ARABIC_INDIC_DIGITS.contains(&c))
        && s.chars().all(|c| ARABIC_INDIC_DIGITS.contains(&c) || matches!(c, '-' | '+' | '.' | '٫'))
}

pub fn contains_arabic_script(s: &str) -> bool {
    s.chars().any(|c| ('\u{0600}'..='\u{06FF}').contains(&c))
}

pub fn to_arabic_numerals(s: &str) -> String {
    s.chars()
        .map(|c| match c.to_digit(10) {
            Some(d) if c.is_ascii_digit() => ARABIC_INDIC_DIGITS[d as usize],
            _ => c,
        })
        .collect()
}

pub fn to_western_numerals(s: &str) -> String {
    s.chars()
        .map(|c| match ARABIC_INDIC_DIGITS.iter().position(|d| *d == c) {
            Some(d) => char::from(b'0' + d as u8),
            None if c == '٫' => '.',
            None => c,
        })
        .collect()
}

/// Arabic rendering of a single option.
pub fn to_arabic_one(option: &str) -> String {
    if is_numeric_token(option) {
        return to_arabic_numerals(option);
    }
    gloss(option).map(str::to_string).unwrap_or_else(|| option.to_string())
}

/// Positionally aligned Arabic mirror of `options`.
pub fn to_arabic<S: AsRef<str>>(options: &[S]) -> Vec<String> {
    options.iter().map(|o| to_arabic_one(o.as_ref())).collect()
}

/// Map a displayed Arabic selection back to English, preferring the exact
/// spelling found in `original_options`. Permissive: returns the input
/// unchanged when nothing matches.
pub fn from_arabic<S: AsRef<str>>(selected: &str, original_options: &[S]) -> String {
    let trimmed = selected.trim();

    if is_arabic_numeral_token(trimmed) {
        return to_western_numerals(trimmed);
    }

    let keys: Vec<&str> =
        GLOSSARY_ENTRIES.iter().filter(|(_, ar)| *ar == trimmed).map(|(en, _)| *en).collect();

    if let Some(first) = keys.first() {
        for key in &keys {
            if let Some(option) = find_option(original_options, key) {
                return option.to_string();
            }
        }
        return first.to_string();
    }

    match find_option(original_options, trimmed) {
        Some(option) => option.to_string(),
        None => selected.to_string(),
    }
}

/// Like [`from_arabic`], but reports a selection that is still Arabic after
/// mapping as [`GameError::UnresolvedAnswerLocale`].
pub fn resolve_answer<S: AsRef<str>>(selected: &str, original_options: &[S]) -> GameResult<String> {
    let resolved = from_arabic(selected, original_options);
    if contains_arabic_script(&resolved) {
        return Err(GameError::UnresolvedAnswerLocale(selected.trim().to_string()));
    }
    Ok(resolved)
}

fn find_option<'a, S: AsRef<str>>(options: &'a [S], needle: &str) -> Option<&'a str> {
    let needle = needle.trim().to_lowercase();
    options.iter().map(|o| o.as_ref()).find(|o| o.trim().to_lowercase() == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_numbers_transliterate_digit_by_digit() {
        assert_eq!(to_arabic(&["12", "305", "-7"]), vec!["١٢", "٣٠٥", "-٧"]);
        assert_eq!(to_western_numerals("١٢"), "12");
    }

    #[test]
    fn test_known_words_get_gloss_unknown_pass_through() {
        assert_eq!(to_arabic(&["Echo", "towel", "zebra"]), vec!["صدى", "منشفة", "zebra"]);
    }

    #[test]
    fn test_from_arabic_prefers_original_spelling() {
        let options = ["Echo", "Shadow", "Wind", "Whisper"];
        assert_eq!(from_arabic("صدى", &options), "Echo");
        assert_eq!(from_arabic(" ظل ", &options), "Shadow");
    }

    #[test]
    fn test_from_arabic_shared_gloss_uses_option_list() {
        // clock and hour share a gloss; the option list disambiguates.
        assert_eq!(from_arabic("ساعة", &["hour", "minute"]), "hour");
        assert_eq!(from_arabic("ساعة", &["clock", "robot"]), "clock");
        assert_eq!(from_arabic("ساعة", &["robot"]), "clock");
    }

    #[test]
    fn test_from_arabic_falls_back_to_option_scan_then_input() {
        assert_eq!(from_arabic("ZEBRA", &["zebra", "lion"]), "zebra");
        assert_eq!(from_arabic("غير معروف", &["zebra"]), "غير معروف");
    }

    #[test]
    fn test_resolve_answer_flags_unmapped_arabic() {
        assert_eq!(resolve_answer("١٢", &["12"]), Ok("12".to_string()));
        assert!(matches!(
            resolve_answer("غير معروف", &["zebra"]),
            Err(GameError::UnresolvedAnswerLocale(_))
        ));
        assert_eq!(resolve_answer("99", &["12"]), Ok("99".to_string()));
    }

    #[test]
    fn test_numeric_token_detection() {
        assert!(is_numeric_token("42"));
        assert!(is_numeric_token(" -3 "));
        assert!(is_numeric_token("1.5"));
        assert!(!is_numeric_token(""));
        assert!(!is_numeric_token("inf"));
        assert!(!is_numeric_token("12a"));
        assert!(is_arabic_numeral_token("١٢"));
        assert!(!is_arabic_numeral_token("صدى"));
    }

    proptest! {
        #[test]
        fn prop_numeric_round_trip(n in 0u64..10_000_000) {
            let x = n.to_string();
            let ar = to_arabic(&[x.as_str()]);
            prop_assert_eq!(from_arabic(&ar[0], &[x.as_str()]), x);
        }

        #[test]
        fn prop_glossary_round_trip(idx in 0usize..GLOSSARY_ENTRIES.len()) {
            let (en, _) = GLOSSARY_ENTRIES[idx];
            let ar = to_arabic(&[en]);
            prop_assert_eq!(from_arabic(&ar[0], &[en]), en.to_string());
        }
    }
}
