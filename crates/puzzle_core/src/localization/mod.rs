//! Two-locale content: the English→Arabic answer glossary, the Fluent message
//! catalog used for every rendered string, and locale negotiation.

pub mod catalog;
pub mod glossary;
pub mod locale;

pub use catalog::MessageCatalog;
pub use glossary::{from_arabic, resolve_answer, to_arabic, to_arabic_one};
pub use locale::Locale;

use serde::{Deserialize, Serialize};

/// One piece of display text in both supported locales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub en: String,
    pub ar: String,
}

impl LocalizedText {
    pub fn new(en: impl Into<String>, ar: impl Into<String>) -> Self {
        Self { en: en.into(), ar: ar.into() }
    }

    pub fn get(&self, locale: Locale) -> &str {
        match locale {
            Locale::En => &self.en,
            Locale::Ar => &self.ar,
        }
    }
}
