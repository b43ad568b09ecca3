//! Fluent (FTL) message catalog.
//!
//! Prompts, hints, titles and feedback are rendered from embedded `en-US` and
//! `ar` resources so both locales always derive from the same arguments.

use super::locale::Locale;
use crate::error::{GameError, GameResult};
use fluent::{FluentArgs, FluentBundle, FluentResource};
use std::collections::HashMap;
use unic_langid::LanguageIdentifier;

pub const EN_FTL: &str = include_str!("../../locales/en-US.ftl");
pub const AR_FTL: &str = include_str!("../../locales/ar.ftl");

pub struct MessageCatalog {
    bundles: HashMap<Locale, FluentBundle<FluentResource>>,
    fallback_locale: Locale,
}

impl MessageCatalog {
    pub fn empty() -> Self {
        Self { bundles: HashMap::new(), fallback_locale: Locale::En }
    }

    /// Catalog with both embedded resources loaded.
    pub fn embedded() -> GameResult<Self> {
        let mut catalog = Self::empty();
        catalog.load_locale(Locale::En, EN_FTL)?;
        catalog.load_locale(Locale::Ar, AR_FTL)?;
        Ok(catalog)
    }

    pub fn load_locale(&mut self, locale: Locale, ftl_content: &str) -> GameResult<()> {
        let resource = FluentResource::try_new(ftl_content.to_string()).map_err(|(_, errors)| {
            GameError::Catalog(format!("Failed to parse {} FTL: {:?}", locale.tag(), errors))
        })?;

        let lang_id: LanguageIdentifier = locale
            .tag()
            .parse()
            .map_err(|_| GameError::Catalog(format!("Invalid locale: {}", locale.tag())))?;

        let mut bundle = FluentBundle::new(vec![lang_id]);
        // Plain text out: no FSI/PDI marks around placeables.
        bundle.set_use_isolating(false);
        bundle.add_resource(resource).map_err(|errors| {
            GameError::Catalog(format!("Failed to add {} resource: {:?}", locale.tag(), errors))
        })?;

        self.bundles.insert(locale, bundle);
        Ok(())
    }

    pub fn has_message(&self, locale: Locale, key: &str) -> bool {
        self.bundles.get(&locale).is_some_and(|b| b.has_message(key))
    }

    /// Render `key`, falling back to English and finally to `[key]`.
    pub fn format(&self, locale: Locale, key: &str, args: Option<&FluentArgs>) -> String {
        if let Some(text) = self.format_in(locale, key, args) {
            return text;
        }

        if locale != self.fallback_locale {
            if let Some(text) = self.format_in(self.fallback_locale, key, args) {
                return text;
            }
        }

        tracing::debug!(key, locale = %locale, "missing catalog message");
        format!("[{}]", key)
    }

    fn format_in(&self, locale: Locale, key: &str, args: Option<&FluentArgs>) -> Option<String> {
        let bundle = self.bundles.get(&locale)?;
        let pattern = bundle.get_message(key)?.value()?;

        let mut errors = vec![];
        let formatted = bundle.format_pattern(pattern, args, &mut errors);
        if !errors.is_empty() {
            tracing::debug!(key, ?errors, "catalog formatting errors");
        }
        Some(formatted.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_catalog_loads_both_locales() {
        let catalog = MessageCatalog::embedded().unwrap();
        assert!(catalog.has_message(Locale::En, "feedback-correct"));
        assert!(catalog.has_message(Locale::Ar, "feedback-correct"));
    }

    #[test]
    fn test_arguments_render_without_isolation_marks() {
        let catalog = MessageCatalog::embedded().unwrap();

        let mut args = FluentArgs::new();
        args.set("a", 7);
        args.set("b", 5);

        assert_eq!(
            catalog.format(Locale::En, "math-add", Some(&args)),
            "What is 7 + 5? (Answer with number only)"
        );
        let ar = catalog.format(Locale::Ar, "math-add", Some(&args));
        assert!(ar.contains("7 + 5"));
        assert!(!ar.contains('\u{2068}'));
    }

    #[test]
    fn test_every_english_key_has_arabic_counterpart() {
        let catalog = MessageCatalog::embedded().unwrap();

        let keys = EN_FTL
            .lines()
            .filter(|line| line.starts_with(|c: char| c.is_ascii_lowercase()))
            .filter_map(|line| line.split_once(" = ").map(|(key, _)| key.trim()));

        for key in keys {
            assert!(catalog.has_message(Locale::Ar, key), "missing ar message {}", key);
        }
    }

    #[test]
    fn test_missing_key_falls_back_to_marker() {
        let mut catalog = MessageCatalog::empty();
        catalog.load_locale(Locale::En, "only-en = Hello").unwrap();
        catalog.load_locale(Locale::Ar, "other = مرحبا").unwrap();

        assert_eq!(catalog.format(Locale::Ar, "only-en", None), "Hello");
        assert_eq!(catalog.format(Locale::Ar, "nope", None), "[nope]");
    }
}
