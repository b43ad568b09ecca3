use fluent_langneg::{negotiate_languages, NegotiationStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use unic_langid::LanguageIdentifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ar,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Ar];

    /// BCP-47 tag the catalog bundle is registered under.
    pub fn tag(self) -> &'static str {
        match self {
            Locale::En => "en-US",
            Locale::Ar => "ar",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ar => "ar",
        }
    }

    pub fn is_rtl(self) -> bool {
        matches!(self, Locale::Ar)
    }

    /// Pick a locale from a host language hint such as `"ar"`, `"ar-EG"` or
    /// `"en-GB"`. Anything unrecognised degrades to English.
    pub fn negotiate(hint: Option<&str>) -> Self {
        let Some(hint) = hint.map(str::trim).filter(|h| !h.is_empty()) else {
            return Locale::En;
        };

        let requested: Vec<LanguageIdentifier> =
            hint.replace('_', "-").parse().ok().into_iter().collect();
        let available: Vec<LanguageIdentifier> =
            Self::ALL.iter().filter_map(|l| l.tag().parse().ok()).collect();
        let default: Option<LanguageIdentifier> = Locale::En.tag().parse().ok();

        let negotiated = negotiate_languages(
            &requested,
            &available,
            default.as_ref(),
            NegotiationStrategy::Filtering,
        );

        match negotiated.first() {
            Some(lang) if lang.language.as_str() == "ar" => Locale::Ar,
            _ => Locale::En,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "en-us" => Ok(Locale::En),
            "ar" => Ok(Locale::Ar),
            other => Err(format!("Unsupported locale: {}", other)),
        }
    }
}
