//! Opaque player identity supplied by the host platform.

use crate::localization::Locale;
use serde::{Deserialize, Serialize};

const REFERRAL_PREFIX: &str = "BIT3K";
const GUEST_REFERRAL_ID: &str = "123";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerIdentity {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub locale_hint: Option<String>,
}

impl PlayerIdentity {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self { id: id.into(), display_name: display_name.into(), locale_hint: None }
    }

    pub fn with_locale_hint(mut self, hint: impl Into<String>) -> Self {
        self.locale_hint = Some(hint.into());
        self
    }

    pub fn locale(&self) -> Locale {
        Locale::negotiate(self.locale_hint.as_deref())
    }
}

/// Locale for an optional identity; guests get English.
pub fn locale_for(identity: Option<&PlayerIdentity>) -> Locale {
    identity.map_or(Locale::En, PlayerIdentity::locale)
}

/// `BIT3K{id}`, with a fixed id for guests.
pub fn referral_code(identity: Option<&PlayerIdentity>) -> String {
    let id = identity.map(|i| i.id.trim()).filter(|id| !id.is_empty()).unwrap_or(GUEST_REFERRAL_ID);
    format!("{REFERRAL_PREFIX}{id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_referral_codes() {
        let player = PlayerIdentity::new("98765", "Amina");
        assert_eq!(referral_code(Some(&player)), "BIT3K98765");
        assert_eq!(referral_code(None), "BIT3K123");
        assert_eq!(referral_code(Some(&PlayerIdentity::new(" ", "x"))), "BIT3K123");
    }

    #[test]
    fn test_locale_from_hint() {
        let player = PlayerIdentity::new("1", "Amina").with_locale_hint("ar-DZ");
        assert_eq!(player.locale(), Locale::Ar);
        assert_eq!(locale_for(None), Locale::En);
        assert_eq!(locale_for(Some(&PlayerIdentity::new("2", "Sam"))), Locale::En);
    }
}
