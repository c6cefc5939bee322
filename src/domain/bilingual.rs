//! The two-variant string record used by every translatable field.

use serde::{Deserialize, Serialize};

use crate::domain::types::Language;

/// A record with exactly two string variants, one per supported language.
/// Both variants always exist; keeping them mutually consistent is the
/// caller's responsibility.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bilingual {
    pub he: String,
    pub en: String,
}

impl Bilingual {
    pub fn new(he: impl Into<String>, en: impl Into<String>) -> Self {
        Self {
            he: he.into(),
            en: en.into(),
        }
    }

    /// The variant for the given language.
    pub fn for_language(&self, language: Language) -> &str {
        match language {
            Language::He => &self.he,
            Language::En => &self.en,
        }
    }

    /// True when neither variant carries text.
    pub fn is_empty(&self) -> bool {
        self.he.trim().is_empty() && self.en.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_selects_the_requested_variant() {
        let field = Bilingual::new("בית", "Home");
        assert_eq!(field.for_language(Language::He), "בית");
        assert_eq!(field.for_language(Language::En), "Home");
    }

    #[test]
    fn empty_means_both_variants_blank() {
        assert!(Bilingual::new("", "  ").is_empty());
        assert!(!Bilingual::new("", "Home").is_empty());
    }

    #[test]
    fn serializes_with_language_tags_as_keys() {
        let field = Bilingual::new("גלריה", "Gallery");
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["he"], "גלריה");
        assert_eq!(json["en"], "Gallery");
    }
}
