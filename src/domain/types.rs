//! Shared domain enumerations aligned with the persisted JSON vocabulary.

use serde::{Deserialize, Serialize};

/// Supported interface languages. Hebrew is the primary language and the
/// default; it is also the only right-to-left one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    He,
    En,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Language::He => "he",
            Language::En => "en",
        }
    }

    /// Document text direction for this language.
    pub fn text_direction(self) -> &'static str {
        match self {
            Language::He => "rtl",
            Language::En => "ltr",
        }
    }

    pub fn is_rtl(self) -> bool {
        matches!(self, Language::He)
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::He
    }
}

impl TryFrom<&str> for Language {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "he" => Ok(Language::He),
            "en" => Ok(Language::En),
            _ => Err(()),
        }
    }
}

/// The four fixed gallery buckets. Uploads, labels, and manual ordering are
/// all scoped to one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GalleryCategory {
    Chalaka,
    Family,
    Newborn,
    Smash,
}

impl GalleryCategory {
    pub const ALL: [GalleryCategory; 4] = [
        GalleryCategory::Chalaka,
        GalleryCategory::Family,
        GalleryCategory::Newborn,
        GalleryCategory::Smash,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GalleryCategory::Chalaka => "chalaka",
            GalleryCategory::Family => "family",
            GalleryCategory::Newborn => "newborn",
            GalleryCategory::Smash => "smash",
        }
    }
}

impl TryFrom<&str> for GalleryCategory {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "chalaka" => Ok(GalleryCategory::Chalaka),
            "family" => Ok(GalleryCategory::Family),
            "newborn" => Ok(GalleryCategory::Newborn),
            "smash" => Ok(GalleryCategory::Smash),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailStatus {
    Success,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailKind {
    Contact,
    Test,
}

/// Roles recognised by the admin session store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Editor,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Editor => "editor",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_direction_flips_between_variants() {
        assert_eq!(Language::He.text_direction(), "rtl");
        assert_eq!(Language::En.text_direction(), "ltr");
        assert!(Language::He.is_rtl());
        assert!(!Language::En.is_rtl());
    }

    #[test]
    fn gallery_category_round_trips_through_str() {
        for category in GalleryCategory::ALL {
            assert_eq!(GalleryCategory::try_from(category.as_str()), Ok(category));
        }
        assert!(GalleryCategory::try_from("weddings").is_err());
    }

    #[test]
    fn enums_serialize_lowercase() {
        assert_eq!(
            serde_json::to_string(&GalleryCategory::Smash).unwrap(),
            "\"smash\""
        );
        assert_eq!(
            serde_json::to_string(&PostStatus::Published).unwrap(),
            "\"published\""
        );
        assert_eq!(serde_json::to_string(&EmailKind::Test).unwrap(), "\"test\"");
    }
}
