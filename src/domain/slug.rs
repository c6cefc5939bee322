//! Slug derivation for bilingual blog posts.
//!
//! ASCII slugification comes from the `slug` crate (lowercase, non-word
//! characters stripped, whitespace collapsed to hyphens). Hebrew titles often
//! slugify to nothing, so the bilingual helper falls back to the other
//! language's slug before giving up.

use slug::slugify;
use thiserror::Error;

use crate::domain::bilingual::Bilingual;

/// Errors that can occur while deriving a slug.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("slug source text is empty")]
    EmptyInput,
    #[error("failed to derive slug from `{input}`")]
    Unrepresentable { input: String },
}

/// Derive a slug from the provided human-readable text.
pub fn derive_slug(input: &str) -> Result<String, SlugError> {
    if input.trim().is_empty() {
        return Err(SlugError::EmptyInput);
    }

    let candidate = slugify(input);
    if candidate.is_empty() {
        return Err(SlugError::Unrepresentable {
            input: input.to_string(),
        });
    }

    Ok(candidate)
}

/// Derive slugs for both languages of a title.
///
/// Each language slugifies its own title variant; a variant that cannot
/// produce a slug borrows the other language's result. Returns `None` when
/// neither variant is representable.
pub fn bilingual_slug(title: &Bilingual) -> Option<Bilingual> {
    let he = derive_slug(&title.he).ok();
    let en = derive_slug(&title.en).ok();

    match (he, en) {
        (Some(he), Some(en)) => Some(Bilingual { he, en }),
        (Some(he), None) => Some(Bilingual {
            en: he.clone(),
            he,
        }),
        (None, Some(en)) => Some(Bilingual {
            he: en.clone(),
            en,
        }),
        (None, None) => None,
    }
}
