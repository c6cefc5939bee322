//! The site content aggregate: every editable piece of site text, design,
//! and settings as one nested configuration object.
//!
//! The aggregate is always fully populated. Persisted overrides are merged
//! section-by-section against [`SiteContent::default_content`], so no field
//! is ever absent regardless of what an older persisted copy contains.
//! Serialization uses camelCase field names to stay byte-compatible with the
//! layout documented for the durable store.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::domain::bilingual::Bilingual;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteContent {
    pub hero: HeroSection,
    pub navigation: NavigationLabels,
    pub gallery_categories: GalleryCategoryLabels,
    pub about: AboutSection,
    pub contact: ContactInfo,
    pub seo: SeoSettings,
    pub design: DesignSettings,
    pub analytics: AnalyticsSettings,
    pub email_settings: EmailSettings,
    pub maintenance: MaintenanceSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroSection {
    pub title: Bilingual,
    pub subtitle: Bilingual,
    pub cta: Bilingual,
    pub background_image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationLabels {
    pub home: Bilingual,
    pub gallery: Bilingual,
    pub about: Bilingual,
    pub contact: Bilingual,
    pub blog: Bilingual,
}

/// Labels for the fixed set of four gallery buckets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryCategoryLabels {
    pub chalaka: Bilingual,
    pub family: Bilingual,
    pub newborn: Bilingual,
    pub smash: Bilingual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutSection {
    pub title: Bilingual,
    pub content: Bilingual,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub title: Bilingual,
    pub phone: String,
    pub email: String,
    pub address: Bilingual,
    pub whatsapp: String,
    pub social_media: SocialLinks,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLinks {
    pub instagram: String,
    pub facebook: String,
    pub youtube: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoSettings {
    pub site_name: Bilingual,
    pub description: Bilingual,
    pub keywords: Bilingual,
    pub favicon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignSettings {
    pub colors: ColorPalette,
    pub fonts: FontSettings,
    pub layout: LayoutSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorPalette {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontSettings {
    pub hebrew: String,
    pub english: String,
    pub heading_weight: String,
    pub body_weight: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSettings {
    pub max_width: String,
    pub section_padding: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSettings {
    pub google_analytics: String,
    pub meta_pixel: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailSettings {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: String,
    pub smtp_password: String,
    pub from_email: String,
    pub to_email: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceSettings {
    pub enabled: bool,
    pub message: Bilingual,
}

static DEFAULT_CONTENT: Lazy<SiteContent> = Lazy::new(build_default_content);

impl SiteContent {
    /// The hardcoded, fully-populated default aggregate.
    pub fn default_content() -> SiteContent {
        DEFAULT_CONTENT.clone()
    }

    /// Merge a persisted JSON override against the defaults.
    ///
    /// Merging is shallow per top-level section, matching the original
    /// persistence behaviour: a section present in the stored copy replaces
    /// the default section wholesale, and missing sections fall back to the
    /// defaults. A stored copy that no longer deserializes yields the
    /// defaults unchanged.
    pub fn from_persisted(stored: Value) -> SiteContent {
        let Value::Object(stored) = stored else {
            debug!("persisted site content is not an object; using defaults");
            return Self::default_content();
        };

        let mut merged = serde_json::to_value(Self::default_content())
            .expect("default content serializes");
        let base = merged
            .as_object_mut()
            .expect("default content is an object");
        for (key, value) in stored {
            if base.contains_key(&key) {
                base.insert(key, value);
            }
        }

        match serde_json::from_value(merged) {
            Ok(content) => content,
            Err(err) => {
                debug!(error = %err, "persisted site content failed to deserialize; using defaults");
                Self::default_content()
            }
        }
    }

    /// Replace the node addressed by a dot-separated path with `value`.
    ///
    /// The replacement is shallow at the addressed node. Returns `false`
    /// without touching the aggregate when the path does not resolve to an
    /// existing field, or when the replacement value does not fit the field's
    /// shape. Callers are expected to address only known fields, and a typo
    /// must never corrupt the aggregate.
    pub fn apply_update(&mut self, path: &str, value: Value) -> bool {
        if path.is_empty() {
            return false;
        }

        let mut tree = serde_json::to_value(&*self).expect("site content serializes");
        {
            let mut node = &mut tree;
            let mut segments = path.split('.').peekable();
            while let Some(segment) = segments.next() {
                let Some(container) = node.as_object_mut() else {
                    debug!(path, segment, "content path addresses a non-container node");
                    return false;
                };
                let Some(child) = container.get_mut(segment) else {
                    debug!(path, segment, "content path does not resolve");
                    return false;
                };
                if segments.peek().is_none() {
                    *child = value;
                    break;
                }
                node = child;
            }
        }

        match serde_json::from_value(tree) {
            Ok(updated) => {
                *self = updated;
                true
            }
            Err(err) => {
                debug!(path, error = %err, "content update value does not fit the addressed field");
                false
            }
        }
    }
}

impl DesignSettings {
    /// Resolve the design tokens into the CSS custom-property pairs the
    /// presentation layer injects for live preview.
    pub fn css_variables(&self) -> Vec<(String, String)> {
        vec![
            ("--color-primary".into(), self.colors.primary.clone()),
            ("--color-secondary".into(), self.colors.secondary.clone()),
            ("--color-accent".into(), self.colors.accent.clone()),
            ("--color-background".into(), self.colors.background.clone()),
            ("--color-text".into(), self.colors.text.clone()),
            ("--font-hebrew".into(), self.fonts.hebrew.clone()),
            ("--font-english".into(), self.fonts.english.clone()),
            ("--max-width".into(), self.layout.max_width.clone()),
            ("--section-padding".into(), self.layout.section_padding.clone()),
        ]
    }
}

fn build_default_content() -> SiteContent {
    SiteContent {
        hero: HeroSection {
            title: Bilingual::new(
                "צילומי ילדים ומשפחה מקצועיים",
                "Professional Children & Family Photography",
            ),
            subtitle: Bilingual::new(
                "מתמחה בצילומי חלאקה, משפחה וילדים - רגעים יקרים שנשמרים לנצח",
                "Specializing in Chalaka, family and children photography - precious moments preserved forever",
            ),
            cta: Bilingual::new("צרו קשר לתיאום צילום", "Contact for Photo Session"),
            background_image:
                "https://images.pexels.com/photos/1545743/pexels-photo-1545743.jpeg?auto=compress&cs=tinysrgb&w=1200"
                    .into(),
        },
        navigation: NavigationLabels {
            home: Bilingual::new("בית", "Home"),
            gallery: Bilingual::new("גלריה", "Gallery"),
            about: Bilingual::new("אודות", "About"),
            contact: Bilingual::new("צור קשר", "Contact"),
            blog: Bilingual::new("בלוג", "Blog"),
        },
        gallery_categories: GalleryCategoryLabels {
            chalaka: Bilingual::new("חלאקה", "Chalaka"),
            family: Bilingual::new("משפחה", "Family"),
            newborn: Bilingual::new("ילודים", "Newborn"),
            smash: Bilingual::new("סמאש קייק", "Smash Cake"),
        },
        about: AboutSection {
            title: Bilingual::new("אודותיי", "About Me"),
            content: Bilingual::new(
                "שמי [שם הצלמת] ואני צלמת מקצועית המתמחה בצילומי ילדים ומשפחות. האמונה שלי היא שכל ילד ומשפחה ייחודיים, ותפקידי להעביר את הקסם הזה דרך העדשה.",
                "My name is [Photographer Name] and I am a professional photographer specializing in children and family photography. My belief is that every child and family is unique, and my job is to capture that magic through the lens.",
            ),
            image:
                "https://images.pexels.com/photos/1462637/pexels-photo-1462637.jpeg?auto=compress&cs=tinysrgb&w=800"
                    .into(),
        },
        contact: ContactInfo {
            title: Bilingual::new("צרו קשר", "Contact Me"),
            phone: "050-123-4567".into(),
            email: "info@photography.co.il".into(),
            address: Bilingual::new("תל אביב והמרכז", "Tel Aviv & Center"),
            whatsapp: "+972501234567".into(),
            social_media: SocialLinks {
                instagram: "https://instagram.com/photographer".into(),
                facebook: "https://facebook.com/photographer".into(),
                youtube: String::new(),
            },
        },
        seo: SeoSettings {
            site_name: Bilingual::new(
                "Photography Studio - צילומי ילדים ומשפחה",
                "Photography Studio - Children & Family Photography",
            ),
            description: Bilingual::new(
                "צילומי ילדים ומשפחה מקצועיים - מתמחה בצילומי חלאקה, פורטרטים משפחתיים ורגעים יקרים",
                "Professional children and family photography - specializing in Chalaka ceremonies, family portraits and precious moments",
            ),
            keywords: Bilingual::new(
                "צילום ילדים, צילום משפחה, צילום חלאקה, צילום ילודים, צלמת מקצועית, תל אביב",
                "children photography, family photography, chalaka photography, newborn photography, professional photographer, tel aviv",
            ),
            favicon: "/favicon.ico".into(),
        },
        design: DesignSettings {
            colors: ColorPalette {
                primary: "#e11d48".into(),
                secondary: "#f43f5e".into(),
                accent: "#fb7185".into(),
                background: "#ffffff".into(),
                text: "#111827".into(),
            },
            fonts: FontSettings {
                hebrew: "Heebo".into(),
                english: "Inter".into(),
                heading_weight: "700".into(),
                body_weight: "400".into(),
            },
            layout: LayoutSettings {
                max_width: "1280px".into(),
                section_padding: "5rem".into(),
            },
        },
        analytics: AnalyticsSettings {
            google_analytics: String::new(),
            meta_pixel: String::new(),
        },
        email_settings: EmailSettings {
            smtp_host: "smtp.gmail.com".into(),
            smtp_port: 587,
            smtp_user: String::new(),
            smtp_password: String::new(),
            from_email: "noreply@photography.co.il".into(),
            to_email: "admin@photography.co.il".into(),
            enabled: false,
        },
        maintenance: MaintenanceSettings {
            enabled: false,
            message: Bilingual::new(
                "האתר נמצא בתחזוקה. נחזור בקרוב!",
                "Site under maintenance. We'll be back soon!",
            ),
        },
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn defaults_are_fully_populated() {
        let content = SiteContent::default_content();
        assert!(!content.hero.title.he.is_empty());
        assert!(!content.gallery_categories.smash.en.is_empty());
        assert_eq!(content.email_settings.smtp_port, 587);
        assert!(!content.email_settings.enabled);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(SiteContent::default_content()).unwrap();
        assert!(json.get("galleryCategories").is_some());
        assert!(json["hero"].get("backgroundImage").is_some());
        assert!(json["emailSettings"].get("smtpHost").is_some());
        assert!(json["contact"].get("socialMedia").is_some());
    }

    #[test]
    fn from_persisted_merges_sections_over_defaults() {
        let stored = json!({
            "hero": {
                "title": { "he": "א", "en": "B" },
                "subtitle": { "he": "", "en": "" },
                "cta": { "he": "", "en": "" },
                "backgroundImage": "https://example.com/bg.jpg"
            }
        });
        let content = SiteContent::from_persisted(stored);
        assert_eq!(content.hero.title.en, "B");
        assert_eq!(content.hero.background_image, "https://example.com/bg.jpg");
        // Sections absent from the stored copy fall back to the defaults.
        assert_eq!(content.contact.phone, "050-123-4567");
    }

    #[test]
    fn from_persisted_rejects_garbage() {
        assert_eq!(
            SiteContent::from_persisted(json!("not an object")),
            SiteContent::default_content()
        );
        let broken = json!({ "hero": { "title": 7 } });
        assert_eq!(
            SiteContent::from_persisted(broken),
            SiteContent::default_content()
        );
    }

    #[test]
    fn apply_update_replaces_only_the_addressed_node() {
        let mut content = SiteContent::default_content();
        let before = content.clone();
        let applied = content.apply_update("hero.title", json!({ "he": "א", "en": "B" }));
        assert!(applied);
        assert_eq!(content.hero.title, Bilingual::new("א", "B"));
        assert_eq!(content.hero.subtitle, before.hero.subtitle);
        assert_eq!(content.hero.cta, before.hero.cta);
        assert_eq!(content.hero.background_image, before.hero.background_image);
    }

    #[test]
    fn apply_update_reaches_nested_leaves() {
        let mut content = SiteContent::default_content();
        assert!(content.apply_update(
            "contact.socialMedia.instagram",
            json!("https://instagram.com/studio")
        ));
        assert_eq!(
            content.contact.social_media.instagram,
            "https://instagram.com/studio"
        );
    }

    #[test]
    fn apply_update_is_a_no_op_for_unknown_paths() {
        let mut content = SiteContent::default_content();
        let before = content.clone();
        assert!(!content.apply_update("hero.missing", json!("x")));
        assert!(!content.apply_update("nope.title", json!("x")));
        assert!(!content.apply_update("hero.title.he.deeper", json!("x")));
        assert!(!content.apply_update("", json!("x")));
        assert_eq!(content, before);
    }

    #[test]
    fn apply_update_rejects_shape_mismatches() {
        let mut content = SiteContent::default_content();
        let before = content.clone();
        // A bare string cannot replace a bilingual record.
        assert!(!content.apply_update("hero.title", json!("just one language")));
        assert_eq!(content, before);
    }

    #[test]
    fn css_variables_cover_the_full_token_set() {
        let design = SiteContent::default_content().design;
        let vars = design.css_variables();
        assert_eq!(vars.len(), 9);
        assert!(vars.contains(&("--color-primary".into(), "#e11d48".into())));
        assert!(vars.contains(&("--section-padding".into(), "5rem".into())));
    }
}
