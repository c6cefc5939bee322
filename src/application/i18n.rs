//! Localization: active language selection and interface-string lookup.
//!
//! The dictionary is static and bilingual; lookups that miss return the key
//! itself so a missing translation degrades to a visible-but-harmless label
//! instead of an error. The chosen language persists under the `language`
//! key and drives the document text direction.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use metrics::counter;
use once_cell::sync::Lazy;
use tracing::{debug, warn};

use crate::application::events::{ChangeFeed, ChangeKind};
use crate::domain::types::Language;
use crate::infra::kv::KeyValueStore;

const LANGUAGE_KEY: &str = "language";

/// (key, hebrew, english) triples for every interface string.
const STRINGS: &[(&str, &str, &str)] = &[
    // Navigation
    ("nav.home", "בית", "Home"),
    ("nav.gallery", "גלריה", "Gallery"),
    ("nav.about", "אודות", "About"),
    ("nav.blog", "בלוג", "Blog"),
    ("nav.contact", "צור קשר", "Contact"),
    ("nav.admin", "ניהול", "Admin"),
    // Home page
    (
        "home.hero.title",
        "צילומי ילדים ומשפחה מקצועיים",
        "Professional Children & Family Photography",
    ),
    (
        "home.hero.subtitle",
        "מתמחה בצילומי חלאקה, משפחה וילדים - רגעים יקרים שנשמרים לנצח",
        "Specializing in Chalaka, family and children photography - precious moments preserved forever",
    ),
    ("home.hero.cta", "צרו קשר לתיאום צילום", "Contact for Photo Session"),
    (
        "home.about.title",
        "צילום באהבה ובמקצועיות",
        "Photography with Love and Professionalism",
    ),
    (
        "home.about.text",
        "עם ניסיון של מעל 10 שנים בצילום ילדים ומשפחות, אני מתמחה ביצירת זכרונות יפים ומשמעותיים. כל צילום הוא סיפור ייחודי המתועד באופן טבעי ורגיש.",
        "With over 10 years of experience in children and family photography, I specialize in creating beautiful and meaningful memories. Every shoot is a unique story documented naturally and sensitively.",
    ),
    // Gallery
    ("gallery.title", "הגלריה שלי", "My Gallery"),
    ("gallery.chalaka", "חלאקה", "Chalaka"),
    ("gallery.family", "משפחה", "Family"),
    ("gallery.newborn", "ילודים", "Newborn"),
    ("gallery.smash", "סמאש קייק", "Smash Cake"),
    // About
    ("about.title", "אודותיי", "About Me"),
    (
        "about.text",
        "שמי [שם הצלמת] ואני צלמת מקצועית המתמחה בצילומי ילדים ומשפחות. האמונה שלי היא שכל ילד ומשפחה ייחודיים, ותפקידי להעביר את הקסם הזה דרך העדשה.",
        "My name is [Photographer Name] and I am a professional photographer specializing in children and family photography. My belief is that every child and family is unique, and my job is to capture that magic through the lens.",
    ),
    // Contact
    ("contact.title", "צרו קשר", "Contact Me"),
    ("contact.name", "שם מלא", "Full Name"),
    ("contact.email", "דואר אלקטרוני", "Email"),
    ("contact.phone", "טלפון", "Phone"),
    ("contact.message", "הודעה", "Message"),
    ("contact.send", "שלח הודעה", "Send Message"),
    ("contact.info.title", "פרטי התקשרות", "Contact Information"),
    ("contact.info.phone", "טלפון: 050-123-4567", "Phone: 050-123-4567"),
    (
        "contact.info.email",
        "אימייל: info@photography.co.il",
        "Email: info@photography.co.il",
    ),
    (
        "contact.info.location",
        "מיקום: תל אביב והמרכז",
        "Location: Tel Aviv & Center",
    ),
    // Admin
    ("admin.login.title", "כניסה לפאנל ניהול", "Admin Panel Login"),
    ("admin.login.email", "אימייל", "Email"),
    ("admin.login.password", "סיסמה", "Password"),
    ("admin.login.submit", "התחבר", "Login"),
    ("admin.dashboard.title", "לוח בקרה", "Dashboard"),
    ("admin.galleries", "ניהול גלריות", "Manage Galleries"),
    ("admin.content", "ניהול תוכן", "Content Management"),
    ("admin.translations", "תרגומים", "Translations"),
    ("admin.settings", "הגדרות", "Settings"),
    // Footer
    ("footer.copyright", "© 2024 כל הזכויות שמורות", "© 2024 All rights reserved"),
    ("footer.follow", "עקבו אחריי", "Follow Me"),
];

static HEBREW: Lazy<BTreeMap<&'static str, &'static str>> =
    Lazy::new(|| STRINGS.iter().map(|(key, he, _)| (*key, *he)).collect());

static ENGLISH: Lazy<BTreeMap<&'static str, &'static str>> =
    Lazy::new(|| STRINGS.iter().map(|(key, _, en)| (*key, *en)).collect());

fn dictionary(language: Language) -> &'static BTreeMap<&'static str, &'static str> {
    match language {
        Language::He => &HEBREW,
        Language::En => &ENGLISH,
    }
}

/// The localization store: active language plus dictionary lookup.
pub struct Localizer {
    kv: Arc<dyn KeyValueStore>,
    feed: Arc<ChangeFeed>,
    language: Mutex<Language>,
}

impl Localizer {
    /// Construct the store, restoring the persisted language choice when one
    /// exists. Unreadable or unknown persisted tags fall back to the default.
    pub async fn load(kv: Arc<dyn KeyValueStore>, feed: Arc<ChangeFeed>) -> Self {
        let language = match kv.get(LANGUAGE_KEY).await {
            Ok(Some(raw)) => serde_json::from_str::<Language>(&raw).unwrap_or_else(|err| {
                debug!(error = %err, "persisted language tag is unreadable; using default");
                Language::default()
            }),
            Ok(None) => Language::default(),
            Err(err) => {
                warn!(error = %err, "failed to read persisted language; using default");
                Language::default()
            }
        };

        Self {
            kv,
            feed,
            language: Mutex::new(language),
        }
    }

    pub fn language(&self) -> Language {
        *lock(&self.language)
    }

    pub fn is_rtl(&self) -> bool {
        self.language().is_rtl()
    }

    /// Document text direction for the active language.
    pub fn text_direction(&self) -> &'static str {
        self.language().text_direction()
    }

    /// Look up an interface string for the active language.
    ///
    /// Unknown keys come back verbatim; lookup never fails.
    pub fn t(&self, key: &str) -> String {
        dictionary(self.language())
            .get(key)
            .map(|value| (*value).to_string())
            .unwrap_or_else(|| key.to_string())
    }

    /// Switch the active language, persist the choice, and notify
    /// subscribers. Persistence is best-effort: a failed durable write keeps
    /// the in-memory switch.
    pub async fn set_language(&self, language: Language) {
        *lock(&self.language) = language;

        match serde_json::to_string(&language) {
            Ok(payload) => {
                if let Err(err) = self.kv.put(LANGUAGE_KEY, payload).await {
                    counter!("veduta_persist_failure_total").increment(1);
                    warn!(error = %err, "failed to persist language choice");
                }
            }
            Err(err) => warn!(error = %err, "failed to encode language choice"),
        }

        self.feed.publish(ChangeKind::LanguageChanged { language });
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use crate::infra::kv::MemoryStore;

    use super::*;

    async fn localizer() -> Localizer {
        Localizer::load(Arc::new(MemoryStore::new()), Arc::new(ChangeFeed::new())).await
    }

    #[tokio::test]
    async fn defaults_to_hebrew_with_rtl_direction() {
        let localizer = localizer().await;
        assert_eq!(localizer.language(), Language::He);
        assert!(localizer.is_rtl());
        assert_eq!(localizer.text_direction(), "rtl");
    }

    #[tokio::test]
    async fn lookup_returns_the_active_language_variant() {
        let localizer = localizer().await;
        assert_eq!(localizer.t("nav.home"), "בית");

        localizer.set_language(Language::En).await;
        assert_eq!(localizer.t("nav.home"), "Home");
        assert_eq!(localizer.text_direction(), "ltr");
    }

    #[tokio::test]
    async fn unknown_keys_come_back_verbatim() {
        let localizer = localizer().await;
        assert_eq!(localizer.t("nav.pricing"), "nav.pricing");
        assert_eq!(localizer.t(""), "");
    }

    #[tokio::test]
    async fn language_choice_survives_reconstruction() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let feed = Arc::new(ChangeFeed::new());

        let localizer = Localizer::load(Arc::clone(&kv), Arc::clone(&feed)).await;
        localizer.set_language(Language::En).await;
        drop(localizer);

        let restored = Localizer::load(kv, feed).await;
        assert_eq!(restored.language(), Language::En);
    }

    #[tokio::test]
    async fn switching_language_notifies_subscribers() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let feed = Arc::new(ChangeFeed::new());
        let localizer = Localizer::load(Arc::clone(&kv), Arc::clone(&feed)).await;

        let mut rx = feed.subscribe();
        localizer.set_language(Language::En).await;

        let change = rx.recv().await.unwrap();
        assert_eq!(
            change.kind,
            ChangeKind::LanguageChanged {
                language: Language::En
            }
        );
    }
}
