//! Collection entities mirrored from persistent storage.
//!
//! Field names serialize in camelCase so the durable copies match the
//! documented key layout (`mediaLibrary`, `galleryItems`, and friends).

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::bilingual::Bilingual;
use crate::domain::types::{EmailKind, EmailStatus, GalleryCategory, PostStatus};

/// An asset in the media library.
///
/// The display URL is a session-local blob handle: metadata survives a
/// restart, the bytes behind the URL do not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRecord {
    pub id: Uuid,
    pub url: String,
    pub alt: String,
    pub filename: String,
    pub size_bytes: u64,
    pub content_type: String,
    pub checksum: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    #[serde(with = "time::serde::rfc3339")]
    pub uploaded_at: OffsetDateTime,
}

/// A media asset bucketed into one of the four gallery categories, with a
/// manual sort position scoped to that category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryRecord {
    pub id: Uuid,
    pub url: String,
    pub alt: String,
    pub filename: String,
    pub size_bytes: u64,
    pub content_type: String,
    pub checksum: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    #[serde(with = "time::serde::rfc3339")]
    pub uploaded_at: OffsetDateTime,
    pub category: GalleryCategory,
    #[serde(rename = "order")]
    pub sort_order: u32,
}

/// Fields of a gallery item the admin editor may change after upload.
#[derive(Debug, Clone, Default)]
pub struct GalleryPatch {
    pub alt: Option<String>,
    pub category: Option<GalleryCategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmissionRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    #[serde(with = "time::serde::rfc3339")]
    pub submitted_at: OffsetDateTime,
    pub read: bool,
    pub email_sent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_error: Option<String>,
}

/// A visitor inquiry as entered in the public contact form; the engine adds
/// identity, timestamps, and notification state.
#[derive(Debug, Clone)]
pub struct NewContactSubmission {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostRecord {
    pub id: Uuid,
    pub title: Bilingual,
    pub content: Bilingual,
    pub excerpt: Bilingual,
    pub slug: Bilingual,
    pub featured_image: String,
    #[serde(with = "time::serde::rfc3339")]
    pub published_at: OffsetDateTime,
    pub status: PostStatus,
    pub author: String,
}

/// A blog post as submitted by the admin editor, before an id is assigned.
/// An empty slug is derived from the title on save.
#[derive(Debug, Clone)]
pub struct NewBlogPost {
    pub title: Bilingual,
    pub content: Bilingual,
    pub excerpt: Bilingual,
    pub slug: Bilingual,
    pub featured_image: String,
    pub published_at: OffsetDateTime,
    pub status: PostStatus,
    pub author: String,
}

#[derive(Debug, Clone, Default)]
pub struct BlogPostPatch {
    pub title: Option<Bilingual>,
    pub content: Option<Bilingual>,
    pub excerpt: Option<Bilingual>,
    pub slug: Option<Bilingual>,
    pub featured_image: Option<String>,
    pub published_at: Option<OffsetDateTime>,
    pub status: Option<PostStatus>,
    pub author: Option<String>,
}

/// Audit record of one attempted notification or test email. Append-only;
/// the log is only ever rewritten wholesale, never edited entry by entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailLogRecord {
    pub id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub to: String,
    pub subject: String,
    pub status: EmailStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(rename = "type")]
    pub kind: EmailKind,
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn gallery_record_serializes_order_and_category() {
        let record = GalleryRecord {
            id: Uuid::new_v4(),
            url: "blob:veduta/abc".into(),
            alt: "smash cake".into(),
            filename: "smash cake.jpg".into(),
            size_bytes: 1024,
            content_type: "image/jpeg".into(),
            checksum: "deadbeef".into(),
            width: Some(800),
            height: Some(600),
            uploaded_at: datetime!(2026-03-01 12:00 UTC),
            category: GalleryCategory::Smash,
            sort_order: 3,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["order"], 3);
        assert_eq!(json["category"], "smash");
        assert_eq!(json["sizeBytes"], 1024);
        assert_eq!(json["uploadedAt"], "2026-03-01T12:00:00Z");

        let back: GalleryRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn email_log_kind_serializes_as_type() {
        let record = EmailLogRecord {
            id: Uuid::new_v4(),
            timestamp: datetime!(2026-03-01 12:00 UTC),
            to: "admin@photography.co.il".into(),
            subject: "Test Email".into(),
            status: EmailStatus::Failed,
            error: Some("SMTP server temporarily unavailable".into()),
            kind: EmailKind::Test,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "test");
        assert_eq!(json["status"], "failed");
    }

    #[test]
    fn optional_errors_are_omitted_when_absent() {
        let record = ContactSubmissionRecord {
            id: Uuid::new_v4(),
            name: "Dana".into(),
            email: "dana@example.com".into(),
            phone: "050-000-0000".into(),
            message: "hi".into(),
            submitted_at: datetime!(2026-03-01 12:00 UTC),
            read: false,
            email_sent: true,
            email_error: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("emailError").is_none());
    }
}
