//! The content engine: single source of truth for all site data.
//!
//! The engine owns the content aggregate and the five collections, and
//! mediates every read and write between the presentation layer and the
//! durable key-value store. Each mutation commits to memory first, then
//! persists the affected key best-effort, then publishes one change event.
//! Persistence failures never roll back the in-memory mutation; they are
//! logged and counted, and the durable copy catches up on the next write to
//! the same key.
//!
//! There is exactly one logical writer (the UI event loop), so the interior
//! mutex is only ever held across the synchronous part of a mutation, never
//! across an await. Two rapid edits to the same entity may interleave with
//! last-write-wins, which matches the original behaviour.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use metrics::counter;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use sha2::{Digest, Sha256};
use time::OffsetDateTime;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::application::events::{ChangeFeed, ChangeKind};
use crate::application::mailer::NotificationMailer;
use crate::domain::bilingual::Bilingual;
use crate::domain::content::{DesignSettings, SiteContent};
use crate::domain::entities::{
    BlogPostPatch, BlogPostRecord, ContactSubmissionRecord, EmailLogRecord, GalleryPatch,
    GalleryRecord, MediaRecord, NewBlogPost, NewContactSubmission,
};
use crate::domain::slug::bilingual_slug;
use crate::domain::types::{EmailKind, GalleryCategory};
use crate::infra::blobs::BlobRegistry;
use crate::infra::kv::KeyValueStore;

pub const KEY_SITE_CONTENT: &str = "siteContent";
pub const KEY_MEDIA_LIBRARY: &str = "mediaLibrary";
pub const KEY_GALLERY_ITEMS: &str = "galleryItems";
pub const KEY_CONTACT_SUBMISSIONS: &str = "contactSubmissions";
pub const KEY_BLOG_POSTS: &str = "blogPosts";
pub const KEY_EMAIL_LOGS: &str = "emailLogs";

const CONTACT_SUBJECT: &str = "New Inquiry from Photography Website";
const TEST_SUBJECT: &str = "Test Email from Photography Website";
const CONTACT_EMAIL_ERROR: &str = "Failed to send email notification";

/// A binary payload handed to the engine by the upload form.
///
/// The presentation layer enforces upload constraints (image type, size cap)
/// before constructing one of these; the engine accepts what it is given.
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl MediaUpload {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            content_type: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

struct EngineState {
    content: SiteContent,
    media: Vec<MediaRecord>,
    gallery: Vec<GalleryRecord>,
    submissions: Vec<ContactSubmissionRecord>,
    posts: Vec<BlogPostRecord>,
    email_logs: Vec<EmailLogRecord>,
}

/// Single source of truth for site content and admin collections.
pub struct ContentEngine {
    kv: Arc<dyn KeyValueStore>,
    blobs: Arc<BlobRegistry>,
    mailer: NotificationMailer,
    feed: Arc<ChangeFeed>,
    state: Mutex<EngineState>,
}

impl ContentEngine {
    /// Construct the engine from whatever the durable store holds.
    ///
    /// The content aggregate merges against the hardcoded defaults; each
    /// collection that is missing or unreadable starts empty. Loading never
    /// fails; a corrupt durable copy degrades to defaults instead of taking
    /// the site down.
    pub async fn load(
        kv: Arc<dyn KeyValueStore>,
        blobs: Arc<BlobRegistry>,
        mailer: NotificationMailer,
    ) -> Self {
        let content = match read_value(&kv, KEY_SITE_CONTENT).await {
            Some(stored) => SiteContent::from_persisted(stored),
            None => SiteContent::default_content(),
        };

        let state = EngineState {
            content,
            media: read_collection(&kv, KEY_MEDIA_LIBRARY).await,
            gallery: read_collection(&kv, KEY_GALLERY_ITEMS).await,
            submissions: read_collection(&kv, KEY_CONTACT_SUBMISSIONS).await,
            posts: read_collection(&kv, KEY_BLOG_POSTS).await,
            email_logs: read_collection(&kv, KEY_EMAIL_LOGS).await,
        };

        Self {
            kv,
            blobs,
            mailer,
            feed: Arc::new(ChangeFeed::new()),
            state: Mutex::new(state),
        }
    }

    /// The change feed mutations publish to.
    pub fn feed(&self) -> Arc<ChangeFeed> {
        Arc::clone(&self.feed)
    }

    /// Session-local registry backing the media display URLs.
    pub fn blobs(&self) -> Arc<BlobRegistry> {
        Arc::clone(&self.blobs)
    }

    // ---- read accessors -------------------------------------------------

    pub fn content(&self) -> SiteContent {
        self.lock().content.clone()
    }

    pub fn media_library(&self) -> Vec<MediaRecord> {
        self.lock().media.clone()
    }

    pub fn gallery_items(&self) -> Vec<GalleryRecord> {
        self.lock().gallery.clone()
    }

    pub fn contact_submissions(&self) -> Vec<ContactSubmissionRecord> {
        self.lock().submissions.clone()
    }

    pub fn blog_posts(&self) -> Vec<BlogPostRecord> {
        self.lock().posts.clone()
    }

    pub fn email_logs(&self) -> Vec<EmailLogRecord> {
        self.lock().email_logs.clone()
    }

    /// All gallery items in the given category, ascending by sort order.
    /// Pure read; never mutates or persists.
    pub fn gallery_by_category(&self, category: GalleryCategory) -> Vec<GalleryRecord> {
        let mut items: Vec<GalleryRecord> = self
            .lock()
            .gallery
            .iter()
            .filter(|item| item.category == category)
            .cloned()
            .collect();
        items.sort_by_key(|item| item.sort_order);
        items
    }

    // ---- content aggregate ----------------------------------------------

    /// Replace the aggregate node addressed by a dot-separated path.
    ///
    /// Unresolved paths and shape-mismatching values are a silent no-op:
    /// nothing is persisted and no change is published. Callers are expected
    /// to address only known fields.
    pub async fn update_content(&self, path: &str, value: Value) {
        let snapshot = {
            let mut state = self.lock();
            if !state.content.apply_update(path, value) {
                counter!("veduta_content_update_rejected_total").increment(1);
                return;
            }
            state.content.clone()
        };

        self.persist(KEY_SITE_CONTENT, &snapshot).await;
        self.feed.publish(ChangeKind::ContentUpdated {
            path: path.to_string(),
        });
    }

    /// Re-persist the aggregate as currently held in memory.
    pub async fn save_content(&self) {
        let snapshot = self.lock().content.clone();
        self.persist(KEY_SITE_CONTENT, &snapshot).await;
    }

    /// Write the design section and publish the resolved CSS custom
    /// properties so a live-preview subscriber can inject them before any
    /// explicit save.
    pub async fn apply_design_changes(&self, design: DesignSettings) {
        let variables = design.css_variables();
        let snapshot = {
            let mut state = self.lock();
            state.content.design = design;
            state.content.clone()
        };

        self.persist(KEY_SITE_CONTENT, &snapshot).await;
        self.feed.publish(ChangeKind::DesignApplied { variables });
    }

    // ---- media library ---------------------------------------------------

    /// Register an upload in the media library and return the new record.
    pub async fn upload_media(&self, upload: MediaUpload) -> MediaRecord {
        let record = self.build_media_record(upload);

        let snapshot = {
            let mut state = self.lock();
            state.media.push(record.clone());
            state.media.clone()
        };

        self.persist(KEY_MEDIA_LIBRARY, &snapshot).await;
        self.feed.publish(ChangeKind::MediaChanged);
        record
    }

    /// Edit a media item's alt text; the only in-place media edit allowed.
    /// A no-op for unknown ids.
    pub async fn update_media_alt(&self, id: Uuid, alt: impl Into<String>) {
        let alt = alt.into();
        let snapshot = {
            let mut state = self.lock();
            let Some(item) = state.media.iter_mut().find(|item| item.id == id) else {
                return;
            };
            item.alt = alt;
            state.media.clone()
        };

        self.persist(KEY_MEDIA_LIBRARY, &snapshot).await;
        self.feed.publish(ChangeKind::MediaChanged);
    }

    /// Remove a media item and release its blob; a no-op for unknown ids.
    pub async fn delete_media(&self, id: Uuid) {
        self.delete_media_batch(&[id]).await;
    }

    /// Remove several media items at once. Ids that match nothing are
    /// skipped; when nothing matches at all the call is a no-op.
    pub async fn delete_media_batch(&self, ids: &[Uuid]) {
        let snapshot = {
            let mut state = self.lock();
            let before = state.media.len();
            state.media.retain(|item| !ids.contains(&item.id));
            if state.media.len() == before {
                return;
            }
            state.media.clone()
        };
        for id in ids {
            self.blobs.release(*id);
        }

        self.persist(KEY_MEDIA_LIBRARY, &snapshot).await;
        self.feed.publish(ChangeKind::MediaChanged);
    }

    // ---- gallery ---------------------------------------------------------

    /// Register an upload directly into a gallery category. The new item
    /// lands at the end of the category's manual order.
    pub async fn upload_gallery_image(
        &self,
        upload: MediaUpload,
        category: GalleryCategory,
    ) -> GalleryRecord {
        let media = self.build_media_record(upload);

        let (record, snapshot) = {
            let mut state = self.lock();
            let sort_order = state
                .gallery
                .iter()
                .filter(|item| item.category == category)
                .map(|item| item.sort_order + 1)
                .max()
                .unwrap_or(0);

            let record = GalleryRecord {
                id: media.id,
                url: media.url,
                alt: media.alt,
                filename: media.filename,
                size_bytes: media.size_bytes,
                content_type: media.content_type,
                checksum: media.checksum,
                width: media.width,
                height: media.height,
                uploaded_at: media.uploaded_at,
                category,
                sort_order,
            };
            state.gallery.push(record.clone());
            (record, state.gallery.clone())
        };

        self.persist(KEY_GALLERY_ITEMS, &snapshot).await;
        self.feed.publish(ChangeKind::GalleryChanged);
        record
    }

    /// Remove a gallery item and release its blob; a no-op for unknown ids.
    /// Remaining order values keep their gaps; there is no compaction.
    pub async fn delete_gallery_image(&self, id: Uuid) {
        let snapshot = {
            let mut state = self.lock();
            let before = state.gallery.len();
            state.gallery.retain(|item| item.id != id);
            if state.gallery.len() == before {
                return;
            }
            state.gallery.clone()
        };
        self.blobs.release(id);

        self.persist(KEY_GALLERY_ITEMS, &snapshot).await;
        self.feed.publish(ChangeKind::GalleryChanged);
    }

    /// Resequence a category: each listed item's order becomes its position
    /// in `ordered_ids`. Items of the category omitted from the list keep
    /// their previous order; items of other categories are untouched.
    pub async fn reorder_gallery_images(&self, category: GalleryCategory, ordered_ids: &[Uuid]) {
        let snapshot = {
            let mut state = self.lock();
            for item in state
                .gallery
                .iter_mut()
                .filter(|item| item.category == category)
            {
                if let Some(position) = ordered_ids.iter().position(|id| *id == item.id) {
                    item.sort_order = position as u32;
                }
            }
            state.gallery.clone()
        };

        self.persist(KEY_GALLERY_ITEMS, &snapshot).await;
        self.feed.publish(ChangeKind::GalleryChanged);
    }

    /// Shallow-merge the patch into the matching gallery item; a no-op for
    /// unknown ids.
    pub async fn update_gallery_image(&self, id: Uuid, patch: GalleryPatch) {
        let snapshot = {
            let mut state = self.lock();
            let Some(item) = state.gallery.iter_mut().find(|item| item.id == id) else {
                return;
            };
            if let Some(alt) = patch.alt {
                item.alt = alt;
            }
            if let Some(category) = patch.category {
                item.category = category;
            }
            state.gallery.clone()
        };

        self.persist(KEY_GALLERY_ITEMS, &snapshot).await;
        self.feed.publish(ChangeKind::GalleryChanged);
    }

    // ---- contact submissions ---------------------------------------------

    /// Record a visitor inquiry and attempt the notification email as part
    /// of the same call. The outcome of the attempt is stamped onto the
    /// stored submission; the attempt itself always produces exactly one
    /// email-log entry.
    pub async fn add_contact_submission(
        &self,
        submission: NewContactSubmission,
    ) -> ContactSubmissionRecord {
        let to = self.lock().content.email_settings.to_email.clone();
        let body = contact_email_body(&submission);
        let delivered = self
            .send_email(&to, CONTACT_SUBJECT, &body, EmailKind::Contact)
            .await;

        let record = ContactSubmissionRecord {
            id: Uuid::new_v4(),
            name: submission.name,
            email: submission.email,
            phone: submission.phone,
            message: submission.message,
            submitted_at: OffsetDateTime::now_utc(),
            read: false,
            email_sent: delivered,
            email_error: (!delivered).then(|| CONTACT_EMAIL_ERROR.to_string()),
        };

        let snapshot = {
            let mut state = self.lock();
            state.submissions.insert(0, record.clone());
            state.submissions.clone()
        };

        self.persist(KEY_CONTACT_SUBMISSIONS, &snapshot).await;
        self.feed.publish(ChangeKind::SubmissionsChanged);
        record
    }

    /// Re-attempt the notification email for a stored submission. Returns
    /// the delivery outcome; `false` (with no log entry) for unknown ids.
    pub async fn send_contact_email(&self, id: Uuid) -> bool {
        let (to, body) = {
            let state = self.lock();
            let Some(submission) = state.submissions.iter().find(|entry| entry.id == id) else {
                debug!(%id, "resend requested for unknown submission");
                return false;
            };
            (
                state.content.email_settings.to_email.clone(),
                stored_contact_email_body(submission),
            )
        };

        self.send_email(&to, CONTACT_SUBJECT, &body, EmailKind::Contact)
            .await
    }

    /// Send a test message to the configured inbox to verify SMTP settings.
    pub async fn send_test_email(&self) -> bool {
        let to = self.lock().content.email_settings.to_email.clone();
        let body = format!(
            "This is a test email from your Photography Website admin panel.\n\n\
             If you receive this email, your SMTP configuration is working correctly.\n\n\
             Sent: {}",
            OffsetDateTime::now_utc()
        );

        self.send_email(&to, TEST_SUBJECT, &body, EmailKind::Test)
            .await
    }

    /// Flip the read flag; a no-op for unknown ids.
    pub async fn mark_contact_read(&self, id: Uuid) {
        let snapshot = {
            let mut state = self.lock();
            let Some(submission) = state.submissions.iter_mut().find(|entry| entry.id == id)
            else {
                return;
            };
            submission.read = true;
            state.submissions.clone()
        };

        self.persist(KEY_CONTACT_SUBMISSIONS, &snapshot).await;
        self.feed.publish(ChangeKind::SubmissionsChanged);
    }

    /// Remove a submission; a no-op for unknown ids.
    pub async fn delete_contact(&self, id: Uuid) {
        self.delete_contacts_batch(&[id]).await;
    }

    /// Remove several submissions at once; unknown ids are skipped.
    pub async fn delete_contacts_batch(&self, ids: &[Uuid]) {
        let snapshot = {
            let mut state = self.lock();
            let before = state.submissions.len();
            state.submissions.retain(|entry| !ids.contains(&entry.id));
            if state.submissions.len() == before {
                return;
            }
            state.submissions.clone()
        };

        self.persist(KEY_CONTACT_SUBMISSIONS, &snapshot).await;
        self.feed.publish(ChangeKind::SubmissionsChanged);
    }

    // ---- blog ------------------------------------------------------------

    /// Store a new post, newest first. An empty slug is derived from the
    /// title; when no language variant yields a slug the post id stands in.
    pub async fn save_blog_post(&self, post: NewBlogPost) -> BlogPostRecord {
        let id = Uuid::new_v4();
        let slug = if post.slug.is_empty() {
            bilingual_slug(&post.title).unwrap_or_else(|| {
                let fallback = id.to_string();
                Bilingual::new(fallback.clone(), fallback)
            })
        } else {
            post.slug
        };

        let record = BlogPostRecord {
            id,
            title: post.title,
            content: post.content,
            excerpt: post.excerpt,
            slug,
            featured_image: post.featured_image,
            published_at: post.published_at,
            status: post.status,
            author: post.author,
        };

        let snapshot = {
            let mut state = self.lock();
            state.posts.insert(0, record.clone());
            state.posts.clone()
        };

        self.persist(KEY_BLOG_POSTS, &snapshot).await;
        self.feed.publish(ChangeKind::BlogChanged);
        record
    }

    /// Shallow-merge the patch into the matching post; a no-op for unknown
    /// ids.
    pub async fn update_blog_post(&self, id: Uuid, patch: BlogPostPatch) {
        let snapshot = {
            let mut state = self.lock();
            let Some(post) = state.posts.iter_mut().find(|post| post.id == id) else {
                return;
            };
            if let Some(title) = patch.title {
                post.title = title;
            }
            if let Some(content) = patch.content {
                post.content = content;
            }
            if let Some(excerpt) = patch.excerpt {
                post.excerpt = excerpt;
            }
            if let Some(slug) = patch.slug {
                post.slug = slug;
            }
            if let Some(featured_image) = patch.featured_image {
                post.featured_image = featured_image;
            }
            if let Some(published_at) = patch.published_at {
                post.published_at = published_at;
            }
            if let Some(status) = patch.status {
                post.status = status;
            }
            if let Some(author) = patch.author {
                post.author = author;
            }
            state.posts.clone()
        };

        self.persist(KEY_BLOG_POSTS, &snapshot).await;
        self.feed.publish(ChangeKind::BlogChanged);
    }

    /// Remove a post; a no-op for unknown ids.
    pub async fn delete_blog_post(&self, id: Uuid) {
        let snapshot = {
            let mut state = self.lock();
            let before = state.posts.len();
            state.posts.retain(|post| post.id != id);
            if state.posts.len() == before {
                return;
            }
            state.posts.clone()
        };

        self.persist(KEY_BLOG_POSTS, &snapshot).await;
        self.feed.publish(ChangeKind::BlogChanged);
    }

    // ---- internals -------------------------------------------------------

    /// Dispatch one message under the currently configured settings and
    /// append the audit entry, newest first. Always logs, never errors.
    async fn send_email(&self, to: &str, subject: &str, body: &str, kind: EmailKind) -> bool {
        let settings = self.lock().content.email_settings.clone();
        let outcome = self.mailer.dispatch(&settings, to, subject, body).await;

        let entry = EmailLogRecord {
            id: Uuid::new_v4(),
            timestamp: OffsetDateTime::now_utc(),
            to: to.to_string(),
            subject: subject.to_string(),
            status: outcome.status,
            error: outcome.error.clone(),
            kind,
        };

        let snapshot = {
            let mut state = self.lock();
            state.email_logs.insert(0, entry);
            state.email_logs.clone()
        };

        self.persist(KEY_EMAIL_LOGS, &snapshot).await;
        self.feed.publish(ChangeKind::EmailLogged);
        outcome.delivered()
    }

    fn build_media_record(&self, upload: MediaUpload) -> MediaRecord {
        let MediaUpload {
            filename,
            content_type,
            bytes,
        } = upload;

        let id = Uuid::new_v4();
        let size_bytes = bytes.len() as u64;
        let checksum = hex::encode(Sha256::digest(&bytes));
        let dimensions = imagesize::blob_size(&bytes).ok();
        let content_type = content_type.unwrap_or_else(|| {
            mime_guess::from_path(&filename)
                .first_or_octet_stream()
                .to_string()
        });
        let alt = filename_stem(&filename).to_string();
        let url = self.blobs.register(id, bytes);

        MediaRecord {
            id,
            url,
            alt,
            filename,
            size_bytes,
            content_type,
            checksum,
            width: dimensions.map(|size| size.width as u32),
            height: dimensions.map(|size| size.height as u32),
            uploaded_at: OffsetDateTime::now_utc(),
        }
    }

    /// Serialize and write one durable key. Failures are logged and counted
    /// but never surfaced: the in-memory mutation has already committed.
    async fn persist<T: Serialize>(&self, key: &'static str, value: &T) {
        let payload = match serde_json::to_string(value) {
            Ok(payload) => payload,
            Err(err) => {
                counter!("veduta_persist_failure_total").increment(1);
                warn!(key, error = %err, "failed to encode durable value; in-memory state retained");
                return;
            }
        };

        if let Err(err) = self.kv.put(key, payload).await {
            counter!("veduta_persist_failure_total").increment(1);
            warn!(key, error = %err, "durable write failed; in-memory state retained");
        }
    }

    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn read_value(kv: &Arc<dyn KeyValueStore>, key: &'static str) -> Option<Value> {
    match kv.get(key).await {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key, error = %err, "durable value is not valid JSON; ignoring");
                None
            }
        },
        Ok(None) => None,
        Err(err) => {
            warn!(key, error = %err, "failed to read durable value; ignoring");
            None
        }
    }
}

async fn read_collection<T: DeserializeOwned>(
    kv: &Arc<dyn KeyValueStore>,
    key: &'static str,
) -> Vec<T> {
    match kv.get(key).await {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|err| {
            warn!(key, error = %err, "durable collection is unreadable; starting empty");
            Vec::new()
        }),
        Ok(None) => Vec::new(),
        Err(err) => {
            warn!(key, error = %err, "failed to read durable collection; starting empty");
            Vec::new()
        }
    }
}

fn contact_email_body(submission: &NewContactSubmission) -> String {
    format!(
        "New inquiry from Photography Website\n\n\
         Name: {}\nEmail: {}\nPhone: {}\nMessage: {}\n\n\
         Submitted: {}",
        submission.name,
        submission.email,
        submission.phone,
        submission.message,
        OffsetDateTime::now_utc()
    )
}

fn stored_contact_email_body(submission: &ContactSubmissionRecord) -> String {
    format!(
        "New inquiry from Photography Website\n\n\
         Name: {}\nEmail: {}\nPhone: {}\nMessage: {}\n\n\
         Submitted: {}",
        submission.name,
        submission.email,
        submission.phone,
        submission.message,
        submission.submitted_at
    )
}

/// The filename without its final extension, used as the derived alt text.
fn filename_stem(filename: &str) -> &str {
    match filename.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => filename,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_stem_strips_only_the_final_extension() {
        assert_eq!(filename_stem("family shoot.jpeg"), "family shoot");
        assert_eq!(filename_stem("archive.tar.gz"), "archive.tar");
        assert_eq!(filename_stem("no-extension"), "no-extension");
        assert_eq!(filename_stem(".hidden"), ".hidden");
    }

    #[test]
    fn contact_body_carries_every_form_field() {
        let body = contact_email_body(&NewContactSubmission {
            name: "Dana Levi".into(),
            email: "dana@example.com".into(),
            phone: "050-000-0000".into(),
            message: "Chalaka session for March".into(),
        });
        assert!(body.contains("Name: Dana Levi"));
        assert!(body.contains("Email: dana@example.com"));
        assert!(body.contains("Phone: 050-000-0000"));
        assert!(body.contains("Message: Chalaka session for March"));
    }
}
