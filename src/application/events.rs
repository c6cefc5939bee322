//! Change notification for store subscribers.
//!
//! Every committed mutation publishes one [`StoreChange`] so views can
//! re-read the collections they render. Publishing never blocks and never
//! fails the mutation; a feed with no subscribers simply drops events.

use std::sync::atomic::{AtomicU64, Ordering};

use time::OffsetDateTime;
use tokio::sync::broadcast;
use uuid::Uuid;

const FEED_CAPACITY: usize = 256;

/// Monotonic epoch for ordering changes within this process.
pub type Epoch = u64;

/// One committed mutation, as observed by subscribers.
#[derive(Debug, Clone)]
pub struct StoreChange {
    /// Unique identifier for idempotency.
    pub id: Uuid,
    /// Monotonic epoch for ordering within this process.
    pub epoch: Epoch,
    pub kind: ChangeKind,
    pub timestamp: OffsetDateTime,
}

/// What part of the store changed.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeKind {
    /// The content aggregate changed at the given dotted path.
    ContentUpdated { path: String },
    /// Design tokens were applied; carries the resolved CSS custom
    /// properties so a live-preview subscriber can inject them immediately.
    DesignApplied { variables: Vec<(String, String)> },
    MediaChanged,
    GalleryChanged,
    SubmissionsChanged,
    BlogChanged,
    EmailLogged,
    /// The active language changed.
    LanguageChanged { language: crate::domain::types::Language },
}

/// Broadcast feed of committed mutations.
#[derive(Debug)]
pub struct ChangeFeed {
    sender: broadcast::Sender<StoreChange>,
    epoch: AtomicU64,
}

impl ChangeFeed {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(FEED_CAPACITY);
        Self {
            sender,
            epoch: AtomicU64::new(0),
        }
    }

    /// Register a new subscriber. Only changes published after this call are
    /// observed.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.sender.subscribe()
    }

    /// Publish a change to all current subscribers.
    pub fn publish(&self, kind: ChangeKind) -> Epoch {
        let epoch = self.epoch.fetch_add(1, Ordering::Relaxed) + 1;
        let change = StoreChange {
            id: Uuid::new_v4(),
            epoch,
            kind,
            timestamp: OffsetDateTime::now_utc(),
        };
        // An Err here only means nobody is listening.
        let _ = self.sender.send(change);
        epoch
    }

    pub fn current_epoch(&self) -> Epoch {
        self.epoch.load(Ordering::Relaxed)
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}
