//! Session-local storage for uploaded payload bytes.
//!
//! Mirrors the browser object-URL model the original site relied on: the
//! durable store keeps only metadata, while the bytes behind a display URL
//! live in process memory and vanish on restart. A display URL from a
//! previous session therefore dangles, which is expected.

use bytes::Bytes;
use dashmap::DashMap;
use uuid::Uuid;

const URL_SCHEME: &str = "blob:veduta/";

/// In-memory registry mapping media ids to their payload bytes.
#[derive(Debug, Default)]
pub struct BlobRegistry {
    entries: DashMap<Uuid, Bytes>,
}

impl BlobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a payload and return its session-local display URL.
    pub fn register(&self, id: Uuid, payload: Bytes) -> String {
        self.entries.insert(id, payload);
        Self::url_for(id)
    }

    /// The bytes behind a registered id, if still present this session.
    pub fn payload(&self, id: Uuid) -> Option<Bytes> {
        self.entries.get(&id).map(|entry| entry.value().clone())
    }

    /// Release a payload; a no-op for unknown or already-released ids.
    pub fn release(&self, id: Uuid) {
        self.entries.remove(&id);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The display URL for a media id, whether or not bytes are registered.
    pub fn url_for(id: Uuid) -> String {
        format!("{URL_SCHEME}{id}")
    }
}
