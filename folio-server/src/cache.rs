//! Time-boxed cache of the full library listing.
//!
//! A single-slot read-through cache: `/library` serves from here until the
//! entry expires, then reloads from the database. Writes through the book
//! endpoints do not invalidate the slot; the listing may lag by up to the
//! TTL.

use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::library::LibraryPayload;

struct CacheEntry {
    payload: LibraryPayload,
    expires_at: Instant,
}

pub struct LibraryCache {
    slot: RwLock<Option<CacheEntry>>,
    ttl: Duration,
}

impl LibraryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slot: RwLock::new(None),
            ttl,
        }
    }

    /// Get the cached listing, or `None` when empty or expired.
    pub async fn get(&self) -> Option<LibraryPayload> {
        let slot = self.slot.read().await;

        if let Some(entry) = slot.as_ref() {
            if Instant::now() < entry.expires_at {
                return Some(entry.payload.clone());
            }
        }

        None
    }

    /// Replace the cached listing.
    pub async fn set(&self, payload: LibraryPayload) {
        let entry = CacheEntry {
            payload,
            expires_at: Instant::now() + self.ttl,
        };
        *self.slot.write().await = Some(entry);
    }

    /// Empty the cache.
    pub async fn clear(&self) {
        *self.slot.write().await = None;
    }
}
