//! In-memory icon cache keyed by icon URL.
//!
//! Entries live as long as the cache; there is no eviction. Failed fetches
//! store nothing, so the next request for the same URL goes to the network
//! again.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::icon::IconImage;
use crate::provider::IconSource;
use crate::row::{RowSlots, RowToken};

/// Result of `IconCache::fetch_and_store`
#[derive(Debug, Clone)]
pub enum IconOutcome {
    /// Already cached; no request was made
    Cached(Arc<IconImage>),
    /// Fetched and stored, and the requesting row still shows this request
    Apply(Arc<IconImage>),
    /// Fetched and stored, but the row has been rebound since
    Stale,
    /// Fetch or decode failed; nothing stored
    Failed,
}

impl IconOutcome {
    /// Image to put on the row, if any
    pub fn image(&self) -> Option<&Arc<IconImage>> {
        match self {
            Self::Cached(image) | Self::Apply(image) => Some(image),
            Self::Stale | Self::Failed => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct IconCache {
    entries: RwLock<HashMap<String, Arc<IconImage>>>,
}

impl IconCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, url: &str) -> Option<Arc<IconImage>> {
        self.entries.read().get(url).cloned()
    }

    /// Insert or overwrite the entry for `url`
    pub fn store(&self, url: impl Into<String>, image: Arc<IconImage>) {
        self.entries.write().insert(url.into(), image);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Serve `token.url` from the cache, or fetch, decode and store it.
    ///
    /// The row binding is checked after the fetch completes, not when it
    /// starts: a row recycled in the meantime gets `Stale` even though the
    /// cache is still populated.
    pub async fn fetch_and_store<S: IconSource>(
        &self,
        source: &S,
        slots: &RowSlots,
        token: &RowToken,
    ) -> IconOutcome {
        if let Some(image) = self.lookup(&token.url) {
            return IconOutcome::Cached(image);
        }

        let bytes = match source.fetch(&token.url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!("Icon fetch failed for {}: {}", token.url, e);
                return IconOutcome::Failed;
            }
        };

        let image = match IconImage::decode(&bytes) {
            Ok(image) => Arc::new(image),
            Err(e) => {
                tracing::debug!("Icon decode failed for {}: {}", token.url, e);
                return IconOutcome::Failed;
            }
        };

        self.store(token.url.clone(), image.clone());

        if slots.is_current(token) {
            IconOutcome::Apply(image)
        } else {
            tracing::trace!(
                "Row {} rebound while fetching {}; discarding",
                token.row,
                token.url
            );
            IconOutcome::Stale
        }
    }
}
