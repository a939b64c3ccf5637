//! Write-once cache of fetched SVG content.
//!
//! Content is stored under its [`AssetUrl`] and shared out as `Arc<str>`,
//! so every consumer of a cached asset holds the same allocation.

use std::collections::HashMap;
use std::sync::Arc;

use crate::resolver::AssetUrl;

/// Cache of fetched SVG markup, keyed by asset URL.
///
/// Entries are immutable once written and are never evicted. The cache
/// lives as long as its owning [`IconLoader`](crate::IconLoader); writes
/// go through the loader, which guarantees each key is written at most
/// once.
#[derive(Debug, Default)]
pub struct SvgCache {
    entries: HashMap<AssetUrl, Arc<str>>,
}

impl SvgCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the cached content for a URL.
    ///
    /// Pure lookup; no side effects.
    pub fn get(&self, url: &AssetUrl) -> Option<Arc<str>> {
        self.entries.get(url).cloned()
    }

    /// Returns true if content for the URL has been cached.
    pub fn contains(&self, url: &AssetUrl) -> bool {
        self.entries.contains_key(url)
    }

    /// Stores fetched content under a URL.
    ///
    /// Each key is written at most once; a second write for the same key
    /// is a caller bug.
    pub fn put(&mut self, url: AssetUrl, content: Arc<str>) {
        let previous = self.entries.insert(url, content);
        debug_assert!(previous.is_none(), "asset cache entries are write-once");
    }

    /// Returns the number of cached assets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
