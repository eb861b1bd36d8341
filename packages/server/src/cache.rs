//! Rendered HTML for public pages, keyed by path and viewport.
//!
//! Each path carries a generation that every invalidation bumps. A render
//! records the generation before it fetches and [`PageCache::insert`] drops
//! the result if the path was invalidated in the meantime.

use async_trait::async_trait;
use bento_model::Viewport;
use bento_sync::{CacheInvalidator, RemoteError};
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Default)]
struct Entries {
    pages: HashMap<(String, Viewport), String>,
    generations: HashMap<String, u64>,
}

#[derive(Default)]
pub struct PageCache {
    entries: RwLock<Entries>,
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &str, viewport: Viewport) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .pages
            .get(&(path.to_string(), viewport))
            .cloned()
    }

    /// Current generation of `path`; read it before fetching the page
    pub fn generation(&self, path: &str) -> u64 {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .generations
            .get(path)
            .copied()
            .unwrap_or(0)
    }

    /// Store HTML rendered from data fetched at `generation`. Returns `false`
    /// and stores nothing when `path` was invalidated since.
    pub fn insert(&self, path: &str, viewport: Viewport, generation: u64, html: String) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        if entries.generations.get(path).copied().unwrap_or(0) != generation {
            return false;
        }
        entries.pages.insert((path.to_string(), viewport), html);
        true
    }

    /// Drop every viewport's entry for `path` and bump its generation.
    /// Returns how many entries were removed.
    pub fn remove_path(&self, path: &str) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        *entries.generations.entry(path.to_string()).or_insert(0) += 1;
        let before = entries.pages.len();
        entries.pages.retain(|(cached, _), _| cached != path);
        before - entries.pages.len()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .pages
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CacheInvalidator for PageCache {
    async fn invalidate(&self, path: &str) -> Result<(), RemoteError> {
        let removed = self.remove_path(path);
        tracing::debug!(path, removed, "cache invalidated");
        Ok(())
    }
}
