//! # Persistence Synchronizer
//!
//! Pushes local edits to the remote store without blocking the editor.
//!
//! - Geometry and content edits: one partial update per block
//! - Reorders: one batch of `{id, position}` pairs
//! - Theme and layout changes: page update, then cache invalidation
//!
//! Writes are fire-and-forget. A failure becomes an error [`Notification`];
//! local state is never rolled back and nothing is retried. Writes are not
//! ordered against each other, so the last one to complete wins remotely.

use crate::backend::{BlockBackend, CacheInvalidator, RemoteError};
use crate::notify::{Notification, Notifier};
use bento_editor::Effect;
use bento_model::{Block, BlockData, BlockId, BlockType, Page, PageId, PagePatch, PositionUpdate};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub struct Synchronizer {
    backend: Arc<dyn BlockBackend>,
    invalidator: Arc<dyn CacheInvalidator>,
    page_id: PageId,
    public_path: String,
    notifier: Notifier,
}

impl Synchronizer {
    /// Synchronizer for `page` plus the receiving end of its notifications
    pub fn new(
        backend: Arc<dyn BlockBackend>,
        invalidator: Arc<dyn CacheInvalidator>,
        page: &Page,
    ) -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (notifier, rx) = Notifier::channel();
        let sync = Self {
            backend,
            invalidator,
            page_id: page.id.clone(),
            public_path: page.public_path(),
            notifier,
        };
        (sync, rx)
    }

    pub fn page_id(&self) -> &PageId {
        &self.page_id
    }

    /// Initial load for an edit session
    pub async fn fetch_blocks(&self) -> Result<Vec<Block>, RemoteError> {
        self.backend.fetch_blocks(&self.page_id).await
    }

    /// Create a block remotely. Awaited: the caller appends the returned
    /// record to its store. `None` after a failure has been notified.
    pub async fn create_block(&self, block_type: BlockType, data: BlockData) -> Option<Block> {
        match self
            .backend
            .create_block(&self.page_id, block_type, data)
            .await
        {
            Ok(block) => {
                tracing::info!(block = %block.id, kind = block_type.as_str(), "block created");
                invalidate(&*self.invalidator, &self.public_path, &self.notifier).await;
                Some(block)
            }
            Err(e) => {
                report(&self.notifier, "Could not add block", &e);
                None
            }
        }
    }

    /// Route effects from the editor. Effects with no remote counterpart
    /// are skipped.
    pub fn apply(&self, effects: Vec<Effect>) -> Vec<JoinHandle<()>> {
        effects
            .into_iter()
            .filter_map(|effect| match effect {
                Effect::PersistGeometry { id, patch } | Effect::PersistContent { id, patch } => {
                    Some(self.update_block(id, patch))
                }
                Effect::PersistOrder { positions } => Some(self.reorder(positions)),
                Effect::DeleteBlock { id } => Some(self.delete_block(id)),
                Effect::UpdatePage { patch, path } => Some(self.update_page(patch, path)),
                Effect::RenderNeeded | Effect::SuppressScroll { .. } => None,
            })
            .collect()
    }

    /// Partial update of one block's data
    pub fn update_block(&self, id: BlockId, patch: BlockData) -> JoinHandle<()> {
        let backend = self.backend.clone();
        let invalidator = self.invalidator.clone();
        let notifier = self.notifier.clone();
        let path = self.public_path.clone();

        tokio::spawn(async move {
            match backend.update_block(&id, &patch).await {
                Ok(()) => {
                    tracing::debug!(block = %id, keys = patch.len(), "block updated");
                    invalidate(&*invalidator, &path, &notifier).await;
                }
                Err(e) => report(&notifier, "Could not save block", &e),
            }
        })
    }

    pub fn reorder(&self, positions: Vec<PositionUpdate>) -> JoinHandle<()> {
        let backend = self.backend.clone();
        let invalidator = self.invalidator.clone();
        let notifier = self.notifier.clone();
        let path = self.public_path.clone();

        tokio::spawn(async move {
            match backend.reorder_blocks(&positions).await {
                Ok(()) => {
                    tracing::debug!(count = positions.len(), "block order saved");
                    invalidate(&*invalidator, &path, &notifier).await;
                }
                Err(e) => report(&notifier, "Could not save block order", &e),
            }
        })
    }

    pub fn delete_block(&self, id: BlockId) -> JoinHandle<()> {
        let backend = self.backend.clone();
        let invalidator = self.invalidator.clone();
        let notifier = self.notifier.clone();
        let path = self.public_path.clone();

        tokio::spawn(async move {
            match backend.delete_block(&id).await {
                Ok(()) => {
                    tracing::info!(block = %id, "block deleted");
                    invalidate(&*invalidator, &path, &notifier).await;
                }
                Err(e) => report(&notifier, "Could not delete block", &e),
            }
        })
    }

    /// Page update followed by invalidation of `path`
    pub fn update_page(&self, patch: PagePatch, path: String) -> JoinHandle<()> {
        let backend = self.backend.clone();
        let invalidator = self.invalidator.clone();
        let notifier = self.notifier.clone();
        let page_id = self.page_id.clone();

        tokio::spawn(async move {
            match backend.update_page(&page_id, &patch).await {
                Ok(()) => {
                    tracing::info!(page = %page_id, path = %path, "page updated");
                    invalidate(&*invalidator, &path, &notifier).await;
                }
                Err(e) => report(&notifier, "Could not save page settings", &e),
            }
        })
    }
}

async fn invalidate(invalidator: &dyn CacheInvalidator, path: &str, notifier: &Notifier) {
    if let Err(e) = invalidator.invalidate(path).await {
        report(notifier, "Public page may be out of date", &e);
    }
}

fn report(notifier: &Notifier, message: &str, error: &RemoteError) {
    tracing::warn!(error = %error, "{}", message);
    notifier.send(Notification::error(format!("{}: {}", message, error)));
}
