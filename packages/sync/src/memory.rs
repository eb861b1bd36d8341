//! In-process remote store, used by the reference server and tests.

use crate::backend::{BlockBackend, CacheInvalidator, RemoteError};
use async_trait::async_trait;
use bento_model::{Block, BlockData, BlockId, BlockType, Page, PageId, PagePatch, PositionUpdate};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// Backend operations that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Fetch,
    Create,
    Update,
    Delete,
    Reorder,
    UpdatePage,
    Invalidate,
}

#[derive(Default)]
struct MemoryState {
    pages: HashMap<PageId, Page>,
    blocks: HashMap<BlockId, Block>,
    invalidated: Vec<String>,
    failing: HashSet<Operation>,
}

#[derive(Default)]
pub struct MemoryBackend {
    state: Mutex<MemoryState>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_page(&self, page: Page) {
        self.lock().pages.insert(page.id.clone(), page);
    }

    /// Seed blocks as-is, positions included
    pub fn insert_blocks(&self, blocks: impl IntoIterator<Item = Block>) {
        let mut state = self.lock();
        for block in blocks {
            state.blocks.insert(block.id.clone(), block);
        }
    }

    pub fn page(&self, id: &PageId) -> Option<Page> {
        self.lock().pages.get(id).cloned()
    }

    pub fn page_by_slug(&self, slug: &str) -> Option<Page> {
        self.lock()
            .pages
            .values()
            .find(|p| p.slug == slug)
            .cloned()
    }

    pub fn pages(&self) -> Vec<Page> {
        let mut pages: Vec<Page> = self.lock().pages.values().cloned().collect();
        pages.sort_by(|a, b| a.slug.cmp(&b.slug));
        pages
    }

    /// Paths passed to `invalidate`, oldest first
    pub fn invalidated_paths(&self) -> Vec<String> {
        self.lock().invalidated.clone()
    }

    /// Make every call of `operation` fail until [`MemoryBackend::recover`]
    pub fn fail_on(&self, operation: Operation) {
        self.lock().failing.insert(operation);
    }

    pub fn recover(&self) {
        self.lock().failing.clear();
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        // A poisoned lock only means a test panicked mid-write
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check(state: &MemoryState, operation: Operation) -> Result<(), RemoteError> {
        if state.failing.contains(&operation) {
            Err(RemoteError::Unavailable(format!("{:?} is failing", operation)))
        } else {
            Ok(())
        }
    }

    fn sorted(state: &MemoryState, page_id: &PageId) -> Vec<Block> {
        let mut blocks: Vec<Block> = state
            .blocks
            .values()
            .filter(|b| &b.page_id == page_id)
            .cloned()
            .collect();
        blocks.sort_by(|a, b| a.position.cmp(&b.position).then_with(|| a.id.as_str().cmp(b.id.as_str())));
        blocks
    }
}

#[async_trait]
impl BlockBackend for MemoryBackend {
    async fn fetch_blocks(&self, page_id: &PageId) -> Result<Vec<Block>, RemoteError> {
        let state = self.lock();
        Self::check(&state, Operation::Fetch)?;
        if !state.pages.contains_key(page_id) {
            return Err(RemoteError::NotFound(format!("page {}", page_id)));
        }
        Ok(Self::sorted(&state, page_id))
    }

    async fn create_block(
        &self,
        page_id: &PageId,
        block_type: BlockType,
        data: BlockData,
    ) -> Result<Block, RemoteError> {
        let mut state = self.lock();
        Self::check(&state, Operation::Create)?;
        if !state.pages.contains_key(page_id) {
            return Err(RemoteError::NotFound(format!("page {}", page_id)));
        }

        let position = state
            .blocks
            .values()
            .filter(|b| &b.page_id == page_id)
            .map(|b| b.position + 1)
            .max()
            .unwrap_or(0);

        let block = Block::new(Uuid::new_v4().to_string(), page_id.clone(), block_type)
            .with_data(data)
            .with_position(position);
        state.blocks.insert(block.id.clone(), block.clone());
        Ok(block)
    }

    async fn update_block(&self, id: &BlockId, patch: &BlockData) -> Result<(), RemoteError> {
        let mut state = self.lock();
        Self::check(&state, Operation::Update)?;
        let block = state
            .blocks
            .get_mut(id)
            .ok_or_else(|| RemoteError::NotFound(format!("block {}", id)))?;
        block.data.merge(patch);
        Ok(())
    }

    async fn delete_block(&self, id: &BlockId) -> Result<(), RemoteError> {
        let mut state = self.lock();
        Self::check(&state, Operation::Delete)?;
        state
            .blocks
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| RemoteError::NotFound(format!("block {}", id)))
    }

    async fn reorder_blocks(&self, positions: &[PositionUpdate]) -> Result<(), RemoteError> {
        let mut state = self.lock();
        Self::check(&state, Operation::Reorder)?;
        // Row by row, like the batch upsert it stands in for: unknown ids are
        // skipped, earlier rows stay written
        for update in positions {
            match state.blocks.get_mut(&update.id) {
                Some(block) => block.position = update.position,
                None => tracing::debug!(block = %update.id, "reorder skipped unknown block"),
            }
        }
        Ok(())
    }

    async fn update_page(&self, page_id: &PageId, patch: &PagePatch) -> Result<(), RemoteError> {
        let mut state = self.lock();
        Self::check(&state, Operation::UpdatePage)?;
        let page = state
            .pages
            .get_mut(page_id)
            .ok_or_else(|| RemoteError::NotFound(format!("page {}", page_id)))?;
        page.apply(patch);
        Ok(())
    }
}

#[async_trait]
impl CacheInvalidator for MemoryBackend {
    async fn invalidate(&self, path: &str) -> Result<(), RemoteError> {
        let mut state = self.lock();
        Self::check(&state, Operation::Invalidate)?;
        state.invalidated.push(path.to_string());
        Ok(())
    }
}
