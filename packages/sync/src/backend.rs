//! Contracts for the remote block store and the public page cache.

use async_trait::async_trait;
use bento_model::{Block, BlockData, BlockId, BlockType, PageId, PagePatch, PositionUpdate};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RemoteError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Remote store unavailable: {0}")]
    Unavailable(String),

    #[error("Rejected by remote store: {0}")]
    Rejected(String),
}

/// Relational store holding pages and their blocks
#[async_trait]
pub trait BlockBackend: Send + Sync {
    /// Blocks of a page, ascending by position
    async fn fetch_blocks(&self, page_id: &PageId) -> Result<Vec<Block>, RemoteError>;

    /// Create a block at the next free position and return the stored record
    async fn create_block(
        &self,
        page_id: &PageId,
        block_type: BlockType,
        data: BlockData,
    ) -> Result<Block, RemoteError>;

    /// Merge `patch` into the stored block's data
    async fn update_block(&self, id: &BlockId, patch: &BlockData) -> Result<(), RemoteError>;

    async fn delete_block(&self, id: &BlockId) -> Result<(), RemoteError>;

    /// Batch position update. Not transactional.
    async fn reorder_blocks(&self, positions: &[PositionUpdate]) -> Result<(), RemoteError>;

    async fn update_page(&self, page_id: &PageId, patch: &PagePatch) -> Result<(), RemoteError>;
}

/// Public page cache keyed by path
#[async_trait]
pub trait CacheInvalidator: Send + Sync {
    async fn invalidate(&self, path: &str) -> Result<(), RemoteError>;
}
