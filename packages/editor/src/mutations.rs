//! # Block Mutations
//!
//! The sanctioned ways to change a page's block sequence.
//!
//! ## Mutation Semantics
//!
//! ### Append
//! - Inserted at the end with `position = max + 1` (0 on an empty page)
//!
//! ### Remove
//! - Removes the block only; siblings keep their positions until the
//!   caller runs `BlockStore::renumber`
//!
//! ### UpdateGeometry / UpdateContent
//! - Shallow merge into `data`; keys absent from the patch are untouched
//! - Never changes `position`
//!
//! ### Reorder
//! - Array move: the element at `from` is reinserted at `to`, everything in
//!   between shifts by one slot
//! - Positions are not recomputed here
//!
//! Unknown ids fail with `BlockNotFound` and leave the store unchanged.

use crate::store::BlockStore;
use bento_model::{Block, BlockData, BlockId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BlockMutation {
    /// Add a block at the end of the page
    Append { block: Block },

    /// Remove a block
    Remove { id: BlockId },

    /// Merge span keys into a block's data
    UpdateGeometry { id: BlockId, patch: BlockData },

    /// Merge content fields into a block's data
    UpdateContent { id: BlockId, patch: BlockData },

    /// Move the block at `from` to `to`
    Reorder { from: usize, to: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Block not found: {0}")]
    BlockNotFound(BlockId),

    #[error("Index {index} out of range for {len} blocks")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Block already exists: {0}")]
    DuplicateBlock(BlockId),
}

impl BlockMutation {
    /// Apply mutation to the store
    pub fn apply(&self, store: &mut BlockStore) -> Result<(), MutationError> {
        match self {
            BlockMutation::Append { block } => store.append(block.clone()).map(|_| ()),
            BlockMutation::Remove { id } => store.remove(id).map(|_| ()),
            BlockMutation::UpdateGeometry { id, patch } => store.update_geometry(id, patch),
            BlockMutation::UpdateContent { id, patch } => store.update_content(id, patch),
            BlockMutation::Reorder { from, to } => store.reorder(*from, *to),
        }
    }

    /// Block this mutation targets, if it names one
    pub fn target(&self) -> Option<&BlockId> {
        match self {
            BlockMutation::Append { block } => Some(&block.id),
            BlockMutation::Remove { id }
            | BlockMutation::UpdateGeometry { id, .. }
            | BlockMutation::UpdateContent { id, .. } => Some(id),
            BlockMutation::Reorder { .. } => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BlockMutation::Append { .. } => "append",
            BlockMutation::Remove { .. } => "remove",
            BlockMutation::UpdateGeometry { .. } => "updateGeometry",
            BlockMutation::UpdateContent { .. } => "updateContent",
            BlockMutation::Reorder { .. } => "reorder",
        }
    }
}

/// Result of applying a mutation
#[derive(Debug, Clone, PartialEq)]
pub struct MutationResult {
    /// Store version after the mutation
    pub version: u64,
}
