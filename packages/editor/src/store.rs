//! # Block Store
//!
//! Ordered block sequence for the page open in the editor. This is the single
//! source of truth the renderer draws from and the interaction engine
//! mutates.
//!
//! ## Lifecycle
//!
//! ```text
//! fetch → load → mutate (geometry / content / order) → renumber → persist
//! ```
//!
//! The store has exactly one writer (the editing session); nothing here is
//! synchronized.

use crate::mutations::{BlockMutation, MutationError, MutationResult};
use bento_model::{Block, BlockData, BlockId, PositionUpdate};

#[derive(Debug, Clone, Default)]
pub struct BlockStore {
    blocks: Vec<Block>,

    /// Increments on each successful mutation
    version: u64,
}

impl BlockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with `blocks` in the given order
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        let mut store = Self::new();
        store.load(blocks);
        store
    }

    /// Replace the whole sequence. The remote store returns blocks sorted by
    /// ascending position, so they are taken as-is.
    pub fn load(&mut self, blocks: Vec<Block>) {
        self.blocks = blocks;
        self.version += 1;
    }

    /// Apply a mutation
    pub fn apply(&mut self, mutation: &BlockMutation) -> Result<MutationResult, MutationError> {
        mutation.apply(self)?;
        Ok(MutationResult {
            version: self.version,
        })
    }

    /// Insert at the end with the next free position
    pub fn append(&mut self, mut block: Block) -> Result<&Block, MutationError> {
        if self.index_of(&block.id).is_some() {
            return Err(MutationError::DuplicateBlock(block.id));
        }

        block.position = self
            .blocks
            .iter()
            .map(|b| b.position + 1)
            .max()
            .unwrap_or(0);
        self.blocks.push(block);
        self.version += 1;

        Ok(&self.blocks[self.blocks.len() - 1])
    }

    /// Remove a block. Remaining positions are left as they are.
    pub fn remove(&mut self, id: &BlockId) -> Result<Block, MutationError> {
        let index = self.require(id)?;
        self.version += 1;
        Ok(self.blocks.remove(index))
    }

    pub fn update_geometry(&mut self, id: &BlockId, patch: &BlockData) -> Result<(), MutationError> {
        self.merge_data(id, patch)
    }

    pub fn update_content(&mut self, id: &BlockId, patch: &BlockData) -> Result<(), MutationError> {
        self.merge_data(id, patch)
    }

    fn merge_data(&mut self, id: &BlockId, patch: &BlockData) -> Result<(), MutationError> {
        let index = self.require(id)?;
        self.blocks[index].data.merge(patch);
        self.version += 1;
        Ok(())
    }

    /// Array move of the block at `from` to `to`
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), MutationError> {
        let len = self.blocks.len();
        for index in [from, to] {
            if index >= len {
                return Err(MutationError::IndexOutOfRange { index, len });
            }
        }

        if from != to {
            let block = self.blocks.remove(from);
            self.blocks.insert(to, block);
            self.version += 1;
        }
        Ok(())
    }

    /// Set `position = index` for every block. Returns the full set of
    /// `{id, position}` pairs when anything changed, `None` otherwise.
    pub fn renumber(&mut self) -> Option<Vec<PositionUpdate>> {
        let mut changed = false;
        for (index, block) in self.blocks.iter_mut().enumerate() {
            let position = index as u32;
            if block.position != position {
                block.position = position;
                changed = true;
            }
        }

        if changed {
            self.version += 1;
            Some(self.positions())
        } else {
            None
        }
    }

    /// Current `{id, position}` pairs in sequence order
    pub fn positions(&self) -> Vec<PositionUpdate> {
        self.blocks
            .iter()
            .map(|b| PositionUpdate {
                id: b.id.clone(),
                position: b.position,
            })
            .collect()
    }

    pub fn get(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| &b.id == id)
    }

    pub fn index_of(&self, id: &BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| &b.id == id)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn ids(&self) -> Vec<BlockId> {
        self.blocks.iter().map(|b| b.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    fn require(&self, id: &BlockId) -> Result<usize, MutationError> {
        self.index_of(id)
            .ok_or_else(|| MutationError::BlockNotFound(id.clone()))
    }
}
