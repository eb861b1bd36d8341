//! Error types for the editor

use bento_model::BlockId;
use thiserror::Error;

/// A gesture transition that cannot fire from the current state
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GestureError {
    #[error("Another gesture is already active")]
    Busy,

    #[error("Block not found: {0}")]
    BlockNotFound(BlockId),

    #[error("No resize session is open")]
    NotResizing,

    #[error("Grid layout is not active for this page")]
    GridInactive,
}

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error("Gesture error: {0}")]
    Gesture(#[from] GestureError),
}
