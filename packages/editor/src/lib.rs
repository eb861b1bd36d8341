//! # Bento Editor
//!
//! Editing core for grid ("bento") pages.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: blocks, spans, grid layout           │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: BlockStore + gestures               │
//! │  - Ordered block sequence                   │
//! │  - Resize sessions and live-swap drags      │
//! │  - Effects for the persistence layer        │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ sync: fire-and-forget remote writes         │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Local state is authoritative**: the store is never rolled back
//! 2. **One gesture at a time**: transitions refuse to fire from the wrong state
//! 3. **Array order is the truth**: `position` is renumbered from it on commit
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bento_editor::{EditSession, Effect};
//! use bento_model::{Axis, BlockId, Point};
//!
//! let mut session = EditSession::new("tab-1", page, blocks);
//!
//! // Widen a block by one column
//! session.begin_resize(&BlockId::new("b1"), Axis::X)?;
//! session.pointer_down(Point::new(100.0, 40.0));
//! session.pointer_move(Point::new(280.0, 40.0));
//! session.pointer_up(Point::new(280.0, 40.0));
//! let effects = session.finish_resize()?;
//!
//! // Hand the effects to the synchronizer; writes run in the background
//! for handle in synchronizer.apply(effects) {
//!     handle.await?;
//! }
//! ```

mod errors;
mod interaction;
mod mutations;
mod session;
mod store;

pub use errors::{EditorError, GestureError};
pub use interaction::{Effect, Gesture, InteractionEngine};
pub use mutations::{BlockMutation, MutationError, MutationResult};
pub use session::EditSession;
pub use store::BlockStore;
