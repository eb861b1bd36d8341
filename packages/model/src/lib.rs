//! # Bento Model
//!
//! Data model shared by the editor, the synchronizer and the renderer.
//!
//! ```text
//! Block + Page ─┬─► geometry: stored spans → effective spans per viewport
//!               └─► layout:   spans + order → grid placements + pixel rects
//! ```
//!
//! Everything in this crate is pure: no I/O, no interior mutability.

pub mod block;
pub mod geometry;
pub mod layout;
pub mod page;

pub use block::{Block, BlockData, BlockId, BlockType, PageId, PositionUpdate};
pub use geometry::{
    clamp_span, column_count_for, effective_span, Axis, Span, SpanKeys, Viewport, MAX_ROW_SPAN,
};
pub use layout::{GridLayout, GridMetrics, Placement, Point, Rect};
pub use page::{ButtonStyle, LayoutType, Page, PagePatch, Theme};
