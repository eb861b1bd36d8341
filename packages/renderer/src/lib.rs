//! # Bento Renderer
//!
//! One renderer for the editor canvas, both previews and the public page.
//!
//! ```text
//! Page + [Block] ──render_page──► RenderedPage { root: VNode, layout }
//!                                        │
//!                                        └──to_html / page_document──► String
//! ```
//!
//! Tile size comes from `effective_span` alone. Editing affordances are
//! emitted only in [`Mode::EditingCanvas`].

mod block;
mod html;
mod page;
mod vdom;

pub use block::{render_block, render_list_item, Mode, AFFORDANCES};
pub use html::{escape_html, page_document, to_html, HtmlOptions};
pub use page::{render_page, RenderedPage};
pub use vdom::VNode;
