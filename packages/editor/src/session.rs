//! # Edit Session
//!
//! One editor tab's view of a page: the page record, its block store and the
//! gesture engine that mutates it.
//!
//! Every operation applies locally first and returns the [`Effect`]s the host
//! should hand to the persistence layer. Local state is authoritative for the
//! duration of the session; nothing here waits on the network.

use crate::errors::{EditorError, GestureError};
use crate::interaction::{Effect, InteractionEngine};
use crate::store::BlockStore;
use bento_model::{
    Axis, Block, BlockData, BlockId, GridLayout, GridMetrics, LayoutType, Page, PagePatch, Point,
    Theme, Viewport,
};

pub struct EditSession {
    /// Unique session identifier
    pub id: String,

    page: Page,
    store: BlockStore,
    engine: InteractionEngine,
}

impl EditSession {
    /// Open a session on `page` with the blocks fetched for it
    pub fn new(id: impl Into<String>, page: Page, blocks: Vec<Block>) -> Self {
        Self {
            id: id.into(),
            page,
            store: BlockStore::from_blocks(blocks),
            engine: InteractionEngine::default(),
        }
    }

    pub fn with_metrics(mut self, metrics: GridMetrics) -> Self {
        self.engine.set_metrics(metrics);
        self
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn store(&self) -> &BlockStore {
        &self.store
    }

    pub fn engine(&self) -> &InteractionEngine {
        &self.engine
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.engine.set_viewport(viewport);
    }

    pub fn set_metrics(&mut self, metrics: GridMetrics) {
        self.engine.set_metrics(metrics);
    }

    pub fn select(&mut self, id: &BlockId) -> Result<(), EditorError> {
        if self.store.get(id).is_none() {
            return Err(GestureError::BlockNotFound(id.clone()).into());
        }
        self.engine.select(id.clone());
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.engine.clear_selection();
    }

    /// Current grid layout of the page on the active viewport
    pub fn layout(&self) -> GridLayout {
        self.engine.layout(&self.store)
    }

    // --- Gestures ---

    pub fn begin_resize(&mut self, id: &BlockId, axis: Axis) -> Result<Vec<Effect>, EditorError> {
        self.require_grid()?;
        Ok(self.engine.begin_resize(&self.store, id, axis)?)
    }

    pub fn finish_resize(&mut self) -> Result<Vec<Effect>, EditorError> {
        Ok(self.engine.finish_resize(&self.store)?)
    }

    pub fn begin_drag(&mut self, id: &BlockId, point: Point) -> Result<Vec<Effect>, EditorError> {
        self.require_grid()?;
        Ok(self.engine.begin_drag(&self.store, id, point)?)
    }

    pub fn pointer_down(&mut self, point: Point) -> Vec<Effect> {
        self.engine.pointer_down(&self.store, point)
    }

    pub fn pointer_move(&mut self, point: Point) -> Vec<Effect> {
        self.engine.pointer_move(&mut self.store, point)
    }

    pub fn pointer_up(&mut self, point: Point) -> Vec<Effect> {
        self.engine.pointer_up(&mut self.store, point)
    }

    // --- Block lifecycle ---

    /// Append a block the backend has just created
    pub fn add_block(&mut self, block: Block) -> Result<Vec<Effect>, EditorError> {
        self.store.append(block)?;
        Ok(vec![Effect::RenderNeeded])
    }

    /// Delete a block and compact the remaining positions
    pub fn delete_block(&mut self, id: &BlockId) -> Result<Vec<Effect>, EditorError> {
        if self.engine.gesture().block_id() == Some(id) {
            return Err(GestureError::Busy.into());
        }

        self.store.remove(id)?;
        if self.engine.selected() == Some(id) {
            self.engine.clear_selection();
        }

        let mut effects = vec![Effect::DeleteBlock { id: id.clone() }];
        if let Some(positions) = self.store.renumber() {
            effects.push(Effect::PersistOrder { positions });
        }
        effects.push(Effect::RenderNeeded);

        tracing::debug!(block = %id, remaining = self.store.len(), "block deleted");
        Ok(effects)
    }

    /// Content editor change (url, title, caption, ...)
    pub fn edit_content(&mut self, id: &BlockId, patch: BlockData) -> Result<Vec<Effect>, EditorError> {
        self.store.update_content(id, &patch)?;
        Ok(vec![
            Effect::PersistContent {
                id: id.clone(),
                patch,
            },
            Effect::RenderNeeded,
        ])
    }

    // --- Page ---

    pub fn set_theme(&mut self, theme: Theme) -> Vec<Effect> {
        if self.page.theme == theme {
            return Vec::new();
        }
        self.page_update(PagePatch {
            theme: Some(theme),
            ..Default::default()
        })
    }

    /// Switch between classic and grid layout. Refused mid-gesture.
    pub fn set_layout_type(&mut self, layout_type: LayoutType) -> Result<Vec<Effect>, EditorError> {
        if !self.engine.gesture().is_idle() {
            return Err(GestureError::Busy.into());
        }
        if self.page.layout_type == layout_type {
            return Ok(Vec::new());
        }
        Ok(self.page_update(PagePatch {
            layout_type: Some(layout_type),
            ..Default::default()
        }))
    }

    fn page_update(&mut self, patch: PagePatch) -> Vec<Effect> {
        self.page.apply(&patch);
        vec![
            Effect::UpdatePage {
                patch,
                path: self.page.public_path(),
            },
            Effect::RenderNeeded,
        ]
    }

    fn require_grid(&self) -> Result<(), GestureError> {
        if self.page.is_grid() {
            Ok(())
        } else {
            Err(GestureError::GridInactive)
        }
    }
}
