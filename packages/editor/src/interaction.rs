//! # Drag/Resize Interaction Engine
//!
//! Turns a continuous pointer path into discrete store mutations.
//!
//! ```text
//!            begin_resize                 begin_drag
//!   ┌──────────────────────┐   Idle   ┌──────────────────────┐
//!   ▼                      └──────────┘                      ▼
//! Resizing ── finish_resize ──► Idle ◄── pointer_up ── Dragging
//!   │  ▲                                                  │  ▲
//!   └──┘ pointer down/move/up                             └──┘ pointer_move
//! ```
//!
//! - Only one gesture exists at a time; transitions refuse to fire from the
//!   wrong state instead of relying on scattered flags.
//! - A resize session survives pointer release. Each press re-anchors on the
//!   live span, so consecutive nudges stack.
//! - A drag swaps live: every time the pointer crosses into another block the
//!   dragged block moves there immediately. Release commits the last valid
//!   index; there is no cancel.
//!
//! The engine never waits on persistence. It returns [`Effect`]s and the host
//! decides what to do with them.

use crate::errors::GestureError;
use crate::store::BlockStore;
use bento_model::{
    clamp_span, effective_span, Axis, BlockData, BlockId, GridLayout, GridMetrics, PagePatch,
    Point, PositionUpdate, SpanKeys, Viewport,
};
use serde::{Deserialize, Serialize};

/// Active pointer gesture
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,

    Resizing {
        block_id: BlockId,
        axis: Axis,
        /// Viewport captured when the session opened; decides which span
        /// keys are written
        viewport: Viewport,
        /// Cell size of the opening viewport; one cell of pointer travel is
        /// one span step
        metrics: GridMetrics,
        /// Span at the start of the current press
        initial_span: u32,
        /// Span when the session opened
        opened_span: u32,
        /// Pointer position of the current press, `None` between presses
        anchor: Option<Point>,
    },

    Dragging {
        block_id: BlockId,
        origin_index: usize,
        current_index: usize,
        anchor: Point,
    },
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }

    /// Block the gesture operates on
    pub fn block_id(&self) -> Option<&BlockId> {
        match self {
            Gesture::Idle => None,
            Gesture::Resizing { block_id, .. } | Gesture::Dragging { block_id, .. } => {
                Some(block_id)
            }
        }
    }
}

/// Work for the host after an input event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Effect {
    /// The store changed; redraw
    RenderNeeded,

    /// Enable or disable touch-move default scrolling suppression
    SuppressScroll { enabled: bool },

    /// Send a partial geometry update for one block
    PersistGeometry { id: BlockId, patch: BlockData },

    /// Send a partial content update for one block
    PersistContent { id: BlockId, patch: BlockData },

    /// Send a batch position update for the whole page
    PersistOrder { positions: Vec<PositionUpdate> },

    /// Delete a block remotely
    DeleteBlock { id: BlockId },

    /// Send a top-level page update, then invalidate `path`
    UpdatePage { patch: PagePatch, path: String },
}

/// Gesture controller for one editing session
#[derive(Debug, Clone, Default)]
pub struct InteractionEngine {
    gesture: Gesture,
    selected: Option<BlockId>,
    viewport: Viewport,
    metrics: GridMetrics,
}

impl InteractionEngine {
    pub fn new(viewport: Viewport, metrics: GridMetrics) -> Self {
        Self {
            gesture: Gesture::Idle,
            selected: None,
            viewport,
            metrics,
        }
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn metrics(&self) -> &GridMetrics {
        &self.metrics
    }

    /// Viewport signal from the host. An open resize session keeps the
    /// viewport and metrics it was opened with.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn set_metrics(&mut self, metrics: GridMetrics) {
        self.metrics = metrics;
    }

    pub fn selected(&self) -> Option<&BlockId> {
        self.selected.as_ref()
    }

    /// Select a block to expose its controls
    pub fn select(&mut self, id: BlockId) {
        self.selected = Some(id);
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Whether touch scrolling must be suppressed right now
    pub fn suppresses_scroll(&self) -> bool {
        !self.gesture.is_idle()
    }

    /// Layout the hit test runs against
    pub fn layout(&self, store: &BlockStore) -> GridLayout {
        GridLayout::compute(store.blocks(), self.viewport, &self.metrics)
    }

    /// Open a resize session on `id` along `axis`
    pub fn begin_resize(
        &mut self,
        store: &BlockStore,
        id: &BlockId,
        axis: Axis,
    ) -> Result<Vec<Effect>, GestureError> {
        if !self.gesture.is_idle() {
            return Err(GestureError::Busy);
        }

        let block = store
            .get(id)
            .ok_or_else(|| GestureError::BlockNotFound(id.clone()))?;
        let span = effective_span(block, self.viewport).get(axis);

        tracing::debug!(block = %id, ?axis, span, "resize session opened");

        self.gesture = Gesture::Resizing {
            block_id: id.clone(),
            axis,
            viewport: self.viewport,
            metrics: self.metrics,
            initial_span: span,
            opened_span: span,
            anchor: None,
        };
        self.selected = Some(id.clone());

        Ok(vec![Effect::SuppressScroll { enabled: true }])
    }

    /// Close the resize session ("done"). Emits a geometry update when the
    /// span differs from where the session started.
    pub fn finish_resize(&mut self, store: &BlockStore) -> Result<Vec<Effect>, GestureError> {
        let Gesture::Resizing {
            block_id,
            axis,
            viewport,
            opened_span,
            ..
        } = &self.gesture
        else {
            return Err(GestureError::NotResizing);
        };

        let mut effects = vec![Effect::SuppressScroll { enabled: false }];

        if let Some(block) = store.get(block_id) {
            let span = effective_span(block, *viewport).get(*axis);
            if span != *opened_span {
                let key = SpanKeys::for_viewport(*viewport).key(*axis);
                effects.push(Effect::PersistGeometry {
                    id: block_id.clone(),
                    patch: BlockData::new().with(key, span),
                });
            }
            tracing::debug!(block = %block_id, span, "resize session closed");
        }

        self.gesture = Gesture::Idle;
        Ok(effects)
    }

    /// Start dragging `id` from its move affordance
    pub fn begin_drag(
        &mut self,
        store: &BlockStore,
        id: &BlockId,
        point: Point,
    ) -> Result<Vec<Effect>, GestureError> {
        if !self.gesture.is_idle() {
            return Err(GestureError::Busy);
        }

        let index = store
            .index_of(id)
            .ok_or_else(|| GestureError::BlockNotFound(id.clone()))?;

        tracing::debug!(block = %id, index, "drag started");

        self.gesture = Gesture::Dragging {
            block_id: id.clone(),
            origin_index: index,
            current_index: index,
            anchor: point,
        };

        Ok(vec![Effect::SuppressScroll { enabled: true }])
    }

    /// Pointer pressed. Anchors the next press of an open resize session;
    /// ignored otherwise.
    pub fn pointer_down(&mut self, store: &BlockStore, point: Point) -> Vec<Effect> {
        if let Gesture::Resizing {
            block_id,
            axis,
            viewport,
            initial_span,
            anchor,
            ..
        } = &mut self.gesture
        {
            if let Some(block) = store.get(block_id) {
                *initial_span = effective_span(block, *viewport).get(*axis);
                *anchor = Some(point);
            }
        }
        Vec::new()
    }

    pub fn pointer_move(&mut self, store: &mut BlockStore, point: Point) -> Vec<Effect> {
        match self.gesture.clone() {
            Gesture::Idle => Vec::new(),
            Gesture::Resizing {
                block_id,
                axis,
                viewport,
                metrics,
                initial_span,
                anchor: Some(anchor),
                ..
            } => self.resize_move(
                store,
                &block_id,
                axis,
                (viewport, metrics),
                initial_span,
                anchor,
                point,
            ),
            Gesture::Resizing { anchor: None, .. } => Vec::new(),
            Gesture::Dragging { block_id, .. } => self.drag_move(store, &block_id, point),
        }
    }

    /// Pointer released (or touch ended). Ends a drag and commits the order;
    /// a resize session stays open.
    pub fn pointer_up(&mut self, store: &mut BlockStore, _point: Point) -> Vec<Effect> {
        if let Gesture::Resizing { anchor, .. } = &mut self.gesture {
            *anchor = None;
            return Vec::new();
        }

        let Gesture::Dragging {
            block_id,
            origin_index,
            current_index,
            ..
        } = std::mem::take(&mut self.gesture)
        else {
            return Vec::new();
        };

        tracing::debug!(block = %block_id, origin_index, current_index, "drag ended");

        let mut effects = vec![Effect::SuppressScroll { enabled: false }];
        if let Some(positions) = store.renumber() {
            effects.push(Effect::PersistOrder { positions });
            effects.push(Effect::RenderNeeded);
        }
        effects
    }

    #[allow(clippy::too_many_arguments)]
    fn resize_move(
        &mut self,
        store: &mut BlockStore,
        block_id: &BlockId,
        axis: Axis,
        (viewport, metrics): (Viewport, GridMetrics),
        initial_span: u32,
        anchor: Point,
        point: Point,
    ) -> Vec<Effect> {
        let Some(block) = store.get(block_id) else {
            return self.abandon(block_id);
        };

        let (delta, cell) = match axis {
            Axis::X => (point.x - anchor.x, metrics.cell_width(viewport)),
            Axis::Y => (point.y - anchor.y, metrics.cell_height),
        };
        if cell <= 0.0 {
            return Vec::new();
        }

        let steps = (delta / cell).round();
        let candidate = clamp_span(axis, initial_span as f64 + steps, viewport);
        let current = effective_span(block, viewport).get(axis);
        if candidate == current {
            return Vec::new();
        }

        let key = SpanKeys::for_viewport(viewport).key(axis);
        match store.update_geometry(block_id, &BlockData::new().with(key, candidate)) {
            Ok(()) => {
                tracing::trace!(block = %block_id, key, candidate, "live resize");
                vec![Effect::RenderNeeded]
            }
            Err(e) => {
                tracing::debug!(error = %e, "resize update dropped");
                Vec::new()
            }
        }
    }

    fn drag_move(&mut self, store: &mut BlockStore, block_id: &BlockId, point: Point) -> Vec<Effect> {
        let Some(current_index) = store.index_of(block_id) else {
            return self.abandon(block_id);
        };

        let Some(over) = self.layout(store).hit_test(point) else {
            return Vec::new();
        };
        if over == current_index || over >= store.len() {
            return Vec::new();
        }

        if let Err(e) = store.reorder(current_index, over) {
            tracing::debug!(error = %e, "drag reorder dropped");
            return Vec::new();
        }

        if let Gesture::Dragging {
            current_index: tracked,
            ..
        } = &mut self.gesture
        {
            *tracked = over;
        }

        tracing::trace!(block = %block_id, from = current_index, to = over, "live swap");
        vec![Effect::RenderNeeded]
    }

    /// The gesture's block vanished from the store; nothing it does can have
    /// an effect any more.
    fn abandon(&mut self, block_id: &BlockId) -> Vec<Effect> {
        tracing::debug!(block = %block_id, "gesture target missing, returning to idle");
        self.gesture = Gesture::Idle;
        if self.selected.as_ref() == Some(block_id) {
            self.selected = None;
        }
        vec![Effect::SuppressScroll { enabled: false }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bento_model::{Block, BlockType};

    fn store_of(ids: &[&str]) -> BlockStore {
        let mut store = BlockStore::new();
        for id in ids {
            store.append(Block::new(*id, "p1", BlockType::Link)).unwrap();
        }
        store
    }

    fn engine() -> InteractionEngine {
        // 4 columns of 100px with 12px gaps, rows of 100px
        InteractionEngine::new(Viewport::Desktop, GridMetrics::new(436.0, 100.0, 12.0))
    }

    fn id(s: &str) -> BlockId {
        BlockId::new(s)
    }

    #[test]
    fn test_only_one_gesture_at_a_time() {
        let store = store_of(&["a", "b"]);
        let mut engine = engine();

        engine.begin_drag(&store, &id("a"), Point::new(10.0, 10.0)).unwrap();
        assert_eq!(
            engine.begin_resize(&store, &id("b"), Axis::X),
            Err(GestureError::Busy)
        );
        assert_eq!(
            engine.begin_resize(&store, &id("a"), Axis::Y),
            Err(GestureError::Busy)
        );
        assert_eq!(
            engine.begin_drag(&store, &id("b"), Point::new(120.0, 10.0)),
            Err(GestureError::Busy)
        );
    }

    #[test]
    fn test_cannot_drag_block_with_open_resize() {
        let store = store_of(&["a"]);
        let mut engine = engine();

        engine.begin_resize(&store, &id("a"), Axis::X).unwrap();
        assert_eq!(
            engine.begin_drag(&store, &id("a"), Point::new(10.0, 10.0)),
            Err(GestureError::Busy)
        );
    }

    #[test]
    fn test_unknown_block_is_refused() {
        let store = store_of(&["a"]);
        let mut engine = engine();
        assert_eq!(
            engine.begin_resize(&store, &id("x"), Axis::X),
            Err(GestureError::BlockNotFound(id("x")))
        );
        assert!(engine.gesture().is_idle());
    }

    #[test]
    fn test_finish_without_session() {
        let store = store_of(&["a"]);
        let mut engine = engine();
        assert_eq!(engine.finish_resize(&store), Err(GestureError::NotResizing));
    }

    #[test]
    fn test_resize_y_uses_cell_height() {
        let mut store = store_of(&["a"]);
        let mut engine = engine();

        engine.begin_resize(&store, &id("a"), Axis::Y).unwrap();
        engine.pointer_down(&store, Point::new(50.0, 50.0));
        let effects = engine.pointer_move(&mut store, Point::new(50.0, 260.0));
        assert_eq!(effects, vec![Effect::RenderNeeded]);

        let block = store.get(&id("a")).unwrap();
        assert_eq!(block.data.get_number("gridSpanY"), Some(3.0));
        assert_eq!(block.data.get_number("gridSpanX"), None);
    }

    #[test]
    fn test_resize_move_without_press_is_ignored() {
        let mut store = store_of(&["a"]);
        let mut engine = engine();

        engine.begin_resize(&store, &id("a"), Axis::X).unwrap();
        assert!(engine.pointer_move(&mut store, Point::new(500.0, 0.0)).is_empty());
        assert_eq!(store.get(&id("a")).unwrap().data.get_number("gridSpanX"), None);
    }

    #[test]
    fn test_resize_only_mutates_on_cell_boundary() {
        let mut store = store_of(&["a"]);
        let mut engine = engine();

        engine.begin_resize(&store, &id("a"), Axis::X).unwrap();
        engine.pointer_down(&store, Point::new(0.0, 0.0));
        let version = store.version();

        // 40px is under half a cell
        assert!(engine.pointer_move(&mut store, Point::new(40.0, 0.0)).is_empty());
        assert_eq!(store.version(), version);

        assert_eq!(
            engine.pointer_move(&mut store, Point::new(60.0, 0.0)),
            vec![Effect::RenderNeeded]
        );
        // Same cell again: no second mutation
        assert!(engine.pointer_move(&mut store, Point::new(90.0, 0.0)).is_empty());
        assert_eq!(store.version(), version + 1);
    }

    #[test]
    fn test_mobile_resize_writes_mobile_keys() {
        let mut store = store_of(&["a"]);
        let mut engine = engine();
        engine.set_viewport(Viewport::Mobile);

        engine.begin_resize(&store, &id("a"), Axis::X).unwrap();
        engine.pointer_down(&store, Point::new(0.0, 0.0));
        engine.pointer_move(&mut store, Point::new(900.0, 0.0));

        let effects = engine.finish_resize(&store).unwrap();
        assert_eq!(
            effects,
            vec![
                Effect::SuppressScroll { enabled: false },
                Effect::PersistGeometry {
                    id: id("a"),
                    patch: BlockData::new().with("mobileSpanX", 2),
                },
            ]
        );
        assert_eq!(store.get(&id("a")).unwrap().data.get_number("gridSpanX"), None);
    }

    #[test]
    fn test_resize_keeps_opening_viewport() {
        let mut store = store_of(&["a"]);
        let mut engine = engine();

        engine.begin_resize(&store, &id("a"), Axis::X).unwrap();
        engine.set_viewport(Viewport::Mobile);
        engine.pointer_down(&store, Point::new(0.0, 0.0));
        engine.pointer_move(&mut store, Point::new(224.0, 0.0));

        let data = &store.get(&id("a")).unwrap().data;
        assert_eq!(data.get_number("gridSpanX"), Some(3.0));
        assert_eq!(data.get_number("mobileSpanX"), None);
    }

    #[test]
    fn test_resize_keeps_opening_metrics() {
        let mut store = store_of(&["a"]);
        let mut engine = InteractionEngine::new(Viewport::Desktop, GridMetrics::default());

        engine.begin_resize(&store, &id("a"), Axis::X).unwrap();
        // Host switches to the mobile preview mid-session
        engine.set_viewport(Viewport::Mobile);
        engine.set_metrics(GridMetrics::new(360.0, 120.0, 12.0));

        // One desktop cell is 171px at the default metrics
        engine.pointer_down(&store, Point::new(0.0, 0.0));
        engine.pointer_move(&mut store, Point::new(171.0, 0.0));

        let data = &store.get(&id("a")).unwrap().data;
        assert_eq!(data.get_number("gridSpanX"), Some(2.0));
        assert_eq!(data.get_number("mobileSpanX"), None);
    }

    #[test]
    fn test_unchanged_resize_persists_nothing() {
        let store = store_of(&["a"]);
        let mut engine = engine();

        engine.begin_resize(&store, &id("a"), Axis::X).unwrap();
        assert_eq!(
            engine.finish_resize(&store).unwrap(),
            vec![Effect::SuppressScroll { enabled: false }]
        );
        assert!(engine.gesture().is_idle());
    }

    #[test]
    fn test_drag_release_without_move_persists_nothing() {
        let mut store = store_of(&["a", "b"]);
        let mut engine = engine();

        engine.begin_drag(&store, &id("a"), Point::new(10.0, 10.0)).unwrap();
        assert!(engine.suppresses_scroll());

        let effects = engine.pointer_up(&mut store, Point::new(10.0, 10.0));
        assert_eq!(effects, vec![Effect::SuppressScroll { enabled: false }]);
        assert!(!engine.suppresses_scroll());
    }

    #[test]
    fn test_drag_over_gap_keeps_order() {
        let mut store = store_of(&["a", "b"]);
        let mut engine = engine();

        engine.begin_drag(&store, &id("a"), Point::new(10.0, 10.0)).unwrap();
        assert!(engine.pointer_move(&mut store, Point::new(106.0, 10.0)).is_empty());
        assert!(engine.pointer_move(&mut store, Point::new(10.0, 900.0)).is_empty());
        assert_eq!(store.ids(), vec![id("a"), id("b")]);
    }

    #[test]
    fn test_abandons_gesture_when_block_vanishes() {
        let mut store = store_of(&["a", "b"]);
        let mut engine = engine();

        engine.begin_drag(&store, &id("a"), Point::new(10.0, 10.0)).unwrap();
        store.remove(&id("a")).unwrap();

        let effects = engine.pointer_move(&mut store, Point::new(150.0, 10.0));
        assert_eq!(effects, vec![Effect::SuppressScroll { enabled: false }]);
        assert!(engine.gesture().is_idle());
    }

    #[test]
    fn test_effect_serialization() {
        let effect = Effect::PersistOrder {
            positions: vec![PositionUpdate {
                id: id("a"),
                position: 0,
            }],
        };
        let json = serde_json::to_value(&effect).unwrap();
        assert_eq!(json["type"], "persistOrder");
        assert_eq!(json["positions"][0]["position"], 0);
    }
}
