//! Integration tests for editor crate

use bento_editor::{EditSession, EditorError, Effect, GestureError};
use bento_model::{
    Axis, Block, BlockData, BlockId, BlockType, GridMetrics, LayoutType, Page, Point, Theme,
    Viewport,
};

fn grid_page() -> Page {
    Page::new("p1", "alice").with_layout(LayoutType::Special)
}

fn blocks(ids: &[&str]) -> Vec<Block> {
    ids.iter()
        .enumerate()
        .map(|(i, id)| Block::new(*id, "p1", BlockType::Link).with_position(i as u32))
        .collect()
}

fn order(session: &EditSession) -> Vec<&str> {
    session
        .store()
        .blocks()
        .iter()
        .map(|b| b.id.as_str())
        .collect()
}

fn id(s: &str) -> BlockId {
    BlockId::new(s)
}

/// Center of the desktop cell at (column, row) with default metrics
fn cell_center(column: u32, row: u32) -> Point {
    let metrics = GridMetrics::default();
    let width = metrics.cell_width(Viewport::Desktop);
    Point::new(
        column as f64 * (width + metrics.gap) + width / 2.0,
        row as f64 * (metrics.cell_height + metrics.gap) + metrics.cell_height / 2.0,
    )
}

#[test]
fn test_session_lifecycle() {
    let mut session = EditSession::new("tab-1", grid_page(), blocks(&["a", "b"]));
    let effects = session
        .add_block(Block::new("c", "p1", BlockType::Text))
        .unwrap();
    assert_eq!(effects, vec![Effect::RenderNeeded]);
    assert_eq!(session.store().get(&id("c")).unwrap().position, 2);

    let effects = session.delete_block(&id("b")).unwrap();
    assert!(matches!(effects[0], Effect::DeleteBlock { .. }));
    assert_eq!(order(&session), vec!["a", "c"]);

    let positions: Vec<u32> = session.store().blocks().iter().map(|b| b.position).collect();
    assert_eq!(positions, vec![0, 1]);
}

#[test]
fn test_live_swap_drag() {
    let mut session = EditSession::new("tab-1", grid_page(), blocks(&["a", "b", "c", "d"]));

    session.begin_drag(&id("a"), cell_center(0, 0)).unwrap();

    // Over C: A moves to index 2
    assert_eq!(session.pointer_move(cell_center(2, 0)), vec![Effect::RenderNeeded]);
    assert_eq!(order(&session), vec!["b", "c", "a", "d"]);

    // Pointer still over A at its new slot: nothing to do
    assert!(session.pointer_move(cell_center(2, 0)).is_empty());

    // Back over C, now at index 1
    session.pointer_move(cell_center(1, 0));
    assert_eq!(order(&session), vec!["b", "a", "c", "d"]);

    let effects = session.pointer_up(cell_center(1, 0));
    assert_eq!(effects[0], Effect::SuppressScroll { enabled: false });
    match &effects[1] {
        Effect::PersistOrder { positions } => {
            let pairs: Vec<(&str, u32)> = positions
                .iter()
                .map(|p| (p.id.as_str(), p.position))
                .collect();
            assert_eq!(pairs, vec![("b", 0), ("a", 1), ("c", 2), ("d", 3)]);
        }
        other => panic!("Expected PersistOrder, got {:?}", other),
    }
    assert!(session.engine().gesture().is_idle());
}

#[test]
fn test_drag_back_to_origin_persists_nothing() {
    let mut session = EditSession::new("tab-1", grid_page(), blocks(&["a", "b", "c"]));

    session.begin_drag(&id("a"), cell_center(0, 0)).unwrap();
    session.pointer_move(cell_center(1, 0));
    session.pointer_move(cell_center(0, 0));
    assert_eq!(order(&session), vec!["a", "b", "c"]);

    let effects = session.pointer_up(cell_center(0, 0));
    assert_eq!(effects, vec![Effect::SuppressScroll { enabled: false }]);
}

#[test]
fn test_resize_session_stacks_presses() {
    let page_blocks = vec![Block::new("a", "p1", BlockType::Image)
        .with_data(BlockData::new().with("gridSpanX", 2).with("gridSpanY", 2))];
    let mut session = EditSession::new("tab-1", grid_page(), page_blocks);
    let cell = GridMetrics::default().cell_width(Viewport::Desktop);

    let effects = session.begin_resize(&id("a"), Axis::X).unwrap();
    assert_eq!(effects, vec![Effect::SuppressScroll { enabled: true }]);

    // First press: one cell to the right
    session.pointer_down(Point::new(100.0, 100.0));
    session.pointer_move(Point::new(100.0 + cell, 100.0));
    assert_eq!(span_x(&session), Some(3.0));

    // Far past the edge clamps at 4
    session.pointer_move(Point::new(100.0 + cell * 6.0, 100.0));
    assert_eq!(span_x(&session), Some(4.0));
    session.pointer_up(Point::new(100.0 + cell * 6.0, 100.0));

    // Second press starts from the live span
    session.pointer_down(Point::new(400.0, 100.0));
    session.pointer_move(Point::new(400.0 - cell, 100.0));
    assert_eq!(span_x(&session), Some(3.0));
    session.pointer_up(Point::new(400.0 - cell, 100.0));

    let effects = session.finish_resize().unwrap();
    assert_eq!(
        effects,
        vec![
            Effect::SuppressScroll { enabled: false },
            Effect::PersistGeometry {
                id: id("a"),
                patch: BlockData::new().with("gridSpanX", 3),
            },
        ]
    );

    // Only the resized key changed
    let data = &session.store().get(&id("a")).unwrap().data;
    assert_eq!(data.get_number("gridSpanY"), Some(2.0));
}

#[test]
fn test_two_cell_drag_adds_two() {
    let mut session = EditSession::new("tab-1", grid_page(), blocks(&["a"]));
    let metrics = GridMetrics::default();
    let cell = metrics.cell_width(Viewport::Desktop);

    session.begin_resize(&id("a"), Axis::X).unwrap();
    session.pointer_down(Point::new(0.0, 0.0));
    session.pointer_move(Point::new(cell * 2.0, 0.0));
    assert_eq!(span_x(&session), Some(3.0));
}

#[test]
fn test_gesture_refused_on_classic_page() {
    let mut session = EditSession::new("tab-1", Page::new("p1", "alice"), blocks(&["a"]));
    let err = session.begin_resize(&id("a"), Axis::Y).unwrap_err();
    assert!(matches!(err, EditorError::Gesture(GestureError::GridInactive)));
}

#[test]
fn test_theme_update_targets_public_path() {
    let mut session = EditSession::new("tab-1", grid_page(), blocks(&["a"]));
    let theme = Theme {
        background_color: "#000000".to_string(),
        ..Theme::default()
    };

    let effects = session.set_theme(theme.clone());
    match &effects[0] {
        Effect::UpdatePage { patch, path } => {
            assert_eq!(patch.theme.as_ref(), Some(&theme));
            assert!(patch.layout_type.is_none());
            assert_eq!(path, "/alice");
        }
        other => panic!("Expected UpdatePage, got {:?}", other),
    }
    assert_eq!(session.page().theme, theme);
    assert!(session.set_theme(theme).is_empty());
}

fn span_x(session: &EditSession) -> Option<f64> {
    session
        .store()
        .get(&id("a"))
        .and_then(|b| b.data.get_number("gridSpanX"))
}
