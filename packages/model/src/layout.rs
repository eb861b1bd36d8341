//! # Auto-flow Grid Layout
//!
//! Turns an ordered list of spans into grid cells and pixel rectangles using
//! sparse row-major auto-placement (the same rules a browser applies to
//! `grid-auto-flow: row`). No coordinates are stored on blocks; order and
//! span alone determine where each block lands, so placements never overlap.
//!
//! The pixel rectangles double as the hit-test surface for drag gestures.

use crate::block::{Block, BlockId};
use crate::geometry::{column_count_for, effective_span, Span, Viewport};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Pixel dimensions of the grid a viewport renders into
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridMetrics {
    pub container_width: f64,
    pub cell_height: f64,
    pub gap: f64,
}

impl Default for GridMetrics {
    fn default() -> Self {
        Self {
            container_width: 720.0,
            cell_height: 120.0,
            gap: 12.0,
        }
    }
}

impl GridMetrics {
    pub fn new(container_width: f64, cell_height: f64, gap: f64) -> Self {
        Self {
            container_width,
            cell_height,
            gap,
        }
    }

    /// Width of one column track
    pub fn cell_width(&self, viewport: Viewport) -> f64 {
        let columns = column_count_for(viewport) as f64;
        ((self.container_width - self.gap * (columns - 1.0)) / columns).max(0.0)
    }

    fn rect(&self, viewport: Viewport, column: u32, row: u32, span: Span) -> Rect {
        let cell_width = self.cell_width(viewport);
        Rect {
            x: column as f64 * (cell_width + self.gap),
            y: row as f64 * (self.cell_height + self.gap),
            width: span.x as f64 * cell_width + (span.x.saturating_sub(1)) as f64 * self.gap,
            height: span.y as f64 * self.cell_height
                + (span.y.saturating_sub(1)) as f64 * self.gap,
        }
    }
}

/// Where one block landed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Index of the block in the store's sequence (not its visual order
    /// among visible blocks)
    pub index: usize,
    pub block_id: BlockId,
    pub column: u32,
    pub row: u32,
    pub span: Span,
    pub rect: Rect,
}

/// Row-major occupancy grid that grows downward on demand
struct Occupancy {
    columns: u32,
    rows: Vec<Vec<bool>>,
}

impl Occupancy {
    fn new(columns: u32) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    fn is_free(&self, row: u32, column: u32, span: Span) -> bool {
        (row..row + span.y).all(|r| {
            self.rows
                .get(r as usize)
                .map(|cells| (column..column + span.x).all(|c| !cells[c as usize]))
                .unwrap_or(true)
        })
    }

    fn fill(&mut self, row: u32, column: u32, span: Span) {
        let needed = (row + span.y) as usize;
        while self.rows.len() < needed {
            self.rows.push(vec![false; self.columns as usize]);
        }
        for r in row..row + span.y {
            for c in column..column + span.x {
                self.rows[r as usize][c as usize] = true;
            }
        }
    }
}

/// Sparse auto-placement of `spans` on a grid with `columns` tracks.
/// Returns `(column, row)` for each span, in input order.
pub fn place(spans: &[Span], columns: u32) -> Vec<(u32, u32)> {
    let columns = columns.max(1);
    let mut occupancy = Occupancy::new(columns);
    let mut cursor = (0u32, 0u32); // (row, column)
    let mut out = Vec::with_capacity(spans.len());

    for span in spans {
        let span = Span::new(span.x.clamp(1, columns), span.y.max(1));

        loop {
            let (row, column) = cursor;
            if column + span.x > columns {
                cursor = (row + 1, 0);
                continue;
            }
            if occupancy.is_free(row, column, span) {
                break;
            }
            cursor.1 += 1;
        }

        let (row, column) = cursor;
        occupancy.fill(row, column, span);
        out.push((column, row));
        cursor.1 += span.x;
    }

    out
}

/// Computed layout of a page's visible blocks on one viewport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    pub viewport: Viewport,
    pub columns: u32,
    pub placements: Vec<Placement>,
    rows: u32,
}

impl GridLayout {
    /// Lay out `blocks` in sequence order. Invisible blocks take no space
    /// and are absent from the result.
    pub fn compute(blocks: &[Block], viewport: Viewport, metrics: &GridMetrics) -> Self {
        let columns = column_count_for(viewport);
        let visible: Vec<(usize, &Block, Span)> = blocks
            .iter()
            .enumerate()
            .filter(|(_, block)| block.is_visible)
            .map(|(index, block)| (index, block, effective_span(block, viewport)))
            .collect();

        let spans: Vec<Span> = visible.iter().map(|(_, _, span)| *span).collect();
        let cells = place(&spans, columns);

        let mut rows = 0;
        let placements = visible
            .into_iter()
            .zip(cells)
            .map(|((index, block, span), (column, row))| {
                rows = rows.max(row + span.y);
                Placement {
                    index,
                    block_id: block.id.clone(),
                    column,
                    row,
                    span,
                    rect: metrics.rect(viewport, column, row, span),
                }
            })
            .collect();

        Self {
            viewport,
            columns,
            placements,
            rows,
        }
    }

    /// Store index of the block whose rectangle contains `point`
    pub fn hit_test(&self, point: Point) -> Option<usize> {
        self.placements
            .iter()
            .find(|p| p.rect.contains(point))
            .map(|p| p.index)
    }

    pub fn placement_for(&self, id: &BlockId) -> Option<&Placement> {
        self.placements.iter().find(|p| &p.block_id == id)
    }

    pub fn row_count(&self) -> u32 {
        self.rows
    }

    /// Total pixel height of the grid
    pub fn height(&self) -> f64 {
        self.placements
            .iter()
            .map(|p| p.rect.bottom())
            .fold(0.0, f64::max)
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{BlockData, BlockType};
    use crate::geometry::{GRID_SPAN_X, GRID_SPAN_Y};

    fn block(id: &str, x: u32, y: u32) -> Block {
        Block::new(id, "p1", BlockType::Text).with_data(
            BlockData::new().with(GRID_SPAN_X, x).with(GRID_SPAN_Y, y),
        )
    }

    #[test]
    fn test_place_fills_rows_left_to_right() {
        let spans = vec![Span::new(1, 1); 5];
        assert_eq!(
            place(&spans, 4),
            vec![(0, 0), (1, 0), (2, 0), (3, 0), (0, 1)]
        );
    }

    #[test]
    fn test_place_wraps_wide_item() {
        let spans = vec![Span::new(3, 1), Span::new(2, 1)];
        assert_eq!(place(&spans, 4), vec![(0, 0), (0, 1)]);
    }

    #[test]
    fn test_place_skips_cells_under_tall_item() {
        // A is 1x2 at (0,0); B fills the rest of row 0; C lands next to A on row 1
        let spans = vec![Span::new(1, 2), Span::new(3, 1), Span::new(1, 1)];
        assert_eq!(place(&spans, 4), vec![(0, 0), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_place_is_sparse() {
        // The free cell at the end of row 0 is never back-filled
        let spans = vec![Span::new(3, 1), Span::new(2, 1), Span::new(1, 1)];
        assert_eq!(place(&spans, 4), vec![(0, 0), (0, 1), (2, 1)]);
    }

    #[test]
    fn test_place_never_overlaps() {
        let spans: Vec<Span> = (0..40)
            .map(|i| Span::new(1 + (i * 7 % 4), 1 + (i * 5 % 4)))
            .collect();
        let cells = place(&spans, 4);

        let mut seen = std::collections::HashSet::new();
        for (span, (column, row)) in spans.iter().zip(&cells) {
            assert!(column + span.x <= 4);
            for r in *row..row + span.y {
                for c in *column..column + span.x {
                    assert!(seen.insert((r, c)), "cell ({}, {}) placed twice", r, c);
                }
            }
        }
    }

    #[test]
    fn test_compute_skips_invisible_blocks() {
        let blocks = vec![
            block("a", 1, 1),
            block("b", 2, 1).hidden(),
            block("c", 1, 1),
        ];
        let layout = GridLayout::compute(&blocks, Viewport::Desktop, &GridMetrics::default());

        assert_eq!(layout.placements.len(), 2);
        assert_eq!(layout.placements[1].index, 2);
        assert_eq!(layout.placements[1].column, 1);
        assert!(layout.placement_for(&BlockId::new("b")).is_none());
    }

    #[test]
    fn test_rects_include_gaps() {
        let metrics = GridMetrics::new(436.0, 100.0, 12.0);
        // (436 - 3 * 12) / 4 = 100
        assert_eq!(metrics.cell_width(Viewport::Desktop), 100.0);

        let blocks = vec![block("a", 2, 2), block("b", 1, 1)];
        let layout = GridLayout::compute(&blocks, Viewport::Desktop, &metrics);

        let a = layout.placements[0].rect;
        assert_eq!((a.x, a.y, a.width, a.height), (0.0, 0.0, 212.0, 212.0));
        let b = layout.placements[1].rect;
        assert_eq!((b.x, b.y), (224.0, 0.0));
        assert_eq!(layout.row_count(), 2);
        assert_eq!(layout.height(), 212.0);
    }

    #[test]
    fn test_hit_test() {
        let metrics = GridMetrics::new(436.0, 100.0, 12.0);
        let blocks = vec![block("a", 1, 1), block("b", 1, 1), block("c", 2, 1)];
        let layout = GridLayout::compute(&blocks, Viewport::Desktop, &metrics);

        assert_eq!(layout.hit_test(Point::new(50.0, 50.0)), Some(0));
        assert_eq!(layout.hit_test(Point::new(150.0, 50.0)), Some(1));
        assert_eq!(layout.hit_test(Point::new(300.0, 50.0)), Some(2));
        // In the gap between a and b
        assert_eq!(layout.hit_test(Point::new(106.0, 50.0)), None);
        assert_eq!(layout.hit_test(Point::new(50.0, 500.0)), None);
    }

    #[test]
    fn test_mobile_clamps_desktop_width_spans() {
        let blocks = vec![block("a", 4, 1)];
        let layout = GridLayout::compute(&blocks, Viewport::Mobile, &GridMetrics::default());
        // Mobile reads mobileSpanX, which is unset
        assert_eq!(layout.placements[0].span, Span::new(1, 1));
        assert_eq!(layout.columns, 2);
    }
}
