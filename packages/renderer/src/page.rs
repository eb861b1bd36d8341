use crate::block::{render_block, render_list_item, Mode};
use crate::vdom::VNode;
use bento_model::{column_count_for, Block, GridLayout, GridMetrics, Page, Viewport};

/// A rendered page plus the layout the editor hit-tests against
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub root: VNode,
    /// `None` for classic pages
    pub layout: Option<GridLayout>,
}

/// Render the block area of a page. Blocks are taken in store order;
/// invisible blocks are skipped.
pub fn render_page(
    page: &Page,
    blocks: &[Block],
    viewport: Viewport,
    mode: Mode,
    metrics: &GridMetrics,
) -> RenderedPage {
    let visible = blocks
        .iter()
        .enumerate()
        .filter(|(_, block)| block.is_visible);

    if !page.is_grid() {
        let root = VNode::element("main")
            .with_attr("class", "bento-list")
            .with_style("display", "flex")
            .with_style("flex-direction", "column")
            .with_style("gap", px(metrics.gap))
            .with_children(
                visible
                    .map(|(index, block)| render_list_item(block, index, &page.theme, mode))
                    .collect(),
            );
        return RenderedPage { root, layout: None };
    }

    let columns = column_count_for(viewport);
    let root = VNode::element("main")
        .with_attr("class", "bento-grid")
        .with_attr("data-viewport", viewport.as_str())
        .with_style("display", "grid")
        .with_style("grid-template-columns", format!("repeat({}, 1fr)", columns))
        .with_style("grid-auto-rows", px(metrics.cell_height))
        .with_style("grid-auto-flow", "row")
        .with_style("gap", px(metrics.gap))
        .with_children(
            visible
                .map(|(index, block)| render_block(block, index, &page.theme, viewport, mode))
                .collect(),
        );

    let layout = GridLayout::compute(blocks, viewport, metrics);
    tracing::trace!(
        page = %page.id,
        viewport = viewport.as_str(),
        rows = layout.row_count(),
        "page rendered"
    );

    RenderedPage {
        root,
        layout: Some(layout),
    }
}

fn px(value: f64) -> String {
    format!("{}px", value)
}
