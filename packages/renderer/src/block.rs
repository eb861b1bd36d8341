//! Block tiles. Size comes from the effective span only; `position` and the
//! stored span keys are never read here.

use crate::vdom::VNode;
use bento_model::{effective_span, Block, BlockType, Theme, Viewport};

/// Where a page is being drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Editor canvas: tiles carry move/resize/delete affordances
    EditingCanvas,
    /// Public page and previews
    #[default]
    PublicReadOnly,
}

/// Affordances attached to each tile on the editor canvas
pub const AFFORDANCES: [(&str, &str); 4] = [
    ("move", "Move"),
    ("resize-x", "Resize width"),
    ("resize-y", "Resize height"),
    ("delete", "Delete"),
];

/// Render one grid tile. `index` is the block's index in the store and is
/// only emitted on the editor canvas.
pub fn render_block(
    block: &Block,
    index: usize,
    theme: &Theme,
    viewport: Viewport,
    mode: Mode,
) -> VNode {
    let span = effective_span(block, viewport);
    tile(block, index, theme, mode)
        .with_style("grid-column", format!("span {}", span.x))
        .with_style("grid-row", format!("span {}", span.y))
}

/// Render one entry of a classic list. No span styles.
pub fn render_list_item(block: &Block, index: usize, theme: &Theme, mode: Mode) -> VNode {
    tile(block, index, theme, mode)
}

fn tile(block: &Block, index: usize, theme: &Theme, mode: Mode) -> VNode {
    let mut node = VNode::element("div")
        .with_attr("class", format!("bento-block bento-{}", block.block_type.as_str()))
        .with_attr("data-block-id", block.id.as_str())
        .with_child(render_content(block, theme));

    if mode == Mode::EditingCanvas {
        node = node
            .with_attr("data-index", index.to_string())
            .with_child(affordances(index));
    }
    node
}

fn affordances(index: usize) -> VNode {
    VNode::element("div")
        .with_attr("class", "bento-controls")
        .with_children(
            AFFORDANCES
                .iter()
                .map(|(action, label)| {
                    VNode::element("button")
                        .with_attr("type", "button")
                        .with_attr("data-action", *action)
                        .with_attr("data-index", index.to_string())
                        .with_attr("aria-label", *label)
                })
                .collect(),
        )
}

fn render_content(block: &Block, theme: &Theme) -> VNode {
    let data = &block.data;
    match block.block_type {
        BlockType::Link => {
            let raw = data.get_str("url").unwrap_or_default();
            let title = data.get_str("title").unwrap_or(raw);
            let href = safe_url(raw, LINK_SCHEMES).unwrap_or_else(|| "#".to_string());
            VNode::element("a")
                .with_attr("class", "bento-link")
                .with_attr("href", href)
                .with_attr("rel", "noopener")
                .with_style("background-color", theme.button_color.as_str())
                .with_style("color", theme.button_text_color.as_str())
                .with_style("border-radius", theme.button_style.border_radius())
                .with_child(VNode::text(title))
        }
        BlockType::Text => VNode::element("p")
            .with_attr("class", "bento-text")
            .with_child(VNode::text(data.get_str("text").unwrap_or_default())),
        BlockType::Image => {
            let image = VNode::element("img")
                .with_attr("src", data.get_str("src").unwrap_or_default())
                .with_attr("alt", data.get_str("alt").unwrap_or_default())
                .with_attr("loading", "lazy");
            figure(image, data.get_str("caption"))
        }
        BlockType::Video => {
            let src = data.get_str("src").and_then(|src| safe_url(src, MEDIA_SCHEMES));
            let url = data.get_str("url").and_then(|url| safe_url(url, MEDIA_SCHEMES));
            let video = match (src, url) {
                (Some(src), _) => VNode::element("video")
                    .with_attr("src", src)
                    .with_attr("controls", "controls")
                    .with_attr("playsinline", "playsinline"),
                (None, Some(url)) => VNode::element("iframe")
                    .with_attr("src", url)
                    .with_attr("allowfullscreen", "allowfullscreen"),
                (None, None) => VNode::element("div").with_attr("class", "bento-video-missing"),
            };
            figure(video, data.get_str("caption"))
        }
        // Embedded markup runs sandboxed, never inline
        BlockType::Embed => VNode::element("iframe")
            .with_attr("class", "bento-embed")
            .with_attr("sandbox", "allow-scripts allow-popups")
            .with_attr("srcdoc", data.get_str("html").unwrap_or_default()),
        BlockType::Divider => VNode::element("hr").with_attr("class", "bento-divider"),
    }
}

const LINK_SCHEMES: &[&str] = &["http", "https", "mailto", "tel"];
const MEDIA_SCHEMES: &[&str] = &["http", "https"];

/// `url` with whitespace and control characters removed, or `None` when it
/// names a scheme outside `schemes`. Scheme-less (relative) URLs pass.
fn safe_url(url: &str, schemes: &[&str]) -> Option<String> {
    let cleaned: String = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    match cleaned.find([':', '/', '?', '#']) {
        Some(end) if cleaned[end..].starts_with(':') => {
            let scheme = cleaned[..end].to_ascii_lowercase();
            schemes.contains(&scheme.as_str()).then_some(cleaned)
        }
        _ => Some(cleaned),
    }
}

fn figure(media: VNode, caption: Option<&str>) -> VNode {
    let node = VNode::element("figure").with_child(media);
    match caption {
        Some(caption) if !caption.is_empty() => {
            node.with_child(VNode::element("figcaption").with_child(VNode::text(caption)))
        }
        _ => node,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bento_model::BlockData;

    fn link() -> Block {
        Block::new("b1", "p1", BlockType::Link).with_data(
            BlockData::new()
                .with("url", "https://example.com")
                .with("title", "Example")
                .with("gridSpanX", 2)
                .with("mobileSpanY", 3),
        )
    }

    #[test]
    fn test_span_styles_follow_viewport() {
        let theme = Theme::default();
        let desktop = render_block(&link(), 0, &theme, Viewport::Desktop, Mode::PublicReadOnly);
        assert_eq!(desktop.style("grid-column"), Some("span 2"));
        assert_eq!(desktop.style("grid-row"), Some("span 1"));

        let mobile = render_block(&link(), 0, &theme, Viewport::Mobile, Mode::PublicReadOnly);
        assert_eq!(mobile.style("grid-column"), Some("span 1"));
        assert_eq!(mobile.style("grid-row"), Some("span 3"));
    }

    #[test]
    fn test_public_tile_is_pure() {
        let theme = Theme::default();
        let node = render_block(&link(), 4, &theme, Viewport::Desktop, Mode::PublicReadOnly);
        assert!(node.attr("data-index").is_none());
        assert!(node.find_all(&|n| n.attr("data-action").is_some()).is_empty());
    }

    #[test]
    fn test_editing_tile_has_affordances() {
        let theme = Theme::default();
        let node = render_block(&link(), 4, &theme, Viewport::Desktop, Mode::EditingCanvas);
        assert_eq!(node.attr("data-index"), Some("4"));

        let actions: Vec<&str> = node
            .find_all(&|n| n.attr("data-action").is_some())
            .iter()
            .filter_map(|n| n.attr("data-action"))
            .collect();
        assert_eq!(actions, vec!["move", "resize-x", "resize-y", "delete"]);
    }

    #[test]
    fn test_link_uses_theme_button() {
        let theme = Theme {
            button_color: "#ff0066".to_string(),
            ..Theme::default()
        };
        let node = render_block(&link(), 0, &theme, Viewport::Desktop, Mode::PublicReadOnly);
        let anchor = node.find_all(&|n| n.tag() == Some("a"))[0];
        assert_eq!(anchor.attr("href"), Some("https://example.com"));
        assert_eq!(anchor.style("background-color"), Some("#ff0066"));
    }

    #[test]
    fn test_script_urls_are_neutralized() {
        let theme = Theme::default();
        for url in [
            "javascript:alert(document.cookie)",
            " JavaScript:alert(1)",
            "java\tscript:alert(1)",
            "data:text/html,<script>",
        ] {
            let block = Block::new("b1", "p1", BlockType::Link)
                .with_data(BlockData::new().with("url", url).with("title", "x"));
            let node = render_block(&block, 0, &theme, Viewport::Desktop, Mode::PublicReadOnly);
            let anchor = node.find_all(&|n| n.tag() == Some("a"))[0];
            assert_eq!(anchor.attr("href"), Some("#"), "{}", url);
        }
    }

    #[test]
    fn test_allowed_link_schemes() {
        for url in ["mailto:me@example.com", "tel:+15550100", "HTTPS://example.com", "/about"] {
            assert_eq!(safe_url(url, LINK_SCHEMES).as_deref(), Some(url));
        }
        assert_eq!(safe_url("tel:+15550100", MEDIA_SCHEMES), None);
        assert_eq!(safe_url("   ", LINK_SCHEMES), None);
    }

    #[test]
    fn test_video_drops_script_iframe() {
        let block = Block::new("v1", "p1", BlockType::Video)
            .with_data(BlockData::new().with("url", "javascript:alert(1)"));
        let theme = Theme::default();
        let node = render_block(&block, 0, &theme, Viewport::Desktop, Mode::PublicReadOnly);
        assert!(node.find_all(&|n| n.tag() == Some("iframe")).is_empty());
        assert!(node.find_all(&|n| n.attr("src").is_some()).is_empty());
    }

    #[test]
    fn test_list_item_has_no_span() {
        let node = render_list_item(&link(), 0, &Theme::default(), Mode::PublicReadOnly);
        assert!(node.style("grid-column").is_none());
    }
}
