//! Page and theme records. Read-only for the editing core; written only
//! through explicit page updates.

use crate::block::PageId;
use serde::{Deserialize, Serialize};

/// Selects whether the grid machinery is active for a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutType {
    #[default]
    Classic,
    Special,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonStyle {
    #[default]
    Rounded,
    Square,
    Pill,
}

impl ButtonStyle {
    /// CSS border radius for link buttons
    pub fn border_radius(&self) -> &'static str {
        match self {
            ButtonStyle::Rounded => "12px",
            ButtonStyle::Square => "0",
            ButtonStyle::Pill => "9999px",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub background_color: String,
    pub text_color: String,
    pub button_color: String,
    pub button_text_color: String,
    pub font: String,
    #[serde(default)]
    pub button_style: ButtonStyle,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background_color: "#ffffff".to_string(),
            text_color: "#111111".to_string(),
            button_color: "#111111".to_string(),
            button_text_color: "#ffffff".to_string(),
            font: "Inter".to_string(),
            button_style: ButtonStyle::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: PageId,
    /// Public path segment, the page is served at `/{slug}`
    pub slug: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub layout_type: LayoutType,
    #[serde(default)]
    pub theme: Theme,
}

impl Page {
    pub fn new(id: impl Into<PageId>, slug: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            slug: slug.into(),
            title: String::new(),
            layout_type: LayoutType::default(),
            theme: Theme::default(),
        }
    }

    pub fn with_layout(mut self, layout_type: LayoutType) -> Self {
        self.layout_type = layout_type;
        self
    }

    pub fn public_path(&self) -> String {
        format!("/{}", self.slug.trim_start_matches('/'))
    }

    pub fn is_grid(&self) -> bool {
        self.layout_type == LayoutType::Special
    }

    /// Apply a partial page update
    pub fn apply(&mut self, patch: &PagePatch) {
        if let Some(theme) = &patch.theme {
            self.theme = theme.clone();
        }
        if let Some(layout_type) = patch.layout_type {
            self.layout_type = layout_type;
        }
    }
}

/// Top-level page update: theme and layout type are sent independently
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout_type: Option<LayoutType>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_path() {
        assert_eq!(Page::new("p1", "alice").public_path(), "/alice");
        assert_eq!(Page::new("p1", "/bob").public_path(), "/bob");
    }

    #[test]
    fn test_apply_patch() {
        let mut page = Page::new("p1", "alice");
        assert!(!page.is_grid());

        page.apply(&PagePatch {
            layout_type: Some(LayoutType::Special),
            ..Default::default()
        });
        assert!(page.is_grid());
        assert_eq!(page.theme, Theme::default());
    }

    #[test]
    fn test_page_defaults_from_json() {
        let page: Page = serde_json::from_str(r#"{ "id": "p1", "slug": "alice" }"#).unwrap();
        assert_eq!(page.layout_type, LayoutType::Classic);
        assert_eq!(page.theme.button_style, ButtonStyle::Rounded);
    }
}
