//! # Blocks
//!
//! A block is one tile on a page. Its `data` map is open-ended: geometry keys
//! (`gridSpanX`, `mobileSpanY`, ...) live next to content fields (`url`,
//! `title`, ...). Only the geometry keys are interpreted by this workspace.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Stable block identifier assigned by the backing store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Owning page identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(pub String);

impl PageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Kind of content a block carries. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Link,
    Text,
    Image,
    Video,
    Embed,
    Divider,
}

impl BlockType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Link => "link",
            BlockType::Text => "text",
            BlockType::Image => "image",
            BlockType::Video => "video",
            BlockType::Embed => "embed",
            BlockType::Divider => "divider",
        }
    }
}

/// Open attribute map stored with each block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockData(pub Map<String, Value>);

impl BlockData {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Numeric value of `key`, if present and numeric
    pub fn get_number(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(Value::as_f64)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Shallow merge: every key in `patch` overwrites the same key here,
    /// all other keys are left alone.
    pub fn merge(&mut self, patch: &BlockData) {
        for (key, value) in &patch.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One tile on a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: BlockId,
    pub page_id: PageId,
    #[serde(rename = "type")]
    pub block_type: BlockType,
    pub position: u32,
    #[serde(default)]
    pub data: BlockData,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
}

fn default_visible() -> bool {
    true
}

impl Block {
    pub fn new(id: impl Into<BlockId>, page_id: impl Into<PageId>, block_type: BlockType) -> Self {
        Self {
            id: id.into(),
            page_id: page_id.into(),
            block_type,
            position: 0,
            data: BlockData::new(),
            is_visible: true,
        }
    }

    pub fn with_data(mut self, data: BlockData) -> Self {
        self.data = data;
        self
    }

    pub fn with_position(mut self, position: u32) -> Self {
        self.position = position;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.is_visible = false;
        self
    }
}

impl From<String> for BlockId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<String> for PageId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Entry of a batch position update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionUpdate {
    pub id: BlockId,
    pub position: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_block_json_shape() {
        let json = json!({
            "id": "b1",
            "pageId": "p1",
            "type": "link",
            "position": 3,
            "data": { "url": "https://example.com", "gridSpanX": 2 },
            "isVisible": false
        });

        let block: Block = serde_json::from_value(json).unwrap();
        assert_eq!(block.id, BlockId::new("b1"));
        assert_eq!(block.block_type, BlockType::Link);
        assert_eq!(block.position, 3);
        assert_eq!(block.data.get_number("gridSpanX"), Some(2.0));
        assert!(!block.is_visible);
    }

    #[test]
    fn test_visibility_defaults_to_true() {
        let json = json!({ "id": "b1", "pageId": "p1", "type": "divider", "position": 0 });
        let block: Block = serde_json::from_value(json).unwrap();
        assert!(block.is_visible);
        assert!(block.data.is_empty());
    }

    #[test]
    fn test_merge_overwrites_only_patched_keys() {
        let mut data = BlockData::new()
            .with("title", "Hello")
            .with("gridSpanX", 1)
            .with("mobileSpanX", 2);

        data.merge(&BlockData::new().with("gridSpanX", 3));

        assert_eq!(data.get_number("gridSpanX"), Some(3.0));
        assert_eq!(data.get_number("mobileSpanX"), Some(2.0));
        assert_eq!(data.get_str("title"), Some("Hello"));
        assert_eq!(data.len(), 3);
    }
}
