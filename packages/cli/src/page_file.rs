use anyhow::{Context, Result};
use bento_model::{Block, Page};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A page and its blocks, as exported from the store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageFile {
    pub page: Page,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl PageFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut file: PageFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        // Store order is ascending position
        file.blocks.sort_by_key(|b| b.position);
        Ok(file)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
    }
}
