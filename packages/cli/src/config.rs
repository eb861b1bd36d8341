use bento_model::{GridMetrics, Viewport};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "bento.config.json";

/// Bento configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Row height in pixels
    #[serde(default = "default_cell_height")]
    pub cell_height: f64,

    /// Gap between cells in pixels
    #[serde(default = "default_gap")]
    pub gap: f64,

    /// Container width of the mobile preview
    #[serde(default = "default_mobile_width")]
    pub mobile_width: f64,

    /// Container width of the desktop canvas
    #[serde(default = "default_desktop_width")]
    pub desktop_width: f64,

    /// Where rendered pages are written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<String>,
}

fn default_cell_height() -> f64 {
    120.0
}

fn default_gap() -> f64 {
    12.0
}

fn default_mobile_width() -> f64 {
    360.0
}

fn default_desktop_width() -> f64 {
    720.0
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            tracing::debug!(path = %config_path.display(), "config loaded");
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    pub fn metrics(&self, viewport: Viewport) -> GridMetrics {
        let width = match viewport {
            Viewport::Mobile => self.mobile_width,
            Viewport::Desktop => self.desktop_width,
        };
        GridMetrics::new(width, self.cell_height, self.gap)
    }

    /// Output directory, relative to `cwd` unless absolute
    pub fn get_out_dir(&self, cwd: &str) -> PathBuf {
        let out_dir = self.out_dir.as_deref().unwrap_or("dist");
        let path = Path::new(out_dir);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            PathBuf::from(cwd).join(path)
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cell_height: default_cell_height(),
            gap: default_gap(),
            mobile_width: default_mobile_width(),
            desktop_width: default_desktop_width(),
            out_dir: None,
        }
    }
}
