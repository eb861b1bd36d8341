//! # Grid Geometry
//!
//! Stored span integers → the footprint a viewport renders.
//!
//! - Desktop grids have 4 columns, mobile grids 2.
//! - Column spans are clamped to `[1, columns]`, row spans to `[1, 4]`.
//! - Desktop reads `gridSpanX/Y`, mobile reads `mobileSpanX/Y`; the two pairs
//!   are independent and both default to 1.

use crate::block::Block;
use serde::{Deserialize, Serialize};

pub const DESKTOP_COLUMNS: u32 = 4;
pub const MOBILE_COLUMNS: u32 = 2;

/// Row spans are viewport independent
pub const MAX_ROW_SPAN: u32 = 4;

pub const GRID_SPAN_X: &str = "gridSpanX";
pub const GRID_SPAN_Y: &str = "gridSpanY";
pub const MOBILE_SPAN_X: &str = "mobileSpanX";
pub const MOBILE_SPAN_Y: &str = "mobileSpanY";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Viewport {
    Mobile,
    #[default]
    Desktop,
}

impl Viewport {
    pub fn as_str(&self) -> &'static str {
        match self {
            Viewport::Mobile => "mobile",
            Viewport::Desktop => "desktop",
        }
    }
}

impl std::str::FromStr for Viewport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mobile" => Ok(Viewport::Mobile),
            "desktop" => Ok(Viewport::Desktop),
            other => Err(format!("Invalid viewport: {}. Use: mobile or desktop", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

/// Column/row footprint of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub x: u32,
    pub y: u32,
}

impl Span {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    pub fn get(&self, axis: Axis) -> u32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }
}

impl Default for Span {
    fn default() -> Self {
        Self { x: 1, y: 1 }
    }
}

/// Data keys a viewport reads and writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanKeys {
    pub x: &'static str,
    pub y: &'static str,
}

impl SpanKeys {
    pub fn for_viewport(viewport: Viewport) -> Self {
        match viewport {
            Viewport::Mobile => Self {
                x: MOBILE_SPAN_X,
                y: MOBILE_SPAN_Y,
            },
            Viewport::Desktop => Self {
                x: GRID_SPAN_X,
                y: GRID_SPAN_Y,
            },
        }
    }

    pub fn key(&self, axis: Axis) -> &'static str {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }
}

pub fn column_count_for(viewport: Viewport) -> u32 {
    match viewport {
        Viewport::Mobile => MOBILE_COLUMNS,
        Viewport::Desktop => DESKTOP_COLUMNS,
    }
}

/// Round `raw` to the nearest integer and clamp it into the valid range for
/// `axis` on `viewport`. Non-finite input collapses to 1.
pub fn clamp_span(axis: Axis, raw: f64, viewport: Viewport) -> u32 {
    let max = match axis {
        Axis::X => column_count_for(viewport),
        Axis::Y => MAX_ROW_SPAN,
    };

    if !raw.is_finite() {
        return 1;
    }

    raw.round().clamp(1.0, max as f64) as u32
}

/// Footprint `block` occupies on `viewport`. Missing or non-numeric keys count
/// as 1 and stored values are clamped, so a corrupted patch can never produce
/// a span the grid cannot hold.
pub fn effective_span(block: &Block, viewport: Viewport) -> Span {
    let keys = SpanKeys::for_viewport(viewport);
    let read = |axis: Axis| {
        let raw = block.data.get_number(keys.key(axis)).unwrap_or(1.0);
        clamp_span(axis, raw, viewport)
    };

    Span {
        x: read(Axis::X),
        y: read(Axis::Y),
    }
}
