use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Bar colors, cycled per series.
pub const COLOR_PALETTE: [[u8; 3]; 8] = [
    [0, 0, 255],     // Blue
    [255, 0, 0],     // Red
    [0, 160, 0],     // Green
    [255, 165, 0],   // Orange
    [128, 0, 128],   // Purple
    [0, 160, 160],   // Teal
    [165, 42, 42],   // Brown
    [255, 0, 255],   // Magenta
];

/// Drawing options passed explicitly to every page renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    /// Size of one page in pixels.
    pub page_width: u32,
    pub page_height: u32,
    pub palette: Vec<[u8; 3]>,
    /// Print the mean above each bar.
    pub show_values: bool,
    /// Digits after the decimal point in bar annotations.
    pub value_precision: usize,
    pub show_title: bool,
    pub title: String,
    pub y_title: String,
    /// `None` shows the legend only for multi-series or explicitly named charts.
    pub show_legend: Option<bool>,
    pub font_size: f64,
    pub dark: bool,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            page_width: 1200,
            page_height: 800,
            palette: COLOR_PALETTE.to_vec(),
            show_values: true,
            value_precision: 0,
            show_title: false,
            title: "Timing comparison".to_string(),
            y_title: "ns / element".to_string(),
            show_legend: None,
            font_size: 16.0,
            dark: false,
        }
    }
}

impl RenderStyle {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::Style {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&text).map_err(|e| Error::Style {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    pub fn color_for_index(&self, index: usize) -> [u8; 3] {
        if self.palette.is_empty() {
            COLOR_PALETTE[index % COLOR_PALETTE.len()]
        } else {
            self.palette[index % self.palette.len()]
        }
    }

    pub fn format_value(&self, v: f64) -> String {
        format!("{v:.*}", self.value_precision)
    }

    pub fn background(&self) -> [u8; 3] {
        if self.dark {
            [20, 20, 20]
        } else {
            [255, 255, 255]
        }
    }

    pub fn foreground(&self) -> [u8; 3] {
        if self.dark {
            [230, 230, 230]
        } else {
            [0, 0, 0]
        }
    }
}
