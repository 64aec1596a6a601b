//! Viewer configuration loaded from JSON.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glint_renderer::{Color, PixelFormat, RenderConfig};
use serde::Deserialize;

/// Settings for one headless viewer run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Surface width in pixels
    pub width: u32,
    /// Surface height in pixels
    pub height: u32,
    /// Film layout, e.g. "rgba8unorm-srgb" or "bgra8unorm"
    pub pixel_format: String,
    /// Where the finished image is written (PNG)
    pub output: PathBuf,
    /// RGB color for rays that leave the scene
    pub background: [f32; 3],
    pub render: RenderConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 400,
            pixel_format: "rgba8unorm-srgb".to_string(),
            output: PathBuf::from("render.png"),
            background: [0.6, 0.6, 0.8],
            render: RenderConfig::default(),
        }
    }
}

impl ViewerConfig {
    /// Load a config file. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    pub fn pixel_format(&self) -> Result<PixelFormat> {
        Ok(self.pixel_format.parse()?)
    }

    pub fn background_color(&self) -> Color {
        let [r, g, b] = self.background;
        Color::new(r, g, b, 1.0)
    }
}
