//! Render configuration.

use serde::Deserialize;

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Samples accumulated into every pixel before the render is complete
    pub samples_per_pixel: u32,
    /// Work-queue entries (one sample each) processed per `render_batch` call
    pub batch_size: u32,
    /// Maximum reflection/refraction recursion depth
    pub max_depth: u32,
    /// Seed for jitter and queue shuffling; `None` seeds from OS entropy
    pub seed: Option<u64>,
    /// Trace the rays of each batch on the rayon thread pool
    pub parallel: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 16,
            batch_size: 500,
            max_depth: 20,
            seed: None,
            parallel: false,
        }
    }
}
