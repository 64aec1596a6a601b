//! Headless Glint viewer.
//!
//! Steps the progressive renderer once per frame until every sample is in,
//! then writes the film to disk. Pass a JSON config path as the first
//! argument to override the defaults.

mod config;
mod demo_scene;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use glint_renderer::{Film, RenderStatus, Renderer, WhittedTracer};
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::ViewerConfig;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Glint Viewer");

    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => ViewerConfig::load(&path)?,
        None => ViewerConfig::default(),
    };
    let format = config.pixel_format()?;

    let mut scene = demo_scene::build()?;
    let tracer = WhittedTracer::new(config.background_color());
    let mut renderer = Renderer::new(config.width, config.height, format, config.render.clone())
        .context("Failed to set up renderer")?;

    let (_, total) = renderer.progress();
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] [{bar:50}] {percent}% ({pos}/{len})")?
            .progress_chars("=> "),
    );

    let start = Instant::now();
    loop {
        // Headless surface: the size never changes, but the camera is
        // refreshed every frame as a windowed frontend would.
        let camera = scene.camera_mut();
        camera.set_image_size(config.width, config.height);
        camera.update();

        match renderer.render_batch(&scene, &tracer) {
            RenderStatus::Rendering { completed, .. } => pb.set_position(completed as u64),
            RenderStatus::Complete => break,
        }
    }
    pb.finish();
    log::info!("Rendered in {:?}", start.elapsed());

    save_png(renderer.film(), &config.output)?;
    log::info!("Saved to {}", config.output.display());

    Ok(())
}

/// Write the film as an 8-bit RGBA PNG.
fn save_png(film: &Film, path: &Path) -> Result<()> {
    image::save_buffer(
        path,
        &film.to_rgba8(),
        film.width(),
        film.height(),
        image::ColorType::Rgba8,
    )
    .with_context(|| format!("Failed to write image {}", path.display()))
}
