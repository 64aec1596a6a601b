//! Progressive sampler.
//!
//! Every pixel index is queued `samples_per_pixel` times and the queue is
//! shuffled once, so partial renders show noise spread evenly over the
//! image instead of scanlines. Each [`Renderer::render_batch`] call traces a
//! bounded slice of the queue, adds the samples into per-pixel running sums
//! and repacks the touched pixels into the [`Film`].

use crate::{Camera, Color, Film, FilmError, PixelFormat, RenderConfig, Scene, Tracer};
use glint_math::Ray;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use thiserror::Error;

/// Errors that can occur when setting up a render.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("Image size {width}x{height} has no pixels")]
    EmptyImage { width: u32, height: u32 },

    #[error("Samples per pixel must be positive")]
    NoSamples,

    #[error("Batch size must be positive")]
    EmptyBatch,

    #[error("Work queue of {0} samples does not fit in memory")]
    QueueTooLarge(u128),

    #[error("Film error: {0}")]
    Film(#[from] FilmError),
}

/// Result type for render setup.
pub type RenderResult<T> = Result<T, RenderError>;

/// Outcome of one [`Renderer::render_batch`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    /// Samples remain; `completed` of `total` queue entries are done.
    Rendering { completed: usize, total: usize },
    /// Every sample has been accumulated. Terminal.
    Complete,
}

/// Progressive renderer owning the accumulation buffers and the film.
pub struct Renderer {
    width: u32,
    height: u32,
    config: RenderConfig,
    film: Film,
    accumulation: Vec<Color>,
    sample_count: Vec<u32>,
    queue: Vec<u32>,
    cursor: usize,
    rng: StdRng,
}

impl Renderer {
    /// Set up a render of `width x height` pixels.
    pub fn new(
        width: u32,
        height: u32,
        format: PixelFormat,
        config: RenderConfig,
    ) -> RenderResult<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyImage { width, height });
        }
        if config.samples_per_pixel == 0 {
            return Err(RenderError::NoSamples);
        }
        if config.batch_size == 0 {
            return Err(RenderError::EmptyBatch);
        }

        let pixel_count = width as usize * height as usize;
        let total = pixel_count as u128 * config.samples_per_pixel as u128;
        // Queue entries are u32 pixel indices
        if pixel_count > u32::MAX as usize {
            return Err(RenderError::QueueTooLarge(total));
        }
        let queue_len = usize::try_from(total).map_err(|_| RenderError::QueueTooLarge(total))?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut queue = Vec::with_capacity(queue_len);
        for pixel in 0..pixel_count as u32 {
            for _ in 0..config.samples_per_pixel {
                queue.push(pixel);
            }
        }
        queue.shuffle(&mut rng);

        let mut film = Film::new(width, height, format);
        film.fill(Color::new(0.0, 0.0, 0.0, 1.0));

        log::info!(
            "Progressive render {}x{} @ {} spp ({} samples, batches of {})",
            width,
            height,
            config.samples_per_pixel,
            queue_len,
            config.batch_size
        );

        Ok(Self {
            width,
            height,
            config,
            film,
            accumulation: vec![Color::ZERO; pixel_count],
            sample_count: vec![0; pixel_count],
            queue,
            cursor: 0,
            rng,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// The packed image reflecting every sample accumulated so far.
    pub fn film(&self) -> &Film {
        &self.film
    }

    /// Queue entries processed and queue length.
    pub fn progress(&self) -> (usize, usize) {
        (self.cursor, self.queue.len())
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= self.queue.len()
    }

    fn pixel_index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Samples accumulated into pixel (x, y).
    pub fn sample_count(&self, x: u32, y: u32) -> u32 {
        self.sample_count[self.pixel_index(x, y)]
    }

    /// Running average of pixel (x, y); transparent black before its first sample.
    pub fn average(&self, x: u32, y: u32) -> Color {
        let index = self.pixel_index(x, y);
        match self.sample_count[index] {
            0 => Color::ZERO,
            count => self.accumulation[index] / count as f32,
        }
    }

    /// Trace the next batch of samples.
    ///
    /// Returns [`RenderStatus::Complete`] once the queue is exhausted,
    /// including on the call that exhausts it; later calls change nothing.
    pub fn render_batch(&mut self, scene: &Scene, tracer: &dyn Tracer) -> RenderStatus {
        let total = self.queue.len();
        if self.cursor >= total {
            return RenderStatus::Complete;
        }

        let end = (self.cursor + self.config.batch_size as usize).min(total);
        let camera = scene.camera();

        // Rays are always generated in queue order so the RNG stream is the
        // same whether or not tracing runs in parallel.
        let mut samples: Vec<(usize, Ray)> = Vec::with_capacity(end - self.cursor);
        for k in self.cursor..end {
            let pixel = self.queue[k] as usize;
            let ray = self.jittered_ray(camera, pixel);
            samples.push((pixel, ray));
        }

        let max_depth = self.config.max_depth;
        let colors: Vec<Color> = if self.config.parallel {
            samples
                .par_iter()
                .map(|(_, ray)| tracer.trace(scene, ray, max_depth))
                .collect()
        } else {
            samples
                .iter()
                .map(|(_, ray)| tracer.trace(scene, ray, max_depth))
                .collect()
        };

        for (&(pixel, _), color) in samples.iter().zip(colors) {
            self.accumulate(pixel, color);
        }

        log::debug!(
            "Rendered samples {}..{} of {} ({} this batch)",
            self.cursor,
            end,
            total,
            end - self.cursor
        );
        self.cursor = end;

        if self.cursor >= total {
            log::info!("Render complete: {} samples", total);
            RenderStatus::Complete
        } else {
            RenderStatus::Rendering {
                completed: self.cursor,
                total,
            }
        }
    }

    fn jittered_ray(&mut self, camera: &Camera, pixel: usize) -> Ray {
        let x = (pixel % self.width as usize) as f32;
        let y = (pixel / self.width as usize) as f32;
        let jitter_x: f32 = self.rng.gen();
        let jitter_y: f32 = self.rng.gen();
        camera.generate_ray(x + jitter_x, y + jitter_y)
    }

    fn accumulate(&mut self, pixel: usize, color: Color) {
        self.accumulation[pixel] += color;
        self.sample_count[pixel] += 1;

        let average = self.accumulation[pixel] / self.sample_count[pixel] as f32;
        let x = (pixel % self.width as usize) as u32;
        let y = (pixel / self.width as usize) as u32;
        self.film.put_color(x, y, average);
    }
}
