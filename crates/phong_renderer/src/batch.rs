//! Row-batch parallel rendering.
//!
//! Divides the image into contiguous bands of rows (batches). Each batch
//! gets its own worker thread and its own slice of the pixel buffer, so no
//! two workers ever touch the same pixel.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::renderer::{render_pixel, PixelBuffer, RenderConfig, RenderResult};
use crate::{Camera, Color, SceneDescription};

/// Default number of row batches.
pub const DEFAULT_BATCH_COUNT: u32 = 20;

/// A contiguous range of image rows rendered by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBatch {
    /// First row (inclusive), counted from the bottom of the image
    pub start: u32,
    /// Last row (exclusive)
    pub end: u32,
    /// Index of this batch, also used to derive its random seed
    pub index: usize,
}

impl RowBatch {
    /// Number of rows in this batch.
    pub fn rows(&self) -> u32 {
        self.end - self.start
    }
}

/// Rows per batch when splitting `height` rows into `batch_count` batches.
pub fn rows_per_batch(height: u32, batch_count: u32) -> u32 {
    height.div_ceil(batch_count.max(1)).max(1)
}

/// Split rows `0..height` into at most `batch_count` disjoint batches.
///
/// Every batch but the last has the same number of rows.
pub fn generate_batches(height: u32, batch_count: u32) -> Vec<RowBatch> {
    let size = rows_per_batch(height, batch_count);

    (0..height)
        .step_by(size as usize)
        .enumerate()
        .map(|(index, start)| RowBatch {
            start,
            end: (start + size).min(height),
            index,
        })
        .collect()
}

/// Best-effort count of rows still to render.
///
/// Workers decrement it as they finish rows; the optional callback receives
/// the new count and must be cheap, since it runs on the worker threads.
pub struct Progress {
    remaining: AtomicU32,
    on_row: Option<Box<dyn Fn(u32) + Send + Sync>>,
}

impl Progress {
    pub fn new() -> Self {
        Self {
            remaining: AtomicU32::new(0),
            on_row: None,
        }
    }

    /// Progress that reports every finished row to `callback`.
    pub fn with_callback(callback: impl Fn(u32) + Send + Sync + 'static) -> Self {
        Self {
            remaining: AtomicU32::new(0),
            on_row: Some(Box::new(callback)),
        }
    }

    /// Rows not yet finished.
    pub fn remaining(&self) -> u32 {
        self.remaining.load(Ordering::Relaxed)
    }

    fn start(&self, rows: u32) {
        self.remaining.store(rows, Ordering::Relaxed);
    }

    fn row_done(&self) {
        let previous = self
            .remaining
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |r| Some(r.saturating_sub(1)))
            .unwrap_or_else(|r| r);

        if let Some(callback) = &self.on_row {
            callback(previous.saturating_sub(1));
        }
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

/// The generator a batch renders with: seeded from `base_seed` plus the
/// batch index, so batches never share a stream.
fn batch_rng(base_seed: u64, batch: &RowBatch) -> StdRng {
    StdRng::seed_from_u64(base_seed.wrapping_add(batch.index as u64))
}

/// Read-only state shared by every worker.
struct BatchContext<'a> {
    scene: &'a SceneDescription,
    camera: &'a Camera,
    config: &'a RenderConfig,
    progress: &'a Progress,
}

/// Render one batch into its slice of the pixel buffer.
///
/// `pixels` holds exactly the batch's rows, row-major.
fn render_batch(batch: &RowBatch, pixels: &mut [Color], ctx: &BatchContext, rng: &mut StdRng) {
    let scene = ctx.scene;
    let width = scene.width as usize;

    for (offset, row_pixels) in pixels.chunks_mut(width).enumerate() {
        let row = batch.start + offset as u32;

        for (col, pixel) in row_pixels.iter_mut().enumerate() {
            *pixel += render_pixel(
                ctx.camera,
                &scene.world,
                &scene.lights,
                col as u32,
                row,
                scene.width,
                scene.height,
                scene.samples_per_pixel,
                ctx.config,
                rng,
            );
        }

        ctx.progress.row_done();
    }

    log::debug!(
        "Batch {} finished (rows {}..{})",
        batch.index,
        batch.start,
        batch.end
    );
}

/// Render the whole scene.
///
/// Starts one worker thread per row batch and returns once every worker
/// has finished. The returned buffer holds per-pixel sample sums.
pub fn render(
    scene: &SceneDescription,
    config: &RenderConfig,
    progress: &Progress,
) -> RenderResult<PixelBuffer> {
    let mut buffer = PixelBuffer::new(scene.width, scene.height);
    if scene.width == 0 || scene.height == 0 {
        log::warn!("Empty image ({}x{}), nothing to render", scene.width, scene.height);
        return Ok(buffer);
    }

    let camera = scene.camera_for_render();
    let batches = generate_batches(scene.height, config.batch_count);
    let chunk_len = rows_per_batch(scene.height, config.batch_count) as usize * scene.width as usize;
    let base_seed = config.seed.unwrap_or_else(rand::random);

    log::info!(
        "Rendering {}x{} @ {} spp in {} batches",
        scene.width,
        scene.height,
        scene.samples_per_pixel,
        batches.len()
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(batches.len())
        .thread_name(|i| format!("phong-batch-{}", i))
        .build()?;

    let ctx = BatchContext {
        scene,
        camera: &camera,
        config,
        progress,
    };
    let ctx = &ctx;
    progress.start(scene.height);

    let start = Instant::now();
    pool.scope(|s| {
        for (batch, pixels) in batches.iter().zip(buffer.pixels.chunks_mut(chunk_len)) {
            s.spawn(move |_| {
                let mut rng = batch_rng(base_seed, batch);
                render_batch(batch, pixels, ctx, &mut rng);
            });
        }
    });

    log::info!("Rendered in {:?}", start.elapsed());
    Ok(buffer)
}
