use std::{
    ops::Range,
    path::Path,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use anyhow::Context as _;
use rayon::prelude::*;

use crate::{
    expr::node::Expr,
    foundation::error::{RandArtError, RandArtResult},
    foundation::math::quantize_channel,
};

/// Straight-alpha RGBA8 pixel buffer, row-major, 4 bytes per pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes.
    pub data: Vec<u8>,
}

impl ImageRGBA {
    /// RGBA bytes at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Copy into an [`image::RgbaImage`].
    pub fn to_rgba_image(&self) -> RandArtResult<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.data.clone()).ok_or_else(|| {
            RandArtError::render("pixel buffer length does not match width*height*4")
        })
    }

    /// Encode as PNG at `path`, creating parent directories as needed.
    pub fn save_png(&self, path: impl AsRef<Path>) -> RandArtResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        image::save_buffer_with_format(
            path,
            &self.data,
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

/// Shared cancellation flag checked between attempts and once per row.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// A token that has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Visible to every clone.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// `true` once [`CancelToken::cancel`] has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Split `rows` into `workers` contiguous bands.
///
/// Every band gets `rows / workers` rows and the last band also takes the remainder, so the
/// bands cover `0..rows` exactly once. Leading bands are empty when `rows < workers`.
pub fn row_bands(rows: u32, workers: usize) -> Vec<Range<u32>> {
    let workers = workers.max(1);
    let per_worker = (rows as usize / workers) as u32;
    (0..workers)
        .map(|w| {
            let start = w as u32 * per_worker;
            let end = if w + 1 == workers {
                rows
            } else {
                start + per_worker
            };
            start..end
        })
        .collect()
}

/// Number of workers used when no explicit thread count is configured.
pub fn available_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Evaluate `tree` over a `size`×`size` grid.
///
/// A dedicated pool of `threads` workers (hardware parallelism when `None`) is built for this
/// pass; each worker owns one row band and writes only that slice of the buffer. The call
/// returns after every worker has finished.
pub fn rasterize(tree: &Expr, size: u32, threads: Option<usize>) -> RandArtResult<ImageRGBA> {
    rasterize_with_cancel(tree, size, threads, None)
}

#[tracing::instrument(skip(tree, cancel))]
pub(crate) fn rasterize_with_cancel(
    tree: &Expr,
    size: u32,
    threads: Option<usize>,
    cancel: Option<&CancelToken>,
) -> RandArtResult<ImageRGBA> {
    if size == 0 {
        return Err(RandArtError::validation("image size must be >= 1"));
    }
    let row_bytes = (size as usize)
        .checked_mul(4)
        .ok_or_else(|| RandArtError::render("pixel buffer size overflow"))?;
    let len = row_bytes
        .checked_mul(size as usize)
        .ok_or_else(|| RandArtError::render("pixel buffer size overflow"))?;

    let workers = threads.unwrap_or_else(available_workers);
    let pool = build_thread_pool(workers)?;
    let bands = row_bands(size, workers);
    tracing::trace!(workers, bands = bands.len(), "raster pass");

    let mut data = vec![0u8; len];
    let mut slices = Vec::with_capacity(bands.len());
    let mut rest = data.as_mut_slice();
    for band in &bands {
        let (head, tail) = std::mem::take(&mut rest).split_at_mut(band.len() * row_bytes);
        slices.push((band.clone(), head));
        rest = tail;
    }

    let outcome = pool.install(|| {
        slices
            .into_par_iter()
            .try_for_each(|(rows, out)| shade_band(tree, size, rows, out, cancel))
    });
    outcome?;

    Ok(ImageRGBA {
        width: size,
        height: size,
        data,
    })
}

fn shade_band(
    tree: &Expr,
    size: u32,
    rows: Range<u32>,
    out: &mut [u8],
    cancel: Option<&CancelToken>,
) -> RandArtResult<()> {
    let row_bytes = size as usize * 4;
    let scale = f64::from(size);
    for (py, row) in rows.zip(out.chunks_exact_mut(row_bytes)) {
        if cancel.is_some_and(CancelToken::is_cancelled) {
            return Err(RandArtError::Cancelled);
        }
        let y = 2.0 * f64::from(py) / scale - 1.0;
        for (px, px_out) in row.chunks_exact_mut(4).enumerate() {
            let x = 2.0 * px as f64 / scale - 1.0;
            let c = tree.eval(x, y);
            px_out[0] = quantize_channel(c.r);
            px_out[1] = quantize_channel(c.g);
            px_out[2] = quantize_channel(c.b);
            px_out[3] = 255;
        }
    }
    Ok(())
}

fn build_thread_pool(threads: usize) -> RandArtResult<rayon::ThreadPool> {
    if threads == 0 {
        return Err(RandArtError::validation("worker thread count must be >= 1"));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("randart-raster-{i}"))
        .build()
        .map_err(|e| RandArtError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
