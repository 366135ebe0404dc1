//! Batched rendering.
//!
//! Combinations are rendered in fixed-size batches. All renders of a batch
//! run concurrently on a rayon pool; the next batch starts only after every
//! render of the current one has finished. The first failure aborts the run.
//! Files written by earlier batches are left in place.

use std::path::PathBuf;

use rayon::prelude::*;
use rayon::ThreadPool;

use crate::canvas::CanvasSize;
use crate::config::Placement;
use crate::error::{GenError, Result};
use crate::source::ImageSource;

use super::compose::render_combination;
use super::png::{output_file, write_png};

/// Renders the item at a position of the selected sequence.
pub trait Render<T>: Sync {
    fn render(&self, index: usize, item: &T) -> Result<()>;
}

impl<T, F> Render<T> for F
where
    F: Fn(usize, &T) -> Result<()> + Sync,
{
    fn render(&self, index: usize, item: &T) -> Result<()> {
        self(index, item)
    }
}

/// Composites combinations and writes them as numbered PNG files.
#[derive(Debug, Clone)]
pub struct FileRenderer {
    pub canvas: CanvasSize,
    pub placement: Placement,
    pub output_dir: PathBuf,
    /// Number of the file written for index 0.
    pub count_from: u64,
}

impl FileRenderer {
    /// Output path for the combination at `index`.
    pub fn path_for(&self, index: usize) -> Result<PathBuf> {
        let number = u64::try_from(index)
            .ok()
            .and_then(|index| self.count_from.checked_add(index))
            .ok_or_else(|| GenError::Build {
                message: format!(
                    "Output number overflows: countFrom {} + index {}",
                    self.count_from, index
                ),
                help: Some("Lower `countFrom`".to_string()),
            })?;
        Ok(output_file(&self.output_dir, number))
    }
}

impl Render<Vec<ImageSource>> for FileRenderer {
    fn render(&self, index: usize, combination: &Vec<ImageSource>) -> Result<()> {
        let path = self.path_for(index)?;
        let image = render_combination(combination, self.canvas, self.placement)?;
        write_png(&image, &path)
    }
}

/// Progress after a batch has completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    /// 1-based batch number.
    pub batch: usize,
    pub batches: usize,
    /// Items rendered so far, across all batches.
    pub completed: usize,
    pub total: usize,
}

/// Render `items` in batches of `batch_size` on `pool`.
///
/// `on_batch` is called after each batch completes.
pub fn render_batches<T, R>(
    items: &[T],
    batch_size: usize,
    pool: &ThreadPool,
    renderer: &R,
    mut on_batch: impl FnMut(BatchProgress),
) -> Result<()>
where
    T: Sync,
    R: Render<T>,
{
    let batch_size = batch_size.max(1);
    let batches = items.len().div_ceil(batch_size);
    let mut completed = 0;

    for (batch, chunk) in items.chunks(batch_size).enumerate() {
        let offset = batch * batch_size;

        pool.install(|| {
            chunk
                .par_iter()
                .enumerate()
                .try_for_each(|(i, item)| renderer.render(offset + i, item))
        })?;

        completed += chunk.len();
        on_batch(BatchProgress {
            batch: batch + 1,
            batches,
            completed,
            total: items.len(),
        });
    }

    Ok(())
}

/// Build the worker pool, optionally capped to `threads` workers.
pub fn build_thread_pool(threads: Option<usize>) -> Result<ThreadPool> {
    if threads == Some(0) {
        return Err(GenError::Config {
            message: "`threads` must be at least 1 when set".to_string(),
            help: Some("Remove `threads` to use one worker per CPU".to_string()),
        });
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder.build().map_err(|e| GenError::Build {
        message: format!("Failed to build worker pool: {}", e),
        help: None,
    })
}
