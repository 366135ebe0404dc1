//! End-to-end generation: discovery, canvas sizing, combination selection
//! and batched rendering.

use rayon::ThreadPool;

use crate::canvas::{measure_canvas, CanvasSize};
use crate::combine::{combination_count, generate_combinations, Selection};
use crate::config::Config;
use crate::discovery::{discover_layers, Discovery};
use crate::error::{GenError, Result};
use crate::render::{ensure_output_dir, render_batches, BatchProgress, FileRenderer};
use crate::source::ImageSource;

/// Everything known before the first image is rendered.
#[derive(Debug)]
pub struct Plan {
    pub discovery: Discovery,
    pub canvas: CanvasSize,
    /// Size of the full product, before truncation.
    pub total: usize,
    /// Selected combinations, in output order.
    pub combinations: Vec<Vec<ImageSource>>,
}

/// Discover layers, size the canvas and select combinations.
///
/// Nothing is written to disk.
pub fn prepare(config: &Config, pool: &ThreadPool) -> Result<Plan> {
    let discovery = discover_layers(config)?;
    let sets = discovery.image_sets();

    if sets.is_empty() {
        return Err(GenError::Config {
            message: format!(
                "No PNG images found in any configured layer under {}",
                discovery.root.display()
            ),
            help: Some("Add .png files under <layerPath>/<layer>/".to_string()),
        });
    }

    let canvas = pool.install(|| measure_canvas(&sets))?;
    let total = combination_count(&sets)?;
    let combinations = generate_combinations(&sets, &Selection::from_config(config))?;
    config.last_output_number(combinations.len())?;

    Ok(Plan {
        discovery,
        canvas,
        total,
        combinations,
    })
}

impl Plan {
    pub fn renderer(&self, config: &Config) -> FileRenderer {
        FileRenderer {
            canvas: self.canvas,
            placement: config.placement,
            output_dir: config.output_path.clone(),
            count_from: config.count_from,
        }
    }

    /// Render every selected combination to `config.output_path`.
    ///
    /// Returns the number of images written.
    pub fn render(
        &self,
        config: &Config,
        pool: &ThreadPool,
        on_batch: impl FnMut(BatchProgress),
    ) -> Result<usize> {
        ensure_output_dir(&config.output_path)?;

        render_batches(
            &self.combinations,
            config.effective_batch_size(),
            pool,
            &self.renderer(config),
            on_batch,
        )?;

        Ok(self.combinations.len())
    }
}
