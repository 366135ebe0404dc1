//! List command implementation.
//!
//! Discovers layers and prints an inventory with the canvas size and the
//! number of possible combinations.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::canvas::measure_canvas;
use crate::combine::combination_count;
use crate::config::CONFIG_FILENAME;
use crate::discovery::{discover_layers, Discovery};
use crate::error::{GenError, Result};
use crate::output::{plural, Printer};
use crate::render::build_thread_pool;

/// Show layers, canvas size and combination count
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Configuration file
    #[arg(long, short, default_value = CONFIG_FILENAME)]
    pub config: PathBuf,

    /// Print a JSON summary to stdout
    #[arg(long)]
    pub json: bool,
}

/// Machine-readable project summary.
#[derive(Debug, Serialize)]
pub struct Summary {
    pub layers: Vec<LayerSummary>,
    pub canvas: [u32; 2],
    pub combinations: usize,
}

#[derive(Debug, Serialize)]
pub struct LayerSummary {
    pub name: String,
    pub images: usize,
    pub missing: bool,
}

/// Summarize a discovery; the canvas is measured on `pool`.
pub fn summarize(discovery: &Discovery, pool: &rayon::ThreadPool) -> Result<Summary> {
    let sets = discovery.image_sets();
    let canvas = pool.install(|| measure_canvas(&sets))?;
    let combinations = if sets.is_empty() {
        0
    } else {
        combination_count(&sets)?
    };

    Ok(Summary {
        layers: discovery
            .layers
            .iter()
            .map(|layer| LayerSummary {
                name: layer.name.clone(),
                images: layer.images.len(),
                missing: layer.missing,
            })
            .collect(),
        canvas: [canvas.width, canvas.height],
        combinations,
    })
}

pub fn run(args: ListArgs, printer: &Printer) -> Result<()> {
    let config = super::load_config(&args.config)?;
    let pool = build_thread_pool(config.threads)?;
    let discovery = discover_layers(&config)?;
    let summary = summarize(&discovery, &pool)?;

    if args.json {
        let json = serde_json::to_string_pretty(&summary).map_err(|e| GenError::Build {
            message: format!("Failed to serialize summary: {}", e),
            help: None,
        })?;
        println!("{}", json);
        return Ok(());
    }

    for layer in &summary.layers {
        let detail = if layer.missing {
            printer.dim("(directory not found)")
        } else {
            plural(layer.images, "image", "images")
        };

        if layer.images == 0 {
            printer.warning(&layer.name, &detail);
        } else {
            printer.info(&layer.name, &detail);
        }
    }

    printer.info(
        "Canvas",
        &format!("{}x{}", summary.canvas[0], summary.canvas[1]),
    );
    printer.success(
        "Total",
        &plural(summary.combinations, "combination", "combinations"),
    );

    Ok(())
}
