//! Generate command implementation.
//!
//! Loads config.yml, discovers layers and renders the selected
//! combinations to numbered PNG files.

use std::path::PathBuf;

use clap::Args;

use crate::config::{Config, CONFIG_FILENAME};
use crate::error::Result;
use crate::output::{display_path, plural, Printer};
use crate::pipeline::prepare;
use crate::render::build_thread_pool;

/// Render every (or a sample of) layer combination to PNG files
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Configuration file
    #[arg(long, short, default_value = CONFIG_FILENAME)]
    pub config: PathBuf,

    /// Output directory (overrides outputPath)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Maximum number of images to generate (overrides outputAmount)
    #[arg(long, short = 'n')]
    pub amount: Option<usize>,

    /// Shuffle combinations before truncating
    #[arg(long)]
    pub randomize: bool,

    /// Seed for a reproducible shuffle
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of the first output file (overrides countFrom)
    #[arg(long)]
    pub count_from: Option<u64>,

    /// Combinations rendered concurrently per batch (overrides batchSize)
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Report what would be generated without writing files
    #[arg(long)]
    pub dry_run: bool,
}

impl GenerateArgs {
    /// Apply command-line overrides on top of the loaded config.
    fn apply(&self, config: &mut Config) {
        if let Some(output) = &self.output {
            config.output_path = output.clone();
        }
        if self.amount.is_some() {
            config.output_amount = self.amount;
        }
        if self.randomize {
            config.randomize = true;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(count_from) = self.count_from {
            config.count_from = count_from;
        }
        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }
    }
}

pub fn run(args: GenerateArgs, printer: &Printer) -> Result<()> {
    let mut config = super::load_config(&args.config)?;
    args.apply(&mut config);

    let pool = build_thread_pool(config.threads)?;

    printer.status("Scanning", &display_path(&config.layer_path));
    let plan = prepare(&config, &pool)?;

    for layer in plan.discovery.dropped() {
        let reason = if layer.missing {
            "directory not found"
        } else {
            "no images"
        };
        printer.warning("Skipping", &format!("layer \"{}\" ({})", layer.name, reason));
    }

    let layers = plan.discovery.retained().count();
    printer.info(
        "Measured",
        &format!(
            "canvas {} across {}",
            plan.canvas,
            plural(plan.discovery.image_count(), "image", "images")
        ),
    );
    printer.status(
        "Generating",
        &format!(
            "{} from {} ({} possible)",
            plural(plan.combinations.len(), "combination", "combinations"),
            plural(layers, "layer", "layers"),
            plan.total
        ),
    );

    if args.dry_run {
        printer.success("Finished", "dry run, no images written");
        return Ok(());
    }

    let written = plan.render(&config, &pool, |progress| {
        printer.status(
            "Rendering",
            &format!(
                "[{}/{}] {} of {} images",
                progress.batch, progress.batches, progress.completed, progress.total
            ),
        );
    })?;

    printer.success(
        "Finished",
        &format!(
            "{} to {}",
            plural(written, "image", "images"),
            printer.cyan(&display_path(&config.output_path))
        ),
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::fs;
    use tempfile::tempdir;

    fn args(config: PathBuf) -> GenerateArgs {
        GenerateArgs {
            config,
            output: None,
            amount: None,
            randomize: false,
            seed: None,
            count_from: None,
            batch_size: None,
            dry_run: false,
        }
    }

    fn project() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        for (layer, names) in [("background", &["a", "b"][..]), ("eyes", &["x", "y", "z"][..])] {
            fs::create_dir_all(dir.path().join("layers").join(layer)).unwrap();
            for name in names {
                RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255]))
                    .save(dir.path().join("layers").join(layer).join(format!("{name}.png")))
                    .unwrap();
            }
        }
        fs::write(dir.path().join("config.yml"), "order: [background, eyes]\n").unwrap();
        dir
    }

    #[test]
    fn test_generate_writes_all_combinations() {
        let dir = project();

        run(args(dir.path().join("config.yml")), &Printer::plain()).unwrap();

        for n in 1..=6 {
            assert!(dir.path().join(format!("output/{n}.png")).exists());
        }
        assert!(!dir.path().join("output/7.png").exists());
    }

    #[test]
    fn test_generate_overrides() {
        let dir = project();
        let out = dir.path().join("custom");

        let args = GenerateArgs {
            output: Some(out.clone()),
            amount: Some(2),
            count_from: Some(10),
            randomize: true,
            seed: Some(3),
            ..args(dir.path().join("config.yml"))
        };
        run(args, &Printer::plain()).unwrap();

        assert!(out.join("10.png").exists());
        assert!(out.join("11.png").exists());
        assert!(!out.join("12.png").exists());
        assert!(!dir.path().join("output").exists());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = project();

        let args = GenerateArgs {
            dry_run: true,
            ..args(dir.path().join("config.yml"))
        };
        run(args, &Printer::plain()).unwrap();

        assert!(!dir.path().join("output").exists());
    }

    #[test]
    fn test_missing_config_has_hint() {
        let dir = tempdir().unwrap();

        let err = run(args(dir.path().join("config.yml")), &Printer::plain()).unwrap_err();

        assert!(matches!(err, crate::GenError::Config { help: Some(_), .. }));
    }
}
