//! Init command implementation.
//!
//! Generates a `config.yml` whose order lists the existing layer
//! directories.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::config::CONFIG_FILENAME;
use crate::discovery::{list_layer_dirs, scan_layer};
use crate::error::{GenError, Result};
use crate::output::{display_path, plural, Printer};

/// Initialize a project by generating a config.yml
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Project directory (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Layer directory, relative to the project
    #[arg(long, default_value = "layers")]
    pub layers: PathBuf,

    /// Overwrite existing config.yml
    #[arg(long)]
    pub force: bool,
}

/// Render the config.yml text for the given layer order.
pub fn config_yaml(layer_path: &Path, order: &[String]) -> String {
    let mut yaml = String::new();

    let layer_path = if layer_path.is_absolute() {
        layer_path.display().to_string()
    } else {
        format!("./{}", layer_path.display())
    };

    yaml.push_str(&format!("layerPath: \"{}\"\n", layer_path));
    yaml.push_str("outputPath: \"./output\"\n");
    yaml.push_str("# bottom to top\n");
    yaml.push_str("order:\n");
    for name in order {
        yaml.push_str(&format!("  - \"{}\"\n", name));
    }
    yaml.push_str("countFrom: 1\n");
    yaml.push_str("randomize: false\n");

    yaml
}

pub fn run(args: InitArgs, printer: &Printer) -> Result<()> {
    let config_path = args.path.join(CONFIG_FILENAME);

    if config_path.exists() && !args.force {
        return Err(GenError::Build {
            message: format!("{} already exists", CONFIG_FILENAME),
            help: Some("Use --force to overwrite".to_string()),
        });
    }

    let layer_root = args.path.join(&args.layers);
    printer.status("Scanning", &display_path(&layer_root));
    let order = list_layer_dirs(&layer_root)?;

    if order.is_empty() {
        return Err(GenError::Build {
            message: format!("No layer directories found in {}", layer_root.display()),
            help: Some("Create one subdirectory per layer, each holding .png files".to_string()),
        });
    }

    let mut images = 0;
    for name in &order {
        images += scan_layer(&layer_root.join(name))?.len();
    }

    fs::write(&config_path, config_yaml(&args.layers, &order))
        .map_err(|e| GenError::io(&config_path, "Failed to write config", e))?;

    printer.info("Discovered", &order.join(", "));
    printer.success(
        "Created",
        &format!(
            "{} ({}, {} found)",
            CONFIG_FILENAME,
            plural(order.len(), "layer", "layers"),
            plural(images, "image", "images")
        ),
    );
    printer.info("Hint", "Reorder `order` so the bottom layer comes first");

    Ok(())
}
