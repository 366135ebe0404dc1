//! Generator configuration (`config.yml`) parsing.
//!
//! The configuration names the layer directories, their stacking order,
//! where outputs go and how combinations are sampled and rendered.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GenError, Result};

/// The default name of the configuration file.
pub const CONFIG_FILENAME: &str = "config.yml";

/// Default number of combinations rendered concurrently per batch.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Where each layer image is drawn on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    /// Centered on the canvas (integer offsets, rounded down).
    #[default]
    Center,
    /// Anchored at the top-left corner.
    Origin,
}

/// What to do with a layer listed in `order` whose directory does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingLayerPolicy {
    /// Treat the layer as having no images (it is dropped from the product).
    #[default]
    Skip,
    /// Abort the run.
    Error,
}

/// Generator configuration loaded from config.yml.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// Directory containing one subdirectory per layer.
    pub layer_path: PathBuf,

    /// Directory generated images are written to.
    pub output_path: PathBuf,

    /// Layer directory names, bottom to top.
    #[serde(alias = "layerOrder")]
    pub order: Vec<String>,

    /// Number used for the first output file.
    pub count_from: u64,

    /// Cap on the number of generated images.
    pub output_amount: Option<usize>,

    /// Shuffle the combinations before truncating.
    pub randomize: bool,

    /// Seed for a reproducible shuffle.
    pub seed: Option<u64>,

    /// Combinations rendered concurrently before the next batch starts.
    pub batch_size: usize,

    /// Worker thread cap for decoding and rendering.
    pub threads: Option<usize>,

    pub placement: Placement,

    pub missing_layers: MissingLayerPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layer_path: PathBuf::from("./layers"),
            output_path: PathBuf::from("./output"),
            order: vec![],
            count_from: 1,
            output_amount: None,
            randomize: false,
            seed: None,
            batch_size: DEFAULT_BATCH_SIZE,
            threads: None,
            placement: Placement::default(),
            missing_layers: MissingLayerPolicy::default(),
        }
    }
}

impl Config {
    /// Load configuration from a config.yml file.
    ///
    /// Relative layer and output paths are resolved against the directory
    /// containing the file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| GenError::io(path, "Failed to read config", e))?;

        let config = Self::parse(&content)?;
        let base = path.parent().unwrap_or(Path::new(""));
        Ok(config.with_base(base))
    }

    /// Parse configuration from a YAML string and validate it.
    pub fn parse(content: &str) -> Result<Self> {
        let mut config: Config = serde_yaml::from_str(content).map_err(|e| GenError::Config {
            message: format!("Invalid config: {}", e),
            help: Some("Check config.yml syntax and key names (e.g. layerPath, order)".to_string()),
        })?;

        config.order = config.order.iter().map(|name| name.trim().to_string()).collect();
        config.validate()?;
        Ok(config)
    }

    /// Resolve relative paths against `base`.
    pub fn with_base(mut self, base: &Path) -> Self {
        if self.layer_path.is_relative() {
            self.layer_path = base.join(&self.layer_path);
        }
        if self.output_path.is_relative() {
            self.output_path = base.join(&self.output_path);
        }
        self
    }

    /// Check semantic constraints serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.order.is_empty() {
            return Err(GenError::Config {
                message: "`order` must list at least one layer".to_string(),
                help: Some("Run `layergen init` to generate an order from the layer directories".to_string()),
            });
        }

        let mut seen = HashSet::new();
        for name in &self.order {
            if name.is_empty() {
                return Err(GenError::Config {
                    message: "`order` contains an empty layer name".to_string(),
                    help: None,
                });
            }
            if name.contains(['/', '\\']) || name == "." || name == ".." {
                return Err(GenError::Config {
                    message: format!("Layer \"{}\" is not a plain directory name", name),
                    help: Some("Layers are direct subdirectories of `layerPath`".to_string()),
                });
            }
            if !seen.insert(name.as_str()) {
                return Err(GenError::Config {
                    message: format!("Layer \"{}\" appears more than once in `order`", name),
                    help: Some("Each layer directory can only be stacked once".to_string()),
                });
            }
        }

        Ok(())
    }

    /// Number of the last output file when `count` images are written.
    ///
    /// Fails if the numbering would overflow.
    pub fn last_output_number(&self, count: usize) -> Result<u64> {
        let span = count.saturating_sub(1) as u64;
        self.count_from
            .checked_add(span)
            .ok_or_else(|| GenError::Config {
                message: format!(
                    "`countFrom` {} leaves no room to number {} images",
                    self.count_from, count
                ),
                help: Some("Lower `countFrom` or set `outputAmount`".to_string()),
            })
    }

    /// Batch size with zero treated as one.
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.max(1)
    }
}
