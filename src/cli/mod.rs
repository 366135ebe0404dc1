pub mod completions;
pub mod generate;
pub mod init;
pub mod list;

use std::path::Path;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::Result;

/// layergen - Layered PNG combination generator
#[derive(Parser, Debug)]
#[command(name = "layergen")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render every (or a sample of) layer combination to PNG files
    Generate(generate::GenerateArgs),

    /// Show layers, canvas size and combination count
    List(list::ListArgs),

    /// Initialize a project (generates config.yml from the layer directories)
    Init(init::InitArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Load a config file, with a hint when it is missing.
fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Err(crate::error::GenError::Config {
            message: format!("{} not found", path.display()),
            help: Some("Run `layergen init` or pass --config <file>".to_string()),
        });
    }
    Config::load(path)
}
