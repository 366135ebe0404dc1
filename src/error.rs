use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for layergen operations
#[derive(Error, Diagnostic, Debug)]
pub enum GenError {
    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(layergen::io))]
    Io { path: PathBuf, message: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(layergen::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Cannot find directory \"{layer}\" in the configured layer order")]
    #[diagnostic(
        code(layergen::mismatch),
        help("Check `order` in config.yml: every directory under the layer path must be listed, with matching names")
    )]
    ConfigMismatch { layer: String },

    #[error("Layer \"{layer}\" is listed in the order but {path} does not exist")]
    #[diagnostic(
        code(layergen::missing_layer),
        help("Create the directory, remove the layer from `order`, or set `missingLayers: skip`")
    )]
    MissingLayer { layer: String, path: PathBuf },

    #[error("Failed to decode {path}: {message}")]
    #[diagnostic(code(layergen::decode))]
    Decode { path: PathBuf, message: String },

    #[error("Build error: {message}")]
    #[diagnostic(code(layergen::build))]
    Build {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Too many combinations: the product of layer sizes overflows")]
    #[diagnostic(
        code(layergen::overflow),
        help("Reduce the number of layers or images per layer")
    )]
    TooManyCombinations,
}

impl GenError {
    pub(crate) fn io(path: impl Into<PathBuf>, context: &str, err: impl std::fmt::Display) -> Self {
        GenError::Io {
            path: path.into(),
            message: format!("{}: {}", context, err),
        }
    }

    pub(crate) fn decode(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        GenError::Decode {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GenError>;
