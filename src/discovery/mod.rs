//! Layer discovery for layergen projects.
//!
//! Matches the layer directories on disk against the configured order and
//! collects each layer's PNG assets.
//!
//! # Example
//!
//! ```ignore
//! use layergen::{discover_layers, Config};
//!
//! let config = Config::load("config.yml".as_ref())?;
//! let discovery = discover_layers(&config)?;
//! println!("{} layers with images", discovery.retained().count());
//! ```

mod scanner;

use std::path::PathBuf;

use crate::config::{Config, MissingLayerPolicy};
use crate::error::{GenError, Result};
use crate::source::ImageSource;

pub use scanner::{is_png, list_layer_dirs, scan_layer};

/// One configured layer and its assets.
#[derive(Debug, Clone)]
pub struct Layer {
    /// Directory name, as listed in `order`.
    pub name: String,
    /// Absolute or config-relative layer directory.
    pub dir: PathBuf,
    /// Assets in sorted path order.
    pub images: Vec<ImageSource>,
    /// The directory was not found on disk.
    pub missing: bool,
}

impl Layer {
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Result of discovering layers, in configured order (bottom to top).
#[derive(Debug, Clone)]
pub struct Discovery {
    pub root: PathBuf,
    pub layers: Vec<Layer>,
}

impl Discovery {
    /// Layers that take part in the product.
    pub fn retained(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter().filter(|layer| !layer.is_empty())
    }

    /// Layers dropped because they have no images.
    pub fn dropped(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter().filter(|layer| layer.is_empty())
    }

    /// Per-layer image sets of the retained layers, bottom to top.
    pub fn image_sets(&self) -> Vec<Vec<ImageSource>> {
        self.retained().map(|layer| layer.images.clone()).collect()
    }

    /// Total number of images across all layers.
    pub fn image_count(&self) -> usize {
        self.layers.iter().map(|layer| layer.images.len()).sum()
    }
}

/// Discover the configured layers under `config.layer_path`.
///
/// Fails with [`GenError::ConfigMismatch`] if a directory on disk is not
/// listed in the order. Listed layers missing from disk follow
/// `config.missing_layers`.
pub fn discover_layers(config: &Config) -> Result<Discovery> {
    let root = config.layer_path.clone();
    let on_disk = list_layer_dirs(&root)?;

    if let Some(unlisted) = on_disk.iter().find(|dir| !config.order.contains(dir)) {
        return Err(GenError::ConfigMismatch {
            layer: unlisted.clone(),
        });
    }

    let mut layers = Vec::with_capacity(config.order.len());
    for name in &config.order {
        let dir = root.join(name);
        let missing = !dir.is_dir();

        if missing && config.missing_layers == MissingLayerPolicy::Error {
            return Err(GenError::MissingLayer {
                layer: name.clone(),
                path: dir,
            });
        }

        let images = scan_layer(&dir)?.into_iter().map(ImageSource::File).collect();
        layers.push(Layer {
            name: name.clone(),
            dir,
            images,
            missing,
        });
    }

    Ok(Discovery { root, layers })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn config_for(root: &std::path::Path, order: &[&str]) -> Config {
        Config {
            layer_path: root.to_path_buf(),
            order: order.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn touch(path: PathBuf) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_discover_in_configured_order() {
        let dir = tempdir().unwrap();
        touch(dir.path().join("background/blue.png"));
        touch(dir.path().join("background/red.png"));
        touch(dir.path().join("eyes/round.png"));

        let discovery = discover_layers(&config_for(dir.path(), &["eyes", "background"])).unwrap();

        let names: Vec<&str> = discovery.layers.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["eyes", "background"]);
        assert_eq!(discovery.layers[1].images.len(), 2);
        assert_eq!(discovery.image_count(), 3);
    }

    #[test]
    fn test_unlisted_directory_is_mismatch() {
        let dir = tempdir().unwrap();
        touch(dir.path().join("background/blue.png"));
        touch(dir.path().join("hats/cap.png"));

        let err = discover_layers(&config_for(dir.path(), &["background"])).unwrap_err();

        match err {
            GenError::ConfigMismatch { layer } => assert_eq!(layer, "hats"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_layer_is_dropped() {
        let dir = tempdir().unwrap();
        touch(dir.path().join("background/blue.png"));
        fs::create_dir_all(dir.path().join("empty")).unwrap();

        let discovery = discover_layers(&config_for(dir.path(), &["background", "empty"])).unwrap();

        assert_eq!(discovery.retained().count(), 1);
        assert_eq!(discovery.dropped().next().unwrap().name, "empty");
        assert_eq!(discovery.image_sets().len(), 1);
    }

    #[test]
    fn test_missing_layer_skipped_by_default() {
        let dir = tempdir().unwrap();
        touch(dir.path().join("background/blue.png"));

        let discovery = discover_layers(&config_for(dir.path(), &["background", "ghost"])).unwrap();

        let ghost = discovery.dropped().next().unwrap();
        assert_eq!(ghost.name, "ghost");
        assert!(ghost.missing);
    }

    #[test]
    fn test_plain_file_named_in_order_is_missing_and_empty() {
        let dir = tempdir().unwrap();
        touch(dir.path().join("background/blue.png"));
        touch(dir.path().join("stray.png"));

        let config = config_for(dir.path(), &["background", "stray.png"]);
        let discovery = discover_layers(&config).unwrap();

        let stray = &discovery.layers[1];
        assert!(stray.missing);
        assert!(stray.images.is_empty());
        assert!(!discovery.layers[0].missing);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_asset_fails_discovery() {
        let dir = tempdir().unwrap();
        touch(dir.path().join("body/a.png"));
        std::os::unix::fs::symlink(
            dir.path().join("body/nowhere.png"),
            dir.path().join("body/b.png"),
        )
        .unwrap();

        let err = discover_layers(&config_for(dir.path(), &["body"])).unwrap_err();

        assert!(matches!(err, GenError::Io { .. }));
    }

    #[test]
    fn test_missing_layer_error_policy() {
        let dir = tempdir().unwrap();
        touch(dir.path().join("background/blue.png"));

        let config = Config {
            missing_layers: MissingLayerPolicy::Error,
            ..config_for(dir.path(), &["background", "ghost"])
        };

        let err = discover_layers(&config).unwrap_err();
        assert!(matches!(err, GenError::MissingLayer { ref layer, .. } if layer == "ghost"));
    }
}
