//! PNG output for composited images.

use std::fs;
use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::error::{GenError, Result};

/// Path of the output file numbered `number`.
pub fn output_file(dir: &Path, number: u64) -> PathBuf {
    dir.join(format!("{}.png", number))
}

/// Create the output directory and any missing parents.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .map_err(|e| GenError::io(dir, "Failed to create output directory", e))?;
    }
    Ok(())
}

/// Write a composited image to a PNG file.
pub fn write_png(image: &RgbaImage, path: &Path) -> Result<()> {
    image
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| GenError::io(path, "Failed to write PNG", e))
}
