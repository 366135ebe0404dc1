//! Image references: files on disk or in-memory PNG buffers.

use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{ImageReader, RgbaImage};

use crate::error::{GenError, Result};

/// A single layer asset.
///
/// Cloning is cheap: in-memory buffers are shared.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum ImageSource {
    /// A PNG file on disk.
    File(PathBuf),
    /// An encoded image held in memory, with a display name.
    Memory { name: String, bytes: Arc<[u8]> },
}

impl ImageSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        ImageSource::File(path.into())
    }

    pub fn memory(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        ImageSource::Memory {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Path used in diagnostics.
    pub fn path(&self) -> &Path {
        match self {
            ImageSource::File(path) => path,
            ImageSource::Memory { name, .. } => Path::new(name),
        }
    }

    /// Read the intrinsic pixel dimensions from the image header.
    pub fn dimensions(&self) -> Result<(u32, u32)> {
        match self {
            ImageSource::File(path) => {
                image::image_dimensions(path).map_err(|e| GenError::decode(path, e))
            }
            ImageSource::Memory { bytes, .. } => ImageReader::new(Cursor::new(&bytes[..]))
                .with_guessed_format()
                .map_err(|e| GenError::decode(self.path(), e))?
                .into_dimensions()
                .map_err(|e| GenError::decode(self.path(), e)),
        }
    }

    /// Decode the full image as straight-alpha RGBA8.
    pub fn decode(&self) -> Result<RgbaImage> {
        let image = match self {
            ImageSource::File(path) => image::open(path).map_err(|e| GenError::decode(path, e))?,
            ImageSource::Memory { bytes, .. } => image::load_from_memory(bytes)
                .map_err(|e| GenError::decode(self.path(), e))?,
        };
        Ok(image.to_rgba8())
    }
}

impl fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::File(path) => write!(f, "File({})", path.display()),
            ImageSource::Memory { name, bytes } => {
                write!(f, "Memory({}, {} bytes)", name, bytes.len())
            }
        }
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path().display())
    }
}

/// Encode an RGBA image as PNG bytes.
///
/// Used to build in-memory sources.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .map_err(|e| GenError::Build {
            message: format!("Failed to encode PNG: {}", e),
            help: None,
        })?;
    Ok(bytes)
}
