//! Layer compositing.
//!
//! Stacks the images of one combination onto a transparent canvas with
//! source-over alpha blending, bottom layer first.

use image::{imageops, RgbaImage};

use crate::canvas::CanvasSize;
use crate::config::Placement;
use crate::error::Result;
use crate::source::ImageSource;

/// Top-left offset of a `width` x `height` image on the canvas.
pub fn placement_offset(
    canvas: CanvasSize,
    width: u32,
    height: u32,
    placement: Placement,
) -> (i64, i64) {
    match placement {
        Placement::Center => (
            (i64::from(canvas.width) - i64::from(width)) / 2,
            (i64::from(canvas.height) - i64::from(height)) / 2,
        ),
        Placement::Origin => (0, 0),
    }
}

/// Composite already-decoded layers, bottom to top.
pub fn composite<'a>(
    layers: impl IntoIterator<Item = &'a RgbaImage>,
    canvas: CanvasSize,
    placement: Placement,
) -> RgbaImage {
    // ImageBuffer::new zero-fills: every pixel starts fully transparent
    let mut output = RgbaImage::new(canvas.width, canvas.height);

    for layer in layers {
        let (x, y) = placement_offset(canvas, layer.width(), layer.height(), placement);
        imageops::overlay(&mut output, layer, x, y);
    }

    output
}

/// Decode and composite one combination.
pub fn render_combination(
    combination: &[ImageSource],
    canvas: CanvasSize,
    placement: Placement,
) -> Result<RgbaImage> {
    let layers = combination
        .iter()
        .map(ImageSource::decode)
        .collect::<Result<Vec<_>>>()?;

    Ok(composite(&layers, canvas, placement))
}
