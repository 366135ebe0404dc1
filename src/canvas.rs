//! Canvas sizing across every layer asset.
//!
//! The canvas must fit the widest and the tallest image of any layer. Image
//! headers are inspected in parallel and folded into a [`SizeAccumulator`].

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use rayon::prelude::*;

use crate::error::Result;
use crate::source::ImageSource;

/// Output canvas dimensions in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for CanvasSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Running per-axis maxima, safe to update from many threads.
///
/// Each axis is an independent atomic update-if-greater, so the result does
/// not depend on the order observations arrive in.
#[derive(Debug, Default)]
pub struct SizeAccumulator {
    width: AtomicU32,
    height: AtomicU32,
}

impl SizeAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one image's dimensions.
    pub fn observe(&self, width: u32, height: u32) {
        self.width.fetch_max(width, Ordering::AcqRel);
        self.height.fetch_max(height, Ordering::AcqRel);
    }

    pub fn size(&self) -> CanvasSize {
        CanvasSize {
            width: self.width.load(Ordering::Acquire),
            height: self.height.load(Ordering::Acquire),
        }
    }
}

/// Compute the canvas size fitting every image of every layer.
///
/// Headers are read concurrently on the current rayon pool. The first
/// unreadable image aborts the measurement.
pub fn measure_canvas(layers: &[Vec<ImageSource>]) -> Result<CanvasSize> {
    let accumulator = SizeAccumulator::new();

    layers
        .par_iter()
        .flat_map(|layer| layer.par_iter())
        .try_for_each(|source| -> Result<()> {
            let (width, height) = source.dimensions()?;
            accumulator.observe(width, height);
            Ok(())
        })?;

    Ok(accumulator.size())
}
