//! Rendering module for layergen.
//!
//! Composites combinations onto the shared canvas and writes them to
//! numbered PNG files, batch by batch.

mod batch;
mod compose;
mod png;

pub use batch::{build_thread_pool, render_batches, BatchProgress, FileRenderer, Render};
pub use compose::{composite, placement_offset, render_combination};
pub use png::{ensure_output_dir, output_file, write_png};
