//! layergen - Layered PNG combination generator
//!
//! A library for stacking one image from each layer directory into a
//! flattened PNG, for every combination of layer assets (or a sample).

pub mod canvas;
pub mod cli;
pub mod combine;
pub mod config;
pub mod discovery;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod source;

pub use canvas::{measure_canvas, CanvasSize, SizeAccumulator};
pub use combine::{combination_count, generate_combinations, select, Cartesian, Selection};
pub use config::{Config, MissingLayerPolicy, Placement};
pub use discovery::{discover_layers, Discovery, Layer};
pub use error::{GenError, Result};
pub use pipeline::{prepare, Plan};
pub use render::{
    build_thread_pool, composite, render_batches, render_combination, write_png, BatchProgress,
    FileRenderer, Render,
};
pub use source::{encode_png, ImageSource};
