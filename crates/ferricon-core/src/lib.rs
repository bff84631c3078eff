//! The core library of the ferricon converter.

pub mod canvas;
pub mod config;
pub mod encode;
pub mod render;
pub mod resource;

pub use canvas::{Canvas, CanvasError, RenderOutcome, RenderRequest};
pub use encode::{Download, OutputFormat};
pub use render::{Rasterizer, RenderError, Size, SvgRasterizer};
pub use resource::VectorResource;

/// The tool name, this is used in various places like the user config file
/// directory and the tracing target filter.
pub const TOOL_NAME: &str = "ferricon";
