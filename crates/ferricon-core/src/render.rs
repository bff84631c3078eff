//! Rasterization of vector resources into fixed-size pixel buffers.

use std::fmt;
use std::fmt::Debug;
use std::fmt::Display;

use thiserror::Error;
use tiny_skia::Pixmap;
use tiny_skia::Transform;

use crate::resource::VectorResource;

/// A pixel buffer size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    /// The width in pixels.
    pub width: u32,

    /// The height in pixels.
    pub height: u32,
}

impl Size {
    /// Creates a new size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether both dimensions are non-zero.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Whether width and height are equal.
    pub fn is_square(&self) -> bool {
        self.width == self.height
    }
}

impl Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A trait for rasterizing a vector resource into a pixel buffer.
///
/// Implementations render the full input into exactly the requested
/// dimensions, stretching as necessary. A call is one blocking
/// request-response unit, partial results are never returned.
pub trait Rasterizer: Debug {
    /// Renders the resource at exactly the given size.
    fn rasterize(&self, resource: &VectorResource, size: Size) -> Result<Pixmap, RenderError>;
}

/// The default rasterizer.
///
/// Scaling is derived from the intrinsic size of the vector image, the
/// aspect ratio is not preserved.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgRasterizer;

impl Rasterizer for SvgRasterizer {
    #[tracing::instrument(skip_all, fields(name = %resource.base_name(), %size))]
    fn rasterize(&self, resource: &VectorResource, size: Size) -> Result<Pixmap, RenderError> {
        tracing::debug!("rasterizing vector resource");

        let mut pixmap =
            Pixmap::new(size.width, size.height).ok_or(RenderError::InvalidDimensions(size))?;

        let intrinsic = resource.tree().size();
        let scale_x = size.width as f32 / intrinsic.width();
        let scale_y = size.height as f32 / intrinsic.height();

        resvg::render(
            resource.tree(),
            Transform::from_scale(scale_x, scale_y),
            &mut pixmap.as_mut(),
        );

        Ok(pixmap)
    }
}

/// Returned by [`Rasterizer::rasterize`].
#[derive(Debug, Error)]
pub enum RenderError {
    /// The requested dimensions cannot back a pixel buffer.
    #[error("cannot rasterize into a {0} pixel buffer")]
    InvalidDimensions(Size),

    /// A catch-all variant for user implementations.
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}
