//! The conversion session orchestrator.

use thiserror::Error;
use tiny_skia::Pixmap;

use crate::encode;
use crate::encode::Download;
use crate::encode::EncodeError;
use crate::encode::OutputFormat;
use crate::render::Rasterizer;
use crate::render::RenderError;
use crate::render::Size;
use crate::resource::LoadError;
use crate::resource::ResourceSlot;
use crate::resource::VectorResource;

/// The dimensions of a freshly created session.
pub const DEFAULT_SIZE: Size = Size {
    width: 48,
    height: 48,
};

/// Identifies one issued render request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderId(u64);

/// A render the driver must perform to bring the session up to date.
///
/// The session stays in a pending state until the request is completed via
/// [`Canvas::complete_render`] or [`Canvas::fulfill`], or until a newer
/// request supersedes it.
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest {
    id: RenderId,
    size: Size,
}

impl RenderRequest {
    /// The id to pass back to [`Canvas::complete_render`].
    pub fn id(&self) -> RenderId {
        self.id
    }

    /// The exact dimensions to rasterize at.
    pub fn size(&self) -> Size {
        self.size
    }
}

/// What happened to a completed render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The result was applied to the cached pixel buffer.
    Applied,

    /// A newer request superseded this render, the result was discarded.
    Superseded,
}

/// Orchestrates one conversion session.
///
/// A session starts empty, takes ownership of a vector resource, keeps at
/// most one cached pixel buffer consistent with its current dimensions, and
/// encodes that buffer on download requests.
///
/// Renders are serialized through [`RenderRequest`] tickets: every mutating
/// operation that invalidates the cached buffer issues a new ticket and any
/// outstanding one is superseded, so a result that completes late is never
/// applied over a newer one.
#[derive(Debug)]
pub struct Canvas {
    size: Size,
    format: OutputFormat,
    slot: ResourceSlot,
    buffer: Option<Pixmap>,
    pending: Option<RenderId>,
    generation: u64,
}

impl Canvas {
    /// Creates a session with the default 48x48 size and PNG output.
    pub fn new() -> Self {
        Self {
            size: DEFAULT_SIZE,
            format: OutputFormat::Png,
            slot: ResourceSlot::new(),
            buffer: None,
            pending: None,
            generation: 0,
        }
    }

    /// Loads a new resource and issues a render at the current dimensions.
    ///
    /// The previously cached buffer is discarded. On a parse failure the
    /// previously loaded resource and its buffer remain in place.
    pub fn set_resource(
        &mut self,
        bytes: &[u8],
        file_name: &str,
    ) -> Result<RenderRequest, CanvasError> {
        self.slot.load(bytes, file_name)?;
        self.buffer = None;

        Ok(self.issue_render())
    }

    /// Updates the target dimensions.
    ///
    /// Returns a render request when a resource is loaded and the cached
    /// buffer does not already match the new size, `None` otherwise. Zero
    /// dimensions are rejected and leave the session untouched.
    pub fn set_dimensions(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<Option<RenderRequest>, CanvasError> {
        let size = Size::new(width, height);
        if !size.is_valid() {
            return Err(CanvasError::InvalidDimension(size));
        }

        self.size = size;
        Ok(self.refresh())
    }

    /// Updates the output format.
    ///
    /// Selecting [`OutputFormat::Ico`] forces the canonical icon size as a
    /// side effect. Switching away keeps whatever size is current, the last
    /// explicitly set dimensions win going forward.
    pub fn set_format(&mut self, format: OutputFormat) -> Option<RenderRequest> {
        self.format = format;
        if format == OutputFormat::Ico {
            self.size = encode::ICON_SIZE;
        }

        self.refresh()
    }

    /// Applies the result of a render issued by this session.
    ///
    /// Results for superseded requests are discarded. A failed render never
    /// leaves a buffer behind whose dimensions disagree with the current
    /// ones.
    pub fn complete_render(
        &mut self,
        id: RenderId,
        result: Result<Pixmap, RenderError>,
    ) -> Result<RenderOutcome, RenderError> {
        if self.pending != Some(id) {
            tracing::debug!(?id, "discarding superseded render");
            return Ok(RenderOutcome::Superseded);
        }

        self.pending = None;
        match result {
            Ok(buffer) => {
                // An id match implies the request was issued for the current
                // dimensions, any size change bumps the generation.
                self.buffer = Some(buffer);
                Ok(RenderOutcome::Applied)
            }
            Err(err) => {
                if self.buffer.as_ref().is_some_and(|buffer| {
                    buffer.width() != self.size.width || buffer.height() != self.size.height
                }) {
                    self.buffer = None;
                }

                Err(err)
            }
        }
    }

    /// Rasterizes an outstanding request and applies it in one step.
    ///
    /// This is the blocking request-response path for sequential drivers.
    pub fn fulfill<R>(
        &mut self,
        rasterizer: &R,
        request: RenderRequest,
    ) -> Result<RenderOutcome, CanvasError>
    where
        R: Rasterizer + ?Sized,
    {
        let result = match self.slot.get() {
            Some(resource) => rasterizer.rasterize(resource, request.size()),
            None => return Err(CanvasError::NoResource),
        };

        Ok(self.complete_render(request.id(), result)?)
    }

    /// Encodes the cached pixel buffer for download.
    ///
    /// Fails when no resource has been loaded yet, or while the session has
    /// no pixel buffer matching its current state.
    pub fn request_download(&self) -> Result<Download, CanvasError> {
        let resource = self.slot.get().ok_or(CanvasError::NoResource)?;

        if self.pending.is_some() {
            return Err(CanvasError::NotReady);
        }
        let buffer = self.buffer.as_ref().ok_or(CanvasError::NotReady)?;

        Ok(encode::encode(buffer, self.format, resource.base_name())?)
    }

    /// The current target dimensions.
    pub fn dimensions(&self) -> Size {
        self.size
    }

    /// The current output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// The currently loaded resource, if any.
    pub fn resource(&self) -> Option<&VectorResource> {
        self.slot.get()
    }

    /// The cached pixel buffer, hidden while a render is outstanding.
    pub fn pixel_buffer(&self) -> Option<&Pixmap> {
        if self.pending.is_some() {
            return None;
        }

        self.buffer.as_ref()
    }

    /// Whether a download can currently be served.
    pub fn is_ready(&self) -> bool {
        self.slot.get().is_some() && self.pending.is_none() && self.buffer.is_some()
    }

    /// Issues a render unless the cached buffer already matches the current
    /// state.
    fn refresh(&mut self) -> Option<RenderRequest> {
        self.slot.get()?;

        let matches = self.pending.is_none()
            && self.buffer.as_ref().is_some_and(|buffer| {
                buffer.width() == self.size.width && buffer.height() == self.size.height
            });
        if matches {
            return None;
        }

        Some(self.issue_render())
    }

    fn issue_render(&mut self) -> RenderRequest {
        self.generation += 1;
        let id = RenderId(self.generation);
        self.pending = Some(id);

        tracing::trace!(?id, size = %self.size, "issued render request");

        RenderRequest {
            id,
            size: self.size,
        }
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

/// Returned by the operations on [`Canvas`].
#[derive(Debug, Error)]
pub enum CanvasError {
    /// The requested dimensions contained a zero component.
    #[error("invalid dimensions: {0}")]
    InvalidDimension(Size),

    /// No vector resource has been loaded yet.
    #[error("no vector resource loaded")]
    NoResource,

    /// A render is still outstanding, or the last one failed.
    #[error("the session has no up-to-date pixel buffer")]
    NotReady,

    /// The resource could not be parsed.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The render failed.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// The download could not be encoded.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}
