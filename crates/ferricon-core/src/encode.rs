//! Encoding of pixel buffers into the supported container formats.
//!
//! This is the policy layer around the byte-level codecs: background
//! handling for lossy output, the canonical icon size, and download file
//! name derivation.

use std::io;

use ecow::EcoString;
use ecow::eco_format;
use image::ExtendedColorType;
use image::codecs::jpeg::JpegEncoder;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use tiny_skia::Pixmap;

use crate::render::Size;

/// The canonical icon output size.
///
/// Icon output is always emitted at this size regardless of the session's
/// prior dimensions.
pub const ICON_SIZE: Size = Size {
    width: 48,
    height: 48,
};

/// The fixed file name for icon downloads.
pub const ICON_FILE_NAME: &str = "favicon.ico";

/// The quality used for lossy output.
const JPEG_QUALITY: u8 = 100;

/// The supported output container formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossless raster output, transparency is preserved.
    #[default]
    Png,

    /// Lossy raster output, transparent pixels are composited onto an opaque
    /// white background.
    Jpeg,

    /// Icon container output at the canonical 48x48 size.
    Ico,
}

impl OutputFormat {
    /// The file extension used for downloads.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Ico => "ico",
        }
    }

    /// Whether encoding discards the alpha channel.
    pub fn discards_alpha(&self) -> bool {
        matches!(self, Self::Jpeg)
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// An encoded download, the bytes and the file name to persist them under.
#[derive(Debug, Clone)]
pub struct Download {
    /// The encoded container bytes.
    pub bytes: Vec<u8>,

    /// The suggested file name.
    pub file_name: EcoString,
}

/// Encodes a pixel buffer into the given format and derives the download
/// file name from the resource base name and the buffer dimensions.
#[tracing::instrument(skip_all, fields(%format, base_name))]
pub fn encode(
    buffer: &Pixmap,
    format: OutputFormat,
    base_name: &str,
) -> Result<Download, EncodeError> {
    tracing::debug!("encoding pixel buffer");

    let size = Size::new(buffer.width(), buffer.height());
    let bytes = match format {
        OutputFormat::Png => buffer.encode_png()?,
        OutputFormat::Jpeg => encode_jpeg(buffer)?,
        OutputFormat::Ico => encode_ico(buffer, size)?,
    };

    Ok(Download {
        bytes,
        file_name: file_name(format, base_name, size),
    })
}

/// Derives the download file name for the given format and dimensions.
pub fn file_name(format: OutputFormat, base_name: &str, size: Size) -> EcoString {
    match format {
        OutputFormat::Ico => ICON_FILE_NAME.into(),
        _ if size.is_square() => eco_format!("{base_name}-{}.{}", size.width, format.extension()),
        _ => eco_format!("{base_name}-{}.{}", size, format.extension()),
    }
}

fn encode_jpeg(buffer: &Pixmap) -> Result<Vec<u8>, EncodeError> {
    let rgb = flatten_onto_white(buffer);

    let mut bytes = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY);
    encoder.encode(&rgb, buffer.width(), buffer.height(), ExtendedColorType::Rgb8)?;

    Ok(bytes)
}

fn encode_ico(buffer: &Pixmap, size: Size) -> Result<Vec<u8>, EncodeError> {
    if size != ICON_SIZE {
        // Unreachable as long as the session forces the canonical size
        // before rendering.
        tracing::error!(%size, "icon encode requested at a non-canonical size");
        return Err(EncodeError::UnsupportedIconSize(size));
    }

    let image = ico::IconImage::from_rgba_data(size.width, size.height, unmultiply(buffer));

    let mut dir = ico::IconDir::new(ico::ResourceType::Icon);
    dir.add_entry(ico::IconDirEntry::encode(&image)?);

    let mut bytes = Vec::new();
    dir.write(&mut bytes)?;

    Ok(bytes)
}

/// Composites every pixel onto an opaque white background, discarding the
/// alpha channel.
fn flatten_onto_white(buffer: &Pixmap) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(buffer.pixels().len() * 3);

    for pixel in buffer.pixels() {
        let straight = pixel.demultiply();
        let alpha = u16::from(straight.alpha());
        let composite =
            |channel: u8| ((u16::from(channel) * alpha + 255 * (255 - alpha) + 127) / 255) as u8;

        rgb.extend([
            composite(straight.red()),
            composite(straight.green()),
            composite(straight.blue()),
        ]);
    }

    rgb
}

/// Converts the premultiplied buffer into straight-alpha RGBA bytes.
fn unmultiply(buffer: &Pixmap) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(buffer.pixels().len() * 4);

    for pixel in buffer.pixels() {
        let straight = pixel.demultiply();
        rgba.extend([
            straight.red(),
            straight.green(),
            straight.blue(),
            straight.alpha(),
        ]);
    }

    rgba
}

/// Returned by [`encode`].
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Icon output was requested for a buffer that is not the canonical
    /// size.
    #[error("unsupported icon size {0}, icons are always {ICON_SIZE}")]
    UnsupportedIconSize(Size),

    /// The buffer could not be encoded as PNG.
    #[error("the pixel buffer could not be encoded")]
    Png(#[from] png::EncodingError),

    /// The buffer could not be encoded as JPEG.
    #[error("the pixel buffer could not be encoded")]
    Jpeg(#[from] image::ImageError),

    /// The icon container could not be written.
    #[error("the icon container could not be written")]
    Io(#[from] io::Error),
}
