//! Loading and ownership of vector image resources.

use std::fmt;
use std::fmt::Debug;

use ecow::EcoString;
use thiserror::Error;
use usvg::Options;
use usvg::Tree;

/// The base name used when an upload carries no usable file name.
const FALLBACK_BASE_NAME: &str = "file";

/// A parsed vector image together with its display base name.
///
/// The base name is the original file name with a trailing `.svg` extension
/// stripped, it is later used to derive download file names.
pub struct VectorResource {
    tree: Tree,
    base_name: EcoString,
}

impl VectorResource {
    fn parse(bytes: &[u8], file_name: &str, options: &Options) -> Result<Self, LoadError> {
        let tree = Tree::from_data(bytes, options)?;

        Ok(Self {
            tree,
            base_name: base_name(file_name),
        })
    }

    /// The parsed vector tree.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// The display base name, extension stripped.
    pub fn base_name(&self) -> &str {
        &self.base_name
    }
}

impl Debug for VectorResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VectorResource")
            .field("base_name", &self.base_name)
            .finish_non_exhaustive()
    }
}

/// Derives the display base name from an uploaded file name.
fn base_name(file_name: &str) -> EcoString {
    let stem = match file_name.char_indices().rev().nth(3) {
        Some((idx, _)) if file_name[idx..].eq_ignore_ascii_case(".svg") => &file_name[..idx],
        _ => file_name,
    };

    if stem.is_empty() {
        FALLBACK_BASE_NAME.into()
    } else {
        stem.into()
    }
}

/// Owns at most one live vector resource for a conversion session.
///
/// Loading parses the new input before the previous resource is dropped, so
/// a malformed upload leaves the previous resource in place. Replacement and
/// [`release`][ResourceSlot::release] drop the parsed tree deterministically.
pub struct ResourceSlot {
    options: Options<'static>,
    current: Option<VectorResource>,
}

impl ResourceSlot {
    /// Creates an empty slot with system fonts available for text elements.
    pub fn new() -> Self {
        let mut options = Options::default();
        options.fontdb_mut().load_system_fonts();

        Self {
            options,
            current: None,
        }
    }

    /// Parses new input and takes ownership of it, dropping the previously
    /// held resource on success.
    pub fn load(&mut self, bytes: &[u8], file_name: &str) -> Result<&VectorResource, LoadError> {
        let resource = VectorResource::parse(bytes, file_name, &self.options)?;
        tracing::debug!(name = %resource.base_name(), "loaded vector resource");

        Ok(self.current.insert(resource))
    }

    /// Releases the currently held resource, a no-op on an empty slot.
    pub fn release(&mut self) {
        if self.current.take().is_some() {
            tracing::trace!("released vector resource");
        }
    }

    /// The currently held resource, if any.
    pub fn get(&self) -> Option<&VectorResource> {
        self.current.as_ref()
    }
}

impl Debug for ResourceSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceSlot")
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

impl Default for ResourceSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// Returned by [`ResourceSlot::load`] when the input is not a valid vector
/// image.
#[derive(Debug, Error)]
#[error("malformed vector image")]
pub struct LoadError(#[from] usvg::Error);
