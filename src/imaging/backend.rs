//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations every backend must
//! support: decode, resample, and encode.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate for decoding/resampling/GIF and `webp` (libwebp) for lossy WebP.

use super::params::{EncodeParams, ResampleParams};
use image::{DynamicImage, ImageFormat};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(
        "Cannot decode {} (extension {extension:?}): tried {}",
        .path.display(),
        format_list(.attempted)
    )]
    Decode {
        path: PathBuf,
        extension: String,
        attempted: Vec<ImageFormat>,
    },
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

fn format_list(formats: &[ImageFormat]) -> String {
    formats
        .iter()
        .map(|f| format!("{f:?}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Width and height of a bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn of(image: &DynamicImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
        }
    }
}

/// Trait for image processing backends.
///
/// Every backend must implement all three operations so the derivation logic
/// is backend-agnostic. `Sync` because variants may be encoded in parallel
/// against one shared backend.
pub trait ImageBackend: Sync {
    /// Decode a file, choosing codecs from the (lowercase) extension hint.
    fn decode(&self, path: &Path, extension: &str) -> Result<DynamicImage, BackendError>;

    /// Resample the whole of `source` onto a new transparent canvas.
    fn resample(
        &self,
        source: &DynamicImage,
        params: &ResampleParams,
    ) -> Result<DynamicImage, BackendError>;

    /// Encode `image` and write it to `params.output`.
    fn encode(&self, image: &DynamicImage, params: &EncodeParams) -> Result<(), BackendError>;
}
