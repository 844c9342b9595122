//! Pure Rust image processing backend, plus libwebp for lossy WebP.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, GIF, WebP) | `image::load_from_memory_with_format`, probed in order |
//! | Resample | `image::imageops::resize` into an `RgbaImage` canvas |
//! | Encode → WebP | `webp::Encoder::from_rgba` (libwebp, lossy at the configured quality) |
//! | Encode → GIF | `image::codecs::gif::GifEncoder` (defaults) |

use super::backend::{BackendError, ImageBackend};
use super::params::{EncodeParams, OutputFormat, ResampleParams};
use image::codecs::gif::GifEncoder;
use image::{DynamicImage, ExtendedColorType, ImageFormat, RgbaImage, imageops};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, error};

/// Probe order when the extension says nothing useful.
const FALLBACK_PROBE: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::WebP,
    ImageFormat::Gif,
];

/// Decoders to try, in order, for a lowercase extension.
///
/// `.jpg` uploads that are really WebP are common enough (phone galleries,
/// "save image as") that JPEG falls back to WebP.
pub fn decode_candidates(extension: &str) -> &'static [ImageFormat] {
    match extension {
        "jpg" | "jpeg" => &[ImageFormat::Jpeg, ImageFormat::WebP],
        "png" => &[ImageFormat::Png],
        "gif" => &[ImageFormat::Gif],
        "webp" => &[ImageFormat::WebP],
        _ => FALLBACK_PROBE,
    }
}

/// Backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Try each candidate decoder against the same bytes; first success wins.
fn probe_decode(
    bytes: &[u8],
    path: &Path,
    extension: &str,
) -> Result<DynamicImage, BackendError> {
    let candidates = decode_candidates(extension);
    for &format in candidates {
        match image::load_from_memory_with_format(bytes, format) {
            Ok(img) => {
                debug!(path = %path.display(), ?format, "decoded source image");
                return Ok(img);
            }
            Err(e) => debug!(path = %path.display(), ?format, "decoder rejected source: {e}"),
        }
    }

    error!(
        path = %path.display(),
        extension,
        "no decoder could read the source image"
    );
    Err(BackendError::Decode {
        path: path.to_path_buf(),
        extension: extension.to_string(),
        attempted: candidates.to_vec(),
    })
}

/// Lossy WebP from RGBA so transparency survives.
fn save_webp(img: &DynamicImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let rgba = img.to_rgba8();
    let encoded = webp::Encoder::from_rgba(rgba.as_raw(), rgba.width(), rgba.height())
        .encode_simple(false, quality as f32)
        .map_err(|e| BackendError::ProcessingFailed(format!("WebP encode failed: {:?}", e)))?;
    std::fs::write(path, &*encoded).map_err(BackendError::Io)
}

fn save_gif(img: &DynamicImage, path: &Path) -> Result<(), BackendError> {
    let rgba = img.to_rgba8();
    let file = std::fs::File::create(path).map_err(BackendError::Io)?;
    let mut writer = BufWriter::new(file);
    {
        let mut encoder = GifEncoder::new(&mut writer);
        encoder
            .encode(
                rgba.as_raw(),
                rgba.width(),
                rgba.height(),
                ExtendedColorType::Rgba8,
            )
            .map_err(|e| BackendError::ProcessingFailed(format!("GIF encode failed: {}", e)))?;
    }
    writer.flush().map_err(BackendError::Io)
}

impl ImageBackend for RustBackend {
    fn decode(&self, path: &Path, extension: &str) -> Result<DynamicImage, BackendError> {
        let bytes = std::fs::read(path).map_err(BackendError::Io)?;
        probe_decode(&bytes, path, extension)
    }

    fn resample(
        &self,
        source: &DynamicImage,
        params: &ResampleParams,
    ) -> Result<DynamicImage, BackendError> {
        if params.width == 0 || params.height == 0 {
            return Err(BackendError::ProcessingFailed(format!(
                "Cannot resample to {}x{}",
                params.width, params.height
            )));
        }

        // The scaled source covers the whole target, so the RGBA result is
        // the transparent canvas: source alpha carries over, nothing is blended.
        let canvas: RgbaImage = imageops::resize(
            source,
            params.width,
            params.height,
            params.filter.filter_type(),
        );

        Ok(DynamicImage::ImageRgba8(canvas))
    }

    fn encode(&self, image: &DynamicImage, params: &EncodeParams) -> Result<(), BackendError> {
        match params.format {
            OutputFormat::WebP => save_webp(image, &params.output, params.quality.value()),
            OutputFormat::Gif => save_gif(image, &params.output),
        }
    }
}
