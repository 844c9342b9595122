//! Shared test utilities for the image-resizer test suite.
//!
//! Synthetic source files in every decodable format, plus helpers for
//! inspecting what a derivation wrote.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let source = tmp.path().join("Holiday Photo.jpg");
//! create_test_jpeg(&source, 800, 600);
//!
//! // ... derive ...
//! assert_eq!(sniff_format(&out), Some(ImageFormat::WebP));
//! ```

use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::BufWriter;
use std::path::Path;

// =========================================================================
// Synthetic pixels
// =========================================================================

/// Opaque RGB gradient; cheap and never uniform, so codecs do real work.
pub fn gradient_rgb(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

/// RGBA gradient whose alpha fades left to right.
pub fn gradient_rgba(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let alpha = if width > 1 { (x * 255 / (width - 1)) as u8 } else { 255 };
        Rgba([(x % 256) as u8, (y % 256) as u8, 64, alpha])
    })
}

// =========================================================================
// Source files
// =========================================================================

fn writer(path: &Path) -> BufWriter<std::fs::File> {
    BufWriter::new(std::fs::File::create(path).unwrap())
}

/// Create a small valid JPEG file with the given dimensions.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = gradient_rgb(width, height);
    JpegEncoder::new(writer(path))
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
}

/// Create a PNG with an alpha channel.
pub fn create_test_png(path: &Path, width: u32, height: u32) {
    let img = gradient_rgba(width, height);
    PngEncoder::new(writer(path))
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgba8)
        .unwrap();
}

pub fn create_test_gif(path: &Path, width: u32, height: u32) {
    let img = gradient_rgba(width, height);
    let mut out = writer(path);
    GifEncoder::new(&mut out)
        .encode(img.as_raw(), width, height, ExtendedColorType::Rgba8)
        .unwrap();
}

/// Lossless WebP via the `image` crate's own encoder.
pub fn create_test_webp(path: &Path, width: u32, height: u32) {
    let img = gradient_rgba(width, height);
    WebPEncoder::new_lossless(writer(path))
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgba8)
        .unwrap();
}

// =========================================================================
// Output inspection
// =========================================================================

/// Format detected from file contents (magic bytes), ignoring the extension.
pub fn sniff_format(path: &Path) -> Option<ImageFormat> {
    image::ImageReader::open(path)
        .ok()?
        .with_guessed_format()
        .ok()?
        .format()
}

/// Number of regular files directly inside `dir` (0 if it does not exist).
pub fn file_count(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .filter(|e| e.path().is_file())
                .count()
        })
        .unwrap_or(0)
}
