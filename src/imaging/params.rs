//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides which variants to create) and the [`backend`](super::backend)
//! (which does the actual pixel work). This separation allows swapping backends
//! (e.g. for testing with a mock) without changing operation logic.
//!
//! ## Types
//!
//! - [`Quality`] — Lossy encoding quality (0–100, default 90). Clamped on construction.
//! - [`OutputFormat`] — GIF or WebP; one decision per derivation call.
//! - [`ResampleFilter`] — Interpolating filter used when scaling onto a canvas.
//! - [`ResampleParams`] — Target canvas dimensions and filter.
//! - [`EncodeParams`] — Output path, format and quality for one encode.

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Quality setting for lossy image encoding (0-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.min(100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Encoded output format.
///
/// GIF sources stay GIF so palette animations and transparency keys survive
/// the trip; everything else becomes WebP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Gif,
    WebP,
}

impl OutputFormat {
    /// Pick the output format from a source file extension (case-insensitive).
    pub fn for_source_extension(extension: &str) -> Self {
        if extension.eq_ignore_ascii_case("gif") {
            Self::Gif
        } else {
            Self::WebP
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Gif => "gif",
            Self::WebP => "webp",
        }
    }

    /// Largest width or height the encoder accepts.
    pub fn max_dimension(self) -> u32 {
        match self {
            Self::Gif => u16::MAX as u32,
            Self::WebP => 16383,
        }
    }
}

/// Interpolating filter for resampling.
///
/// Nearest-neighbour is intentionally absent: every variant is an
/// area-weighted resample of the full source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResampleFilter {
    #[default]
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl ResampleFilter {
    pub fn filter_type(self) -> FilterType {
        match self {
            Self::Triangle => FilterType::Triangle,
            Self::CatmullRom => FilterType::CatmullRom,
            Self::Gaussian => FilterType::Gaussian,
            Self::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Parameters for resampling a bitmap onto a new canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResampleParams {
    pub width: u32,
    pub height: u32,
    pub filter: ResampleFilter,
}

/// Parameters for encoding a bitmap to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeParams {
    pub output: PathBuf,
    pub format: OutputFormat,
    pub quality: Quality,
}
