//! High-level image operations.
//!
//! These functions combine calculations with backend execution. Planning is
//! pure: every variant's dimensions, output path and label are checked
//! before a single byte is written. Execution then runs one plan at a time
//! against a backend.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::resolve_target_dimensions;
use super::params::{EncodeParams, OutputFormat, Quality, ResampleFilter, ResampleParams};
use crate::naming::output_filename;
use crate::sizes::{ORIGINAL, SizeSet};
use image::DynamicImage;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PlanError {
    #[error("Invalid size label {0:?}: use letters, digits, '-' or '_'")]
    InvalidLabel(String),
    #[error("Size {label:?} resolves to {width}x{height}, outside 1..={max} for {format:?}")]
    InvalidSize {
        label: String,
        width: u32,
        height: u32,
        max: u32,
        format: OutputFormat,
    },
}

/// A label ends up in a filename, so it must not carry path separators.
fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// One variant to produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantPlan {
    pub label: String,
    pub width: u32,
    pub height: u32,
    pub output: PathBuf,
    /// `false` for `original`: the decoded source is encoded as-is.
    pub resample: bool,
}

/// A variant written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedVariant {
    pub label: String,
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
}

/// Plan every variant for a source of the given natural dimensions.
///
/// `sizes` must already contain `original` if one is wanted. The `original`
/// entry never resamples and always reports the natural dimensions,
/// whatever its spec says.
pub fn plan_variants(
    natural: Dimensions,
    sizes: &SizeSet,
    output_dir: &Path,
    base: &str,
    format: OutputFormat,
) -> Result<Vec<VariantPlan>, PlanError> {
    let max = format.max_dimension();

    sizes
        .iter()
        .map(|(label, spec)| {
            if !is_valid_label(label) {
                return Err(PlanError::InvalidLabel(label.to_string()));
            }

            let resample = label != ORIGINAL;
            let (width, height) = if resample {
                resolve_target_dimensions(
                    (natural.width, natural.height),
                    spec.width,
                    spec.height,
                )
            } else {
                (natural.width, natural.height)
            };

            if width == 0 || height == 0 || width > max || height > max {
                return Err(PlanError::InvalidSize {
                    label: label.to_string(),
                    width,
                    height,
                    max,
                    format,
                });
            }

            Ok(VariantPlan {
                label: label.to_string(),
                width,
                height,
                output: output_dir.join(output_filename(base, label, format)),
                resample,
            })
        })
        .collect()
}

/// Encoding settings shared by every variant of one call.
#[derive(Debug, Clone, Copy)]
pub struct VariantSettings {
    pub format: OutputFormat,
    pub quality: Quality,
    pub filter: ResampleFilter,
}

/// Produce one planned variant.
///
/// The resampled canvas lives only for the duration of this call.
pub fn create_variant(
    backend: &impl ImageBackend,
    source: &DynamicImage,
    plan: &VariantPlan,
    settings: &VariantSettings,
) -> Result<GeneratedVariant, BackendError> {
    let encode = EncodeParams {
        output: plan.output.clone(),
        format: settings.format,
        quality: settings.quality,
    };

    if plan.resample {
        let canvas = backend.resample(
            source,
            &ResampleParams {
                width: plan.width,
                height: plan.height,
                filter: settings.filter,
            },
        )?;
        backend.encode(&canvas, &encode)?;
    } else {
        backend.encode(source, &encode)?;
    }

    Ok(GeneratedVariant {
        label: plan.label.clone(),
        path: plan.output.clone(),
        width: plan.width,
        height: plan.height,
        format: settings.format,
    })
}
