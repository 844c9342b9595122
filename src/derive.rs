//! Multi-size image derivation.
//!
//! Takes one source image and a [`SizeSet`], writes one encoded file per
//! label, and returns where each one went.
//!
//! ## Flow
//!
//! ```text
//! Source ──resolve──▶ decoded bitmap ──plan──▶ [VariantPlan] ──create──▶ Derivation
//!  File: decode with codec probing      labels, dims, paths    resample + encode
//!  Bitmap: used as-is                   checked up front       one file per label
//! ```
//!
//! ## Output format
//!
//! Decided once per call: a `.gif` source (case-insensitive) produces GIF for
//! every label, anything else produces WebP. In-memory bitmaps produce WebP.
//!
//! ## All-or-nothing
//!
//! A decode or planning failure returns before anything is written. Each
//! output file is created exclusively by the call that writes it, and if
//! producing any variant fails, only the files this call created are removed
//! before the error is returned. Returned paths are absolute.

use crate::config::ResizerConfig;
use crate::imaging::{
    BackendError, Dimensions, GeneratedVariant, ImageBackend, OutputFormat, PlanError,
    RustBackend, VariantPlan, VariantSettings, create_variant, plan_variants,
};
use crate::naming::{base_filename, split_name, timestamp_token};
use crate::sizes::SizeSet;
use image::DynamicImage;
use rayon::prelude::*;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum DeriveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Imaging(#[from] BackendError),
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error("Output file already exists: {}", .0.display())]
    OutputExists(PathBuf),
}

impl DeriveError {
    /// True when no codec could read the source.
    pub fn is_decode_failure(&self) -> bool {
        matches!(self, DeriveError::Imaging(BackendError::Decode { .. }))
    }
}

/// Where the pixels come from.
#[derive(Debug, Clone)]
pub enum Source {
    /// A file on disk. `client_name` is the name the uploader gave it
    /// (e.g. `"Holiday.JPG"` for a temp upload at `/tmp/upl-4f2a`); when
    /// absent, the path's own file name is used for naming and codec choice.
    File {
        path: PathBuf,
        client_name: Option<String>,
    },
    /// An already-decoded bitmap. `name` only feeds the output slug.
    Bitmap { image: DynamicImage, name: String },
}

impl Source {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Source::File {
            path: path.into(),
            client_name: None,
        }
    }

    pub fn upload(path: impl Into<PathBuf>, client_name: impl Into<String>) -> Self {
        Source::File {
            path: path.into(),
            client_name: Some(client_name.into()),
        }
    }

    pub fn bitmap(image: DynamicImage, name: impl Into<String>) -> Self {
        Source::Bitmap {
            image,
            name: name.into(),
        }
    }
}

/// A source resolved to pixels plus the naming facts derived from it.
struct ResolvedSource {
    image: DynamicImage,
    stem: String,
    format: OutputFormat,
}

fn resolve_source(
    backend: &impl ImageBackend,
    source: Source,
) -> Result<ResolvedSource, BackendError> {
    match source {
        Source::File { path, client_name } => {
            let name = client_name.unwrap_or_else(|| {
                path.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default()
            });
            let (stem, extension) = split_name(&name);
            let format = OutputFormat::for_source_extension(&extension);
            let image = backend.decode(&path, &extension)?;
            Ok(ResolvedSource {
                image,
                stem: stem.to_string(),
                format,
            })
        }
        Source::Bitmap { image, name } => Ok(ResolvedSource {
            image,
            stem: name,
            format: OutputFormat::WebP,
        }),
    }
}

/// Result of one derivation: variants in size-set order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Derivation {
    pub variants: Vec<GeneratedVariant>,
}

impl Derivation {
    pub fn get(&self, label: &str) -> Option<&GeneratedVariant> {
        self.variants.iter().find(|v| v.label == label)
    }

    /// Output path for a label.
    pub fn path(&self, label: &str) -> Option<&Path> {
        self.get(label).map(|v| v.path.as_path())
    }

    pub fn labels(&self) -> Vec<&str> {
        self.variants.iter().map(|v| v.label.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GeneratedVariant> {
        self.variants.iter()
    }
}

/// Tracks files created by an in-flight derivation and deletes them on drop
/// unless the derivation completes. Only paths this call created are ever
/// recorded.
struct OutputGuard {
    written: Vec<PathBuf>,
    committed: bool,
}

impl OutputGuard {
    fn new() -> Self {
        Self {
            written: Vec::new(),
            committed: false,
        }
    }

    fn record(&mut self, path: &Path) {
        self.written.push(path.to_path_buf());
    }

    fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for OutputGuard {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        for path in &self.written {
            match std::fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => warn!(path = %path.display(), "could not remove partial output: {e}"),
            }
        }
    }
}

/// Derive every size of `source` into `output_dir` with the production backend.
pub fn derive(
    source: Source,
    output_dir: &Path,
    sizes: &SizeSet,
    config: &ResizerConfig,
) -> Result<Derivation, DeriveError> {
    derive_with_backend(&RustBackend::new(), source, output_dir, sizes, config)
}

/// Derive using a specific backend (allows testing with mock).
pub fn derive_with_backend(
    backend: &impl ImageBackend,
    source: Source,
    output_dir: &Path,
    sizes: &SizeSet,
    config: &ResizerConfig,
) -> Result<Derivation, DeriveError> {
    let resolved = resolve_source(backend, source)?;
    let natural = Dimensions::of(&resolved.image);
    let base = base_filename(&resolved.stem, timestamp_token());
    let output_dir = std::path::absolute(output_dir)?;

    let sizes = sizes.with_original((natural.width, natural.height));
    let plans = plan_variants(natural, &sizes, &output_dir, &base, resolved.format)?;

    std::fs::create_dir_all(&output_dir)?;

    let settings = VariantSettings {
        format: resolved.format,
        quality: config.quality(),
        filter: config.filter,
    };

    let variants = if config.parallel {
        run_parallel(backend, &resolved.image, &plans, &settings)?
    } else {
        run_sequential(backend, &resolved.image, &plans, &settings)?
    };

    info!(
        base = %base,
        natural_width = natural.width,
        natural_height = natural.height,
        variants = variants.len(),
        "derived image variants"
    );

    Ok(Derivation { variants })
}

/// Create the empty output file for `plan`, refusing to touch an existing
/// one, and hand it to the guard.
fn reserve_output(guard: &mut OutputGuard, plan: &VariantPlan) -> Result<(), DeriveError> {
    match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&plan.output)
    {
        Ok(_) => {
            guard.record(&plan.output);
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            warn!(path = %plan.output.display(), "output path already taken");
            Err(DeriveError::OutputExists(plan.output.clone()))
        }
        Err(e) => Err(DeriveError::Io(e)),
    }
}

fn run_sequential(
    backend: &impl ImageBackend,
    source: &DynamicImage,
    plans: &[VariantPlan],
    settings: &VariantSettings,
) -> Result<Vec<GeneratedVariant>, DeriveError> {
    let mut guard = OutputGuard::new();
    let mut variants = Vec::with_capacity(plans.len());

    for plan in plans {
        reserve_output(&mut guard, plan)?;
        let variant = create_variant(backend, source, plan, settings)?;
        info!(label = %variant.label, path = %variant.path.display(), "wrote variant");
        variants.push(variant);
    }

    guard.commit();
    Ok(variants)
}

fn run_parallel(
    backend: &impl ImageBackend,
    source: &DynamicImage,
    plans: &[VariantPlan],
    settings: &VariantSettings,
) -> Result<Vec<GeneratedVariant>, DeriveError> {
    let mut guard = OutputGuard::new();
    for plan in plans {
        reserve_output(&mut guard, plan)?;
    }

    // Indexed collect keeps size-set order.
    let results: Vec<Result<GeneratedVariant, BackendError>> = plans
        .par_iter()
        .map(|plan| create_variant(backend, source, plan, settings))
        .collect();

    let variants = results.into_iter().collect::<Result<Vec<_>, _>>()?;
    for variant in &variants {
        info!(label = %variant.label, path = %variant.path.display(), "wrote variant");
    }

    guard.commit();
    Ok(variants)
}
