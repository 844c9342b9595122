//! # image-resizer
//!
//! Turn one uploaded image into a set of named, resized variants written to a
//! temporary-images directory, and get back where each one went.
//!
//! ```no_run
//! use image_resizer::{ResizerConfig, SizeSet, SizeSpec, Source, derive};
//! use std::path::Path;
//!
//! let sizes = SizeSet::new()
//!     .with("thumbnail", SizeSpec::width(200))
//!     .with("banner", SizeSpec::exact(1200, 400));
//!
//! let result = derive(
//!     Source::upload("/tmp/upload-8f3a", "Holiday Photo.JPG"),
//!     Path::new("temp-images"),
//!     &sizes,
//!     &ResizerConfig::default(),
//! )?;
//!
//! // thumbnail, banner, then the synthesized original
//! for variant in result.iter() {
//!     println!("{} → {}", variant.label, variant.path.display());
//! }
//! # Ok::<(), image_resizer::DeriveError>(())
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`derive`] | The derivation call: resolve source, plan, produce, roll back on failure |
//! | [`sizes`] | Ordered label → size mapping and `label=WxH` parsing |
//! | [`imaging`] | Decode/resample/encode backend, dimension math, variant planning |
//! | [`naming`] | `<slug>-<token>-<label>.<ext>` output names |
//! | [`config`] | `imageresizer.toml` loading, merging over defaults, publishing |
//! | [`output`] | CLI text and JSON reports |
//!
//! # Design Decisions
//!
//! ## One Output Format per Call
//!
//! GIF sources produce GIF for every label; everything else produces WebP.
//! The decision is made once from the source extension, never per size.
//!
//! ## Explicit Configuration
//!
//! Quality, filter and parallelism live in [`ResizerConfig`], passed into
//! [`derive()`]. The library never reads configuration on its own.
//!
//! ## All-or-Nothing
//!
//! Labels and dimensions are validated for every size before the first file
//! is written, and a failure while writing removes what the call already
//! wrote. Callers either get every variant or none.

pub mod config;
pub mod derive;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod sizes;

pub use config::ResizerConfig;
pub use derive::{Derivation, DeriveError, Source, derive, derive_with_backend};
pub use sizes::{NamedSize, SizeSet, SizeSpec};

#[cfg(test)]
pub(crate) mod test_helpers;
