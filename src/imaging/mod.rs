//! Image processing — `image` crate plus libwebp.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::load_from_memory_with_format`, probed by extension |
//! | **Resample** | `image::imageops::resize` onto a transparent canvas |
//! | **Encode → WebP** | `webp::Encoder` (lossy, quality 0–100) |
//! | **Encode → GIF** | `image::codecs::gif::GifEncoder` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: Planning and producing variants (calculations + backend)

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::resolve_target_dimensions;
pub use operations::{
    GeneratedVariant, PlanError, VariantPlan, VariantSettings, create_variant, plan_variants,
};
pub use params::{EncodeParams, OutputFormat, Quality, ResampleFilter, ResampleParams};
pub use rust_backend::RustBackend;
