//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Scale `value` by `numerator / denominator`, truncating toward zero.
///
/// Integer arithmetic in `u64` so the result is an exact floor. A zero
/// denominator yields zero; a result past `u32::MAX` saturates.
fn scale_truncated(value: u32, numerator: u32, denominator: u32) -> u32 {
    if denominator == 0 {
        return 0;
    }
    let scaled = value as u64 * numerator as u64 / denominator as u64;
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

/// Resolve the output dimensions for one size spec.
///
/// Explicit values win. A missing side is derived from the given one,
/// preserving the natural aspect ratio with truncation:
/// `height = floor(natural_h * width / natural_w)` and symmetrically for width.
/// With neither side given, the natural dimensions are returned.
///
/// # Examples
/// ```
/// # use image_resizer::imaging::resolve_target_dimensions;
/// // 800x600 source, width-only 200 → 200x150
/// assert_eq!(resolve_target_dimensions((800, 600), Some(200), None), (200, 150));
///
/// // height-only 300 → 400x300
/// assert_eq!(resolve_target_dimensions((800, 600), None, Some(300)), (400, 300));
/// ```
pub fn resolve_target_dimensions(
    natural: (u32, u32),
    width: Option<u32>,
    height: Option<u32>,
) -> (u32, u32) {
    let (nat_w, nat_h) = natural;

    match (width, height) {
        (Some(w), Some(h)) => (w, h),
        (Some(w), None) => (w, scale_truncated(nat_h, w, nat_w)),
        (None, Some(h)) => (scale_truncated(nat_w, h, nat_h), h),
        (None, None) => natural,
    }
}
