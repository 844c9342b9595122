//! Output filename convention.
//!
//! Every file written by a derivation is named
//! `<slug>-<token>-<label>.<ext>`:
//!
//! - `slug`: the source stem, lowercased, with runs of non-alphanumeric
//!   characters collapsed to a single `-` (`"Holiday Photo (1)"` → `holiday-photo-1`)
//! - `token`: Unix milliseconds, bumped past the last token handed out in
//!   this process, so two calls never share one even within a millisecond
//! - `label`: the size label (`thumbnail`, `original`, ...)
//! - `ext`: `webp` or `gif`

use crate::imaging::OutputFormat;
use std::sync::atomic::{AtomicI64, Ordering};

/// Stem used when the source name slugs to nothing (e.g. `"???.jpg"`).
pub const FALLBACK_SLUG: &str = "image";

/// Lowercase slug of a filename stem.
///
/// Alphanumeric characters are kept (lowercased); every run of anything else
/// becomes a single `-`. Leading and trailing separators are dropped.
pub fn slugify(stem: &str) -> String {
    let mut slug = String::with_capacity(stem.len());
    let mut pending_separator = false;

    for c in stem.chars() {
        if c.is_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_separator = true;
        }
    }

    slug
}

/// Base name shared by all outputs of one derivation call.
pub fn base_filename(stem: &str, token: i64) -> String {
    let slug = slugify(stem);
    let slug = if slug.is_empty() {
        FALLBACK_SLUG
    } else {
        slug.as_str()
    };
    format!("{}-{}", slug, token)
}

static LAST_TOKEN: AtomicI64 = AtomicI64::new(0);

/// Current uniqueness token. Strictly increasing within the process.
pub fn timestamp_token() -> i64 {
    next_token(chrono::Utc::now().timestamp_millis())
}

fn next_token(now_millis: i64) -> i64 {
    let previous = match LAST_TOKEN.fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
        Some(now_millis.max(last + 1))
    }) {
        Ok(prev) | Err(prev) => prev,
    };
    now_millis.max(previous + 1)
}

/// Filename for one labelled variant.
pub fn output_filename(base: &str, label: &str, format: OutputFormat) -> String {
    format!("{}-{}.{}", base, label, format.extension())
}

/// Split a client filename into (stem, lowercase extension).
///
/// `"Photo.JPG"` → `("Photo", "jpg")`; `"archive.tar.gz"` → `("archive.tar", "gz")`;
/// a name without a dot has an empty extension. Leading-dot names
/// (`".hidden"`) are all stem.
pub fn split_name(name: &str) -> (&str, String) {
    match name.rfind('.') {
        Some(pos) if pos > 0 => (&name[..pos], name[pos + 1..].to_ascii_lowercase()),
        _ => (name, String::new()),
    }
}
