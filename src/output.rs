//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Derive
//!
//! ```text
//! holiday.jpg (4032x3024) → temp-images/
//!     thumb     200x150    holiday-1718031245123-thumb.webp
//!     original  4032x3024  holiday-1718031245123-original.webp
//! Derived 2 variants
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.

use crate::derive::Derivation;
use crate::sizes::ORIGINAL;
use std::path::Path;

/// File name of a path, falling back to the full path.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Text report for one derivation.
pub fn format_derivation(
    source_name: &str,
    output_dir: &Path,
    derivation: &Derivation,
) -> Vec<String> {
    let mut lines = Vec::new();

    let header = match derivation.get(ORIGINAL) {
        Some(original) => format!(
            "{} ({}x{}) → {}/",
            source_name,
            original.width,
            original.height,
            output_dir.display()
        ),
        None => format!("{} → {}/", source_name, output_dir.display()),
    };
    lines.push(header);

    let label_width = derivation
        .iter()
        .map(|v| v.label.len())
        .max()
        .unwrap_or(0);
    let dims: Vec<String> = derivation
        .iter()
        .map(|v| format!("{}x{}", v.width, v.height))
        .collect();
    let dims_width = dims.iter().map(String::len).max().unwrap_or(0);

    for (variant, dim) in derivation.iter().zip(&dims) {
        lines.push(format!(
            "    {:<label_width$}  {:<dims_width$}  {}",
            variant.label,
            dim,
            display_name(&variant.path),
        ));
    }

    let count = derivation.len();
    lines.push(format!(
        "Derived {} variant{}",
        count,
        if count == 1 { "" } else { "s" }
    ));
    lines
}

pub fn print_derivation(source_name: &str, output_dir: &Path, derivation: &Derivation) {
    for line in format_derivation(source_name, output_dir, derivation) {
        println!("{}", line);
    }
}

/// JSON report: a `paths` object (label → path) plus the ordered `variants` list.
pub fn derivation_json(derivation: &Derivation) -> serde_json::Value {
    let paths: serde_json::Map<String, serde_json::Value> = derivation
        .iter()
        .map(|v| {
            (
                v.label.clone(),
                serde_json::Value::String(v.path.to_string_lossy().into_owned()),
            )
        })
        .collect();

    serde_json::json!({
        "paths": paths,
        "variants": derivation.variants,
    })
}
