//! Named size specs.
//!
//! A [`SizeSet`] is an ordered mapping from label to [`SizeSpec`]. Order is
//! insertion order and is the order outputs are produced and reported in.
//! Re-inserting a label replaces its spec without moving it.
//!
//! On the command line a size is written `label=WxH`:
//!
//! | Argument | Width | Height |
//! |---|---|---|
//! | `thumb=200x150` | 200 | 150 |
//! | `thumb=200` | 200 | derived |
//! | `thumb=200x` | 200 | derived |
//! | `thumb=x150` | derived | 150 |

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Label of the variant that re-encodes the source without resampling.
pub const ORIGINAL: &str = "original";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SizeParseError {
    #[error("expected LABEL=WIDTHxHEIGHT, got {0:?}")]
    MissingLabel(String),
    #[error("invalid dimension {value:?} in {input:?}")]
    InvalidDimension { input: String, value: String },
}

/// Target dimensions for one variant. A missing side is derived from the
/// other; both missing means natural size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SizeSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl SizeSpec {
    pub fn width(width: u32) -> Self {
        Self {
            width: Some(width),
            height: None,
        }
    }

    pub fn height(height: u32) -> Self {
        Self {
            width: None,
            height: Some(height),
        }
    }

    pub fn exact(width: u32, height: u32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
        }
    }
}

/// Ordered label → spec mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeSet {
    entries: Vec<(String, SizeSpec)>,
}

impl SizeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace. A replaced label keeps its position.
    pub fn insert(&mut self, label: impl Into<String>, spec: SizeSpec) {
        let label = label.into();
        match self.entries.iter_mut().find(|(l, _)| *l == label) {
            Some((_, existing)) => *existing = spec,
            None => self.entries.push((label, spec)),
        }
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, label: impl Into<String>, spec: SizeSpec) -> Self {
        self.insert(label, spec);
        self
    }

    pub fn get(&self, label: &str) -> Option<&SizeSpec> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, spec)| spec)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SizeSpec)> {
        self.entries.iter().map(|(l, s)| (l.as_str(), s))
    }

    /// Copy of this set with an `original` entry at the natural dimensions
    /// appended, unless the caller already supplied one.
    pub fn with_original(&self, natural: (u32, u32)) -> Self {
        let mut sizes = self.clone();
        if !sizes.contains(ORIGINAL) {
            sizes.insert(ORIGINAL, SizeSpec::exact(natural.0, natural.1));
        }
        sizes
    }
}

impl<L: Into<String>> FromIterator<(L, SizeSpec)> for SizeSet {
    fn from_iter<I: IntoIterator<Item = (L, SizeSpec)>>(iter: I) -> Self {
        let mut sizes = SizeSet::new();
        for (label, spec) in iter {
            sizes.insert(label, spec);
        }
        sizes
    }
}

impl<L: Into<String>> Extend<(L, SizeSpec)> for SizeSet {
    fn extend<I: IntoIterator<Item = (L, SizeSpec)>>(&mut self, iter: I) {
        for (label, spec) in iter {
            self.insert(label, spec);
        }
    }
}

/// One `label=WxH` command-line argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedSize {
    pub label: String,
    pub spec: SizeSpec,
}

impl FromStr for NamedSize {
    type Err = SizeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (label, dims) = s
            .split_once('=')
            .filter(|(label, _)| !label.trim().is_empty())
            .ok_or_else(|| SizeParseError::MissingLabel(s.to_string()))?;

        let parse_side = |value: &str| -> Result<Option<u32>, SizeParseError> {
            let value = value.trim();
            if value.is_empty() {
                return Ok(None);
            }
            value
                .parse::<u32>()
                .map(Some)
                .map_err(|_| SizeParseError::InvalidDimension {
                    input: s.to_string(),
                    value: value.to_string(),
                })
        };

        let (width, height) = match dims.split_once(['x', 'X']) {
            Some((w, h)) => (parse_side(w)?, parse_side(h)?),
            None => (parse_side(dims)?, None),
        };

        Ok(NamedSize {
            label: label.trim().to_string(),
            spec: SizeSpec { width, height },
        })
    }
}
