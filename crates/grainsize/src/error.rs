//! Error taxonomy for the analysis core and its loaders.

use std::path::PathBuf;

/// Why an analysis produced no result.
///
/// None of these are faults: a photo without a recognisable reference object is
/// an ordinary outcome of heuristic shape matching.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    /// No contour matched any catalog entry within tolerance.
    #[error("no reference object (note, card or coin) matched the catalog")]
    ReferenceNotFound,
    /// A reference was found, but no grain-like region survived filtering.
    #[error("no grain could be segmented or measured")]
    SegmentationEmpty,
    /// A geometric guard refused to compute a scale factor.
    #[error("degenerate reference geometry: {reason}")]
    DegenerateGeometry {
        /// Which guard fired.
        reason: String,
    },
}

impl AnalysisError {
    pub(crate) fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateGeometry {
            reason: reason.into(),
        }
    }

    /// True for both reference failures; callers handle them the same way.
    pub fn is_reference_failure(&self) -> bool {
        matches!(
            self,
            Self::ReferenceNotFound | Self::DegenerateGeometry { .. }
        )
    }
}

/// Invalid catalog or configuration data.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("unsupported catalog schema '{found}' (expected '{expected}')")]
    UnsupportedSchema {
        found: String,
        expected: &'static str,
    },
    #[error("catalog must contain at least one reference object")]
    Empty,
    #[error("catalog entry {index}: label must not be empty")]
    EmptyLabel { index: usize },
    #[error("catalog entry '{label}': {field} must be finite and > 0 (got {value})")]
    InvalidDimension {
        label: String,
        field: &'static str,
        value: f64,
    },
    #[error("catalog entry '{label}': circle is not round ({width_mm} x {height_mm} mm)")]
    NonRoundCircle {
        label: String,
        width_mm: f64,
        height_mm: f64,
    },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Rejections raised while turning a file into an analysable image.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("could not decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("image is too small for reliable analysis: {width}x{height} (minimum side {min} px)")]
    TooSmall { width: u32, height: u32, min: u32 },
}
