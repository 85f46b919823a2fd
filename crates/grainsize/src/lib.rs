//! grainsize: sand grain size analysis from a single photograph.
//!
//! The photo must contain a reference object of known size (a banknote, an
//! ID-1 card or a coin) lying next to the sand. The pipeline stages are:
//!
//! 1. **Reference** – edge contours are matched against a [`ReferenceCatalog`]
//!    to derive a pixels-per-millimetre scale; the object is then masked out.
//! 2. **Segment** – adaptive thresholding (block-size sweep), distance
//!    transform seeds and a priority-flood watershed split touching grains.
//! 3. **Measure** – each region becomes an equivalent-circle diameter in mm.
//! 4. **Classify** – diameters are binned on the Wentworth scale and
//!    summarised as mean, standard deviation and per-class percentages.
//!
//! # Public API
//! - [`Analyzer`] and [`analyze`] as entry points
//! - [`AnalysisConfig`] and the per-stage configs for tuning
//! - [`ReferenceCatalog`] for injecting reference objects
//! - stage functions ([`detect_reference`], [`segment_grains`],
//!   [`classify_wentworth`], [`size_distribution`]) for callers that need one
//!   stage on its own

mod analyzer;
mod catalog;
mod classify;
mod config;
mod distribution;
mod error;
mod geometry;
mod input;
mod pipeline;
mod reference;
mod segment;

#[cfg(test)]
pub(crate) mod test_utils;

pub use analyzer::Analyzer;
pub use catalog::{ReferenceCatalog, ReferenceObjectSpec, ReferenceShape, CATALOG_SCHEMA};
pub use classify::{classify_wentworth, SizeCategory};
pub use config::AnalysisConfig;
pub use distribution::{size_distribution, DiameterStats};
pub use error::{AnalysisError, CatalogError, InputError};
pub use input::{check_image_dimensions, load_image, MIN_IMAGE_DIM};
pub use pipeline::{analyze, analyze_with_config, AnalysisResult};
pub use reference::{
    detect_reference, ReferenceDetectConfig, ReferenceDetection, ReferenceGeometry, MASK_FILL,
};
pub use segment::{segment_grains, GrainSegmentation, SegmentationConfig};
