//! Analysis pipeline.
//!
//! Wires the stages together: reference detection -> masking -> grain
//! segmentation -> classification and distribution. Each stage consumes the
//! previous stage's output in full; nothing is shared between calls except
//! the read-only catalog.

mod result;
mod run;

pub use result::AnalysisResult;
pub use run::{analyze, analyze_with_config};

pub(crate) use run::run_with_masked;
