//! High-level analysis API.
//!
//! [`Analyzer`] pairs a reference catalog with an [`AnalysisConfig`]. Create
//! it once and analyse many images; it holds no per-image state, so a shared
//! reference can be used from several threads.

use image::RgbImage;

use crate::catalog::ReferenceCatalog;
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::pipeline::{self, AnalysisResult};

/// Primary analysis interface.
///
/// # Examples
///
/// ```no_run
/// use grainsize::{Analyzer, ReferenceCatalog};
/// use std::path::Path;
///
/// let analyzer = Analyzer::new(ReferenceCatalog::default());
/// let image = grainsize::load_image(Path::new("beach.jpg")).unwrap();
/// match analyzer.analyze(&image) {
///     Ok(result) => println!("{} ({:.3} mm)", result.classification, result.mean_diameter_mm),
///     Err(err) => eprintln!("{err}"),
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Analyzer {
    catalog: ReferenceCatalog,
    config: AnalysisConfig,
}

impl Analyzer {
    /// Analyzer with default parameters.
    pub fn new(catalog: ReferenceCatalog) -> Self {
        Self::with_config(catalog, AnalysisConfig::default())
    }

    pub fn with_config(catalog: ReferenceCatalog, config: AnalysisConfig) -> Self {
        Self { catalog, config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut AnalysisConfig {
        &mut self.config
    }

    pub fn catalog(&self) -> &ReferenceCatalog {
        &self.catalog
    }

    /// Analyse one image.
    pub fn analyze(&self, image: &RgbImage) -> Result<AnalysisResult, AnalysisError> {
        pipeline::analyze_with_config(image, &self.catalog, &self.config)
    }

    /// Analyse one image and also return the copy with the reference masked out.
    pub fn analyze_with_masked(
        &self,
        image: &RgbImage,
    ) -> Result<(AnalysisResult, RgbImage), AnalysisError> {
        pipeline::run_with_masked(image, &self.catalog, &self.config)
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(ReferenceCatalog::default())
    }
}
