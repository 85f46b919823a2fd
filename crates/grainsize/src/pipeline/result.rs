use std::collections::BTreeMap;

use crate::classify::SizeCategory;
use crate::reference::ReferenceGeometry;

/// Full analysis result for a single image.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnalysisResult {
    /// Wentworth class of the mean diameter.
    pub classification: SizeCategory,
    /// Mean equivalent diameter (mm).
    pub mean_diameter_mm: f64,
    /// Population standard deviation of the diameters (mm).
    pub std_deviation_mm: f64,
    pub grain_count: usize,
    /// Scale factor derived from the reference object.
    pub pixels_per_mm: f64,
    /// Reference match quality in [0, 1].
    pub detection_confidence: f64,
    /// Catalog label of the detected reference.
    pub reference_label: String,
    /// Fitted outline of the reference, in pixels.
    pub reference_geometry: ReferenceGeometry,
    /// Share of watershed labels kept as grains, in [0, 1].
    pub segmentation_quality: f64,
    /// Percentage of grains per class; all seven classes present.
    pub size_distribution: BTreeMap<SizeCategory, f64>,
    /// Adaptive block size used for thresholding; `None` for the Otsu fallback.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold_block_size: Option<u32>,
    /// Image dimensions [width, height].
    pub image_size: [u32; 2],
}

impl AnalysisResult {
    /// Percentage for one class (0 when absent).
    pub fn percentage(&self, category: SizeCategory) -> f64 {
        self.size_distribution.get(&category).copied().unwrap_or(0.0)
    }
}
