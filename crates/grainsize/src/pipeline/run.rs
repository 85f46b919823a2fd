//! Top-level orchestrator: reference -> segmentation -> statistics.

use image::RgbImage;

use super::AnalysisResult;
use crate::catalog::ReferenceCatalog;
use crate::config::AnalysisConfig;
use crate::distribution::{size_distribution, DiameterStats};
use crate::error::AnalysisError;
use crate::reference::{detect_reference, ReferenceDetection};
use crate::segment::{segment_grains, GrainSegmentation};

fn assemble(
    image_size: [u32; 2],
    detection: &ReferenceDetection,
    segmentation: GrainSegmentation,
) -> Result<AnalysisResult, AnalysisError> {
    let stats = DiameterStats::from_diameters(&segmentation.diameters_mm)
        .ok_or(AnalysisError::SegmentationEmpty)?;
    Ok(AnalysisResult {
        classification: stats.classification(),
        mean_diameter_mm: stats.mean_mm,
        std_deviation_mm: stats.std_mm,
        grain_count: segmentation.diameters_mm.len(),
        pixels_per_mm: detection.pixels_per_mm,
        detection_confidence: detection.confidence,
        reference_label: detection.object_label.clone(),
        reference_geometry: detection.geometry,
        segmentation_quality: segmentation.quality,
        size_distribution: size_distribution(&segmentation.diameters_mm),
        threshold_block_size: segmentation.block_size,
        image_size,
    })
}

/// Run every stage and keep the masked image.
pub(crate) fn run_with_masked(
    image: &RgbImage,
    catalog: &ReferenceCatalog,
    config: &AnalysisConfig,
) -> Result<(AnalysisResult, RgbImage), AnalysisError> {
    let (w, h) = image.dimensions();
    tracing::debug!("analysing {}x{} image, catalog '{}'", w, h, catalog.name());

    let detection = detect_reference(image, catalog, &config.reference)?;
    let segmentation = segment_grains(
        &detection.masked_image,
        detection.pixels_per_mm,
        &config.segmentation,
    )?;
    let result = assemble([w, h], &detection, segmentation)?;

    tracing::info!(
        "{} grains, mean {:.4} mm ({}), reference '{}'",
        result.grain_count,
        result.mean_diameter_mm,
        result.classification,
        result.reference_label
    );
    Ok((result, detection.masked_image))
}

pub fn analyze_with_config(
    image: &RgbImage,
    catalog: &ReferenceCatalog,
    config: &AnalysisConfig,
) -> Result<AnalysisResult, AnalysisError> {
    run_with_masked(image, catalog, config).map(|(result, _)| result)
}

/// Analyse one image against `catalog` with default parameters.
pub fn analyze(
    image: &RgbImage,
    catalog: &ReferenceCatalog,
) -> Result<AnalysisResult, AnalysisError> {
    analyze_with_config(image, catalog, &AnalysisConfig::default())
}
