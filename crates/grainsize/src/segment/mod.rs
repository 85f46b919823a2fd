//! Grain segmentation on the reference-masked image.
//!
//! median blur -> adaptive threshold sweep (Otsu fallback) -> distance
//! transform seeds -> watershed flood -> equivalent diameters.

mod config;
mod markers;
mod measure;
mod threshold;
mod watershed;

use image::{GrayImage, RgbImage};

use crate::error::AnalysisError;

pub use config::SegmentationConfig;

/// Output of [`segment_grains`].
///
/// An empty `diameters_mm` is a valid outcome: nothing measurable was found.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GrainSegmentation {
    /// Equivalent diameter of every surviving grain (mm).
    pub diameters_mm: Vec<f64>,
    /// `valid / total` grain labels, in [0, 1].
    pub quality: f64,
    /// Adaptive block size that won the sweep; `None` for the Otsu fallback.
    pub block_size: Option<u32>,
    /// Connected components of the chosen threshold, background included.
    pub threshold_components: u32,
    /// Grain labels left by the watershed.
    pub total_labels: usize,
    /// Labels discarded as noise.
    pub discarded: usize,
}

/// Segment grains in `image` and convert their sizes with `pixels_per_mm`.
///
/// Fails only when the scale factor is not finite and positive.
pub fn segment_grains(
    image: &RgbImage,
    pixels_per_mm: f64,
    config: &SegmentationConfig,
) -> Result<GrainSegmentation, AnalysisError> {
    if !(pixels_per_mm.is_finite() && pixels_per_mm > 0.0) {
        return Err(AnalysisError::degenerate(format!(
            "scale factor must be finite and > 0 (got {pixels_per_mm})"
        )));
    }

    let gray = image::imageops::grayscale(image);
    let radius = config.median_radius;
    let smoothed = imageproc::filter::median_filter(&gray, radius, radius);
    let choice = threshold::select_threshold(&smoothed, config);
    match choice.block_size {
        Some(bs) => {
            tracing::info!("threshold: block size {} ({} components)", bs, choice.components)
        }
        None => tracing::info!("threshold: Otsu fallback ({} components)", choice.components),
    }
    if choice.components <= 1 {
        tracing::warn!("threshold produced no foreground component");
    }

    let measured = segment_mask(&smoothed, &choice.mask, pixels_per_mm, config);
    let quality = measured.quality();
    tracing::info!(
        "{} grains measured ({} labels, {} discarded), quality {:.3}",
        measured.diameters_mm.len(),
        measured.total_labels,
        measured.discarded,
        quality
    );

    Ok(GrainSegmentation {
        quality,
        block_size: choice.block_size,
        threshold_components: choice.components,
        total_labels: measured.total_labels,
        discarded: measured.discarded,
        diameters_mm: measured.diameters_mm,
    })
}

/// Seed, flood and measure a binary grain mask over the given landscape image.
pub(crate) fn segment_mask(
    gray: &GrayImage,
    mask: &GrayImage,
    pixels_per_mm: f64,
    config: &SegmentationConfig,
) -> measure::RegionMeasurements {
    let mut markers = markers::build_markers(mask, config);
    tracing::debug!("{} watershed seeds", markers.seeds);
    if markers.seeds == 0 {
        return measure::RegionMeasurements::default();
    }
    let landscape = watershed::gradient_landscape(gray);
    let flooded = watershed::flood(&landscape, &mut markers.labels);
    tracing::debug!("{} unknown pixels flooded", flooded);
    measure::measure_regions(&markers.labels, pixels_per_mm, config.min_area_px)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use image::Luma;

    use super::*;
    use crate::test_utils::{blank_scene, draw_disc_scene};

    const LIGHT_SAND: [u8; 3] = [200, 200, 200];
    const DARK_GRAIN: [u8; 3] = [50, 50, 50];

    #[test]
    fn two_touching_grains_are_split() {
        // Two r = 20 discs whose centers are 36 px apart. The mask is built by
        // hand: through `segment_grains` the 5x5 median closes the neck between
        // small touching discs, and the adaptive threshold keeps only the rims
        // of large ones, so only the marker + flood stage is checked here.
        let discs = [([40.0, 50.0], 20.0), ([76.0, 50.0], 20.0)];
        let scene = draw_disc_scene(120, 100, &discs, DARK_GRAIN, LIGHT_SAND);
        let gray = image::imageops::grayscale(&scene);
        let mut mask = GrayImage::new(120, 100);
        for (x, y, px) in gray.enumerate_pixels() {
            if px[0] < 128 {
                mask.put_pixel(x, y, Luma([255]));
            }
        }

        let ppm = 4.0;
        let m = segment_mask(&gray, &mask, ppm, &SegmentationConfig::default());
        assert_eq!(m.diameters_mm.len(), 2);
        assert_eq!(m.quality(), 1.0);
        for d in &m.diameters_mm {
            assert_relative_eq!(*d, 40.0 / ppm, max_relative = 0.05);
        }
    }

    #[test]
    fn separated_grains_end_to_end() {
        let grains = [([30.0, 30.0], 4.0), ([90.0, 40.0], 4.0), ([60.0, 90.0], 4.0)];
        let scene = draw_disc_scene(120, 120, &grains, DARK_GRAIN, LIGHT_SAND);
        let seg = segment_grains(&scene, 2.0, &SegmentationConfig::default()).unwrap();
        assert_eq!(seg.diameters_mm.len(), 3);
        assert_eq!(seg.quality, 1.0);
        assert_eq!(seg.block_size, Some(11));
        assert_eq!(seg.threshold_components, 4);
        for d in &seg.diameters_mm {
            assert_relative_eq!(*d, 8.0 / 2.0, max_relative = 0.25);
        }
    }

    #[test]
    fn uniform_image_yields_no_grains() {
        let scene = blank_scene(100, 100, LIGHT_SAND);
        let seg = segment_grains(&scene, 3.0, &SegmentationConfig::default()).unwrap();
        assert!(seg.diameters_mm.is_empty());
        assert_eq!(seg.quality, 0.0);
        assert_eq!(seg.total_labels, 0);
    }

    #[test]
    fn non_positive_scale_is_degenerate() {
        let scene = blank_scene(100, 100, LIGHT_SAND);
        for ppm in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = segment_grains(&scene, ppm, &SegmentationConfig::default()).unwrap_err();
            assert!(matches!(err, AnalysisError::DegenerateGeometry { .. }));
        }
    }

    #[test]
    fn diameters_scale_inversely_with_ppm() {
        let scene = draw_disc_scene(120, 120, &[([60.0, 60.0], 5.0)], DARK_GRAIN, LIGHT_SAND);
        let a = segment_grains(&scene, 1.0, &SegmentationConfig::default()).unwrap();
        let b = segment_grains(&scene, 4.0, &SegmentationConfig::default()).unwrap();
        assert_eq!(a.diameters_mm.len(), 1);
        assert_relative_eq!(a.diameters_mm[0], 4.0 * b.diameters_mm[0], max_relative = 1e-12);
    }
}
