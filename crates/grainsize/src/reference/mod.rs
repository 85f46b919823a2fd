//! Reference-object scale detection.
//!
//! Finds the banknote, card or coin placed in the photo, derives a
//! pixels-per-millimetre scale from its catalog dimensions, and blanks it out
//! so the grain segmenter never measures it.
//!
//! Stages: grayscale -> Gaussian blur -> Canny -> outer contours (largest
//! first) -> polygon simplification -> rectangle/circle matching -> best
//! match by confidence -> mask.

mod config;
mod contours;
mod matching;

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_polygon_mut};
use imageproc::point::Point;

use crate::catalog::{ReferenceCatalog, ReferenceShape};
use crate::error::AnalysisError;
use crate::geometry::{approx_polygon_closed, closed_perimeter};

pub use config::ReferenceDetectConfig;
pub(crate) use matching::{select_best, Rejection, ShapeMatch};

/// Fill value painted over the detected reference.
pub const MASK_FILL: Rgb<u8> = Rgb([0, 0, 0]);

/// Fitted outline of the winning reference, in image pixels.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReferenceGeometry {
    Rectangle {
        center: [f64; 2],
        width_px: f64,
        height_px: f64,
        angle_deg: f64,
    },
    Circle {
        center: [f64; 2],
        radius_px: f64,
    },
}

/// Successful reference detection.
///
/// `pixels_per_mm` is always finite and strictly positive.
#[derive(Clone)]
pub struct ReferenceDetection {
    pub pixels_per_mm: f64,
    /// Match quality in [0, 1].
    pub confidence: f64,
    pub object_label: String,
    pub shape: ReferenceShape,
    pub geometry: ReferenceGeometry,
    /// Rank of the winning contour in area-descending order.
    pub contour_rank: usize,
    /// Copy of the input with the reference filled by [`MASK_FILL`].
    pub masked_image: RgbImage,
}

impl std::fmt::Debug for ReferenceDetection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceDetection")
            .field("pixels_per_mm", &self.pixels_per_mm)
            .field("confidence", &self.confidence)
            .field("object_label", &self.object_label)
            .field("shape", &self.shape)
            .field("geometry", &self.geometry)
            .field("contour_rank", &self.contour_rank)
            .field("masked_image", &self.masked_image.dimensions())
            .finish()
    }
}

/// Locate a catalog reference object in `image`.
///
/// Returns [`AnalysisError::ReferenceNotFound`] when nothing matches and
/// [`AnalysisError::DegenerateGeometry`] when the only plausible candidates were
/// dropped by a geometric guard. The input image is never modified.
pub fn detect_reference(
    image: &RgbImage,
    catalog: &ReferenceCatalog,
    config: &ReferenceDetectConfig,
) -> Result<ReferenceDetection, AnalysisError> {
    let gray = image::imageops::grayscale(image);
    let edges = contours::edge_map(&gray, config);
    let candidates = contours::external_contours(&edges);
    tracing::debug!("{} external contours", candidates.len());
    if candidates.is_empty() {
        return Err(AnalysisError::ReferenceNotFound);
    }

    let mut degenerate: Option<&'static str> = None;
    let mut all_matches = Vec::new();
    for (rank, candidate) in candidates.iter().enumerate() {
        let perimeter = closed_perimeter(&candidate.points);
        let epsilon = config.approx_epsilon_frac * perimeter;
        let polygon = approx_polygon_closed(&candidate.points, epsilon);
        match matching::match_polygon(rank, &polygon, catalog, config) {
            Ok(matches) => {
                tracing::debug!(
                    "contour #{} (area {:.0} px², {} vertices): {} catalog match(es)",
                    rank,
                    candidate.area,
                    polygon.len(),
                    matches.len()
                );
                all_matches.extend(matches);
            }
            Err(Rejection::Degenerate(reason)) => {
                tracing::debug!("contour #{} dropped: {}", rank, reason);
                degenerate.get_or_insert(reason);
            }
            Err(reason) => {
                tracing::trace!("contour #{} rejected: {:?}", rank, reason);
            }
        }
    }

    let best = pick_match(all_matches, degenerate)?;

    tracing::info!(
        "reference '{}' at contour #{}: {:.3} px/mm, confidence {:.3}",
        best.object.label(),
        best.contour_rank,
        best.pixels_per_mm,
        best.confidence
    );

    let masked_image = mask_reference(image, &best);
    Ok(ReferenceDetection {
        pixels_per_mm: best.pixels_per_mm,
        confidence: best.confidence,
        object_label: best.object.label().to_string(),
        shape: best.object.shape(),
        geometry: best.geometry,
        contour_rank: best.contour_rank,
        masked_image,
    })
}

/// Best match, or the error for an image where nothing matched: degenerate if
/// a geometric guard dropped any candidate, not-found otherwise.
fn pick_match<'a>(
    matches: Vec<ShapeMatch<'a>>,
    degenerate: Option<&'static str>,
) -> Result<ShapeMatch<'a>, AnalysisError> {
    match (select_best(matches), degenerate) {
        (Some(best), _) => Ok(best),
        (None, Some(reason)) => Err(AnalysisError::degenerate(reason)),
        (None, None) => Err(AnalysisError::ReferenceNotFound),
    }
}

/// Paint the matched outline on a copy of `image`.
///
/// Rectangles fill the simplified contour polygon; circles fill the enclosing
/// circle with center and radius truncated to whole pixels.
fn mask_reference(image: &RgbImage, best: &ShapeMatch<'_>) -> RgbImage {
    let mut masked = image.clone();
    match best.geometry {
        ReferenceGeometry::Rectangle { .. } => {
            let mut poly: Vec<Point<i32>> = best
                .polygon
                .iter()
                .map(|p| Point::new(p.x.round() as i32, p.y.round() as i32))
                .collect();
            poly.dedup();
            while poly.len() > 1 && poly.first() == poly.last() {
                poly.pop();
            }
            if poly.len() >= 3 {
                draw_polygon_mut(&mut masked, &poly, MASK_FILL);
            }
        }
        ReferenceGeometry::Circle { center, radius_px } => {
            draw_filled_circle_mut(
                &mut masked,
                (center[0] as i32, center[1] as i32),
                radius_px as i32,
                MASK_FILL,
            );
        }
    }
    masked
}
