//! Shape matching of simplified contours against the catalog.

use nalgebra::Point2;

use super::{ReferenceDetectConfig, ReferenceGeometry};
use crate::catalog::{ReferenceCatalog, ReferenceObjectSpec, ReferenceShape};
use crate::geometry::{min_area_rect, min_enclosing_circle};

/// A (contour, catalog entry) pairing that passed tolerance.
#[derive(Debug, Clone)]
pub(crate) struct ShapeMatch<'a> {
    /// Position of the contour in area-descending order.
    pub contour_rank: usize,
    pub object: &'a ReferenceObjectSpec,
    pub confidence: f64,
    pub pixels_per_mm: f64,
    pub geometry: ReferenceGeometry,
    /// Simplified polygon of the contour, used for masking.
    pub polygon: Vec<Point2<f64>>,
}

/// Why a candidate produced no match.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Rejection {
    /// Vertex count fits neither branch.
    UnsupportedShape { vertices: usize },
    /// Enclosing circle at or below the noise floor.
    TooSmall { radius_px: f64 },
    /// No catalog entry of the right shape within tolerance.
    OutOfTolerance,
    /// A guard refused to compute a scale factor.
    Degenerate(&'static str),
}

fn checked_scale(pixels: f64, millimetres: f64) -> Result<f64, Rejection> {
    let scale = pixels / millimetres;
    if scale.is_finite() && scale > 0.0 {
        Ok(scale)
    } else {
        Err(Rejection::Degenerate("non-positive scale factor"))
    }
}

/// Match a 4-vertex polygon against every rectangle in the catalog.
pub(crate) fn match_rectangle<'a>(
    contour_rank: usize,
    polygon: &[Point2<f64>],
    catalog: &'a ReferenceCatalog,
    config: &ReferenceDetectConfig,
) -> Result<Vec<ShapeMatch<'a>>, Rejection> {
    let rect = min_area_rect(polygon).ok_or(Rejection::Degenerate("empty polygon"))?;
    if rect.is_degenerate() {
        return Err(Rejection::Degenerate("zero-length rectangle side"));
    }
    let contour_aspect = rect.long_side() / rect.short_side();
    let geometry = ReferenceGeometry::Rectangle {
        center: [rect.center.x, rect.center.y],
        width_px: rect.width,
        height_px: rect.height,
        angle_deg: rect.angle_deg,
    };

    let mut matches = Vec::new();
    for object in catalog.of_shape(ReferenceShape::Rectangle) {
        let catalog_aspect = object.aspect_ratio();
        let diff = (contour_aspect - catalog_aspect).abs();
        if diff > config.aspect_tolerance_frac * catalog_aspect {
            continue;
        }
        // Short pixel side maps to the short physical side, whatever the rotation.
        let pixels_per_mm = checked_scale(rect.short_side(), object.short_side_mm())?;
        matches.push(ShapeMatch {
            contour_rank,
            object,
            confidence: 1.0 - diff / catalog_aspect,
            pixels_per_mm,
            geometry,
            polygon: polygon.to_vec(),
        });
    }
    if matches.is_empty() {
        return Err(Rejection::OutOfTolerance);
    }
    Ok(matches)
}

/// Match a near-circular polygon against every coin in the catalog.
///
/// Confidence is fixed at 1.0: there is no secondary check on how round the
/// contour actually is.
pub(crate) fn match_circle<'a>(
    contour_rank: usize,
    polygon: &[Point2<f64>],
    catalog: &'a ReferenceCatalog,
    config: &ReferenceDetectConfig,
) -> Result<Vec<ShapeMatch<'a>>, Rejection> {
    let circle = min_enclosing_circle(polygon).ok_or(Rejection::Degenerate("empty polygon"))?;
    if circle.radius <= config.min_circle_radius_px {
        return Err(Rejection::TooSmall {
            radius_px: circle.radius,
        });
    }
    let geometry = ReferenceGeometry::Circle {
        center: [circle.center.x, circle.center.y],
        radius_px: circle.radius,
    };

    let mut matches = Vec::new();
    for object in catalog.of_shape(ReferenceShape::Circle) {
        let pixels_per_mm = checked_scale(2.0 * circle.radius, object.diameter_mm())?;
        matches.push(ShapeMatch {
            contour_rank,
            object,
            confidence: 1.0,
            pixels_per_mm,
            geometry,
            polygon: polygon.to_vec(),
        });
    }
    if matches.is_empty() {
        return Err(Rejection::OutOfTolerance);
    }
    Ok(matches)
}

/// Dispatch on vertex count.
pub(crate) fn match_polygon<'a>(
    contour_rank: usize,
    polygon: &[Point2<f64>],
    catalog: &'a ReferenceCatalog,
    config: &ReferenceDetectConfig,
) -> Result<Vec<ShapeMatch<'a>>, Rejection> {
    let vertices = polygon.len();
    if vertices == config.rect_vertices {
        match_rectangle(contour_rank, polygon, catalog, config)
    } else if vertices >= config.min_circle_vertices {
        match_circle(contour_rank, polygon, catalog, config)
    } else {
        Err(Rejection::UnsupportedShape { vertices })
    }
}

/// Running-best fold: strictly higher confidence replaces the incumbent, so on
/// ties the first match seen (earliest contour, then earliest catalog entry)
/// is kept. Matches with zero confidence are never selected.
pub(crate) fn select_best<'a>(
    matches: impl IntoIterator<Item = ShapeMatch<'a>>,
) -> Option<ShapeMatch<'a>> {
    matches.into_iter().fold(None, |best, candidate| match best {
        Some(incumbent) if incumbent.confidence >= candidate.confidence => Some(incumbent),
        _ if candidate.confidence > 0.0 => Some(candidate),
        other => other,
    })
}
