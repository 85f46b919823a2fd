//! Edge map and external contour extraction.

use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use nalgebra::Point2;

use super::ReferenceDetectConfig;
use crate::geometry::{polygon_area, to_points};

/// An outer boundary of an edge-map component.
#[derive(Debug, Clone)]
pub(crate) struct CandidateContour {
    pub points: Vec<Point2<f64>>,
    /// Enclosed area (px²).
    pub area: f64,
}

/// Blur then run Canny on a grayscale image.
pub(crate) fn edge_map(gray: &GrayImage, config: &ReferenceDetectConfig) -> GrayImage {
    let smoothed;
    let input = if config.blur_sigma > 0.0 {
        smoothed = imageproc::filter::gaussian_blur_f32(gray, config.blur_sigma);
        &smoothed
    } else {
        gray
    };
    imageproc::edges::canny(input, config.canny_low, config.canny_high)
}

/// Outermost contours of the edge map, largest enclosed area first.
///
/// Only top-level outer borders are kept; holes and nested borders are
/// dropped. Equal areas keep tracing order.
pub(crate) fn external_contours(edges: &GrayImage) -> Vec<CandidateContour> {
    let mut candidates: Vec<CandidateContour> = find_contours::<i32>(edges)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|c| {
            let points = to_points(&c.points);
            let area = polygon_area(&points);
            CandidateContour { points, area }
        })
        .collect();
    candidates.sort_by(|a, b| b.area.total_cmp(&a.area));
    candidates
}
