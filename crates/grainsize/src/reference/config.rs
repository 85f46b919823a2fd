/// Parameters of the reference-object detector.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ReferenceDetectConfig {
    /// Gaussian sigma applied before edge detection (1.4 matches a 7x7 kernel).
    pub blur_sigma: f32,
    /// Canny hysteresis low threshold.
    pub canny_low: f32,
    /// Canny hysteresis high threshold.
    pub canny_high: f32,
    /// Polygon simplification tolerance as a fraction of the contour perimeter.
    pub approx_epsilon_frac: f64,
    /// Accepted aspect-ratio deviation as a fraction of the catalog aspect.
    pub aspect_tolerance_frac: f64,
    /// Vertex count that selects the rectangle branch.
    pub rect_vertices: usize,
    /// Minimum vertex count that selects the circle branch.
    pub min_circle_vertices: usize,
    /// Enclosing circles at or below this radius (px) are treated as noise.
    pub min_circle_radius_px: f64,
}

impl Default for ReferenceDetectConfig {
    fn default() -> Self {
        Self {
            blur_sigma: 1.4,
            canny_low: 50.0,
            canny_high: 150.0,
            approx_epsilon_frac: 0.02,
            aspect_tolerance_frac: 0.20,
            rect_vertices: 4,
            min_circle_vertices: 7,
            min_circle_radius_px: 5.0,
        }
    }
}
