/// Parameters of the grain segmenter.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Median filter radius; 2 is a 5x5 kernel.
    pub median_radius: u32,
    /// Adaptive threshold block sizes tried in order. Sizes at or above the
    /// smaller image side are skipped.
    pub block_sizes: Vec<u32>,
    /// Offset subtracted from the local mean before comparing.
    pub adaptive_c: f32,
    /// Fraction of the distance-transform maximum above which a pixel seeds a grain.
    pub sure_fg_frac: f64,
    /// Regions with an area at or below this many pixels are noise.
    pub min_area_px: u32,
    /// Dilation radius (L∞) used to build the unknown band around the foreground.
    pub unknown_dilation: u8,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            median_radius: 2,
            block_sizes: vec![11, 21, 31],
            adaptive_c: 5.0,
            sure_fg_frac: 0.5,
            min_area_px: 5,
            unknown_dilation: 1,
        }
    }
}
