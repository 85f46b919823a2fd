//! Seed markers for the watershed flood.
//!
//! Label layout: `0` unknown (to be flooded), `1` background, `2..` one label
//! per sure-foreground component.

use image::{GrayImage, Luma};
use imageproc::definitions::Image;
use imageproc::distance_transform::{euclidean_squared_distance_transform, Norm};
use imageproc::morphology;
use imageproc::region_labelling::{connected_components, Connectivity};

use super::SegmentationConfig;

pub(crate) type LabelImage = Image<Luma<u32>>;

pub(crate) const UNKNOWN: u32 = 0;
pub(crate) const BACKGROUND: u32 = 1;

#[derive(Debug, Clone)]
pub(crate) struct Markers {
    pub labels: LabelImage,
    /// Number of sure-foreground seeds (labels `2..seeds + 2`).
    pub seeds: u32,
}

/// Euclidean distance from each foreground pixel of `mask` to the nearest
/// background pixel. Background pixels are 0.
pub(crate) fn distance_to_background(mask: &GrayImage) -> Image<Luma<f64>> {
    let mut background = GrayImage::new(mask.width(), mask.height());
    for (x, y, px) in background.enumerate_pixels_mut() {
        if mask.get_pixel(x, y)[0] == 0 {
            *px = Luma([255]);
        }
    }
    let mut dist = euclidean_squared_distance_transform(&background);
    for px in dist.pixels_mut() {
        px[0] = px[0].sqrt();
    }
    dist
}

/// Sure foreground: pixels whose distance exceeds `frac` of the maximum.
///
/// A mask with no background pixel has no finite distances and yields no
/// seeds.
pub(crate) fn sure_foreground(dist: &Image<Luma<f64>>, frac: f64) -> GrayImage {
    let max = dist
        .pixels()
        .map(|p| p[0])
        .filter(|d| d.is_finite())
        .fold(0.0_f64, f64::max);
    let cutoff = frac * max;
    let mut out = GrayImage::new(dist.width(), dist.height());
    if max <= 0.0 {
        return out;
    }
    for (x, y, px) in out.enumerate_pixels_mut() {
        let d = dist.get_pixel(x, y)[0];
        if d.is_finite() && d > cutoff {
            *px = Luma([255]);
        }
    }
    out
}

/// Build the marker image for a binary grain mask.
pub(crate) fn build_markers(mask: &GrayImage, config: &SegmentationConfig) -> Markers {
    let dist = distance_to_background(mask);
    let sure_fg = sure_foreground(&dist, config.sure_fg_frac);
    let dilated = morphology::dilate(mask, Norm::LInf, config.unknown_dilation);

    let components = connected_components(&sure_fg, Connectivity::Eight, Luma([0u8]));
    let mut seeds = 0;
    let mut labels = LabelImage::new(mask.width(), mask.height());
    for (x, y, px) in labels.enumerate_pixels_mut() {
        let component = components.get_pixel(x, y)[0];
        let is_sure = sure_fg.get_pixel(x, y)[0] != 0;
        let is_unknown = dilated.get_pixel(x, y)[0] != 0 && !is_sure;
        px[0] = if is_unknown { UNKNOWN } else { component + 1 };
        seeds = seeds.max(component);
    }
    Markers { labels, seeds }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn filled_rect(w: u32, h: u32, x0: u32, y0: u32, x1: u32, y1: u32) -> GrayImage {
        let mut mask = GrayImage::new(w, h);
        for y in y0..y1 {
            for x in x0..x1 {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
        mask
    }

    #[test]
    fn distance_peaks_in_the_middle() {
        let mask = filled_rect(30, 30, 5, 5, 25, 25);
        let dist = distance_to_background(&mask);
        assert_abs_diff_eq!(dist.get_pixel(0, 0)[0], 0.0);
        assert_abs_diff_eq!(dist.get_pixel(5, 15)[0], 1.0);
        assert!(dist.get_pixel(14, 14)[0] > dist.get_pixel(8, 14)[0]);
    }

    #[test]
    fn empty_mask_has_no_seeds() {
        let mask = GrayImage::new(20, 20);
        let markers = build_markers(&mask, &SegmentationConfig::default());
        assert_eq!(markers.seeds, 0);
        assert!(markers.labels.pixels().all(|p| p[0] == BACKGROUND));
    }

    #[test]
    fn two_blobs_give_two_seeds_and_an_unknown_band() {
        let mut mask = filled_rect(60, 30, 5, 5, 25, 25);
        for y in 5..25 {
            for x in 35..55 {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
        let markers = build_markers(&mask, &SegmentationConfig::default());
        assert_eq!(markers.seeds, 2);

        let left = markers.labels.get_pixel(15, 15)[0];
        let right = markers.labels.get_pixel(45, 15)[0];
        assert!(left >= 2 && right >= 2 && left != right);
        // blob rim and the dilated ring are unknown
        assert_eq!(markers.labels.get_pixel(5, 15)[0], UNKNOWN);
        assert_eq!(markers.labels.get_pixel(4, 15)[0], UNKNOWN);
        assert_eq!(markers.labels.get_pixel(2, 15)[0], BACKGROUND);
        assert_eq!(markers.labels.get_pixel(30, 15)[0], BACKGROUND);
    }
}
