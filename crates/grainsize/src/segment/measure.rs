//! Region areas to equivalent diameters.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use super::markers::{LabelImage, BACKGROUND};

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct RegionMeasurements {
    /// Equivalent diameters in millimetres, ascending label order.
    pub diameters_mm: Vec<f64>,
    /// Grain labels present after the flood.
    pub total_labels: usize,
    /// Labels dropped as noise.
    pub discarded: usize,
}

impl RegionMeasurements {
    /// `valid / total`, capped at 1; 0 when there are no labels.
    pub fn quality(&self) -> f64 {
        if self.total_labels == 0 {
            return 0.0;
        }
        (self.diameters_mm.len() as f64 / self.total_labels as f64).min(1.0)
    }
}

/// Diameter of the circle with the same area.
pub(crate) fn equivalent_diameter(area_px: f64) -> f64 {
    (4.0 * area_px / PI).sqrt()
}

/// Measure every grain label (> background) of a flooded label image.
pub(crate) fn measure_regions(
    labels: &LabelImage,
    pixels_per_mm: f64,
    min_area_px: u32,
) -> RegionMeasurements {
    let mut areas: BTreeMap<u32, u64> = BTreeMap::new();
    for px in labels.pixels() {
        if px[0] > BACKGROUND {
            *areas.entry(px[0]).or_default() += 1;
        }
    }

    let mut out = RegionMeasurements {
        total_labels: areas.len(),
        ..RegionMeasurements::default()
    };
    for (label, area) in areas {
        if area <= u64::from(min_area_px) {
            tracing::trace!("label {} discarded: {} px", label, area);
            out.discarded += 1;
            continue;
        }
        let d_px = equivalent_diameter(area as f64);
        tracing::trace!("label {}: {} px, d = {:.2} px", label, area, d_px);
        out.diameters_mm.push(d_px / pixels_per_mm);
    }
    out
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use image::Luma;

    use super::*;

    #[test]
    fn equivalent_diameter_of_unit_circle_area() {
        assert_relative_eq!(equivalent_diameter(PI), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn small_regions_are_noise() {
        let mut labels = LabelImage::from_pixel(10, 10, Luma([BACKGROUND]));
        // label 2: 20 px, label 3: 5 px (at the noise floor), label 4: 6 px
        for x in 0..10 {
            labels.put_pixel(x, 0, Luma([2]));
            labels.put_pixel(x, 1, Luma([2]));
        }
        for x in 0..5 {
            labels.put_pixel(x, 5, Luma([3]));
        }
        for x in 0..6 {
            labels.put_pixel(x, 8, Luma([4]));
        }
        let m = measure_regions(&labels, 2.0, 5);
        assert_eq!(m.total_labels, 3);
        assert_eq!(m.discarded, 1);
        assert_eq!(m.diameters_mm.len(), 2);
        assert_relative_eq!(m.diameters_mm[0], equivalent_diameter(20.0) / 2.0);
        assert_relative_eq!(m.quality(), 2.0 / 3.0);
    }

    #[test]
    fn background_and_unknown_are_not_grains() {
        let mut labels = LabelImage::from_pixel(4, 4, Luma([BACKGROUND]));
        labels.put_pixel(0, 0, Luma([0]));
        let m = measure_regions(&labels, 1.0, 5);
        assert_eq!(m, RegionMeasurements::default());
        assert_eq!(m.quality(), 0.0);
    }
}
