//! Marker-based watershed by priority flood.
//!
//! Iterative: a min-heap ordered by landscape height, then insertion order,
//! replaces any recursive region growing.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use image::{GrayImage, Luma};
use imageproc::definitions::Image;

use super::markers::{LabelImage, UNKNOWN};

/// Landscape the flood climbs: Sobel gradient magnitude.
pub(crate) fn gradient_landscape(gray: &GrayImage) -> Image<Luma<u16>> {
    imageproc::gradients::sobel_gradients(gray)
}

fn neighbours4(x: u32, y: u32, w: u32, h: u32) -> impl Iterator<Item = (u32, u32)> {
    let left = x.checked_sub(1).map(|l| (l, y));
    let up = y.checked_sub(1).map(|u| (x, u));
    let right = (x + 1 < w).then_some((x + 1, y));
    let down = (y + 1 < h).then_some((x, y + 1));
    [left, up, right, down].into_iter().flatten()
}

/// Flood every [`UNKNOWN`] pixel reachable from a labelled pixel.
///
/// A pixel takes the label of the first neighbour popped from the heap, so
/// each pixel ends with exactly one label; no boundary label is written.
/// Returns the number of pixels flooded.
pub(crate) fn flood(landscape: &Image<Luma<u16>>, labels: &mut LabelImage) -> usize {
    let (w, h) = labels.dimensions();
    debug_assert_eq!(landscape.dimensions(), (w, h));

    let mut heap = BinaryHeap::new();
    let mut seq: u64 = 0;
    for y in 0..h {
        for x in 0..w {
            if labels.get_pixel(x, y)[0] == UNKNOWN {
                continue;
            }
            let borders_unknown =
                neighbours4(x, y, w, h).any(|(nx, ny)| labels.get_pixel(nx, ny)[0] == UNKNOWN);
            if borders_unknown {
                heap.push(Reverse((landscape.get_pixel(x, y)[0], seq, x, y)));
                seq += 1;
            }
        }
    }

    let mut flooded = 0;
    while let Some(Reverse((_, _, x, y))) = heap.pop() {
        let label = labels.get_pixel(x, y)[0];
        for (nx, ny) in neighbours4(x, y, w, h) {
            if labels.get_pixel(nx, ny)[0] != UNKNOWN {
                continue;
            }
            labels.put_pixel(nx, ny, Luma([label]));
            heap.push(Reverse((landscape.get_pixel(nx, ny)[0], seq, nx, ny)));
            seq += 1;
            flooded += 1;
        }
    }
    flooded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::markers::BACKGROUND;

    #[test]
    fn flat_landscape_splits_between_seeds() {
        let landscape = Image::<Luma<u16>>::new(21, 1);
        let mut labels = LabelImage::new(21, 1);
        labels.put_pixel(0, 0, Luma([2]));
        labels.put_pixel(20, 0, Luma([3]));
        let flooded = flood(&landscape, &mut labels);
        assert_eq!(flooded, 19);
        let twos = labels.pixels().filter(|p| p[0] == 2).count();
        let threes = labels.pixels().filter(|p| p[0] == 3).count();
        assert_eq!(twos + threes, 21);
        assert!(twos.abs_diff(threes) <= 1);
    }

    #[test]
    fn ridge_stops_the_flood() {
        // Low valley on each side of a ridge at x = 12.
        let mut landscape = Image::<Luma<u16>>::new(20, 5);
        for y in 0..5 {
            landscape.put_pixel(12, y, Luma([1000]));
        }
        let mut labels = LabelImage::new(20, 5);
        labels.put_pixel(2, 2, Luma([2]));
        labels.put_pixel(17, 2, Luma([3]));
        flood(&landscape, &mut labels);
        for y in 0..5 {
            for x in 0..12 {
                assert_eq!(labels.get_pixel(x, y)[0], 2, "({x}, {y})");
            }
            for x in 13..20 {
                assert_eq!(labels.get_pixel(x, y)[0], 3, "({x}, {y})");
            }
        }
    }

    #[test]
    fn isolated_unknown_pixels_stay_unknown() {
        let landscape = Image::<Luma<u16>>::new(5, 5);
        let mut labels = LabelImage::from_pixel(5, 5, Luma([BACKGROUND]));
        labels.put_pixel(2, 2, Luma([UNKNOWN]));
        for (x, y) in [(1, 2), (3, 2), (2, 1), (2, 3)] {
            labels.put_pixel(x, y, Luma([UNKNOWN]));
        }
        let mut walled = LabelImage::new(3, 1);
        assert_eq!(flood(&Image::new(3, 1), &mut walled), 0);
        assert!(walled.pixels().all(|p| p[0] == UNKNOWN));

        assert_eq!(flood(&landscape, &mut labels), 5);
        assert!(labels.pixels().all(|p| p[0] == BACKGROUND));
    }
}
