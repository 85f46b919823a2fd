//! Threshold selection by block-size sweep.

use image::{GrayImage, Luma};
use imageproc::region_labelling::{connected_components, Connectivity};

use super::SegmentationConfig;

const FOREGROUND: Luma<u8> = Luma([255]);

/// The binary mask picked by [`select_threshold`].
#[derive(Debug, Clone)]
pub(crate) struct ThresholdChoice {
    /// Grain pixels are 255, everything else 0.
    pub mask: GrayImage,
    /// Winning block size; `None` when the Otsu fallback was used.
    pub block_size: Option<u32>,
    /// Connected components of `mask`, background label included.
    pub components: u32,
}

/// Gaussian sigma for a square kernel of side `block_size`, the same rule
/// OpenCV applies when sigma is left at zero.
fn kernel_sigma(block_size: u32) -> f32 {
    0.3 * ((block_size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Inverse adaptive threshold: a pixel is foreground when it is darker than
/// its Gaussian-weighted neighbourhood mean by at least `c`.
pub(crate) fn adaptive_threshold_inv(gray: &GrayImage, block_size: u32, c: f32) -> GrayImage {
    let local_mean = imageproc::filter::gaussian_blur_f32(gray, kernel_sigma(block_size));
    let mut out = GrayImage::new(gray.width(), gray.height());
    for (x, y, px) in out.enumerate_pixels_mut() {
        let src = gray.get_pixel(x, y)[0] as f32;
        let mean = local_mean.get_pixel(x, y)[0] as f32;
        if src <= mean - c {
            *px = FOREGROUND;
        }
    }
    out
}

/// Inverse global Otsu threshold.
pub(crate) fn otsu_threshold_inv(gray: &GrayImage) -> GrayImage {
    let level = imageproc::contrast::otsu_level(gray);
    let mut out = GrayImage::new(gray.width(), gray.height());
    for (x, y, px) in out.enumerate_pixels_mut() {
        if gray.get_pixel(x, y)[0] <= level {
            *px = FOREGROUND;
        }
    }
    out
}

/// Number of 8-connected components, counting the background as one label.
pub(crate) fn count_components(mask: &GrayImage) -> u32 {
    let labels = connected_components(mask, Connectivity::Eight, Luma([0u8]));
    labels.pixels().map(|p| p[0]).max().unwrap_or(0) + 1
}

/// Sweep the configured block sizes and keep the mask with the most components.
///
/// Only a strictly greater count replaces the incumbent, so the earliest block
/// size wins ties. Falls back to inverse Otsu when every size is skipped.
pub(crate) fn select_threshold(gray: &GrayImage, config: &SegmentationConfig) -> ThresholdChoice {
    let min_side = gray.width().min(gray.height());
    let mut best: Option<ThresholdChoice> = None;

    for &block_size in &config.block_sizes {
        if block_size >= min_side {
            tracing::debug!("block size {} skipped (image side {})", block_size, min_side);
            continue;
        }
        let mask = adaptive_threshold_inv(gray, block_size, config.adaptive_c);
        let components = count_components(&mask);
        tracing::debug!("block size {}: {} components", block_size, components);
        if best.as_ref().map_or(true, |b| components > b.components) {
            best = Some(ThresholdChoice {
                mask,
                block_size: Some(block_size),
                components,
            });
        }
    }

    best.unwrap_or_else(|| {
        tracing::debug!("no usable block size; using Otsu");
        let mask = otsu_threshold_inv(gray);
        let components = count_components(&mask);
        ThresholdChoice {
            mask,
            block_size: None,
            components,
        }
    })
}
