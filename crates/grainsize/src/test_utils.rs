//! Synthetic scenes shared by the unit tests.

use image::{Rgb, RgbImage};

pub(crate) const BRIGHT: [u8; 3] = [230, 230, 230];
pub(crate) const DARK: [u8; 3] = [30, 30, 30];

pub(crate) const SAND: [u8; 3] = [150, 150, 150];
pub(crate) const CARD: [u8; 3] = [240, 240, 240];
pub(crate) const GRAIN: [u8; 3] = [40, 40, 40];

/// Uniform image.
pub(crate) fn blank_scene(w: u32, h: u32, color: [u8; 3]) -> RgbImage {
    RgbImage::from_pixel(w, h, Rgb(color))
}

/// Axis-aligned filled rectangle with top-left corner `origin`.
pub(crate) fn draw_rectangle_scene(
    w: u32,
    h: u32,
    origin: [u32; 2],
    size: [u32; 2],
    fg: [u8; 3],
    bg: [u8; 3],
) -> RgbImage {
    let mut img = blank_scene(w, h, bg);
    for y in origin[1]..(origin[1] + size[1]).min(h) {
        for x in origin[0]..(origin[0] + size[0]).min(w) {
            img.put_pixel(x, y, Rgb(fg));
        }
    }
    img
}

/// Filled discs; a pixel is inside when its distance to a center is <= radius.
pub(crate) fn draw_disc_scene(
    w: u32,
    h: u32,
    discs: &[([f64; 2], f64)],
    fg: [u8; 3],
    bg: [u8; 3],
) -> RgbImage {
    let mut img = blank_scene(w, h, bg);
    for (center, radius) in discs {
        for y in 0..h {
            for x in 0..w {
                let dx = x as f64 - center[0];
                let dy = y as f64 - center[1];
                if dx * dx + dy * dy <= radius * radius {
                    img.put_pixel(x, y, Rgb(fg));
                }
            }
        }
    }
    img
}

/// Sand-coloured background with an ID-1 card (200 x 126 px at (100, 80))
/// and r = 4 dark grains at the given centers.
pub(crate) fn sand_with_card(w: u32, h: u32, grains: &[[f64; 2]]) -> RgbImage {
    let mut img = draw_rectangle_scene(w, h, [100, 80], [200, 126], CARD, SAND);
    for (x, y, px) in img.enumerate_pixels_mut() {
        let inside = grains.iter().any(|c| {
            let dx = x as f64 - c[0];
            let dy = y as f64 - c[1];
            dx * dx + dy * dy <= 16.0
        });
        if inside {
            *px = Rgb(GRAIN);
        }
    }
    img
}
