//! Turning an image file into an analysable RGB buffer.
//!
//! The analysis core imposes no size floor of its own; callers go through
//! these helpers first.

use std::path::Path;

use image::RgbImage;

use crate::error::InputError;

/// Smallest accepted image side (px).
pub const MIN_IMAGE_DIM: u32 = 100;

/// Reject images with either side below [`MIN_IMAGE_DIM`].
pub fn check_image_dimensions(width: u32, height: u32) -> Result<(), InputError> {
    if width < MIN_IMAGE_DIM || height < MIN_IMAGE_DIM {
        return Err(InputError::TooSmall {
            width,
            height,
            min: MIN_IMAGE_DIM,
        });
    }
    Ok(())
}

/// Decode `path` as 8-bit RGB and apply the size floor.
pub fn load_image(path: &Path) -> Result<RgbImage, InputError> {
    let img = image::open(path)
        .map_err(|source| InputError::Decode {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgb8();
    check_image_dimensions(img.width(), img.height())?;
    tracing::debug!("loaded {} ({}x{})", path.display(), img.width(), img.height());
    Ok(img)
}
