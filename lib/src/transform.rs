//! Geometry operations: rotate, thumbnail and square crop.

use crate::error::{ProcessError, Result};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, Luma, Rgba};
use imageproc::geometric_transformations::{Interpolation, rotate_about_center};

/// Pixel rectangle `(left, top, right, bottom)`, right/bottom exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropBox {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CropBox {
    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }
}

/// Rotate counter-clockwise by `degrees` about the image centre
///
/// The canvas keeps its size; corners that rotate out are lost and
/// uncovered area is filled with transparent black. Grayscale images stay
/// grayscale.
pub fn rotate(img: &DynamicImage, degrees: f32) -> DynamicImage {
    let normalized = degrees.rem_euclid(360.0);
    if normalized == 0.0 {
        return img.clone();
    }
    if normalized == 180.0 {
        return img.rotate180();
    }

    // imageproc rotates clockwise
    let theta = -degrees.to_radians();
    match img {
        DynamicImage::ImageLuma8(gray) => DynamicImage::ImageLuma8(rotate_about_center(
            gray,
            theta,
            Interpolation::Nearest,
            Luma([0]),
        )),
        other => DynamicImage::ImageRgba8(rotate_about_center(
            &other.to_rgba8(),
            theta,
            Interpolation::Nearest,
            Rgba([0, 0, 0, 0]),
        )),
    }
}

/// Thumbnail size that fits `width x height` inside `max_width x max_height`
///
/// Returns `None` when the image already fits, since thumbnails never
/// enlarge. Otherwise the constrained side is pinned to its maximum and the
/// other side is whichever of floor/ceil keeps the aspect ratio closest,
/// never below 1.
pub fn thumbnail_dimensions(
    width: u32,
    height: u32,
    max_width: u32,
    max_height: u32,
) -> Option<(u32, u32)> {
    if width == 0 || height == 0 || (max_width >= width && max_height >= height) {
        return None;
    }
    let max_width = max_width.max(1);
    let max_height = max_height.max(1);

    let aspect = width as f64 / height as f64;
    let closest = |value: f64, error: &dyn Fn(f64) -> f64| -> u32 {
        let (lo, hi) = (value.floor(), value.ceil());
        let pick = if error(hi) < error(lo) { hi } else { lo };
        (pick as u32).max(1)
    };

    if max_width as f64 / max_height as f64 >= aspect {
        let target_height = max_height.min(height);
        let target_width = closest(target_height as f64 * aspect, &|n| {
            (aspect - n / target_height as f64).abs()
        });
        Some((target_width, target_height))
    } else {
        let target_width = max_width.min(width);
        let target_height = closest(target_width as f64 / aspect, &|n| {
            if n == 0.0 {
                f64::INFINITY
            } else {
                (aspect - target_width as f64 / n).abs()
            }
        });
        Some((target_width, target_height))
    }
}

/// Aspect-preserving downscale to fit inside `max_width x max_height`
///
/// Images that already fit come back unchanged.
pub fn thumbnail(img: &DynamicImage, max_width: u32, max_height: u32) -> DynamicImage {
    let (width, height) = img.dimensions();
    match thumbnail_dimensions(width, height, max_width, max_height) {
        Some((w, h)) => img.thumbnail_exact(w, h),
        None => img.clone(),
    }
}

/// Largest centred square inside a `width x height` image
///
/// Landscape images lose equal strips left and right, everything else
/// loses equal strips top and bottom. Odd remainders round the offset down.
pub fn square_crop_box(width: u32, height: u32) -> CropBox {
    if width > height {
        let left = (width - height) / 2;
        CropBox {
            left,
            top: 0,
            right: left + height,
            bottom: height,
        }
    } else {
        let top = (height - width) / 2;
        CropBox {
            left: 0,
            top,
            right: width,
            bottom: top + width,
        }
    }
}

/// Crop to the centred square and resize it to `size x size`
///
/// # Errors
/// `InvalidInput` for a zero target size or an empty source image.
pub fn square(img: &DynamicImage, size: u32) -> Result<DynamicImage> {
    let (width, height) = img.dimensions();
    if size == 0 {
        return Err(ProcessError::InvalidInput(
            "square size must be at least 1".to_string(),
        ));
    }
    if width == 0 || height == 0 {
        return Err(ProcessError::InvalidInput(format!(
            "cannot square-crop an empty {width}x{height} image"
        )));
    }

    let crop = square_crop_box(width, height);
    Ok(img
        .crop_imm(crop.left, crop.top, crop.width(), crop.height())
        .resize_exact(size, size, FilterType::CatmullRom))
}
