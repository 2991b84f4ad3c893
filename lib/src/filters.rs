use image::{DynamicImage, GrayImage, Luma, Pixel, RgbImage, RgbaImage};

/// Luma of an RGB triple using the ITU-R 601-2 transform
///
/// Formula: L = 0.299*R + 0.587*G + 0.114*B, evaluated in 16-bit fixed
/// point with rounding so that white stays 255.
pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
    let weighted = r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471;
    ((weighted + 0x8000) >> 16) as u8
}

/// Convert an RGBA image to a single-channel luma image
///
/// Alpha is ignored.
///
/// # Arguments
/// * `img` - Input RGBA image
///
/// # Returns
/// Grayscale image with luma values
pub fn calculate_luminance(img: &RgbaImage) -> GrayImage {
    let (width, height) = img.dimensions();
    let mut output = GrayImage::new(width, height);

    for (x, y, pixel) in img.enumerate_pixels() {
        let [r, g, b, _] = pixel.0;
        output.put_pixel(x, y, Luma([luminance(r, g, b)]));
    }

    output
}

/// Grayscale conversion
///
/// Produces a single-channel `Luma8` image regardless of the input layout,
/// dropping any alpha channel.
pub fn grayscale(img: &DynamicImage) -> DynamicImage {
    match img {
        DynamicImage::ImageLuma8(gray) => DynamicImage::ImageLuma8(gray.clone()),
        other => DynamicImage::ImageLuma8(calculate_luminance(&other.to_rgba8())),
    }
}

/// Mean luma of an image, rounded to the nearest integer
///
/// Returns 0 for an empty image.
pub fn mean_luminance(img: &DynamicImage) -> u8 {
    let luma = match img {
        DynamicImage::ImageLuma8(gray) => gray.clone(),
        other => calculate_luminance(&other.to_rgba8()),
    };

    let count = luma.as_raw().len() as u64;
    if count == 0 {
        return 0;
    }
    let sum: u64 = luma.as_raw().iter().map(|&v| v as u64).sum();
    (sum as f64 / count as f64 + 0.5) as u8
}

/// Spread a channel value away from the mean by `amount`
///
/// Truncated toward zero and clamped to the u8 range.
fn stretch(value: u8, mean: f32, amount: f32) -> u8 {
    (mean + amount * (value as f32 - mean)).clamp(0.0, 255.0) as u8
}

/// Contrast enhancement
///
/// Blends every colour channel against a flat image of the mean luma:
/// `out = mean + amount * (in - mean)`. An amount of 1.0 leaves the image
/// unchanged, 0.0 produces a flat gray, values above 1.0 widen the
/// distribution. Alpha is left untouched.
///
/// # Arguments
/// * `img` - Input image (luma, RGB or anything convertible to RGBA)
/// * `amount` - Enhancement factor
///
/// # Returns
/// Enhanced image in the same layout as the input (RGBA for other layouts)
pub fn contrast(img: &DynamicImage, amount: f32) -> DynamicImage {
    let mean = mean_luminance(img) as f32;

    match img {
        DynamicImage::ImageLuma8(gray) => {
            let mut out = gray.clone();
            for pixel in out.pixels_mut() {
                pixel[0] = stretch(pixel[0], mean, amount);
            }
            DynamicImage::ImageLuma8(out)
        }
        DynamicImage::ImageRgb8(rgb) => {
            let mut out: RgbImage = rgb.clone();
            for pixel in out.pixels_mut() {
                pixel.apply(|c| stretch(c, mean, amount));
            }
            DynamicImage::ImageRgb8(out)
        }
        other => {
            let mut out = other.to_rgba8();
            for pixel in out.pixels_mut() {
                pixel.apply_without_alpha(|c| stretch(c, mean, amount));
            }
            DynamicImage::ImageRgba8(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, Rgba};

    #[test]
    fn test_luminance_black() {
        let img = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
        let lum = calculate_luminance(&img);
        assert_eq!(lum.get_pixel(0, 0)[0], 0);
    }

    #[test]
    fn test_luminance_white() {
        let img = RgbaImage::from_pixel(10, 10, Rgba([255, 255, 255, 255]));
        let lum = calculate_luminance(&img);
        assert_eq!(lum.get_pixel(0, 0)[0], 255);
    }

    #[test]
    fn test_luminance_primaries() {
        assert_eq!(luminance(255, 0, 0), 76);
        assert_eq!(luminance(0, 255, 0), 150);
        assert_eq!(luminance(0, 0, 255), 29);
    }

    #[test]
    fn test_grayscale_drops_alpha() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 3, Rgba([200, 10, 10, 40])));
        let gray = grayscale(&img);
        assert!(matches!(gray, DynamicImage::ImageLuma8(_)));
        assert_eq!(gray.as_luma8().map(|g| g.dimensions()), Some((4, 3)));
    }

    #[test]
    fn test_mean_luminance_half_and_half() {
        let mut img = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([255, 255, 255, 255]));
        // 127.5 rounds up
        assert_eq!(mean_luminance(&DynamicImage::ImageRgba8(img)), 128);
    }

    #[test]
    fn test_contrast_identity() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(8, 8, |x, y| {
            Rgb([(x * 30) as u8, (y * 30) as u8, 90])
        }));
        let out = contrast(&img, 1.0);
        assert_eq!(out.as_rgb8(), img.as_rgb8());
    }

    #[test]
    fn test_contrast_widens_distribution() {
        let mut gray = GrayImage::from_pixel(2, 1, Luma([100]));
        gray.put_pixel(1, 0, Luma([156]));
        let out = contrast(&DynamicImage::ImageLuma8(gray), 3.0);
        let out = out.as_luma8().cloned().unwrap_or_default();

        // mean 128: 128 + 3 * (100 - 128) = 44, 128 + 3 * (156 - 128) = 212
        assert_eq!(out.get_pixel(0, 0)[0], 44);
        assert_eq!(out.get_pixel(1, 0)[0], 212);
    }

    #[test]
    fn test_contrast_clamps() {
        let mut gray = GrayImage::from_pixel(2, 1, Luma([10]));
        gray.put_pixel(1, 0, Luma([250]));
        let out = contrast(&DynamicImage::ImageLuma8(gray), 10.0);
        let out = out.as_luma8().cloned().unwrap_or_default();
        assert_eq!(out.get_pixel(0, 0)[0], 0);
        assert_eq!(out.get_pixel(1, 0)[0], 255);
    }

    #[test]
    fn test_contrast_keeps_alpha() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(3, 3, Rgba([50, 60, 70, 99])));
        let out = contrast(&img, 2.0);
        let out = out.as_rgba8().cloned().unwrap_or_default();
        assert_eq!(out.get_pixel(1, 1)[3], 99);
    }

    #[test]
    fn test_contrast_flat_image_unchanged() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(5, 5, Luma([0])));
        let out = contrast(&img, 3.0);
        assert!(out.as_luma8().is_some_and(|g| g.pixels().all(|p| p[0] == 0)));
    }
}
