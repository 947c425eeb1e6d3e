//! Internal helpers shared by the pipeline stages.

use image::Rgb;

use crate::error::SegmentationError;

/// Squared Euclidean distance between two RGB triples
#[inline]
pub fn squared_distance(a: [f32; 3], b: [f32; 3]) -> f32 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    dr.mul_add(dr, dg.mul_add(dg, db * db))
}

/// Euclidean distance between two RGB triples
#[inline]
pub fn color_distance(a: [f32; 3], b: [f32; 3]) -> f32 {
    squared_distance(a, b).sqrt()
}

/// Converts an 8-bit RGB pixel to floating point channel values in `0..=255`
#[inline]
pub fn rgb_to_f32(pixel: &Rgb<u8>) -> [f32; 3] {
    let Rgb([r, g, b]) = *pixel;
    [f32::from(r), f32::from(g), f32::from(b)]
}

/// Validates that an image has non-zero dimensions.
///
/// # Arguments
///
/// * `width` - The width of the image
/// * `height` - The height of the image
///
/// # Returns
///
/// `Ok(())` if the dimensions are valid, otherwise `SegmentationError::EmptyImage`
#[inline]
pub fn validate_non_empty_image(width: u32, height: u32) -> Result<(), SegmentationError> {
    if width == 0 || height == 0 {
        Err(SegmentationError::EmptyImage { width, height })
    } else {
        Ok(())
    }
}

/// Validates that two images have matching dimensions.
///
/// # Returns
///
/// `Ok(())` if the dimensions match, otherwise an error message naming the context
pub fn validate_matching_dimensions(
    width1: u32,
    height1: u32,
    width2: u32,
    height2: u32,
    context: &str,
) -> Result<(), String> {
    if width1 != width2 || height1 != height2 {
        Err(format!(
            "{}: Image dimensions must match. Got {}x{} and {}x{}",
            context, width1, height1, width2, height2
        ))
    } else {
        Ok(())
    }
}
