use image::{Luma, Rgba};
use imageproc::definitions::Image;

use super::alpha::ModifyAlphaExt;
use crate::error::SegmentationError;

/// Sample `mask` at fractional working coordinates with bilinear interpolation
///
/// Coordinates outside the mask are clamped to its edge. An empty mask
/// samples as 0.
#[inline]
pub fn sample_bilinear(mask: &Image<Luma<f32>>, x: f32, y: f32) -> f32 {
    let (width, height) = mask.dimensions();
    if width == 0 || height == 0 {
        return 0.0;
    }
    let x = x.clamp(0.0, (width - 1) as f32);
    let y = y.clamp(0.0, (height - 1) as f32);

    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    let x1 = (x0 + 1).min(width - 1);
    let y1 = (y0 + 1).min(height - 1);
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let top = mask.get_pixel(x0, y0)[0] * (1.0 - fx) + mask.get_pixel(x1, y0)[0] * fx;
    let bottom = mask.get_pixel(x0, y1)[0] * (1.0 - fx) + mask.get_pixel(x1, y1)[0] * fx;
    top * (1.0 - fy) + bottom * fy
}

/// Resample the working-resolution mask to `width` x `height` 8-bit alpha
///
/// Native pixel `(ox, oy)` reads the mask at `(ox * scale, oy * scale)`.
pub fn upscale_alpha(
    mask: &Image<Luma<f32>>,
    scale: f32,
    width: u32,
    height: u32,
) -> Image<Luma<u8>> {
    Image::from_fn(width, height, |ox, oy| {
        let alpha = sample_bilinear(mask, ox as f32 * scale, oy as f32 * scale);
        Luma([(alpha.clamp(0.0, 1.0) * 255.0).round() as u8])
    })
}

/// Write the upscaled mask into the alpha channel of a copy of `source`
///
/// # Errors
///
/// * `SegmentationError::EmptyImage` - when the mask is empty
/// * `SegmentationError::AlphaMask` - when the upscaled mask does not fit `source`
pub fn composite(
    source: &Image<Rgba<u8>>,
    mask: &Image<Luma<f32>>,
    scale: f32,
) -> Result<Image<Rgba<u8>>, SegmentationError> {
    let alpha = native_alpha(source, mask, scale)?;
    Ok(source.clone().replace_alpha(&alpha)?)
}

/// In-place variant of [`composite`]
///
/// `source` is only written once the full native alpha mask exists.
///
/// # Errors
///
/// Same as [`composite`].
pub fn composite_mut(
    source: &mut Image<Rgba<u8>>,
    mask: &Image<Luma<f32>>,
    scale: f32,
) -> Result<(), SegmentationError> {
    let alpha = native_alpha(source, mask, scale)?;
    source.replace_alpha_mut(&alpha)?;
    Ok(())
}

fn native_alpha(
    source: &Image<Rgba<u8>>,
    mask: &Image<Luma<f32>>,
    scale: f32,
) -> Result<Image<Luma<u8>>, SegmentationError> {
    let (mask_width, mask_height) = mask.dimensions();
    if mask_width == 0 || mask_height == 0 {
        return Err(SegmentationError::EmptyImage {
            width: mask_width,
            height: mask_height,
        });
    }
    let (width, height) = source.dimensions();
    Ok(upscale_alpha(mask, scale, width, height))
}
