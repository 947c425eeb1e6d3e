use image::{Rgb, Rgba};
use imageproc::definitions::Image;
use imageproc::map::map_colors;

use super::inter_area::InterAreaResize;
use crate::error::SegmentationError;
use crate::utils::validate_non_empty_image;

/// RGB copy of the source at bounded resolution
#[derive(Debug, Clone, PartialEq)]
pub struct WorkingImage {
    /// Working pixels, alpha dropped
    pub image: Image<Rgb<u8>>,
    /// Factor mapping native coordinates to working coordinates, `<= 1`
    pub scale: f32,
}

impl WorkingImage {
    /// Working dimensions as `(width, height)`
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// Scale factor and working dimensions for a `width` x `height` source
///
/// Never exceeds 1, so the working buffer is never larger than the source.
pub fn working_dimensions(width: u32, height: u32, max_working_dim: u32) -> (f32, u32, u32) {
    let longest = width.max(height);
    if longest <= max_working_dim {
        return (1.0, width, height);
    }

    let scale = max_working_dim as f32 / longest as f32;
    let scaled = |side: u32| ((side as f32 * scale).round() as u32).clamp(1, side);
    (scale, scaled(width), scaled(height))
}

/// Produce the working buffer for `source`
///
/// Sources that already fit are copied without resampling; larger ones are
/// reduced with area interpolation.
///
/// # Errors
///
/// * `SegmentationError::EmptyImage` - when `source` has a zero dimension
/// * `SegmentationError::Resize` - when resampling fails
pub fn downscale(
    source: &Image<Rgba<u8>>,
    max_working_dim: u32,
) -> Result<WorkingImage, SegmentationError> {
    let (width, height) = source.dimensions();
    validate_non_empty_image(width, height)?;

    let rgb = map_colors(source, |Rgba([r, g, b, _])| Rgb([r, g, b]));
    let (scale, working_width, working_height) =
        working_dimensions(width, height, max_working_dim);

    if (working_width, working_height) == (width, height) {
        return Ok(WorkingImage { image: rgb, scale });
    }

    let image = InterAreaResize::new(working_width, working_height)?.resize(&rgb)?;
    Ok(WorkingImage { image, scale })
}
