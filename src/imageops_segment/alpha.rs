use image::{GenericImageView, Luma, Pixel, Primitive, Rgba};
use imageproc::{definitions::Image, map::map_colors2};

use crate::{error::AlphaMaskError, utils::validate_matching_dimensions};

/// Trait for replacing the alpha channel of RGBA images
///
/// Color channels are never touched; only alpha is taken from the mask.
pub trait ModifyAlphaExt {
    type Mask: GenericImageView<Pixel = Luma<Self::Subpixel>>;
    type Subpixel: Primitive;

    /// Replaces the alpha channel with the provided mask
    ///
    /// This consumes the original image.
    ///
    /// # Errors
    ///
    /// * `AlphaMaskError::DimensionMismatch` - When image and mask dimensions don't match
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use imageops_segment::{Image, ModifyAlphaExt};
    /// use image::{ImageBuffer, Rgba, Luma};
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let rgba_image: Image<Rgba<u8>> = ImageBuffer::new(10, 10);
    /// let new_mask: Image<Luma<u8>> = ImageBuffer::new(10, 10);
    ///
    /// let updated = rgba_image.replace_alpha(&new_mask)?;
    /// # Ok(())
    /// # }
    /// ```
    fn replace_alpha(self, mask: &Self::Mask) -> Result<Self, AlphaMaskError>
    where
        Self: Sized;

    /// Replaces the alpha channel with the provided mask in-place
    ///
    /// The image is left untouched when the dimensions don't match.
    ///
    /// # Errors
    ///
    /// * `AlphaMaskError::DimensionMismatch` - When image and mask dimensions don't match
    fn replace_alpha_mut(&mut self, mask: &Self::Mask) -> Result<&mut Self, AlphaMaskError>;
}

impl<S> ModifyAlphaExt for Image<Rgba<S>>
where
    Rgba<S>: Pixel<Subpixel = S>,
    S: Primitive,
{
    type Mask = Image<Luma<S>>;
    type Subpixel = S;

    fn replace_alpha(self, mask: &Self::Mask) -> Result<Self, AlphaMaskError> {
        validate_dimensions(&self, mask)?;

        Ok(map_colors2(
            &self,
            mask,
            |Rgba([red, green, blue, _]), Luma([alpha])| Rgba([red, green, blue, alpha]),
        ))
    }

    fn replace_alpha_mut(&mut self, mask: &Self::Mask) -> Result<&mut Self, AlphaMaskError> {
        validate_dimensions(self, mask)?;

        self.pixels_mut()
            .zip(mask.pixels())
            .for_each(|(pixel, Luma([alpha]))| pixel[3] = *alpha);

        Ok(self)
    }
}

#[inline]
fn validate_dimensions<I1, I2>(image: &I1, mask: &I2) -> Result<(), AlphaMaskError>
where
    I1: GenericImageView,
    I2: GenericImageView,
{
    let (img_w, img_h) = image.dimensions();
    let (mask_w, mask_h) = mask.dimensions();

    validate_matching_dimensions(img_w, img_h, mask_w, mask_h, "ModifyAlpha").map_err(|_| {
        AlphaMaskError::DimensionMismatch {
            expected: (img_w, img_h),
            actual: (mask_w, mask_h),
        }
    })
}
