//! End-to-end background removal.
//!
//! The stages run strictly in order, each consuming the previous stage's
//! output:
//!
//! 1. downscale to at most `max_working_dim` on the longest side
//! 2. grayscale and Sobel edge magnitude
//! 3. background color statistics from the border band
//! 4. deterministic k-means color clustering
//! 5. fused foreground probability
//! 6. border-seeded background flood fill
//! 7. soft threshold and morphological closing
//! 8. Gaussian smoothing
//! 9. bilinear upscaling into the alpha channel
//!
//! All intermediate buffers live only for the duration of one call. Nothing is
//! written to the caller's image until the complete alpha mask exists.

use image::{DynamicImage, Luma, Rgba};
use imageproc::definitions::Image;
use log::debug;

use super::border_model::{estimate_border_model, BorderColorModel};
use super::composite::{composite, composite_mut};
use super::downscale::downscale;
use super::edges::{sobel_edges, to_grayscale};
use super::flood_fill::{flood_fill_background, FloodFillParams};
use super::kmeans::cluster_colors;
use super::morphology::{close, threshold_mask};
use super::probability::foreground_probability;
use super::smoothing::gaussian_smooth;
use crate::cancel::CancellationToken;
use crate::config::SegmentationConfig;
use crate::error::SegmentationError;
use crate::utils::validate_non_empty_image;

/// Working-resolution result of the segmentation stages
#[derive(Debug, Clone, PartialEq)]
pub struct ForegroundMatte {
    /// Smoothed alpha mask, values in `[0, 1]`
    pub mask: Image<Luma<f32>>,
    /// Factor mapping native coordinates onto `mask`
    pub scale: f32,
    /// Background color statistics of the border band
    pub background: BorderColorModel,
    /// Adaptive background color threshold derived from `background`
    pub background_threshold: f32,
    /// Pixels absorbed by the background flood fill
    pub flooded_pixels: usize,
}

/// Background remover with a validated configuration
///
/// # Examples
///
/// ```no_run
/// use imageops_segment::{BackgroundRemover, CancellationToken, Image, SegmentationConfig};
/// use image::Rgba;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let remover = BackgroundRemover::new(SegmentationConfig::default())?;
/// let image: Image<Rgba<u8>> = Image::new(640, 480);
/// let cutout = remover.remove_background(&image, &CancellationToken::new())?;
/// assert_eq!(cutout.dimensions(), (640, 480));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct BackgroundRemover {
    config: SegmentationConfig,
}

impl BackgroundRemover {
    /// Create a remover after validating `config`
    ///
    /// # Errors
    ///
    /// * `SegmentationError::InvalidParameter` - when a parameter is out of range
    pub fn new(config: SegmentationConfig) -> Result<Self, SegmentationError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration in use
    pub const fn config(&self) -> &SegmentationConfig {
        &self.config
    }

    /// Run stages 1 to 8 and return the working-resolution matte
    ///
    /// # Errors
    ///
    /// * `SegmentationError::EmptyImage` - when `image` has a zero dimension
    /// * `SegmentationError::Cancelled` - when `token` is cancelled
    /// * `SegmentationError::Resize` - when downscaling fails
    pub fn matte(
        &self,
        image: &Image<Rgba<u8>>,
        token: &CancellationToken,
    ) -> Result<ForegroundMatte, SegmentationError> {
        let config = &self.config;
        let (width, height) = image.dimensions();
        validate_non_empty_image(width, height)?;
        token.check()?;

        let working = downscale(image, config.max_working_dim)?;
        let (working_width, working_height) = working.dimensions();
        debug!(
            "segmenting {width}x{height} at {working_width}x{working_height} (scale {:.4})",
            working.scale
        );
        token.check()?;

        let edges = sobel_edges(&to_grayscale(&working.image));
        token.check()?;

        let background = estimate_border_model(&working.image);
        let background_threshold = background.threshold();
        debug!(
            "border model: band {} mean {:?} std {:.2} threshold {:.2}",
            background.band,
            background.mean,
            background.mean_std(),
            background_threshold
        );
        token.check()?;

        let clusters = cluster_colors(
            &working.image,
            config.clusters,
            config.cluster_iterations,
            config.cluster_early_exit,
            token,
        )?;
        token.check()?;

        let mut probability = foreground_probability(
            &working.image,
            &background,
            &clusters,
            &edges,
            &config.weights,
        );
        token.check()?;

        let params = FloodFillParams {
            seed_threshold: config.flood_seed_threshold,
            max_color_step: background_threshold * config.flood_color_tolerance,
            absorb_ceiling: config.flood_absorb_ceiling,
            background_probability: config.background_probability,
        };
        let flooded_pixels =
            flood_fill_background(&working.image, &mut probability, &params, token)?;
        debug!("flood fill absorbed {flooded_pixels} pixels");
        token.check()?;

        let closed = close(
            &threshold_mask(&probability, &config.mask_band),
            config.morphology_radius,
        );
        token.check()?;

        let mask = gaussian_smooth(&closed, config.blur_radius);
        token.check()?;

        Ok(ForegroundMatte {
            mask,
            scale: working.scale,
            background,
            background_threshold,
            flooded_pixels,
        })
    }

    /// Return a copy of `image` whose alpha channel is the foreground matte
    ///
    /// # Errors
    ///
    /// Same as [`BackgroundRemover::matte`], plus
    /// `SegmentationError::AlphaMask` if compositing fails.
    pub fn remove_background(
        &self,
        image: &Image<Rgba<u8>>,
        token: &CancellationToken,
    ) -> Result<Image<Rgba<u8>>, SegmentationError> {
        let matte = self.matte(image, token)?;
        composite(image, &matte.mask, matte.scale)
    }

    /// Replace the alpha channel of `image` with the foreground matte
    ///
    /// `image` is left untouched when an error is returned.
    ///
    /// # Errors
    ///
    /// Same as [`BackgroundRemover::remove_background`].
    pub fn remove_background_mut(
        &self,
        image: &mut Image<Rgba<u8>>,
        token: &CancellationToken,
    ) -> Result<(), SegmentationError> {
        let matte = self.matte(image, token)?;
        composite_mut(image, &matte.mask, matte.scale)
    }
}

/// Extension trait providing background removal on RGBA images
pub trait RemoveBackgroundExt {
    /// Replace the alpha channel with the estimated foreground matte
    ///
    /// This consumes the original image.
    ///
    /// # Errors
    ///
    /// * `SegmentationError::InvalidParameter` - when `config` is invalid
    /// * `SegmentationError::EmptyImage` - when the image has a zero dimension
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use imageops_segment::{Image, RemoveBackgroundExt, SegmentationConfig};
    /// use image::Rgba;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let image: Image<Rgba<u8>> = Image::new(100, 100);
    /// let cutout = image.remove_background(&SegmentationConfig::default())?;
    /// # Ok(())
    /// # }
    /// ```
    fn remove_background(self, config: &SegmentationConfig) -> Result<Self, SegmentationError>
    where
        Self: Sized;

    /// In-place variant of [`RemoveBackgroundExt::remove_background`]
    ///
    /// # Errors
    ///
    /// Same as [`RemoveBackgroundExt::remove_background`]; the image is
    /// unchanged on error.
    fn remove_background_mut(
        &mut self,
        config: &SegmentationConfig,
    ) -> Result<&mut Self, SegmentationError>;
}

impl RemoveBackgroundExt for Image<Rgba<u8>> {
    fn remove_background(mut self, config: &SegmentationConfig) -> Result<Self, SegmentationError> {
        self.remove_background_mut(config)?;
        Ok(self)
    }

    fn remove_background_mut(
        &mut self,
        config: &SegmentationConfig,
    ) -> Result<&mut Self, SegmentationError> {
        BackgroundRemover::new(config.clone())?
            .remove_background_mut(self, &CancellationToken::new())?;
        Ok(self)
    }
}

/// Build an RGBA image from raw row-major bytes
///
/// # Errors
///
/// * `SegmentationError::EmptyImage` - when `width` or `height` is 0
/// * `SegmentationError::BufferSizeMismatch` - when `data` is not exactly
///   `width * height * 4` bytes
pub fn rgba_from_raw(
    width: u32,
    height: u32,
    data: Vec<u8>,
) -> Result<Image<Rgba<u8>>, SegmentationError> {
    validate_non_empty_image(width, height)?;
    let expected = width as usize * height as usize * 4;
    let actual = data.len();
    if actual != expected {
        return Err(SegmentationError::BufferSizeMismatch {
            width,
            height,
            expected,
            actual,
        });
    }
    Image::from_raw(width, height, data).ok_or(SegmentationError::BufferSizeMismatch {
        width,
        height,
        expected,
        actual,
    })
}

/// Remove the background of an image handed over by an external decoder
///
/// Non-RGBA8 images are converted to RGBA8 first.
///
/// # Errors
///
/// * `SegmentationError::DecodeUnavailable` - when `image` is `None`
/// * any error of [`BackgroundRemover::remove_background`]
pub fn remove_background_dynamic(
    image: Option<&DynamicImage>,
    config: &SegmentationConfig,
    token: &CancellationToken,
) -> Result<Image<Rgba<u8>>, SegmentationError> {
    let image = image.ok_or(SegmentationError::DecodeUnavailable)?;
    let remover = BackgroundRemover::new(config.clone())?;
    let rgba = image.to_rgba8();
    remover.remove_background(&rgba, token)
}
