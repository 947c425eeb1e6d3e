use image::Rgb;
use imageproc::definitions::Image;

use crate::utils::rgb_to_f32;

/// Smallest border band width in pixels
const MIN_BAND: u32 = 3;
/// Border band width as a fraction of the shorter side
const BAND_FRACTION: f32 = 0.04;

const THRESHOLD_STD_FACTOR: f32 = 2.5;
const THRESHOLD_OFFSET: f32 = 25.0;
const THRESHOLD_MIN: f32 = 35.0;
const THRESHOLD_MAX: f32 = 80.0;

/// Background color statistics sampled from the image border
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderColorModel {
    /// Mean RGB of the band, channels in `0..=255`
    pub mean: [f32; 3],
    /// Per-channel population standard deviation of the band
    pub std_dev: [f32; 3],
    /// Width of the sampled band in pixels
    pub band: u32,
}

impl BorderColorModel {
    /// Average of the three channel deviations
    #[inline]
    pub fn mean_std(&self) -> f32 {
        (self.std_dev[0] + self.std_dev[1] + self.std_dev[2]) / 3.0
    }

    /// Adaptive color distance below which a pixel counts as background
    ///
    /// Always within `[35, 80]`.
    #[inline]
    pub fn threshold(&self) -> f32 {
        THRESHOLD_STD_FACTOR
            .mul_add(self.mean_std(), THRESHOLD_OFFSET)
            .clamp(THRESHOLD_MIN, THRESHOLD_MAX)
    }
}

/// Width of the border band for a `width` x `height` working image
pub fn band_width(width: u32, height: u32) -> u32 {
    let proportional = (BAND_FRACTION * width.min(height) as f32).round() as u32;
    proportional.max(MIN_BAND)
}

/// Estimate the background color from every pixel inside the border band
///
/// The band is clipped to the image, so images thinner than twice the band
/// are sampled entirely. `image` must be non-empty.
pub fn estimate_border_model(image: &Image<Rgb<u8>>) -> BorderColorModel {
    let (width, height) = image.dimensions();
    let band = band_width(width, height);

    let mut sum = [0.0f64; 3];
    let mut sum_sq = [0.0f64; 3];
    let mut count = 0usize;

    for (x, y, pixel) in image.enumerate_pixels() {
        let in_band =
            x < band || y < band || x + band >= width || y + band >= height;
        if !in_band {
            continue;
        }
        for (c, value) in rgb_to_f32(pixel).into_iter().enumerate() {
            let value = f64::from(value);
            sum[c] += value;
            sum_sq[c] += value * value;
        }
        count += 1;
    }

    let n = count.max(1) as f64;
    let mut mean = [0.0f32; 3];
    let mut std_dev = [0.0f32; 3];
    for c in 0..3 {
        let m = sum[c] / n;
        let variance = (sum_sq[c] / n - m * m).max(0.0);
        mean[c] = m as f32;
        std_dev[c] = variance.sqrt() as f32;
    }

    BorderColorModel {
        mean,
        std_dev,
        band,
    }
}
