use image::Luma;
use imageproc::definitions::Image;
use imageproc::map::map_colors;

use crate::config::MaskBand;

/// Map foreground probabilities onto a soft alpha ramp
///
/// Probabilities above `band.high` become 1, those in `(band.low, band.high]`
/// rise linearly from 0, everything else is 0.
pub fn threshold_mask(probability: &Image<Luma<f32>>, band: &MaskBand) -> Image<Luma<f32>> {
    let span = band.high - band.low;
    map_colors(probability, |Luma([p])| {
        let alpha = if p > band.high {
            1.0
        } else if p > band.low {
            (p - band.low) / span
        } else {
            0.0
        };
        Luma([alpha.clamp(0.0, 1.0)])
    })
}

/// Per-pixel maximum over a `(2r+1)²` square window clipped to the image
pub fn dilate(mask: &Image<Luma<f32>>, radius: u32) -> Image<Luma<f32>> {
    square_filter(mask, radius, f32::max)
}

/// Per-pixel minimum over a `(2r+1)²` square window clipped to the image
pub fn erode(mask: &Image<Luma<f32>>, radius: u32) -> Image<Luma<f32>> {
    square_filter(mask, radius, f32::min)
}

/// Morphological closing: dilation followed by erosion with the same window
///
/// Fills holes and gaps narrower than the window while leaving the outline of
/// larger regions where it was.
pub fn close(mask: &Image<Luma<f32>>, radius: u32) -> Image<Luma<f32>> {
    if radius == 0 {
        return mask.clone();
    }
    erode(&dilate(mask, radius), radius)
}

/// Separable square window reduction, rows first then columns
fn square_filter(
    mask: &Image<Luma<f32>>,
    radius: u32,
    reduce: fn(f32, f32) -> f32,
) -> Image<Luma<f32>> {
    if radius == 0 {
        return mask.clone();
    }
    let (width, height) = mask.dimensions();

    let horizontal = Image::from_fn(width, height, |x, y| {
        let start = x.saturating_sub(radius);
        let end = x.saturating_add(radius).min(width - 1);
        let value = (start..=end)
            .map(|sx| mask.get_pixel(sx, y)[0])
            .reduce(reduce)
            .unwrap_or(0.0);
        Luma([value])
    });

    Image::from_fn(width, height, |x, y| {
        let start = y.saturating_sub(radius);
        let end = y.saturating_add(radius).min(height - 1);
        let value = (start..=end)
            .map(|sy| horizontal.get_pixel(x, sy)[0])
            .reduce(reduce)
            .unwrap_or(0.0);
        Luma([value])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageBuffer;

    #[test]
    fn threshold_follows_the_ramp() {
        let probability = ImageBuffer::from_fn(5, 1, |x, _| {
            Luma([[0.1f32, 0.2, 0.3, 0.4, 0.9][x as usize]])
        });
        let mask = threshold_mask(&probability, &MaskBand::default());
        let values: Vec<f32> = mask.pixels().map(|p| p[0]).collect();
        assert_eq!(values[0], 0.0);
        assert_eq!(values[1], 0.0);
        assert!((values[2] - 0.5).abs() < 1e-5);
        assert!((values[3] - 1.0).abs() < 1e-5);
        assert_eq!(values[4], 1.0);
    }

    #[test]
    fn dilate_and_erode_use_square_window() {
        let mut mask: Image<Luma<f32>> = ImageBuffer::new(7, 7);
        mask.put_pixel(3, 3, Luma([1.0]));

        let dilated = dilate(&mask, 1);
        for (x, y, p) in dilated.enumerate_pixels() {
            let inside = (2..=4).contains(&x) && (2..=4).contains(&y);
            assert_eq!(p[0], if inside { 1.0 } else { 0.0 });
        }

        let eroded = erode(&dilated, 1);
        assert_eq!(eroded, mask);
    }

    #[test]
    fn closing_fills_isolated_speck() {
        let mut mask = ImageBuffer::from_pixel(11, 11, Luma([1.0f32]));
        mask.put_pixel(5, 5, Luma([0.0]));

        let closed = close(&mask, 2);
        assert_eq!(closed.get_pixel(5, 5)[0], 1.0);
        assert!(closed.pixels().all(|p| p[0] == 1.0));
    }

    #[test]
    fn closing_keeps_rectangle_outline() {
        let mask = ImageBuffer::from_fn(20, 20, |x, y| {
            Luma([if (5..15).contains(&x) && (5..15).contains(&y) { 1.0f32 } else { 0.0 }])
        });
        assert_eq!(close(&mask, 2), mask);
    }

    #[test]
    fn zero_radius_is_identity() {
        let mask = ImageBuffer::from_fn(4, 4, |x, y| Luma([(x * y) as f32 / 9.0]));
        assert_eq!(close(&mask, 0), mask);
        assert_eq!(dilate(&mask, 0), mask);
    }

    #[test]
    fn oversized_radius_covers_the_whole_mask() {
        let mut mask: Image<Luma<f32>> = ImageBuffer::new(5, 4);
        mask.put_pixel(0, 0, Luma([1.0]));
        assert!(dilate(&mask, u32::MAX).pixels().all(|p| p[0] == 1.0));
        assert!(erode(&mask, u32::MAX).pixels().all(|p| p[0] == 0.0));
    }
}
