use image::Luma;
use imageproc::definitions::Image;

/// Normalized 1D Gaussian kernel of length `2 * radius + 1`
///
/// Sigma is `radius / 4`, so the kernel covers ±4σ and its tails carry
/// negligible weight.
pub fn gaussian_kernel(radius: u32) -> Vec<f32> {
    if radius == 0 {
        return vec![1.0];
    }
    let sigma = radius as f32 / 4.0;
    let denominator = 2.0 * sigma * sigma;
    let r = radius as i64;
    let raw: Vec<f32> = (-r..=r)
        .map(|i| (-((i * i) as f32) / denominator).exp())
        .collect();
    let sum: f32 = raw.iter().sum();
    raw.into_iter().map(|w| w / sum).collect()
}

/// Separable Gaussian blur with clamped borders, horizontal pass first
///
/// The radius is capped at the longer side of `mask`; a wider kernel would
/// only resample the clamped edge.
pub fn gaussian_smooth(mask: &Image<Luma<f32>>, radius: u32) -> Image<Luma<f32>> {
    let (width, height) = mask.dimensions();
    let radius = radius.min(width.max(height));
    if radius == 0 {
        return mask.clone();
    }
    let kernel = gaussian_kernel(radius);
    let r = i64::from(radius);
    let clamp_index = |i: i64, len: u32| i.clamp(0, i64::from(len) - 1) as u32;

    let horizontal = Image::from_fn(width, height, |x, y| {
        let value: f32 = kernel
            .iter()
            .enumerate()
            .map(|(k, w)| {
                let sx = clamp_index(i64::from(x) + k as i64 - r, width);
                w * mask.get_pixel(sx, y)[0]
            })
            .sum();
        Luma([value])
    });

    Image::from_fn(width, height, |x, y| {
        let value: f32 = kernel
            .iter()
            .enumerate()
            .map(|(k, w)| {
                let sy = clamp_index(i64::from(y) + k as i64 - r, height);
                w * horizontal.get_pixel(x, sy)[0]
            })
            .sum();
        Luma([value.clamp(0.0, 1.0)])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageBuffer;

    #[test]
    fn kernel_is_normalized_and_symmetric() {
        for radius in 1..6 {
            let kernel = gaussian_kernel(radius);
            assert_eq!(kernel.len(), 2 * radius as usize + 1);
            assert!((kernel.iter().sum::<f32>() - 1.0).abs() < 1e-6);
            for i in 0..kernel.len() / 2 {
                assert_eq!(kernel[i], kernel[kernel.len() - 1 - i]);
            }
            assert!(kernel[radius as usize] > kernel[0]);
        }
        assert_eq!(gaussian_kernel(0), vec![1.0]);
    }

    #[test]
    fn constant_mask_is_unchanged() {
        let mask = ImageBuffer::from_pixel(9, 6, Luma([0.75f32]));
        let smoothed = gaussian_smooth(&mask, 2);
        assert!(smoothed.pixels().all(|p| (p[0] - 0.75).abs() < 1e-5));
    }

    #[test]
    fn step_edge_is_softened_within_range() {
        let mask = ImageBuffer::from_fn(10, 3, |x, _| Luma([if x < 5 { 0.0f32 } else { 1.0 }]));
        let smoothed = gaussian_smooth(&mask, 2);
        let left = smoothed.get_pixel(4, 1)[0];
        let right = smoothed.get_pixel(5, 1)[0];
        assert!(left > 0.0 && left < 0.5);
        assert!(right > 0.5 && right < 1.0);
        assert!((left + right - 1.0).abs() < 1e-5);
        assert!(smoothed.pixels().all(|p| (0.0..=1.0).contains(&p[0])));
    }

    #[test]
    fn zero_radius_is_identity() {
        let mask = ImageBuffer::from_fn(3, 3, |x, y| Luma([(x + y) as f32 / 4.0]));
        assert_eq!(gaussian_smooth(&mask, 0), mask);
    }

    #[test]
    fn oversized_radius_is_capped_to_the_mask() {
        let mask = ImageBuffer::from_fn(8, 8, |x, _| Luma([if x < 4 { 0.0f32 } else { 1.0 }]));
        let smoothed = gaussian_smooth(&mask, u32::MAX);
        assert_eq!(smoothed, gaussian_smooth(&mask, 8));
        assert!(smoothed.pixels().all(|p| (0.0..=1.0).contains(&p[0])));

        let empty: Image<Luma<f32>> = Image::new(0, 0);
        assert_eq!(gaussian_smooth(&empty, 2).dimensions(), (0, 0));
    }
}
