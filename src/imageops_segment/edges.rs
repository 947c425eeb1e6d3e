use image::{Luma, Rgb};
use imageproc::definitions::Image;
use imageproc::map::map_colors;
use itertools::iproduct;

/// Horizontal Sobel kernel, row-major
const SOBEL_X: [f32; 9] = [-1.0, 0.0, 1.0, -2.0, 0.0, 2.0, -1.0, 0.0, 1.0];
/// Vertical Sobel kernel, row-major
const SOBEL_Y: [f32; 9] = [-1.0, -2.0, -1.0, 0.0, 0.0, 0.0, 1.0, 2.0, 1.0];

/// Luma of an 8-bit RGB pixel normalized to `[0, 1]`
#[inline]
pub fn luma(pixel: Rgb<u8>) -> f32 {
    let Rgb([r, g, b]) = pixel;
    (0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b)) / 255.0
}

/// Convert the working buffer to a normalized grayscale map
pub fn to_grayscale(image: &Image<Rgb<u8>>) -> Image<Luma<f32>> {
    map_colors(image, |pixel| Luma([luma(pixel)]))
}

/// Sobel gradient magnitude normalized by its own maximum
///
/// The outermost rows and columns stay 0. A map without any gradient is
/// returned as all zeros.
pub fn sobel_edges(gray: &Image<Luma<f32>>) -> Image<Luma<f32>> {
    let (width, height) = gray.dimensions();
    let mut edges: Image<Luma<f32>> = Image::new(width, height);
    if width < 3 || height < 3 {
        return edges;
    }

    let mut max_magnitude = 0.0f32;
    for (y, x) in iproduct!(1..height - 1, 1..width - 1) {
        let mut gx = 0.0f32;
        let mut gy = 0.0f32;
        for (k, (ky, kx)) in iproduct!(0..3u32, 0..3u32).enumerate() {
            let value = gray.get_pixel(x + kx - 1, y + ky - 1)[0];
            gx += SOBEL_X[k] * value;
            gy += SOBEL_Y[k] * value;
        }
        let magnitude = gx.hypot(gy);
        max_magnitude = max_magnitude.max(magnitude);
        edges.put_pixel(x, y, Luma([magnitude]));
    }

    if max_magnitude > 0.0 {
        for value in edges.iter_mut() {
            *value /= max_magnitude;
        }
    }
    edges
}
