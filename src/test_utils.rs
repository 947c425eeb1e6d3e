//! Test utilities for imageops-segment
//!
//! Synthetic images with a known foreground layout. Only compiled for tests.

use image::Rgba;
use imageproc::definitions::Image;

/// Creates a 2x2 RGBA image with predefined pixel values.
///
/// - (0,0): [200, 150, 100, 255] (opaque)
/// - (1,0): [100, 200, 150, 128] (semi-transparent)
/// - (0,1): [150, 100, 200, 64]  (more transparent)
/// - (1,1): [50, 75, 25, 0]      (fully transparent)
pub fn create_test_rgba_image() -> Image<Rgba<u8>> {
    let mut image: Image<Rgba<u8>> = Image::new(2, 2);
    image.put_pixel(0, 0, Rgba([200, 150, 100, 255]));
    image.put_pixel(1, 0, Rgba([100, 200, 150, 128]));
    image.put_pixel(0, 1, Rgba([150, 100, 200, 64]));
    image.put_pixel(1, 1, Rgba([50, 75, 25, 0]));
    image
}

/// Creates an opaque `size` x `size` image: a `frame` pixel wide border of
/// `frame_color` around a square of `inner_color`.
pub fn create_framed_square_image(
    size: u32,
    frame: u32,
    frame_color: [u8; 3],
    inner_color: [u8; 3],
) -> Image<Rgba<u8>> {
    Image::from_fn(size, size, |x, y| {
        let inside = (frame..size - frame).contains(&x) && (frame..size - frame).contains(&y);
        let [r, g, b] = if inside { inner_color } else { frame_color };
        Rgba([r, g, b, 255])
    })
}

/// Creates a `width` x `height` image filled with a single RGBA value.
pub fn create_solid_image(width: u32, height: u32, pixel: [u8; 4]) -> Image<Rgba<u8>> {
    Image::from_pixel(width, height, Rgba(pixel))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_test_rgba_image_with_valid_input_creates_image() {
        let image = create_test_rgba_image();
        assert_eq!(image.dimensions(), (2, 2));
        assert_eq!(image.get_pixel(0, 0), &Rgba([200, 150, 100, 255]));
        assert_eq!(image.get_pixel(1, 1), &Rgba([50, 75, 25, 0]));
    }

    #[test]
    fn create_framed_square_image_places_frame_and_square() {
        let image = create_framed_square_image(8, 2, [255, 255, 255], [0, 0, 0]);
        assert_eq!(image.dimensions(), (8, 8));
        assert_eq!(image.get_pixel(1, 4), &Rgba([255, 255, 255, 255]));
        assert_eq!(image.get_pixel(2, 2), &Rgba([0, 0, 0, 255]));
        assert_eq!(image.get_pixel(5, 5), &Rgba([0, 0, 0, 255]));
        assert_eq!(image.get_pixel(6, 5), &Rgba([255, 255, 255, 255]));
    }
}
