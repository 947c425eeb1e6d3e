use std::collections::VecDeque;

use image::{Luma, Rgb};
use imageproc::definitions::Image;

use crate::cancel::CancellationToken;
use crate::error::SegmentationError;
use crate::utils::{color_distance, rgb_to_f32};

/// How many dequeued pixels pass between cancellation checks
const CANCEL_CHECK_INTERVAL: usize = 4096;

/// Parameters of the border-seeded background flood fill
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloodFillParams {
    /// Border pixels below this probability seed the fill
    pub seed_threshold: f32,
    /// Maximum color distance between neighbors, already scaled by the background threshold
    pub max_color_step: f32,
    /// Neighbors at or above this probability are never absorbed
    pub absorb_ceiling: f32,
    /// Probability ceiling written into absorbed pixels
    pub background_probability: f32,
}

/// Grow the background inward from the image border
///
/// Border pixels whose probability is below `seed_threshold` seed a FIFO
/// breadth-first search over 4-connected neighbors. A neighbor joins the
/// background when its color is within `max_color_step` of the pixel it was
/// reached from and its probability is below `absorb_ceiling`. Every absorbed
/// pixel, seeds included, has its probability lowered to at most
/// `background_probability`. Each pixel is enqueued at most once.
///
/// Returns the number of absorbed pixels.
///
/// # Errors
///
/// * `SegmentationError::Cancelled` - when `token` is cancelled mid-fill;
///   `probability` may then be partially updated
pub fn flood_fill_background(
    image: &Image<Rgb<u8>>,
    probability: &mut Image<Luma<f32>>,
    params: &FloodFillParams,
    token: &CancellationToken,
) -> Result<usize, SegmentationError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Ok(0);
    }
    let mut visited = vec![false; width as usize * height as usize];
    let mut queue = VecDeque::new();
    let index = |x: u32, y: u32| y as usize * width as usize + x as usize;

    let (right, bottom) = (width.saturating_sub(1), height.saturating_sub(1));
    let border = (0..width)
        .flat_map(|x| [(x, 0), (x, bottom)])
        .chain((1..bottom).flat_map(|y| [(0, y), (right, y)]));
    for (x, y) in border {
        let idx = index(x, y);
        if visited[idx] || probability.get_pixel(x, y)[0] >= params.seed_threshold {
            continue;
        }
        visited[idx] = true;
        absorb(probability, x, y, params.background_probability);
        queue.push_back((x, y));
    }

    let mut absorbed = queue.len();
    let mut processed = 0usize;
    while let Some((x, y)) = queue.pop_front() {
        processed += 1;
        if processed % CANCEL_CHECK_INTERVAL == 0 {
            token.check()?;
        }

        let current = rgb_to_f32(image.get_pixel(x, y));
        for (nx, ny) in neighbors(x, y, width, height) {
            let idx = index(nx, ny);
            if visited[idx] || probability.get_pixel(nx, ny)[0] >= params.absorb_ceiling {
                continue;
            }
            let neighbor = rgb_to_f32(image.get_pixel(nx, ny));
            if color_distance(current, neighbor) >= params.max_color_step {
                continue;
            }
            visited[idx] = true;
            absorb(probability, nx, ny, params.background_probability);
            queue.push_back((nx, ny));
            absorbed += 1;
        }
    }

    Ok(absorbed)
}

#[inline]
fn absorb(probability: &mut Image<Luma<f32>>, x: u32, y: u32, ceiling: f32) {
    let value = &mut probability.get_pixel_mut(x, y)[0];
    *value = value.min(ceiling);
}

/// In-bounds 4-connected neighbors of `(x, y)`
fn neighbors(x: u32, y: u32, width: u32, height: u32) -> impl Iterator<Item = (u32, u32)> {
    let left = x.checked_sub(1).map(|nx| (nx, y));
    let right = (x + 1 < width).then_some((x + 1, y));
    let up = y.checked_sub(1).map(|ny| (x, ny));
    let down = (y + 1 < height).then_some((x, y + 1));
    [left, right, up, down].into_iter().flatten()
}
