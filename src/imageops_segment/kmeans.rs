//! Deterministic k-means clustering of working pixel colors.
//!
//! Seeds come from fixed positions (the four corners, then the center), so two
//! runs on the same image always produce the same clusters. Lloyd iterations
//! run a fixed number of times; an empty cluster keeps its previous centroid.

use image::Rgb;
use imageproc::definitions::Image;
use log::{trace, warn};

use crate::cancel::CancellationToken;
use crate::error::SegmentationError;
use crate::utils::{color_distance, rgb_to_f32, squared_distance, validate_non_empty_image};

/// Number of distinct seed positions available
pub const SEED_POSITIONS: usize = 5;

/// Result of clustering a working image
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSet {
    /// Final centroids, channels in `0..=255`
    pub centroids: Vec<[f32; 3]>,
    labels: Vec<u8>,
    width: u32,
    height: u32,
}

impl ClusterSet {
    /// Cluster label of the pixel at `(x, y)`
    ///
    /// # Panics
    ///
    /// If `(x, y)` is outside the clustered image.
    #[inline]
    pub fn label(&self, x: u32, y: u32) -> u8 {
        assert!(
            x < self.width && y < self.height,
            "label index ({x}, {y}) out of bounds for {}x{}",
            self.width,
            self.height
        );
        self.labels[y as usize * self.width as usize + x as usize]
    }

    /// Labels in row-major order
    #[inline]
    pub fn labels(&self) -> &[u8] {
        &self.labels
    }

    /// Distance of each centroid from the background color
    pub fn background_distances(&self, background: [f32; 3]) -> Vec<f32> {
        self.centroids
            .iter()
            .map(|&centroid| color_distance(centroid, background))
            .collect()
    }
}

/// Seed pixel coordinates in their fixed order
///
/// Only the first [`SEED_POSITIONS`] are distinct; longer requests cycle
/// through the list again.
pub fn seed_positions(width: u32, height: u32, k: usize) -> Vec<(u32, u32)> {
    let right = width.saturating_sub(1);
    let bottom = height.saturating_sub(1);
    let positions = [
        (0, 0),
        (right, 0),
        (0, bottom),
        (right, bottom),
        (width / 2, height / 2),
    ];
    positions.iter().copied().cycle().take(k).collect()
}

/// Cluster the pixels of `image` into `k` color groups
///
/// Runs exactly `iterations` rounds, or fewer when `early_exit` is set and a
/// round leaves every centroid unchanged. `k` must fit a `u8` label.
///
/// # Errors
///
/// * `SegmentationError::EmptyImage` - when `image` has a zero dimension
/// * `SegmentationError::InvalidParameter` - when `k` is 0 or above 256
/// * `SegmentationError::Cancelled` - when `token` is cancelled between rounds
pub fn cluster_colors(
    image: &Image<Rgb<u8>>,
    k: usize,
    iterations: usize,
    early_exit: bool,
    token: &CancellationToken,
) -> Result<ClusterSet, SegmentationError> {
    if k == 0 || k > usize::from(u8::MAX) + 1 {
        return Err(SegmentationError::InvalidParameter(format!(
            "cluster count must be in 1..=256, got {k}"
        )));
    }
    let (width, height) = image.dimensions();
    validate_non_empty_image(width, height)?;
    if k > SEED_POSITIONS {
        warn!("k-means with k={k} reuses seed positions; clusters beyond {SEED_POSITIONS} start duplicated");
    }

    let pixels: Vec<[f32; 3]> = image.pixels().map(rgb_to_f32).collect();
    let mut centroids: Vec<[f32; 3]> = seed_positions(width, height, k)
        .into_iter()
        .map(|(x, y)| rgb_to_f32(image.get_pixel(x, y)))
        .collect();
    let mut labels = vec![0u8; pixels.len()];

    let mut sums = vec![[0.0f64; 3]; k];
    let mut counts = vec![0usize; k];

    for iteration in 0..iterations {
        token.check()?;

        for (label, pixel) in labels.iter_mut().zip(&pixels) {
            *label = nearest_centroid(&centroids, *pixel);
        }

        sums.iter_mut().for_each(|s| *s = [0.0; 3]);
        counts.fill(0);
        for (&label, pixel) in labels.iter().zip(&pixels) {
            let idx = usize::from(label);
            for c in 0..3 {
                sums[idx][c] += f64::from(pixel[c]);
            }
            counts[idx] += 1;
        }

        let mut moved = false;
        for ((centroid, sum), &count) in centroids.iter_mut().zip(&sums).zip(&counts) {
            if count == 0 {
                continue;
            }
            let n = count as f64;
            let updated = [
                (sum[0] / n) as f32,
                (sum[1] / n) as f32,
                (sum[2] / n) as f32,
            ];
            moved |= updated != *centroid;
            *centroid = updated;
        }
        trace!("k-means round {iteration}: counts {counts:?}");

        if early_exit && !moved {
            trace!("k-means converged after {} rounds", iteration + 1);
            break;
        }
    }

    Ok(ClusterSet {
        centroids,
        labels,
        width,
        height,
    })
}

/// Index of the closest centroid; ties resolve to the lowest index
#[inline]
fn nearest_centroid(centroids: &[[f32; 3]], pixel: [f32; 3]) -> u8 {
    let mut best = 0usize;
    let mut best_distance = f32::INFINITY;
    for (idx, &centroid) in centroids.iter().enumerate() {
        let distance = squared_distance(pixel, centroid);
        if distance < best_distance {
            best_distance = distance;
            best = idx;
        }
    }
    best as u8
}
