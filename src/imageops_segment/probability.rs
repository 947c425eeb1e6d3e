use image::{Luma, Rgb};
use imageproc::definitions::Image;

use super::border_model::BorderColorModel;
use super::kmeans::ClusterSet;
use crate::config::FusionWeights;
use crate::utils::{color_distance, rgb_to_f32};

/// Distance from the center, in half-extents, at which the spatial prior reaches 0
const SPATIAL_FALLOFF: f32 = 1.3;

/// Radial prior favoring the image center, 1 at the center and 0 near the corners
#[inline]
pub fn spatial_prior(x: u32, y: u32, width: u32, height: u32) -> f32 {
    let nx = (x as f32 / width as f32 - 0.5) * 2.0;
    let ny = (y as f32 / height as f32 - 0.5) * 2.0;
    1.0 - (nx.hypot(ny) / SPATIAL_FALLOFF).min(1.0)
}

/// Background-likeness of a cluster mapped onto `[0, 1]`
#[inline]
fn cluster_score(background_distance: f32, threshold: f32) -> f32 {
    if background_distance > threshold {
        1.0
    } else {
        background_distance / threshold
    }
}

/// Fuse color, cluster, spatial and edge cues into a foreground probability map
///
/// `image`, `clusters` and `edges` must share the same dimensions.
pub fn foreground_probability(
    image: &Image<Rgb<u8>>,
    model: &BorderColorModel,
    clusters: &ClusterSet,
    edges: &Image<Luma<f32>>,
    weights: &FusionWeights,
) -> Image<Luma<f32>> {
    let (width, height) = image.dimensions();
    let threshold = model.threshold();
    let cluster_scores: Vec<f32> = clusters
        .background_distances(model.mean)
        .into_iter()
        .map(|distance| cluster_score(distance, threshold))
        .collect();

    Image::from_fn(width, height, |x, y| {
        let pixel = rgb_to_f32(image.get_pixel(x, y));
        let color = (color_distance(pixel, model.mean) / (threshold * 2.0)).min(1.0);
        let cluster = cluster_scores[usize::from(clusters.label(x, y))];
        let spatial = spatial_prior(x, y, width, height);
        let edge = edges.get_pixel(x, y)[0];

        let probability = weights.color * color
            + weights.cluster * cluster
            + weights.spatial * spatial
            + weights.edge * edge;
        Luma([probability.clamp(0.0, 1.0)])
    })
}
