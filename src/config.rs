//! Tunable parameters of the segmentation pipeline.
//!
//! The defaults suit a single object on a plain, roughly uniform background.
//! Every field is checked by [`SegmentationConfig::validate`] before a
//! remover is built.

use crate::error::SegmentationError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Upper bound on the cluster count, so labels fit in a `u8`
pub const MAX_CLUSTERS: usize = 32;

/// Weights used to fuse the per-pixel foreground cues
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FusionWeights {
    /// Distance from the border background color
    pub color: f32,
    /// Background-likeness of the pixel's color cluster
    pub cluster: f32,
    /// Radial prior centered on the image
    pub spatial: f32,
    /// Normalized Sobel magnitude
    pub edge: f32,
}

impl FusionWeights {
    /// Sum of all weights
    #[inline]
    pub fn total(&self) -> f32 {
        self.color + self.cluster + self.spatial + self.edge
    }
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self {
            color: 0.45,
            cluster: 0.25,
            spatial: 0.20,
            edge: 0.10,
        }
    }
}

/// Probability band mapped linearly onto alpha `0..=1`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MaskBand {
    /// At or below this probability alpha is 0
    pub low: f32,
    /// Above this probability alpha is 1
    pub high: f32,
}

impl Default for MaskBand {
    fn default() -> Self {
        Self {
            low: 0.2,
            high: 0.4,
        }
    }
}

/// Parameters for [`BackgroundRemover`](crate::BackgroundRemover)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SegmentationConfig {
    /// Longest side of the working buffer
    pub max_working_dim: u32,
    /// Number of k-means clusters
    pub clusters: usize,
    /// Number of Lloyd iterations
    pub cluster_iterations: usize,
    /// Stop clustering once no centroid moves
    pub cluster_early_exit: bool,
    /// Fusion weights of the probability map
    pub weights: FusionWeights,
    /// Border pixels below this probability seed the flood fill
    pub flood_seed_threshold: f32,
    /// Fraction of the background threshold two neighbors may differ by
    pub flood_color_tolerance: f32,
    /// Pixels at or above this probability stop the flood fill
    pub flood_absorb_ceiling: f32,
    /// Probability ceiling assigned to flooded pixels
    pub background_probability: f32,
    /// Threshold ramp of the mask refiner
    pub mask_band: MaskBand,
    /// Radius of the square closing element, at most `max_working_dim`
    pub morphology_radius: u32,
    /// Radius of the Gaussian smoothing kernel, at most `max_working_dim`
    pub blur_radius: u32,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            max_working_dim: 512,
            clusters: 5,
            cluster_iterations: 12,
            cluster_early_exit: false,
            weights: FusionWeights::default(),
            flood_seed_threshold: 0.35,
            flood_color_tolerance: 0.8,
            flood_absorb_ceiling: 0.5,
            background_probability: 0.1,
            mask_band: MaskBand::default(),
            morphology_radius: 2,
            blur_radius: 2,
        }
    }
}

impl SegmentationConfig {
    /// Checks every parameter against its valid range
    ///
    /// # Errors
    ///
    /// * `SegmentationError::InvalidParameter` - naming the first offending field
    pub fn validate(&self) -> Result<(), SegmentationError> {
        if self.max_working_dim == 0 {
            return Err(invalid("max_working_dim must be at least 1"));
        }
        if self.clusters == 0 || self.clusters > MAX_CLUSTERS {
            return Err(invalid(format!(
                "clusters must be in 1..={MAX_CLUSTERS}, got {}",
                self.clusters
            )));
        }
        if self.cluster_iterations == 0 {
            return Err(invalid("cluster_iterations must be at least 1"));
        }

        let w = &self.weights;
        for (name, value) in [
            ("weights.color", w.color),
            ("weights.cluster", w.cluster),
            ("weights.spatial", w.spatial),
            ("weights.edge", w.edge),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        if w.total() > 1.0 + 1e-4 {
            return Err(invalid(format!(
                "fusion weights must sum to at most 1, got {}",
                w.total()
            )));
        }

        for (name, value) in [
            ("flood_seed_threshold", self.flood_seed_threshold),
            ("flood_absorb_ceiling", self.flood_absorb_ceiling),
            ("background_probability", self.background_probability),
            ("mask_band.low", self.mask_band.low),
            ("mask_band.high", self.mask_band.high),
        ] {
            if !unit_range(value) {
                return Err(invalid(format!("{name} must be in [0, 1], got {value}")));
            }
        }
        if !self.flood_color_tolerance.is_finite() || self.flood_color_tolerance < 0.0 {
            return Err(invalid(format!(
                "flood_color_tolerance must be finite and non-negative, got {}",
                self.flood_color_tolerance
            )));
        }
        if self.mask_band.low >= self.mask_band.high {
            return Err(invalid(format!(
                "mask_band.low ({}) must be below mask_band.high ({})",
                self.mask_band.low, self.mask_band.high
            )));
        }
        for (name, value) in [
            ("morphology_radius", self.morphology_radius),
            ("blur_radius", self.blur_radius),
        ] {
            if value > self.max_working_dim {
                return Err(invalid(format!(
                    "{name} must not exceed max_working_dim ({}), got {value}",
                    self.max_working_dim
                )));
            }
        }

        Ok(())
    }
}

#[inline]
fn unit_range(value: f32) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}

fn invalid(message: impl Into<String>) -> SegmentationError {
    SegmentationError::InvalidParameter(message.into())
}
