//! # imageops-segment
//!
//! Model-free foreground/background segmentation for background removal.
//!
//! Given a decoded RGBA image, the engine estimates which pixels belong to the
//! foreground and writes a soft matte into the alpha channel. No trained model
//! is involved: the matte is built from classical cues.
//!
//! - **Border color model**: background statistics sampled from the image border
//! - **Color clustering**: deterministic k-means seeded at the corners and center
//! - **Probability fusion**: color distance, cluster identity, a center prior and Sobel edges
//! - **Background flood fill**: region growing inward from the border
//! - **Mask refinement**: soft threshold, morphological closing and Gaussian smoothing
//! - **Compositing**: bilinear upscaling of the working-resolution matte into the alpha channel
//!
//! The computation is deterministic: the same image and configuration always
//! produce byte-identical output. Color channels are never modified.
//!
//! ## Example Usage
//!
//! ```no_run
//! use imageops_segment::{BackgroundRemover, CancellationToken, RemoveBackgroundExt, SegmentationConfig};
//! use imageproc::definitions::Image;
//! use image::Rgba;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // One-off removal with the default parameters
//! let image: Image<Rgba<u8>> = Image::new(640, 480);
//! let cutout = image.remove_background(&SegmentationConfig::default())?;
//!
//! // Reusable remover with cancellation support
//! let remover = BackgroundRemover::new(SegmentationConfig {
//!     max_working_dim: 256,
//!     ..Default::default()
//! })?;
//! let token = CancellationToken::new();
//! let matte = remover.matte(&cutout, &token)?;
//! println!("background threshold {}", matte.background_threshold);
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - `rayon`: Processes batches of images in parallel
//! - `serde`: Enables serialization of the configuration types

mod cancel;
mod config;
mod error;
mod imageops_segment;
mod utils;

#[cfg(test)]
mod test_utils;

pub use cancel::CancellationToken;
pub use config::{FusionWeights, MaskBand, SegmentationConfig, MAX_CLUSTERS};
pub use error::{AlphaMaskError, ErrorKind, InterAreaError, SegmentationError};
pub use imageops_segment::alpha::ModifyAlphaExt;
pub use imageops_segment::batch::{remove_background_batch, BatchOptions, BatchOutcome};
pub use imageops_segment::inter_area::{InterAreaResize, AreaWeight};
pub use imageops_segment::pipeline::{
    remove_background_dynamic, rgba_from_raw, BackgroundRemover, ForegroundMatte,
    RemoveBackgroundExt,
};

/// Individual pipeline stages, for callers assembling their own pipeline
pub mod stages {
    pub use crate::imageops_segment::border_model::{
        band_width, estimate_border_model, BorderColorModel,
    };
    pub use crate::imageops_segment::composite::{
        composite, composite_mut, sample_bilinear, upscale_alpha,
    };
    pub use crate::imageops_segment::downscale::{downscale, working_dimensions, WorkingImage};
    pub use crate::imageops_segment::edges::{luma, sobel_edges, to_grayscale};
    pub use crate::imageops_segment::flood_fill::{flood_fill_background, FloodFillParams};
    pub use crate::imageops_segment::kmeans::{
        cluster_colors, seed_positions, ClusterSet, SEED_POSITIONS,
    };
    pub use crate::imageops_segment::morphology::{close, dilate, erode, threshold_mask};
    pub use crate::imageops_segment::probability::{foreground_probability, spatial_prior};
    pub use crate::imageops_segment::smoothing::{gaussian_kernel, gaussian_smooth};
}

// Re-export imageproc::definitions::Image for convenience
pub use imageproc::definitions::Image;
