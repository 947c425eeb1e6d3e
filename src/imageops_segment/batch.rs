//! Background removal over many independent images.
//!
//! Each image owns its buffers, so images can be processed concurrently.
//! With the `rayon` feature enabled, work runs on a dedicated thread pool
//! bounded by [`BatchOptions::max_parallel`]; otherwise images are processed
//! one after another on the calling thread.

use std::num::NonZeroUsize;

use image::Rgba;
use imageproc::definitions::Image;
use log::debug;

use super::pipeline::BackgroundRemover;
use crate::cancel::CancellationToken;
use crate::config::SegmentationConfig;
use crate::error::SegmentationError;

/// Options for [`remove_background_batch`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchOptions {
    /// Upper bound on images processed at once; `None` uses one worker per core
    ///
    /// Ignored without the `rayon` feature.
    pub max_parallel: Option<NonZeroUsize>,
}

/// Result for one image of a batch, tagged with the caller's key
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome<K> {
    /// Key supplied with the input image
    pub key: K,
    /// Cutout image or the error that stopped this image
    pub result: Result<Image<Rgba<u8>>, SegmentationError>,
}

/// Remove the background of every image in `items`
///
/// Outcomes carry the key they were submitted with; callers should match on
/// the key rather than on position. A failure of one image does not affect
/// the others. Cancelling `token` makes every image not yet finished fail
/// with `SegmentationError::Cancelled`.
///
/// # Errors
///
/// * `SegmentationError::InvalidParameter` - when `config` is invalid
/// * `SegmentationError::Processing` - when the worker pool cannot be built
pub fn remove_background_batch<K>(
    items: Vec<(K, Image<Rgba<u8>>)>,
    config: &SegmentationConfig,
    options: &BatchOptions,
    token: &CancellationToken,
) -> Result<Vec<BatchOutcome<K>>, SegmentationError>
where
    K: Send,
{
    let remover = BackgroundRemover::new(config.clone())?;
    debug!("batch of {} images", items.len());
    run_batch(&remover, items, options, token)
}

#[cfg(feature = "rayon")]
fn run_batch<K>(
    remover: &BackgroundRemover,
    items: Vec<(K, Image<Rgba<u8>>)>,
    options: &BatchOptions,
    token: &CancellationToken,
) -> Result<Vec<BatchOutcome<K>>, SegmentationError>
where
    K: Send,
{
    use rayon::prelude::*;

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(limit) = options.max_parallel {
        builder = builder.num_threads(limit.get());
    }
    let pool = builder
        .build()
        .map_err(|err| SegmentationError::Processing(format!("thread pool: {err}")))?;

    Ok(pool.install(|| {
        items
            .into_par_iter()
            .map(|(key, mut image)| {
                let result = remover
                    .remove_background_mut(&mut image, token)
                    .map(|()| image);
                BatchOutcome { key, result }
            })
            .collect()
    }))
}

#[cfg(not(feature = "rayon"))]
fn run_batch<K>(
    remover: &BackgroundRemover,
    items: Vec<(K, Image<Rgba<u8>>)>,
    _options: &BatchOptions,
    token: &CancellationToken,
) -> Result<Vec<BatchOutcome<K>>, SegmentationError>
where
    K: Send,
{
    Ok(items
        .into_iter()
        .map(|(key, mut image)| {
            let result = remover
                .remove_background_mut(&mut image, token)
                .map(|()| image);
            BatchOutcome { key, result }
        })
        .collect())
}
