use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::SegmentationError;

/// Shared flag used to abandon a running segmentation
///
/// Clones share the same flag. The pipeline polls it between stages and
/// inside the clustering and flood fill loops.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a token that is not cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation for every holder of this token
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Returns `Err(SegmentationError::Cancelled)` once cancelled
    #[inline]
    pub fn check(&self) -> Result<(), SegmentationError> {
        if self.is_cancelled() {
            Err(SegmentationError::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let token = CancellationToken::new();
        let other = token.clone();
        assert!(token.check().is_ok());

        other.cancel();
        assert!(token.is_cancelled());
        assert_eq!(token.check(), Err(SegmentationError::Cancelled));
    }
}
