use thiserror::Error;

/// Broad category of a [`SegmentationError`]
///
/// Callers usually only need to know whether an invocation failed because of
/// its input, because the decoder handed over nothing, or because of an
/// internal fault. Retrying only makes sense for the latter two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The image or the configuration is unusable as given
    InvalidInput,
    /// No decoded image was available
    DecodeUnavailable,
    /// An internal stage failed
    Processing,
    /// The caller cancelled the invocation
    Cancelled,
}

/// Error type for the segmentation pipeline
///
/// Every failure is reported before any output pixel is written, so an
/// `Err` never comes with a partially modified image.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SegmentationError {
    /// Image has zero width or height
    #[error("Image dimensions must be non-zero, got {width}x{height}")]
    EmptyImage { width: u32, height: u32 },

    /// Declared dimensions do not match the length of the pixel buffer
    ///
    /// `expected` and `actual` are byte counts.
    #[error("Buffer size mismatch for {width}x{height} RGBA image: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// The external decoder did not provide an image
    #[error("Decoded image is not available")]
    DecodeUnavailable,

    /// A configuration value is outside its valid range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Working-resolution resampling failed
    #[error(transparent)]
    Resize(#[from] InterAreaError),

    /// Writing the alpha channel failed
    #[error(transparent)]
    AlphaMask(#[from] AlphaMaskError),

    /// Any other internal fault
    #[error("Processing failed: {0}")]
    Processing(String),

    /// Cancellation was requested between stages
    #[error("Segmentation was cancelled")]
    Cancelled,
}

impl SegmentationError {
    /// Returns the category this error belongs to
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyImage { .. } | Self::BufferSizeMismatch { .. } | Self::InvalidParameter(_) => {
                ErrorKind::InvalidInput
            }
            Self::DecodeUnavailable => ErrorKind::DecodeUnavailable,
            Self::Resize(_) | Self::AlphaMask(_) | Self::Processing(_) => ErrorKind::Processing,
            Self::Cancelled => ErrorKind::Cancelled,
        }
    }
}

/// Error type for alpha channel replacement
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlphaMaskError {
    /// Image and mask dimensions do not match
    #[error("Image and mask dimensions do not match: expected {expected:?}, actual {actual:?}")]
    DimensionMismatch {
        /// Expected dimensions (width, height)
        expected: (u32, u32),
        /// Actual dimensions (width, height)
        actual: (u32, u32),
    },
}

/// Error type for `INTER_AREA` resampling
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterAreaError {
    /// Target dimensions contain a zero
    #[error("Invalid target dimensions: {width}x{height}")]
    InvalidTargetDimensions { width: u32, height: u32 },

    /// Source image is empty
    #[error("Source image is empty: {width}x{height}")]
    EmptyImage { width: u32, height: u32 },

    /// Area interpolation only reduces resolution
    #[error("Upscaling from {src_width}x{src_height} to {target_width}x{target_height} is not supported")]
    UpscalingNotSupported {
        src_width: u32,
        src_height: u32,
        target_width: u32,
        target_height: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_maps_input_errors() {
        let err = SegmentationError::EmptyImage {
            width: 0,
            height: 4,
        };
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let err = SegmentationError::BufferSizeMismatch {
            width: 2,
            height: 2,
            expected: 16,
            actual: 15,
        };
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(
            SegmentationError::InvalidParameter("clusters".into()).kind(),
            ErrorKind::InvalidInput
        );
    }

    #[test]
    fn kind_maps_internal_errors() {
        let err: SegmentationError = InterAreaError::EmptyImage {
            width: 0,
            height: 0,
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Processing);

        let err: SegmentationError = AlphaMaskError::DimensionMismatch {
            expected: (2, 2),
            actual: (1, 1),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Processing);
        assert_eq!(
            SegmentationError::DecodeUnavailable.kind(),
            ErrorKind::DecodeUnavailable
        );
        assert_eq!(SegmentationError::Cancelled.kind(), ErrorKind::Cancelled);
    }

    #[test]
    fn buffer_mismatch_message_names_byte_counts() {
        let err = SegmentationError::BufferSizeMismatch {
            width: 3,
            height: 1,
            expected: 12,
            actual: 9,
        };
        assert_eq!(
            err.to_string(),
            "Buffer size mismatch for 3x1 RGBA image: expected 12 bytes, got 9"
        );
    }
}
