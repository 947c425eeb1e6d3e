//! Area-averaging resampler with OpenCV `INTER_AREA` semantics.
//!
//! Every destination pixel is the area-weighted mean of the source pixels its
//! footprint covers, which avoids the aliasing a point sampler produces when
//! shrinking by large factors.

use image::{GenericImageView, ImageBuffer, Pixel, Primitive};
use imageproc::definitions::{Clamp, Image};

use crate::error::InterAreaError;

/// Contribution of one source index to one destination index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaWeight {
    /// Destination index
    pub destination_index: u32,
    /// Source index
    pub source_index: u32,
    /// Fraction of the destination cell covered by the source index
    pub weight: f32,
}

/// Downsampling resizer using `INTER_AREA` interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterAreaResize {
    new_width: u32,
    new_height: u32,
}

impl InterAreaResize {
    /// Create a resizer targeting `new_width` x `new_height`.
    pub const fn new(new_width: u32, new_height: u32) -> Result<Self, InterAreaError> {
        if new_width == 0 || new_height == 0 {
            return Err(InterAreaError::InvalidTargetDimensions {
                width: new_width,
                height: new_height,
            });
        }
        Ok(Self {
            new_width,
            new_height,
        })
    }

    /// Resize `src` to the target dimensions.
    ///
    /// # Errors
    ///
    /// * `InterAreaError::EmptyImage` - when `src` has a zero dimension
    /// * `InterAreaError::UpscalingNotSupported` - when either target side exceeds the source
    pub fn resize<I, P>(&self, src: &I) -> Result<Image<P>, InterAreaError>
    where
        I: GenericImageView<Pixel = P>,
        P: Pixel,
        P::Subpixel: Clamp<f32> + Into<f32> + Primitive,
    {
        let (src_width, src_height) = src.dimensions();
        if src_width == 0 || src_height == 0 {
            return Err(InterAreaError::EmptyImage {
                width: src_width,
                height: src_height,
            });
        }
        if self.new_width > src_width || self.new_height > src_height {
            return Err(InterAreaError::UpscalingNotSupported {
                src_width,
                src_height,
                target_width: self.new_width,
                target_height: self.new_height,
            });
        }

        let x_weights = area_weights(src_width, self.new_width);
        let mut rows_by_source = vec![Vec::new(); src_height as usize];
        for yw in area_weights(src_height, self.new_height) {
            rows_by_source[yw.source_index as usize].push((yw.destination_index, yw.weight));
        }

        let channels = usize::from(P::CHANNEL_COUNT);
        let row_len = self.new_width as usize * channels;
        let mut row = vec![0.0f32; row_len];
        let mut acc = vec![0.0f32; row_len * self.new_height as usize];

        // Horizontal pass per source row, then weighted into its destination rows
        for sy in 0..src_height {
            row.fill(0.0);
            for xw in &x_weights {
                let pixel = src.get_pixel(xw.source_index, sy);
                let base = xw.destination_index as usize * channels;
                for (c, value) in pixel.channels().iter().enumerate() {
                    row[base + c] += Into::<f32>::into(*value) * xw.weight;
                }
            }

            for &(dy, weight) in &rows_by_source[sy as usize] {
                let base = dy as usize * row_len;
                for (dst, value) in acc[base..base + row_len].iter_mut().zip(&row) {
                    *dst += value * weight;
                }
            }
        }

        // Integer subpixels are rounded, float subpixels kept as is
        let max_value: f32 = P::Subpixel::DEFAULT_MAX_VALUE.into();
        let quantize = max_value > 1.0;
        let mut output: Image<P> = ImageBuffer::new(self.new_width, self.new_height);
        for (dst, &value) in output.iter_mut().zip(&acc) {
            *dst = <P::Subpixel as Clamp<f32>>::clamp(if quantize { value.round() } else { value });
        }
        Ok(output)
    }
}

/// Build the weight table mapping `src_size` samples onto `dst_size` cells.
///
/// Weights belonging to one destination index sum to 1.
pub fn area_weights(src_size: u32, dst_size: u32) -> Vec<AreaWeight> {
    let scale = f64::from(src_size) / f64::from(dst_size);
    let mut table = Vec::with_capacity(src_size as usize + dst_size as usize);

    for dx in 0..dst_size {
        let start = f64::from(dx) * scale;
        let end = (start + scale).min(f64::from(src_size));
        let cell = end - start;

        let mut sx = start.floor() as u32;
        while f64::from(sx) < end && sx < src_size {
            let lo = f64::from(sx).max(start);
            let hi = f64::from(sx + 1).min(end);
            let overlap = hi - lo;
            if overlap > 1e-6 {
                table.push(AreaWeight {
                    destination_index: dx,
                    source_index: sx,
                    weight: (overlap / cell) as f32,
                });
            }
            sx += 1;
        }
    }

    table
}
