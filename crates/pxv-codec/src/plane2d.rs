//! Eagerly-decoded 2D plane matrices.
//!
//! A [`Plane2D`] wraps the raw byte buffer of one fetched plane together
//! with a fully decoded `f64` matrix. Decoding happens once, at
//! construction; every later read — quantization passes, histogram
//! binning, pointer inspection in the UI — is an O(1) array access. The
//! memory trade is acceptable because planes are bounded in size and read
//! many times.
//!
//! # Usage
//!
//! ```rust
//! use pxv_codec::{PixelDecoder, Plane2D};
//! use pxv_core::PixelKind;
//!
//! let decoder = PixelDecoder::new(PixelKind::UInt8).unwrap();
//! let plane = Plane2D::new(2, 2, vec![10, 20, 30, 40], &decoder).unwrap();
//! assert_eq!(plane.pixel_value(1, 0), 20.0);
//! assert_eq!(plane.pixel_value(0, 1), 30.0);
//! ```

use crate::decode::PixelDecoder;
use pxv_core::{Error, Result};
use rayon::prelude::*;

/// One decoded 2D plane: the raw byte view plus its numeric matrix.
#[derive(Debug, Clone)]
pub struct Plane2D {
    width: u32,
    height: u32,
    byte_width: usize,
    data: Vec<u8>,
    values: Vec<f64>,
}

impl Plane2D {
    /// Decodes a plane buffer into a `width x height` matrix.
    ///
    /// The sample for pixel (x, y) starts at byte offset
    /// `byte_width * (width * y + x)`. Fails with [`Error::BufferSize`]
    /// when the buffer length does not match the plane geometry.
    pub fn new(width: u32, height: u32, data: Vec<u8>, decoder: &PixelDecoder) -> Result<Self> {
        let byte_width = decoder.byte_width();
        let expected = width as usize * height as usize * byte_width;
        if data.len() != expected {
            return Err(Error::buffer_size(expected, data.len()));
        }
        let values = data
            .par_chunks_exact(byte_width)
            .map(|run| decoder.decode(run, 0))
            .collect::<Result<Vec<f64>>>()?;
        Ok(Self {
            width,
            height,
            byte_width,
            data,
            values,
        })
    }

    /// Plane width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Plane height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per pixel in the raw view.
    #[inline]
    pub fn byte_width(&self) -> usize {
        self.byte_width
    }

    /// Decoded value at (x, y). The caller guarantees in-bounds access.
    #[inline]
    pub fn pixel_value(&self, x: u32, y: u32) -> f64 {
        debug_assert!(x < self.width && y < self.height);
        self.values[(y as usize) * (self.width as usize) + x as usize]
    }

    /// Decoded value at (x, y), or `None` when out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<f64> {
        if x < self.width && y < self.height {
            Some(self.pixel_value(x, y))
        } else {
            None
        }
    }

    /// Single raw byte at `offset`, for low-level inspection.
    #[inline]
    pub fn raw_byte(&self, offset: usize) -> Option<u8> {
        self.data.get(offset).copied()
    }

    /// The full decoded matrix, row-major.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Smallest and largest finite values in the plane, or `None` when the
    /// plane is empty or holds no finite value.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        let (min, max) = self
            .values
            .iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if min <= max { Some((min, max)) } else { None }
    }

    /// Bucketed counts of the decoded values over `[min, max]`.
    ///
    /// Values outside the range land in the edge buckets; non-finite
    /// values are skipped. Returns `bins` counts.
    pub fn histogram(&self, bins: usize, min: f64, max: f64) -> Vec<u32> {
        let mut counts = vec![0u32; bins];
        if bins == 0 {
            return counts;
        }
        let span = max - min;
        for &v in &self.values {
            if !v.is_finite() {
                continue;
            }
            let bucket = if span > 0.0 {
                (((v - min) / span) * bins as f64).floor()
            } else {
                0.0
            };
            let bucket = (bucket.max(0.0) as usize).min(bins - 1);
            counts[bucket] += 1;
        }
        counts
    }
}
