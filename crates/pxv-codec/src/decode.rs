//! Big-endian pixel sample decoding.
//!
//! Remote pixel stores ship plane buffers in network (big-endian) byte
//! order regardless of who produced them. [`PixelDecoder`] turns a byte run
//! at a given offset into a numeric value, returned uniformly as `f64` for
//! the downstream layers (quantization, histograms, statistics).
//!
//! # Decoding rules
//!
//! - Signed/unsigned integers of width 1, 2, or 4: big-endian two's
//!   complement, byte 0 most significant.
//! - `Float32`/`Float64`: the accumulated bit pattern reinterpreted per
//!   IEEE-754.
//!
//! All of this is delegated to [`byteorder::BigEndian`], so results are
//! identical on any host platform.
//!
//! # Usage
//!
//! ```rust
//! use pxv_codec::PixelDecoder;
//! use pxv_core::PixelKind;
//!
//! let decoder = PixelDecoder::new(PixelKind::Int16).unwrap();
//! let bytes = [0xFF, 0xFE]; // -2 in big-endian two's complement
//! assert_eq!(decoder.decode(&bytes, 0).unwrap(), -2.0);
//! ```
//!
//! # Used By
//!
//! - [`crate::plane2d::Plane2D`] - Eager plane decoding
//! - `pxv-tests` - Round-trip verification

use byteorder::{BigEndian, ByteOrder};
use pxv_core::{Error, PixelKind, Result};

/// Decoder for one pixel kind.
///
/// Construction fails for kinds that cannot be decoded ([`PixelKind::Bit`]),
/// so a decoder in hand is always usable — there is no misbehaving-later
/// state.
#[derive(Debug, Clone, Copy)]
pub struct PixelDecoder {
    kind: PixelKind,
    width: usize,
}

impl PixelDecoder {
    /// Creates a decoder for `kind`.
    ///
    /// Fails with [`Error::UnsupportedKind`] for [`PixelKind::Bit`].
    pub fn new(kind: PixelKind) -> Result<Self> {
        if !kind.is_quantizable() {
            return Err(Error::unsupported_kind(kind, "decoding"));
        }
        Ok(Self {
            kind,
            width: kind.byte_width(),
        })
    }

    /// The pixel kind this decoder handles.
    #[inline]
    pub fn kind(&self) -> PixelKind {
        self.kind
    }

    /// Bytes consumed per decoded sample.
    #[inline]
    pub fn byte_width(&self) -> usize {
        self.width
    }

    /// Decodes the sample starting at `offset`.
    ///
    /// Fails with [`Error::BufferSize`] if the byte run
    /// `[offset, offset + byte_width)` does not fit in `data`.
    pub fn decode(&self, data: &[u8], offset: usize) -> Result<f64> {
        let end = offset
            .checked_add(self.width)
            .ok_or_else(|| Error::buffer_size(usize::MAX, data.len()))?;
        if end > data.len() {
            return Err(Error::buffer_size(end, data.len()));
        }
        let run = &data[offset..end];
        let value = match self.kind {
            PixelKind::Int8 => run[0] as i8 as f64,
            PixelKind::UInt8 => run[0] as f64,
            PixelKind::Int16 => BigEndian::read_i16(run) as f64,
            PixelKind::UInt16 => BigEndian::read_u16(run) as f64,
            PixelKind::Int32 => BigEndian::read_i32(run) as f64,
            PixelKind::UInt32 => BigEndian::read_u32(run) as f64,
            PixelKind::Float32 => BigEndian::read_f32(run) as f64,
            PixelKind::Float64 => BigEndian::read_f64(run),
            // Rejected at construction.
            PixelKind::Bit => unreachable!("Bit decoder cannot be constructed"),
        };
        Ok(value)
    }

    /// Encodes `value` as the big-endian byte run starting at `offset`.
    ///
    /// The symmetric counterpart of [`decode`](Self::decode); integer kinds
    /// truncate toward zero and saturate at the kind's bounds. Fails with
    /// [`Error::BufferSize`] if the run does not fit in `out`.
    pub fn encode(&self, value: f64, out: &mut [u8], offset: usize) -> Result<()> {
        let end = offset
            .checked_add(self.width)
            .ok_or_else(|| Error::buffer_size(usize::MAX, out.len()))?;
        if end > out.len() {
            return Err(Error::buffer_size(end, out.len()));
        }
        let run = &mut out[offset..end];
        match self.kind {
            PixelKind::Int8 => run[0] = value as i8 as u8,
            PixelKind::UInt8 => run[0] = value as u8,
            PixelKind::Int16 => BigEndian::write_i16(run, value as i16),
            PixelKind::UInt16 => BigEndian::write_u16(run, value as u16),
            PixelKind::Int32 => BigEndian::write_i32(run, value as i32),
            PixelKind::UInt32 => BigEndian::write_u32(run, value as u32),
            PixelKind::Float32 => BigEndian::write_f32(run, value as f32),
            PixelKind::Float64 => BigEndian::write_f64(run, value),
            PixelKind::Bit => unreachable!("Bit decoder cannot be constructed"),
        }
        Ok(())
    }
}
