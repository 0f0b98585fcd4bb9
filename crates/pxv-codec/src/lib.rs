//! # pxv-codec
//!
//! Byte decoding for the pixelview rendering pipeline.
//!
//! Plane buffers arrive from the pixel store as big-endian byte runs. This
//! crate turns them into addressable numeric matrices:
//!
//! - [`PixelDecoder`] - Per-kind sample decoding (and the symmetric
//!   encoding used by synthetic planes and tests)
//! - [`Plane2D`] - A plane buffer decoded eagerly into a `width x height`
//!   `f64` matrix, with min/max and histogram statistics
//!
//! # Usage
//!
//! ```rust
//! use pxv_codec::{PixelDecoder, Plane2D};
//! use pxv_core::PixelKind;
//!
//! let decoder = PixelDecoder::new(PixelKind::UInt16).unwrap();
//! let bytes = vec![0x00, 0x0A, 0x00, 0x14]; // 10, 20
//! let plane = Plane2D::new(2, 1, bytes, &decoder).unwrap();
//! assert_eq!(plane.pixel_value(1, 0), 20.0);
//! ```
//!
//! # Dependencies
//!
//! - [`pxv-core`] - Pixel kinds and errors
//! - [`byteorder`] - Endianness-explicit reads and writes
//! - [`rayon`] - Parallel eager decode
//!
//! # Used By
//!
//! - `pxv-quantum` consumers - Quantization of decoded values
//! - The display layer - Pixel probing and histogram buckets

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod decode;
pub mod plane2d;

pub use decode::PixelDecoder;
pub use plane2d::Plane2D;
