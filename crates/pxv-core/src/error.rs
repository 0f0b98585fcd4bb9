//! Error types for pxv-core operations.
//!
//! This module provides the shared error type for the lower layers of the
//! rendering pipeline: pixel-kind resolution, byte-buffer decoding, and
//! dimensional bounds checking.
//!
//! # Overview
//!
//! The [`Error`] enum covers the failure modes of:
//! - Pixel kind selection (unsupported or unknown kinds)
//! - Plane addressing against declared dimensions
//! - Byte buffer validation during decode
//!
//! # Usage
//!
//! ```rust
//! use pxv_core::{Error, Result};
//!
//! fn check_plane_index(z: u32, size_z: u32) -> Result<()> {
//!     if z >= size_z {
//!         return Err(Error::index_out_of_bounds("z", z, size_z));
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Dependencies
//!
//! - [`thiserror`] - For derive macro error implementation
//!
//! # Used By
//!
//! - [`crate::spec::PixelsDims`] - Plane bounds checking
//! - `pxv-codec` - Decoder construction and buffer validation
//! - `pxv-fetch` - Fail-fast checks before issuing fetches

use crate::pixel::PixelKind;
use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the core types of the rendering pipeline.
///
/// This enum uses [`thiserror`] for automatic [`std::error::Error`] and
/// [`std::fmt::Display`] implementations.
///
/// # Categories
///
/// - **Kind errors**: [`UnsupportedKind`](Error::UnsupportedKind),
///   [`UnknownKind`](Error::UnknownKind)
/// - **Range errors**: [`IndexOutOfBounds`](Error::IndexOutOfBounds)
/// - **Buffer errors**: [`BufferSize`](Error::BufferSize)
#[derive(Debug, Error)]
pub enum Error {
    /// The pixel kind is not supported by the requested operation.
    ///
    /// Returned when an operation (decoding, quantization) is asked to
    /// handle a pixel kind it cannot represent, e.g. [`PixelKind::Bit`].
    #[error("pixel kind {kind} is not supported for {operation}")]
    UnsupportedKind {
        /// The offending pixel kind
        kind: PixelKind,
        /// Short description of the rejected operation
        operation: &'static str,
    },

    /// A pixel-kind name received from a collaborator did not resolve.
    ///
    /// The wire names are the lowercase forms listed in
    /// [`PixelKind::from_str`](std::str::FromStr): `"int8"`, `"uint16"`,
    /// `"float"`, `"double"`, and so on.
    #[error("unknown pixel kind name: {name:?}")]
    UnknownKind {
        /// The unresolvable name
        name: String,
    },

    /// An index along one axis is outside the declared dimension.
    ///
    /// Returned by plane bounds checks before a fetch is issued, so the
    /// failure surfaces on the caller's thread rather than inside a worker.
    #[error("{axis} index {index} out of bounds for size {count}")]
    IndexOutOfBounds {
        /// Axis name ("z", "c", "t", "x", "y")
        axis: &'static str,
        /// The rejected index
        index: u32,
        /// The declared size along the axis
        count: u32,
    },

    /// A byte buffer does not match the size implied by its geometry.
    ///
    /// Returned when a plane buffer is shorter or longer than
    /// `width * height * byte_width`, or when a decode offset would run
    /// past the end of the buffer.
    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSize {
        /// Expected byte count
        expected: usize,
        /// Actual byte count
        actual: usize,
    },
}

impl Error {
    /// Creates an [`Error::UnsupportedKind`] error.
    #[inline]
    pub fn unsupported_kind(kind: PixelKind, operation: &'static str) -> Self {
        Self::UnsupportedKind { kind, operation }
    }

    /// Creates an [`Error::UnknownKind`] error.
    #[inline]
    pub fn unknown_kind(name: impl Into<String>) -> Self {
        Self::UnknownKind { name: name.into() }
    }

    /// Creates an [`Error::IndexOutOfBounds`] error.
    #[inline]
    pub fn index_out_of_bounds(axis: &'static str, index: u32, count: u32) -> Self {
        Self::IndexOutOfBounds { axis, index, count }
    }

    /// Creates an [`Error::BufferSize`] error.
    #[inline]
    pub fn buffer_size(expected: usize, actual: usize) -> Self {
        Self::BufferSize { expected, actual }
    }

    /// Returns `true` if this is a kind-resolution error.
    #[inline]
    pub fn is_kind_error(&self) -> bool {
        matches!(self, Self::UnsupportedKind { .. } | Self::UnknownKind { .. })
    }

    /// Returns `true` if this is a range error.
    #[inline]
    pub fn is_range_error(&self) -> bool {
        matches!(self, Self::IndexOutOfBounds { .. } | Self::BufferSize { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_out_of_bounds() {
        let err = Error::index_out_of_bounds("z", 12, 10);
        let msg = err.to_string();
        assert!(msg.contains("z"));
        assert!(msg.contains("12"));
        assert!(msg.contains("10"));
        assert!(err.is_range_error());
    }

    #[test]
    fn test_unsupported_kind() {
        let err = Error::unsupported_kind(PixelKind::Bit, "decoding");
        assert!(err.to_string().contains("decoding"));
        assert!(err.is_kind_error());
    }

    #[test]
    fn test_buffer_size() {
        let err = Error::buffer_size(1024, 512);
        assert!(err.to_string().contains("1024"));
        assert!(err.to_string().contains("512"));
        assert!(err.is_range_error());
    }
}
