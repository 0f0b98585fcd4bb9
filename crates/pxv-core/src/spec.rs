//! Pixel-set dimensions and storage description.
//!
//! [`PixelsDims`] is the 5D shape a remote pixel store declares for a pixel
//! set: spatial extents, focal depth, channel count, and timepoints.
//! [`PixelsSpec`] pairs the shape with the storage [`PixelKind`], which is
//! everything needed to size buffers and validate plane addresses before
//! any bytes move.
//!
//! # Usage
//!
//! ```rust
//! use pxv_core::{PixelKind, PixelsDims, PixelsSpec};
//!
//! let spec = PixelsSpec::new(
//!     PixelsDims::new(512, 512, 30, 3, 10),
//!     PixelKind::UInt16,
//! );
//! assert_eq!(spec.plane_size(), 512 * 512 * 2);
//! assert!(spec.dims().check_plane(29, 2, 9).is_ok());
//! assert!(spec.dims().check_plane(30, 0, 0).is_err());
//! ```
//!
//! # Used By
//!
//! - `pxv-fetch` - Fail-fast bounds checks before issuing fetches, stack
//!   stream sizing

use crate::error::{Error, Result};
use crate::pixel::PixelKind;

/// Declared extents of a 5-dimensional pixel set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PixelsDims {
    /// Pixels per row.
    pub size_x: u32,
    /// Rows per plane.
    pub size_y: u32,
    /// Focal planes per stack.
    pub size_z: u32,
    /// Channels (wavelengths).
    pub size_c: u32,
    /// Timepoints.
    pub size_t: u32,
}

impl PixelsDims {
    /// Creates a dimension set.
    pub fn new(size_x: u32, size_y: u32, size_z: u32, size_c: u32, size_t: u32) -> Self {
        Self {
            size_x,
            size_y,
            size_z,
            size_c,
            size_t,
        }
    }

    /// Validates a (z, c, t) plane address against the declared extents.
    ///
    /// Fails with the first violated axis so the caller's error names the
    /// offending index. Intended to run on the requesting thread, before
    /// any background work is issued.
    pub fn check_plane(&self, z: u32, c: u32, t: u32) -> Result<()> {
        if z >= self.size_z {
            return Err(Error::index_out_of_bounds("z", z, self.size_z));
        }
        if c >= self.size_c {
            return Err(Error::index_out_of_bounds("c", c, self.size_c));
        }
        if t >= self.size_t {
            return Err(Error::index_out_of_bounds("t", t, self.size_t));
        }
        Ok(())
    }

    /// Pixels per plane.
    #[inline]
    pub fn plane_pixels(&self) -> usize {
        self.size_x as usize * self.size_y as usize
    }

    /// Planes per pixel set (z * c * t).
    #[inline]
    pub fn plane_count(&self) -> usize {
        self.size_z as usize * self.size_c as usize * self.size_t as usize
    }
}

/// Dimensions plus storage kind: the full description of a pixel set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PixelsSpec {
    dims: PixelsDims,
    kind: PixelKind,
}

impl PixelsSpec {
    /// Creates a spec from dimensions and storage kind.
    pub fn new(dims: PixelsDims, kind: PixelKind) -> Self {
        Self { dims, kind }
    }

    /// The declared extents.
    #[inline]
    pub fn dims(&self) -> &PixelsDims {
        &self.dims
    }

    /// The storage kind.
    #[inline]
    pub fn kind(&self) -> PixelKind {
        self.kind
    }

    /// Bytes per plane.
    #[inline]
    pub fn plane_size(&self) -> usize {
        self.dims.plane_pixels() * self.kind.byte_width()
    }

    /// Bytes per single-channel z-stack.
    #[inline]
    pub fn stack_size(&self) -> usize {
        self.plane_size() * self.dims.size_z as usize
    }

    /// Bytes in the whole pixel set.
    #[inline]
    pub fn total_size(&self) -> usize {
        self.stack_size() * self.dims.size_c as usize * self.dims.size_t as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> PixelsSpec {
        PixelsSpec::new(PixelsDims::new(64, 32, 5, 3, 2), PixelKind::UInt16)
    }

    #[test]
    fn test_check_plane_in_bounds() {
        let s = spec();
        assert!(s.dims().check_plane(0, 0, 0).is_ok());
        assert!(s.dims().check_plane(4, 2, 1).is_ok());
    }

    #[test]
    fn test_check_plane_names_axis() {
        let s = spec();
        let err = s.dims().check_plane(5, 0, 0).unwrap_err();
        assert!(err.to_string().starts_with("z"));
        let err = s.dims().check_plane(0, 3, 0).unwrap_err();
        assert!(err.to_string().starts_with("c"));
        let err = s.dims().check_plane(0, 0, 2).unwrap_err();
        assert!(err.to_string().starts_with("t"));
    }

    #[test]
    fn test_sizes() {
        let s = spec();
        assert_eq!(s.plane_size(), 64 * 32 * 2);
        assert_eq!(s.stack_size(), 64 * 32 * 2 * 5);
        assert_eq!(s.total_size(), 64 * 32 * 2 * 5 * 3 * 2);
        assert_eq!(s.dims().plane_count(), 5 * 3 * 2);
    }
}
