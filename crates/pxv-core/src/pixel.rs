//! Pixel kinds and their storage properties.
//!
//! Remote pixel stores declare the numeric type of a pixel set as one of a
//! closed set of kinds. Each kind fixes the byte width, signedness, and
//! float-ness of the raw data, which is everything the decoder and the
//! quantizer need to know about the storage format.
//!
//! # Kinds
//!
//! | Kind | Wire name | Bytes | Signed | Float |
//! |------|-----------|-------|--------|-------|
//! | [`Int8`](PixelKind::Int8) | `int8` | 1 | yes | no |
//! | [`UInt8`](PixelKind::UInt8) | `uint8` | 1 | no | no |
//! | [`Int16`](PixelKind::Int16) | `int16` | 2 | yes | no |
//! | [`UInt16`](PixelKind::UInt16) | `uint16` | 2 | no | no |
//! | [`Int32`](PixelKind::Int32) | `int32` | 4 | yes | no |
//! | [`UInt32`](PixelKind::UInt32) | `uint32` | 4 | no | no |
//! | [`Float32`](PixelKind::Float32) | `float` | 4 | yes | yes |
//! | [`Float64`](PixelKind::Float64) | `double` | 8 | yes | yes |
//! | [`Bit`](PixelKind::Bit) | `bit` | - | no | no |
//!
//! `Bit` planes carry packed binary masks; they are declared but not
//! decodable or quantizable, and every consumer rejects them up front.
//!
//! # Usage
//!
//! ```rust
//! use pxv_core::PixelKind;
//!
//! let kind: PixelKind = "uint16".parse().unwrap();
//! assert_eq!(kind.byte_width(), 2);
//! assert!(!kind.is_signed());
//! assert_eq!(kind.default_range(), Some((0.0, 65535.0)));
//! ```
//!
//! # Used By
//!
//! - `pxv-codec` - Decoder selection and plane geometry
//! - `pxv-quantum` - Quantizability checks and LUT domain defaults

use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// Storage kind of a single pixel sample.
///
/// A closed set: the decoder and quantizer match on this exhaustively, so
/// adding a kind is a compile-time event, not a runtime surprise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PixelKind {
    /// 8-bit signed integer.
    Int8,
    /// 8-bit unsigned integer.
    UInt8,
    /// 16-bit signed integer.
    Int16,
    /// 16-bit unsigned integer.
    UInt16,
    /// 32-bit signed integer.
    Int32,
    /// 32-bit unsigned integer.
    UInt32,
    /// 32-bit IEEE-754 float (wire name `float`).
    Float32,
    /// 64-bit IEEE-754 float (wire name `double`).
    Float64,
    /// Packed binary mask. Declared by stores but neither decodable nor
    /// quantizable here.
    Bit,
}

impl PixelKind {
    /// All declared kinds, in wire order.
    pub const ALL: [PixelKind; 9] = [
        PixelKind::Int8,
        PixelKind::UInt8,
        PixelKind::Int16,
        PixelKind::UInt16,
        PixelKind::Int32,
        PixelKind::UInt32,
        PixelKind::Float32,
        PixelKind::Float64,
        PixelKind::Bit,
    ];

    /// Bytes occupied by one sample of this kind.
    ///
    /// [`Bit`](PixelKind::Bit) reports 0; consumers reject it before any
    /// width arithmetic.
    #[inline]
    pub fn byte_width(&self) -> usize {
        match self {
            PixelKind::Int8 | PixelKind::UInt8 => 1,
            PixelKind::Int16 | PixelKind::UInt16 => 2,
            PixelKind::Int32 | PixelKind::UInt32 | PixelKind::Float32 => 4,
            PixelKind::Float64 => 8,
            PixelKind::Bit => 0,
        }
    }

    /// Returns `true` for signed integer and float kinds.
    #[inline]
    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            PixelKind::Int8
                | PixelKind::Int16
                | PixelKind::Int32
                | PixelKind::Float32
                | PixelKind::Float64
        )
    }

    /// Returns `true` for the IEEE-754 kinds.
    #[inline]
    pub fn is_float(&self) -> bool {
        matches!(self, PixelKind::Float32 | PixelKind::Float64)
    }

    /// Returns `true` if values of this kind can be quantized into a
    /// display codomain.
    #[inline]
    pub fn is_quantizable(&self) -> bool {
        !matches!(self, PixelKind::Bit)
    }

    /// The representable range for integer kinds.
    ///
    /// Float kinds return `None`: their effective range must come from the
    /// data statistics of the pixel set, not from the storage type.
    pub fn default_range(&self) -> Option<(f64, f64)> {
        match self {
            PixelKind::Int8 => Some((i8::MIN as f64, i8::MAX as f64)),
            PixelKind::UInt8 => Some((0.0, u8::MAX as f64)),
            PixelKind::Int16 => Some((i16::MIN as f64, i16::MAX as f64)),
            PixelKind::UInt16 => Some((0.0, u16::MAX as f64)),
            PixelKind::Int32 => Some((i32::MIN as f64, i32::MAX as f64)),
            PixelKind::UInt32 => Some((0.0, u32::MAX as f64)),
            PixelKind::Float32 | PixelKind::Float64 | PixelKind::Bit => None,
        }
    }

    /// The wire name of this kind.
    pub fn name(&self) -> &'static str {
        match self {
            PixelKind::Int8 => "int8",
            PixelKind::UInt8 => "uint8",
            PixelKind::Int16 => "int16",
            PixelKind::UInt16 => "uint16",
            PixelKind::Int32 => "int32",
            PixelKind::UInt32 => "uint32",
            PixelKind::Float32 => "float",
            PixelKind::Float64 => "double",
            PixelKind::Bit => "bit",
        }
    }
}

impl fmt::Display for PixelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PixelKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "int8" => Ok(PixelKind::Int8),
            "uint8" => Ok(PixelKind::UInt8),
            "int16" => Ok(PixelKind::Int16),
            "uint16" => Ok(PixelKind::UInt16),
            "int32" => Ok(PixelKind::Int32),
            "uint32" => Ok(PixelKind::UInt32),
            "float" => Ok(PixelKind::Float32),
            "double" => Ok(PixelKind::Float64),
            "bit" => Ok(PixelKind::Bit),
            other => Err(Error::unknown_kind(other)),
        }
    }
}
