//! Quantization error types.

use pxv_core::PixelKind;
use thiserror::Error;

/// Result type for quantization operations.
pub type QuantumResult<T> = Result<T, QuantumError>;

/// Errors that can occur while configuring or using a quantization
/// strategy.
#[derive(Debug, Error)]
pub enum QuantumError {
    /// Bit resolution is not of the form `2^n - 1` for `n` in 1..=8.
    #[error("invalid bit resolution {0}: expected one of 1, 3, 7, 15, 31, 63, 127, 255")]
    BitResolution(u16),

    /// The pixel kind cannot be quantized.
    #[error("pixel kind {0} cannot be quantized")]
    UnsupportedKind(PixelKind),

    /// Codomain bounds are not strictly increasing.
    #[error("invalid codomain [{start}, {end}]: start must be below end")]
    Codomain {
        /// Lower codomain bound
        start: u8,
        /// Upper codomain bound
        end: u8,
    },

    /// The global domain cannot back a lookup table.
    #[error("invalid quantization domain [{min}, {max}]")]
    Domain {
        /// Global minimum
        min: f64,
        /// Global maximum
        max: f64,
    },

    /// The requested window does not fit inside the global domain.
    #[error("window [{start}, {end}] outside domain [{min}, {max}]")]
    Window {
        /// Requested window start
        start: f64,
        /// Requested window end
        end: f64,
        /// Domain minimum
        min: f64,
        /// Domain maximum
        max: f64,
    },

    /// A value handed to `quantize` lies outside the tabulated domain.
    #[error("value {value} outside quantizable range [{min}, {max}]")]
    ValueOutOfRange {
        /// The rejected value
        value: f64,
        /// Domain minimum
        min: i64,
        /// Domain maximum
        max: i64,
    },
}
