//! Quantization configuration.
//!
//! A [`QuantumDef`] is the flat value object describing how raw pixel
//! values map to display intensities: which transform family to apply, the
//! discrete resolution of the mapping, the storage kind of the data, and
//! the codomain interval the output is rescaled into. Rendering-settings
//! persistence supplies and receives these as-is; nothing in here owns a
//! file format.
//!
//! # Validation
//!
//! [`QuantumDef::validate`] checks each field in turn and fails on the
//! first violation, so a strategy is never assembled from a half-valid
//! configuration:
//!
//! 1. bit resolution must be `2^n - 1` for `n` in 1..=8;
//! 2. the pixel kind must be quantizable ([`PixelKind::Bit`] is not);
//! 3. the codomain must satisfy `cd_start < cd_end` (the `u8` fields keep
//!    both inside [0, 255] structurally).
//!
//! The transform family is a closed enum, so membership needs no runtime
//! check. The curve coefficient is not validated: the transform maps
//! accept any finite coefficient and clamp degenerate results.

use crate::error::{QuantumError, QuantumResult};
use pxv_core::PixelKind;

/// Transform families selectable for quantization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Family {
    /// Identity ramp (polynomial with exponent fixed to 1).
    Linear,
    /// Power curve `x^k`.
    Polynomial,
    /// Natural logarithm.
    Logarithmic,
    /// Exponential `a * e^(x^k) + b`.
    Exponential,
}

/// The accepted bit resolutions: `2^n - 1` for `n` in 1..=8.
pub const BIT_RESOLUTIONS: [u16; 8] = [1, 3, 7, 15, 31, 63, 127, 255];

/// Maximum depth of the display codomain.
pub const CODOMAIN_MAX: u8 = 255;

/// Configuration describing how raw pixel values map to display
/// intensities.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuantumDef {
    /// Transform family applied inside the window.
    pub family: Family,
    /// Number of output levels minus one; `2^n - 1` for `n` in 1..=8.
    pub bit_resolution: u16,
    /// Storage kind of the pixel data being quantized.
    pub pixel_kind: PixelKind,
    /// Lower codomain bound.
    pub cd_start: u8,
    /// Upper codomain bound.
    pub cd_end: u8,
    /// Curve coefficient `k` handed to the transform family.
    pub curve_coefficient: f64,
}

impl QuantumDef {
    /// Creates a definition from its parts. Call
    /// [`validate`](Self::validate) (or let the factory do it) before
    /// building a strategy from it.
    pub fn new(
        family: Family,
        bit_resolution: u16,
        pixel_kind: PixelKind,
        cd_start: u8,
        cd_end: u8,
        curve_coefficient: f64,
    ) -> Self {
        Self {
            family,
            bit_resolution,
            pixel_kind,
            cd_start,
            cd_end,
            curve_coefficient,
        }
    }

    /// The default 8-bit linear definition for `pixel_kind`: full
    /// resolution, full codomain, identity coefficient.
    pub fn linear(pixel_kind: PixelKind) -> Self {
        Self::new(Family::Linear, 255, pixel_kind, 0, CODOMAIN_MAX, 1.0)
    }

    /// Validates every field, failing on the first violation.
    pub fn validate(&self) -> QuantumResult<()> {
        if !BIT_RESOLUTIONS.contains(&self.bit_resolution) {
            return Err(QuantumError::BitResolution(self.bit_resolution));
        }
        if !self.pixel_kind.is_quantizable() {
            return Err(QuantumError::UnsupportedKind(self.pixel_kind));
        }
        if self.cd_start >= self.cd_end {
            return Err(QuantumError::Codomain {
                start: self.cd_start,
                end: self.cd_end,
            });
        }
        Ok(())
    }
}
