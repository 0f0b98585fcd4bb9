//! # pxv-quantum
//!
//! Quantization of raw pixel values into a bounded display codomain.
//!
//! Scientific pixel data arrives as anything from signed bytes to doubles;
//! the display wants bytes in a fixed intensity range. This crate owns
//! that mapping: a [`QuantumDef`] describes it, a transform family shapes
//! it, and a [`QuantumStrategy`] tabulates it so that per-pixel
//! quantization is a single lookup.
//!
//! # Transform Families
//!
//! | Family | Curve | Notes |
//! |--------|-------|-------|
//! | [`Linear`](Family::Linear) | `x` | Power curve with exponent fixed to 1 |
//! | [`Polynomial`](Family::Polynomial) | `x^k` | Gamma-style contrast |
//! | [`Logarithmic`](Family::Logarithmic) | `ln(x)` | Compresses bright outliers |
//! | [`Exponential`](Family::Exponential) | `a*e^(x^k)+b` | Expands bright detail |
//!
//! # Usage
//!
//! ```rust
//! use pxv_core::PixelKind;
//! use pxv_quantum::{build_strategy, QuantumDef};
//!
//! let def = QuantumDef::linear(PixelKind::UInt16);
//! let mut strategy = build_strategy(&def, 0.0, 4095.0).unwrap();
//!
//! // Stretch the contrast window onto the central values.
//! strategy.set_window(1000.0, 3000.0).unwrap();
//! assert_eq!(strategy.quantize(500.0).unwrap(), 0);
//! assert_eq!(strategy.quantize(3500.0).unwrap(), 255);
//! ```
//!
//! # Dependencies
//!
//! - [`pxv-core`] - Pixel kinds
//! - [`thiserror`] - Error handling
//! - [`tracing`] - Table-rebuild events
//!
//! ## Feature Flags
//!
//! - `serde` - Serialization derives on [`QuantumDef`] and [`Family`] for
//!   the rendering-settings persistence boundary

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod def;
mod error;
mod factory;
mod map;
mod strategy;

pub use def::{BIT_RESOLUTIONS, CODOMAIN_MAX, Family, QuantumDef};
pub use error::{QuantumError, QuantumResult};
pub use factory::{build_strategy, value_map_for};
pub use map::{ExponentialMap, LogarithmicMap, PolynomialMap, QuantumMap, ValueMap};
pub use strategy::QuantumStrategy;
