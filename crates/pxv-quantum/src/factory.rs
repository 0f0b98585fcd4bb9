//! Strategy assembly.
//!
//! The factory is the only way to obtain a [`QuantumStrategy`]: it
//! validates the [`QuantumDef`] field by field, selects the transform map
//! for the family, and only then assembles the strategy. A failed
//! validation constructs nothing, so a partially-initialized strategy is
//! never observable. Everything flows through explicit arguments — there
//! is no registry and no process-wide state.
//!
//! # Usage
//!
//! ```rust
//! use pxv_core::PixelKind;
//! use pxv_quantum::{build_strategy, QuantumDef};
//!
//! let def = QuantumDef::linear(PixelKind::UInt16);
//! let strategy = build_strategy(&def, 0.0, 4095.0).unwrap();
//! assert_eq!(strategy.quantize(0.0).unwrap(), 0);
//! ```

use crate::def::{Family, QuantumDef};
use crate::error::QuantumResult;
use crate::map::{ExponentialMap, LogarithmicMap, PolynomialMap, ValueMap};
use crate::strategy::QuantumStrategy;

/// Selects the transform map for a family.
///
/// Linear and polynomial share the power curve; linear fixes the exponent
/// to 1 via the effective coefficient chosen in [`build_strategy`].
pub fn value_map_for(family: Family) -> ValueMap {
    match family {
        Family::Linear | Family::Polynomial => ValueMap::Polynomial(PolynomialMap),
        Family::Logarithmic => ValueMap::Logarithmic(LogarithmicMap),
        Family::Exponential => ValueMap::Exponential(ExponentialMap::default()),
    }
}

/// Validates `def` and assembles the matching strategy over the global
/// domain `[global_min, global_max]`.
///
/// Fails fast on the first invalid field, or with
/// [`QuantumError::Domain`](crate::QuantumError::Domain) when the floored
/// domain cannot back a table. On success the window spans the full
/// domain and the table is ready to serve.
pub fn build_strategy(
    def: &QuantumDef,
    global_min: f64,
    global_max: f64,
) -> QuantumResult<QuantumStrategy> {
    def.validate()?;
    let map = value_map_for(def.family);
    let coefficient = if def.family == Family::Linear {
        1.0
    } else {
        def.curve_coefficient
    };
    QuantumStrategy::new(*def, map, coefficient, global_min, global_max)
}
