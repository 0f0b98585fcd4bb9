//! Windowed, LUT-backed quantization.
//!
//! A [`QuantumStrategy`] maps every raw pixel value of a pixel set into
//! the display codomain through a precomputed lookup table. The table
//! covers the floored global domain `[min, max]` with one byte per
//! representable value, so `quantize` is a bounds check plus one indexed
//! read. Changing the contrast window rebuilds the table in place; the
//! exclusive borrow on [`set_window`](QuantumStrategy::set_window) keeps
//! rebuilds and concurrent reads apart at compile time.
//!
//! # Build pipeline
//!
//! For each tabulated value `x`:
//!
//! 1. values below the window map to `cd_start`, above it to `cd_end`;
//! 2. inside the window an intermediate `v` in [0, 255] is computed —
//!    a plain ramp from window start to end, or, with noise reduction
//!    enabled, a three-zone decile shape that pins the outer deciles to a
//!    fixed margin and ramps only across the central mass;
//! 3. `v` runs through the configured transform map, is normalized against
//!    the map's values at 0 and 255, quantized to the configured bit
//!    resolution, and rescaled into `[cd_start, cd_end]`.
//!
//! Non-finite intermediates (an overflowing exponential, say) clamp
//! silently; the table is always fully populated.

use crate::def::QuantumDef;
use crate::error::{QuantumError, QuantumResult};
use crate::map::{QuantumMap, ValueMap};

/// Top of the intermediate ramp the maps are calibrated against.
const INTERMEDIATE_MAX: f64 = 255.0;

/// Margin pinned to the outer deciles when noise reduction is on.
const NOISE_MARGIN: f64 = 10.0;

/// Upper bound on tabulated entries. A 16-bit domain needs 2^16; anything
/// beyond 2^24 means the caller passed a range that was never reduced by
/// stack statistics.
const MAX_LUT_ENTRIES: usize = 1 << 24;

/// LUT-backed quantizer for one pixel set and rendering configuration.
///
/// Built through [`build_strategy`](crate::build_strategy); the definition
/// is validated before this type ever exists.
#[derive(Debug, Clone)]
pub struct QuantumStrategy {
    def: QuantumDef,
    map: ValueMap,
    coefficient: f64,
    min: i64,
    max: i64,
    window_start: f64,
    window_end: f64,
    noise_reduction: bool,
    lut: Vec<u8>,
}

impl QuantumStrategy {
    /// Assembles a strategy over the floored global domain, with the
    /// window initialized to the full domain and the table built.
    pub(crate) fn new(
        def: QuantumDef,
        map: ValueMap,
        coefficient: f64,
        global_min: f64,
        global_max: f64,
    ) -> QuantumResult<Self> {
        if !global_min.is_finite() || !global_max.is_finite() {
            return Err(QuantumError::Domain {
                min: global_min,
                max: global_max,
            });
        }
        let min = global_min.floor() as i64;
        let max = global_max.floor() as i64;
        if min >= max {
            return Err(QuantumError::Domain {
                min: global_min,
                max: global_max,
            });
        }
        let entries = max
            .checked_sub(min)
            .and_then(|span| usize::try_from(span).ok())
            .and_then(|span| span.checked_add(1))
            .filter(|&entries| entries <= MAX_LUT_ENTRIES)
            .ok_or(QuantumError::Domain {
                min: global_min,
                max: global_max,
            })?;
        let mut strategy = Self {
            def,
            map,
            coefficient,
            min,
            max,
            window_start: min as f64,
            window_end: max as f64,
            noise_reduction: false,
            lut: vec![0; entries],
        };
        strategy.build_lut();
        Ok(strategy)
    }

    /// The configuration this strategy was built from.
    #[inline]
    pub fn def(&self) -> &QuantumDef {
        &self.def
    }

    /// The floored global domain `[min, max]`.
    #[inline]
    pub fn domain(&self) -> (i64, i64) {
        (self.min, self.max)
    }

    /// The current contrast window `[start, end]`.
    #[inline]
    pub fn window(&self) -> (f64, f64) {
        (self.window_start, self.window_end)
    }

    /// Whether the decile noise-reduction shape is applied.
    #[inline]
    pub fn noise_reduction(&self) -> bool {
        self.noise_reduction
    }

    /// Moves the contrast window and rebuilds the table.
    ///
    /// The window must satisfy `min <= start < end <= max`; otherwise the
    /// strategy is left untouched and [`QuantumError::Window`] is
    /// returned.
    pub fn set_window(&mut self, start: f64, end: f64) -> QuantumResult<()> {
        let (min, max) = (self.min as f64, self.max as f64);
        if !start.is_finite() || !end.is_finite() || start < min || end > max || start >= end {
            return Err(QuantumError::Window {
                start,
                end,
                min,
                max,
            });
        }
        self.window_start = start;
        self.window_end = end;
        self.build_lut();
        Ok(())
    }

    /// Toggles the decile noise-reduction shape, rebuilding the table when
    /// the setting changes.
    pub fn set_noise_reduction(&mut self, on: bool) {
        if self.noise_reduction != on {
            self.noise_reduction = on;
            self.build_lut();
        }
    }

    /// Quantizes `value` into the display codomain.
    ///
    /// The value is truncated toward zero; anything non-finite or outside
    /// the global domain fails with [`QuantumError::ValueOutOfRange`].
    /// In-range values always land in `[cd_start, cd_end]`.
    #[inline]
    pub fn quantize(&self, value: f64) -> QuantumResult<u8> {
        if !value.is_finite() {
            return Err(QuantumError::ValueOutOfRange {
                value,
                min: self.min,
                max: self.max,
            });
        }
        let truncated = value.trunc();
        if truncated < self.min as f64 || truncated > self.max as f64 {
            return Err(QuantumError::ValueOutOfRange {
                value,
                min: self.min,
                max: self.max,
            });
        }
        Ok(self.lut[(truncated as i64 - self.min) as usize])
    }

    fn build_lut(&mut self) {
        let min = self.min as f64;
        let max = self.max as f64;
        let d_start = self.window_start;
        let d_end = self.window_end;
        let k = self.coefficient;
        let bit_res = self.def.bit_resolution as f64;
        let cd_start = self.def.cd_start as f64;
        let cd_end = self.def.cd_end as f64;
        let a1 = (cd_end - cd_start) / bit_res;

        // Calibrate the map over the intermediate ramp.
        let ys = self.map.transform(0.0, k);
        let ye = self.map.transform(INTERMEDIATE_MAX, k);
        let a_norm = bit_res / (ye - ys);

        let decile = (max - min) / 10.0;
        let q1 = min + decile;
        let q9 = max - decile;

        // Ramp parameters: either the plain window ramp or the central
        // decile span with the fixed margin pinned outside it.
        let (lo, hi, origin, span) = if self.noise_reduction {
            let s1 = if d_start >= q1 && d_start <= q9 {
                d_start
            } else {
                q1
            };
            (
                NOISE_MARGIN,
                INTERMEDIATE_MAX - NOISE_MARGIN,
                s1,
                q9 - s1,
            )
        } else {
            (0.0, INTERMEDIATE_MAX, d_start, d_end - d_start)
        };
        let slope = if span > 0.0 { (hi - lo) / span } else { 0.0 };

        tracing::debug!(
            window_start = d_start,
            window_end = d_end,
            entries = self.lut.len(),
            noise_reduction = self.noise_reduction,
            "rebuilding quantization table"
        );

        for x in self.min..=self.max {
            let xf = x as f64;
            let out = if xf < d_start {
                cd_start
            } else if xf > d_end {
                cd_end
            } else {
                let v = if self.noise_reduction && xf <= q1 {
                    lo
                } else if self.noise_reduction && xf > q9 {
                    hi
                } else {
                    lo + slope * (xf - origin)
                };
                let v = v.clamp(0.0, INTERMEDIATE_MAX);
                let y = (a_norm * (self.map.transform(v, k) - ys)).round();
                let y = if y.is_finite() {
                    y.clamp(0.0, bit_res)
                } else {
                    0.0
                };
                (a1 * y + cd_start).round().clamp(cd_start, cd_end)
            };
            self.lut[(x - self.min) as usize] = out as u8;
        }
    }
}
