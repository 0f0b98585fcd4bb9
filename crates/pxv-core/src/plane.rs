//! Plane selection within a 5-dimensional pixel set.
//!
//! A pixel set is addressed as (x, y, z, c, t). A [`PlaneDef`] names one 2D
//! slice of it: an XY plane at a given z, a ZY plane at a given x, or an XZ
//! plane at a given y, always at a fixed timepoint. Plane definitions are
//! the request identity for fetches and the cache key for rendered planes,
//! so their equality covers exactly the fields that select the slice.
//!
//! # Usage
//!
//! ```rust
//! use pxv_core::PlaneDef;
//!
//! let a = PlaneDef::xy(5, 2);
//! let b = PlaneDef::xy(5, 2);
//! assert_eq!(a, b);
//! assert_ne!(a, PlaneDef::xy(6, 2));
//! ```

use std::hash::{Hash, Hasher};

/// Orientation of a 2D slice through a pixel set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlaneKind {
    /// An (x, y) plane at a fixed z.
    Xy,
    /// A (z, y) plane at a fixed x.
    Zy,
    /// An (x, z) plane at a fixed y.
    Xz,
}

/// Identity of one 2D plane: orientation, the one relevant position index,
/// and the timepoint.
///
/// Built through the slice-specific constructors; immutable afterwards.
/// Equality and hashing cover only `(kind, t, relevant index)` — an XY
/// plane is the same plane regardless of what the unused x and y fields
/// hold, so they never participate.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaneDef {
    kind: PlaneKind,
    x: u32,
    y: u32,
    z: u32,
    t: u32,
}

impl PlaneDef {
    /// An XY plane at depth `z`, timepoint `t`.
    pub fn xy(z: u32, t: u32) -> Self {
        Self { kind: PlaneKind::Xy, x: 0, y: 0, z, t }
    }

    /// A ZY plane at column `x`, timepoint `t`.
    pub fn zy(x: u32, t: u32) -> Self {
        Self { kind: PlaneKind::Zy, x, y: 0, z: 0, t }
    }

    /// An XZ plane at row `y`, timepoint `t`.
    pub fn xz(y: u32, t: u32) -> Self {
        Self { kind: PlaneKind::Xz, x: 0, y, z: 0, t }
    }

    /// The slice orientation.
    #[inline]
    pub fn kind(&self) -> PlaneKind {
        self.kind
    }

    /// The timepoint.
    #[inline]
    pub fn t(&self) -> u32 {
        self.t
    }

    /// The position index that selects this plane along its fixed axis.
    #[inline]
    pub fn position(&self) -> u32 {
        match self.kind {
            PlaneKind::Xy => self.z,
            PlaneKind::Zy => self.x,
            PlaneKind::Xz => self.y,
        }
    }
}

impl PartialEq for PlaneDef {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.t == other.t && self.position() == other.position()
    }
}

impl Eq for PlaneDef {}

impl Hash for PlaneDef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.t.hash(state);
        self.position().hash(state);
    }
}
