//! # pxv-fetch
//!
//! Asynchronous plane retrieval for the pixelview rendering pipeline.
//!
//! Plane buffers live in a remote pixel store; the viewer must keep its
//! render threads fed without blocking the UI on the network. This crate
//! owns that plumbing:
//!
//! - [`ObjectTransfer`] - Zero-capacity synchronous handoff pairing one
//!   producer thread with one consumer thread
//! - [`FetchExecutor`], [`FetchHandle`] - Worker pool running fetch
//!   commands in the background, with cancellation as a first-class
//!   outcome
//! - [`PlaneFetcher`], [`StackStream`] - Bounds-checked fetch issuance
//!   and multi-channel stack composition over a [`PixelSource`]
//!
//! # Architecture
//!
//! ```text
//! render thread ── collect() ──┐
//!                              │  ObjectTransfer (one plane in flight)
//! fetch worker ─── hand_off() ─┘
//!
//! caller ── fetch_plane(z, c, t) ──> bounds check ──> FetchExecutor
//!    │                                                    │
//!    └────────────── FetchHandle::wait() <── resolve ─────┘
//! ```
//!
//! # Dependencies
//!
//! - [`pxv-core`] - Pixel set dimensions for bounds checks
//! - [`thiserror`] - Error handling
//! - [`tracing`] - Fetch issue/completion/failure events
//!
//! # Used By
//!
//! - The viewer's rendering orchestration, which pairs fetched buffers
//!   with `pxv-codec` decoding and `pxv-quantum` quantization

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod executor;
pub mod stack;
pub mod transfer;

pub use error::{FetchError, FetchResult};
pub use executor::{FetchExecutor, FetchHandle, FetchOutcome};
pub use stack::{PixelSource, PlaneFetcher, StackStream};
pub use transfer::{HandOff, ObjectTransfer};
