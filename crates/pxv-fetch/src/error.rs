//! Retrieval error types.

use thiserror::Error;

/// Result type for retrieval operations.
pub type FetchResult<T> = Result<T, FetchError>;

/// Errors surfaced by the retrieval layer.
///
/// Failures inside background commands are captured and delivered to
/// whatever is awaiting the handle; worker threads themselves never die on
/// a command error.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The remote pixel store (or the transport to it) failed.
    #[error("data source failure: {message}")]
    DataSource {
        /// Description of the underlying failure
        message: String,
    },

    /// A plane address failed validation before any fetch was issued.
    #[error(transparent)]
    Bounds(#[from] pxv_core::Error),

    /// A rendezvous peer panicked mid-transfer. Raised only after the
    /// pairing completed, so the handed-off value was still delivered.
    #[error("transfer interrupted by a panicking peer")]
    Interrupted,

    /// The fetch was cancelled underneath a reader that needed its bytes.
    #[error("fetch cancelled")]
    Cancelled,

    /// The executor shut down before the command could run.
    #[error("fetch executor disconnected")]
    Disconnected,

    /// The handle's result was already taken by an earlier wait.
    #[error("fetch result already taken")]
    Taken,
}

impl FetchError {
    /// Creates a [`FetchError::DataSource`] error.
    #[inline]
    pub fn data_source(message: impl Into<String>) -> Self {
        Self::DataSource {
            message: message.into(),
        }
    }
}
