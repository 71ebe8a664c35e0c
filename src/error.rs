//! Error types and handling for seine channels

/// Result type alias for channel operations
pub type Result<T> = std::result::Result<T, SeineError>;

/// Error types for the seine byte-stream channel
#[derive(Debug, thiserror::Error)]
pub enum SeineError {
    /// A non-blocking call could not make progress
    #[error("operation would block")]
    WouldBlock,

    /// A blocking wait was cancelled by an interrupter
    #[error("wait interrupted")]
    Interrupted,

    /// An atomic transfer was larger than the channel can ever hold
    #[error("capacity exceeded: requested {requested}, capacity {capacity}")]
    CapacityExceeded { requested: usize, capacity: usize },

    /// Storage allocation failed (scatter-gather block or group)
    #[error("allocation failure: could not allocate {requested} bytes")]
    Allocation { requested: usize },

    /// Invalid parameters or configuration
    #[error("invalid parameter: {parameter} - {message}")]
    InvalidParameter { parameter: String, message: String },
}

impl SeineError {
    /// Create an allocation failure error
    pub fn allocation(requested: usize) -> Self {
        Self::Allocation { requested }
    }

    /// Create a capacity exceeded error
    pub fn capacity_exceeded(requested: usize, capacity: usize) -> Self {
        Self::CapacityExceeded {
            requested,
            capacity,
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Whether the caller is expected to retry the same call
    ///
    /// `WouldBlock` and `Interrupted` are transient conditions; everything
    /// else is fatal for the call that produced it.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::WouldBlock | Self::Interrupted)
    }
}
