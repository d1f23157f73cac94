/// Convenience result type used across the surface client.
pub type SurfaceResult<T> = Result<T, SurfaceError>;

/// Status taxonomy returned by surfaces, handles and their collaborators.
///
/// Callers branch on the variant (for example `NotInitialized` versus `InvalidOperation` out of
/// validation), so every failure kind has its own variant rather than a shared message type.
#[derive(thiserror::Error, Debug)]
pub enum SurfaceError {
    /// The handle or client was never valid, or the remote side recreated the surface.
    #[error("not initialized: {0}")]
    NotInitialized(String),

    /// Protocol misuse, e.g. dequeueing from a display-only surface or locking twice.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// Unrecognized producer id, mismatched disconnect or malformed geometry.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The render cycle is already being driven from another thread.
    #[error("would block: {0}")]
    WouldBlock(String),

    /// No buffer could be obtained for a slot.
    #[error("out of memory: {0}")]
    OutOfMemory(String),

    /// Unknown configuration operation.
    #[error("not found: {0}")]
    NotFound(String),

    /// A blocking collaborator gave up waiting (e.g. no free slot in time).
    #[error("timed out: {0}")]
    TimedOut(String),

    /// The remote service died while a call was in flight.
    #[error("dead object: {0}")]
    DeadObject(String),

    /// Wrapped lower-level error from a collaborator.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SurfaceError {
    /// Build a [`SurfaceError::NotInitialized`] value.
    pub fn not_initialized(msg: impl Into<String>) -> Self {
        Self::NotInitialized(msg.into())
    }

    /// Build a [`SurfaceError::InvalidOperation`] value.
    pub fn invalid_operation(msg: impl Into<String>) -> Self {
        Self::InvalidOperation(msg.into())
    }

    /// Build a [`SurfaceError::InvalidArgument`] value.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Build a [`SurfaceError::WouldBlock`] value.
    pub fn would_block(msg: impl Into<String>) -> Self {
        Self::WouldBlock(msg.into())
    }

    /// Build a [`SurfaceError::OutOfMemory`] value.
    pub fn out_of_memory(msg: impl Into<String>) -> Self {
        Self::OutOfMemory(msg.into())
    }

    /// Build a [`SurfaceError::NotFound`] value.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Build a [`SurfaceError::TimedOut`] value.
    pub fn timed_out(msg: impl Into<String>) -> Self {
        Self::TimedOut(msg.into())
    }

    /// Build a [`SurfaceError::DeadObject`] value.
    pub fn dead_object(msg: impl Into<String>) -> Self {
        Self::DeadObject(msg.into())
    }

    /// Negative errno-style status for ABI shims that still speak integer statuses.
    ///
    /// Wrapped collaborator errors have no errno of their own and map to `-EIO`.
    pub fn status_code(&self) -> i32 {
        match self {
            Self::NotInitialized(_) => -19,   // ENODEV
            Self::InvalidOperation(_) => -38, // ENOSYS
            Self::InvalidArgument(_) => -22,  // EINVAL
            Self::WouldBlock(_) => -11,       // EWOULDBLOCK
            Self::OutOfMemory(_) => -12,      // ENOMEM
            Self::NotFound(_) => -2,          // ENOENT
            Self::TimedOut(_) => -110,        // ETIMEDOUT
            Self::DeadObject(_) => -32,       // EPIPE
            Self::Other(_) => -5,             // EIO
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
