//! Error types shared by the swap chain, its drawing sessions and the
//! native backends.
//!
//! Two failures originate locally: [`CanvasError::InvalidArgument`] for
//! malformed input and [`CanvasError::Closed`] for calls made after
//! [`close`](crate::CanvasSwapChain::close). Everything reported by a device,
//! native swap chain or device context travels as [`CanvasError::Native`]
//! and keeps its original [`ErrorCode`].

use crate::config::ConfigError;
use thiserror::Error;

/// Failure code carried by every [`CanvasError`]
///
/// Native backends report failures with one of these codes; the swap chain
/// never rewrites a native code on its way to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Malformed or missing input
    InvalidArgument,
    /// The object has already been closed
    ObjectClosed,
    /// The operation is not implemented by the backend
    NotImplemented,
    /// The backend ran out of memory
    OutOfMemory,
    /// The graphics device was lost
    DeviceRemoved,
    /// The call was invalid for the current native state
    InvalidCall,
    /// Backend-specific failure code
    Failed(i32),
}

/// Errors produced by swap chain operations
#[derive(Error, Debug)]
pub enum CanvasError {
    /// An argument was out of range or an output destination was missing
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The swap chain was used after it was closed
    #[error("The object has been closed")]
    Closed,

    /// The native description carried a format code with no typed counterpart
    #[error("Unsupported native pixel format code: {0}")]
    UnsupportedFormat(u32),

    /// The native description carried an alpha mode code with no typed counterpart
    #[error("Unsupported native alpha mode code: {0}")]
    UnsupportedAlphaMode(u32),

    /// Failure reported by the device, native swap chain or device context
    #[error("{operation} failed: {code:?}")]
    Native {
        /// Code reported by the backend
        code: ErrorCode,
        /// Native operation that failed
        operation: &'static str,
    },

    /// Configuration could not be loaded or was invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl CanvasError {
    /// Build a native failure for `operation`
    pub const fn native(operation: &'static str, code: ErrorCode) -> Self {
        Self::Native { code, operation }
    }

    /// Failure code of this error
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidArgument(_) | Self::Config(_) => ErrorCode::InvalidArgument,
            Self::Closed => ErrorCode::ObjectClosed,
            Self::UnsupportedFormat(_) | Self::UnsupportedAlphaMode(_) => ErrorCode::InvalidCall,
            Self::Native { code, .. } => *code,
        }
    }
}

/// Result type for swap chain operations
pub type CanvasResult<T> = Result<T, CanvasError>;
