//! Error types for elemx

use crate::dtype::DType;
use crate::kernel::KernelOp;
use thiserror::Error;

/// Result type alias using elemx's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving or running a kernel
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Arrays participating in one operation live on different devices
    #[error("Device mismatch: expected {expected}, got {got}")]
    DeviceMismatch {
        /// Device of the first array
        expected: String,
        /// Device of the offending array
        got: String,
    },

    /// Dtype is outside the category an operation accepts
    #[error("Unsupported dtype {dtype} for operation '{op}'")]
    UnsupportedDType {
        /// The unsupported dtype
        dtype: DType,
        /// The operation name
        op: &'static str,
    },

    /// No kernel registered for the (operation, backend) pair
    #[error("No kernel registered for '{op}' on backend '{backend}'")]
    KernelNotFound {
        /// The requested operation
        op: KernelOp,
        /// The requested backend
        backend: String,
    },

    /// The same (operation, backend) pair was registered twice
    #[error("Kernel '{op}' already registered for backend '{backend}'")]
    DuplicateRegistration {
        /// The operation
        op: KernelOp,
        /// The backend
        backend: String,
    },

    /// DType of an array does not match the working type of the operation
    #[error("DType mismatch: expected {expected}, got {got}")]
    DTypeMismatch {
        /// Dtype the operation works in
        expected: DType,
        /// Dtype the array carries
        got: DType,
    },

    /// Shape mismatch in an operation
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape
        expected: Vec<usize>,
        /// Actual shape
        got: Vec<usize>,
    },

    /// Shapes cannot be broadcast together
    #[error("Cannot broadcast shape {from:?} to {to:?}")]
    BroadcastError {
        /// Source shape
        from: Vec<usize>,
        /// Target shape
        to: Vec<usize>,
    },

    /// Invalid argument provided to an operation
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// Out of memory
    #[error("Out of memory: failed to allocate {size} bytes")]
    OutOfMemory {
        /// Requested size in bytes
        size: usize,
    },
}

impl Error {
    /// Create a shape mismatch error
    pub fn shape_mismatch(expected: &[usize], got: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            got: got.to_vec(),
        }
    }

    /// Create a broadcast error
    pub fn broadcast(from: &[usize], to: &[usize]) -> Self {
        Self::BroadcastError {
            from: from.to_vec(),
            to: to.to_vec(),
        }
    }

    /// Create an unsupported dtype error
    pub fn unsupported_dtype(dtype: DType, op: &'static str) -> Self {
        Self::UnsupportedDType { dtype, op }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(arg: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            arg,
            reason: reason.into(),
        }
    }
}
