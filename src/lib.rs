//! # elemx
//!
//! **Native CPU elementwise math kernels over strided n-dimensional arrays.**
//!
//! elemx applies elementwise transformations (power, square, square root,
//! ceiling, floor and NaN/Inf/finite classification) to arrays of any
//! supported dtype, writing into caller-allocated outputs.
//!
//! ## Architecture
//!
//! ```text
//! Context ──► KernelRegistry ──► kernel for (op, backend)
//!                                   │
//!                                   ├── check_devices_compatible
//!                                   ├── category check + dispatch_*! on the working dtype
//!                                   └── elementwise engine (strided, broadcast, exactly once)
//! ```
//!
//! - [`dtype`]: the closed dtype set, operation categories and dispatch macros
//! - [`tensor`]: the array abstraction (storage + layout)
//! - [`runtime`]: backends, devices and the native CPU engine and kernels
//! - [`kernel`]: kernel identities, kernel traits and the registry
//! - [`ops`]: operation entry points implemented by [`Context`]
//!
//! ## Quick Start
//!
//! ```rust
//! use elemx::prelude::*;
//!
//! let ctx = Context::global();
//! let device = CpuDevice::new();
//!
//! let x = Tensor::<CpuRuntime>::from_slice(&[2.0f32, 3.0], &[2], &device);
//! let out = Tensor::<CpuRuntime>::zeros(&[2], DType::F32, &device);
//! ctx.pow_array_scalar(&x, 2, &out)?;
//! assert_eq!(out.to_vec::<f32>(), [4.0, 9.0]);
//! # Ok::<(), elemx::error::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `rayon` (default): split large iterations across threads

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod dtype;
pub mod error;
pub mod kernel;
pub mod ops;
pub mod runtime;
pub mod tensor;

pub use context::Context;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::context::Context;
    pub use crate::dtype::{DType, DTypeCategory, Scalar};
    pub use crate::error::{Error, Result};
    pub use crate::kernel::{KernelOp, KernelRegistry};
    pub use crate::ops::{ClassifyOps, PowerOps, UnaryMathOps};
    pub use crate::runtime::cpu::{CpuDevice, CpuRuntime};
    pub use crate::runtime::{Device, Runtime};
    pub use crate::tensor::{Layout, Tensor};
}
