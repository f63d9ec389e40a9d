//! Native CPU runtime
//!
//! Host memory, the elementwise iteration engine and the native operation
//! kernels.
//!
//! # Broadcasting
//!
//! Inputs are broadcast to the output shape with NumPy rules: dimensions are
//! right-aligned and size-1 dimensions are expanded with stride 0.
//!
//! # Non-contiguous arrays
//!
//! Inputs and outputs may be arbitrary strided views (transposed, flipped,
//! narrowed). The engine walks physical offsets incrementally and falls back
//! to a flat loop when every array is contiguous.

mod cast;
mod device;
pub mod elementwise;
pub mod kernels;
mod runtime;

pub use crate::tensor::Tensor;
pub use cast::cast_into;
pub use device::CpuDevice;
pub use runtime::CpuRuntime;
