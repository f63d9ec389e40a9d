//! Native CPU operation kernels
//!
//! Every kernel follows the same sequence: device check over all arrays,
//! category check on the working dtype, conversion of inputs to the working
//! dtype where the operation calls for it, then one pass of the elementwise
//! engine with the operation's functor.
//!
//! | Kernel | Category | Dispatched on |
//! |--------|----------|---------------|
//! | pow, pow_array_scalar, pow_scalar_array | Numeric | output |
//! | square, sqrt, ceil, floor | FloatingPoint | output |
//! | isnan, isinf, isfinite | Any | input |

mod classify;
mod math;

pub use classify::{CpuIsFiniteKernel, CpuIsInfKernel, CpuIsNanKernel};
pub use math::{
    CpuCeilKernel, CpuFloorKernel, CpuPowArrayScalarKernel, CpuPowKernel, CpuPowScalarArrayKernel,
    CpuSqrtKernel, CpuSquareKernel,
};

use super::CpuRuntime;
use crate::error::Result;
use crate::kernel::{KernelEntry, KernelOp, KernelRegistryBuilder};

/// Register all ten native kernels under the `"cpu"` backend
pub fn register_native_kernels(builder: &mut KernelRegistryBuilder) -> Result<()> {
    type Entry = KernelEntry<CpuRuntime>;

    builder.register(KernelOp::Pow, Entry::binary(CpuPowKernel))?;
    builder.register(KernelOp::PowArrayScalar, Entry::array_scalar(CpuPowArrayScalarKernel))?;
    builder.register(KernelOp::PowScalarArray, Entry::scalar_array(CpuPowScalarArrayKernel))?;
    builder.register(KernelOp::Square, Entry::unary(CpuSquareKernel))?;
    builder.register(KernelOp::Sqrt, Entry::unary(CpuSqrtKernel))?;
    builder.register(KernelOp::IsNan, Entry::unary(CpuIsNanKernel))?;
    builder.register(KernelOp::IsInf, Entry::unary(CpuIsInfKernel))?;
    builder.register(KernelOp::IsFinite, Entry::unary(CpuIsFiniteKernel))?;
    builder.register(KernelOp::Ceil, Entry::unary(CpuCeilKernel))?;
    builder.register(KernelOp::Floor, Entry::unary(CpuFloorKernel))?;
    Ok(())
}
