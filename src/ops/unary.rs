//! Square, square root and rounding operations

use crate::context::Context;
use crate::error::Result;
use crate::kernel::KernelOp;
use crate::runtime::Runtime;
use crate::tensor::Tensor;

/// Elementwise floating point math
///
/// The output must have a floating point dtype; any other output fails with
/// `UnsupportedDType` before anything is written. The input is converted to
/// the output dtype when they differ.
pub trait UnaryMathOps<R: Runtime> {
    /// `out = x * x`
    fn square(&self, x: &Tensor<R>, out: &Tensor<R>) -> Result<()>;

    /// `out = sqrt(x)`; negative inputs give NaN
    fn sqrt(&self, x: &Tensor<R>, out: &Tensor<R>) -> Result<()>;

    /// `out = ceil(x)`
    fn ceil(&self, x: &Tensor<R>, out: &Tensor<R>) -> Result<()>;

    /// `out = floor(x)`
    fn floor(&self, x: &Tensor<R>, out: &Tensor<R>) -> Result<()>;
}

impl<R: Runtime> UnaryMathOps<R> for Context {
    fn square(&self, x: &Tensor<R>, out: &Tensor<R>) -> Result<()> {
        self.registry().unary::<R>(KernelOp::Square)?.call(x, out)
    }

    fn sqrt(&self, x: &Tensor<R>, out: &Tensor<R>) -> Result<()> {
        self.registry().unary::<R>(KernelOp::Sqrt)?.call(x, out)
    }

    fn ceil(&self, x: &Tensor<R>, out: &Tensor<R>) -> Result<()> {
        self.registry().unary::<R>(KernelOp::Ceil)?.call(x, out)
    }

    fn floor(&self, x: &Tensor<R>, out: &Tensor<R>) -> Result<()> {
        self.registry().unary::<R>(KernelOp::Floor)?.call(x, out)
    }
}
