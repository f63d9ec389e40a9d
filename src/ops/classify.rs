//! NaN / Inf classification operations

use crate::context::Context;
use crate::error::Result;
use crate::kernel::KernelOp;
use crate::runtime::Runtime;
use crate::tensor::Tensor;

/// Elementwise classification into a `Bool` output
///
/// Every input dtype is accepted; integers and bools are always finite.
pub trait ClassifyOps<R: Runtime> {
    /// `out = isnan(x)`
    fn isnan(&self, x: &Tensor<R>, out: &Tensor<R>) -> Result<()>;

    /// `out = isinf(x)`
    fn isinf(&self, x: &Tensor<R>, out: &Tensor<R>) -> Result<()>;

    /// `out = !(isnan(x) || isinf(x))`
    fn isfinite(&self, x: &Tensor<R>, out: &Tensor<R>) -> Result<()>;
}

impl<R: Runtime> ClassifyOps<R> for Context {
    fn isnan(&self, x: &Tensor<R>, out: &Tensor<R>) -> Result<()> {
        self.registry().unary::<R>(KernelOp::IsNan)?.call(x, out)
    }

    fn isinf(&self, x: &Tensor<R>, out: &Tensor<R>) -> Result<()> {
        self.registry().unary::<R>(KernelOp::IsInf)?.call(x, out)
    }

    fn isfinite(&self, x: &Tensor<R>, out: &Tensor<R>) -> Result<()> {
        self.registry().unary::<R>(KernelOp::IsFinite)?.call(x, out)
    }
}
