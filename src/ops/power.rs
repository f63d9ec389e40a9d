//! Power operations

use crate::context::Context;
use crate::dtype::Scalar;
use crate::error::Result;
use crate::kernel::KernelOp;
use crate::runtime::Runtime;
use crate::tensor::Tensor;

/// Elementwise power
///
/// The output dtype is the working type: inputs of another dtype are
/// converted to it first. Bool outputs are rejected with `UnsupportedDType`.
///
/// For integer working types a negative exponent yields 0, except for bases
/// 1 (always 1) and -1 (±1 by exponent parity). Results wrap on overflow.
pub trait PowerOps<R: Runtime> {
    /// `out = x1 ^ x2`, with `x1` and `x2` broadcast to `out`
    fn pow(&self, x1: &Tensor<R>, x2: &Tensor<R>, out: &Tensor<R>) -> Result<()>;

    /// `out = x1 ^ x2` for a scalar exponent
    fn pow_array_scalar(&self, x1: &Tensor<R>, x2: impl Into<Scalar>, out: &Tensor<R>)
    -> Result<()>;

    /// `out = x1 ^ x2` for a scalar base
    fn pow_scalar_array(&self, x1: impl Into<Scalar>, x2: &Tensor<R>, out: &Tensor<R>)
    -> Result<()>;
}

impl<R: Runtime> PowerOps<R> for Context {
    fn pow(&self, x1: &Tensor<R>, x2: &Tensor<R>, out: &Tensor<R>) -> Result<()> {
        self.registry().binary::<R>(KernelOp::Pow)?.call(x1, x2, out)
    }

    fn pow_array_scalar(
        &self,
        x1: &Tensor<R>,
        x2: impl Into<Scalar>,
        out: &Tensor<R>,
    ) -> Result<()> {
        self.registry()
            .array_scalar::<R>(KernelOp::PowArrayScalar)?
            .call(x1, x2.into(), out)
    }

    fn pow_scalar_array(
        &self,
        x1: impl Into<Scalar>,
        x2: &Tensor<R>,
        out: &Tensor<R>,
    ) -> Result<()> {
        self.registry()
            .scalar_array::<R>(KernelOp::PowScalarArray)?
            .call(x1.into(), x2, out)
    }
}
