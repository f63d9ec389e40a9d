//! Dtype conversion for CPU arrays

use super::CpuRuntime;
use super::elementwise::{ElementwiseOp, elementwise};
use crate::dtype::{DType, Element};
use crate::error::Result;
use crate::tensor::Tensor;
use std::marker::PhantomData;

/// Per-element conversion `S -> D`
///
/// Conversions involving a float go through f64: float to integer saturates
/// (NaN becomes 0). Integer and bool pairs go through i64 and wrap like `as`,
/// so 64-bit values survive exactly. Anything to bool is `!= 0`.
struct CastOp<S, D>(PhantomData<fn(S) -> D>);

impl<S: Element, D: Element> ElementwiseOp<(S,), (D,)> for CastOp<S, D> {
    #[inline]
    fn apply(&self, _: usize, (x,): (S,)) -> (D,) {
        if S::DTYPE.is_float() || D::DTYPE.is_float() {
            (D::from_f64(x.to_f64()),)
        } else {
            (D::from_i64(x.to_i64()),)
        }
    }
}

/// Convert `src` into the existing output `dst`
///
/// `dst` supplies the target dtype and shape; `src` is broadcast to it.
pub fn cast_into(src: &Tensor<CpuRuntime>, dst: &Tensor<CpuRuntime>) -> Result<()> {
    crate::dispatch_any!(src.dtype(), S => {
        crate::dispatch_any!(dst.dtype(), D => {
            elementwise(&CastOp::<S, D>(PhantomData), &[src], &[dst])
        }, "cast")
    }, "cast")
}

impl Tensor<CpuRuntime> {
    /// Materialize a contiguous copy converted to `dtype`
    ///
    /// Returns a zero-copy view when the dtype already matches. The logical
    /// shape is preserved either way.
    pub fn as_type(&self, dtype: DType) -> Result<Self> {
        if self.dtype() == dtype {
            return Ok(self.clone());
        }

        tracing::debug!(from = %self.dtype(), to = %dtype, numel = self.numel(), "materializing cast");
        let out = Self::try_empty(self.shape(), dtype, self.device())?;
        cast_into(self, &out)?;
        Ok(out)
    }
}
