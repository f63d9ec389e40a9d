//! Power, square root, square and rounding kernels

use crate::dispatch_float;
use crate::dispatch_numeric;
use crate::dtype::{DTypeCategory, FloatElement, NumericElement, Scalar};
use crate::error::Result;
use crate::kernel::{ArrayScalarKernel, BinaryKernel, KernelOp, ScalarArrayKernel, UnaryKernel};
use crate::runtime::check_devices_compatible;
use crate::runtime::cpu::CpuRuntime;
use crate::runtime::cpu::elementwise::{ElementwiseOp, detach_input, elementwise};
use crate::tensor::Tensor;

// ============================================================================
// Functors
// ============================================================================

/// `x1 ^ x2`
struct PowOp;

impl<T: NumericElement> ElementwiseOp<(T, T), (T,)> for PowOp {
    #[inline]
    fn apply(&self, _: usize, (base, exp): (T, T)) -> (T,) {
        (base.pow(exp),)
    }
}

/// `x ^ exp` with the exponent captured at dispatch time
struct PowExpOp<T>(T);

impl<T: NumericElement> ElementwiseOp<(T,), (T,)> for PowExpOp<T> {
    #[inline]
    fn apply(&self, _: usize, (base,): (T,)) -> (T,) {
        (base.pow(self.0),)
    }
}

/// `base ^ x` with the base captured at dispatch time
struct PowBaseOp<T>(T);

impl<T: NumericElement> ElementwiseOp<(T,), (T,)> for PowBaseOp<T> {
    #[inline]
    fn apply(&self, _: usize, (exp,): (T,)) -> (T,) {
        (self.0.pow(exp),)
    }
}

/// A float-to-float function, generic over the float width
trait FloatFn: Copy + Sync {
    fn eval<T: FloatElement>(self, x: T) -> T;
}

#[derive(Clone, Copy)]
struct SquareFn;

impl FloatFn for SquareFn {
    #[inline]
    fn eval<T: FloatElement>(self, x: T) -> T {
        x.square()
    }
}

#[derive(Clone, Copy)]
struct SqrtFn;

impl FloatFn for SqrtFn {
    #[inline]
    fn eval<T: FloatElement>(self, x: T) -> T {
        x.sqrt()
    }
}

#[derive(Clone, Copy)]
struct CeilFn;

impl FloatFn for CeilFn {
    #[inline]
    fn eval<T: FloatElement>(self, x: T) -> T {
        x.ceil()
    }
}

#[derive(Clone, Copy)]
struct FloorFn;

impl FloatFn for FloorFn {
    #[inline]
    fn eval<T: FloatElement>(self, x: T) -> T {
        x.floor()
    }
}

struct FloatMap<F>(F);

impl<T: FloatElement, F: FloatFn> ElementwiseOp<(T,), (T,)> for FloatMap<F> {
    #[inline]
    fn apply(&self, _: usize, (x,): (T,)) -> (T,) {
        (self.0.eval(x),)
    }
}

/// Shared body of the float unary kernels
///
/// The output dtype is the working type. It is validated before the input
/// is converted, so an unsupported output fails without touching anything.
fn float_unary<F: FloatFn>(
    op: KernelOp,
    f: F,
    x: &Tensor<CpuRuntime>,
    out: &Tensor<CpuRuntime>,
) -> Result<()> {
    check_devices_compatible(&[x, out])?;
    let dtype = out.dtype();
    DTypeCategory::FloatingPoint.check(dtype, op.name())?;

    let x = detach_input(x.as_type(dtype)?, &[out])?;
    tracing::trace!(%op, %dtype, numel = out.numel(), "dispatch");
    dispatch_float!(dtype, T => {
        elementwise::<(T,), (T,), _>(&FloatMap(f), &[&x], &[out])
    }, op.name())
}

// ============================================================================
// Kernels
// ============================================================================

/// Native `pow(array, array)`: numeric, working type = output dtype
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuPowKernel;

impl BinaryKernel<CpuRuntime> for CpuPowKernel {
    fn call(
        &self,
        x1: &Tensor<CpuRuntime>,
        x2: &Tensor<CpuRuntime>,
        out: &Tensor<CpuRuntime>,
    ) -> Result<()> {
        check_devices_compatible(&[x1, x2, out])?;
        let dtype = out.dtype();
        DTypeCategory::Numeric.check(dtype, "pow")?;

        let x1 = detach_input(x1.as_type(dtype)?, &[out])?;
        let x2 = detach_input(x2.as_type(dtype)?, &[out])?;
        tracing::trace!(op = "pow", %dtype, numel = out.numel(), "dispatch");
        dispatch_numeric!(dtype, T => {
            elementwise::<(T, T), (T,), _>(&PowOp, &[&x1, &x2], &[out])
        }, "pow")
    }
}

/// Native `pow(array, scalar)`
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuPowArrayScalarKernel;

impl ArrayScalarKernel<CpuRuntime> for CpuPowArrayScalarKernel {
    fn call(&self, x1: &Tensor<CpuRuntime>, x2: Scalar, out: &Tensor<CpuRuntime>) -> Result<()> {
        check_devices_compatible(&[x1, out])?;
        let dtype = out.dtype();
        DTypeCategory::Numeric.check(dtype, "pow_array_scalar")?;

        let x1 = detach_input(x1.as_type(dtype)?, &[out])?;
        tracing::trace!(op = "pow_array_scalar", %dtype, exp = %x2, "dispatch");
        dispatch_numeric!(dtype, T => {
            elementwise::<(T,), (T,), _>(&PowExpOp(x2.to::<T>()), &[&x1], &[out])
        }, "pow_array_scalar")
    }
}

/// Native `pow(scalar, array)`
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuPowScalarArrayKernel;

impl ScalarArrayKernel<CpuRuntime> for CpuPowScalarArrayKernel {
    fn call(&self, x1: Scalar, x2: &Tensor<CpuRuntime>, out: &Tensor<CpuRuntime>) -> Result<()> {
        check_devices_compatible(&[x2, out])?;
        let dtype = out.dtype();
        DTypeCategory::Numeric.check(dtype, "pow_scalar_array")?;

        let x2 = detach_input(x2.as_type(dtype)?, &[out])?;
        tracing::trace!(op = "pow_scalar_array", %dtype, base = %x1, "dispatch");
        dispatch_numeric!(dtype, T => {
            elementwise::<(T,), (T,), _>(&PowBaseOp(x1.to::<T>()), &[&x2], &[out])
        }, "pow_scalar_array")
    }
}

/// Native `square`: floating point, working type = output dtype
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuSquareKernel;

impl UnaryKernel<CpuRuntime> for CpuSquareKernel {
    fn call(&self, x: &Tensor<CpuRuntime>, out: &Tensor<CpuRuntime>) -> Result<()> {
        float_unary(KernelOp::Square, SquareFn, x, out)
    }
}

/// Native `sqrt`: floating point, input converted to the output dtype
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuSqrtKernel;

impl UnaryKernel<CpuRuntime> for CpuSqrtKernel {
    fn call(&self, x: &Tensor<CpuRuntime>, out: &Tensor<CpuRuntime>) -> Result<()> {
        float_unary(KernelOp::Sqrt, SqrtFn, x, out)
    }
}

/// Native `ceil`: floating point, input converted to the output dtype
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuCeilKernel;

impl UnaryKernel<CpuRuntime> for CpuCeilKernel {
    fn call(&self, x: &Tensor<CpuRuntime>, out: &Tensor<CpuRuntime>) -> Result<()> {
        float_unary(KernelOp::Ceil, CeilFn, x, out)
    }
}

/// Native `floor`: floating point, input converted to the output dtype
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuFloorKernel;

impl UnaryKernel<CpuRuntime> for CpuFloorKernel {
    fn call(&self, x: &Tensor<CpuRuntime>, out: &Tensor<CpuRuntime>) -> Result<()> {
        float_unary(KernelOp::Floor, FloorFn, x, out)
    }
}
