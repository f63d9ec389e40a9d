//! NaN / Inf / finite classification kernels

use crate::dispatch_any;
use crate::dtype::Element;
use crate::error::Result;
use crate::kernel::{KernelOp, UnaryKernel};
use crate::runtime::check_devices_compatible;
use crate::runtime::cpu::CpuRuntime;
use crate::runtime::cpu::elementwise::{ElementwiseOp, detach_input, elementwise};
use crate::tensor::Tensor;

/// A per-element predicate over any dtype
trait Classify: Copy + Sync {
    fn test<T: Element>(self, x: T) -> bool;
}

#[derive(Clone, Copy)]
struct NanTest;

impl Classify for NanTest {
    #[inline]
    fn test<T: Element>(self, x: T) -> bool {
        x.is_nan()
    }
}

#[derive(Clone, Copy)]
struct InfTest;

impl Classify for InfTest {
    #[inline]
    fn test<T: Element>(self, x: T) -> bool {
        x.is_inf()
    }
}

#[derive(Clone, Copy)]
struct FiniteTest;

impl Classify for FiniteTest {
    #[inline]
    fn test<T: Element>(self, x: T) -> bool {
        x.is_finite()
    }
}

struct ClassifyMap<C>(C);

impl<T: Element, C: Classify> ElementwiseOp<(T,), (bool,)> for ClassifyMap<C> {
    #[inline]
    fn apply(&self, _: usize, (x,): (T,)) -> (bool,) {
        (self.0.test(x),)
    }
}

/// Shared body of the classification kernels
///
/// Dispatches on the input dtype (every dtype is accepted) and writes a
/// bool output; a non-bool output is rejected by the engine.
fn classify<C: Classify>(
    op: KernelOp,
    c: C,
    x: &Tensor<CpuRuntime>,
    out: &Tensor<CpuRuntime>,
) -> Result<()> {
    check_devices_compatible(&[x, out])?;
    let dtype = x.dtype();
    let x = detach_input(x.clone(), &[out])?;
    tracing::trace!(%op, %dtype, numel = out.numel(), "dispatch");
    dispatch_any!(dtype, T => {
        elementwise::<(T,), (bool,), _>(&ClassifyMap(c), &[&x], &[out])
    }, op.name())
}

/// Native `isnan`
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuIsNanKernel;

impl UnaryKernel<CpuRuntime> for CpuIsNanKernel {
    fn call(&self, x: &Tensor<CpuRuntime>, out: &Tensor<CpuRuntime>) -> Result<()> {
        classify(KernelOp::IsNan, NanTest, x, out)
    }
}

/// Native `isinf`
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuIsInfKernel;

impl UnaryKernel<CpuRuntime> for CpuIsInfKernel {
    fn call(&self, x: &Tensor<CpuRuntime>, out: &Tensor<CpuRuntime>) -> Result<()> {
        classify(KernelOp::IsInf, InfTest, x, out)
    }
}

/// Native `isfinite`
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuIsFiniteKernel;

impl UnaryKernel<CpuRuntime> for CpuIsFiniteKernel {
    fn call(&self, x: &Tensor<CpuRuntime>, out: &Tensor<CpuRuntime>) -> Result<()> {
        classify(KernelOp::IsFinite, FiniteTest, x, out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtype::DType;
    use crate::error::Error;
    use crate::runtime::cpu::CpuDevice;

    #[test]
    fn test_classify_float() {
        let device = CpuDevice::new();
        let x = Tensor::<CpuRuntime>::from_slice(
            &[1.0f32, f32::NAN, f32::INFINITY, f32::NEG_INFINITY],
            &[4],
            &device,
        );
        let out = Tensor::<CpuRuntime>::zeros(&[4], DType::Bool, &device);

        CpuIsNanKernel.call(&x, &out).unwrap();
        assert_eq!(out.to_vec::<bool>(), [false, true, false, false]);
        CpuIsInfKernel.call(&x, &out).unwrap();
        assert_eq!(out.to_vec::<bool>(), [false, false, true, true]);
        CpuIsFiniteKernel.call(&x, &out).unwrap();
        assert_eq!(out.to_vec::<bool>(), [true, false, false, false]);
    }

    #[test]
    fn test_classify_integers_and_bool() {
        let device = CpuDevice::new();
        let ints = Tensor::<CpuRuntime>::from_slice(&[i8::MIN, 0, i8::MAX], &[3], &device);
        let flags = Tensor::<CpuRuntime>::from_slice(&[true, false, true], &[3], &device);
        let out = Tensor::<CpuRuntime>::zeros(&[3], DType::Bool, &device);

        CpuIsFiniteKernel.call(&ints, &out).unwrap();
        assert_eq!(out.to_vec::<bool>(), [true, true, true]);
        CpuIsNanKernel.call(&flags, &out).unwrap();
        assert_eq!(out.to_vec::<bool>(), [false, false, false]);
    }

    #[test]
    fn test_classify_requires_bool_output() {
        let device = CpuDevice::new();
        let x = Tensor::<CpuRuntime>::from_slice(&[1.0f64], &[1], &device);
        let out = Tensor::<CpuRuntime>::zeros(&[1], DType::F64, &device);
        assert_eq!(
            CpuIsNanKernel.call(&x, &out),
            Err(Error::DTypeMismatch {
                expected: DType::Bool,
                got: DType::F64,
            })
        );
    }
}
