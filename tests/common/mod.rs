//! Common test utilities
#![allow(dead_code)]

use elemx::context::Context;
use elemx::dtype::{DType, Element};
use elemx::runtime::cpu::{CpuDevice, CpuRuntime};
use elemx::tensor::Tensor;

/// Create a fresh native context and the default CPU device for testing
///
/// Each call builds its own registry, so tests never share kernel state.
pub fn create_cpu_context() -> (Context, CpuDevice) {
    let ctx = Context::native().expect("native registry");
    (ctx, CpuDevice::new())
}

/// Array on `device` from a slice
pub fn array<T: Element>(data: &[T], shape: &[usize], device: &CpuDevice) -> Tensor<CpuRuntime> {
    Tensor::<CpuRuntime>::from_slice(data, shape, device)
}

/// Zero-filled output on `device`
pub fn output(shape: &[usize], dtype: DType, device: &CpuDevice) -> Tensor<CpuRuntime> {
    Tensor::<CpuRuntime>::zeros(shape, dtype, device)
}

/// Output pre-filled with 7 so untouched elements are detectable
pub fn sentinel_output(shape: &[usize], dtype: DType, device: &CpuDevice) -> Tensor<CpuRuntime> {
    Tensor::<CpuRuntime>::full_scalar(shape, dtype, 7, device)
}

/// Assert two f64 slices are close within tolerance
///
/// Uses the formula: |a - b| <= atol + rtol * |b|
pub fn assert_allclose_f64(a: &[f64], b: &[f64], rtol: f64, atol: f64, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (x - y).abs();
        let tol = atol + rtol * y.abs();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}

/// Assert two f32 slices are close within tolerance
pub fn assert_allclose_f32(a: &[f32], b: &[f32], rtol: f32, atol: f32, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (x - y).abs();
        let tol = atol + rtol * y.abs();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}
