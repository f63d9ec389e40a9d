//! Integration tests for device and dtype rejection
//!
//! Every rejected call must leave its output untouched.

mod common;

use common::{array, create_cpu_context, output, sentinel_output};
use elemx::dtype::DType;
use elemx::error::Error;
use elemx::ops::{ClassifyOps, PowerOps, UnaryMathOps};
use elemx::runtime::cpu::CpuDevice;

#[test]
fn test_device_mismatch_on_unary() {
    let (ctx, device) = create_cpu_context();
    let other = CpuDevice::with_index(1);
    let x = array(&[4.0f64, 9.0], &[2], &other);
    let out = sentinel_output(&[2], DType::F64, &device);

    assert_eq!(
        ctx.sqrt(&x, &out),
        Err(Error::DeviceMismatch {
            expected: "cpu:1".to_string(),
            got: "cpu:0".to_string(),
        })
    );
    assert_eq!(out.to_vec::<f64>(), [7.0, 7.0]);
}

#[test]
fn test_device_mismatch_on_every_signature() {
    let (ctx, device) = create_cpu_context();
    let other = CpuDevice::with_index(3);
    let here = array(&[2i32, 3], &[2], &device);
    let there = array(&[2i32, 3], &[2], &other);
    let out = sentinel_output(&[2], DType::I32, &device);
    let mask = output(&[2], DType::Bool, &other);

    assert!(matches!(ctx.pow(&here, &there, &out), Err(Error::DeviceMismatch { .. })));
    assert!(matches!(
        ctx.pow_array_scalar(&there, 2, &out),
        Err(Error::DeviceMismatch { .. })
    ));
    assert!(matches!(
        ctx.pow_scalar_array(2, &there, &out),
        Err(Error::DeviceMismatch { .. })
    ));
    assert!(matches!(ctx.isinf(&here, &mask), Err(Error::DeviceMismatch { .. })));
    assert_eq!(out.to_vec::<i32>(), [7, 7]);
    assert_eq!(mask.to_vec::<bool>(), [false, false]);
}

#[test]
fn test_float_ops_reject_integer_outputs() {
    let (ctx, device) = create_cpu_context();
    let x = array(&[1.5f64, 2.5], &[2], &device);

    for dtype in [DType::I32, DType::U8, DType::I64, DType::Bool] {
        let out = sentinel_output(&[2], dtype, &device);
        let results = [
            ("square", ctx.square(&x, &out)),
            ("sqrt", ctx.sqrt(&x, &out)),
            ("ceil", ctx.ceil(&x, &out)),
            ("floor", ctx.floor(&x, &out)),
        ];
        for (op, result) in results {
            assert_eq!(result, Err(Error::UnsupportedDType { dtype, op }), "{op} {dtype}");
        }

        let before = sentinel_output(&[2], dtype, &device);
        assert_eq!(
            out.as_type(DType::F64).unwrap().to_vec::<f64>(),
            before.as_type(DType::F64).unwrap().to_vec::<f64>(),
        );
    }
}

#[test]
fn test_pow_rejects_bool_output() {
    let (ctx, device) = create_cpu_context();
    let x = array(&[true, false], &[2], &device);
    let out = output(&[2], DType::Bool, &device);

    assert_eq!(
        ctx.pow(&x, &x, &out),
        Err(Error::UnsupportedDType {
            dtype: DType::Bool,
            op: "pow",
        })
    );
    assert_eq!(
        ctx.pow_array_scalar(&x, 1, &out),
        Err(Error::UnsupportedDType {
            dtype: DType::Bool,
            op: "pow_array_scalar",
        })
    );
    assert_eq!(
        ctx.pow_scalar_array(1, &x, &out),
        Err(Error::UnsupportedDType {
            dtype: DType::Bool,
            op: "pow_scalar_array",
        })
    );
}

#[test]
fn test_classify_accepts_bool_input() {
    let (ctx, device) = create_cpu_context();
    let x = array(&[true, false], &[2], &device);
    let out = sentinel_output(&[2], DType::Bool, &device);

    ctx.isfinite(&x, &out).unwrap();
    assert_eq!(out.to_vec::<bool>(), [true, true]);
    ctx.isnan(&x, &out).unwrap();
    assert_eq!(out.to_vec::<bool>(), [false, false]);
}

#[test]
fn test_classify_requires_bool_output() {
    let (ctx, device) = create_cpu_context();
    let x = array(&[f64::NAN, 1.0], &[2], &device);
    let out = sentinel_output(&[2], DType::F64, &device);

    assert_eq!(
        ctx.isnan(&x, &out),
        Err(Error::DTypeMismatch {
            expected: DType::Bool,
            got: DType::F64,
        })
    );
    assert_eq!(out.to_vec::<f64>(), [7.0, 7.0]);
}

#[test]
fn test_shape_errors_leave_output_untouched() {
    let (ctx, device) = create_cpu_context();
    let x1 = array(&[2i64, 3, 4], &[3], &device);
    let x2 = array(&[1i64, 2], &[2], &device);
    let out = sentinel_output(&[3], DType::I64, &device);

    assert_eq!(
        ctx.pow(&x1, &x2, &out),
        Err(Error::BroadcastError {
            from: vec![2],
            to: vec![3],
        })
    );
    assert_eq!(out.to_vec::<i64>(), [7, 7, 7]);
}
