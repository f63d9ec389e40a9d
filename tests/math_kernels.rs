//! Integration tests for the native math and classification kernels

mod common;

use common::{array, assert_allclose_f32, assert_allclose_f64, create_cpu_context, output};
use elemx::dtype::{DType, DTypeCategory, Scalar, bf16, f16};
use elemx::ops::{ClassifyOps, PowerOps, UnaryMathOps};
use elemx::runtime::cpu::CpuRuntime;
use elemx::tensor::Tensor;

const SAMPLES: [f64; 10] = [
    0.0,
    -0.0,
    1.5,
    -2.25,
    3.0,
    1e6,
    f64::NAN,
    f64::INFINITY,
    f64::NEG_INFINITY,
    -7.0,
];

// ============================================================================
// Documented examples
// ============================================================================

#[test]
fn test_sqrt_example() {
    let (ctx, device) = create_cpu_context();
    let x = array(&[1.0f64, 4.0, 9.0], &[3], &device);
    let out = output(&[3], DType::F64, &device);

    ctx.sqrt(&x, &out).unwrap();
    assert_eq!(out.to_vec::<f64>(), [1.0, 2.0, 3.0]);
}

#[test]
fn test_ceil_floor_example() {
    let (ctx, device) = create_cpu_context();
    let x = array(&[1.5f32, -1.5, 2.0], &[3], &device);
    let out = output(&[3], DType::F32, &device);

    ctx.ceil(&x, &out).unwrap();
    assert_eq!(out.to_vec::<f32>(), [2.0, -1.0, 2.0]);

    ctx.floor(&x, &out).unwrap();
    assert_eq!(out.to_vec::<f32>(), [1.0, -2.0, 2.0]);
}

#[test]
fn test_classify_example() {
    let (ctx, device) = create_cpu_context();
    let x = array(&[f64::NAN, f64::INFINITY, 1.0], &[3], &device);
    let out = output(&[3], DType::Bool, &device);

    ctx.isnan(&x, &out).unwrap();
    assert_eq!(out.to_vec::<bool>(), [true, false, false]);

    ctx.isinf(&x, &out).unwrap();
    assert_eq!(out.to_vec::<bool>(), [false, true, false]);

    ctx.isfinite(&x, &out).unwrap();
    assert_eq!(out.to_vec::<bool>(), [false, false, true]);
}

#[test]
fn test_pow_scalar_base_example() {
    let (ctx, device) = create_cpu_context();
    let x2 = array(&[0i32, 1, 3], &[3], &device);
    let out = output(&[3], DType::I32, &device);

    ctx.pow_scalar_array(2, &x2, &out).unwrap();
    assert_eq!(out.to_vec::<i32>(), [1, 2, 8]);
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_isfinite_is_not_nan_or_inf_for_every_dtype() {
    let (ctx, device) = create_cpu_context();
    let source = array(&SAMPLES, &[SAMPLES.len()], &device);

    for dtype in DType::ALL {
        let x = source.as_type(dtype).unwrap();
        let nan = output(&[SAMPLES.len()], DType::Bool, &device);
        let inf = output(&[SAMPLES.len()], DType::Bool, &device);
        let finite = output(&[SAMPLES.len()], DType::Bool, &device);

        ctx.isnan(&x, &nan).unwrap();
        ctx.isinf(&x, &inf).unwrap();
        ctx.isfinite(&x, &finite).unwrap();

        let nan = nan.to_vec::<bool>();
        let inf = inf.to_vec::<bool>();
        for (i, f) in finite.to_vec::<bool>().into_iter().enumerate() {
            assert_eq!(f, !(nan[i] || inf[i]), "{dtype} element {i}");
        }

        if !dtype.is_float() {
            assert!(nan.iter().chain(&inf).all(|&flag| !flag), "{dtype} is never NaN/Inf");
        }
    }
}

#[test]
fn test_sqrt_of_square_is_abs() {
    let (ctx, device) = create_cpu_context();
    let values = [0.0f64, -0.5, 1.25, -3.0, 17.5, -100.0];
    let expected: Vec<f64> = values.iter().map(|v| v.abs()).collect();
    let source = array(&values, &[values.len()], &device);

    for (dtype, rtol) in [
        (DType::F64, 1e-15),
        (DType::F32, 1e-6),
        (DType::F16, 1e-2),
        (DType::BF16, 2e-2),
    ] {
        let x = source.as_type(dtype).unwrap();
        let squared = output(&[values.len()], dtype, &device);
        let root = output(&[values.len()], dtype, &device);

        ctx.square(&x, &squared).unwrap();
        ctx.sqrt(&squared, &root).unwrap();

        let root = root.as_type(DType::F64).unwrap().to_vec::<f64>();
        assert_allclose_f64(&root, &expected, rtol, 0.0, dtype.short_name());
    }
}

#[test]
fn test_ceil_and_floor_bracket_input() {
    let (ctx, device) = create_cpu_context();
    let values = [-2.5f64, -1.0, -0.25, 0.0, 0.75, 3.0, 41.999, 1e10];
    let x = array(&values, &[values.len()], &device);
    let ceil = output(&[values.len()], DType::F64, &device);
    let floor = output(&[values.len()], DType::F64, &device);

    ctx.ceil(&x, &ceil).unwrap();
    ctx.floor(&x, &floor).unwrap();

    let ceil = ceil.to_vec::<f64>();
    let floor = floor.to_vec::<f64>();
    for (i, &v) in values.iter().enumerate() {
        assert!(ceil[i] >= v && v >= floor[i], "element {i}");
        if v.fract() == 0.0 {
            assert_eq!(ceil[i], v);
            assert_eq!(floor[i], v);
        }
    }
}

#[test]
fn test_ceil_floor_keep_special_values() {
    let (ctx, device) = create_cpu_context();
    let x = array(&[-0.0f64, f64::INFINITY, f64::NEG_INFINITY, -0.5], &[4], &device);
    let out = output(&[4], DType::F64, &device);

    ctx.ceil(&x, &out).unwrap();
    let result = out.to_vec::<f64>();
    assert!(result[0] == 0.0 && result[0].is_sign_negative());
    assert_eq!(&result[1..3], &[f64::INFINITY, f64::NEG_INFINITY]);
    assert!(result[3] == 0.0 && result[3].is_sign_negative());
}

#[test]
fn test_pow_variants_agree() {
    let (ctx, device) = create_cpu_context();

    for dtype in DType::ALL
        .into_iter()
        .filter(|&d| DTypeCategory::Numeric.contains(d))
    {
        let bases = array(&[0.0f64, 1.0, 2.0, 3.0, 5.0], &[5], &device)
            .as_type(dtype)
            .unwrap();
        let s = Scalar::Int(3);
        let uniform = Tensor::<CpuRuntime>::full_scalar(&[5], dtype, s, &device);

        let via_arrays = output(&[5], dtype, &device);
        let via_scalar_exp = output(&[5], dtype, &device);
        ctx.pow(&bases, &uniform, &via_arrays).unwrap();
        ctx.pow_array_scalar(&bases, s, &via_scalar_exp).unwrap();
        assert_eq!(
            via_arrays.as_type(DType::F64).unwrap().to_vec::<f64>(),
            via_scalar_exp.as_type(DType::F64).unwrap().to_vec::<f64>(),
            "{dtype}: pow vs pow_array_scalar"
        );

        let exps = array(&[0.0f64, 1.0, 2.0, 3.0, 4.0], &[5], &device)
            .as_type(dtype)
            .unwrap();
        let via_arrays = output(&[5], dtype, &device);
        let via_scalar_base = output(&[5], dtype, &device);
        ctx.pow(&uniform, &exps, &via_arrays).unwrap();
        ctx.pow_scalar_array(s, &exps, &via_scalar_base).unwrap();
        assert_eq!(
            via_arrays.as_type(DType::F64).unwrap().to_vec::<f64>(),
            via_scalar_base.as_type(DType::F64).unwrap().to_vec::<f64>(),
            "{dtype}: pow vs pow_scalar_array"
        );
    }
}

// ============================================================================
// Dtype behavior
// ============================================================================

#[test]
fn test_integer_pow_negative_exponent() {
    let (ctx, device) = create_cpu_context();
    let bases = array(&[2i64, 1, -1, -1, 0, 5], &[6], &device);
    let exps = array(&[-1i64, -5, -3, -2, 0, 0], &[6], &device);
    let out = output(&[6], DType::I64, &device);

    ctx.pow(&bases, &exps, &out).unwrap();
    assert_eq!(out.to_vec::<i64>(), [0, 1, -1, 1, 1, 1]);
}

#[test]
fn test_unsigned_pow_wraps() {
    let (ctx, device) = create_cpu_context();
    let x = array(&[2u8, 3, 16], &[3], &device);
    let out = output(&[3], DType::U8, &device);

    ctx.pow_array_scalar(&x, 2, &out).unwrap();
    assert_eq!(out.to_vec::<u8>(), [4, 9, 0]);
}

#[test]
fn test_float_pow_special_values() {
    let (ctx, device) = create_cpu_context();
    let x = array(&[-8.0f64, 0.0, f64::NAN, 4.0], &[4], &device);
    let out = output(&[4], DType::F64, &device);

    ctx.pow_array_scalar(&x, 0.5, &out).unwrap();
    let result = out.to_vec::<f64>();
    assert!(result[0].is_nan());
    assert_eq!(result[1], 0.0);
    assert!(result[2].is_nan());
    assert_eq!(result[3], 2.0);

    ctx.pow_array_scalar(&x, 0, &out).unwrap();
    assert_eq!(out.to_vec::<f64>(), [1.0, 1.0, 1.0, 1.0]);
}

#[test]
fn test_sqrt_negative_is_nan() {
    let (ctx, device) = create_cpu_context();
    let x = array(&[-1.0f32, f32::INFINITY, 0.25], &[3], &device);
    let out = output(&[3], DType::F32, &device);

    ctx.sqrt(&x, &out).unwrap();
    let result = out.to_vec::<f32>();
    assert!(result[0].is_nan());
    assert_eq!(&result[1..], &[f32::INFINITY, 0.5]);
}

#[test]
fn test_half_precision_kernels() {
    let (ctx, device) = create_cpu_context();
    let x = array(
        &[f16::from_f32(2.5), f16::from_f32(-0.5), f16::from_f32(9.0)],
        &[3],
        &device,
    );
    let out = output(&[3], DType::F16, &device);

    ctx.floor(&x, &out).unwrap();
    assert_eq!(
        out.to_vec::<f16>(),
        [f16::from_f32(2.0), f16::from_f32(-1.0), f16::from_f32(9.0)]
    );

    let b = array(&[bf16::from_f32(16.0), bf16::from_f32(0.25)], &[2], &device);
    let out = output(&[2], DType::BF16, &device);
    ctx.sqrt(&b, &out).unwrap();
    assert_eq!(out.to_vec::<bf16>(), [bf16::from_f32(4.0), bf16::from_f32(0.5)]);
}

#[test]
fn test_input_cast_to_output_dtype() {
    let (ctx, device) = create_cpu_context();

    // Integer input, float output: the input is converted before dispatch
    let x = array(&[1i32, 4, 10], &[3], &device);
    let out = output(&[3], DType::F32, &device);
    ctx.sqrt(&x, &out).unwrap();
    assert_allclose_f32(&out.to_vec::<f32>(), &[1.0, 2.0, 3.1622777], 1e-6, 0.0, "sqrt i32->f32");

    // Float input, float output of a different width
    let x = array(&[1.25f64, -2.5], &[2], &device);
    let out = output(&[2], DType::F32, &device);
    ctx.square(&x, &out).unwrap();
    assert_eq!(out.to_vec::<f32>(), [1.5625, 6.25]);

    // Float inputs, integer pow output: inputs are truncated first
    let base = array(&[2.9f64, 3.1], &[2], &device);
    let exp = array(&[2.0f32, 3.0], &[2], &device);
    let out = output(&[2], DType::I16, &device);
    ctx.pow(&base, &exp, &out).unwrap();
    assert_eq!(out.to_vec::<i16>(), [4, 27]);
}

#[test]
fn test_pow_mixed_64bit_integers_exact() {
    let (ctx, device) = create_cpu_context();
    let big = (1u64 << 53) + 1;

    let base = array(&[big, 3], &[2], &device);
    let exp = array(&[1i64, 2], &[2], &device);
    let out = output(&[2], DType::I64, &device);
    ctx.pow(&base, &exp, &out).unwrap();
    assert_eq!(out.to_vec::<i64>(), [big as i64, 9]);

    // -1 wraps to u64::MAX on the way to the output dtype
    let base = array(&[-1i64, 2], &[2], &device);
    let exp = array(&[1u64, 10], &[2], &device);
    let out = output(&[2], DType::U64, &device);
    ctx.pow(&base, &exp, &out).unwrap();
    assert_eq!(out.to_vec::<u64>(), [u64::MAX, 1024]);
}
