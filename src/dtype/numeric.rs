//! Scalar numeric primitives used by the elementwise kernels
//!
//! Floating point types follow IEEE 754: NaN propagates, `sqrt` of a negative
//! value is NaN, `ceil`/`floor` keep the sign of zero and return NaN/Inf
//! unchanged. Half types compute in f32 and round back.
//!
//! Integer `pow` never traps: it wraps on overflow, and a negative exponent
//! yields the truncated reciprocal (0 unless the base is 1 or -1, 0 for a
//! zero base).

use super::Element;
use half::{bf16, f16};

/// Elements that participate in `Numeric` category operations
pub trait NumericElement: Element {
    /// `self` raised to the power `exp`
    fn pow(self, exp: Self) -> Self;
}

/// Elements that participate in `FloatingPoint` category operations
pub trait FloatElement: NumericElement {
    /// Principal square root
    fn sqrt(self) -> Self;

    /// Smallest integral value not less than `self`
    fn ceil(self) -> Self;

    /// Largest integral value not greater than `self`
    fn floor(self) -> Self;

    /// `self * self` in the element's own precision
    fn square(self) -> Self;
}

// ============================================================================
// Floats
// ============================================================================

macro_rules! impl_native_float {
    ($t:ty) => {
        impl NumericElement for $t {
            #[inline]
            fn pow(self, exp: Self) -> Self {
                self.powf(exp)
            }
        }

        impl FloatElement for $t {
            #[inline]
            fn sqrt(self) -> Self {
                <$t>::sqrt(self)
            }

            #[inline]
            fn ceil(self) -> Self {
                <$t>::ceil(self)
            }

            #[inline]
            fn floor(self) -> Self {
                <$t>::floor(self)
            }

            #[inline]
            fn square(self) -> Self {
                self * self
            }
        }
    };
}

impl_native_float!(f64);
impl_native_float!(f32);

macro_rules! impl_half_float {
    ($t:ty) => {
        impl NumericElement for $t {
            #[inline]
            fn pow(self, exp: Self) -> Self {
                <$t>::from_f32(self.to_f32().powf(exp.to_f32()))
            }
        }

        impl FloatElement for $t {
            #[inline]
            fn sqrt(self) -> Self {
                <$t>::from_f32(self.to_f32().sqrt())
            }

            #[inline]
            fn ceil(self) -> Self {
                <$t>::from_f32(self.to_f32().ceil())
            }

            #[inline]
            fn floor(self) -> Self {
                <$t>::from_f32(self.to_f32().floor())
            }

            #[inline]
            fn square(self) -> Self {
                self * self
            }
        }
    };
}

impl_half_float!(f16);
impl_half_float!(bf16);

// ============================================================================
// Integers
// ============================================================================

macro_rules! impl_unsigned_pow {
    ($t:ty) => {
        impl NumericElement for $t {
            #[inline]
            fn pow(self, exp: Self) -> Self {
                let mut base = self;
                let mut exp = exp;
                let mut acc: $t = 1;
                while exp > 0 {
                    if exp & 1 == 1 {
                        acc = acc.wrapping_mul(base);
                    }
                    base = base.wrapping_mul(base);
                    exp >>= 1;
                }
                acc
            }
        }
    };
}

impl_unsigned_pow!(u64);
impl_unsigned_pow!(u32);
impl_unsigned_pow!(u16);
impl_unsigned_pow!(u8);

macro_rules! impl_signed_pow {
    ($t:ty) => {
        impl NumericElement for $t {
            #[inline]
            fn pow(self, exp: Self) -> Self {
                if exp < 0 {
                    return match self {
                        1 => 1,
                        -1 => {
                            if exp & 1 == 0 {
                                1
                            } else {
                                -1
                            }
                        }
                        _ => 0,
                    };
                }
                let mut base = self;
                let mut exp = exp;
                let mut acc: $t = 1;
                while exp > 0 {
                    if exp & 1 == 1 {
                        acc = acc.wrapping_mul(base);
                    }
                    base = base.wrapping_mul(base);
                    exp >>= 1;
                }
                acc
            }
        }
    };
}

impl_signed_pow!(i64);
impl_signed_pow!(i32);
impl_signed_pow!(i16);
impl_signed_pow!(i8);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_pow() {
        assert_eq!(NumericElement::pow(2.0f64, 10.0), 1024.0);
        assert_eq!(NumericElement::pow(4.0f32, 0.5), 2.0);
        assert!(NumericElement::pow(-8.0f64, 0.5).is_nan());
        assert_eq!(NumericElement::pow(f64::NAN, 0.0), 1.0);
        assert_eq!(
            NumericElement::pow(f16::from_f32(3.0), f16::from_f32(2.0)),
            f16::from_f32(9.0)
        );
    }

    #[test]
    fn test_int_pow() {
        assert_eq!(NumericElement::pow(2i32, 0), 1);
        assert_eq!(NumericElement::pow(2i32, 10), 1024);
        assert_eq!(NumericElement::pow(-3i64, 3), -27);
        assert_eq!(NumericElement::pow(3u8, 4), 81);
        assert_eq!(NumericElement::pow(0u32, 0), 1);
        // wraps instead of panicking
        assert_eq!(NumericElement::pow(2u8, 8), 0);
        assert_eq!(NumericElement::pow(2i8, 7), i8::MIN);
    }

    #[test]
    fn test_int_pow_negative_exponent() {
        assert_eq!(NumericElement::pow(2i32, -1), 0);
        assert_eq!(NumericElement::pow(1i32, -5), 1);
        assert_eq!(NumericElement::pow(-1i16, -3), -1);
        assert_eq!(NumericElement::pow(-1i16, -4), 1);
        assert_eq!(NumericElement::pow(0i64, -2), 0);
    }

    #[test]
    fn test_float_rounding() {
        assert_eq!(FloatElement::ceil(1.5f64), 2.0);
        assert_eq!(FloatElement::ceil(-1.5f64), -1.0);
        assert_eq!(FloatElement::floor(-1.5f32), -2.0);
        assert!(FloatElement::ceil(-0.5f64).is_sign_negative());
        assert_eq!(FloatElement::floor(f64::INFINITY), f64::INFINITY);
        assert!(FloatElement::floor(f64::NAN).is_nan());
        assert_eq!(FloatElement::floor(bf16::from_f32(-2.5)), bf16::from_f32(-3.0));
    }

    #[test]
    fn test_float_sqrt_and_square() {
        assert_eq!(FloatElement::sqrt(9.0f64), 3.0);
        assert!(FloatElement::sqrt(-1.0f32).is_nan());
        assert_eq!(FloatElement::square(-3.0f32), 9.0);
        assert_eq!(FloatElement::sqrt(f16::from_f32(16.0)), f16::from_f32(4.0));
    }
}
