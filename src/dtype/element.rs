//! Element trait for mapping Rust types to DType

use super::DType;
use bytemuck::{NoUninit, Zeroable};
use half::{bf16, f16};
use std::fmt::Debug;

/// Trait for types that can be elements of an array
///
/// This trait connects Rust's type system to the runtime dtype system and
/// carries the classification primitives every dtype supports (`is_nan`,
/// `is_inf`). Arithmetic lives on [`NumericElement`](super::NumericElement)
/// and [`FloatElement`](super::FloatElement) so that each operation category
/// only sees the types it admits.
///
/// # Bounds
/// - `NoUninit + Zeroable` - Raw byte access to storage (bytemuck). `bool`
///   qualifies; storage for `DType::Bool` only ever holds 0 or 1.
/// - `PartialOrd` - Comparisons in tests and casts
pub trait Element:
    Copy + Clone + Send + Sync + NoUninit + Zeroable + PartialOrd + Debug + 'static
{
    /// The corresponding DType for this Rust type
    const DTYPE: DType;

    /// Convert to f64 (lossless for every type except 64-bit integers
    /// beyond 2^53)
    fn to_f64(self) -> f64;

    /// Convert from f64 with Rust `as` semantics (saturating, NaN → 0 for
    /// integers; `!= 0` for bool)
    fn from_f64(v: f64) -> Self;

    /// Convert to i64; integer types use `as` (wrapping) semantics, so a
    /// `u64` above `i64::MAX` comes back intact through [`Element::from_i64`]
    #[inline]
    fn to_i64(self) -> i64 {
        self.to_f64() as i64
    }

    /// Convert from i64; integer types use `as` (wrapping) semantics so no
    /// precision is lost above 2^53
    #[inline]
    fn from_i64(v: i64) -> Self {
        Self::from_f64(v as f64)
    }

    /// Zero value
    fn zero() -> Self;

    /// One value
    fn one() -> Self;

    /// True iff the value is not-a-number
    fn is_nan(self) -> bool;

    /// True iff the value is positive or negative infinity
    fn is_inf(self) -> bool;

    /// True iff the value is neither infinite nor not-a-number
    #[inline]
    fn is_finite(self) -> bool {
        !(self.is_inf() || self.is_nan())
    }
}

macro_rules! impl_element_float {
    ($t:ty, $dtype:expr) => {
        impl Element for $t {
            const DTYPE: DType = $dtype;

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn from_f64(v: f64) -> Self {
                v as $t
            }

            #[inline]
            fn zero() -> Self {
                0.0
            }

            #[inline]
            fn one() -> Self {
                1.0
            }

            #[inline]
            fn is_nan(self) -> bool {
                <$t>::is_nan(self)
            }

            #[inline]
            fn is_inf(self) -> bool {
                <$t>::is_infinite(self)
            }
        }
    };
}

impl_element_float!(f64, DType::F64);
impl_element_float!(f32, DType::F32);

macro_rules! impl_element_int {
    ($t:ty, $dtype:expr) => {
        impl Element for $t {
            const DTYPE: DType = $dtype;

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn from_f64(v: f64) -> Self {
                v as $t
            }

            #[inline]
            fn to_i64(self) -> i64 {
                self as i64
            }

            #[inline]
            fn from_i64(v: i64) -> Self {
                v as $t
            }

            #[inline]
            fn zero() -> Self {
                0
            }

            #[inline]
            fn one() -> Self {
                1
            }

            #[inline]
            fn is_nan(self) -> bool {
                false
            }

            #[inline]
            fn is_inf(self) -> bool {
                false
            }
        }
    };
}

impl_element_int!(i64, DType::I64);
impl_element_int!(i32, DType::I32);
impl_element_int!(i16, DType::I16);
impl_element_int!(i8, DType::I8);
impl_element_int!(u64, DType::U64);
impl_element_int!(u32, DType::U32);
impl_element_int!(u16, DType::U16);
impl_element_int!(u8, DType::U8);

// ============================================================================
// Half-precision floating point types
// ============================================================================

macro_rules! impl_element_half {
    ($t:ty, $dtype:expr) => {
        impl Element for $t {
            const DTYPE: DType = $dtype;

            #[inline]
            fn to_f64(self) -> f64 {
                <$t>::to_f64(self)
            }

            #[inline]
            fn from_f64(v: f64) -> Self {
                <$t>::from_f64(v)
            }

            #[inline]
            fn zero() -> Self {
                <$t>::ZERO
            }

            #[inline]
            fn one() -> Self {
                <$t>::ONE
            }

            #[inline]
            fn is_nan(self) -> bool {
                <$t>::is_nan(self)
            }

            #[inline]
            fn is_inf(self) -> bool {
                <$t>::is_infinite(self)
            }
        }
    };
}

impl_element_half!(f16, DType::F16);
impl_element_half!(bf16, DType::BF16);

// ============================================================================
// Bool
// ============================================================================

impl Element for bool {
    const DTYPE: DType = DType::Bool;

    #[inline]
    fn to_f64(self) -> f64 {
        if self { 1.0 } else { 0.0 }
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v != 0.0
    }

    #[inline]
    fn to_i64(self) -> i64 {
        self as i64
    }

    #[inline]
    fn from_i64(v: i64) -> Self {
        v != 0
    }

    #[inline]
    fn zero() -> Self {
        false
    }

    #[inline]
    fn one() -> Self {
        true
    }

    #[inline]
    fn is_nan(self) -> bool {
        false
    }

    #[inline]
    fn is_inf(self) -> bool {
        false
    }
}
