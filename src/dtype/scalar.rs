//! Scalar operand for array/scalar operations

use super::Element;
use std::fmt;

/// Conceptual kind of a [`Scalar`]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// Boolean value
    Bool,
    /// Integral value
    Integral,
    /// Floating point value
    Floating,
}

/// A single numeric value plus its kind
///
/// Kernels convert a `Scalar` to their working element type once, at
/// dispatch time, and capture the converted value in the per-element functor.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Scalar {
    /// Boolean value
    Bool(bool),
    /// Integral value
    Int(i64),
    /// Floating point value
    Float(f64),
}

impl Scalar {
    /// The conceptual kind of this scalar
    #[inline]
    pub const fn kind(self) -> ScalarKind {
        match self {
            Self::Bool(_) => ScalarKind::Bool,
            Self::Int(_) => ScalarKind::Integral,
            Self::Float(_) => ScalarKind::Floating,
        }
    }

    /// Convert to a concrete element type
    ///
    /// Integral scalars convert to integer types with `as` (wrapping)
    /// semantics and keep full 64-bit precision; everything else goes
    /// through f64.
    #[inline]
    pub fn to<T: Element>(self) -> T {
        match self {
            Self::Bool(b) => T::from_f64(if b { 1.0 } else { 0.0 }),
            Self::Int(v) => T::from_i64(v),
            Self::Float(v) => T::from_f64(v),
        }
    }

    /// The value as f64
    #[inline]
    pub fn to_f64(self) -> f64 {
        match self {
            Self::Bool(b) => {
                if b {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Int(v) => v as f64,
            Self::Float(v) => v,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

macro_rules! impl_scalar_from_int {
    ($($t:ty),+) => {
        $(
            impl From<$t> for Scalar {
                fn from(v: $t) -> Self {
                    Self::Int(v as i64)
                }
            }
        )+
    };
}

impl_scalar_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Scalar {
    fn from(v: f32) -> Self {
        Self::Float(v as f64)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}
