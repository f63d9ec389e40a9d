//! Data type system for elemx arrays
//!
//! This module provides the closed `DType` enumeration, the operation
//! categories used by the typed dispatch resolver, the `Element` trait tying
//! Rust types to dtypes, and the `Scalar` operand type.

mod dispatch;
mod element;
mod numeric;
mod scalar;

pub use element::Element;
pub use half::{bf16, f16};
pub use numeric::{FloatElement, NumericElement};
pub use scalar::{Scalar, ScalarKind};

use crate::error::{Error, Result};
use std::fmt;

// ============================================================================
// DType Enum
// ============================================================================

/// Element types supported by elemx arrays
///
/// The set is closed: every dispatch macro matches on it exhaustively, so a
/// new variant does not compile until each operation category handles it.
///
/// # Discriminant Values
///
/// - Floats: 0-9 (F64=0, F32=1, F16=2, BF16=3)
/// - Signed ints: 10-19 (I64=10, I32=11, I16=12, I8=13)
/// - Unsigned ints: 20-29 (U64=20, U32=21, U16=22, U8=23)
/// - Bool: 30
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DType {
    /// 64-bit floating point
    F64 = 0,
    /// 32-bit floating point
    F32 = 1,
    /// 16-bit floating point (IEEE 754 binary16)
    F16 = 2,
    /// 16-bit brain floating point
    BF16 = 3,

    /// 64-bit signed integer
    I64 = 10,
    /// 32-bit signed integer
    I32 = 11,
    /// 16-bit signed integer
    I16 = 12,
    /// 8-bit signed integer
    I8 = 13,

    /// 64-bit unsigned integer
    U64 = 20,
    /// 32-bit unsigned integer
    U32 = 21,
    /// 16-bit unsigned integer
    U16 = 22,
    /// 8-bit unsigned integer
    U8 = 23,

    /// Boolean, stored as one byte holding 0 or 1
    Bool = 30,
}

impl DType {
    /// Every dtype, floats first
    pub const ALL: [DType; 13] = [
        Self::F64,
        Self::F32,
        Self::F16,
        Self::BF16,
        Self::I64,
        Self::I32,
        Self::I16,
        Self::I8,
        Self::U64,
        Self::U32,
        Self::U16,
        Self::U8,
        Self::Bool,
    ];

    /// Size of one element in bytes
    #[inline]
    pub const fn size_in_bytes(self) -> usize {
        match self {
            Self::F64 | Self::I64 | Self::U64 => 8,
            Self::F32 | Self::I32 | Self::U32 => 4,
            Self::F16 | Self::BF16 | Self::I16 | Self::U16 => 2,
            Self::I8 | Self::U8 | Self::Bool => 1,
        }
    }

    /// Returns true if this is a floating point type
    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F64 | Self::F32 | Self::F16 | Self::BF16)
    }

    /// Returns true if this is a signed integer type
    #[inline]
    pub const fn is_signed_int(self) -> bool {
        matches!(self, Self::I64 | Self::I32 | Self::I16 | Self::I8)
    }

    /// Returns true if this is an unsigned integer type
    #[inline]
    pub const fn is_unsigned_int(self) -> bool {
        matches!(self, Self::U64 | Self::U32 | Self::U16 | Self::U8)
    }

    /// Returns true if this is any integer type (signed or unsigned)
    #[inline]
    pub const fn is_int(self) -> bool {
        self.is_signed_int() || self.is_unsigned_int()
    }

    /// Returns true if this is a boolean type
    #[inline]
    pub const fn is_bool(self) -> bool {
        matches!(self, Self::Bool)
    }

    /// Returns true for integers and floats (everything except bool)
    #[inline]
    pub const fn is_numeric(self) -> bool {
        self.is_float() || self.is_int()
    }

    /// Short name for display (e.g., "f32", "i64")
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::F64 => "f64",
            Self::F32 => "f32",
            Self::F16 => "f16",
            Self::BF16 => "bf16",
            Self::I64 => "i64",
            Self::I32 => "i32",
            Self::I16 => "i16",
            Self::I8 => "i8",
            Self::U64 => "u64",
            Self::U32 => "u32",
            Self::U16 => "u16",
            Self::U8 => "u8",
            Self::Bool => "bool",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

/// Set of dtypes for efficient membership testing
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DTypeSet {
    bits: u64,
}

impl DTypeSet {
    /// Empty set
    pub const EMPTY: Self = Self { bits: 0 };

    /// All floating point types
    pub const FLOATS: Self = Self {
        bits: (1 << DType::F64 as u8)
            | (1 << DType::F32 as u8)
            | (1 << DType::F16 as u8)
            | (1 << DType::BF16 as u8),
    };

    /// All signed integer types
    pub const SIGNED_INTS: Self = Self {
        bits: (1 << DType::I64 as u8)
            | (1 << DType::I32 as u8)
            | (1 << DType::I16 as u8)
            | (1 << DType::I8 as u8),
    };

    /// All unsigned integer types
    pub const UNSIGNED_INTS: Self = Self {
        bits: (1 << DType::U64 as u8)
            | (1 << DType::U32 as u8)
            | (1 << DType::U16 as u8)
            | (1 << DType::U8 as u8),
    };

    /// All integer types
    pub const INTS: Self = Self {
        bits: Self::SIGNED_INTS.bits | Self::UNSIGNED_INTS.bits,
    };

    /// All numeric types (floats + ints)
    pub const NUMERIC: Self = Self {
        bits: Self::FLOATS.bits | Self::INTS.bits,
    };

    /// Every dtype
    pub const ALL: Self = Self {
        bits: Self::NUMERIC.bits | (1 << DType::Bool as u8),
    };

    /// Create a set containing a single dtype
    #[inline]
    pub const fn single(dtype: DType) -> Self {
        Self {
            bits: 1 << dtype as u8,
        }
    }

    /// Check if the set contains a dtype
    #[inline]
    pub const fn contains(self, dtype: DType) -> bool {
        self.bits & (1 << dtype as u8) != 0
    }

    /// Union of two sets
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Intersection of two sets
    #[inline]
    pub const fn intersection(self, other: Self) -> Self {
        Self {
            bits: self.bits & other.bits,
        }
    }

    /// Check if set is empty
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }
}

// ============================================================================
// Operation categories
// ============================================================================

/// Dtype constraint an operation places on its working type
///
/// The typed dispatch macros (`dispatch_any!`, `dispatch_numeric!`,
/// `dispatch_float!`) each implement one of these categories.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DTypeCategory {
    /// Every dtype, bool included
    Any,
    /// Integers and floats, bool excluded
    Numeric,
    /// Floating point widths only
    FloatingPoint,
}

impl DTypeCategory {
    /// The dtypes admitted by this category
    #[inline]
    pub const fn dtypes(self) -> DTypeSet {
        match self {
            Self::Any => DTypeSet::ALL,
            Self::Numeric => DTypeSet::NUMERIC,
            Self::FloatingPoint => DTypeSet::FLOATS,
        }
    }

    /// Whether `dtype` satisfies this category
    #[inline]
    pub const fn contains(self, dtype: DType) -> bool {
        self.dtypes().contains(dtype)
    }

    /// Fail with `UnsupportedDType` unless `dtype` satisfies this category
    pub fn check(self, dtype: DType, op: &'static str) -> Result<()> {
        if self.contains(dtype) {
            Ok(())
        } else {
            Err(Error::unsupported_dtype(dtype, op))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dtype_size() {
        assert_eq!(DType::F64.size_in_bytes(), 8);
        assert_eq!(DType::F32.size_in_bytes(), 4);
        assert_eq!(DType::F16.size_in_bytes(), 2);
        assert_eq!(DType::BF16.size_in_bytes(), 2);
        assert_eq!(DType::I8.size_in_bytes(), 1);
        assert_eq!(DType::Bool.size_in_bytes(), 1);
    }

    #[test]
    fn test_dtype_categories() {
        assert!(DType::F32.is_float());
        assert!(!DType::I32.is_float());
        assert!(DType::I32.is_signed_int());
        assert!(DType::U32.is_unsigned_int());
        assert!(!DType::Bool.is_numeric());
        assert!(DType::U8.is_numeric());
    }

    #[test]
    fn test_dtype_set() {
        assert!(DTypeSet::FLOATS.contains(DType::F32));
        assert!(!DTypeSet::FLOATS.contains(DType::I32));
        assert!(DTypeSet::INTS.contains(DType::I32));
        assert!(DTypeSet::NUMERIC.contains(DType::F32));
        assert!(!DTypeSet::NUMERIC.contains(DType::Bool));
        assert!(DTypeSet::ALL.contains(DType::Bool));
        assert!(DTypeSet::FLOATS.intersection(DTypeSet::INTS).is_empty());
    }

    #[test]
    fn test_all_is_exhaustive() {
        for dtype in DType::ALL {
            assert!(DTypeSet::ALL.contains(dtype));
        }
        assert_eq!(
            DType::ALL.iter().filter(|d| DTypeCategory::Numeric.contains(**d)).count(),
            12
        );
    }

    #[test]
    fn test_category_check() {
        assert!(DTypeCategory::FloatingPoint.check(DType::F16, "sqrt").is_ok());
        assert_eq!(
            DTypeCategory::FloatingPoint.check(DType::I64, "sqrt"),
            Err(Error::UnsupportedDType {
                dtype: DType::I64,
                op: "sqrt"
            })
        );
        assert!(DTypeCategory::Numeric.check(DType::Bool, "pow").is_err());
        assert!(DTypeCategory::Any.check(DType::Bool, "isnan").is_ok());
    }
}
