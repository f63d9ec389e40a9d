//! Typed dispatch over the closed dtype set
//!
//! Each macro takes a runtime `DType` and executes a code block with `T` bound
//! to the corresponding Rust element type. Exactly one arm runs per call.
//! Dtypes outside the macro's category return
//! `Error::UnsupportedDType { dtype, op }` from the enclosing function before
//! the body is entered.
//!
//! | Macro               | Category        | Admits                          |
//! |---------------------|-----------------|---------------------------------|
//! | `dispatch_any!`     | `Any`           | every dtype, bool included      |
//! | `dispatch_numeric!` | `Numeric`       | floats and integers             |
//! | `dispatch_float!`   | `FloatingPoint` | `f64`, `f32`, `f16`, `bf16`     |
//!
//! Every arm is spelled out (no `_` fallback), so adding a `DType` variant is
//! a compile error here until each category decides what to do with it.
//!
//! # Usage
//!
//! ```ignore
//! fn my_operation(dtype: DType) -> Result<usize> {
//!     dispatch_float!(dtype, T => {
//!         Ok(std::mem::size_of::<T>())
//!     }, "my_operation")
//! }
//! ```

/// Dispatch over every dtype (`DTypeCategory::Any`).
#[macro_export]
macro_rules! dispatch_any {
    ($dtype:expr, $T:ident => $body:block, $error_op:expr) => {
        match $dtype {
            $crate::dtype::DType::F64 => {
                type $T = f64;
                $body
            }
            $crate::dtype::DType::F32 => {
                type $T = f32;
                $body
            }
            $crate::dtype::DType::F16 => {
                type $T = $crate::dtype::f16;
                $body
            }
            $crate::dtype::DType::BF16 => {
                type $T = $crate::dtype::bf16;
                $body
            }
            $crate::dtype::DType::I64 => {
                type $T = i64;
                $body
            }
            $crate::dtype::DType::I32 => {
                type $T = i32;
                $body
            }
            $crate::dtype::DType::I16 => {
                type $T = i16;
                $body
            }
            $crate::dtype::DType::I8 => {
                type $T = i8;
                $body
            }
            $crate::dtype::DType::U64 => {
                type $T = u64;
                $body
            }
            $crate::dtype::DType::U32 => {
                type $T = u32;
                $body
            }
            $crate::dtype::DType::U16 => {
                type $T = u16;
                $body
            }
            $crate::dtype::DType::U8 => {
                type $T = u8;
                $body
            }
            $crate::dtype::DType::Bool => {
                type $T = bool;
                $body
            }
        }
    };
}

/// Dispatch over integers and floats (`DTypeCategory::Numeric`).
#[macro_export]
macro_rules! dispatch_numeric {
    ($dtype:expr, $T:ident => $body:block, $error_op:expr) => {
        match $dtype {
            $crate::dtype::DType::F64 => {
                type $T = f64;
                $body
            }
            $crate::dtype::DType::F32 => {
                type $T = f32;
                $body
            }
            $crate::dtype::DType::F16 => {
                type $T = $crate::dtype::f16;
                $body
            }
            $crate::dtype::DType::BF16 => {
                type $T = $crate::dtype::bf16;
                $body
            }
            $crate::dtype::DType::I64 => {
                type $T = i64;
                $body
            }
            $crate::dtype::DType::I32 => {
                type $T = i32;
                $body
            }
            $crate::dtype::DType::I16 => {
                type $T = i16;
                $body
            }
            $crate::dtype::DType::I8 => {
                type $T = i8;
                $body
            }
            $crate::dtype::DType::U64 => {
                type $T = u64;
                $body
            }
            $crate::dtype::DType::U32 => {
                type $T = u32;
                $body
            }
            $crate::dtype::DType::U16 => {
                type $T = u16;
                $body
            }
            $crate::dtype::DType::U8 => {
                type $T = u8;
                $body
            }
            unsupported @ $crate::dtype::DType::Bool => {
                return Err($crate::error::Error::UnsupportedDType {
                    dtype: unsupported,
                    op: $error_op,
                });
            }
        }
    };
}

/// Dispatch over floating point dtypes (`DTypeCategory::FloatingPoint`).
#[macro_export]
macro_rules! dispatch_float {
    ($dtype:expr, $T:ident => $body:block, $error_op:expr) => {
        match $dtype {
            $crate::dtype::DType::F64 => {
                type $T = f64;
                $body
            }
            $crate::dtype::DType::F32 => {
                type $T = f32;
                $body
            }
            $crate::dtype::DType::F16 => {
                type $T = $crate::dtype::f16;
                $body
            }
            $crate::dtype::DType::BF16 => {
                type $T = $crate::dtype::bf16;
                $body
            }
            unsupported @ ($crate::dtype::DType::I64
            | $crate::dtype::DType::I32
            | $crate::dtype::DType::I16
            | $crate::dtype::DType::I8
            | $crate::dtype::DType::U64
            | $crate::dtype::DType::U32
            | $crate::dtype::DType::U16
            | $crate::dtype::DType::U8
            | $crate::dtype::DType::Bool) => {
                return Err($crate::error::Error::UnsupportedDType {
                    dtype: unsupported,
                    op: $error_op,
                });
            }
        }
    };
}
