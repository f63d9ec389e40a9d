//! Kernel identities, kernel traits and the kernel registry
//!
//! A kernel is identified by the pair `(KernelOp, backend)`, where the
//! backend is [`Runtime::name`]. Each kernel implements exactly one of the
//! signature traits below and is stored in the registry behind an `Arc`.
//!
//! ```text
//! KernelRegistryBuilder::register::<R>(op, entry)   (startup)
//!                  │ build()
//!                  ▼
//! KernelRegistry::lookup::<R>(op) ──► KernelEntry<R> ──► call(...)
//! ```

mod registry;

pub use registry::{KernelRegistry, KernelRegistryBuilder};

use crate::dtype::Scalar;
use crate::error::Result;
use crate::runtime::Runtime;
use crate::tensor::Tensor;
use std::fmt;
use std::sync::Arc;

/// Operation half of a kernel's identity
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum KernelOp {
    /// `out = x1 ^ x2`
    Pow,
    /// `out = x1 ^ s`
    PowArrayScalar,
    /// `out = s ^ x2`
    PowScalarArray,
    /// `out = x * x`
    Square,
    /// `out = sqrt(x)`
    Sqrt,
    /// `out = isnan(x)`
    IsNan,
    /// `out = isinf(x)`
    IsInf,
    /// `out = isfinite(x)`
    IsFinite,
    /// `out = ceil(x)`
    Ceil,
    /// `out = floor(x)`
    Floor,
}

impl KernelOp {
    /// Every operation, in registration order
    pub const ALL: [KernelOp; 10] = [
        Self::Pow,
        Self::PowArrayScalar,
        Self::PowScalarArray,
        Self::Square,
        Self::Sqrt,
        Self::IsNan,
        Self::IsInf,
        Self::IsFinite,
        Self::Ceil,
        Self::Floor,
    ];

    /// Stable operation name, used in error messages and logs
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pow => "pow",
            Self::PowArrayScalar => "pow_array_scalar",
            Self::PowScalarArray => "pow_scalar_array",
            Self::Square => "square",
            Self::Sqrt => "sqrt",
            Self::IsNan => "isnan",
            Self::IsInf => "isinf",
            Self::IsFinite => "isfinite",
            Self::Ceil => "ceil",
            Self::Floor => "floor",
        }
    }

    /// Call shape every kernel for this operation must have
    pub const fn signature(self) -> KernelSignature {
        match self {
            Self::Pow => KernelSignature::Binary,
            Self::PowArrayScalar => KernelSignature::ArrayScalar,
            Self::PowScalarArray => KernelSignature::ScalarArray,
            Self::Square
            | Self::Sqrt
            | Self::IsNan
            | Self::IsInf
            | Self::IsFinite
            | Self::Ceil
            | Self::Floor => KernelSignature::Unary,
        }
    }
}

impl fmt::Display for KernelOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Call shape of a kernel
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum KernelSignature {
    /// `(array, array) -> out`
    Binary,
    /// `(array, scalar) -> out`
    ArrayScalar,
    /// `(scalar, array) -> out`
    ScalarArray,
    /// `(array) -> out`
    Unary,
}

impl fmt::Display for KernelSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Binary => "binary",
            Self::ArrayScalar => "array-scalar",
            Self::ScalarArray => "scalar-array",
            Self::Unary => "unary",
        })
    }
}

// ============================================================================
// Kernel traits
// ============================================================================

/// Kernel taking two arrays
pub trait BinaryKernel<R: Runtime>: Send + Sync {
    /// Compute into the caller-allocated `out`
    fn call(&self, x1: &Tensor<R>, x2: &Tensor<R>, out: &Tensor<R>) -> Result<()>;
}

/// Kernel taking an array and a scalar
pub trait ArrayScalarKernel<R: Runtime>: Send + Sync {
    /// Compute into the caller-allocated `out`
    fn call(&self, x1: &Tensor<R>, x2: Scalar, out: &Tensor<R>) -> Result<()>;
}

/// Kernel taking a scalar and an array
pub trait ScalarArrayKernel<R: Runtime>: Send + Sync {
    /// Compute into the caller-allocated `out`
    fn call(&self, x1: Scalar, x2: &Tensor<R>, out: &Tensor<R>) -> Result<()>;
}

/// Kernel taking one array
pub trait UnaryKernel<R: Runtime>: Send + Sync {
    /// Compute into the caller-allocated `out`
    fn call(&self, x: &Tensor<R>, out: &Tensor<R>) -> Result<()>;
}

/// A registered kernel, tagged by call shape
pub enum KernelEntry<R: Runtime> {
    /// Two-array kernel
    Binary(Arc<dyn BinaryKernel<R>>),
    /// Array-scalar kernel
    ArrayScalar(Arc<dyn ArrayScalarKernel<R>>),
    /// Scalar-array kernel
    ScalarArray(Arc<dyn ScalarArrayKernel<R>>),
    /// One-array kernel
    Unary(Arc<dyn UnaryKernel<R>>),
}

impl<R: Runtime> KernelEntry<R> {
    /// Wrap a two-array kernel
    pub fn binary(kernel: impl BinaryKernel<R> + 'static) -> Self {
        Self::Binary(Arc::new(kernel))
    }

    /// Wrap an array-scalar kernel
    pub fn array_scalar(kernel: impl ArrayScalarKernel<R> + 'static) -> Self {
        Self::ArrayScalar(Arc::new(kernel))
    }

    /// Wrap a scalar-array kernel
    pub fn scalar_array(kernel: impl ScalarArrayKernel<R> + 'static) -> Self {
        Self::ScalarArray(Arc::new(kernel))
    }

    /// Wrap a one-array kernel
    pub fn unary(kernel: impl UnaryKernel<R> + 'static) -> Self {
        Self::Unary(Arc::new(kernel))
    }

    /// Call shape of the wrapped kernel
    pub fn signature(&self) -> KernelSignature {
        match self {
            Self::Binary(_) => KernelSignature::Binary,
            Self::ArrayScalar(_) => KernelSignature::ArrayScalar,
            Self::ScalarArray(_) => KernelSignature::ScalarArray,
            Self::Unary(_) => KernelSignature::Unary,
        }
    }
}

impl<R: Runtime> Clone for KernelEntry<R> {
    fn clone(&self) -> Self {
        match self {
            Self::Binary(k) => Self::Binary(Arc::clone(k)),
            Self::ArrayScalar(k) => Self::ArrayScalar(Arc::clone(k)),
            Self::ScalarArray(k) => Self::ScalarArray(Arc::clone(k)),
            Self::Unary(k) => Self::Unary(Arc::clone(k)),
        }
    }
}

impl<R: Runtime> fmt::Debug for KernelEntry<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KernelEntry({}, {})", self.signature(), R::name())
    }
}
