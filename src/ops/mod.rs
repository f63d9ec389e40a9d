//! Operation entry points
//!
//! Operations are defined as traits implemented by [`Context`]. Each call
//! resolves `(op, R::name())` in the context's registry and runs the kernel
//! into a caller-allocated output.
//!
//! ```text
//! Context
//!   ├── PowerOps<R>     pow, pow_array_scalar, pow_scalar_array
//!   ├── UnaryMathOps<R> square, sqrt, ceil, floor
//!   └── ClassifyOps<R>  isnan, isinf, isfinite
//! ```
//!
//! [`Context`]: crate::Context

mod classify;
mod power;
mod unary;

pub use classify::ClassifyOps;
pub use power::PowerOps;
pub use unary::UnaryMathOps;
