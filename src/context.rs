//! Explicit execution context
//!
//! A [`Context`] carries the kernel registry that operation entry points
//! resolve kernels from. Contexts are cheap to clone and share one frozen
//! registry.

use crate::error::Result;
use crate::kernel::KernelRegistry;
use std::sync::Arc;

/// Execution context threading a kernel registry through operation calls
///
/// # Example
///
/// ```
/// use elemx::prelude::*;
///
/// let ctx = Context::global();
/// let device = CpuDevice::new();
/// let x = Tensor::<CpuRuntime>::from_slice(&[4.0f64, 9.0], &[2], &device);
/// let out = Tensor::<CpuRuntime>::zeros(&[2], DType::F64, &device);
/// ctx.sqrt(&x, &out).unwrap();
/// assert_eq!(out.to_vec::<f64>(), [2.0, 3.0]);
/// ```
#[derive(Clone, Debug)]
pub struct Context {
    registry: Arc<KernelRegistry>,
}

impl Context {
    /// Create a context over an existing registry
    pub fn new(registry: Arc<KernelRegistry>) -> Self {
        Self { registry }
    }

    /// Create a context with its own freshly built native registry
    pub fn native() -> Result<Self> {
        Ok(Self::new(Arc::new(KernelRegistry::native()?)))
    }

    /// Create a context sharing the process-wide native registry
    pub fn global() -> Self {
        Self::new(KernelRegistry::global())
    }

    /// The registry kernels are looked up in
    #[inline]
    pub fn registry(&self) -> &KernelRegistry {
        &self.registry
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::global()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::KernelOp;

    #[test]
    fn test_global_contexts_share_registry() {
        let a = Context::global();
        let b = Context::default();
        assert!(Arc::ptr_eq(&a.registry, &b.registry));
        assert_eq!(a.registry().len(), KernelOp::ALL.len());
    }

    #[test]
    fn test_native_context_is_independent() {
        let a = Context::native().unwrap();
        let b = Context::global();
        assert!(!Arc::ptr_eq(&a.registry, &b.registry));
        assert!(a.registry().contains(KernelOp::Floor, "cpu"));
    }
}
