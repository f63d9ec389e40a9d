//! Kernel registry: registration at startup, read-only lookup afterwards

use super::{
    ArrayScalarKernel, BinaryKernel, KernelEntry, KernelOp, KernelSignature, ScalarArrayKernel,
    UnaryKernel,
};
use crate::error::{Error, Result};
use crate::runtime::Runtime;
use std::any::Any;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, OnceLock};

type Key = (KernelOp, &'static str);
type Slot = Box<dyn Any + Send + Sync>;

/// Process-wide registry holding the native kernels
static GLOBAL: OnceLock<Arc<KernelRegistry>> = OnceLock::new();

/// Mutable registry used during the registration phase
///
/// Consumed by [`build`](Self::build), so lookups can only happen on a
/// fully registered, immutable [`KernelRegistry`].
#[derive(Default)]
pub struct KernelRegistryBuilder {
    entries: HashMap<Key, Slot>,
}

impl KernelRegistryBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `entry` as the kernel for `(op, R::name())`
    ///
    /// # Errors
    ///
    /// - `DuplicateRegistration` if that pair already has a kernel; the
    ///   existing kernel is kept
    /// - `InvalidArgument` if the entry's call shape is not the one `op`
    ///   requires
    pub fn register<R: Runtime>(&mut self, op: KernelOp, entry: KernelEntry<R>) -> Result<()> {
        let backend = R::name();
        if entry.signature() != op.signature() {
            return Err(Error::invalid_argument(
                "entry",
                format!(
                    "'{op}' needs a {} kernel, got a {} kernel",
                    op.signature(),
                    entry.signature()
                ),
            ));
        }

        let key = (op, backend);
        if self.entries.contains_key(&key) {
            return Err(Error::DuplicateRegistration {
                op,
                backend: backend.to_string(),
            });
        }

        tracing::debug!(%op, backend, "registering kernel");
        self.entries.insert(key, Box::new(entry));
        Ok(())
    }

    /// Freeze the registrations into a read-only registry
    pub fn build(self) -> KernelRegistry {
        tracing::debug!(kernels = self.entries.len(), "kernel registry frozen");
        KernelRegistry {
            entries: self.entries,
        }
    }
}

/// Read-only map from `(KernelOp, backend)` to kernel
///
/// Safe to share across threads; nothing can be registered once built.
pub struct KernelRegistry {
    entries: HashMap<Key, Slot>,
}

impl KernelRegistry {
    /// Start a new registration phase
    pub fn builder() -> KernelRegistryBuilder {
        KernelRegistryBuilder::new()
    }

    /// Build a fresh registry holding every native CPU kernel
    pub fn native() -> Result<Self> {
        let mut builder = Self::builder();
        crate::runtime::cpu::kernels::register_native_kernels(&mut builder)?;
        Ok(builder.build())
    }

    /// The process-wide native registry, built on first use
    ///
    /// # Panics
    ///
    /// Panics if native registration fails, which only happens if two native
    /// kernels claim the same operation.
    pub fn global() -> Arc<Self> {
        GLOBAL
            .get_or_init(|| match Self::native() {
                Ok(registry) => Arc::new(registry),
                Err(e) => panic!("native kernel registration failed: {e}"),
            })
            .clone()
    }

    /// Find the kernel for `(op, R::name())`
    ///
    /// # Errors
    ///
    /// `KernelNotFound` if nothing is registered for the pair.
    pub fn lookup<R: Runtime>(&self, op: KernelOp) -> Result<&KernelEntry<R>> {
        let backend = R::name();
        let entry = self
            .entries
            .get(&(op, backend))
            .and_then(|slot| slot.downcast_ref::<KernelEntry<R>>());

        tracing::trace!(%op, backend, found = entry.is_some(), "kernel lookup");
        entry.ok_or_else(|| Error::KernelNotFound {
            op,
            backend: backend.to_string(),
        })
    }

    /// Look up a two-array kernel
    pub fn binary<R: Runtime>(&self, op: KernelOp) -> Result<Arc<dyn BinaryKernel<R>>> {
        match self.lookup::<R>(op)? {
            KernelEntry::Binary(k) => Ok(Arc::clone(k)),
            other => Err(wrong_signature(op, KernelSignature::Binary, other.signature())),
        }
    }

    /// Look up an array-scalar kernel
    pub fn array_scalar<R: Runtime>(&self, op: KernelOp) -> Result<Arc<dyn ArrayScalarKernel<R>>> {
        match self.lookup::<R>(op)? {
            KernelEntry::ArrayScalar(k) => Ok(Arc::clone(k)),
            other => Err(wrong_signature(
                op,
                KernelSignature::ArrayScalar,
                other.signature(),
            )),
        }
    }

    /// Look up a scalar-array kernel
    pub fn scalar_array<R: Runtime>(&self, op: KernelOp) -> Result<Arc<dyn ScalarArrayKernel<R>>> {
        match self.lookup::<R>(op)? {
            KernelEntry::ScalarArray(k) => Ok(Arc::clone(k)),
            other => Err(wrong_signature(
                op,
                KernelSignature::ScalarArray,
                other.signature(),
            )),
        }
    }

    /// Look up a one-array kernel
    pub fn unary<R: Runtime>(&self, op: KernelOp) -> Result<Arc<dyn UnaryKernel<R>>> {
        match self.lookup::<R>(op)? {
            KernelEntry::Unary(k) => Ok(Arc::clone(k)),
            other => Err(wrong_signature(op, KernelSignature::Unary, other.signature())),
        }
    }

    /// Whether a kernel is registered for `(op, backend)`
    pub fn contains(&self, op: KernelOp, backend: &str) -> bool {
        self.entries
            .keys()
            .any(|&(k_op, k_backend)| k_op == op && k_backend == backend)
    }

    /// Number of registered kernels
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no kernels
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names of every backend with at least one kernel, sorted
    pub fn backends(&self) -> Vec<&'static str> {
        self.entries
            .keys()
            .map(|&(_, backend)| backend)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl std::fmt::Debug for KernelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KernelRegistry")
            .field("kernels", &self.entries.len())
            .field("backends", &self.backends())
            .finish()
    }
}

fn wrong_signature(op: KernelOp, wanted: KernelSignature, found: KernelSignature) -> Error {
    Error::invalid_argument(
        "op",
        format!("'{op}' is registered as a {found} kernel, not {wanted}"),
    )
}
