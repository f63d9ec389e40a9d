//! Runtime backends for array computation
//!
//! This module defines the `Runtime` and `Device` traits and provides the
//! native CPU implementation.
//!
//! # Architecture
//!
//! ```text
//! Runtime (backend identity, memory transfer)
//! └── Device (identifies one memory space on that backend)
//! ```
//!
//! The backend name returned by [`Runtime::name`] is the backend half of a
//! kernel's identity in the [`KernelRegistry`](crate::kernel::KernelRegistry).

mod check;
pub mod cpu;

pub use check::check_devices_compatible;

use crate::error::Result;

/// Core trait for compute backends
///
/// `Runtime` abstracts over different compute devices.
/// It uses static dispatch via generics for zero-cost abstraction.
///
/// # Example
///
/// ```ignore
/// let device = CpuRuntime::default_device();
/// let ptr = CpuRuntime::allocate(1024, &device)?;
/// // ... use memory ...
/// CpuRuntime::deallocate(ptr, 1024, &device);
/// ```
pub trait Runtime: Clone + Send + Sync + 'static {
    /// Device identifier type
    type Device: Device;

    /// Human-readable name of this runtime, also its registry key
    fn name() -> &'static str;

    /// Allocate zero-initialized device memory
    ///
    /// Returns a device pointer (u64), or 0 for a zero-byte request.
    /// Returns `Err(OutOfMemory)` if allocation fails.
    fn allocate(size_bytes: usize, device: &Self::Device) -> Result<u64>;

    /// Deallocate device memory
    fn deallocate(ptr: u64, size_bytes: usize, device: &Self::Device);

    /// Copy data from host to device
    fn copy_to_device(src: &[u8], dst: u64, device: &Self::Device) -> Result<()>;

    /// Copy data from device to host
    fn copy_from_device(src: u64, dst: &mut [u8], device: &Self::Device) -> Result<()>;

    /// Get the default device
    fn default_device() -> Self::Device;
}

/// Trait for device identification
pub trait Device: Clone + Send + Sync + std::fmt::Debug + 'static {
    /// Unique identifier for this device
    fn id(&self) -> usize;

    /// Check if two devices are the same memory space
    fn is_same(&self, other: &Self) -> bool {
        self.id() == other.id()
    }

    /// Human-readable name
    fn name(&self) -> String {
        format!("Device({})", self.id())
    }
}
