//! CPU device implementation

use crate::runtime::Device;

/// CPU device
///
/// All CPU devices share host memory, but each index is treated as its own
/// memory space: arrays on `cpu:0` and `cpu:1` never meet in one kernel call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CpuDevice {
    id: usize,
}

impl CpuDevice {
    /// Create the default CPU device (`cpu:0`)
    pub fn new() -> Self {
        Self { id: 0 }
    }

    /// Create the CPU device with the given index
    pub fn with_index(id: usize) -> Self {
        Self { id }
    }
}

impl Device for CpuDevice {
    fn id(&self) -> usize {
        self.id
    }

    fn name(&self) -> String {
        format!("cpu:{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_identity() {
        assert!(CpuDevice::new().is_same(&CpuDevice::default()));
        assert!(!CpuDevice::new().is_same(&CpuDevice::with_index(1)));
        assert_eq!(CpuDevice::with_index(3).name(), "cpu:3");
    }
}
