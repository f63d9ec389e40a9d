//! Device compatibility check run at the start of every kernel

use super::{Device, Runtime};
use crate::error::{Error, Result};
use crate::tensor::Tensor;

/// Verify that every array lives on the same device as the first one
///
/// Only devices are compared. Dtypes and shapes are validated later by the
/// dispatch and iteration stages. An empty or single-element list always
/// passes.
///
/// # Errors
///
/// `Error::DeviceMismatch` naming the first array's device and the first
/// device that differs from it.
pub fn check_devices_compatible<R: Runtime>(arrays: &[&Tensor<R>]) -> Result<()> {
    let Some((first, rest)) = arrays.split_first() else {
        return Ok(());
    };

    let expected = first.device();
    for array in rest {
        let got = array.device();
        if !expected.is_same(got) {
            return Err(Error::DeviceMismatch {
                expected: expected.name(),
                got: got.name(),
            });
        }
    }

    Ok(())
}
