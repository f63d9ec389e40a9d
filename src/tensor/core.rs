//! Core Tensor type

use super::{Layout, Storage};
use crate::dtype::{DType, Element, Scalar};
use crate::error::{Error, Result};
use crate::runtime::Runtime;
use std::fmt;

/// N-dimensional array stored on a compute device
///
/// `Tensor` is the array abstraction every kernel consumes. It consists of:
/// - **Storage**: Reference-counted device memory
/// - **Layout**: Shape, strides, and offset defining the view into storage
/// - **DType**: Element type (determined at runtime)
///
/// # Zero-Copy Views
///
/// `transpose`, `broadcast_to`, `flip`, `narrow` and `reshape` create new
/// tensors that share the same underlying storage. Kernels write into
/// caller-allocated outputs through these handles, so writes through one
/// view are visible through every other view of the same storage.
///
/// # Example
///
/// ```
/// use elemx::prelude::*;
///
/// let device = CpuDevice::new();
/// let a = Tensor::<CpuRuntime>::from_slice(&[1.0f32, 2.0, 3.0, 4.0], &[2, 2], &device);
/// let b = a.transpose(-1, -2).unwrap(); // Zero-copy, shares storage with a
/// assert_eq!(b.to_vec::<f32>(), [1.0, 3.0, 2.0, 4.0]);
/// ```
pub struct Tensor<R: Runtime> {
    /// Device memory
    storage: Storage<R>,
    /// Shape, strides, offset
    layout: Layout,
}

impl<R: Runtime> Tensor<R> {
    /// Create a tensor from storage and layout
    ///
    /// Returns an error if the layout addresses elements outside the storage.
    pub fn from_parts(storage: Storage<R>, layout: Layout) -> Result<Self> {
        if checked_numel(layout.shape())? > 0 {
            let in_bounds = offset_bounds(&layout)
                .is_some_and(|(lo, hi)| lo >= 0 && hi < storage.len() as isize);
            if !in_bounds {
                return Err(Error::invalid_argument(
                    "layout",
                    format!("{layout:?} addresses elements outside storage of {}", storage.len()),
                ));
            }
        }
        Ok(Self { storage, layout })
    }

    /// Create a tensor from a slice of data
    ///
    /// # Panics
    ///
    /// Panics if `data.len()` does not equal the product of the `shape` dimensions.
    /// For a fallible alternative, use [`Self::try_from_slice`].
    pub fn from_slice<T: Element>(data: &[T], shape: &[usize], device: &R::Device) -> Self {
        Self::try_from_slice(data, shape, device).expect("Tensor::from_slice failed")
    }

    /// Create a tensor from a slice of data (fallible version)
    ///
    /// Returns an error if `data.len()` does not equal the product of the `shape` dimensions,
    /// or if memory allocation fails.
    pub fn try_from_slice<T: Element>(
        data: &[T],
        shape: &[usize],
        device: &R::Device,
    ) -> Result<Self> {
        let expected_len = checked_numel(shape)?;
        if data.len() != expected_len {
            return Err(Error::ShapeMismatch {
                expected: shape.to_vec(),
                got: vec![data.len()],
            });
        }

        Ok(Self {
            storage: Storage::from_slice(data, device)?,
            layout: Layout::contiguous(shape),
        })
    }

    /// Create a zero-initialized tensor, typically used as a kernel output
    pub fn empty(shape: &[usize], dtype: DType, device: &R::Device) -> Self {
        Self::try_empty(shape, dtype, device).expect("Tensor::empty failed")
    }

    /// Create a zero-initialized tensor (fallible version)
    pub fn try_empty(shape: &[usize], dtype: DType, device: &R::Device) -> Result<Self> {
        let len = checked_numel(shape)?;
        Ok(Self {
            storage: Storage::new(len, dtype, device)?,
            layout: Layout::contiguous(shape),
        })
    }

    /// Create a tensor filled with zeros
    pub fn zeros(shape: &[usize], dtype: DType, device: &R::Device) -> Self {
        Self::empty(shape, dtype, device)
    }

    /// Create a tensor filled with a scalar value
    ///
    /// The scalar is converted to the target dtype.
    pub fn full_scalar(
        shape: &[usize],
        dtype: DType,
        value: impl Into<Scalar>,
        device: &R::Device,
    ) -> Self {
        Self::try_full_scalar(shape, dtype, value, device).expect("Tensor::full_scalar failed")
    }

    /// Create a tensor filled with a scalar value (fallible version)
    pub fn try_full_scalar(
        shape: &[usize],
        dtype: DType,
        value: impl Into<Scalar>,
        device: &R::Device,
    ) -> Result<Self> {
        let value = value.into();
        let len = checked_numel(shape)?;

        let storage = crate::dispatch_any!(dtype, T => {
            Storage::from_slice(&vec![value.to::<T>(); len], device)?
        }, "full_scalar");

        Ok(Self {
            storage,
            layout: Layout::contiguous(shape),
        })
    }

    // ===== Accessors =====

    /// Get the storage
    #[inline]
    pub fn storage(&self) -> &Storage<R> {
        &self.storage
    }

    /// Get the layout
    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Get the shape
    #[inline]
    pub fn shape(&self) -> &[usize] {
        self.layout.shape()
    }

    /// Get the strides
    #[inline]
    pub fn strides(&self) -> &[isize] {
        self.layout.strides()
    }

    /// Get the number of dimensions (rank)
    #[inline]
    pub fn ndim(&self) -> usize {
        self.layout.ndim()
    }

    /// Get the total number of elements
    #[inline]
    pub fn numel(&self) -> usize {
        self.layout.elem_count()
    }

    /// Get the element type
    #[inline]
    pub fn dtype(&self) -> DType {
        self.storage.dtype()
    }

    /// Get the device
    #[inline]
    pub fn device(&self) -> &R::Device {
        self.storage.device()
    }

    /// Check if the tensor is contiguous in memory
    #[inline]
    pub fn is_contiguous(&self) -> bool {
        self.layout.is_contiguous()
    }

    /// Check if this is a scalar (0-dimensional tensor)
    #[inline]
    pub fn is_scalar(&self) -> bool {
        self.layout.is_scalar()
    }

    // ===== View Operations (Zero-Copy) =====

    fn view(&self, layout: Layout) -> Self {
        Self {
            storage: self.storage.clone(),
            layout,
        }
    }

    /// Transpose two dimensions (zero-copy)
    pub fn transpose(&self, dim0: isize, dim1: isize) -> Result<Self> {
        let new_layout = self.layout.transpose(dim0, dim1).ok_or_else(|| {
            Error::invalid_argument(
                "dim",
                format!("cannot swap dims {dim0} and {dim1} of a {}-d array", self.ndim()),
            )
        })?;
        Ok(self.view(new_layout))
    }

    /// Reshape to a new shape (zero-copy, contiguous tensors only)
    pub fn reshape(&self, shape: &[usize]) -> Result<Self> {
        if !self.is_contiguous() {
            return Err(Error::invalid_argument(
                "self",
                "reshape requires a contiguous tensor",
            ));
        }
        let new_layout = self
            .layout
            .reshape(shape)
            .ok_or_else(|| Error::shape_mismatch(self.shape(), shape))?;
        Ok(self.view(new_layout))
    }

    /// Broadcast to a target shape (zero-copy)
    ///
    /// The result has stride-0 dimensions and must only be read from.
    pub fn broadcast_to(&self, shape: &[usize]) -> Result<Self> {
        let new_layout = self
            .layout
            .broadcast_to(shape)
            .ok_or_else(|| Error::broadcast(self.shape(), shape))?;
        Ok(self.view(new_layout))
    }

    /// Reverse the element order along a dimension (zero-copy)
    pub fn flip(&self, dim: isize) -> Result<Self> {
        let new_layout = self.layout.flip(dim).ok_or_else(|| {
            Error::invalid_argument("dim", format!("{dim} out of range for {}-d array", self.ndim()))
        })?;
        Ok(self.view(new_layout))
    }

    /// Narrow a dimension to `length` elements starting at `start` (zero-copy)
    pub fn narrow(&self, dim: isize, start: usize, length: usize) -> Result<Self> {
        let new_layout = self.layout.narrow(dim, start, length).ok_or_else(|| {
            Error::invalid_argument(
                "dim",
                format!(
                    "cannot narrow dim {dim} of shape {:?} to {start}..{}",
                    self.shape(),
                    start + length
                ),
            )
        })?;
        Ok(self.view(new_layout))
    }

    // ===== Data Access =====

    /// Copy tensor data to a Vec on the host in logical row-major order
    ///
    /// # Panics
    ///
    /// Panics if `T` does not match the tensor's dtype.
    /// For a fallible alternative, use [`Self::try_to_vec`].
    pub fn to_vec<T: Element>(&self) -> Vec<T> {
        self.try_to_vec().expect("Tensor::to_vec failed")
    }

    /// Copy tensor data to a Vec on the host (fallible version)
    ///
    /// Works for any layout: strided, broadcast and flipped views are
    /// gathered into logical row-major order.
    pub fn try_to_vec<T: Element>(&self) -> Result<Vec<T>> {
        if T::DTYPE != self.dtype() {
            return Err(Error::DTypeMismatch {
                expected: self.dtype(),
                got: T::DTYPE,
            });
        }

        // Allocate with the alignment of T, then fill through a byte view.
        let mut raw = vec![T::zeroed(); self.storage.len()];
        // SAFETY: `raw` owns exactly `len * size_of::<T>()` initialized bytes,
        // and storage of dtype T::DTYPE only holds valid T bit patterns.
        let bytes = unsafe {
            std::slice::from_raw_parts_mut(
                raw.as_mut_ptr() as *mut u8,
                raw.len() * std::mem::size_of::<T>(),
            )
        };
        R::copy_from_device(self.storage.ptr(), bytes, self.storage.device())?;

        if self.is_contiguous() && self.numel() == raw.len() {
            return Ok(raw);
        }

        let numel = self.numel();
        let mut result = Vec::with_capacity(numel);
        if numel == 0 {
            return Ok(result);
        }

        let shape = self.shape();
        let strides = self.strides();
        let mut indices = vec![0usize; shape.len()];
        let mut offset = self.layout.offset() as isize;

        for _ in 0..numel {
            result.push(raw[offset as usize]);

            // Increment indices (row-major order)
            for dim in (0..shape.len()).rev() {
                indices[dim] += 1;
                offset += strides[dim];
                if indices[dim] < shape[dim] {
                    break;
                }
                offset -= strides[dim] * shape[dim] as isize;
                indices[dim] = 0;
            }
        }

        Ok(result)
    }

    /// Extract the value of a single-element tensor
    pub fn item<T: Element>(&self) -> Result<T> {
        if self.numel() != 1 {
            return Err(Error::ShapeMismatch {
                expected: vec![1],
                got: self.shape().to_vec(),
            });
        }
        Ok(self.try_to_vec::<T>()?[0])
    }
}

/// Element count of `shape`, rejecting shapes whose product overflows
fn checked_numel(shape: &[usize]) -> Result<usize> {
    shape
        .iter()
        .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
        .ok_or_else(|| {
            Error::invalid_argument("shape", format!("{shape:?} has more than usize::MAX elements"))
        })
}

/// Smallest and largest storage index a non-empty layout can address, or
/// `None` if they do not fit in `isize`
fn offset_bounds(layout: &Layout) -> Option<(isize, isize)> {
    let mut lo = isize::try_from(layout.offset()).ok()?;
    let mut hi = lo;
    for (&dim, &stride) in layout.shape().iter().zip(layout.strides()) {
        let span = isize::try_from(dim - 1).ok()?.checked_mul(stride)?;
        if span < 0 {
            lo = lo.checked_add(span)?;
        } else {
            hi = hi.checked_add(span)?;
        }
    }
    Some((lo, hi))
}

impl<R: Runtime> Clone for Tensor<R> {
    /// Clone creates a new tensor sharing the same storage (zero-copy)
    fn clone(&self) -> Self {
        self.view(self.layout.clone())
    }
}

impl<R: Runtime> fmt::Debug for Tensor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape())
            .field("dtype", &self.dtype())
            .field("device", self.device())
            .field("contiguous", &self.is_contiguous())
            .finish()
    }
}

impl<R: Runtime> fmt::Display for Tensor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tensor({:?}, dtype={})", self.shape(), self.dtype())
    }
}
