//! Generic elementwise iteration engine
//!
//! Every native kernel funnels into [`elementwise`]: it validates the
//! participating arrays, broadcasts the inputs to the output shape and calls
//! a per-element functor exactly once for every logical index.
//!
//! # Iteration order
//!
//! Logical indices are visited in row-major order (last dimension fastest)
//! and the flat row-major index is handed to the functor. Physical offsets
//! are tracked incrementally, so arbitrary strides (negative, or zero for
//! broadcast inputs) cost nothing extra per element.
//!
//! # Parallelism
//!
//! With the `rayon` feature, large iterations over contiguous outputs are
//! split into fixed-size chunks of the flat index range. Each chunk unravels
//! its starting index and iterates independently, so every output element is
//! still written by exactly one task.

use super::CpuRuntime;
use crate::dtype::{DType, Element};
use crate::error::{Error, Result};
use crate::tensor::{Layout, Strides, Tensor};
use smallvec::SmallVec;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Minimum element count before the iteration is split across threads
pub const PARALLEL_THRESHOLD: usize = 32 * 1024;

/// Elements per parallel task
pub const PARALLEL_CHUNK: usize = 8 * 1024;

/// Stack capacity for per-array bookkeeping (inputs + outputs)
const STACK_ARRAYS: usize = 4;

// ============================================================================
// Element tuples
// ============================================================================

/// Fixed-arity group of element types read from inputs or written to outputs
///
/// Implemented for `(A,)`, `(A, B)` and `(A, B, C)`.
pub trait ElementTuple: Copy + Send + Sync + 'static {
    /// Dtype expected at each position
    const DTYPES: &'static [DType];

    /// Number of arrays in the tuple
    const ARITY: usize = Self::DTYPES.len();

    /// Read one element from each array
    ///
    /// # Safety
    /// `bases[i]` must point to storage holding elements of `DTYPES[i]` and
    /// `offsets[i]` must address an element inside it.
    unsafe fn load(bases: &[usize], offsets: &[isize]) -> Self;

    /// Write one element to each array
    ///
    /// # Safety
    /// Same as [`ElementTuple::load`], and no other thread may access the
    /// addressed elements concurrently.
    unsafe fn store(self, bases: &[usize], offsets: &[isize]);
}

macro_rules! impl_element_tuple {
    ($(($T:ident, $idx:tt)),+) => {
        impl<$($T: Element),+> ElementTuple for ($($T,)+) {
            const DTYPES: &'static [DType] = &[$($T::DTYPE),+];

            #[inline(always)]
            unsafe fn load(bases: &[usize], offsets: &[isize]) -> Self {
                unsafe {
                    ($((bases[$idx] as *const $T).offset(offsets[$idx]).read(),)+)
                }
            }

            #[inline(always)]
            unsafe fn store(self, bases: &[usize], offsets: &[isize]) {
                unsafe {
                    $((bases[$idx] as *mut $T).offset(offsets[$idx]).write(self.$idx);)+
                }
            }
        }
    };
}

impl_element_tuple!((A, 0));
impl_element_tuple!((A, 0), (B, 1));
impl_element_tuple!((A, 0), (B, 1), (C, 2));

/// Per-element operation applied by the engine
///
/// Implementations are small immutable structs; any scalar operand is
/// captured by value when the functor is built. `apply` is called once per
/// logical index and must not depend on call order.
pub trait ElementwiseOp<In: ElementTuple, Out: ElementTuple>: Sync {
    /// Compute the outputs for the element at flat row-major `index`
    fn apply(&self, index: usize, inputs: In) -> Out;
}

// ============================================================================
// Offset tracking
// ============================================================================

/// Incremental physical offsets for several arrays sharing one index space
///
/// Tracks the multi-dimensional row-major index and, for each array, the
/// element offset it maps to. `advance` moves to the next logical index in
/// amortized O(1).
#[derive(Debug, Clone)]
pub struct StridedOffsets<'a> {
    shape: &'a [usize],
    strides: &'a [Strides],
    index: SmallVec<[usize; 4]>,
    offsets: SmallVec<[isize; STACK_ARRAYS]>,
}

impl<'a> StridedOffsets<'a> {
    /// Position the tracker at flat row-major index `start`
    ///
    /// `strides[k]` and `base_offsets[k]` describe array `k`; every stride
    /// list must have `shape.len()` entries.
    pub fn new(
        shape: &'a [usize],
        strides: &'a [Strides],
        base_offsets: &[usize],
        start: usize,
    ) -> Self {
        debug_assert_eq!(strides.len(), base_offsets.len());

        let mut index: SmallVec<[usize; 4]> = SmallVec::from_elem(0, shape.len());
        let mut rem = start;
        for dim in (0..shape.len()).rev() {
            if shape[dim] > 0 {
                index[dim] = rem % shape[dim];
                rem /= shape[dim];
            }
        }

        let offsets = strides
            .iter()
            .zip(base_offsets)
            .map(|(st, &base)| {
                index
                    .iter()
                    .zip(st.iter())
                    .fold(base as isize, |acc, (&i, &s)| acc + i as isize * s)
            })
            .collect();

        Self {
            shape,
            strides,
            index,
            offsets,
        }
    }

    /// Current offset of every array, in elements
    #[inline(always)]
    pub fn offsets(&self) -> &[isize] {
        &self.offsets
    }

    /// Move to the next row-major index
    #[inline(always)]
    pub fn advance(&mut self) {
        for dim in (0..self.shape.len()).rev() {
            self.index[dim] += 1;
            for (off, st) in self.offsets.iter_mut().zip(self.strides) {
                *off += st[dim];
            }

            if self.index[dim] < self.shape[dim] {
                return;
            }

            // Reset this dimension and carry into the next one
            self.index[dim] = 0;
            let extent = self.shape[dim] as isize;
            for (off, st) in self.offsets.iter_mut().zip(self.strides) {
                *off -= extent * st[dim];
            }
        }
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Validated iteration plan: one base pointer, stride list and start offset
/// per array, inputs first
struct Plan {
    shape: SmallVec<[usize; 4]>,
    strides: SmallVec<[Strides; STACK_ARRAYS]>,
    offsets: SmallVec<[usize; STACK_ARRAYS]>,
    bases: SmallVec<[usize; STACK_ARRAYS]>,
    n_inputs: usize,
}

impl Plan {
    /// Run the functor over flat indices `start..end`
    ///
    /// # Safety
    /// The plan must come from [`elementwise`]'s validation and no other task
    /// may cover an overlapping range.
    unsafe fn run<In, Out, F>(&self, op: &F, start: usize, end: usize)
    where
        In: ElementTuple,
        Out: ElementTuple,
        F: ElementwiseOp<In, Out>,
    {
        let (in_bases, out_bases) = self.bases.split_at(self.n_inputs);
        let mut cursor = StridedOffsets::new(&self.shape, &self.strides, &self.offsets, start);

        for index in start..end {
            let (in_offsets, out_offsets) = cursor.offsets().split_at(self.n_inputs);
            unsafe {
                let inputs = In::load(in_bases, in_offsets);
                op.apply(index, inputs).store(out_bases, out_offsets);
            }
            cursor.advance();
        }
    }
}

/// Apply `op` to every logical element of the output shape
///
/// `inputs` are read through their (possibly strided, flipped or broadcast)
/// layouts; `outputs` are caller-allocated and written in place. The shared
/// index space is the shape of the first output.
///
/// All validation happens before the first element is touched, so on error
/// no output is modified.
///
/// # Errors
///
/// - `InvalidArgument` if the number of inputs or outputs does not match the
///   tuple arities, if an output has a broadcast (stride 0) dimension or
///   otherwise maps two indices to one element, if two outputs share storage,
///   or if an input shares storage with an output under a different layout
///   (see [`detach_input`])
/// - `DTypeMismatch` if an array's dtype differs from its tuple position;
///   the engine never converts
/// - `ShapeMismatch` if the outputs disagree on shape
/// - `BroadcastError` if an input cannot be broadcast to the output shape
pub fn elementwise<In, Out, F>(
    op: &F,
    inputs: &[&Tensor<CpuRuntime>],
    outputs: &[&Tensor<CpuRuntime>],
) -> Result<()>
where
    In: ElementTuple,
    Out: ElementTuple,
    F: ElementwiseOp<In, Out>,
{
    if inputs.len() != In::ARITY {
        return Err(Error::invalid_argument(
            "inputs",
            format!("expected {} arrays, got {}", In::ARITY, inputs.len()),
        ));
    }
    if outputs.len() != Out::ARITY {
        return Err(Error::invalid_argument(
            "outputs",
            format!("expected {} arrays, got {}", Out::ARITY, outputs.len()),
        ));
    }

    for (array, &expected) in inputs
        .iter()
        .zip(In::DTYPES)
        .chain(outputs.iter().zip(Out::DTYPES))
    {
        if array.dtype() != expected {
            return Err(Error::DTypeMismatch {
                expected,
                got: array.dtype(),
            });
        }
    }

    let shape = outputs[0].shape();
    for (k, out) in outputs.iter().enumerate() {
        if out.shape() != shape {
            return Err(Error::shape_mismatch(shape, out.shape()));
        }
        if out.layout().has_broadcast_dims() {
            return Err(Error::invalid_argument(
                "outputs",
                format!("output {k} has a broadcast dimension and cannot be written"),
            ));
        }
        if out.layout().may_overlap_itself() {
            return Err(Error::invalid_argument(
                "outputs",
                format!("output {k} maps several indices to one element"),
            ));
        }
        if outputs[..k]
            .iter()
            .any(|prev| prev.storage().same_buffer(out.storage()))
        {
            return Err(Error::invalid_argument(
                "outputs",
                format!("output {k} shares storage with an earlier output"),
            ));
        }
    }

    let mut layouts: SmallVec<[Layout; STACK_ARRAYS]> = SmallVec::new();
    for input in inputs {
        let layout = input
            .layout()
            .broadcast_to(shape)
            .ok_or_else(|| Error::broadcast(input.shape(), shape))?;
        layouts.push(layout);
    }
    for (k, (input, layout)) in inputs.iter().zip(&layouts).enumerate() {
        if outputs
            .iter()
            .any(|out| !reads_in_place(input, layout, out))
        {
            return Err(Error::invalid_argument(
                "inputs",
                format!("input {k} shares storage with an output under a different layout"),
            ));
        }
    }
    layouts.extend(outputs.iter().map(|out| out.layout().clone()));

    let numel: usize = shape.iter().product();
    if numel == 0 {
        return Ok(());
    }

    let contiguous = layouts.iter().all(Layout::is_contiguous);
    let plan = if contiguous {
        // Every array walks the same flat range: collapse to one dimension
        Plan {
            shape: SmallVec::from_elem(numel, 1),
            strides: SmallVec::from_elem(SmallVec::from_elem(1, 1), layouts.len()),
            offsets: SmallVec::from_elem(0, layouts.len()),
            bases: bases(inputs, outputs),
            n_inputs: inputs.len(),
        }
    } else {
        Plan {
            shape: shape.iter().copied().collect(),
            strides: layouts.iter().map(|l| Strides::from(l.strides())).collect(),
            offsets: layouts.iter().map(Layout::offset).collect(),
            bases: bases(inputs, outputs),
            n_inputs: inputs.len(),
        }
    };

    #[cfg(feature = "rayon")]
    if numel >= PARALLEL_THRESHOLD && outputs.iter().all(|out| out.is_contiguous()) {
        tracing::trace!(numel, ndim = shape.len(), contiguous, "elementwise: parallel");
        let chunks = numel.div_ceil(PARALLEL_CHUNK);
        (0..chunks).into_par_iter().for_each(|chunk| {
            let start = chunk * PARALLEL_CHUNK;
            let end = (start + PARALLEL_CHUNK).min(numel);
            // SAFETY: validated above; contiguous outputs map disjoint flat
            // ranges to disjoint elements.
            unsafe { plan.run::<In, Out, F>(op, start, end) };
        });
        return Ok(());
    }

    tracing::trace!(numel, ndim = shape.len(), contiguous, "elementwise: serial");
    // SAFETY: every layout was checked against its storage at construction
    // and every dtype against its tuple position above.
    unsafe { plan.run::<In, Out, F>(op, 0, numel) };
    Ok(())
}

/// Whether `input`, read through its broadcast `layout`, can safely share
/// an iteration with writes to `out`
///
/// Distinct buffers never interfere. A shared buffer is only safe when every
/// index reads exactly the element it is about to overwrite.
fn reads_in_place(
    input: &Tensor<CpuRuntime>,
    layout: &Layout,
    out: &Tensor<CpuRuntime>,
) -> bool {
    !input.storage().same_buffer(out.storage()) || layout == out.layout()
}

/// Prepare an input for a kernel writing into `outputs`
///
/// Returns the input itself unless it shares storage with an output under a
/// layout the engine would reject; in that case a contiguous copy is taken
/// first, so `op(x.flip(0), out = x)` reads the original values.
pub fn detach_input(
    input: Tensor<CpuRuntime>,
    outputs: &[&Tensor<CpuRuntime>],
) -> Result<Tensor<CpuRuntime>> {
    let conflict = outputs.iter().any(|out| match input.layout().broadcast_to(out.shape()) {
        Some(layout) => !reads_in_place(&input, &layout, out),
        // Left for the engine to report as a broadcast error
        None => false,
    });
    if !conflict {
        return Ok(input);
    }

    tracing::debug!(shape = ?input.shape(), dtype = %input.dtype(), "copying input that overlaps an output");
    let copy = Tensor::try_empty(input.shape(), input.dtype(), input.device())?;
    super::cast_into(&input, &copy)?;
    Ok(copy)
}

fn bases(
    inputs: &[&Tensor<CpuRuntime>],
    outputs: &[&Tensor<CpuRuntime>],
) -> SmallVec<[usize; STACK_ARRAYS]> {
    inputs
        .iter()
        .chain(outputs)
        .map(|t| t.storage().ptr() as usize)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::cpu::CpuDevice;

    struct AddIndex;

    impl ElementwiseOp<(f32,), (f32,)> for AddIndex {
        fn apply(&self, index: usize, (x,): (f32,)) -> (f32,) {
            (x + index as f32 * 100.0,)
        }
    }

    struct SumDiff;

    impl ElementwiseOp<(i32, i32), (i32, i32)> for SumDiff {
        fn apply(&self, _: usize, (a, b): (i32, i32)) -> (i32, i32) {
            (a + b, a - b)
        }
    }

    #[test]
    fn test_strided_offsets_unravel() {
        let shape = [2, 3];
        let strides: [Strides; 2] = [
            SmallVec::from_slice(&[3, 1]),
            SmallVec::from_slice(&[1, 2]),
        ];
        let mut cursor = StridedOffsets::new(&shape, &strides, &[0, 0], 0);
        let mut seen = Vec::new();
        for _ in 0..6 {
            seen.push(cursor.offsets().to_vec());
            cursor.advance();
        }
        assert_eq!(
            seen,
            [[0, 0], [1, 2], [2, 4], [3, 1], [4, 3], [5, 5]]
        );

        let resumed = StridedOffsets::new(&shape, &strides, &[0, 0], 4);
        assert_eq!(resumed.offsets(), &[4, 3]);
    }

    #[test]
    fn test_index_is_row_major() {
        let device = CpuDevice::new();
        let x = Tensor::<CpuRuntime>::zeros(&[2, 3], DType::F32, &device);
        let out = Tensor::<CpuRuntime>::zeros(&[3, 2], DType::F32, &device);
        let out_t = out.transpose(0, 1).unwrap();

        elementwise(&AddIndex, &[&x], &[&out_t]).unwrap();

        // out_t[i, j] = (i * 3 + j) * 100, read back through the base layout
        assert_eq!(
            out.to_vec::<f32>(),
            [0.0, 300.0, 100.0, 400.0, 200.0, 500.0]
        );
    }

    #[test]
    fn test_two_outputs() {
        let device = CpuDevice::new();
        let a = Tensor::<CpuRuntime>::from_slice(&[5i32, 7, 9], &[3], &device);
        let b = Tensor::<CpuRuntime>::from_slice(&[1i32], &[1], &device);
        let sum = Tensor::<CpuRuntime>::zeros(&[3], DType::I32, &device);
        let diff = Tensor::<CpuRuntime>::zeros(&[3], DType::I32, &device);

        elementwise(&SumDiff, &[&a, &b], &[&sum, &diff]).unwrap();
        assert_eq!(sum.to_vec::<i32>(), [6, 8, 10]);
        assert_eq!(diff.to_vec::<i32>(), [4, 6, 8]);
    }

    #[test]
    fn test_aliased_outputs_rejected() {
        let device = CpuDevice::new();
        let a = Tensor::<CpuRuntime>::from_slice(&[5i32, 7], &[2], &device);
        let out = Tensor::<CpuRuntime>::zeros(&[2], DType::I32, &device);
        let err = elementwise(&SumDiff, &[&a, &a], &[&out, &out.clone()]).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { arg: "outputs", .. }));
    }

    #[test]
    fn test_detach_input_copies_only_overlapping_views() {
        let device = CpuDevice::new();
        let x = Tensor::<CpuRuntime>::from_slice(&[1.0f32, 2.0, 3.0], &[3], &device);
        let other = Tensor::<CpuRuntime>::zeros(&[3], DType::F32, &device);

        let same = detach_input(x.clone(), &[&x]).unwrap();
        assert!(same.storage().same_buffer(x.storage()));
        let unrelated = detach_input(x.flip(0).unwrap(), &[&other]).unwrap();
        assert!(unrelated.storage().same_buffer(x.storage()));

        let copy = detach_input(x.flip(0).unwrap(), &[&x]).unwrap();
        assert!(!copy.storage().same_buffer(x.storage()));
        assert_eq!(copy.to_vec::<f32>(), [3.0, 2.0, 1.0]);
        elementwise(&AddIndex, &[&copy], &[&x]).unwrap();
        assert_eq!(x.to_vec::<f32>(), [3.0, 102.0, 201.0]);
    }

    #[test]
    fn test_arity_checked() {
        let device = CpuDevice::new();
        let a = Tensor::<CpuRuntime>::from_slice(&[1.0f32], &[1], &device);
        let err = elementwise(&AddIndex, &[&a, &a], &[&a]).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { arg: "inputs", .. }));
    }
}
