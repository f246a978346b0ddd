//! Non-owning, bounds-checked views over contiguous numeric memory.
//!
//! A view borrows its backing slice, so it can never outlive the buffer and
//! never owns memory. Length is derived from the backing slice and the
//! stride at construction time, which makes the bounds invariant
//! (`last index * stride < backing length`) hold by construction — there is
//! no fallible constructor.
//!
//! Views are created per call and discarded; they are `Copy`-cheap to pass
//! around. Only stride-1 (contiguous) views are eligible for the vector
//! path; strided views always run the scalar kernels.

use std::num::NonZeroUsize;

use crate::dtype::KernelElement;

/// Derived element count for a strided walk over `slice_len` elements.
#[inline]
fn strided_len(slice_len: usize, stride: usize) -> usize {
    if slice_len == 0 {
        0
    } else {
        (slice_len - 1) / stride + 1
    }
}

/// Read-only view over numeric memory.
#[derive(Debug, Clone, Copy)]
pub struct NumView<'a, T: KernelElement> {
    data: &'a [T],
    len: usize,
    stride: usize,
}

impl<'a, T: KernelElement> NumView<'a, T> {
    /// Contiguous view over the whole slice (stride 1).
    #[inline]
    pub fn new(data: &'a [T]) -> Self {
        Self {
            data,
            len: data.len(),
            stride: 1,
        }
    }

    /// Strided view: element `i` maps to `data[i * stride]`. The length is
    /// the number of stride steps that fit in the slice.
    #[inline]
    pub fn with_stride(data: &'a [T], stride: NonZeroUsize) -> Self {
        let stride = stride.get();
        Self {
            data,
            len: strided_len(data.len(), stride),
            stride,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn is_contiguous(&self) -> bool {
        self.stride == 1
    }

    /// Element at logical index `i`. Panics past `len` like slice indexing.
    #[inline]
    pub fn get(&self, i: usize) -> T {
        debug_assert!(i < self.len);
        self.data[i * self.stride]
    }

    /// The backing slice, when the view is contiguous.
    #[inline]
    pub fn as_slice(&self) -> Option<&'a [T]> {
        if self.is_contiguous() {
            Some(&self.data[..self.len])
        } else {
            None
        }
    }
}

impl<'a, T: KernelElement> From<&'a [T]> for NumView<'a, T> {
    fn from(data: &'a [T]) -> Self {
        Self::new(data)
    }
}

/// Mutable view over numeric memory. Same layout rules as [`NumView`].
#[derive(Debug)]
pub struct NumViewMut<'a, T: KernelElement> {
    data: &'a mut [T],
    len: usize,
    stride: usize,
}

impl<'a, T: KernelElement> NumViewMut<'a, T> {
    /// Contiguous mutable view over the whole slice.
    #[inline]
    pub fn new(data: &'a mut [T]) -> Self {
        let len = data.len();
        Self {
            data,
            len,
            stride: 1,
        }
    }

    /// Strided mutable view: element `i` maps to `data[i * stride]`.
    #[inline]
    pub fn with_stride(data: &'a mut [T], stride: NonZeroUsize) -> Self {
        let stride = stride.get();
        let len = strided_len(data.len(), stride);
        Self { data, len, stride }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn is_contiguous(&self) -> bool {
        self.stride == 1
    }

    #[inline]
    pub fn get(&self, i: usize) -> T {
        debug_assert!(i < self.len);
        self.data[i * self.stride]
    }

    #[inline]
    pub fn set(&mut self, i: usize, value: T) {
        debug_assert!(i < self.len);
        self.data[i * self.stride] = value;
    }

    /// The backing slice, when the view is contiguous.
    #[inline]
    pub fn as_mut_slice(&mut self) -> Option<&mut [T]> {
        if self.is_contiguous() {
            Some(&mut self.data[..self.len])
        } else {
            None
        }
    }

    /// Read-only rebind of this view.
    #[inline]
    pub fn as_view(&self) -> NumView<'_, T> {
        NumView {
            data: &*self.data,
            len: self.len,
            stride: self.stride,
        }
    }
}

impl<'a, T: KernelElement> From<&'a mut [T]> for NumViewMut<'a, T> {
    fn from(data: &'a mut [T]) -> Self {
        Self::new(data)
    }
}
