//! Owned, 64-byte-aligned numeric buffers.
//!
//! The dispatch layer takes the vector path only for lane-aligned,
//! contiguous operands; plain `Vec` allocations give no alignment guarantee
//! beyond the element's own. [`AlignedBuf`] over-aligns to 64 bytes
//! (cache-line, and a multiple of every lane alignment the engine uses) so
//! callers, tests, and benchmarks get the vector path deterministically.

use std::alloc::{self, Layout};
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;

use crate::dtype::KernelElement;

/// Alignment for all buffer allocations, in bytes.
const ALIGNMENT: usize = 64;

/// A heap buffer of `T` with 64-byte base alignment.
pub struct AlignedBuf<T: KernelElement> {
    ptr: NonNull<T>,
    len: usize,
    layout: Layout,
}

// The buffer exclusively owns its allocation.
unsafe impl<T: KernelElement> Send for AlignedBuf<T> {}
unsafe impl<T: KernelElement> Sync for AlignedBuf<T> {}

impl<T: KernelElement> AlignedBuf<T> {
    /// Allocate `len` elements, zero-initialized.
    pub fn zeroed(len: usize) -> Self {
        let layout = Self::layout_for(len);
        let ptr = if layout.size() == 0 {
            NonNull::dangling()
        } else {
            // Zero bytes are the value 0 / 0.0 for every supported element
            // type.
            let raw = unsafe { alloc::alloc_zeroed(layout) };
            match NonNull::new(raw as *mut T) {
                Some(p) => p,
                None => alloc::handle_alloc_error(layout),
            }
        };
        Self { ptr, len, layout }
    }

    /// Allocate and copy from an existing slice.
    pub fn from_slice(src: &[T]) -> Self {
        let mut buf = Self::zeroed(src.len());
        buf.as_mut_slice().copy_from_slice(src);
        buf
    }

    fn layout_for(len: usize) -> Layout {
        let bytes = len * std::mem::size_of::<T>();
        // Over-aligning never shrinks a valid layout.
        Layout::from_size_align(bytes, ALIGNMENT).expect("buffer layout overflow")
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
    pub fn as_slice(&self) -> &[T] {
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<T: KernelElement> Drop for AlignedBuf<T> {
    fn drop(&mut self) {
        if self.layout.size() > 0 {
            unsafe { alloc::dealloc(self.ptr.as_ptr() as *mut u8, self.layout) };
        }
    }
}

impl<T: KernelElement> Clone for AlignedBuf<T> {
    fn clone(&self) -> Self {
        Self::from_slice(self.as_slice())
    }
}

impl<T: KernelElement> Deref for AlignedBuf<T> {
    type Target = [T];
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: KernelElement> DerefMut for AlignedBuf<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment() {
        for len in [1, 7, 64, 1000] {
            let buf = AlignedBuf::<f32>::zeroed(len);
            assert_eq!(buf.as_slice().as_ptr() as usize % ALIGNMENT, 0);
            assert_eq!(buf.len(), len);
            assert!(buf.iter().all(|&x| x == 0.0));
        }
    }

    #[test]
    fn test_from_slice_round_trip() {
        let src = [1i64, -2, 3, i64::MAX];
        let buf = AlignedBuf::from_slice(&src);
        assert_eq!(buf.as_slice(), &src);
        let cloned = buf.clone();
        assert_eq!(cloned.as_slice(), &src);
    }

    #[test]
    fn test_zero_length() {
        let buf = AlignedBuf::<i32>::zeroed(0);
        assert!(buf.is_empty());
        assert_eq!(buf.as_slice(), &[] as &[i32]);
    }

    #[test]
    fn test_mutation_through_deref() {
        let mut buf = AlignedBuf::<f64>::zeroed(3);
        buf[1] = 2.5;
        assert_eq!(buf.as_slice(), &[0.0, 2.5, 0.0]);
    }
}
