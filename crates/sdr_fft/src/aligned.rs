//! Component B: 64-byte aligned scratch buffers and build/ISA introspection.
//!
//! The source expresses alignment through compiler intrinsics and `restrict`
//! pointers. Here that becomes ownership: `AlignedBuf<T>` is the only type
//! that ever calls the allocator directly, and every FFT/channelizer/resampler
//! scratch buffer is one of these, borrowed out as ordinary slices on the hot
//! path.

use std::alloc::{self, Layout};
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;

/// Alignment, in bytes, guaranteed for every buffer handed out by this crate.
pub const ALIGNMENT: usize = 64;

/// An owned, heap-allocated, 64-byte aligned slice of `T`, zero-initialised.
///
/// `T` must be safely zeroable (the buffer is allocated with `alloc_zeroed`);
/// this holds for the `f32` scratch this crate uses it for.
pub struct AlignedBuf<T> {
    ptr: NonNull<T>,
    len: usize,
    layout: Layout,
}

unsafe impl<T: Send> Send for AlignedBuf<T> {}
unsafe impl<T: Sync> Sync for AlignedBuf<T> {}

impl<T> AlignedBuf<T> {
    /// Allocates a zeroed, 64-byte aligned buffer of `len` elements.
    ///
    /// Returns `None` on allocation failure or on a degenerate `len` (zero
    /// elements never need a heap allocation and an alignment `Layout` that
    /// size classes to zero bytes is UB to request).
    pub fn new_zeroed(len: usize) -> Option<Self> {
        if len == 0 {
            return None;
        }
        let size = len.checked_mul(std::mem::size_of::<T>())?;
        let layout = Layout::from_size_align(size, ALIGNMENT).ok()?;

        let ptr = unsafe { alloc::alloc_zeroed(layout) } as *mut T;
        let ptr = NonNull::new(ptr)?;

        Some(Self { ptr, len, layout })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T> Deref for AlignedBuf<T> {
    type Target = [T];
    fn deref(&self) -> &[T] {
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl<T> DerefMut for AlignedBuf<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<T> Drop for AlignedBuf<T> {
    fn drop(&mut self) {
        unsafe {
            alloc::dealloc(self.ptr.as_ptr() as *mut u8, self.layout);
        }
    }
}

/// One-line description of the active scalar backend, logged once at plan
/// creation. Mirrors `hlfft_build_info()`'s intent without the free-function
/// global state — callers log it themselves if they want it surfaced.
pub fn build_info() -> String {
    let avx2 = detect_avx2();
    format!(
        "sdr_fft {} scalar Stockham radix-4{}",
        env!("CARGO_PKG_VERSION"),
        if avx2 { " (AVX2 available, unused by the scalar backend)" } else { "" }
    )
}

#[cfg(target_arch = "x86_64")]
fn detect_avx2() -> bool {
    is_x86_feature_detected!("avx2")
}

#[cfg(not(target_arch = "x86_64"))]
fn detect_avx2() -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_is_aligned_and_zeroed() {
        let buf = AlignedBuf::<f32>::new_zeroed(17).unwrap();
        assert_eq!(buf.len(), 17);
        assert_eq!(buf.as_ptr() as usize % ALIGNMENT, 0);
        assert!(buf.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn zero_length_is_rejected() {
        assert!(AlignedBuf::<f32>::new_zeroed(0).is_none());
    }
}
