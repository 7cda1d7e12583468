//! Null-safe allocation primitives over the process allocator.
//!
//! Every block handed out by [`Heap`] is prefixed with a small header that records the size of
//! the underlying allocation. This is what allows [`RawAllocator::free`] to release a block given
//! nothing but its address, which is all a foreign caller can hand back.

use std::{
    alloc::{self, Layout},
    ffi::c_void,
    mem,
    ptr::{self, NonNull},
};

/// Alignment of every block returned by [`Heap`]. Large enough for any primitive element type.
pub const BLOCK_ALIGN: usize = 16;

/// Number of bytes reserved in front of each block to store the allocation size.
const HEADER_SIZE: usize = BLOCK_ALIGN;

/// The reason an allocation request did not produce a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AllocError {
    /// Zero bytes were requested. This is not a failure, there is simply nothing to allocate.
    #[error("no allocation needed for a zero-sized request")]
    ZeroSize,
    /// The requested size does not fit in a valid [`Layout`].
    #[error("requested allocation of {requested} bytes overflows the address space")]
    CapacityOverflow { requested: usize },
    /// The process allocator could not satisfy the request.
    #[error("out of memory while allocating {requested} bytes")]
    OutOfMemory { requested: usize },
}

/// A source of raw, untyped memory blocks that can cross a foreign-function boundary.
///
/// Only [`try_allocate`] and [`free`] have to be provided; the remaining primitives are defined in
/// terms of those two. Blocks must be aligned to at least [`BLOCK_ALIGN`] bytes.
///
/// [`try_allocate`]: RawAllocator::try_allocate
/// [`free`]: RawAllocator::free
pub trait RawAllocator {
    /// Requests a block of `byte_size` bytes.
    fn try_allocate(&self, byte_size: usize) -> Result<NonNull<c_void>, AllocError>;

    /// Releases a block previously returned by this allocator. Does nothing if `ptr` is null.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or a block obtained from this allocator that has not been released yet.
    unsafe fn free(&self, ptr: *mut c_void);

    /// Requests a block of `byte_size` bytes, returning null if no block was produced.
    ///
    /// A zero-sized request returns null without being treated as a failure.
    fn allocate(&self, byte_size: usize) -> *mut c_void {
        match self.try_allocate(byte_size) {
            Ok(block) => block.as_ptr(),
            Err(AllocError::ZeroSize) => {
                log::trace!("zero-sized allocation requested");
                ptr::null_mut()
            }
            Err(err) => {
                log::warn!("allocation failed: {err}");
                ptr::null_mut()
            }
        }
    }

    /// Releases `ptr` and then allocates a fresh block of `byte_size` bytes.
    ///
    /// The contents of `ptr` are *not* carried over to the new block. If `byte_size` is zero the
    /// old block is released and null is returned.
    ///
    /// # Safety
    ///
    /// The same requirements as [`RawAllocator::free`] apply to `ptr`.
    unsafe fn reallocate(&self, ptr: *mut c_void, byte_size: usize) -> *mut c_void {
        self.free(ptr);
        self.allocate(byte_size)
    }

    /// Overwrites `count` elements of type `T` starting at `obj` with zero bytes. Does nothing if
    /// `obj` is null.
    ///
    /// # Safety
    ///
    /// If `obj` is not null it must be valid for writes of `count * size_of::<T>()` bytes.
    unsafe fn zero_fill<T>(&self, obj: *mut T, count: usize) {
        if !obj.is_null() {
            ptr::write_bytes(obj.cast::<u8>(), 0, mem::size_of::<T>() * count);
        }
    }
}

/// The process heap.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Heap;

impl Heap {
    fn layout_for(byte_size: usize) -> Result<Layout, AllocError> {
        byte_size
            .checked_add(HEADER_SIZE)
            .and_then(|total| Layout::from_size_align(total, BLOCK_ALIGN).ok())
            .ok_or(AllocError::CapacityOverflow {
                requested: byte_size,
            })
    }
}

impl RawAllocator for Heap {
    fn try_allocate(&self, byte_size: usize) -> Result<NonNull<c_void>, AllocError> {
        if byte_size == 0 {
            return Err(AllocError::ZeroSize);
        }

        let layout = Self::layout_for(byte_size)?;

        // SAFETY: the layout has a non-zero size because it always includes the header
        let base = NonNull::new(unsafe { alloc::alloc(layout) }).ok_or(
            AllocError::OutOfMemory {
                requested: byte_size,
            },
        )?;

        // SAFETY: the allocation is `HEADER_SIZE + byte_size` bytes long and aligned to
        // `BLOCK_ALIGN`, which satisfies the alignment of `usize`.
        unsafe {
            base.as_ptr().cast::<usize>().write(layout.size());
            Ok(NonNull::new_unchecked(base.as_ptr().add(HEADER_SIZE).cast()))
        }
    }

    unsafe fn free(&self, ptr: *mut c_void) {
        if ptr.is_null() {
            return;
        }

        let base = ptr.cast::<u8>().sub(HEADER_SIZE);
        let total = base.cast::<usize>().read();
        log::trace!("releasing block of {} bytes", total - HEADER_SIZE);
        alloc::dealloc(base, Layout::from_size_align_unchecked(total, BLOCK_ALIGN));
    }
}

/// Allocates `byte_size` bytes on the process heap. Returns null if `byte_size` is zero or the
/// allocation failed.
pub fn allocate(byte_size: usize) -> *mut c_void {
    Heap.allocate(byte_size)
}

/// Releases a block allocated with [`allocate`] or [`reallocate`]. Does nothing if `ptr` is null.
///
/// # Safety
///
/// `ptr` must be null or a block returned by [`allocate`] or [`reallocate`] that has not been
/// released yet.
pub unsafe fn free(ptr: *mut c_void) {
    Heap.free(ptr);
}

/// Releases `ptr` and allocates a fresh, uninitialized block of `byte_size` bytes.
///
/// # Safety
///
/// See [`free`].
pub unsafe fn reallocate(ptr: *mut c_void, byte_size: usize) -> *mut c_void {
    Heap.reallocate(ptr, byte_size)
}

/// Zeroes `count` elements of type `T` starting at `obj`. Does nothing if `obj` is null.
///
/// # Safety
///
/// If `obj` is not null it must be valid for writes of `count * size_of::<T>()` bytes.
pub unsafe fn zero_fill<T>(obj: *mut T, count: usize) {
    Heap.zero_fill(obj, count);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_zero_returns_null() {
        assert!(allocate(0).is_null());
        assert_eq!(Heap.try_allocate(0), Err(AllocError::ZeroSize));
    }

    #[test]
    fn allocate_is_aligned_and_writable() {
        let block = allocate(37);
        assert!(!block.is_null());
        assert_eq!(block as usize % BLOCK_ALIGN, 0);

        unsafe {
            ptr::write_bytes(block.cast::<u8>(), 0xAB, 37);
            assert_eq!(*block.cast::<u8>().add(36), 0xAB);
            free(block);
        }
    }

    #[test]
    fn allocate_overflow_returns_null() {
        assert_eq!(
            Heap.try_allocate(usize::MAX),
            Err(AllocError::CapacityOverflow {
                requested: usize::MAX
            })
        );
        assert!(allocate(usize::MAX).is_null());
        assert!(allocate(isize::MAX as usize).is_null());
    }

    #[test]
    fn free_null_is_noop() {
        unsafe { free(ptr::null_mut()) };
    }

    #[test]
    fn reallocate_to_zero_frees() {
        let block = allocate(8);
        assert!(!block.is_null());
        assert!(unsafe { reallocate(block, 0) }.is_null());
    }

    #[test]
    fn reallocate_from_null_allocates() {
        let block = unsafe { reallocate(ptr::null_mut(), 16) };
        assert!(!block.is_null());
        unsafe { free(block) };
    }

    #[test]
    fn reallocate_returns_fresh_block() {
        let block = allocate(4);
        unsafe {
            block.cast::<u32>().write(0xDEAD_BEEF);
            let block = reallocate(block, 64);
            assert!(!block.is_null());
            zero_fill(block.cast::<u64>(), 8);
            assert!(std::slice::from_raw_parts(block.cast::<u8>(), 64)
                .iter()
                .all(|b| *b == 0));
            free(block);
        }
    }

    #[test]
    fn zero_fill_counts_elements() {
        let block = allocate(4 * mem::size_of::<u32>()).cast::<u32>();
        unsafe {
            for i in 0..4 {
                block.add(i).write(u32::MAX);
            }
            zero_fill(block, 3);
            assert_eq!(std::slice::from_raw_parts(block, 4), &[0, 0, 0, u32::MAX]);
            free(block.cast());
        }
    }

    #[test]
    fn zero_fill_null_is_noop() {
        unsafe { zero_fill(ptr::null_mut::<u64>(), 10) };
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            AllocError::OutOfMemory { requested: 12 }.to_string(),
            "out of memory while allocating 12 bytes"
        );
    }
}
