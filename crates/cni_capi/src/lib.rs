//! Exposes the CNI allocator and flat-array conversions using the C ABI.
//!
//! Every block returned through this API is owned by the caller and must be released exactly once
//! with [`cni_free`] (or [`cni_utf8_text_release`] for text). None of these functions report
//! errors: a failed allocation or a null argument produces a null block.

use std::ffi::c_void;

pub mod text;


pub use cni_memory::{FlatArray, Utf8Text};
pub use text::{cni_bytes_copy, cni_utf8_text_from_c_str, cni_utf8_text_release};

/// Allocates `byte_size` bytes. Returns null if `byte_size` is zero or the allocation failed.
///
/// The returned block must be released with [`cni_free`].
#[no_mangle]
pub extern "C" fn cni_allocate(byte_size: usize) -> *mut c_void {
    cni_memory::alloc::allocate(byte_size)
}

/// Releases a block that was allocated by this library. Does nothing if `ptr` is null.
///
/// # Safety
///
/// This function receives a raw pointer as parameter. Only when the argument is not a null
/// pointer, its content will be deallocated. Passing pointers to memory that was not allocated by
/// this library, or releasing the same block twice, will lead to undefined behavior.
#[no_mangle]
pub unsafe extern "C" fn cni_free(ptr: *mut c_void) {
    cni_memory::alloc::free(ptr);
}

/// Releases `ptr` and allocates a new block of `byte_size` bytes. The contents of `ptr` are not
/// copied into the new block. Returns null if `byte_size` is zero or the allocation failed.
///
/// # Safety
///
/// See [`cni_free`].
#[no_mangle]
pub unsafe extern "C" fn cni_reallocate(ptr: *mut c_void, byte_size: usize) -> *mut c_void {
    cni_memory::alloc::reallocate(ptr, byte_size)
}

/// Overwrites `byte_count` bytes starting at `ptr` with zero. Does nothing if `ptr` is null.
///
/// # Safety
///
/// If `ptr` is not null it must be valid for writes of `byte_count` bytes.
#[no_mangle]
pub unsafe extern "C" fn cni_zero_memory(ptr: *mut c_void, byte_count: usize) {
    cni_memory::alloc::zero_fill(ptr.cast::<u8>(), byte_count);
}
