//! Text and byte buffer conversions using the C ABI.

use cni_memory::{FlatArray, Utf8Text};
use std::{ffi::CStr, os::raw::c_char, slice};

/// Tries to convert a C style string pointer to a `&str`.
///
/// # Safety
///
/// The caller must provide a valid C string with a null terminator, whose content doesnt change
/// during the lifetime `'a`.
pub unsafe fn try_convert_c_string<'a>(string: *const c_char) -> Result<&'a str, &'static str> {
    if string.is_null() {
        return Err("null pointer");
    }

    match CStr::from_ptr::<'a>(string).to_str() {
        Ok(text) => Ok(text),
        Err(_) => Err("invalid UTF-8 encoded"),
    }
}

/// Copies a NUL-terminated UTF-8 string into a newly allocated [`Utf8Text`]. The copy is
/// NUL-terminated as well; its length does not include the terminator.
///
/// Returns an empty text (a null block) if `string` is null, not valid UTF-8, or the allocation
/// failed. The returned text must be released with [`cni_utf8_text_release`].
///
/// # Safety
///
/// If `string` is not null it must point to a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn cni_utf8_text_from_c_str(string: *const c_char) -> Utf8Text {
    match try_convert_c_string(string) {
        Ok(text) => cni_memory::to_utf8_text(text),
        Err(err) => {
            log::warn!("invalid argument 'string': {err}");
            Utf8Text::empty()
        }
    }
}

/// Releases the block of a text produced by this library.
///
/// # Safety
///
/// Only call this function on a text once. Passing a text whose block was not allocated by this
/// library leads to undefined behavior.
#[no_mangle]
pub unsafe extern "C" fn cni_utf8_text_release(text: Utf8Text) {
    text.release();
}

/// Copies `length` bytes starting at `data` into a newly allocated array.
///
/// Returns an empty array if `data` is null, `length` is zero, or the allocation failed. The
/// block of the returned array must be released with [`crate::cni_free`].
///
/// # Safety
///
/// If `data` is not null it must be valid for reads of `length` bytes.
#[no_mangle]
pub unsafe extern "C" fn cni_bytes_copy(data: *const u8, length: usize) -> FlatArray<u8> {
    let bytes = (!data.is_null()).then(|| slice::from_raw_parts(data, length));
    cni_memory::to_flat_array_in(&cni_memory::Heap, bytes, false)
}
