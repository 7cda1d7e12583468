//! Conversions between Rust containers and [`FlatArray`]s.
//!
//! An empty [`FlatArray`] is returned both when there was nothing to convert and when the
//! allocator could not provide a block. Callers that need to tell these apart have to look at
//! their input.

use crate::{
    alloc::{Heap, RawAllocator},
    FlatArray, Primitive, Utf8Text,
};
use std::{mem, ptr};

/// Copies the elements of `container` into a freshly allocated block obtained from `allocator`.
///
/// If `add_terminator` is true, one extra zero element is written past the last element. It is not
/// counted in the length of the returned array.
///
/// Returns an empty array if `container` is `None` or the allocation fails. An empty container
/// converted without a terminator needs no block, so it also produces an empty array.
pub fn to_flat_array_in<A, C, T>(
    allocator: &A,
    container: Option<&C>,
    add_terminator: bool,
) -> FlatArray<T>
where
    A: RawAllocator,
    C: AsRef<[T]> + ?Sized,
    T: Primitive,
{
    let Some(container) = container else {
        return FlatArray::empty();
    };
    let elements = container.as_ref();
    let elem_count = elements.len();

    let Some(byte_size) = elem_count
        .checked_add(usize::from(add_terminator))
        .and_then(|slots| slots.checked_mul(mem::size_of::<T>()))
    else {
        log::warn!(
            "cannot convert {elem_count} elements of type {}: size overflows",
            T::name()
        );
        return FlatArray::empty();
    };

    let block = allocator.allocate(byte_size);
    if block.is_null() {
        return FlatArray::empty();
    }

    // SAFETY: `block` is a fresh allocation large enough for `elem_count` elements plus the
    // optional terminator and cannot overlap `elements`.
    unsafe {
        let data = block.cast::<T>();
        ptr::copy_nonoverlapping(elements.as_ptr(), data, elem_count);
        if add_terminator {
            allocator.zero_fill(data.add(elem_count), 1);
        }
        FlatArray::from_raw_parts(block, elem_count)
    }
}

/// Copies the elements of `container` into a flat array allocated on the process heap.
pub fn to_flat_array<C, T>(container: &C) -> FlatArray<T>
where
    C: AsRef<[T]> + ?Sized,
    T: Primitive,
{
    to_flat_array_in(&Heap, Some(container), false)
}

/// Copies the elements of `container` into a flat array allocated on the process heap, followed by
/// a zero terminator element.
pub fn to_flat_array_with_terminator<C, T>(container: &C) -> FlatArray<T>
where
    C: AsRef<[T]> + ?Sized,
    T: Primitive,
{
    to_flat_array_in(&Heap, Some(container), true)
}

/// Copies `text` into a NUL-terminated [`Utf8Text`] allocated on the process heap.
///
/// The result is never an empty array with a null block unless the allocation failed: even the
/// empty string produces a one-byte block holding the terminator.
pub fn to_utf8_text(text: &str) -> Utf8Text {
    to_flat_array_in(&Heap, Some(text.as_bytes()), true)
}

/// Copies the elements of `array` into a new container.
///
/// Returns an empty container if `array` is `None`, its block is null or its length is zero. A
/// terminator element, if present, is never copied. The array itself is left untouched and must
/// still be released by its owner.
///
/// # Safety
///
/// A non-null block must be alive and hold at least `array.len()` initialized elements.
pub unsafe fn to_container<'a, C, T>(array: impl Into<Option<&'a FlatArray<T>>>) -> C
where
    C: From<Vec<T>>,
    T: Primitive,
{
    C::from(to_vec(array))
}

/// Copies the elements of `array` into a new `Vec`.
///
/// # Safety
///
/// See [`to_container`].
pub unsafe fn to_vec<'a, T: Primitive>(array: impl Into<Option<&'a FlatArray<T>>>) -> Vec<T> {
    match array.into() {
        Some(array) => array.as_slice().to_vec(),
        None => Vec::new(),
    }
}

/// Copies `text` into a new `String`, replacing invalid UTF-8 sequences with
/// [`char::REPLACEMENT_CHARACTER`].
///
/// # Safety
///
/// See [`to_container`].
pub unsafe fn to_string<'a>(text: impl Into<Option<&'a Utf8Text>>) -> String {
    match text.into() {
        Some(text) => String::from_utf8_lossy(text.as_slice()).into_owned(),
        None => String::new(),
    }
}
