use crate::{
    alloc::{Heap, RawAllocator},
    Primitive,
};
use std::{
    ffi::{c_void, CStr},
    fmt,
    marker::PhantomData,
    ptr, slice,
};

/// A contiguous block of `length` elements of type `T` that can be passed across a
/// foreign-function boundary.
///
/// A `FlatArray` returned from one of the conversion functions owns its block. There is no
/// `Drop` implementation: whoever ends up holding the value must release it exactly once, either
/// through [`FlatArray::release`] or by passing [`FlatArray::block`] to the allocator's free
/// primitive. The type is neither `Copy` nor `Clone`, handing it over is a move.
///
/// Blocks created with a terminator hold one additional zero element past `length`. This is not
/// recorded in the value itself.
#[repr(C)]
pub struct FlatArray<T: Primitive> {
    block: *mut c_void,
    length: usize,
    _element: PhantomData<T>,
}

/// A UTF-8 encoded string stored as a flat array of bytes.
pub type Utf8Text = FlatArray<u8>;

impl<T: Primitive> FlatArray<T> {
    /// Constructs an array that holds nothing: a null block and a length of zero.
    pub const fn empty() -> Self {
        Self {
            block: ptr::null_mut(),
            length: 0,
            _element: PhantomData,
        }
    }

    /// Constructs an array from a block and the number of elements of type `T` it holds.
    ///
    /// # Safety
    ///
    /// If `length` is not zero, `block` must point to at least `length * size_of::<T>()`
    /// initialized bytes aligned for `T`. The returned value takes over ownership of `block`.
    pub const unsafe fn from_raw_parts(block: *mut c_void, length: usize) -> Self {
        Self {
            block,
            length,
            _element: PhantomData,
        }
    }

    /// Decomposes the array into its block and length. The caller becomes responsible for
    /// releasing the block.
    pub fn into_raw_parts(self) -> (*mut c_void, usize) {
        (self.block, self.length)
    }

    /// Returns the untyped block. May be null.
    pub fn block(&self) -> *mut c_void {
        self.block
    }

    /// Returns the block viewed as elements of type `T`. May be null.
    pub fn as_ptr(&self) -> *const T {
        self.block.cast_const().cast()
    }

    /// Returns the block viewed as mutable elements of type `T`. May be null.
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.block.cast()
    }

    /// Returns the number of elements, not counting a terminator.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Returns true if the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the elements as a slice.
    ///
    /// # Safety
    ///
    /// The block must still be alive and satisfy the requirements of
    /// [`FlatArray::from_raw_parts`].
    pub unsafe fn as_slice(&self) -> &[T] {
        if self.block.is_null() || self.length == 0 {
            &[]
        } else {
            slice::from_raw_parts(self.as_ptr(), self.length)
        }
    }

    /// Returns an iterator over the elements.
    ///
    /// # Safety
    ///
    /// See [`FlatArray::as_slice`].
    pub unsafe fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Releases the block through `allocator`, consuming the array.
    ///
    /// # Safety
    ///
    /// The block must have been obtained from `allocator` and not have been released before.
    pub unsafe fn release_in<A: RawAllocator>(self, allocator: &A) {
        allocator.free(self.block);
    }

    /// Releases a block that was allocated on the process heap, consuming the array.
    ///
    /// # Safety
    ///
    /// The block must have been obtained from [`Heap`] and not have been released before.
    pub unsafe fn release(self) {
        self.release_in(&Heap);
    }
}

impl Utf8Text {
    /// Returns the text as a C string.
    ///
    /// Returns `None` if the block is null.
    ///
    /// # Safety
    ///
    /// The text must have been created with a terminator, e.g. by [`crate::to_utf8_text`].
    pub unsafe fn as_c_str(&self) -> Option<&CStr> {
        if self.block.is_null() {
            None
        } else {
            Some(CStr::from_ptr(self.block.cast_const().cast()))
        }
    }
}

impl<T: Primitive> Default for FlatArray<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: Primitive> fmt::Debug for FlatArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlatArray")
            .field("element", &T::name())
            .field("block", &self.block)
            .field("length", &self.length)
            .finish()
    }
}
