//! Marshaling of primitive data between Rust containers and flat, unmanaged memory blocks that can
//! cross a foreign-function boundary.
//!
//! A [`FlatArray`] is the only value that crosses the boundary. Its block is allocated through a
//! [`RawAllocator`] (the process [`Heap`] by default) and must be released exactly once by
//! whichever side ends up owning it.

pub mod alloc;
mod convert;
mod flat_array;
mod primitive;

pub use alloc::{AllocError, Heap, RawAllocator};
pub use convert::{
    to_container, to_flat_array, to_flat_array_in, to_flat_array_with_terminator, to_string,
    to_utf8_text, to_vec,
};
pub use flat_array::{FlatArray, Utf8Text};
pub use primitive::Primitive;
