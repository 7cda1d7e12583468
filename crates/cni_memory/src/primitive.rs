//! A module that defines which element types may be stored in a [`FlatArray`].
//!
//! [`FlatArray`]: crate::FlatArray

/// A non-aggregate element type that can be copied byte-for-byte across a foreign-function
/// boundary.
///
/// # Safety
///
/// Implementors must have no drop glue, contain no pointers into managed memory, and the all-zero
/// bit pattern must be a valid value of the type (it is used as the terminator element). A
/// `#[repr(u8)]` (or other integer repr) enum with a zero discriminant satisfies this.
pub unsafe trait Primitive: Copy + 'static {
    /// Returns the name of the type
    fn name() -> &'static str;
}

macro_rules! define_primitives {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            unsafe impl Primitive for $ty {
                fn name() -> &'static str {
                    const TYPE_NAME: &str = $name;
                    TYPE_NAME
                }
            }
        )+
    }
}

define_primitives! {
    i8 => "i8",
    i16 => "i16",
    i32 => "i32",
    i64 => "i64",
    i128 => "i128",
    isize => "isize",
    u8 => "u8",
    u16 => "u16",
    u32 => "u32",
    u64 => "u64",
    u128 => "u128",
    usize => "usize",
    f32 => "f32",
    f64 => "f64",
    bool => "bool",
    char => "char",
}
