use cni_memory::{to_flat_array, to_flat_array_with_terminator, to_vec, FlatArray, Primitive};

macro_rules! test_primitive_round_trip {
    ($($ty:ident => [$($value:expr),+ $(,)?]),+ $(,)?) => {
        $(
            paste::item! {
                #[test]
                fn [<round_trip_ $ty>]() {
                    let source: Vec<$ty> = vec![$($value),+];
                    let array = to_flat_array(source.as_slice());
                    assert_eq!(array.len(), source.len());

                    let copy: Vec<$ty> = unsafe { to_vec(&array) };
                    unsafe { array.release() };
                    assert_eq!(copy, source);
                }

                #[test]
                fn [<terminator_ $ty>]() {
                    let source: Vec<$ty> = vec![$($value),+];
                    let array = to_flat_array_with_terminator(source.as_slice());
                    assert_eq!(array.len(), source.len());

                    let terminator = unsafe { *array.as_ptr().add(array.len()) };
                    let zero: $ty = unsafe { std::mem::zeroed() };
                    assert_eq!(terminator, zero);

                    let copy: Vec<$ty> = unsafe { to_vec(&array) };
                    unsafe { array.release() };
                    assert_eq!(copy, source);
                }

                #[test]
                fn [<empty_ $ty>]() {
                    let array = to_flat_array(&[] as &[$ty]);
                    assert!(array.block().is_null());
                    assert_eq!(array.len(), 0);
                    assert!(unsafe { to_vec(&array) }.is_empty());
                }
            }
        )+
    };
}

test_primitive_round_trip! {
    i8 => [i8::MIN, -1, 0, 1, i8::MAX],
    i16 => [i16::MIN, 0, i16::MAX],
    i32 => [1, 2, 3],
    i64 => [i64::MIN, 42, i64::MAX],
    i128 => [i128::MIN, i128::MAX],
    isize => [-7, 7],
    u8 => [1, 2, 3],
    u16 => [0, u16::MAX],
    u32 => [0xDEAD_BEEF],
    u64 => [u64::MAX, 0, 1],
    u128 => [u128::MAX, 1],
    usize => [usize::MAX, 0],
    f32 => [0.5, -1.25, f32::MAX],
    f64 => [std::f64::consts::PI, f64::MIN_POSITIVE],
    bool => [true, false, true],
    char => ['a', 'ß', '\u{1F980}'],
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Channel {
    Red = 0,
    Green = 1,
    Blue = 2,
}

// SAFETY: `#[repr(u8)]` without drop glue, and zero is the `Red` discriminant.
unsafe impl Primitive for Channel {
    fn name() -> &'static str {
        "Channel"
    }
}

#[test]
fn round_trip_enum() {
    let source = [Channel::Blue, Channel::Green, Channel::Red];
    let array = to_flat_array_with_terminator(&source);
    assert_eq!(unsafe { *array.as_ptr().add(3) }, Channel::Red);

    let copy: Vec<Channel> = unsafe { to_vec(&array) };
    unsafe { array.release() };
    assert_eq!(copy, source);
}

#[test]
fn debug_reports_custom_name() {
    let formatted = format!("{:?}", FlatArray::<Channel>::empty());
    assert!(formatted.contains("Channel"));
}
