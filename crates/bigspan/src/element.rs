// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Compile-time capabilities of span element types.
//!
//! Bulk memory algorithms need to know two things about an element type: whether an all-zero
//! bit pattern is a valid value (so a span can be cleared) and whether the type carries
//! pointers (so clearing must happen in whole pointer-sized words). Raw memory access
//! (construction from raw pointers, byte views, memory comparison) additionally requires the
//! type to be plain data. These facts are expressed as marker traits resolved statically.

use std::ptr::NonNull;

/// Element types whose all-zero bit pattern is a valid value.
///
/// # Safety
///
/// Implementors guarantee that a value consisting entirely of zero bytes is a valid instance
/// of the type.
///
/// If `CONTAINS_REFERENCES` is `true`, implementors also guarantee that the size of the type is
/// a multiple of `size_of::<usize>()` and its alignment is at least `align_of::<usize>()`, so that
/// the type can be cleared exclusively via whole, aligned pointer-sized writes.
pub unsafe trait Zeroable: Sized {
    /// Whether values of the type hold pointers or references.
    ///
    /// Spans of such types are cleared one pointer-sized word at a time, never byte by byte,
    /// so that no observer can ever see a partially cleared pointer.
    const CONTAINS_REFERENCES: bool;
}

/// Plain data: no pointers, no padding bytes, every bit pattern a valid value.
///
/// This is the capability required for viewing arbitrary unmanaged memory as a span, for
/// reinterpreting spans as bytes and for byte-wise memory comparison.
///
/// # Safety
///
/// Implementors guarantee that the type contains no references or pointers, has no padding
/// bytes and that every possible bit pattern of `size_of::<Self>()` bytes is a valid value.
pub unsafe trait Unmanaged: Zeroable + Copy + 'static {}

macro_rules! impl_unmanaged {
    ($($t:ty),* $(,)?) => {
        $(
            // SAFETY: Primitive numeric types have no padding and accept every bit pattern.
            unsafe impl Zeroable for $t {
                const CONTAINS_REFERENCES: bool = false;
            }

            // SAFETY: Primitive numeric types have no padding and accept every bit pattern.
            unsafe impl Unmanaged for $t {}
        )*
    };
}

impl_unmanaged!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64);

// SAFETY: `false` is represented by the zero byte.
unsafe impl Zeroable for bool {
    const CONTAINS_REFERENCES: bool = false;
}

// SAFETY: U+0000 is represented by four zero bytes.
unsafe impl Zeroable for char {
    const CONTAINS_REFERENCES: bool = false;
}

// SAFETY: An array of zeroable elements is zeroable. Pointer-containing arrays keep the
// size and alignment properties of their element type.
unsafe impl<T: Zeroable, const N: usize> Zeroable for [T; N] {
    const CONTAINS_REFERENCES: bool = T::CONTAINS_REFERENCES;
}

// SAFETY: Arrays of plain data have no padding between elements and accept every bit pattern.
unsafe impl<T: Unmanaged, const N: usize> Unmanaged for [T; N] {}

// SAFETY: The null pointer is all zeroes; thin raw pointers are exactly one pointer-sized word.
unsafe impl<T> Zeroable for *const T {
    const CONTAINS_REFERENCES: bool = true;
}

// SAFETY: The null pointer is all zeroes; thin raw pointers are exactly one pointer-sized word.
unsafe impl<T> Zeroable for *mut T {
    const CONTAINS_REFERENCES: bool = true;
}

// SAFETY: `None` uses the null niche, so it is all zeroes and exactly one pointer-sized word.
unsafe impl<T> Zeroable for Option<NonNull<T>> {
    const CONTAINS_REFERENCES: bool = true;
}

// SAFETY: `None` uses the null niche, so it is all zeroes and exactly one pointer-sized word.
unsafe impl<T> Zeroable for Option<&T> {
    const CONTAINS_REFERENCES: bool = true;
}

/// Whether values of `T` can be reinterpreted as whole pointer-sized words.
pub(crate) const fn is_word_layout<T>() -> bool {
    size_of::<T>() % size_of::<usize>() == 0 && align_of::<T>() >= align_of::<usize>()
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_like_types_have_word_layout() {
        assert!(is_word_layout::<*const u8>());
        assert!(is_word_layout::<*mut String>());
        assert!(is_word_layout::<Option<NonNull<u64>>>());
        assert!(is_word_layout::<Option<&u16>>());
        assert!(is_word_layout::<[*const u8; 3]>());
    }

    #[test]
    fn reference_flags() {
        assert!(!<u32 as Zeroable>::CONTAINS_REFERENCES);
        assert!(!<[f64; 4] as Zeroable>::CONTAINS_REFERENCES);
        assert!(<*const u8 as Zeroable>::CONTAINS_REFERENCES);
        assert!(<[Option<NonNull<u8>>; 2] as Zeroable>::CONTAINS_REFERENCES);
        assert!(<Option<&u16> as Zeroable>::CONTAINS_REFERENCES);
    }
}
