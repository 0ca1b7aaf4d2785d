// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::ptr;

/// Copies `byte_len` bytes from `source` to `destination`.
///
/// The regions may overlap: the result is as if the source bytes were first copied to an
/// intermediate buffer and from there to the destination (`memmove`, not `memcpy`).
///
/// # Safety
///
/// * `source` must be valid for reads of `byte_len` bytes.
/// * `destination` must be valid for writes of `byte_len` bytes.
/// * Both pointers must be non-null, even when `byte_len` is zero.
#[inline]
pub unsafe fn copy(destination: *mut u8, source: *const u8, byte_len: usize) {
    // SAFETY: Forwarding the caller's guarantees. `ptr::copy` is the platform memmove.
    unsafe {
        ptr::copy(source, destination, byte_len);
    }
}

/// Copies `count` elements of type `T` from `source` to `destination`, tolerating overlap.
///
/// # Safety
///
/// * `source` must be valid for reads and `destination` for writes of `count` elements.
/// * Both pointers must be non-null and aligned for `T`.
/// * `T` values must be safe to duplicate bitwise (the caller enforces `T: Copy` or equivalent).
///
/// # Panics
///
/// Panics if `count * size_of::<T>()` overflows `usize`.
#[inline]
pub unsafe fn copy_elements<T>(destination: *mut T, source: *const T, count: usize) {
    let byte_len = count
        .checked_mul(size_of::<T>())
        .expect("element count times element size cannot exceed the address space");

    // SAFETY: Forwarding the caller's guarantees; the byte length covers exactly `count` elements.
    unsafe {
        copy(destination.cast(), source.cast(), byte_len);
    }
}
