// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::mem::MaybeUninit;
use std::{ptr, slice};

/// Width in bytes of the block stores used by [`fill()`] on this target.
///
/// Selected at compile time from the enabled target features: 32 bytes with AVX, 16 bytes
/// with SSE2, NEON or WebAssembly SIMD. Targets without vector registers still report 16 but
/// [`is_hardware_accelerated()`] returns `false` for them and the block path is never taken.
#[cfg(target_feature = "avx")]
pub const VECTOR_BYTES: usize = 32;

/// Width in bytes of the block stores used by [`fill()`] on this target.
///
/// Selected at compile time from the enabled target features: 32 bytes with AVX, 16 bytes
/// with SSE2, NEON or WebAssembly SIMD. Targets without vector registers still report 16 but
/// [`is_hardware_accelerated()`] returns `false` for them and the block path is never taken.
#[cfg(not(target_feature = "avx"))]
pub const VECTOR_BYTES: usize = 16;

/// Whether the target has vector registers that [`fill()`] can use for block-wide stores.
#[must_use]
pub const fn is_hardware_accelerated() -> bool {
    cfg!(any(
        target_feature = "sse2",
        target_feature = "neon",
        target_feature = "simd128"
    ))
}

type Block = MaybeUninit<[u8; VECTOR_BYTES]>;

/// Writes `value` into each of the `count` slots starting at `destination`.
///
/// Previous contents are overwritten without being dropped, which is always fine for `Copy` types.
///
/// The strategy depends on the element size:
///
/// * Single-byte elements are stored with one memory-set of their byte value once the range
///   spans at least two blocks.
/// * Elements whose size is a power of two no larger than [`VECTOR_BYTES`] are splatted into a
///   block and stored one block at a time, two blocks per iteration, finishing with one
///   overlapping block aligned to the end of the range.
/// * Anything else is written element by element, eight per iteration.
///
/// # Safety
///
/// `destination` must be non-null, aligned for `T` and valid for writes of `count` elements.
pub unsafe fn fill<T: Copy>(destination: *mut T, count: usize, value: T) {
    let size = size_of::<T>();

    if count == 0 || size == 0 {
        return;
    }

    if size == 1 && count >= 2 * VECTOR_BYTES {
        // SAFETY: Forwarding the caller's guarantees.
        unsafe {
            fill_bytes(destination, count, value);
        }
        return;
    }

    if is_hardware_accelerated() && size.is_power_of_two() && size <= VECTOR_BYTES && count * size >= VECTOR_BYTES {
        // SAFETY: Forwarding the caller's guarantees; the range spans at least one block.
        unsafe {
            fill_blocks(destination, count, value);
        }
        return;
    }

    // SAFETY: Forwarding the caller's guarantees.
    unsafe {
        fill_scalar(destination, count, value);
    }
}

/// Writes a clone of `value` into each of the `count` initialized slots starting at `destination`.
///
/// The previous value in each slot is dropped as it is overwritten.
///
/// # Safety
///
/// `destination` must be non-null, aligned for `T` and valid for reads and writes of `count`
/// initialized elements.
pub unsafe fn fill_cloned<T: Clone>(destination: *mut T, count: usize, value: &T) {
    for i in 0..count {
        // SAFETY: i < count, so the slot is in bounds and holds an initialized value.
        let slot = unsafe { &mut *destination.add(i) };
        slot.clone_from(value);
    }
}

/// # Safety
///
/// `destination` must be valid for writes of `count` single-byte elements.
unsafe fn fill_bytes<T: Copy>(destination: *mut T, count: usize, value: T) {
    debug_assert_eq!(size_of::<T>(), 1);

    // The byte may be uninitialized (e.g. `MaybeUninit<u8>`), so it is never read as a `u8`.
    // SAFETY: T is one byte wide and every byte is a valid `MaybeUninit<u8>`.
    let byte = unsafe { ptr::from_ref(&value).cast::<MaybeUninit<u8>>().read() };

    // SAFETY: The caller guarantees `count` writable bytes; `MaybeUninit<u8>` has no validity requirements.
    let bytes = unsafe { slice::from_raw_parts_mut(destination.cast::<MaybeUninit<u8>>(), count) };

    // Lowers to a single memset.
    bytes.fill(byte);
}

/// # Safety
///
/// `destination` must be valid for writes of `count` elements of `T`, where `size_of::<T>()` is a
/// power of two no larger than `VECTOR_BYTES` and `count * size_of::<T>() >= VECTOR_BYTES`.
unsafe fn fill_blocks<T: Copy>(destination: *mut T, count: usize, value: T) {
    let size = size_of::<T>();
    let lanes = VECTOR_BYTES / size;

    // The block is copied untyped, so any padding inside `T` is carried over as-is.
    let mut block = Block::uninit();
    let lane_base = block.as_mut_ptr().cast::<T>();

    for lane in 0..lanes {
        // SAFETY: lane * size < VECTOR_BYTES; the block has no alignment so we write unaligned.
        let slot = unsafe { lane_base.add(lane) };

        // SAFETY: See above.
        unsafe {
            slot.write_unaligned(value);
        }
    }

    let block_ptr = block.as_ptr().cast::<u8>();
    let base = destination.cast::<u8>();
    let total = count * size;

    let store = |offset: usize| {
        // SAFETY: Every offset passed below satisfies offset + VECTOR_BYTES <= total.
        let target = unsafe { base.add(offset) };

        // SAFETY: See above; the block is a local and never overlaps the destination.
        unsafe {
            ptr::copy_nonoverlapping(block_ptr, target, VECTOR_BYTES);
        }
    };

    let pair = 2 * VECTOR_BYTES;
    let stop = total & !(pair - 1);
    let mut offset = 0;

    while offset < stop {
        store(offset);
        store(offset + VECTOR_BYTES);
        offset += pair;
    }

    // Less than two blocks remain. Because `offset` is a multiple of two blocks, a full block
    // still fits exactly when the corresponding bit of the total length is set.
    if total & VECTOR_BYTES != 0 {
        store(offset);
    }

    // Sizes are powers of two no larger than the block, so the end-aligned block starts on an
    // element boundary and rewrites the final partial block with the same values.
    store(total - VECTOR_BYTES);
}

/// # Safety
///
/// `destination` must be valid for writes of `count` elements.
unsafe fn fill_scalar<T: Copy>(destination: *mut T, count: usize, value: T) {
    let mut i = 0;

    while count - i >= 8 {
        for k in 0..8 {
            // SAFETY: i + k < i + 8 <= count.
            unsafe {
                destination.add(i + k).write(value);
            }
        }

        i += 8;
    }

    let remaining = count - i;

    for width in [4, 2, 1] {
        if remaining & width != 0 {
            for k in 0..width {
                // SAFETY: The set bits of `remaining` sum to exactly count - i at the start.
                unsafe {
                    destination.add(i + k).write(value);
                }
            }

            i += width;
        }
    }

    debug_assert_eq!(i, count);
}
