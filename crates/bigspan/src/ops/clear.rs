// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::ptr;

/// Past this many bytes, [`clear_without_references()`] hands the whole range to the platform
/// bulk-zero primitive instead of writing words itself.
pub const BULK_ZERO_THRESHOLD: usize = 512;

const WORD: usize = size_of::<usize>();

/// Zeroes `byte_len` bytes using the platform bulk-zero primitive (`memset`).
///
/// # Safety
///
/// `base` must be non-null and valid for writes of `byte_len` bytes.
#[inline]
pub unsafe fn zero_memory(base: *mut u8, byte_len: usize) {
    // SAFETY: Forwarding the caller's guarantees.
    unsafe {
        ptr::write_bytes(base, 0, byte_len);
    }
}

/// Zeroes `byte_len` bytes of plain data.
///
/// Short ranges are cleared with a handful of overlapping word stores, medium ranges are
/// aligned to a word boundary and cleared two words at a time, and long ranges are delegated to
/// [`zero_memory()`], whose throughput wins past [`BULK_ZERO_THRESHOLD`] bytes.
///
/// The range may be cleared with writes of any width and in any order, so it must not hold
/// pointers that somebody else could observe mid-clear. Use [`clear_with_references()`] for that.
///
/// # Safety
///
/// `base` must be non-null and valid for writes of `byte_len` bytes.
pub unsafe fn clear_without_references(base: *mut u8, byte_len: usize) {
    if byte_len == 0 {
        return;
    }

    if byte_len <= 32 {
        // SAFETY: Forwarding the caller's guarantees.
        unsafe {
            clear_small(base, byte_len);
        }
        return;
    }

    if byte_len >= BULK_ZERO_THRESHOLD {
        // SAFETY: Forwarding the caller's guarantees.
        unsafe {
            zero_memory(base, byte_len);
        }
        return;
    }

    // Bytes until the next word boundary, always less than one word.
    let head = base.addr().wrapping_neg() & (WORD - 1);

    // SAFETY: head < WORD <= 32 < byte_len, so the prologue is in bounds.
    unsafe {
        clear_small(base, head);
    }

    let mut offset = head;

    // We have more than 32 bytes and spent at most WORD - 1 on alignment, so the loop
    // always runs at least once.
    while byte_len - offset >= 2 * WORD {
        // SAFETY: offset is word-aligned relative to the (now aligned) address and at least
        // two whole words remain in bounds.
        let word = unsafe { base.add(offset) }.cast::<usize>();

        // SAFETY: See above, the first word is in bounds and aligned.
        unsafe {
            word.write(0);
        }

        // SAFETY: See above, the second word is in bounds and aligned.
        unsafe {
            word.add(1).write(0);
        }

        offset += 2 * WORD;
    }

    // SAFETY: The remaining tail is in bounds and shorter than two words.
    let tail = unsafe { base.add(offset) };

    // SAFETY: The tail holds byte_len - offset < 2 * WORD <= 32 bytes.
    unsafe {
        clear_small(tail, byte_len - offset);
    }
}

/// Zeroes up to 32 bytes with at most four unaligned stores, overlapping them where the
/// length is not an exact multiple of the store width.
///
/// # Safety
///
/// `base` must be non-null and valid for writes of `byte_len` bytes, with `byte_len <= 32`.
#[inline]
unsafe fn clear_small(base: *mut u8, byte_len: usize) {
    debug_assert!(byte_len <= 32);

    // SAFETY (for every arm): each store starts at an offset such that offset + width <= byte_len.
    unsafe {
        match byte_len {
            0 => {}
            1 => base.write(0),
            2..=3 => {
                zero_at::<u16>(base, 0);
                zero_at::<u16>(base, byte_len - 2);
            }
            4..=7 => {
                zero_at::<u32>(base, 0);
                zero_at::<u32>(base, byte_len - 4);
            }
            8..=15 => {
                zero_at::<u64>(base, 0);
                zero_at::<u64>(base, byte_len - 8);
            }
            16..=32 => {
                zero_at::<u64>(base, 0);
                zero_at::<u64>(base, 8);
                zero_at::<u64>(base, byte_len - 16);
                zero_at::<u64>(base, byte_len - 8);
            }
            _ => zero_memory(base, byte_len),
        }
    }
}

/// # Safety
///
/// `base + offset` must be valid for writes of `size_of::<W>()` bytes.
#[inline(always)]
unsafe fn zero_at<W: Default>(base: *mut u8, offset: usize) {
    // SAFETY: Forwarding the caller's guarantees; the write is explicitly unaligned.
    let target = unsafe { base.add(offset) }.cast::<W>();

    // SAFETY: Forwarding the caller's guarantees; the write is explicitly unaligned.
    unsafe {
        target.write_unaligned(W::default());
    }
}

/// Zeroes `pointer_len` pointer-sized words, always writing whole aligned words.
///
/// Memory that holds pointers must never be observed holding a partially written pointer, so
/// unlike [`clear_without_references()`] this never falls back to narrower stores. The bulk of
/// the range is cleared backward, eight words per iteration. The remaining zero to seven words
/// are covered by overlapping forward and backward stores.
///
/// # Safety
///
/// `base` must be non-null, aligned for `usize` and valid for writes of `pointer_len` words.
pub unsafe fn clear_with_references(base: *mut usize, mut pointer_len: usize) {
    debug_assert!(base.is_aligned(), "should be aligned on a natural word boundary");

    while pointer_len >= 8 {
        // SAFETY: The eight words ending at pointer_len are in bounds.
        let end = unsafe { base.add(pointer_len) };

        for back in 1..=8 {
            // SAFETY: end - back >= end - 8 >= base, in bounds and aligned.
            unsafe {
                end.sub(back).write(0);
            }
        }

        pointer_len -= 8;
    }

    debug_assert!(pointer_len <= 7);

    // SAFETY: Every index below is < pointer_len, in bounds and aligned.
    unsafe {
        match pointer_len {
            0 => {}
            1 => base.write(0),
            2..=3 => {
                base.write(0);
                base.add(1).write(0);
                base.add(pointer_len - 1).write(0);
            }
            _ => {
                base.write(0);
                base.add(1).write(0);
                base.add(2).write(0);
                base.add(3).write(0);
                base.add(pointer_len - 3).write(0);
                base.add(pointer_len - 2).write(0);
                base.add(pointer_len - 1).write(0);
            }
        }
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    #[case(7)]
    #[case(8)]
    #[case(9)]
    #[case(15)]
    #[case(16)]
    #[case(17)]
    #[case(31)]
    #[case(32)]
    #[case(33)]
    #[case(100)]
    #[case(511)]
    #[case(512)]
    #[case(4099)]
    fn clears_exactly_the_range(#[case] len: usize) {
        // Test at every misalignment of the start address.
        for start in 0..WORD {
            let mut buffer = vec![0xAA_u8; len + 2 * WORD];

            // SAFETY: start + len is within the buffer.
            unsafe {
                clear_without_references(buffer.as_mut_ptr().add(start), len);
            }

            assert!(buffer[..start].iter().all(|&b| b == 0xAA));
            assert!(buffer[start..start + len].iter().all(|&b| b == 0));
            assert!(buffer[start + len..].iter().all(|&b| b == 0xAA));
        }
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    #[case(4)]
    #[case(7)]
    #[case(8)]
    #[case(9)]
    #[case(16)]
    #[case(23)]
    fn clears_whole_words(#[case] len: usize) {
        let mut buffer = vec![usize::MAX; len + 1];

        // SAFETY: The vector holds len + 1 aligned words.
        unsafe {
            clear_with_references(buffer.as_mut_ptr(), len);
        }

        assert!(buffer[..len].iter().all(|&w| w == 0));
        assert_eq!(buffer[len], usize::MAX);
    }

    #[test]
    fn zero_memory_large() {
        let mut buffer = vec![1_u8; 1 << 16];

        // SAFETY: The vector holds the full length.
        unsafe {
            zero_memory(buffer.as_mut_ptr(), buffer.len());
        }

        assert!(buffer.iter().all(|&b| b == 0));
    }
}
