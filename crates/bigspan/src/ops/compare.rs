// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::cmp::Ordering;

/// Compares `byte_len` bytes at `left` with `byte_len` bytes at `right` as unsigned bytes,
/// in address order.
///
/// # Safety
///
/// Both pointers must be non-null and valid for reads of `byte_len` initialized bytes.
#[must_use]
pub unsafe fn compare(left: *const u8, right: *const u8, byte_len: usize) -> Ordering {
    if byte_len == 0 || left == right {
        return Ordering::Equal;
    }

    // SAFETY: Forwarding the caller's guarantees.
    let result = unsafe { libc::memcmp(left.cast(), right.cast(), byte_len) };

    result.cmp(&0)
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use super::*;

    fn cmp(a: &[u8], b: &[u8]) -> Ordering {
        assert_eq!(a.len(), b.len());

        // SAFETY: Both slices hold a.len() bytes.
        unsafe { compare(a.as_ptr(), b.as_ptr(), a.len()) }
    }

    #[test]
    fn orders_by_first_difference() {
        assert_eq!(cmp(&[1, 2, 3], &[1, 2, 3]), Ordering::Equal);
        assert_eq!(cmp(&[1, 2, 3], &[1, 2, 4]), Ordering::Less);
        assert_eq!(cmp(&[1, 9, 0], &[1, 2, 4]), Ordering::Greater);
    }

    #[test]
    fn bytes_are_unsigned() {
        assert_eq!(cmp(&[0x80], &[0x7F]), Ordering::Greater);
    }

    #[test]
    fn empty_is_equal() {
        assert_eq!(cmp(&[], &[]), Ordering::Equal);
    }
}
