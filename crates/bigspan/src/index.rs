// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::ops::{Bound, RangeBounds};

use crate::{Error, Result};

/// An element position counted backward from the end of a span.
///
/// `FromEnd(1)` is the last element, `FromEnd(len)` the first. `FromEnd(0)` is one past the end
/// and therefore never a valid element.
///
/// # Example
///
/// ```
/// use bigspan::{FromEnd, ReadOnlyBigSpan};
///
/// let data = [1, 2, 3];
/// let span = ReadOnlyBigSpan::from(&data[..]);
///
/// assert_eq!(span[FromEnd(1)], 3);
/// assert_eq!(span.get_from_end(3), Some(&1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FromEnd(pub usize);

impl FromEnd {
    /// Resolves the position against a span of `len` elements.
    pub(crate) fn resolve(self, len: usize) -> Option<usize> {
        if self.0 == 0 {
            return None;
        }

        len.checked_sub(self.0)
    }
}

/// Reports an out-of-range element access from an `Index` operator.
#[cold]
#[track_caller]
#[expect(clippy::panic, reason = "Index and IndexMut report out-of-range access by panicking, like slices")]
pub(crate) fn panic_out_of_range(index: usize, len: usize) -> ! {
    panic!("{}", Error::IndexOutOfRange { index, len })
}

/// Validates that `[start, start + count)` lies within `[0, len)`.
pub(crate) fn check_range(start: usize, count: usize, len: usize) -> Result<()> {
    match start.checked_add(count) {
        Some(end) if end <= len => Ok(()),
        _ => Err(Error::SliceOutOfRange { start, count, len }),
    }
}

/// Converts arbitrary range bounds into a validated `(start, count)` pair.
pub(crate) fn resolve_range(range: impl RangeBounds<usize>, len: usize) -> Result<(usize, usize)> {
    let start = match range.start_bound() {
        Bound::Included(&start) => start,
        Bound::Excluded(&start) => start.checked_add(1).ok_or(Error::SliceOutOfRange {
            start,
            count: 0,
            len,
        })?,
        Bound::Unbounded => 0,
    };

    let end = match range.end_bound() {
        Bound::Included(&end) => end.checked_add(1).ok_or(Error::SliceOutOfRange {
            start,
            count: usize::MAX,
            len,
        })?,
        Bound::Excluded(&end) => end,
        Bound::Unbounded => len,
    };

    let count = end.checked_sub(start).ok_or(Error::SliceOutOfRange { start, count: 0, len })?;
    check_range(start, count, len)?;

    Ok((start, count))
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_end_resolution() {
        assert_eq!(FromEnd(1).resolve(5), Some(4));
        assert_eq!(FromEnd(5).resolve(5), Some(0));
        assert_eq!(FromEnd(6).resolve(5), None);
        assert_eq!(FromEnd(0).resolve(5), None);
    }

    #[test]
    fn range_check_does_not_overflow() {
        check_range(0, 10, 10).unwrap();
        check_range(10, 0, 10).unwrap();
        check_range(11, 0, 10).unwrap_err();
        check_range(1, usize::MAX, 10).unwrap_err();
        check_range(usize::MAX, usize::MAX, usize::MAX).unwrap_err();
    }

    #[test]
    fn resolves_all_range_shapes() {
        assert_eq!(resolve_range(.., 8).unwrap(), (0, 8));
        assert_eq!(resolve_range(2.., 8).unwrap(), (2, 6));
        assert_eq!(resolve_range(..3, 8).unwrap(), (0, 3));
        assert_eq!(resolve_range(..=3, 8).unwrap(), (0, 4));
        assert_eq!(resolve_range(2..5, 8).unwrap(), (2, 3));
        assert_eq!(resolve_range(8..8, 8).unwrap(), (8, 0));
        assert_eq!(
            resolve_range((Bound::Excluded(1), Bound::Included(2)), 8).unwrap(),
            (2, 1)
        );
    }

    #[test]
    #[expect(clippy::reversed_empty_ranges, reason = "testing rejection of reversed ranges")]
    fn rejects_bad_ranges() {
        resolve_range(5..3, 8).unwrap_err();
        resolve_range(0..9, 8).unwrap_err();
        resolve_range(9.., 8).unwrap_err();
        resolve_range(..=usize::MAX, 8).unwrap_err();
    }
}
