// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Scoped iteration sequences over spans.
//!
//! Some consumers want a general-purpose, re-iterable sequence instead of a span: something that
//! can be stored in a variable, iterated several times and passed around by value. A
//! [`PinnedSequence`] is such a sequence. It is only ever handed to a callback and its lifetime is
//! chosen by the callback's caller, so it cannot escape the callback. For the duration of the
//! callback the underlying storage stays at a fixed address.
//!
//! ```
//! use bigspan::{ReadOnlyBigSpan, with_pinned_sequence_2};
//!
//! let left = [1, 2, 3];
//! let right = [10, 20, 30];
//!
//! let dot = with_pinned_sequence_2(ReadOnlyBigSpan::from(&left), ReadOnlyBigSpan::from(&right), |a, b| {
//!     a.into_iter().zip(b).map(|(x, y)| x * y).sum::<i32>()
//! });
//!
//! assert_eq!(dot, 140);
//! ```

use crate::{BigSpan, Iter, ReadOnlyBigSpan};

/// A re-iterable sequence over the elements of a span whose storage stays at a fixed address
/// for the lifetime `'p`.
///
/// Obtained via [`with_pinned_sequence()`] and its multi-span variants.
#[derive(Debug)]
pub struct PinnedSequence<'p, T> {
    span: ReadOnlyBigSpan<'p, T>,
}

impl<T> Clone for PinnedSequence<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for PinnedSequence<'_, T> {}

impl<'p, T> PinnedSequence<'p, T> {
    /// The number of elements in the sequence.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.span.len()
    }

    /// Whether the sequence has no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.span.is_empty()
    }

    /// The fixed address of the first element.
    #[must_use]
    pub const fn as_ptr(&self) -> *const T {
        self.span.as_ptr()
    }

    /// Starts a new pass over the elements.
    #[must_use]
    pub fn iter(&self) -> Iter<'p, T> {
        self.span.iter()
    }
}

impl<'p, T> IntoIterator for PinnedSequence<'p, T> {
    type Item = &'p T;
    type IntoIter = Iter<'p, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'p, T> IntoIterator for &PinnedSequence<'p, T> {
    type Item = &'p T;
    type IntoIter = Iter<'p, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

const fn pin<T>(span: ReadOnlyBigSpan<'_, T>) -> PinnedSequence<'_, T> {
    PinnedSequence { span }
}

/// Invokes `f` with a sequence over the elements of `a` and returns its result.
pub fn with_pinned_sequence<T, R>(a: ReadOnlyBigSpan<'_, T>, f: impl for<'p> FnOnce(PinnedSequence<'p, T>) -> R) -> R {
    f(pin(a))
}

/// Invokes `f` with sequences over the elements of `a` and `b` and returns its result.
pub fn with_pinned_sequence_2<T1, T2, R>(
    a: ReadOnlyBigSpan<'_, T1>,
    b: ReadOnlyBigSpan<'_, T2>,
    f: impl for<'p> FnOnce(PinnedSequence<'p, T1>, PinnedSequence<'p, T2>) -> R,
) -> R {
    f(pin(a), pin(b))
}

/// Invokes `f` with sequences over the elements of `a`, `b` and `c` and returns its result.
pub fn with_pinned_sequence_3<T1, T2, T3, R>(
    a: ReadOnlyBigSpan<'_, T1>,
    b: ReadOnlyBigSpan<'_, T2>,
    c: ReadOnlyBigSpan<'_, T3>,
    f: impl for<'p> FnOnce(PinnedSequence<'p, T1>, PinnedSequence<'p, T2>, PinnedSequence<'p, T3>) -> R,
) -> R {
    f(pin(a), pin(b), pin(c))
}

/// Invokes `f` with sequences over the elements of four spans and returns its result.
pub fn with_pinned_sequence_4<T1, T2, T3, T4, R>(
    a: ReadOnlyBigSpan<'_, T1>,
    b: ReadOnlyBigSpan<'_, T2>,
    c: ReadOnlyBigSpan<'_, T3>,
    d: ReadOnlyBigSpan<'_, T4>,
    f: impl for<'p> FnOnce(PinnedSequence<'p, T1>, PinnedSequence<'p, T2>, PinnedSequence<'p, T3>, PinnedSequence<'p, T4>) -> R,
) -> R {
    f(pin(a), pin(b), pin(c), pin(d))
}

impl<T> ReadOnlyBigSpan<'_, T> {
    /// Invokes `f` with a sequence over the elements of this span and returns its result.
    pub fn with_pinned_sequence<R>(self, f: impl for<'p> FnOnce(PinnedSequence<'p, T>) -> R) -> R {
        with_pinned_sequence(self, f)
    }
}

impl<T> BigSpan<'_, T> {
    /// Invokes `f` with a sequence over the elements of this span and returns its result.
    pub fn with_pinned_sequence<R>(&self, f: impl for<'p> FnOnce(PinnedSequence<'p, T>) -> R) -> R {
        with_pinned_sequence(self.as_read_only(), f)
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_reiterable() {
        let data = [3, 1, 4, 1, 5];

        let (count, max) = ReadOnlyBigSpan::from(&data).with_pinned_sequence(|sequence| {
            let count = sequence.iter().count();
            let max = sequence.into_iter().max().copied();
            (count, max)
        });

        assert_eq!(count, 5);
        assert_eq!(max, Some(5));
    }

    #[test]
    fn address_is_the_span_base() {
        let mut data = [0_u8; 16];
        let span = BigSpan::from(&mut data);
        let base = span.as_ptr();

        let observed = span.with_pinned_sequence(|sequence| sequence.as_ptr());
        assert_eq!(observed, base);
    }

    #[test]
    fn empty_sequence() {
        let nothing = with_pinned_sequence(ReadOnlyBigSpan::<u64>::empty(), |sequence| {
            assert!(sequence.is_empty());
            sequence.iter().next().is_none()
        });

        assert!(nothing);
    }

    #[test]
    fn up_to_four_sequences() {
        let a = [1_u8, 2];
        let b = [10_u16, 20];
        let c = [100_u32, 200];
        let d = [1000_u64, 2000];

        let three = with_pinned_sequence_3(
            ReadOnlyBigSpan::from(&a),
            ReadOnlyBigSpan::from(&b),
            ReadOnlyBigSpan::from(&c),
            |a, b, c| a.len() + b.len() + c.len(),
        );
        assert_eq!(three, 6);

        let sums: Vec<u64> = with_pinned_sequence_4(
            ReadOnlyBigSpan::from(&a),
            ReadOnlyBigSpan::from(&b),
            ReadOnlyBigSpan::from(&c),
            ReadOnlyBigSpan::from(&d),
            |a, b, c, d| {
                a.into_iter()
                    .zip(b)
                    .zip(c)
                    .zip(d)
                    .map(|(((&a, &b), &c), &d)| u64::from(a) + u64::from(b) + u64::from(c) + d)
                    .collect()
            },
        );
        assert_eq!(sums, [1111, 2222]);
    }
}
