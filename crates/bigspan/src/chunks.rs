// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::iter::FusedIterator;
use std::mem;
use std::num::NonZero;
use std::slice;

use crate::{BigSpan, NATIVE_MAX_LEN, ReadOnlyBigSpan};

/// Chunk lengths above the native limit would produce slices that native APIs cannot accept.
fn effective_chunk_len(max_chunk_len: NonZero<usize>) -> usize {
    max_chunk_len.get().min(NATIVE_MAX_LEN)
}

/// Iterator over consecutive native slices of at most a fixed length that together cover a span.
///
/// Returned by [`ReadOnlyBigSpan::small_slices()`]. Every chunk except the last holds exactly
/// the chunk length; the last holds the remainder. An empty span yields no chunks.
#[derive(Debug)]
pub struct SmallSlices<'a, T> {
    rest: ReadOnlyBigSpan<'a, T>,
    chunk_len: usize,
}

impl<'a, T> Iterator for SmallSlices<'a, T> {
    type Item = &'a [T];

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        let (head, tail) = self.rest.split_at(self.chunk_len.min(self.rest.len()));
        self.rest = tail;

        // SAFETY: The head is part of a valid span for 'a and holds at most NATIVE_MAX_LEN elements.
        Some(unsafe { slice::from_raw_parts(head.as_ptr(), head.len()) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.rest.len().div_ceil(self.chunk_len);
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for SmallSlices<'_, T> {}

impl<T> FusedIterator for SmallSlices<'_, T> {}

/// Iterator over consecutive mutable native slices of at most a fixed length that together cover
/// a span.
///
/// Returned by [`BigSpan::small_slices_mut()`].
#[derive(Debug)]
pub struct SmallSlicesMut<'a, T> {
    rest: BigSpan<'a, T>,
    chunk_len: usize,
}

impl<'a, T> Iterator for SmallSlicesMut<'a, T> {
    type Item = &'a mut [T];

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        let rest = mem::take(&mut self.rest);
        let len = self.chunk_len.min(rest.len());
        let (head, tail) = rest.split_at(len);
        self.rest = tail;

        let (ptr, len) = head.into_raw_parts();

        // SAFETY: The head was split off a valid span for 'a, is disjoint from everything handed
        // out before and after it and holds at most NATIVE_MAX_LEN elements.
        Some(unsafe { slice::from_raw_parts_mut(ptr.as_ptr(), len) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.rest.len().div_ceil(self.chunk_len);
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for SmallSlicesMut<'_, T> {}

impl<T> FusedIterator for SmallSlicesMut<'_, T> {}

impl<'a, T> ReadOnlyBigSpan<'a, T> {
    /// Returns an iterator over native slices of at most `max_chunk_len` elements that cover
    /// the span exactly once, in order.
    ///
    /// Chunk lengths above [`NATIVE_MAX_LEN`] are reduced to it.
    #[must_use]
    pub fn small_slices(&self, max_chunk_len: NonZero<usize>) -> SmallSlices<'a, T> {
        SmallSlices {
            rest: *self,
            chunk_len: effective_chunk_len(max_chunk_len),
        }
    }

    /// Invokes `action` on each native slice of at most `max_chunk_len` elements, in order.
    ///
    /// # Example
    ///
    /// ```
    /// use bigspan::ReadOnlyBigSpan;
    /// use new_zealand::nz;
    ///
    /// let data = [1_u8; 10];
    /// let mut lengths = Vec::new();
    ///
    /// ReadOnlyBigSpan::from(&data).as_small_slices(nz!(4), |chunk| lengths.push(chunk.len()));
    ///
    /// assert_eq!(lengths, [4, 4, 2]);
    /// ```
    pub fn as_small_slices(&self, max_chunk_len: NonZero<usize>, action: impl FnMut(&'a [T])) {
        self.small_slices(max_chunk_len).for_each(action);
    }

    /// Invokes `f` on each native slice of at most `max_chunk_len` elements, in order, stopping
    /// at the first chunk for which `f` returns `false`.
    ///
    /// Returns `true` if every chunk was processed.
    pub fn try_as_small_slices(&self, max_chunk_len: NonZero<usize>, f: impl FnMut(&'a [T]) -> bool) -> bool {
        self.small_slices(max_chunk_len).all(f)
    }

    /// Maps each native slice of at most `max_chunk_len` elements through `f` and collects the
    /// results in chunk order.
    ///
    /// The result holds `ceil(len() / max_chunk_len)` elements and is allocated once, up front.
    pub fn select_small_slices<R>(&self, max_chunk_len: NonZero<usize>, f: impl FnMut(&'a [T]) -> R) -> Vec<R> {
        let chunks = self.small_slices(max_chunk_len);

        if chunks.len() == 0 {
            return Vec::new();
        }

        let mut results = Vec::with_capacity(chunks.len());
        results.extend(chunks.map(f));
        results
    }
}

impl<T> BigSpan<'_, T> {
    /// Returns an iterator over mutable native slices of at most `max_chunk_len` elements that
    /// cover the span exactly once, in order.
    ///
    /// Chunk lengths above [`NATIVE_MAX_LEN`] are reduced to it.
    #[must_use]
    pub fn small_slices_mut(&mut self, max_chunk_len: NonZero<usize>) -> SmallSlicesMut<'_, T> {
        SmallSlicesMut {
            rest: self.reborrow(),
            chunk_len: effective_chunk_len(max_chunk_len),
        }
    }

    /// Returns an iterator over read-only native slices of at most `max_chunk_len` elements.
    #[must_use]
    pub fn small_slices(&self, max_chunk_len: NonZero<usize>) -> SmallSlices<'_, T> {
        self.as_read_only().small_slices(max_chunk_len)
    }

    /// Invokes `action` on each mutable native slice of at most `max_chunk_len` elements, in order.
    pub fn as_small_slices(&mut self, max_chunk_len: NonZero<usize>, action: impl FnMut(&mut [T])) {
        self.small_slices_mut(max_chunk_len).for_each(action);
    }

    /// Invokes `f` on each mutable native slice of at most `max_chunk_len` elements, in order,
    /// stopping at the first chunk for which `f` returns `false`.
    ///
    /// Returns `true` if every chunk was processed.
    pub fn try_as_small_slices(&mut self, max_chunk_len: NonZero<usize>, mut f: impl FnMut(&mut [T]) -> bool) -> bool {
        self.small_slices_mut(max_chunk_len).all(|chunk| f(chunk))
    }

    /// Maps each mutable native slice of at most `max_chunk_len` elements through `f` and
    /// collects the results in chunk order.
    pub fn select_small_slices<R>(&mut self, max_chunk_len: NonZero<usize>, mut f: impl FnMut(&mut [T]) -> R) -> Vec<R> {
        let chunks = self.small_slices_mut(max_chunk_len);

        if chunks.len() == 0 {
            return Vec::new();
        }

        let mut results = Vec::with_capacity(chunks.len());
        results.extend(chunks.map(|chunk| f(chunk)));
        results
    }
}
