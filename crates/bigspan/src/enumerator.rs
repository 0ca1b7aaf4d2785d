// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::{BigSpan, ReadOnlyBigSpan};

/// Index of a cursor that has not been advanced yet. Advancing wraps it to zero.
const BEFORE_START: usize = usize::MAX;

/// A forward-only cursor over the elements of a read-only span.
///
/// A new cursor is positioned before the first element. Each successful
/// [`move_next()`][Self::move_next] moves it to the next element, which is then available via
/// [`current()`][Self::current]. Once `move_next()` returns `false` the cursor stays on the last
/// element it reached until it is [`reset()`][Self::reset].
///
/// Prefer [`Iter`] where a Rust iterator fits; the cursor exists for code that tracks an
/// explicit position.
///
/// # Example
///
/// ```
/// use bigspan::ReadOnlyBigSpan;
///
/// let data = [10, 20, 30];
/// let mut cursor = ReadOnlyBigSpan::from(&data).cursor();
///
/// let mut sum = 0;
/// while cursor.move_next() {
///     sum += *cursor.current();
/// }
///
/// assert_eq!(sum, 60);
/// ```
#[derive(Debug, Clone)]
pub struct Cursor<'a, T> {
    span: ReadOnlyBigSpan<'a, T>,
    index: usize,
}

impl<'a, T> Cursor<'a, T> {
    pub(crate) const fn new(span: ReadOnlyBigSpan<'a, T>) -> Self {
        Self { span, index: BEFORE_START }
    }

    /// Advances to the next element. Returns `false` without moving if there is none.
    pub fn move_next(&mut self) -> bool {
        let next = self.index.wrapping_add(1);

        if next >= self.span.len() {
            return false;
        }

        self.index = next;
        true
    }

    /// The element the cursor is positioned on.
    ///
    /// # Panics
    ///
    /// Panics if [`move_next()`][Self::move_next] has not yet returned `true`.
    #[must_use]
    pub fn current(&self) -> &'a T {
        self.span
            .get(self.index)
            .expect("cursor has not been advanced onto an element")
    }

    /// The index of the element the cursor is positioned on, or `None` before the first element.
    #[must_use]
    pub fn position(&self) -> Option<usize> {
        (self.index != BEFORE_START).then_some(self.index)
    }

    /// Moves the cursor back to before the first element.
    pub fn reset(&mut self) {
        self.index = BEFORE_START;
    }
}

/// A forward-only cursor over the elements of a mutable span.
///
/// Behaves like [`Cursor`] and additionally hands out mutable access to the current element.
#[derive(Debug)]
pub struct CursorMut<'s, T> {
    span: BigSpan<'s, T>,
    index: usize,
}

impl<'s, T> CursorMut<'s, T> {
    pub(crate) const fn new(span: BigSpan<'s, T>) -> Self {
        Self { span, index: BEFORE_START }
    }

    /// Advances to the next element. Returns `false` without moving if there is none.
    pub fn move_next(&mut self) -> bool {
        let next = self.index.wrapping_add(1);

        if next >= self.span.len() {
            return false;
        }

        self.index = next;
        true
    }

    /// The element the cursor is positioned on.
    ///
    /// # Panics
    ///
    /// Panics if [`move_next()`][Self::move_next] has not yet returned `true`.
    #[must_use]
    pub fn current(&self) -> &T {
        assert!(self.index != BEFORE_START, "cursor has not been advanced onto an element");

        &self.span[self.index]
    }

    /// Mutable access to the element the cursor is positioned on.
    ///
    /// # Panics
    ///
    /// Panics if [`move_next()`][Self::move_next] has not yet returned `true`.
    pub fn current_mut(&mut self) -> &mut T {
        assert!(self.index != BEFORE_START, "cursor has not been advanced onto an element");

        &mut self.span[self.index]
    }

    /// Moves the cursor back to before the first element.
    pub fn reset(&mut self) {
        self.index = BEFORE_START;
    }
}

/// Iterator over the elements of a read-only span.
///
/// Returned by [`ReadOnlyBigSpan::iter()`] and [`BigSpan::iter()`].
#[derive(Debug)]
pub struct Iter<'a, T> {
    span: ReadOnlyBigSpan<'a, T>,
    front: usize,
    back: usize,
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            span: self.span,
            front: self.front,
            back: self.back,
        }
    }
}

impl<'a, T> Iter<'a, T> {
    pub(crate) const fn new(span: ReadOnlyBigSpan<'a, T>) -> Self {
        Self {
            front: 0,
            back: span.len(),
            span,
        }
    }

    /// The elements not yet yielded, as a span.
    #[must_use]
    pub fn remaining(&self) -> ReadOnlyBigSpan<'a, T> {
        self.span.split_at(self.back).0.split_at(self.front).1
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }

        // SAFETY: front < back <= len.
        let element = unsafe { self.span.get_unchecked(self.front) };
        self.front += 1;
        Some(element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.front = self.front.saturating_add(n).min(self.back);
        self.next()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }

        self.back -= 1;

        // SAFETY: front <= back < len.
        Some(unsafe { self.span.get_unchecked(self.back) })
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

/// Iterator over mutable references to the elements of a span.
///
/// Returned by [`BigSpan::iter_mut()`].
#[derive(Debug)]
pub struct IterMut<'a, T> {
    ptr: NonNull<T>,
    front: usize,
    back: usize,

    _marker: PhantomData<&'a mut [T]>,
}

// SAFETY: Equivalent to a `&mut [T]`, which is `Send` when `T: Send`.
unsafe impl<T: Send> Send for IterMut<'_, T> {}
// SAFETY: Equivalent to a `&mut [T]`, which is `Sync` when `T: Sync`.
unsafe impl<T: Sync> Sync for IterMut<'_, T> {}

impl<'a, T> IterMut<'a, T> {
    pub(crate) fn new(span: BigSpan<'a, T>) -> Self {
        let (ptr, len) = span.into_raw_parts();

        Self {
            ptr,
            front: 0,
            back: len,
            _marker: PhantomData,
        }
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }

        // SAFETY: front < back <= len; every index is handed out at most once, so the mutable
        // references never alias.
        let mut element = unsafe { self.ptr.add(self.front) };
        self.front += 1;

        // SAFETY: See above.
        Some(unsafe { element.as_mut() })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for IterMut<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }

        self.back -= 1;

        // SAFETY: front <= back < len; every index is handed out at most once.
        let mut element = unsafe { self.ptr.add(self.back) };

        // SAFETY: See above.
        Some(unsafe { element.as_mut() })
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

impl<T> FusedIterator for IterMut<'_, T> {}
