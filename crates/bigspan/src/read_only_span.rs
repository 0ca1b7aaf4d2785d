// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::any::{TypeId, type_name};
use std::cmp::Ordering;
use std::fmt::{self, Debug, Display, Formatter, Write as _};
use std::marker::PhantomData;
use std::ops::{Index, RangeBounds};
use std::ptr::NonNull;
use std::slice;

use crate::index::{check_range, panic_out_of_range, resolve_range};
use crate::{BigSpan, Cursor, Error, FromEnd, Iter, NATIVE_MAX_LEN, Result, Unmanaged, ops};

/// Number of elements shown by the `Debug` output of a span.
pub(crate) const DEBUG_PREVIEW_LEN: usize = 8;

/// A read-only view over a contiguous run of `T` whose length is a full `usize`.
///
/// This is the shared-borrow counterpart of [`BigSpan`]. It behaves like `&'a [T]` except that its
/// length is not limited to what a native 32-bit length can express, every slicing operation
/// reports out-of-range requests as [`Error`] values and equality compares identity (the same
/// base address and length), not contents.
///
/// Content comparisons are explicit: see [`compare_memory()`][Self::compare_memory] and
/// [`sequence_equal()`][Self::sequence_equal].
///
/// # Thread safety
///
/// The type is thread-safe when `T` is `Sync`, like a shared slice reference.
pub struct ReadOnlyBigSpan<'a, T> {
    ptr: NonNull<T>,
    len: usize,

    _marker: PhantomData<&'a [T]>,
}

impl<T> Clone for ReadOnlyBigSpan<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ReadOnlyBigSpan<'_, T> {}

// SAFETY: Equivalent to a `&[T]`, which is `Send` when `T: Sync`.
unsafe impl<T: Sync> Send for ReadOnlyBigSpan<'_, T> {}
// SAFETY: Equivalent to a `&[T]`, which is `Sync` when `T: Sync`.
unsafe impl<T: Sync> Sync for ReadOnlyBigSpan<'_, T> {}

impl<'a, T> ReadOnlyBigSpan<'a, T> {
    /// Returns a span with no elements.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            ptr: NonNull::dangling(),
            len: 0,
            _marker: PhantomData,
        }
    }

    /// # Safety
    ///
    /// `ptr` must be valid for reads of `len` initialized elements for the lifetime `'a` and the
    /// memory must not be mutated through any other path during that lifetime. If `len` is zero,
    /// any well-aligned non-null pointer is accepted.
    pub(crate) const unsafe fn from_parts(ptr: NonNull<T>, len: usize) -> Self {
        Self {
            ptr,
            len,
            _marker: PhantomData,
        }
    }

    /// Creates a read-only span over `len` elements of unmanaged memory starting at `ptr`.
    ///
    /// A null `ptr` is accepted when `len` is zero and yields an empty span.
    ///
    /// # Safety
    ///
    /// * `ptr` must be aligned for `T` and valid for reads of `len * size_of::<T>()` bytes,
    ///   which must not exceed `isize::MAX`.
    /// * The memory must not be mutated or freed for the lifetime `'a` chosen by the caller.
    pub unsafe fn from_raw_parts(ptr: *const T, len: usize) -> Self
    where
        T: Unmanaged,
    {
        debug_assert!(len == 0 || !ptr.is_null(), "only an empty span may start at a null pointer");

        let ptr = NonNull::new(ptr.cast_mut()).unwrap_or(NonNull::dangling());

        // SAFETY: Forwarding the caller's guarantees.
        unsafe { Self::from_parts(ptr, len) }
    }

    /// Creates a read-only span over `len` elements of `slice` starting at `start`.
    ///
    /// A missing slice is treated as empty: it is accepted only with a zero `start` and `len`.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidArgument`] if `slice` is `None` and `start` or `len` is non-zero.
    /// * [`Error::SliceOutOfRange`] if `start + len` exceeds the length of the slice.
    pub fn from_sub_range(slice: Option<&'a [T]>, start: usize, len: usize) -> Result<Self> {
        let Some(slice) = slice else {
            if start != 0 || len != 0 {
                return Err(Error::InvalidArgument("a missing slice can only be viewed as an empty span"));
            }

            return Ok(Self::empty());
        };

        Self::from(slice).slice(start, len)
    }

    /// The number of elements in the span.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// The number of elements in the span, widened to 64 bits on every platform.
    #[must_use]
    pub const fn long_len(&self) -> u64 {
        self.len as u64
    }

    /// Whether the span has no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Raw pointer to the first element.
    ///
    /// For an empty span this is a well-aligned dangling pointer that must not be dereferenced.
    #[must_use]
    pub const fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    pub(crate) const fn non_null(&self) -> NonNull<T> {
        self.ptr
    }

    /// Reference to the first element, or `None` if the span is empty.
    ///
    /// The address of the returned element is the base address of the span, suitable for handing
    /// the span's storage to code that needs a stable address for as long as the borrow lasts.
    #[must_use]
    pub fn pinnable_reference(&self) -> Option<&'a T> {
        self.get(0)
    }

    /// Returns the element at `index`, or `None` if `index >= len()`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&'a T> {
        if index >= self.len {
            return None;
        }

        // SAFETY: Bounds checked above.
        Some(unsafe { self.get_unchecked(index) })
    }

    /// Returns the element at `offset` positions from the end, or `None` if out of range.
    ///
    /// See [`FromEnd`] for the counting convention.
    #[must_use]
    pub fn get_from_end(&self, offset: usize) -> Option<&'a T> {
        FromEnd(offset).resolve(self.len).and_then(|index| self.get(index))
    }

    /// Returns the element at `index` without bounds checking.
    ///
    /// # Safety
    ///
    /// `index` must be less than `len()`.
    #[must_use]
    pub unsafe fn get_unchecked(&self, index: usize) -> &'a T {
        debug_assert!(index < self.len);

        // SAFETY: The caller guarantees index is in bounds, so the element is initialized and
        // borrowed from the span for 'a.
        let element = unsafe { self.ptr.add(index) };

        // SAFETY: See above.
        unsafe { element.as_ref() }
    }

    /// Forms a sub-span of `count` elements starting at `start`.
    ///
    /// # Errors
    ///
    /// [`Error::SliceOutOfRange`] if `start + count > len()`. The sum is evaluated without overflow.
    pub fn slice(&self, start: usize, count: usize) -> Result<Self> {
        check_range(start, count, self.len)?;

        // SAFETY: The range was validated above so the sub-span is within the same storage.
        let ptr = unsafe { self.ptr.add(start) };

        // SAFETY: See above.
        Ok(unsafe { Self::from_parts(ptr, count) })
    }

    /// Forms a sub-span of all elements from `start` to the end.
    ///
    /// # Errors
    ///
    /// [`Error::SliceOutOfRange`] if `start > len()`.
    pub fn slice_from(&self, start: usize) -> Result<Self> {
        let count = self
            .len
            .checked_sub(start)
            .ok_or(Error::SliceOutOfRange { start, count: 0, len: self.len })?;

        self.slice(start, count)
    }

    /// Forms a sub-span covering `range`.
    ///
    /// # Errors
    ///
    /// [`Error::SliceOutOfRange`] if the range is reversed or reaches past the end of the span.
    pub fn slice_range(&self, range: impl RangeBounds<usize>) -> Result<Self> {
        let (start, count) = resolve_range(range, self.len)?;
        self.slice(start, count)
    }

    /// Forms a native slice of `len` elements starting at `start`.
    ///
    /// This bridges big spans into APIs that take ordinary slices with 32-bit lengths.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidArgument`] if `len` is negative.
    /// * [`Error::SliceOutOfRange`] if the range reaches past the end of the span.
    pub fn slice_native(&self, start: usize, len: i32) -> Result<&'a [T]> {
        let Ok(count) = usize::try_from(len) else {
            return Err(Error::InvalidArgument("native slice length must not be negative"));
        };

        self.slice(start, count)?.as_native_slice()
    }

    /// Forms a native slice from a 32-bit start index and length.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidArgument`] if `start` or `len` is negative.
    /// * [`Error::SliceOutOfRange`] if the range reaches past the end of the span.
    pub fn slice_native_i32(&self, start: i32, len: i32) -> Result<&'a [T]> {
        let Ok(start) = usize::try_from(start) else {
            return Err(Error::InvalidArgument("native slice start must not be negative"));
        };

        self.slice_native(start, len)
    }

    /// Views the whole span as a native slice.
    ///
    /// # Errors
    ///
    /// [`Error::CapacityExceeded`] if the span holds more than [`NATIVE_MAX_LEN`] elements.
    pub fn as_native_slice(&self) -> Result<&'a [T]> {
        if self.len > NATIVE_MAX_LEN {
            return Err(Error::CapacityExceeded {
                len: self.len,
                max: NATIVE_MAX_LEN,
            });
        }

        // SAFETY: The span is valid for reads of len elements for 'a and the length is small
        // enough to be a valid slice length.
        Ok(unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) })
    }

    /// Copies every element of this span to the start of `destination`.
    ///
    /// Elements of `destination` past `len()` are left untouched. The copy behaves as if the
    /// source were first copied to a temporary buffer, so overlapping spans are handled.
    ///
    /// # Errors
    ///
    /// [`Error::DestinationTooShort`] if `destination` is shorter than this span. Nothing is
    /// written in that case.
    pub fn copy_to(&self, destination: &mut BigSpan<'_, T>) -> Result<()>
    where
        T: Copy,
    {
        if destination.len() < self.len {
            return Err(Error::DestinationTooShort {
                source_len: self.len,
                destination_len: destination.len(),
            });
        }

        // SAFETY: Both spans are valid for len elements and T is Copy, so a bitwise duplicate is
        // a valid value. ops::copy_elements tolerates overlap.
        unsafe {
            ops::copy_elements(destination.as_mut_ptr(), self.as_ptr(), self.len);
        }

        Ok(())
    }

    /// Same as [`copy_to()`][Self::copy_to] but reports a too short destination as `false`.
    ///
    /// On `false` the destination is left bit-identical to how it was before the call.
    pub fn try_copy_to(&self, destination: &mut BigSpan<'_, T>) -> bool
    where
        T: Copy,
    {
        self.copy_to(destination).is_ok()
    }

    /// Copies every element of this span to the start of a native slice.
    ///
    /// # Errors
    ///
    /// [`Error::DestinationTooShort`] if `destination` is shorter than this span.
    pub fn copy_to_native(&self, destination: &mut [T]) -> Result<()>
    where
        T: Copy,
    {
        self.copy_to(&mut BigSpan::from(destination))
    }

    /// Copies the contents of the span into a newly allocated vector.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfMemory`] if the vector cannot be allocated.
    pub fn to_vec(&self) -> Result<Vec<T>>
    where
        T: Clone,
    {
        let mut result = Vec::new();

        if self.len == 0 {
            return Ok(result);
        }

        if result.try_reserve_exact(self.len).is_err() {
            return Err(Error::OutOfMemory {
                bytes: self.len.saturating_mul(size_of::<T>()),
            });
        }

        result.extend(self.iter().cloned());
        Ok(result)
    }

    /// Returns an iterator over the elements of the span.
    #[must_use]
    pub fn iter(&self) -> Iter<'a, T> {
        Iter::new(*self)
    }

    /// Returns a cursor positioned before the first element.
    #[must_use]
    pub fn cursor(&self) -> Cursor<'a, T> {
        Cursor::new(*self)
    }

    /// Splits the span into two at `mid`. The caller guarantees `mid <= len()`.
    pub(crate) fn split_at(self, mid: usize) -> (Self, Self) {
        debug_assert!(mid <= self.len);

        // SAFETY: mid <= len so both halves are within the original storage.
        let tail_ptr = unsafe { self.ptr.add(mid) };

        // SAFETY: See above.
        let head = unsafe { Self::from_parts(self.ptr, mid) };

        // SAFETY: See above.
        let tail = unsafe { Self::from_parts(tail_ptr, self.len - mid) };

        (head, tail)
    }

    pub(crate) fn fmt_display(&self, f: &mut Formatter<'_>, type_label: &str) -> fmt::Result
    where
        T: 'static,
    {
        if self.len <= NATIVE_MAX_LEN {
            if TypeId::of::<T>() == TypeId::of::<u16>() {
                // SAFETY: T is u16, so the span is a valid run of UTF-16 code units.
                let units = unsafe { slice::from_raw_parts(self.ptr.as_ptr().cast::<u16>(), self.len) };

                for c in char::decode_utf16(units.iter().copied()) {
                    f.write_char(c.unwrap_or(char::REPLACEMENT_CHARACTER))?;
                }

                return Ok(());
            }

            if TypeId::of::<T>() == TypeId::of::<char>() {
                // SAFETY: T is char, so the span is a valid run of chars.
                let chars = unsafe { slice::from_raw_parts(self.ptr.as_ptr().cast::<char>(), self.len) };

                for &c in chars {
                    f.write_char(c)?;
                }

                return Ok(());
            }
        }

        write!(f, "{type_label}<{}>[{}]", type_name::<T>(), self.len)
    }

    pub(crate) fn fmt_debug(&self, f: &mut Formatter<'_>, type_label: &str) -> fmt::Result
    where
        T: Debug,
    {
        let (head, _) = self.split_at(self.len.min(DEBUG_PREVIEW_LEN));

        // SAFETY: The head holds at most DEBUG_PREVIEW_LEN elements, a valid slice length.
        let head = unsafe { slice::from_raw_parts(head.ptr.as_ptr(), head.len) };

        let mut debug = f.debug_struct(type_label);
        debug.field("ptr", &self.ptr).field("len", &self.len).field("head", &head);

        if self.len > DEBUG_PREVIEW_LEN {
            debug.finish_non_exhaustive()
        } else {
            debug.finish()
        }
    }
}

impl<'a, T: Unmanaged> ReadOnlyBigSpan<'a, T> {
    /// Views the memory of the span as bytes.
    #[must_use]
    pub fn as_bytes(&self) -> ReadOnlyBigSpan<'a, u8> {
        // SAFETY: Unmanaged types have no padding, so every byte of the span is initialized.
        unsafe { ReadOnlyBigSpan::from_parts(self.ptr.cast(), self.byte_len()) }
    }

    /// Reinterprets the memory of the span as elements of type `U`.
    ///
    /// The new length is `len() * size_of::<T>() / size_of::<U>()`; trailing bytes that do not
    /// form a whole `U` are not part of the result.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidArgument`] if `U` is zero-sized.
    /// * [`Error::Misaligned`] if the span's base address is not aligned for `U`.
    pub fn cast<U: Unmanaged>(&self) -> Result<ReadOnlyBigSpan<'a, U>> {
        if size_of::<U>() == 0 {
            return Err(Error::InvalidArgument("cannot cast to a zero-sized element type"));
        }

        let len = self.byte_len() / size_of::<U>();

        if len == 0 {
            return Ok(ReadOnlyBigSpan::empty());
        }

        if !self.ptr.cast::<U>().as_ptr().is_aligned() {
            return Err(Error::Misaligned {
                required: align_of::<U>(),
            });
        }

        // SAFETY: The address is aligned for U, the length stays within the original bytes and
        // every bit pattern is a valid U.
        Ok(unsafe { ReadOnlyBigSpan::from_parts(self.ptr.cast(), len) })
    }

    /// Orders the memory of the two spans lexicographically by unsigned bytes.
    ///
    /// The common prefix of `min(len(), other.len())` elements is compared first. If it is equal,
    /// the shorter span orders first.
    #[must_use]
    pub fn compare_memory(&self, other: ReadOnlyBigSpan<'_, T>) -> Ordering {
        let common = self.len.min(other.len) * size_of::<T>();

        // SAFETY: Both spans are valid for reads of at least `common` bytes and unmanaged types
        // have no uninitialized padding.
        let prefix = unsafe { ops::compare(self.ptr.as_ptr().cast(), other.ptr.as_ptr().cast(), common) };

        prefix.then(self.len.cmp(&other.len))
    }

    /// Orders the memory of this span and a native slice. See [`compare_memory()`][Self::compare_memory].
    #[must_use]
    pub fn compare_memory_native(&self, other: &[T]) -> Ordering {
        self.compare_memory(ReadOnlyBigSpan::from(other))
    }

    /// Orders the first `len` elements of both spans lexicographically by unsigned bytes.
    ///
    /// # Errors
    ///
    /// [`Error::SliceOutOfRange`] if either span has fewer than `len` elements.
    pub fn compare_memory_len(&self, other: ReadOnlyBigSpan<'_, T>, len: usize) -> Result<Ordering> {
        check_range(0, len, self.len)?;
        check_range(0, len, other.len)?;

        // SAFETY: Both spans hold at least len elements, validated above.
        Ok(unsafe { ops::compare(self.ptr.as_ptr().cast(), other.ptr.as_ptr().cast(), len * size_of::<T>()) })
    }

    /// Whether both spans have the same length and the same bytes.
    #[must_use]
    pub fn sequence_equal(&self, other: ReadOnlyBigSpan<'_, T>) -> bool {
        self.len == other.len && self.compare_memory(other) == Ordering::Equal
    }

    /// Orders the two spans by their memory. Equivalent to [`compare_memory()`][Self::compare_memory].
    #[must_use]
    pub fn sequence_compare(&self, other: ReadOnlyBigSpan<'_, T>) -> Ordering {
        self.compare_memory(other)
    }

    fn byte_len(&self) -> usize {
        self.len * size_of::<T>()
    }
}

impl<T> Default for ReadOnlyBigSpan<'_, T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<'a, T> From<&'a [T]> for ReadOnlyBigSpan<'a, T> {
    fn from(value: &'a [T]) -> Self {
        // SAFETY: A shared slice is valid for reads of its length for 'a and immutable meanwhile.
        unsafe { Self::from_parts(NonNull::from(value).cast(), value.len()) }
    }
}

impl<'a, T, const N: usize> From<&'a [T; N]> for ReadOnlyBigSpan<'a, T> {
    fn from(value: &'a [T; N]) -> Self {
        Self::from(value.as_slice())
    }
}

impl<'a, T> From<Option<&'a [T]>> for ReadOnlyBigSpan<'a, T> {
    fn from(value: Option<&'a [T]>) -> Self {
        value.map_or_else(Self::empty, Self::from)
    }
}

impl<'a, T> TryFrom<ReadOnlyBigSpan<'a, T>> for &'a [T] {
    type Error = Error;

    fn try_from(value: ReadOnlyBigSpan<'a, T>) -> Result<Self> {
        value.as_native_slice()
    }
}

impl<T> PartialEq for ReadOnlyBigSpan<'_, T> {
    /// Two spans are equal when they view the same memory: the same base address and length.
    /// Element values are not compared.
    fn eq(&self, other: &Self) -> bool {
        self.ptr == other.ptr && self.len == other.len
    }
}

impl<T> Eq for ReadOnlyBigSpan<'_, T> {}

impl<T> Index<usize> for ReadOnlyBigSpan<'_, T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        self.get(index).unwrap_or_else(|| panic_out_of_range(index, self.len))
    }
}

impl<T> Index<FromEnd> for ReadOnlyBigSpan<'_, T> {
    type Output = T;

    fn index(&self, index: FromEnd) -> &Self::Output {
        let resolved = index.resolve(self.len).unwrap_or(self.len);
        &self[resolved]
    }
}

impl<'a, T> IntoIterator for ReadOnlyBigSpan<'a, T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &ReadOnlyBigSpan<'a, T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Renders UTF-16 (`u16`) and `char` spans as text. Other spans, and spans too long for a
/// native length, render as `ReadOnlyBigSpan<type>[len]`.
impl<T: 'static> Display for ReadOnlyBigSpan<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.fmt_display(f, "ReadOnlyBigSpan")
    }
}

impl<T: Debug> Debug for ReadOnlyBigSpan<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.fmt_debug(f, "ReadOnlyBigSpan")
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use std::ptr;

    use super::*;
    use crate::testing::capture_panic;

    #[test]
    fn spans_are_copied_not_moved() {
        let data = [1, 2, 3];
        let span = ReadOnlyBigSpan::from(&data);
        let copy = span;

        assert_eq!(span, copy);
        assert_eq!(span.len(), 3);
        assert_eq!(span.long_len(), 3);
    }

    #[test]
    fn raw_parts_construction() {
        let data = [7_u32, 8, 9];

        // SAFETY: The pointer covers three initialized elements that outlive the span.
        let span = unsafe { ReadOnlyBigSpan::from_raw_parts(data.as_ptr(), 3) };
        assert_eq!(span.to_vec().unwrap(), data);

        // SAFETY: A null pointer is accepted with a zero length.
        let empty = unsafe { ReadOnlyBigSpan::<u32>::from_raw_parts(ptr::null(), 0) };
        assert!(empty.is_empty());
        assert!(empty.pinnable_reference().is_none());
    }

    #[test]
    fn missing_slices_are_empty() {
        assert!(ReadOnlyBigSpan::<u8>::from(None).is_empty());
        assert!(ReadOnlyBigSpan::<u8>::from_sub_range(None, 0, 0).unwrap().is_empty());
        assert_eq!(
            ReadOnlyBigSpan::<u8>::from_sub_range(None, 0, 3),
            Err(Error::InvalidArgument("a missing slice can only be viewed as an empty span"))
        );

        let data = [1, 2, 3];
        let sub = ReadOnlyBigSpan::from_sub_range(Some(&data[..]), 1, 2).unwrap();
        assert_eq!(sub.to_vec().unwrap(), [2, 3]);
        ReadOnlyBigSpan::from_sub_range(Some(&data[..]), 2, 2).unwrap_err();
    }

    #[test]
    fn element_access() {
        let data = [10, 20, 30];
        let span = ReadOnlyBigSpan::from(&data);

        assert_eq!(span.get(2), Some(&30));
        assert_eq!(span.get(3), None);
        assert_eq!(span.get_from_end(1), Some(&30));
        assert_eq!(span.get_from_end(3), Some(&10));
        assert_eq!(span.get_from_end(4), None);
        assert_eq!(span[FromEnd(2)], 20);
        assert!(ptr::eq(span.pinnable_reference().unwrap(), &data[0]));
    }

    #[test]
    fn index_panic_message_matches_error() {
        let data = [10, 20, 30];
        let span = ReadOnlyBigSpan::from(&data);

        assert_eq!(
            capture_panic(|| span[3]),
            Some(Error::IndexOutOfRange { index: 3, len: 3 }.to_string())
        );
        assert_eq!(
            capture_panic(|| span[FromEnd(0)]),
            Some(Error::IndexOutOfRange { index: 3, len: 3 }.to_string())
        );
    }

    #[test]
    fn slicing_reports_errors() {
        let data: Vec<u8> = (0..10).collect();
        let span = ReadOnlyBigSpan::from(data.as_slice());

        assert_eq!(span.slice(3, 4).unwrap().to_vec().unwrap(), [3, 4, 5, 6]);
        assert_eq!(span.slice_from(8).unwrap().to_vec().unwrap(), [8, 9]);
        assert_eq!(span.slice_range(..2).unwrap().to_vec().unwrap(), [0, 1]);

        assert_eq!(
            span.slice(8, 3),
            Err(Error::SliceOutOfRange {
                start: 8,
                count: 3,
                len: 10
            })
        );
        assert_eq!(
            span.slice_from(11),
            Err(Error::SliceOutOfRange {
                start: 11,
                count: 0,
                len: 10
            })
        );
        span.slice(usize::MAX, 2).unwrap_err();
    }

    #[test]
    fn narrowing_to_native_slices() {
        let data: Vec<u8> = (0..10).collect();
        let span = ReadOnlyBigSpan::from(data.as_slice());

        assert_eq!(span.slice_native(2, 3).unwrap(), [2, 3, 4]);
        assert_eq!(span.slice_native_i32(7, 3).unwrap(), [7, 8, 9]);
        assert_eq!(span.as_native_slice().unwrap(), data.as_slice());
        assert_eq!(<&[u8]>::try_from(span).unwrap(), data.as_slice());

        assert!(matches!(span.slice_native(0, -1), Err(Error::InvalidArgument(_))));
        assert!(matches!(span.slice_native_i32(-1, 1), Err(Error::InvalidArgument(_))));
        assert!(matches!(span.slice_native(8, 3), Err(Error::SliceOutOfRange { .. })));
    }

    #[test]
    fn over_long_spans_do_not_narrow() {
        let unit = ();

        // SAFETY: Zero-sized elements occupy no memory, so any length is valid.
        let span = unsafe { ReadOnlyBigSpan::from_parts(NonNull::from(&unit), NATIVE_MAX_LEN + 1) };

        assert_eq!(
            span.as_native_slice().unwrap_err(),
            Error::CapacityExceeded {
                len: NATIVE_MAX_LEN + 1,
                max: NATIVE_MAX_LEN
            }
        );
        assert_eq!(span.slice(1, NATIVE_MAX_LEN).unwrap().as_native_slice().unwrap().len(), NATIVE_MAX_LEN);
        assert_eq!(span.to_string(), format!("ReadOnlyBigSpan<()>[{}]", NATIVE_MAX_LEN + 1));
    }

    #[test]
    fn copy_to_native_policy() {
        let source = [1, 2, 3];
        let span = ReadOnlyBigSpan::from(&source);

        let mut long = [0; 4];
        span.copy_to_native(&mut long).unwrap();
        assert_eq!(long, [1, 2, 3, 0]);

        let mut short = [9; 2];
        assert_eq!(
            span.copy_to_native(&mut short),
            Err(Error::DestinationTooShort {
                source_len: 3,
                destination_len: 2
            })
        );
        assert_eq!(short, [9, 9]);

        assert!(!span.try_copy_to(&mut BigSpan::from(&mut short)));
        assert_eq!(short, [9, 9]);
    }

    #[test]
    fn to_vec_clones_elements() {
        let data = [String::from("a"), String::from("b")];
        let copied = ReadOnlyBigSpan::from(&data).to_vec().unwrap();

        assert_eq!(copied, data);
        assert!(ReadOnlyBigSpan::<String>::empty().to_vec().unwrap().is_empty());
    }

    #[test]
    fn memory_comparison() {
        let a = [1_u16, 2, 3];
        let b = [1_u16, 2, 4];
        let a = ReadOnlyBigSpan::from(&a);
        let b = ReadOnlyBigSpan::from(&b);

        assert_eq!(a.compare_memory(a), Ordering::Equal);
        assert_eq!(a.compare_memory_len(b, 2), Ok(Ordering::Equal));
        assert_ne!(a.compare_memory(b), Ordering::Equal);
        assert_eq!(a.compare_memory(b), b.compare_memory(a).reverse());
        assert_eq!(a.slice(0, 2).unwrap().sequence_compare(a), Ordering::Less);
        assert!(matches!(a.compare_memory_len(b, 4), Err(Error::SliceOutOfRange { .. })));
        assert!(!a.sequence_equal(b));

        assert_eq!(a.compare_memory_native(&[1, 2, 3]), Ordering::Equal);
        assert_eq!(a.compare_memory_native(&[1, 2]), Ordering::Greater);
        assert_eq!(a.compare_memory_native(&[1, 2, 4]), Ordering::Less);
        assert_eq!(b.compare_memory_native(&[]), Ordering::Greater);
    }

    #[test]
    fn byte_views() {
        let data = [0x0102_u16, 0x0304];
        let span = ReadOnlyBigSpan::from(&data);

        let bytes = span.as_bytes();
        assert_eq!(bytes.len(), 4);
        assert_eq!(bytes.cast::<u16>().unwrap(), span);
        assert!(span.slice(0, 0).unwrap().cast::<u64>().unwrap().is_empty());
    }

    #[test]
    fn iteration_and_cursor() {
        let data = [1, 2, 3];
        let span = ReadOnlyBigSpan::from(&data);

        assert_eq!(span.into_iter().rev().copied().collect::<Vec<_>>(), [3, 2, 1]);
        assert_eq!((&span).into_iter().count(), 3);

        let mut cursor = span.cursor();
        assert!(cursor.move_next());
        assert_eq!(*cursor.current(), 1);
    }

    #[test]
    fn debug_of_short_span_is_exhaustive() {
        let data = [1_u8, 2];
        let debug = format!("{:?}", ReadOnlyBigSpan::from(&data));

        assert!(debug.starts_with("ReadOnlyBigSpan { ptr: "));
        assert!(debug.ends_with("len: 2, head: [1, 2] }"));
    }
}
