// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::cmp::Ordering;
use std::fmt::{self, Debug, Display, Formatter};
use std::marker::PhantomData;
use std::ops::{Index, IndexMut, RangeBounds};
use std::ptr::NonNull;
use std::slice;

use crate::element::is_word_layout;
use crate::index::{check_range, panic_out_of_range, resolve_range};
use crate::{Cursor, CursorMut, Error, FromEnd, Iter, IterMut, NATIVE_MAX_LEN, ReadOnlyBigSpan, Result, Unmanaged, Zeroable, ops};

/// A mutable view over a contiguous run of `T` whose length is a full `usize`.
///
/// A big span borrows memory that is owned by something else (a slice, a vector, stack storage or
/// a block of unmanaged memory) and never outlives it. It behaves like `&'a mut [T]` with three
/// differences:
///
/// * The length is not limited to what a native 32-bit length can express. Conversions to native
///   slices are checked against [`NATIVE_MAX_LEN`] and long spans can be processed in
///   native-sized chunks via [`as_small_slices()`][Self::as_small_slices].
/// * Slicing reports out-of-range requests as [`Error`] values instead of panicking. Only the
///   `Index` operators panic, mirroring slices.
/// * Equality compares identity (the same base address and length), not contents. Use
///   [`sequence_equal()`][Self::sequence_equal] or [`compare_memory()`][Self::compare_memory]
///   to compare contents.
///
/// Bulk operations ([`clear()`][Self::clear], [`fill()`][Self::fill],
/// [`copy_to()`][Self::copy_to]) delegate to the algorithms in [`ops`][crate::ops].
///
/// # Example
///
/// ```
/// use bigspan::BigSpan;
///
/// let mut data = vec![0_u32; 1000];
/// let mut span = BigSpan::from(data.as_mut_slice());
///
/// span.slice(10, 20).unwrap().fill(7);
/// span[0] = 1;
///
/// assert_eq!(data[0], 1);
/// assert!(data[10..30].iter().all(|&v| v == 7));
/// assert_eq!(data[30], 0);
/// ```
///
/// # Thread safety
///
/// The type is thread-safe under the same conditions as `&mut [T]`.
pub struct BigSpan<'a, T> {
    ptr: NonNull<T>,
    len: usize,

    _marker: PhantomData<&'a mut [T]>,
}

// SAFETY: Equivalent to a `&mut [T]`, which is `Send` when `T: Send`.
unsafe impl<T: Send> Send for BigSpan<'_, T> {}
// SAFETY: Equivalent to a `&mut [T]`, which is `Sync` when `T: Sync`.
unsafe impl<T: Sync> Sync for BigSpan<'_, T> {}

impl<'a, T> BigSpan<'a, T> {
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
    /// `ptr` must be valid for reads and writes of `len` initialized elements for the lifetime
    /// `'a` and must not be accessed through any other path during that lifetime. If `len` is
    /// zero, any well-aligned non-null pointer is accepted.
    pub(crate) const unsafe fn from_parts(ptr: NonNull<T>, len: usize) -> Self {
        Self {
            ptr,
            len,
            _marker: PhantomData,
        }
    }

    /// Creates a span over `len` elements of unmanaged memory starting at `ptr`.
    ///
    /// A null `ptr` is accepted when `len` is zero and yields an empty span.
    ///
    /// # Safety
    ///
    /// * `ptr` must be aligned for `T` and valid for reads and writes of `len * size_of::<T>()`
    ///   bytes, which must not exceed `isize::MAX`.
    /// * For the lifetime `'a` chosen by the caller, the memory must not be freed and must not
    ///   be accessed except through the returned span.
    pub unsafe fn from_raw_parts(ptr: *mut T, len: usize) -> Self
    where
        T: Unmanaged,
    {
        debug_assert!(len == 0 || !ptr.is_null(), "only an empty span may start at a null pointer");

        let ptr = NonNull::new(ptr).unwrap_or(NonNull::dangling());

        // SAFETY: Forwarding the caller's guarantees.
        unsafe { Self::from_parts(ptr, len) }
    }

    /// Creates a span over `len` elements of `slice` starting at `start`.
    ///
    /// A missing slice is treated as empty: it is accepted only with a zero `start` and `len`.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidArgument`] if `slice` is `None` and `start` or `len` is non-zero.
    /// * [`Error::SliceOutOfRange`] if `start + len` exceeds the length of the slice.
    pub fn from_sub_range(slice: Option<&'a mut [T]>, start: usize, len: usize) -> Result<Self> {
        let Some(slice) = slice else {
            if start != 0 || len != 0 {
                return Err(Error::InvalidArgument("a missing slice can only be viewed as an empty span"));
            }

            return Ok(Self::empty());
        };

        Self::from(slice).into_slice(start, len)
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

    /// Raw mutable pointer to the first element.
    ///
    /// For an empty span this is a well-aligned dangling pointer that must not be dereferenced.
    #[must_use]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Reference to the first element, or `None` if the span is empty.
    #[must_use]
    pub fn pinnable_reference(&self) -> Option<&T> {
        self.get(0)
    }

    /// Mutable reference to the first element, or `None` if the span is empty.
    #[must_use]
    pub fn pinnable_reference_mut(&mut self) -> Option<&mut T> {
        self.get_mut(0)
    }

    /// Views this span as a read-only span for the duration of the borrow.
    #[must_use]
    pub fn as_read_only(&self) -> ReadOnlyBigSpan<'_, T> {
        // SAFETY: The shared borrow of self prevents mutation through this span meanwhile.
        unsafe { ReadOnlyBigSpan::from_parts(self.ptr, self.len) }
    }

    /// Creates a shorter-lived span over the same memory, leaving this one usable afterward.
    #[must_use]
    pub fn reborrow(&mut self) -> BigSpan<'_, T> {
        // SAFETY: The exclusive borrow of self makes the new span the only access path.
        unsafe { BigSpan::from_parts(self.ptr, self.len) }
    }

    /// Returns the element at `index`, or `None` if `index >= len()`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_read_only().get(index)
    }

    /// Returns the element at `index` mutably, or `None` if `index >= len()`.
    #[must_use]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index >= self.len {
            return None;
        }

        // SAFETY: Bounds checked above.
        Some(unsafe { self.get_unchecked_mut(index) })
    }

    /// Returns the element at `offset` positions from the end, or `None` if out of range.
    ///
    /// See [`FromEnd`] for the counting convention.
    #[must_use]
    pub fn get_from_end(&self, offset: usize) -> Option<&T> {
        self.as_read_only().get_from_end(offset)
    }

    /// Returns the element at `index` mutably, without bounds checking.
    ///
    /// # Safety
    ///
    /// `index` must be less than `len()`.
    #[must_use]
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.len);

        // SAFETY: The caller guarantees index is in bounds. The exclusive borrow of self
        // guarantees no other reference to the element exists.
        let mut element = unsafe { self.ptr.add(index) };

        // SAFETY: See above.
        unsafe { element.as_mut() }
    }

    /// Forms a sub-span of `count` elements starting at `start`, borrowing from this span.
    ///
    /// # Errors
    ///
    /// [`Error::SliceOutOfRange`] if `start + count > len()`. The sum is evaluated without overflow.
    pub fn slice(&mut self, start: usize, count: usize) -> Result<BigSpan<'_, T>> {
        self.reborrow().into_slice(start, count)
    }

    /// Forms a sub-span of all elements from `start` to the end.
    ///
    /// # Errors
    ///
    /// [`Error::SliceOutOfRange`] if `start > len()`.
    pub fn slice_from(&mut self, start: usize) -> Result<BigSpan<'_, T>> {
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
    pub fn slice_range(&mut self, range: impl RangeBounds<usize>) -> Result<BigSpan<'_, T>> {
        let (start, count) = resolve_range(range, self.len)?;
        self.slice(start, count)
    }

    /// Converts this span into a sub-span of `count` elements starting at `start`, keeping the
    /// original lifetime.
    ///
    /// # Errors
    ///
    /// [`Error::SliceOutOfRange`] if `start + count > len()`.
    pub fn into_slice(self, start: usize, count: usize) -> Result<Self> {
        check_range(start, count, self.len)?;

        // SAFETY: The range was validated above so the sub-span is within the same storage.
        let ptr = unsafe { self.ptr.add(start) };

        // SAFETY: Self is consumed, so the sub-span becomes the only access path.
        Ok(unsafe { Self::from_parts(ptr, count) })
    }

    /// Forms a native slice of `len` elements starting at `start`.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidArgument`] if `len` is negative.
    /// * [`Error::SliceOutOfRange`] if the range reaches past the end of the span.
    pub fn slice_native(&mut self, start: usize, len: i32) -> Result<&mut [T]> {
        let Ok(count) = usize::try_from(len) else {
            return Err(Error::InvalidArgument("native slice length must not be negative"));
        };

        self.reborrow().into_slice(start, count)?.into_native_slice()
    }

    /// Forms a native slice from a 32-bit start index and length.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidArgument`] if `start` or `len` is negative.
    /// * [`Error::SliceOutOfRange`] if the range reaches past the end of the span.
    pub fn slice_native_i32(&mut self, start: i32, len: i32) -> Result<&mut [T]> {
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
    pub fn as_native_slice(&self) -> Result<&[T]> {
        self.as_read_only().as_native_slice()
    }

    /// Views the whole span as a mutable native slice.
    ///
    /// # Errors
    ///
    /// [`Error::CapacityExceeded`] if the span holds more than [`NATIVE_MAX_LEN`] elements.
    pub fn as_native_slice_mut(&mut self) -> Result<&mut [T]> {
        self.reborrow().into_native_slice()
    }

    /// Converts the span into a mutable native slice with the original lifetime.
    ///
    /// # Errors
    ///
    /// [`Error::CapacityExceeded`] if the span holds more than [`NATIVE_MAX_LEN`] elements.
    pub fn into_native_slice(self) -> Result<&'a mut [T]> {
        if self.len > NATIVE_MAX_LEN {
            return Err(Error::CapacityExceeded {
                len: self.len,
                max: NATIVE_MAX_LEN,
            });
        }

        // SAFETY: The span is valid for reads and writes of len elements for 'a, it is consumed
        // so the slice becomes the only access path and the length is a valid slice length.
        Ok(unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) })
    }

    /// Sets every element to the all-zero value.
    ///
    /// Element types that hold pointers are cleared in whole pointer-sized words only, so a
    /// concurrent observer of the memory can never see a partially cleared pointer. Plain data
    /// is cleared with whatever store widths are fastest.
    pub fn clear(&mut self)
    where
        T: Zeroable,
    {
        const {
            assert!(
                !T::CONTAINS_REFERENCES || is_word_layout::<T>(),
                "reference-holding elements must be made of whole pointer-sized words"
            );
        }

        if self.len == 0 {
            return;
        }

        let byte_len = self.len * size_of::<T>();

        if T::CONTAINS_REFERENCES {
            // SAFETY: T is made of whole aligned words (checked at compile time above) and the
            // span is valid for writes of byte_len bytes. All-zero is a valid T.
            unsafe {
                ops::clear_with_references(self.ptr.as_ptr().cast(), byte_len / size_of::<usize>());
            }
        } else {
            // SAFETY: The span is valid for writes of byte_len bytes. All-zero is a valid T.
            unsafe {
                ops::clear_without_references(self.ptr.as_ptr().cast(), byte_len);
            }
        }
    }

    /// Sets every element to `value`.
    ///
    /// See [`ops::fill()`] for the strategies used.
    pub fn fill(&mut self, value: T)
    where
        T: Copy,
    {
        // SAFETY: The span is valid for writes of len elements.
        unsafe {
            ops::fill(self.ptr.as_ptr(), self.len, value);
        }
    }

    /// Sets every element to a clone of `value`, dropping the previous values.
    pub fn fill_cloned(&mut self, value: &T)
    where
        T: Clone,
    {
        // SAFETY: The span is valid for reads and writes of len initialized elements.
        unsafe {
            ops::fill_cloned(self.ptr.as_ptr(), self.len, value);
        }
    }

    /// Copies every element of this span to the start of `destination`.
    ///
    /// Elements of `destination` past `len()` are left untouched. Overlapping spans are handled
    /// as if the source were first copied to a temporary buffer.
    ///
    /// # Errors
    ///
    /// [`Error::DestinationTooShort`] if `destination` is shorter than this span. Nothing is
    /// written in that case.
    pub fn copy_to(&self, destination: &mut BigSpan<'_, T>) -> Result<()>
    where
        T: Copy,
    {
        self.as_read_only().copy_to(destination)
    }

    /// Same as [`copy_to()`][Self::copy_to] but reports a too short destination as `false`.
    ///
    /// On `false` the destination is left bit-identical to how it was before the call.
    pub fn try_copy_to(&self, destination: &mut BigSpan<'_, T>) -> bool
    where
        T: Copy,
    {
        self.as_read_only().try_copy_to(destination)
    }

    /// Copies every element of a native slice to the start of this span.
    ///
    /// # Errors
    ///
    /// [`Error::DestinationTooShort`] if this span is shorter than `source`.
    pub fn copy_from_native(&mut self, source: &[T]) -> Result<()>
    where
        T: Copy,
    {
        ReadOnlyBigSpan::from(source).copy_to(self)
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
        self.as_read_only().to_vec()
    }

    /// Returns an iterator over the elements of the span.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.as_read_only())
    }

    /// Returns an iterator that allows modifying each element.
    #[must_use]
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(self.reborrow())
    }

    /// Returns a cursor positioned before the first element.
    #[must_use]
    pub fn cursor(&self) -> Cursor<'_, T> {
        Cursor::new(self.as_read_only())
    }

    /// Returns a cursor positioned before the first element that can modify elements.
    #[must_use]
    pub fn cursor_mut(&mut self) -> CursorMut<'_, T> {
        CursorMut::new(self.reborrow())
    }

    /// Splits the span into two at `mid`. The caller guarantees `mid <= len()`.
    pub(crate) fn split_at(self, mid: usize) -> (Self, Self) {
        debug_assert!(mid <= self.len);

        // SAFETY: mid <= len so both halves are within the original storage.
        let tail_ptr = unsafe { self.ptr.add(mid) };

        // SAFETY: The halves are disjoint and self is consumed.
        let head = unsafe { Self::from_parts(self.ptr, mid) };

        // SAFETY: The halves are disjoint and self is consumed.
        let tail = unsafe { Self::from_parts(tail_ptr, self.len - mid) };

        (head, tail)
    }

    pub(crate) fn into_raw_parts(self) -> (NonNull<T>, usize) {
        (self.ptr, self.len)
    }
}

impl<'a, T: Unmanaged> BigSpan<'a, T> {
    /// Views the memory of the span as bytes.
    #[must_use]
    pub fn as_bytes(&self) -> ReadOnlyBigSpan<'_, u8> {
        self.as_read_only().as_bytes()
    }

    /// Views the memory of the span as mutable bytes.
    ///
    /// Any byte pattern written through the result is a valid `T`.
    #[must_use]
    pub fn as_bytes_mut(&mut self) -> BigSpan<'_, u8> {
        // SAFETY: Unmanaged types have no padding and accept every bit pattern, and the
        // exclusive borrow of self makes the byte view the only access path.
        unsafe { BigSpan::from_parts(self.ptr.cast(), self.len * size_of::<T>()) }
    }

    /// Reinterprets the memory of the span as mutable elements of type `U`.
    ///
    /// The new length is `len() * size_of::<T>() / size_of::<U>()`.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidArgument`] if `U` is zero-sized.
    /// * [`Error::Misaligned`] if the span's base address is not aligned for `U`.
    pub fn cast<U: Unmanaged>(&mut self) -> Result<BigSpan<'_, U>> {
        let view = self.as_read_only().cast::<U>()?;

        // SAFETY: The read-only cast validated alignment and length against the same memory, and
        // the exclusive borrow of self makes the result the only access path.
        Ok(unsafe { BigSpan::from_parts(view.non_null(), view.len()) })
    }

    /// Orders the memory of the two spans lexicographically by unsigned bytes.
    ///
    /// See [`ReadOnlyBigSpan::compare_memory()`].
    #[must_use]
    pub fn compare_memory(&self, other: ReadOnlyBigSpan<'_, T>) -> Ordering {
        self.as_read_only().compare_memory(other)
    }

    /// Orders the memory of this span and a native slice.
    #[must_use]
    pub fn compare_memory_native(&self, other: &[T]) -> Ordering {
        self.as_read_only().compare_memory_native(other)
    }

    /// Orders the first `len` elements of both spans lexicographically by unsigned bytes.
    ///
    /// # Errors
    ///
    /// [`Error::SliceOutOfRange`] if either span has fewer than `len` elements.
    pub fn compare_memory_len(&self, other: ReadOnlyBigSpan<'_, T>, len: usize) -> Result<Ordering> {
        self.as_read_only().compare_memory_len(other, len)
    }

    /// Whether both spans have the same length and the same bytes.
    #[must_use]
    pub fn sequence_equal(&self, other: ReadOnlyBigSpan<'_, T>) -> bool {
        self.as_read_only().sequence_equal(other)
    }

    /// Orders the two spans by their memory.
    #[must_use]
    pub fn sequence_compare(&self, other: ReadOnlyBigSpan<'_, T>) -> Ordering {
        self.as_read_only().sequence_compare(other)
    }
}

impl<T> Default for BigSpan<'_, T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<'a, T> From<&'a mut [T]> for BigSpan<'a, T> {
    fn from(value: &'a mut [T]) -> Self {
        let len = value.len();

        // SAFETY: An exclusive slice borrow is valid for reads and writes of its length for 'a
        // and is the only access path meanwhile.
        unsafe { Self::from_parts(NonNull::from(value).cast(), len) }
    }
}

impl<'a, T, const N: usize> From<&'a mut [T; N]> for BigSpan<'a, T> {
    fn from(value: &'a mut [T; N]) -> Self {
        Self::from(value.as_mut_slice())
    }
}

impl<'a, T> From<Option<&'a mut [T]>> for BigSpan<'a, T> {
    fn from(value: Option<&'a mut [T]>) -> Self {
        value.map_or_else(Self::empty, Self::from)
    }
}

impl<'a, T> From<BigSpan<'a, T>> for ReadOnlyBigSpan<'a, T> {
    fn from(value: BigSpan<'a, T>) -> Self {
        // SAFETY: The mutable span is consumed, so nothing can mutate the memory through it.
        unsafe { ReadOnlyBigSpan::from_parts(value.ptr, value.len) }
    }
}

impl<'a, T> TryFrom<BigSpan<'a, T>> for &'a mut [T] {
    type Error = Error;

    fn try_from(value: BigSpan<'a, T>) -> Result<Self> {
        value.into_native_slice()
    }
}

impl<T> PartialEq for BigSpan<'_, T> {
    /// Two spans are equal when they view the same memory: the same base address and length.
    /// Element values are not compared.
    fn eq(&self, other: &Self) -> bool {
        self.ptr == other.ptr && self.len == other.len
    }
}

impl<T> Eq for BigSpan<'_, T> {}

impl<T> Index<usize> for BigSpan<'_, T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        self.get(index).unwrap_or_else(|| panic_out_of_range(index, self.len))
    }
}

impl<T> IndexMut<usize> for BigSpan<'_, T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        let len = self.len;
        self.get_mut(index).unwrap_or_else(|| panic_out_of_range(index, len))
    }
}

impl<T> Index<FromEnd> for BigSpan<'_, T> {
    type Output = T;

    fn index(&self, index: FromEnd) -> &Self::Output {
        let resolved = index.resolve(self.len).unwrap_or(self.len);
        &self[resolved]
    }
}

impl<T> IndexMut<FromEnd> for BigSpan<'_, T> {
    fn index_mut(&mut self, index: FromEnd) -> &mut Self::Output {
        let resolved = index.resolve(self.len).unwrap_or(self.len);
        &mut self[resolved]
    }
}

impl<'a, T> IntoIterator for BigSpan<'a, T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        IterMut::new(self)
    }
}

impl<'s, T> IntoIterator for &'s BigSpan<'_, T> {
    type Item = &'s T;
    type IntoIter = Iter<'s, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'s, T> IntoIterator for &'s mut BigSpan<'_, T> {
    type Item = &'s mut T;
    type IntoIter = IterMut<'s, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// Renders UTF-16 (`u16`) and `char` spans as text. Other spans, and spans too long for a
/// native length, render as `BigSpan<type>[len]`.
impl<T: 'static> Display for BigSpan<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.as_read_only().fmt_display(f, "BigSpan")
    }
}

impl<T: Debug> Debug for BigSpan<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.as_read_only().fmt_debug(f, "BigSpan")
    }
}
