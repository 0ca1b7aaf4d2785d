// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Typed reads and writes at byte offsets within byte spans.
//!
//! Two layers are provided. The raw layer (`read_unaligned`, `write_unaligned`) moves the
//! in-memory representation of any plain-data type in host byte order. The numeric layer
//! (`read_num_le`, `write_num_le`) always uses little-endian byte order, so data written on
//! one host reads back identically on any other.
//!
//! ```
//! use bigspan::BigSpan;
//!
//! let mut storage = [0_u8; 12];
//! let mut span = BigSpan::from(&mut storage);
//!
//! span.write_num_le(0, 0xDEAD_BEEF_u32)?;
//! span.write_num_le(4, 1.5_f64)?;
//!
//! assert_eq!(span.read_num_le::<u32>(0)?, 0xDEAD_BEEF);
//! assert_eq!(span.read_num_le::<f64>(4)?, 1.5);
//! assert_eq!(storage[..4], [0xEF, 0xBE, 0xAD, 0xDE]);
//! # Ok::<(), bigspan::Error>(())
//! ```

use std::ptr;

use num_traits::{FromBytes, ToBytes};

use crate::index::check_range;
use crate::{BigSpan, ReadOnlyBigSpan, Result, Unmanaged};

impl ReadOnlyBigSpan<'_, u8> {
    /// Reads a `T` from the bytes starting at `offset`, in host byte order.
    ///
    /// The bytes need not be aligned for `T`.
    ///
    /// # Errors
    ///
    /// [`Error::SliceOutOfRange`][crate::Error::SliceOutOfRange] if fewer than `size_of::<T>()`
    /// bytes are available at `offset`.
    pub fn read_unaligned<T: Unmanaged>(&self, offset: usize) -> Result<T> {
        check_range(offset, size_of::<T>(), self.len())?;

        // SAFETY: The range check guarantees size_of::<T>() readable bytes at offset.
        let source = unsafe { self.as_ptr().add(offset) };

        // SAFETY: The bytes are readable, any bit pattern is a valid T and no alignment is assumed.
        Ok(unsafe { ptr::read_unaligned(source.cast::<T>()) })
    }

    /// Reads a `T` from the bytes starting at `offset`, or returns `None` if the span is too short.
    #[must_use]
    pub fn try_read_unaligned<T: Unmanaged>(&self, offset: usize) -> Option<T> {
        self.read_unaligned(offset).ok()
    }

    /// Reads a number of type `T` stored in little-endian representation at `offset`.
    ///
    /// # Errors
    ///
    /// [`Error::SliceOutOfRange`][crate::Error::SliceOutOfRange] if the span does not hold the
    /// whole representation of `T` at `offset`.
    pub fn read_num_le<T: FromBytes>(&self, offset: usize) -> Result<T>
    where
        T::Bytes: Sized,
    {
        let size = size_of::<T::Bytes>();
        check_range(offset, size, self.len())?;

        // SAFETY: The range check guarantees `size` readable bytes at offset.
        let source = unsafe { self.as_ptr().add(offset) };

        // SAFETY: The byte representation of a number is a plain byte array, valid for any
        // contents and without alignment requirements.
        let bytes = unsafe { ptr::read_unaligned(source.cast::<T::Bytes>()) };

        Ok(T::from_le_bytes(&bytes))
    }

    /// Reads a little-endian number at `offset`, or returns `None` if the span is too short.
    #[must_use]
    pub fn try_read_num_le<T: FromBytes>(&self, offset: usize) -> Option<T>
    where
        T::Bytes: Sized,
    {
        self.read_num_le(offset).ok()
    }
}

impl BigSpan<'_, u8> {
    /// Reads a `T` from the bytes starting at `offset`, in host byte order.
    ///
    /// # Errors
    ///
    /// [`Error::SliceOutOfRange`][crate::Error::SliceOutOfRange] if fewer than `size_of::<T>()`
    /// bytes are available at `offset`.
    pub fn read_unaligned<T: Unmanaged>(&self, offset: usize) -> Result<T> {
        self.as_read_only().read_unaligned(offset)
    }

    /// Reads a `T` from the bytes starting at `offset`, or returns `None` if the span is too short.
    #[must_use]
    pub fn try_read_unaligned<T: Unmanaged>(&self, offset: usize) -> Option<T> {
        self.as_read_only().try_read_unaligned(offset)
    }

    /// Reads a number of type `T` stored in little-endian representation at `offset`.
    ///
    /// # Errors
    ///
    /// [`Error::SliceOutOfRange`][crate::Error::SliceOutOfRange] if the span does not hold the
    /// whole representation of `T` at `offset`.
    pub fn read_num_le<T: FromBytes>(&self, offset: usize) -> Result<T>
    where
        T::Bytes: Sized,
    {
        self.as_read_only().read_num_le(offset)
    }

    /// Reads a little-endian number at `offset`, or returns `None` if the span is too short.
    #[must_use]
    pub fn try_read_num_le<T: FromBytes>(&self, offset: usize) -> Option<T>
    where
        T::Bytes: Sized,
    {
        self.as_read_only().try_read_num_le(offset)
    }

    /// Writes the in-memory representation of `value` to the bytes starting at `offset`.
    ///
    /// # Errors
    ///
    /// [`Error::SliceOutOfRange`][crate::Error::SliceOutOfRange] if fewer than `size_of::<T>()`
    /// bytes are available at `offset`. Nothing is written in that case.
    pub fn write_unaligned<T: Unmanaged>(&mut self, offset: usize, value: T) -> Result<()> {
        check_range(offset, size_of::<T>(), self.len())?;

        // SAFETY: The range check guarantees size_of::<T>() writable bytes at offset.
        let destination = unsafe { self.as_mut_ptr().add(offset) };

        // SAFETY: The bytes are writable and no alignment is assumed.
        unsafe { ptr::write_unaligned(destination.cast::<T>(), value) };

        Ok(())
    }

    /// Writes `value` at `offset` if it fits. Returns `false` without writing anything otherwise.
    pub fn try_write_unaligned<T: Unmanaged>(&mut self, offset: usize, value: T) -> bool {
        self.write_unaligned(offset, value).is_ok()
    }

    /// Writes a number of type `T` in little-endian representation at `offset`.
    ///
    /// # Errors
    ///
    /// [`Error::SliceOutOfRange`][crate::Error::SliceOutOfRange] if the span cannot hold the
    /// whole representation of `T` at `offset`. Nothing is written in that case.
    #[expect(clippy::needless_pass_by_value, reason = "tiny numeric types, fine to always pass by value")]
    pub fn write_num_le<T: ToBytes>(&mut self, offset: usize, value: T) -> Result<()> {
        let bytes = value.to_le_bytes();
        let bytes = bytes.as_ref();

        self.slice(offset, bytes.len())?.copy_from_native(bytes)
    }

    /// Writes a little-endian number at `offset` if it fits. Returns `false` without writing
    /// anything otherwise.
    pub fn try_write_num_le<T: ToBytes>(&mut self, offset: usize, value: T) -> bool {
        self.write_num_le(offset, value).is_ok()
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::Error;

    #[test]
    fn little_endian_wire_form() {
        let mut storage = [0_u8; 14];
        let mut span = BigSpan::from(&mut storage);

        span.write_num_le(0, 0x1234_u16).unwrap();
        span.write_num_le(2, 0x0102_0304_i32).unwrap();
        span.write_num_le(6, 0x1122_3344_5566_7788_u64).unwrap();

        assert_eq!(
            storage,
            [0x34, 0x12, 0x04, 0x03, 0x02, 0x01, 0x88, 0x77, 0x66, 0x55, 0x44, 0x33, 0x22, 0x11]
        );
    }

    #[rstest]
    #[case::at_start(0)]
    #[case::odd_offset(3)]
    #[case::at_end(8)]
    fn numbers_round_trip(#[case] offset: usize) {
        let mut storage = [0_u8; 16];
        let mut span = BigSpan::from(&mut storage);

        span.write_num_le(offset, -12345_i16).unwrap();
        assert_eq!(span.read_num_le::<i16>(offset).unwrap(), -12345);

        span.write_num_le(offset, u32::MAX - 7).unwrap();
        assert_eq!(span.read_num_le::<u32>(offset).unwrap(), u32::MAX - 7);

        span.write_num_le(offset, i64::MIN + 1).unwrap();
        assert_eq!(span.read_num_le::<i64>(offset).unwrap(), i64::MIN + 1);

        span.write_num_le(offset, 3.25_f32).unwrap();
        assert_eq!(span.read_num_le::<f32>(offset).unwrap().to_bits(), 3.25_f32.to_bits());

        span.write_num_le(offset, -0.1_f64).unwrap();
        assert_eq!(span.read_num_le::<f64>(offset).unwrap().to_bits(), (-0.1_f64).to_bits());
    }

    #[test]
    fn out_of_range_is_reported_and_writes_nothing() {
        let mut storage = [0xAA_u8; 6];
        let mut span = BigSpan::from(&mut storage);

        assert_eq!(
            span.write_num_le(3, 0_u32),
            Err(Error::SliceOutOfRange {
                start: 3,
                count: 4,
                len: 6
            })
        );
        assert!(!span.try_write_num_le(usize::MAX, 0_u16));
        assert!(!span.try_write_unaligned(5, 0_u16));
        assert_eq!(span.try_read_num_le::<u64>(0), None);
        assert_eq!(span.try_read_unaligned::<u32>(4), None);
        span.read_unaligned::<u16>(5).unwrap_err();

        assert_eq!(storage, [0xAA; 6]);
    }

    #[test]
    fn raw_values_use_host_order() {
        let mut storage = [0_u8; 9];
        let mut span = BigSpan::from(&mut storage);

        assert!(span.try_write_unaligned(1, 0x0102_0304_0506_0708_u64));
        assert_eq!(span.read_unaligned::<u64>(1).unwrap(), 0x0102_0304_0506_0708);
        assert_eq!(span.try_read_unaligned::<[u8; 2]>(0), Some([0, 0x0102_0304_0506_0708_u64.to_ne_bytes()[0]]));

        let read_only = ReadOnlyBigSpan::from(&storage);
        assert_eq!(
            read_only.read_unaligned::<u64>(1).unwrap().to_ne_bytes(),
            0x0102_0304_0506_0708_u64.to_ne_bytes()
        );
    }

    #[test]
    fn empty_span() {
        let span = ReadOnlyBigSpan::<u8>::empty();

        span.read_num_le::<u8>(0).unwrap_err();
        assert_eq!(span.read_unaligned::<[u8; 0]>(0), Ok([]));
    }
}
