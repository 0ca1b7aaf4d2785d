// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::io::{self, BufRead, Read};
use std::slice;

use crate::{NATIVE_MAX_LEN, ReadOnlyBigSpan};

/// Adapter that implements [`Read`] and [`BufRead`] for a read-only byte span.
///
/// Create an instance via [`ReadOnlyBigSpan::reader()`].
///
/// The span is already in memory, so the adapter implements [`BufRead`] directly without an
/// intermediate buffer. Each [`fill_buf()`][BufRead::fill_buf] exposes at most
/// [`NATIVE_MAX_LEN`] bytes.
#[derive(Debug, Clone)]
pub struct BigSpanReader<'a> {
    remaining: ReadOnlyBigSpan<'a, u8>,
}

impl<'a> BigSpanReader<'a> {
    pub(crate) const fn new(span: ReadOnlyBigSpan<'a, u8>) -> Self {
        Self { remaining: span }
    }

    /// The bytes that have not been read yet.
    #[must_use]
    pub const fn remaining(&self) -> ReadOnlyBigSpan<'a, u8> {
        self.remaining
    }

    fn first_slice(&self) -> &'a [u8] {
        let len = self.remaining.len().min(NATIVE_MAX_LEN);

        // SAFETY: The first `len` bytes of the remaining span are valid for 'a.
        unsafe { slice::from_raw_parts(self.remaining.as_ptr(), len) }
    }

    fn advance(&mut self, amount: usize) {
        let amount = amount.min(self.remaining.len());
        self.remaining = self.remaining.split_at(amount).1;
    }
}

impl Read for BigSpanReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let available = self.first_slice();
        let to_read = buf.len().min(available.len());

        buf[..to_read].copy_from_slice(&available[..to_read]);
        self.advance(to_read);

        Ok(to_read)
    }
}

impl BufRead for BigSpanReader<'_> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        Ok(self.first_slice())
    }

    fn consume(&mut self, amount: usize) {
        self.advance(amount);
    }
}

impl<'a> ReadOnlyBigSpan<'a, u8> {
    /// Returns an adapter that reads the bytes of the span front to back.
    ///
    /// # Example
    ///
    /// ```
    /// use std::io::Read;
    ///
    /// use bigspan::ReadOnlyBigSpan;
    ///
    /// let mut text = String::new();
    /// ReadOnlyBigSpan::from(b"hello".as_slice()).reader().read_to_string(&mut text)?;
    ///
    /// assert_eq!(text, "hello");
    /// # Ok::<(), std::io::Error>(())
    /// ```
    #[must_use]
    pub const fn reader(self) -> BigSpanReader<'a> {
        BigSpanReader::new(self)
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoke_test() {
        let data = b"Hello, world";
        let mut reader = ReadOnlyBigSpan::from(data).reader();

        let mut buffer = [0_u8; 5];

        assert_eq!(reader.read(&mut buffer).unwrap(), 5);
        assert_eq!(&buffer, b"Hello");

        assert_eq!(reader.read(&mut buffer).unwrap(), 5);
        assert_eq!(&buffer, b", wor");

        assert_eq!(reader.read(&mut buffer).unwrap(), 2);
        assert_eq!(&buffer[..2], b"ld");

        assert_eq!(reader.read(&mut buffer).unwrap(), 0);
        assert!(reader.remaining().is_empty());
    }

    #[test]
    fn fill_buf_and_consume() {
        let data = b"Hello, world";
        let mut reader = ReadOnlyBigSpan::from(data).reader();

        assert_eq!(reader.fill_buf().unwrap(), b"Hello, world");
        assert_eq!(reader.fill_buf().unwrap(), b"Hello, world");

        reader.consume(7);
        assert_eq!(reader.fill_buf().unwrap(), b"world");

        reader.consume(100);
        assert!(reader.fill_buf().unwrap().is_empty());
    }

    #[test]
    fn read_lines() {
        let data = b"first\nsecond\n";
        let lines: Vec<String> = ReadOnlyBigSpan::from(data)
            .reader()
            .lines()
            .collect::<io::Result<_>>()
            .unwrap();

        assert_eq!(lines, ["first", "second"]);
    }

    #[test]
    fn empty_span() {
        let mut reader = ReadOnlyBigSpan::<u8>::empty().reader();
        let mut buffer = [0_u8; 4];

        assert_eq!(reader.read(&mut buffer).unwrap(), 0);
        assert!(reader.fill_buf().unwrap().is_empty());
    }
}
