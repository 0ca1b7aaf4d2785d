// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::io::{self, Write};
use std::mem;

use crate::BigSpan;

/// Adapter that implements [`Write`] for a mutable byte span.
///
/// Create an instance via [`BigSpan::writer()`]. Bytes are written front to back. Once the
/// span is full, writes accept zero bytes, which `write_all()` reports as
/// [`io::ErrorKind::WriteZero`].
#[derive(Debug)]
pub struct BigSpanWriter<'a> {
    remaining: BigSpan<'a, u8>,
    written: usize,
}

impl<'a> BigSpanWriter<'a> {
    pub(crate) const fn new(span: BigSpan<'a, u8>) -> Self {
        Self {
            remaining: span,
            written: 0,
        }
    }

    /// Number of bytes written so far.
    #[must_use]
    pub const fn written(&self) -> usize {
        self.written
    }

    /// Consumes the adapter, returning the part of the span that has not been written to.
    #[must_use]
    pub fn into_remaining(self) -> BigSpan<'a, u8> {
        self.remaining
    }
}

impl Write for BigSpanWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let amount = buf.len().min(self.remaining.len());

        let (mut head, tail) = mem::take(&mut self.remaining).split_at(amount);
        head.copy_from_native(&buf[..amount])?;

        self.remaining = tail;
        self.written += amount;

        Ok(amount)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> BigSpan<'a, u8> {
    /// Returns an adapter that writes into the span front to back.
    ///
    /// # Example
    ///
    /// ```
    /// use std::io::Write;
    ///
    /// use bigspan::BigSpan;
    ///
    /// let mut storage = [0_u8; 8];
    /// let mut writer = BigSpan::from(&mut storage).writer();
    ///
    /// write!(writer, "{}-{}", 12, 34)?;
    /// assert_eq!(writer.written(), 5);
    ///
    /// assert_eq!(&storage[..5], b"12-34");
    /// # Ok::<(), std::io::Error>(())
    /// ```
    #[must_use]
    pub const fn writer(self) -> BigSpanWriter<'a> {
        BigSpanWriter::new(self)
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use std::io::ErrorKind;

    use super::*;

    #[test]
    fn writes_until_full() {
        let mut storage = [0_u8; 6];
        let mut writer = BigSpan::from(&mut storage).writer();

        assert_eq!(writer.write(b"abcd").unwrap(), 4);
        assert_eq!(writer.write(b"efgh").unwrap(), 2);
        assert_eq!(writer.write(b"ijkl").unwrap(), 0);
        assert_eq!(writer.written(), 6);
        writer.flush().unwrap();

        assert!(writer.into_remaining().is_empty());
        assert_eq!(&storage, b"abcdef");
    }

    #[test]
    fn write_all_past_end_fails() {
        let mut storage = [0_u8; 3];
        let mut writer = BigSpan::from(&mut storage).writer();

        let error = writer.write_all(b"too long").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::WriteZero);

        assert_eq!(&storage, b"too");
    }

    #[test]
    fn remaining_is_the_unwritten_tail() {
        let mut storage = [9_u8; 5];
        let mut writer = BigSpan::from(&mut storage).writer();

        writer.write_all(&[1, 2]).unwrap();

        let mut rest = writer.into_remaining();
        assert_eq!(rest.len(), 3);
        rest.fill(0);

        assert_eq!(storage, [1, 2, 0, 0, 0]);
    }
}
