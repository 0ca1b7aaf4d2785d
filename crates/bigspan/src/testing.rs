// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Helpers for testing code that works with big spans.
//!
//! Available with the `test-util` Cargo feature.

use std::any::Any;
use std::io::{self, ErrorKind, Read};
use std::panic::{self, UnwindSafe};

use crate::{BigSpan, Error, Result};

/// Maximum number of bytes a [`FaultyReader`] hands out per call.
const FAULTY_READ_LEN: usize = 3;

/// Invokes `f` with `span` and returns the error it reports, or `None` if it succeeds.
///
/// # Example
///
/// ```
/// use bigspan::testing::capture_error;
/// use bigspan::{BigSpan, Error};
///
/// let mut data = [0_u8; 4];
///
/// let error = capture_error(BigSpan::from(&mut data), |mut span| span.slice(3, 2).map(|_| ()));
///
/// assert!(matches!(error, Some(Error::SliceOutOfRange { .. })));
/// ```
pub fn capture_error<'a, T, R>(span: BigSpan<'a, T>, f: impl FnOnce(BigSpan<'a, T>) -> Result<R>) -> Option<Error> {
    f(span).err()
}

/// Invokes `f` and returns the message it panics with, or `None` if it returns normally.
///
/// Panic messages that are neither `&str` nor `String` are reported as an empty string.
#[must_use]
pub fn capture_panic<R>(f: impl FnOnce() -> R + UnwindSafe) -> Option<String> {
    panic::catch_unwind(f).err().map(|payload| panic_message(payload.as_ref()))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_default()
}

/// Returns `len` bytes of a fixed, non-uniform pattern that repeats every 251 bytes.
///
/// The period is prime, so the pattern never lines up with power-of-two chunk boundaries.
#[must_use]
pub fn repeating_bytes(len: usize) -> Vec<u8> {
    (0..len)
        .map(|i| u8::try_from(i % 251).expect("remainder of division by 251 always fits in u8"))
        .collect()
}

/// A reader that fails a fixed number of times before serving its data a few bytes at a time.
#[derive(Debug)]
pub struct FaultyReader {
    data: Vec<u8>,
    position: usize,
    failure: ErrorKind,
    failures_remaining: usize,
}

impl FaultyReader {
    /// Creates a reader over `data` whose first `failures` reads fail with `failure`.
    #[must_use]
    pub const fn new(data: Vec<u8>, failure: ErrorKind, failures: usize) -> Self {
        Self {
            data,
            position: 0,
            failure,
            failures_remaining: failures,
        }
    }
}

impl Read for FaultyReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.failures_remaining > 0 {
            self.failures_remaining -= 1;
            return Err(io::Error::from(self.failure));
        }

        let available = &self.data[self.position..];
        let len = buf.len().min(available.len()).min(FAULTY_READ_LEN);

        buf[..len].copy_from_slice(&available[..len]);
        self.position += len;

        Ok(len)
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_reported_errors() {
        let mut data = [1_u32, 2, 3];

        assert_eq!(
            capture_error(BigSpan::from(&mut data), |span| span.into_slice(2, 2)),
            Some(Error::SliceOutOfRange { start: 2, count: 2, len: 3 })
        );
        assert_eq!(capture_error(BigSpan::from(&mut data), |span| span.into_slice(1, 2)), None);
    }

    #[test]
    #[expect(clippy::panic, reason = "exercising panic capture")]
    fn captures_panic_messages() {
        assert_eq!(capture_panic(|| 5), None);
        assert_eq!(capture_panic(|| panic!("static message")).as_deref(), Some("static message"));
        assert_eq!(capture_panic(|| panic!("formatted {}", 42)).as_deref(), Some("formatted 42"));
    }

    #[test]
    fn repeating_pattern() {
        let bytes = repeating_bytes(600);

        assert_eq!(bytes.len(), 600);
        assert_eq!(bytes[0], 0);
        assert_eq!(bytes[250], 250);
        assert_eq!(bytes[251], 0);
        assert_eq!(bytes[599], bytes[599 - 251]);
    }

    #[test]
    fn faulty_reader_fails_then_trickles() {
        let mut reader = FaultyReader::new(b"abcdefg".to_vec(), ErrorKind::TimedOut, 1);
        let mut buffer = [0_u8; 16];

        assert_eq!(reader.read(&mut buffer).unwrap_err().kind(), ErrorKind::TimedOut);
        assert_eq!(reader.read(&mut buffer).unwrap(), 3);
        assert_eq!(reader.read(&mut buffer).unwrap(), 3);
        assert_eq!(reader.read(&mut buffer).unwrap(), 1);
        assert_eq!(reader.read(&mut buffer).unwrap(), 0);
    }
}
