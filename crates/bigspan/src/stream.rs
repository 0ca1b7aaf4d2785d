// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Moving big byte spans through standard I/O traits.
//!
//! [`Read`] and [`Write`] accept native slices only, so a big span is processed as a series of
//! bounded chunks (see [`ReadOnlyBigSpan::small_slices()`]). The I/O calls are ordinary
//! synchronous calls and may block.

use std::io::{self, ErrorKind, Read, Write};
use std::num::NonZero;

use tracing::{Level, event};

use crate::{BigSpan, DEFAULT_CHUNK_LEN, ReadOnlyBigSpan};

/// Reads from any [`Read`] directly into big byte spans.
pub trait ReadBigSpanExt: Read {
    /// Fills `destination` from the reader, chunk by chunk, with chunks of at most
    /// [`DEFAULT_CHUNK_LEN`] bytes.
    ///
    /// Each chunk is filled by a single call to [`Read::read()`]. Reading stops at the first call
    /// that returns fewer bytes than the chunk length, whether or not the reader is at end of
    /// data. The result is then less than the span length and includes the bytes of that short
    /// chunk.
    ///
    /// # Errors
    ///
    /// Any error reported by the reader other than [`ErrorKind::Interrupted`], which is retried.
    /// Bytes read before the error remain in `destination`.
    fn read_big_span(&mut self, destination: &mut BigSpan<'_, u8>) -> io::Result<usize> {
        self.read_big_span_chunked(destination, DEFAULT_CHUNK_LEN)
    }

    /// Fills `destination` from the reader with chunks of at most `max_chunk_len` bytes.
    ///
    /// Behaves like [`read_big_span()`][Self::read_big_span] otherwise.
    ///
    /// # Errors
    ///
    /// Any error reported by the reader other than [`ErrorKind::Interrupted`].
    fn read_big_span_chunked(&mut self, destination: &mut BigSpan<'_, u8>, max_chunk_len: NonZero<usize>) -> io::Result<usize> {
        let mut total = 0_usize;

        for chunk in destination.small_slices_mut(max_chunk_len) {
            let requested = chunk.len();
            let received = read_chunk(self, chunk)?;
            total += received;

            event!(Level::TRACE, message = "read chunk", requested, received, total);

            if received < requested {
                event!(Level::DEBUG, message = "short read, stopping", requested, received, total);
                break;
            }
        }

        Ok(total)
    }
}

impl<R: Read + ?Sized> ReadBigSpanExt for R {}

/// Writes big byte spans to any [`Write`].
pub trait WriteBigSpanExt: Write {
    /// Writes every byte of `source`, chunk by chunk, with chunks of at most
    /// [`DEFAULT_CHUNK_LEN`] bytes.
    ///
    /// # Errors
    ///
    /// Any error reported by the writer, including [`ErrorKind::WriteZero`] if it stops accepting
    /// data. Chunks before the failing one have been written.
    fn write_big_span(&mut self, source: ReadOnlyBigSpan<'_, u8>) -> io::Result<()> {
        self.write_big_span_chunked(source, DEFAULT_CHUNK_LEN)
    }

    /// Writes every byte of `source` with chunks of at most `max_chunk_len` bytes.
    ///
    /// # Errors
    ///
    /// Any error reported by the writer.
    fn write_big_span_chunked(&mut self, source: ReadOnlyBigSpan<'_, u8>, max_chunk_len: NonZero<usize>) -> io::Result<()> {
        let mut total = 0_usize;

        for chunk in source.small_slices(max_chunk_len) {
            self.write_all(chunk)?;
            total += chunk.len();

            event!(Level::TRACE, message = "wrote chunk", len = chunk.len(), total);
        }

        Ok(())
    }
}

impl<W: Write + ?Sized> WriteBigSpanExt for W {}

/// Issues one read into `chunk`, repeating it only if it was interrupted.
fn read_chunk<R: Read + ?Sized>(reader: &mut R, chunk: &mut [u8]) -> io::Result<usize> {
    loop {
        match reader.read(chunk) {
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            result => return result,
        }
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use new_zealand::nz;
    use tracing_test::traced_test;

    use super::*;
    use crate::testing::{FaultyReader, repeating_bytes};

    #[test]
    fn round_trip_through_stream() {
        let source = repeating_bytes(1000);
        let mut stream = Vec::new();

        stream
            .write_big_span_chunked(ReadOnlyBigSpan::from(source.as_slice()), nz!(64))
            .unwrap();
        assert_eq!(stream, source);

        let mut destination = vec![0_u8; 1000];
        let read = Cursor::new(stream)
            .read_big_span_chunked(&mut BigSpan::from(destination.as_mut_slice()), nz!(64))
            .unwrap();

        assert_eq!(read, 1000);
        assert_eq!(destination, source);
    }

    #[test]
    fn default_chunking() {
        let mut stream = Vec::new();
        stream.write_big_span(ReadOnlyBigSpan::from(b"abc".as_slice())).unwrap();

        let mut destination = [0_u8; 3];
        let read = Cursor::new(stream).read_big_span(&mut BigSpan::from(&mut destination)).unwrap();

        assert_eq!(read, 3);
        assert_eq!(&destination, b"abc");
    }

    #[test]
    #[traced_test]
    fn short_read_counts_partial_chunk() {
        let mut destination = [0_u8; 10];
        let read = Cursor::new(vec![5_u8; 6])
            .read_big_span_chunked(&mut BigSpan::from(&mut destination), nz!(4))
            .unwrap();

        assert_eq!(read, 6);
        assert_eq!(destination, [5, 5, 5, 5, 5, 5, 0, 0, 0, 0]);
        assert!(logs_contain("short read, stopping"));
    }

    #[test]
    fn interrupted_reads_are_retried() {
        let mut reader = FaultyReader::new(b"payload".to_vec(), ErrorKind::Interrupted, 2);
        let mut destination = [0_u8; 7];

        let read = reader
            .read_big_span_chunked(&mut BigSpan::from(&mut destination), nz!(3))
            .unwrap();

        assert_eq!(read, 7);
        assert_eq!(&destination, b"payload");
    }

    #[test]
    #[traced_test]
    fn short_read_stops_before_end_of_data() {
        // Serves at most 3 bytes per call while more data remains.
        let mut reader = FaultyReader::new(vec![7_u8; 12], ErrorKind::Other, 0);
        let mut destination = [0_u8; 12];

        let read = reader
            .read_big_span_chunked(&mut BigSpan::from(&mut destination), nz!(4))
            .unwrap();

        assert_eq!(read, 3);
        assert_eq!(destination, [7, 7, 7, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert!(logs_contain("short read, stopping"));

        let mut rest = [0_u8; 9];
        assert_eq!(reader.read(&mut rest).unwrap(), 3);
    }

    #[test]
    fn default_chunk_is_one_read() {
        let mut reader = FaultyReader::new(b"payload".to_vec(), ErrorKind::Interrupted, 1);
        let mut destination = [0_u8; 7];

        let read = reader.read_big_span(&mut BigSpan::from(&mut destination)).unwrap();

        assert_eq!(read, 3);
        assert_eq!(&destination, b"pay\0\0\0\0");
    }

    #[test]
    fn reader_errors_are_propagated() {
        let mut reader = FaultyReader::new(b"payload".to_vec(), ErrorKind::ConnectionReset, 1);
        let mut destination = [0_u8; 7];

        let error = reader.read_big_span(&mut BigSpan::from(&mut destination)).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::ConnectionReset);
    }

    #[test]
    fn writer_refusing_data_fails() {
        let mut storage = [0_u8; 4];
        let mut writer = BigSpan::from(&mut storage).writer();

        let error = writer
            .write_big_span_chunked(ReadOnlyBigSpan::from(b"overflowing".as_slice()), nz!(3))
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::WriteZero);
        assert_eq!(writer.written(), 4);
    }

    #[test]
    fn empty_spans_do_no_io() {
        let mut reader = FaultyReader::new(Vec::new(), ErrorKind::Other, 1);
        assert_eq!(reader.read_big_span(&mut BigSpan::empty()).unwrap(), 0);

        let mut stream = Vec::new();
        stream.write_big_span(ReadOnlyBigSpan::empty()).unwrap();
        assert!(stream.is_empty());
    }
}
