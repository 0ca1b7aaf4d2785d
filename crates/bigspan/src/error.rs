// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use thiserror::Error;

/// A failed operation on a big span or on one of the helpers built around it.
///
/// All bounds and argument checks happen before any memory is touched, so receiving one of
/// these means the destination of the operation was left unmodified.
///
/// # Thread safety
///
/// This type is thread-safe.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// An element index was at or past the end of the span.
    #[error("index {index} is out of range for a span of length {len}")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The length of the span at the time of the access.
        len: usize,
    },

    /// A slice (or an explicit-length operation) reached past the end of the span.
    ///
    /// `start + count` is evaluated without overflow, so a wrapping sum is also reported here.
    #[error("range starting at {start} with {count} elements is out of range for a span of length {len}")]
    SliceOutOfRange {
        /// First element of the requested range.
        start: usize,
        /// Number of elements in the requested range.
        count: usize,
        /// The length of the span at the time of the access.
        len: usize,
    },

    /// An argument had a value that is never valid for the operation.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The destination of a copy holds fewer elements than the source.
    #[error("destination of length {destination_len} is too short for a source of length {source_len}")]
    DestinationTooShort {
        /// Number of elements in the source.
        source_len: usize,
        /// Number of elements in the destination.
        destination_len: usize,
    },

    /// The span holds more elements than the requested representation can.
    #[error("{len} elements exceed the maximum of {max} supported by the target representation")]
    CapacityExceeded {
        /// Number of elements in the span.
        len: usize,
        /// Maximum number of elements the target can hold.
        max: usize,
    },

    /// The base address of a span is not suitably aligned for the requested element type.
    #[error("span base address is not aligned to {required} bytes")]
    Misaligned {
        /// The alignment required by the target element type.
        required: usize,
    },

    /// The raw memory allocator could not provide the requested number of bytes.
    #[error("failed to allocate {bytes} bytes of unmanaged memory")]
    OutOfMemory {
        /// Size of the failed allocation request.
        bytes: usize,
    },
}

/// A specialized `Result` for big span operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a big span error as a standard I/O error.
///
/// Used by the stream adapters, which must report failures through `std::io` traits.
impl From<Error> for std::io::Error {
    fn from(value: Error) -> Self {
        match value {
            Error::IndexOutOfRange { .. } | Error::SliceOutOfRange { .. } | Error::DestinationTooShort { .. } => {
                Self::new(std::io::ErrorKind::UnexpectedEof, value)
            }
            Error::InvalidArgument(_) | Error::Misaligned { .. } => Self::new(std::io::ErrorKind::InvalidInput, value),
            Error::OutOfMemory { .. } => Self::new(std::io::ErrorKind::OutOfMemory, value),
            Error::CapacityExceeded { .. } => Self::other(value),
        }
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use std::io::ErrorKind;

    use static_assertions::assert_impl_all;

    use super::*;

    #[test]
    fn thread_safe_type() {
        assert_impl_all!(Error: Send, Sync);
    }

    #[test]
    fn display_mentions_bounds() {
        let e = Error::SliceOutOfRange {
            start: 3,
            count: 9,
            len: 10,
        };

        assert_eq!(
            e.to_string(),
            "range starting at 3 with 9 elements is out of range for a span of length 10"
        );

        let e = Error::IndexOutOfRange { index: 10, len: 10 };
        assert_eq!(e.to_string(), "index 10 is out of range for a span of length 10");
    }

    #[test]
    fn into_stdio_error() {
        let io_error: std::io::Error = Error::DestinationTooShort {
            source_len: 3,
            destination_len: 2,
        }
        .into();
        assert_eq!(io_error.kind(), ErrorKind::UnexpectedEof);

        let io_error: std::io::Error = Error::InvalidArgument("nope").into();
        assert_eq!(io_error.kind(), ErrorKind::InvalidInput);

        let io_error: std::io::Error = Error::OutOfMemory { bytes: 42 }.into();
        assert_eq!(io_error.kind(), ErrorKind::OutOfMemory);

        let io_error: std::io::Error = Error::CapacityExceeded { len: 5, max: 4 }.into();
        assert_eq!(io_error.kind(), ErrorKind::Other);
    }
}
