// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Bounds-checked views over contiguous memory whose length is a platform-width count.
//!
//! A [`BigSpan`] is a mutable view and a [`ReadOnlyBigSpan`] a shared view over a run of
//! elements owned by something else: a vector, an array, a native slice or a raw block of
//! memory. Unlike a native slice in code that has to interoperate with APIs limited to 32-bit
//! lengths, a big span may be longer than [`NATIVE_MAX_LEN`] elements. It is converted back to
//! a native slice only when it fits, and is otherwise processed in bounded chunks.
//!
//! ```
//! use bigspan::{BigSpan, ReadOnlyBigSpan};
//! use new_zealand::nz;
//!
//! let mut storage = vec![0_u32; 10_000];
//! let mut span = BigSpan::from(storage.as_mut_slice());
//!
//! span.fill(3);
//! span.slice(100, 10)?.clear();
//!
//! let sums = span.select_small_slices(nz!(4096), |chunk| chunk.iter().sum::<u32>());
//! assert_eq!(sums, [3 * 4096 - 30, 3 * 4096, 3 * (10_000 - 2 * 4096)]);
//!
//! let copy = storage.clone();
//! assert!(ReadOnlyBigSpan::from(storage.as_slice()).sequence_equal(ReadOnlyBigSpan::from(copy.as_slice())));
//! # Ok::<(), bigspan::Error>(())
//! ```
//!
//! # Views, not collections
//!
//! Spans never own, grow or free memory. The borrow checker ties every span to the storage it
//! was created from, so a span cannot outlive it, and a mutable span has exclusive access to
//! its elements for as long as it exists. Equality (`==`) compares identity: two spans are equal
//! when they start at the same address and have the same length. Compare contents with
//! [`ReadOnlyBigSpan::sequence_equal()`] or [`ReadOnlyBigSpan::compare_memory()`].
//!
//! # Element capabilities
//!
//! * [`Zeroable`] element types can be cleared. Types that hold pointers are cleared in whole
//!   pointer-sized words.
//! * [`Unmanaged`] element types are plain data. Only they can be viewed over raw pointers,
//!   reinterpreted as bytes and compared byte-wise.
//!
//! # Bulk algorithms
//!
//! Clearing, filling, copying and comparing are implemented in [`ops`] and are also usable on
//! raw memory. Copies behave like `memmove`, so source and destination may overlap.
//!
//! # Interoperability
//!
//! * [`small_slices()`][ReadOnlyBigSpan::small_slices] and friends split a span into native
//!   slices of bounded length.
//! * [`ReadBigSpanExt`] and [`WriteBigSpanExt`] move byte spans through [`std::io`] in chunks.
//! * [`ReadOnlyBigSpan::reader()`] and [`BigSpan::writer()`] adapt byte spans to [`std::io`].
//! * `read_num_le()` and `write_num_le()` encode numbers at byte offsets in little-endian order.
//! * [`unmanaged::UnmanagedBuffer`] owns a raw block from the C allocator and hands out spans.
//!
//! # Testing
//!
//! The `test-util` Cargo feature exposes the `testing` module with an error-capture helper, a
//! deterministic test data generator and a reader that injects I/O failures.

mod chunks;
mod codec;
mod constants;
mod element;
mod enumerator;
mod error;
mod index;
pub mod ops;
mod pinned;
mod read_adapter;
mod read_only_span;
mod span;
mod stream;
pub mod unmanaged;
mod write_adapter;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use chunks::{SmallSlices, SmallSlicesMut};
pub use constants::{DEFAULT_CHUNK_LEN, NATIVE_MAX_LEN};
pub use element::{Unmanaged, Zeroable};
pub use enumerator::{Cursor, CursorMut, Iter, IterMut};
pub use error::{Error, Result};
pub use index::FromEnd;
pub use pinned::{PinnedSequence, with_pinned_sequence, with_pinned_sequence_2, with_pinned_sequence_3, with_pinned_sequence_4};
pub use read_adapter::BigSpanReader;
pub use read_only_span::ReadOnlyBigSpan;
pub use span::BigSpan;
pub use stream::{ReadBigSpanExt, WriteBigSpanExt};
pub use write_adapter::BigSpanWriter;
