// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Raw memory from the C allocator, viewed through big spans.
//!
//! Spans never own memory. This module provides the owning side for memory that does not come
//! from a Rust collection: [`allocate()`] and [`free()`] wrap the C allocator directly and
//! [`UnmanagedBuffer`] pairs them so the block is released on every exit path. Raw blocks are
//! compared with [`ops::compare()`][crate::ops::compare].
//!
//! ```
//! use bigspan::unmanaged::UnmanagedBuffer;
//!
//! let mut buffer = UnmanagedBuffer::<u32>::new(1024)?;
//!
//! let mut span = buffer.as_big_span();
//! span.fill(7);
//! span[1023] = 8;
//!
//! assert_eq!(buffer.as_read_only().iter().copied().map(u64::from).sum::<u64>(), 7 * 1023 + 8);
//! # Ok::<(), bigspan::Error>(())
//! ```

use std::ptr::NonNull;

use tracing::{Level, event};

use crate::{BigSpan, Error, ReadOnlyBigSpan, Result, Unmanaged, ops};

/// Allocates `bytes` bytes of uninitialized memory from the C allocator.
///
/// Returns `None` if the allocator cannot satisfy the request. A zero-byte request may return
/// either `None` or a unique pointer, depending on the platform.
///
/// The block must be released with [`free()`].
#[must_use]
pub fn allocate(bytes: usize) -> Option<NonNull<u8>> {
    // SAFETY: malloc accepts any size and signals failure by returning null.
    let ptr = unsafe { libc::malloc(bytes) };

    let result = NonNull::new(ptr.cast::<u8>());

    match result {
        Some(ptr) => event!(Level::TRACE, message = "allocated unmanaged memory", bytes, address = ?ptr),
        None => event!(Level::DEBUG, message = "unmanaged allocation failed", bytes),
    }

    result
}

/// Returns a block obtained from [`allocate()`] to the C allocator.
///
/// # Safety
///
/// `ptr` must have been returned by [`allocate()`] and must not have been freed already. The
/// block must not be accessed afterwards.
pub unsafe fn free(ptr: NonNull<u8>) {
    event!(Level::TRACE, message = "freeing unmanaged memory", address = ?ptr);

    // SAFETY: Forwarding the caller's guarantees.
    unsafe { libc::free(ptr.as_ptr().cast()) };
}

/// An owned, zero-initialized block of `len` elements of `T` from the C allocator.
///
/// The block is freed when the buffer is dropped. Use [`as_big_span()`][Self::as_big_span] to
/// access the elements.
///
/// # Thread safety
///
/// The buffer is thread-safe if `T` is.
#[derive(Debug)]
pub struct UnmanagedBuffer<T: Unmanaged> {
    ptr: NonNull<T>,
    len: usize,

    // Whether `ptr` came from the allocator. Empty buffers use a dangling pointer.
    allocated: bool,
}

// SAFETY: The buffer exclusively owns its elements, like a `Box<[T]>`.
unsafe impl<T: Unmanaged + Send> Send for UnmanagedBuffer<T> {}
// SAFETY: Shared access only hands out shared views, like a `Box<[T]>`.
unsafe impl<T: Unmanaged + Sync> Sync for UnmanagedBuffer<T> {}

impl<T: Unmanaged> UnmanagedBuffer<T> {
    /// Allocates a zero-initialized buffer of `len` elements.
    ///
    /// # Errors
    ///
    /// * [`Error::OutOfMemory`] if the size in bytes overflows `usize` or the allocator cannot
    ///   provide the memory.
    /// * [`Error::Misaligned`] if the allocator's block alignment is insufficient for `T`.
    pub fn new(len: usize) -> Result<Self> {
        let bytes = len.checked_mul(size_of::<T>()).ok_or(Error::OutOfMemory { bytes: usize::MAX })?;

        if bytes == 0 {
            return Ok(Self {
                ptr: NonNull::dangling(),
                len,
                allocated: false,
            });
        }

        let raw = allocate(bytes).ok_or(Error::OutOfMemory { bytes })?;

        if !raw.cast::<T>().as_ptr().is_aligned() {
            // SAFETY: The block was just allocated and is not referenced anywhere else.
            unsafe { free(raw) };

            return Err(Error::Misaligned {
                required: align_of::<T>(),
            });
        }

        // SAFETY: The block holds `bytes` writable bytes.
        unsafe { ops::zero_memory(raw.as_ptr(), bytes) };

        Ok(Self {
            ptr: raw.cast(),
            len,
            allocated: true,
        })
    }

    /// The number of elements in the buffer.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer has no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// A mutable view of every element of the buffer.
    #[must_use]
    pub fn as_big_span(&mut self) -> BigSpan<'_, T> {
        // SAFETY: The buffer owns `len` initialized elements and the view borrows it mutably.
        unsafe { BigSpan::from_parts(self.ptr, self.len) }
    }

    /// A read-only view of every element of the buffer.
    #[must_use]
    pub fn as_read_only(&self) -> ReadOnlyBigSpan<'_, T> {
        // SAFETY: The buffer owns `len` initialized elements and the view borrows it.
        unsafe { ReadOnlyBigSpan::from_parts(self.ptr, self.len) }
    }
}

impl<T: Unmanaged> Drop for UnmanagedBuffer<T> {
    fn drop(&mut self) {
        if self.allocated {
            // SAFETY: The block came from allocate() and is freed exactly once, here.
            unsafe { free(self.ptr.cast()) };
        }
    }
}
