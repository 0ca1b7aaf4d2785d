// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::num::NonZero;

use new_zealand::nz;

/// The largest number of elements a native slice handed out by this crate may hold.
///
/// This is the range of a signed 32-bit length. Big spans can be longer; they are converted to
/// native slices only when they fit, and longer spans are processed in chunks of at most this
/// many elements when crossing into APIs that are limited to 32-bit lengths.
pub const NATIVE_MAX_LEN: usize = 0x7FFF_FFFF;

/// The chunk length used by the small slice utilities and the stream bridge when the caller
/// does not specify one. Equal to [`NATIVE_MAX_LEN`].
pub const DEFAULT_CHUNK_LEN: NonZero<usize> = nz!(0x7FFF_FFFF);

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_bound_matches_i32() {
        assert_eq!(NATIVE_MAX_LEN, usize::try_from(i32::MAX).unwrap());
        assert_eq!(DEFAULT_CHUNK_LEN.get(), NATIVE_MAX_LEN);
    }
}
