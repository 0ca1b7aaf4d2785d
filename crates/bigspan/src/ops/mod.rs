// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Whole-memory algorithms that operate on raw addresses and lengths.
//!
//! These are the primitives that big spans delegate their bulk work to. They know nothing
//! about spans: every function takes a base address and an element or byte count, and every
//! function is `unsafe` because the caller vouches for the validity of that memory.
//!
//! * [`copy()`] moves bytes between possibly overlapping regions.
//! * [`clear_without_references()`] and [`clear_with_references()`] zero memory, the latter
//!   strictly in whole pointer-sized words.
//! * [`fill()`] splats a value over a region, using block-wide stores where the target supports them.
//! * [`compare()`] orders two regions lexicographically by their bytes.

mod clear;
mod compare;
mod copy;
mod fill;

pub use clear::{BULK_ZERO_THRESHOLD, clear_with_references, clear_without_references, zero_memory};
pub use compare::compare;
pub use copy::{copy, copy_elements};
pub use fill::{VECTOR_BYTES, fill, fill_cloned, is_hardware_accelerated};
