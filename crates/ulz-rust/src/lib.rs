// SPDX-License-Identifier: ISC
//! Pure Rust ULZ-style LZ77 compression and decompression.
//!
//! # Overview
//!
//! This crate provides:
//!
//! - Raw token encode/decode over caller-provided buffers (`compress`/`decompress`).
//! - Allocating helpers (`compress_to_vec`, `decompress_to_vec`) and a
//!   size-agnostic decoder (`decompress_growing`) that grows its buffer until
//!   the data fits.
//! - The level-to-effort table of the match finder (`SearchParams`).
//!
//! The format is a byte-oriented LZ77 variant with a 128 KiB window, a minimum
//! match of 4 bytes, and no header. Every level produces the same format, so
//! any stream decodes the same way regardless of the level it was made with.
//!
//! # Features
//!
//! - `std` (default): implements `std::error::Error` for [`Error`].
//! - `encoder` (default): enables compression APIs.
//!
//! # no_std
//!
//! Disable default features to use in `no_std + alloc` environments:
//!
//! ```toml
//! [dependencies]
//! ulz-rust = { version = "0.1", default-features = false, features = ["encoder"] }
//! ```
//!
//! # Examples
//!
//! Raw roundtrip with caller-sized buffers:
//!
//! ```
//! use ulz_rust::{compress, decompress, max_compressed_size};
//!
//! let input = b"hello hello hello hello";
//! let mut compressed = vec![0u8; max_compressed_size(input.len())];
//! let n = compress(input, &mut compressed, ulz_rust::DEFAULT_LEVEL).unwrap();
//! compressed.truncate(n);
//!
//! let mut out = vec![0u8; input.len()];
//! let m = decompress(&compressed, &mut out).unwrap();
//! assert_eq!(m, input.len());
//! assert_eq!(&out, input);
//! ```
//!
//! Unknown original size:
//!
//! ```
//! use ulz_rust::{compress_to_vec, decompress_growing};
//!
//! let input = b"the original size is not stored anywhere".repeat(64);
//! let compressed = compress_to_vec(&input, 9).unwrap();
//! let restored = decompress_growing(&compressed).unwrap();
//! assert_eq!(restored, input);
//! ```
//!
//! # Safety
//!
//! This crate forbids `unsafe` code.

#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod buffer;
mod error;
mod raw;

#[cfg(feature = "encoder")]
#[cfg_attr(docsrs, doc(cfg(feature = "encoder")))]
/// Allocating compression helper.
pub use buffer::compress_to_vec;
/// Allocating decompression helpers.
pub use buffer::{
    decompress_growing, decompress_growing_with_limit, decompress_to_vec,
    estimate_decompressed_capacity,
};
/// Crate error and result types.
pub use error::{Error, Result};
/// Raw decoder API.
pub use raw::decompress;
#[cfg(feature = "encoder")]
#[cfg_attr(docsrs, doc(cfg(feature = "encoder")))]
/// Raw encoder APIs.
pub use raw::{SearchParams, compress};

/// Number of bits in a back-reference distance.
pub const WINDOW_BITS: u32 = 17;

/// Size of the sliding window; back-references reach at most
/// `WINDOW_SIZE - 1` bytes back.
pub const WINDOW_SIZE: usize = 1 << WINDOW_BITS;

/// Shortest encodable back-reference.
pub const MIN_MATCH: usize = 4;

/// Maximum number of bytes compression may add on top of the input length.
///
/// Output buffers passed to [`compress`] must hold at least
/// `input.len() + EXCESS` bytes.
pub const EXCESS: usize = 16;

/// Lowest (fastest) compression level.
pub const MIN_LEVEL: u8 = 1;

/// Highest (best ratio) compression level.
pub const MAX_LEVEL: u8 = 9;

/// Level used when the caller has no preference.
pub const DEFAULT_LEVEL: u8 = 5;

/// Largest input the encoder accepts, and the largest output a stream can
/// decode to through the growing helpers.
pub const MAX_INPUT_LEN: usize = i32::MAX as usize - EXCESS;

/// Computes a guaranteed upper bound for compressed output size.
///
/// Saturates instead of overflowing; inputs that large are rejected by
/// [`compress`] anyway.
#[inline]
pub const fn max_compressed_size(input_len: usize) -> usize {
    input_len.saturating_add(EXCESS)
}
