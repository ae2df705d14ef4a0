// SPDX-License-Identifier: ISC
//! Allocating helpers over the raw engine.
//!
//! The raw API needs caller-sized buffers. These helpers size them: exactly for
//! compression, and by estimate plus capped doubling for decompression when the
//! original size is unknown.
use alloc::vec;
use alloc::vec::Vec;

use crate::{Error, MAX_INPUT_LEN, Result, decompress};
#[cfg(feature = "encoder")]
use crate::{compress, max_compressed_size};

/// Ratio used to guess the decompressed size from the compressed size.
const CAPACITY_GUESS_RATIO: usize = 4;

/// Largest compressed input the decompression helpers accept.
const MAX_COMPRESSED_LEN: usize = i32::MAX as usize;

/// Initial decompression capacity guess for a compressed buffer of
/// `compressed_len` bytes.
///
/// This is a starting point, not a bound: highly compressible data can expand
/// far more than 4×. The result never exceeds [`MAX_INPUT_LEN`].
#[inline]
pub const fn estimate_decompressed_capacity(compressed_len: usize) -> usize {
    let guess = compressed_len.saturating_mul(CAPACITY_GUESS_RATIO);
    if guess > MAX_INPUT_LEN { MAX_INPUT_LEN } else { guess }
}

/// Compresses `input` at `level` into a new, exactly sized `Vec<u8>`.
///
/// # Example
///
/// ```
/// use ulz_rust::{compress_to_vec, decompress_to_vec};
///
/// let input = b"vec helpers vec helpers vec helpers";
/// let compressed = compress_to_vec(input, 5).unwrap();
/// let restored = decompress_to_vec(&compressed, input.len()).unwrap();
/// assert_eq!(restored, input);
/// ```
#[cfg(feature = "encoder")]
pub fn compress_to_vec(input: &[u8], level: u8) -> Result<Vec<u8>> {
    if input.len() > MAX_INPUT_LEN {
        return Err(Error::InputTooLarge);
    }
    let mut output = vec![0u8; max_compressed_size(input.len())];
    let written = compress(input, &mut output, level)?;
    output.truncate(written);
    Ok(output)
}

/// Decompresses `input` into a new `Vec<u8>`.
///
/// With a non-zero `size_hint` a single attempt is made with exactly that
/// capacity; a hint smaller than the real size fails with
/// `Error::OutputTooSmall`. A `size_hint` of `0` means "unknown" and defers to
/// [`decompress_growing`].
///
/// Returns `Error::InputTooLarge` when `input` or `size_hint` exceed the
/// format's 32-bit size limits.
pub fn decompress_to_vec(input: &[u8], size_hint: usize) -> Result<Vec<u8>> {
    if size_hint == 0 {
        return decompress_growing(input);
    }
    if input.len() > MAX_COMPRESSED_LEN || size_hint > MAX_INPUT_LEN {
        return Err(Error::InputTooLarge);
    }

    let mut output = vec![0u8; size_hint];
    let written = decompress(input, &mut output)?;
    output.truncate(written);
    Ok(output)
}

/// Decompresses `input` without knowing its original size.
///
/// Starts from [`estimate_decompressed_capacity`] and doubles the buffer each
/// time the decoder reports `Error::OutputTooSmall`, up to [`MAX_INPUT_LEN`].
/// Corrupt input fails immediately with `Error::InvalidData`. Running out of
/// room at the cap is also reported as `Error::InvalidData`, since no stream
/// produced by [`compress`](crate::compress) decodes to more than
/// [`MAX_INPUT_LEN`] bytes.
///
/// The length of the returned vector is the decompressed size.
///
/// # Example
///
/// ```
/// use ulz_rust::{compress_to_vec, decompress_growing};
///
/// let input = vec![b'A'; 100_000];
/// let compressed = compress_to_vec(&input, 9).unwrap();
/// assert!(compressed.len() * 4 < input.len());
///
/// let restored = decompress_growing(&compressed).unwrap();
/// assert_eq!(restored, input);
/// ```
pub fn decompress_growing(input: &[u8]) -> Result<Vec<u8>> {
    decompress_growing_with_limit(input, MAX_INPUT_LEN).map_err(|err| match err {
        Error::OutputTooSmall => Error::InvalidData,
        other => other,
    })
}

/// Like [`decompress_growing`], but never allocates more than `max_capacity`
/// bytes of output.
///
/// `max_capacity` is clamped to [`MAX_INPUT_LEN`]. When the data does not fit
/// in `max_capacity` bytes this returns `Error::OutputTooSmall`, which lets
/// callers enforce their own memory ceiling on untrusted input.
pub fn decompress_growing_with_limit(input: &[u8], max_capacity: usize) -> Result<Vec<u8>> {
    if input.len() > MAX_COMPRESSED_LEN {
        return Err(Error::InputTooLarge);
    }

    let ceiling = max_capacity.min(MAX_INPUT_LEN);
    let mut capacity = estimate_decompressed_capacity(input.len()).min(ceiling);
    let mut output = Vec::new();

    loop {
        output.resize(capacity, 0);
        match decompress(input, &mut output) {
            Ok(written) => {
                output.truncate(written);
                return Ok(output);
            }
            Err(Error::OutputTooSmall) if capacity < ceiling => {
                capacity = capacity.saturating_mul(2).max(1).min(ceiling);
            }
            Err(err) => return Err(err),
        }
    }
}
