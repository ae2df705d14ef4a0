// SPDX-License-Identifier: ISC
use super::format::{DIST_HI_BIT, LEN_MASK, MATCH_BITS, RUN_MASK, RUN_SHIFT, read_varint};
use crate::{Error, MAX_INPUT_LEN, MIN_MATCH, Result, WINDOW_SIZE};

/// Decompresses `input` into `output`.
///
/// `output.len()` is the capacity; nothing is ever written past it. Returns the
/// number of bytes written to `output`.
///
/// Returns:
/// - `Error::InvalidData` when the token stream is malformed or truncated, a
///   back-reference points before the start of the output or outside the
///   window, or a token would grow the output past [`MAX_INPUT_LEN`].
/// - `Error::OutputTooSmall` when `output` is too small for the decoded data.
///
/// Corruption in a token is always reported before a capacity failure for the
/// same token, so `OutputTooSmall` reliably means "retry with more room".
/// On error the contents of `output` are unspecified.
///
/// # Example
///
/// ```
/// use ulz_rust::{Error, compress, decompress, max_compressed_size};
///
/// let input = b"raw decoder example, raw decoder example";
/// let mut compressed = vec![0u8; max_compressed_size(input.len())];
/// let clen = compress(input, &mut compressed, 9).unwrap();
/// compressed.truncate(clen);
///
/// let mut out = vec![0u8; input.len()];
/// let written = decompress(&compressed, &mut out).unwrap();
/// assert_eq!(&out[..written], input);
///
/// let mut short = vec![0u8; input.len() - 1];
/// assert_eq!(decompress(&compressed, &mut short), Err(Error::OutputTooSmall));
/// ```
pub fn decompress(input: &[u8], output: &mut [u8]) -> Result<usize> {
    let mut ip = 0usize;
    let mut op = 0usize;

    while ip < input.len() {
        let token = input[ip];
        ip += 1;

        let mut run = usize::from(token >> RUN_SHIFT);
        if run != 0 {
            if run == RUN_MASK {
                run = run.checked_add(read_varint(input, &mut ip)?).ok_or(Error::InvalidData)?;
            }
            if run > MAX_INPUT_LEN.saturating_sub(op) {
                return Err(Error::InvalidData);
            }
            if input.len() - ip < run {
                return Err(Error::InvalidData);
            }
            if output.len() - op < run {
                return Err(Error::OutputTooSmall);
            }
            output[op..op + run].copy_from_slice(&input[ip..ip + run]);
            ip += run;
            op += run;

            if ip == input.len() {
                if token & MATCH_BITS != 0 {
                    return Err(Error::InvalidData);
                }
                break;
            }
        }

        let mut len = usize::from(token) & LEN_MASK;
        if len == LEN_MASK {
            len = len.checked_add(read_varint(input, &mut ip)?).ok_or(Error::InvalidData)?;
        }
        let len = len.checked_add(MIN_MATCH).ok_or(Error::InvalidData)?;
        // No encoder output decodes past MAX_INPUT_LEN.
        if len > MAX_INPUT_LEN.saturating_sub(op) {
            return Err(Error::InvalidData);
        }

        if input.len() - ip < 2 {
            return Err(Error::InvalidData);
        }
        let dist_hi = usize::from(token & DIST_HI_BIT) << 12;
        let dist = dist_hi | usize::from(u16::from_le_bytes([input[ip], input[ip + 1]]));
        ip += 2;
        debug_assert!(dist < WINDOW_SIZE);

        if dist == 0 || dist > op || dist > WINDOW_SIZE {
            return Err(Error::InvalidData);
        }
        if output.len() - op < len {
            return Err(Error::OutputTooSmall);
        }

        let ref_pos = op - dist;
        if dist >= len {
            output.copy_within(ref_pos..ref_pos + len, op);
        } else {
            // Overlapping copy: later bytes of this match read bytes written
            // earlier in the same match.
            let mut src = ref_pos;
            let mut dst = op;
            let end = op + len;
            while dst < end {
                output[dst] = output[src];
                dst += 1;
                src += 1;
            }
        }
        op += len;
    }

    Ok(op)
}
