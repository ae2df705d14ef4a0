// SPDX-License-Identifier: ISC
//! Token layout shared by the encoder and decoder.
//!
//! Every token starts with a control byte `RRRD LLLL`:
//!
//! - `RRR`: literal run length, `7` meaning `7 + varint`.
//! - `D`: bit 16 of the back-reference distance.
//! - `LLLL`: match length minus [`MIN_MATCH`], `15` meaning `15 + varint`.
//!
//! followed by the run varint, the literal bytes, the length varint and the
//! low 16 bits of the distance (little-endian). The last token of a stream may
//! be literal-only, in which case `D` and `LLLL` are zero and no distance
//! follows.
use crate::{Error, MIN_MATCH, Result};

pub(crate) const RUN_SHIFT: u32 = 5;
pub(crate) const RUN_MASK: usize = 7;
pub(crate) const LEN_MASK: usize = 15;
pub(crate) const DIST_HI_BIT: u8 = 16;
/// Bits of the control byte that must be zero in a literal-only token.
pub(crate) const MATCH_BITS: u8 = 0x1f;

/// Longest varint the decoder accepts; enough for any `i32` length.
pub(crate) const MAX_VARINT_LEN: usize = 5;

/// Number of bytes [`write_varint`] emits for `value`.
#[inline]
pub(crate) const fn varint_len(mut value: usize) -> usize {
    let mut n = 1;
    while value >= 128 {
        value = (value - 128) >> 7;
        n += 1;
    }
    n
}

/// Extra bytes a token needs on top of its literals and `MIN_MATCH` bytes of
/// match to encode a run of `run` literals followed by a `len` byte match.
#[inline]
pub(crate) const fn sequence_overhead(run: usize, len: usize) -> usize {
    let mut cost = 1 + 2;
    if run >= RUN_MASK {
        cost += varint_len(run - RUN_MASK);
    }
    if len - MIN_MATCH >= LEN_MASK {
        cost += varint_len(len - MIN_MATCH - LEN_MASK);
    }
    cost
}

/// Builds a control byte for a token with a `run` literal prefix and a match
/// of `len` bytes at `dist`.
#[inline]
pub(crate) fn control_byte(run: usize, len: usize, dist: usize) -> u8 {
    let run_field = run.min(RUN_MASK) as u8;
    let len_field = (len - MIN_MATCH).min(LEN_MASK) as u8;
    let dist_hi = ((dist >> 12) as u8) & DIST_HI_BIT;
    (run_field << RUN_SHIFT) | dist_hi | len_field
}

/// Writes `value` as a bijective base-128 varint at `out[*op..]`.
#[inline]
pub(crate) fn write_varint(out: &mut [u8], op: &mut usize, mut value: usize) -> Result<()> {
    if out.len() - *op < varint_len(value) {
        return Err(Error::OutputTooSmall);
    }
    while value >= 128 {
        value -= 128;
        out[*op] = 128 | (value & 127) as u8;
        *op += 1;
        value >>= 7;
    }
    out[*op] = value as u8;
    *op += 1;
    Ok(())
}

/// Reads a varint written by [`write_varint`] from `input[*ip..]`.
///
/// Truncated or over-long encodings are `Error::InvalidData`.
#[inline]
pub(crate) fn read_varint(input: &[u8], ip: &mut usize) -> Result<usize> {
    let mut value = 0u64;
    for i in 0..MAX_VARINT_LEN {
        let Some(&byte) = input.get(*ip) else {
            return Err(Error::InvalidData);
        };
        *ip += 1;
        value += u64::from(byte) << (7 * i);
        if byte < 128 {
            return usize::try_from(value).map_err(|_| Error::InvalidData);
        }
    }
    Err(Error::InvalidData)
}
