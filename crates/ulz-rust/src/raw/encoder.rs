// SPDX-License-Identifier: ISC
use super::format::{LEN_MASK, RUN_MASK, RUN_SHIFT, control_byte, sequence_overhead, write_varint};
use super::matcher::{Match, MatchFinder, SearchParams};
use crate::{Error, MAX_INPUT_LEN, MIN_MATCH, Result, max_compressed_size};

#[inline]
fn emit_literals(
    input: &[u8],
    out: &mut [u8],
    op: &mut usize,
    start: usize,
    end: usize,
) -> Result<()> {
    let len = end - start;
    if out.len() - *op < len {
        return Err(Error::OutputTooSmall);
    }
    out[*op..*op + len].copy_from_slice(&input[start..end]);
    *op += len;
    Ok(())
}

#[inline]
fn emit_run_header(out: &mut [u8], op: &mut usize, control: u8, run: usize) -> Result<()> {
    if *op >= out.len() {
        return Err(Error::OutputTooSmall);
    }
    out[*op] = control;
    *op += 1;
    if run >= RUN_MASK {
        write_varint(out, op, run - RUN_MASK)?;
    }
    Ok(())
}

/// Emits one token: the literals in `input[anchor..pos]` followed by `m`.
#[inline]
fn emit_sequence(
    input: &[u8],
    out: &mut [u8],
    op: &mut usize,
    anchor: usize,
    pos: usize,
    m: Match,
) -> Result<()> {
    let run = pos - anchor;
    emit_run_header(out, op, control_byte(run, m.len, m.distance), run)?;
    emit_literals(input, out, op, anchor, pos)?;

    let extra = m.len - MIN_MATCH;
    if extra >= LEN_MASK {
        write_varint(out, op, extra - LEN_MASK)?;
    }

    if out.len() - *op < 2 {
        return Err(Error::OutputTooSmall);
    }
    out[*op..*op + 2].copy_from_slice(&(m.distance as u16).to_le_bytes());
    *op += 2;
    Ok(())
}

/// Emits the trailing literal-only token for `input[anchor..]`.
#[inline]
fn emit_tail(input: &[u8], out: &mut [u8], op: &mut usize, anchor: usize) -> Result<()> {
    let run = input.len() - anchor;
    if run == 0 {
        return Ok(());
    }
    let control = (run.min(RUN_MASK) as u8) << RUN_SHIFT;
    emit_run_header(out, op, control, run)?;
    emit_literals(input, out, op, anchor, input.len())
}

fn compress_impl(input: &[u8], output: &mut [u8], params: SearchParams) -> Result<usize> {
    let in_len = input.len();
    let mut finder = MatchFinder::new(input, params);
    let mut op = 0usize;
    let mut anchor = 0usize;
    let mut pos = 0usize;

    while pos < in_len {
        let run = pos - anchor;
        // A token never costs more than the bytes it covers, so the output
        // stays within `max_compressed_size`.
        let mut found = finder.find(pos).filter(|m| sequence_overhead(run, m.len) <= m.len);

        let lazy = finder.params().lazy && run != RUN_MASK - 1;
        if lazy
            && found.is_some_and(|m| {
                pos + 1 + m.len < in_len && finder.has_match_of(pos + 1, m.len + 1)
            })
        {
            found = None;
        }

        match found {
            Some(m) => {
                emit_sequence(input, output, &mut op, anchor, pos, m)?;
                for p in pos..pos + m.len {
                    finder.insert(p);
                }
                pos += m.len;
                anchor = pos;
            }
            None => {
                finder.insert(pos);
                pos += 1;
            }
        }
    }

    emit_tail(input, output, &mut op, anchor)?;
    Ok(op)
}

/// Compresses `input` into `output` at the given `level` (`1..=9`).
///
/// Returns the number of bytes written to `output`.
///
/// Returns:
/// - `Error::InvalidParameter` when `level` is outside `1..=9`.
/// - `Error::InputTooLarge` when `input` is longer than [`MAX_INPUT_LEN`].
/// - `Error::OutputTooSmall` when `output` is shorter than
///   [`max_compressed_size`]`(input.len())`.
///
/// Incompressible input never fails; it is stored as literals.
///
/// # Example
///
/// ```
/// use ulz_rust::{compress, decompress, max_compressed_size};
///
/// let input = b"hello hello hello hello";
/// let mut compressed = vec![0u8; max_compressed_size(input.len())];
/// let n = compress(input, &mut compressed, 5).unwrap();
/// compressed.truncate(n);
///
/// let mut out = vec![0u8; input.len()];
/// assert_eq!(decompress(&compressed, &mut out).unwrap(), input.len());
/// assert_eq!(&out, input);
/// ```
pub fn compress(input: &[u8], output: &mut [u8], level: u8) -> Result<usize> {
    let params = SearchParams::for_level(level)?;
    if input.len() > MAX_INPUT_LEN {
        return Err(Error::InputTooLarge);
    }
    if output.len() < max_compressed_size(input.len()) {
        return Err(Error::OutputTooSmall);
    }
    if input.is_empty() {
        return Ok(0);
    }
    compress_impl(input, output, params)
}
