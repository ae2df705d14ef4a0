// SPDX-License-Identifier: ISC
//! Hash-chain match finder.
use alloc::vec;
use alloc::vec::Vec;

use crate::{Error, MAX_LEVEL, MIN_LEVEL, MIN_MATCH, Result, WINDOW_SIZE};

const HASH_BITS: u32 = 19;
const HASH_SIZE: usize = 1 << HASH_BITS;
const WINDOW_MASK: usize = WINDOW_SIZE - 1;

/// Chain depth used by the highest level.
const MAX_CHAIN_BEST: usize = 1 << 13;

/// Level at which lazy matching kicks in.
const LAZY_LEVEL: u8 = 5;

/// Match-finder effort derived from a compression level.
///
/// The level only changes which legal match is chosen, never the format, so
/// the table can be tuned freely.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchParams {
    /// Maximum number of chain entries probed per position.
    pub max_chain: usize,
    /// Whether to look one byte ahead for a longer match before committing.
    pub lazy: bool,
}

impl SearchParams {
    /// Maps a compression level (`1..=9`) to search parameters.
    ///
    /// Returns `Error::InvalidParameter` for levels outside that range.
    ///
    /// ```
    /// use ulz_rust::SearchParams;
    ///
    /// let fast = SearchParams::for_level(1).unwrap();
    /// let best = SearchParams::for_level(9).unwrap();
    /// assert!(fast.max_chain < best.max_chain);
    /// assert!(!fast.lazy && best.lazy);
    /// assert!(SearchParams::for_level(0).is_err());
    /// ```
    pub const fn for_level(level: u8) -> Result<Self> {
        if level < MIN_LEVEL || level > MAX_LEVEL {
            return Err(Error::InvalidParameter);
        }
        let max_chain = if level < MAX_LEVEL { 1 << level } else { MAX_CHAIN_BEST };
        Ok(Self { max_chain, lazy: level >= LAZY_LEVEL })
    }
}

/// A back-reference candidate: `distance` bytes back, `len` bytes long.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Match {
    pub(crate) distance: usize,
    pub(crate) len: usize,
}

#[inline]
fn hash4(input: &[u8], pos: usize) -> usize {
    let v = u32::from_le_bytes([input[pos], input[pos + 1], input[pos + 2], input[pos + 3]]);
    (v.wrapping_mul(0x9e37_79b9) >> (32 - HASH_BITS)) as usize
}

#[inline]
fn same_prefix(input: &[u8], a: usize, b: usize) -> bool {
    input[a..a + MIN_MATCH] == input[b..b + MIN_MATCH]
}

/// Hash chains over one input buffer.
///
/// Both tables store `position + 1`; `0` marks an empty slot.
pub(crate) struct MatchFinder<'a> {
    input: &'a [u8],
    params: SearchParams,
    head: Vec<u32>,
    prev: Vec<u32>,
}

impl<'a> MatchFinder<'a> {
    pub(crate) fn new(input: &'a [u8], params: SearchParams) -> Self {
        Self { input, params, head: vec![0; HASH_SIZE], prev: vec![0; WINDOW_SIZE] }
    }

    /// Links `pos` into its hash chain.
    ///
    /// Positions too close to the end to start a match are skipped.
    #[inline]
    pub(crate) fn insert(&mut self, pos: usize) {
        if pos + MIN_MATCH > self.input.len() {
            return;
        }
        let h = hash4(self.input, pos);
        self.prev[pos & WINDOW_MASK] = self.head[h];
        self.head[h] = (pos + 1) as u32;
    }

    /// Walks the chain for `pos`, calling `probe(candidate)` for each prior
    /// position inside the window until it returns `false` or the chain
    /// budget runs out.
    #[inline]
    fn walk(&self, pos: usize, mut probe: impl FnMut(usize) -> bool) {
        let lowest = pos.saturating_sub(WINDOW_SIZE - 1);
        let mut budget = self.params.max_chain;
        let mut link = self.head[hash4(self.input, pos)] as usize;

        while link != 0 {
            let cand = link - 1;
            if cand < lowest || cand >= pos {
                break;
            }
            if !probe(cand) {
                break;
            }
            budget -= 1;
            if budget == 0 {
                break;
            }
            link = self.prev[cand & WINDOW_MASK] as usize;
        }
    }

    /// Finds the longest match for `pos` among previously inserted positions.
    ///
    /// Candidates are visited nearest first and only a strictly longer match
    /// replaces the current best, so ties resolve to the smallest distance.
    pub(crate) fn find(&self, pos: usize) -> Option<Match> {
        let input = self.input;
        let max_len = input.len() - pos;
        if max_len < MIN_MATCH {
            return None;
        }

        let mut best = Match { distance: 0, len: 0 };
        self.walk(pos, |cand| {
            if input[cand + best.len] == input[pos + best.len] && same_prefix(input, cand, pos) {
                let mut len = MIN_MATCH;
                while len < max_len && input[cand + len] == input[pos + len] {
                    len += 1;
                }
                if len > best.len {
                    best = Match { distance: pos - cand, len };
                    if len == max_len {
                        return false;
                    }
                }
            }
            true
        });

        (best.len >= MIN_MATCH).then_some(best)
    }

    /// Reports whether a match of at least `target` bytes starts at `pos`.
    ///
    /// Used by lazy evaluation to decide if deferring a match by one byte pays
    /// off. The caller guarantees `pos + target <= input.len()`.
    pub(crate) fn has_match_of(&self, pos: usize, target: usize) -> bool {
        let input = self.input;
        debug_assert!(target > MIN_MATCH && pos + target <= input.len());

        let probe_at = target - 1;
        let mut found = false;
        self.walk(pos, |cand| {
            if input[cand + probe_at] == input[pos + probe_at] && same_prefix(input, cand, pos) {
                let mut len = MIN_MATCH;
                while len < target && input[cand + len] == input[pos + len] {
                    len += 1;
                }
                if len == target {
                    found = true;
                    return false;
                }
            }
            true
        });
        found
    }

    /// Search effort this finder was created with.
    #[inline]
    pub(crate) fn params(&self) -> SearchParams {
        self.params
    }
}
