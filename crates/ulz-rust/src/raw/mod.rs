// SPDX-License-Identifier: ISC
//! Raw ULZ token encoder/decoder.
//!
//! Raw mode operates on caller-provided buffers with no header or framing.
mod decoder;
#[cfg(feature = "encoder")]
mod encoder;
#[cfg_attr(not(feature = "encoder"), allow(dead_code))]
mod format;
#[cfg(feature = "encoder")]
mod matcher;

pub use decoder::decompress;
#[cfg(feature = "encoder")]
pub use encoder::compress;
#[cfg(feature = "encoder")]
pub use matcher::SearchParams;
