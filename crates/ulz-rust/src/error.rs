// SPDX-License-Identifier: ISC
use core::fmt;

/// Result type used by this crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Error type for ULZ encode/decode operations.
///
/// The variants are shared by the raw engine (`compress`/`decompress`) and the
/// allocating adapters (`compress_to_vec`, `decompress_growing`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Configuration is invalid, e.g. a compression level outside `1..=9`.
    InvalidParameter,
    /// Input or requested capacity exceeds the format's signed 32-bit size limit.
    InputTooLarge,
    /// Output buffer is too small for the requested operation.
    ///
    /// Retrying with a larger buffer may succeed.
    OutputTooSmall,
    /// Input stream is malformed: truncated token, bad varint, or a
    /// back-reference outside the produced output or the window.
    InvalidData,
}

impl Error {
    /// Returns `true` if retrying with a larger output buffer can succeed.
    ///
    /// Only [`Error::OutputTooSmall`] is recoverable this way; corrupt input
    /// stays corrupt no matter how much room it is given.
    #[inline]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::OutputTooSmall)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter => f.write_str("invalid parameter"),
            Self::InputTooLarge => f.write_str("input too large (max ~2GB)"),
            Self::OutputTooSmall => f.write_str("output buffer too small"),
            Self::InvalidData => f.write_str("invalid compressed data"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
