//! Wavetable container formats
//!
//! Both containers are little-endian and carry the flattened wavetable as one
//! run of samples:
//!
//! | Format | Payload | Header |
//! |--------|---------|--------|
//! | WAV | i16 PCM, mono, 44.1 kHz | 44-byte RIFF/fmt/data |
//! | WT | raw f32 | 12-byte `vawt` header |

pub mod wav;
pub mod wt;

pub use wav::{WavHeader, decode_wav, encode_wav, to_pcm_i16};
pub use wt::{WtHeader, decode_wt, encode_wt};

use thiserror::Error;

/// Errors raised while encoding or decoding a container
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("file too small: need {needed} bytes, got {actual}")]
    FileTooSmall { needed: usize, actual: usize },
    #[error("bad magic: expected {expected:?}")]
    BadMagic { expected: &'static str },
    #[error("unsupported WAV layout: {0}")]
    Unsupported(String),
    #[error("truncated payload: expected {expected} bytes, got {actual}")]
    TruncatedData { expected: usize, actual: usize },
    #[error("sample count {actual} does not match {expected} (wave size x wave count)")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("data too large for the container: {0}")]
    DataTooLarge(String),
}

pub(crate) fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

pub(crate) fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

pub(crate) fn expect_tag(
    bytes: &[u8],
    offset: usize,
    tag: &'static str,
) -> Result<(), FormatError> {
    if &bytes[offset..offset + tag.len()] == tag.as_bytes() {
        Ok(())
    } else {
        Err(FormatError::BadMagic { expected: tag })
    }
}
