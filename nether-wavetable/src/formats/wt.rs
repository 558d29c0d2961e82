//! Float wavetable container (.wt)
//!
//! # Layout
//! ```text
//! 0x00: "vawt"
//! 0x04: wave_size u32 LE (samples per frame)
//! 0x08: wave_count u16 LE (frames)
//! 0x0A: reserved u16 (0)
//! 0x0C: wave_count x wave_size f32 LE samples
//! ```
//!
//! Samples are stored as-is, without quantization.

use super::{FormatError, expect_tag, read_u16, read_u32};

/// File magic
pub const WT_MAGIC: &str = "vawt";

/// WT header (12 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WtHeader {
    pub wave_size: u32,
    pub wave_count: u16,
}

impl WtHeader {
    pub const SIZE: usize = 12;

    pub fn new(wave_size: u32, wave_count: u16) -> Self {
        Self {
            wave_size,
            wave_count,
        }
    }

    /// Total samples in the payload
    pub fn sample_count(&self) -> usize {
        self.wave_size as usize * self.wave_count as usize
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(WT_MAGIC.as_bytes());
        bytes[4..8].copy_from_slice(&self.wave_size.to_le_bytes());
        bytes[8..10].copy_from_slice(&self.wave_count.to_le_bytes());
        // reserved bytes stay 0
        bytes
    }

    /// Read header from bytes
    ///
    /// The reserved field is ignored.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FormatError> {
        if bytes.len() < Self::SIZE {
            return Err(FormatError::FileTooSmall {
                needed: Self::SIZE,
                actual: bytes.len(),
            });
        }
        expect_tag(bytes, 0, WT_MAGIC)?;
        Ok(Self {
            wave_size: read_u32(bytes, 4),
            wave_count: read_u16(bytes, 8),
        })
    }
}

/// Encode frames of float samples as a WT file
///
/// # Arguments
/// * `samples` - Flattened frames, `wave_size * wave_count` long
/// * `wave_size` - Samples per frame
/// * `wave_count` - Number of frames (must fit in u16)
pub fn encode_wt(samples: &[f32], wave_size: usize, wave_count: usize) -> Result<Vec<u8>, FormatError> {
    let expected = wave_size
        .checked_mul(wave_count)
        .ok_or_else(|| FormatError::DataTooLarge(format!("{} x {} samples", wave_size, wave_count)))?;
    if samples.len() != expected {
        return Err(FormatError::LengthMismatch {
            expected,
            actual: samples.len(),
        });
    }

    let wave_size = u32::try_from(wave_size)
        .map_err(|_| FormatError::DataTooLarge(format!("wave size {}", wave_size)))?;
    let wave_count = u16::try_from(wave_count)
        .map_err(|_| FormatError::DataTooLarge(format!("wave count {}", wave_count)))?;

    let header = WtHeader::new(wave_size, wave_count);
    let mut data = Vec::with_capacity(WtHeader::SIZE + samples.len() * 4);
    data.extend_from_slice(&header.to_bytes());
    for &sample in samples {
        data.extend_from_slice(&sample.to_le_bytes());
    }
    Ok(data)
}

/// Decode a WT file into its header and float samples
pub fn decode_wt(bytes: &[u8]) -> Result<(WtHeader, Vec<f32>), FormatError> {
    let header = WtHeader::from_bytes(bytes)?;
    let payload = &bytes[WtHeader::SIZE..];
    let expected = header.sample_count() * 4;
    if payload.len() < expected {
        return Err(FormatError::TruncatedData {
            expected,
            actual: payload.len(),
        });
    }

    let samples = payload[..expected]
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();
    Ok((header, samples))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_bytes() {
        let bytes = WtHeader::new(2048, 256).to_bytes();
        assert_eq!(&bytes[0..4], b"vawt");
        assert_eq!(read_u32(&bytes, 4), 2048);
        assert_eq!(read_u16(&bytes, 8), 256);
        assert_eq!(read_u16(&bytes, 10), 0);
    }

    #[test]
    fn test_encode_decode_keeps_raw_floats() {
        let samples = vec![-1.0, -0.123_456_7, 0.0, 0.987_654_3, 1.0, 0.5];
        let bytes = encode_wt(&samples, 3, 2).unwrap();
        assert_eq!(bytes.len(), 12 + 6 * 4);

        let (header, decoded) = decode_wt(&bytes).unwrap();
        assert_eq!(header, WtHeader::new(3, 2));
        assert_eq!(decoded, samples);
    }

    #[test]
    fn test_encode_length_mismatch() {
        assert_eq!(
            encode_wt(&[0.0; 5], 3, 2),
            Err(FormatError::LengthMismatch {
                expected: 6,
                actual: 5
            })
        );
    }

    #[test]
    fn test_encode_too_many_waves() {
        let samples = vec![0.0; 70_000];
        assert!(matches!(
            encode_wt(&samples, 1, 70_000),
            Err(FormatError::DataTooLarge(_))
        ));
    }

    #[test]
    fn test_decode_bad_magic() {
        let mut bytes = encode_wt(&[0.0; 4], 2, 2).unwrap();
        bytes[0] = b'x';
        assert_eq!(
            decode_wt(&bytes),
            Err(FormatError::BadMagic { expected: "vawt" })
        );
    }

    #[test]
    fn test_decode_ignores_reserved() {
        let mut bytes = encode_wt(&[0.25; 4], 2, 2).unwrap();
        bytes[10] = 0xFF;
        let (header, samples) = decode_wt(&bytes).unwrap();
        assert_eq!(header.sample_count(), 4);
        assert_eq!(samples, vec![0.25; 4]);
    }

    #[test]
    fn test_decode_truncated() {
        let bytes = encode_wt(&[0.0; 4], 2, 2).unwrap();
        assert!(matches!(
            decode_wt(&bytes[..20]),
            Err(FormatError::TruncatedData { expected: 16, actual: 8 })
        ));
    }
}
