//! 16-bit PCM WAV container
//!
//! # Layout
//! ```text
//! 0x00: "RIFF"
//! 0x04: file size - 8 u32 LE
//! 0x08: "WAVE"
//! 0x0C: "fmt "
//! 0x10: fmt chunk size u32 LE (16)
//! 0x14: audio format u16 LE (1 = PCM)
//! 0x16: channels u16 LE (1)
//! 0x18: sample rate u32 LE
//! 0x1C: byte rate u32 LE (sample rate x 2)
//! 0x20: block align u16 LE (2)
//! 0x22: bits per sample u16 LE (16)
//! 0x24: "data"
//! 0x28: data size u32 LE (samples x 2)
//! 0x2C: i16 LE samples
//! ```

use super::{FormatError, expect_tag, read_u16, read_u32};

/// PCM format tag
pub const WAVE_FORMAT_PCM: u16 = 1;

/// WAV header for mono 16-bit PCM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    /// Size of the data chunk in bytes
    pub data_len: u32,
}

impl WavHeader {
    pub const SIZE: usize = 44;

    /// Header for `sample_count` mono 16-bit samples
    pub fn pcm16_mono(sample_rate: u32, sample_count: usize) -> Result<Self, FormatError> {
        let data_len = sample_count
            .checked_mul(2)
            .and_then(|len| u32::try_from(len).ok())
            .filter(|len| len.checked_add(Self::SIZE as u32 - 8).is_some())
            .ok_or_else(|| {
                FormatError::DataTooLarge(format!("{} samples exceed a RIFF chunk", sample_count))
            })?;

        Ok(Self {
            sample_rate,
            channels: 1,
            bits_per_sample: 16,
            data_len,
        })
    }

    pub fn block_align(&self) -> u16 {
        self.channels * self.bits_per_sample / 8
    }

    pub fn byte_rate(&self) -> u32 {
        self.sample_rate * self.block_align() as u32
    }

    /// Number of samples the data chunk holds
    pub fn sample_count(&self) -> usize {
        match self.block_align() {
            0 => 0,
            align => self.data_len as usize / align as usize,
        }
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(b"RIFF");
        bytes[4..8].copy_from_slice(&(Self::SIZE as u32 - 8 + self.data_len).to_le_bytes());
        bytes[8..12].copy_from_slice(b"WAVE");

        bytes[12..16].copy_from_slice(b"fmt ");
        bytes[16..20].copy_from_slice(&16u32.to_le_bytes());
        bytes[20..22].copy_from_slice(&WAVE_FORMAT_PCM.to_le_bytes());
        bytes[22..24].copy_from_slice(&self.channels.to_le_bytes());
        bytes[24..28].copy_from_slice(&self.sample_rate.to_le_bytes());
        bytes[28..32].copy_from_slice(&self.byte_rate().to_le_bytes());
        bytes[32..34].copy_from_slice(&self.block_align().to_le_bytes());
        bytes[34..36].copy_from_slice(&self.bits_per_sample.to_le_bytes());

        bytes[36..40].copy_from_slice(b"data");
        bytes[40..44].copy_from_slice(&self.data_len.to_le_bytes());
        bytes
    }

    /// Read header from bytes
    ///
    /// Only the canonical 44-byte PCM layout is accepted.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FormatError> {
        if bytes.len() < Self::SIZE {
            return Err(FormatError::FileTooSmall {
                needed: Self::SIZE,
                actual: bytes.len(),
            });
        }

        expect_tag(bytes, 0, "RIFF")?;
        expect_tag(bytes, 8, "WAVE")?;
        expect_tag(bytes, 12, "fmt ")?;
        expect_tag(bytes, 36, "data")?;

        let fmt_len = read_u32(bytes, 16);
        if fmt_len != 16 {
            return Err(FormatError::Unsupported(format!("fmt chunk size {}", fmt_len)));
        }
        let format = read_u16(bytes, 20);
        if format != WAVE_FORMAT_PCM {
            return Err(FormatError::Unsupported(format!("audio format {}", format)));
        }
        let bits_per_sample = read_u16(bytes, 34);
        if bits_per_sample != 16 {
            return Err(FormatError::Unsupported(format!(
                "{} bits per sample",
                bits_per_sample
            )));
        }

        Ok(Self {
            sample_rate: read_u32(bytes, 24),
            channels: read_u16(bytes, 22),
            bits_per_sample,
            data_len: read_u32(bytes, 40),
        })
    }
}

/// Convert one sample to 16-bit PCM
///
/// Clamps to -1.0..=1.0, scales by 32767 and floors, so -1.0 maps to -32767.
/// The product is taken in f64 so values just under an integer step stay under it.
#[inline]
pub fn to_pcm_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) as f64 * i16::MAX as f64).floor() as i16
}

/// Encode samples as a mono 16-bit PCM WAV file
///
/// # Arguments
/// * `samples` - Samples in -1.0..=1.0 (clamped)
/// * `sample_rate` - Sample rate in Hz
///
/// # Returns
/// The complete file, `44 + samples.len() * 2` bytes
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, FormatError> {
    let header = WavHeader::pcm16_mono(sample_rate, samples.len())?;

    let mut data = Vec::with_capacity(WavHeader::SIZE + header.data_len as usize);
    data.extend_from_slice(&header.to_bytes());
    for &sample in samples {
        data.extend_from_slice(&to_pcm_i16(sample).to_le_bytes());
    }
    Ok(data)
}

/// Decode a WAV file produced by [`encode_wav`]
pub fn decode_wav(bytes: &[u8]) -> Result<(WavHeader, Vec<i16>), FormatError> {
    let header = WavHeader::from_bytes(bytes)?;
    let payload = &bytes[WavHeader::SIZE..];
    let expected = header.data_len as usize;
    if payload.len() < expected {
        return Err(FormatError::TruncatedData {
            expected,
            actual: payload.len(),
        });
    }

    let samples = payload[..expected]
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    Ok((header, samples))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_size() {
        assert_eq!(WavHeader::SIZE, 44);
    }

    #[test]
    fn test_header_bytes() {
        let header = WavHeader::pcm16_mono(44100, 10).unwrap();
        let bytes = header.to_bytes();

        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(read_u32(&bytes, 4), 44 + 20 - 8);
        assert_eq!(&bytes[8..12], b"WAVE");
        assert_eq!(&bytes[12..16], b"fmt ");
        assert_eq!(read_u32(&bytes, 16), 16);
        assert_eq!(read_u16(&bytes, 20), 1);
        assert_eq!(read_u16(&bytes, 22), 1);
        assert_eq!(read_u32(&bytes, 24), 44100);
        assert_eq!(read_u32(&bytes, 28), 88200);
        assert_eq!(read_u16(&bytes, 32), 2);
        assert_eq!(read_u16(&bytes, 34), 16);
        assert_eq!(&bytes[36..40], b"data");
        assert_eq!(read_u32(&bytes, 40), 20);
    }

    #[test]
    fn test_to_pcm_i16() {
        assert_eq!(to_pcm_i16(0.0), 0);
        assert_eq!(to_pcm_i16(1.0), 32767);
        assert_eq!(to_pcm_i16(-1.0), -32767);
        assert_eq!(to_pcm_i16(2.0), 32767);
        assert_eq!(to_pcm_i16(-2.0), -32767);
        // floor, not truncation
        assert_eq!(to_pcm_i16(-0.5), -16384);
        assert_eq!(to_pcm_i16(0.5), 16383);
    }

    #[test]
    fn test_to_pcm_i16_near_step_boundary() {
        // 0.25000763 * 32767 is just below 8192
        assert_eq!(to_pcm_i16(0.250_007_63), 8191);
        assert_eq!(to_pcm_i16(-0.250_007_63), -8192);

        for bits in (0.25f32.to_bits()..1.0f32.to_bits()).step_by(97) {
            let sample = f32::from_bits(bits);
            let exact = (sample as f64 * 32767.0).floor() as i16;
            assert_eq!(to_pcm_i16(sample), exact, "{sample}");
            assert_eq!(to_pcm_i16(-sample), (-sample as f64 * 32767.0).floor() as i16, "{sample}");
        }
    }

    #[test]
    fn test_encode_decode() {
        let samples = [-1.0, -0.5, 0.0, 0.5, 1.0];
        let bytes = encode_wav(&samples, 44100).unwrap();
        assert_eq!(bytes.len(), 44 + samples.len() * 2);

        let (header, pcm) = decode_wav(&bytes).unwrap();
        assert_eq!(header.sample_rate, 44100);
        assert_eq!(header.channels, 1);
        assert_eq!(header.bits_per_sample, 16);
        assert_eq!(header.sample_count(), samples.len());
        assert_eq!(pcm, vec![-32767, -16384, 0, 16383, 32767]);
    }

    #[test]
    fn test_decode_too_small() {
        assert!(matches!(
            decode_wav(&[0; 10]),
            Err(FormatError::FileTooSmall { needed: 44, actual: 10 })
        ));
    }

    #[test]
    fn test_decode_bad_magic() {
        let mut bytes = encode_wav(&[0.0; 4], 44100).unwrap();
        bytes[0..4].copy_from_slice(b"RIFX");
        assert_eq!(
            decode_wav(&bytes),
            Err(FormatError::BadMagic { expected: "RIFF" })
        );
    }

    #[test]
    fn test_decode_truncated() {
        let bytes = encode_wav(&[0.0; 4], 44100).unwrap();
        assert!(matches!(
            decode_wav(&bytes[..bytes.len() - 1]),
            Err(FormatError::TruncatedData { expected: 8, actual: 7 })
        ));
    }

    #[test]
    fn test_decode_rejects_non_pcm() {
        let mut bytes = encode_wav(&[0.0; 4], 44100).unwrap();
        bytes[20..22].copy_from_slice(&3u16.to_le_bytes());
        assert!(matches!(decode_wav(&bytes), Err(FormatError::Unsupported(_))));
    }
}
