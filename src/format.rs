//! Sample and stream format descriptions.

use crate::Error;

// -------------------------------------------------------------------------------------------------

/// PCM sample encodings the converter can decode and encode. Integer formats are little endian.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumString, strum::Display, strum::VariantNames,
)]
#[strum(ascii_case_insensitive)]
pub enum SampleFormat {
    /// Unsigned 8 bit, centered around 128.
    U8,
    /// Signed 16 bit.
    S16,
    /// Signed, packed 24 bit.
    S24,
    /// Signed 32 bit.
    S32,
    /// 32 bit IEEE float in range -1.0..=1.0.
    F32,
}

impl SampleFormat {
    /// Integer PCM format for the given bits per sample.
    pub fn from_bits(bits_per_sample: u32) -> Result<Self, Error> {
        match bits_per_sample {
            8 => Ok(Self::U8),
            16 => Ok(Self::S16),
            24 => Ok(Self::S24),
            32 => Ok(Self::S32),
            _ => Err(Error::UnsupportedSampleFormat(format!(
                "{bits_per_sample} bits per sample"
            ))),
        }
    }

    pub fn bytes_per_sample(&self) -> usize {
        match self {
            Self::U8 => 1,
            Self::S16 => 2,
            Self::S24 => 3,
            Self::S32 | Self::F32 => 4,
        }
    }

    pub fn bits_per_sample(&self) -> u32 {
        self.bytes_per_sample() as u32 * 8
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Self::F32)
    }
}

// -------------------------------------------------------------------------------------------------

/// Sample rate, sample encoding and channel layout of one side of a conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AudioFormat {
    pub sample_rate: u32,
    pub sample_format: SampleFormat,
    pub channel_count: usize,
}

impl AudioFormat {
    pub fn new(sample_rate: u32, sample_format: SampleFormat, channel_count: usize) -> Self {
        Self {
            sample_rate,
            sample_format,
            channel_count,
        }
    }

    /// Size of one interleaved frame in bytes.
    pub fn frame_bytes(&self) -> usize {
        self.sample_format.bytes_per_sample() * self.channel_count
    }

    /// Validate all parameters. Returns Error::ParameterError on errors.
    pub fn validate(&self) -> Result<(), Error> {
        if self.sample_rate == 0 {
            return Err(Error::ParameterError(
                "audio format 'sample_rate' must not be zero".to_string(),
            ));
        }
        if self.channel_count == 0 {
            return Err(Error::ParameterError(
                "audio format 'channel_count' must not be zero".to_string(),
            ));
        }
        Ok(())
    }
}

// -------------------------------------------------------------------------------------------------
