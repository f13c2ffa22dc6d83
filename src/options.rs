use crate::{filter::FilterDesign, Error};

// -------------------------------------------------------------------------------------------------

/// Filter quality profiles of a converter.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    strum::EnumString,
    strum::Display,
    strum::VariantNames,
)]
#[strum(ascii_case_insensitive)]
pub enum ConversionQuality {
    /// 96 dB stop band attenuation with a wide transition band. Short filters and low latency,
    /// suitable for real-time playback.
    #[default]
    Fast,
    /// 150 dB stop band attenuation with a 200 Hz wide transition band.
    Standard,
    /// 170 dB stop band attenuation with a 100 Hz wide transition band. Long filters: mainly
    /// useful for offline conversions.
    High,
}

impl ConversionQuality {
    /// Stop band attenuation in dB.
    pub fn attenuation(&self) -> f64 {
        match self {
            Self::Fast => 96.0,
            Self::Standard => 150.0,
            Self::High => 170.0,
        }
    }

    /// Upper bound of the block convolution filter's transition band in Hz.
    pub fn transition_band(&self) -> f64 {
        match self {
            Self::Fast => 8000.0,
            Self::Standard => 200.0,
            Self::High => 100.0,
        }
    }

    /// Initial block convolution filter length.
    pub fn base_filter_length(&self) -> usize {
        match self {
            Self::Fast => 1024,
            Self::Standard => 16384,
            Self::High => 65536,
        }
    }
}

// -------------------------------------------------------------------------------------------------

/// Options to create a converter with.
#[derive(Debug, Clone, Copy)]
pub struct ConverterOptions {
    /// By default `ConversionQuality::Fast`. Filter quality profile.
    pub quality: ConversionQuality,

    /// By default 2^21. Maximum number of taps of a single filter stage. Conversions whose
    /// filters would be longer fail with `Error::FilterTooLarge`.
    pub max_filter_len: usize,
}

impl Default for ConverterOptions {
    fn default() -> Self {
        Self {
            quality: ConversionQuality::default(),
            max_filter_len: 1 << 21,
        }
    }
}

impl ConverterOptions {
    pub fn quality(mut self, quality: ConversionQuality) -> Self {
        self.quality = quality;
        self
    }

    pub fn max_filter_len(mut self, max_filter_len: usize) -> Self {
        self.max_filter_len = max_filter_len;
        self
    }

    /// Validate all parameters. Returns Error::ParameterError on errors.
    pub fn validate(&self) -> Result<(), Error> {
        if self.max_filter_len == 0 {
            return Err(Error::ParameterError(format!(
                "converter options 'max_filter_len' value is '{}'",
                self.max_filter_len
            )));
        }
        Ok(())
    }

    pub(crate) fn filter_design(&self) -> FilterDesign {
        FilterDesign {
            attenuation: self.quality.attenuation(),
            transition_band: self.quality.transition_band(),
            base_length: self.quality.base_filter_length(),
            max_length: self.max_filter_len,
        }
    }
}

// -------------------------------------------------------------------------------------------------
