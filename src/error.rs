use std::{error, fmt};

// -------------------------------------------------------------------------------------------------

/// Provides an enumeration of all possible errors reported by rateconv.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    /// The reduced rate ratio needs an oversampling factor other than 1, 2 or 3.
    UnsupportedRatio { source_rate: u32, dest_rate: u32 },
    /// Sample width or encoding which can not be decoded or encoded.
    UnsupportedSampleFormat(String),
    /// A designed filter exceeds the configured filter length bound.
    FilterTooLarge { length: usize, max_length: usize },
    /// A put call provided less data than the converter currently requires. Units are bytes for
    /// encoded and samples for float inputs.
    InsufficientInput { required: usize, provided: usize },
    /// Output batches must be fetched before more input can be processed.
    BackpressureRequired,
    /// End of stream was signaled and all pending output got emitted.
    StreamFinished,
    ParameterError(String),
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedRatio {
                source_rate,
                dest_rate,
            } => write!(
                f,
                "Unsupported conversion ratio: {source_rate} Hz -> {dest_rate} Hz"
            ),
            Self::UnsupportedSampleFormat(str) => write!(f, "Unsupported sample format: {str}"),
            Self::FilterTooLarge { length, max_length } => write!(
                f,
                "Filter with {length} taps exceeds the maximum filter length of {max_length}"
            ),
            Self::InsufficientInput { required, provided } => write!(
                f,
                "Insufficient input: requires {required} values, but only {provided} got provided"
            ),
            Self::BackpressureRequired => {
                write!(f, "Output buffer is full: fetch output before putting new data")
            }
            Self::StreamFinished => write!(f, "Stream finished: all output got emitted"),
            Self::ParameterError(str) => write!(f, "Invalid parameter: {str}"),
        }
    }
}
