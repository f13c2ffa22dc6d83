//! Convolution stages the resampler engines are built from.

pub(crate) mod block;
pub(crate) mod polyphase;

// -------------------------------------------------------------------------------------------------

/// State of a stage at the start of a processing batch. All channels of a batch start from the
/// same checkpoint, so it's captured once and restored before each channel gets processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageCheckpoint {
    /// Polyphase phase index.
    pub phase: usize,
    /// Block convolution decimation or zero stuffing offset.
    pub offset: usize,
}
