//! AudioResampler trait for the rate conversion engines.

use crate::{
    filter::FilterDesign,
    plan::{ConversionPlan, Direction},
    Error,
};

pub(crate) mod downsampler;
pub(crate) mod identity;
pub(crate) mod upsampler;

// -------------------------------------------------------------------------------------------------

/// Audio resampler interface of the conversion engines.
///
/// Engines process interleaved float frames in batches: each `process` call consumes exactly
/// `required_input_frames` frames and appends a variable number of frames to the output.
/// Output frames are delayed by `group_delay` frames relative to the input.
pub trait AudioResampler: Send + Sync {
    /// Input frames the next process call consumes.
    fn required_input_frames(&self) -> usize;
    /// Maximum number of input frames a single process call may consume.
    fn max_input_frames(&self) -> usize;
    /// Maximum number of output frames a single process call may produce.
    fn max_output_frames(&self) -> usize;

    /// Leading output frames which are filter transients and must be discarded.
    fn group_delay(&self) -> usize;

    /// True when process also accepts less than the required input frames.
    fn accepts_partial_input(&self) -> bool {
        false
    }

    /// Process interleaved input frames into the given interleaved output buffer, which must
    /// hold at least `max_output_frames`. Returns the number of written output frames.
    fn process(&mut self, input: &[f32], output: &mut [f32]) -> usize;

    /// Reset internal state. Makes an existing resampler ready for a new stream.
    fn reset(&mut self);
}

// -------------------------------------------------------------------------------------------------

/// Create a new resampler engine for the given plan.
/// `batch_frames` is the identity engine's batch size in frames.
pub fn new_resampler(
    plan: &ConversionPlan,
    design: &FilterDesign,
    channel_count: usize,
    batch_frames: usize,
) -> Result<Box<dyn AudioResampler>, Error> {
    Ok(match plan.direction {
        Direction::Identity => Box::new(identity::IdentityResampler::new(
            channel_count,
            batch_frames,
        )),
        Direction::Up => Box::new(upsampler::Upsampler::new(plan, design, channel_count)?),
        Direction::Down => Box::new(downsampler::Downsampler::new(
            plan,
            design,
            channel_count,
        )?),
    })
}
