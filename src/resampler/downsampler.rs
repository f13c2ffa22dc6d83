use super::AudioResampler;
use crate::{
    filter::{
        downsampling_interpolator, downsampling_lowpass, polyphase::PolyphaseBank, FilterDesign,
    },
    plan::ConversionPlan,
    stage::{
        block::{zero_stuff, BlockConvolver},
        polyphase::PolyphaseStage,
        StageCheckpoint,
    },
    utils::buffer::shift_planar,
    Error,
};

// -------------------------------------------------------------------------------------------------

/// Two stage downsampler: a block convolution low pass band limits the oversampled source, then
/// a polyphase filter interpolates and decimates to the destination rate.
pub struct Downsampler {
    channel_count: usize,
    oversample_factor: usize,
    lowpass: BlockConvolver,
    interpolator: PolyphaseStage,
    /// Per channel low pass output, prefixed with the interpolator's history.
    windows: Vec<Vec<f32>>,
    /// Per channel second halves of the last convolved blocks.
    tails: Vec<Vec<f32>>,
    /// Offset of the first interpolator history frame in a window.
    history_len: usize,
    /// Zero stuffing offset of the next block.
    stuffing_offset: usize,
    /// Position of the next output sample in units of the interpolated rate.
    position: u64,
    /// Interpolated samples per oversampled source frame.
    phase_count: u64,
    /// Interpolated samples per output frame.
    position_step: u64,
    max_output_frames: usize,
    group_delay: usize,
}

impl Downsampler {
    pub fn new(
        plan: &ConversionPlan,
        design: &FilterDesign,
        channel_count: usize,
    ) -> Result<Self, Error> {
        let oversample_factor = plan.oversample_factor as usize;
        let phase_count = plan.intermediate_rate2 / plan.intermediate_rate1;
        let position_step = plan.intermediate_rate2 / plan.dest_rate as u64;

        let lowpass_filter = downsampling_lowpass(plan, design)?;
        let lowpass = BlockConvolver::new(&lowpass_filter);
        let interpolator_filter = downsampling_interpolator(plan, design)?;
        let bank = PolyphaseBank::new(
            &interpolator_filter,
            phase_count as usize,
            position_step,
            design.max_length,
        )?;

        let half_len = lowpass.half_len();
        let history_len = bank.row_len() + 1;
        let min_advance = (position_step / phase_count).max(1) as usize;
        let max_output_frames = (half_len + 1) / min_advance + 1;
        let dest_rate = plan.dest_rate as f64;
        let group_delay = (lowpass_filter.len() as f64
            / 2.0
            / (plan.intermediate_rate1 as f64 / dest_rate)
            + interpolator_filter.len() as f64 / 2.0
                / (plan.intermediate_rate2 as f64 / dest_rate))
            .floor() as usize;

        log::debug!(
            "Downsampler: {} block convolution taps in {} sample blocks, {} x {} polyphase taps, \
            group delay {} frames",
            lowpass_filter.len(),
            lowpass.block_len(),
            bank.phase_count(),
            bank.row_len(),
            group_delay
        );

        let windows = vec![vec![0.0; history_len + half_len]; channel_count];
        let tails = vec![vec![0.0; half_len]; channel_count];
        Ok(Self {
            channel_count,
            oversample_factor,
            lowpass,
            interpolator: PolyphaseStage::new(bank),
            windows,
            tails,
            history_len,
            stuffing_offset: 0,
            position: 0,
            phase_count,
            position_step,
            max_output_frames,
            group_delay,
        })
    }
}

impl AudioResampler for Downsampler {
    fn required_input_frames(&self) -> usize {
        (self.lowpass.half_len() - self.stuffing_offset - 1) / self.oversample_factor + 1
    }

    fn max_input_frames(&self) -> usize {
        self.lowpass.half_len() / self.oversample_factor + self.oversample_factor + 1
    }

    fn max_output_frames(&self) -> usize {
        self.max_output_frames
    }

    fn group_delay(&self) -> usize {
        self.group_delay
    }

    fn process(&mut self, input: &[f32], output: &mut [f32]) -> usize {
        debug_assert_eq!(input.len(), self.required_input_frames() * self.channel_count);
        debug_assert!(output.len() >= self.max_output_frames * self.channel_count);

        let checkpoint = StageCheckpoint {
            phase: self.interpolator.phase(),
            offset: self.stuffing_offset,
        };
        let half_len = self.lowpass.half_len();
        let start = self.position.div_ceil(self.phase_count) as usize;

        let mut produced = 0;
        for (channel_index, (window, tail)) in self
            .windows
            .iter_mut()
            .zip(self.tails.iter_mut())
            .enumerate()
        {
            let (_, next_offset) = zero_stuff(
                input,
                channel_index,
                self.channel_count,
                checkpoint.offset,
                self.oversample_factor,
                self.lowpass.block_mut(),
            );
            self.stuffing_offset = next_offset;
            self.lowpass.convolve();

            let block = self.lowpass.block();
            for (w, b) in window[self.history_len..].iter_mut().zip(&block[..half_len]) {
                *w += *b;
            }
            tail.copy_from_slice(&block[half_len..]);

            self.interpolator.set_phase(checkpoint.phase);
            produced = self.interpolator.process_until(
                window,
                start,
                half_len + 1,
                output,
                channel_index,
                self.channel_count,
            );
        }

        // drop low pass output which is no longer needed by the interpolator and append the
        // tails, which get completed by the next block
        self.position += produced as u64 * self.position_step;
        let consumed = if self.position == 0 {
            0
        } else {
            (((self.position - 1) / self.phase_count) as usize).min(half_len)
        };
        let window_len = self.history_len + half_len;
        shift_planar(&mut self.windows, consumed, window_len);
        for (window, tail) in self.windows.iter_mut().zip(&self.tails) {
            window[self.history_len..].copy_from_slice(tail);
        }
        self.position -= consumed as u64 * self.phase_count;

        produced
    }

    fn reset(&mut self) {
        for channel in self.windows.iter_mut().chain(self.tails.iter_mut()) {
            channel.fill(0.0);
        }
        self.interpolator.set_phase(0);
        self.stuffing_offset = 0;
        self.position = 0;
    }
}

// -------------------------------------------------------------------------------------------------
