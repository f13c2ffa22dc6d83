use super::AudioResampler;
use crate::{
    filter::{
        polyphase::PolyphaseBank, upsampling_interpolator, upsampling_lowpass, FilterDesign,
    },
    plan::ConversionPlan,
    stage::{
        block::{overlap_add_decimated, BlockConvolver},
        polyphase::PolyphaseStage,
        StageCheckpoint,
    },
    utils::buffer::{interleaved_to_planar_at, shift_planar},
    Error,
};

// -------------------------------------------------------------------------------------------------

/// Two stage upsampler: a polyphase filter interpolates the source to the oversampled destination
/// rate, then a block convolution low pass removes images and decimates to the destination rate.
pub struct Upsampler {
    channel_count: usize,
    oversample_factor: usize,
    interpolator: PolyphaseStage,
    lowpass: BlockConvolver,
    /// Per channel input frames of the interpolator.
    input: Vec<Vec<f32>>,
    /// Number of valid frames in `input`.
    input_len: usize,
    /// Initial number of (zero) frames in `input`, centering the first output on the filter.
    initial_input_len: usize,
    /// Per channel second halves of the last convolved blocks.
    tails: Vec<Vec<f32>>,
    /// Position of the next output sample in units of the interpolated rate.
    position: u64,
    /// Interpolated samples per source frame.
    phase_count: u64,
    /// Interpolated samples per oversampled output sample.
    position_step: u64,
    /// Decimation offset of the next block.
    decimation_offset: usize,
    /// Source frames per block convolution batch, without input padding.
    batch_input_frames: usize,
    group_delay: usize,
}

impl Upsampler {
    pub fn new(
        plan: &ConversionPlan,
        design: &FilterDesign,
        channel_count: usize,
    ) -> Result<Self, Error> {
        let oversample_factor = plan.oversample_factor as usize;
        let phase_count = plan.intermediate_rate1 / plan.source_rate as u64;
        let position_step = plan.intermediate_rate1 / plan.intermediate_rate2;

        let interpolator_filter = upsampling_interpolator(plan, design)?;
        let bank = PolyphaseBank::new(
            &interpolator_filter,
            phase_count as usize,
            position_step,
            design.max_length,
        )?;
        let lowpass_filter = upsampling_lowpass(plan, design)?;
        let lowpass = BlockConvolver::new(&lowpass_filter);

        let half_len = lowpass.half_len();
        let row_len = bank.row_len();
        let batch_input_frames = (half_len as u64 * plan.source_rate as u64
            / plan.intermediate_rate2) as usize
            + 1;
        let initial_input_len = interpolator_filter.len() / 2 / phase_count as usize + 1;
        let group_delay =
            (lowpass_filter.len() as f64 / 2.0 / oversample_factor as f64).floor() as usize;

        log::debug!(
            "Upsampler: {} x {} polyphase taps, {} block convolution taps in {} sample blocks, \
            group delay {} frames",
            bank.phase_count(),
            row_len,
            lowpass_filter.len(),
            lowpass.block_len(),
            group_delay
        );

        let input = vec![vec![0.0; half_len + row_len + 1]; channel_count];
        let tails = vec![vec![0.0; half_len / oversample_factor + 1]; channel_count];
        Ok(Self {
            channel_count,
            oversample_factor,
            interpolator: PolyphaseStage::new(bank),
            lowpass,
            input,
            input_len: initial_input_len,
            initial_input_len,
            tails,
            position: 0,
            phase_count,
            position_step,
            decimation_offset: 0,
            batch_input_frames,
            group_delay,
        })
    }
}

impl AudioResampler for Upsampler {
    fn required_input_frames(&self) -> usize {
        self.batch_input_frames + self.interpolator.bank().row_len() - self.input_len
    }

    fn max_input_frames(&self) -> usize {
        self.lowpass.half_len() + self.interpolator.bank().row_len()
    }

    fn max_output_frames(&self) -> usize {
        self.lowpass.half_len() / self.oversample_factor + 1
    }

    fn group_delay(&self) -> usize {
        self.group_delay
    }

    fn process(&mut self, input: &[f32], output: &mut [f32]) -> usize {
        debug_assert_eq!(input.len(), self.required_input_frames() * self.channel_count);
        debug_assert!(output.len() >= self.max_output_frames() * self.channel_count);

        let frame_count = input.len() / self.channel_count;
        interleaved_to_planar_at(input, &mut self.input, self.input_len);
        self.input_len += frame_count;

        let start = if self.position == 0 {
            0
        } else {
            ((self.position - 1) / self.phase_count + 1) as usize
        };
        let checkpoint = StageCheckpoint {
            phase: self.interpolator.phase(),
            offset: self.decimation_offset,
        };

        let half_len = self.lowpass.half_len();
        let mut produced = 0;
        for (channel_index, (window, tail)) in
            self.input.iter().zip(self.tails.iter_mut()).enumerate()
        {
            self.interpolator.set_phase(checkpoint.phase);
            let block = self.lowpass.block_mut();
            self.interpolator
                .fill(window, start, &mut block[..half_len]);
            block[half_len..].fill(0.0);
            self.lowpass.convolve();

            let (written, next_offset) = overlap_add_decimated(
                self.lowpass.block(),
                tail,
                checkpoint.offset,
                self.oversample_factor,
                output,
                channel_index,
                self.channel_count,
            );
            produced = written;
            self.decimation_offset = next_offset;
        }

        // drop input frames which are no longer needed by the interpolator
        self.position += half_len as u64 * self.position_step;
        let consumed = ((self.position - 1) / self.phase_count) as usize;
        shift_planar(&mut self.input, consumed, self.input_len);
        self.input_len -= consumed;
        self.position -= consumed as u64 * self.phase_count;

        produced
    }

    fn reset(&mut self) {
        for channel in self.input.iter_mut().chain(self.tails.iter_mut()) {
            channel.fill(0.0);
        }
        self.input_len = self.initial_input_len;
        self.interpolator.set_phase(0);
        self.position = 0;
        self.decimation_offset = 0;
    }
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_design() -> FilterDesign {
        FilterDesign {
            attenuation: 96.0,
            transition_band: 8000.0,
            base_length: 1024,
            max_length: 1 << 21,
        }
    }

    #[test]
    fn sizes() {
        let plan = ConversionPlan::new(44100, 48000).unwrap();
        let resampler = Upsampler::new(&plan, &fast_design(), 2).unwrap();
        assert_eq!(resampler.interpolator.bank().phase_count(), 160);
        assert_eq!(resampler.interpolator.bank().row_len(), 6);
        assert_eq!(resampler.lowpass.block_len(), 2048);
        assert_eq!(resampler.group_delay(), 170);
        assert_eq!(resampler.required_input_frames(), 317);
        assert_eq!(resampler.max_input_frames(), 1030);
        assert_eq!(resampler.max_output_frames(), 342);
    }

    #[test]
    fn steady_batches() {
        let plan = ConversionPlan::new(44100, 48000).unwrap();
        let mut resampler = Upsampler::new(&plan, &fast_design(), 1).unwrap();
        let mut output = vec![0.0f32; resampler.max_output_frames()];
        let mut consumed = 0;
        let mut produced = 0;
        for _ in 0..100 {
            let frames = resampler.required_input_frames();
            assert!(frames <= resampler.max_input_frames());
            let input = vec![0.25f32; frames];
            consumed += frames;
            produced += resampler.process(&input, &mut output);
        }
        // stream ratio converges to 48000 / 44100
        let ratio = produced as f64 / consumed as f64;
        assert!((ratio - 48000.0 / 44100.0).abs() < 0.01, "{ratio}");

        // DC passes with unit gain once the filters settled
        for value in &output[..10] {
            assert!((value - 0.25).abs() < 1e-3, "{value}");
        }
    }
}
