use super::AudioResampler;

// -------------------------------------------------------------------------------------------------

/// Pass through "resampler" for equal source and destination rates.
pub struct IdentityResampler {
    channel_count: usize,
    batch_frames: usize,
}

impl IdentityResampler {
    pub fn new(channel_count: usize, batch_frames: usize) -> Self {
        debug_assert!(channel_count > 0 && batch_frames > 0);
        Self {
            channel_count,
            batch_frames,
        }
    }
}

impl AudioResampler for IdentityResampler {
    fn required_input_frames(&self) -> usize {
        self.batch_frames
    }

    fn max_input_frames(&self) -> usize {
        self.batch_frames
    }

    fn max_output_frames(&self) -> usize {
        self.batch_frames
    }

    fn group_delay(&self) -> usize {
        0
    }

    fn accepts_partial_input(&self) -> bool {
        true
    }

    fn process(&mut self, input: &[f32], output: &mut [f32]) -> usize {
        let frames = (input.len() / self.channel_count).min(self.batch_frames);
        let samples = frames * self.channel_count;
        output[..samples].copy_from_slice(&input[..samples]);
        frames
    }

    fn reset(&mut self) {
        // nothing to do
    }
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_through() {
        let mut resampler = IdentityResampler::new(2, 4);
        assert_eq!(resampler.required_input_frames(), 4);
        assert_eq!(resampler.group_delay(), 0);

        let mut output = [0.0; 8];
        assert_eq!(resampler.process(&[1.0, 2.0, 3.0, 4.0], &mut output), 2);
        assert_eq!(output[..4], [1.0, 2.0, 3.0, 4.0]);
    }
}
