use crate::filter::polyphase::PolyphaseBank;

// -------------------------------------------------------------------------------------------------

/// Time domain polyphase interpolation: computes each output sample as dot product of one filter
/// phase with a window of input frames.
pub struct PolyphaseStage {
    bank: PolyphaseBank,
    phase: usize,
}

impl PolyphaseStage {
    pub fn new(bank: PolyphaseBank) -> Self {
        Self { bank, phase: 0 }
    }

    pub fn bank(&self) -> &PolyphaseBank {
        &self.bank
    }

    /// Phase of the next output sample.
    pub fn phase(&self) -> usize {
        self.phase
    }

    pub fn set_phase(&mut self, phase: usize) {
        debug_assert!(phase < self.bank.phase_count());
        self.phase = phase;
    }

    /// Fill `output` with interpolated samples, starting at frame `position` of the given window.
    /// Returns the window position of the next output sample.
    pub fn fill(&mut self, window: &[f32], mut position: usize, output: &mut [f32]) -> usize {
        let row_len = self.bank.row_len();
        for o in output.iter_mut() {
            *o = dot(self.bank.row(self.phase), &window[position..position + row_len]);
            position = self.advance(position);
        }
        position
    }

    /// Compute interpolated samples into the given channel of an interleaved output buffer,
    /// starting at frame `position` of the window, until the position reaches `end`.
    /// Returns the number of produced frames.
    pub fn process_until(
        &mut self,
        window: &[f32],
        mut position: usize,
        end: usize,
        output: &mut [f32],
        channel_index: usize,
        channel_count: usize,
    ) -> usize {
        let row_len = self.bank.row_len();
        let max_frames = output.len() / channel_count;
        let mut produced = 0;
        while position < end {
            debug_assert!(produced < max_frames, "polyphase output buffer overflow");
            if produced == max_frames {
                break;
            }
            output[produced * channel_count + channel_index] =
                dot(self.bank.row(self.phase), &window[position..position + row_len]);
            position = self.advance(position);
            produced += 1;
        }
        produced
    }

    #[inline]
    fn advance(&mut self, position: usize) -> usize {
        let position = position + self.bank.advance(self.phase);
        self.phase += 1;
        if self.phase == self.bank.phase_count() {
            self.phase = 0;
        }
        position
    }
}

// -------------------------------------------------------------------------------------------------

#[inline]
fn dot(coefficients: &[f32], frames: &[f32]) -> f32 {
    coefficients
        .iter()
        .zip(frames)
        .map(|(c, f)| c * f)
        .sum()
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterTapSet;

    fn stage(taps: Vec<f64>, phase_count: usize, step: u64) -> PolyphaseStage {
        let filter = FilterTapSet {
            taps,
            sample_rate: 1.0,
            cutoff: 0.5,
            attenuation: 0.0,
        };
        PolyphaseStage::new(PolyphaseBank::new(&filter, phase_count, step, 1024).unwrap())
    }

    #[test]
    fn linear_interpolation() {
        // triangle filter: interpolate by 2 with linear interpolation
        let mut stage = stage(vec![0.5, 1.0, 0.5], 2, 1);
        let window = [0.0, 2.0, 4.0, 6.0, 8.0];
        let mut output = [0.0; 6];
        let position = stage.fill(&window, 0, &mut output);
        assert_eq!(position, 3);
        assert_eq!(stage.phase(), 0);
        assert_eq!(output, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn decimation() {
        // unit tap, decimate by 3
        let mut stage = stage(vec![1.0], 1, 3);
        let window = (0..10).map(|v| v as f32).collect::<Vec<_>>();
        let mut output = [0.0; 8];
        // interleaved stereo output, second channel
        let produced = stage.process_until(&window, 1, 9, &mut output, 1, 2);
        assert_eq!(produced, 3);
        assert_eq!(output, [0.0, 1.0, 0.0, 4.0, 0.0, 7.0, 0.0, 0.0]);
    }

    #[test]
    fn phase_restore() {
        let mut stage = stage(vec![0.25, 0.5, 0.75, 1.0, 0.75, 0.5, 0.25], 3, 2);
        let window = [1.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let mut first = [0.0; 4];
        stage.fill(&window, 0, &mut first);
        assert_eq!(stage.phase(), 1);
        stage.set_phase(0);
        let mut second = [0.0; 4];
        stage.fill(&window, 0, &mut second);
        assert_eq!(first, second);
    }
}
