use super::{check_length, FilterTapSet};
use crate::Error;

// -------------------------------------------------------------------------------------------------

/// Polyphase decomposition of a FIR filter which interpolates by `phase_count` and decimates by
/// `step` at the same time.
///
/// Tap `k` of the prototype filter lives in row `k % phase_count` at column `k / phase_count`.
/// Every output sample `i` of a cycle uses the row `order[i]` and then advances the input
/// position by `advance[i]` frames.
#[derive(Debug, Clone)]
pub struct PolyphaseBank {
    coefficients: Vec<f32>,
    row_len: usize,
    order: Vec<usize>,
    advance: Vec<usize>,
}

impl PolyphaseBank {
    /// Lay out the given filter taps for an interpolation by `phase_count` followed by a
    /// decimation by `step`.
    pub fn new(
        filter: &FilterTapSet,
        phase_count: usize,
        step: u64,
        max_length: usize,
    ) -> Result<Self, Error> {
        debug_assert!(phase_count > 0 && step > 0);
        let row_len = if filter.len() == 1 {
            1
        } else {
            filter.len() / phase_count + 1
        };
        check_length(phase_count.saturating_mul(row_len), max_length)?;

        let mut coefficients = vec![0.0; phase_count * row_len];
        for (k, tap) in filter.taps.iter().enumerate() {
            coefficients[(k % phase_count) * row_len + k / phase_count] = *tap as f32;
        }
        let (order, advance) = phase_schedule(phase_count as u64, step);
        Ok(Self {
            coefficients,
            row_len,
            order,
            advance,
        })
    }

    /// Number of output samples after which the phase pattern repeats.
    pub fn phase_count(&self) -> usize {
        self.order.len()
    }

    /// Number of input frames a single output sample is computed from.
    pub fn row_len(&self) -> usize {
        self.row_len
    }

    /// Input frames to advance after computing the output sample of the given phase.
    #[inline]
    pub fn advance(&self, phase: usize) -> usize {
        self.advance[phase]
    }

    /// Coefficients of the given phase.
    #[inline]
    pub fn row(&self, phase: usize) -> &[f32] {
        let start = self.order[phase] * self.row_len;
        &self.coefficients[start..start + self.row_len]
    }
}

// -------------------------------------------------------------------------------------------------

/// Row order and input advance of the output samples of an interpolation by `phase_count`
/// followed by a decimation by `step`.
///
/// Output `i` sits at position `t = i * step` of the interpolated signal, which is
/// `ceil(t / phase_count) * phase_count - t` interpolated samples before the next input frame.
pub fn phase_schedule(phase_count: u64, step: u64) -> (Vec<usize>, Vec<usize>) {
    let ceil_div = |a: u64, b: u64| a.div_ceil(b);
    (0..phase_count)
        .map(|i| {
            let t = i * step;
            let order = (phase_count - t % phase_count) % phase_count;
            let advance = ceil_div(t + step, phase_count) - ceil_div(t, phase_count);
            (order as usize, advance as usize)
        })
        .unzip()
}

// -------------------------------------------------------------------------------------------------
