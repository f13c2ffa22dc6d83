use realfft::num_complex::Complex;

use crate::{
    filter::FilterTapSet,
    spectral::{RealFftTransform, SpectralTransform},
};

// -------------------------------------------------------------------------------------------------

/// Frequency domain FIR convolution of power of two sized blocks.
///
/// A block holds `block_len / 2` new samples followed by zeros, so the linear convolution of one
/// block with the filter fits into the block. Callers overlap-add the second half of a convolved
/// block to the first half of the next one.
pub struct BlockConvolver {
    transform: Box<dyn SpectralTransform>,
    filter_spectrum: Vec<Complex<f32>>,
    spectrum: Vec<Complex<f32>>,
    block: Vec<f32>,
}

impl BlockConvolver {
    /// Create a new convolver with a block size of twice the next power of two of the filter.
    pub fn new(filter: &FilterTapSet) -> Self {
        let block_len = 2 * filter.len().next_power_of_two();
        Self::with_transform(filter, Box::new(RealFftTransform::new(block_len)))
    }

    /// Create a new convolver which uses the given transform. The transform's length must be
    /// a power of two of at least twice the filter length.
    pub fn with_transform(filter: &FilterTapSet, mut transform: Box<dyn SpectralTransform>) -> Self {
        let block_len = transform.len();
        debug_assert!(block_len.is_power_of_two() && block_len >= 2 * filter.len());
        // fold the transform's normalization into the filter spectrum
        let scale = 1.0 / block_len as f64;
        let mut block = vec![0.0; block_len];
        for (b, tap) in block.iter_mut().zip(&filter.taps) {
            *b = (tap * scale) as f32;
        }
        let mut filter_spectrum = vec![Complex::default(); block_len / 2 + 1];
        transform.forward(&block, &mut filter_spectrum);
        block.fill(0.0);
        let spectrum = filter_spectrum.clone();
        Self {
            transform,
            filter_spectrum,
            spectrum,
            block,
        }
    }

    pub fn block_len(&self) -> usize {
        self.block.len()
    }

    /// Number of new samples a block takes.
    pub fn half_len(&self) -> usize {
        self.block.len() / 2
    }

    pub fn block(&self) -> &[f32] {
        &self.block
    }

    pub fn block_mut(&mut self) -> &mut [f32] {
        &mut self.block
    }

    /// Convolve the block with the filter in place.
    pub fn convolve(&mut self) {
        self.transform.forward(&self.block, &mut self.spectrum);
        for (s, f) in self.spectrum.iter_mut().zip(&self.filter_spectrum) {
            *s *= *f;
        }
        self.transform.inverse(&self.spectrum, &mut self.block);
    }
}

// -------------------------------------------------------------------------------------------------

/// Overlap-add a convolved block with the previous block's tail, keeping every `factor`th sample
/// starting at `offset`. Writes the first half's samples into the given channel of the interleaved
/// output and stores the second half's samples as new tail.
///
/// Returns the number of written frames and the decimation offset of the next block.
pub fn overlap_add_decimated(
    block: &[f32],
    tail: &mut [f32],
    offset: usize,
    factor: usize,
    output: &mut [f32],
    channel_index: usize,
    channel_count: usize,
) -> (usize, usize) {
    let half_len = block.len() / 2;
    let mut index = offset;
    let mut written = 0;
    while index < half_len {
        output[written * channel_count + channel_index] = tail[written] + block[index];
        index += factor;
        written += 1;
    }
    let next_offset = index - half_len;
    let mut tail_index = 0;
    while index < block.len() {
        tail[tail_index] = block[index];
        index += factor;
        tail_index += 1;
    }
    (written, next_offset)
}

/// Fill the first half of a block with the given channel of the interleaved input, placing one
/// input frame every `factor` samples, starting at `offset`. All other samples are zeroed.
///
/// Returns the number of consumed input frames and the stuffing offset of the next block.
pub fn zero_stuff(
    input: &[f32],
    channel_index: usize,
    channel_count: usize,
    offset: usize,
    factor: usize,
    block: &mut [f32],
) -> (usize, usize) {
    let half_len = block.len() / 2;
    block.fill(0.0);
    let mut index = offset;
    let mut consumed = 0;
    while index < half_len {
        block[index] = input[consumed * channel_count + channel_index];
        index += factor;
        consumed += 1;
    }
    (consumed, index - half_len)
}

// -------------------------------------------------------------------------------------------------
