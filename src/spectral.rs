//! Real valued FFT contract of the block convolution stages.

use std::sync::Arc;

use realfft::{num_complex::Complex, ComplexToReal, RealFftPlanner, RealToComplex};

// -------------------------------------------------------------------------------------------------

/// Forward and inverse transform of real valued, power of two sized blocks.
///
/// Spectra hold the `len / 2 + 1` non negative frequency bins. Both directions are unnormalized:
/// `inverse(forward(x)) == x * len`.
pub trait SpectralTransform: Send + Sync {
    /// Block length in samples.
    fn len(&self) -> usize;

    /// Transform `input` (len samples) into `spectrum` (len / 2 + 1 bins).
    fn forward(&mut self, input: &[f32], spectrum: &mut [Complex<f32>]);
    /// Transform `spectrum` (len / 2 + 1 bins) back into `output` (len samples).
    fn inverse(&mut self, spectrum: &[Complex<f32>], output: &mut [f32]);
}

// -------------------------------------------------------------------------------------------------

/// SpectralTransform impl which runs `realfft`'s real to complex and complex to real FFTs.
pub struct RealFftTransform {
    forward: Arc<dyn RealToComplex<f32>>,
    inverse: Arc<dyn ComplexToReal<f32>>,
    samples: Vec<f32>,
    bins: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
}

impl RealFftTransform {
    pub fn new(len: usize) -> Self {
        debug_assert!(len.is_power_of_two() && len >= 2);
        let mut planner = RealFftPlanner::<f32>::new();
        let forward = planner.plan_fft_forward(len);
        let inverse = planner.plan_fft_inverse(len);
        let scratch_len = forward.get_scratch_len().max(inverse.get_scratch_len());
        Self {
            samples: forward.make_input_vec(),
            bins: forward.make_output_vec(),
            scratch: vec![Complex::default(); scratch_len],
            forward,
            inverse,
        }
    }
}

impl SpectralTransform for RealFftTransform {
    fn len(&self) -> usize {
        self.samples.len()
    }

    fn forward(&mut self, input: &[f32], spectrum: &mut [Complex<f32>]) {
        debug_assert_eq!(input.len(), self.samples.len());
        debug_assert_eq!(spectrum.len(), self.bins.len());
        // realfft uses its input as scratch space
        self.samples.copy_from_slice(input);
        let result = self
            .forward
            .process_with_scratch(&mut self.samples, spectrum, &mut self.scratch);
        debug_assert!(result.is_ok(), "forward FFT failed: {result:?}");
    }

    fn inverse(&mut self, spectrum: &[Complex<f32>], output: &mut [f32]) {
        debug_assert_eq!(spectrum.len(), self.bins.len());
        debug_assert_eq!(output.len(), self.samples.len());
        self.bins.copy_from_slice(spectrum);
        // DC and Nyquist bins of a real signal are real
        let last = self.bins.len() - 1;
        self.bins[0].im = 0.0;
        self.bins[last].im = 0.0;
        let result = self
            .inverse
            .process_with_scratch(&mut self.bins, output, &mut self.scratch);
        debug_assert!(result.is_ok(), "inverse FFT failed: {result:?}");
    }
}

// -------------------------------------------------------------------------------------------------
