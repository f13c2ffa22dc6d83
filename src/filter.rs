//! Kaiser windowed sinc low pass filter design for the two conversion stages.

use crate::{plan::ConversionPlan, Error};

pub(crate) mod polyphase;
pub(crate) mod window;

use window::{bessel_i0, kaiser_beta, kaiser_window, lowpass_sinc, transition_factor};

// -------------------------------------------------------------------------------------------------

/// Transition band guard factor of the polyphase stages.
const GUARD: f64 = 2.0;

// -------------------------------------------------------------------------------------------------

/// Filter design parameters, as selected by the converter's quality setting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterDesign {
    /// Stop band attenuation in dB.
    pub attenuation: f64,
    /// Upper bound of the transition band width of the block convolution stage in Hz.
    pub transition_band: f64,
    /// Initial block convolution filter length. Doubled until `transition_band` is reached.
    pub base_length: usize,
    /// Maximum number of taps of a single stage.
    pub max_length: usize,
}

// -------------------------------------------------------------------------------------------------

/// A linear phase, odd length FIR low pass and the parameters it got designed with.
#[derive(Debug, Clone)]
pub struct FilterTapSet {
    pub taps: Vec<f64>,
    pub sample_rate: f64,
    pub cutoff: f64,
    pub attenuation: f64,
}

impl FilterTapSet {
    /// Design a `length` taps long Kaiser windowed low pass with the given cutoff frequency,
    /// scaled by `gain`. `length` must be odd.
    pub fn lowpass(
        length: usize,
        sample_rate: f64,
        cutoff: f64,
        attenuation: f64,
        gain: f64,
    ) -> Self {
        debug_assert!(length % 2 == 1, "filter length must be odd");
        let beta = kaiser_beta(attenuation);
        let i0_beta = bessel_i0(beta);
        let half = (length / 2) as i64;
        let taps = (-half..=half)
            .map(|n| {
                kaiser_window(n as f64, length, beta, i0_beta)
                    * lowpass_sinc(n, cutoff, sample_rate)
                    * gain
            })
            .collect();
        log::debug!(
            "Designed {length} taps low pass at {sample_rate} Hz: cutoff {cutoff:.1} Hz, \
            attenuation {attenuation} dB"
        );
        Self {
            taps,
            sample_rate,
            cutoff,
            attenuation,
        }
    }

    /// A single unit tap, passing through its input.
    pub fn unit(sample_rate: f64) -> Self {
        Self {
            taps: vec![1.0],
            sample_rate,
            cutoff: sample_rate / 2.0,
            attenuation: 0.0,
        }
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.taps.len()
    }
}

// -------------------------------------------------------------------------------------------------

/// Fail with `FilterTooLarge` when `length` exceeds `max_length`.
pub fn check_length(length: usize, max_length: usize) -> Result<(), Error> {
    if length > max_length {
        return Err(Error::FilterTooLarge { length, max_length });
    }
    Ok(())
}

/// Odd filter length that realizes a transition band of `transition` Hz at the given rate.
pub fn length_for_transition(
    sample_rate: f64,
    transition: f64,
    attenuation: f64,
    max_length: usize,
) -> Result<usize, Error> {
    let length = sample_rate / transition * transition_factor(attenuation) + 1.0;
    if !length.is_finite() || length > max_length as f64 {
        return Err(Error::FilterTooLarge {
            length: if length.is_finite() {
                length as usize
            } else {
                usize::MAX
            },
            max_length,
        });
    }
    let mut length = length as usize;
    if length % 2 == 0 {
        length += 1;
    }
    check_length(length, max_length)?;
    Ok(length)
}

/// Doubles the design's base length until the resulting transition band gets narrower than the
/// design's transition band. Returns the odd filter length and its transition band width.
pub fn length_for_design(sample_rate: f64, design: &FilterDesign) -> Result<(usize, f64), Error> {
    let factor = transition_factor(design.attenuation);
    let mut multiplier = 1;
    loop {
        let mut length = design.base_length.saturating_mul(multiplier);
        if length % 2 == 0 {
            length -= 1;
        }
        check_length(length, design.max_length)?;
        let transition = sample_rate * factor / (length - 1) as f64;
        if transition < design.transition_band {
            return Ok((length, transition));
        }
        multiplier *= 2;
    }
}

// -------------------------------------------------------------------------------------------------

/// Upsampling stage 1: polyphase interpolation from the source rate to `intermediate_rate1`.
pub fn upsampling_interpolator(
    plan: &ConversionPlan,
    design: &FilterDesign,
) -> Result<FilterTapSet, Error> {
    let source_half = (plan.source_rate / 2) as f64;
    let oversampled_half = (plan.dest_rate as u64 * plan.oversample_factor as u64 / 2) as f64;
    let transition = (oversampled_half - source_half) * 2.0 / GUARD;
    let cutoff = source_half + (oversampled_half - source_half) / GUARD;
    let sample_rate = plan.intermediate_rate1 as f64;
    let length = length_for_transition(
        sample_rate,
        transition,
        design.attenuation,
        design.max_length,
    )?;
    let gain = (plan.intermediate_rate1 / plan.source_rate as u64) as f64;
    Ok(FilterTapSet::lowpass(
        length,
        sample_rate,
        cutoff,
        design.attenuation,
        gain,
    ))
}

/// Upsampling stage 2: block convolution low pass at `intermediate_rate2`.
pub fn upsampling_lowpass(
    plan: &ConversionPlan,
    design: &FilterDesign,
) -> Result<FilterTapSet, Error> {
    let sample_rate = plan.intermediate_rate2 as f64;
    let (length, _) = length_for_design(sample_rate, design)?;
    let cutoff = (plan.source_rate / 2) as f64;
    Ok(FilterTapSet::lowpass(
        length,
        sample_rate,
        cutoff,
        design.attenuation,
        1.0,
    ))
}

/// Downsampling stage 1: block convolution low pass at `intermediate_rate1`.
pub fn downsampling_lowpass(
    plan: &ConversionPlan,
    design: &FilterDesign,
) -> Result<FilterTapSet, Error> {
    let sample_rate = plan.intermediate_rate1 as f64;
    let (length, transition) = length_for_design(sample_rate, design)?;
    let cutoff = (plan.dest_rate as f64 - transition) / 2.0;
    Ok(FilterTapSet::lowpass(
        length,
        sample_rate,
        cutoff,
        design.attenuation,
        plan.oversample_factor as f64,
    ))
}

/// Downsampling stage 2: polyphase interpolation from `intermediate_rate1` to
/// `intermediate_rate2`, or a unit tap when no oversampling is needed.
pub fn downsampling_interpolator(
    plan: &ConversionPlan,
    design: &FilterDesign,
) -> Result<FilterTapSet, Error> {
    let sample_rate = plan.intermediate_rate2 as f64;
    if plan.oversample_factor == 1 {
        return Ok(FilterTapSet::unit(sample_rate));
    }
    let source_half = (plan.source_rate / 2) as f64;
    let oversampled_half = (plan.intermediate_rate1 / 2) as f64;
    let transition = (oversampled_half - source_half) * 2.0 / GUARD;
    let cutoff = source_half + (oversampled_half - source_half) / GUARD;
    let length = length_for_transition(
        sample_rate,
        transition,
        design.attenuation,
        design.max_length,
    )?;
    let gain = (plan.intermediate_rate2 / plan.intermediate_rate1) as f64;
    Ok(FilterTapSet::lowpass(
        length,
        sample_rate,
        cutoff,
        design.attenuation,
        gain,
    ))
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
    fn filter_lengths() {
        assert_eq!(
            length_for_transition(7_056_000.0, 49950.0, 96.0, 1 << 21),
            Ok(867)
        );
        let (length, transition) = length_for_design(144_000.0, &fast_design()).unwrap();
        assert_eq!(length, 1023);
        assert!((transition - 144_000.0 * 88.05 / 14.36 / 1022.0).abs() < 1e-9);

        // doubles the base length until the transition band is narrow enough
        let design = FilterDesign {
            transition_band: 200.0,
            ..fast_design()
        };
        assert_eq!(length_for_design(144_000.0, &design).unwrap().0, 8191);

        let design = FilterDesign {
            max_length: 4096,
            ..design
        };
        assert!(matches!(
            length_for_design(144_000.0, &design),
            Err(Error::FilterTooLarge { .. })
        ));
    }

    #[test]
    fn lowpass_taps() {
        let filter = FilterTapSet::lowpass(101, 48000.0, 12000.0, 96.0, 1.0);
        assert_eq!(filter.len(), 101);
        // symmetric
        for i in 0..50 {
            assert!((filter.taps[i] - filter.taps[100 - i]).abs() < 1e-15);
        }
        // center tap is 2 * fc / fs, DC gain is ~1
        assert!((filter.taps[50] - 0.5).abs() < 1e-12);
        let dc_gain: f64 = filter.taps.iter().sum();
        assert!((dc_gain - 1.0).abs() < 1e-3);
    }

    #[test]
    fn stage_filters() {
        let design = fast_design();

        let plan = ConversionPlan::new(44100, 48000).unwrap();
        let stage1 = upsampling_interpolator(&plan, &design).unwrap();
        assert_eq!(stage1.len(), 867);
        assert_eq!(stage1.cutoff, 47025.0);
        let stage2 = upsampling_lowpass(&plan, &design).unwrap();
        assert_eq!(stage2.len(), 1023);
        assert_eq!(stage2.cutoff, 22050.0);

        let plan = ConversionPlan::new(48000, 44100).unwrap();
        let stage1 = downsampling_lowpass(&plan, &design).unwrap();
        assert_eq!(stage1.len(), 1023);
        assert!(stage1.cutoff < 22050.0);
        let stage2 = downsampling_interpolator(&plan, &design).unwrap();
        assert_eq!(stage2.len(), 903);
        assert_eq!(stage2.cutoff, 48000.0);

        let plan = ConversionPlan::new(96000, 48000).unwrap();
        let stage2 = downsampling_interpolator(&plan, &design).unwrap();
        assert_eq!(stage2.taps, vec![1.0]);
    }
}
