//! Kaiser window and windowed sinc helpers.

use std::f64::consts::PI;

// -------------------------------------------------------------------------------------------------

/// Kaiser window shape parameter β for the given stop band attenuation in dB.
pub fn kaiser_beta(attenuation: f64) -> f64 {
    if attenuation <= 21.0 {
        0.0
    } else if attenuation <= 50.0 {
        0.5842 * (attenuation - 21.0).powf(0.4) + 0.07886 * (attenuation - 21.0)
    } else {
        0.1102 * (attenuation - 8.7)
    }
}

/// Normalized transition width `D` of a Kaiser windowed filter: the filter length needed for
/// a transition band `df` at rate `fs` is `fs / df * D + 1`.
pub fn transition_factor(attenuation: f64) -> f64 {
    if attenuation <= 21.0 {
        0.9222
    } else {
        (attenuation - 7.95) / 14.36
    }
}

/// Zeroth order modified Bessel function of the first kind.
pub fn bessel_i0(x: f64) -> f64 {
    let half_x = x / 2.0;
    let mut sum = 1.0;
    let mut term = 1.0;
    let mut k = 1.0;
    loop {
        term *= half_x / k;
        let squared = term * term;
        sum += squared;
        if squared < sum * 1e-21 {
            break;
        }
        k += 1.0;
    }
    sum
}

/// Kaiser window value for tap `n` (centered at 0) of a `len` taps long window.
/// `i0_beta` is `bessel_i0(beta)`, which is passed in as it's constant for a whole window.
pub fn kaiser_window(n: f64, len: usize, beta: f64, i0_beta: f64) -> f64 {
    let span = len as f64 - 1.0;
    let ratio = 1.0 - 4.0 * n * n / (span * span);
    bessel_i0(beta * ratio.max(0.0).sqrt()) / i0_beta
}

/// Ideal low pass impulse response with cutoff `cutoff` at sample rate `sample_rate`.
pub fn lowpass_sinc(n: i64, cutoff: f64, sample_rate: f64) -> f64 {
    let x = n as f64 * 2.0 * PI * cutoff / sample_rate;
    let sinc = if x == 0.0 { 1.0 } else { x.sin() / x };
    2.0 * cutoff / sample_rate * sinc
}

// -------------------------------------------------------------------------------------------------
