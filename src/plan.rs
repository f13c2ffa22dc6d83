//! Reduces a source/destination rate pair to the stage layout of a conversion.

use crate::Error;

// -------------------------------------------------------------------------------------------------

/// Direction of a conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum Direction {
    /// Source and destination rates are equal: samples are only re-encoded.
    Identity,
    /// Source rate is lower than the destination rate.
    Up,
    /// Source rate is higher than the destination rate.
    Down,
}

// -------------------------------------------------------------------------------------------------

/// Immutable description of the two stage layout of a rate conversion.
///
/// Upsampling runs a polyphase stage from the source rate to `intermediate_rate1` (the least
/// common multiple of both rates) while decimating to `intermediate_rate2`, followed by a block
/// convolution stage at `intermediate_rate2` which decimates down to the destination rate.
/// Downsampling runs a block convolution stage at `intermediate_rate1` (the oversampled source
/// rate), followed by a polyphase stage which interpolates up to `intermediate_rate2` (the least
/// common multiple of both rates) while decimating to the destination rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConversionPlan {
    pub source_rate: u32,
    pub dest_rate: u32,
    pub gcd: u32,
    pub direction: Direction,
    pub oversample_factor: u32,
    pub intermediate_rate1: u64,
    pub intermediate_rate2: u64,
}

impl ConversionPlan {
    pub fn new(source_rate: u32, dest_rate: u32) -> Result<Self, Error> {
        if source_rate == 0 || dest_rate == 0 {
            return Err(Error::ParameterError(format!(
                "sample rates must not be zero: {source_rate} Hz -> {dest_rate} Hz"
            )));
        }
        let gcd = gcd(source_rate, dest_rate);
        let (source, dest) = (source_rate as u64, dest_rate as u64);
        let plan = match source_rate.cmp(&dest_rate) {
            std::cmp::Ordering::Equal => Self {
                source_rate,
                dest_rate,
                gcd,
                direction: Direction::Identity,
                oversample_factor: 1,
                intermediate_rate1: source,
                intermediate_rate2: source,
            },
            std::cmp::Ordering::Less => {
                let oversample_factor = oversample_factor(source_rate / gcd)
                    .ok_or(Error::UnsupportedRatio {
                        source_rate,
                        dest_rate,
                    })?;
                Self {
                    source_rate,
                    dest_rate,
                    gcd,
                    direction: Direction::Up,
                    oversample_factor,
                    intermediate_rate1: source / gcd as u64 * dest,
                    intermediate_rate2: dest * oversample_factor as u64,
                }
            }
            std::cmp::Ordering::Greater => {
                let oversample_factor = oversample_factor(dest_rate / gcd)
                    .ok_or(Error::UnsupportedRatio {
                        source_rate,
                        dest_rate,
                    })?;
                Self {
                    source_rate,
                    dest_rate,
                    gcd,
                    direction: Direction::Down,
                    oversample_factor,
                    intermediate_rate1: source * oversample_factor as u64,
                    intermediate_rate2: source / gcd as u64 * dest,
                }
            }
        };
        log::debug!(
            "Planned {} conversion {} Hz -> {} Hz: oversampling {}x, intermediate rates {} / {} Hz",
            plan.direction,
            source_rate,
            dest_rate,
            plan.oversample_factor,
            plan.intermediate_rate1,
            plan.intermediate_rate2
        );
        Ok(plan)
    }

    /// Destination to source rate ratio.
    pub fn output_ratio(&self) -> f64 {
        self.dest_rate as f64 / self.source_rate as f64
    }
}

// -------------------------------------------------------------------------------------------------

/// Greatest common divisor of two rates.
pub fn gcd(a: u32, b: u32) -> u32 {
    let (mut a, mut b) = (a, b);
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Oversampling factor which makes the reduced rate ratio realizable with a two stage cascade.
fn oversample_factor(reduced_rate: u32) -> Option<u32> {
    if reduced_rate == 1 {
        Some(1)
    } else if reduced_rate % 2 == 0 {
        Some(2)
    } else if reduced_rate % 3 == 0 {
        Some(3)
    } else {
        None
    }
}

// -------------------------------------------------------------------------------------------------
