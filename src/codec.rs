//! Converts PCM byte layouts from and to normalized float samples.

use byteorder::{ByteOrder, LittleEndian};

use crate::format::SampleFormat;

// -------------------------------------------------------------------------------------------------

/// Tracks clipping of encoded integer samples.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClipMeter {
    peak: f64,
    clipped_samples: u64,
}

impl ClipMeter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Largest `|value| / full_scale` ratio of all clipped samples so far, or 0.0 when nothing
    /// got clipped yet.
    pub fn peak(&self) -> f64 {
        self.peak
    }

    /// Number of samples which got clamped while encoding.
    pub fn clipped_samples(&self) -> u64 {
        self.clipped_samples
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[inline]
    fn record(&mut self, ratio: f64) {
        self.clipped_samples += 1;
        if ratio > self.peak {
            self.peak = ratio;
        }
    }
}

// -------------------------------------------------------------------------------------------------

#[inline]
fn full_scale(format: SampleFormat) -> f64 {
    (1u64 << (format.bits_per_sample() - 1)) as f64
}

/// Decode interleaved PCM bytes into normalized float samples.
/// Decodes as many samples as fit into both buffers and returns the number of decoded samples.
pub fn decode(format: SampleFormat, input: &[u8], output: &mut [f32]) -> usize {
    let bytes_per_sample = format.bytes_per_sample();
    let sample_count = (input.len() / bytes_per_sample).min(output.len());
    let input = &input[..sample_count * bytes_per_sample];
    let output = &mut output[..sample_count];
    let scale = 1.0 / full_scale(format);
    match format {
        SampleFormat::U8 => {
            for (o, i) in output.iter_mut().zip(input) {
                *o = ((*i as i32 - 128) as f64 * scale) as f32;
            }
        }
        SampleFormat::S16 => {
            for (o, i) in output.iter_mut().zip(input.chunks_exact(2)) {
                *o = (LittleEndian::read_i16(i) as f64 * scale) as f32;
            }
        }
        SampleFormat::S24 => {
            for (o, i) in output.iter_mut().zip(input.chunks_exact(3)) {
                *o = (LittleEndian::read_i24(i) as f64 * scale) as f32;
            }
        }
        SampleFormat::S32 => {
            for (o, i) in output.iter_mut().zip(input.chunks_exact(4)) {
                *o = (LittleEndian::read_i32(i) as f64 * scale) as f32;
            }
        }
        SampleFormat::F32 => {
            LittleEndian::read_f32_into(input, output);
        }
    }
    sample_count
}

/// Encode normalized float samples into interleaved PCM bytes. Integer formats are rounded to
/// nearest and clamped into their value range, recording clipped samples in the given meter.
/// Float output is written as it is.
/// Encodes as many samples as fit into both buffers and returns the number of encoded samples.
pub fn encode(
    format: SampleFormat,
    input: &[f32],
    output: &mut [u8],
    meter: &mut ClipMeter,
) -> usize {
    let bytes_per_sample = format.bytes_per_sample();
    let sample_count = input.len().min(output.len() / bytes_per_sample);
    let input = &input[..sample_count];
    let output = &mut output[..sample_count * bytes_per_sample];
    if format.is_float() {
        LittleEndian::write_f32_into(input, output);
        return sample_count;
    }
    let full = full_scale(format);
    let quantize = |value: f32, meter: &mut ClipMeter| -> i32 {
        let scaled = (value as f64 * full).round();
        if scaled > full - 1.0 {
            meter.record(scaled / (full - 1.0));
            (full - 1.0) as i32
        } else if scaled < -full {
            meter.record(scaled / -full);
            -full as i32
        } else {
            scaled as i32
        }
    };
    match format {
        SampleFormat::U8 => {
            for (o, i) in output.iter_mut().zip(input) {
                *o = (quantize(*i, meter) + 128) as u8;
            }
        }
        SampleFormat::S16 => {
            for (o, i) in output.chunks_exact_mut(2).zip(input) {
                LittleEndian::write_i16(o, quantize(*i, meter) as i16);
            }
        }
        SampleFormat::S24 => {
            for (o, i) in output.chunks_exact_mut(3).zip(input) {
                LittleEndian::write_i24(o, quantize(*i, meter));
            }
        }
        SampleFormat::S32 => {
            for (o, i) in output.chunks_exact_mut(4).zip(input) {
                LittleEndian::write_i32(o, quantize(*i, meter));
            }
        }
        SampleFormat::F32 => unreachable!("float formats are written unclamped"),
    }
    sample_count
}

// -------------------------------------------------------------------------------------------------
