//! Streaming sample rate and sample format converter.

use crate::{
    codec::{self, ClipMeter},
    format::{AudioFormat, SampleFormat},
    options::ConverterOptions,
    plan::{ConversionPlan, Direction},
    resampler::{new_resampler, AudioResampler},
    stream::{OutputRing, StreamAccounting, StreamPhase, FLUSH_SLACK},
    utils::{assert_no_alloc, permit_alloc},
    Error,
};

// -------------------------------------------------------------------------------------------------

/// Converts interleaved PCM audio from one sample rate and sample format to another.
///
/// Input is pushed with [`Converter::put_data`] or [`Converter::put_float_data`] in chunks of
/// exactly [`Converter::input_size`] bytes (or [`Converter::input_samples`] samples). Converted
/// output is pulled in fixed size batches with [`Converter::get_data`]. When a full output batch
/// is pending, no more input is accepted until it got fetched.
///
/// To finish a stream, call [`Converter::signal_end_of_stream`], then keep putting remaining
/// (possibly shorter or empty) input and fetching output until put returns
/// [`Error::StreamFinished`]. A final partial batch can then be fetched with
/// [`Converter::get_remaining_data`].
///
/// After construction, no memory gets allocated: the converter is suitable for real-time
/// audio threads.
pub struct Converter {
    source_format: AudioFormat,
    dest_format: AudioFormat,
    options: ConverterOptions,
    plan: ConversionPlan,
    resampler: Box<dyn AudioResampler>,
    accounting: StreamAccounting,
    ring: OutputRing,
    meter: ClipMeter,
    clip_warned: bool,
    input: Vec<f32>,
    output: Vec<f32>,
}

impl Converter {
    /// Create a new converter which emits output in batches of `batch_size` bytes.
    pub fn new(
        source_format: AudioFormat,
        dest_format: AudioFormat,
        batch_size: usize,
        options: ConverterOptions,
    ) -> Result<Self, Error> {
        source_format.validate()?;
        dest_format.validate()?;
        options.validate()?;
        if source_format.channel_count != dest_format.channel_count {
            return Err(Error::ParameterError(format!(
                "source and destination channel counts differ: {} != {}",
                source_format.channel_count, dest_format.channel_count
            )));
        }
        if batch_size == 0 || batch_size % dest_format.frame_bytes() != 0 {
            return Err(Error::ParameterError(format!(
                "batch size of {batch_size} bytes is not a multiple of the destination frame size"
            )));
        }

        let channel_count = source_format.channel_count;
        let plan = ConversionPlan::new(source_format.sample_rate, dest_format.sample_rate)?;
        let batch_frames = batch_size / dest_format.frame_bytes();
        let resampler = new_resampler(
            &plan,
            &options.filter_design(),
            channel_count,
            batch_frames,
        )?;
        let flush_slack = if plan.direction == Direction::Identity {
            0
        } else {
            FLUSH_SLACK
        };
        let accounting = StreamAccounting::new(
            plan.source_rate,
            plan.dest_rate,
            resampler.group_delay(),
            flush_slack,
        );
        let ring = OutputRing::new(
            batch_size,
            resampler.max_output_frames() * dest_format.frame_bytes(),
        );
        let input = vec![0.0; resampler.max_input_frames() * channel_count];
        let output = vec![0.0; resampler.max_output_frames() * channel_count];

        log::debug!(
            "Created converter: {} Hz {} -> {} Hz {}, {} channels, {} quality, {} byte batches",
            source_format.sample_rate,
            source_format.sample_format,
            dest_format.sample_rate,
            dest_format.sample_format,
            channel_count,
            options.quality,
            batch_size
        );

        Ok(Self {
            source_format,
            dest_format,
            options,
            plan,
            resampler,
            accounting,
            ring,
            meter: ClipMeter::new(),
            clip_warned: false,
            input,
            output,
        })
    }

    /// Create a new converter for integer PCM formats with default options.
    pub fn with_bits(
        source_rate: u32,
        source_bits: u32,
        channel_count: usize,
        dest_rate: u32,
        dest_bits: u32,
        batch_size: usize,
    ) -> Result<Self, Error> {
        Self::new(
            AudioFormat::new(
                source_rate,
                SampleFormat::from_bits(source_bits)?,
                channel_count,
            ),
            AudioFormat::new(dest_rate, SampleFormat::from_bits(dest_bits)?, channel_count),
            batch_size,
            ConverterOptions::default(),
        )
    }

    pub fn source_format(&self) -> AudioFormat {
        self.source_format
    }

    pub fn dest_format(&self) -> AudioFormat {
        self.dest_format
    }

    pub fn options(&self) -> ConverterOptions {
        self.options
    }

    pub fn plan(&self) -> &ConversionPlan {
        &self.plan
    }

    /// Output batch size in bytes.
    pub fn batch_size(&self) -> usize {
        self.ring.batch_size()
    }

    /// Output frames the conversion lags behind its input. Those are discarded at the start of
    /// the stream, so output and input are aligned.
    pub fn group_delay(&self) -> usize {
        self.resampler.group_delay()
    }

    pub fn phase(&self) -> StreamPhase {
        self.accounting.phase()
    }

    /// Largest `|value| / full_scale` ratio of all clipped output samples, or 0.0 when nothing
    /// got clipped.
    pub fn peak(&self) -> f64 {
        self.meter.peak()
    }

    /// Number of output samples which got clamped.
    pub fn clipped_samples(&self) -> u64 {
        self.meter.clipped_samples()
    }

    /// Number of interleaved samples the next put call must provide, or 0 when output needs to
    /// be fetched first or the stream finished.
    pub fn input_samples(&self) -> usize {
        if self.accounting.is_finished() || self.ring.has_batch() {
            return 0;
        }
        self.resampler.required_input_frames() * self.source_format.channel_count
    }

    /// Number of converted bytes which are waiting to be fetched.
    pub fn pending_size(&self) -> usize {
        self.ring.len()
    }

    /// Number of bytes the next put call must provide, or 0 when output needs to be fetched
    /// first or the stream finished.
    pub fn input_size(&self) -> usize {
        self.input_samples() * self.source_format.sample_format.bytes_per_sample()
    }

    /// Upper bound of `input_size`.
    pub fn max_input_size(&self) -> usize {
        self.resampler.max_input_frames() * self.source_format.frame_bytes()
    }

    /// Start draining: from now on, puts accept shorter or empty inputs and pad them with
    /// silence until all output up to the end of the consumed input got emitted.
    pub fn signal_end_of_stream(&mut self) {
        self.accounting.signal_end_of_stream();
    }

    /// Decode and convert `input_size` bytes of the given interleaved PCM data.
    /// Returns the number of consumed bytes.
    pub fn put_data(&mut self, data: &[u8]) -> Result<usize, Error> {
        let frame_bytes = self.source_format.frame_bytes();
        let frames = self.accept_input(data.len(), frame_bytes)?;
        let samples = frames * self.source_format.channel_count;
        codec::decode(
            self.source_format.sample_format,
            &data[..frames * frame_bytes],
            &mut self.input[..samples],
        );
        self.process(frames);
        Ok(frames * frame_bytes)
    }

    /// Convert `input_samples` normalized, interleaved float samples.
    /// Returns the number of consumed samples.
    pub fn put_float_data(&mut self, data: &[f32]) -> Result<usize, Error> {
        let channel_count = self.source_format.channel_count;
        let frames = self.accept_input(data.len(), channel_count)?;
        let samples = frames * channel_count;
        self.input[..samples].copy_from_slice(&data[..samples]);
        self.process(frames);
        Ok(samples)
    }

    /// Copy a full batch of converted output into `output`. Returns false when less than a
    /// batch is pending or when `output` is shorter than `batch_size` bytes.
    pub fn get_data(&mut self, output: &mut [u8]) -> bool {
        if output.len() < self.ring.batch_size() {
            return false;
        }
        self.ring.pop_batch(output)
    }

    /// Copy up to a batch of pending output into `output`, even when less than a full batch
    /// is pending. Returns the number of copied bytes.
    pub fn get_remaining_data(&mut self, output: &mut [u8]) -> usize {
        self.ring.pop_remaining(output)
    }

    /// Drop all pending input and output and start a new stream.
    pub fn reset(&mut self) {
        self.resampler.reset();
        self.accounting.reset();
        self.ring.clear();
        self.meter.reset();
        self.clip_warned = false;
    }

    /// Number of frames the next put takes from `provided` values with `frame_len` values per
    /// frame.
    fn accept_input(&self, provided: usize, frame_len: usize) -> Result<usize, Error> {
        if self.accounting.is_finished() {
            return Err(Error::StreamFinished);
        }
        if self.ring.has_batch() {
            return Err(Error::BackpressureRequired);
        }
        let required_frames = self.resampler.required_input_frames();
        let provided_frames = provided / frame_len;
        if provided_frames >= required_frames {
            Ok(required_frames)
        } else if self.accounting.is_end_of_stream() {
            Ok(provided_frames)
        } else {
            Err(Error::InsufficientInput {
                required: required_frames * frame_len,
                provided,
            })
        }
    }

    /// Run a batch of `frames` decoded input frames through the resampler and append the
    /// admitted output to the ring.
    fn process(&mut self, frames: usize) {
        let channel_count = self.source_format.channel_count;
        let required_frames = self.resampler.required_input_frames();
        let process_frames = if self.resampler.accepts_partial_input() {
            frames
        } else {
            // zero pad partial inputs at the end of the stream
            self.input[frames * channel_count..required_frames * channel_count].fill(0.0);
            required_frames
        };
        self.accounting.consume(frames);
        if frames < required_frames {
            self.accounting.signal_input_exhausted();
        }

        let dest_format = self.dest_format.sample_format;
        assert_no_alloc(|| {
            let produced = self.resampler.process(
                &self.input[..process_frames * channel_count],
                &mut self.output,
            );
            let admitted = self.accounting.admit(produced);
            let samples =
                &self.output[admitted.start * channel_count..admitted.end * channel_count];
            let written =
                codec::encode(dest_format, samples, self.ring.spare_mut(), &mut self.meter);
            debug_assert_eq!(written, samples.len(), "output ring overflow");
            self.ring.commit(written * dest_format.bytes_per_sample());

            if !self.clip_warned && self.meter.clipped_samples() > 0 {
                self.clip_warned = true;
                permit_alloc(|| {
                    log::warn!(
                        "Converted output clipped: peak at {:.2} dB",
                        crate::utils::linear_to_db(self.meter.peak())
                    );
                });
            }
        });

        if self.accounting.is_finished() {
            log::debug!(
                "Conversion stream finished: consumed {} frames, emitted {} frames",
                self.accounting.frames_consumed(),
                self.accounting.frames_emitted()
            );
        }
    }
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    use byteorder::{ByteOrder, LittleEndian};
    use rand::{rngs::SmallRng, Rng, SeedableRng};

    /// Feed all input into the converter, signaling the end of the stream with the last put,
    /// and collect all output.
    fn convert_bytes(converter: &mut Converter, input: &[u8]) -> Vec<u8> {
        let mut output = Vec::new();
        let mut batch = vec![0u8; converter.batch_size()];
        let mut offset = 0;
        loop {
            while converter.get_data(&mut batch) {
                output.extend_from_slice(&batch);
            }
            let remaining = &input[offset..];
            if remaining.len() < converter.input_size() {
                converter.signal_end_of_stream();
            }
            match converter.put_data(remaining) {
                Ok(consumed) => offset += consumed,
                Err(Error::StreamFinished) => break,
                Err(err) => panic!("unexpected put error: {err}"),
            }
        }
        while converter.get_data(&mut batch) {
            output.extend_from_slice(&batch);
        }
        let count = converter.get_remaining_data(&mut batch);
        output.extend_from_slice(&batch[..count]);
        output
    }

    /// Same as `convert_bytes`, but for float input and output.
    fn convert_floats(converter: &mut Converter, input: &[f32]) -> Vec<f32> {
        let mut output = Vec::new();
        let mut batch = vec![0u8; converter.batch_size()];
        let append = |bytes: &[u8], output: &mut Vec<f32>| {
            let mut floats = vec![0.0f32; bytes.len() / 4];
            LittleEndian::read_f32_into(bytes, &mut floats);
            output.extend_from_slice(&floats);
        };
        let mut offset = 0;
        loop {
            while converter.get_data(&mut batch) {
                append(&batch, &mut output);
            }
            let remaining = &input[offset..];
            if remaining.len() < converter.input_samples() {
                converter.signal_end_of_stream();
            }
            match converter.put_float_data(remaining) {
                Ok(consumed) => offset += consumed,
                Err(Error::StreamFinished) => break,
                Err(err) => panic!("unexpected put error: {err}"),
            }
        }
        while converter.get_data(&mut batch) {
            append(&batch, &mut output);
        }
        let count = converter.get_remaining_data(&mut batch);
        append(&batch[..count], &mut output);
        output
    }

    fn sine(frequency: f64, amplitude: f64, sample_rate: u32, frames: usize) -> Vec<f32> {
        (0..frames)
            .map(|i| {
                let t = i as f64 / sample_rate as f64;
                (amplitude * (2.0 * std::f64::consts::PI * frequency * t).sin()) as f32
            })
            .collect()
    }

    /// Magnitude of a single DFT bin, normalized to the amplitude of a sine.
    fn bin_magnitude(signal: &[f32], frequency: f64, sample_rate: u32) -> f64 {
        let (mut re, mut im) = (0.0, 0.0);
        for (i, s) in signal.iter().enumerate() {
            let phase = 2.0 * std::f64::consts::PI * frequency * i as f64 / sample_rate as f64;
            re += *s as f64 * phase.cos();
            im += *s as f64 * phase.sin();
        }
        2.0 * (re * re + im * im).sqrt() / signal.len() as f64
    }

    fn noise_bytes(samples: usize) -> Vec<u8> {
        let mut rng = SmallRng::seed_from_u64(0x5eed);
        let mut bytes = vec![0u8; samples * 2];
        for chunk in bytes.chunks_exact_mut(2) {
            LittleEndian::write_i16(chunk, rng.random::<i16>());
        }
        bytes
    }

    #[test]
    fn invalid_parameters() {
        let format = AudioFormat::new(44100, SampleFormat::S16, 2);
        assert!(matches!(
            Converter::new(
                format,
                AudioFormat::new(48000, SampleFormat::S16, 1),
                4096,
                ConverterOptions::default()
            ),
            Err(Error::ParameterError(_))
        ));
        assert!(matches!(
            Converter::new(format, format, 4095, ConverterOptions::default()),
            Err(Error::ParameterError(_))
        ));
        assert!(matches!(
            Converter::with_bits(7000, 16, 2, 8000, 16, 4096),
            Err(Error::UnsupportedRatio { .. })
        ));
        assert!(matches!(
            Converter::with_bits(8000, 16, 2, 7000, 16, 4096),
            Err(Error::UnsupportedRatio { .. })
        ));
        assert!(matches!(
            Converter::with_bits(44100, 12, 2, 48000, 16, 4096),
            Err(Error::UnsupportedSampleFormat(_))
        ));
        assert!(matches!(
            Converter::new(
                format,
                AudioFormat::new(48000, SampleFormat::S16, 2),
                4096,
                ConverterOptions::default().max_filter_len(512)
            ),
            Err(Error::FilterTooLarge { .. })
        ));
    }

    #[test]
    fn identity() {
        let input = noise_bytes(2 * 10_000);

        let mut converter = Converter::with_bits(44100, 16, 2, 44100, 16, 1024).unwrap();
        assert_eq!(converter.group_delay(), 0);
        assert_eq!(converter.input_size(), 1024);
        let output = convert_bytes(&mut converter, &input);
        assert_eq!(output, input);
        assert_eq!(converter.phase(), StreamPhase::Finished);

        // 16 to 24 bits is exact too
        let mut converter = Converter::with_bits(44100, 16, 2, 44100, 24, 1536).unwrap();
        let output = convert_bytes(&mut converter, &input);
        assert_eq!(output.len(), input.len() / 2 * 3);
        for (i, o) in input.chunks_exact(2).zip(output.chunks_exact(3)) {
            assert_eq!(LittleEndian::read_i16(i) as i32 * 256, LittleEndian::read_i24(o));
        }
        assert_eq!(converter.clipped_samples(), 0);
    }

    #[test]
    fn sample_count_conservation() {
        for (source_rate, dest_rate) in [(44100, 48000), (48000, 44100), (48000, 96000)] {
            let frames = source_rate as usize;
            let input = sine(440.0, 0.5, source_rate, frames)
                .iter()
                .flat_map(|s| [*s, -*s])
                .collect::<Vec<_>>();
            let format = |rate| AudioFormat::new(rate, SampleFormat::F32, 2);
            let mut converter = Converter::new(
                format(source_rate),
                format(dest_rate),
                2048,
                ConverterOptions::default(),
            )
            .unwrap();
            let output = convert_floats(&mut converter, &input);
            let output_frames = output.len() / 2;
            let expected = frames as u64 * dest_rate as u64 / source_rate as u64;
            assert!(
                output_frames as u64 >= expected && output_frames as u64 <= expected + 2,
                "{source_rate} -> {dest_rate}: {output_frames} frames"
            );
        }
    }

    #[test]
    fn silence() {
        let input = vec![0u8; 2 * 2 * 20_000];
        for (source_rate, dest_rate) in [(44100, 48000), (48000, 44100), (96000, 48000)] {
            let mut converter =
                Converter::with_bits(source_rate, 16, 2, dest_rate, 16, 4096).unwrap();
            let output = convert_bytes(&mut converter, &input);
            assert!(!output.is_empty());
            assert!(output.iter().all(|b| *b == 0));
        }
    }

    #[test]
    fn backpressure() {
        let mut converter = Converter::with_bits(44100, 16, 2, 48000, 16, 256).unwrap();
        let mut batch = vec![0u8; 256];
        let input = noise_bytes(2 * 4096);

        // the first batches only prime the filters
        assert_eq!(converter.phase(), StreamPhase::Priming);
        let required = converter.input_size();
        assert!(required > 0 && required <= converter.max_input_size());
        assert_eq!(
            converter.put_data(&input[..required - 4]),
            Err(Error::InsufficientInput {
                required,
                provided: required - 4
            })
        );
        assert!(!converter.get_data(&mut batch));

        let mut offset = 0;
        while !converter.get_data(&mut batch) {
            let size = converter.input_size();
            assert!(size > 0);
            offset += converter.put_data(&input[offset..offset + size]).unwrap();
        }
        assert_eq!(converter.phase(), StreamPhase::Steady);

        // fill the ring until a full batch is pending: then puts get rejected
        while converter.input_size() > 0 {
            let size = converter.input_size();
            offset += converter.put_data(&input[offset..offset + size]).unwrap();
        }
        assert_eq!(converter.input_samples(), 0);
        assert_eq!(
            converter.put_data(&input[offset..offset + 2048]),
            Err(Error::BackpressureRequired)
        );
        while converter.get_data(&mut batch) {}
        assert!(converter.input_size() > 0);
        assert!(converter.pending_size() < converter.batch_size());
        assert!(converter.put_data(&input[offset..offset + 2048]).is_ok());

        // reset starts a new stream
        converter.reset();
        assert_eq!(converter.phase(), StreamPhase::Priming);
        assert!(!converter.get_data(&mut batch));
    }

    #[test]
    fn end_of_stream() {
        let mut converter = Converter::with_bits(48000, 16, 1, 44100, 16, 512).unwrap();
        let input = noise_bytes(1000);
        converter.signal_end_of_stream();
        assert_eq!(converter.phase(), StreamPhase::Draining);
        let output = convert_bytes(&mut converter, &input);
        assert_eq!(output.len() / 2, 1000 * 44100 / 48000 + 2);
        assert_eq!(converter.phase(), StreamPhase::Finished);
        assert_eq!(converter.input_size(), 0);
        assert_eq!(converter.put_data(&[]), Err(Error::StreamFinished));
    }

    #[test]
    fn end_of_stream_before_input() {
        // full batches after the end of stream still get converted, for all plans
        let input = noise_bytes(3 * 256 + 100);
        let mut converter = Converter::with_bits(44100, 16, 1, 44100, 16, 512).unwrap();
        converter.signal_end_of_stream();
        let mut batch = vec![0u8; 512];
        for chunk in input[..3 * 512].chunks_exact(512) {
            assert_eq!(converter.put_data(chunk), Ok(512));
            assert_eq!(converter.phase(), StreamPhase::Draining);
            assert!(converter.get_data(&mut batch));
            assert_eq!(batch, chunk);
        }
        assert_eq!(converter.put_data(&input[3 * 512..]), Ok(200));
        assert_eq!(converter.phase(), StreamPhase::Finished);
        assert_eq!(converter.get_remaining_data(&mut batch), 200);
        assert_eq!(batch[..200], input[3 * 512..]);

        let mut converter = Converter::with_bits(44100, 16, 1, 44100, 16, 512).unwrap();
        converter.signal_end_of_stream();
        assert_eq!(convert_bytes(&mut converter, &input), input);

        let mut converter = Converter::with_bits(48000, 16, 1, 44100, 16, 512).unwrap();
        converter.signal_end_of_stream();
        let output = convert_bytes(&mut converter, &input);
        assert_eq!(output.len() / 2, input.len() / 2 * 44100 / 48000 + 2);
    }

    #[test]
    fn short_output_buffer() {
        let mut converter = Converter::with_bits(44100, 16, 1, 44100, 16, 512).unwrap();
        let input = noise_bytes(256);
        assert_eq!(converter.put_data(&input), Ok(512));
        let mut short = vec![0u8; 511];
        assert!(!converter.get_data(&mut short));
        assert_eq!(converter.pending_size(), 512);
        let mut batch = vec![0u8; 512];
        assert!(converter.get_data(&mut batch));
        assert_eq!(batch, input);
    }

    #[test]
    fn clipping() {
        // a ramp from 0 to 2x full scale: clipping kicks in at full scale
        let frames = 48000;
        let input = (0..frames)
            .map(|i| 2.0 * i as f32 / frames as f32)
            .collect::<Vec<_>>();
        let mut converter = Converter::new(
            AudioFormat::new(44100, SampleFormat::F32, 1),
            AudioFormat::new(48000, SampleFormat::S16, 1),
            1024,
            ConverterOptions::default(),
        )
        .unwrap();
        let mut output = Vec::new();
        let mut batch = vec![0u8; 1024];
        let mut offset = 0;
        let mut last_peak = 0.0;
        loop {
            while converter.get_data(&mut batch) {
                output.extend_from_slice(&batch);
            }
            let remaining = &input[offset..];
            if remaining.len() < converter.input_samples() {
                converter.signal_end_of_stream();
            }
            match converter.put_float_data(remaining) {
                Ok(consumed) => offset += consumed,
                Err(_) => break,
            }
            assert!(converter.peak() >= last_peak);
            last_peak = converter.peak();
        }
        assert!(converter.clipped_samples() > 0);
        assert!(converter.peak() > 1.5);

        // output is monotonic, saturating at full scale
        let samples = output
            .chunks_exact(2)
            .map(LittleEndian::read_i16)
            .collect::<Vec<_>>();
        let settled = &samples[1000..samples.len() - 1000];
        for pair in settled.windows(2) {
            assert!(pair[1] >= pair[0] - 2, "{} -> {}", pair[0], pair[1]);
        }
        assert_eq!(*settled.last().unwrap(), i16::MAX);
    }

    /// Convert a 3 second sine at -6 dB from `source_rate` to `dest_rate` and back. Returns the
    /// gain of the tone and the level of a bin 10 Hz below it.
    fn round_trip(source_rate: u32, dest_rate: u32, frequency: f64) -> (f64, f64) {
        let input = sine(frequency, 0.5, source_rate, 3 * source_rate as usize);
        let format = |rate| AudioFormat::new(rate, SampleFormat::F32, 1);
        let mut forth = Converter::new(
            format(source_rate),
            format(dest_rate),
            4096,
            ConverterOptions::default(),
        )
        .unwrap();
        let converted = convert_floats(&mut forth, &input);
        let mut back = Converter::new(
            format(dest_rate),
            format(source_rate),
            4096,
            ConverterOptions::default(),
        )
        .unwrap();
        let output = convert_floats(&mut back, &converted);

        // skip the edges, where the signal starts and stops abruptly
        let range = source_rate as usize / 2..source_rate as usize * 3 / 2;
        let analyzed = &output[range.clone()];
        let reference = &input[range];
        let gain = bin_magnitude(analyzed, frequency, source_rate)
            / bin_magnitude(reference, frequency, source_rate);
        let spur = bin_magnitude(analyzed, frequency - 10.0, source_rate);
        (gain, spur)
    }

    #[test]
    fn passband_fidelity() {
        for (source_rate, dest_rate, frequency) in [
            (44100, 48000, 1000.0),
            // close to the band edge: 0.39 x the lower rate
            (44100, 48000, 17199.0),
            (48000, 44100, 17199.0),
            // 2x oversampled stages
            (32000, 48000, 1000.0),
            (32000, 48000, 12480.0),
            (48000, 32000, 12480.0),
        ] {
            let (gain, spur) = round_trip(source_rate, dest_rate, frequency);
            assert!(
                crate::utils::linear_to_db(gain).abs() < 0.1,
                "{source_rate} <-> {dest_rate} at {frequency} Hz: passband gain {gain}"
            );
            assert!(
                spur < 1e-3,
                "{source_rate} <-> {dest_rate} at {frequency} Hz: spurious level {spur}"
            );
        }
    }
}
