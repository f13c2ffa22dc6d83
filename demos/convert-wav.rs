//! An example showcasing how to convert a wav file to another sample rate and sample format,
//! feeding the converter with raw PCM bytes and fetching its output in fixed size batches.

use std::error::Error;

use byteorder::{ByteOrder, LittleEndian};
use hound::{WavReader, WavSpec, WavWriter};

use rateconv::{AudioFormat, Converter, ConverterOptions, SampleFormat};

// -------------------------------------------------------------------------------------------------

#[cfg(all(debug_assertions, feature = "assert-allocs"))]
#[global_allocator]
static A: assert_no_alloc::AllocDisabler = assert_no_alloc::AllocDisabler;

// -------------------------------------------------------------------------------------------------

// Common example code
#[path = "./common/arguments.rs"]
mod arguments;

// -------------------------------------------------------------------------------------------------

const BATCH_SIZE_FRAMES: usize = 4096;

// -------------------------------------------------------------------------------------------------

fn main() -> Result<(), Box<dyn Error>> {
    // Parse optional arguments
    let args = arguments::parse();
    let (Some(input_path), Some(output_path)) = (&args.input_path, &args.output_path) else {
        return Err("missing --input or --output path argument".into());
    };

    // Read the whole input file as raw little endian PCM
    let mut reader = WavReader::open(input_path)?;
    let wav_spec = reader.spec();
    let source_format = AudioFormat::new(
        wav_spec.sample_rate,
        match wav_spec.sample_format {
            hound::SampleFormat::Float => SampleFormat::F32,
            hound::SampleFormat::Int => {
                SampleFormat::from_bits(wav_spec.bits_per_sample as u32)?
            }
        },
        wav_spec.channels as usize,
    );
    let input = read_pcm(&mut reader, source_format.sample_format)?;

    // Create the converter
    let dest_format = AudioFormat::new(
        args.sample_rate.unwrap_or(source_format.sample_rate),
        args.sample_format.unwrap_or(source_format.sample_format),
        source_format.channel_count,
    );
    let options = ConverterOptions::default().quality(args.quality.unwrap_or_default());
    let mut converter = Converter::new(
        source_format,
        dest_format,
        BATCH_SIZE_FRAMES * dest_format.frame_bytes(),
        options,
    )?;
    println!(
        "Converting '{}': {} Hz {} -> {} Hz {} with {} quality...",
        input_path.display(),
        source_format.sample_rate,
        source_format.sample_format,
        dest_format.sample_rate,
        dest_format.sample_format,
        options.quality
    );

    let mut writer = WavWriter::create(
        output_path,
        WavSpec {
            channels: wav_spec.channels,
            sample_rate: dest_format.sample_rate,
            bits_per_sample: dest_format.sample_format.bits_per_sample() as u16,
            sample_format: if dest_format.sample_format.is_float() {
                hound::SampleFormat::Float
            } else {
                hound::SampleFormat::Int
            },
        },
    )?;

    // Feed input until the stream finished, writing batches as soon as they are ready
    let mut batch = vec![0u8; converter.batch_size()];
    let mut offset = 0;
    loop {
        while converter.get_data(&mut batch) {
            write_pcm(&mut writer, dest_format.sample_format, &batch)?;
        }
        let remaining = &input[offset..];
        if remaining.len() < converter.input_size() {
            converter.signal_end_of_stream();
        }
        match converter.put_data(remaining) {
            Ok(consumed) => offset += consumed,
            Err(rateconv::Error::StreamFinished) => break,
            Err(err) => return Err(err.into()),
        }
    }
    while converter.get_data(&mut batch) {
        write_pcm(&mut writer, dest_format.sample_format, &batch)?;
    }
    let count = converter.get_remaining_data(&mut batch);
    write_pcm(&mut writer, dest_format.sample_format, &batch[..count])?;
    writer.finalize()?;

    if converter.clipped_samples() > 0 {
        println!(
            "Clipped {} samples, peak at {:.2} dB",
            converter.clipped_samples(),
            rateconv::utils::linear_to_db(converter.peak())
        );
    }
    println!("Wrote '{}'", output_path.display());
    Ok(())
}

// -------------------------------------------------------------------------------------------------

fn read_pcm<R: std::io::Read>(
    reader: &mut WavReader<R>,
    format: SampleFormat,
) -> Result<Vec<u8>, hound::Error> {
    let mut bytes = vec![0u8; reader.len() as usize * format.bytes_per_sample()];
    let mut chunks = bytes.chunks_exact_mut(format.bytes_per_sample());
    if format.is_float() {
        for (sample, chunk) in reader.samples::<f32>().zip(&mut chunks) {
            LittleEndian::write_f32(chunk, sample?);
        }
    } else {
        for (sample, chunk) in reader.samples::<i32>().zip(&mut chunks) {
            let sample = sample?;
            match format {
                // hound reads unsigned 8 bit samples as signed values
                SampleFormat::U8 => chunk[0] = (sample + 128) as u8,
                SampleFormat::S16 => LittleEndian::write_i16(chunk, sample as i16),
                SampleFormat::S24 => LittleEndian::write_i24(chunk, sample),
                SampleFormat::S32 => LittleEndian::write_i32(chunk, sample),
                SampleFormat::F32 => unreachable!("float samples are read as f32"),
            }
        }
    }
    Ok(bytes)
}

fn write_pcm<W: std::io::Write + std::io::Seek>(
    writer: &mut WavWriter<W>,
    format: SampleFormat,
    bytes: &[u8],
) -> Result<(), hound::Error> {
    for chunk in bytes.chunks_exact(format.bytes_per_sample()) {
        match format {
            SampleFormat::U8 => writer.write_sample((chunk[0] as i32 - 128) as i8)?,
            SampleFormat::S16 => writer.write_sample(LittleEndian::read_i16(chunk))?,
            SampleFormat::S24 => writer.write_sample(LittleEndian::read_i24(chunk))?,
            SampleFormat::S32 => writer.write_sample(LittleEndian::read_i32(chunk))?,
            SampleFormat::F32 => writer.write_sample(LittleEndian::read_f32(chunk))?,
        }
    }
    Ok(())
}
