use std::path::PathBuf;

use arg::{parse_args, Args};

use rateconv::{ConversionQuality, SampleFormat};

// -------------------------------------------------------------------------------------------------

const DEFAULT_LOG_LEVEL: log::Level = if cfg!(debug_assertions) {
    log::Level::Debug
} else {
    log::Level::Warn
};

// -------------------------------------------------------------------------------------------------

/// Program arguments of the rateconv example applications.
#[derive(Args, Debug, Default)]
#[allow(unused)]
pub struct Arguments {
    #[arg(short = "r", long = "rate")]
    /// Destination sample rate in Hz. By default the input file's sample rate.
    pub sample_rate: Option<u32>,
    #[arg(short = "f", long = "format")]
    /// Destination sample format: \"U8\", \"S16\", \"S24\", \"S32\" or \"F32\".
    /// By default the input file's sample format.
    pub sample_format: Option<SampleFormat>,
    #[arg(short = "q", long = "quality")]
    /// Conversion quality: \"fast\", \"standard\" or \"high\". By default \"fast\".
    pub quality: Option<ConversionQuality>,
    #[arg(short = "l", long = "log-level")]
    /// Set logging level to \"debug\", \"info\", \"warn\" or \"error\".
    /// By default \"debug\" in dev builds and \"warn\" in release builds.
    pub log_level: Option<log::Level>,
    #[arg(short = "i", long = "input")]
    /// Path of the wav file to convert.
    pub input_path: Option<PathBuf>,
    #[arg(short = "o", long = "output")]
    /// Path of the converted wav file.
    pub output_path: Option<PathBuf>,
}

/// Parse example arguments and apply the log-level arg to the logger
#[allow(unused)]
pub fn parse() -> Arguments {
    let args = parse_args::<Arguments>();

    create_logger(args.log_level);
    args
}

// -------------------------------------------------------------------------------------------------

/// Create default logger from arguments. Invoked from `parse`.
#[allow(unused)]
pub fn create_logger(log_level: Option<log::Level>) {
    simple_logger::SimpleLogger::new()
        .with_level(log_level.unwrap_or(DEFAULT_LOG_LEVEL).to_level_filter())
        .init()
        .expect("Failed to set logger");
}
