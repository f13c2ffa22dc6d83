#![doc = include_str!("../README.md")]

// private mods (will be partly re-exported)
mod codec;
mod converter;
mod error;
mod filter;
mod format;
mod options;
mod plan;
mod resampler;
mod spectral;
mod stage;
mod stream;

// public, flat re-exports
pub use error::Error;

pub use converter::Converter;
pub use format::{AudioFormat, SampleFormat};
pub use options::{ConversionQuality, ConverterOptions};
pub use plan::{ConversionPlan, Direction};
pub use stream::{StreamPhase, FLUSH_SLACK};

// public mods
pub mod utils;
