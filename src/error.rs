use std::path::PathBuf;

use thiserror::Error;

use crate::audio::features::Descriptor;

pub type Result<T> = std::result::Result<T, Error>;

/// Broad failure categories, used by callers to tell bad input apart from
/// inputs for which a descriptor is simply undefined.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    /// Missing, corrupt, or unsupported audio input.
    Input,
    /// Empty or silent signals that leave a descriptor without a denominator.
    DegenerateSignal,
    /// Parameters or intermediate values outside a formula's domain.
    Domain,
    /// Failures writing or reading exported documents.
    Output,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to open audio file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode audio: {0}")]
    Decode(#[from] symphonia::core::errors::Error),

    #[error("no decodable audio track found")]
    NoAudioTrack,

    #[error("stream does not declare a sample rate")]
    MissingSampleRate,

    #[error("invalid sample rate: {0} Hz")]
    InvalidSampleRate(u32),

    #[error("expected mono audio, found {0} channels")]
    UnsupportedChannelCount(usize),

    #[error("unsupported sample format: {0} (integer PCM required)")]
    UnsupportedSampleFormat(&'static str),

    #[error("invalid framing: frame size {frame_size}, hop length {hop_length}")]
    InvalidFraming { frame_size: usize, hop_length: usize },

    #[error("signal is empty")]
    EmptySignal,

    #[error("spectrum is empty")]
    EmptySpectrum,

    #[error("envelope is empty")]
    EmptyEnvelope,

    #[error("{0} is undefined: spectrum magnitudes sum to zero")]
    ZeroMagnitude(Descriptor),

    #[error("spread is undefined without a defined centroid")]
    MissingCentroid,

    #[error("envelope peak is zero")]
    SilentEnvelope,

    #[error("invalid spectrum: {0}")]
    InvalidSpectrum(String),

    #[error("invalid attack thresholds: min {min}, max {max} (need 0 <= min < max <= 1)")]
    InvalidThresholds { min: f64, max: f64 },

    #[error("attack time must be positive (lower index {lower_index}, upper index {upper_index})")]
    InvalidAttackTime {
        lower_index: usize,
        upper_index: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed descriptor document: {0}")]
    MalformedDocument(String),

    #[error("plotting failed: {0}")]
    Plot(String),
}

impl Error {
    pub fn class(&self) -> ErrorClass {
        match self {
            Error::Open { .. }
            | Error::Decode(_)
            | Error::NoAudioTrack
            | Error::MissingSampleRate
            | Error::InvalidSampleRate(_)
            | Error::UnsupportedChannelCount(_)
            | Error::UnsupportedSampleFormat(_)
            | Error::InvalidFraming { .. } => ErrorClass::Input,
            Error::EmptySignal
            | Error::EmptySpectrum
            | Error::EmptyEnvelope
            | Error::ZeroMagnitude(_)
            | Error::MissingCentroid
            | Error::SilentEnvelope => ErrorClass::DegenerateSignal,
            Error::InvalidSpectrum(_)
            | Error::InvalidThresholds { .. }
            | Error::InvalidAttackTime { .. } => ErrorClass::Domain,
            Error::Io(_) | Error::Xml(_) | Error::MalformedDocument(_) | Error::Plot(_) => {
                ErrorClass::Output
            }
        }
    }
}
