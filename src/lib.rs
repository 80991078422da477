//! MPEG-7 style audio descriptors for a single mono clip: spectral centroid,
//! spread, flatness, and log attack time, plus the amplitude envelope the
//! attack time is measured on.

pub mod audio;
pub mod error;
pub mod export;

pub use audio::analysis::{analyze, Analysis, AnalysisParams};
pub use audio::decode::{decode_pcm, load_signal, PcmAudio};
pub use audio::descriptors::AttackThresholds;
pub use audio::envelope::{Envelope, Framing};
pub use audio::features::{Descriptor, DescriptorReport, DescriptorSet};
pub use audio::signal::Signal;
pub use audio::spectrum::Spectrum;
pub use error::{Error, ErrorClass, Result};
