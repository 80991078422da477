use crate::error::{Error, Result};

/// Scale one raw PCM sample by the full-scale range of a `bits`-deep encoding.
///
/// Computes `sample / (2^bits * 2)`. The caller is responsible for `bits`
/// matching the actual encoding; nothing is clamped.
pub fn normalize(sample: i32, bits: u32) -> f64 {
    sample as f64 / (2f64.powi(bits as i32) * 2.0)
}

/// A mono clip of normalized samples, immutable once built.
#[derive(Clone, Debug)]
pub struct Signal {
    samples: Vec<f64>,
    sample_rate: u32,
    bits: u32,
}

impl Signal {
    /// Normalize raw integer PCM into a signal.
    pub fn from_pcm(pcm: &[i32], sample_rate: u32, bits: u32) -> Result<Self> {
        let samples: Vec<f64> = pcm.iter().map(|&s| normalize(s, bits)).collect();
        let signal = Self::from_normalized(samples, sample_rate, bits)?;

        let peak = signal.peak();
        if peak > 1.0 {
            log::warn!(
                "Normalized peak {:.3} exceeds 1.0; is {} the right bit depth?",
                peak,
                bits
            );
        }
        Ok(signal)
    }

    /// Wrap samples that are already normalized.
    pub fn from_normalized(samples: Vec<f64>, sample_rate: u32, bits: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(Error::InvalidSampleRate(sample_rate));
        }
        Ok(Self {
            samples,
            sample_rate,
            bits,
        })
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Largest absolute sample value, 0 for an empty signal.
    pub fn peak(&self) -> f64 {
        self.samples.iter().map(|s| s.abs()).fold(0.0f64, f64::max)
    }
}
