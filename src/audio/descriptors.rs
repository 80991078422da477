//! Closed-form spectral and temporal descriptors.
//!
//! Every function here is pure: the spectrum or envelope goes in, a scalar
//! or a typed error comes out.

use super::features::Descriptor;
use super::spectrum::{validate_magnitudes, Spectrum};
use crate::error::{Error, Result};

pub const THRESH_MIN: f64 = 0.2;
pub const THRESH_MAX: f64 = 0.9;

/// Fractions of the envelope peak that bound the attack phase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttackThresholds {
    pub min: f64,
    pub max: f64,
}

impl AttackThresholds {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        let thresholds = Self { min, max };
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn validate(&self) -> Result<()> {
        let ordered = self.min.is_finite()
            && self.max.is_finite()
            && 0.0 <= self.min
            && self.min < self.max
            && self.max <= 1.0;
        if ordered {
            Ok(())
        } else {
            Err(Error::InvalidThresholds {
                min: self.min,
                max: self.max,
            })
        }
    }
}

impl Default for AttackThresholds {
    fn default() -> Self {
        Self {
            min: THRESH_MIN,
            max: THRESH_MAX,
        }
    }
}

fn magnitude_sum(spectrum: &Spectrum, descriptor: Descriptor) -> Result<f64> {
    if spectrum.is_empty() {
        return Err(Error::EmptySpectrum);
    }
    let total: f64 = spectrum.magnitudes().iter().sum();
    if total <= 0.0 {
        return Err(Error::ZeroMagnitude(descriptor));
    }
    Ok(total)
}

/// Audio spectrum centroid: `Σ f[k]·m[k] / Σ m[k]`, in Hz.
pub fn spectral_centroid(spectrum: &Spectrum) -> Result<f64> {
    let total = magnitude_sum(spectrum, Descriptor::Centroid)?;
    let weighted: f64 = spectrum
        .frequencies()
        .iter()
        .zip(spectrum.magnitudes())
        .map(|(f, m)| f * m)
        .sum();
    Ok(weighted / total)
}

/// Audio spectrum spread around a previously computed `centroid`, in Hz.
pub fn spectral_spread(spectrum: &Spectrum, centroid: f64) -> Result<f64> {
    let total = magnitude_sum(spectrum, Descriptor::Spread)?;
    let weighted: f64 = spectrum
        .frequencies()
        .iter()
        .zip(spectrum.magnitudes())
        .map(|(f, m)| (f - centroid).powi(2) * m)
        .sum();
    Ok((weighted / total).sqrt())
}

/// Audio spectrum flatness: geometric mean over arithmetic mean of `magnitudes`.
///
/// One global value over the whole array. Any zero magnitude makes the
/// geometric mean, and so the result, exactly 0. Negative or non-finite
/// magnitudes are rejected.
pub fn spectral_flatness(magnitudes: &[f64]) -> Result<f64> {
    let first = *magnitudes.first().ok_or(Error::EmptySpectrum)?;
    validate_magnitudes(magnitudes)?;
    let n = magnitudes.len() as f64;
    let arithmetic = magnitudes.iter().sum::<f64>() / n;
    if arithmetic <= 0.0 {
        return Err(Error::ZeroMagnitude(Descriptor::Flatness));
    }
    if magnitudes.iter().any(|&m| m == 0.0) {
        return Ok(0.0);
    }
    if magnitudes.iter().all(|&m| m == first) {
        return Ok(1.0);
    }

    // log domain keeps long spectra from underflowing the product
    let mean_log = magnitudes.iter().map(|m| m.ln()).sum::<f64>() / n;
    let geometric = mean_log.exp();
    Ok((geometric / arithmetic).min(1.0))
}

/// Index of the first value closest to `target`.
fn nearest_index(values: &[f64], target: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, v) in values.iter().enumerate() {
        let distance = (v - target).abs();
        match best {
            Some((_, d)) if distance >= d => {}
            _ => best = Some((i, distance)),
        }
    }
    best.map(|(i, _)| i)
}

/// Seconds between the envelope reaching `thresholds.min` and `thresholds.max`
/// of its peak.
///
/// The upper crossing is searched over the whole envelope, the lower one only
/// before it, so a decaying tail can't be mistaken for the onset.
pub fn attack_time(envelope: &[f64], sample_rate: u32, thresholds: AttackThresholds) -> Result<f64> {
    thresholds.validate()?;
    if sample_rate == 0 {
        return Err(Error::InvalidSampleRate(sample_rate));
    }
    if envelope.is_empty() {
        return Err(Error::EmptyEnvelope);
    }

    let max_intensity = envelope.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max_intensity <= 0.0 {
        return Err(Error::SilentEnvelope);
    }

    let lower = thresholds.min * max_intensity;
    let upper = thresholds.max * max_intensity;

    let upper_index = nearest_index(envelope, upper).ok_or(Error::EmptyEnvelope)?;
    let lower_index = nearest_index(&envelope[..upper_index], lower).ok_or(
        Error::InvalidAttackTime {
            lower_index: upper_index,
            upper_index,
        },
    )?;
    if upper_index <= lower_index {
        return Err(Error::InvalidAttackTime {
            lower_index,
            upper_index,
        });
    }

    log::debug!(
        "Attack: lower index {} ({:.4}), upper index {} ({:.4})",
        lower_index,
        lower,
        upper_index,
        upper
    );

    Ok((upper_index - lower_index) as f64 / sample_rate as f64)
}

/// Log attack time: `log10` of [`attack_time`].
pub fn log_attack_time(
    envelope: &[f64],
    sample_rate: u32,
    thresholds: AttackThresholds,
) -> Result<f64> {
    attack_time(envelope, sample_rate, thresholds).map(f64::log10)
}
