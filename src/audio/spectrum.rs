use rustfft::{num_complex::Complex, FftPlanner};

use super::signal::Signal;
use crate::error::{Error, Result};

/// One-sided magnitude spectrum of a whole clip.
///
/// `magnitudes[k]` is the DFT magnitude at `frequencies[k] = k * sample_rate / N`.
#[derive(Clone, Debug)]
pub struct Spectrum {
    magnitudes: Vec<f64>,
    frequencies: Vec<f64>,
}

impl Spectrum {
    pub fn compute(signal: &Signal) -> Result<Self> {
        Self::from_samples(signal.samples(), signal.sample_rate())
    }

    /// Full-length DFT of `samples`, keeping the first `N / 2` bins.
    ///
    /// A single-sample signal keeps its DC bin.
    pub fn from_samples(samples: &[f64], sample_rate: u32) -> Result<Self> {
        let n = samples.len();
        if n == 0 {
            return Err(Error::EmptySignal);
        }

        let mut planner = FftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(n);
        let mut buffer: Vec<Complex<f64>> =
            samples.iter().map(|&s| Complex::new(s, 0.0)).collect();
        fft.process(&mut buffer);

        let half = (n / 2).max(1);
        let bin_width = sample_rate as f64 / n as f64;
        let magnitudes: Vec<f64> = buffer[..half].iter().map(|c| c.norm()).collect();
        let frequencies: Vec<f64> = (0..half).map(|k| k as f64 * bin_width).collect();

        log::debug!(
            "Spectrum: {} bins, {:.3} Hz resolution",
            magnitudes.len(),
            bin_width
        );

        Ok(Self {
            magnitudes,
            frequencies,
        })
    }

    /// Build a spectrum from explicit, index-aligned arrays.
    pub fn from_parts(magnitudes: Vec<f64>, frequencies: Vec<f64>) -> Result<Self> {
        if magnitudes.len() != frequencies.len() {
            return Err(Error::InvalidSpectrum(format!(
                "{} magnitudes but {} frequencies",
                magnitudes.len(),
                frequencies.len()
            )));
        }
        validate_magnitudes(&magnitudes)?;
        if frequencies.windows(2).any(|w| w[1] < w[0]) {
            return Err(Error::InvalidSpectrum(
                "frequencies are not non-decreasing".into(),
            ));
        }
        Ok(Self {
            magnitudes,
            frequencies,
        })
    }

    pub fn magnitudes(&self) -> &[f64] {
        &self.magnitudes
    }

    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn len(&self) -> usize {
        self.magnitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }

    /// Spacing between adjacent bins in Hz, 0 when fewer than two bins exist.
    pub fn bin_width(&self) -> f64 {
        match self.frequencies.as_slice() {
            [first, second, ..] => second - first,
            _ => 0.0,
        }
    }
}

/// Magnitudes must be finite and non-negative.
pub(crate) fn validate_magnitudes(magnitudes: &[f64]) -> Result<()> {
    match magnitudes.iter().find(|m| !m.is_finite() || **m < 0.0) {
        Some(m) => Err(Error::InvalidSpectrum(format!(
            "magnitude {m} is not a finite non-negative value"
        ))),
        None => Ok(()),
    }
}
