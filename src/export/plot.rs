use std::path::{Path, PathBuf};

use plotters::prelude::*;

use crate::audio::analysis::Analysis;
use crate::audio::envelope::Envelope;
use crate::audio::spectrum::Spectrum;
use crate::error::{Error, Result};

const SIZE: (u32, u32) = (1280, 720);

fn plot_err<E: std::fmt::Display>(err: E) -> Error {
    Error::Plot(err.to_string())
}

/// Smallest non-degenerate axis range covering `values`.
fn value_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    if hi - lo < f64::EPSILON {
        return (lo - 0.5, hi + 0.5);
    }
    (lo, hi)
}

/// Frequency (Hz) against magnitude.
pub fn plot_spectrum(spectrum: &Spectrum, path: &Path) -> Result<()> {
    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let (f_lo, f_hi) = value_range(spectrum.frequencies().iter().copied());
    let (_, m_hi) = value_range(spectrum.magnitudes().iter().copied());

    let mut chart = ChartBuilder::on(&root)
        .caption("Magnitude spectrum", ("sans-serif", 24))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(f_lo..f_hi, 0.0..m_hi)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("Frequency (Hz)")
        .y_desc("Magnitude")
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(LineSeries::new(
            spectrum
                .frequencies()
                .iter()
                .copied()
                .zip(spectrum.magnitudes().iter().copied()),
            &BLUE,
        ))
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    log::info!("Wrote spectrum plot to {}", path.display());
    Ok(())
}

/// Waveform in blue with the envelope, stretched to sample time, in red.
pub fn plot_envelope(samples: &[f64], envelope: &Envelope, path: &Path) -> Result<()> {
    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let trace: Vec<f64> = envelope
        .to_sample_time()
        .into_iter()
        .take(samples.len())
        .collect();
    let (y_lo, y_hi) = value_range(samples.iter().chain(trace.iter()).copied());
    let x_hi = samples.len().max(1) as f64;

    let mut chart = ChartBuilder::on(&root)
        .caption("Waveform and envelope", ("sans-serif", 24))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0..x_hi, y_lo..y_hi)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("Sample")
        .y_desc("Amplitude")
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(LineSeries::new(
            samples.iter().enumerate().map(|(i, &s)| (i as f64, s)),
            &BLUE,
        ))
        .map_err(plot_err)?;
    chart
        .draw_series(LineSeries::new(
            trace.iter().enumerate().map(|(i, &v)| (i as f64, v)),
            &RED,
        ))
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    log::info!("Wrote envelope plot to {}", path.display());
    Ok(())
}

/// Write `spectrum.svg` and `envelope.svg` into `dir`, creating it if needed.
pub fn plot_analysis(analysis: &Analysis, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let spectrum_path = dir.join("spectrum.svg");
    let envelope_path = dir.join("envelope.svg");

    plot_spectrum(&analysis.spectrum, &spectrum_path)?;
    plot_envelope(
        analysis.signal.samples(),
        &analysis.envelope,
        &envelope_path,
    )?;

    Ok(vec![spectrum_path, envelope_path])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::envelope::Framing;

    #[test]
    fn value_range_never_collapses() {
        assert_eq!(value_range(std::iter::empty()), (0.0, 1.0));
        assert_eq!(value_range([2.0, 2.0].into_iter()), (1.5, 2.5));
        assert_eq!(value_range([-1.0, 3.0, 0.5].into_iter()), (-1.0, 3.0));
    }

    #[test]
    fn writes_svg_files() {
        let dir = std::env::temp_dir().join(format!("plot-{}", std::process::id()));
        let samples: Vec<f64> = (0..2048).map(|i| (i as f64 * 0.05).sin() * 0.3).collect();
        let spectrum = Spectrum::from_samples(&samples, 8000).unwrap();
        let envelope = Envelope::extract(&samples, Framing::default());

        std::fs::create_dir_all(&dir).unwrap();
        plot_spectrum(&spectrum, &dir.join("s.svg")).unwrap();
        plot_envelope(&samples, &envelope, &dir.join("e.svg")).unwrap();

        let svg = std::fs::read_to_string(dir.join("e.svg")).unwrap();
        std::fs::remove_dir_all(&dir).ok();
        assert!(svg.contains("<svg"));
    }
}
