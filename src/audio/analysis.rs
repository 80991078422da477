use super::descriptors::{
    log_attack_time, spectral_centroid, spectral_flatness, spectral_spread, AttackThresholds,
};
use super::envelope::{Envelope, Framing};
use super::features::{Descriptor, DescriptorReport};
use super::signal::Signal;
use super::spectrum::Spectrum;
use crate::error::{Error, Result};

/// Tunables for one analysis call.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AnalysisParams {
    pub framing: Framing,
    pub thresholds: AttackThresholds,
}

/// Everything derived from one clip. Nothing here is mutated after [`analyze`].
#[derive(Debug)]
pub struct Analysis {
    pub signal: Signal,
    pub spectrum: Spectrum,
    pub envelope: Envelope,
    pub report: DescriptorReport,
}

pub fn analyze(signal: Signal, params: &AnalysisParams) -> Result<Analysis> {
    params.thresholds.validate()?;

    log::info!("Building spectrum and envelope...");
    let (spectrum, envelope) = rayon::join(
        || Spectrum::compute(&signal),
        || Envelope::extract(signal.samples(), params.framing),
    );
    let spectrum = spectrum?;

    log::info!("Computing descriptors...");
    let report = describe(&signal, &spectrum, &envelope, params.thresholds);

    for d in Descriptor::ALL {
        if let Err(err) = report.get(d) {
            log::warn!("{} undefined: {}", d, err);
        }
    }

    Ok(Analysis {
        signal,
        spectrum,
        envelope,
        report,
    })
}

/// Evaluate each descriptor independently; one failure leaves the rest intact.
pub fn describe(
    signal: &Signal,
    spectrum: &Spectrum,
    envelope: &Envelope,
    thresholds: AttackThresholds,
) -> DescriptorReport {
    let centroid = spectral_centroid(spectrum);
    let spread = match centroid {
        Ok(c) => spectral_spread(spectrum, c),
        Err(_) => Err(Error::MissingCentroid),
    };
    let flatness = spectral_flatness(spectrum.magnitudes());
    let log_attack_time = log_attack_time(
        &envelope.to_sample_time(),
        signal.sample_rate(),
        thresholds,
    );

    DescriptorReport {
        centroid,
        spread,
        flatness,
        log_attack_time,
    }
}

impl Analysis {
    /// Human-readable key/value lines for the console.
    pub fn summary(&self) -> String {
        let mut lines = vec![
            format!("Sample Rate: {}", self.signal.sample_rate()),
            format!("Bit Depth: {}", self.signal.bits()),
            format!("Samples: {}", self.signal.len()),
            format!("Duration: {:.3}s", self.signal.duration()),
            format!(
                "Envelope: {} frames (hop {})",
                self.envelope.len(),
                self.envelope.hop_length()
            ),
        ];
        lines.extend(Descriptor::ALL.iter().map(|&d| match self.report.get(d) {
            Ok(v) => format!("{}: {}", d, v),
            Err(err) => format!("{}: undefined ({})", d, err),
        }));

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClass;

    fn tone_with_attack(sample_rate: u32, n: usize, attack: usize) -> Signal {
        let samples = (0..n)
            .map(|i| {
                let gain = (i as f64 / attack as f64).min(1.0);
                let phase = 2.0 * std::f64::consts::PI * 440.0 * i as f64 / sample_rate as f64;
                0.5 * gain * phase.sin()
            })
            .collect();
        Signal::from_normalized(samples, sample_rate, 16).unwrap()
    }

    #[test]
    fn analyzes_a_tone() {
        let signal = tone_with_attack(8000, 16000, 4000);
        let analysis = analyze(signal, &AnalysisParams::default()).unwrap();

        assert_eq!(analysis.spectrum.len(), 8000);
        assert_eq!(analysis.envelope.len(), 16000usize.div_ceil(512));
        assert!(analysis.report.is_complete(), "{:?}", analysis.report);

        let centroid = analysis.report.value(Descriptor::Centroid).unwrap();
        assert!((centroid - 440.0).abs() < 200.0, "{centroid}");
        let lat = analysis.report.value(Descriptor::LogAttackTime).unwrap();
        // the attack ramps over half a second
        assert!(lat > -1.0 && lat < 0.0, "{lat}");

        let summary = analysis.summary();
        assert!(summary.contains("Sample Rate: 8000"));
        assert!(summary.contains("Bit Depth: 16"));
        assert!(summary.contains("Envelope: 32 frames (hop 512)"));
        assert_eq!(summary.lines().count(), 5 + Descriptor::ALL.len());
        assert!(summary.ends_with('\n'));
        assert!(summary.contains("audio_spectrum_flatness: "));
    }

    #[test]
    fn silence_fails_per_descriptor() {
        let signal = Signal::from_normalized(vec![0.0; 2048], 8000, 16).unwrap();
        let analysis = analyze(signal, &AnalysisParams::default()).unwrap();
        let report = &analysis.report;

        for d in Descriptor::ALL {
            let err = report.get(d).as_ref().unwrap_err();
            assert_eq!(err.class(), ErrorClass::DegenerateSignal, "{d}: {err}");
        }
        assert!(analysis.summary().contains("undefined"));
    }

    #[test]
    fn empty_signal_is_rejected() {
        let signal = Signal::from_normalized(Vec::new(), 8000, 16).unwrap();
        assert!(matches!(
            analyze(signal, &AnalysisParams::default()),
            Err(Error::EmptySignal)
        ));
    }

    #[test]
    fn invalid_thresholds_are_rejected_up_front() {
        let signal = tone_with_attack(8000, 4096, 1024);
        let params = AnalysisParams {
            thresholds: AttackThresholds { min: 0.9, max: 0.2 },
            ..Default::default()
        };
        assert!(matches!(
            analyze(signal, &params),
            Err(Error::InvalidThresholds { .. })
        ));
    }
}
