use std::fmt;

use crate::error::Result;

/// The scalar descriptors computed for a clip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Descriptor {
    Centroid,
    Spread,
    Flatness,
    LogAttackTime,
}

impl Descriptor {
    pub const ALL: [Descriptor; 4] = [
        Descriptor::Centroid,
        Descriptor::Spread,
        Descriptor::Flatness,
        Descriptor::LogAttackTime,
    ];

    /// Element name used in the exported XML document.
    pub fn tag(self) -> &'static str {
        match self {
            Descriptor::Centroid => "audio_spectrum_centroid",
            Descriptor::Spread => "audio_spectrum_spread",
            Descriptor::Flatness => "audio_spectrum_flatness",
            Descriptor::LogAttackTime => "log_attack_time",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.tag() == tag)
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A fully defined set of descriptor values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DescriptorSet {
    /// Amplitude-weighted mean frequency (Hz)
    pub centroid: f64,
    /// Amplitude-weighted standard deviation around the centroid (Hz)
    pub spread: f64,
    /// Geometric over arithmetic mean of the magnitudes, in [0, 1]
    pub flatness: f64,
    /// log10 of the attack time in seconds
    pub log_attack_time: f64,
}

impl DescriptorSet {
    pub fn get(&self, descriptor: Descriptor) -> f64 {
        match descriptor {
            Descriptor::Centroid => self.centroid,
            Descriptor::Spread => self.spread,
            Descriptor::Flatness => self.flatness,
            Descriptor::LogAttackTime => self.log_attack_time,
        }
    }
}

/// Outcome of one analysis call: each descriptor succeeds or fails on its own.
#[derive(Debug)]
pub struct DescriptorReport {
    pub centroid: Result<f64>,
    pub spread: Result<f64>,
    pub flatness: Result<f64>,
    pub log_attack_time: Result<f64>,
}

impl DescriptorReport {
    pub fn get(&self, descriptor: Descriptor) -> &Result<f64> {
        match descriptor {
            Descriptor::Centroid => &self.centroid,
            Descriptor::Spread => &self.spread,
            Descriptor::Flatness => &self.flatness,
            Descriptor::LogAttackTime => &self.log_attack_time,
        }
    }

    /// Value of a descriptor, or `None` when it is undefined for this input.
    pub fn value(&self, descriptor: Descriptor) -> Option<f64> {
        self.get(descriptor).as_ref().ok().copied()
    }

    pub fn is_complete(&self) -> bool {
        Descriptor::ALL.iter().all(|&d| self.get(d).is_ok())
    }

    /// Collapse into a [`DescriptorSet`], or return the first undefined
    /// descriptor's error.
    pub fn complete(self) -> Result<DescriptorSet> {
        Ok(DescriptorSet {
            centroid: self.centroid?,
            spread: self.spread?,
            flatness: self.flatness?,
            log_attack_time: self.log_attack_time?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn tags_round_trip() {
        for d in Descriptor::ALL {
            assert_eq!(Descriptor::from_tag(d.tag()), Some(d));
        }
        assert_eq!(Descriptor::from_tag("audio_spectrum_envelope"), None);
    }

    #[test]
    fn complete_report_collapses() {
        let report = DescriptorReport {
            centroid: Ok(440.0),
            spread: Ok(12.5),
            flatness: Ok(0.3),
            log_attack_time: Ok(-1.2),
        };
        assert!(report.is_complete());
        let set = report.complete().unwrap();
        assert_eq!(set.get(Descriptor::Centroid), 440.0);
        assert_eq!(set.get(Descriptor::LogAttackTime), -1.2);
    }

    #[test]
    fn failure_is_isolated_to_its_descriptor() {
        let report = DescriptorReport {
            centroid: Ok(440.0),
            spread: Ok(12.5),
            flatness: Ok(0.3),
            log_attack_time: Err(Error::SilentEnvelope),
        };
        assert!(!report.is_complete());
        assert_eq!(report.value(Descriptor::Centroid), Some(440.0));
        assert_eq!(report.value(Descriptor::LogAttackTime), None);
        assert!(matches!(report.complete(), Err(Error::SilentEnvelope)));
    }
}
