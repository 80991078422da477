use crate::error::{Error, Result};

pub const FRAME_SIZE: usize = 1024;
pub const HOP_LENGTH: usize = 512;

/// Frame layout for envelope extraction. Frames may overlap but never leave gaps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Framing {
    frame_size: usize,
    hop_length: usize,
}

impl Framing {
    pub fn new(frame_size: usize, hop_length: usize) -> Result<Self> {
        if hop_length == 0 || frame_size < hop_length {
            return Err(Error::InvalidFraming {
                frame_size,
                hop_length,
            });
        }
        Ok(Self {
            frame_size,
            hop_length,
        })
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    pub fn hop_length(&self) -> usize {
        self.hop_length
    }
}

impl Default for Framing {
    fn default() -> Self {
        Self {
            frame_size: FRAME_SIZE,
            hop_length: HOP_LENGTH,
        }
    }
}

/// Coarse amplitude-over-time trace: the peak absolute sample of each frame.
#[derive(Clone, Debug)]
pub struct Envelope {
    values: Vec<f64>,
    hop_length: usize,
}

impl Envelope {
    /// One value per hop; the last frames are clipped at the end of the signal.
    pub fn extract(samples: &[f64], framing: Framing) -> Self {
        let values: Vec<f64> = (0..samples.len())
            .step_by(framing.hop_length)
            .map(|start| {
                let end = (start + framing.frame_size).min(samples.len());
                samples[start..end]
                    .iter()
                    .map(|s| s.abs())
                    .fold(0.0f64, f64::max)
            })
            .collect();

        log::debug!(
            "Envelope: {} frames (frame={}, hop={})",
            values.len(),
            framing.frame_size,
            framing.hop_length
        );

        Self {
            values,
            hop_length: framing.hop_length,
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn hop_length(&self) -> usize {
        self.hop_length
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Repeat every frame value `hop_length` times so index `i` lines up with sample `i`.
    pub fn to_sample_time(&self) -> Vec<f64> {
        self.values
            .iter()
            .flat_map(|&v| std::iter::repeat(v).take(self.hop_length))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_is_ceil_of_samples_over_hop() {
        let framing = Framing::new(1024, 512).unwrap();
        for n in [0usize, 1, 511, 512, 513, 1024, 5000] {
            let samples: Vec<f64> = (0..n).map(|i| ((i as f64) * 0.01).sin()).collect();
            let envelope = Envelope::extract(&samples, framing);
            assert_eq!(envelope.len(), n.div_ceil(512), "n={n}");

            let peak = samples.iter().map(|s| s.abs()).fold(0.0f64, f64::max);
            assert!(envelope.values().iter().all(|&v| v >= 0.0 && v <= peak));
        }
    }

    #[test]
    fn frames_overlap_and_use_absolute_values() {
        let framing = Framing::new(4, 2).unwrap();
        let samples = [0.1, -0.9, 0.2, 0.3, -0.4, 0.0, 0.05];
        let envelope = Envelope::extract(&samples, framing);
        // frames: [0,4) [2,6) [4,7) [6,7)
        assert_eq!(envelope.values(), &[0.9, 0.4, 0.4, 0.05]);
    }

    #[test]
    fn upsampling_repeats_each_frame() {
        let framing = Framing::new(2, 2).unwrap();
        let envelope = Envelope::extract(&[0.5, 0.1, -0.2, 0.0, 0.3], framing);
        assert_eq!(envelope.values(), &[0.5, 0.2, 0.3]);
        assert_eq!(
            envelope.to_sample_time(),
            vec![0.5, 0.5, 0.2, 0.2, 0.3, 0.3]
        );
    }

    #[test]
    fn rejects_bad_framing() {
        assert!(Framing::new(1024, 0).is_err());
        assert!(Framing::new(256, 512).is_err());
        assert!(Framing::new(512, 512).is_ok());
        assert_eq!(Framing::default().frame_size(), FRAME_SIZE);
    }
}
