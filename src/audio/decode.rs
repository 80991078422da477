use std::path::Path;

use symphonia::core::audio::{AudioBufferRef, Signal as _};
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::signal::Signal;
use crate::error::{Error, Result};

/// Raw integer PCM of a mono clip, before normalization.
#[derive(Clone, Debug)]
pub struct PcmAudio {
    /// Signed samples; unsigned encodings are re-centred around zero
    pub samples: Vec<i32>,
    pub sample_rate: u32,
    /// Bit depth reported by the container, if any
    pub bits_per_sample: Option<u32>,
}

impl PcmAudio {
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Read a mono WAV file fully into memory.
///
/// Multi-channel streams are rejected rather than downmixed, as are
/// floating-point encodings.
pub fn decode_pcm(path: &Path) -> Result<PcmAudio> {
    let file = std::fs::File::open(path).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != symphonia::core::codecs::CODEC_TYPE_NULL)
        .ok_or(Error::NoAudioTrack)?;

    let track_id = track.id;
    if let Some(channels) = track.codec_params.channels.map(|c| c.count()) {
        if channels != 1 {
            return Err(Error::UnsupportedChannelCount(channels));
        }
    }
    let sample_rate = track.codec_params.sample_rate.ok_or(Error::MissingSampleRate)?;
    let bits_per_sample = track.codec_params.bits_per_sample;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())?;

    let mut samples: Vec<i32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(symphonia::core::errors::Error::DecodeError(msg)) => {
                log::warn!("Skipping undecodable packet: {}", msg);
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let channels = decoded.spec().channels.count();
        if channels != 1 {
            return Err(Error::UnsupportedChannelCount(channels));
        }

        append_mono(&decoded, &mut samples)?;
    }

    let audio = PcmAudio {
        samples,
        sample_rate,
        bits_per_sample,
    };

    log::info!(
        "Decoded audio: {} samples, {}Hz, {:.2}s",
        audio.samples.len(),
        audio.sample_rate,
        audio.duration()
    );

    Ok(audio)
}

fn append_mono(decoded: &AudioBufferRef<'_>, out: &mut Vec<i32>) -> Result<()> {
    match decoded {
        AudioBufferRef::U8(buf) => out.extend(buf.chan(0).iter().map(|&s| s as i32 - 128)),
        AudioBufferRef::U16(buf) => out.extend(buf.chan(0).iter().map(|&s| s as i32 - 32768)),
        AudioBufferRef::U24(buf) => out.extend(
            buf.chan(0)
                .iter()
                .map(|s| s.inner() as i32 - 8_388_608),
        ),
        AudioBufferRef::U32(buf) => out.extend(
            buf.chan(0)
                .iter()
                .map(|&s| (s as i64 - 2_147_483_648) as i32),
        ),
        AudioBufferRef::S8(buf) => out.extend(buf.chan(0).iter().map(|&s| s as i32)),
        AudioBufferRef::S16(buf) => out.extend(buf.chan(0).iter().map(|&s| s as i32)),
        AudioBufferRef::S24(buf) => out.extend(buf.chan(0).iter().map(|s| s.inner())),
        AudioBufferRef::S32(buf) => out.extend_from_slice(buf.chan(0)),
        AudioBufferRef::F32(_) => return Err(Error::UnsupportedSampleFormat("32-bit float")),
        AudioBufferRef::F64(_) => return Err(Error::UnsupportedSampleFormat("64-bit float")),
    }
    Ok(())
}

/// Decode `path` and normalize it with an explicit bit depth.
///
/// Container metadata is not trusted for the depth; a disagreement is logged
/// and `bits` wins.
pub fn load_signal(path: &Path, bits: u32) -> Result<Signal> {
    let pcm = decode_pcm(path)?;
    if let Some(reported) = pcm.bits_per_sample {
        if reported != bits {
            log::warn!(
                "Container reports {}-bit samples, normalizing as {}-bit",
                reported,
                bits
            );
        }
    }
    Signal::from_pcm(&pcm.samples, pcm.sample_rate, bits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_wav(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("decode-{}-{}.wav", std::process::id(), name))
    }

    fn write_wav(path: &Path, channels: u16, samples: &[i16]) {
        let spec = hound::WavSpec {
            channels,
            sample_rate: 22050,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn decodes_raw_sixteen_bit_samples() {
        let path = temp_wav("mono16");
        let samples: Vec<i16> = vec![0, 1, -1, i16::MAX, i16::MIN, 1234];
        write_wav(&path, 1, &samples);

        let pcm = decode_pcm(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(pcm.sample_rate, 22050);
        assert_eq!(pcm.bits_per_sample, Some(16));
        assert_eq!(pcm.duration(), samples.len() as f64 / 22050.0);
        let expected: Vec<i32> = samples.iter().map(|&s| s as i32).collect();
        assert_eq!(pcm.samples, expected);
    }

    #[test]
    fn recentres_unsigned_eight_bit_samples() {
        let path = temp_wav("mono8");
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 8,
            sample_format: hound::SampleFormat::Int,
        };
        // hound stores 8-bit samples unsigned, offset by 128
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for s in [-128i8, -1, 0, 1, 127] {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();

        let pcm = decode_pcm(&path).unwrap();
        let signal = load_signal(&path, 8).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(pcm.bits_per_sample, Some(8));
        assert_eq!(pcm.samples, vec![-128, -1, 0, 1, 127]);
        assert_eq!(signal.samples()[0], -0.25);
        assert!(signal.samples().iter().all(|s| (-1.0..=1.0).contains(s)));
    }

    #[test]
    fn load_signal_normalizes() {
        let path = temp_wav("load");
        write_wav(&path, 1, &[16384, -16384]);

        let signal = load_signal(&path, 16).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(signal.samples(), &[0.125, -0.125]);
        assert_eq!(signal.sample_rate(), 22050);
    }

    #[test]
    fn rejects_stereo() {
        let path = temp_wav("stereo");
        write_wav(&path, 2, &[1, 2, 3, 4]);

        let err = decode_pcm(&path).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert!(matches!(err, Error::UnsupportedChannelCount(2)), "{err}");
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let err = decode_pcm(Path::new("does/not/exist.wav")).unwrap_err();
        assert!(matches!(err, Error::Open { .. }));
    }
}
