//! WAV file reading and writing.
//!
//! Samples are exchanged as `f32` in `-1.0..=1.0`. Integer PCM is scaled by
//! `2^(bits-1)` on the way in and clamped on the way out. 32-bit files are
//! written as IEEE float, everything else as integer PCM.

use crate::{Error, Result};
use hound::{SampleFormat, WavReader, WavWriter};
use impulso_core::mono_sum;
use std::io::Read;
use std::path::Path;

/// WAV audio encoding format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavFormat {
    /// Linear PCM (integer samples).
    Pcm,
    /// IEEE 754 floating-point samples.
    IeeeFloat,
}

/// WAV file metadata extracted without loading sample data.
#[derive(Debug, Clone)]
pub struct WavInfo {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample.
    pub bits_per_sample: u16,
    /// Total number of sample frames (samples per channel).
    pub num_frames: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Audio encoding format.
    pub format: WavFormat,
}

/// Read WAV metadata without loading sample data.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let num_frames = reader.duration() as u64;
    let duration_secs = num_frames as f64 / spec.sample_rate as f64;

    let format = match spec.sample_format {
        SampleFormat::Float => WavFormat::IeeeFloat,
        SampleFormat::Int => WavFormat::Pcm,
    };

    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        num_frames,
        duration_secs,
        format,
    })
}

/// WAV file specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz (e.g., 44100, 48000).
    pub sample_rate: u32,
    /// Bit depth per sample (16, 24 or 32).
    pub bits_per_sample: u16,
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            channels: 1,
            sample_rate: 48000,
            bits_per_sample: 32,
        }
    }
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: if spec.bits_per_sample == 32 {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        }
    }
}

fn read_interleaved<R: Read>(reader: WavReader<R>) -> Result<Vec<f32>> {
    let spec = reader.spec();
    match spec.sample_format {
        SampleFormat::Float => Ok(reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?),
        SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            Ok(reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?)
        }
    }
}

fn check_writable(spec: WavSpec) -> Result<()> {
    if spec.channels == 0 {
        return Err(Error::UnsupportedFormat("zero channels".to_string()));
    }
    match spec.bits_per_sample {
        16 | 24 | 32 => Ok(()),
        bits => Err(Error::UnsupportedFormat(format!("{bits}-bit output"))),
    }
}

fn write_interleaved<P: AsRef<Path>>(
    path: P,
    spec: WavSpec,
    frames: usize,
    sample_at: impl Fn(usize, usize) -> f32,
) -> Result<()> {
    check_writable(spec)?;
    let channels = spec.channels as usize;
    let mut writer = WavWriter::create(path, hound::WavSpec::from(spec))?;

    if spec.bits_per_sample == 32 {
        for frame in 0..frames {
            for ch in 0..channels {
                writer.write_sample(sample_at(frame, ch))?;
            }
        }
    } else {
        let max_val = (1i32 << (spec.bits_per_sample - 1)) as f32;
        for frame in 0..frames {
            for ch in 0..channels {
                let sample = sample_at(frame, ch);
                let int_sample = (sample * max_val).clamp(-max_val, max_val - 1.0) as i32;
                writer.write_sample(int_sample)?;
            }
        }
    }

    writer.finalize()?;
    Ok(())
}

/// Read a WAV file and return samples as f32 along with the spec.
///
/// Multi-channel files are mixed down to mono by averaging channels.
///
/// # Example
/// ```ignore
/// let (samples, spec) = read_wav("impulse.wav")?;
/// println!("Loaded {} samples at {} Hz", samples.len(), spec.sample_rate);
/// ```
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(Vec<f32>, WavSpec)> {
    let reader = WavReader::open(path)?;
    let spec = WavSpec::from(reader.spec());
    let channels = spec.channels.max(1) as usize;
    let samples = read_interleaved(reader)?;

    let mono = if channels > 1 {
        samples.chunks_exact(channels).map(mono_sum).collect()
    } else {
        samples
    };

    Ok((mono, spec))
}

/// Read a WAV file as one `Vec<f32>` per channel.
///
/// A trailing partial frame (truncated file) is dropped.
pub fn read_wav_planar<P: AsRef<Path>>(path: P) -> Result<(Vec<Vec<f32>>, WavSpec)> {
    let reader = WavReader::open(path)?;
    let spec = WavSpec::from(reader.spec());
    let channels = spec.channels.max(1) as usize;
    let samples = read_interleaved(reader)?;

    let frames = samples.len() / channels;
    let mut planar = vec![Vec::with_capacity(frames); channels];
    for frame in samples.chunks_exact(channels) {
        for (channel, &sample) in planar.iter_mut().zip(frame) {
            channel.push(sample);
        }
    }

    Ok((planar, spec))
}

/// Write mono samples to a WAV file.
///
/// `spec.channels` is forced to 1.
///
/// # Example
/// ```ignore
/// let samples = vec![0.0f32; 48000]; // 1 second of silence
/// let spec = WavSpec { sample_rate: 48000, ..Default::default() };
/// write_wav("output.wav", &samples, spec)?;
/// ```
pub fn write_wav<P: AsRef<Path>>(path: P, samples: &[f32], spec: WavSpec) -> Result<()> {
    let spec = WavSpec { channels: 1, ..spec };
    write_interleaved(path, spec, samples.len(), |frame, _| samples[frame])
}

/// Write planar channels to a WAV file.
///
/// The channel count comes from `channels.len()`; shorter channels are padded
/// with silence up to the longest.
pub fn write_wav_planar<P: AsRef<Path>, S: AsRef<[f32]>>(
    path: P,
    channels: &[S],
    spec: WavSpec,
) -> Result<()> {
    let count = u16::try_from(channels.len())
        .map_err(|_| Error::UnsupportedFormat(format!("{} channels", channels.len())))?;
    let spec = WavSpec {
        channels: count,
        ..spec
    };
    let frames = channels
        .iter()
        .map(|c| c.as_ref().len())
        .max()
        .unwrap_or(0);

    write_interleaved(path, spec, frames, |frame, ch| {
        channels[ch].as_ref().get(frame).copied().unwrap_or(0.0)
    })
}
