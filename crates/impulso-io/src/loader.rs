//! Impulse response file loading.
//!
//! Decodes a WAV file, reduces or keeps its channels per [`ChannelMode`], and
//! partitions the result for the engine's block size. Runs off the audio
//! thread; everything here allocates.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

use impulso_convolution::{IrData, SpectralPartitioner};
use impulso_core::mono_sum;

use crate::wav::read_wav_planar;
use crate::{Error, Result};

/// How a multi-channel IR file maps onto IR channels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChannelMode {
    /// Average all channels into one IR, used for every audio channel.
    #[default]
    Mono,
    /// One IR channel per file channel; audio channels beyond the file's
    /// channel count reuse the last one.
    PerChannel,
}

impl ChannelMode {
    /// Stable lowercase name (`"mono"`, `"per-channel"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelMode::Mono => "mono",
            ChannelMode::PerChannel => "per-channel",
        }
    }
}

impl fmt::Display for ChannelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mono" => Ok(ChannelMode::Mono),
            "per-channel" | "per_channel" | "stereo" => Ok(ChannelMode::PerChannel),
            other => Err(format!("unknown channel mode '{other}'")),
        }
    }
}

/// Builds [`IrData`] from files or decoded samples.
///
/// # Example
///
/// ```rust
/// use impulso_io::{ChannelMode, IrLoader};
///
/// let loader = IrLoader::new(480).with_channel_mode(ChannelMode::PerChannel);
/// let ir = loader
///     .load_samples(&[vec![1.0, 0.5], vec![0.5, 0.25]], None)
///     .unwrap();
/// assert_eq!(ir.num_channels(), 2);
/// assert_eq!(ir.partition_size(), 512);
/// ```
#[derive(Debug, Clone)]
pub struct IrLoader {
    block_size: usize,
    partition_size: Option<usize>,
    sample_rate: Option<u32>,
    channel_mode: ChannelMode,
}

impl IrLoader {
    /// Loader for an engine running at `block_size`.
    pub fn new(block_size: usize) -> Self {
        Self {
            block_size,
            partition_size: None,
            sample_rate: None,
            channel_mode: ChannelMode::Mono,
        }
    }

    /// Engine sample rate; files at another rate load with a warning.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = Some(sample_rate);
        self
    }

    /// Channel handling for multi-channel files.
    pub fn with_channel_mode(mut self, mode: ChannelMode) -> Self {
        self.channel_mode = mode;
        self
    }

    /// Override the partition size derived from the block size.
    pub fn with_partition_size(mut self, partition_size: usize) -> Self {
        self.partition_size = Some(partition_size);
        self
    }

    /// Block size the partition size is derived from.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Configured channel mode.
    pub fn channel_mode(&self) -> ChannelMode {
        self.channel_mode
    }

    fn partitioner(&self) -> Result<SpectralPartitioner> {
        match self.partition_size {
            Some(size) => Ok(SpectralPartitioner::with_partition_size(size)?),
            None => Ok(SpectralPartitioner::new(self.block_size)),
        }
    }

    /// Decode and partition an IR file.
    ///
    /// Fails without side effects: nothing is published here.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<IrData> {
        let path = path.as_ref();
        let start = Instant::now();
        tracing::info!(path = %path.display(), "loading impulse response");

        let (channels, spec) = read_wav_planar(path)?;
        if channels.iter().all(|c| c.is_empty()) {
            return Err(Error::EmptyFile(path.to_path_buf()));
        }

        let mut ir = self.load_samples(&channels, Some(spec.sample_rate))?;
        if let Some(name) = path.file_name() {
            ir = ir.with_name(name.to_string_lossy());
        }

        tracing::info!(
            path = %path.display(),
            ir_length = ir.ir_length(),
            channels = ir.num_channels(),
            partitions = ir.num_partitions(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "impulse response ready"
        );
        Ok(ir)
    }

    /// Partition already-decoded planar samples.
    ///
    /// `source_rate` is the rate the samples were recorded at, when known.
    pub fn load_samples<S: AsRef<[f32]>>(
        &self,
        channels: &[S],
        source_rate: Option<u32>,
    ) -> Result<IrData> {
        if let (Some(file_rate), Some(engine_rate)) = (source_rate, self.sample_rate)
            && file_rate != engine_rate
        {
            tracing::warn!(
                file_rate,
                engine_rate,
                "impulse response sample rate differs from engine rate; using it unresampled"
            );
        }

        let mut partitioner = self.partitioner()?;
        let ir = match self.channel_mode {
            ChannelMode::Mono if channels.len() > 1 => {
                partitioner.build_mono(&mix_to_mono(channels))?
            }
            _ => partitioner.build(channels)?,
        };

        Ok(match source_rate {
            Some(rate) => ir.with_source_sample_rate(rate),
            None => ir,
        })
    }
}

/// Average planar channels frame by frame.
fn mix_to_mono<S: AsRef<[f32]>>(channels: &[S]) -> Vec<f32> {
    let frames = channels
        .iter()
        .map(|c| c.as_ref().len())
        .max()
        .unwrap_or(0);
    let mut frame = vec![0.0; channels.len()];
    (0..frames)
        .map(|i| {
            for (slot, channel) in frame.iter_mut().zip(channels) {
                *slot = channel.as_ref().get(i).copied().unwrap_or(0.0);
            }
            mono_sum(&frame)
        })
        .collect()
}
