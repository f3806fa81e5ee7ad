//! Offline impulse response partitioning.
//!
//! Splits an IR into `partition_size` chunks, zero-pads each to
//! `2 * partition_size`, and stores the forward transform of each. The
//! doubled transform length leaves room for the full linear convolution of a
//! partition against an input block of the same size, so no circular
//! wrap-around reaches the output.
//!
//! Runs on the loader thread; it allocates freely.

use rustfft::num_complex::Complex;

use crate::error::PartitionError;
use crate::fft::SpectralFft;
use crate::ir::{Geometry, IrData};

/// Smallest partition size derived from a host block size.
pub const MIN_PARTITION_SIZE: usize = 256;

/// Partition size for a host block size: next power of two, floored at
/// [`MIN_PARTITION_SIZE`].
///
/// ```rust
/// use impulso_convolution::partition_size_for_block;
///
/// assert_eq!(partition_size_for_block(64), 256);
/// assert_eq!(partition_size_for_block(480), 512);
/// assert_eq!(partition_size_for_block(1024), 1024);
/// ```
pub fn partition_size_for_block(block_size: usize) -> usize {
    block_size.max(1).next_power_of_two().max(MIN_PARTITION_SIZE)
}

/// Builds [`IrData`] containers for one partition size.
///
/// Reuse one partitioner for several IRs of the same geometry to keep the
/// FFT plan.
#[derive(Debug, Clone)]
pub struct SpectralPartitioner {
    partition_size: usize,
    fft: SpectralFft,
    time_buffer: Vec<f32>,
}

impl SpectralPartitioner {
    /// Partitioner for a host block size (see [`partition_size_for_block`]).
    pub fn new(block_size: usize) -> Self {
        let partition_size = partition_size_for_block(block_size);
        Self::build_for(partition_size)
    }

    /// Partitioner with an explicit partition size.
    ///
    /// Any non-zero power of two is accepted; the [`MIN_PARTITION_SIZE`]
    /// floor only applies when deriving the size from a block size.
    pub fn with_partition_size(partition_size: usize) -> Result<Self, PartitionError> {
        if partition_size == 0 || !partition_size.is_power_of_two() {
            return Err(PartitionError::InvalidPartitionSize(partition_size));
        }
        Ok(Self::build_for(partition_size))
    }

    /// Single-partition layout covering an IR of `ir_length` samples.
    ///
    /// This is whole-IR FFT convolution expressed as the degenerate
    /// `num_partitions == 1` case of the partitioned scheme.
    pub fn whole_response(ir_length: usize) -> Self {
        Self::build_for(ir_length.max(1).next_power_of_two())
    }

    fn build_for(partition_size: usize) -> Self {
        let fft_size = 2 * partition_size;
        Self {
            partition_size,
            fft: SpectralFft::new(fft_size),
            time_buffer: vec![0.0; fft_size],
        }
    }

    /// Samples per partition.
    pub fn partition_size(&self) -> usize {
        self.partition_size
    }

    /// Transform length.
    pub fn fft_size(&self) -> usize {
        2 * self.partition_size
    }

    /// Number of partitions an IR of `ir_length` samples needs.
    pub fn num_partitions_for(&self, ir_length: usize) -> usize {
        ir_length.div_ceil(self.partition_size)
    }

    /// Build a single-channel container.
    pub fn build_mono(&mut self, impulse: &[f32]) -> Result<IrData, PartitionError> {
        self.build(&[impulse])
    }

    /// Build a container with one IR channel per input slice.
    ///
    /// Channels shorter than the longest are zero-padded so every channel
    /// has the same partition count.
    pub fn build<S: AsRef<[f32]>>(&mut self, channels: &[S]) -> Result<IrData, PartitionError> {
        if channels.is_empty() {
            return Err(PartitionError::NoChannels);
        }
        let ir_length = channels
            .iter()
            .map(|c| c.as_ref().len())
            .max()
            .unwrap_or(0);
        if ir_length == 0 {
            return Err(PartitionError::EmptyImpulse);
        }
        for (channel, samples) in channels.iter().enumerate() {
            if let Some(index) = samples.as_ref().iter().position(|s| !s.is_finite()) {
                return Err(PartitionError::NonFiniteSample { channel, index });
            }
        }

        let geometry = Geometry {
            partition_size: self.partition_size,
            num_partitions: self.num_partitions_for(ir_length),
        };

        let mut spectra = Vec::with_capacity(channels.len());
        for samples in channels {
            spectra.push(self.partition_channel(samples.as_ref(), geometry.num_partitions)?);
        }

        tracing::debug!(
            ir_length,
            channels = channels.len(),
            partition_size = geometry.partition_size,
            num_partitions = geometry.num_partitions,
            "partitioned impulse response"
        );

        Ok(IrData::new(geometry, ir_length, spectra))
    }

    fn partition_channel(
        &mut self,
        samples: &[f32],
        num_partitions: usize,
    ) -> Result<Vec<Vec<Complex<f32>>>, PartitionError> {
        let size = self.partition_size;
        let mut out = Vec::with_capacity(num_partitions);

        for p in 0..num_partitions {
            let start = (p * size).min(samples.len());
            let end = (start + size).min(samples.len());
            let chunk = &samples[start..end];

            self.time_buffer.fill(0.0);
            self.time_buffer[..chunk.len()].copy_from_slice(chunk);

            let mut spectrum = vec![Complex::new(0.0, 0.0); self.fft.bins()];
            self.fft.forward(&mut self.time_buffer, &mut spectrum)?;
            out.push(spectrum);
        }

        Ok(out)
    }
}
