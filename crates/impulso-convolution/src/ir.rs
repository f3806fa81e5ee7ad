//! Immutable partitioned impulse response container.
//!
//! An [`IrData`] is built once per IR load by the
//! [`SpectralPartitioner`](crate::SpectralPartitioner), published through the
//! [`IrExchange`](crate::IrExchange), and shared read-only between the loader
//! and the audio thread. It is never mutated after construction.

use std::sync::atomic::{AtomicU64, Ordering};

use rustfft::num_complex::Complex;

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Partition layout of an IR: everything the engine sizes its buffers from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    /// Samples per time partition (power of two).
    pub partition_size: usize,
    /// Number of partitions (`ceil(ir_length / partition_size)`).
    pub num_partitions: usize,
}

impl Geometry {
    /// Transform length: `2 * partition_size`.
    #[inline]
    pub fn fft_size(&self) -> usize {
        2 * self.partition_size
    }

    /// Complex bins per stored spectrum: `partition_size + 1`.
    #[inline]
    pub fn bins(&self) -> usize {
        self.partition_size + 1
    }
}

/// Partitioned frequency-domain impulse response.
///
/// `partitions[channel][p]` is the spectrum of the `p`-th contiguous
/// `partition_size` chunk of that channel, zero-padded to `fft_size` before
/// the forward transform. Partition 0 is the earliest segment of the IR.
/// Spectra hold `fft_size / 2 + 1` complex bins.
#[derive(Debug)]
pub struct IrData {
    generation: u64,
    geometry: Geometry,
    fft_order: u32,
    ir_length: usize,
    source_sample_rate: Option<u32>,
    name: Option<String>,
    partitions: Vec<Vec<Vec<Complex<f32>>>>,
}

impl IrData {
    /// Assemble a container. Callers guarantee every channel holds exactly
    /// `geometry.num_partitions` spectra of `geometry.bins()` bins.
    pub(crate) fn new(
        geometry: Geometry,
        ir_length: usize,
        partitions: Vec<Vec<Vec<Complex<f32>>>>,
    ) -> Self {
        debug_assert!(
            partitions
                .iter()
                .all(|ch| ch.len() == geometry.num_partitions
                    && ch.iter().all(|s| s.len() == geometry.bins()))
        );
        Self {
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
            geometry,
            fft_order: geometry.fft_size().trailing_zeros(),
            ir_length,
            source_sample_rate: None,
            name: None,
            partitions,
        }
    }

    /// Attach the sample rate of the file the IR was decoded from.
    pub fn with_source_sample_rate(mut self, sample_rate: u32) -> Self {
        self.source_sample_rate = Some(sample_rate);
        self
    }

    /// Attach a display name (usually the file name).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Process-unique id; a new value for every container built.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Partition layout.
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Samples per partition.
    pub fn partition_size(&self) -> usize {
        self.geometry.partition_size
    }

    /// Transform length (`2 * partition_size`).
    pub fn fft_size(&self) -> usize {
        self.geometry.fft_size()
    }

    /// `log2(fft_size)`.
    pub fn fft_order(&self) -> u32 {
        self.fft_order
    }

    /// Number of partitions per channel.
    pub fn num_partitions(&self) -> usize {
        self.geometry.num_partitions
    }

    /// Number of IR channels.
    pub fn num_channels(&self) -> usize {
        self.partitions.len()
    }

    /// Original IR length in samples.
    pub fn ir_length(&self) -> usize {
        self.ir_length
    }

    /// Sample rate of the source file, when known.
    pub fn source_sample_rate(&self) -> Option<u32> {
        self.source_sample_rate
    }

    /// Display name, when known.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// `true` when there is nothing to convolve with.
    pub fn is_empty(&self) -> bool {
        self.geometry.num_partitions == 0 || self.partitions.is_empty()
    }

    /// IR channel used for audio channel `channel`.
    ///
    /// Audio channels beyond the IR's channel count reuse the last IR channel.
    #[inline]
    pub fn channel_for(&self, channel: usize) -> usize {
        channel.min(self.partitions.len().saturating_sub(1))
    }

    /// All partition spectra of one IR channel, earliest first.
    #[inline]
    pub fn channel_partitions(&self, channel: usize) -> &[Vec<Complex<f32>>] {
        &self.partitions[channel]
    }

    /// Spectrum of partition `index` of IR channel `channel`.
    #[inline]
    pub fn partition(&self, channel: usize, index: usize) -> &[Complex<f32>] {
        &self.partitions[channel][index]
    }
}
