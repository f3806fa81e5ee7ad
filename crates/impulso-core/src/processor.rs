//! Block processing contract between hosts and processors.
//!
//! The [`BlockProcessor`] trait is the single seam between a host shell
//! (plugin wrapper, offline renderer, test harness) and a processor such as
//! the convolution engine. It replaces an inheritance-style effect hierarchy
//! with one capability: "process this block in place".
//!
//! ## Design Decisions
//!
//! - **Planar buffers**: One contiguous slice per channel. Channels may be
//!   processed independently, and hosts rarely interleave internally.
//!
//! - **In place**: The output overwrites the input. Processors that need the
//!   dry signal capture it themselves before writing.
//!
//! - **Prepare before streaming**: All allocation happens in
//!   [`prepare`](BlockProcessor::prepare). `process` must not allocate for the
//!   geometry it was prepared with.

/// Core trait for planar, in-place block processors.
///
/// # Example
///
/// ```rust
/// use impulso_core::BlockProcessor;
///
/// struct Gain {
///     gain: f32,
/// }
///
/// impl BlockProcessor for Gain {
///     fn prepare(&mut self, _sample_rate: f32, _max_block_size: usize, _num_channels: usize) {}
///
///     fn process(&mut self, buffer: &mut [&mut [f32]]) {
///         for channel in buffer.iter_mut() {
///             for sample in channel.iter_mut() {
///                 *sample *= self.gain;
///             }
///         }
///     }
///
///     fn reset(&mut self) {}
/// }
///
/// let mut gain = Gain { gain: 0.5 };
/// let mut left = [1.0, 2.0];
/// let mut right = [4.0, 8.0];
/// gain.process(&mut [&mut left, &mut right]);
/// assert_eq!(left, [0.5, 1.0]);
/// assert_eq!(right, [2.0, 4.0]);
/// ```
pub trait BlockProcessor {
    /// Configure for a stream.
    ///
    /// Called before streaming starts and whenever the host changes sample
    /// rate, maximum block size, or channel count. Implementations allocate
    /// every buffer they will need here.
    ///
    /// # Arguments
    /// * `sample_rate` - Stream sample rate in Hz
    /// * `max_block_size` - Largest `numSamples` the host will pass to `process`
    /// * `num_channels` - Number of planar channels the host will pass
    fn prepare(&mut self, sample_rate: f32, max_block_size: usize, num_channels: usize);

    /// Process one block in place.
    ///
    /// `buffer` holds one slice per channel; all slices have the same length.
    fn process(&mut self, buffer: &mut [&mut [f32]]);

    /// Reset internal state.
    ///
    /// Clears history (overlap tails, input rings) without changing
    /// parameters. Called when the transport stops or the processor is
    /// re-enabled after bypass.
    fn reset(&mut self);

    /// Report processing latency in samples.
    ///
    /// Default returns 0 (no latency).
    fn latency_samples(&self) -> usize {
        0
    }
}

impl<T: BlockProcessor + ?Sized> BlockProcessor for &mut T {
    fn prepare(&mut self, sample_rate: f32, max_block_size: usize, num_channels: usize) {
        (**self).prepare(sample_rate, max_block_size, num_channels);
    }

    fn process(&mut self, buffer: &mut [&mut [f32]]) {
        (**self).process(buffer);
    }

    fn reset(&mut self) {
        (**self).reset();
    }

    fn latency_samples(&self) -> usize {
        (**self).latency_samples()
    }
}
