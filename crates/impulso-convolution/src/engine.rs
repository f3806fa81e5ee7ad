//! Real-time uniform partitioned convolution.
//!
//! Each channel keeps a ring of input spectra, one slot per IR partition.
//! Input is collected into a partition-sized block; every incoming chunk
//! updates the transform of the (partially filled) current block, multiplies
//! it against partition 0 of the IR, and adds the cached contribution of all
//! earlier blocks against partitions `1..N`. The inverse transform's second
//! half becomes the overlap tail once the block is complete.
//!
//! Because the current block is re-transformed for every chunk, the output
//! is sample-exact for any host block size with zero added latency, and the
//! history sum is computed once per partition rather than once per chunk.
//!
//! ## Geometry changes
//!
//! - Partition size changed: all rings, input blocks and overlap tails are
//!   reallocated and cleared.
//! - Only the partition count changed: the ring is re-indexed, keeping the
//!   most recent input spectra and the overlap tail.
//!
//! Both happen lazily inside [`ConvolutionEngine::process`] the first time a
//! new geometry is seen, and eagerly in [`ConvolutionEngine::prepare`].

use std::sync::Arc;

use impulso_core::{BlockProcessor, flush_denormal, gain, wet_dry_mix};
use rustfft::num_complex::Complex;

use crate::exchange::IrExchange;
use crate::fft::{SpectralFft, complex_multiply_accumulate};
use crate::ir::{Geometry, IrData};

const ZERO: Complex<f32> = Complex { re: 0.0, im: 0.0 };

/// Identity of the IR the engine last processed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveIr {
    /// [`IrData::generation`] of the container.
    pub generation: u64,
    /// Partition layout the engine buffers are sized for.
    pub geometry: Geometry,
}

#[derive(Debug, Clone)]
struct ChannelState {
    /// Current partial input block.
    input_block: Vec<f32>,
    /// Samples of `input_block` filled so far.
    fill: usize,
    /// Spectra of the most recent input blocks.
    ring: Vec<Vec<Complex<f32>>>,
    /// Slot holding the current block's spectrum.
    write_pos: usize,
    /// Second half of the previous block's inverse transform.
    overlap: Vec<f32>,
    /// Sum of `ring[write_pos - p] * H[p]` for `p` in `1..N`.
    history: Vec<Complex<f32>>,
    history_valid: bool,
}

impl ChannelState {
    fn new(geometry: Geometry) -> Self {
        let bins = geometry.bins();
        Self {
            input_block: vec![0.0; geometry.partition_size],
            fill: 0,
            ring: vec![vec![ZERO; bins]; geometry.num_partitions],
            write_pos: 0,
            overlap: vec![0.0; geometry.partition_size],
            history: vec![ZERO; bins],
            history_valid: false,
        }
    }

    fn clear(&mut self) {
        self.input_block.fill(0.0);
        self.fill = 0;
        for slot in &mut self.ring {
            slot.fill(ZERO);
        }
        self.write_pos = 0;
        self.overlap.fill(0.0);
        self.history_valid = false;
    }

    /// Change the ring length, keeping the current slot and the most recent
    /// history.
    fn resize_ring(&mut self, num_partitions: usize) {
        let old = self.ring.len();
        if old == num_partitions {
            return;
        }
        let bins = self.history.len();
        if old == 0 {
            self.ring = vec![vec![ZERO; bins]; num_partitions];
            self.write_pos = 0;
            self.history_valid = false;
            return;
        }

        // Current slot at 0, the block `k` behind at `len - k`.
        self.ring.rotate_left(self.write_pos);
        if num_partitions < old {
            self.ring.drain(1..1 + (old - num_partitions));
        } else {
            let added = num_partitions - old;
            self.ring
                .splice(1..1, (0..added).map(|_| vec![ZERO; bins]));
            // At a block boundary the current slot still holds the block
            // `old` behind; the longer ring has room for it.
            if self.fill == 0 {
                self.ring.swap(0, added);
            }
        }
        self.write_pos = 0;
        self.history_valid = false;
    }
}

/// Shared per-engine work buffers.
#[derive(Debug, Clone)]
struct Workspace {
    fft: SpectralFft,
    time: Vec<f32>,
    accum: Vec<Complex<f32>>,
}

impl Workspace {
    fn new(geometry: Geometry) -> Self {
        Self {
            fft: SpectralFft::new(geometry.fft_size()),
            time: vec![0.0; geometry.fft_size()],
            accum: vec![ZERO; geometry.bins()],
        }
    }
}

/// Partitioned overlap-add convolution engine.
///
/// Reads its impulse response from an [`IrExchange`] once per block; publish
/// to the exchange from any thread to swap the IR. With no IR (or an empty
/// one) the buffer is left untouched.
///
/// ## Parameters
/// - `wet_mix`: 0.0 (dry) to 1.0 (wet), default 0.5
/// - `output_trim_db`: -24.0 to +24.0 dB, default 0.0
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use impulso_convolution::{ConvolutionEngine, SpectralPartitioner};
///
/// let mut engine = ConvolutionEngine::new();
/// engine.set_mix(1.0);
///
/// let mut partitioner = SpectralPartitioner::with_partition_size(4).unwrap();
/// engine.set_ir(Arc::new(partitioner.build_mono(&[1.0, 0.5]).unwrap()));
///
/// let mut block = [1.0, 0.0, 0.0];
/// engine.process(&mut [&mut block]);
/// assert!((block[1] - 0.5).abs() < 1e-6);
/// ```
#[derive(Debug)]
pub struct ConvolutionEngine {
    exchange: Arc<IrExchange>,
    channels: Vec<ChannelState>,
    workspace: Option<Workspace>,
    active: Option<ActiveIr>,
    wet_mix: f32,
    output_gain: f32,
}

impl Default for ConvolutionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ConvolutionEngine {
    /// Engine with its own, empty exchange.
    pub fn new() -> Self {
        Self::with_exchange(Arc::new(IrExchange::new()))
    }

    /// Engine reading from a shared exchange.
    pub fn with_exchange(exchange: Arc<IrExchange>) -> Self {
        Self {
            exchange,
            channels: Vec::new(),
            workspace: None,
            active: None,
            wet_mix: 0.5,
            output_gain: 1.0,
        }
    }

    /// The exchange this engine reads from. Hand a clone to the loader.
    pub fn exchange(&self) -> &Arc<IrExchange> {
        &self.exchange
    }

    /// Publish `ir` to this engine's exchange.
    pub fn set_ir(&self, ir: Arc<IrData>) {
        self.exchange.publish(ir);
    }

    /// Set the wet/dry blend, clamped to `0.0..=1.0`.
    pub fn set_mix(&mut self, mix: f32) {
        self.wet_mix = if mix.is_nan() { 0.0 } else { mix.clamp(0.0, 1.0) };
    }

    /// Current wet/dry blend.
    pub fn wet_mix(&self) -> f32 {
        self.wet_mix
    }

    /// Set the output trim in dB (clamped to the trim range).
    pub fn set_output_trim_db(&mut self, db: f32) {
        self.output_gain = gain::trim_to_gain(db);
    }

    /// Set the post-mix gain directly (linear).
    pub fn set_output_gain(&mut self, gain: f32) {
        self.output_gain = gain;
    }

    /// Current post-mix gain (linear).
    pub fn output_gain(&self) -> f32 {
        self.output_gain
    }

    /// Identity and geometry of the IR the engine last processed with.
    pub fn active_ir(&self) -> Option<ActiveIr> {
        self.active
    }

    /// Bring buffers in line with `ir`. Allocates on geometry change.
    fn sync_to(&mut self, ir: &IrData, num_channels: usize) {
        let geometry = ir.geometry();
        let previous = self.active.map(|a| a.geometry);

        match previous {
            Some(prev) if prev.partition_size == geometry.partition_size => {
                if prev.num_partitions != geometry.num_partitions {
                    for state in &mut self.channels {
                        state.resize_ring(geometry.num_partitions);
                    }
                }
            }
            _ => {
                self.workspace = Some(Workspace::new(geometry));
                self.channels.clear();
            }
        }

        while self.channels.len() < num_channels {
            self.channels.push(ChannelState::new(geometry));
        }

        if self.active.map(|a| a.generation) != Some(ir.generation()) {
            for state in &mut self.channels {
                state.history_valid = false;
            }
        }

        self.active = Some(ActiveIr {
            generation: ir.generation(),
            geometry,
        });
    }

    /// Convolve `buffer` in place.
    pub fn process(&mut self, buffer: &mut [&mut [f32]]) {
        let guard = self.exchange.load();
        let current: &Option<Arc<IrData>> = &guard;
        let Some(ir) = current.as_ref().filter(|ir| !ir.is_empty()) else {
            return;
        };

        self.sync_to(ir, buffer.len());

        let Some(workspace) = self.workspace.as_mut() else {
            return;
        };
        let mix = self.wet_mix;
        let gain = self.output_gain;

        for (ch, samples) in buffer.iter_mut().enumerate() {
            let state = &mut self.channels[ch];
            let partitions = ir.channel_partitions(ir.channel_for(ch));
            let size = state.input_block.len();

            let mut offset = 0;
            while offset < samples.len() {
                let len = (size - state.fill).min(samples.len() - offset);
                let chunk = &mut samples[offset..offset + len];
                process_chunk(state, workspace, partitions, chunk, mix, gain);
                offset += len;
            }
        }
    }
}

/// Feed one chunk that fits in the remaining space of the current block.
fn process_chunk(
    state: &mut ChannelState,
    ws: &mut Workspace,
    partitions: &[Vec<Complex<f32>>],
    chunk: &mut [f32],
    mix: f32,
    gain: f32,
) {
    let size = state.input_block.len();
    let n = state.ring.len();
    let fill = state.fill;
    let len = chunk.len();

    state.input_block[fill..fill + len].copy_from_slice(chunk);

    if convolve_block(state, ws, partitions, fill == 0).is_ok() {
        for (i, sample) in chunk.iter_mut().enumerate() {
            let wet = ws.time[fill + i] + state.overlap[fill + i];
            *sample = gain * wet_dry_mix(*sample, wet, mix);
        }
    }

    state.fill += len;
    if state.fill == size {
        for (o, &t) in state.overlap.iter_mut().zip(&ws.time[size..]) {
            *o = flush_denormal(t);
        }
        state.input_block.fill(0.0);
        state.fill = 0;
        state.write_pos = (state.write_pos + 1) % n;
    }
}

/// Transform the current block and leave the time-domain result in `ws.time`.
fn convolve_block(
    state: &mut ChannelState,
    ws: &mut Workspace,
    partitions: &[Vec<Complex<f32>>],
    new_block: bool,
) -> Result<(), realfft::FftError> {
    let size = state.input_block.len();
    let n = state.ring.len();
    let wp = state.write_pos;

    ws.time[..size].copy_from_slice(&state.input_block);
    ws.time[size..].fill(0.0);
    ws.fft.forward(&mut ws.time, &mut state.ring[wp])?;

    if new_block || !state.history_valid {
        state.history.fill(ZERO);
        for (p, h) in partitions.iter().enumerate().take(n).skip(1) {
            let slot = (wp + n - p) % n;
            complex_multiply_accumulate(&mut state.history, &state.ring[slot], h);
        }
        state.history_valid = true;
    }

    ws.accum.copy_from_slice(&state.history);
    complex_multiply_accumulate(&mut ws.accum, &state.ring[wp], &partitions[0]);
    ws.fft.inverse(&mut ws.accum, &mut ws.time)
}

impl BlockProcessor for ConvolutionEngine {
    fn prepare(&mut self, _sample_rate: f32, _max_block_size: usize, num_channels: usize) {
        self.channels.clear();
        self.workspace = None;
        self.active = None;

        if let Some(ir) = self.exchange.load_full().filter(|ir| !ir.is_empty()) {
            self.sync_to(&ir, num_channels);
            tracing::debug!(
                num_channels,
                partition_size = ir.partition_size(),
                num_partitions = ir.num_partitions(),
                "engine buffers sized"
            );
        }
    }

    fn process(&mut self, buffer: &mut [&mut [f32]]) {
        ConvolutionEngine::process(self, buffer);
    }

    fn reset(&mut self) {
        for state in &mut self.channels {
            state.clear();
        }
    }
}
