//! Convolution reverb processor with smoothed host parameters.
//!
//! Wraps a [`ConvolutionEngine`] with the two user-facing controls, mix and
//! output trim, each behind a 20 ms [`SmoothedParam`]. Smoothing advances
//! once per block, so a parameter change ramps in over successive blocks
//! without per-sample work.

use std::sync::Arc;

use impulso_core::{
    BlockProcessor, ParamDescriptor, ParamId, ParameterInfo, SmoothedParam, gain,
};

use crate::engine::{ActiveIr, ConvolutionEngine};
use crate::exchange::IrExchange;
use crate::ir::IrData;

/// Parameter index of the wet/dry mix (percent).
pub const PARAM_MIX: usize = 0;
/// Parameter index of the output trim (dB).
pub const PARAM_OUTPUT: usize = 1;

/// Convolution reverb with mix and output trim parameters.
///
/// ## Parameters
/// - `Mix` (0–100 %, default 50)
/// - `Output` (-24 to +24 dB, default 0)
///
/// # Example
///
/// ```rust
/// use impulso_convolution::ConvolutionReverb;
/// use impulso_core::{BlockProcessor, ParameterInfo};
///
/// let mut reverb = ConvolutionReverb::new(48000.0);
/// reverb.prepare(48000.0, 512, 2);
///
/// let mix = reverb.find_param_by_name("mix").unwrap();
/// reverb.set_param(mix, 30.0);
/// assert_eq!(reverb.get_param(mix), 30.0);
/// ```
#[derive(Debug)]
pub struct ConvolutionReverb {
    engine: ConvolutionEngine,
    /// Mix as last set, in percent; the smoother holds the fraction.
    mix_pct: f32,
    mix: SmoothedParam,
    output: SmoothedParam,
}

impl ConvolutionReverb {
    /// Reverb with its own exchange.
    pub fn new(sample_rate: f32) -> Self {
        Self::with_exchange(sample_rate, Arc::new(IrExchange::new()))
    }

    /// Reverb reading from a shared exchange.
    pub fn with_exchange(sample_rate: f32, exchange: Arc<IrExchange>) -> Self {
        Self {
            engine: ConvolutionEngine::with_exchange(exchange),
            mix_pct: 50.0,
            mix: SmoothedParam::standard(0.5, sample_rate),
            output: gain::output_trim_param(sample_rate),
        }
    }

    /// The exchange the engine reads from.
    pub fn exchange(&self) -> &Arc<IrExchange> {
        self.engine.exchange()
    }

    /// Publish a new impulse response.
    pub fn set_ir(&self, ir: Arc<IrData>) {
        self.engine.set_ir(ir);
    }

    /// Identity of the IR in use.
    pub fn active_ir(&self) -> Option<ActiveIr> {
        self.engine.active_ir()
    }

    /// Set wet/dry mix (0.0–1.0).
    pub fn set_mix(&mut self, mix: f32) {
        let mix = if mix.is_nan() { 0.0 } else { mix.clamp(0.0, 1.0) };
        self.mix_pct = mix * 100.0;
        self.mix.set_target(mix);
    }

    /// Set output trim in dB.
    pub fn set_output_trim_db(&mut self, db: f32) {
        gain::set_output_trim_db(&mut self.output, db);
    }

    /// Jump both parameters to their targets (e.g. for offline rendering).
    pub fn snap_parameters(&mut self) {
        self.mix.snap_to_target();
        self.output.snap_to_target();
    }

    /// The wrapped engine.
    pub fn engine(&self) -> &ConvolutionEngine {
        &self.engine
    }
}

impl BlockProcessor for ConvolutionReverb {
    fn prepare(&mut self, sample_rate: f32, max_block_size: usize, num_channels: usize) {
        self.mix.set_sample_rate(sample_rate);
        self.output.set_sample_rate(sample_rate);
        self.engine.prepare(sample_rate, max_block_size, num_channels);
    }

    fn process(&mut self, buffer: &mut [&mut [f32]]) {
        let block = buffer.first().map_or(0, |ch| ch.len());
        self.engine.set_mix(self.mix.advance_by(block));
        self.engine.set_output_gain(self.output.advance_by(block));
        self.engine.process(buffer);
    }

    fn reset(&mut self) {
        self.engine.reset();
        self.snap_parameters();
    }
}

impl ParameterInfo for ConvolutionReverb {
    fn param_count(&self) -> usize {
        2
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            PARAM_MIX => Some(ParamDescriptor::mix().with_id(ParamId(1100), "conv_mix")),
            PARAM_OUTPUT => {
                Some(gain::output_param_descriptor().with_id(ParamId(1101), "conv_output"))
            }
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            PARAM_MIX => self.mix_pct,
            PARAM_OUTPUT => gain::output_trim_db(&self.output),
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        let Some(desc) = self.param_info(index) else {
            return;
        };
        let value = desc.clamp(value);
        match index {
            PARAM_MIX => {
                self.mix_pct = value;
                self.mix.set_target(value / 100.0);
            }
            PARAM_OUTPUT => self.set_output_trim_db(value),
            _ => {}
        }
    }
}
