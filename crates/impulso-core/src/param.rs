//! Parameter handling with smoothing for zipper-free changes.
//!
//! Audio parameters (mix, trim) need smooth transitions to avoid audible
//! "zipper noise" when a host automates them. [`SmoothedParam`] provides
//! sample-accurate one-pole smoothing.
//!
//! ## Usage
//!
//! ```rust
//! use impulso_core::SmoothedParam;
//!
//! let mut mix = SmoothedParam::standard(1.0, 48000.0);
//! mix.set_target(0.5);
//!
//! // In the audio callback, advance once per sample
//! for _ in 0..480 {
//!     let _smoothed = mix.advance();
//! }
//! assert!(mix.get() < 1.0);
//! ```

use libm::expf;

/// Smoothing time used by the convolution reverb for mix and trim (ms).
pub const STANDARD_SMOOTHING_MS: f32 = 20.0;

/// A parameter with built-in smoothing for zipper-free changes.
///
/// Uses exponential smoothing (one-pole lowpass), which provides
/// natural-sounding transitions for gain-like parameters.
#[derive(Debug, Clone)]
pub struct SmoothedParam {
    /// Current smoothed value
    current: f32,
    /// Target value we're smoothing towards
    target: f32,
    /// Smoothing coefficient (1 = instant, ~0 = very slow)
    coeff: f32,
    /// Sample rate in Hz
    sample_rate: f32,
    /// Smoothing time in milliseconds
    smoothing_time_ms: f32,
}

impl SmoothedParam {
    /// Create a new smoothed parameter with initial value.
    ///
    /// Smoothing is disabled (instant changes); use [`standard`](Self::standard)
    /// for the smoothed variant.
    pub fn new(initial: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            coeff: 1.0,
            sample_rate: 44100.0,
            smoothing_time_ms: 0.0,
        }
    }

    fn with_config(initial: f32, sample_rate: f32, smoothing_time_ms: f32) -> Self {
        let mut param = Self::new(initial);
        param.sample_rate = sample_rate;
        param.smoothing_time_ms = smoothing_time_ms;
        param.recalculate_coeff();
        param
    }

    /// Create a parameter with [`STANDARD_SMOOTHING_MS`] smoothing.
    pub fn standard(initial: f32, sample_rate: f32) -> Self {
        Self::with_config(initial, sample_rate, STANDARD_SMOOTHING_MS)
    }

    /// Set the target value (parameter will smooth towards this).
    #[inline]
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Update sample rate and recalculate smoothing coefficient.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate_coeff();
    }

    /// Get the next smoothed value (advances by one sample).
    #[inline]
    pub fn advance(&mut self) -> f32 {
        // y[n] = y[n-1] + coeff * (target - y[n-1])
        self.current += self.coeff * (self.target - self.current);
        self.current
    }

    /// Advance by `samples` steps and return the resulting value.
    ///
    /// Used by block processors that apply one value per block.
    #[inline]
    pub fn advance_by(&mut self, samples: usize) -> f32 {
        if self.is_settled() {
            self.snap_to_target();
            return self.current;
        }
        for _ in 0..samples {
            self.advance();
        }
        self.current
    }

    /// Get the current smoothed value without advancing.
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }

    /// Get the target value.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    #[inline]
    fn is_settled(&self) -> bool {
        (self.current - self.target).abs() < 1e-6
    }

    /// Skip ahead to the target value immediately.
    #[inline]
    pub fn snap_to_target(&mut self) {
        self.current = self.target;
    }

    /// `coeff = 1 - exp(-1 / (tau * sample_rate))`, with `tau` the smoothing
    /// time in seconds. After 5 tau the value is within 0.7% of the target.
    fn recalculate_coeff(&mut self) {
        if self.smoothing_time_ms <= 0.0 || self.sample_rate <= 0.0 {
            self.coeff = 1.0;
        } else {
            let samples = self.smoothing_time_ms / 1000.0 * self.sample_rate;
            self.coeff = 1.0 - expf(-1.0 / samples);
        }
    }
}

impl Default for SmoothedParam {
    fn default() -> Self {
        Self::new(0.0)
    }
}
