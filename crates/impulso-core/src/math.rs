//! Mathematical utility functions for DSP.
//!
//! All functions are allocation-free and suitable for `no_std`.
//!
//! # Level Conversions
//!
//! - [`db_to_linear`] / [`linear_to_db`] - Convert between dB and linear gain
//!
//! # Mixing
//!
//! - [`wet_dry_mix`] - Linear blend between an unprocessed and a processed sample
//! - [`mono_sum`] - Average of several channel samples
//!
//! # Utilities
//!
//! - [`flush_denormal`] - Snap tiny magnitudes to zero

use libm::{expf, logf};

/// Convert decibels to linear gain.
///
/// # Arguments
/// * `db` - Value in decibels
///
/// # Returns
/// Linear gain value (e.g., 0 dB → 1.0, -6 dB → 0.5, +6 dB → 2.0)
///
/// # Example
/// ```rust
/// use impulso_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels.
///
/// Inputs at or below zero are floored at -200 dB.
///
/// # Example
/// ```rust
/// use impulso_core::linear_to_db;
///
/// assert!((linear_to_db(1.0) - 0.0).abs() < 0.001);
/// assert!((linear_to_db(0.5) - (-6.02)).abs() < 0.01);
/// ```
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    // 20 * log10(linear) = 20 * ln(linear) / ln(10)
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    logf(linear.max(1e-10)) * FACTOR
}

/// Flush denormal numbers to zero.
///
/// Long reverb tails decay into the denormal range where some CPUs slow
/// down by orders of magnitude.
#[inline]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Blend dry and wet signals.
///
/// Computes `mix * wet + (1 - mix) * dry`. Both endpoints are exact:
/// `mix = 0` returns `dry` bit-for-bit and `mix = 1` returns `wet`.
///
/// # Arguments
///
/// * `dry` - Unprocessed signal
/// * `wet` - Processed signal
/// * `mix` - Blend factor in \[0.0, 1.0\]: 0.0 = all dry, 1.0 = all wet
///
/// # Example
/// ```rust
/// use impulso_core::wet_dry_mix;
///
/// assert_eq!(wet_dry_mix(0.3, 0.9, 0.0), 0.3);
/// assert_eq!(wet_dry_mix(0.3, 0.9, 1.0), 0.9);
/// ```
#[inline]
pub fn wet_dry_mix(dry: f32, wet: f32, mix: f32) -> f32 {
    mix * wet + (1.0 - mix) * dry
}

/// Average a frame of channel samples down to one sample.
///
/// Returns 0.0 for an empty frame.
#[inline]
pub fn mono_sum(frame: &[f32]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }
    frame.iter().sum::<f32>() / frame.len() as f32
}
