//! Output trim helpers.
//!
//! Processors expose their output level as a dB trim applied after the
//! wet/dry mix. Internally the trim is a linear gain held in a
//! [`SmoothedParam`]; this module is the shared vocabulary for that contract.
//!
//! # Usage
//!
//! ```rust
//! use impulso_core::gain;
//!
//! let mut output = gain::output_trim_param(48000.0);
//! gain::set_output_trim_db(&mut output, -3.0);
//! assert!((gain::output_trim_db(&output) - (-3.0)).abs() < 0.01);
//! ```

use crate::{ParamDescriptor, SmoothedParam, db_to_linear, linear_to_db};

/// Minimum output trim in dB.
pub const OUTPUT_MIN_DB: f32 = -24.0;

/// Maximum output trim in dB.
pub const OUTPUT_MAX_DB: f32 = 24.0;

/// Convert a trim in dB to linear gain, clamped to [`OUTPUT_MIN_DB`]..=[`OUTPUT_MAX_DB`].
///
/// NaN maps to unity gain.
#[inline]
pub fn trim_to_gain(db: f32) -> f32 {
    if db.is_nan() {
        return 1.0;
    }
    db_to_linear(db.clamp(OUTPUT_MIN_DB, OUTPUT_MAX_DB))
}

/// Create a [`SmoothedParam`] for the output trim (0 dB, standard smoothing).
///
/// The param stores linear gain. At 0 dB the value is 1.0 (unity).
pub fn output_trim_param(sample_rate: f32) -> SmoothedParam {
    SmoothedParam::standard(1.0, sample_rate)
}

/// Set output trim from dB, clamped to the trim range.
#[inline]
pub fn set_output_trim_db(param: &mut SmoothedParam, db: f32) {
    param.set_target(trim_to_gain(db));
}

/// Read the output trim target as dB.
#[inline]
pub fn output_trim_db(param: &SmoothedParam) -> f32 {
    linear_to_db(param.target())
}

/// Standard [`ParamDescriptor`] for output trim.
pub fn output_param_descriptor() -> ParamDescriptor {
    ParamDescriptor::gain_db("Output", "Out", OUTPUT_MIN_DB, OUTPUT_MAX_DB, 0.0)
}
