//! Settings validation.
//!
//! Checks every field of a [`Settings`](crate::Settings) against its allowed
//! range and reports all problems at once.
//!
//! # Example
//!
//! ```rust
//! use impulso_config::{Settings, ValidationError};
//!
//! let settings = Settings { wet_mix: 1.5, ..Settings::default() };
//! let err = settings.validate().unwrap_err();
//! assert!(matches!(err, ValidationError::OutOfRange { ref param, .. } if param == "wet_mix"));
//! ```

use thiserror::Error;

use crate::settings::Settings;

/// Smallest accepted host block size.
pub const MIN_BLOCK_SIZE: usize = 1;
/// Largest accepted host block size.
pub const MAX_BLOCK_SIZE: usize = 65536;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Value out of range.
    #[error("parameter '{param}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Name of the setting.
        param: String,
        /// The value that was out of range.
        value: f32,
        /// Minimum allowed value.
        min: f32,
        /// Maximum allowed value.
        max: f32,
    },

    /// Invalid value format.
    #[error("invalid format for parameter '{param}': {reason}")]
    InvalidFormat {
        /// Name of the setting.
        param: String,
        /// Description of the format error.
        reason: String,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

fn check_range(
    errors: &mut Vec<ValidationError>,
    param: &str,
    value: f32,
    min: f32,
    max: f32,
) {
    if value.is_nan() {
        errors.push(ValidationError::InvalidFormat {
            param: param.to_string(),
            reason: "not a number".to_string(),
        });
    } else if !(min..=max).contains(&value) {
        errors.push(ValidationError::OutOfRange {
            param: param.to_string(),
            value,
            min,
            max,
        });
    }
}

/// Validate all fields of `settings`.
///
/// A single problem is returned as-is; several are wrapped in
/// [`ValidationError::Multiple`].
pub fn validate_settings(settings: &Settings) -> ValidationResult<()> {
    let mut errors = Vec::new();

    check_range(&mut errors, "wet_mix", settings.wet_mix, 0.0, 1.0);
    check_range(
        &mut errors,
        "output_trim_db",
        settings.output_trim_db,
        impulso_core::gain::OUTPUT_MIN_DB,
        impulso_core::gain::OUTPUT_MAX_DB,
    );
    if !(MIN_BLOCK_SIZE..=MAX_BLOCK_SIZE).contains(&settings.block_size) {
        errors.push(ValidationError::OutOfRange {
            param: "block_size".to_string(),
            value: settings.block_size as f32,
            min: MIN_BLOCK_SIZE as f32,
            max: MAX_BLOCK_SIZE as f32,
        });
    }
    if let Some(path) = &settings.impulse
        && path.as_os_str().is_empty()
    {
        errors.push(ValidationError::InvalidFormat {
            param: "impulse".to_string(),
            reason: "empty path".to_string(),
        });
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}
