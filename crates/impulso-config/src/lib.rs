//! Settings management for the Impulso convolution reverb.
//!
//! A small TOML file carries the renderer's defaults: wet/dry mix, output
//! trim, host block size, impulse response path and channel mode. Command
//! line flags override whatever the file says.
//!
//! # Example
//!
//! ```rust,no_run
//! use impulso_config::{ChannelMode, Settings};
//!
//! let settings = Settings::load("impulso.toml").unwrap();
//! println!("mix {} at block size {}", settings.wet_mix, settings.block_size);
//!
//! let custom = Settings {
//!     wet_mix: 0.3,
//!     channel_mode: ChannelMode::PerChannel,
//!     ..Settings::default()
//! };
//! custom.save("presets/wide.toml").unwrap();
//! ```

mod error;
mod settings;

/// Settings validation.
pub mod validation;

pub use error::ConfigError;
pub use settings::{ChannelMode, Settings};
pub use validation::{
    MAX_BLOCK_SIZE, MIN_BLOCK_SIZE, ValidationError, ValidationResult, validate_settings,
};
