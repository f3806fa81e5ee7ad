//! Settings file format and operations.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::validation::{ValidationResult, validate_settings};

/// How a multi-channel IR file is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChannelMode {
    /// Mix the IR file to mono and use it for every channel.
    #[default]
    Mono,
    /// Use one IR channel per file channel.
    PerChannel,
}

/// Renderer settings.
///
/// Every field is optional in the file; missing fields take their defaults.
///
/// # TOML Format
///
/// ```toml
/// wet_mix = 0.35
/// output_trim_db = -3.0
/// block_size = 256
/// impulse = "irs/hall.wav"
/// channel_mode = "per-channel"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Wet/dry blend, 0.0 (dry) to 1.0 (wet).
    pub wet_mix: f32,
    /// Output trim in dB, -24 to +24.
    pub output_trim_db: f32,
    /// Host block size in samples; the partition size is derived from it.
    pub block_size: usize,
    /// Impulse response file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impulse: Option<PathBuf>,
    /// Channel handling for multi-channel IR files.
    pub channel_mode: ChannelMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            wet_mix: 0.5,
            output_trim_db: 0.0,
            block_size: 512,
            impulse: None,
            channel_mode: ChannelMode::Mono,
        }
    }
}

impl Settings {
    /// Load and validate settings from a TOML file.
    ///
    /// A relative `impulse` path is resolved against the file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let mut settings = Self::from_toml(&content)?;

        if let Some(impulse) = &settings.impulse
            && impulse.is_relative()
            && let Some(dir) = path.parent()
        {
            settings.impulse = Some(dir.join(impulse));
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from a TOML string (no validation).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the settings to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the settings to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every field against its allowed range.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_settings(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.wet_mix, 0.5);
        assert_eq!(settings.output_trim_db, 0.0);
        assert_eq!(settings.block_size, 512);
        assert_eq!(settings.channel_mode, ChannelMode::Mono);
        assert!(settings.impulse.is_none());
    }

    #[test]
    fn test_from_toml() {
        let settings = Settings::from_toml(
            r#"
wet_mix = 0.35
output_trim_db = -3.0
block_size = 256
impulse = "hall.wav"
channel_mode = "per-channel"
"#,
        )
        .unwrap();

        assert_eq!(settings.wet_mix, 0.35);
        assert_eq!(settings.output_trim_db, -3.0);
        assert_eq!(settings.block_size, 256);
        assert_eq!(settings.impulse, Some(PathBuf::from("hall.wav")));
        assert_eq!(settings.channel_mode, ChannelMode::PerChannel);
    }

    #[test]
    fn test_minimal_toml() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_unknown_channel_mode_rejected() {
        let err = Settings::from_toml(r#"channel_mode = "surround""#).unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn test_to_toml_omits_missing_impulse() {
        let toml = Settings::default().to_toml().unwrap();
        assert!(toml.contains("wet_mix = 0.5"));
        assert!(toml.contains("channel_mode = \"mono\""));
        assert!(!toml.contains("impulse"));
    }

    #[test]
    fn test_roundtrip() {
        let original = Settings {
            wet_mix: 0.8,
            output_trim_db: 6.0,
            block_size: 1024,
            impulse: Some(PathBuf::from("/irs/plate.wav")),
            channel_mode: ChannelMode::PerChannel,
        };
        let parsed = Settings::from_toml(&original.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, original);
    }
}
