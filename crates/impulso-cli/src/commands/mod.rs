//! CLI command implementations.

pub mod info;
pub mod init_config;
pub mod process;

/// Map the settings file's channel mode onto the loader's.
pub(crate) fn loader_channel_mode(mode: impulso_config::ChannelMode) -> impulso_io::ChannelMode {
    match mode {
        impulso_config::ChannelMode::Mono => impulso_io::ChannelMode::Mono,
        impulso_config::ChannelMode::PerChannel => impulso_io::ChannelMode::PerChannel,
    }
}

/// Root-mean-square level of a signal.
pub(crate) fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|s| s * s).sum();
    (sum / samples.len() as f32).sqrt()
}

/// Absolute peak of a signal.
pub(crate) fn peak(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0, f32::max)
}
