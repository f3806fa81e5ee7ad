//! Error types for impulse response partitioning.

use thiserror::Error;

/// Errors that prevent an impulse response from becoming an [`IrData`](crate::IrData).
///
/// None of these affect the currently published IR: a failed build simply
/// never reaches the exchange.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PartitionError {
    /// The impulse response has no samples.
    #[error("impulse response is empty")]
    EmptyImpulse,

    /// No channels were supplied.
    #[error("impulse response has no channels")]
    NoChannels,

    /// Partition size is zero or not a power of two.
    #[error("invalid partition size {0} (must be a non-zero power of two)")]
    InvalidPartitionSize(usize),

    /// A sample is NaN or infinite.
    #[error("non-finite sample at channel {channel}, index {index}")]
    NonFiniteSample {
        /// Channel containing the sample.
        channel: usize,
        /// Sample index within the channel.
        index: usize,
    },

    /// The FFT backend rejected a buffer.
    #[error("FFT failed: {0}")]
    Fft(String),
}

impl From<realfft::FftError> for PartitionError {
    fn from(err: realfft::FftError) -> Self {
        PartitionError::Fft(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            PartitionError::EmptyImpulse.to_string(),
            "impulse response is empty"
        );
        assert_eq!(
            PartitionError::InvalidPartitionSize(300).to_string(),
            "invalid partition size 300 (must be a non-zero power of two)"
        );
        assert_eq!(
            PartitionError::NonFiniteSample {
                channel: 1,
                index: 42
            }
            .to_string(),
            "non-finite sample at channel 1, index 42"
        );
    }
}
