//! File I/O and impulse response loading for Impulso.
//!
//! This crate provides:
//!
//! - **WAV file I/O**: [`read_wav`], [`read_wav_planar`], [`write_wav`] and
//!   [`write_wav_planar`] for loading/saving audio files
//! - **IR loading**: [`IrLoader`] decodes a WAV file and partitions it into an
//!   [`IrData`](impulso_convolution::IrData)
//! - **Background loading**: [`BackgroundLoader`] runs loads on a worker
//!   thread and publishes results through an
//!   [`IrExchange`](impulso_convolution::IrExchange)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use impulso_convolution::ConvolutionEngine;
//! use impulso_io::{BackgroundLoader, IrLoader};
//!
//! let engine = ConvolutionEngine::new();
//! let loader = BackgroundLoader::new(
//!     Arc::clone(engine.exchange()),
//!     IrLoader::new(512).with_sample_rate(48000),
//! );
//!
//! // Returns immediately; the engine picks the IR up on a later block.
//! loader.request("hall.wav")?;
//! ```

mod background;
mod loader;
mod wav;

use std::path::PathBuf;

use impulso_convolution::PartitionError;

pub use background::{BackgroundLoader, LoadHandle, LoadState};
pub use loader::{ChannelMode, IrLoader};
pub use wav::{
    WavFormat, WavInfo, WavSpec, read_wav, read_wav_info, read_wav_planar, write_wav,
    write_wav_planar,
};

/// Error types for file I/O and IR loading.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file decoded to zero samples.
    #[error("No audio in file: {}", .0.display())]
    EmptyFile(PathBuf),

    /// The impulse response could not be partitioned.
    #[error("Partitioning failed: {0}")]
    Partition(#[from] PartitionError),

    /// The requested sample format is not supported.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),
}

/// Convenience result type for I/O and loading operations.
pub type Result<T> = std::result::Result<T, Error>;
