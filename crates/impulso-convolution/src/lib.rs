//! Impulso Convolution - uniform partitioned convolution reverb
//!
//! Convolves a live stream against an impulse response of arbitrary length
//! with bounded per-block cost, and lets a background thread replace the IR
//! at any time without locking the audio thread.
//!
//! # Pipeline
//!
//! ```text
//! IR samples ─► SpectralPartitioner ─► IrData ─► IrExchange ─► ConvolutionEngine
//!  (loader)                                       (publish)      (audio thread)
//! ```
//!
//! - [`SpectralPartitioner`] splits an IR into power-of-two partitions and
//!   transforms each one (offline, allocates).
//! - [`IrData`] is the immutable result, shared by reference count.
//! - [`IrExchange`] is a single atomic slot; publishing is one pointer store.
//! - [`ConvolutionEngine`] reads the slot once per block and runs the
//!   partitioned overlap-add, then mixes `gain × (mix·wet + (1−mix)·dry)`.
//! - [`ConvolutionReverb`] adds smoothed, host-visible mix and output
//!   parameters on top of the engine.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use impulso_convolution::{ConvolutionEngine, SpectralPartitioner, direct_convolve};
//! use impulso_core::BlockProcessor;
//!
//! let impulse: Vec<f32> = (0..600).map(|i| 0.99f32.powi(i)).collect();
//! let mut partitioner = SpectralPartitioner::new(128);
//! let ir = Arc::new(partitioner.build_mono(&impulse).unwrap());
//!
//! let mut engine = ConvolutionEngine::new();
//! engine.set_ir(ir);
//! engine.set_mix(1.0);
//! engine.prepare(48000.0, 128, 1);
//!
//! let input: Vec<f32> = (0..1000).map(|i| if i % 97 == 0 { 1.0 } else { 0.0 }).collect();
//! let mut output = input.clone();
//! for block in output.chunks_mut(128) {
//!     engine.process(&mut [block]);
//! }
//!
//! let expected = direct_convolve(&input, &impulse);
//! for (a, b) in output.iter().zip(&expected) {
//!     assert!((a - b).abs() < 1e-3);
//! }
//! ```

pub mod engine;
pub mod error;
pub mod exchange;
pub mod fft;
pub mod ir;
pub mod partitioner;
pub mod reference;
pub mod reverb;

pub use engine::{ActiveIr, ConvolutionEngine};
pub use error::PartitionError;
pub use exchange::IrExchange;
pub use ir::{Geometry, IrData};
pub use partitioner::{MIN_PARTITION_SIZE, SpectralPartitioner, partition_size_for_block};
pub use reference::direct_convolve;
pub use reverb::{ConvolutionReverb, PARAM_MIX, PARAM_OUTPUT};
