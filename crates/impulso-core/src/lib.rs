//! Impulso Core - DSP primitives shared by the convolution engine and its hosts
//!
//! This crate provides the small set of building blocks the rest of the
//! workspace is written against. Everything here is allocation-free and safe
//! to call from a real-time audio callback.
//!
//! # Core Abstractions
//!
//! ## Block Processing
//!
//! - [`BlockProcessor`] - Object-safe trait for planar, in-place block processing
//!
//! ## Parameters
//!
//! - [`SmoothedParam`] - Exponential smoothing (RC-like response) for click-free changes
//! - [`ParameterInfo`] / [`ParamDescriptor`] - Runtime-discoverable parameters for hosts
//!
//! ## Utilities
//!
//! - Level conversions: [`db_to_linear`], [`linear_to_db`]
//! - Mixing: [`wet_dry_mix`], [`mono_sum`]
//! - [`gain`] - Output trim range and helpers
//!
//! # no_std Support
//!
//! Disable the default `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! impulso-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: No allocations in audio processing paths
//! - **No dependencies on std**: Pure `no_std` with `libm` for math
//! - **Object-safe traits**: `Box<dyn BlockProcessor>` works when a host needs it

#![cfg_attr(not(feature = "std"), no_std)]

pub mod gain;
pub mod math;
pub mod param;
pub mod param_info;
pub mod processor;

pub use math::{db_to_linear, flush_denormal, linear_to_db, mono_sum, wet_dry_mix};
pub use param::SmoothedParam;
pub use param_info::{ParamDescriptor, ParamFlags, ParamId, ParamUnit, ParameterInfo};
pub use processor::BlockProcessor;
