//! Real-input FFT wrapper with preallocated scratch.
//!
//! A transform of `size` real samples yields `size / 2 + 1` complex bins
//! (DC through Nyquist). The partitioner and the engine both go through
//! [`SpectralFft`], so the packing of stored spectra always matches the
//! packing the inverse expects.

use std::fmt;
use std::sync::Arc;

use realfft::{ComplexToReal, FftError, RealFftPlanner, RealToComplex};
use rustfft::num_complex::Complex;

/// Number of complex bins produced by a real FFT of `size` samples.
#[inline]
pub fn complex_size(size: usize) -> usize {
    size / 2 + 1
}

/// `a * b` accumulated into `result`, bin by bin.
#[inline]
pub fn complex_multiply_accumulate(
    result: &mut [Complex<f32>],
    a: &[Complex<f32>],
    b: &[Complex<f32>],
) {
    debug_assert_eq!(result.len(), a.len());
    debug_assert_eq!(result.len(), b.len());
    for ((r, x), h) in result.iter_mut().zip(a).zip(b) {
        *r += x * h;
    }
}

/// Forward/inverse real FFT pair for one transform size.
#[derive(Clone)]
pub struct SpectralFft {
    forward: Arc<dyn RealToComplex<f32>>,
    inverse: Arc<dyn ComplexToReal<f32>>,
    scratch: Vec<Complex<f32>>,
    size: usize,
}

impl fmt::Debug for SpectralFft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpectralFft").field("size", &self.size).finish()
    }
}

impl SpectralFft {
    /// Plan a transform of `size` real samples.
    pub fn new(size: usize) -> Self {
        let mut planner = RealFftPlanner::<f32>::new();
        let forward = planner.plan_fft_forward(size);
        let inverse = planner.plan_fft_inverse(size);
        let scratch_len = forward
            .get_scratch_len()
            .max(inverse.get_scratch_len());

        Self {
            forward,
            inverse,
            scratch: vec![Complex::new(0.0, 0.0); scratch_len],
            size,
        }
    }

    /// Transform length in real samples.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of complex bins in a spectrum.
    pub fn bins(&self) -> usize {
        complex_size(self.size)
    }

    /// Forward transform. `input` is used as scratch and left unspecified.
    pub fn forward(
        &mut self,
        input: &mut [f32],
        output: &mut [Complex<f32>],
    ) -> Result<(), FftError> {
        self.forward
            .process_with_scratch(input, output, &mut self.scratch)
    }

    /// Inverse transform, normalized by `1 / size`.
    ///
    /// `input` is used as scratch. The imaginary parts of the DC and Nyquist
    /// bins are cleared first; for spectra of real signals they are zero up
    /// to rounding.
    pub fn inverse(
        &mut self,
        input: &mut [Complex<f32>],
        output: &mut [f32],
    ) -> Result<(), FftError> {
        if let Some(first) = input.first_mut() {
            first.im = 0.0;
        }
        if let Some(last) = input.last_mut() {
            last.im = 0.0;
        }
        self.inverse
            .process_with_scratch(input, output, &mut self.scratch)?;

        let scale = 1.0 / self.size as f32;
        for sample in output.iter_mut() {
            *sample *= scale;
        }
        Ok(())
    }
}
