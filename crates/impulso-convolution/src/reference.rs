//! Direct time-domain convolution.
//!
//! O(N·M) and allocation-happy. Used to check the partitioned engine and to
//! render short IRs offline where the FFT setup cost dominates.

/// Full linear convolution of `input` with `impulse`.
///
/// Returns `input.len() + impulse.len() - 1` samples, or an empty vector when
/// either input is empty.
///
/// ```rust
/// use impulso_convolution::direct_convolve;
///
/// let out = direct_convolve(&[1.0, 2.0], &[1.0, 0.5]);
/// assert_eq!(out, vec![1.0, 2.5, 1.0]);
/// ```
pub fn direct_convolve(input: &[f32], impulse: &[f32]) -> Vec<f32> {
    if input.is_empty() || impulse.is_empty() {
        return Vec::new();
    }
    let mut out = vec![0.0f32; input.len() + impulse.len() - 1];
    for (i, &x) in input.iter().enumerate() {
        if x == 0.0 {
            continue;
        }
        for (j, &h) in impulse.iter().enumerate() {
            out[i + j] += x * h;
        }
    }
    out
}
