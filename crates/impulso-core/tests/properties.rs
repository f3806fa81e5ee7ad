//! Property-based tests for impulso-core primitives.
//!
//! Covers mix interpolation, level conversion, and parameter convergence
//! using proptest for randomized input generation.

use impulso_core::{SmoothedParam, db_to_linear, gain, linear_to_db, wet_dry_mix};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// The mix output always lies between the dry and wet samples.
    #[test]
    fn wet_dry_mix_is_between_endpoints(
        dry in -1.0f32..=1.0f32,
        wet in -1.0f32..=1.0f32,
        mix in 0.0f32..=1.0f32,
    ) {
        let out = wet_dry_mix(dry, wet, mix);
        let lo = dry.min(wet) - 1e-6;
        let hi = dry.max(wet) + 1e-6;
        prop_assert!(out >= lo && out <= hi, "mix {} of ({}, {}) gave {}", mix, dry, wet, out);
    }

    /// Mixing is affine in the blend factor.
    #[test]
    fn wet_dry_mix_is_affine(
        dry in -1.0f32..=1.0f32,
        wet in -1.0f32..=1.0f32,
        a in 0.0f32..=1.0f32,
        b in 0.0f32..=1.0f32,
    ) {
        let mid = wet_dry_mix(dry, wet, 0.5 * (a + b));
        let avg = 0.5 * (wet_dry_mix(dry, wet, a) + wet_dry_mix(dry, wet, b));
        prop_assert!((mid - avg).abs() < 1e-5);
    }

    /// dB → linear → dB recovers the input over the trim range.
    #[test]
    fn db_roundtrip(db in gain::OUTPUT_MIN_DB..=gain::OUTPUT_MAX_DB) {
        let back = linear_to_db(db_to_linear(db));
        prop_assert!((back - db).abs() < 1e-3, "{} -> {}", db, back);
    }

    /// SmoothedParam converges toward its target value.
    #[test]
    fn smoothed_param_convergence(
        initial in -4.0f32..4.0f32,
        target in -4.0f32..4.0f32,
    ) {
        let mut param = SmoothedParam::standard(initial, 48000.0);
        param.set_target(target);

        // 20 ms time constant at 48 kHz: 10 tau is 9600 samples.
        for _ in 0..9600 {
            param.advance();
        }

        let diff = (param.get() - target).abs();
        prop_assert!(diff < 1e-3, "initial={}, target={}, got={}", initial, target, param.get());
    }
}
