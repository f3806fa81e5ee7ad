//! Integration tests for impulso-cli.
//!
//! Tests run the built `impulso` binary against WAV files in a temp dir.

use std::path::Path;
use std::process::Command;

use impulso_io::{WavSpec, read_wav, write_wav};
use tempfile::TempDir;

fn impulso_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_impulso"))
}

fn float_spec() -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate: 48000,
        bits_per_sample: 32,
    }
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn cli_help_lists_commands() {
    let output = impulso_bin().arg("--help").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["process", "info", "init-config"] {
        assert!(stdout.contains(command), "help should mention '{command}'");
    }
}

#[test]
fn cli_init_config_writes_defaults_and_refuses_overwrite() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("impulso.toml");

    let output = impulso_bin()
        .args(["init-config", path_str(&path)])
        .output()
        .unwrap();
    assert!(output.status.success());

    let settings = impulso_config::Settings::load(&path).unwrap();
    assert_eq!(settings, impulso_config::Settings::default());

    let again = impulso_bin()
        .args(["init-config", path_str(&path)])
        .output()
        .unwrap();
    assert!(!again.status.success(), "second write without --force");

    let forced = impulso_bin()
        .args(["init-config", path_str(&path), "--force"])
        .output()
        .unwrap();
    assert!(forced.status.success());
}

#[test]
fn cli_info_shows_partition_layout() {
    let dir = TempDir::new().unwrap();
    let ir_path = dir.path().join("ir.wav");
    let impulse: Vec<f32> = (0..1000).map(|i| 0.99f32.powi(i)).collect();
    write_wav(&ir_path, &impulse, float_spec()).unwrap();

    let output = impulso_bin()
        .args(["info", path_str(&ir_path), "--block-size", "256"])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "info failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Sample Rate: 48000 Hz"));
    assert!(stdout.contains("Partition size: 256"));
    assert!(stdout.contains("FFT size:       512"));
    assert!(stdout.contains("Partitions:     4"));
    assert!(stdout.contains("Self-check"));
    assert!(stdout.contains("Mix      0% to 100% (default 50%, automatable)"));
    assert!(stdout.contains("Output   -24 dB to 24 dB (default 0 dB, automatable)"));
}

#[test]
fn cli_process_convolves_with_tail() {
    let dir = TempDir::new().unwrap();
    let ir_path = dir.path().join("ir.wav");
    let input_path = dir.path().join("input.wav");
    let output_path = dir.path().join("output.wav");

    write_wav(&ir_path, &[1.0, 0.5], float_spec()).unwrap();
    let mut input = vec![0.0f32; 10];
    input[0] = 1.0;
    input[4] = 0.25;
    write_wav(&input_path, &input, float_spec()).unwrap();

    let output = impulso_bin()
        .args([
            "process",
            path_str(&input_path),
            path_str(&output_path),
            "--ir",
            path_str(&ir_path),
            "--mix",
            "1.0",
            "--block-size",
            "4",
            "--tail",
        ])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "process failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let (rendered, spec) = read_wav(&output_path).unwrap();
    assert_eq!(spec.sample_rate, 48000);
    assert_eq!(rendered.len(), 11);

    let mut expected = vec![0.0f32; 11];
    expected[0] = 1.0;
    expected[1] = 0.5;
    expected[4] = 0.25;
    expected[5] = 0.125;
    for (i, (a, b)) in rendered.iter().zip(&expected).enumerate() {
        assert!((a - b).abs() < 1e-5, "sample {i}: {a} vs {b}");
    }
}

#[test]
fn cli_process_dry_mix_passes_input_through() {
    let dir = TempDir::new().unwrap();
    let ir_path = dir.path().join("ir.wav");
    let input_path = dir.path().join("input.wav");
    let output_path = dir.path().join("output.wav");

    write_wav(&ir_path, &[0.0, 0.0, 1.0], float_spec()).unwrap();
    let input: Vec<f32> = (0..600).map(|i| (i as f32 * 0.05).sin() * 0.5).collect();
    write_wav(&input_path, &input, float_spec()).unwrap();

    let output = impulso_bin()
        .args([
            "process",
            path_str(&input_path),
            path_str(&output_path),
            "--ir",
            path_str(&ir_path),
            "--mix",
            "0",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let (rendered, _) = read_wav(&output_path).unwrap();
    assert_eq!(rendered.len(), input.len());
    for (a, b) in rendered.iter().zip(&input) {
        assert!((a - b).abs() < 1e-6);
    }
}

#[test]
fn cli_process_reads_settings_file() {
    let dir = TempDir::new().unwrap();
    let ir_path = dir.path().join("ir.wav");
    let input_path = dir.path().join("input.wav");
    let output_path = dir.path().join("output.wav");
    let config_path = dir.path().join("impulso.toml");

    write_wav(&ir_path, &[0.5], float_spec()).unwrap();
    write_wav(&input_path, &[1.0, -1.0, 0.5], float_spec()).unwrap();
    std::fs::write(
        &config_path,
        "wet_mix = 1.0\nblock_size = 2\nimpulse = \"ir.wav\"\n",
    )
    .unwrap();

    let output = impulso_bin()
        .args([
            "process",
            path_str(&input_path),
            path_str(&output_path),
            "--config",
            path_str(&config_path),
        ])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "process failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let (rendered, _) = read_wav(&output_path).unwrap();
    let expected = [0.5, -0.5, 0.25];
    for (a, b) in rendered.iter().zip(&expected) {
        assert!((a - b).abs() < 1e-5);
    }
}

#[test]
fn cli_process_missing_ir_fails() {
    let dir = TempDir::new().unwrap();
    let input_path = dir.path().join("input.wav");
    let output_path = dir.path().join("output.wav");
    write_wav(&input_path, &[0.0; 100], float_spec()).unwrap();

    let output = impulso_bin()
        .args([
            "process",
            path_str(&input_path),
            path_str(&output_path),
            "--ir",
            path_str(&dir.path().join("missing.wav")),
        ])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(!output_path.exists(), "no output on failed load");
}

#[test]
fn cli_process_without_ir_fails() {
    let dir = TempDir::new().unwrap();
    let input_path = dir.path().join("input.wav");
    write_wav(&input_path, &[0.0; 100], float_spec()).unwrap();

    let output = impulso_bin()
        .args([
            "process",
            path_str(&input_path),
            path_str(&dir.path().join("out.wav")),
        ])
        .output()
        .unwrap();
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No impulse response"));
}
