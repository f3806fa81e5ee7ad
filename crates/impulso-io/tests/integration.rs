//! Integration tests for impulso-io WAV I/O and IR loading.

use std::sync::Arc;

use impulso_convolution::{ConvolutionEngine, IrExchange};
use impulso_io::{
    BackgroundLoader, ChannelMode, Error, IrLoader, LoadState, WavFormat, WavSpec, read_wav,
    read_wav_info, read_wav_planar, write_wav, write_wav_planar,
};
use tempfile::{NamedTempFile, TempDir};

fn decaying(len: usize, rate: f32) -> Vec<f32> {
    (0..len).map(|i| (-(i as f32) * rate).exp()).collect()
}

// ---------------------------------------------------------------------------
// WAV roundtrip tests
// ---------------------------------------------------------------------------

#[test]
fn wav_roundtrip_planar_f32() {
    let left: Vec<f32> = (0..1000).map(|i| (i as f32 / 1000.0).sin()).collect();
    let right: Vec<f32> = (0..1000).map(|i| (i as f32 / 1000.0).cos()).collect();
    let spec = WavSpec {
        channels: 2,
        sample_rate: 48000,
        bits_per_sample: 32,
    };

    let file = NamedTempFile::new().unwrap();
    write_wav_planar(file.path(), &[left.clone(), right.clone()], spec).unwrap();

    let (loaded, loaded_spec) = read_wav_planar(file.path()).unwrap();
    assert_eq!(loaded_spec, spec);
    assert_eq!(loaded[0], left);
    assert_eq!(loaded[1], right);

    let info = read_wav_info(file.path()).unwrap();
    assert_eq!(info.format, WavFormat::IeeeFloat);
    assert_eq!(info.num_frames, 1000);
}

#[test]
fn wav_roundtrip_mono_i16() {
    let samples: Vec<f32> = (0..1000).map(|i| (i as f32 / 1000.0).sin() * 0.9).collect();
    let spec = WavSpec {
        channels: 1,
        sample_rate: 44100,
        bits_per_sample: 16,
    };

    let file = NamedTempFile::new().unwrap();
    write_wav(file.path(), &samples, spec).unwrap();

    let (loaded, loaded_spec) = read_wav(file.path()).unwrap();
    assert_eq!(loaded_spec.sample_rate, 44100);
    assert_eq!(loaded.len(), samples.len());
    // 16-bit has less precision
    for (a, b) in samples.iter().zip(loaded.iter()) {
        assert!((a - b).abs() < 0.001);
    }
}

#[test]
fn read_missing_file_is_error() {
    let err = read_wav("/nonexistent/path.wav").unwrap_err();
    assert!(matches!(err, Error::Wav(_)));
}

// ---------------------------------------------------------------------------
// IR loading
// ---------------------------------------------------------------------------

#[test]
fn loader_reads_stereo_file_per_channel() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("room.wav");
    let spec = WavSpec {
        channels: 2,
        sample_rate: 48000,
        bits_per_sample: 32,
    };
    write_wav_planar(&path, &[decaying(900, 0.01), decaying(600, 0.02)], spec).unwrap();

    let stereo = IrLoader::new(256)
        .with_channel_mode(ChannelMode::PerChannel)
        .load(&path)
        .unwrap();
    assert_eq!(stereo.num_channels(), 2);
    assert_eq!(stereo.ir_length(), 900);
    assert_eq!(stereo.num_partitions(), 4);
    assert_eq!(stereo.name(), Some("room.wav"));
    assert_eq!(stereo.source_sample_rate(), Some(48000));

    let mono = IrLoader::new(256).load(&path).unwrap();
    assert_eq!(mono.num_channels(), 1);
}

#[test]
fn loader_accepts_rate_mismatch() {
    let file = NamedTempFile::new().unwrap();
    let spec = WavSpec {
        channels: 1,
        sample_rate: 44100,
        bits_per_sample: 32,
    };
    write_wav(file.path(), &decaying(300, 0.05), spec).unwrap();

    let ir = IrLoader::new(128)
        .with_sample_rate(48000)
        .load(file.path())
        .unwrap();
    assert_eq!(ir.source_sample_rate(), Some(44100));
}

#[test]
fn loader_rejects_empty_file() {
    let file = NamedTempFile::new().unwrap();
    write_wav(file.path(), &[], WavSpec::default()).unwrap();

    let err = IrLoader::new(128).load(file.path()).unwrap_err();
    assert!(matches!(err, Error::EmptyFile(_)));
}

#[test]
fn loader_rejects_non_finite_samples() {
    let file = NamedTempFile::new().unwrap();
    write_wav(file.path(), &[0.5, f32::NAN, 0.1], WavSpec::default()).unwrap();

    let err = IrLoader::new(128).load(file.path()).unwrap_err();
    assert!(matches!(err, Error::Partition(_)));
}

// ---------------------------------------------------------------------------
// Background loading
// ---------------------------------------------------------------------------

#[test]
fn background_load_publishes_to_engine() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("impulse.wav");
    write_wav(&path, &[0.0, 1.0], WavSpec::default()).unwrap();

    let mut engine = ConvolutionEngine::new();
    engine.set_mix(1.0);
    let loader = BackgroundLoader::new(Arc::clone(engine.exchange()), IrLoader::new(64));

    let ir = loader.request(&path).unwrap().wait().unwrap();
    assert_eq!(ir.ir_length(), 2);
    assert_eq!(
        *loader.state(),
        LoadState::Loaded {
            name: "impulse.wav".to_string(),
            ir_length: 2,
            num_partitions: 1,
        }
    );
    assert_eq!(loader.state().label(), "impulse.wav");

    let mut block = [1.0, 0.0, 0.0, 0.0];
    engine.process(&mut [&mut block]);
    for (a, e) in block.iter().zip([0.0, 1.0, 0.0, 0.0]) {
        assert!((a - e).abs() < 1e-6);
    }
}

#[test]
fn failed_load_leaves_previous_ir_active() {
    let dir = TempDir::new().unwrap();
    let good = dir.path().join("good.wav");
    write_wav(&good, &decaying(100, 0.1), WavSpec::default()).unwrap();

    let exchange = Arc::new(IrExchange::new());
    let loader = BackgroundLoader::new(Arc::clone(&exchange), IrLoader::new(128));
    loader.load_now(&good).unwrap();
    let generation = exchange.load_full().unwrap().generation();

    let result = loader.request(dir.path().join("missing.wav")).unwrap().wait();
    assert!(result.is_err());
    assert_eq!(exchange.load_full().unwrap().generation(), generation);
    assert_eq!(loader.state().label(), "Load failed");
}

#[test]
fn overlapping_loads_all_complete() {
    let dir = TempDir::new().unwrap();
    let mut handles = Vec::new();

    let exchange = Arc::new(IrExchange::new());
    let loader = BackgroundLoader::new(Arc::clone(&exchange), IrLoader::new(256));

    for n in 0..4 {
        let path = dir.path().join(format!("ir_{n}.wav"));
        write_wav(&path, &decaying(500 + n * 100, 0.01), WavSpec::default()).unwrap();
        handles.push(loader.request(&path).unwrap());
    }

    let generations: Vec<u64> = handles
        .into_iter()
        .map(|h| h.wait().unwrap().generation())
        .collect();

    let active = exchange.load_full().unwrap();
    assert!(generations.contains(&active.generation()));
    assert_eq!(loader.in_flight(), 0);
    assert!(matches!(*loader.state(), LoadState::Loaded { .. }));
}
