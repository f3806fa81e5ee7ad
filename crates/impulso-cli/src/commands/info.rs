//! Display impulse response metadata and partition layout.

use std::sync::Arc;

use clap::Args;
use impulso_convolution::{ConvolutionEngine, ConvolutionReverb, direct_convolve};
use impulso_core::{BlockProcessor, ParamFlags, ParameterInfo};
use impulso_io::{IrLoader, WavFormat, read_wav, read_wav_info};

/// Display IR file information.
#[derive(Args)]
pub struct InfoArgs {
    /// Path to the IR WAV file
    pub file: std::path::PathBuf,

    /// Host block size the partition layout is derived from
    #[arg(long, default_value = "512")]
    pub block_size: usize,
}

/// Run the info command.
pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    if args.block_size == 0 {
        anyhow::bail!("--block-size must be at least 1");
    }

    let info = read_wav_info(&args.file)?;
    let format_str = match info.format {
        WavFormat::Pcm => "PCM",
        WavFormat::IeeeFloat => "IEEE Float",
    };

    println!("File:        {}", args.file.display());
    println!("Format:      {} {}-bit", format_str, info.bits_per_sample);
    println!("Channels:    {}", info.channels);
    println!("Sample Rate: {} Hz", info.sample_rate);
    println!(
        "Duration:    {:.3}s ({} frames)",
        info.duration_secs, info.num_frames
    );

    let (mono, _) = read_wav(&args.file)?;
    let ir = IrLoader::new(args.block_size).load_samples(&[mono.as_slice()], None)?;

    println!();
    println!("Partitioning (block size {}):", args.block_size);
    println!("  Partition size: {}", ir.partition_size());
    println!("  FFT size:       {}", ir.fft_size());
    println!("  Partitions:     {}", ir.num_partitions());

    let error = self_check(Arc::new(ir), &mono, args.block_size);
    println!("  Self-check:     max error {error:.2e} against direct convolution");

    println!();
    print_parameters(&ConvolutionReverb::new(info.sample_rate as f32));

    Ok(())
}

/// List the host-facing parameters with their ranges and defaults.
fn print_parameters(processor: &impl ParameterInfo) {
    println!("Parameters:");
    for desc in (0..processor.param_count()).filter_map(|i| processor.param_info(i)) {
        let suffix = desc.unit.suffix();
        let automation = if desc.flags.contains(ParamFlags::AUTOMATABLE) {
            "automatable"
        } else {
            "fixed"
        };
        println!(
            "  {:<8} {}{suffix} to {}{suffix} (default {}{suffix}, {automation})",
            desc.name, desc.min, desc.max, desc.default
        );
    }
}

/// Render a short test signal through the engine and compare it with the
/// direct-form result.
fn self_check(ir: Arc<impulso_convolution::IrData>, impulse: &[f32], block_size: usize) -> f32 {
    let mut input = vec![0.0f32; block_size * 2 + 3];
    input[0] = 1.0;
    input[block_size / 2 + 1] = -0.5;
    let expected = direct_convolve(&input, impulse);

    let mut engine = ConvolutionEngine::new();
    engine.set_mix(1.0);
    engine.set_ir(ir);
    engine.prepare(48000.0, block_size, 1);

    let mut rendered = input;
    rendered.resize(expected.len(), 0.0);
    for block in rendered.chunks_mut(block_size) {
        engine.process(&mut [block]);
    }

    rendered
        .iter()
        .zip(&expected)
        .map(|(a, b)| (a - b).abs())
        .fold(0.0, f32::max)
}
