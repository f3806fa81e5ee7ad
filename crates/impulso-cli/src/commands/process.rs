//! File-based convolution command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use impulso_config::{ChannelMode, Settings};
use impulso_convolution::{ConvolutionReverb, IrExchange};
use impulso_core::{BlockProcessor, linear_to_db};
use impulso_io::{BackgroundLoader, IrLoader, WavSpec, read_wav_planar, write_wav_planar};
use indicatif::{ProgressBar, ProgressStyle};

use super::{loader_channel_mode, peak, rms};

/// Convolve an audio file with an impulse response.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Impulse response WAV file
    #[arg(long, value_name = "IR")]
    ir: Option<PathBuf>,

    /// Wet/dry mix (0.0 = dry, 1.0 = wet)
    #[arg(long)]
    mix: Option<f32>,

    /// Output trim in dB (-24 to +24)
    #[arg(long, allow_negative_numbers = true)]
    trim_db: Option<f32>,

    /// Processing block size
    #[arg(long)]
    block_size: Option<usize>,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,

    /// Settings file (TOML); flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Append the impulse response tail after the input ends
    #[arg(long)]
    tail: bool,

    /// Use one IR channel per file channel instead of mixing to mono
    #[arg(long)]
    per_channel: bool,
}

/// Merge the settings file (if any) with command line overrides.
fn resolve_settings(args: &ProcessArgs) -> anyhow::Result<Settings> {
    let mut settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    if let Some(mix) = args.mix {
        settings.wet_mix = mix;
    }
    if let Some(trim) = args.trim_db {
        settings.output_trim_db = trim;
    }
    if let Some(block_size) = args.block_size {
        settings.block_size = block_size;
    }
    if let Some(ir) = &args.ir {
        settings.impulse = Some(ir.clone());
    }
    if args.per_channel {
        settings.channel_mode = ChannelMode::PerChannel;
    }

    settings.validate()?;
    Ok(settings)
}

/// Run the process command.
pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    let settings = resolve_settings(&args)?;
    let Some(ir_path) = settings.impulse.clone() else {
        anyhow::bail!("No impulse response specified. Use --ir or set `impulse` in --config");
    };

    println!("Reading {}...", args.input.display());
    let (mut channels, spec) = read_wav_planar(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let frames = channels.first().map_or(0, Vec::len);
    let sample_rate = spec.sample_rate as f32;
    println!(
        "  {} channel(s), {} frames, {} Hz, {:.2}s",
        channels.len(),
        frames,
        spec.sample_rate,
        frames as f32 / sample_rate
    );

    let exchange = Arc::new(IrExchange::new());
    let loader = BackgroundLoader::new(
        Arc::clone(&exchange),
        IrLoader::new(settings.block_size)
            .with_sample_rate(spec.sample_rate)
            .with_channel_mode(loader_channel_mode(settings.channel_mode)),
    );
    println!("Loading impulse response {}...", ir_path.display());
    let ir = loader
        .request(&ir_path)?
        .wait()
        .with_context(|| format!("loading impulse response {}", ir_path.display()))?;
    println!(
        "  {} samples, {} channel(s), {} partitions of {}",
        ir.ir_length(),
        ir.num_channels(),
        ir.num_partitions(),
        ir.partition_size()
    );

    if args.tail {
        let tail = ir.ir_length().saturating_sub(1);
        for channel in &mut channels {
            channel.resize(channel.len() + tail, 0.0);
        }
    }
    let input_mix: Vec<f32> = channels.iter().flatten().copied().collect();

    let mut reverb = ConvolutionReverb::with_exchange(sample_rate, exchange);
    reverb.set_mix(settings.wet_mix);
    reverb.set_output_trim_db(settings.output_trim_db);
    reverb.snap_parameters();
    reverb.prepare(sample_rate, settings.block_size, channels.len());

    let total = channels.first().map_or(0, Vec::len);
    println!(
        "Processing (mix {:.0}%, trim {:+.1} dB, block {})...",
        settings.wet_mix * 100.0,
        settings.output_trim_db,
        settings.block_size
    );

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let block_size = settings.block_size;
    let mut start = 0;
    while start < total {
        let end = (start + block_size).min(total);
        let mut block: Vec<&mut [f32]> = channels.iter_mut().map(|c| &mut c[start..end]).collect();
        reverb.process(&mut block);
        start = end;
        pb.set_position(start as u64);
    }
    pb.finish_with_message("done");

    let output_mix: Vec<f32> = channels.iter().flatten().copied().collect();
    println!("\nStats:");
    println!(
        "  Input:  RMS {:.1} dB, Peak {:.1} dB",
        linear_to_db(rms(&input_mix)),
        linear_to_db(peak(&input_mix))
    );
    println!(
        "  Output: RMS {:.1} dB, Peak {:.1} dB",
        linear_to_db(rms(&output_mix)),
        linear_to_db(peak(&output_mix))
    );

    let out_spec = WavSpec {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: args.bit_depth,
    };
    println!("\nWriting {}...", args.output.display());
    write_wav_planar(&args.output, &channels, out_spec)?;
    println!("Done!");

    Ok(())
}
