//! Impulso CLI - offline renderer for the partitioned convolution reverb.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "impulso")]
#[command(author, version, about = "Impulso convolution reverb CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convolve an audio file with an impulse response
    Process(commands::process::ProcessArgs),

    /// Show impulse response metadata and partition layout
    Info(commands::info::InfoArgs),

    /// Write a settings file with default values
    InitConfig(commands::init_config::InitConfigArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Process(args) => commands::process::run(args),
        Commands::Info(args) => commands::info::run(args),
        Commands::InitConfig(args) => commands::init_config::run(args),
    }
}
