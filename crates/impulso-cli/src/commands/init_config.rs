//! Write a default settings file.

use std::path::PathBuf;

use clap::Args;
use impulso_config::Settings;

/// Write a default settings file.
#[derive(Args)]
pub struct InitConfigArgs {
    /// Where to write the settings file
    #[arg(default_value = "impulso.toml")]
    path: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    force: bool,
}

/// Run the init-config command.
pub fn run(args: InitConfigArgs) -> anyhow::Result<()> {
    if args.path.exists() && !args.force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            args.path.display()
        );
    }

    Settings::default().save(&args.path)?;
    println!("Wrote default settings to {}", args.path.display());
    Ok(())
}
