use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use testbed_harness::owners::{render_reports, OwnersIncludeChecker};

/// Checks an OWNERS file for broken includes
#[derive(Parser)]
#[command(name = "broken-include-owners")]
struct Cli {
    /// OWNERS file to check
    owners_file: PathBuf,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        env_logger::init();
    }

    let checker =
        OwnersIncludeChecker::from_current_dir().context("Failed to read working directory")?;
    let report = checker
        .check_file(&cli.owners_file)
        .with_context(|| format!("Failed to read {}", cli.owners_file.display()))?;

    println!("{}", render_reports(&[report])?);
    Ok(())
}
