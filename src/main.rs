use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use testbed_harness::honeydew::load_honeydew_config;
use testbed_harness::owners::{render_reports, OwnersIncludeChecker};
use testbed_harness::{BaseDriver, DriverFactory};

#[derive(Parser)]
#[command(name = "testbed-harness")]
#[command(about = "Mobly driver selection and OWNERS include linting for end-to-end tests")]
#[command(version = "1.0.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Report broken include/file directives in OWNERS files
    CheckOwners {
        /// OWNERS files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Generate the Mobly config for the current execution environment
    GenerateConfig {
        #[command(flatten)]
        driver: DriverArgs,

        /// Write the config here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show which driver the current environment selects
    DriverInfo {
        #[command(flatten)]
        driver: DriverArgs,
    },
}

#[derive(Args)]
struct DriverArgs {
    /// Honeydew config file (`.json` is JSON, anything else YAML)
    #[arg(long, env = "MOBLY_HONEYDEW_CONFIG")]
    honeydew_config: Option<PathBuf>,

    /// The test needs two or more devices
    #[arg(long)]
    multi_device: bool,

    /// Mobly config to use instead of device discovery (local runs)
    #[arg(long)]
    config_path: Option<PathBuf>,

    /// Mobly testbed params file
    #[arg(long)]
    params_path: Option<PathBuf>,

    /// SSH binary for Fuchsia controllers (infra runs)
    #[arg(long, env = "MOBLY_SSH_PATH")]
    ssh_path: Option<PathBuf>,

    /// Output directory for local runs (default: a temp dir, kept only by generate-config)
    #[arg(long)]
    local_output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    if cli.debug {
        env_logger::init();
    }

    match &cli.command {
        Commands::CheckOwners { files } => check_owners(files)?,
        Commands::GenerateConfig { driver, output } => {
            generate_config(driver, output.as_deref())?;
        }
        Commands::DriverInfo { driver } => driver_info(driver)?,
    }

    Ok(())
}

fn check_owners(files: &[PathBuf]) -> Result<()> {
    let checker =
        OwnersIncludeChecker::from_current_dir().context("Failed to read working directory")?;

    let reports = files
        .iter()
        .map(|file| {
            checker
                .check_file(file)
                .with_context(|| format!("Failed to read {}", file.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    println!("{}", render_reports(&reports)?);
    Ok(())
}

fn build_driver(args: &DriverArgs) -> Result<Box<dyn BaseDriver>> {
    // Non-UTF-8 variables cannot be Honeydew overrides
    let vars = std::env::vars_os()
        .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)));
    let honeydew_config = load_honeydew_config(args.honeydew_config.as_deref(), vars)
        .context("Failed to load Honeydew config")?;

    let mut factory = DriverFactory::new(
        honeydew_config,
        args.multi_device,
        args.config_path.clone(),
        args.params_path.clone(),
        args.ssh_path.clone(),
    );
    if let Some(dir) = &args.local_output {
        factory = factory.with_local_output_path(dir);
    }

    let driver = factory.get_driver()?;
    log::info!(
        "Using {} driver, output in {}",
        driver.kind(),
        driver.output_path().display()
    );
    Ok(driver)
}

fn generate_config(args: &DriverArgs, output: Option<&Path>) -> Result<()> {
    let driver = build_driver(args)?;
    let config = driver.generate_test_config()?;

    match output {
        Some(path) => fs::write(path, &config)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => print!("{}", config),
    }
    Ok(())
}

fn driver_info(args: &DriverArgs) -> Result<()> {
    let driver = build_driver(args)?;
    let info = serde_json::json!({
        "kind": driver.kind(),
        "output_path": driver.output_path(),
    });
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}
