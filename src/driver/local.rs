use super::mobly::{self, MoblyConfig, FUCHSIA_DEVICE};
use super::{read_yaml_from_file, BaseDriver, DriverKind};
use crate::{DriverError, DriverResult, HoneydewConfig};
use serde::Deserialize;
use serde_json::{json, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;
use tempfile::TempDir;

/// Lists the Fuchsia targets reachable from this host
#[cfg_attr(test, mockall::automock)]
pub trait TargetLister: Send + Sync {
    /// Node names of every visible target
    fn list_targets(&self) -> DriverResult<Vec<String>>;
}

/// Discovers targets through `ffx --machine json target list`
#[derive(Debug, Clone)]
pub struct FfxTargetLister {
    ffx_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct FfxTarget {
    #[serde(default)]
    nodename: Option<String>,
}

impl FfxTargetLister {
    pub fn new(ffx_path: impl Into<PathBuf>) -> Self {
        Self {
            ffx_path: ffx_path.into(),
        }
    }

    /// Extract node names from ffx's machine-readable target list
    pub(crate) fn parse_target_list(output: &str) -> DriverResult<Vec<String>> {
        let output = output.trim();
        if output.is_empty() {
            return Ok(Vec::new());
        }

        let targets: Vec<FfxTarget> = serde_json::from_str(output)
            .map_err(|e| DriverError::Discovery(format!("unparseable ffx output: {}", e)))?;

        Ok(targets
            .into_iter()
            .filter_map(|target| target.nodename)
            .filter(|name| !name.is_empty())
            .collect())
    }
}

impl Default for FfxTargetLister {
    fn default() -> Self {
        Self::new("ffx")
    }
}

impl TargetLister for FfxTargetLister {
    fn list_targets(&self) -> DriverResult<Vec<String>> {
        tracing::debug!(ffx = %self.ffx_path.display(), "Listing Fuchsia targets");

        let output = Command::new(&self.ffx_path)
            .args(["--machine", "json", "target", "list"])
            .output()
            .map_err(|e| {
                DriverError::Discovery(format!(
                    "failed to run {}: {}",
                    self.ffx_path.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            return Err(DriverError::Discovery(format!(
                "ffx target list exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Self::parse_target_list(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Driver for running Mobly tests from a developer machine
pub struct LocalDriver {
    honeydew_config: HoneydewConfig,
    multi_device: bool,
    config_path: Option<PathBuf>,
    params_path: Option<PathBuf>,
    output_path: PathBuf,
    // Removed on drop unless a config was generated into it
    temp_output: Mutex<Option<TempDir>>,
    target_lister: Box<dyn TargetLister>,
}

impl LocalDriver {
    pub const TESTBED_NAME: &'static str = "LocalTestbed";

    /// Create a local driver.
    ///
    /// Without `output_path` a fresh temporary directory is used. It is kept
    /// once `generate_test_config` succeeds and removed with the driver
    /// otherwise.
    pub fn new(
        honeydew_config: HoneydewConfig,
        multi_device: bool,
        config_path: Option<PathBuf>,
        params_path: Option<PathBuf>,
        output_path: Option<PathBuf>,
    ) -> DriverResult<Self> {
        let (output_path, temp_output) = match output_path {
            Some(path) => (path, None),
            None => {
                let dir = tempfile::Builder::new()
                    .prefix("mobly_driver_")
                    .tempdir()
                    .map_err(|source| DriverError::Io {
                        path: std::env::temp_dir(),
                        source,
                    })?;
                (dir.path().to_path_buf(), Some(dir))
            }
        };

        Ok(Self {
            honeydew_config,
            multi_device,
            config_path,
            params_path,
            output_path,
            temp_output: Mutex::new(temp_output),
            target_lister: Box::new(FfxTargetLister::default()),
        })
    }

    /// Stop the temporary output directory from being removed on drop
    fn keep_output_dir(&self) {
        let dir = match self.temp_output.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(dir) = dir {
            let kept = dir.keep();
            tracing::debug!(output = %kept.display(), "Keeping local output directory");
        }
    }

    /// Replace the device discovery backend
    pub fn with_target_lister(mut self, target_lister: Box<dyn TargetLister>) -> Self {
        self.target_lister = target_lister;
        self
    }

    fn read_params(&self) -> DriverResult<Option<Value>> {
        self.params_path
            .as_deref()
            .map(read_yaml_from_file::<Value>)
            .transpose()
    }

    fn config_from_file(&self, config_path: &Path) -> DriverResult<MoblyConfig> {
        tracing::info!(config = %config_path.display(), "Using user-supplied Mobly config");

        let mut config: MoblyConfig = read_yaml_from_file(config_path)?;
        if config.test_beds.is_empty() {
            return Err(DriverError::InvalidConfig(format!(
                "{} does not define any TestBeds",
                config_path.display()
            )));
        }

        if let Some(params) = self.read_params()? {
            config.set_test_params(&params);
        }
        config.set_honeydew_config(&self.honeydew_config);
        config.set_log_path(&self.output_path);
        Ok(config)
    }

    fn config_from_discovery(&self) -> DriverResult<MoblyConfig> {
        let targets = self.target_lister.list_targets()?;
        tracing::info!(count = targets.len(), "Discovered Fuchsia targets");

        if targets.is_empty() {
            return Err(DriverError::NoDevices);
        }
        if targets.len() > 1 && !self.multi_device {
            return Err(DriverError::TooManyDevices(targets));
        }

        let controllers = targets
            .into_iter()
            .map(|name| (FUCHSIA_DEVICE.to_string(), json!({ "name": name })))
            .collect();

        Ok(mobly::new_testbed_config(
            Self::TESTBED_NAME,
            &self.output_path,
            controllers,
            self.read_params()?,
            &self.honeydew_config,
        ))
    }
}

impl fmt::Debug for LocalDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalDriver")
            .field("multi_device", &self.multi_device)
            .field("config_path", &self.config_path)
            .field("params_path", &self.params_path)
            .field("output_path", &self.output_path)
            .finish_non_exhaustive()
    }
}

impl BaseDriver for LocalDriver {
    fn kind(&self) -> DriverKind {
        DriverKind::Local
    }

    fn output_path(&self) -> &Path {
        &self.output_path
    }

    fn generate_test_config(&self) -> DriverResult<String> {
        let config = match &self.config_path {
            Some(config_path) => self.config_from_file(config_path)?,
            None => self.config_from_discovery()?,
        };
        let yaml = config.to_yaml()?;
        self.keep_output_dir();
        Ok(yaml)
    }

    fn teardown(&self) -> DriverResult<()> {
        // User configs name their own testbeds
        let results = match &self.config_path {
            Some(_) => self.output_path.clone(),
            None => mobly::latest_output_dir(&self.output_path, Self::TESTBED_NAME),
        };
        tracing::info!(results = %results.display(), "Mobly results written");
        Ok(())
    }
}
