/// Factory for environment-specific Mobly drivers
///
/// The same Mobly test binary runs both on developer machines and on infra
/// bots. The factory inspects the execution environment once per call and
/// hands back the matching [`BaseDriver`] implementation.
use super::{BaseDriver, InfraDriver, LocalDriver};
use crate::env::{Environment, MissingEnvVar, ProcessEnv, BOT_ENV_TESTBED_CONFIG};
use crate::{DriverError, DriverResult, HoneydewConfig};
use std::path::PathBuf;
use std::sync::Arc;

pub struct DriverFactory {
    honeydew_config: HoneydewConfig,
    multi_device: bool,
    config_path: Option<PathBuf>,
    params_path: Option<PathBuf>,
    ssh_path: Option<PathBuf>,
    local_output_path: Option<PathBuf>,
    env: Arc<dyn Environment>,
}

impl DriverFactory {
    /// Create a factory reading the process environment.
    ///
    /// * `honeydew_config` - Honeydew configuration passed to every driver
    /// * `multi_device` - whether the test needs two or more devices
    /// * `config_path` - Mobly config file to use instead of device discovery (local only)
    /// * `params_path` - Mobly testbed params file
    /// * `ssh_path` - SSH binary handed to Fuchsia controllers (infra only)
    pub fn new(
        honeydew_config: HoneydewConfig,
        multi_device: bool,
        config_path: Option<PathBuf>,
        params_path: Option<PathBuf>,
        ssh_path: Option<PathBuf>,
    ) -> Self {
        Self {
            honeydew_config,
            multi_device,
            config_path,
            params_path,
            ssh_path,
            local_output_path: None,
            env: Arc::new(ProcessEnv),
        }
    }

    /// Read variables from `env` instead of the process environment
    pub fn with_environment(mut self, env: Arc<dyn Environment>) -> Self {
        self.env = env;
        self
    }

    /// Fixed output directory for local runs (default: fresh temp dir)
    pub fn with_local_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.local_output_path = Some(path.into());
        self
    }

    /// Returns the driver matching the current execution environment.
    ///
    /// Fails with [`DriverError::UnexpectedEnvironment`] when the testbed
    /// config variable is set but the infra driver's other required
    /// variables are not.
    pub fn get_driver(&self) -> DriverResult<Box<dyn BaseDriver>> {
        let testbed_config = self
            .env
            .var(BOT_ENV_TESTBED_CONFIG)
            .filter(|value| !value.is_empty());

        let Some(tb_json_path) = testbed_config else {
            tracing::debug!("{} not set, using local driver", BOT_ENV_TESTBED_CONFIG);
            let driver = LocalDriver::new(
                self.honeydew_config.clone(),
                self.multi_device,
                self.config_path.clone(),
                self.params_path.clone(),
                self.local_output_path.clone(),
            )?;
            return Ok(Box::new(driver));
        };

        tracing::debug!(testbed = %tb_json_path, "Using infra driver");
        match InfraDriver::new(
            PathBuf::from(tb_json_path),
            self.honeydew_config.clone(),
            self.params_path.clone(),
            self.ssh_path.clone(),
            self.env.as_ref(),
        ) {
            Ok(driver) => Ok(Box::new(driver)),
            Err(MissingEnvVar(name)) => {
                tracing::warn!(var = %name, "Infra environment is incomplete");
                Err(DriverError::UnexpectedEnvironment(name))
            }
        }
    }
}
