use super::mobly::{self, FUCHSIA_DEVICE};
use super::{read_json_from_file, read_yaml_from_file, BaseDriver, DriverKind};
use crate::env::{Environment, MissingEnvVar, BOT_ENV_TEST_OUTDIR};
use crate::{DriverError, DriverResult, HoneydewConfig};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Botanist testbed keys that Honeydew knows under a different name
const BOTANIST_HONEYDEW_KEYS: [(&str, &str); 2] =
    [("nodename", "name"), ("ssh_key", "ssh_private_key")];

/// Key carrying the controller type in Botanist testbed entries
const BOTANIST_TYPE_KEY: &str = "type";

/// Driver for Mobly tests launched by infra bots
#[derive(Debug)]
pub struct InfraDriver {
    tb_json_path: PathBuf,
    honeydew_config: HoneydewConfig,
    params_path: Option<PathBuf>,
    ssh_path: Option<PathBuf>,
    output_path: PathBuf,
}

impl InfraDriver {
    pub const TESTBED_NAME: &'static str = "InfraTestbed";

    /// Create an infra driver.
    ///
    /// Test outputs go to the directory infra exports as
    /// `FUCHSIA_TEST_OUTDIR`, which must be set.
    pub fn new(
        tb_json_path: PathBuf,
        honeydew_config: HoneydewConfig,
        params_path: Option<PathBuf>,
        ssh_path: Option<PathBuf>,
        env: &dyn Environment,
    ) -> Result<Self, MissingEnvVar> {
        let output_path = PathBuf::from(env.require(BOT_ENV_TEST_OUTDIR)?);

        Ok(Self {
            tb_json_path,
            honeydew_config,
            params_path,
            ssh_path,
            output_path,
        })
    }

    pub fn testbed_config_path(&self) -> &Path {
        &self.tb_json_path
    }

    pub fn ssh_path(&self) -> Option<&Path> {
        self.ssh_path.as_deref()
    }

    /// Translate Botanist testbed entries into Mobly controllers
    pub(crate) fn botanist_to_controllers(
        testbed: Value,
        ssh_path: Option<&Path>,
    ) -> DriverResult<Vec<(String, Value)>> {
        let Value::Array(entries) = testbed else {
            return Err(DriverError::InvalidConfig(
                "testbed config must be a JSON array".to_string(),
            ));
        };

        let mut controllers = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            let Value::Object(mut entry) = entry else {
                return Err(DriverError::InvalidConfig(format!(
                    "testbed entry {} is not an object",
                    index
                )));
            };

            let controller_type = match entry.remove(BOTANIST_TYPE_KEY) {
                Some(Value::String(t)) => t,
                _ => {
                    return Err(DriverError::InvalidConfig(format!(
                        "testbed entry {} has no string \"{}\"",
                        index, BOTANIST_TYPE_KEY
                    )))
                }
            };

            if controller_type == FUCHSIA_DEVICE {
                for (botanist_key, honeydew_key) in BOTANIST_HONEYDEW_KEYS {
                    if let Some(value) = entry.remove(botanist_key) {
                        entry.insert(honeydew_key.to_string(), value);
                    }
                }
                if let Some(ssh_path) = ssh_path {
                    entry.insert(
                        "ssh_path".to_string(),
                        Value::String(ssh_path.display().to_string()),
                    );
                }
            }

            controllers.push((controller_type, Value::Object(entry)));
        }

        Ok(controllers)
    }
}

impl BaseDriver for InfraDriver {
    fn kind(&self) -> DriverKind {
        DriverKind::Infra
    }

    fn output_path(&self) -> &Path {
        &self.output_path
    }

    fn generate_test_config(&self) -> DriverResult<String> {
        tracing::info!(
            testbed = %self.tb_json_path.display(),
            "Generating Mobly config from infra testbed"
        );

        let testbed: Value = read_json_from_file(&self.tb_json_path)?;
        let controllers = Self::botanist_to_controllers(testbed, self.ssh_path.as_deref())?;
        let params = self
            .params_path
            .as_deref()
            .map(read_yaml_from_file::<Value>)
            .transpose()?;

        mobly::new_testbed_config(
            Self::TESTBED_NAME,
            &self.output_path,
            controllers,
            params,
            &self.honeydew_config,
        )
        .to_yaml()
    }

    fn teardown(&self) -> DriverResult<()> {
        let latest = mobly::latest_output_dir(&self.output_path, Self::TESTBED_NAME);
        if latest.exists() {
            tracing::info!(results = %latest.display(), "Mobly results written");
        } else {
            tracing::warn!(
                results = %latest.display(),
                "No Mobly results found; did the test run?"
            );
        }
        Ok(())
    }
}
