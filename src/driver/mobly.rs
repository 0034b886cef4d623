/// Mobly test configuration model
///
/// Mirrors the YAML layout Mobly consumes:
///
/// ```text
/// TestBeds:
///   - Name: InfraTestbed
///     Controllers:
///       FuchsiaDevice:
///         - name: fuchsia-emulator
///     TestParams: {...}
/// MoblyParams:
///   LogPath: /tmp/out
/// ```
///
/// Unknown keys are preserved so user-supplied configs round-trip.
use crate::{DriverResult, HoneydewConfig};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Controller key for Fuchsia targets
pub const FUCHSIA_DEVICE: &str = "FuchsiaDevice";

/// Key under which the Honeydew config is attached to each Fuchsia device
pub const HONEYDEW_CONFIG_KEY: &str = "honeydew_config";

/// Symlink Mobly maintains to the most recent run of a testbed
pub const LATEST_DIR: &str = "latest";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoblyConfig {
    #[serde(rename = "TestBeds")]
    pub test_beds: Vec<TestBed>,

    #[serde(rename = "MoblyParams", default)]
    pub mobly_params: MoblyParams,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoblyParams {
    #[serde(rename = "LogPath", default, skip_serializing_if = "Option::is_none")]
    pub log_path: Option<PathBuf>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestBed {
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Controllers", default)]
    pub controllers: BTreeMap<String, Vec<Value>>,

    #[serde(rename = "TestParams", default, skip_serializing_if = "Option::is_none")]
    pub test_params: Option<Value>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl TestBed {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            controllers: BTreeMap::new(),
            test_params: None,
            extra: BTreeMap::new(),
        }
    }

    /// Append a controller entry under its controller type
    pub fn add_controller(&mut self, controller_type: &str, entry: Value) {
        self.controllers
            .entry(controller_type.to_string())
            .or_default()
            .push(entry);
    }
}

/// Build a single-testbed Mobly config
pub fn new_testbed_config(
    testbed_name: &str,
    log_path: &Path,
    controllers: Vec<(String, Value)>,
    test_params: Option<Value>,
    honeydew_config: &HoneydewConfig,
) -> MoblyConfig {
    let mut testbed = TestBed::new(testbed_name);
    for (controller_type, entry) in controllers {
        testbed.add_controller(&controller_type, entry);
    }
    testbed.test_params = test_params;

    let mut config = MoblyConfig {
        test_beds: vec![testbed],
        mobly_params: MoblyParams::default(),
        extra: BTreeMap::new(),
    };
    config.set_log_path(log_path);
    config.set_honeydew_config(honeydew_config);
    config
}

impl MoblyConfig {
    /// Replace `TestParams` on every testbed
    pub fn set_test_params(&mut self, params: &Value) {
        for testbed in &mut self.test_beds {
            testbed.test_params = Some(params.clone());
        }
    }

    /// Attach the Honeydew config to every Fuchsia device entry.
    ///
    /// An empty config leaves the entries untouched.
    pub fn set_honeydew_config(&mut self, honeydew_config: &HoneydewConfig) {
        if honeydew_config.is_empty() {
            return;
        }
        for testbed in &mut self.test_beds {
            let Some(devices) = testbed.controllers.get_mut(FUCHSIA_DEVICE) else {
                continue;
            };
            for device in devices.iter_mut() {
                if let Value::Object(entry) = device {
                    entry.insert(
                        HONEYDEW_CONFIG_KEY.to_string(),
                        Value::Object(honeydew_config.clone()),
                    );
                }
            }
        }
    }

    pub fn set_log_path(&mut self, log_path: &Path) {
        self.mobly_params.log_path = Some(log_path.to_path_buf());
    }

    pub fn to_yaml(&self) -> DriverResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }
}

/// Directory holding the most recent Mobly results for `testbed_name`
pub fn latest_output_dir(log_path: &Path, testbed_name: &str) -> PathBuf {
    log_path.join(testbed_name).join(LATEST_DIR)
}
