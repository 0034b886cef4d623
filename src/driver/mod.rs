// Mobly driver selection and config generation
//
// Organized structure:
// - factory.rs: environment-driven choice between local and infra drivers
// - local.rs: developer-machine driver (config file or ffx discovery)
// - infra.rs: driver for infra bots (Botanist testbed JSON)
// - mobly.rs: typed Mobly config model and helpers

pub mod factory;
pub mod infra;
pub mod local;
pub mod mobly;




pub use factory::DriverFactory;
pub use infra::InfraDriver;
pub use local::{FfxTargetLister, LocalDriver, TargetLister};
pub use mobly::{MoblyConfig, MoblyParams, TestBed};

use crate::{DriverError, DriverResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::Path;

/// Which execution environment a driver targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    Local,
    Infra,
}

impl fmt::Display for DriverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverKind::Local => write!(f, "local"),
            DriverKind::Infra => write!(f, "infra"),
        }
    }
}

/// Capability contract shared by every environment-specific driver.
///
/// Callers obtain a `Box<dyn BaseDriver>` from [`DriverFactory::get_driver`]
/// and never need to know which implementation they received.
pub trait BaseDriver: fmt::Debug {
    /// Environment this driver was built for
    fn kind(&self) -> DriverKind;

    /// Directory Mobly writes its logs and results to
    fn output_path(&self) -> &Path;

    /// Render the Mobly test config as YAML
    fn generate_test_config(&self) -> DriverResult<String>;

    /// Post-run cleanup and result reporting
    fn teardown(&self) -> DriverResult<()>;
}

/// Read and deserialize a YAML file
pub fn read_yaml_from_file<T: DeserializeOwned>(path: &Path) -> DriverResult<T> {
    let contents = fs::read_to_string(path).map_err(|source| DriverError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&contents).map_err(|source| DriverError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and deserialize a JSON file
pub fn read_json_from_file<T: DeserializeOwned>(path: &Path) -> DriverResult<T> {
    let contents = fs::read_to_string(path).map_err(|source| DriverError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| DriverError::Json {
        path: path.to_path_buf(),
        source,
    })
}
