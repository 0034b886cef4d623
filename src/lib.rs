pub mod driver;
pub mod env;
pub mod honeydew;
pub mod owners;
pub mod testing;

// Re-export the driver entry points for convenience
pub use driver::{BaseDriver, DriverFactory, DriverKind};
pub use env::{Environment, MapEnv, MissingEnvVar, ProcessEnv};

use std::path::PathBuf;
use thiserror::Error;

/// Opaque Honeydew device-control configuration.
///
/// The drivers never interpret it; it is embedded verbatim into every
/// `FuchsiaDevice` controller of the generated Mobly config.
pub type HoneydewConfig = serde_json::Map<String, serde_json::Value>;

// Error type for driver selection and Mobly config generation
#[derive(Error, Debug)]
pub enum DriverError {
    #[error("Unexpected execution environment - missing env var: {0}")]
    UnexpectedEnvironment(String),

    #[error("No Fuchsia devices found")]
    NoDevices,

    #[error("More than one Fuchsia device found ({}); pass a config file or enable multi-device mode", .0.join(", "))]
    TooManyDevices(Vec<String>),

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML from {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to parse JSON from {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Device discovery failed: {0}")]
    Discovery(String),

    #[error("Failed to serialize Mobly config: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

impl From<MissingEnvVar> for DriverError {
    fn from(err: MissingEnvVar) -> Self {
        DriverError::UnexpectedEnvironment(err.0)
    }
}

pub type DriverResult<T> = Result<T, DriverError>;
