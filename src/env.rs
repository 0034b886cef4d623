/// Execution-environment lookups
///
/// Driver selection depends on variables exported by the infrastructure
/// test launcher. Reads go through the [`Environment`] trait so callers can
/// inject a fixed context instead of the real process environment.
use std::collections::HashMap;
use thiserror::Error;

/// Path to the Botanist testbed JSON. Only set when running in infra.
pub const BOT_ENV_TESTBED_CONFIG: &str = "FUCHSIA_TESTBED_CONFIG";

/// Directory where infra collects test outputs.
pub const BOT_ENV_TEST_OUTDIR: &str = "FUCHSIA_TEST_OUTDIR";

/// A required variable was not present.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("missing env var: {0}")]
pub struct MissingEnvVar(pub String);

/// Source of environment variables
#[cfg_attr(test, mockall::automock)]
pub trait Environment: Send + Sync {
    /// Value of `name`, or `None` when unset or not valid unicode
    fn var(&self, name: &str) -> Option<String>;

    /// Value of `name`, failing when it is unset
    fn require(&self, name: &str) -> Result<String, MissingEnvVar> {
        self.var(name).ok_or_else(|| MissingEnvVar(name.to_string()))
    }
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Fixed in-memory environment
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.vars.insert(name.to_string(), value.into());
        self
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.vars.insert(name.to_string(), value.into());
    }

    pub fn remove(&mut self, name: &str) {
        self.vars.remove(name);
    }
}

impl Environment for MapEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

impl<const N: usize> From<[(&str, &str); N]> for MapEnv {
    fn from(pairs: [(&str, &str); N]) -> Self {
        let mut env = MapEnv::new();
        for (name, value) in pairs {
            env.set(name, value);
        }
        env
    }
}
