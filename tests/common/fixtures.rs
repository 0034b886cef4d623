/// Fixture builders for integration tests
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Scratch source tree rooted in a temp directory
pub struct SourceTree {
    pub root: TempDir,
}

impl SourceTree {
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            root: TempDir::new()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Write `contents` to `relative`, creating parent directories
    pub fn write(&self, relative: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.root.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }
}

/// Botanist testbed with one Fuchsia device and one access point
#[allow(dead_code)]
pub const BOTANIST_TESTBED: &str = r#"[
  {
    "type": "FuchsiaDevice",
    "nodename": "fuchsia-d88c-796c-e57e",
    "ipv4": "192.168.42.112",
    "ssh_key": "/etc/botanist/keys/pkey_infra"
  },
  {
    "type": "AccessPoint",
    "ip": "192.168.42.11"
  }
]"#;

#[allow(dead_code)]
pub const MOBLY_PARAMS: &str = "ssid: test-network\niterations: 3\n";
