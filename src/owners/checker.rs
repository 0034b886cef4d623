use super::BrokenIncludeReport;
use regex::Regex;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

lazy_static::lazy_static! {
    // Either `include <path>` or `file: <path>`, anywhere on the line
    static ref INCLUDE_DIRECTIVE: Regex = Regex::new(r"(include\s+|file:\s*)(\S+)")
        .expect("include directive pattern is valid");

    // `\r\n`, lone `\r` and `\n` all end a line
    static ref LINE_BREAK: Regex = Regex::new(r"\r\n|\r|\n")
        .expect("line break pattern is valid");
}

/// Path referenced by an include directive on `line`, if any.
///
/// Everything from the first `#` onward is a comment and ignored.
pub fn extract_include(line: &str) -> Option<&str> {
    let line = line.split('#').next().unwrap_or_default();
    INCLUDE_DIRECTIVE
        .captures(line)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str())
}

/// Finds include directives whose target does not exist
#[derive(Debug, Clone)]
pub struct OwnersIncludeChecker {
    /// Directory that `/`-rooted include paths and relative OWNERS paths resolve against
    root: PathBuf,
}

impl OwnersIncludeChecker {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Checker rooted at the process's current working directory
    pub fn from_current_dir() -> io::Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read `owners_file` and report its broken include lines
    pub fn check_file(&self, owners_file: &Path) -> io::Result<BrokenIncludeReport> {
        let contents = fs::read_to_string(self.root.join(owners_file))?;
        Ok(self.check_contents(owners_file, &contents))
    }

    /// Report broken include lines in `contents`, read from `owners_file`
    pub fn check_contents(&self, owners_file: &Path, contents: &str) -> BrokenIncludeReport {
        let mut lines = Vec::new();

        for (index, line) in LINE_BREAK.split(contents).enumerate() {
            let Some(include_path) = extract_include(line) else {
                continue;
            };

            let resolved = self.resolve_include(owners_file, include_path);
            if !resolved.exists() {
                let line_number = index + 1;
                tracing::debug!(
                    owners = %owners_file.display(),
                    line = line_number,
                    target = %resolved.display(),
                    "Broken OWNERS include"
                );
                lines.push(line_number);
            }
        }

        BrokenIncludeReport { lines }
    }

    /// Absolute, normalized location of `include_path` as referenced from `owners_file`.
    ///
    /// `include` and `file:` directives resolve the same way.
    pub fn resolve_include(&self, owners_file: &Path, include_path: &str) -> PathBuf {
        let joined = if include_path.starts_with('/') {
            self.root.join(include_path.trim_start_matches('/'))
        } else {
            let owners_dir = owners_file.parent().unwrap_or_else(|| Path::new(""));
            self.root.join(owners_dir).join(include_path)
        };
        normalize_lexically(&joined)
    }
}

/// Collapse `.` and `..` components without touching the filesystem
pub(crate) fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::Normal(_) => {
                normalized.push(component.as_os_str())
            }
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                // `..` at the root stays at the root
                Some(Component::RootDir | Component::Prefix(_)) => {}
                // Leading `..` components accumulate
                _ => normalized.push(".."),
            },
        }
    }

    normalized
}
