/// Copy-call recorder
///
/// Assembly-style code copies files through a `fast_copy` seam. In tests the
/// seam is replaced with a recorder that appends each `(source, destination)`
/// request to a list and hands back the source path, so call history can be
/// asserted without any real I/O.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// One requested copy
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileEntry {
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl FileEntry {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }
}

/// Shared, ordered list of recorded copies
pub type TrackedCopies = Arc<Mutex<Vec<FileEntry>>>;

/// Record a copy of `source` to `destination` in `tracked_copies`.
///
/// Returns `source` unchanged, standing in for the path of the copied file.
pub fn record_copy(
    source: &Path,
    destination: &Path,
    tracked_copies: &mut Vec<FileEntry>,
) -> PathBuf {
    tracked_copies.push(FileEntry::new(source, destination));
    source.to_path_buf()
}

/// A copy function bound to a fresh list, plus that list for inspection
pub fn bind_copy_recorder() -> (
    impl Fn(&Path, &Path) -> PathBuf + Clone + Send + Sync,
    TrackedCopies,
) {
    let copies: TrackedCopies = Arc::new(Mutex::new(Vec::new()));
    let tracked = Arc::clone(&copies);
    let copy = move |source: &Path, destination: &Path| {
        let mut list = tracked.lock().unwrap_or_else(PoisonError::into_inner);
        record_copy(source, destination, &mut list)
    };
    (copy, copies)
}

/// Something that can copy a file
pub trait FastCopy: Send + Sync {
    /// Copy `source` to `destination`, returning the path of the result
    fn fast_copy(&self, source: &Path, destination: &Path) -> io::Result<PathBuf>;
}

/// Copier backed by `std::fs::copy`
#[derive(Debug, Clone, Copy, Default)]
pub struct StdCopier {
    create_parents: bool,
}

impl StdCopier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copier that creates missing destination directories first
    pub fn with_parent_dirs() -> Self {
        Self {
            create_parents: true,
        }
    }
}

impl FastCopy for StdCopier {
    fn fast_copy(&self, source: &Path, destination: &Path) -> io::Result<PathBuf> {
        if self.create_parents {
            if let Some(parent) = destination.parent() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::copy(source, destination)?;
        Ok(destination.to_path_buf())
    }
}

/// Test double that records copies instead of performing them
#[derive(Debug, Clone, Default)]
pub struct CopyRecorder {
    copies: TrackedCopies,
}

impl CopyRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one copy request and return its source
    pub fn record(&self, source: &Path, destination: &Path) -> PathBuf {
        let mut copies = self.copies.lock().unwrap_or_else(PoisonError::into_inner);
        record_copy(source, destination, &mut copies)
    }

    /// Snapshot of every copy recorded so far, in call order
    pub fn copies(&self) -> Vec<FileEntry> {
        self.copies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The shared backing list
    pub fn tracked(&self) -> TrackedCopies {
        Arc::clone(&self.copies)
    }

    pub fn len(&self) -> usize {
        self.copies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FastCopy for CopyRecorder {
    fn fast_copy(&self, source: &Path, destination: &Path) -> io::Result<PathBuf> {
        Ok(self.record(source, destination))
    }
}

/// The copy seams used by assembly code
#[derive(Clone)]
pub struct CopyContext {
    pub fast_copy: Arc<dyn FastCopy>,
    pub fast_copy_makedirs: Arc<dyn FastCopy>,
}

impl Default for CopyContext {
    fn default() -> Self {
        Self {
            fast_copy: Arc::new(StdCopier::new()),
            fast_copy_makedirs: Arc::new(StdCopier::with_parent_dirs()),
        }
    }
}

/// Install a recorder into both copy seams of `context` and return it.
///
/// Reuses `recorder` when given so several contexts can share one history.
pub fn mock_fast_copy_in(context: &mut CopyContext, recorder: Option<CopyRecorder>) -> CopyRecorder {
    let recorder = recorder.unwrap_or_default();
    let shared: Arc<dyn FastCopy> = Arc::new(recorder.clone());
    context.fast_copy = Arc::clone(&shared);
    context.fast_copy_makedirs = shared;
    recorder
}
