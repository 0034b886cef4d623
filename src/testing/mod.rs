// Test doubles for harness code
//
// - copy_recorder.rs: records copy requests instead of touching the filesystem

pub mod copy_recorder;

pub use copy_recorder::{
    bind_copy_recorder, mock_fast_copy_in, record_copy, CopyContext, CopyRecorder, FastCopy,
    FileEntry, StdCopier, TrackedCopies,
};
