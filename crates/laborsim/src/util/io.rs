//! I/O utility functions

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Sibling path used while a write is in flight: `data.csv` -> `data.csv.tmp`
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("output"));
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write bytes to a file atomically using write-then-rename pattern.
///
/// Readers of `path` see either the previous content or the complete new
/// content, never a partially written dataset.
pub fn atomic_write_bytes(path: &Path, content: &[u8]) -> io::Result<()> {
    let temp_path = temp_path(path);
    fs::write(&temp_path, content)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}
