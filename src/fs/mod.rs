//! Filesystem provider abstraction
//!
//! The detection engine never touches the disk directly. Detectors and content
//! matchers read through the [`FileSystem`] trait, which makes the whole
//! pipeline testable against an in-memory tree and lets the caller enforce
//! size limits before content matching.

mod memory;
mod os;

pub use memory::MemoryFileSystem;
pub use os::OsFileSystem;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// A directory entry returned by list_dir
#[derive(Debug, Clone)]
pub struct DirEntry {
    pub path: PathBuf,
    pub name: String,
    pub is_dir: bool,
}

impl DirEntry {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> &str {
        &self.name
    }
}

/// Abstraction over file system operations consumed by detectors
pub trait FileSystem: Send + Sync {
    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Size of a file in bytes
    fn file_size(&self, path: &Path) -> Result<u64>;

    /// Read file contents as text
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Read up to `max_bytes` from a file
    fn read_bytes(&self, path: &Path, max_bytes: usize) -> Result<Vec<u8>>;

    /// List directory contents
    fn list_dir(&self, path: &Path) -> Result<Vec<DirEntry>>;

    /// Root path this provider serves
    fn base_path(&self) -> &Path;
}
