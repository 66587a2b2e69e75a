//! In-memory filesystem provider for tests

use super::{DirEntry, FileSystem};
use anyhow::{anyhow, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Filesystem provider backed by an in-memory map of paths to contents.
///
/// Directories are implied by the paths of the files they contain.
pub struct MemoryFileSystem {
    base: PathBuf,
    files: BTreeMap<PathBuf, Vec<u8>>,
}

impl MemoryFileSystem {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            files: BTreeMap::new(),
        }
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) -> Self {
        self.add_file(path, content);
        self
    }

    pub fn add_file(&mut self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) {
        self.files.insert(self.base.join(path.into()), content.into());
    }

    fn is_implied_dir(&self, path: &Path) -> bool {
        path == self.base || self.files.keys().any(|p| p.starts_with(path) && p != path)
    }
}

impl FileSystem for MemoryFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path) || self.is_implied_dir(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        !self.files.contains_key(path) && self.is_implied_dir(path)
    }

    fn file_size(&self, path: &Path) -> Result<u64> {
        self.files
            .get(path)
            .map(|c| c.len() as u64)
            .ok_or_else(|| anyhow!("no such file: {}", path.display()))
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        let bytes = self
            .files
            .get(path)
            .ok_or_else(|| anyhow!("no such file: {}", path.display()))?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    fn read_bytes(&self, path: &Path, max_bytes: usize) -> Result<Vec<u8>> {
        let bytes = self
            .files
            .get(path)
            .ok_or_else(|| anyhow!("no such file: {}", path.display()))?;
        Ok(bytes[..bytes.len().min(max_bytes)].to_vec())
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        if !self.is_implied_dir(path) {
            return Err(anyhow!("no such directory: {}", path.display()));
        }
        let mut seen = std::collections::BTreeSet::new();
        let mut entries = Vec::new();
        for file in self.files.keys() {
            let Ok(rest) = file.strip_prefix(path) else {
                continue;
            };
            let Some(first) = rest.components().next() else {
                continue;
            };
            let name = first.as_os_str().to_string_lossy().into_owned();
            if seen.insert(name.clone()) {
                let child = path.join(&name);
                entries.push(DirEntry {
                    is_dir: self.files.keys().any(|p| p.starts_with(&child) && p != &child),
                    path: child,
                    name,
                });
            }
        }
        Ok(entries)
    }

    fn base_path(&self) -> &Path {
        &self.base
    }
}
