//! OS-backed filesystem provider

use super::{DirEntry, FileSystem};
use anyhow::{Context, Result};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Filesystem provider reading directly from the operating system
pub struct OsFileSystem {
    base: PathBuf,
}

impl OsFileSystem {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }
}

impl FileSystem for OsFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn file_size(&self, path: &Path) -> Result<u64> {
        let meta = fs::metadata(path)
            .with_context(|| format!("failed to stat {}", path.display()))?;
        Ok(meta.len())
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    }

    fn read_bytes(&self, path: &Path, max_bytes: usize) -> Result<Vec<u8>> {
        let file = fs::File::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        let mut buf = Vec::with_capacity(max_bytes.min(64 * 1024));
        file.take(max_bytes as u64)
            .read_to_end(&mut buf)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(buf)
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)
            .with_context(|| format!("failed to list {}", path.display()))?
        {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            entries.push(DirEntry {
                path: entry.path(),
                name,
                is_dir,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn base_path(&self) -> &Path {
        &self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_and_list() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "hello").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let fs = OsFileSystem::new(dir.path());
        assert!(fs.exists(&dir.path().join("a.txt")));
        assert!(fs.is_dir(&dir.path().join("sub")));
        assert_eq!(fs.file_size(&dir.path().join("a.txt")).unwrap(), 5);
        assert_eq!(
            fs.read_to_string(&dir.path().join("a.txt")).unwrap(),
            "hello"
        );

        let entries = fs.list_dir(dir.path()).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.file_name()).collect();
        assert_eq!(names, vec!["a.txt", "sub"]);
    }

    #[test]
    fn test_read_bytes_truncates() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("big.bin"), vec![0u8; 1024]).unwrap();

        let fs = OsFileSystem::new(dir.path());
        let bytes = fs.read_bytes(&dir.path().join("big.bin"), 100).unwrap();
        assert_eq!(bytes.len(), 100);
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let fs = OsFileSystem::new(dir.path());
        assert!(fs.read_to_string(&dir.path().join("nope")).is_err());
        assert!(fs.file_size(&dir.path().join("nope")).is_err());
    }
}
