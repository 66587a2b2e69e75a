//! Detector contract
//!
//! Detectors are the only producers of [`Component`](crate::model::Component)
//! nodes. Each one inspects a single directory at a time through the
//! [`DetectContext`] handed to it and returns the components it found; the
//! scanner owns tree assembly. Ecosystem-specific detectors (manifest and
//! lock-file parsers) plug in through the same trait.

mod rule_based;

pub use rule_based::RuleBasedDetector;

use crate::fs::FileSystem;
use crate::matching::MatcherSet;
use crate::model::Component;
use std::path::Path;

/// Everything a detector may consult for one directory
pub struct DetectContext<'a> {
    /// File names (not paths) present in the directory
    pub files: &'a [String],
    /// Directory being scanned, absolute
    pub dir: &'a Path,
    /// Scan root, absolute
    pub root: &'a Path,
    pub fs: &'a dyn FileSystem,
    /// Compiled matchers and classification tables for the active rule set
    pub matchers: &'a MatcherSet,
    /// Files larger than this are excluded from content matching
    pub max_content_bytes: u64,
}

impl DetectContext<'_> {
    /// Directory path relative to the scan root, `"."` for the root itself.
    pub fn relative_dir(&self) -> String {
        match self.dir.strip_prefix(self.root) {
            Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
            Ok(rel) => rel.to_string_lossy().replace('\\', "/"),
            Err(_) => self.dir.to_string_lossy().replace('\\', "/"),
        }
    }
}

/// A technology detector scanning one directory at a time
pub trait Detector: Send + Sync {
    fn name(&self) -> &str;

    /// Detect components in one directory. Read/access failures on single
    /// files abandon that file, not the scan.
    fn detect(&self, ctx: &DetectContext<'_>) -> anyhow::Result<Vec<Component>>;
}

/// Explicit registry of detectors, consulted in registration order
#[derive(Default)]
pub struct DetectorRegistry {
    detectors: Vec<Box<dyn Detector>>,
}

impl DetectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(RuleBasedDetector));
        registry
    }

    pub fn register(&mut self, detector: Box<dyn Detector>) {
        self.detectors.push(detector);
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Detector> {
        self.detectors.iter().map(|d| d.as_ref())
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFileSystem;
    use crate::rules::RuleSet;

    #[test]
    fn test_relative_dir() {
        let fs = MemoryFileSystem::new("/repo");
        let matchers = MatcherSet::compile(&RuleSet::builtin());
        let files: Vec<String> = vec![];
        let ctx = |dir: &'static str| DetectContext {
            files: &files,
            dir: Path::new(dir),
            root: Path::new("/repo"),
            fs: &fs,
            matchers: &matchers,
            max_content_bytes: 1024,
        };
        assert_eq!(ctx("/repo").relative_dir(), ".");
        assert_eq!(ctx("/repo/services/api").relative_dir(), "services/api");
    }

    #[test]
    fn test_default_registry_has_rule_based_detector() {
        let registry = DetectorRegistry::with_defaults();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.iter().next().unwrap().name(), "rules");
    }
}
