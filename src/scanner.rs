//! Scan orchestration
//!
//! Walks the project tree (gitignore-aware), hands each directory to the
//! registered detectors, assembles the component tree, then runs identity
//! assignment and reference resolution over the frozen result. All tree
//! mutation happens sequentially on the calling thread; detectors only ever
//! see one directory at a time.

use crate::config::{ConfigError, ScanConfig};
use crate::detect::{DetectContext, DetectorRegistry};
use crate::fs::OsFileSystem;
use crate::identity::{assign_ids, resolve_root_id, IdentityError};
use crate::matching::MatcherSet;
use crate::model::{Component, ComponentTree, NodeId};
use crate::resolve::{resolve_references, ProviderRegistry};
use crate::rules::{RuleError, RuleSet};
use ignore::WalkBuilder;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Rules(#[from] RuleError),

    #[error(transparent)]
    Identity(#[from] IdentityError),
}

/// Result of one scan: the finished tree and its resolved root identifier.
pub struct ScanOutcome {
    pub tree: ComponentTree,
    pub root_id: String,
}

/// One-scan orchestrator tying the engine pieces together
pub struct Scanner {
    config: ScanConfig,
    matchers: MatcherSet,
    detectors: DetectorRegistry,
    providers: ProviderRegistry,
}

impl Scanner {
    /// Build a scanner from configuration, compiling the configured rule
    /// file or the built-in rule set.
    pub fn new(config: ScanConfig) -> Result<Self, ScanError> {
        config.validate()?;
        let rules = match &config.rules_file {
            Some(path) => RuleSet::from_file(path)?,
            None => RuleSet::builtin(),
        };
        Ok(Self::with_rules(config, &rules))
    }

    /// Build a scanner over an explicit rule set.
    pub fn with_rules(config: ScanConfig, rules: &RuleSet) -> Self {
        Self {
            config,
            matchers: MatcherSet::compile(rules),
            detectors: DetectorRegistry::with_defaults(),
            providers: ProviderRegistry::with_defaults(),
        }
    }

    pub fn detectors_mut(&mut self) -> &mut DetectorRegistry {
        &mut self.detectors
    }

    pub fn providers_mut(&mut self) -> &mut ProviderRegistry {
        &mut self.providers
    }

    /// Run the scan: walk, detect, assemble, stamp identities, resolve
    /// references.
    pub fn scan(&self) -> Result<ScanOutcome, ScanError> {
        let root = &self.config.root;
        let fs = OsFileSystem::new(root.clone());
        let directories = self.collect_directories(root)?;
        info!(
            root = %root.display(),
            directories = directories.len(),
            "scanning"
        );

        let root_name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.to_string_lossy().into_owned());
        let mut tree = ComponentTree::new(Component::new(root_name).with_path("."));

        // map of relative dir -> node, for nearest-ancestor attachment;
        // BTreeMap iteration keeps parents before children
        let mut attached: BTreeMap<String, NodeId> = BTreeMap::new();
        attached.insert(".".to_string(), tree.root());

        for (dir, files) in &directories {
            let ctx = DetectContext {
                files,
                dir,
                root,
                fs: &fs,
                matchers: &self.matchers,
                max_content_bytes: self.config.max_content_bytes,
            };
            let rel_dir = ctx.relative_dir();
            for detector in self.detectors.iter() {
                let found = match detector.detect(&ctx) {
                    Ok(found) => found,
                    Err(err) => {
                        warn!(detector = detector.name(), dir = %rel_dir, %err, "detector failed");
                        continue;
                    }
                };
                for component in found {
                    let parent = nearest_ancestor(&attached, &rel_dir);
                    let node = tree.add_child(parent, component);
                    attached.entry(rel_dir.clone()).or_insert(node);
                }
            }
        }

        let root_id = resolve_root_id(&self.config.root_id_options())?;
        assign_ids(&mut tree, &root_id);
        resolve_references(&mut tree, &self.providers);

        debug!(components = tree.len(), root_id = %root_id, "scan complete");
        Ok(ScanOutcome { tree, root_id })
    }

    /// Walk the root and group file names per directory, honoring ignore
    /// files. Unreadable entries are skipped with a warning.
    fn collect_directories(
        &self,
        root: &Path,
    ) -> Result<Vec<(PathBuf, Vec<String>)>, ScanError> {
        let mut by_dir: BTreeMap<PathBuf, Vec<String>> = BTreeMap::new();
        by_dir.insert(root.to_path_buf(), Vec::new());

        let walk = WalkBuilder::new(root)
            .hidden(false)
            .filter_entry(|entry| entry.file_name() != ".git")
            .build();
        for entry in walk {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(%err, "skipping unreadable entry");
                    continue;
                }
            };
            let path = entry.path();
            if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                by_dir.entry(path.to_path_buf()).or_default();
            } else if let (Some(parent), Some(name)) = (path.parent(), path.file_name()) {
                by_dir
                    .entry(parent.to_path_buf())
                    .or_default()
                    .push(name.to_string_lossy().into_owned());
            }
        }

        for files in by_dir.values_mut() {
            files.sort();
        }
        Ok(by_dir.into_iter().collect())
    }
}

/// Nearest already-attached ancestor of `rel_dir`, falling back to the root.
fn nearest_ancestor(attached: &BTreeMap<String, NodeId>, rel_dir: &str) -> NodeId {
    let mut current = rel_dir;
    while let Some(idx) = current.rfind('/') {
        current = &current[..idx];
        if let Some(&node) = attached.get(current) {
            return node;
        }
    }
    attached[&".".to_string()]
}
