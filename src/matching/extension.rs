//! File-extension matchers

use crate::rules::RuleSet;
use std::collections::HashSet;

/// Normalize an extension to carry a leading dot.
pub fn normalize_extension(ext: &str) -> String {
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{ext}")
    }
}

/// Extension of a file name, with leading dot. `"Dockerfile"` has none.
pub fn extension_of(filename: &str) -> Option<String> {
    let idx = filename.rfind('.')?;
    if idx == 0 {
        // dotfiles like ".gitignore" have no extension
        return None;
    }
    Some(filename[idx..].to_string())
}

/// A successful extension match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionMatch {
    pub technology: String,
    pub extension: String,
}

struct ExtensionRule {
    technology: String,
    extensions: Vec<String>,
}

/// Compiled extension matchers for a rule set
pub struct ExtensionMatcherSet {
    rules: Vec<ExtensionRule>,
}

impl ExtensionMatcherSet {
    pub(crate) fn compile(rules: &RuleSet) -> Self {
        let rules = rules
            .rules
            .iter()
            .filter(|r| !r.extensions.is_empty())
            .map(|r| ExtensionRule {
                technology: r.id.clone(),
                extensions: r.extensions.iter().map(|e| normalize_extension(e)).collect(),
            })
            .collect();
        Self { rules }
    }

    /// Match the extensions observed in one directory. Each technology is
    /// reported at most once, with the first extension that hit for it.
    pub fn match_extensions(&self, observed: &HashSet<String>) -> Vec<ExtensionMatch> {
        let mut matched = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        for rule in &self.rules {
            if seen.contains(rule.technology.as_str()) {
                continue;
            }
            if let Some(ext) = rule.extensions.iter().find(|e| observed.contains(*e)) {
                seen.insert(&rule.technology);
                matched.push(ExtensionMatch {
                    technology: rule.technology.clone(),
                    extension: ext.clone(),
                });
            }
        }
        matched
    }

    /// Collect normalized extensions from a list of file names.
    pub fn observed_extensions(files: &[String]) -> HashSet<String> {
        files.iter().filter_map(|f| extension_of(f)).collect()
    }
}
