//! Filename and glob matchers
//!
//! Plain patterns are tried as exact file names first, then as globs where
//! `*` matches any run of characters and `?` a single character. Patterns
//! containing a path separator are matched as directory-name suffixes of the
//! current scan path instead. Glob compilation is memoized in a
//! concurrency-safe cache keyed by the generated regex text, since parallel
//! directory scans race to compile the same patterns.

use crate::rules::{RuleSet, TechnologyCategory};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use tracing::debug;

/// Translate a glob pattern to anchored regex source. Only `*` and `?` are
/// glob metacharacters; everything else is matched literally.
pub fn glob_to_regex(glob: &str) -> String {
    let mut source = String::with_capacity(glob.len() + 8);
    source.push('^');
    for ch in glob.chars() {
        match ch {
            '*' => source.push_str(".*"),
            '?' => source.push('.'),
            _ => source.push_str(&regex::escape(&ch.to_string())),
        }
    }
    source.push('$');
    source
}

/// Concurrency-safe memoized store of compiled glob regexes, keyed by the
/// generated regex text.
#[derive(Default)]
pub struct GlobCache {
    compiled: RwLock<HashMap<String, Option<Regex>>>,
}

impl GlobCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `name` matches the glob `pattern`. Malformed translations
    /// compile once, are remembered as unusable and never match.
    pub fn glob_matches(&self, pattern: &str, name: &str) -> bool {
        let source = glob_to_regex(pattern);
        {
            let cache = self.compiled.read().expect("glob cache poisoned");
            if let Some(entry) = cache.get(&source) {
                return entry.as_ref().map(|re| re.is_match(name)).unwrap_or(false);
            }
        }
        let compiled = match Regex::new(&source) {
            Ok(re) => Some(re),
            Err(err) => {
                debug!(pattern, %err, "skipping malformed glob pattern");
                None
            }
        };
        let mut cache = self.compiled.write().expect("glob cache poisoned");
        let entry = cache.entry(source).or_insert(compiled);
        entry.as_ref().map(|re| re.is_match(name)).unwrap_or(false)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.compiled.read().expect("glob cache poisoned").len()
    }
}

/// A successful filename match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameMatch {
    pub technology: String,
    pub pattern: String,
}

struct FilenameRule {
    technology: String,
    patterns: Vec<String>,
}

/// Compiled filename matchers for a rule set.
///
/// Rules classified as package managers are excluded: a lock file or manifest
/// name alone must not promote a technology.
pub struct FilenameMatcherSet {
    rules: Vec<FilenameRule>,
    globs: GlobCache,
}

impl FilenameMatcherSet {
    pub(crate) fn compile(rules: &RuleSet) -> Self {
        let rules = rules
            .rules
            .iter()
            .filter(|r| !r.files.is_empty() && r.category != TechnologyCategory::PackageManager)
            .map(|r| FilenameRule {
                technology: r.id.clone(),
                patterns: r.files.clone(),
            })
            .collect();
        Self {
            rules,
            globs: GlobCache::new(),
        }
    }

    /// Match the file names of one directory. `scan_path` is the directory
    /// being scanned, used for patterns containing a path separator. Each
    /// technology is reported at most once, with the pattern that hit.
    pub fn match_files(&self, files: &[String], scan_path: &str) -> Vec<FilenameMatch> {
        let mut matched = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        for rule in &self.rules {
            if seen.contains(rule.technology.as_str()) {
                continue;
            }
            for pattern in &rule.patterns {
                let hit = if pattern.contains('/') {
                    dir_suffix_matches(scan_path, pattern)
                } else {
                    files.iter().any(|f| {
                        f == pattern
                            || ((pattern.contains('*') || pattern.contains('?'))
                                && self.globs.glob_matches(pattern, f))
                    })
                };
                if hit {
                    seen.insert(&rule.technology);
                    matched.push(FilenameMatch {
                        technology: rule.technology.clone(),
                        pattern: pattern.clone(),
                    });
                    break;
                }
            }
        }
        matched
    }
}

/// Whether `scan_path` ends with the directory suffix `pattern`, on a path
/// component boundary.
fn dir_suffix_matches(scan_path: &str, pattern: &str) -> bool {
    let path = scan_path.trim_end_matches('/');
    let pattern = pattern.trim_matches('/');
    match path.strip_suffix(pattern) {
        Some(rest) => rest.is_empty() || rest.ends_with('/'),
        None => false,
    }
}
