//! Dependency-manifest matchers
//!
//! Every dependency pattern of every rule compiles to a regex, bucketed by
//! dependency type. Slash-delimited names are used as regexes verbatim;
//! anything else is escaped and anchored for an exact match.

use crate::rules::RuleSet;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// A successful dependency match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyMatch {
    pub technology: String,
    /// Human-readable evidence, e.g. `"flask matched: ^flask$"`
    pub reason: String,
}

struct CompiledDependencyPattern {
    technology: String,
    source: String,
    regex: Regex,
}

/// Compiled dependency matchers, bucketed by dependency type
pub struct DependencyMatcherSet {
    by_type: HashMap<String, Vec<CompiledDependencyPattern>>,
}

impl DependencyMatcherSet {
    pub(crate) fn compile(rules: &RuleSet) -> Self {
        let mut by_type: HashMap<String, Vec<CompiledDependencyPattern>> = HashMap::new();
        for rule in &rules.rules {
            for pattern in &rule.dependencies {
                let source = pattern.as_regex_source();
                match Regex::new(&source) {
                    Ok(regex) => {
                        by_type
                            .entry(pattern.dep_type.clone())
                            .or_default()
                            .push(CompiledDependencyPattern {
                                technology: rule.id.clone(),
                                source,
                                regex,
                            });
                    }
                    Err(err) => {
                        debug!(
                            rule = %rule.id,
                            pattern = %pattern.name,
                            %err,
                            "skipping malformed dependency pattern"
                        );
                    }
                }
            }
        }
        Self { by_type }
    }

    /// Match a list of declared package names under one dependency type.
    ///
    /// Each technology is reported at most once per call, with the evidence
    /// of the first pattern/package pair that hit.
    pub fn match_packages(&self, dep_type: &str, packages: &[String]) -> Vec<DependencyMatch> {
        let Some(patterns) = self.by_type.get(dep_type) else {
            return Vec::new();
        };
        let mut matched = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        for pattern in patterns {
            if seen.contains(pattern.technology.as_str()) {
                continue;
            }
            if let Some(package) = packages.iter().find(|p| pattern.regex.is_match(p)) {
                seen.insert(&pattern.technology);
                matched.push(DependencyMatch {
                    technology: pattern.technology.clone(),
                    reason: format!("{package} matched: {}", pattern.source),
                });
            }
        }
        matched
    }

    /// Dependency types with at least one compiled pattern.
    pub fn known_types(&self) -> impl Iterator<Item = &str> {
        self.by_type.keys().map(|t| t.as_str())
    }
}
