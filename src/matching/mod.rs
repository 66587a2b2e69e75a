//! Pattern compiler
//!
//! Turns a declarative [`RuleSet`](crate::rules::RuleSet) into four families
//! of compiled matchers consulted by detectors during a scan:
//!
//! - extension matchers ([`ExtensionMatcherSet`])
//! - filename/glob matchers ([`FilenameMatcherSet`])
//! - dependency matchers ([`DependencyMatcherSet`])
//! - content matchers ([`content::ContentMatcherSet`])
//!
//! Compiled matchers are read-only after construction and safe to share
//! across threads. Invalid patterns are skipped during compilation; a bad
//! rule never aborts compilation of the rest of the set.

pub mod content;
mod dependency;
mod extension;
mod filename;

pub use content::{CompiledContentMatcher, ContentMatch, ContentMatcherSet, ContentStrategy};
pub use dependency::{DependencyMatch, DependencyMatcherSet};
pub use extension::{normalize_extension, ExtensionMatch, ExtensionMatcherSet};
pub use filename::{glob_to_regex, FilenameMatch, FilenameMatcherSet, GlobCache};

use crate::rules::RuleSet;
use std::collections::HashSet;

/// All compiled matchers for one rule set, plus the classification side
/// tables consulted when recording a match.
pub struct MatcherSet {
    extensions: ExtensionMatcherSet,
    filenames: FilenameMatcherSet,
    dependencies: DependencyMatcherSet,
    content: ContentMatcherSet,
    primary: HashSet<String>,
    component_roots: HashSet<String>,
}

impl MatcherSet {
    /// Compile a rule set into matchers. Never fails: malformed patterns are
    /// dropped individually.
    pub fn compile(rules: &RuleSet) -> Self {
        let primary = rules
            .rules
            .iter()
            .filter(|r| r.primary)
            .map(|r| r.id.clone())
            .collect();
        let component_roots = rules
            .rules
            .iter()
            .filter(|r| r.component)
            .map(|r| r.id.clone())
            .collect();

        Self {
            extensions: ExtensionMatcherSet::compile(rules),
            filenames: FilenameMatcherSet::compile(rules),
            dependencies: DependencyMatcherSet::compile(rules),
            content: ContentMatcherSet::compile(rules, &content::builtin_strategies()),
            primary,
            component_roots,
        }
    }

    pub fn extensions(&self) -> &ExtensionMatcherSet {
        &self.extensions
    }

    pub fn filenames(&self) -> &FilenameMatcherSet {
        &self.filenames
    }

    pub fn dependencies(&self) -> &DependencyMatcherSet {
        &self.dependencies
    }

    pub fn content(&self) -> &ContentMatcherSet {
        &self.content
    }

    /// Whether a match on `tech` should also promote it into the component's
    /// primary technology list.
    pub fn is_primary(&self, tech: &str) -> bool {
        self.primary.contains(tech)
    }

    /// Whether `tech` marks a component root (vs merely a tag).
    pub fn is_component_root(&self, tech: &str) -> bool {
        self.component_roots.contains(tech)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleSet;

    #[test]
    fn test_compile_builtin_rules() {
        let matchers = MatcherSet::compile(&RuleSet::builtin());
        assert!(matchers.is_primary("terraform"));
        assert!(matchers.is_component_root("terraform"));
        assert!(!matchers.is_primary("docker"));
        assert!(!matchers.is_component_root("flask"));
    }

    #[test]
    fn test_compile_survives_bad_patterns() {
        let json = r#"{
            "rules": [
                {
                    "id": "broken",
                    "name": "Broken",
                    "type": "tool",
                    "dependencies": [{"type": "npm", "name": "/([unclosed/"}]
                },
                {
                    "id": "ok",
                    "name": "Ok",
                    "type": "tool",
                    "dependencies": [{"type": "npm", "name": "left-pad"}]
                }
            ]
        }"#;
        let matchers = MatcherSet::compile(&RuleSet::from_json(json).unwrap());
        let found = matchers
            .dependencies()
            .match_packages("npm", &["left-pad".to_string()]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].technology, "ok");
    }
}
