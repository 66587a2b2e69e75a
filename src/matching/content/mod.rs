//! Content matching framework
//!
//! Rules can match against file *content*, not just names. Each match kind is
//! a [`ContentStrategy`] that compiles a content rule into a reusable
//! [`CompiledContentMatcher`]. Built-in strategies cover raw regex matching
//! and path lookups into JSON, YAML and XML documents; unknown kinds fall
//! back to the regex strategy.
//!
//! Matching is best-effort against untrusted project files: malformed
//! content is "no match", never an error.

mod regex;
mod structured;
mod xml;

pub use self::regex::RegexStrategy;
pub use structured::{JsonPathStrategy, YamlPathStrategy};
pub use xml::XmlPathStrategy;

use crate::matching::extension::{extension_of, normalize_extension};
use crate::rules::{ContentRule, Rule, RuleSet, CONTENT_KIND_REGEX};
use ::regex::Regex;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// A compiled content matcher. Returns the evidence string on a match.
pub trait CompiledContentMatcher: Send + Sync {
    fn matches(&self, content: &str) -> Option<String>;
}

/// A pluggable content-match strategy
pub trait ContentStrategy: Send + Sync {
    /// The content-rule kind this strategy handles, e.g. `"json-path"`.
    fn kind(&self) -> &'static str;

    /// Compile one content rule. `None` drops the rule (malformed pattern or
    /// path); compilation of the remaining rules continues.
    fn compile(&self, rule: &ContentRule, technology: &str)
        -> Option<Box<dyn CompiledContentMatcher>>;
}

/// The stock strategies, in lookup order.
pub fn builtin_strategies() -> Vec<Box<dyn ContentStrategy>> {
    vec![
        Box::new(RegexStrategy),
        Box::new(JsonPathStrategy),
        Box::new(YamlPathStrategy),
        Box::new(XmlPathStrategy),
    ]
}

/// Expected value of a structured content rule: assert existence, compare
/// against a literal, or match a slash-delimited regex.
pub(crate) enum Expected {
    Exists,
    Literal(String),
    Pattern(Regex),
}

impl Expected {
    /// Parse the `value` field of a content rule. `None` on a malformed
    /// slash-delimited regex, which drops the rule.
    pub(crate) fn parse(value: Option<&str>) -> Option<Expected> {
        let Some(value) = value else {
            return Some(Expected::Exists);
        };
        if let Some(inner) = value
            .strip_prefix('/')
            .and_then(|rest| rest.strip_suffix('/'))
        {
            match Regex::new(inner) {
                Ok(re) => Some(Expected::Pattern(re)),
                Err(err) => {
                    debug!(value, %err, "skipping content rule with malformed value regex");
                    None
                }
            }
        } else {
            Some(Expected::Literal(value.to_string()))
        }
    }

    pub(crate) fn matches_value(&self, resolved: &str) -> bool {
        match self {
            Expected::Exists => true,
            Expected::Literal(expected) => expected == resolved,
            Expected::Pattern(re) => re.is_match(resolved),
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            Expected::Exists => "exists".to_string(),
            Expected::Literal(expected) => format!("= {expected}"),
            Expected::Pattern(re) => format!("matches /{}/", re.as_str()),
        }
    }
}

/// A successful content match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentMatch {
    pub technology: String,
    pub reason: String,
}

struct ContentEntry {
    technology: String,
    matcher: Box<dyn CompiledContentMatcher>,
}

/// Compiled content matchers for a rule set, indexed by the file names and
/// extensions they apply to.
pub struct ContentMatcherSet {
    by_file: HashMap<String, Vec<ContentEntry>>,
    by_extension: HashMap<String, Vec<ContentEntry>>,
}

impl ContentMatcherSet {
    pub(crate) fn compile(rules: &RuleSet, strategies: &[Box<dyn ContentStrategy>]) -> Self {
        let mut set = Self {
            by_file: HashMap::new(),
            by_extension: HashMap::new(),
        };
        for rule in &rules.rules {
            for content_rule in &rule.content {
                set.compile_one(rule, content_rule, strategies);
            }
        }
        set
    }

    fn compile_one(
        &mut self,
        rule: &Rule,
        content_rule: &ContentRule,
        strategies: &[Box<dyn ContentStrategy>],
    ) {
        let strategy = strategies
            .iter()
            .find(|s| s.kind() == content_rule.kind)
            .or_else(|| strategies.iter().find(|s| s.kind() == CONTENT_KIND_REGEX));
        let Some(strategy) = strategy else {
            return;
        };

        // one compiled matcher per attachment point
        let mut attach = |set: &mut HashMap<String, Vec<ContentEntry>>, key: String| {
            if let Some(matcher) = strategy.compile(content_rule, &rule.id) {
                set.entry(key).or_default().push(ContentEntry {
                    technology: rule.id.clone(),
                    matcher,
                });
            }
        };

        if !content_rule.files.is_empty() {
            for file in &content_rule.files {
                attach(&mut self.by_file, file.clone());
            }
            return;
        }
        // fall back to the parent rule's extensions when the content rule
        // does not scope itself
        let extensions = if content_rule.extensions.is_empty() {
            &rule.extensions
        } else {
            &content_rule.extensions
        };
        for ext in extensions {
            attach(&mut self.by_extension, normalize_extension(ext));
        }
    }

    /// Whether any content rule applies to this file name. Callers use this
    /// to avoid reading files nothing would match against.
    pub fn wants_file(&self, filename: &str) -> bool {
        if self.by_file.contains_key(filename) {
            return true;
        }
        extension_of(filename)
            .map(|ext| self.by_extension.contains_key(&ext))
            .unwrap_or(false)
    }

    /// Match one file's content. Matchers attached to the exact file name are
    /// tried first (regardless of extension), then matchers attached to the
    /// file's extension, in declaration order. The first success per
    /// technology short-circuits further checks for that technology.
    pub fn match_content(&self, filename: &str, content: &str) -> Vec<ContentMatch> {
        let mut matched = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();

        let by_ext = extension_of(filename).and_then(|ext| self.by_extension.get(&ext));
        let entries = self
            .by_file
            .get(filename)
            .into_iter()
            .flatten()
            .chain(by_ext.into_iter().flatten());

        for entry in entries {
            if seen.contains(entry.technology.as_str()) {
                continue;
            }
            if let Some(reason) = entry.matcher.matches(content) {
                seen.insert(&entry.technology);
                matched.push(ContentMatch {
                    technology: entry.technology.clone(),
                    reason,
                });
            }
        }
        matched
    }
}
