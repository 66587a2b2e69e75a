//! Declarative technology rules
//!
//! A [`Rule`] maps match criteria (dependency patterns, file names, file
//! extensions, content checks) to a technology tag. Rules are data, not code:
//! they can be loaded from JSON or YAML files, or taken from the built-in set.
//! The pattern compiler in [`crate::matching`] turns a [`RuleSet`] into the
//! matcher collections consulted during a scan.

mod builtin;

pub use builtin::builtin_rules;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification of a detected technology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TechnologyCategory {
    Language,
    Framework,
    Library,
    Tool,
    PackageManager,
    Platform,
    Database,
    Infrastructure,
}

/// A dependency pattern within a rule.
///
/// `name` is matched against package names declared in a manifest. A value
/// wrapped in slashes (`/^@scope\//`) is treated as a regular expression;
/// anything else matches the exact package name. Patterns are bucketed by
/// `dep_type` because the same literal name can mean different things under
/// different package ecosystems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyPattern {
    #[serde(rename = "type")]
    pub dep_type: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_version: Option<String>,
}

impl DependencyPattern {
    pub fn new(dep_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            dep_type: dep_type.into(),
            name: name.into(),
            example_version: None,
        }
    }

    /// Regex form of the pattern: slash-delimited values verbatim, literals
    /// escaped and anchored.
    pub fn as_regex_source(&self) -> String {
        if let Some(inner) = self
            .name
            .strip_prefix('/')
            .and_then(|rest| rest.strip_suffix('/'))
        {
            inner.to_string()
        } else {
            format!("^{}$", regex::escape(&self.name))
        }
    }
}

/// Well-known content-rule kinds. Anything else falls back to `regex`.
pub const CONTENT_KIND_REGEX: &str = "regex";
pub const CONTENT_KIND_JSON_PATH: &str = "json-path";
pub const CONTENT_KIND_YAML_PATH: &str = "yaml-path";
pub const CONTENT_KIND_XML_PATH: &str = "xml-path";

fn default_content_kind() -> String {
    CONTENT_KIND_REGEX.to_string()
}

/// A content rule: match against file text rather than file names.
///
/// Regex rules carry `pattern`; structured rules carry `path` and optionally
/// `value` (absent means "assert the path exists"). The rule applies to the
/// listed `files` regardless of extension, or to the listed `extensions`,
/// falling back to the parent rule's extensions when neither is given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentRule {
    #[serde(rename = "type", default = "default_content_kind")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<String>,
}

impl Default for ContentRule {
    fn default() -> Self {
        Self {
            kind: default_content_kind(),
            pattern: None,
            path: None,
            value: None,
            files: Vec::new(),
            extensions: Vec::new(),
        }
    }
}

/// A technology definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    /// Technology identifier, e.g. "flask"
    pub id: String,
    /// Human-readable name, e.g. "Flask"
    pub name: String,
    #[serde(rename = "type")]
    pub category: TechnologyCategory,
    /// Whether a match should create/mark a component root
    #[serde(default)]
    pub component: bool,
    /// Whether a match promotes the technology into the primary list
    #[serde(default)]
    pub primary: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<DependencyPattern>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<ContentRule>,
}

impl Rule {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: TechnologyCategory) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            component: false,
            primary: false,
            dependencies: Vec::new(),
            files: Vec::new(),
            extensions: Vec::new(),
            content: Vec::new(),
        }
    }

    pub fn component(mut self) -> Self {
        self.component = true;
        self
    }

    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    pub fn with_dependency(mut self, dep_type: &str, name: &str) -> Self {
        self.dependencies.push(DependencyPattern::new(dep_type, name));
        self
    }

    pub fn with_files(mut self, files: &[&str]) -> Self {
        self.files.extend(files.iter().map(|f| f.to_string()));
        self
    }

    pub fn with_extensions(mut self, extensions: &[&str]) -> Self {
        self.extensions
            .extend(extensions.iter().map(|e| e.to_string()));
        self
    }

    pub fn with_content(mut self, rule: ContentRule) -> Self {
        self.content.push(rule);
        self
    }
}

/// Errors loading a rule file
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("failed to read rule file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse JSON rules: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse YAML rules: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// An ordered list of technology rules
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleSet {
    pub rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// The built-in default rule set
    pub fn builtin() -> Self {
        Self::new(builtin_rules())
    }

    pub fn from_json(text: &str) -> Result<Self, RuleError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_yaml(text: &str) -> Result<Self, RuleError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Load rules from a file, dispatching on the extension.
    pub fn from_file(path: &std::path::Path) -> Result<Self, RuleError> {
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&text),
            _ => Self::from_json(&text),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Append another rule set, keeping declaration order.
    pub fn extend(&mut self, other: RuleSet) {
        self.rules.extend(other.rules);
    }
}
