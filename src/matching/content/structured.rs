//! JSON-path and YAML-path content strategies
//!
//! Both parse the content into a generic value tree and descend a simplified
//! dot-notation path (`$.services.web`). Segments are map keys or
//! non-negative array indices; a leading `$` segment is skipped. The resolved
//! value is stringified and compared against the rule's expected value, or
//! mere existence is asserted when the rule has no value.

use super::{CompiledContentMatcher, ContentStrategy, Expected};
use crate::rules::{ContentRule, CONTENT_KIND_JSON_PATH, CONTENT_KIND_YAML_PATH};

/// Split a dot path into segments, dropping a leading `$`.
pub(crate) fn parse_path(path: &str) -> Vec<String> {
    let mut segments: Vec<String> = path.split('.').map(|s| s.to_string()).collect();
    if segments.first().map(|s| s == "$").unwrap_or(false) {
        segments.remove(0);
    }
    segments
}

fn json_value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

fn yaml_value_to_string(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Null => "null".to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

fn descend_json<'a>(root: &'a serde_json::Value, segments: &[String]) -> Option<&'a serde_json::Value> {
    let mut current = root;
    for segment in segments {
        current = match current {
            serde_json::Value::Object(map) => map.get(segment)?,
            serde_json::Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

fn descend_yaml<'a>(root: &'a serde_yaml::Value, segments: &[String]) -> Option<&'a serde_yaml::Value> {
    let mut current = root;
    for segment in segments {
        current = match current {
            serde_yaml::Value::Mapping(map) => {
                map.get(&serde_yaml::Value::String(segment.clone()))?
            }
            serde_yaml::Value::Sequence(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

struct JsonPathMatcher {
    path: String,
    segments: Vec<String>,
    expected: Expected,
}

impl CompiledContentMatcher for JsonPathMatcher {
    fn matches(&self, content: &str) -> Option<String> {
        // malformed content is "no match", not an error
        let root: serde_json::Value = serde_json::from_str(content).ok()?;
        let value = descend_json(&root, &self.segments)?;
        if self.expected.matches_value(&json_value_to_string(value)) {
            Some(format!("{} {}", self.path, self.expected.describe()))
        } else {
            None
        }
    }
}

struct YamlPathMatcher {
    path: String,
    segments: Vec<String>,
    expected: Expected,
}

impl CompiledContentMatcher for YamlPathMatcher {
    fn matches(&self, content: &str) -> Option<String> {
        let root: serde_yaml::Value = serde_yaml::from_str(content).ok()?;
        let value = descend_yaml(&root, &self.segments)?;
        if self.expected.matches_value(&yaml_value_to_string(value)) {
            Some(format!("{} {}", self.path, self.expected.describe()))
        } else {
            None
        }
    }
}

/// Path lookups into JSON documents
pub struct JsonPathStrategy;

impl ContentStrategy for JsonPathStrategy {
    fn kind(&self) -> &'static str {
        CONTENT_KIND_JSON_PATH
    }

    fn compile(
        &self,
        rule: &ContentRule,
        _technology: &str,
    ) -> Option<Box<dyn CompiledContentMatcher>> {
        let path = rule.path.as_deref()?;
        let expected = Expected::parse(rule.value.as_deref())?;
        Some(Box::new(JsonPathMatcher {
            path: path.to_string(),
            segments: parse_path(path),
            expected,
        }))
    }
}

/// Path lookups into YAML documents
pub struct YamlPathStrategy;

impl ContentStrategy for YamlPathStrategy {
    fn kind(&self) -> &'static str {
        CONTENT_KIND_YAML_PATH
    }

    fn compile(
        &self,
        rule: &ContentRule,
        _technology: &str,
    ) -> Option<Box<dyn CompiledContentMatcher>> {
        let path = rule.path.as_deref()?;
        let expected = Expected::parse(rule.value.as_deref())?;
        Some(Box::new(YamlPathMatcher {
            path: path.to_string(),
            segments: parse_path(path),
            expected,
        }))
    }
}
