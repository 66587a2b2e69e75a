//! XML-path content strategy
//!
//! Walks the element tree tracking the current path as a dot-joined stack of
//! element names (including the document root, e.g.
//! `project.parent.artifactId`). On reaching the target path the element text
//! is captured and compared with the same literal/regex rule as the other
//! structured strategies. Several elements may share the target path; the
//! first one whose text satisfies the comparison wins.

use super::{CompiledContentMatcher, ContentStrategy, Expected};
use crate::rules::{ContentRule, CONTENT_KIND_XML_PATH};

struct XmlPathMatcher {
    path: String,
    segments: Vec<String>,
    expected: Expected,
}

impl XmlPathMatcher {
    fn element_path_matches(&self, node: roxmltree::Node<'_, '_>) -> bool {
        let mut names = Vec::new();
        let mut current = Some(node);
        while let Some(n) = current {
            if n.is_element() {
                names.push(n.tag_name().name());
            }
            current = n.parent();
        }
        names.reverse();
        names.len() == self.segments.len()
            && names.iter().zip(&self.segments).all(|(a, b)| a == b)
    }
}

impl CompiledContentMatcher for XmlPathMatcher {
    fn matches(&self, content: &str) -> Option<String> {
        // malformed XML is "no match", not an error
        let doc = roxmltree::Document::parse(content).ok()?;
        for node in doc.descendants().filter(|n| n.is_element()) {
            if !self.element_path_matches(node) {
                continue;
            }
            let text = node.text().map(str::trim).unwrap_or("");
            if self.expected.matches_value(text) {
                return Some(format!("{} {}", self.path, self.expected.describe()));
            }
        }
        None
    }
}

/// Path lookups into XML documents
pub struct XmlPathStrategy;

impl ContentStrategy for XmlPathStrategy {
    fn kind(&self) -> &'static str {
        CONTENT_KIND_XML_PATH
    }

    fn compile(
        &self,
        rule: &ContentRule,
        _technology: &str,
    ) -> Option<Box<dyn CompiledContentMatcher>> {
        let path = rule.path.as_deref()?;
        let expected = Expected::parse(rule.value.as_deref())?;
        Some(Box::new(XmlPathMatcher {
            path: path.to_string(),
            segments: path.split('.').map(|s| s.to_string()).collect(),
            expected,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POM: &str = r#"<?xml version="1.0"?>
<project>
  <parent>
    <groupId>org.springframework.boot</groupId>
    <artifactId>spring-boot-starter-parent</artifactId>
  </parent>
  <artifactId>demo</artifactId>
</project>"#;

    fn matcher(path: &str, value: Option<&str>) -> Box<dyn CompiledContentMatcher> {
        XmlPathStrategy
            .compile(
                &ContentRule {
                    path: Some(path.to_string()),
                    value: value.map(|v| v.to_string()),
                    ..ContentRule::default()
                },
                "tech",
            )
            .unwrap()
    }

    #[test]
    fn test_value_comparison_at_path() {
        let m = matcher("project.parent.artifactId", Some("spring-boot-starter-parent"));
        assert!(m.matches(POM).is_some());

        let miss = matcher("project.parent.artifactId", Some("quarkus-bom"));
        assert!(miss.matches(POM).is_none());
    }

    #[test]
    fn test_existence_assertion() {
        assert!(matcher("project.parent", None).matches(POM).is_some());
        assert!(matcher("project.licenses", None).matches(POM).is_none());
    }

    #[test]
    fn test_path_is_exact_not_suffix() {
        // "parent.artifactId" must not match the nested element
        assert!(matcher("parent.artifactId", None).matches(POM).is_none());
        // "project.artifactId" is a different element than the parent one
        assert!(matcher("project.artifactId", Some("demo")).matches(POM).is_some());
    }

    #[test]
    fn test_regex_value() {
        let m = matcher("project.parent.groupId", Some("/^org\\.springframework/"));
        assert!(m.matches(POM).is_some());
    }

    #[test]
    fn test_first_satisfying_element_wins() {
        let xml = "<deps><dep>alpha</dep><dep>beta</dep></deps>";
        let m = matcher("deps.dep", Some("beta"));
        assert!(m.matches(xml).is_some());
    }

    #[test]
    fn test_malformed_xml_is_no_match() {
        assert!(matcher("a.b", None).matches("<a><b></a>").is_none());
    }
}
