//! Regex content strategy

use super::{CompiledContentMatcher, ContentStrategy};
use crate::rules::{ContentRule, CONTENT_KIND_REGEX};
use regex::Regex;
use tracing::debug;

/// Matches raw file content against a compiled pattern.
pub struct RegexStrategy;

struct RegexMatcher {
    regex: Regex,
}

impl CompiledContentMatcher for RegexMatcher {
    fn matches(&self, content: &str) -> Option<String> {
        if self.regex.is_match(content) {
            Some(format!("content matched: {}", self.regex.as_str()))
        } else {
            None
        }
    }
}

impl ContentStrategy for RegexStrategy {
    fn kind(&self) -> &'static str {
        CONTENT_KIND_REGEX
    }

    fn compile(
        &self,
        rule: &ContentRule,
        technology: &str,
    ) -> Option<Box<dyn CompiledContentMatcher>> {
        let pattern = rule.pattern.as_deref()?;
        match Regex::new(pattern) {
            Ok(regex) => Some(Box::new(RegexMatcher { regex })),
            Err(err) => {
                debug!(technology, pattern, %err, "skipping malformed content regex");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(pattern: &str) -> Option<Box<dyn CompiledContentMatcher>> {
        RegexStrategy.compile(
            &ContentRule {
                pattern: Some(pattern.to_string()),
                ..ContentRule::default()
            },
            "tech",
        )
    }

    #[test]
    fn test_match_and_reason() {
        let matcher = compile(r"(?m)^\s*runs-on:").unwrap();
        let hit = matcher.matches("jobs:\n  build:\n    runs-on: ubuntu-latest\n");
        assert_eq!(hit.unwrap(), r"content matched: (?m)^\s*runs-on:");
        assert!(matcher.matches("jobs: {}").is_none());
    }

    #[test]
    fn test_missing_pattern_drops_rule() {
        assert!(RegexStrategy
            .compile(&ContentRule::default(), "tech")
            .is_none());
    }

    #[test]
    fn test_malformed_pattern_drops_rule() {
        assert!(compile("([unclosed").is_none());
    }
}
