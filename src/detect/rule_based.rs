//! Generic rule-driven detector
//!
//! Applies the compiled extension, filename and content matchers of the
//! active rule set to one directory. Carries no ecosystem knowledge of its
//! own: manifest and lock-file grammars belong to dedicated detectors.

use super::{DetectContext, Detector};
use crate::matching::ExtensionMatcherSet;
use crate::model::Component;
use tracing::{debug, trace};

pub struct RuleBasedDetector;

impl RuleBasedDetector {
    fn content_matches(&self, ctx: &DetectContext<'_>) -> Vec<(String, String)> {
        let content_matchers = ctx.matchers.content();
        let mut matches = Vec::new();
        for file in ctx.files {
            if !content_matchers.wants_file(file) {
                continue;
            }
            let path = ctx.dir.join(file);
            // size precondition: oversized files are skipped, not read
            match ctx.fs.file_size(&path) {
                Ok(size) if size <= ctx.max_content_bytes => {}
                Ok(size) => {
                    trace!(file, size, "skipping oversized file for content matching");
                    continue;
                }
                Err(err) => {
                    debug!(file, %err, "skipping unreadable file");
                    continue;
                }
            }
            let Ok(content) = ctx.fs.read_to_string(&path) else {
                debug!(file, "skipping unreadable file");
                continue;
            };
            for hit in content_matchers.match_content(file, &content) {
                matches.push((hit.technology, format!("{file}: {}", hit.reason)));
            }
        }
        matches
    }
}

impl Detector for RuleBasedDetector {
    fn name(&self) -> &str {
        "rules"
    }

    fn detect(&self, ctx: &DetectContext<'_>) -> anyhow::Result<Vec<Component>> {
        let mut evidence: Vec<(String, String)> = Vec::new();

        let observed = ExtensionMatcherSet::observed_extensions(ctx.files);
        for hit in ctx.matchers.extensions().match_extensions(&observed) {
            evidence.push((
                hit.technology,
                format!("files with extension {}", hit.extension),
            ));
        }

        let rel_dir = ctx.relative_dir();
        for hit in ctx.matchers.filenames().match_files(ctx.files, &rel_dir) {
            evidence.push((hit.technology, format!("matched file pattern {}", hit.pattern)));
        }

        evidence.extend(self.content_matches(ctx));

        if evidence.is_empty() {
            return Ok(Vec::new());
        }

        let name = ctx
            .dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| rel_dir.clone());
        let mut component = Component::new(name).with_path(rel_dir);
        for (tech, reason) in &evidence {
            component.add_tech(tech, reason);
            if ctx.matchers.is_primary(tech) {
                component.add_primary_technology(tech);
            }
        }
        Ok(vec![component])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFileSystem;
    use crate::matching::MatcherSet;
    use crate::rules::RuleSet;
    use std::path::Path;

    fn detect(
        fs: &MemoryFileSystem,
        dir: &str,
        files: &[&str],
        max_content_bytes: u64,
    ) -> Vec<Component> {
        let matchers = MatcherSet::compile(&RuleSet::builtin());
        let files: Vec<String> = files.iter().map(|f| f.to_string()).collect();
        let ctx = DetectContext {
            files: &files,
            dir: Path::new(dir),
            root: Path::new("/repo"),
            fs,
            matchers: &matchers,
            max_content_bytes,
        };
        RuleBasedDetector.detect(&ctx).unwrap()
    }

    #[test]
    fn test_extension_evidence_promotes_primary() {
        let fs = MemoryFileSystem::new("/repo");
        let found = detect(&fs, "/repo/infra", &["main.tf", "variables.tf"], 1024);
        assert_eq!(found.len(), 1);
        let component = &found[0];
        assert_eq!(component.name(), "infra");
        assert_eq!(component.paths(), ["infra"]);
        assert_eq!(component.primary_technologies(), ["terraform"]);
        assert_eq!(
            component.reasons()["terraform"],
            vec!["files with extension .tf"]
        );
    }

    #[test]
    fn test_filename_evidence_is_not_primary() {
        let fs = MemoryFileSystem::new("/repo");
        let found = detect(&fs, "/repo", &["Dockerfile"], 1024);
        assert_eq!(found.len(), 1);
        assert!(found[0].technologies().contains(&"docker".to_string()));
        assert!(found[0].primary_technologies().is_empty());
    }

    #[test]
    fn test_content_evidence() {
        let mut fs = MemoryFileSystem::new("/repo");
        fs.add_file(
            "web/components.json",
            r#"{"$schema":"https://ui.shadcn.com/schema.json"}"#,
        );
        let found = detect(&fs, "/repo/web", &["components.json"], 1024);
        assert_eq!(found.len(), 1);
        assert!(found[0].technologies().contains(&"shadcn".to_string()));
        let reason = &found[0].reasons()["shadcn"][0];
        assert!(reason.starts_with("components.json: "), "reason: {reason}");
    }

    #[test]
    fn test_oversized_file_skips_content_matching() {
        let mut fs = MemoryFileSystem::new("/repo");
        fs.add_file(
            "web/components.json",
            r#"{"$schema":"https://ui.shadcn.com/schema.json"}"#,
        );
        let found = detect(&fs, "/repo/web", &["components.json"], 10);
        assert!(found.is_empty());
    }

    #[test]
    fn test_empty_directory_detects_nothing() {
        let fs = MemoryFileSystem::new("/repo");
        assert!(detect(&fs, "/repo/empty", &[], 1024).is_empty());
    }
}
