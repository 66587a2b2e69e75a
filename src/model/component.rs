//! Component payload: accumulated evidence for one detected unit

use super::license::LicenseRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reserved reason key for general notes
pub const REASON_NOTES: &str = "_notes";
/// Reserved reason key for license-detection notes
pub const REASON_LICENSE: &str = "_license";
/// Reserved reason key for container/infrastructure notes
pub const REASON_CONTAINER: &str = "_container";

const RESERVED_REASON_KEYS: [&str; 3] = [REASON_NOTES, REASON_LICENSE, REASON_CONTAINER];

/// Property key under which a component publishes its own package name
pub const PROP_PACKAGE_NAME: &str = "packageName";
/// Property keys for Maven coordinates
pub const PROP_GROUP_ID: &str = "groupId";
pub const PROP_ARTIFACT_ID: &str = "artifactId";

/// A declared dependency of a component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    #[serde(rename = "type")]
    pub dep_type: String,
    pub name: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
}

impl Dependency {
    pub fn new(dep_type: impl Into<String>, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            dep_type: dep_type.into(),
            name: name.into(),
            version: version.into(),
            source_file: None,
        }
    }

    pub fn with_source(mut self, source_file: impl Into<String>) -> Self {
        self.source_file = Some(source_file.into());
        self
    }

    fn dedup_key(&self) -> (&str, &str, &str) {
        (&self.dep_type, &self.name, &self.version)
    }
}

/// Version-control metadata attached to a component
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
}

/// Per-language size counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageStat {
    pub bytes: u64,
    pub lines: u64,
}

/// An ecosystem-specific property value. List-valued keys concatenate on
/// merge; scalar keys are last-write-wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Scalar(String),
    List(Vec<String>),
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Scalar(s) => Some(s),
            PropertyValue::List(_) => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Scalar(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Scalar(value)
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(value: Vec<String>) -> Self {
        PropertyValue::List(value)
    }
}

/// The unit of detection result.
///
/// Mutators enforce the dedup invariants: `paths`, `technologies`,
/// `dependencies` and `licenses` never contain duplicates under their
/// respective equality rules. The identifier stays empty until identity
/// assignment stamps the finished tree.
#[derive(Debug, Clone, Default)]
pub struct Component {
    pub(crate) id: String,
    name: String,
    paths: Vec<String>,
    primary_technologies: Vec<String>,
    technologies: Vec<String>,
    dependencies: Vec<Dependency>,
    properties: BTreeMap<String, PropertyValue>,
    reasons: BTreeMap<String, Vec<String>>,
    licenses: Vec<LicenseRecord>,
    language_stats: BTreeMap<String, LanguageStat>,
    git: Option<GitMetadata>,
}

impl Component {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.add_path(path);
        self
    }

    /// Final identifier; empty before identity assignment.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn first_path(&self) -> Option<&str> {
        self.paths.first().map(|p| p.as_str())
    }

    pub fn primary_technologies(&self) -> &[String] {
        &self.primary_technologies
    }

    pub fn technologies(&self) -> &[String] {
        &self.technologies
    }

    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    pub fn properties(&self) -> &BTreeMap<String, PropertyValue> {
        &self.properties
    }

    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    pub fn reasons(&self) -> &BTreeMap<String, Vec<String>> {
        &self.reasons
    }

    pub fn licenses(&self) -> &[LicenseRecord] {
        &self.licenses
    }

    pub fn language_stats(&self) -> &BTreeMap<String, LanguageStat> {
        &self.language_stats
    }

    pub fn git(&self) -> Option<&GitMetadata> {
        self.git.as_ref()
    }

    pub fn set_git(&mut self, git: GitMetadata) {
        // first detected wins
        if self.git.is_none() {
            self.git = Some(git);
        }
    }

    pub fn has_primary(&self) -> bool {
        !self.primary_technologies.is_empty()
    }

    pub fn add_path(&mut self, path: impl Into<String>) {
        let path = path.into();
        if !self.paths.contains(&path) {
            self.paths.push(path);
        }
    }

    /// Mark the component as *being* this technology. The tag also joins the
    /// all-technologies set.
    pub fn add_primary_technology(&mut self, tech: &str) {
        if !self.primary_technologies.iter().any(|t| t == tech) {
            self.primary_technologies.push(tech.to_string());
        }
        if !self.technologies.iter().any(|t| t == tech) {
            self.technologies.push(tech.to_string());
        }
    }

    /// Record a detected technology with its evidence. Technologies and
    /// reasons are deduplicated independently. The reserved keys route
    /// non-technology evidence into their own buckets.
    pub fn add_tech(&mut self, tech: &str, reason: &str) {
        if !RESERVED_REASON_KEYS.contains(&tech) && !self.technologies.iter().any(|t| t == tech) {
            self.technologies.push(tech.to_string());
        }
        let bucket = self.reasons.entry(tech.to_string()).or_default();
        if !bucket.iter().any(|r| r == reason) {
            bucket.push(reason.to_string());
        }
    }

    pub fn add_note(&mut self, note: &str) {
        self.add_tech(REASON_NOTES, note);
    }

    pub fn add_license_note(&mut self, note: &str) {
        self.add_tech(REASON_LICENSE, note);
    }

    pub fn add_container_note(&mut self, note: &str) {
        self.add_tech(REASON_CONTAINER, note);
    }

    /// Add a dependency, deduplicated on (type, name, version).
    pub fn add_dependency(&mut self, dependency: Dependency) {
        if !self
            .dependencies
            .iter()
            .any(|d| d.dedup_key() == dependency.dedup_key())
        {
            self.dependencies.push(dependency);
        }
    }

    /// Add a license record, deduplicated by name.
    pub fn add_license(&mut self, license: LicenseRecord) {
        if !self.licenses.iter().any(|l| l.name == license.name) {
            self.licenses.push(license);
        }
    }

    /// Set a property. List values concatenate with an existing list; scalar
    /// values overwrite.
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        let key = key.into();
        let value = value.into();
        match (self.properties.get_mut(&key), value) {
            (Some(PropertyValue::List(existing)), PropertyValue::List(incoming)) => {
                existing.extend(incoming);
            }
            (_, value) => {
                self.properties.insert(key, value);
            }
        }
    }

    pub fn add_language_stat(&mut self, language: &str, bytes: u64, lines: u64) {
        let stat = self.language_stats.entry(language.to_string()).or_default();
        stat.bytes += bytes;
        stat.lines += lines;
    }

    /// Whether `other` may be merged into this component: same name, at
    /// least one shared path, and both tagged or both untagged. The
    /// tagged/untagged gate can under-merge when one twin was tagged by an
    /// earlier detector; see the tree-level docs.
    pub fn can_merge_with(&self, other: &Component) -> bool {
        self.name == other.name
            && self.has_primary() == other.has_primary()
            && other.paths.iter().any(|p| self.paths.contains(p))
    }

    /// Child-merge payload used by `ComponentTree::add_child`: paths,
    /// primary technologies, dependencies and properties.
    pub(crate) fn merge_from(&mut self, other: &Component) {
        for path in &other.paths {
            self.add_path(path.clone());
        }
        for tech in &other.primary_technologies {
            self.add_primary_technology(tech);
        }
        for dependency in &other.dependencies {
            self.add_dependency(dependency.clone());
        }
        for (key, value) in &other.properties {
            self.set_property(key.clone(), value.clone());
        }
    }

    /// Whole-payload merge used when two independently built components for
    /// the same logical unit must be unified.
    pub fn combine(&mut self, other: Component) {
        for path in other.paths {
            self.add_path(path);
        }
        for (language, stat) in other.language_stats {
            self.add_language_stat(&language, stat.bytes, stat.lines);
        }
        for tech in &other.primary_technologies {
            self.add_primary_technology(tech);
        }
        for tech in other.technologies {
            if !self.technologies.contains(&tech) {
                self.technologies.push(tech);
            }
        }
        for (key, incoming) in other.reasons {
            let bucket = self.reasons.entry(key).or_default();
            for reason in incoming {
                if !bucket.contains(&reason) {
                    bucket.push(reason);
                }
            }
        }
        for dependency in other.dependencies {
            self.add_dependency(dependency);
        }
        for license in other.licenses {
            self.add_license(license);
        }
        for (key, value) in other.properties {
            self.set_property(key, value);
        }
        if let Some(git) = other.git {
            self.set_git(git);
        }
    }
}
