//! Scan report schema
//!
//! The serialized form of a finished component tree. Dependencies serialize
//! as positional tuples `(type, name, version[, source file])`; references
//! serialize as the target's identifier string only, never as an embedded
//! object, so the payload stays acyclic and free of duplication.

use crate::model::{
    ComponentTree, Dependency, LanguageStat, LicenseRecord, NodeId, PropertyValue,
};
use chrono::{DateTime, Utc};
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// A dependency rendered as a positional tuple
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedDependency(Dependency);

impl Serialize for SerializedDependency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let with_source = self.0.source_file.is_some();
        let mut seq = serializer.serialize_seq(Some(if with_source { 4 } else { 3 }))?;
        seq.serialize_element(&self.0.dep_type)?;
        seq.serialize_element(&self.0.name)?;
        seq.serialize_element(&self.0.version)?;
        if let Some(source) = &self.0.source_file {
            seq.serialize_element(source)?;
        }
        seq.end()
    }
}

/// One component of the serialized tree
#[derive(Debug, Clone, Serialize)]
pub struct SerializedComponent {
    pub id: String,
    pub name: String,
    pub paths: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub primary_technologies: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub technologies: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<SerializedDependency>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, PropertyValue>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub reasons: BTreeMap<String, Vec<String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub licenses: Vec<LicenseRecord>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub language_stats: BTreeMap<String, LanguageStat>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SerializedComponent>,
    /// Target component identifiers of outgoing references
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<String>,
}

impl SerializedComponent {
    /// Render the subtree rooted at `id`. Reference targets are read from
    /// the live nodes, so identity assignment must have run already.
    pub fn from_tree(tree: &ComponentTree, id: NodeId) -> Self {
        let component = tree.node(id);
        Self {
            id: component.id().to_string(),
            name: component.name().to_string(),
            paths: component.paths().to_vec(),
            primary_technologies: component.primary_technologies().to_vec(),
            technologies: component.technologies().to_vec(),
            dependencies: component
                .dependencies()
                .iter()
                .cloned()
                .map(SerializedDependency)
                .collect(),
            properties: component.properties().clone(),
            reasons: component.reasons().clone(),
            licenses: component.licenses().to_vec(),
            language_stats: component.language_stats().clone(),
            children: tree
                .children(id)
                .iter()
                .map(|&child| Self::from_tree(tree, child))
                .collect(),
            references: tree
                .refs(id)
                .iter()
                .map(|r| tree.node(r.target).id().to_string())
                .collect(),
        }
    }
}

/// Top-level scan report
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub tool: String,
    pub version: String,
    pub generated_at: DateTime<Utc>,
    pub root_id: String,
    pub component: SerializedComponent,
}

impl ScanReport {
    pub fn new(tree: &ComponentTree, root_id: impl Into<String>) -> Self {
        Self {
            tool: crate::NAME.to_string(),
            version: crate::VERSION.to_string(),
            generated_at: Utc::now(),
            root_id: root_id.into(),
            component: SerializedComponent::from_tree(tree, tree.root()),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::assign_ids;
    use crate::model::{Component, ComponentRef};

    fn sample_tree() -> ComponentTree {
        let mut tree = ComponentTree::new(Component::new("repo").with_path("."));
        let mut api = Component::new("api").with_path("services/api");
        api.add_primary_technology("python");
        api.add_tech("flask", "flask matched: ^flask$");
        api.add_dependency(
            crate::model::Dependency::new("python", "shared", "1.0").with_source("requirements.txt"),
        );
        let api = tree.add_child(tree.root(), api);

        let mut lib = Component::new("shared").with_path("libs/shared");
        lib.set_property(crate::model::PROP_PACKAGE_NAME, "shared");
        let lib = tree.add_child(tree.root(), lib);

        assign_ids(&mut tree, "rootid");
        tree.add_reference(
            api,
            ComponentRef {
                target: lib,
                dep_type: "python".to_string(),
                package: "shared".to_string(),
            },
        );
        tree
    }

    #[test]
    fn test_dependency_serializes_as_tuple() {
        let dep = SerializedDependency(
            Dependency::new("python", "flask", "2.0").with_source("requirements.txt"),
        );
        let json = serde_json::to_value(&dep).unwrap();
        assert_eq!(
            json,
            serde_json::json!(["python", "flask", "2.0", "requirements.txt"])
        );

        let without = SerializedDependency(Dependency::new("npm", "react", "18.0.0"));
        assert_eq!(
            serde_json::to_value(&without).unwrap(),
            serde_json::json!(["npm", "react", "18.0.0"])
        );
    }

    #[test]
    fn test_references_serialize_as_target_id_strings() {
        let tree = sample_tree();
        let serialized = SerializedComponent::from_tree(&tree, tree.root());
        let api = serialized
            .children
            .iter()
            .find(|c| c.name == "api")
            .unwrap();
        let lib = serialized
            .children
            .iter()
            .find(|c| c.name == "shared")
            .unwrap();
        assert_eq!(api.references, vec![lib.id.clone()]);

        let json = serde_json::to_value(&serialized).unwrap();
        let refs = &json["children"][0]["references"];
        assert!(refs[0].is_string());
    }

    #[test]
    fn test_empty_collections_are_omitted() {
        let tree = sample_tree();
        let json = serde_json::to_value(SerializedComponent::from_tree(&tree, tree.root())).unwrap();
        let lib = &json["children"][1];
        assert!(lib.get("dependencies").is_none());
        assert!(lib.get("children").is_none());
        assert!(lib.get("references").is_none());
    }

    #[test]
    fn test_report_carries_tool_and_root_id() {
        let tree = sample_tree();
        let report = ScanReport::new(&tree, "rootid");
        assert_eq!(report.tool, "techscope");
        assert_eq!(report.root_id, "rootid");
        assert_eq!(report.component.id, "rootid");
        assert!(report.to_json().unwrap().contains("\"root_id\":\"rootid\""));
    }
}
