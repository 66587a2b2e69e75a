//! Cross-component reference resolution
//!
//! Converts declared dependencies into graph edges between independently
//! detected components. A [`PackageProvider`] per dependency type knows how
//! to extract the package names a component publishes and, optionally, how
//! to compare a declared name against a published one (case folding,
//! separator normalization). Resolution is two passes over a frozen tree:
//! index every published package, then look up every declared dependency.

use crate::model::{Component, ComponentRef, ComponentTree, NodeId};
use crate::model::{PROP_ARTIFACT_ID, PROP_GROUP_ID, PROP_PACKAGE_NAME};
use std::collections::HashMap;
use tracing::debug;

/// Per-dependency-type extraction and matching strategy
pub trait PackageProvider: Send + Sync {
    /// Dependency type this provider serves, e.g. `"npm"`.
    fn dependency_type(&self) -> &str;

    /// Package identifiers the component publishes under this type.
    fn published_packages(&self, component: &Component) -> Vec<String>;

    /// Whether a declared dependency name refers to a published package.
    /// The default is exact equality; providers override it for ecosystem
    /// naming conventions.
    fn package_matches(&self, declared: &str, published: &str) -> bool {
        declared == published
    }
}

/// Explicit registry of package providers, keyed by dependency type
#[derive(Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Box<dyn PackageProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the stock npm, maven and python providers.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(NpmPackageProvider));
        registry.register(Box::new(MavenPackageProvider));
        registry.register(Box::new(PythonPackageProvider));
        registry
    }

    pub fn register(&mut self, provider: Box<dyn PackageProvider>) {
        self.providers
            .insert(provider.dependency_type().to_string(), provider);
    }

    pub fn get(&self, dep_type: &str) -> Option<&dyn PackageProvider> {
        self.providers.get(dep_type).map(|p| p.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn PackageProvider> {
        self.providers.values().map(|p| p.as_ref())
    }
}

/// Resolve declared dependencies into component references.
///
/// The tree must be final (identity already assigned, no concurrent
/// mutation); this pass only adds references. Dependencies whose type has no
/// registered provider are left unresolved. Self-references are excluded.
pub fn resolve_references(tree: &mut ComponentTree, registry: &ProviderRegistry) {
    // index pass: (type, published name) -> node; last writer wins
    let mut index: HashMap<(String, String), NodeId> = HashMap::new();
    for id in tree.depth_first() {
        for provider in registry.iter() {
            for package in provider.published_packages(tree.node(id)) {
                index.insert((provider.dependency_type().to_string(), package), id);
            }
        }
    }

    // resolve pass: exact lookup first, then the provider's custom matcher
    for id in tree.depth_first() {
        let mut found = Vec::new();
        for dependency in tree.node(id).dependencies() {
            let Some(provider) = registry.get(&dependency.dep_type) else {
                continue;
            };
            let exact = index
                .get(&(dependency.dep_type.clone(), dependency.name.clone()))
                .copied();
            let target = exact.or_else(|| {
                index.iter().find_map(|((dep_type, published), &node)| {
                    (dep_type == &dependency.dep_type
                        && provider.package_matches(&dependency.name, published))
                    .then_some(node)
                })
            });
            match target {
                Some(target) if target != id => {
                    found.push(ComponentRef {
                        target,
                        dep_type: dependency.dep_type.clone(),
                        package: dependency.name.clone(),
                    });
                }
                Some(_) => {
                    debug!(package = %dependency.name, "skipping self-reference");
                }
                None => {}
            }
        }
        for reference in found {
            tree.add_reference(id, reference);
        }
    }
}

/// npm: a component publishes the `packageName` property, exact matching.
pub struct NpmPackageProvider;

impl PackageProvider for NpmPackageProvider {
    fn dependency_type(&self) -> &str {
        "npm"
    }

    fn published_packages(&self, component: &Component) -> Vec<String> {
        component
            .property(PROP_PACKAGE_NAME)
            .and_then(|p| p.as_str())
            .map(|name| vec![name.to_string()])
            .unwrap_or_default()
    }
}

/// Maven: publishes `groupId:artifactId`, compared case-insensitively.
pub struct MavenPackageProvider;

impl PackageProvider for MavenPackageProvider {
    fn dependency_type(&self) -> &str {
        "maven"
    }

    fn published_packages(&self, component: &Component) -> Vec<String> {
        let group = component.property(PROP_GROUP_ID).and_then(|p| p.as_str());
        let artifact = component.property(PROP_ARTIFACT_ID).and_then(|p| p.as_str());
        match (group, artifact) {
            (Some(group), Some(artifact)) => vec![format!("{group}:{artifact}")],
            _ => Vec::new(),
        }
    }

    fn package_matches(&self, declared: &str, published: &str) -> bool {
        declared.eq_ignore_ascii_case(published)
    }
}

/// Python: publishes `packageName`; names compare under PEP 503 rules
/// (case-insensitive, `-`/`_`/`.` equivalent).
pub struct PythonPackageProvider;

fn normalize_python_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c == '_' || c == '.' { '-' } else { c })
        .collect()
}

impl PackageProvider for PythonPackageProvider {
    fn dependency_type(&self) -> &str {
        "python"
    }

    fn published_packages(&self, component: &Component) -> Vec<String> {
        component
            .property(PROP_PACKAGE_NAME)
            .and_then(|p| p.as_str())
            .map(|name| vec![name.to_string()])
            .unwrap_or_default()
    }

    fn package_matches(&self, declared: &str, published: &str) -> bool {
        normalize_python_name(declared) == normalize_python_name(published)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Dependency;

    fn publisher(name: &str, path: &str, dep_type: &str, package: &str) -> Component {
        let mut component = Component::new(name).with_path(path);
        match dep_type {
            "maven" => {
                let (group, artifact) = package.split_once(':').unwrap();
                component.set_property(PROP_GROUP_ID, group);
                component.set_property(PROP_ARTIFACT_ID, artifact);
            }
            _ => component.set_property(PROP_PACKAGE_NAME, package),
        }
        component
    }

    #[test]
    fn test_round_trip_produces_one_directed_edge() {
        let mut tree = ComponentTree::new(Component::new("root").with_path("."));
        let mut consumer = Component::new("app").with_path("app");
        consumer.add_dependency(Dependency::new("npm", "shared-lib", "1.0.0"));
        let a = tree.add_child(tree.root(), consumer);
        let b = tree.add_child(tree.root(), publisher("shared", "libs/shared", "npm", "shared-lib"));

        resolve_references(&mut tree, &ProviderRegistry::with_defaults());

        assert_eq!(tree.refs(a).len(), 1);
        assert_eq!(tree.refs(a)[0].target, b);
        assert_eq!(tree.refs(a)[0].package, "shared-lib");
        assert!(tree.refs(b).is_empty());
    }

    #[test]
    fn test_no_self_edges() {
        let mut tree = ComponentTree::new(Component::new("root").with_path("."));
        let mut component = publisher("app", "app", "npm", "app");
        component.add_dependency(Dependency::new("npm", "app", "1.0.0"));
        let id = tree.add_child(tree.root(), component);

        resolve_references(&mut tree, &ProviderRegistry::with_defaults());
        assert!(tree.refs(id).is_empty());
    }

    #[test]
    fn test_unregistered_type_is_silently_unresolved() {
        let mut tree = ComponentTree::new(Component::new("root").with_path("."));
        let mut consumer = Component::new("app").with_path("app");
        consumer.add_dependency(Dependency::new("rubygems", "rails", "7.0"));
        let a = tree.add_child(tree.root(), consumer);

        resolve_references(&mut tree, &ProviderRegistry::with_defaults());
        assert!(tree.refs(a).is_empty());
    }

    #[test]
    fn test_python_normalized_fallback_match() {
        let mut tree = ComponentTree::new(Component::new("root").with_path("."));
        let mut consumer = Component::new("app").with_path("app");
        consumer.add_dependency(Dependency::new("python", "My_Package", "1.0"));
        let a = tree.add_child(tree.root(), consumer);
        let b = tree.add_child(tree.root(), publisher("lib", "lib", "python", "my-package"));

        resolve_references(&mut tree, &ProviderRegistry::with_defaults());
        assert_eq!(tree.refs(a).len(), 1);
        assert_eq!(tree.refs(a)[0].target, b);
    }

    #[test]
    fn test_maven_case_insensitive_match() {
        let mut tree = ComponentTree::new(Component::new("root").with_path("."));
        let mut consumer = Component::new("app").with_path("app");
        consumer.add_dependency(Dependency::new("maven", "Org.Example:Core", "1.0"));
        let a = tree.add_child(tree.root(), consumer);
        let b = tree.add_child(
            tree.root(),
            publisher("core", "core", "maven", "org.example:core"),
        );

        resolve_references(&mut tree, &ProviderRegistry::with_defaults());
        assert_eq!(tree.refs(a).len(), 1);
        assert_eq!(tree.refs(a)[0].target, b);
    }

    #[test]
    fn test_exact_lookup_beats_custom_matcher() {
        // two publishers, one exact and one that only matches after
        // normalization; the exact one must win
        let mut tree = ComponentTree::new(Component::new("root").with_path("."));
        let mut consumer = Component::new("app").with_path("app");
        consumer.add_dependency(Dependency::new("python", "my-package", "1.0"));
        let a = tree.add_child(tree.root(), consumer);
        let exact = tree.add_child(tree.root(), publisher("exact", "x", "python", "my-package"));
        let _fuzzy = tree.add_child(tree.root(), publisher("fuzzy", "y", "python", "My_Package"));

        resolve_references(&mut tree, &ProviderRegistry::with_defaults());
        assert_eq!(tree.refs(a).len(), 1);
        assert_eq!(tree.refs(a)[0].target, exact);
    }

    #[test]
    fn test_resolution_only_adds_references() {
        let mut tree = ComponentTree::new(Component::new("root").with_path("."));
        let mut consumer = Component::new("app").with_path("app");
        consumer.add_dependency(Dependency::new("npm", "shared-lib", "1.0.0"));
        tree.add_child(tree.root(), consumer);
        tree.add_child(tree.root(), publisher("shared", "libs/shared", "npm", "shared-lib"));
        let len_before = tree.len();

        resolve_references(&mut tree, &ProviderRegistry::with_defaults());
        assert_eq!(tree.len(), len_before);
    }
}
