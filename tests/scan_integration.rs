//! End-to-end scans over real temporary directories

use std::fs;
use std::path::Path;
use techscope::output::ScanReport;
use techscope::{ScanConfig, Scanner};

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn fixture_project(root: &Path) {
    write(root, "infra/main.tf", "resource \"aws_s3_bucket\" \"b\" {}\n");
    write(root, "infra/variables.tf", "variable \"region\" {}\n");
    write(root, "web/components.json", r#"{"$schema":"https://ui.shadcn.com/schema.json"}"#);
    write(root, "web/index.ts", "export {};\n");
    write(root, "api/app.py", "print('hi')\n");
    write(root, "Dockerfile", "FROM scratch\n");
}

fn scan(root: &Path) -> techscope::ScanOutcome {
    let mut config = ScanConfig::new(root);
    config.root_id_override = Some("fixture-root".to_string());
    Scanner::new(config).unwrap().scan().unwrap()
}

#[test]
fn detects_components_per_directory() {
    let dir = tempfile::tempdir().unwrap();
    fixture_project(dir.path());
    let outcome = scan(dir.path());

    let names: Vec<_> = outcome
        .tree
        .depth_first()
        .into_iter()
        .map(|id| outcome.tree.node(id).name().to_string())
        .collect();
    assert!(names.contains(&"infra".to_string()), "names: {names:?}");
    assert!(names.contains(&"web".to_string()));
    assert!(names.contains(&"api".to_string()));

    let find = |name: &str| {
        outcome
            .tree
            .depth_first()
            .into_iter()
            .find(|&id| outcome.tree.node(id).name() == name)
            .map(|id| outcome.tree.node(id).clone())
            .unwrap()
    };

    let infra = find("infra");
    assert_eq!(infra.primary_technologies(), ["terraform"]);
    assert_eq!(infra.paths(), ["infra"]);

    let web = find("web");
    assert!(web.technologies().contains(&"typescript".to_string()));
    assert!(web.technologies().contains(&"shadcn".to_string()));

    let api = find("api");
    assert_eq!(api.primary_technologies(), ["python"]);
}

#[test]
fn root_component_collects_root_level_evidence() {
    let dir = tempfile::tempdir().unwrap();
    fixture_project(dir.path());
    let outcome = scan(dir.path());

    // Dockerfile lives at the root; its evidence lands on a child of the
    // root named after the scan directory
    let root_children: Vec<_> = outcome
        .tree
        .children(outcome.tree.root())
        .iter()
        .map(|&id| outcome.tree.node(id))
        .collect();
    let docker_carrier = root_children
        .iter()
        .find(|c| c.technologies().contains(&"docker".to_string()));
    assert!(docker_carrier.is_some());
    assert_eq!(docker_carrier.unwrap().paths(), ["."]);
}

#[test]
fn repeated_scans_reproduce_identifiers() {
    let dir = tempfile::tempdir().unwrap();
    fixture_project(dir.path());

    let first = scan(dir.path());
    let second = scan(dir.path());

    assert_eq!(first.root_id, "fixture-root");
    assert_eq!(first.root_id, second.root_id);
    assert_eq!(first.tree.len(), second.tree.len());

    let ids = |outcome: &techscope::ScanOutcome| -> Vec<String> {
        outcome
            .tree
            .depth_first()
            .into_iter()
            .map(|id| outcome.tree.node(id).id().to_string())
            .collect()
    };
    assert_eq!(ids(&first), ids(&second));
}

#[test]
fn path_derived_root_id_is_reproducible_without_override() {
    let dir = tempfile::tempdir().unwrap();
    fixture_project(dir.path());

    let scan_plain = || {
        Scanner::new(ScanConfig::new(dir.path()))
            .unwrap()
            .scan()
            .unwrap()
    };
    assert_eq!(scan_plain().root_id, scan_plain().root_id);
}

#[test]
fn gitignored_directories_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    fixture_project(dir.path());
    write(dir.path(), ".gitignore", "generated/\n");
    write(dir.path(), "generated/main.tf", "resource \"x\" \"y\" {}\n");
    // .gitignore only applies inside git repositories
    fs::create_dir_all(dir.path().join(".git")).unwrap();

    let outcome = scan(dir.path());
    let names: Vec<_> = outcome
        .tree
        .depth_first()
        .into_iter()
        .map(|id| outcome.tree.node(id).name().to_string())
        .collect();
    assert!(!names.contains(&"generated".to_string()), "names: {names:?}");
}

#[test]
fn custom_rule_file_replaces_builtin_rules() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "project/query.sql", "select 1;\n");

    let rules_dir = tempfile::tempdir().unwrap();
    let rules_path = rules_dir.path().join("rules.yaml");
    fs::write(
        &rules_path,
        r#"
rules:
  - id: sql
    name: SQL
    type: language
    component: true
    primary: true
    extensions: [".sql"]
"#,
    )
    .unwrap();

    let mut config = ScanConfig::new(dir.path());
    config.rules_file = Some(rules_path);
    config.root_id_override = Some("r".to_string());
    let outcome = Scanner::new(config).unwrap().scan().unwrap();

    let project = outcome
        .tree
        .depth_first()
        .into_iter()
        .map(|id| outcome.tree.node(id))
        .find(|c| c.name() == "project")
        .unwrap();
    assert_eq!(project.primary_technologies(), ["sql"]);
}

#[test]
fn report_serializes_finished_tree() {
    let dir = tempfile::tempdir().unwrap();
    fixture_project(dir.path());
    let outcome = scan(dir.path());

    let report = ScanReport::new(&outcome.tree, outcome.root_id.clone());
    let json: serde_json::Value =
        serde_json::from_str(&report.to_json_pretty().unwrap()).unwrap();

    assert_eq!(json["tool"], "techscope");
    assert_eq!(json["root_id"], "fixture-root");
    assert_eq!(json["component"]["id"], "fixture-root");
    assert!(json["component"]["children"].is_array());
}

#[test]
fn missing_root_is_a_config_error() {
    let config = ScanConfig::new("/no/such/directory/exists");
    assert!(Scanner::new(config).is_err());
}
