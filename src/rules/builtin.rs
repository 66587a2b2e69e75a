//! Built-in technology rules
//!
//! A starter set covering the common languages, frameworks and infrastructure
//! tools. Callers can replace or extend it with rule files loaded through
//! [`super::RuleSet::from_file`].

use super::{ContentRule, DependencyPattern, Rule, TechnologyCategory};
use super::{CONTENT_KIND_JSON_PATH, CONTENT_KIND_REGEX, CONTENT_KIND_XML_PATH, CONTENT_KIND_YAML_PATH};

pub fn builtin_rules() -> Vec<Rule> {
    vec![
        // Languages
        Rule::new("rust", "Rust", TechnologyCategory::Language)
            .component()
            .primary()
            .with_extensions(&[".rs"]),
        Rule::new("go", "Go", TechnologyCategory::Language)
            .component()
            .primary()
            .with_extensions(&[".go"]),
        Rule::new("python", "Python", TechnologyCategory::Language)
            .component()
            .primary()
            .with_extensions(&[".py"]),
        Rule::new("javascript", "JavaScript", TechnologyCategory::Language)
            .component()
            .primary()
            .with_extensions(&[".js", ".mjs", ".cjs"]),
        Rule::new("typescript", "TypeScript", TechnologyCategory::Language)
            .component()
            .primary()
            .with_extensions(&[".ts", ".tsx"]),
        Rule::new("java", "Java", TechnologyCategory::Language)
            .component()
            .primary()
            .with_extensions(&[".java"]),
        Rule::new("csharp", "C#", TechnologyCategory::Language)
            .component()
            .primary()
            .with_extensions(&[".cs", ".csproj"]),
        Rule::new("ruby", "Ruby", TechnologyCategory::Language)
            .component()
            .primary()
            .with_extensions(&[".rb"]),
        Rule::new("php", "PHP", TechnologyCategory::Language)
            .component()
            .primary()
            .with_extensions(&[".php"]),
        // Package managers: matched through dependency manifests by external
        // detectors, never promoted from file names alone.
        Rule::new("npm", "npm", TechnologyCategory::PackageManager)
            .with_files(&["package.json", "package-lock.json"]),
        Rule::new("yarn", "Yarn", TechnologyCategory::PackageManager)
            .with_files(&["yarn.lock"]),
        Rule::new("pip", "pip", TechnologyCategory::PackageManager)
            .with_files(&["requirements.txt", "setup.py"]),
        Rule::new("maven", "Maven", TechnologyCategory::PackageManager)
            .with_files(&["pom.xml"]),
        Rule::new("cargo", "Cargo", TechnologyCategory::PackageManager)
            .with_files(&["Cargo.toml", "Cargo.lock"]),
        // Frameworks, by declared dependencies
        Rule::new("flask", "Flask", TechnologyCategory::Framework)
            .with_dependency("python", "flask"),
        Rule::new("django", "Django", TechnologyCategory::Framework)
            .with_dependency("python", "django"),
        Rule::new("fastapi", "FastAPI", TechnologyCategory::Framework)
            .with_dependency("python", "fastapi"),
        Rule::new("react", "React", TechnologyCategory::Framework)
            .with_dependency("npm", "react"),
        Rule::new("nextjs", "Next.js", TechnologyCategory::Framework)
            .with_dependency("npm", "next"),
        Rule::new("angular", "Angular", TechnologyCategory::Framework)
            .with_dependency("npm", "/^@angular\\//"),
        Rule::new("express", "Express", TechnologyCategory::Framework)
            .with_dependency("npm", "express"),
        Rule::new("spring-boot", "Spring Boot", TechnologyCategory::Framework)
            .with_dependency("maven", "/^org\\.springframework\\.boot:/")
            .with_content(ContentRule {
                kind: CONTENT_KIND_XML_PATH.to_string(),
                path: Some("project.parent.artifactId".to_string()),
                value: Some("spring-boot-starter-parent".to_string()),
                files: vec!["pom.xml".to_string()],
                ..ContentRule::default()
            }),
        Rule::new("actix-web", "Actix Web", TechnologyCategory::Framework)
            .with_dependency("cargo", "actix-web"),
        Rule::new("axum", "Axum", TechnologyCategory::Framework)
            .with_dependency("cargo", "axum"),
        Rule::new("shadcn", "shadcn/ui", TechnologyCategory::Library).with_content(ContentRule {
            kind: CONTENT_KIND_JSON_PATH.to_string(),
            path: Some("$.$schema".to_string()),
            value: Some("https://ui.shadcn.com/schema.json".to_string()),
            files: vec!["components.json".to_string()],
            ..ContentRule::default()
        }),
        // Infrastructure
        Rule::new("terraform", "Terraform", TechnologyCategory::Infrastructure)
            .component()
            .primary()
            .with_extensions(&[".tf"]),
        Rule::new("docker", "Docker", TechnologyCategory::Infrastructure)
            .with_files(&["Dockerfile", "Dockerfile.*", ".dockerignore"]),
        Rule::new(
            "docker-compose",
            "Docker Compose",
            TechnologyCategory::Infrastructure,
        )
        .with_files(&["docker-compose.yml", "docker-compose.yaml", "compose.yml", "compose.yaml"])
        .with_content(ContentRule {
            kind: CONTENT_KIND_YAML_PATH.to_string(),
            path: Some("services".to_string()),
            files: vec![
                "docker-compose.yml".to_string(),
                "docker-compose.yaml".to_string(),
            ],
            ..ContentRule::default()
        }),
        Rule::new("kubernetes", "Kubernetes", TechnologyCategory::Infrastructure).with_content(
            ContentRule {
                kind: CONTENT_KIND_YAML_PATH.to_string(),
                path: Some("apiVersion".to_string()),
                extensions: vec![".yml".to_string(), ".yaml".to_string()],
                ..ContentRule::default()
            },
        ),
        Rule::new("github-actions", "GitHub Actions", TechnologyCategory::Tool).with_content(
            ContentRule {
                kind: CONTENT_KIND_REGEX.to_string(),
                pattern: Some(r"(?m)^\s*runs-on:".to_string()),
                extensions: vec![".yml".to_string(), ".yaml".to_string()],
                ..ContentRule::default()
            },
        ),
        // Tools
        Rule::new("make", "Make", TechnologyCategory::Tool)
            .with_files(&["Makefile", "makefile", "GNUmakefile"]),
        Rule::new("jenkins", "Jenkins", TechnologyCategory::Tool).with_files(&["Jenkinsfile"]),
    ]
}
