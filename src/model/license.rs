//! Structured license records

use serde::{Deserialize, Serialize};

/// How a license string was obtained and normalized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LicenseDetectionMethod {
    /// Declared in a manifest field
    Declared,
    /// Matched a well-known license file name
    LicenseFile,
    /// Guessed from file content
    Heuristic,
}

/// A detected license with provenance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseRecord {
    /// Normalized license name, e.g. "Apache-2.0"
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
    pub method: LicenseDetectionMethod,
    pub confidence: f32,
}

impl LicenseRecord {
    pub fn declared(name: impl Into<String>, source_file: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_file: Some(source_file.into()),
            method: LicenseDetectionMethod::Declared,
            confidence: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_license() {
        let license = LicenseRecord::declared("MIT", "package.json");
        assert_eq!(license.name, "MIT");
        assert_eq!(license.method, LicenseDetectionMethod::Declared);
        assert_eq!(license.confidence, 1.0);
    }

    #[test]
    fn test_serializes_kebab_case_method() {
        let license = LicenseRecord {
            name: "Apache-2.0".to_string(),
            source_file: None,
            method: LicenseDetectionMethod::LicenseFile,
            confidence: 0.8,
        };
        let json = serde_json::to_value(&license).unwrap();
        assert_eq!(json["method"], "license-file");
        assert!(json.get("source_file").is_none());
    }
}
