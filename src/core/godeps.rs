//! `Godeps/Godeps.json` parsing.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;

use crate::core::errors::StageError;

/// Location of the manifest relative to the app root.
pub const GODEPS_JSON: &str = "Godeps/Godeps.json";

/// Legacy `GOPATH` workspace that predates `vendor/`.
pub const GODEPS_WORKSPACE: &str = "Godeps/_workspace/src";

/// The dependency manifest written by `godep save`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DependencyManifest {
    #[serde(rename = "ImportPath", default)]
    pub import_path: String,

    /// Partial version specifier such as `go1.6`.
    #[serde(rename = "GoVersion", default)]
    pub requested_version: String,

    #[serde(rename = "Packages", default)]
    pub packages: Vec<String>,

    /// Whether `Godeps/_workspace/src` exists next to the manifest.
    #[serde(skip)]
    pub legacy_workspace_present: bool,
}

impl DependencyManifest {
    /// Path of the manifest inside an app.
    pub fn path_in(app_root: &Path) -> PathBuf {
        app_root.join(GODEPS_JSON)
    }

    /// Load the manifest from an app root.
    pub fn load(app_root: &Path) -> Result<Self> {
        let path = Self::path_in(app_root);
        let contents = fs::read_to_string(&path).map_err(|source| StageError::Io {
            path: path.clone(),
            source,
        })?;

        let mut manifest = Self::parse(&contents, &path)?;
        manifest.legacy_workspace_present = app_root.join(GODEPS_WORKSPACE).exists();
        Ok(manifest)
    }

    /// Parse manifest contents; `path` is only used for error messages.
    pub fn parse(contents: &str, path: &Path) -> Result<Self, StageError> {
        serde_json::from_str(contents).map_err(|e| StageError::MalformedManifest {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// The declared import path, rejecting an empty one.
    pub fn import_path(&self, app_root: &Path) -> Result<&str, StageError> {
        if self.import_path.trim().is_empty() {
            return Err(StageError::MalformedManifest {
                path: Self::path_in(app_root),
                reason: "ImportPath is missing or empty".to_string(),
            });
        }
        Ok(&self.import_path)
    }

    /// The requested Go version, if the manifest names one.
    pub fn requested_version(&self) -> Option<&str> {
        let v = self.requested_version.trim();
        (!v.is_empty()).then_some(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_godeps(root: &Path, contents: &str) {
        fs::create_dir_all(root.join("Godeps")).unwrap();
        fs::write(root.join(GODEPS_JSON), contents).unwrap();
    }

    #[test]
    fn test_load_manifest() {
        let tmp = TempDir::new().unwrap();
        write_godeps(
            tmp.path(),
            r#"{"ImportPath": "go-online", "GoVersion": "go1.6", "Deps": []}"#,
        );

        let manifest = DependencyManifest::load(tmp.path()).unwrap();
        assert_eq!(manifest.import_path, "go-online");
        assert_eq!(manifest.requested_version(), Some("go1.6"));
        assert!(manifest.packages.is_empty());
        assert!(!manifest.legacy_workspace_present);
    }

    #[test]
    fn test_load_records_legacy_workspace() {
        let tmp = TempDir::new().unwrap();
        write_godeps(tmp.path(), r#"{"ImportPath": "a/pkg", "Packages": ["foo", "bar"]}"#);
        fs::create_dir_all(tmp.path().join(GODEPS_WORKSPACE)).unwrap();

        let manifest = DependencyManifest::load(tmp.path()).unwrap();
        assert!(manifest.legacy_workspace_present);
        assert_eq!(manifest.packages, vec!["foo", "bar"]);
        assert_eq!(manifest.requested_version(), None);
    }

    #[test]
    fn test_malformed_manifest_names_file() {
        let tmp = TempDir::new().unwrap();
        write_godeps(tmp.path(), "{ not json");

        let err = DependencyManifest::load(tmp.path()).unwrap_err();
        match err.downcast_ref::<StageError>() {
            Some(StageError::MalformedManifest { path, .. }) => {
                assert!(path.ends_with("Godeps/Godeps.json"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_empty_import_path_rejected() {
        let manifest = DependencyManifest::default();
        let err = manifest.import_path(Path::new("/app")).unwrap_err();
        assert!(matches!(err, StageError::MalformedManifest { .. }));
    }
}
