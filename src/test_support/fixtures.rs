//! Test fixtures for common staging scenarios.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Write `contents` to `root/rel`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, contents: &str) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, contents).unwrap();
    path
}

/// Write an executable file.
pub fn write_executable(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }
}

/// An application source tree.
#[derive(Debug, Clone, Default)]
pub struct AppFixture {
    /// Files (path relative to app root -> content).
    pub files: BTreeMap<PathBuf, String>,
}

impl AppFixture {
    /// An app with a single `main.go`.
    pub fn new() -> Self {
        AppFixture::default().with_file("main.go", "package main\n\nfunc main() {}\n")
    }

    /// A Godeps app.
    pub fn godep(import_path: &str, go_version: &str, packages: &[&str]) -> Self {
        let manifest = serde_json::json!({
            "ImportPath": import_path,
            "GoVersion": go_version,
            "Packages": packages,
            "Deps": [],
        });
        Self::new().with_file("Godeps/Godeps.json", &manifest.to_string())
    }

    /// A glide app.
    pub fn glide(import_path: &str) -> Self {
        Self::new().with_file("glide.yaml", &format!("package: {}\n", import_path))
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: &str) -> Self {
        self.files.insert(path.into(), content.to_string());
        self
    }

    /// Add a vendored package with one source file.
    pub fn with_vendored(self, package: &str) -> Self {
        let name = package.rsplit('/').next().unwrap_or(package);
        self.with_file(
            format!("vendor/{}/{}.go", package, name),
            &format!("package {}\n", name),
        )
    }

    /// Write the fixture below `root`.
    pub fn write_to(&self, root: &Path) {
        for (rel, content) in &self.files {
            write_file(root, &rel.to_string_lossy(), content);
        }
    }
}

/// Common catalog documents.
pub mod catalogs {
    /// Go 1.6.3, 1.6.4 and 1.7.5 (default), plus one godep and glide.
    pub fn standard() -> String {
        let mut doc = String::from("[[default_versions]]\nname = \"go\"\nversion = \"1.7.5\"\n");
        for (name, version) in [
            ("go", "1.6.3"),
            ("go", "1.6.4"),
            ("go", "1.7.5"),
            ("godep", "v79"),
            ("glide", "v0.12.3"),
        ] {
            doc.push_str(&entry(name, version));
        }
        doc
    }

    fn entry(name: &str, version: &str) -> String {
        format!(
            "\n[[dependencies]]\nname = \"{name}\"\nversion = \"{version}\"\n\
             uri = \"https://buildpacks.example.com/{name}/{name}-{version}.tar.gz\"\n\
             sha256 = \"{}\"\n",
            "0".repeat(64)
        )
    }
}
