//! Release metadata and runtime startup scripts.

use std::path::Path;

use anyhow::Result;

use crate::core::workspace::Workspace;
use crate::util::config::{LayoutMode, StagingConfig};
use crate::util::fs::{copy_dir_all, ensure_dir, remove_dir_all_if_exists, write_string};

/// Where the platform picks up the release descriptor by default.
pub const DEFAULT_RELEASE_FILE: &str = "/tmp/buildpack-release-step.yml";

/// Directory the toolchain is copied to when shipped with the app.
pub const IMAGE_TOOLS_DIR: &str = ".cloudfoundry";

/// Release descriptor naming the web process after the last import path
/// segment, which is the name `go install` gives the binary.
pub fn release_yaml(import_path: &str) -> String {
    let binary = import_path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(import_path);

    format!("---\ndefault_process_types:\n    web: {}\n", binary)
}

/// Puts installed binaries on PATH at runtime.
pub fn go_script() -> &'static str {
    "PATH=$PATH:$HOME/bin\n"
}

/// Points GOROOT at the toolchain shipped inside the app.
pub fn goroot_script() -> &'static str {
    "export GOROOT=$HOME/.cloudfoundry/go\nPATH=$PATH:$GOROOT/bin\n"
}

/// Sets GOPATH to the app root and enters the main package.
pub fn gopath_script(import_path: &str) -> String {
    format!("export GOPATH=$HOME\ncd $GOPATH/src/{}\n", import_path)
}

/// Write a script to `<app>/.profile.d/<name>`.
pub fn write_profile_d(app_root: &Path, name: &str, contents: &str) -> Result<()> {
    write_string(&app_root.join(".profile.d").join(name), contents)
}

/// Write the release descriptor and the `.profile.d` scripts.
///
/// `go_install_dir` is the cached toolchain, copied into the app when
/// `GO_INSTALL_TOOLS_IN_IMAGE` is set.
pub fn write_startup_environment(
    config: &StagingConfig,
    workspace: &Workspace,
    app_root: &Path,
    go_install_dir: &Path,
    release_file: &Path,
) -> Result<()> {
    write_string(release_file, &release_yaml(workspace.import_path()))?;
    tracing::debug!("wrote release descriptor to {}", release_file.display());

    if config.install_tools_in_image {
        tracing::info!("Copying go tool chain to $GOROOT=$HOME/.cloudfoundry/go");
        let image_dir = app_root.join(IMAGE_TOOLS_DIR);
        ensure_dir(&image_dir)?;
        copy_dir_all(go_install_dir, &image_dir)?;
        write_profile_d(app_root, "goroot.sh", goroot_script())?;
    }

    if workspace.mode() == LayoutMode::InPlace {
        tracing::info!("Cleaning up $GOPATH/pkg");
        remove_dir_all_if_exists(&workspace.root().join("pkg"))?;
        write_profile_d(app_root, "zzgopath.sh", &gopath_script(workspace.import_path()))?;
    }

    write_profile_d(app_root, "go.sh", go_script())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::write_file;
    use tempfile::TempDir;

    #[test]
    fn test_release_yaml_uses_binary_name() {
        assert_eq!(
            release_yaml("github.com/org/app"),
            "---\ndefault_process_types:\n    web: app\n"
        );
        assert_eq!(release_yaml("go-online"), "---\ndefault_process_types:\n    web: go-online\n");
    }

    #[test]
    fn test_ephemeral_startup_environment() {
        let tmp = TempDir::new().unwrap();
        let app = tmp.path().join("app");
        let release = tmp.path().join("release.yml");
        let ws = Workspace::new(tmp.path().join("gopath"), "github.com/org/app", LayoutMode::Ephemeral);

        write_startup_environment(
            &StagingConfig::default(),
            &ws,
            &app,
            &tmp.path().join("cache/go1.7.5"),
            &release,
        )
        .unwrap();

        assert_eq!(
            std::fs::read_to_string(&release).unwrap(),
            "---\ndefault_process_types:\n    web: app\n"
        );
        assert_eq!(
            std::fs::read_to_string(app.join(".profile.d/go.sh")).unwrap(),
            "PATH=$PATH:$HOME/bin\n"
        );
        assert!(!app.join(".profile.d/goroot.sh").exists());
        assert!(!app.join(".profile.d/zzgopath.sh").exists());
    }

    #[test]
    fn test_tools_in_image() {
        let tmp = TempDir::new().unwrap();
        let app = tmp.path().join("app");
        let go_dir = tmp.path().join("cache/go1.7.5");
        write_file(&go_dir, "go/bin/go", "binary");
        let ws = Workspace::new(tmp.path().join("gopath"), "app", LayoutMode::Ephemeral);
        let config = StagingConfig {
            install_tools_in_image: true,
            ..StagingConfig::default()
        };

        write_startup_environment(&config, &ws, &app, &go_dir, &tmp.path().join("r.yml")).unwrap();

        assert!(app.join(".cloudfoundry/go/bin/go").is_file());
        assert_eq!(
            std::fs::read_to_string(app.join(".profile.d/goroot.sh")).unwrap(),
            goroot_script()
        );
    }

    #[test]
    fn test_in_place_cleans_pkg() {
        let tmp = TempDir::new().unwrap();
        let app = tmp.path().to_path_buf();
        write_file(&app, "pkg/linux_amd64/lib.a", "");
        let ws = Workspace::new(&app, "github.com/org/app", LayoutMode::InPlace);

        write_startup_environment(
            &StagingConfig::default(),
            &ws,
            &app,
            &tmp.path().join("cache"),
            &tmp.path().join("r.yml"),
        )
        .unwrap();

        assert!(!app.join("pkg").exists());
        assert_eq!(
            std::fs::read_to_string(app.join(".profile.d/zzgopath.sh")).unwrap(),
            "export GOPATH=$HOME\ncd $GOPATH/src/github.com/org/app\n"
        );
    }
}
