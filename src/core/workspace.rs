//! GOPATH workspace layout.
//!
//! The Go toolchain finds the app by its import path, so the app has to live
//! at `$GOPATH/src/<import path>`. A [`Workspace`] records where that is and
//! [`plan_workspace`] puts the app there.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::util::config::LayoutMode;
use crate::util::fs::{copy_dir_all, ensure_dir, move_entries};

/// Entries left at the app root when the app is moved in place.
pub const IN_PLACE_SKIP: &[&str] = &["Procfile", ".profile", "src"];

/// Prefix of the private temp dir used in ephemeral mode.
const TEMP_PREFIX: &str = "gobuildpack.gopath";

/// A GOPATH containing the app under its import path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
    import_path: String,
    package_dir: PathBuf,
    mode: LayoutMode,
}

impl Workspace {
    /// Describe a workspace rooted at `root`. Touches nothing on disk.
    pub fn new(root: impl Into<PathBuf>, import_path: impl Into<String>, mode: LayoutMode) -> Self {
        let root = root.into();
        let import_path = import_path.into();
        let package_dir = root.join("src").join(&import_path);
        Workspace {
            root,
            import_path,
            package_dir,
            mode,
        }
    }

    /// The GOPATH.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn import_path(&self) -> &str {
        &self.import_path
    }

    /// `root/src/<import path>`, where the app's files live.
    pub fn package_dir(&self) -> &Path {
        &self.package_dir
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    /// The app's `vendor/` directory.
    pub fn vendor_dir(&self) -> PathBuf {
        self.package_dir.join("vendor")
    }

    pub fn has_vendor_dir(&self) -> bool {
        self.vendor_dir().is_dir()
    }
}

/// Lay out a GOPATH for the app at `app_root` under `import_path`.
///
/// In [`LayoutMode::Ephemeral`] the app is copied into a fresh temp dir. In
/// [`LayoutMode::InPlace`] the app root becomes the GOPATH and its entries
/// are moved under `src/<import path>`, except [`IN_PLACE_SKIP`].
///
/// Either way `<app_root>/bin` exists afterwards.
pub fn plan_workspace(app_root: &Path, import_path: &str, mode: LayoutMode) -> Result<Workspace> {
    ensure_bin_dir(app_root)?;

    let workspace = match mode {
        LayoutMode::Ephemeral => {
            let tmp = tempfile::Builder::new()
                .prefix(TEMP_PREFIX)
                .tempdir()
                .context("failed to create temporary GOPATH")?
                .keep();
            let workspace = Workspace::new(tmp.join(".go"), import_path, mode);

            tracing::debug!(
                "copying {} to {}",
                app_root.display(),
                workspace.package_dir().display()
            );
            copy_dir_all(app_root, workspace.package_dir())?;
            workspace
        }
        LayoutMode::InPlace => {
            let workspace = Workspace::new(app_root, import_path, mode);
            ensure_dir(workspace.package_dir())?;

            let moved = move_entries(app_root, workspace.package_dir(), IN_PLACE_SKIP)?;
            tracing::debug!(
                "moved {} entries into {}",
                moved.len(),
                workspace.package_dir().display()
            );

            // `bin` itself was moved along with everything else.
            ensure_bin_dir(app_root)?;
            workspace
        }
    };

    Ok(workspace)
}

/// Make sure `<app_root>/bin` is a directory.
fn ensure_bin_dir(app_root: &Path) -> Result<()> {
    let bin = app_root.join("bin");
    if bin.exists() && !bin.is_dir() {
        bail!("File bin exists and is not a directory.");
    }
    ensure_dir(&bin)
}
