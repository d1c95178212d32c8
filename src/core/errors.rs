//! Staging errors and warnings.
//!
//! Every [`StageError`] is fatal. Warnings never abort staging; they are
//! logged as they happen and kept in a [`Warnings`] sink for the caller.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::util::diagnostic::Diagnostic;

/// Fatal staging error.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("deprecated `.godir` file found at {}", .marker.display())]
    DeprecatedConvention { marker: PathBuf },

    #[error("unsupported gb / GOPATH layout under {}", .src_dir.display())]
    UnsupportedLayout { src_dir: PathBuf },

    #[error("bad {}: {reason}", .path.display())]
    MalformedManifest { path: PathBuf, reason: String },

    #[error("GOPACKAGENAME unset")]
    MissingPackageName,

    #[error("no Go version matches `{requested}`")]
    NoMatchingVersion {
        requested: String,
        available: Vec<String>,
    },

    #[error("GO15VENDOREXPERIMENT is not supported by go{version}")]
    UnsupportedToggle { version: String },

    #[error("must use vendor/ for go native vendoring")]
    MustUseVendor,

    #[error("`{command}` failed with {code}")]
    CompileFailed { command: String, code: ExitCode },

    #[error("I/O error at {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StageError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            StageError::DeprecatedConvention { marker } => Diagnostic::error(
                "Deprecated, .godir file found! Please update to supported Godeps or Glide dependency managers.",
            )
            .with_location(marker)
            .with_suggestion("See https://github.com/tools/godep for usage information.")
            .with_suggestion("See https://github.com/Masterminds/glide for usage information."),

            StageError::UnsupportedLayout { src_dir } => Diagnostic::error(
                "Cloud Foundry does not support the GB package manager.",
            )
            .with_location(src_dir)
            .with_context("found Go source files below src/ at the application root")
            .with_suggestion("Vendor dependencies with Godeps, Glide or a vendor/ directory.")
            .with_suggestion("Move the application code out of src/."),

            StageError::MalformedManifest { path, reason } => {
                Diagnostic::error(format!("Bad {} file", display_name(path)))
                    .with_location(path)
                    .with_context(reason.clone())
                    .with_suggestion("Regenerate it with `godep save`.")
            }

            StageError::MissingPackageName => Diagnostic::error(
                "To use go native vendoring set the $GOPACKAGENAME environment variable to your app's package name",
            )
            .with_suggestion("cf set-env <app> GOPACKAGENAME <import path>")
            .with_suggestion("Or use Godeps / Glide, which record the import path."),

            StageError::NoMatchingVersion {
                requested,
                available,
            } => {
                let mut diag =
                    Diagnostic::error(format!("no Go version matches `{}`", requested));

                if !available.is_empty() {
                    diag = diag.with_context(format!(
                        "available versions: {}",
                        available.join(", ")
                    ));
                }

                diag.with_suggestion("Request one of the available versions.")
                    .with_suggestion("cf unset-env <app> GOVERSION, if you set an override.")
            }

            StageError::UnsupportedToggle { version } => Diagnostic::error(
                "GO15VENDOREXPERIMENT is set, but is not supported by go1.7 and later",
            )
            .with_context(format!("resolved Go version: {}", version))
            .with_suggestion("Run 'cf unset-env <app> GO15VENDOREXPERIMENT' before pushing again."),

            StageError::MustUseVendor => Diagnostic::error(
                "Go native vendoring requires the vendor/ directory",
            )
            .with_context("GO15VENDOREXPERIMENT=0 turns vendor/ support off")
            .with_suggestion("cf unset-env <app> GO15VENDOREXPERIMENT"),

            StageError::CompileFailed { .. } => Diagnostic::error(self.to_string())
                .with_suggestion("See the compiler output above."),

            StageError::Io { path, source } => {
                Diagnostic::error(format!("{}", source)).with_location(path)
            }
        }
    }
}

/// Exit status of a failed subprocess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub Option<i32>);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(code) => write!(f, "exit code {}", code),
            None => write!(f, "no exit code (terminated by signal)"),
        }
    }
}

fn display_name(path: &std::path::Path) -> String {
    let mut parts: Vec<_> = path
        .components()
        .rev()
        .take(2)
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    parts.reverse();
    parts.join("/")
}

/// Non-fatal condition reported to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageWarning {
    /// `GOVERSION` replaced the requested version.
    GoVersionOverride { version: String },
    /// `GO_INSTALL_PACKAGE_SPEC` replaced the manifest's `Packages`.
    PackageSpecOverride { packages: Vec<String> },
    /// No packages configured anywhere; building `.`.
    DefaultPackage,
    /// `Godeps/_workspace` and `vendor/` both exist.
    WorkspaceVendorCoexist,
    /// Building with vendor semantics but there is no `vendor/`.
    MissingVendorDir,
}

impl fmt::Display for StageWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageWarning::GoVersionOverride { version } => write!(
                f,
                "Using $GOVERSION override.\n    $GOVERSION = {}\n\n\
                 If this isn't what you want please run:\n    cf unset-env <app> GOVERSION",
                version
            ),
            StageWarning::PackageSpecOverride { packages } => write!(
                f,
                "Using $GO_INSTALL_PACKAGE_SPEC override.\n    $GO_INSTALL_PACKAGE_SPEC = {}\n\n\
                 If this isn't what you want please run:\n    cf unset-env <app> GO_INSTALL_PACKAGE_SPEC",
                packages.join(" ")
            ),
            StageWarning::DefaultPackage => write!(f, "Installing package '.' (default)"),
            StageWarning::WorkspaceVendorCoexist => write!(
                f,
                "Godeps/_workspace/src and vendor/ exist\n\
                 code may not compile. Please convert all deps to vendor/"
            ),
            StageWarning::MissingVendorDir => write!(f, "vendor/ directory does not exist."),
        }
    }
}

/// Collects warnings, logging each one as it arrives.
#[derive(Debug, Default)]
pub struct Warnings {
    items: Vec<StageWarning>,
}

impl Warnings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log and record a warning.
    pub fn push(&mut self, warning: StageWarning) {
        tracing::warn!("{}", warning);
        self.items.push(warning);
    }

    pub fn contains(&self, warning: &StageWarning) -> bool {
        self.items.contains(warning)
    }

    pub fn as_slice(&self) -> &[StageWarning] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
