//! Staging configuration.
//!
//! The staging platform configures the build through environment variables.
//! They are read exactly once, at pipeline entry, into a [`StagingConfig`]
//! that every stage receives by reference. Nothing else in the crate reads
//! the process environment.

use std::env;

/// Compiler version override (`GOVERSION`).
pub const GOVERSION: &str = "GOVERSION";
/// Space-separated package list override.
pub const GO_INSTALL_PACKAGE_SPEC: &str = "GO_INSTALL_PACKAGE_SPEC";
/// Vendor directory toggle, only honored by Go 1.6.
pub const GO15VENDOREXPERIMENT: &str = "GO15VENDOREXPERIMENT";
/// Linker symbol name for `-ldflags -X`.
pub const GO_LINKER_SYMBOL: &str = "GO_LINKER_SYMBOL";
/// Linker symbol value for `-ldflags -X`.
pub const GO_LINKER_VALUE: &str = "GO_LINKER_VALUE";
/// Build the GOPATH inside the droplet instead of a temp dir.
pub const GO_SETUP_GOPATH_IN_IMAGE: &str = "GO_SETUP_GOPATH_IN_IMAGE";
/// Ship the Go toolchain inside the droplet.
pub const GO_INSTALL_TOOLS_IN_IMAGE: &str = "GO_INSTALL_TOOLS_IN_IMAGE";
/// Import path for apps without a vendoring tool.
pub const GOPACKAGENAME: &str = "GOPACKAGENAME";

/// State of the `GO15VENDOREXPERIMENT` toggle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VendorToggle {
    /// Variable not set (or empty).
    #[default]
    Unset,
    /// Set to `"0"`.
    Disabled,
    /// Set to any other value.
    Enabled(String),
}

impl VendorToggle {
    fn parse(value: Option<String>) -> Self {
        match value.as_deref() {
            None | Some("") => VendorToggle::Unset,
            Some("0") => VendorToggle::Disabled,
            Some(other) => VendorToggle::Enabled(other.to_string()),
        }
    }

    /// Whether the user set the toggle at all.
    pub fn is_set(&self) -> bool {
        !matches!(self, VendorToggle::Unset)
    }
}

/// Workspace layout mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutMode {
    /// GOPATH lives in a private temp dir; the app is copied into it.
    #[default]
    Ephemeral,
    /// GOPATH is the app root itself; the app is moved under `src/`.
    InPlace,
}

/// Immutable configuration for one staging run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagingConfig {
    /// `GOVERSION`
    pub go_version: Option<String>,

    /// `GO_INSTALL_PACKAGE_SPEC`, split on spaces
    pub install_packages: Vec<String>,

    /// `GO15VENDOREXPERIMENT`
    pub vendor_toggle: VendorToggle,

    /// `GO_LINKER_SYMBOL`
    pub linker_symbol: Option<String>,

    /// `GO_LINKER_VALUE`
    pub linker_value: Option<String>,

    /// `GO_SETUP_GOPATH_IN_IMAGE`
    pub layout: LayoutMode,

    /// `GO_INSTALL_TOOLS_IN_IMAGE`
    pub install_tools_in_image: bool,

    /// `GOPACKAGENAME`
    pub package_name: Option<String>,
}

impl StagingConfig {
    /// Collect the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Collect the configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let flag = |key: &str| lookup(key).as_deref() == Some("true");

        let install_packages = non_empty(GO_INSTALL_PACKAGE_SPEC)
            .map(|spec| {
                spec.split(' ')
                    .filter(|p| !p.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        StagingConfig {
            go_version: non_empty(GOVERSION),
            install_packages,
            vendor_toggle: VendorToggle::parse(lookup(GO15VENDOREXPERIMENT)),
            linker_symbol: non_empty(GO_LINKER_SYMBOL),
            linker_value: non_empty(GO_LINKER_VALUE),
            layout: if flag(GO_SETUP_GOPATH_IN_IMAGE) {
                LayoutMode::InPlace
            } else {
                LayoutMode::Ephemeral
            },
            install_tools_in_image: flag(GO_INSTALL_TOOLS_IN_IMAGE),
            package_name: non_empty(GOPACKAGENAME),
        }
    }

    /// The `-X symbol=value` linker pair, when both halves are configured.
    pub fn linker_pair(&self) -> Option<(&str, &str)> {
        match (&self.linker_symbol, &self.linker_value) {
            (Some(symbol), Some(value)) => Some((symbol.as_str(), value.as_str())),
            _ => None,
        }
    }
}
