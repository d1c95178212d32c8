//! Go compiler version resolution against the catalog.
//!
//! Requested versions are partial specifiers such as `go1.6` or `1.7.x`.
//! Resolution pads them to three segments with a wildcard and picks the
//! greatest catalog version matching every segment.

use std::cmp::Ordering;
use std::fmt;

use anyhow::Result;
use semver::Version;

use crate::core::catalog::Catalog;
use crate::core::convention::VendoringConvention;
use crate::core::errors::{StageError, StageWarning, Warnings};
use crate::util::config::StagingConfig;

/// Catalog name of the Go toolchain.
pub const GO: &str = "go";

/// A fully-qualified Go version taken from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedVersion(String);

impl ResolvedVersion {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The version as semver, if it has that shape.
    pub fn semver(&self) -> Option<Version> {
        parse_version_lenient(&self.0)
    }

    /// Whether this is a 1.6.x compiler, the only one honoring
    /// `GO15VENDOREXPERIMENT`.
    pub fn is_go16(&self) -> bool {
        self.semver()
            .is_some_and(|v| v.major == 1 && v.minor == 6)
    }
}

impl fmt::Display for ResolvedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse a version leniently, filling in missing minor and patch.
pub fn parse_version_lenient(s: &str) -> Option<Version> {
    if let Ok(v) = s.parse() {
        return Some(v);
    }

    let parts: Vec<&str> = s.split('.').collect();
    match parts.len() {
        1 => {
            let major: u64 = parts[0].parse().ok()?;
            Some(Version::new(major, 0, 0))
        }
        2 => {
            let major: u64 = parts[0].parse().ok()?;
            let minor: u64 = parts[1].parse().ok()?;
            Some(Version::new(major, minor, 0))
        }
        _ => None,
    }
}

/// One segment of a version pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment {
    Any,
    Exact(u64),
}

/// Split `requested` into pattern segments.
///
/// Returns `None` when a segment is neither numeric nor a wildcard.
fn parse_pattern(requested: &str) -> Option<Vec<Segment>> {
    let mut pattern = requested.trim().to_string();
    if pattern.split('.').count() < 3 {
        pattern.push_str(".x");
    }

    let stripped =
        pattern.trim_start_matches(|c: char| !c.is_ascii_digit() && !is_wildcard(c));

    stripped
        .split('.')
        .map(|seg| match seg {
            "x" | "X" | "*" => Some(Segment::Any),
            n => n.parse().ok().map(Segment::Exact),
        })
        .collect()
}

fn is_wildcard(c: char) -> bool {
    matches!(c, 'x' | 'X' | '*')
}

/// Numeric segments of a catalog version. Pre-release or otherwise
/// non-numeric versions yield `None`.
fn numeric_segments(version: &str) -> Option<Vec<u64>> {
    version.split('.').map(|s| s.parse().ok()).collect()
}

/// Component-wise match. A trailing wildcard also covers any further
/// segments, so `1.x` matches `1.7.5`.
fn matches(pattern: &[Segment], version: &[u64]) -> bool {
    let open_ended = pattern.last() == Some(&Segment::Any);
    if version.len() > pattern.len() && !open_ended {
        return false;
    }

    pattern.iter().enumerate().all(|(i, seg)| {
        let actual = version.get(i).copied().unwrap_or(0);
        match seg {
            Segment::Any => true,
            Segment::Exact(n) => *n == actual,
        }
    })
}

fn compare_segments(a: &[u64], b: &[u64]) -> Ordering {
    let len = a.len().max(b.len());
    (0..len)
        .map(|i| {
            let x = a.get(i).copied().unwrap_or(0);
            let y = b.get(i).copied().unwrap_or(0);
            x.cmp(&y)
        })
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Resolve a partial specifier to the greatest matching catalog version.
pub fn resolve_version(requested: &str, available: &[String]) -> Result<ResolvedVersion> {
    let no_match = || StageError::NoMatchingVersion {
        requested: requested.to_string(),
        available: available.to_vec(),
    };

    let pattern = parse_pattern(requested).ok_or_else(no_match)?;

    let best = available
        .iter()
        .filter_map(|v| numeric_segments(v).map(|segs| (v, segs)))
        .filter(|(_, segs)| matches(&pattern, segs))
        .max_by(|(_, a), (_, b)| compare_segments(a, b));

    match best {
        Some((version, _)) => {
            tracing::debug!("resolved `{}` to go {}", requested, version);
            Ok(ResolvedVersion(version.clone()))
        }
        None => Err(no_match().into()),
    }
}

/// The Go version to ask the catalog for.
///
/// `GOVERSION` wins (with a warning), then the Godeps `GoVersion`, then
/// the catalog default.
pub fn requested_version(
    config: &StagingConfig,
    convention: &VendoringConvention,
    catalog: &Catalog,
    warnings: &mut Warnings,
) -> Result<String> {
    if let Some(ref version) = config.go_version {
        warnings.push(StageWarning::GoVersionOverride {
            version: version.clone(),
        });
        return Ok(version.clone());
    }

    if let Some(version) = convention.manifest().and_then(|m| m.requested_version()) {
        return Ok(version.to_string());
    }

    let default = catalog.default_version(GO)?;
    Ok(format!("go{}", default.version))
}

/// Pick and resolve the Go version for this app.
pub fn select_go_version(
    config: &StagingConfig,
    convention: &VendoringConvention,
    catalog: &Catalog,
    warnings: &mut Warnings,
) -> Result<ResolvedVersion> {
    let requested = requested_version(config, convention, catalog, warnings)?;
    resolve_version(&requested, &catalog.all_versions(GO))
}
