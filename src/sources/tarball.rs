//! Installing `.tar.gz` dependencies from the catalog.

use std::io::{Cursor, Read};
use std::path::Path;

use anyhow::{bail, Context, Result};
use flate2::read::GzDecoder;
use tar::Archive;
use url::Url;

use crate::core::catalog::CatalogEntry;
use crate::sources::DependencyInstaller;
use crate::util::hash::{digest_matches, sha256_bytes};

/// Downloads a catalog tarball, checks its digest and unpacks it.
///
/// `http(s)://` URIs are fetched with a blocking client; `file://` URIs are
/// read from disk, which is how offline buildpacks ship their dependencies.
#[derive(Debug, Default, Clone, Copy)]
pub struct TarballInstaller;

impl TarballInstaller {
    pub fn new() -> Self {
        TarballInstaller
    }

    fn fetch(&self, uri: &str) -> Result<Vec<u8>> {
        let url = Url::parse(uri).with_context(|| format!("invalid dependency uri: {}", uri))?;

        match url.scheme() {
            "http" | "https" => {
                let response = reqwest::blocking::get(url.as_str())
                    .with_context(|| format!("failed to download {}", url))?;

                if !response.status().is_success() {
                    bail!("failed to download {}: HTTP {}", url, response.status());
                }

                let bytes = response
                    .bytes()
                    .with_context(|| format!("failed to read response body from {}", url))?;
                Ok(bytes.to_vec())
            }
            "file" => {
                let path = url
                    .to_file_path()
                    .map_err(|_| anyhow::anyhow!("invalid file uri: {}", url))?;
                std::fs::read(&path)
                    .with_context(|| format!("failed to read {}", path.display()))
            }
            other => bail!("unsupported uri scheme `{}` in {}", other, url),
        }
    }
}

impl DependencyInstaller for TarballInstaller {
    fn install(&self, entry: &CatalogEntry, dest: &Path) -> Result<()> {
        tracing::info!("Installing {} {}", entry.name, entry.version);
        tracing::debug!("fetching {}", entry.uri);

        let data = self.fetch(&entry.uri)?;

        let actual = sha256_bytes(&data);
        if !digest_matches(&entry.sha256, &actual) {
            bail!(
                "dependency sha256 mismatch for {} {}:\n  expected: {}\n  actual:   {}",
                entry.name,
                entry.version,
                entry.sha256,
                actual
            );
        }

        extract_tarball(&data, dest)
            .with_context(|| format!("failed to extract {} {}", entry.name, entry.version))?;

        tracing::debug!("installed {} {} to {}", entry.name, entry.version, dest.display());
        Ok(())
    }
}

/// Unpack a gzipped tarball into `dest`.
///
/// Entries that would land outside `dest` are rejected.
pub fn extract_tarball(data: &[u8], dest: &Path) -> Result<()> {
    std::fs::create_dir_all(dest)
        .with_context(|| format!("failed to create destination directory: {}", dest.display()))?;

    let decoder = GzDecoder::new(Cursor::new(data));
    extract_archive(Archive::new(decoder), dest)
}

fn extract_archive<R: Read>(mut archive: Archive<R>, dest: &Path) -> Result<()> {
    archive.set_preserve_permissions(true);

    for entry in archive.entries().context("failed to read tarball entries")? {
        let mut entry = entry.context("failed to read tarball entry")?;
        let entry_path = entry
            .path()
            .context("failed to get entry path")?
            .into_owned();

        let unpacked = entry
            .unpack_in(dest)
            .with_context(|| format!("failed to unpack {}", entry_path.display()))?;
        if !unpacked {
            bail!(
                "tarball entry escapes destination directory: {}",
                entry_path.display()
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use tempfile::TempDir;

    fn tarball(files: &[(&str, &str)]) -> Vec<u8> {
        let encoder = GzEncoder::new(Vec::new(), Compression::default());
        let mut builder = tar::Builder::new(encoder);

        for (path, content) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o755);
            header.set_cksum();
            builder
                .append_data(&mut header, path, content.as_bytes())
                .unwrap();
        }

        builder.into_inner().unwrap().finish().unwrap()
    }

    fn file_entry(tmp: &TempDir, data: &[u8], sha256: String) -> CatalogEntry {
        let archive = tmp.path().join("go1.7.5.linux-amd64.tar.gz");
        std::fs::write(&archive, data).unwrap();

        CatalogEntry {
            name: "go".to_string(),
            version: "1.7.5".to_string(),
            uri: Url::from_file_path(&archive).unwrap().to_string(),
            sha256,
        }
    }

    #[test]
    fn test_install_from_file_uri() {
        let tmp = TempDir::new().unwrap();
        let data = tarball(&[("go/bin/go", "#!/bin/sh\n"), ("go/VERSION", "go1.7.5")]);
        let entry = file_entry(&tmp, &data, sha256_bytes(&data).to_uppercase());
        let dest = tmp.path().join("cache/go1.7.5");

        TarballInstaller::new().install(&entry, &dest).unwrap();

        assert!(dest.join("go/bin/go").is_file());
        assert_eq!(
            std::fs::read_to_string(dest.join("go/VERSION")).unwrap(),
            "go1.7.5"
        );
    }

    #[test]
    fn test_digest_mismatch_rejected() {
        let tmp = TempDir::new().unwrap();
        let data = tarball(&[("bin/godep", "")]);
        let entry = file_entry(&tmp, &data, "0".repeat(64));
        let dest = tmp.path().join("godep");

        let err = TarballInstaller::new().install(&entry, &dest).unwrap_err();

        assert!(err.to_string().contains("sha256 mismatch"));
        assert!(!dest.join("bin/godep").exists());
    }

    #[test]
    fn test_unsupported_scheme() {
        let entry = CatalogEntry {
            name: "glide".to_string(),
            version: "v0.12.3".to_string(),
            uri: "ftp://example.com/glide.tgz".to_string(),
            sha256: String::new(),
        };

        let err = TarballInstaller::new()
            .install(&entry, Path::new("/nonexistent"))
            .unwrap_err();
        assert!(err.to_string().contains("unsupported uri scheme"));
    }

    #[test]
    fn test_corrupt_archive() {
        let tmp = TempDir::new().unwrap();
        let err = extract_tarball(b"not gzip", tmp.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("tarball"));
    }
}
