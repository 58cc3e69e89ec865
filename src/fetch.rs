//! Local cache for the storm event dataset.

use anyhow::{Result, bail};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::info;

/// Downloads `url` to `dest` unless `dest` already exists.
///
/// The body is written to a sibling temp file first and renamed into place,
/// so an interrupted download never leaves a partial dataset behind.
#[tracing::instrument(skip(dest), fields(dest = %dest.display()))]
pub fn ensure_dataset(url: &str, dest: &Path) -> Result<()> {
    if dest.exists() {
        info!("Dataset already cached, skipping download");
        return Ok(());
    }

    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let resp = reqwest::blocking::get(url)?;
    if !resp.status().is_success() {
        bail!("dataset download failed: {} returned {}", url, resp.status());
    }
    let bytes = resp.bytes()?;

    let tmp = partial_path(dest);
    std::fs::write(&tmp, &bytes)?;
    std::fs::rename(&tmp, dest)?;

    info!(bytes = bytes.len(), "Dataset downloaded");
    Ok(())
}

/// `StormData.csv.bz2` becomes `StormData.csv.bz2.part`.
fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().map(OsString::from).unwrap_or_default();
    name.push(".part");
    dest.with_file_name(name)
}
