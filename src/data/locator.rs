use std::path::{Path, PathBuf};

use log::{debug, warn};

use super::model::SizeSpec;
use crate::config;

pub use crate::config::SAMPLES_VERSION;

/// Filename of a sample file. Placeholders: `{network}`, `{datatype}`,
/// `{size}`, `{version}`.
pub const FILE_TEMPLATE: &str = "{network}__{datatype}__{size}__{version}.parquet";

/// A sample file found on disk for some (network, datatype, version).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailableSample {
    pub size: String,
    pub bytes: u64,
    pub path: PathBuf,
}

pub fn format_filename(network: &str, datatype: &str, size: &str, version: &str) -> String {
    FILE_TEMPLATE
        .replace("{network}", network)
        .replace("{datatype}", datatype)
        .replace("{size}", size)
        .replace("{version}", version)
}

/// Resolve the sample file to read.
///
/// With [`SizeSpec::Exact`] this is pure path construction: the file is not
/// checked for existence. With [`SizeSpec::LargestAvailable`] the samples
/// directory is scanned and the biggest match (by byte size, then path) wins;
/// `None` when nothing matches.
pub fn resolve_path(
    network: &str,
    datatype: &str,
    size: &SizeSpec,
    version: Option<&str>,
    samples_dir: Option<&Path>,
) -> Option<PathBuf> {
    let version = version.unwrap_or_else(|| config::global().version());
    let samples_dir = samples_dir.unwrap_or_else(|| config::global().samples_dir());

    match size {
        SizeSpec::Exact(tag) => {
            Some(samples_dir.join(format_filename(network, datatype, tag, version)))
        }
        SizeSpec::LargestAvailable => {
            let largest = list_available(network, datatype, Some(version), Some(samples_dir))
                .into_iter()
                .max_by(|a, b| (a.bytes, &a.path).cmp(&(b.bytes, &b.path)));
            match &largest {
                Some(found) => debug!(
                    "largest {network}/{datatype} sample: {} ({} bytes)",
                    found.path.display(),
                    found.bytes
                ),
                None => debug!(
                    "no {network}/{datatype} samples under {}",
                    samples_dir.display()
                ),
            }
            largest.map(|found| found.path)
        }
    }
}

/// Every size-tag present on disk for (network, datatype, version), smallest
/// file first. An unreadable samples directory yields an empty list.
pub fn list_available(
    network: &str,
    datatype: &str,
    version: Option<&str>,
    samples_dir: Option<&Path>,
) -> Vec<AvailableSample> {
    let version = version.unwrap_or_else(|| config::global().version());
    let samples_dir = samples_dir.unwrap_or_else(|| config::global().samples_dir());

    let pattern = format_filename(network, datatype, "*", version);
    let Some((prefix, suffix)) = pattern.split_once('*') else {
        return Vec::new();
    };

    let entries = match std::fs::read_dir(samples_dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("cannot scan {}: {e}", samples_dir.display());
            return Vec::new();
        }
    };

    let mut found = Vec::new();
    for entry in entries.flatten() {
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        let Some(size) = match_size_tag(name, prefix, suffix) else {
            continue;
        };
        let path = entry.path();
        match std::fs::metadata(&path) {
            Ok(meta) if meta.is_file() => found.push(AvailableSample {
                size: size.to_string(),
                bytes: meta.len(),
                path,
            }),
            Ok(_) => {}
            Err(e) => warn!("skipping {}: {e}", path.display()),
        }
    }

    found.sort_by(|a, b| (a.bytes, &a.path).cmp(&(b.bytes, &b.path)));
    found
}

/// The part of `name` standing in for the `*` between `prefix` and `suffix`.
fn match_size_tag<'a>(name: &'a str, prefix: &str, suffix: &str) -> Option<&'a str> {
    if name.len() < prefix.len() + suffix.len() {
        return None;
    }
    name.strip_prefix(prefix)?.strip_suffix(suffix)
}
