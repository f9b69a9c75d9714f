//! Per-entry include/skip decisions.
//!
//! Checks run cheapest first: directory name, then extension or file name,
//! then file type and size, then the binary sniff, then the full read. A
//! later check never runs once an earlier one has decided.

use crate::binary::is_binary;
use crate::language::{extension_of, resolve_language};
use crate::options::BundleConfig;
use crate::types::SkipReason;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A filesystem entry as seen by the walker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub path: PathBuf,
    pub name: String,
    pub is_dir: bool,
}

impl Entry {
    pub fn new(path: impl Into<PathBuf>, is_dir: bool) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, name, is_dir }
    }
}

impl From<&ignore::DirEntry> for Entry {
    fn from(dent: &ignore::DirEntry) -> Self {
        Self {
            path: dent.path().to_path_buf(),
            name: dent.file_name().to_string_lossy().into_owned(),
            is_dir: dent.file_type().is_some_and(|t| t.is_dir()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// A directory the walker should enter.
    Descend,
    /// A file to bundle, with its tag and full content.
    Accepted { language: String, content: Vec<u8> },
    /// A directory whose whole subtree must be pruned.
    SkippedDirectory(SkipReason),
    SkippedFile(SkipReason),
}

/// Decides what happens to `entry` under `config`.
///
/// Directories are decided on their bare name alone, without I/O. Files may
/// be opened twice (sniff, then full read); neither handle outlives the call.
pub fn classify(entry: &Entry, config: &BundleConfig) -> Classification {
    if entry.is_dir {
        return if config.ignore_dirs.contains(entry.name.as_str()) {
            Classification::SkippedDirectory(SkipReason::IgnoredDirectory)
        } else {
            Classification::Descend
        };
    }

    let ext = extension_of(&entry.name);
    if config.ignore_exts.contains(ext) || config.ignore_exts.contains(entry.name.as_str()) {
        return Classification::SkippedFile(SkipReason::IgnoredExtension);
    }

    // Follows symlinks. Anything but a regular file (FIFO, socket, device,
    // directory behind a link) would block or fail on open.
    let meta = match fs::metadata(&entry.path) {
        Ok(meta) => meta,
        Err(e) => return read_error(&entry.path, &e),
    };
    if !meta.is_file() {
        #[cfg(feature = "logging")]
        tracing::warn!("Not a regular file: {}", entry.path.display());
        return Classification::SkippedFile(SkipReason::ReadError);
    }
    if config.file_size_limit.is_some_and(|limit| meta.len() > limit) {
        #[cfg(feature = "logging")]
        tracing::debug!(
            "File too large ({} bytes): {}",
            meta.len(),
            entry.path.display()
        );
        return Classification::SkippedFile(SkipReason::TooLarge);
    }

    match is_binary(&entry.path, config.binary_detection) {
        Ok(true) => {
            #[cfg(feature = "logging")]
            tracing::debug!("Binary file detected: {}", entry.path.display());
            return Classification::SkippedFile(SkipReason::BinaryContent);
        }
        Ok(false) => {}
        Err(e) => return read_error(&entry.path, &e),
    }

    let content = match fs::read(&entry.path) {
        Ok(content) => content,
        Err(e) => return read_error(&entry.path, &e),
    };
    let language = resolve_language(&entry.name, ext, &config.lang_map, &config.filename_map);
    Classification::Accepted {
        language: language.to_string(),
        content,
    }
}

#[cfg_attr(not(feature = "logging"), allow(unused_variables))]
fn read_error(path: &Path, err: &io::Error) -> Classification {
    #[cfg(feature = "logging")]
    tracing::warn!("Could not read file {}: {}", path.display(), err);
    Classification::SkippedFile(SkipReason::ReadError)
}
