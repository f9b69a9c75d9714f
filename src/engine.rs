use crate::error::BundleError;
use crate::filter::{Classification, Entry, classify};
use crate::options::BundleConfig;
use crate::output::Sink;
use crate::types::{BundleOutcome, BundleRecord, SkipLedger, SkipReason};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use std::fs;
use std::sync::{Arc, Mutex, PoisonError};

// Entries dropped inside `filter_entry`, which cannot reach the ledger
// directly. The sequential walk calls the filter from `next()`, so draining
// after each step keeps visitation order.
type Pruned = Arc<Mutex<Vec<(SkipReason, PathBuf)>>>;

struct Walker {
    inner: ignore::Walk,
    pruned: Pruned,
}

impl Walker {
    fn new(root: &Path, config: &BundleConfig) -> Result<Self, BundleError> {
        let mut builder = WalkBuilder::new(root);
        builder
            .standard_filters(false)
            .hidden(!config.include_hidden)
            .git_ignore(config.respect_gitignore)
            .git_exclude(config.respect_gitignore)
            .require_git(false)
            .max_depth(config.max_depth)
            .follow_links(config.follow_links)
            .sort_by_file_name(|a, b| a.cmp(b));

        let matcher = build_matcher(&config.ignore_patterns)?;
        let pruned: Pruned = Arc::default();
        let recorder = Arc::clone(&pruned);
        let shared = config.clone();
        let base = root.to_path_buf();
        // Missing exclusions cannot match anything and are dropped.
        let excluded: Vec<PathBuf> = config
            .exclude_paths
            .iter()
            .filter_map(|p| fs::canonicalize(p).ok())
            .collect();
        builder.filter_entry(move |dent| {
            if dent.depth() == 0 {
                return true;
            }
            let relative = dent.path().strip_prefix(&base).unwrap_or(dent.path());
            let reason = if is_excluded(dent, &excluded) {
                Some(SkipReason::Excluded)
            } else if matcher.as_ref().is_some_and(|m| m.is_match(relative)) {
                Some(SkipReason::IgnoredPattern)
            } else {
                let entry = Entry::from(dent);
                match entry.is_dir.then(|| classify(&entry, &shared)) {
                    Some(Classification::SkippedDirectory(reason)) => Some(reason),
                    _ => None,
                }
            };
            let Some(reason) = reason else {
                return true;
            };
            #[cfg(feature = "logging")]
            tracing::debug!("Pruning {} ({})", dent.path().display(), reason);
            recorder
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push((reason, dent.path().to_path_buf()));
            false
        });

        Ok(Self {
            inner: builder.build(),
            pruned,
        })
    }
}

fn drain_pruned(pruned: &Pruned, ledger: &mut SkipLedger) {
    let mut pruned = pruned.lock().unwrap_or_else(PoisonError::into_inner);
    for (reason, path) in pruned.drain(..) {
        ledger.record(reason, path);
    }
}

// Only entries sharing a file name with an exclusion pay for canonicalize.
fn is_excluded(dent: &ignore::DirEntry, excluded: &[PathBuf]) -> bool {
    let name = dent.file_name();
    if !excluded.iter().any(|p| p.file_name() == Some(name)) {
        return false;
    }
    fs::canonicalize(dent.path()).is_ok_and(|canonical| excluded.contains(&canonical))
}

fn build_matcher(patterns: &[String]) -> Result<Option<GlobSet>, BundleError> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut glob_builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| BundleError::InvalidPattern {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;
        glob_builder.add(glob);
    }
    glob_builder
        .build()
        .map(Some)
        .map_err(|e| BundleError::InvalidPattern {
            pattern: patterns.join(", "),
            message: e.to_string(),
        })
}

/// Path of `path` relative to `root`, or `path` itself if it is not under
/// `root`. A root that is itself a file yields its file name.
fn relative_path(root: &Path, path: &Path) -> PathBuf {
    match path.strip_prefix(root) {
        Ok(rel) if rel.as_os_str().is_empty() => path
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| path.to_path_buf()),
        Ok(rel) => rel.to_path_buf(),
        Err(_) => path.to_path_buf(),
    }
}

/// Walks `root` depth-first and writes every accepted file to `sink`.
///
/// Skipped entries are appended to `ledger` and never stop the walk. A
/// directory that cannot be enumerated aborts the run, as does a sink
/// write failure. On success the sink is finalized and the number of
/// records written is returned.
pub fn bundle<S: Sink + ?Sized>(
    root: &Path,
    config: &BundleConfig,
    sink: &mut S,
    ledger: &mut SkipLedger,
) -> Result<usize, BundleError> {
    #[cfg(feature = "logging")]
    tracing::debug!(
        "Starting bundle with root: {} (preset: {})",
        root.display(),
        config.preset
    );
    let Walker { inner, pruned } = Walker::new(root, config)?;
    let mut count = 0;
    for result in inner {
        drain_pruned(&pruned, ledger);
        let dent = result.map_err(|e| BundleError::Walk(e.to_string()))?;
        let entry = Entry::from(&dent);
        if dent.depth() == 0 && entry.is_dir {
            continue;
        }
        match classify(&entry, config) {
            Classification::Descend => {}
            Classification::SkippedDirectory(reason) | Classification::SkippedFile(reason) => {
                ledger.record(reason, entry.path);
            }
            Classification::Accepted { language, content } => {
                #[cfg(feature = "logging")]
                tracing::info!("Bundling file: {}", entry.path.display());
                sink.write(BundleRecord {
                    relative_path: relative_path(root, &entry.path),
                    language,
                    content,
                })
                .map_err(BundleError::Output)?;
                count += 1;
            }
        }
    }
    drain_pruned(&pruned, ledger);
    sink.finalize().map_err(BundleError::Output)?;
    #[cfg(feature = "logging")]
    tracing::debug!("Bundled {} files, skipped {}", count, ledger.len());
    Ok(count)
}

/// Runs [`bundle`] into memory and returns the records with the ledger.
pub fn collect_bundle(root: &Path, config: &BundleConfig) -> Result<BundleOutcome, BundleError> {
    let mut outcome = BundleOutcome::default();
    bundle(root, config, &mut outcome.records, &mut outcome.skipped)?;
    Ok(outcome)
}
