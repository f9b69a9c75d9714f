use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// One accepted file, ready to be written by a [`Sink`](crate::Sink).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundleRecord {
    /// Path relative to the source root, or the full path if it could not
    /// be relativized.
    pub relative_path: PathBuf,
    /// Syntax-highlighting tag for the fenced block.
    pub language: String,
    /// Raw file content. Serialized lossily as UTF-8.
    #[serde(serialize_with = "serialize_lossy")]
    pub content: Vec<u8>,
}

fn serialize_lossy<T, S>(bytes: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: AsRef<[u8]>,
    S: Serializer,
{
    serializer.serialize_str(&String::from_utf8_lossy(bytes.as_ref()))
}

/// Why an entry was left out of the bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    IgnoredDirectory,
    Excluded,
    IgnoredPattern,
    IgnoredExtension,
    TooLarge,
    BinaryContent,
    ReadError,
}

impl SkipReason {
    pub fn label(self) -> &'static str {
        match self {
            SkipReason::IgnoredDirectory => "Ignored Directory",
            SkipReason::Excluded => "Excluded Path",
            SkipReason::IgnoredPattern => "Matched Ignore Pattern",
            SkipReason::IgnoredExtension => "Ignored Extension/File",
            SkipReason::TooLarge => "File Too Large",
            SkipReason::BinaryContent => "Detected Binary Content",
            SkipReason::ReadError => "File Read Error",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Skipped paths grouped by reason, each group in visitation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SkipLedger {
    entries: BTreeMap<SkipReason, Vec<PathBuf>>,
}

impl SkipLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, reason: SkipReason, path: impl Into<PathBuf>) {
        self.entries.entry(reason).or_default().push(path.into());
    }

    /// Paths skipped for `reason`, empty if none were.
    pub fn paths(&self, reason: SkipReason) -> &[PathBuf] {
        self.entries.get(&reason).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (SkipReason, &[PathBuf])> {
        self.entries
            .iter()
            .map(|(reason, paths)| (*reason, paths.as_slice()))
    }

    /// Total number of skipped entries across all reasons.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Everything an in-memory run produces.
#[derive(Debug, Default, Serialize)]
pub struct BundleOutcome {
    /// Accepted files in visitation order.
    pub records: Vec<BundleRecord>,
    pub skipped: SkipLedger,
}
