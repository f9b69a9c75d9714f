use crate::error::BundleError;
use crate::presets::{BASE_LANGUAGES, FILENAME_LANGUAGES, Preset};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinaryDetection {
    /// A null byte in the sniffed prefix marks the file as binary.
    #[default]
    Simple,
    /// Defer to `content_inspector` on the same prefix.
    Accurate,
    None,
}

/// The resolved configuration for one bundling run.
///
/// Built once from a [`Preset`] (optionally adjusted through
/// [`BundleConfigBuilder`]) and passed by reference to the filter and the
/// walker. Nothing mutates it during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleConfig {
    pub preset: Preset,
    pub ignore_dirs: BTreeSet<String>,
    pub ignore_exts: BTreeSet<String>,
    pub lang_map: BTreeMap<String, String>,
    pub filename_map: BTreeMap<String, String>,
    pub ignore_patterns: Vec<String>,
    /// Individual files left out of the bundle, such as the bundle itself
    /// when it is written inside the source tree.
    #[serde(default)]
    pub exclude_paths: Vec<PathBuf>,
    pub respect_gitignore: bool,
    pub include_hidden: bool,
    pub follow_links: bool,
    pub max_depth: Option<usize>,
    pub file_size_limit: Option<u64>,
    pub binary_detection: BinaryDetection,
}

impl BundleConfig {
    /// The preset's ignore sets verbatim, and its language overrides merged
    /// over the base map.
    pub fn from_preset(preset: Preset) -> Self {
        let lang_map = BASE_LANGUAGES
            .iter()
            .chain(preset.languages())
            .map(|(ext, tag)| (ext.to_string(), tag.to_string()))
            .collect();
        Self {
            preset,
            ignore_dirs: to_set(preset.ignore_dirs()),
            ignore_exts: to_set(preset.ignore_exts()),
            lang_map,
            filename_map: FILENAME_LANGUAGES
                .iter()
                .map(|(name, tag)| (name.to_string(), tag.to_string()))
                .collect(),
            ignore_patterns: Vec::new(),
            exclude_paths: Vec::new(),
            respect_gitignore: false,
            include_hidden: true,
            follow_links: false,
            max_depth: None,
            file_size_limit: None,
            binary_detection: BinaryDetection::Simple,
        }
    }
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Generic)
    }
}

fn to_set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Adjustments loaded from a JSON file.
///
/// Ignore sets replace the preset's; language maps merge over it; patterns
/// are appended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverrides {
    pub ignore_dirs: Option<Vec<String>>,
    pub ignore_exts: Option<Vec<String>>,
    pub languages: BTreeMap<String, String>,
    pub filenames: BTreeMap<String, String>,
    pub ignore_patterns: Vec<String>,
    pub file_size_limit: Option<u64>,
    pub binary_detection: Option<BinaryDetection>,
}

impl ConfigOverrides {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, BundleError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| BundleError::io(path, e))?;
        serde_json::from_str(&raw).map_err(|source| BundleError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug, Default)]
pub struct BundleConfigBuilder {
    config: BundleConfig,
}

impl BundleConfigBuilder {
    pub fn new(preset: Preset) -> Self {
        Self {
            config: BundleConfig::from_preset(preset),
        }
    }
    pub fn ignore_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.ignore_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }
    pub fn ignore_exts<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.ignore_exts = exts.into_iter().map(Into::into).collect();
        self
    }
    pub fn language(mut self, ext: impl Into<String>, tag: impl Into<String>) -> Self {
        self.config.lang_map.insert(ext.into(), tag.into());
        self
    }
    pub fn filename_language(mut self, name: impl Into<String>, tag: impl Into<String>) -> Self {
        self.config.filename_map.insert(name.into(), tag.into());
        self
    }
    pub fn ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.config.ignore_patterns.extend(patterns);
        self
    }
    pub fn exclude_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.exclude_paths.push(path.into());
        self
    }
    pub fn respect_gitignore(mut self, yes: bool) -> Self {
        self.config.respect_gitignore = yes;
        self
    }
    pub fn include_hidden(mut self, yes: bool) -> Self {
        self.config.include_hidden = yes;
        self
    }
    pub fn follow_links(mut self, yes: bool) -> Self {
        self.config.follow_links = yes;
        self
    }
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = Some(depth);
        self
    }
    pub fn no_limit_depth(mut self) -> Self {
        self.config.max_depth = None;
        self
    }
    pub fn file_size_limit(mut self, limit: Option<u64>) -> Self {
        self.config.file_size_limit = limit;
        self
    }
    pub fn binary_detection(mut self, method: BinaryDetection) -> Self {
        self.config.binary_detection = method;
        self
    }
    pub fn overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(dirs) = overrides.ignore_dirs {
            self = self.ignore_dirs(dirs);
        }
        if let Some(exts) = overrides.ignore_exts {
            self = self.ignore_exts(exts);
        }
        self.config.lang_map.extend(overrides.languages);
        for (name, tag) in overrides.filenames {
            self = self.filename_language(name, tag);
        }
        self.config.ignore_patterns.extend(overrides.ignore_patterns);
        if overrides.file_size_limit.is_some() {
            self.config.file_size_limit = overrides.file_size_limit;
        }
        if let Some(method) = overrides.binary_detection {
            self.config.binary_detection = method;
        }
        self
    }
    pub fn build(self) -> BundleConfig {
        self.config
    }
}
