//! Built-in project presets and landmark-based auto-detection.
//!
//! All tables here are immutable data. A [`BundleConfig`](crate::BundleConfig)
//! is assembled from them once, before the walk starts.

use crate::error::BundleError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Language tags shared by every preset, keyed by extension (dot included).
pub const BASE_LANGUAGES: &[(&str, &str)] = &[
    (".md", "markdown"),
    (".sh", "shell"),
    (".json", "json"),
    (".yml", "yaml"),
    (".yaml", "yaml"),
    (".toml", "toml"),
    (".txt", "text"),
    (".gitignore", "text"),
    (".proto", "protobuf"),
];

/// Language tags for well-known files, keyed by exact file name.
pub const FILENAME_LANGUAGES: &[(&str, &str)] = &[
    ("Dockerfile", "dockerfile"),
    ("Makefile", "makefile"),
    ("go.mod", "go-mod"),
    ("go.sum", "text"),
    ("LICENSE", "text"),
    ("README", "markdown"),
];

/// Landmark files in detection priority order. The first one present wins.
pub const LANDMARKS: &[(&str, Preset)] = &[
    ("go.mod", Preset::Go),
    ("Cargo.toml", Preset::Rust),
    ("build.gradle", Preset::Android),
    ("build.gradle.kts", Preset::Android),
    ("Package.swift", Preset::Ios),
    ("Podfile", Preset::Ios),
];

/// A known project ecosystem with its own ignore sets and language overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Generic,
    Android,
    Go,
    Rust,
    Ios,
}

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::Generic,
        Preset::Android,
        Preset::Go,
        Preset::Rust,
        Preset::Ios,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Generic => "generic",
            Preset::Android => "android",
            Preset::Go => "go",
            Preset::Rust => "rust",
            Preset::Ios => "ios",
        }
    }

    /// Directory names pruned wherever they appear in the tree.
    pub fn ignore_dirs(self) -> &'static [&'static str] {
        match self {
            Preset::Generic => &[".git"],
            Preset::Android => &[".git", ".idea", "build", ".gradle", "gradle"],
            Preset::Go => &[".git", "vendor", "build"],
            Preset::Rust => &[".git", "target"],
            Preset::Ios => &[
                ".git",
                ".idea",
                "Pods",
                "build",
                "DerivedData",
                ".swiftpm",
                "Carthage",
            ],
        }
    }

    /// Extensions (with the dot) and exact file names that are never bundled.
    pub fn ignore_exts(self) -> &'static [&'static str] {
        match self {
            Preset::Generic => &[".DS_Store", ".log", ".lock"],
            Preset::Android => &[
                ".DS_Store",
                ".iml",
                ".jar",
                ".keystore",
                ".jks",
                ".apk",
                ".aab",
                ".so",
                ".png",
                ".jpg",
                ".jpeg",
                ".gif",
                ".webp",
            ],
            Preset::Go => &[".DS_Store", ".exe", ".so", ".a"],
            Preset::Rust => &[".DS_Store", ".rlib", ".so", ".a", ".exe"],
            Preset::Ios => &[
                ".DS_Store",
                ".mobileprovision",
                ".app",
                ".ipa",
                ".car",
                ".xcassets",
                ".storyboardc",
                ".nib",
                ".png",
                ".jpg",
                ".jpeg",
            ],
        }
    }

    /// Extension overrides layered on top of [`BASE_LANGUAGES`].
    pub fn languages(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Preset::Generic => &[],
            Preset::Android => &[
                (".java", "java"),
                (".kt", "kotlin"),
                (".kts", "kotlin"),
                (".xml", "xml"),
                (".gradle", "groovy"),
                (".pro", "text"),
            ],
            Preset::Go => &[(".go", "go")],
            Preset::Rust => &[(".rs", "rust")],
            Preset::Ios => &[
                (".swift", "swift"),
                (".m", "objectivec"),
                (".h", "objectivec"),
                (".storyboard", "xml"),
                (".xib", "xml"),
                (".plist", "xml"),
            ],
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = BundleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|preset| preset.name() == s)
            .ok_or_else(|| unknown_type(s))
    }
}

/// The project type requested by the caller: a concrete preset, or `auto`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectType {
    #[default]
    Auto,
    Preset(Preset),
}

impl ProjectType {
    /// Resolves `auto` against the landmarks under `root`, falling back to
    /// [`Preset::Generic`] when nothing matches.
    pub fn resolve(self, root: &Path) -> Preset {
        match self {
            ProjectType::Preset(preset) => preset,
            ProjectType::Auto => detect_preset(root).unwrap_or(Preset::Generic),
        }
    }

    /// Every accepted identifier, comma separated.
    pub fn available() -> String {
        std::iter::once("auto")
            .chain(Preset::ALL.iter().map(|p| p.name()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for ProjectType {
    type Err = BundleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "auto" {
            return Ok(ProjectType::Auto);
        }
        s.parse().map(ProjectType::Preset)
    }
}

fn unknown_type(name: &str) -> BundleError {
    BundleError::UnknownProjectType {
        name: name.to_string(),
        available: ProjectType::available(),
    }
}

/// Looks for landmark files directly under `root`.
///
/// Landmarks are checked in [`LANDMARKS`] order, then any `*.xcodeproj`
/// entry marks an iOS project. Returns `None` if nothing matched.
pub fn detect_preset(root: &Path) -> Option<Preset> {
    if let Some((_, preset)) = LANDMARKS
        .iter()
        .find(|(landmark, _)| root.join(landmark).exists())
    {
        return Some(*preset);
    }
    let entries = fs::read_dir(root).ok()?;
    entries
        .filter_map(Result::ok)
        .any(|entry| entry.file_name().to_string_lossy().ends_with(".xcodeproj"))
        .then_some(Preset::Ios)
}
