//! # Project Bundler
//!
//! `project_bundler` walks a project directory and concatenates its text files
//! into a single document, each file under a header with its relative path and
//! a fenced block tagged with its language.
//!
//! Which files make it in is decided per entry by [`classify`]: ignored
//! directories are pruned before any descendant is visited, ignored extensions
//! and file names are rejected without opening the file, and the remaining
//! files are sniffed for binary content before being read in full. Everything
//! skipped lands in a [`SkipLedger`] grouped by [`SkipReason`].
//!
//! The ignore sets and language map come from a [`Preset`], chosen explicitly
//! or detected from landmark files such as `go.mod` or `Cargo.toml`.
//!
//! # Features
//!
//! - `logging` (default): emits `tracing` events for pruned directories,
//!   bundled files and read errors.
//!
//! # Example
//!
//! ```no_run
//! use project_bundler::{BundleConfigBuilder, MarkdownSink, ProjectType, SkipLedger, bundle};
//! use std::path::Path;
//!
//! let root = Path::new(".");
//! let preset = ProjectType::Auto.resolve(root);
//! let config = BundleConfigBuilder::new(preset).file_size_limit(Some(1 << 20)).build();
//!
//! let mut sink = MarkdownSink::new(std::io::stdout().lock());
//! let mut ledger = SkipLedger::new();
//! let count = bundle(root, &config, &mut sink, &mut ledger).expect("bundle failed");
//! eprintln!("{} files bundled, {} skipped", count, ledger.len());
//! ```

mod binary;
mod engine;
mod error;
mod filter;
mod language;
mod options;
pub mod output;
mod presets;
mod types;

pub use binary::{SNIFF_LEN, is_binary, looks_binary};
pub use engine::{bundle, collect_bundle};
pub use error::BundleError;
pub use filter::{Classification, Entry, classify};
pub use language::{DEFAULT_LANGUAGE, extension_of, resolve_language};
pub use options::{BinaryDetection, BundleConfig, BundleConfigBuilder, ConfigOverrides};
pub use output::{JsonLinesSink, MarkdownSink, OutputFormat, Sink, TextSink};
pub use presets::{
    BASE_LANGUAGES, FILENAME_LANGUAGES, LANDMARKS, Preset, ProjectType, detect_preset,
};
pub use types::{BundleOutcome, BundleRecord, SkipLedger, SkipReason};
