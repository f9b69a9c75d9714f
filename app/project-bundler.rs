//! Command-line interface for project-bundler.
//!
//! Resolves a project preset, walks the source tree and writes every bundled
//! file into a single document.

use clap::{Parser, ValueEnum};
use project_bundler::output::{format_skip_report, sink_for};
use project_bundler::{
    BinaryDetection, BundleConfig, BundleConfigBuilder, BundleError, ConfigOverrides, OutputFormat,
    Preset, ProjectType, SkipLedger, bundle, detect_preset,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::exit;

/// project-bundler — concatenate a project's text files into one document
#[derive(Parser)]
#[command(name = "project-bundler", version, about, long_about = None)]
struct Cli {
    /// Source project directory
    #[arg(short, long, default_value = ".")]
    src: PathBuf,

    /// Output file, or `-` for stdout [default: bundle.<format extension>]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Project type: auto, generic, android, go, rust, ios
    #[arg(short = 't', long = "type", default_value = "auto", value_parser = parse_project_type)]
    project_type: ProjectType,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Markdown)]
    format: Format,

    /// Report all skipped files and reasons
    #[arg(long)]
    report_skipped: bool,

    /// Replace the preset's ignored directory names (can be repeated)
    #[arg(long = "ignore-dir")]
    ignore_dirs: Vec<String>,

    /// Replace the preset's ignored extensions/file names (can be repeated)
    #[arg(long = "ignore-ext")]
    ignore_exts: Vec<String>,

    /// Extra language mapping, e.g. `.vue=vue` (can be repeated)
    #[arg(long = "lang", value_parser = parse_mapping)]
    languages: Vec<(String, String)>,

    /// Extra well-known file name mapping, e.g. `Justfile=make` (can be repeated)
    #[arg(long = "filename", value_parser = parse_mapping)]
    filenames: Vec<(String, String)>,

    /// Glob patterns to skip, relative to the source root (can be repeated)
    #[arg(short = 'I', long = "ignore")]
    ignore_patterns: Vec<String>,

    /// JSON file with configuration overrides
    #[arg(long)]
    config: Option<PathBuf>,

    /// Binary detection strategy
    #[arg(long, default_value = "simple", value_parser = parse_binary_detection)]
    binary_detection: BinaryDetection,

    /// Max depth (unlimited if not set)
    #[arg(long)]
    max_depth: Option<usize>,

    /// Skip files larger than this many bytes
    #[arg(long)]
    file_size_limit: Option<u64>,

    /// Skip hidden files and directories
    #[arg(long)]
    skip_hidden: bool,

    /// Honour .gitignore files
    #[arg(long)]
    gitignore: bool,

    /// Follow symlinks
    #[arg(long)]
    follow_links: bool,

    /// Print the resolved configuration as JSON and exit
    #[arg(long)]
    print_config: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable logging
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Format {
    Markdown,
    Text,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Markdown => OutputFormat::Markdown,
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
        }
    }
}

fn parse_project_type(s: &str) -> Result<ProjectType, String> {
    s.parse().map_err(|e: BundleError| e.to_string())
}

/// Parse string into BinaryDetection enum.
fn parse_binary_detection(s: &str) -> Result<BinaryDetection, String> {
    match s {
        "simple" => Ok(BinaryDetection::Simple),
        "accurate" => Ok(BinaryDetection::Accurate),
        "none" => Ok(BinaryDetection::None),
        _ => Err(format!("invalid binary detection method: {}", s)),
    }
}

fn parse_mapping(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, tag)) if !key.is_empty() && !tag.is_empty() => {
            Ok((key.to_string(), tag.to_string()))
        }
        _ => Err(format!("expected KEY=TAG, got '{}'", s)),
    }
}

impl Cli {
    fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            let format = OutputFormat::from(self.format);
            PathBuf::from(format!("bundle.{}", format.extension()))
        })
    }

    fn resolve_config(&self, output: &Path) -> Result<BundleConfig, BundleError> {
        let preset = match self.project_type {
            ProjectType::Preset(preset) => preset,
            ProjectType::Auto => match detect_preset(&self.src) {
                Some(preset) => {
                    eprintln!("Auto-detected project type: {}", preset);
                    preset
                }
                None => {
                    eprintln!("Could not auto-detect project type, using 'generic' defaults.");
                    Preset::Generic
                }
            },
        };

        let mut builder = BundleConfigBuilder::new(preset);
        if let Some(path) = &self.config {
            builder = builder.overrides(ConfigOverrides::from_json_file(path)?);
        }
        if !self.ignore_dirs.is_empty() {
            builder = builder.ignore_dirs(self.ignore_dirs.iter().cloned());
        }
        if !self.ignore_exts.is_empty() {
            builder = builder.ignore_exts(self.ignore_exts.iter().cloned());
        }
        for (ext, tag) in &self.languages {
            builder = builder.language(ext.clone(), tag.clone());
        }
        for (name, tag) in &self.filenames {
            builder = builder.filename_language(name.clone(), tag.clone());
        }
        if output.as_os_str() != "-" {
            builder = builder.exclude_path(output);
        }
        builder = builder
            .ignore_patterns(self.ignore_patterns.clone())
            .binary_detection(self.binary_detection)
            .include_hidden(!self.skip_hidden)
            .respect_gitignore(self.gitignore)
            .follow_links(self.follow_links);
        if self.file_size_limit.is_some() {
            builder = builder.file_size_limit(self.file_size_limit);
        }
        builder = if let Some(depth) = self.max_depth {
            builder.max_depth(depth)
        } else {
            builder.no_limit_depth()
        };
        Ok(builder.build())
    }
}

#[cfg(feature = "logging")]
fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info,ignore=warn,globset=warn"),
            2 => tracing_subscriber::EnvFilter::new("debug,ignore=warn,globset=warn"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    #[cfg(feature = "logging")]
    setup_logging(cli.verbose, cli.quiet);

    let output = cli.output_path();
    let config = cli.resolve_config(&output).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        exit(1);
    });

    if cli.print_config {
        match serde_json::to_string_pretty(&config) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("JSON serialization error: {}", e);
                exit(1);
            }
        }
        return;
    }

    let to_stdout = output.as_os_str() == "-";
    let writer: Box<dyn Write> = if to_stdout {
        Box::new(BufWriter::new(io::stdout().lock()))
    } else {
        match File::create(&output) {
            Ok(file) => Box::new(BufWriter::new(file)),
            Err(e) => {
                eprintln!("Failed to create output file: {}", e);
                exit(1);
            }
        }
    };

    eprintln!(
        "Starting to bundle project from '{}' into '{}' (type: {})...",
        cli.src.display(),
        output.display(),
        config.preset
    );

    let mut sink = sink_for(cli.format.into(), writer);
    let mut ledger = SkipLedger::new();
    let count = match bundle(&cli.src, &config, sink.as_mut(), &mut ledger) {
        Ok(count) => count,
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(1);
        }
    };

    if cli.report_skipped {
        eprint!("{}", format_skip_report(&ledger));
    }

    if to_stdout {
        eprintln!("\nBundled {} files", count);
    } else {
        eprintln!(
            "\nSuccessfully bundled {} files into '{}'",
            count,
            output.display()
        );
    }
}
