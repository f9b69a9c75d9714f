//! Output sinks for bundle records.
//!
//! A [`Sink`] receives each accepted file once, in visitation order, and is
//! finalized once after the walk completes. Markdown is the default format:
//! a `File: /<path>` header followed by a fenced block tagged with the
//! language.

use crate::types::{BundleRecord, SkipLedger};
use std::io::{self, Write};
use std::path::{Component, Path};

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Text,
    Json,
}

impl OutputFormat {
    /// Returns the conventional file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Text => "txt",
            OutputFormat::Json => "jsonl",
        }
    }
}

/// Destination for bundle records.
pub trait Sink {
    fn write(&mut self, record: BundleRecord) -> io::Result<()>;
    /// Flushes anything buffered. Called once, after the last record.
    fn finalize(&mut self) -> io::Result<()>;
}

/// Collects records in memory.
impl Sink for Vec<BundleRecord> {
    fn write(&mut self, record: BundleRecord) -> io::Result<()> {
        self.push(record);
        Ok(())
    }
    fn finalize(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub struct MarkdownSink<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Sink for MarkdownSink<W> {
    fn write(&mut self, record: BundleRecord) -> io::Result<()> {
        write!(
            self.writer,
            "File: /{}\n```{}\n",
            display_path(&record.relative_path),
            record.language
        )?;
        self.writer.write_all(&record.content)?;
        self.writer.write_all(b"\n```\n\n")
    }
    fn finalize(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

pub struct TextSink<W: Write> {
    writer: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Sink for TextSink<W> {
    fn write(&mut self, record: BundleRecord) -> io::Result<()> {
        writeln!(
            self.writer,
            "--- {} [{}] ---",
            display_path(&record.relative_path),
            record.language
        )?;
        self.writer.write_all(&record.content)?;
        if !record.content.ends_with(b"\n") {
            self.writer.write_all(b"\n")?;
        }
        self.writer.write_all(b"\n")
    }
    fn finalize(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// One JSON object per line: `{"relative_path", "language", "content"}`.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Sink for JsonLinesSink<W> {
    fn write(&mut self, record: BundleRecord) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, &record)?;
        self.writer.write_all(b"\n")
    }
    fn finalize(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Boxes the sink matching `format` around `writer`.
pub fn sink_for<'a, W: Write + 'a>(format: OutputFormat, writer: W) -> Box<dyn Sink + 'a> {
    match format {
        OutputFormat::Markdown => Box::new(MarkdownSink::new(writer)),
        OutputFormat::Text => Box::new(TextSink::new(writer)),
        OutputFormat::Json => Box::new(JsonLinesSink::new(writer)),
    }
}

/// Renders the skipped-files report.
pub fn format_skip_report(ledger: &SkipLedger) -> String {
    let mut out = String::from("\n--- Skipped Files Report ---\n");
    if ledger.is_empty() {
        out.push_str("No files were skipped.\n");
    } else {
        for (reason, paths) in ledger.iter() {
            out.push_str(&format!("\nReason: {}\n", reason));
            for path in paths {
                out.push_str(&format!("  - {}\n", path.display()));
            }
        }
    }
    out.push_str("--------------------------\n");
    out
}

// Headers always use `/` so bundles look the same on every platform.
fn display_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            Component::ParentDir => Some("..".into()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
