use project_bundler::{
    BinaryDetection, BundleConfig, BundleConfigBuilder, BundleError, BundleRecord, JsonLinesSink,
    MarkdownSink, Preset, SkipLedger, SkipReason, TextSink, bundle, collect_bundle,
    output::format_skip_report,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write(root: &Path, rel: &str, content: impl AsRef<[u8]>) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn paths(records: &[BundleRecord]) -> Vec<PathBuf> {
    records.iter().map(|r| r.relative_path.clone()).collect()
}

#[test]
fn integration_go_project() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.go", "package main\n");
    write(dir.path(), "vendor/b.go", "package b\n");
    write(dir.path(), ".git/config", "[core]\n");

    let config = BundleConfig::from_preset(Preset::Go);
    let outcome = collect_bundle(dir.path(), &config).unwrap();

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].relative_path, PathBuf::from("a.go"));
    assert_eq!(outcome.records[0].language, "go");
    assert_eq!(outcome.records[0].content, b"package main\n");

    let pruned = outcome.skipped.paths(SkipReason::IgnoredDirectory);
    assert_eq!(pruned.len(), 2);
    assert!(pruned.iter().any(|p| p.ends_with(".git")));
    assert!(pruned.iter().any(|p| p.ends_with("vendor")));
    assert_eq!(outcome.skipped.len(), 2);
}

#[test]
fn integration_pruned_tree_contributes_nothing() {
    let dir = tempdir().unwrap();
    write(dir.path(), "src/main.rs", "fn main() {}\n");
    write(dir.path(), "target/debug/app.d", "deps");
    write(dir.path(), "target/debug/build/x/out.rs", "fn x() {}\n");
    write(dir.path(), "target/blob", [0u8, 0, 0]);
    write(dir.path(), "nested/target/keep.rs", "// pruned too\n");

    let config = BundleConfig::from_preset(Preset::Rust);
    let outcome = collect_bundle(dir.path(), &config).unwrap();

    assert_eq!(paths(&outcome.records), vec![PathBuf::from("src/main.rs")]);
    for (reason, skipped) in outcome.skipped.iter() {
        assert_eq!(reason, SkipReason::IgnoredDirectory);
        for path in skipped {
            assert!(path.ends_with("target"), "unexpected {}", path.display());
        }
    }
    assert_eq!(outcome.skipped.len(), 2);
}

#[test]
fn integration_filename_and_default_tags() {
    let dir = tempdir().unwrap();
    write(dir.path(), "Dockerfile", "FROM scratch\n");
    write(dir.path(), "notes.xyz", "plain words\n");
    write(dir.path(), "README.md", "# hi\n");

    let outcome = collect_bundle(dir.path(), &BundleConfig::default()).unwrap();
    let tag = |name: &str| {
        outcome
            .records
            .iter()
            .find(|r| r.relative_path == Path::new(name))
            .map(|r| r.language.clone())
    };
    assert_eq!(tag("Dockerfile").as_deref(), Some("dockerfile"));
    assert_eq!(tag("notes.xyz").as_deref(), Some("text"));
    assert_eq!(tag("README.md").as_deref(), Some("markdown"));
    assert!(outcome.skipped.is_empty());
}

#[test]
fn integration_skip_reasons() {
    let dir = tempdir().unwrap();
    write(dir.path(), "ok.txt", "fine");
    write(dir.path(), "debug.log", "noise");
    write(dir.path(), "image.dat", [0x89u8, b'P', b'N', b'G', 0, 0]);
    write(dir.path(), "empty.txt", "");

    let outcome = collect_bundle(dir.path(), &BundleConfig::default()).unwrap();
    assert_eq!(
        paths(&outcome.records),
        vec![PathBuf::from("empty.txt"), PathBuf::from("ok.txt")]
    );
    assert!(outcome.skipped.paths(SkipReason::IgnoredExtension)[0].ends_with("debug.log"));
    assert!(outcome.skipped.paths(SkipReason::BinaryContent)[0].ends_with("image.dat"));
    assert!(outcome.skipped.paths(SkipReason::ReadError).is_empty());
}

#[cfg(unix)]
#[test]
fn integration_read_error_is_not_fatal() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", "a");
    std::os::unix::fs::symlink(dir.path().join("missing"), dir.path().join("dangling.txt"))
        .unwrap();
    write(dir.path(), "z.txt", "z");

    let outcome = collect_bundle(dir.path(), &BundleConfig::default()).unwrap();
    assert_eq!(
        paths(&outcome.records),
        vec![PathBuf::from("a.txt"), PathBuf::from("z.txt")]
    );
    let errors = outcome.skipped.paths(SkipReason::ReadError);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].ends_with("dangling.txt"));
}

#[cfg(unix)]
#[test]
fn integration_fifo_does_not_block_the_walk() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", "hi\n");
    let pipe = dir.path().join("pipe");
    let made = std::process::Command::new("mkfifo")
        .arg(&pipe)
        .status()
        .is_ok_and(|s| s.success());
    if !made {
        return;
    }

    let outcome = collect_bundle(dir.path(), &BundleConfig::default()).unwrap();
    assert_eq!(paths(&outcome.records), vec![PathBuf::from("a.txt")]);
    assert_eq!(outcome.skipped.paths(SkipReason::ReadError), [pipe]);
}

#[cfg(unix)]
#[test]
fn integration_unreadable_subdirectory_is_fatal() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", "a");
    write(dir.path(), "locked/inner.txt", "secret");
    let locked = dir.path().join("locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    if fs::read_dir(&locked).is_ok() {
        // Permission bits do not apply (running as root).
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let result = collect_bundle(dir.path(), &BundleConfig::default());
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    assert!(matches!(result, Err(BundleError::Walk(_))));
}

#[test]
fn integration_output_inside_source_root_is_excluded() {
    let dir = tempdir().unwrap();
    for i in 0..5 {
        write(dir.path(), &format!("a{:02}.txt", i), "x".repeat(1024));
    }
    write(dir.path(), "docs/bundle.md", "not the output");
    let out_path = dir.path().join("bundle.md");
    let file = fs::File::create(&out_path).unwrap();

    let config = BundleConfigBuilder::new(Preset::Generic)
        .exclude_path(&out_path)
        .build();
    let mut sink = MarkdownSink::new(std::io::BufWriter::new(file));
    let mut ledger = SkipLedger::new();
    let count = bundle(dir.path(), &config, &mut sink, &mut ledger).unwrap();
    drop(sink);

    assert_eq!(count, 6);
    let doc = fs::read_to_string(&out_path).unwrap();
    assert!(!doc.contains("File: /bundle.md\n"));
    assert!(doc.contains("File: /docs/bundle.md\n"));
    let excluded = ledger.paths(SkipReason::Excluded);
    assert_eq!(excluded.len(), 1);
    assert!(excluded[0].ends_with("bundle.md"));
    assert!(!excluded[0].ends_with("docs/bundle.md"));
}

#[test]
fn integration_missing_root_is_fatal() {
    let dir = tempdir().unwrap();
    let result = collect_bundle(&dir.path().join("does-not-exist"), &BundleConfig::default());
    assert!(matches!(result, Err(BundleError::Walk(_))));
}

#[test]
fn integration_ignore_patterns() {
    let dir = tempdir().unwrap();
    write(dir.path(), "keep.md", "keep");
    write(dir.path(), "docs/generated/api.md", "gen");
    write(dir.path(), "docs/guide.md", "guide");

    let config = BundleConfigBuilder::new(Preset::Generic)
        .ignore_patterns(vec!["docs/generated".into()])
        .build();
    let outcome = collect_bundle(dir.path(), &config).unwrap();
    assert_eq!(
        paths(&outcome.records),
        vec![PathBuf::from("docs/guide.md"), PathBuf::from("keep.md")]
    );
    let matched = outcome.skipped.paths(SkipReason::IgnoredPattern);
    assert_eq!(matched.len(), 1);
    assert!(matched[0].ends_with("generated"));
}

#[test]
fn integration_invalid_pattern() {
    let dir = tempdir().unwrap();
    let config = BundleConfigBuilder::new(Preset::Generic)
        .ignore_patterns(vec!["a[".into()])
        .build();
    assert!(matches!(
        collect_bundle(dir.path(), &config),
        Err(BundleError::InvalidPattern { .. })
    ));
}

#[test]
fn integration_hidden_and_depth() {
    let dir = tempdir().unwrap();
    write(dir.path(), ".env.example", "KEY=");
    write(dir.path(), "top.txt", "top");
    write(dir.path(), "a/b/deep.txt", "deep");

    let all = collect_bundle(dir.path(), &BundleConfig::default()).unwrap();
    assert_eq!(all.records.len(), 3);

    let config = BundleConfigBuilder::new(Preset::Generic)
        .include_hidden(false)
        .max_depth(1)
        .build();
    let trimmed = collect_bundle(dir.path(), &config).unwrap();
    assert_eq!(paths(&trimmed.records), vec![PathBuf::from("top.txt")]);
}

#[test]
fn integration_idempotent() {
    let dir = tempdir().unwrap();
    write(dir.path(), "b.rs", "b");
    write(dir.path(), "a/c.rs", "c");
    write(dir.path(), "a/a.rs", "a");

    let config = BundleConfig::from_preset(Preset::Rust);
    let first = collect_bundle(dir.path(), &config).unwrap();
    let second = collect_bundle(dir.path(), &config).unwrap();
    assert_eq!(first.records, second.records);
    assert_eq!(
        paths(&first.records),
        vec![
            PathBuf::from("a/a.rs"),
            PathBuf::from("a/c.rs"),
            PathBuf::from("b.rs")
        ]
    );
}

#[test]
fn integration_markdown_sink() {
    let dir = tempdir().unwrap();
    write(dir.path(), "main.go", "package main");
    write(dir.path(), "pkg/util.go", "package pkg\n");

    let mut sink = MarkdownSink::new(Vec::new());
    let mut ledger = SkipLedger::new();
    let count = bundle(
        dir.path(),
        &BundleConfig::from_preset(Preset::Go),
        &mut sink,
        &mut ledger,
    )
    .unwrap();
    assert_eq!(count, 2);

    let doc = String::from_utf8(sink.into_inner()).unwrap();
    assert_eq!(
        doc,
        "File: /main.go\n```go\npackage main\n```\n\n\
         File: /pkg/util.go\n```go\npackage pkg\n\n```\n\n"
    );
}

#[test]
fn integration_text_and_json_sinks() {
    let dir = tempdir().unwrap();
    write(dir.path(), "config.toml", "name = \"x\"");

    let config = BundleConfig::default();
    let mut ledger = SkipLedger::new();

    let mut text = TextSink::new(Vec::new());
    bundle(dir.path(), &config, &mut text, &mut ledger).unwrap();
    let text = String::from_utf8(text.into_inner()).unwrap();
    assert_eq!(text, "--- config.toml [toml] ---\nname = \"x\"\n\n");

    let mut json = JsonLinesSink::new(Vec::new());
    bundle(dir.path(), &config, &mut json, &mut ledger).unwrap();
    let out = String::from_utf8(json.into_inner()).unwrap();
    let value: serde_json::Value = serde_json::from_str(out.trim_end()).unwrap();
    assert_eq!(value["relative_path"], "config.toml");
    assert_eq!(value["language"], "toml");
    assert_eq!(value["content"], "name = \"x\"");
}

#[test]
fn integration_binary_detection_none_keeps_nul_files() {
    let dir = tempdir().unwrap();
    write(dir.path(), "weird.txt", b"a\0b");
    let config = BundleConfigBuilder::new(Preset::Generic)
        .binary_detection(BinaryDetection::None)
        .build();
    let outcome = collect_bundle(dir.path(), &config).unwrap();
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].content, b"a\0b");
}

#[test]
fn integration_skip_report() {
    let mut ledger = SkipLedger::new();
    assert!(format_skip_report(&ledger).contains("No files were skipped."));

    ledger.record(SkipReason::BinaryContent, "src/logo.bin");
    ledger.record(SkipReason::IgnoredDirectory, ".git");
    let report = format_skip_report(&ledger);
    assert!(report.contains("Reason: Ignored Directory\n  - .git\n"));
    assert!(report.contains("Reason: Detected Binary Content\n  - src/logo.bin\n"));
    assert!(report.find("Ignored Directory") < report.find("Detected Binary Content"));

    let json = serde_json::to_value(&ledger).unwrap();
    assert_eq!(json["binary_content"][0], "src/logo.bin");
}
