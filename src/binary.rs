//! Prefix sniffing for binary content.

use crate::options::BinaryDetection;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Number of leading bytes inspected.
pub const SNIFF_LEN: usize = 1024;

/// Opens `path`, reads at most [`SNIFF_LEN`] bytes and classifies them.
///
/// Content past the prefix is never looked at, so a null byte at offset 2000
/// goes unnoticed. An empty file is text. The handle is dropped before
/// returning.
pub fn is_binary(path: &Path, detection: BinaryDetection) -> io::Result<bool> {
    if detection == BinaryDetection::None {
        return Ok(false);
    }
    let file = File::open(path)?;
    let mut prefix = Vec::with_capacity(SNIFF_LEN);
    file.take(SNIFF_LEN as u64).read_to_end(&mut prefix)?;
    Ok(looks_binary(&prefix, detection))
}

/// Classifies an already-read prefix.
pub fn looks_binary(prefix: &[u8], detection: BinaryDetection) -> bool {
    match detection {
        BinaryDetection::Simple => prefix.contains(&0),
        BinaryDetection::Accurate => content_inspector::inspect(prefix).is_binary(),
        BinaryDetection::None => false,
    }
}
