use std::collections::BTreeMap;

/// Tag used when neither the extension nor the file name is known.
pub const DEFAULT_LANGUAGE: &str = "text";

/// Returns the extension of `name`: everything from the last `.` on, dot
/// included, or `""` when there is no dot.
///
/// Unlike [`Path::extension`](std::path::Path::extension), a dotfile such as
/// `.gitignore` is its own extension.
pub fn extension_of(name: &str) -> &str {
    name.rfind('.').map_or("", |idx| &name[idx..])
}

/// Picks the language tag for a file.
///
/// An exact extension match wins over an exact file-name match, which wins
/// over [`DEFAULT_LANGUAGE`]. Lookups are case-sensitive.
pub fn resolve_language<'a>(
    file_name: &str,
    extension: &str,
    language_map: &'a BTreeMap<String, String>,
    filename_map: &'a BTreeMap<String, String>,
) -> &'a str {
    language_map
        .get(extension)
        .or_else(|| filename_map.get(file_name))
        .map_or(DEFAULT_LANGUAGE, String::as_str)
}
