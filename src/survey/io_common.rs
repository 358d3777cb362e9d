use std::path::{Path, PathBuf};

use crate::survey::*;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// Reads a field delimiter from its configuration name.
pub fn parse_delimiter(s: &str) -> SurveyResult<u8> {
    match s {
        "," | "comma" | "csv" => Ok(b','),
        "\t" | "\\t" | "tab" | "tsv" => Ok(b'\t'),
        ";" | "semicolon" => Ok(b';'),
        "|" | "pipe" => Ok(b'|'),
        x if x.len() == 1 && x.is_ascii() => Ok(x.as_bytes()[0]),
        x => whatever!(
            "Cannot use delimiter {:?}: expected a single ASCII character, or one of comma, tab, semicolon, pipe",
            x
        ),
    }
}

/// The default destination of a merge: `<stem>_updated.csv` next to the
/// canonical file.
pub fn default_output_path(canonical_path: &str) -> String {
    let p = Path::new(canonical_path);
    let stem = p
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("responses");
    let name = format!("{}_updated.csv", stem);
    let out: PathBuf = match p.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    };
    out.display().to_string()
}

/// Two paths designate the same file. Falls back to a textual comparison when
/// one of them does not exist yet.
pub fn same_file(a: &str, b: &str) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(x), Ok(y)) => x == y,
        _ => Path::new(a) == Path::new(b),
    }
}
