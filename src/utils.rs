//! Filesystem and path utilities shared across pipeline stages: JSON
//! read/write helpers, path normalization, and timestamp inspection.

use crate::error::{Error, Result};
use cfg_if::cfg_if;
use path_slash::PathExt;
use serde::{de::DeserializeOwned, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Reads and deserializes a JSON file.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path).map_err(|e| Error::io(e, path))?;
    serde_json::from_slice(&bytes).map_err(Into::into)
}

/// Serializes `value` as pretty-printed, two-space-indented JSON and writes
/// it to `path`, creating parent directories as needed. This is the format
/// used for every cache artifact and per-project output.
pub fn write_json_file<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    create_parent_dir_all(path)?;
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"  ");
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    fs::write(path, buf).map_err(|e| Error::io(e, path))
}

/// Appends free-form UTF-8 text to a file, separating entries with a blank
/// line, creating the file if necessary.
pub fn append_text_entry(path: &Path, text: &str) -> Result<()> {
    use std::io::Write;
    create_parent_dir_all(path)?;
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| Error::io(e, path))?;
    writeln!(file, "{text}\n").map_err(|e| Error::io(e, path))
}

pub fn create_parent_dir_all(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| Error::io(e, parent))?;
        }
    }
    Ok(())
}

/// Normalizes a path to a forward-slash-separated `String`, the convention
/// used for all relative class/asset paths so cache artifacts are portable
/// across platforms.
pub fn to_forward_slash(path: &Path) -> String {
    path.to_slash_lossy().into_owned()
}

/// Returns `path` relative to `root`, forward-slash separated. Falls back to
/// `path` unchanged if it isn't rooted under `root`.
pub fn relative_forward_slash(path: &Path, root: &Path) -> String {
    to_forward_slash(path.strip_prefix(root).unwrap_or(path))
}

/// Strips any character outside `[A-Za-z0-9$_.-]`, used for project names.
pub fn sanitize_project_name(name: &str) -> String {
    name.chars().filter(|c| c.is_ascii_alphanumeric() || "$_.-".contains(*c)).collect()
}

/// Strips any character outside `[A-Za-z0-9_-]`, replacing it with `_`, used
/// for library artifact file names.
pub fn sanitize_output_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect()
}

/// Returns `max(mtime, ctime)` of `path` in milliseconds since the Unix
/// epoch, or `0` if the metadata can't be read.
///
/// `ctime` is only available on Unix; on other platforms this falls back to
/// `mtime` alone.
pub fn max_mtime_ctime_millis(path: &Path) -> u64 {
    let Ok(metadata) = fs::metadata(path) else {
        return 0;
    };

    cfg_if! {
        if #[cfg(unix)] {
            use std::os::unix::fs::MetadataExt;
            let mtime_ms = (metadata.mtime().max(0) as u64) * 1000
                + (metadata.mtime_nsec().max(0) as u64) / 1_000_000;
            let ctime_ms = (metadata.ctime().max(0) as u64) * 1000
                + (metadata.ctime_nsec().max(0) as u64) / 1_000_000;
            mtime_ms.max(ctime_ms)
        } else {
            use std::time::UNIX_EPOCH;
            metadata
                .modified()
                .ok()
                .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        }
    }
}

/// Canonicalizes `path`, platform-agnostic (no `\\?\` prefix on Windows).
pub fn canonicalize(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    dunce::canonicalize(path).map_err(|e| Error::io(e, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_project_name() {
        assert_eq!(sanitize_project_name("My Project!"), "MyProject");
        assert_eq!(sanitize_project_name("lib-a.b_c$1"), "lib-a.b_c$1");
    }

    #[test]
    fn sanitizes_output_name() {
        assert_eq!(sanitize_output_name("My Project!"), "My_Project_");
    }

    #[test]
    fn forward_slash_roundtrip() {
        let p = Path::new("a").join("b").join("c.as");
        assert_eq!(to_forward_slash(&p), "a/b/c.as");
    }
}
