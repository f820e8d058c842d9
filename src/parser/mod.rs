//! Source discovery and scanning.

pub mod golang;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// One scanned file: its path relative to the scan root plus the raw
/// declaration parse.
#[derive(Debug)]
pub struct SourceFile {
    /// Relative path, forward slashes.
    pub rel_path: String,
    /// Base file name, the unit glob patterns match against.
    pub file_name: String,
    pub parsed: golang::ParsedFile,
}

/// Recursively scan `dir` for `.go` files and parse each one. Hidden
/// directories are skipped. Files come back sorted by relative path so the
/// output is stable across platforms.
pub fn parse_dir(dir: &Path) -> Result<Vec<SourceFile>> {
    let mut paths = Vec::new();
    collect_paths(dir, &mut paths)
        .with_context(|| format!("failed to scan directory {}", dir.display()))?;
    paths.sort();

    let mut files = Vec::new();
    for path in paths {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let rel = path.strip_prefix(dir).unwrap_or(&path);
        let rel_path = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let file_name = rel
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        files.push(SourceFile {
            rel_path,
            file_name,
            parsed: golang::parse(&content),
        });
    }
    Ok(files)
}

fn collect_paths(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with('.') {
            continue;
        }
        if path.is_dir() {
            collect_paths(&path, out)?;
        } else if name.ends_with(".go") {
            out.push(path);
        }
    }
    Ok(())
}
