//! Export selection — which files and types feed the output.
//!
//! Three selection modes, checked in this order per type:
//!   * a type glob exports every matching type in matching files;
//!   * a generator marker exports the single first type declared after the
//!     marker comment line in the marker file;
//!   * neither exports everything the file glob admits.

use crate::model::{FileSpec, TypeSpec};
use crate::parser::SourceFile;
use anyhow::{Context, Result};
use glob::Pattern;

/// Position of a generator directive comment: base file name plus 1-based
/// line of the comment itself.
#[derive(Debug, Clone)]
pub struct Marker {
    pub file: String,
    pub line: usize,
}

pub struct Collector {
    file_glob: Option<Pattern>,
    type_glob: Option<Pattern>,
    marker: Option<Marker>,
}

impl Collector {
    pub fn new(
        file_glob: Option<&str>,
        type_glob: Option<&str>,
        marker: Option<Marker>,
    ) -> Result<Self> {
        let file_glob = file_glob
            .map(|g| Pattern::new(unescape_glob(g)))
            .transpose()
            .context("invalid file glob pattern")?;
        let type_glob = type_glob
            .map(|g| Pattern::new(unescape_glob(g)))
            .transpose()
            .context("invalid type glob pattern")?;
        Ok(Self {
            file_glob,
            type_glob,
            marker,
        })
    }

    /// Build file specs with export flags resolved. Every scanned type is
    /// kept, exported or not, so cross-file references still resolve.
    pub fn collect(&self, files: Vec<SourceFile>) -> Vec<FileSpec> {
        files.into_iter().map(|f| self.collect_file(f)).collect()
    }

    fn collect_file(&self, file: SourceFile) -> FileSpec {
        let file_export = match &self.file_glob {
            Some(g) => g.matches(&file.file_name),
            None => true,
        };

        // Marker selection picks the first type declared after the
        // directive comment, which must actually exist at that line.
        let marker_after_line = self.marker.as_ref().and_then(|m| {
            if m.file != file.file_name {
                return None;
            }
            file.parsed
                .comments
                .iter()
                .any(|c| c.line == m.line)
                .then_some(m.line)
        });
        let mut marker_used = false;

        let mut types = Vec::new();
        for t in file.parsed.types {
            let export = file_export
                && match &self.type_glob {
                    Some(g) => g.matches(&t.name),
                    None => match marker_after_line {
                        Some(line) => {
                            let hit = !marker_used && t.line > line;
                            marker_used |= hit;
                            hit
                        }
                        None => self.marker.is_none(),
                    },
                };
            types.push(TypeSpec {
                name: t.name,
                doc: t.doc,
                fields: t.fields,
                export,
            });
        }

        let export = file_export && types.iter().any(|t| t.export);
        FileSpec {
            name: file.rel_path,
            pkg: file.parsed.pkg,
            imports: file.parsed.imports,
            types,
            export,
        }
    }
}

/// Shells and go:generate lines often hand globs over wrapped in quotes;
/// strip one matching surrounding pair.
pub fn unescape_glob(s: &str) -> &str {
    let b = s.as_bytes();
    if b.len() >= 2 {
        let (first, last) = (b[0], b[b.len() - 1]);
        if first == last && (first == b'"' || first == b'\'' || first == b'`') {
            return &s[1..s.len() - 1];
        }
    }
    s
}
