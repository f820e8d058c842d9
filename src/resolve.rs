//! Cross-reference type resolution — `(package, name)` index over every
//! collected type, import-alias aware.
//!
//! The index is built once after collection and is read-only afterwards; a
//! failed lookup is `None`, never an error. Callers decide whether a miss
//! matters.

use crate::model::{FieldTypeRef, FileSpec, TypeSpec};
use std::collections::HashMap;

pub struct TypeResolver<'a> {
    types: HashMap<(String, String), &'a TypeSpec>,
}

impl<'a> TypeResolver<'a> {
    pub fn new() -> Self {
        Self {
            types: HashMap::new(),
        }
    }

    /// Index every file's types, exported or not — unexported files still
    /// provide declarations that exported types reference.
    pub fn from_files(files: &'a [FileSpec]) -> Self {
        let mut r = Self::new();
        for f in files {
            r.add_types(&f.pkg, &f.types);
        }
        r
    }

    pub fn add_types(&mut self, pkg: &str, types: &'a [TypeSpec]) {
        for t in types {
            self.types.insert((pkg.to_string(), t.name.clone()), t);
        }
    }

    /// Find the declaration behind a field's type reference. A non-empty
    /// reference package is first checked against the file's import aliases
    /// and substituted with the import's real package identity; an empty one
    /// means the current file's package.
    pub fn resolve(&self, file: &FileSpec, type_ref: &FieldTypeRef) -> Option<&'a TypeSpec> {
        let mut pkg = type_ref.pkg.as_str();
        if pkg.is_empty() {
            pkg = &file.pkg;
        } else if let Some(imp) = file.imports.iter().find(|i| i.alias == pkg) {
            pkg = imp.path_name();
        }
        self.types
            .get(&(pkg.to_string(), type_ref.name.clone()))
            .copied()
    }

    /// Debug dump of the index, one line per type.
    pub fn dump(&self) -> String {
        let mut keys: Vec<_> = self.types.iter().collect();
        keys.sort_by(|a, b| a.0.cmp(b.0));
        let mut out = String::from("Resolved types:\n");
        for ((pkg, name), t) in keys {
            out.push_str(&format!("  {pkg}.{name} (export={})\n", t.export));
        }
        out
    }
}
