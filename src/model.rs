//! Data model — collected declaration IR and the flattened output tree.

use serde::Serialize;

/// Structural classification of a field's type expression.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TypeRefKind {
    #[default]
    Ident,
    Selector,
    Ptr,
    Array,
    Map,
    Struct,
}

/// Reference from a field to its (possibly remote) type declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTypeRef {
    pub name: String,
    /// Owning package or import alias; empty for inline structs.
    pub pkg: String,
    pub kind: TypeRefKind,
}

impl FieldTypeRef {
    /// True for primitive scalar types that never resolve to a declaration.
    pub fn is_builtin(&self) -> bool {
        matches!(
            self.name.as_str(),
            "string"
                | "int"
                | "int8"
                | "int16"
                | "int32"
                | "int64"
                | "uint"
                | "uint8"
                | "uint16"
                | "uint32"
                | "uint64"
                | "float32"
                | "float64"
                | "bool"
                | "byte"
                | "rune"
                | "complex64"
                | "complex128"
        )
    }
}

impl std::fmt::Display for FieldTypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TypeRefKind::Ident => write!(f, "{}", self.name),
            TypeRefKind::Selector => write!(f, "{}.{}", self.pkg, self.name),
            TypeRefKind::Ptr => write!(f, "*{}", self.name),
            TypeRefKind::Array => write!(f, "[]{}", self.name),
            TypeRefKind::Map => write!(f, "map[string]{}", self.name),
            TypeRefKind::Struct => write!(f, "struct"),
        }
    }
}

/// One scanned source file and its collected declarations.
#[derive(Debug, Default)]
pub struct FileSpec {
    /// Path relative to the scanned directory.
    pub name: String,
    /// Package identity.
    pub pkg: String,
    pub imports: Vec<ImportSpec>,
    pub types: Vec<TypeSpec>,
    /// Whether this file's exported types feed the output.
    pub export: bool,
}

/// One import declaration.
#[derive(Debug, Clone)]
pub struct ImportSpec {
    /// Explicit alias; empty when the path's last segment is used.
    pub alias: String,
    pub path: String,
}

impl ImportSpec {
    /// Package name the import binds to: the alias, or the last path segment.
    pub fn path_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// One declared record type.
#[derive(Debug, Default)]
pub struct TypeSpec {
    pub name: String,
    pub doc: String,
    pub fields: Vec<FieldSpec>,
    /// Whether this type's fields are flattened into output.
    pub export: bool,
}

/// One declared field, or a field group sharing a type and tag.
#[derive(Debug, Default)]
pub struct FieldSpec {
    /// Declared identifiers; empty for embedded fields.
    pub names: Vec<String>,
    pub doc: String,
    /// Raw annotation string, without backquotes. Possibly empty.
    pub tag: String,
    pub type_ref: FieldTypeRef,
    /// Inline fields of anonymous struct literals.
    pub fields: Vec<FieldSpec>,
}

/// Normalized per-field descriptor produced by a tag decoder.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FieldInfo {
    /// Final, fully-prefixed variable names.
    pub names: Vec<String>,
    pub required: bool,
    pub expand: bool,
    pub non_empty: bool,
    pub from_file: bool,
    pub default: String,
    pub separator: String,
}

/// Parsing options attached to one documented variable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnvVarOptions {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub expand: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub non_empty: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub from_file: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub default: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub separator: String,
}

impl EnvVarOptions {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// One documented variable, or a grouping node carrying children.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnvDocItem {
    /// Fully-prefixed variable name; empty for a pure grouping node.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub doc: String,
    #[serde(skip_serializing_if = "EnvVarOptions::is_empty")]
    pub opts: EnvVarOptions,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<EnvDocItem>,
}

/// One exported type's complete flattened documentation unit.
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct EnvScope {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub doc: String,
    pub vars: Vec<EnvDocItem>,
}
