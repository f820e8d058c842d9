//! Field decoders — one per supported annotation convention.
//!
//! A decoder turns one `FieldSpec` into a normalized `FieldInfo` plus an
//! optional nested prefix for the field's children. Names come back fully
//! prefixed with the caller's running prefix; the nested prefix is returned
//! separately and is only ever applied by the converter, to children.

use crate::model::{FieldInfo, FieldSpec, TypeRefKind};
use crate::tags::FieldTag;
use clap::ValueEnum;

/// Annotation convention selected once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Target {
    /// Single composite tag with comma-delimited flag words:
    /// `env:"NAME,required,expand,notEmpty,file"`.
    #[default]
    Composite,
    /// One tag per option with literal values:
    /// `env:"NAME" env-required:"true" env-default:"x"`.
    Discrete,
}

/// Decoder policies shared by all conventions.
#[derive(Debug, Clone, Default)]
pub struct DecoderOpts {
    /// Primary name-tag key, `env` by default.
    pub tag_name: String,
    /// Default-value tag key, `envDefault` by default.
    pub tag_default: String,
    /// Mark fields without a default value as required.
    pub required_if_no_def: bool,
    /// Derive names from field identifiers when no tag is present.
    pub use_field_names: bool,
}

pub trait FieldDecoder {
    /// Decode one field under the given running prefix. Returns the field
    /// descriptor and the nested prefix for children, if one was declared.
    fn decode(&self, prefix: &str, field: &FieldSpec) -> (FieldInfo, Option<String>);
}

pub fn new_decoder(target: Target, opts: DecoderOpts) -> Box<dyn FieldDecoder> {
    match target {
        Target::Composite => Box::new(CompositeDecoder { opts }),
        Target::Discrete => Box::new(DiscreteDecoder { opts }),
    }
}

/// Names derived from field identifiers when no name tag is present.
/// Lower-case-initial identifiers are private and produce nothing.
fn fallback_names(field: &FieldSpec) -> Vec<String> {
    field
        .names
        .iter()
        .filter(|n| n.chars().next().is_some_and(char::is_uppercase))
        .map(|n| camel_to_snake(n))
        .collect()
}

fn apply_prefix(prefix: &str, names: Vec<String>) -> Vec<String> {
    names
        .into_iter()
        .map(|n| format!("{prefix}{n}"))
        .collect()
}

struct CompositeDecoder {
    opts: DecoderOpts,
}

impl FieldDecoder for CompositeDecoder {
    fn decode(&self, prefix: &str, field: &FieldSpec) -> (FieldInfo, Option<String>) {
        // A malformed tag is the same as no tag at all.
        let tag = FieldTag::parse(&field.tag).unwrap_or_default();
        let mut info = FieldInfo::default();

        let names = match tag.get_first(&self.opts.tag_name) {
            Some(name) => vec![name.to_string()],
            None if self.opts.use_field_names => fallback_names(field),
            None => Vec::new(),
        };
        info.names = apply_prefix(prefix, names);

        for flag in tag.get_all(&self.opts.tag_name).iter().skip(1) {
            match flag.as_str() {
                "required" => info.required = true,
                "expand" => info.expand = true,
                "notEmpty" => {
                    info.required = true;
                    info.non_empty = true;
                }
                "file" => info.from_file = true,
                _ => {}
            }
        }

        match tag.get_raw(&self.opts.tag_default) {
            Some(def) => info.default = def.to_string(),
            None if self.opts.required_if_no_def => info.required = true,
            None => {}
        }

        match tag.get_raw("envSeparator") {
            Some(sep) => info.separator = sep.to_string(),
            None if field.type_ref.kind == TypeRefKind::Array => info.separator = ",".into(),
            None => {}
        }

        let nested = tag
            .get_raw("envPrefix")
            .map(|p| format!("{prefix}{p}"));
        (info, nested)
    }
}

struct DiscreteDecoder {
    opts: DecoderOpts,
}

impl FieldDecoder for DiscreteDecoder {
    fn decode(&self, prefix: &str, field: &FieldSpec) -> (FieldInfo, Option<String>) {
        let tag = FieldTag::parse(&field.tag).unwrap_or_default();
        let mut info = FieldInfo::default();

        let names = match tag.get_raw(&self.opts.tag_name) {
            Some(name) => vec![name.to_string()],
            None if self.opts.use_field_names => fallback_names(field),
            None => Vec::new(),
        };
        info.names = apply_prefix(prefix, names);

        info.required = tag.get_raw("env-required") == Some("true");

        match tag.get_raw("env-default") {
            Some(def) => info.default = def.to_string(),
            None if self.opts.required_if_no_def => info.required = true,
            None => {}
        }

        match tag.get_raw("env-separator") {
            Some(sep) => info.separator = sep.to_string(),
            None if field.type_ref.kind == TypeRefKind::Array => info.separator = ",".into(),
            None => {}
        }

        let nested = tag
            .get_raw("env-prefix")
            .map(|p| format!("{prefix}{p}"));
        (info, nested)
    }
}

/// Convert a camel-case identifier to an upper-snake variable name.
///
/// A separator is inserted before an uppercase letter only when it is not
/// the first character, the previous character is not already a separator,
/// and the next character is lowercase — so acronym runs stay one word
/// (`HTTPServer` → `HTTP_SERVER`, not `H_T_T_P_...`).
pub fn camel_to_snake(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 5);
    for (i, &c) in chars.iter().enumerate() {
        let prev = if i > 0 { Some(chars[i - 1]) } else { None };
        let next = chars.get(i + 1);
        if c.is_uppercase()
            && prev.is_some_and(|p| p != '_')
            && next.is_some_and(|n| n.is_lowercase())
        {
            out.push('_');
        }
        out.extend(c.to_uppercase());
    }
    out
}
