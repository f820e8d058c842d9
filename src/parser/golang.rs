//! Go declaration scanner — line-by-line state machine.
//!
//! Extracts the declaration surface the collector needs from a `.go` file:
//! package clause, import aliases, struct type declarations with doc
//! comments, and fields with names, type references, backquoted tag strings
//! and leading or trailing comments. Function bodies and other statements
//! are ignored line-wise; a line the scanner cannot recognize is skipped,
//! never fatal.

use crate::model::{FieldSpec, FieldTypeRef, ImportSpec, TypeRefKind};
use regex::Regex;
use std::sync::LazyLock;

static RE_PACKAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^package\s+([A-Za-z_]\w*)").unwrap());

static RE_IMPORT_SINGLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^import\s+(?:([A-Za-z_.]\w*)\s+)?"([^"]+)""#).unwrap());

static RE_IMPORT_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^import\s*\(").unwrap());

static RE_IMPORT_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^(?:([A-Za-z_.]\w*)\s+)?"([^"]+)""#).unwrap());

static RE_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^//\s?(.*)$").unwrap());

static RE_TYPE_STRUCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^type\s+([A-Za-z_]\w*)\s+struct\s*\{(.*)$").unwrap());

static RE_TYPE_OTHER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^type\s+([A-Za-z_]\w*)\s+\S").unwrap());

static RE_GROUP_STRUCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z_]\w*)\s+struct\s*\{(.*)$").unwrap());

static RE_GROUP_OTHER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z_]\w*)\s+\S").unwrap());

static RE_IDENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z_]\w*$").unwrap());

static RE_ARRAY_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\[[^\]]*\]").unwrap());

/// A full-line comment with its 1-based source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentLine {
    pub line: usize,
    pub text: String,
}

/// A type declaration with its 1-based source line.
#[derive(Debug, Default)]
pub struct ParsedType {
    pub name: String,
    pub doc: String,
    pub line: usize,
    pub fields: Vec<FieldSpec>,
}

/// Raw parse result for one file, before export filtering.
#[derive(Debug, Default)]
pub struct ParsedFile {
    pub pkg: String,
    pub imports: Vec<ImportSpec>,
    pub types: Vec<ParsedType>,
    pub comments: Vec<CommentLine>,
}

/// Parse one Go source file.
pub fn parse(content: &str) -> ParsedFile {
    let lines: Vec<&str> = content.lines().collect();
    let mut out = ParsedFile::default();

    // Full-line comments with positions, for marker-directive selection.
    for (i, line) in lines.iter().enumerate() {
        if let Some(caps) = RE_COMMENT.captures(line.trim()) {
            out.comments.push(CommentLine {
                line: i + 1,
                text: caps[1].trim().to_string(),
            });
        }
    }

    let mut doc: Vec<String> = Vec::new();
    let mut in_type_group = false;
    let mut i = 0;

    while i < lines.len() {
        let decl_line = i + 1;
        let t = lines[i].trim();
        i += 1;

        if t.is_empty() {
            doc.clear();
            continue;
        }
        if let Some(caps) = RE_COMMENT.captures(t) {
            push_doc(&mut doc, &caps[1]);
            continue;
        }
        if let Some(caps) = RE_PACKAGE.captures(t) {
            out.pkg = caps[1].to_string();
            doc.clear();
            continue;
        }
        if RE_IMPORT_OPEN.is_match(t) {
            while i < lines.len() {
                let item = lines[i].trim();
                i += 1;
                if item.starts_with(')') {
                    break;
                }
                if let Some(caps) = RE_IMPORT_ITEM.captures(item) {
                    out.imports.push(import_spec(&caps));
                }
            }
            doc.clear();
            continue;
        }
        if let Some(caps) = RE_IMPORT_SINGLE.captures(t) {
            out.imports.push(import_spec(&caps));
            doc.clear();
            continue;
        }

        let struct_caps = if in_type_group {
            RE_GROUP_STRUCT.captures(t)
        } else {
            RE_TYPE_STRUCT.captures(t)
        };
        if let Some(caps) = struct_caps {
            let (fields, _) = parse_struct_body(&lines, &mut i, &caps[2]);
            out.types.push(ParsedType {
                name: caps[1].to_string(),
                doc: take_doc(&mut doc),
                line: decl_line,
                fields,
            });
            continue;
        }

        if in_type_group {
            if t.starts_with(')') {
                in_type_group = false;
                doc.clear();
                continue;
            }
            if let Some(caps) = RE_GROUP_OTHER.captures(t) {
                out.types.push(ParsedType {
                    name: caps[1].to_string(),
                    doc: take_doc(&mut doc),
                    line: decl_line,
                    fields: Vec::new(),
                });
                continue;
            }
        }
        if t == "type (" || t == "type(" {
            in_type_group = true;
            continue;
        }
        if let Some(caps) = RE_TYPE_OTHER.captures(t) {
            // Non-struct declaration (`type Date time.Time`): collected
            // field-less so references to it still resolve.
            out.types.push(ParsedType {
                name: caps[1].to_string(),
                doc: take_doc(&mut doc),
                line: decl_line,
                fields: Vec::new(),
            });
            continue;
        }

        doc.clear();
    }

    out
}

fn import_spec(caps: &regex::Captures<'_>) -> ImportSpec {
    ImportSpec {
        alias: caps
            .get(1)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default(),
        path: caps[2].to_string(),
    }
}

/// Directive comments (`go:generate` and friends) are not documentation.
fn push_doc(doc: &mut Vec<String>, text: &str) {
    if text.starts_with("go:") {
        return;
    }
    doc.push(text.trim().to_string());
}

fn take_doc(doc: &mut Vec<String>) -> String {
    let s = doc.join("\n").trim().to_string();
    doc.clear();
    s
}

/// Parse a struct body. `inline` is the text following the opening brace on
/// the declaration line (usually empty). Consumes lines up to and including
/// the matching closing brace and returns the fields plus whatever text
/// follows that brace — the field tag, when the struct was an inline
/// field type.
fn parse_struct_body(lines: &[&str], i: &mut usize, inline: &str) -> (Vec<FieldSpec>, String) {
    let inline = inline.trim();
    if let Some(rest) = inline.strip_prefix('}') {
        return (Vec::new(), rest.trim().to_string());
    }
    if !inline.is_empty() {
        // One-line body: `type T struct{ A int }`.
        if let Some(pos) = find_outside_quotes(inline, '}') {
            let mut fields = Vec::new();
            let body = inline[..pos].trim();
            if !body.is_empty() {
                if let Some(f) = parse_field(lines, i, body, &mut Vec::new()) {
                    fields.push(f);
                }
            }
            return (fields, inline[pos + 1..].trim().to_string());
        }
    }

    let mut fields = Vec::new();
    let mut doc: Vec<String> = Vec::new();

    while *i < lines.len() {
        let t = lines[*i].trim();
        *i += 1;

        if t.is_empty() {
            doc.clear();
            continue;
        }
        if let Some(caps) = RE_COMMENT.captures(t) {
            push_doc(&mut doc, &caps[1]);
            continue;
        }
        if let Some(rest) = t.strip_prefix('}') {
            return (fields, rest.trim().to_string());
        }
        if let Some(f) = parse_field(lines, i, t, &mut doc) {
            fields.push(f);
        }
    }

    (fields, String::new())
}

/// Parse one field line (or a nested struct field spanning multiple lines).
/// Returns `None` for lines that are not recognizable fields.
fn parse_field(lines: &[&str], i: &mut usize, line: &str, doc: &mut Vec<String>) -> Option<FieldSpec> {
    if let Some(f) = parse_inline_struct_field(lines, i, line, doc) {
        return Some(f);
    }

    let (code, mut tag, mut trailing) = split_field_line(line);
    let code = code.trim();

    let mut field = FieldSpec::default();

    if let Some(head) = code.strip_suffix('{').map(str::trim_end) {
        // Nested anonymous struct: `Name struct {` ... `} `tag``.
        let head = head.strip_suffix("struct")?.trim_end();
        field.names = parse_name_list(head)?;
        field.type_ref = FieldTypeRef {
            kind: TypeRefKind::Struct,
            ..Default::default()
        };
        let (nested, after) = parse_struct_body(lines, i, "");
        field.fields = nested;
        // The tag and comment of a nested struct field sit on its
        // closing-brace line.
        let (_, after_tag, after_comment) = split_field_line(&after);
        tag = tag.or(after_tag);
        trailing = trailing.or(after_comment);
    } else {
        let (names, type_src) = split_names_and_type(code)?;
        field.names = names;
        field.type_ref = parse_type_ref(&type_src)?;
    }

    field.tag = tag.unwrap_or_default();
    field.doc = if doc.is_empty() {
        trailing.unwrap_or_default()
    } else {
        take_doc(doc)
    };
    doc.clear();
    Some(field)
}

/// One-line inline struct fields: `Name struct{ X int; Y int } `tag``.
/// Works on the raw line so inner field tags keep their backquotes. The
/// opening line of a multi-line struct has no closing brace and falls
/// through to the regular path.
fn parse_inline_struct_field(
    lines: &[&str],
    i: &mut usize,
    line: &str,
    doc: &mut Vec<String>,
) -> Option<FieldSpec> {
    let open = find_outside_quotes(line, '{')?;
    let head = line[..open].trim_end().strip_suffix("struct")?.trim_end();
    let close = rfind_outside_quotes(line, '}')?;
    if close < open {
        return None;
    }
    let names = parse_name_list(head)?;

    let mut fields = Vec::new();
    for part in split_outside_quotes(&line[open + 1..close], ';') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if let Some(f) = parse_field(lines, i, part, &mut Vec::new()) {
            fields.push(f);
        }
    }

    let (_, tag, trailing) = split_field_line(&line[close + 1..]);
    let field_doc = if doc.is_empty() {
        trailing.unwrap_or_default()
    } else {
        take_doc(doc)
    };
    Some(FieldSpec {
        names,
        doc: field_doc,
        tag: tag.unwrap_or_default(),
        type_ref: FieldTypeRef {
            kind: TypeRefKind::Struct,
            ..Default::default()
        },
        fields,
    })
}

/// Split a field line into code, backquoted tag, and trailing comment,
/// in one pass that respects string and backquote regions.
fn split_field_line(line: &str) -> (String, Option<String>, Option<String>) {
    let chars: Vec<char> = line.chars().collect();
    let mut code = String::new();
    let mut tag: Option<String> = None;
    let mut comment: Option<String> = None;
    let mut idx = 0;

    while idx < chars.len() {
        match chars[idx] {
            '`' => {
                let mut value = String::new();
                idx += 1;
                while idx < chars.len() && chars[idx] != '`' {
                    value.push(chars[idx]);
                    idx += 1;
                }
                idx += 1; // closing backquote
                tag = Some(value);
            }
            '"' => {
                code.push('"');
                idx += 1;
                while idx < chars.len() {
                    code.push(chars[idx]);
                    if chars[idx] == '"' && chars[idx - 1] != '\\' {
                        break;
                    }
                    idx += 1;
                }
                idx += 1;
            }
            '/' if chars.get(idx + 1) == Some(&'/') => {
                let text: String = chars[idx + 2..].iter().collect();
                comment = Some(text.trim().to_string()).filter(|t| !t.is_empty());
                break;
            }
            c => {
                code.push(c);
                idx += 1;
            }
        }
    }

    (code, tag, comment)
}

fn find_outside_quotes(s: &str, needle: char) -> Option<usize> {
    let mut in_backquote = false;
    for (pos, c) in s.char_indices() {
        match c {
            '`' => in_backquote = !in_backquote,
            c if c == needle && !in_backquote => return Some(pos),
            _ => {}
        }
    }
    None
}

fn rfind_outside_quotes(s: &str, needle: char) -> Option<usize> {
    let mut found = None;
    let mut in_backquote = false;
    for (pos, c) in s.char_indices() {
        match c {
            '`' => in_backquote = !in_backquote,
            c if c == needle && !in_backquote => found = Some(pos),
            _ => {}
        }
    }
    found
}

fn split_outside_quotes(s: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_backquote = false;
    let mut start = 0;
    for (pos, c) in s.char_indices() {
        match c {
            '`' => in_backquote = !in_backquote,
            c if c == sep && !in_backquote => {
                parts.push(&s[start..pos]);
                start = pos + sep.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

/// Split `A, B Type` into names and type source. A single bare token is an
/// embedded field: no names, the token is the type.
fn split_names_and_type(code: &str) -> Option<(Vec<String>, String)> {
    let parts: Vec<&str> = code.split(',').collect();
    let (last, heads) = parts.split_last()?;
    let mut names: Vec<String> = Vec::new();
    for head in heads {
        let head = head.trim();
        if !RE_IDENT.is_match(head) {
            return None;
        }
        names.push(head.to_string());
    }

    let toks: Vec<&str> = last.split_whitespace().collect();
    match toks.as_slice() {
        [] => None,
        [single] => {
            if !names.is_empty() {
                return None; // `A, B` with no type expression
            }
            Some((Vec::new(), (*single).to_string()))
        }
        [name, ty @ ..] => {
            if !RE_IDENT.is_match(name) {
                return None;
            }
            names.push((*name).to_string());
            Some((names, ty.concat()))
        }
    }
}

fn parse_name_list(src: &str) -> Option<Vec<String>> {
    let src = src.trim();
    if src.is_empty() {
        return Some(Vec::new());
    }
    let mut names = Vec::new();
    for part in src.split(',') {
        let part = part.trim();
        if !RE_IDENT.is_match(part) {
            return None;
        }
        names.push(part.to_string());
    }
    Some(names)
}

/// Classify a type expression. Unsupported shapes (functions, channels,
/// interfaces) return `None` and the field is skipped.
fn parse_type_ref(src: &str) -> Option<FieldTypeRef> {
    let s = src.trim();
    if s == "struct" || s == "struct{}" {
        return Some(FieldTypeRef {
            kind: TypeRefKind::Struct,
            ..Default::default()
        });
    }
    if s.starts_with("func") || s.starts_with("chan") || s.starts_with("interface") || s.contains('(')
    {
        return None;
    }
    if let Some(rest) = s.strip_prefix('*') {
        let mut inner = parse_type_ref(rest)?;
        inner.kind = TypeRefKind::Ptr;
        return Some(inner);
    }
    if let Some(m) = RE_ARRAY_PREFIX.find(s) {
        if m.start() == 0 {
            let mut inner = parse_type_ref(&s[m.end()..])?;
            inner.kind = TypeRefKind::Array;
            return Some(inner);
        }
    }
    if let Some(rest) = s.strip_prefix("map[") {
        let close = rest.find(']')?;
        let mut inner = parse_type_ref(&rest[close + 1..])?;
        inner.kind = TypeRefKind::Map;
        return Some(inner);
    }
    if let Some((pkg, name)) = s.split_once('.') {
        if RE_IDENT.is_match(pkg) && RE_IDENT.is_match(name) {
            return Some(FieldTypeRef {
                name: name.to_string(),
                pkg: pkg.to_string(),
                kind: TypeRefKind::Selector,
            });
        }
        return None;
    }
    if RE_IDENT.is_match(s) {
        return Some(FieldTypeRef {
            name: s.to_string(),
            pkg: String::new(),
            kind: TypeRefKind::Ident,
        });
    }
    None
}
