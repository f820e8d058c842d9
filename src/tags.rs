//! Struct tag parser — a single tokenizing pass over `key:"v1,v2"` pairs
//! into an ordered key → values multimap.
//!
//! Tag values keep both the raw quoted string and its comma-split parts:
//! flag lists (`env:"NAME,required"`) read the parts, literal values like
//! defaults read the raw string so embedded commas survive.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TagError {
    #[error("tag key {0:?} has no quoted value")]
    MissingQuote(String),
    #[error("tag key {0:?} has an unterminated value")]
    Unterminated(String),
}

#[derive(Debug, Default)]
struct TagEntry {
    key: String,
    raw: String,
    values: Vec<String>,
}

/// Parsed field tag: ordered `key:"value"` entries.
#[derive(Debug, Default)]
pub struct FieldTag {
    entries: Vec<TagEntry>,
}

impl FieldTag {
    /// Tokenize a raw tag string. Tokens without a `key:"..."` shape are
    /// skipped; a key with malformed quoting fails the whole tag.
    pub fn parse(raw: &str) -> Result<Self, TagError> {
        let mut entries = Vec::new();
        let mut it = raw.chars().peekable();

        loop {
            while matches!(it.peek(), Some(c) if c.is_whitespace()) {
                it.next();
            }
            let mut key = String::new();
            while let Some(&c) = it.peek() {
                if c == ':' || c.is_whitespace() {
                    break;
                }
                key.push(c);
                it.next();
            }
            match it.peek() {
                Some(':') => {
                    it.next();
                }
                Some(_) => continue, // stray token, skip it
                None => break,
            }
            if it.next() != Some('"') {
                return Err(TagError::MissingQuote(key));
            }
            let mut value = String::new();
            let mut closed = false;
            while let Some(c) = it.next() {
                match c {
                    '\\' => {
                        if let Some(esc) = it.next() {
                            value.push(esc);
                        }
                    }
                    '"' => {
                        closed = true;
                        break;
                    }
                    _ => value.push(c),
                }
            }
            if !closed {
                return Err(TagError::Unterminated(key));
            }
            entries.push(TagEntry {
                key,
                values: value.split(',').map(str::to_string).collect(),
                raw: value,
            });
        }

        Ok(Self { entries })
    }

    fn entry(&self, key: &str) -> Option<&TagEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    /// First comma-split value of the key, if present and non-empty.
    pub fn get_first(&self, key: &str) -> Option<&str> {
        self.entry(key)
            .and_then(|e| e.values.first())
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// All comma-split values of the key, in order.
    pub fn get_all(&self, key: &str) -> &[String] {
        self.entry(key).map(|e| e.values.as_slice()).unwrap_or(&[])
    }

    /// The raw (unsplit) value of the key, if present and non-empty.
    pub fn get_raw(&self, key: &str) -> Option<&str> {
        self.entry(key)
            .map(|e| e.raw.as_str())
            .filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_key() {
        let tag = FieldTag::parse(r#"env:"HOST,required""#).unwrap();
        assert_eq!(tag.get_first("env"), Some("HOST"));
        assert_eq!(tag.get_all("env"), &["HOST", "required"]);
    }

    #[test]
    fn multiple_keys_keep_order() {
        let tag = FieldTag::parse(r#"env:"PASSWORD,file" envDefault:"/tmp/password" json:"pw""#)
            .unwrap();
        assert_eq!(tag.get_first("env"), Some("PASSWORD"));
        assert_eq!(tag.get_first("envDefault"), Some("/tmp/password"));
        assert_eq!(tag.get_first("json"), Some("pw"));
    }

    #[test]
    fn raw_value_keeps_commas() {
        let tag = FieldTag::parse(r#"env-default:"bar,baz""#).unwrap();
        assert_eq!(tag.get_first("env-default"), Some("bar"));
        assert_eq!(tag.get_raw("env-default"), Some("bar,baz"));
    }

    #[test]
    fn empty_value_is_absent() {
        let tag = FieldTag::parse(r#"env:"" envDefault:"x""#).unwrap();
        assert_eq!(tag.get_first("env"), None);
        assert_eq!(tag.get_raw("env"), None);
        assert_eq!(tag.get_first("envDefault"), Some("x"));
    }

    #[test]
    fn flag_only_tag() {
        let tag = FieldTag::parse(r#"env:",required""#).unwrap();
        assert_eq!(tag.get_first("env"), None);
        assert_eq!(tag.get_all("env"), &["", "required"]);
    }

    #[test]
    fn escaped_quote_in_value() {
        let tag = FieldTag::parse(r#"envDefault:"say \"hi\"""#).unwrap();
        assert_eq!(tag.get_raw("envDefault"), Some(r#"say "hi""#));
    }

    #[test]
    fn stray_token_is_skipped() {
        let tag = FieldTag::parse(r#"flag env:"FOO""#).unwrap();
        assert_eq!(tag.get_first("env"), Some("FOO"));
        assert_eq!(tag.get_first("flag"), None);
    }

    #[test]
    fn unterminated_value_errors() {
        let err = FieldTag::parse(r#"env:"BROKEN_TAG,required"#).unwrap_err();
        assert_eq!(err, TagError::Unterminated("env".into()));
    }

    #[test]
    fn missing_quote_errors() {
        let err = FieldTag::parse("env:FOO").unwrap_err();
        assert_eq!(err, TagError::MissingQuote("env".into()));
    }

    #[test]
    fn empty_tag() {
        let tag = FieldTag::parse("").unwrap();
        assert_eq!(tag.get_first("env"), None);
    }
}
