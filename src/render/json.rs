//! JSON renderer — the scope tree as machine-readable output.

use super::{RenderOpts, Renderer};
use crate::model::EnvScope;
use serde::Serialize;

#[derive(Debug)]
pub struct JsonRenderer {
    opts: RenderOpts,
}

impl JsonRenderer {
    pub fn new(opts: RenderOpts) -> Self {
        Self { opts }
    }
}

#[derive(Serialize)]
struct Document<'a> {
    title: &'a str,
    sections: &'a [EnvScope],
}

impl Renderer for JsonRenderer {
    fn render(&self, scopes: &[EnvScope]) -> String {
        let doc = Document {
            title: &self.opts.title,
            sections: scopes,
        };
        // The model serializes infallibly: no maps with non-string keys.
        let mut out = serde_json::to_string_pretty(&doc).unwrap_or_default();
        out.push('\n');
        out
    }

    fn file_extension(&self) -> &'static str {
        "json"
    }
}
