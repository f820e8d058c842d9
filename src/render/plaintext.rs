//! Plain text renderer. Same layout as markdown, bullets instead of list
//! syntax and no emphasis.

use super::{option_labels, OptionStyle, RenderOpts, Renderer};
use crate::model::{EnvDocItem, EnvScope};

const STYLE: OptionStyle = OptionStyle {
    separator_default: "comma-separated",
    separator_prefix: "separated by `",
    separator_suffix: "`",
    required: "required",
    expand: "expand",
    non_empty: "non-empty",
    from_file: "from-file",
    default_prefix: "default: `",
    default_suffix: "`",
};

#[derive(Debug)]
pub struct PlaintextRenderer {
    opts: RenderOpts,
}

impl PlaintextRenderer {
    pub fn new(opts: RenderOpts) -> Self {
        Self { opts }
    }

    fn render_item(&self, out: &mut String, item: &EnvDocItem, depth: usize) {
        let indent = "  ".repeat(depth);
        let labels = option_labels(&item.opts, &STYLE, str::to_string)
            .map(|l| format!(" ({l})"))
            .unwrap_or_default();
        if item.name.is_empty() {
            out.push_str(&format!("{indent} * {}\n", item.doc));
        } else if item.doc.is_empty() {
            out.push_str(&format!("{indent} * `{}`{labels}\n", item.name));
        } else {
            out.push_str(&format!(
                "{indent} * `{}`{labels} - {}\n",
                item.name, item.doc
            ));
        }
        for child in &item.children {
            self.render_item(out, child, depth + 1);
        }
    }
}

impl Renderer for PlaintextRenderer {
    fn render(&self, scopes: &[EnvScope]) -> String {
        let mut out = format!("{}\n\n", self.opts.title);
        for scope in scopes {
            if !scope.name.is_empty() {
                out.push_str(&format!("## {}\n\n", scope.name));
            }
            if !scope.doc.is_empty() {
                out.push_str(&format!("{}\n\n", scope.doc));
            }
            for item in &scope.vars {
                self.render_item(&mut out, item, 0);
            }
            out.push('\n');
        }
        out
    }

    fn file_extension(&self) -> &'static str {
        "txt"
    }
}
