//! Dotenv renderer — a ready-to-edit `.env` skeleton. Nesting flattens out;
//! grouping docs become comment separators.

use super::{option_labels, OptionStyle, RenderOpts, Renderer};
use crate::model::{EnvDocItem, EnvScope};

const STYLE: OptionStyle = OptionStyle {
    separator_default: "comma-separated",
    separator_prefix: "separated by '",
    separator_suffix: "'",
    required: "required",
    expand: "expand",
    non_empty: "non-empty",
    from_file: "from-file",
    default_prefix: "default: '",
    default_suffix: "'",
};

#[derive(Debug)]
pub struct DotenvRenderer {
    opts: RenderOpts,
}

impl DotenvRenderer {
    pub fn new(opts: RenderOpts) -> Self {
        Self { opts }
    }

    fn render_item(&self, out: &mut String, item: &EnvDocItem) {
        if item.name.is_empty() {
            if !item.doc.is_empty() {
                out.push_str(&format!("# {}\n", comment_safe(&item.doc)));
            }
        } else {
            let labels = option_labels(&item.opts, &STYLE, str::to_string);
            let comment = match (item.doc.is_empty(), labels) {
                (true, None) => String::new(),
                (true, Some(l)) => format!("({l})"),
                (false, None) => comment_safe(&item.doc),
                (false, Some(l)) => format!("{} ({l})", comment_safe(&item.doc)),
            };
            if comment.is_empty() {
                out.push_str(&format!("{}=\n", item.name));
            } else {
                out.push_str(&format!(
                    "# {comment}\n{}={}\n",
                    item.name, item.opts.default
                ));
            }
        }
        for child in &item.children {
            self.render_item(out, child);
        }
    }
}

impl Renderer for DotenvRenderer {
    fn render(&self, scopes: &[EnvScope]) -> String {
        let mut out = format!("# {}\n", self.opts.title);
        for scope in scopes {
            out.push('\n');
            if !scope.name.is_empty() {
                out.push_str(&format!("## {}\n", scope.name));
            }
            if !scope.doc.is_empty() {
                out.push_str(&format!("# {}\n", comment_safe(&scope.doc)));
            }
            for item in &scope.vars {
                self.render_item(&mut out, item);
            }
        }
        out
    }

    fn file_extension(&self) -> &'static str {
        "env"
    }
}

/// Multi-line docs must stay inside the comment.
fn comment_safe(doc: &str) -> String {
    doc.replace('\n', "\n# ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EnvVarOptions;

    #[test]
    fn variables_become_assignments() {
        let scopes = vec![EnvScope {
            name: "Config".into(),
            doc: String::new(),
            vars: vec![
                EnvDocItem {
                    name: "HOST".into(),
                    doc: "Server host.".into(),
                    opts: EnvVarOptions {
                        required: true,
                        ..Default::default()
                    },
                    children: vec![],
                },
                EnvDocItem {
                    name: "PORT".into(),
                    doc: "Server port.".into(),
                    opts: EnvVarOptions {
                        default: "8080".into(),
                        ..Default::default()
                    },
                    children: vec![],
                },
            ],
        }];
        let out = DotenvRenderer::new(RenderOpts::default()).render(&scopes);
        assert!(out.starts_with("# Environment Variables\n"));
        assert!(out.contains("## Config\n"));
        assert!(out.contains("# Server host. (required)\nHOST=\n"));
        assert!(out.contains("# Server port. (default: '8080')\nPORT=8080\n"));
    }

    #[test]
    fn undocumented_variable_with_options_keeps_comment_tight() {
        let scopes = vec![EnvScope {
            name: String::new(),
            doc: String::new(),
            vars: vec![EnvDocItem {
                name: "TOKEN".into(),
                doc: String::new(),
                opts: EnvVarOptions {
                    required: true,
                    ..Default::default()
                },
                children: vec![],
            }],
        }];
        let out = DotenvRenderer::new(RenderOpts::default()).render(&scopes);
        assert!(out.contains("# (required)\nTOKEN=\n"));
        assert!(!out.contains("#  "));
    }

    #[test]
    fn groups_flatten_with_comment_headers() {
        let scopes = vec![EnvScope {
            name: String::new(),
            doc: String::new(),
            vars: vec![EnvDocItem {
                name: String::new(),
                doc: "Database settings.".into(),
                opts: EnvVarOptions::default(),
                children: vec![EnvDocItem {
                    name: "DB_HOST".into(),
                    doc: String::new(),
                    ..Default::default()
                }],
            }],
        }];
        let out = DotenvRenderer::new(RenderOpts::default()).render(&scopes);
        assert!(out.contains("# Database settings.\nDB_HOST=\n"));
    }
}
