//! HTML renderer — a standalone page with optional inline styles.

use super::{option_labels, OptionStyle, RenderOpts, Renderer};
use crate::model::{EnvDocItem, EnvScope};

const STYLE: OptionStyle = OptionStyle {
    separator_default: "comma-separated",
    separator_prefix: "separated by <code>",
    separator_suffix: "</code>",
    required: "<strong>required</strong>",
    expand: "expand",
    non_empty: "non-empty",
    from_file: "from-file",
    default_prefix: "default: <code>",
    default_suffix: "</code>",
};

const STYLES: &str = "\
body {
  font-family: sans-serif;
  max-width: 40rem;
  margin: 0 auto;
  padding: 1rem;
}
code {
  background: #eee;
  padding: 0.1rem 0.3rem;
  border-radius: 0.2rem;
}
";

#[derive(Debug)]
pub struct HtmlRenderer {
    opts: RenderOpts,
}

impl HtmlRenderer {
    pub fn new(opts: RenderOpts) -> Self {
        Self { opts }
    }

    fn render_item(&self, out: &mut String, item: &EnvDocItem) {
        let labels = option_labels(&item.opts, &STYLE, |s| escape(s))
            .map(|l| format!(" ({l})"))
            .unwrap_or_default();
        let text = if item.name.is_empty() {
            escape(&item.doc)
        } else if item.doc.is_empty() {
            format!("<code>{}</code>{labels}", escape(&item.name))
        } else {
            format!(
                "<code>{}</code>{labels} - {}",
                escape(&item.name),
                escape(&item.doc)
            )
        };
        if item.children.is_empty() {
            out.push_str(&format!("<li>{text}</li>\n"));
        } else {
            out.push_str(&format!("<li>{text}\n<ul>\n"));
            for child in &item.children {
                self.render_item(out, child);
            }
            out.push_str("</ul>\n</li>\n");
        }
    }
}

impl Renderer for HtmlRenderer {
    fn render(&self, scopes: &[EnvScope]) -> String {
        let title = escape(&self.opts.title);
        let mut out = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        out.push_str("<meta charset=\"utf-8\">\n");
        out.push_str(&format!("<title>{title}</title>\n"));
        if !self.opts.no_styles {
            out.push_str(&format!("<style>\n{STYLES}</style>\n"));
        }
        out.push_str("</head>\n<body>\n<section>\n<article>\n");
        out.push_str(&format!("<h1>{title}</h1>\n"));
        for scope in scopes {
            if !scope.name.is_empty() {
                out.push_str(&format!("<h2>{}</h2>\n", escape(&scope.name)));
            }
            if !scope.doc.is_empty() {
                out.push_str(&format!("<p>{}</p>\n", escape(&scope.doc)));
            }
            out.push_str("<ul>\n");
            for item in &scope.vars {
                self.render_item(&mut out, item);
            }
            out.push_str("</ul>\n");
        }
        out.push_str("</article>\n</section>\n</body>\n</html>\n");
        out
    }

    fn file_extension(&self) -> &'static str {
        "html"
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EnvVarOptions;

    fn scopes() -> Vec<EnvScope> {
        vec![EnvScope {
            name: "Config".into(),
            doc: String::new(),
            vars: vec![
                EnvDocItem {
                    name: "TEST_ENV3".into(),
                    doc: "Third var.".into(),
                    opts: EnvVarOptions {
                        required: true,
                        expand: true,
                        non_empty: true,
                        from_file: true,
                        ..Default::default()
                    },
                    children: vec![],
                },
                EnvDocItem {
                    name: String::new(),
                    doc: "Group".into(),
                    opts: EnvVarOptions::default(),
                    children: vec![EnvDocItem {
                        name: "NESTED".into(),
                        doc: "Nested var.".into(),
                        ..Default::default()
                    }],
                },
            ],
        }]
    }

    #[test]
    fn page_structure() {
        let out = HtmlRenderer::new(RenderOpts::default()).render(&scopes());
        assert!(out.starts_with("<!DOCTYPE html>\n<html lang=\"en\">\n"));
        assert!(out.contains("<meta charset=\"utf-8\">"));
        assert!(out.contains("<title>Environment Variables</title>"));
        assert!(out.contains("<style>"));
        assert!(out.contains("<h1>Environment Variables</h1>"));
        assert!(out.contains("<h2>Config</h2>"));
        assert!(out.ends_with("</article>\n</section>\n</body>\n</html>\n"));
    }

    #[test]
    fn no_styles_drops_style_block() {
        let opts = RenderOpts {
            no_styles: true,
            ..Default::default()
        };
        let out = HtmlRenderer::new(opts).render(&scopes());
        assert!(!out.contains("<style>"));
    }

    #[test]
    fn items_and_nested_lists() {
        let out = HtmlRenderer::new(RenderOpts::default()).render(&scopes());
        assert!(out.contains(
            "<li><code>TEST_ENV3</code> (<strong>required</strong>, expand, non-empty, from-file) - Third var.</li>"
        ));
        assert!(out.contains("<li>Group\n<ul>\n<li><code>NESTED</code> - Nested var.</li>\n</ul>\n</li>"));
    }

    #[test]
    fn doc_text_is_escaped() {
        let scopes = vec![EnvScope {
            name: String::new(),
            doc: String::new(),
            vars: vec![EnvDocItem {
                name: "X".into(),
                doc: "a <b> & \"c\"".into(),
                ..Default::default()
            }],
        }];
        let out = HtmlRenderer::new(RenderOpts::default()).render(&scopes);
        assert!(out.contains("a &lt;b&gt; &amp; &quot;c&quot;"));
    }
}
