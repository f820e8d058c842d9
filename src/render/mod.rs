//! Output rendering.

pub mod dotenv;
pub mod html;
pub mod json;
pub mod markdown;
pub mod plaintext;

use crate::model::{EnvScope, EnvVarOptions};
use anyhow::{bail, Result};

/// Options shared by every output format.
#[derive(Debug, Clone)]
pub struct RenderOpts {
    pub title: String,
    pub no_styles: bool,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            title: "Environment Variables".to_string(),
            no_styles: false,
        }
    }
}

pub trait Renderer: std::fmt::Debug {
    /// Render scopes to a complete output document.
    fn render(&self, scopes: &[EnvScope]) -> String;

    /// Default file extension for this format.
    fn file_extension(&self) -> &'static str;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str, opts: RenderOpts) -> Result<Box<dyn Renderer>> {
    match format {
        "markdown" => Ok(Box::new(markdown::MarkdownRenderer::new(opts))),
        "plaintext" => Ok(Box::new(plaintext::PlaintextRenderer::new(opts))),
        "html" => Ok(Box::new(html::HtmlRenderer::new(opts))),
        "dotenv" => Ok(Box::new(dotenv::DotenvRenderer::new(opts))),
        "json" => Ok(Box::new(json::JsonRenderer::new(opts))),
        _ => bail!(
            "unknown output format: {format} (expected markdown, plaintext, html, dotenv or json)"
        ),
    }
}

/// Per-format strings for the parenthesized option list.
pub(crate) struct OptionStyle {
    pub separator_default: &'static str,
    pub separator_prefix: &'static str,
    pub separator_suffix: &'static str,
    pub required: &'static str,
    pub expand: &'static str,
    pub non_empty: &'static str,
    pub from_file: &'static str,
    pub default_prefix: &'static str,
    pub default_suffix: &'static str,
}

/// Build the option list for one variable, without parentheses. Order is
/// fixed: separator, required, expand, non-empty, from-file, default.
pub(crate) fn option_labels(
    opts: &EnvVarOptions,
    style: &OptionStyle,
    escape: impl Fn(&str) -> String,
) -> Option<String> {
    let mut labels: Vec<String> = Vec::new();
    if !opts.separator.is_empty() {
        if opts.separator == "," {
            labels.push(style.separator_default.to_string());
        } else {
            labels.push(format!(
                "{}{}{}",
                style.separator_prefix,
                escape(&opts.separator),
                style.separator_suffix
            ));
        }
    }
    if opts.required {
        labels.push(style.required.to_string());
    }
    if opts.expand {
        labels.push(style.expand.to_string());
    }
    if opts.non_empty {
        labels.push(style.non_empty.to_string());
    }
    if opts.from_file {
        labels.push(style.from_file.to_string());
    }
    if !opts.default.is_empty() {
        labels.push(format!(
            "{}{}{}",
            style.default_prefix,
            escape(&opts.default),
            style.default_suffix
        ));
    }
    if labels.is_empty() {
        None
    } else {
        Some(labels.join(", "))
    }
}
