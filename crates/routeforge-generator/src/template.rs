//! Built-in page renderer.
//!
//! Fills a single page template with the url, title and language of each page.
//! Used by the CLI when no other renderer is plugged in.

use std::{path::Path, sync::Arc};

use futures::future::BoxFuture;
use thiserror::Error;

use crate::render::{RenderContext, RenderError, Renderer};

/// Template rendering errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Missing required variable.
    #[error("missing required variable: {0}")]
    MissingVariable(String),

    /// Invalid template syntax.
    #[error("invalid template syntax: {0}")]
    InvalidSyntax(String),

    /// Template file could not be read.
    #[error("failed to read template: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for template operations.
pub type Result<T> = std::result::Result<T, TemplateError>;

/// Value of a template variable for `context`. Known names are `url`,
/// `title` and `lang`.
fn lookup<'a>(context: &'a RenderContext, name: &str) -> Option<&'a str> {
    match name {
        "url" => Some(context.url.as_str()),
        "title" => Some(context.title.as_str()),
        "lang" => Some(context.language.as_str()),
        _ => None,
    }
}

/// A page template with `{{ name }}` placeholders.
///
/// `{{ name? }}` renders as an empty string when the variable is unknown.
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
}

impl Template {
    /// Create a new template from its source.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Read a template from disk.
    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::new(std::fs::read_to_string(path)?))
    }

    /// Render the page described by `context`.
    pub fn render(&self, context: &RenderContext) -> Result<String> {
        let mut output = String::with_capacity(self.source.len());
        let mut rest = self.source.as_str();

        while let Some(open) = rest.find("{{") {
            output.push_str(&rest[..open]);
            let tail = &rest[open + 2..];
            let close = tail.find("}}").ok_or_else(|| {
                TemplateError::InvalidSyntax(format!("unclosed placeholder in '{}'", tail.trim()))
            })?;

            let name = tail[..close].trim();
            let (name, optional) = name
                .strip_suffix('?')
                .map_or((name, false), |name| (name.trim_end(), true));
            match lookup(context, name) {
                Some(value) => output.push_str(value),
                None if optional => {}
                None => return Err(TemplateError::MissingVariable(name.to_string())),
            }

            rest = &tail[close + 2..];
        }

        output.push_str(rest);
        Ok(output)
    }
}

impl Default for Template {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_TEMPLATE)
    }
}

/// [`Renderer`] backed by a single [`Template`].
#[derive(Debug, Clone, Default)]
pub struct TemplateRenderer {
    template: Arc<Template>,
}

impl TemplateRenderer {
    /// Render every page through `template`.
    #[must_use]
    pub fn new(template: Template) -> Self {
        Self {
            template: Arc::new(template),
        }
    }
}

impl Renderer for TemplateRenderer {
    fn render_to_string(
        &self,
        context: RenderContext,
    ) -> BoxFuture<'static, std::result::Result<Option<String>, RenderError>> {
        let template = Arc::clone(&self.template);
        Box::pin(async move {
            let html = template.render(&context)?;
            Ok::<_, RenderError>(Some(html))
        })
    }
}

/// Default page template.
pub const DEFAULT_PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="{{ lang }}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{ title }}</title>
</head>
<body>
    <div id="app" data-url="{{ url }}"></div>
</body>
</html>
"#;
