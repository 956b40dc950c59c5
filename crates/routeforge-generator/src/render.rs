//! Renderer collaborator contract.
//!
//! The generator does not produce markup itself. It hands a
//! [`RenderContext`] to a [`Renderer`] and writes whatever string comes back.

use std::future::Future;

use futures::future::BoxFuture;
use thiserror::Error;

use crate::template::TemplateError;

/// Renderer failures. These never abort a batch.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The renderer rejected the page.
    #[error("URI {url} could not be rendered: '{reason}'")]
    Rejected { url: String, reason: String },

    /// Template interpolation failed.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),
}

impl RenderError {
    /// Create a rejection for `url`.
    pub fn rejected(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Rejected {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

/// What the renderer is asked to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    /// Concrete URI of the page.
    pub url: String,

    /// The language's default title.
    pub title: String,

    /// Language code.
    pub language: String,
}

/// Produces page content for a URI.
///
/// `Ok(None)` means the renderer had nothing for this page; the page is
/// skipped like a failure.
pub trait Renderer: Send + Sync {
    /// Render one page.
    fn render_to_string(
        &self,
        context: RenderContext,
    ) -> BoxFuture<'static, Result<Option<String>, RenderError>>;
}

impl<F, Fut> Renderer for F
where
    F: Fn(RenderContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Option<String>, RenderError>> + Send + 'static,
{
    fn render_to_string(
        &self,
        context: RenderContext,
    ) -> BoxFuture<'static, Result<Option<String>, RenderError>> {
        Box::pin(self(context))
    }
}
