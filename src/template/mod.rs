//! View rendering seam
//!
//! The responder does not ship a template engine. The host application plugs
//! its own view system in through [`TemplateRenderer`].

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::future::Future;
use thiserror::Error;

/// Variables handed to a template
pub type TemplateVars = Map<String, Value>;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template rendering failed: {0}")]
    Failed(String),
}

impl RenderError {
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Renders a named view into an HTML document
///
/// # Example
/// ```rust,ignore
/// struct Views;
///
/// #[async_trait]
/// impl TemplateRenderer for Views {
///     async fn render(&self, name: &str, vars: &TemplateVars) -> Result<String, RenderError> {
///         my_engine::render(name, vars).map_err(|e| RenderError::failed(e.to_string()))
///     }
/// }
/// ```
#[async_trait]
pub trait TemplateRenderer: Send + Sync + 'static {
    async fn render(&self, name: &str, vars: &TemplateVars) -> Result<String, RenderError>;
}

#[async_trait]
impl<F, Fut> TemplateRenderer for F
where
    F: Fn(String, TemplateVars) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String, RenderError>> + Send + 'static,
{
    async fn render(&self, name: &str, vars: &TemplateVars) -> Result<String, RenderError> {
        (self)(name.to_string(), vars.clone()).await
    }
}

/// Renderer used when the host has no view system; every render fails
#[derive(Clone, Copy, Debug, Default)]
pub struct NoTemplates;

#[async_trait]
impl TemplateRenderer for NoTemplates {
    async fn render(&self, name: &str, _vars: &TemplateVars) -> Result<String, RenderError> {
        Err(RenderError::not_found(name))
    }
}
