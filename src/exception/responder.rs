use crate::common::html;
use crate::common::response::{self, DetailEnvelope, GenericEnvelope};
use crate::config::ErrorResponderConfig;
use crate::diagnostics::{Diagnostics, ErrorLog, StderrDiagnostics};
use crate::error::{ResponderError, Result};
use crate::exception::{ArgumentsHost, ErrorEvent, ExceptionFilter};
use crate::template::{NoTemplates, TemplateRenderer, TemplateVars};
use async_trait::async_trait;
use axum::http::StatusCode;
use axum::response::Response;
use serde_json::Value;
use std::sync::Arc;
use strum::Display;

const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// How the error is represented to the client
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Representation {
    Html,
    Json,
}

impl Representation {
    /// Anything mentioning `html` gets a page, everything else gets JSON
    pub fn negotiate(accept: &str) -> Self {
        if accept.contains("html") {
            Self::Html
        } else {
            Self::Json
        }
    }
}

/// How much of the error the client is shown
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    Detail,
    Generic,
}

impl Mode {
    pub fn for_config(config: &ErrorResponderConfig) -> Self {
        if config.is_detailed() {
            Self::Detail
        } else {
            Self::Generic
        }
    }
}

/// Terminal error handler
///
/// Mirrors the error to the configured diagnostics, then answers the client
/// with an HTML page or a JSON envelope depending on its `Accept` header.
/// The configuration is captured once and never changes.
///
/// # Example
/// ```rust,ignore
/// let responder = ErrorResponder::builder()
///     .config(ErrorResponderConfig::new().show_stack(cfg!(debug_assertions)))
///     .renderer(views)
///     .build();
///
/// let response = responder.handle(&ErrorEvent::new("Error: boom"), &host).await?;
/// ```
#[derive(Clone)]
pub struct ErrorResponder {
    config: Arc<ErrorResponderConfig>,
    renderer: Arc<dyn TemplateRenderer>,
    diagnostics: Arc<dyn Diagnostics>,
    error_log: Option<ErrorLog>,
}

impl ErrorResponder {
    /// Create a responder dumping to stderr
    pub fn new(config: ErrorResponderConfig, renderer: impl TemplateRenderer) -> Self {
        Self::builder().config(config).renderer(renderer).build()
    }

    pub fn builder() -> ErrorResponderBuilder {
        ErrorResponderBuilder::new()
    }

    pub fn config(&self) -> &ErrorResponderConfig {
        &self.config
    }

    /// Handle one error and produce the response sent to the client
    pub async fn handle(&self, error: &ErrorEvent, host: &ArgumentsHost) -> Result<Response> {
        self.mirror(error);

        let representation = Representation::negotiate(host.accept());
        let mode = Mode::for_config(&self.config);
        tracing::error!(
            %representation,
            %mode,
            "Handling error: {}",
            error
        );

        match (mode, representation) {
            (Mode::Detail, Representation::Html) => self.detail_page(error).await,
            (Mode::Detail, Representation::Json) => {
                response::json(&DetailEnvelope::new(error.fields_json()?))
            }
            (Mode::Generic, Representation::Html) => {
                let html = self.render(&self.config.defs).await?;
                Ok(response::with_content_type(None, HTML_CONTENT_TYPE, html)?)
            }
            (Mode::Generic, Representation::Json) => response::json(&GenericEnvelope::default()),
        }
    }

    fn mirror(&self, error: &ErrorEvent) {
        if self.config.dump_exceptions {
            if let Some(stack) = error.stack() {
                self.diagnostics.dump(stack);
            }
        }

        if let Some(log) = &self.error_log {
            log.append(error.stack().unwrap_or_else(|| error.message_or_display()));
        }
    }

    async fn detail_page(&self, error: &ErrorEvent) -> Result<Response> {
        let stack = html::escape(error.stack().unwrap_or_default());
        let message = html::escape(error.message_or_display());

        let mut vars = TemplateVars::new();
        vars.insert(
            "stack".to_string(),
            Value::String(serde_json::to_string(&stack)?),
        );
        vars.insert(
            "error".to_string(),
            Value::String(serde_json::to_string(&message)?),
        );

        let html = self.render(&vars).await?;
        Ok(response::with_content_type(
            Some(StatusCode::INTERNAL_SERVER_ERROR),
            HTML_CONTENT_TYPE,
            html,
        )?)
    }

    async fn render(&self, vars: &TemplateVars) -> Result<String> {
        let template = &self.config.template;
        self.renderer
            .render(template, vars)
            .await
            .map_err(|e| ResponderError::render(template.as_str(), e))
    }
}

#[async_trait]
impl ExceptionFilter for ErrorResponder {
    async fn catch(&self, error: &ErrorEvent, host: &ArgumentsHost) -> Result<Response> {
        self.handle(error, host).await
    }
}

/// Builder for [`ErrorResponder`]
pub struct ErrorResponderBuilder {
    config: ErrorResponderConfig,
    renderer: Option<Arc<dyn TemplateRenderer>>,
    diagnostics: Option<Arc<dyn Diagnostics>>,
}

impl Default for ErrorResponderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorResponderBuilder {
    pub fn new() -> Self {
        Self {
            config: ErrorResponderConfig::default(),
            renderer: None,
            diagnostics: None,
        }
    }

    pub fn config(mut self, config: ErrorResponderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn renderer(mut self, renderer: impl TemplateRenderer) -> Self {
        self.renderer = Some(Arc::new(renderer));
        self
    }

    /// Replace the stderr dump and log failure reporting
    pub fn diagnostics(mut self, diagnostics: impl Diagnostics) -> Self {
        self.diagnostics = Some(Arc::new(diagnostics));
        self
    }

    pub fn build(self) -> ErrorResponder {
        let diagnostics = self
            .diagnostics
            .unwrap_or_else(|| Arc::new(StderrDiagnostics));
        let error_log = self
            .config
            .log_errors
            .as_ref()
            .map(|path| ErrorLog::new(path.clone(), Arc::clone(&diagnostics)));

        ErrorResponder {
            config: Arc::new(self.config),
            renderer: self.renderer.unwrap_or_else(|| Arc::new(NoTemplates)),
            diagnostics,
            error_log,
        }
    }
}
