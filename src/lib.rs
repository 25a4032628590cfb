//! # error-responder
//!
//! A terminal error handler for axum/tower applications.
//!
//! When a request fails, the responder picks a representation from the
//! client's `Accept` header and answers with either an HTML error page
//! (rendered by the host's view system) or a JSON envelope. It can also mirror
//! every error to standard error and to an append-only log file.
//!
//! ## Features
//!
//! - **Content negotiation**: any `Accept` value mentioning `html` gets a page,
//!   everything else gets JSON
//! - **Detail or generic mode**: expose escaped messages and stack traces during
//!   development, a fixed message in production
//! - **Diagnostics**: stack dumps and fire-and-forget log appends with a
//!   pluggable failure observer
//! - **Tower integration**: [`ErrorResponderLayer`] catches errors from any
//!   service
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use error_responder::prelude::*;
//! use axum::body::Body;
//! use axum::http::Request;
//! use tower::ServiceBuilder;
//!
//! # async fn run() {
//! let views = |name: String, vars: TemplateVars| async move {
//!     Ok::<_, RenderError>(format!("<h1>{}</h1><pre>{:?}</pre>", name, vars))
//! };
//!
//! let responder = ErrorResponder::builder()
//!     .config(ErrorResponderConfig::from_env().dump_exceptions(true))
//!     .renderer(views)
//!     .build();
//!
//! let service = ServiceBuilder::new()
//!     .layer(ErrorResponderLayer::new(responder))
//!     .service_fn(|_req: Request<Body>| async move {
//!         Err::<Response, BoxError>("database unavailable".into())
//!     });
//! # let _ = service;
//! # }
//! ```

pub mod common;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod exception;
pub mod template;

// Re-export core types
pub use config::{ConfigService, ErrorResponderConfig};
pub use error::{ResponderError, Result};
pub use exception::{
    ArgumentsHost, ErrorEvent, ErrorResponder, ErrorResponderLayer, ExceptionFilter,
};

// Re-export commonly used types from dependencies
pub use async_trait::async_trait;
pub use axum;

/// Prelude module for convenient imports
///
/// ```
/// use error_responder::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{ConfigService, ErrorResponderConfig};
    pub use crate::diagnostics::{Diagnostics, ErrorLog, StderrDiagnostics};
    pub use crate::error::{ResponderError, Result};
    pub use crate::exception::{
        ArgumentsHost, ErrorEvent, ErrorResponder, ErrorResponderBuilder, ErrorResponderLayer,
        ExceptionFilter, Mode, Representation,
    };
    pub use crate::template::{NoTemplates, RenderError, TemplateRenderer, TemplateVars};
    pub use async_trait::async_trait;
    pub use axum::{
        BoxError,
        http::StatusCode,
        response::{IntoResponse, Response},
    };
    pub use std::sync::Arc;
}
