use crate::Result;
use async_trait::async_trait;
use axum::http::{HeaderMap, Request, header};
use axum::response::Response;

mod event;
pub mod layer;
pub mod responder;

pub use event::ErrorEvent;
pub use layer::{ErrorResponderLayer, ErrorResponderService};
pub use responder::{ErrorResponder, ErrorResponderBuilder, Mode, Representation};

/// Request context available while handling an error
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArgumentsHost {
    accept: String,
}

impl ArgumentsHost {
    pub fn new(accept: impl Into<String>) -> Self {
        Self {
            accept: accept.into(),
        }
    }

    /// Capture the `Accept` header. Missing or non-UTF-8 values become empty.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let accept = headers
            .get(header::ACCEPT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        Self::new(accept)
    }

    pub fn from_request<B>(request: &Request<B>) -> Self {
        Self::from_headers(request.headers())
    }

    pub fn accept(&self) -> &str {
        &self.accept
    }
}

/// The ExceptionFilter trait
///
/// Filters handle errors thrown during request processing.
/// They must produce the final response; nothing runs after them.
#[async_trait]
pub trait ExceptionFilter: Send + Sync + 'static {
    /// Catch an exception and return a response
    async fn catch(&self, error: &ErrorEvent, host: &ArgumentsHost) -> Result<Response>;
}
