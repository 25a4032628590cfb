use crate::template::RenderError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ResponderError>;

#[derive(Debug, Error)]
pub enum ResponderError {
    #[error("Failed to render template {template}: {source}")]
    Render {
        template: String,
        #[source]
        source: RenderError,
    },

    #[error("Failed to build response: {0}")]
    Response(#[from] axum::http::Error),

    #[error("Failed to serialize response body: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ResponderError {
    pub fn render(template: impl Into<String>, source: RenderError) -> Self {
        Self::Render {
            template: template.into(),
            source,
        }
    }
}

impl axum::response::IntoResponse for ResponderError {
    fn into_response(self) -> axum::response::Response {
        tracing::error!("Error responder failed: {}", self);
        (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error",
        )
            .into_response()
    }
}
