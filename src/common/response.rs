use axum::{
    body::Body,
    http::{HeaderValue, Response as HttpResponse, StatusCode, header},
    response::Response,
};
use serde::Serialize;

/// Message sent to clients in generic mode
pub const GENERIC_ERROR_MESSAGE: &str = "There was a server error generating the content.";

/// JSON body sent in detail mode
///
/// `message` holds the JSON text of the error's serializable fields, so a
/// plain error is reported as the string `"{}"`.
///
/// ```
/// use error_responder::common::response::DetailEnvelope;
///
/// let body = serde_json::to_string(&DetailEnvelope::new("{}")).unwrap();
/// assert_eq!(body, r#"{"success":false,"message":"{}"}"#);
/// ```
#[derive(Debug, Serialize)]
pub struct DetailEnvelope {
    pub success: bool,
    pub message: String,
}

impl DetailEnvelope {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// JSON body sent in generic mode
///
/// The `succes` key is spelled the way existing clients expect it.
#[derive(Debug, Serialize)]
pub struct GenericEnvelope {
    pub succes: bool,
    pub message: &'static str,
}

impl Default for GenericEnvelope {
    fn default() -> Self {
        Self {
            succes: false,
            message: GENERIC_ERROR_MESSAGE,
        }
    }
}

/// Build a response with an explicit content type
///
/// `status` is `None` when the framework default should be kept.
pub fn with_content_type(
    status: Option<StatusCode>,
    content_type: &'static str,
    body: impl Into<Body>,
) -> Result<Response, axum::http::Error> {
    let mut builder = HttpResponse::builder()
        .header(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    if let Some(status) = status {
        builder = builder.status(status);
    }
    builder.body(body.into())
}

/// Serialize `value` into an `application/json` response
pub fn json<T: Serialize>(value: &T) -> crate::Result<Response> {
    let body = serde_json::to_vec(value)?;
    Ok(with_content_type(None, "application/json", body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_envelope_wire_format() {
        let body = serde_json::to_string(&GenericEnvelope::default()).unwrap();
        assert_eq!(
            body,
            r#"{"succes":false,"message":"There was a server error generating the content."}"#
        );
    }

    #[test]
    fn test_json_keeps_default_status() {
        let response = json(&DetailEnvelope::new("{}")).unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            HeaderValue::from_static("application/json")
        );
    }
}
