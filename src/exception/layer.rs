use crate::exception::{ArgumentsHost, ErrorEvent, ExceptionFilter};
use axum::{BoxError, http::Request, response::Response};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Tower Layer that turns service errors into client responses
///
/// The `Accept` header is captured before the inner service runs, so the
/// error is negotiated against the request that caused it. Successful
/// responses pass through untouched.
///
/// A failing filter (for example a template that cannot be rendered) is
/// returned as the service error for the host to deal with.
///
/// Because the service error is a `BoxError`, an axum `Router` cannot take
/// this layer directly (`Router::layer` needs infallible services). Wrap it in
/// `axum::error_handling::HandleErrorLayer`, or apply it around a fallible
/// inner service and hand the result to the router.
///
/// # Example
/// ```rust,ignore
/// let service = ServiceBuilder::new()
///     .layer(ErrorResponderLayer::new(responder))
///     .service(inner);
/// ```
#[derive(Clone)]
pub struct ErrorResponderLayer {
    filter: Arc<dyn ExceptionFilter>,
}

impl ErrorResponderLayer {
    pub fn new(filter: impl ExceptionFilter) -> Self {
        Self {
            filter: Arc::new(filter),
        }
    }
}

impl<S> Layer<S> for ErrorResponderLayer {
    type Service = ErrorResponderService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ErrorResponderService {
            inner,
            filter: self.filter.clone(),
        }
    }
}

#[derive(Clone)]
pub struct ErrorResponderService<S> {
    inner: S,
    filter: Arc<dyn ExceptionFilter>,
}

impl<S, B> Service<Request<B>> for ErrorResponderService<S>
where
    S: Service<Request<B>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Into<BoxError> + Send,
    B: Send + 'static,
{
    type Response = Response;
    type Error = BoxError;
    type Future = Pin<Box<dyn Future<Output = Result<Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(Into::into)
    }

    fn call(&mut self, request: Request<B>) -> Self::Future {
        let host = ArgumentsHost::from_request(&request);
        let filter = self.filter.clone();

        // The ready service is the one stored in `self`; leave a fresh clone behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            match inner.call(request).await {
                Ok(response) => Ok(response),
                Err(e) => {
                    let error: BoxError = e.into();
                    let event = ErrorEvent::from(error);
                    filter.catch(&event, &host).await.map_err(Into::into)
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ErrorResponderConfig;
    use crate::exception::ErrorResponder;
    use crate::template::{RenderError, TemplateVars};
    use axum::body::{Body, to_bytes};
    use axum::http::{StatusCode, header};
    use std::convert::Infallible;
    use tower::{ServiceBuilder, ServiceExt, service_fn};

    async fn failing(_request: Request<Body>) -> Result<Response, BoxError> {
        Err(ErrorEvent::new("Error: upstream")
            .with_message("upstream")
            .with_stack("Error: upstream\n at handler")
            .into())
    }

    async fn succeeding(_request: Request<Body>) -> Result<Response, Infallible> {
        Ok(Response::new(Body::from("hello")))
    }

    fn html_renderer() -> impl crate::template::TemplateRenderer {
        |name: String, vars: TemplateVars| async move {
            Ok::<_, RenderError>(format!("{} {}", name, serde_json::Value::Object(vars)))
        }
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let responder = ErrorResponder::new(ErrorResponderConfig::default(), html_renderer());
        let service = ServiceBuilder::new()
            .layer(ErrorResponderLayer::new(responder))
            .service(service_fn(succeeding));

        let response = service
            .oneshot(Request::new(Body::empty()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "hello");
    }

    #[tokio::test]
    async fn test_error_becomes_generic_json() {
        let responder = ErrorResponder::new(ErrorResponderConfig::default(), html_renderer());
        let service = ServiceBuilder::new()
            .layer(ErrorResponderLayer::new(responder))
            .service(service_fn(failing));

        let request = Request::builder()
            .header(header::ACCEPT, "application/json")
            .body(Body::empty())
            .unwrap();
        let response = service.oneshot(request).await.unwrap();

        assert_eq!(
            body_string(response).await,
            r#"{"succes":false,"message":"There was a server error generating the content."}"#
        );
    }

    #[tokio::test]
    async fn test_error_negotiates_html_from_request() {
        let responder = ErrorResponder::new(
            ErrorResponderConfig::default().show_stack(true),
            html_renderer(),
        );
        let service = ServiceBuilder::new()
            .layer(ErrorResponderLayer::new(responder))
            .service(service_fn(failing));

        let request = Request::builder()
            .header(header::ACCEPT, "text/html")
            .body(Body::empty())
            .unwrap();
        let response = service.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_string(response).await;
        assert!(body.starts_with("error.html "));
        assert!(body.contains(r#"Error: upstream<br /> at handler"#));
    }

    #[tokio::test]
    async fn test_handle_error_layer_makes_it_infallible() {
        use axum::error_handling::HandleErrorLayer;
        use axum::response::IntoResponse;

        let responder = ErrorResponder::builder()
            .config(ErrorResponderConfig::default())
            .build();
        let service = ServiceBuilder::new()
            .layer(HandleErrorLayer::new(|err: BoxError| async move {
                (StatusCode::SERVICE_UNAVAILABLE, err.to_string()).into_response()
            }))
            .layer(ErrorResponderLayer::new(responder))
            .service(service_fn(failing));

        let request = Request::builder()
            .header(header::ACCEPT, "text/html")
            .body(Body::empty())
            .unwrap();
        let response: Result<Response, Infallible> = service.oneshot(request).await;
        let response = response.unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(body_string(response).await.contains("error.html"));
    }

    #[tokio::test]
    async fn test_render_failure_is_service_error() {
        let responder = ErrorResponder::builder()
            .config(ErrorResponderConfig::default())
            .build();
        let service = ServiceBuilder::new()
            .layer(ErrorResponderLayer::new(responder))
            .service(service_fn(failing));

        let request = Request::builder()
            .header(header::ACCEPT, "text/html")
            .body(Body::empty())
            .unwrap();
        let err = service.oneshot(request).await.unwrap_err();

        assert!(err.to_string().contains("error.html"));
    }
}
