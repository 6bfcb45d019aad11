use axum::{
    extract::{Request, State},
    http::{header::ALLOW, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::{ApiError, ErrorVerbosityProvider, MethodNotAllowedError};

/// Middleware to map axum's `MethodNotAllowed` response to our [`ApiError`].
///
/// The `Allow` header set by the router is kept.
pub async fn method_not_allowed<S: ErrorVerbosityProvider>(
    State(state): State<S>,
    req: Request,
    next: Next,
) -> Response {
    let method = req.method().clone();
    let resp = next.run(req).await;

    if resp.status() != StatusCode::METHOD_NOT_ALLOWED {
        return resp;
    }

    tracing::debug!(%method, "Method not allowed");

    let mut err =
        ApiError::from(MethodNotAllowedError::new(state.error_verbosity())).into_response();

    if let Some(allow) = resp.headers().get(ALLOW) {
        err.headers_mut().insert(ALLOW, allow.clone());
    }

    err
}
