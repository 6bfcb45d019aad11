use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use derive_more::From;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ErrorVerbosity {
    /// Server returns only the appropriate status code, with an empty body and no extra headers.
    None,
    /// Server returns only the appropriate status code.
    StatusCode,
    /// Server returns only the message with the appropriate status code.
    Message,
    /// Server returns the message, the error type with cleared error content and the appropriate status code.
    Type,
    /// Server returns the message, the error type with the error content and the appropriate status code.
    Full,
}

impl ErrorVerbosity {
    pub fn should_generate_error_reason(&self) -> bool {
        matches!(self, ErrorVerbosity::Full)
    }
}

pub trait ErrorVerbosityProvider {
    fn error_verbosity(&self) -> ErrorVerbosity;
}

#[derive(Debug, Serialize)]
struct ApiErrorMessage {
    message: &'static str,
}

/// Renders an error body according to `verbosity`.
///
/// `typed` is the body used for [`ErrorVerbosity::Type`] and [`ErrorVerbosity::Full`].
fn verbose_response<T: Serialize>(
    verbosity: ErrorVerbosity,
    status_code: StatusCode,
    headers: HeaderMap,
    message: &'static str,
    typed: T,
) -> Response {
    match verbosity {
        ErrorVerbosity::None => status_code.into_response(),
        ErrorVerbosity::StatusCode => (status_code, headers).into_response(),
        ErrorVerbosity::Message => {
            (status_code, headers, Json(ApiErrorMessage { message })).into_response()
        }
        ErrorVerbosity::Type | ErrorVerbosity::Full => {
            (status_code, headers, Json(typed)).into_response()
        }
    }
}

#[derive(Debug, Serialize)]
struct ApiErrorResponse {
    #[serde(flatten)]
    error: ApiError,
    message: &'static str,
}

#[derive(Debug, From, Serialize)]
#[serde(tag = "error_type", content = "error")]
/// API error
pub enum ApiError {
    /// Internal server error
    ///
    /// This error is returned when an internal server error occurs.
    InternalServerError(InternalServerError),
    /// Query error
    ///
    /// This error is returned when the query parameters are not as expected.
    Query(QueryError),
    /// Body error
    ///
    /// This error is returned when the body is not as expected.
    Body(BodyError),
    /// Path error
    ///
    /// This error is returned when the path is not as expected.
    Path(PathError),
    /// Validation error
    ///
    /// This error is returned when the extracted data violates its constraints.
    Validation(ValidationError),
    /// Method not allowed
    ///
    /// This error is returned when the method is not allowed.
    MethodNotAllowed(MethodNotAllowedError),
    /// Not found error
    ///
    /// This error is returned when the requested route is not found.
    NotFound(NotFoundError),
}

impl ApiError {
    fn verbosity(&self) -> ErrorVerbosity {
        match self {
            ApiError::InternalServerError(err) => err.verbosity,
            ApiError::Query(err) => err.verbosity,
            ApiError::Body(err) => err.verbosity,
            ApiError::Path(err) => err.verbosity,
            ApiError::Validation(err) => err.verbosity,
            ApiError::MethodNotAllowed(err) => err.verbosity,
            ApiError::NotFound(err) => err.verbosity,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            ApiError::InternalServerError(_) => "An internal server error has occurred",
            ApiError::Query(_) => "Failed to parse query parameters",
            ApiError::Body(_) => "Failed to parse request body",
            ApiError::Path(_) => "Failed to parse path parameters",
            ApiError::Validation(_) => "Validation failed",
            ApiError::MethodNotAllowed(_) => "Method not allowed",
            ApiError::NotFound(_) => "The requested resource was not found",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Query(_) | ApiError::Body(_) | ApiError::Path(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let verbosity = self.verbosity();
        let status_code = self.status_code();
        let message = self.message();

        let response = ApiErrorResponse {
            error: self,
            message,
        };

        verbose_response(verbosity, status_code, HeaderMap::new(), message, response)
    }
}

#[derive(Debug, Serialize)]
pub struct InternalServerError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    internal_server_error: Option<String>,
}

impl InternalServerError {
    pub fn from_generic_error<E: Into<anyhow::Error>>(verbosity: ErrorVerbosity, err: E) -> Self {
        let err: anyhow::Error = err.into();
        let err = format!("{err:#}");
        tracing::error!(%err, "Internal server error");

        let internal_server_error = verbosity.should_generate_error_reason().then_some(err);

        InternalServerError {
            verbosity,
            internal_server_error,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QueryError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    query_error_reason: Option<String>,
    query_expected_schema: Option<String>,
}

impl QueryError {
    pub fn new(
        verbosity: ErrorVerbosity,
        query_error_reason: String,
        query_expected_schema: String,
    ) -> Self {
        let (query_error_reason, query_expected_schema) =
            match verbosity.should_generate_error_reason() {
                true => (Some(query_error_reason), Some(query_expected_schema)),
                false => (None, None),
            };

        QueryError {
            verbosity,
            query_error_reason,
            query_expected_schema,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BodyError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    body_error_reason: Option<String>,
    body_expected_schema: Option<String>,
}

impl BodyError {
    pub fn new(
        verbosity: ErrorVerbosity,
        body_error_reason: String,
        body_expected_schema: String,
    ) -> Self {
        let (body_error_reason, body_expected_schema) =
            match verbosity.should_generate_error_reason() {
                true => (Some(body_error_reason), Some(body_expected_schema)),
                false => (None, None),
            };

        BodyError {
            verbosity,
            body_error_reason,
            body_expected_schema,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PathError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    path_error_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
}

impl PathError {
    pub fn new(verbosity: ErrorVerbosity, path_error_reason: String) -> Self {
        let path_error_reason = verbosity
            .should_generate_error_reason()
            .then_some(path_error_reason);

        PathError {
            verbosity,
            path_error_reason,
            path: None,
        }
    }

    /// Attaches the request path that failed to parse, at full verbosity only.
    pub fn with_path(mut self, path: &str) -> Self {
        self.path = self
            .verbosity
            .should_generate_error_reason()
            .then(|| path.to_string());
        self
    }
}

/// Violations of a single field.
#[derive(Debug, Clone, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub messages: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ValidationError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    validation_errors: Option<Vec<FieldViolation>>,
}

impl ValidationError {
    pub fn from_validation_errors(
        verbosity: ErrorVerbosity,
        errors: validator::ValidationErrors,
    ) -> Self {
        let validation_errors = verbosity
            .should_generate_error_reason()
            .then(|| field_violations(&errors));

        ValidationError {
            verbosity,
            validation_errors,
        }
    }
}

/// Flattens [`validator::ValidationErrors`] into per-field messages, sorted by field name.
pub fn field_violations(errors: &validator::ValidationErrors) -> Vec<FieldViolation> {
    let mut violations: Vec<_> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| FieldViolation {
            field: field.to_string(),
            messages: errors
                .iter()
                .map(|error| match &error.message {
                    Some(message) => message.to_string(),
                    None => error.code.to_string(),
                })
                .collect(),
        })
        .collect();

    violations.sort_by(|a, b| a.field.cmp(&b.field));

    violations
}

#[derive(Debug, Serialize)]
pub struct MethodNotAllowedError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
}

impl MethodNotAllowedError {
    pub fn new(verbosity: ErrorVerbosity) -> Self {
        MethodNotAllowedError { verbosity }
    }
}

#[derive(Debug, Serialize)]
pub struct NotFoundError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
}

impl NotFoundError {
    pub fn new(verbosity: ErrorVerbosity) -> Self {
        NotFoundError { verbosity }
    }
}

/// Describes the errors a single resource can produce.
pub trait ResourceErrorProvider {
    type Context: Serialize;

    fn headers(&self) -> Option<HeaderMap>;

    fn status_code(&self) -> StatusCode;

    fn message(&self) -> &'static str;

    fn context(&self) -> Self::Context;
}

/// A resource-specific error, rendered with the same verbosity rules as [`ApiError`].
#[derive(Debug, Serialize)]
pub struct ResourceError<T, C> {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    #[serde(flatten)]
    error: T,
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<C>,
}

impl<T, C> ResourceError<T, C>
where
    T: ResourceErrorProvider<Context = C>,
{
    pub fn new(verbosity: ErrorVerbosity, error: T) -> Self {
        let message = error.message();
        let context = verbosity
            .should_generate_error_reason()
            .then(|| error.context());

        ResourceError {
            verbosity,
            error,
            message,
            context,
        }
    }
}

impl<T, C> IntoResponse for ResourceError<T, C>
where
    T: ResourceErrorProvider<Context = C> + Serialize,
    C: Serialize,
{
    fn into_response(self) -> Response {
        let status_code = self.error.status_code();
        let headers = self.error.headers().unwrap_or_default();

        verbose_response(self.verbosity, status_code, headers, self.message, self)
    }
}
