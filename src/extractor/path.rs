use axum::{
    async_trait,
    extract::{rejection::PathRejection, FromRequestParts, Path as AxumPath},
    http::request::Parts,
};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use std::fmt::Debug;

use crate::error::{ApiError, ErrorVerbosityProvider, InternalServerError, PathError};

use super::Extractor;

/// Extracts path parameters such as a book id or title, rejecting with an [`ApiError`].
///
/// A segment that does not parse is the client's fault (400, the offending
/// request path is echoed at full verbosity). Missing parameters mean the
/// route and the parameter type disagree, which is reported as a 500.
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + JsonSchema + Debug + Send,
    S: Send + Sync + ErrorVerbosityProvider,
{
    type Rejection = ApiError;

    #[tracing::instrument(
        name = "book_path",
        skip_all,
        fields(uri_path = %parts.uri.path(), params = std::any::type_name::<T>())
    )]
    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let verbosity = state.error_verbosity();

        match AxumPath::<T>::from_request_parts(parts, state).await {
            Ok(AxumPath(params)) => {
                tracing::trace!(?params, "Path parameters parsed");

                Ok(ApiPath(params))
            }
            Err(PathRejection::MissingPathParams(err)) => {
                Err(InternalServerError::from_generic_error(verbosity, err).into())
            }
            Err(rejection) => {
                let reason = rejection.body_text();
                tracing::warn!(%reason, "Unparsable path segment");

                Err(PathError::new(verbosity, reason)
                    .with_path(parts.uri.path())
                    .into())
            }
        }
    }
}

impl<T> Extractor for ApiPath<T> {
    type Extracted = T;

    fn extracted(&self) -> &Self::Extracted {
        &self.0
    }
}
