use std::{ops::Deref, sync::Arc};

use crate::{
    book::store::BookStore,
    error::{ErrorVerbosity, ErrorVerbosityProvider},
};

#[derive(Clone)]
pub struct ApiState {
    inner: Arc<ApiStateInner>,
}

impl ApiState {
    pub fn new(error_verbosity: ErrorVerbosity, store: BookStore) -> Self {
        Self {
            inner: Arc::new(ApiStateInner {
                error_verbosity,
                store,
            }),
        }
    }
}

impl Deref for ApiState {
    type Target = ApiStateInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

pub struct ApiStateInner {
    error_verbosity: ErrorVerbosity,
    store: BookStore,
}

impl ApiStateInner {
    pub fn store(&self) -> &BookStore {
        &self.store
    }
}

impl ErrorVerbosityProvider for ApiState {
    fn error_verbosity(&self) -> ErrorVerbosity {
        self.error_verbosity
    }
}
