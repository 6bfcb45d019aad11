use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::Path,
};

use anyhow::Context;
use axum::{middleware, Router};
use serde::Deserialize;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    decompression::RequestDecompressionLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};

use crate::{
    book::store::BookStore,
    error::ErrorVerbosity,
    middleware::{
        method_not_allowed::method_not_allowed, not_found::not_found,
        trace_response_body::trace_response_body,
    },
    route,
    state::ApiState,
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file `{path}`: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file `{path}`: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_socket_address")]
    socket_address: SocketAddr,
    #[serde(default = "default_error_verbosity")]
    error_verbosity: ErrorVerbosity,
    #[serde(default = "default_seed_books")]
    seed_books: bool,
    #[serde(default)]
    trace_response_body: bool,
}

fn default_socket_address() -> SocketAddr {
    SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 5000)
}

fn default_error_verbosity() -> ErrorVerbosity {
    ErrorVerbosity::Full
}

fn default_seed_books() -> bool {
    true
}

impl ServerConfig {
    pub fn new(socket_address: SocketAddr, error_verbosity: ErrorVerbosity) -> Self {
        Self {
            socket_address,
            error_verbosity,
            seed_books: default_seed_books(),
            trace_response_body: false,
        }
    }

    #[tracing::instrument]
    pub async fn from_config_file(path: &str) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(Path::new(path))
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_string(),
                source,
            })?;

        let config: ServerConfig =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_string(),
                source,
            })?;

        tracing::debug!(?config, "Loaded");

        Ok(config)
    }

    pub fn with_socket_address(mut self, socket_address: SocketAddr) -> Self {
        self.socket_address = socket_address;
        self
    }

    pub fn with_seed_books(mut self, seed_books: bool) -> Self {
        self.seed_books = seed_books;
        self
    }

    pub fn with_trace_response_body(mut self, trace_response_body: bool) -> Self {
        self.trace_response_body = trace_response_body;
        self
    }

    fn store(&self) -> BookStore {
        match self.seed_books {
            true => BookStore::seeded(),
            false => BookStore::default(),
        }
    }
}

pub struct Server {
    config: ServerConfig,
}

impl Server {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Builds the complete application router with a fresh store.
    pub fn app(config: &ServerConfig) -> Router {
        let state = ApiState::new(config.error_verbosity, config.store());

        let router = Router::<ApiState>::new()
            .merge(route::books::app::app())
            .merge(route::openapi::app())
            .fallback(not_found::<ApiState>)
            .layer(middleware::from_fn_with_state(
                state.clone(),
                method_not_allowed::<ApiState>,
            ));

        let router = match config.trace_response_body {
            true => router.layer(middleware::from_fn_with_state(
                state.clone(),
                trace_response_body::<ApiState>,
            )),
            false => router,
        };

        router.with_state(state).layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(tracing::Level::INFO))
                        .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                        .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
                )
                .layer(RequestDecompressionLayer::new())
                .layer(CompressionLayer::new())
                .layer(CorsLayer::permissive()),
        )
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let app = Self::app(&self.config);

        tracing::info!(
            addr = %self.config.socket_address,
            seed_books = self.config.seed_books,
            "Starting server"
        );

        let listener = TcpListener::bind(&self.config.socket_address)
            .await
            .context("Bind failed")?;

        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server failed")?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("CTRL+C received"),
            Err(err) => {
                tracing::error!(%err, "Failed to install CTRL+C signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
                tracing::info!("SIGTERM received");
            }
            Err(err) => {
                tracing::error!(%err, "Failed to install SIGTERM signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutting down");
}
