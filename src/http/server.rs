//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request ID, limits, timeout, metrics)
//! - Serve static files in production mode
//! - Bind server to listener, with or without TLS
//! - Shut down gracefully on the lifecycle broadcast

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use axum_server::tls_rustls::RustlsConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::schema::CorsConfig;
use crate::config::ServiceConfig;
use crate::http::{handlers, request};
use crate::lifecycle::shutdown::wait_for;
use crate::net::tls::{load_tls_config, TlsError};
use crate::observability::metrics;
use crate::store::TodoStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TodoStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }
}

/// Errors that stop the server from serving.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("listener host '{0}' is not an IP address")]
    InvalidAddress(String),

    #[error(transparent)]
    Tls(#[from] TlsError),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP server for the todo API.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Create a new HTTP server over the given store.
    pub fn new(config: ServiceConfig, store: Arc<dyn TodoStore>) -> Self {
        let router = build_router(&config, AppState::new(store));
        Self { router, config }
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Bind the configured address and serve until shutdown.
    pub async fn serve(self, shutdown: broadcast::Receiver<()>) -> Result<(), ServeError> {
        let addr = self
            .config
            .listener
            .socket_addr()
            .ok_or_else(|| ServeError::InvalidAddress(self.config.listener.host.clone()))?;

        match self.config.listener.tls.clone() {
            Some(tls) => {
                let rustls = load_tls_config(&tls).await?;
                self.run_tls(addr, rustls, shutdown).await?;
            }
            None => {
                let listener = TcpListener::bind(addr).await?;
                self.run(listener, shutdown).await?;
            }
        }
        Ok(())
    }

    /// Run the server on an already bound listener.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(wait_for(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Run the server with TLS on `addr`.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: RustlsConfig,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let handle = axum_server::Handle::new();
        let drain = Duration::from_secs(self.config.timeouts.request_secs);

        let signal_handle = handle.clone();
        tokio::spawn(async move {
            wait_for(shutdown).await;
            signal_handle.graceful_shutdown(Some(drain));
        });

        tracing::info!(address = %addr, "HTTPS server listening");
        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(config: &ServiceConfig, state: AppState) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/api/todo",
            get(handlers::list_todos).post(handlers::create_todo),
        )
        .route(
            "/api/todo/{id}",
            get(handlers::get_todo)
                .put(handlers::complete_todo)
                .delete(handlers::delete_todo),
        )
        .with_state(state);

    if config.environment.is_production() {
        router = router.fallback_service(ServeDir::new(&config.static_files.dir));
    }

    router = router
        .layer(middleware::from_fn(metrics::track_requests))
        .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
        .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)));

    if let Some(cors) = cors_layer(&config.cors) {
        router = router.layer(cors);
    }

    if config.security.enable_headers {
        router = router.layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ));
    }

    router
        .layer(request::propagate_request_id_layer())
        .layer(TraceLayer::new_for_http().make_span_with(request::make_request_span))
        .layer(request::set_request_id_layer())
}

fn cors_layer(config: &CorsConfig) -> Option<CorsLayer> {
    if config.allowed_origins.is_empty() {
        return None;
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::ACCEPT]),
    )
}
