//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, metrics, auth)
//! - Bind server to listener and shut down gracefully

use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::auth::{require_bearer, TokenService};
use crate::config::ServiceConfig;
use crate::employees::EmployeeAggregator;
use crate::http::request::{make_request_span, track_metrics};
use crate::http::{auth, employees, health};
use crate::lifecycle::shutdown_signal;
use crate::upstream::{EmployeeSource, UpstreamClient, UpstreamResult};

/// Application state injected into handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub aggregator: Arc<EmployeeAggregator>,
    pub tokens: Arc<TokenService>,
}

/// HTTP server for the employee service.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Create a server backed by the configured upstream provider.
    pub fn new(config: ServiceConfig) -> UpstreamResult<Self> {
        let client = UpstreamClient::new(config.upstream.clone())?;
        Ok(Self::with_source(config, Arc::new(client)))
    }

    /// Create a server backed by any employee source.
    pub fn with_source(config: ServiceConfig, source: Arc<dyn EmployeeSource>) -> Self {
        let state = AppState {
            aggregator: Arc::new(EmployeeAggregator::new(source)),
            tokens: Arc::new(TokenService::new(&config.auth)),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        let protected = Router::new()
            .route("/employee", get(employees::get_all).post(employees::create))
            .route("/employee/search/{fragment}", get(employees::search_by_name))
            .route("/employee/highestSalary", get(employees::highest_salary))
            .route(
                "/employee/topTenHighestEarningEmployeeNames",
                get(employees::top_ten_by_earning),
            )
            .route(
                "/employee/{id}",
                get(employees::get_by_id).delete(employees::delete_by_id),
            )
            .route_layer(middleware::from_fn_with_state(
                state.tokens.clone(),
                require_bearer,
            ));

        let public = Router::new()
            .route("/health", get(health::health))
            .route("/auth/token", post(auth::issue_token));

        Router::new()
            .nest("/api/v1", public.merge(protected))
            .with_state(state)
            .layer(middleware::from_fn(track_metrics))
            .layer(TimeoutLayer::new(Duration::from_secs(config.server.request_timeout_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Serve on `listener` until an OS signal or a `shutdown` broadcast arrives.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown_signal() => {},
                    _ = shutdown.recv() => {
                        tracing::info!("Shutdown requested");
                    },
                }
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
