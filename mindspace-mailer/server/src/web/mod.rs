pub mod controller;
pub mod error;

use std::{any::Any, future::Future, net::SocketAddr, sync::Arc};

use axum::{extract::DefaultBodyLimit, http::StatusCode, response::Response, Router};
use mindspace_axum::{json_response, response};
use mindspace_mailer_core::INTERNAL_ERROR_MESSAGE;
use notification::Notifier;
use snafu::ResultExt;
use tokio::net::TcpListener;
use tower::{Layer, ServiceBuilder};
use tower_http::{
    catch_panic::CatchPanicLayer, compression::CompressionLayer,
    normalize_path::NormalizePathLayer, trace::TraceLayer,
};

pub use self::{controller::ApiDoc, error::Error};

/// Largest request body accepted, in bytes.
pub const MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

pub async fn new_api_server<ShutdownSignal>(
    socket_address: SocketAddr,
    service_state: ServiceState,
    shutdown_signal: ShutdownSignal,
) -> Result<(), Error>
where
    ShutdownSignal: Future<Output = ()> + Send + 'static,
{
    let router = app_router(&service_state).into_make_service();

    let listener = TcpListener::bind(&socket_address).await.context(error::BindTcpServerSnafu)?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|err| Error::ServeHttpServer { message: err.to_string() })
}

/// The router served to clients: [`api_router`] behind trailing slash
/// normalization.
pub fn app_router(service_state: &ServiceState) -> Router {
    let router = NormalizePathLayer::trim_trailing_slash().layer(api_router(service_state));
    Router::new().fallback_service(router)
}

/// Every route with its middleware stack, without path normalization.
pub fn api_router(service_state: &ServiceState) -> Router {
    let middleware_stack = ServiceBuilder::new()
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new());

    controller::api_router(service_state)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(middleware_stack)
}

// SAFETY: allow: high cognitive complexity caused by `tracing` macro
#[allow(clippy::cognitive_complexity, clippy::needless_pass_by_value)]
fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let reason = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");

    json_response! {
        reason: format!("request handler panicked: {reason}"),
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: response::Error::internal(INTERNAL_ERROR_MESSAGE)
    }
}

#[derive(Clone)]
pub struct ServiceState {
    pub notifier: Arc<Notifier>,

    /// Transport selector reported by `GET /status`.
    pub provider: String,
}

impl ServiceState {
    /// Create a new service state
    #[must_use]
    pub fn new(notifier: Notifier, provider: impl Into<String>) -> Self {
        Self { notifier: Arc::new(notifier), provider: provider.into() }
    }
}
