// FIXME: remove this after this utoipa issue is fixed: https://github.com/juhaku/utoipa/pull/1423
#![allow(clippy::needless_for_each)]
mod error;
mod notifications;

use axum::{extract::State, http::StatusCode, response::Response, routing, Router};
use mindspace_axum::{json_response, response, response::JsonResponse, timestamp};
use mindspace_mailer_core::{
    model::{HealthStatus, ServiceActivity, ServiceStatus},
    HEALTH_SERVICE_NAME, STATUS_SERVICE_NAME,
};
use utoipa::OpenApi;

pub use self::error::{Error, Result};
use crate::ServiceState;

/// Routes of the service. A known path requested with another method is
/// answered like an unknown path.
pub fn api_router(service_state: &ServiceState) -> Router {
    Router::new()
        .route(
            "/notifications",
            routing::post(notifications::send_notification).fallback(fallback),
        )
        .route("/status", routing::get(service_status).fallback(fallback))
        .route("/health", routing::get(health).fallback(fallback))
        .fallback(fallback)
        .with_state(service_state.clone())
}

// SAFETY: `axum` handler must be async
#[allow(clippy::unused_async)]
pub async fn fallback() -> Response {
    json_response! { status: StatusCode::NOT_FOUND, body: response::Error::not_found() }
}

/// Report whether a mail transport is available
#[utoipa::path(
    get,
    operation_id = "get_service_status",
    path = "/status",
    responses(
        (status = 200, body = ServiceStatus)
    ),
    tag = "Service"
)]
pub async fn service_status(
    State(service_state): State<ServiceState>,
) -> Result<JsonResponse<ServiceStatus>> {
    Ok(JsonResponse::ok(ServiceStatus {
        success: true,
        service: STATUS_SERVICE_NAME.to_string(),
        status: ServiceActivity::from_ready(service_state.notifier.is_ready()),
        provider: service_state.provider.clone(),
        timestamp: timestamp(),
    }))
}

/// Liveness probe
#[utoipa::path(
    get,
    operation_id = "get_health",
    path = "/health",
    responses(
        (status = 200, body = HealthStatus)
    ),
    tag = "Service"
)]
// SAFETY: `axum` handler must be async
#[allow(clippy::unused_async)]
pub async fn health() -> Result<JsonResponse<HealthStatus>> {
    Ok(JsonResponse::ok(HealthStatus {
        status: "OK".to_string(),
        service: HEALTH_SERVICE_NAME.to_string(),
        timestamp: timestamp(),
    }))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        notifications::send_notification,
        service_status,
        health,
    ),
    components(schemas(
        mindspace_mailer_core::model::SendNotificationRequest,
        mindspace_mailer_core::model::SendNotificationResponse,
        ServiceStatus,
        ServiceActivity,
        HealthStatus,
        mindspace_axum::response::Error,
        mindspace_axum::response::ErrorType,
    )),
    tags(
        (name = "Notifications", description = "Email notification endpoints"),
        (name = "Service", description = "Service status endpoints")
    )
)]
pub struct ApiDoc;
