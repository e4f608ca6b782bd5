use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use mindspace_axum::{response::JsonResponse, timestamp};
use mindspace_mailer_core::model::{validate_notification, SendNotificationResponse};
use notification::DeliveryResult;
use serde_json::Value;

use super::{Error, Result};
use crate::ServiceState;

/// Validate a notification and send it by email
#[utoipa::path(
    post,
    operation_id = "send_notification",
    path = "/notifications",
    request_body = mindspace_mailer_core::model::SendNotificationRequest,
    responses(
        (status = 200, body = SendNotificationResponse),
        (status = 400, description = "Validation Error", body = mindspace_axum::response::Error),
        (status = 500, description = "Email Send Failed", body = mindspace_axum::response::Error)
    ),
    tag = "Notifications"
)]
pub async fn send_notification(
    State(service_state): State<ServiceState>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<JsonResponse<SendNotificationResponse>> {
    let Json(payload) = payload?;
    let notification = validate_notification(&payload)?;

    match service_state.notifier.send_notification(&notification).await {
        DeliveryResult::Delivered { message_id } => {
            Ok(JsonResponse::ok(SendNotificationResponse::delivered(message_id, timestamp())))
        }
        DeliveryResult::Failed { error } => Err(Error::DeliveryFailed { message: error }),
    }
}
