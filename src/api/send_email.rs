//! `POST /api/send-email`

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::notification::NotificationRequest;
use crate::server::AppState;
use crate::template::{deserialize_variables, Variables};

/// Request body; presence of the required fields is checked by the dispatcher
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailRequest {
    #[serde(default)]
    pub template_name: Option<String>,
    #[serde(default)]
    pub recipient_email: Option<String>,
    #[serde(default)]
    pub recipient_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_variables")]
    pub variables: Variables,
}

impl From<SendEmailRequest> for NotificationRequest {
    fn from(request: SendEmailRequest) -> Self {
        NotificationRequest {
            template_name: request.template_name.unwrap_or_default(),
            recipient_email: request.recipient_email.unwrap_or_default(),
            recipient_name: request.recipient_name,
            variables: request.variables,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SendEmailResponse {
    pub success: bool,
    pub message: String,
    pub id: String,
}

/// Render a stored template and deliver it to one recipient
#[tracing::instrument(name = "http.send_email", skip(state, payload))]
pub async fn send_email(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SendEmailRequest>, JsonRejection>,
) -> Result<Json<SendEmailResponse>> {
    let Json(request) = payload?;
    let receipt = state.dispatcher.dispatch(request.into()).await?;

    Ok(Json(SendEmailResponse {
        success: true,
        message: "Email sent successfully".to_string(),
        id: receipt.id,
    }))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_request_into_notification() {
        let request: SendEmailRequest = serde_json::from_value(json!({
            "templateName": "booking_confirmation",
            "recipientEmail": "a@b.com",
            "recipientName": "",
            "variables": { "bookingId": "BK-1", "nights": 4 }
        }))
        .unwrap();

        let notification: NotificationRequest = request.into();
        assert_eq!(notification.template_name, "booking_confirmation");
        assert_eq!(notification.recipient_email, "a@b.com");
        assert!(notification.clone().normalized().recipient_name.is_none());
        assert_eq!(notification.variables["nights"], "4");
    }

    #[test]
    fn test_missing_fields_become_empty() {
        let request: SendEmailRequest = serde_json::from_value(json!({})).unwrap();
        let notification: NotificationRequest = request.into();

        assert!(notification.template_name.is_empty());
        assert!(notification.recipient_email.is_empty());
        assert!(notification.validate().is_err());
    }
}
