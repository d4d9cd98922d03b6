//! HTTP integration tests
//!
//! Drive the full router with in-memory storage and a recording gateway,
//! without binding a socket.

mod common;

use axum::http::StatusCode;
use futures::future::join_all;
use serde_json::json;

use villa_mail_service::delivery::DeliveryStatus;

use common::{
    call, get_request, json_request, test_app, unavailable_store_app, RecordingGateway,
};

#[tokio::test]
async fn test_send_email_success() {
    let app = test_app(RecordingGateway::accepting("msg_abc"), None);

    let (status, body) = call(
        &app.router,
        json_request(
            "POST",
            "/api/send-email",
            json!({
                "templateName": "booking_confirmation",
                "recipientEmail": "guest@example.com",
                "recipientName": "Wayan",
                "variables": {
                    "bookingId": "BK-1",
                    "guestName": "Wayan",
                    "villaName": "Villa Kayu"
                }
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Email sent successfully");
    assert_eq!(body["id"], "msg_abc");

    let sent = app.gateway.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "guest@example.com");
    assert_eq!(sent[0].subject, "Booking BK-1 confirmed");
    assert_eq!(
        sent[0].html,
        "<p>Dear Wayan, your stay at Villa Kayu is confirmed.</p>"
    );
    assert_eq!(
        sent[0].text.as_deref(),
        Some("Dear Wayan, booking BK-1 is confirmed.")
    );

    let entries = app.log.entries().await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].status, DeliveryStatus::Sent);
    assert_eq!(entries[0].provider_message_id.as_deref(), Some("msg_abc"));
    assert_eq!(entries[0].subject, "Booking BK-1 confirmed");
    assert_eq!(entries[0].recipient_name.as_deref(), Some("Wayan"));
    assert_eq!(entries[0].metadata["variables"]["bookingId"], "BK-1");
    assert!(entries[0].sent_at.is_some());
}

#[tokio::test]
async fn test_send_email_unknown_template() {
    let app = test_app(RecordingGateway::accepting("msg_abc"), None);

    let (status, body) = call(
        &app.router,
        json_request(
            "POST",
            "/api/send-email",
            json!({
                "templateName": "does_not_exist",
                "recipientEmail": "guest@example.com"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "TEMPLATE_NOT_FOUND");
    assert!(body["error"].as_str().unwrap().contains("does_not_exist"));
    assert_eq!(app.gateway.calls(), 0);
    assert!(app.log.is_empty().await);
}

#[tokio::test]
async fn test_send_email_inactive_template() {
    let app = test_app(RecordingGateway::accepting("msg_abc"), None);

    let (status, _) = call(
        &app.router,
        json_request(
            "POST",
            "/api/send-email",
            json!({
                "templateName": "retired_offer",
                "recipientEmail": "guest@example.com"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.gateway.calls(), 0);
    assert!(app.log.is_empty().await);
}

#[tokio::test]
async fn test_send_email_missing_fields() {
    let app = test_app(RecordingGateway::accepting("msg_abc"), None);

    let (status, body) = call(
        &app.router,
        json_request(
            "POST",
            "/api/send-email",
            json!({ "templateName": "booking_confirmation" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"], "recipientEmail is required");

    let (status, body) = call(
        &app.router,
        json_request(
            "POST",
            "/api/send-email",
            json!({ "recipientEmail": "guest@example.com" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "templateName is required");

    assert_eq!(app.gateway.calls(), 0);
    assert!(app.log.is_empty().await);
}

#[tokio::test]
async fn test_send_email_malformed_body() {
    let app = test_app(RecordingGateway::accepting("msg_abc"), None);

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/send-email")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let (status, body) = call(&app.router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(app.gateway.calls(), 0);
}

#[tokio::test]
async fn test_send_email_gateway_failure() {
    let app = test_app(RecordingGateway::rejecting("Domain not verified"), None);

    let (status, body) = call(
        &app.router,
        json_request(
            "POST",
            "/api/send-email",
            json!({
                "templateName": "booking_confirmation",
                "recipientEmail": "guest@example.com",
                "variables": { "bookingId": "BK-2" }
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "DELIVERY_FAILED");
    assert_eq!(body["error"], "Domain not verified");
    assert_eq!(app.gateway.calls(), 1);

    let entries = app.log.entries().await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].status, DeliveryStatus::Failed);
    assert_eq!(entries[0].error_message.as_deref(), Some("Domain not verified"));
    assert!(entries[0].provider_message_id.is_none());
    assert!(entries[0].sent_at.is_none());
}

#[tokio::test]
async fn test_send_email_without_variables_keeps_placeholders() {
    let app = test_app(RecordingGateway::accepting("msg_abc"), None);

    let (status, _) = call(
        &app.router,
        json_request(
            "POST",
            "/api/send-email",
            json!({
                "templateName": "booking_confirmation",
                "recipientEmail": "guest@example.com"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.gateway.sent()[0].subject, "Booking {{bookingId}} confirmed");
}

#[tokio::test]
async fn test_concurrent_sends_each_logged_once() {
    let app = test_app(RecordingGateway::accepting("msg_abc"), None);

    let requests = (0..10).map(|i| {
        call(
            &app.router,
            json_request(
                "POST",
                "/api/send-email",
                json!({
                    "templateName": "booking_confirmation",
                    "recipientEmail": format!("guest{}@example.com", i),
                    "variables": { "bookingId": format!("BK-{}", i) }
                }),
            ),
        )
    });
    let results = join_all(requests).await;

    assert!(results.iter().all(|(status, _)| *status == StatusCode::OK));
    assert_eq!(app.gateway.calls(), 10);
    assert_eq!(app.log.len().await, 10);
}

#[tokio::test]
async fn test_api_key_required_when_configured() {
    let app = test_app(RecordingGateway::accepting("msg_abc"), Some("s3cret"));
    let payload = json!({
        "templateName": "booking_confirmation",
        "recipientEmail": "guest@example.com"
    });

    let (status, _) = call(
        &app.router,
        json_request("POST", "/api/send-email", payload.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let mut wrong_key = json_request("POST", "/api/send-email", payload.clone());
    wrong_key
        .headers_mut()
        .insert("x-api-key", "nope".parse().unwrap());
    let (status, _) = call(&app.router, wrong_key).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.gateway.calls(), 0);

    let mut authorized = json_request("POST", "/api/send-email", payload);
    authorized
        .headers_mut()
        .insert("x-api-key", "s3cret".parse().unwrap());
    let (status, _) = call(&app.router, authorized).await;
    assert_eq!(status, StatusCode::OK);

    // Health stays public
    let (status, _) = call(&app.router, get_request("/health")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_list_templates() {
    let app = test_app(RecordingGateway::accepting("msg_abc"), None);

    let (status, body) = call(&app.router, get_request("/api/email-templates")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["templates"][0]["name"], "booking_confirmation");
    assert_eq!(body["templates"][1]["name"], "retired_offer");
    assert_eq!(body["templates"][1]["is_active"], false);
}

#[tokio::test]
async fn test_preview_template() {
    let app = test_app(RecordingGateway::accepting("msg_abc"), None);

    let (status, body) = call(
        &app.router,
        json_request(
            "POST",
            "/api/email-templates/booking_confirmation/preview",
            json!({ "variables": { "bookingId": "BK-7", "guestName": "Made" } }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subject"], "Booking BK-7 confirmed");
    assert_eq!(
        body["html"],
        "<p>Dear Made, your stay at {{villaName}} is confirmed.</p>"
    );
    assert_eq!(body["missing_variables"], json!(["villaName"]));
    assert_eq!(app.gateway.calls(), 0);
    assert!(app.log.is_empty().await);
}

#[tokio::test]
async fn test_preview_unknown_or_inactive_template() {
    let app = test_app(RecordingGateway::accepting("msg_abc"), None);

    for name in ["does_not_exist", "retired_offer"] {
        let (status, body) = call(
            &app.router,
            json_request(
                "POST",
                &format!("/api/email-templates/{}/preview", name),
                json!({}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "TEMPLATE_NOT_FOUND");
    }
}

#[tokio::test]
async fn test_email_logs_newest_first() {
    let app = test_app(RecordingGateway::accepting("msg_abc"), None);

    for booking in ["BK-1", "BK-2", "BK-3"] {
        let (status, _) = call(
            &app.router,
            json_request(
                "POST",
                "/api/send-email",
                json!({
                    "templateName": "booking_confirmation",
                    "recipientEmail": "guest@example.com",
                    "variables": { "bookingId": booking }
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = call(&app.router, get_request("/api/email-logs?limit=2")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["logs"][0]["subject"], "Booking BK-3 confirmed");
    assert_eq!(body["logs"][1]["subject"], "Booking BK-2 confirmed");
    assert_eq!(body["logs"][0]["status"], "sent");
}

#[tokio::test]
async fn test_health_and_stats() {
    let app = test_app(RecordingGateway::rejecting("boom"), None);

    let (status, body) = call(&app.router, get_request("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    call(
        &app.router,
        json_request(
            "POST",
            "/api/send-email",
            json!({
                "templateName": "booking_confirmation",
                "recipientEmail": "guest@example.com"
            }),
        ),
    )
    .await;

    let (status, body) = call(&app.router, get_request("/stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["emails"]["total_requests"], 1);
    assert_eq!(body["emails"]["total_failed"], 1);
    assert_eq!(body["emails"]["total_sent"], 0);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = test_app(RecordingGateway::accepting("msg_abc"), None);

    call(
        &app.router,
        json_request(
            "POST",
            "/api/send-email",
            json!({
                "templateName": "booking_confirmation",
                "recipientEmail": "guest@example.com"
            }),
        ),
    )
    .await;

    let (status, body) = call(&app.router, get_request("/metrics")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body
        .as_str()
        .unwrap()
        .contains("villa_mail_emails_dispatched_total"));
}

#[tokio::test]
async fn test_send_email_store_unavailable() {
    let app = unavailable_store_app(RecordingGateway::accepting("msg_abc"));

    let (status, body) = call(
        &app.router,
        json_request(
            "POST",
            "/api/send-email",
            json!({
                "templateName": "booking_confirmation",
                "recipientEmail": "guest@example.com"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "STORAGE_ERROR");
    assert_eq!(app.gateway.calls(), 0);
    assert!(app.log.is_empty().await);

    let (status, body) = call(&app.router, get_request("/api/email-templates")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "STORAGE_ERROR");
}
