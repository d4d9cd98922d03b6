//! Shared fixtures for the HTTP integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use villa_mail_service::config::Settings;
use villa_mail_service::delivery::MemoryDeliveryLog;
use villa_mail_service::gateway::{DeliveryOutcome, EmailGateway, OutgoingEmail};
use villa_mail_service::server::{create_app, AppState};
use villa_mail_service::template::{EmailTemplate, MemoryTemplateStore, StoreError, TemplateStore};

/// Gateway that records every message and answers with a fixed outcome
pub struct RecordingGateway {
    outcome: DeliveryOutcome,
    calls: AtomicUsize,
    sent: Mutex<Vec<OutgoingEmail>>,
}

impl RecordingGateway {
    pub fn accepting(id: &str) -> Self {
        Self::with_outcome(DeliveryOutcome::Delivered { id: id.to_string() })
    }

    pub fn rejecting(error: &str) -> Self {
        Self::with_outcome(DeliveryOutcome::Rejected {
            error: error.to_string(),
        })
    }

    fn with_outcome(outcome: DeliveryOutcome) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailGateway for RecordingGateway {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn send(&self, email: &OutgoingEmail) -> DeliveryOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.sent.lock().unwrap().push(email.clone());
        self.outcome.clone()
    }
}

/// Template store whose reads always fail
pub struct UnavailableStore;

#[async_trait]
impl TemplateStore for UnavailableStore {
    async fn find_active(&self, _name: &str) -> Result<Option<EmailTemplate>, StoreError> {
        Err(StoreError::Io(std::io::Error::other("connection reset")))
    }

    async fn list(&self) -> Result<Vec<EmailTemplate>, StoreError> {
        Err(StoreError::Io(std::io::Error::other("connection reset")))
    }
}

pub fn booking_confirmation() -> EmailTemplate {
    EmailTemplate::new(
        "booking_confirmation",
        "Booking {{bookingId}} confirmed",
        "<p>Dear {{guestName}}, your stay at {{villaName}} is confirmed.</p>",
    )
    .with_text("Dear {{guestName}}, booking {{bookingId}} is confirmed.")
}

pub struct TestApp {
    pub router: Router,
    pub gateway: Arc<RecordingGateway>,
    pub log: Arc<MemoryDeliveryLog>,
}

pub fn test_app(gateway: RecordingGateway, api_key: Option<&str>) -> TestApp {
    let mut settings = Settings::default();
    settings.api.key = api_key.map(str::to_string);

    let templates = Arc::new(MemoryTemplateStore::with_templates([
        booking_confirmation(),
        EmailTemplate::new("retired_offer", "Old offer", "<p>Gone</p>").inactive(),
    ]));
    let gateway = Arc::new(gateway);
    let log = Arc::new(MemoryDeliveryLog::default());

    let state = AppState::new(settings, templates, gateway.clone(), log.clone());

    TestApp {
        router: create_app(state),
        gateway,
        log,
    }
}

/// Router whose template store is unreachable
pub fn unavailable_store_app(gateway: RecordingGateway) -> TestApp {
    let gateway = Arc::new(gateway);
    let log = Arc::new(MemoryDeliveryLog::default());
    let state = AppState::new(
        Settings::default(),
        Arc::new(UnavailableStore),
        gateway.clone(),
        log.clone(),
    );

    TestApp {
        router: create_app(state),
        gateway,
        log,
    }
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn call(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, body)
}
