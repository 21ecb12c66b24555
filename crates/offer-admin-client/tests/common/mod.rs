//! Shared fixtures for integration tests

#![allow(dead_code, unreachable_pub)]

use offer_admin_client::backoff::SleepFuture;
use offer_admin_client::view::Sleeper;
use offer_admin_client::{ApiClient, OfferAdminView, RetryPolicy};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;
use wiremock::MockServer;

static INIT_LOGGER: Once = Once::new();

/// Token the mock backend expects on admin endpoints
pub const ADMIN_TOKEN: &str = "test-admin-token";

/// Initialize test logging (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    });
}

/// `GET /api/offers` body with one accepted and two inaccepted offers
pub fn offers_body() -> Value {
    json!({
        "offers": [
            {
                "id": 1,
                "title": "Mountain bike",
                "description": "Hardtail, 29 inch wheels",
                "price": 450,
                "image": "bike.jpg",
                "status": "accepted"
            },
            {
                "id": 2,
                "title": "Desk lamp",
                "description": "Brass, works fine",
                "price": "19.99",
                "image": "lamp.png",
                "status": "inaccepted"
            },
            {
                "id": 3,
                "title": "Bookshelf",
                "description": null,
                "price": 120,
                "status": "inaccepted"
            }
        ]
    })
}

/// `GET /api/users` body with a regular user ahead of two admins
pub fn users_body() -> Value {
    json!({
        "users": [
            { "id": 10, "role": "user", "avatar": "someone.png", "email": "u@example.com" },
            { "id": 11, "role": "admin", "avatar": "first-admin.png" },
            { "id": 12, "role": "admin", "avatar": "second-admin.png" }
        ]
    })
}

/// Client pointed at the mock server, carrying the admin token
pub fn admin_client(server: &MockServer) -> ApiClient {
    ApiClient::new(server.uri()).with_token(ADMIN_TOKEN)
}

/// Sleeper that returns immediately and records every requested delay
pub fn recording_sleeper() -> (Sleeper, Arc<Mutex<Vec<Duration>>>) {
    let delays = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&delays);
    let sleeper: Sleeper = Arc::new(move |delay: Duration| -> SleepFuture {
        if let Ok(mut log) = log.lock() {
            log.push(delay);
        }
        Box::pin(async {})
    });
    (sleeper, delays)
}

/// View over a real HTTP client with instant, recorded retries
pub fn view_for(server: &MockServer) -> (OfferAdminView<ApiClient>, Arc<Mutex<Vec<Duration>>>) {
    let (sleeper, delays) = recording_sleeper();
    let view =
        OfferAdminView::new(admin_client(server), RetryPolicy::default()).with_sleeper(sleeper);
    (view, delays)
}
