// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for REST-backed tests.

#![allow(clippy::unwrap_used)]

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{json, Value};
use ys_core::api::Tokens;

use super::client::{ApiClient, Endpoints};
use super::transport::{HttpRequest, HttpResponse, HttpTransport, TransportResult};
use crate::session::Session;

type Handler = Box<dyn Fn(&HttpRequest) -> HttpResponse + Send + Sync>;

/// Scripted HTTP transport. Every call is recorded, then answered by the
/// handler after an optional delay.
pub(crate) struct MockHttp {
    handler: Handler,
    calls: Mutex<Vec<HttpRequest>>,
    delay: Duration,
}

impl MockHttp {
    pub(crate) fn new(handler: impl Fn(&HttpRequest) -> HttpResponse + Send + Sync + 'static) -> Self {
        MockHttp {
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
            delay: Duration::ZERO,
        }
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn calls(&self) -> Vec<HttpRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls whose URL ends with `suffix`.
    pub(crate) fn count(&self, suffix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.url.ends_with(suffix))
            .count()
    }
}

impl HttpTransport for MockHttp {
    fn send(
        &self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = TransportResult<HttpResponse>> + Send + '_>> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(request.clone());
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            Ok((self.handler)(&request))
        })
    }
}

pub(crate) fn respond(status: u16, body: Value) -> HttpResponse {
    HttpResponse::new(status, body.to_string())
}

pub(crate) fn endpoints() -> Endpoints {
    Endpoints::new("http://api.test/insurance", "http://api.test", "ws://push.test")
}

pub(crate) fn tokens(access: &str, refresh: &str) -> Tokens {
    Tokens {
        access_token: access.to_string(),
        refresh_token: refresh.to_string(),
        expires_in: Some(3600),
        token_type: Some("Bearer".to_string()),
    }
}

pub(crate) fn logged_in_session() -> Arc<Session> {
    let session = Session::in_memory();
    session
        .set_credentials(&tokens("a1", "r1"), Some("Anadolu Sigorta"))
        .unwrap();
    Arc::new(session)
}

pub(crate) fn client(mock: &Arc<MockHttp>, session: Arc<Session>) -> ApiClient {
    ApiClient::new(mock.clone(), session, endpoints())
}

/// Snapshot body for `GET /requests/{id}/`.
pub(crate) fn snapshot_json(id: u64, status: &str) -> Value {
    let assigned = matches!(status, "awaiting_payment" | "in_progress" | "completed");
    let (driver, pricing) = if assigned {
        (
            json!({"name": "Ali Veli", "phone": "05550000000"}),
            json!({"estimated_price": "1500.00", "currency": "TRY"}),
        )
    } else {
        (Value::Null, Value::Null)
    };
    json!({
        "request_id": id,
        "status": status,
        "service_type": "towTruck",
        "insured_name": "Ayse Ozturk",
        "insured_phone": "05551112233",
        "insured_plate": "34ABC123",
        "policy_number": "POL-1",
        "tracking_url": format!("https://yolsepetigo.com/track/tok-{}/", id),
        "driver": driver,
        "pricing": pricing,
        "timeline": {
            "created_at": "2026-02-12T16:00:00+03:00",
            "accepted_at": null,
            "completed_at": null
        }
    })
}

/// One offer in the REST list layout.
pub(crate) fn offer_json(id: u64, price: &str) -> Value {
    json!({
        "id": id,
        "driver_info": {"id": 9, "name": "Ali Veli", "phone": "05550000000", "average_rating": "4.50", "total_ratings": 12},
        "vehicle_info": {"id": 3, "brand": "Ford", "model": "Cargo", "plate_number": "34ABC123", "vehicle_type": "tow_truck"},
        "estimated_price": price,
        "driver_earnings": "1200.00",
        "platform_commission": "300.00",
        "pricing_breakdown": {},
        "offer_details": {},
        "status": "pending",
        "created_at": "2026-02-12T16:05:00+03:00"
    })
}

/// One offer in the push layout.
pub(crate) fn push_offer_json(id: u64, price: &str) -> Value {
    json!({
        "id": id,
        "driver": {"id": 9, "first_name": "Ali", "last_name": "Veli", "phone_number": "05550000000"},
        "vehicle": {"id": 3, "brand": "Ford", "model": "Cargo", "plate_number": "34ABC123"},
        "estimated_price": price,
        "status": "pending",
        "created_at": "2026-02-12T16:05:00+03:00"
    })
}

pub(crate) fn offers_json(id: u64, offers: Vec<Value>) -> Value {
    json!({
        "request_id": id,
        "request_status": "pending",
        "offers_count": offers.len(),
        "offers": offers
    })
}
