// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use ys_core::{Request, RequestEvent, RequestStatus};

use super::*;
use crate::http::test_helpers::*;
use crate::http::HttpResponse;

/// Server-side state of request 42.
struct Backend {
    status: &'static str,
    offers: Vec<Value>,
    /// Response to an accept call. `None` accepts and moves to awaiting_payment.
    accept_error: Option<Value>,
    cancel_error: Option<Value>,
    offers_down: bool,
}

impl Backend {
    fn new(status: &'static str) -> Arc<Mutex<Backend>> {
        Arc::new(Mutex::new(Backend {
            status,
            offers: Vec::new(),
            accept_error: None,
            cancel_error: None,
            offers_down: false,
        }))
    }
}

fn serve(backend: &Arc<Mutex<Backend>>) -> Arc<MockHttp> {
    let backend = Arc::clone(backend);
    Arc::new(MockHttp::new(move |request| {
        let mut state = backend.lock().unwrap();
        let url = request.url.as_str();
        if url.ends_with("/insurance/requests/42/") {
            respond(200, snapshot_json(42, state.status))
        } else if url.ends_with("/requests/location/tok-42/offers/") {
            if state.offers_down {
                HttpResponse::new(503, "")
            } else {
                respond(200, offers_json(42, state.offers.clone()))
            }
        } else if url.contains("/requests/location/tok-42/accept-offer/") {
            match state.accept_error.clone() {
                Some(error) => respond(400, error),
                None => {
                    state.status = "awaiting_payment";
                    respond(200, json!({"message": "Teklif kabul edildi", "request_id": 42}))
                }
            }
        } else if url.ends_with("/requests/42/cancel/") {
            match state.cancel_error.clone() {
                Some(error) => respond(400, error),
                None => {
                    state.status = "cancelled";
                    respond(200, json!({"request_id": 42, "status": "cancelled"}))
                }
            }
        } else if url.ends_with("/requests/42/resend-sms/") {
            respond(200, json!({"message": "SMS gonderildi", "payment_url": "https://pay.test/x"}))
        } else {
            respond(404, json!({"detail": "Not found."}))
        }
    }))
}

fn controller(mock: &Arc<MockHttp>) -> RequestController {
    RequestController::new(Arc::new(client(mock, logged_in_session())), 42)
}

fn push(id: u64, price: &str) -> RequestEvent {
    serde_json::from_value(json!({"type": "new_offer", "offer": push_offer_json(id, price)}))
        .unwrap()
}

fn snapshot(status: &str) -> Request {
    serde_json::from_value(snapshot_json(42, status)).unwrap()
}

#[tokio::test]
async fn pushed_offer_lands_in_book() {
    let backend = Backend::new("pending");
    let mock = serve(&backend);
    let mut ctl = controller(&mock);

    ctl.refresh().await.unwrap();
    assert_eq!(ctl.status(), Some(RequestStatus::Pending));
    assert_eq!(ctl.tracking_token(), Some("tok-42"));
    assert!(ctl.offers().is_open());
    assert!(ctl.offers().is_empty());

    ctl.handle_event(push(7, "1500")).await.unwrap();
    let offer = ctl.offers().get(7).unwrap();
    assert_eq!(offer.driver_info.name, "Ali Veli");
    assert_eq!(offer.estimated_price, 1500.0);
    assert!(offer.is_pending());
}

#[tokio::test]
async fn duplicate_push_and_withdrawal() {
    let backend = Backend::new("awaiting_approval");
    backend.lock().unwrap().offers = vec![offer_json(7, "1500.00")];
    let mock = serve(&backend);
    let mut ctl = controller(&mock);
    ctl.refresh().await.unwrap();

    ctl.handle_event(push(7, "999")).await.unwrap();
    assert_eq!(ctl.offers().len(), 1);
    assert_eq!(ctl.offers().get(7).unwrap().estimated_price, 1500.0);

    ctl.handle_event(RequestEvent::OfferWithdrawn { offer_id: 7 })
        .await
        .unwrap();
    assert!(ctl.offers().is_empty());

    ctl.handle_event(RequestEvent::Unknown).await.unwrap();
    assert_eq!(mock.count("/requests/42/"), 1);
}

#[tokio::test]
async fn lowest_offer_is_only_a_hint() {
    let backend = Backend::new("awaiting_approval");
    backend.lock().unwrap().offers = vec![offer_json(1, "1800.00"), offer_json(2, "1500.00")];
    let mock = serve(&backend);
    let mut ctl = controller(&mock);
    ctl.refresh().await.unwrap();

    assert_eq!(ctl.offers().lowest().unwrap().id, 2);

    ctl.accept_offer(1).await.unwrap();
    assert_eq!(mock.count("/accept-offer/1/"), 1);
    assert_eq!(ctl.status(), Some(RequestStatus::AwaitingPayment));
    assert!(ctl.offers().is_empty());
    assert!(!ctl.offers().is_open());
    assert!(ctl.request().unwrap().driver.is_some());
}

#[tokio::test]
async fn failed_accept_reports_server_message_once() {
    let backend = Backend::new("awaiting_approval");
    {
        let mut state = backend.lock().unwrap();
        state.offers = vec![offer_json(1, "1800.00"), offer_json(2, "1500.00")];
        state.accept_error = Some(json!({"error": "Bu teklif artik gecerli degil"}));
    }
    let mock = serve(&backend);
    let mut ctl = controller(&mock);
    ctl.refresh().await.unwrap();

    let err = ctl.accept_offer(2).await.unwrap_err();
    assert_eq!(err.to_string(), "Bu teklif artik gecerli degil");
    assert_eq!(
        ctl.action(Action::Accept).error.as_deref(),
        Some("Bu teklif artik gecerli degil")
    );
    assert!(!ctl.action(Action::Accept).in_flight);
    assert_eq!(mock.count("/accept-offer/2/"), 1);
    assert_eq!(ctl.offers().len(), 2);
    assert_eq!(ctl.status(), Some(RequestStatus::AwaitingApproval));
}

#[tokio::test]
async fn accept_while_pending_needs_a_visible_offer() {
    let backend = Backend::new("pending");
    let mock = serve(&backend);
    let mut ctl = controller(&mock);
    ctl.refresh().await.unwrap();

    assert!(matches!(
        ctl.accept_offer(7).await,
        Err(Error::InvalidState(_))
    ));
    assert_eq!(mock.count("/accept-offer/7/"), 0);

    ctl.handle_event(push(7, "1500")).await.unwrap();
    ctl.accept_offer(7).await.unwrap();
    assert_eq!(ctl.status(), Some(RequestStatus::AwaitingPayment));
}

#[tokio::test]
async fn accept_rejected_after_offer_phase() {
    let backend = Backend::new("in_progress");
    let mock = serve(&backend);
    let mut ctl = controller(&mock);
    ctl.refresh().await.unwrap();

    assert!(matches!(
        ctl.accept_offer(1).await,
        Err(Error::InvalidState(_))
    ));
}

#[tokio::test]
async fn commands_need_a_loaded_request() {
    let backend = Backend::new("pending");
    let mock = serve(&backend);
    let mut ctl = controller(&mock);

    assert!(matches!(ctl.cancel().await, Err(Error::InvalidState(_))));
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn status_change_closes_offers_without_withdrawal() {
    let backend = Backend::new("awaiting_approval");
    backend.lock().unwrap().offers = vec![offer_json(1, "1800.00"), offer_json(2, "1500.00")];
    let mock = serve(&backend);
    let mut ctl = controller(&mock);
    ctl.refresh().await.unwrap();
    assert_eq!(ctl.offers().len(), 2);

    backend.lock().unwrap().status = "awaiting_payment";
    ctl.handle_event(RequestEvent::OfferAccepted { offer_id: Some(2) })
        .await
        .unwrap();

    assert_eq!(ctl.status(), Some(RequestStatus::AwaitingPayment));
    assert!(ctl.offers().is_empty());

    ctl.handle_event(push(3, "1400")).await.unwrap();
    assert!(ctl.offers().is_empty());
}

#[tokio::test]
async fn connection_established_triggers_refetch() {
    let backend = Backend::new("pending");
    let mock = serve(&backend);
    let mut ctl = controller(&mock);

    ctl.handle_event(RequestEvent::ConnectionEstablished { message: None })
        .await
        .unwrap();
    assert_eq!(ctl.status(), Some(RequestStatus::Pending));
    assert_eq!(mock.count("/offers/"), 1);
}

#[tokio::test]
async fn stale_snapshot_is_dropped() {
    let backend = Backend::new("pending");
    let mock = serve(&backend);
    let mut ctl = controller(&mock);

    assert!(!ctl.apply_snapshot(snapshot("in_progress")));
    let epoch = ctl.offers().epoch();
    assert!(!ctl.apply_snapshot(snapshot("awaiting_approval")));
    assert_eq!(ctl.status(), Some(RequestStatus::InProgress));
    assert_eq!(ctl.offers().epoch(), epoch);
}

#[tokio::test]
async fn same_status_keeps_epoch() {
    let backend = Backend::new("pending");
    let mock = serve(&backend);
    let mut ctl = controller(&mock);

    assert!(ctl.apply_snapshot(snapshot("awaiting_approval")));
    let epoch = ctl.offers().epoch();
    assert!(!ctl.apply_snapshot(snapshot("awaiting_approval")));
    assert_eq!(ctl.offers().epoch(), epoch);
}

#[tokio::test]
async fn offer_list_failure_is_not_fatal() {
    let backend = Backend::new("awaiting_approval");
    backend.lock().unwrap().offers_down = true;
    let mock = serve(&backend);
    let mut ctl = controller(&mock);

    ctl.refresh().await.unwrap();
    assert!(ctl.offers().is_open());
    assert!(ctl.offers().is_empty());
}

#[tokio::test]
async fn cancel_refetches() {
    let backend = Backend::new("awaiting_approval");
    let mock = serve(&backend);
    let mut ctl = controller(&mock);
    ctl.refresh().await.unwrap();

    ctl.cancel().await.unwrap();
    assert_eq!(ctl.status(), Some(RequestStatus::Cancelled));
    assert_eq!(ctl.channel_key(), None);

    assert!(matches!(ctl.cancel().await, Err(Error::InvalidState(_))));
    assert_eq!(mock.count("/cancel/"), 1);
}

#[tokio::test]
async fn failed_cancel_leaves_view() {
    let backend = Backend::new("in_progress");
    backend.lock().unwrap().cancel_error = Some(json!({"error": "Bu talep iptal edilemez"}));
    let mock = serve(&backend);
    let mut ctl = controller(&mock);
    ctl.refresh().await.unwrap();

    let err = ctl.cancel().await.unwrap_err();
    assert_eq!(err.to_string(), "Bu talep iptal edilemez");
    assert_eq!(ctl.action(Action::Cancel).error.as_deref(), Some("Bu talep iptal edilemez"));
    assert_eq!(ctl.status(), Some(RequestStatus::InProgress));
    assert_eq!(mock.count("/requests/42/"), 1);
}

#[tokio::test]
async fn payment_link_uses_accepted_price() {
    let backend = Backend::new("awaiting_payment");
    let mock = serve(&backend);
    let mut ctl = controller(&mock);
    ctl.refresh().await.unwrap();

    let response = ctl.send_payment_link().await.unwrap();
    assert_eq!(response.payment_url.as_deref(), Some("https://pay.test/x"));
    let call = mock
        .calls()
        .into_iter()
        .find(|c| c.url.ends_with("/resend-sms/"))
        .unwrap();
    assert_eq!(call.body, Some(json!({"price": 1500.0})));
}

#[tokio::test]
async fn payment_link_requires_awaiting_payment() {
    let backend = Backend::new("awaiting_approval");
    let mock = serve(&backend);
    let mut ctl = controller(&mock);
    ctl.refresh().await.unwrap();

    assert!(matches!(
        ctl.send_payment_link().await,
        Err(Error::InvalidState(_))
    ));
    assert_eq!(mock.count("/resend-sms/"), 0);
}

#[tokio::test]
async fn channel_key_follows_token_and_status() {
    let backend = Backend::new("pending");
    let mock = serve(&backend);
    let ctl = controller(&mock).with_tracking_token("handed-over");
    assert_eq!(ctl.channel_key().as_deref(), Some("handed-over"));

    let mut ctl = controller(&mock);
    assert_eq!(ctl.channel_key(), None);
    ctl.apply_snapshot(snapshot("pending"));
    assert_eq!(ctl.channel_key().as_deref(), Some("tok-42"));
    ctl.apply_snapshot(snapshot("completed"));
    assert_eq!(ctl.channel_key(), None);
}
