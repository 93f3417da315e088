// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;
use ys_core::backoff::REQUEST_CHANNEL_MAX_DELAY;

use super::*;
use crate::channel::test_helpers::{Attempt, ConnectLog, MockChannel};
use crate::commands::testing::TestContext;
use crate::http::test_helpers::{offers_json, push_offer_json, respond, snapshot_json};

fn backoff() -> Backoff {
    Backoff::new(Duration::from_secs(1), REQUEST_CHANNEL_MAX_DELAY)
}

/// Backend that reports `statuses[n]` on the n-th snapshot fetch, repeating
/// the last one.
fn backend(statuses: &'static [&'static str]) -> TestContext {
    let fetches = Mutex::new(0usize);
    TestContext::new(move |req| {
        if req.url.ends_with("/offers/") {
            return respond(200, offers_json(42, vec![]));
        }
        let mut n = fetches.lock().unwrap();
        let status = statuses[(*n).min(statuses.len() - 1)];
        *n += 1;
        respond(200, snapshot_json(42, status))
    })
}

fn channel(frames: Vec<String>, log: &ConnectLog) -> impl Fn() -> MockChannel + Send + 'static {
    let log = log.clone();
    move || MockChannel::with_log(vec![Attempt::Hold(frames.clone())], log.clone())
}

#[tokio::test]
async fn follows_pushes_until_completion() {
    let ctx = backend(&["pending", "pending", "completed"]);
    let log = ConnectLog::default();
    let frames = vec![
        json!({"type": "connection_established"}).to_string(),
        json!({"type": "new_offer", "offer": push_offer_json(5, "1500.00")}).to_string(),
        json!({"type": "request_completed"}).to_string(),
    ];

    tokio::time::timeout(
        Duration::from_secs(5),
        run_impl(
            &ctx.api,
            42,
            OutputFormat::Text,
            backoff(),
            channel(frames, &log),
            std::future::pending(),
        ),
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(ctx.mock.count("/insurance/requests/42/"), 3);
    assert_eq!(log.urls(), vec!["ws://push.test/ws/requests/tok-42/"]);
}

#[tokio::test]
async fn terminal_request_opens_no_channel() {
    let ctx = backend(&["cancelled"]);
    let log = ConnectLog::default();

    run_impl(
        &ctx.api,
        42,
        OutputFormat::Json,
        backoff(),
        channel(Vec::new(), &log),
        std::future::pending(),
    )
    .await
    .unwrap();

    assert_eq!(log.count(), 0);
}

#[tokio::test]
async fn interrupt_stops_watching() {
    let ctx = backend(&["pending"]);
    let log = ConnectLog::default();

    tokio::time::timeout(
        Duration::from_secs(5),
        run_impl(
            &ctx.api,
            42,
            OutputFormat::Text,
            backoff(),
            channel(Vec::new(), &log),
            async {},
        ),
    )
    .await
    .unwrap()
    .unwrap();
}

#[tokio::test]
async fn missing_tracking_url_is_an_error() {
    let ctx = TestContext::new(|_| {
        let mut snapshot = snapshot_json(42, "pending");
        snapshot["tracking_url"] = serde_json::Value::Null;
        respond(200, snapshot)
    });
    let log = ConnectLog::default();

    let err = run_impl(
        &ctx.api,
        42,
        OutputFormat::Text,
        backoff(),
        channel(Vec::new(), &log),
        std::future::pending(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, Error::NoTrackingToken(42)));
}

#[tokio::test]
async fn view_reports_each_change_once() {
    let ctx = backend(&["pending", "in_progress"]);
    let mut controller = RequestController::new(ctx.api.clone(), 42);
    let mut view = WatchView::default();

    controller.refresh().await.unwrap();
    assert_eq!(
        view.changes(&controller, false),
        vec!["status: pending (waiting for offers)"]
    );
    assert!(view.changes(&controller, false).is_empty());

    let push = json!({"type": "new_offer", "offer": push_offer_json(5, "900")});
    controller
        .handle_event(serde_json::from_value(push).unwrap())
        .await
        .unwrap();
    assert_eq!(
        view.changes(&controller, false),
        vec!["offer: * #5 900.00 TRY  Ali Veli  Ford Cargo - 34ABC123"]
    );

    let withdrawn = json!({"type": "offer_withdrawn", "offer_id": 5});
    controller
        .handle_event(serde_json::from_value(withdrawn).unwrap())
        .await
        .unwrap();
    assert_eq!(view.changes(&controller, false), vec!["offer: #5 withdrawn"]);

    controller.refresh().await.unwrap();
    assert_eq!(
        view.changes(&controller, false),
        vec!["status: in_progress (in progress)"]
    );
}

#[tokio::test]
async fn status_change_does_not_list_discarded_offers() {
    let ctx = backend(&["pending", "awaiting_payment"]);
    let mut controller = RequestController::new(ctx.api.clone(), 42);
    let mut view = WatchView::default();
    controller.refresh().await.unwrap();
    let push = json!({"type": "new_offer", "offer": push_offer_json(5, "900")});
    controller
        .handle_event(serde_json::from_value(push).unwrap())
        .await
        .unwrap();
    view.changes(&controller, false);

    controller.refresh().await.unwrap();

    assert_eq!(
        view.changes(&controller, false),
        vec!["status: awaiting_payment (awaiting payment)"]
    );
}

#[tokio::test]
async fn view_reports_connection_and_update_errors() {
    let fetches = Mutex::new(0usize);
    let ctx = TestContext::new(move |req| {
        if req.url.ends_with("/offers/") {
            return respond(200, offers_json(42, vec![]));
        }
        let mut n = fetches.lock().unwrap();
        *n += 1;
        match *n {
            2 => respond(500, json!({"detail": "Sunucu hatasi"})),
            _ => respond(200, snapshot_json(42, "pending")),
        }
    });
    let mut controller = RequestController::new(ctx.api.clone(), 42);
    let mut view = WatchView::default();
    controller.refresh().await.unwrap();
    view.changes(&controller, false);

    assert_eq!(view.changes(&controller, true), vec!["live: connected"]);

    controller.refresh().await.unwrap_err();
    assert_eq!(
        view.changes(&controller, true),
        vec!["update failed: Sunucu hatasi"]
    );
    assert!(view.changes(&controller, true).is_empty());
    assert_eq!(controller.status(), Some(RequestStatus::Pending));

    controller.refresh().await.unwrap();
    assert_eq!(
        view.changes(&controller, false),
        vec!["live: disconnected, reconnecting"]
    );
}

#[tokio::test]
async fn follows_handed_over_token() {
    let ctx = TestContext::new(|req| {
        if req.url.ends_with("/offers/") {
            return respond(200, offers_json(42, vec![]));
        }
        let mut snapshot = snapshot_json(42, "pending");
        snapshot["tracking_url"] = serde_json::Value::Null;
        respond(200, snapshot)
    });
    let log = ConnectLog::default();
    let controller = RequestController::new(ctx.api.clone(), 42).with_tracking_token("tok-new");

    tokio::time::timeout(
        Duration::from_secs(5),
        follow(
            controller,
            OutputFormat::Json,
            backoff(),
            channel(Vec::new(), &log),
            async {
                tokio::time::sleep(Duration::from_millis(200)).await;
            },
        ),
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(log.urls(), vec!["ws://push.test/ws/requests/tok-new/"]);
}
