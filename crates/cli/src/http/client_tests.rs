// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use ys_core::{Coordinates, RequestStatus};

use super::client::ListFilter;
use super::test_helpers::*;
use super::transport::{HttpResponse, Method};
use crate::error::Error;
use crate::session::{MemoryCredentialStore, Session};

fn refreshing_backend(request: &super::HttpRequest) -> HttpResponse {
    if request.url.ends_with("/token/refresh/") {
        return respond(200, json!({"tokens": {"access_token": "a2", "refresh_token": "r2"}}));
    }
    match request.bearer.as_deref() {
        Some("a2") => respond(200, snapshot_json(42, "pending")),
        _ => respond(401, json!({"detail": "Given token not valid for any token type"})),
    }
}

#[tokio::test]
async fn login_stores_credentials() {
    let mock = Arc::new(MockHttp::new(|request| {
        assert_eq!(request.url, "http://api.test/insurance/login/");
        assert_eq!(request.body.as_ref().unwrap()["email"], "ops@anadolu.test");
        respond(
            200,
            json!({
                "company": {"id": 1, "name": "Anadolu Sigorta"},
                "tokens": {"access_token": "a1", "refresh_token": "r1", "expires_in": 3600, "token_type": "Bearer"},
                "message": "Giris basarili"
            }),
        )
    }));
    let session = Arc::new(Session::in_memory());
    let api = client(&mock, session.clone());

    let response = api.login("ops@anadolu.test", "secret").await.unwrap();
    assert_eq!(response.company.name, "Anadolu Sigorta");
    assert_eq!(session.access_token().unwrap().as_deref(), Some("a1"));
    assert_eq!(session.refresh_token().unwrap().as_deref(), Some("r1"));
    assert_eq!(session.user().unwrap().as_deref(), Some("Anadolu Sigorta"));
}

#[tokio::test]
async fn login_failure_surfaces_server_message() {
    let mock = Arc::new(MockHttp::new(|_| {
        respond(400, json!({"error": "Gecersiz e-posta veya sifre"}))
    }));
    let session = Arc::new(Session::in_memory());
    let api = client(&mock, session.clone());

    let err = api.login("ops@anadolu.test", "wrong").await.unwrap_err();
    assert_eq!(err.to_string(), "Gecersiz e-posta veya sifre");
    assert!(!session.is_logged_in().unwrap());
}

#[tokio::test]
async fn authed_call_requires_login() {
    let mock = Arc::new(MockHttp::new(|_| respond(200, json!({}))));
    let api = client(&mock, Arc::new(Session::in_memory()));

    let err = api.get_request(42).await.unwrap_err();
    assert!(matches!(err, Error::NotLoggedIn));
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn get_request_sends_bearer() {
    let mock = Arc::new(MockHttp::new(|_| respond(200, snapshot_json(42, "pending"))));
    let api = client(&mock, logged_in_session());

    let request = api.get_request(42).await.unwrap();
    assert_eq!(request.id, 42);
    assert_eq!(request.status, RequestStatus::Pending);

    let calls = mock.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, Method::Get);
    assert_eq!(calls[0].url, "http://api.test/insurance/requests/42/");
    assert_eq!(calls[0].bearer.as_deref(), Some("a1"));
}

#[tokio::test]
async fn list_requests_passes_filter() {
    let mock = Arc::new(MockHttp::new(|_| {
        respond(200, json!({"count": 0, "page": 2, "page_size": 20, "results": []}))
    }));
    let api = client(&mock, logged_in_session());
    let filter = ListFilter {
        status: Some(RequestStatus::AwaitingApproval),
        page: Some(2),
        page_size: None,
    };

    let page = api.list_requests(&filter).await.unwrap();
    assert_eq!(page.page, 2);
    let calls = mock.calls();
    assert_eq!(
        calls[0].query,
        vec![
            ("status".to_string(), "awaiting_approval".to_string()),
            ("page".to_string(), "2".to_string())
        ]
    );
}

#[tokio::test]
async fn offers_are_token_scoped_and_public() {
    let mock = Arc::new(MockHttp::new(|_| {
        respond(200, offers_json(42, vec![offer_json(7, "1500.00")]))
    }));
    let api = client(&mock, Arc::new(Session::in_memory()));

    let response = api.list_offers("tok-42").await.unwrap();
    assert_eq!(response.offers.len(), 1);
    assert_eq!(response.offers[0].estimated_price, 1500.0);

    let calls = mock.calls();
    assert_eq!(calls[0].url, "http://api.test/requests/location/tok-42/offers/");
    assert!(calls[0].bearer.is_none());
}

#[tokio::test]
async fn accept_offer_failure_is_verbatim() {
    let mock = Arc::new(MockHttp::new(|_| {
        respond(400, json!({"error": "Bu teklif artik gecerli degil"}))
    }));
    let api = client(&mock, logged_in_session());

    let err = api.accept_offer("tok-42", 7).await.unwrap_err();
    assert!(matches!(err, Error::Api { status: 400, .. }));
    assert_eq!(err.to_string(), "Bu teklif artik gecerli degil");
    assert_eq!(
        mock.calls()[0].url,
        "http://api.test/requests/location/tok-42/accept-offer/7/"
    );
}

#[tokio::test]
async fn error_without_body_falls_back_to_status() {
    let mock = Arc::new(MockHttp::new(|_| HttpResponse::new(502, "<html>bad gateway</html>")));
    let api = client(&mock, logged_in_session());

    let err = api.cancel_request(42).await.unwrap_err();
    assert_eq!(err.to_string(), "HTTP 502");
}

#[tokio::test]
async fn empty_success_body_decodes() {
    let mock = Arc::new(MockHttp::new(|_| HttpResponse::new(200, "")));
    let api = client(&mock, logged_in_session());

    let response = api.send_location_sms("share-1").await.unwrap();
    assert_eq!(response.message, "");
}

#[tokio::test]
async fn submit_location_rounds_and_skips_auth() {
    let mock = Arc::new(MockHttp::new(|_| {
        respond(200, json!({"success": true, "message": "Konum alindi"}))
    }));
    let api = client(&mock, Arc::new(Session::in_memory()));
    let coordinates = Coordinates::new(41.008237512, 28.978358799).unwrap();

    api.submit_location("share-1", coordinates).await.unwrap();

    let calls = mock.calls();
    assert_eq!(
        calls[0].url,
        "http://api.test/insurance/location-share/share-1/submit/"
    );
    assert!(calls[0].bearer.is_none());
    assert_eq!(
        calls[0].body,
        Some(json!({"latitude": 41.008238, "longitude": 28.978359}))
    );
}

#[tokio::test]
async fn channel_urls() {
    let mock = Arc::new(MockHttp::new(|_| respond(200, json!({}))));
    let api = client(&mock, logged_in_session());

    assert_eq!(
        api.request_channel_url("tok-42"),
        "ws://push.test/ws/requests/tok-42/"
    );
    assert_eq!(
        api.location_channel_url("/ws/location-share/abc/").unwrap(),
        "ws://push.test/ws/location-share/abc/?auth=a1"
    );
}

#[tokio::test]
async fn location_channel_url_requires_login() {
    let mock = Arc::new(MockHttp::new(|_| respond(200, json!({}))));
    let api = client(&mock, Arc::new(Session::in_memory()));
    assert!(matches!(
        api.location_channel_url("ws/location-share/abc/"),
        Err(Error::NotLoggedIn)
    ));
}

#[tokio::test]
async fn unauthorized_call_refreshes_and_replays() {
    let mock = Arc::new(MockHttp::new(refreshing_backend));
    let session = logged_in_session();
    let api = client(&mock, session.clone());

    let request = api.get_request(42).await.unwrap();
    assert_eq!(request.id, 42);

    let calls = mock.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0].bearer.as_deref(), Some("a1"));
    assert_eq!(calls[1].url, "http://api.test/insurance/token/refresh/");
    assert_eq!(calls[1].body, Some(json!({"refresh_token": "r1"})));
    assert_eq!(calls[2].bearer.as_deref(), Some("a2"));
    assert_eq!(session.refresh_token().unwrap().as_deref(), Some("r2"));
}

#[tokio::test]
async fn concurrent_unauthorized_calls_share_one_refresh() {
    let mock = Arc::new(MockHttp::new(refreshing_backend).with_delay(Duration::from_millis(10)));
    let api = client(&mock, logged_in_session());

    let (a, b, c) = tokio::join!(api.get_request(42), api.get_request(42), api.get_request(42));
    assert!(a.is_ok());
    assert!(b.is_ok());
    assert!(c.is_ok());

    assert_eq!(mock.count("/token/refresh/"), 1);
    let replays = mock
        .calls()
        .iter()
        .filter(|c| c.bearer.as_deref() == Some("a2"))
        .count();
    assert_eq!(replays, 3);
}

#[tokio::test]
async fn unauthorized_without_refresh_token_ends_session() {
    let mock = Arc::new(MockHttp::new(refreshing_backend));
    let store = Arc::new(MemoryCredentialStore::with_entries([
        ("access_token", "a1"),
        ("user", "Anadolu Sigorta"),
    ]));
    let session = Arc::new(Session::new(store));
    let api = client(&mock, session.clone());

    let err = api.get_request(42).await.unwrap_err();
    assert!(matches!(err, Error::SessionExpired));
    assert_eq!(mock.count("/token/refresh/"), 0);
    assert_eq!(session.access_token().unwrap(), None);
    assert_eq!(session.user().unwrap(), None);
}

#[tokio::test]
async fn rejected_refresh_ends_session() {
    let mock = Arc::new(MockHttp::new(|_| {
        respond(401, json!({"detail": "Token is invalid or expired"}))
    }));
    let session = logged_in_session();
    let api = client(&mock, session.clone());

    let err = api.get_request(42).await.unwrap_err();
    assert!(matches!(err, Error::SessionExpired));
    assert_eq!(mock.count("/token/refresh/"), 1);
    assert!(!session.is_logged_in().unwrap());
}

#[tokio::test]
async fn second_unauthorized_ends_session() {
    let mock = Arc::new(MockHttp::new(|request| {
        if request.url.ends_with("/token/refresh/") {
            respond(200, json!({"tokens": {"access_token": "a2", "refresh_token": "r2"}}))
        } else {
            respond(401, json!({"detail": "Permission denied"}))
        }
    }));
    let session = logged_in_session();
    let api = client(&mock, session.clone());

    let err = api.get_request(42).await.unwrap_err();
    assert!(matches!(err, Error::SessionExpired));
    assert_eq!(mock.calls().len(), 3);
    assert!(!session.is_logged_in().unwrap());
}
