// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Typed client for the agency and public REST APIs.
//!
//! Agency calls carry the stored access token. When one is rejected with 401
//! the client renews the credential through [`Session::refresh_after`] and
//! replays the call once with the new token. A second 401 ends the session.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use ys_core::api::{
    AcceptOfferResponse, ApiErrorBody, CancelResponse, CreateRequest, CreateRequestResponse,
    LocationShareInit, LocationShareInitResponse, LoginRequest, LoginResponse, MessageResponse,
    OffersResponse, PaymentLinkRequest, PaymentLinkResponse, RefreshRequest, RefreshResponse,
    SendLocationSms, ShareStatus, SubmitLocation, Tokens,
};
use ys_core::pricing::PricingQuestions;
use ys_core::request::{Request, RequestPage};
use ys_core::{Coordinates, RequestStatus};

use super::transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::session::Session;

/// Base addresses of the three backends the client talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub api_base: String,
    pub main_base: String,
    pub ws_base: String,
}

impl Endpoints {
    pub fn new(api_base: &str, main_base: &str, ws_base: &str) -> Self {
        Endpoints {
            api_base: api_base.trim_end_matches('/').to_string(),
            main_base: main_base.trim_end_matches('/').to_string(),
            ws_base: ws_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.api_base_url,
            &config.main_api_base_url,
            &config.ws_base_url,
        )
    }

    fn api(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    fn main(&self, path: &str) -> String {
        format!("{}{}", self.main_base, path)
    }
}

/// Filter for the request list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub status: Option<RequestStatus>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    session: Arc<Session>,
    endpoints: Endpoints,
}

impl ApiClient {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        session: Arc<Session>,
        endpoints: Endpoints,
    ) -> Self {
        ApiClient {
            transport,
            session,
            endpoints,
        }
    }

    /// Client with a `reqwest` transport configured from `config`.
    pub fn from_config(config: &Config, session: Arc<Session>) -> Result<Self> {
        let transport = ReqwestTransport::new(config.http_timeout())?;
        Ok(Self::new(
            Arc::new(transport),
            session,
            Endpoints::from_config(config),
        ))
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    // -- auth --

    /// Logs in and stores the credential pair and company name.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let request = HttpRequest::post(self.endpoints.api("/login/"), to_body(&body)?);
        let response: LoginResponse = self.public(request).await?;
        self.session
            .set_credentials(&response.tokens, Some(&response.company.name))?;
        Ok(response)
    }

    pub fn logout(&self) -> Result<()> {
        self.session.clear()
    }

    async fn refresh_tokens(&self, refresh_token: String) -> Result<Tokens> {
        let body = RefreshRequest { refresh_token };
        let request = HttpRequest::post(self.endpoints.api("/token/refresh/"), to_body(&body)?);
        let response: RefreshResponse = self.public(request).await?;
        Ok(response.tokens)
    }

    // -- requests --

    pub async fn list_requests(&self, filter: &ListFilter) -> Result<RequestPage> {
        let mut request = HttpRequest::get(self.endpoints.api("/requests/"));
        if let Some(status) = filter.status {
            request = request.query("status", status.as_str());
        }
        if let Some(page) = filter.page {
            request = request.query("page", page);
        }
        if let Some(page_size) = filter.page_size {
            request = request.query("page_size", page_size);
        }
        self.authed(request).await
    }

    pub async fn get_request(&self, id: u64) -> Result<Request> {
        let url = self.endpoints.api(&format!("/requests/{}/", id));
        self.authed(HttpRequest::get(url)).await
    }

    pub async fn create_request(&self, body: &CreateRequest) -> Result<CreateRequestResponse> {
        let url = self.endpoints.api("/requests/create/");
        self.authed(HttpRequest::post(url, to_body(body)?)).await
    }

    pub async fn cancel_request(&self, id: u64) -> Result<CancelResponse> {
        let url = self.endpoints.api(&format!("/requests/{}/cancel/", id));
        self.authed(HttpRequest::post(url, serde_json::json!({})))
            .await
    }

    // -- offers and payment --

    /// Live offers for a request. Scoped by the tracking token, no login.
    pub async fn list_offers(&self, tracking_token: &str) -> Result<OffersResponse> {
        let url = self
            .endpoints
            .main(&format!("/requests/location/{}/offers/", tracking_token));
        self.public(HttpRequest::get(url)).await
    }

    pub async fn accept_offer(
        &self,
        tracking_token: &str,
        offer_id: u64,
    ) -> Result<AcceptOfferResponse> {
        let url = self.endpoints.main(&format!(
            "/requests/location/{}/accept-offer/{}/",
            tracking_token, offer_id
        ));
        self.public(HttpRequest::post(url, serde_json::json!({})))
            .await
    }

    /// Creates a payment link for the accepted price and texts it to the
    /// insured.
    pub async fn send_payment_link(&self, id: u64, price: f64) -> Result<PaymentLinkResponse> {
        let url = self.endpoints.api(&format!("/requests/{}/resend-sms/", id));
        let body = PaymentLinkRequest { price };
        self.authed(HttpRequest::post(url, to_body(&body)?)).await
    }

    // -- location share --

    pub async fn init_location_share(&self, insured_phone: &str) -> Result<LocationShareInitResponse> {
        let url = self.endpoints.api("/location-share/init/");
        let body = LocationShareInit {
            insured_phone: insured_phone.to_string(),
        };
        self.authed(HttpRequest::post(url, to_body(&body)?)).await
    }

    pub async fn send_location_sms(&self, token: &str) -> Result<MessageResponse> {
        let url = self.endpoints.api("/location-share/send-sms/");
        let body = SendLocationSms {
            token: token.to_string(),
        };
        self.authed(HttpRequest::post(url, to_body(&body)?)).await
    }

    /// Customer-side submission. Unauthenticated.
    pub async fn submit_location(
        &self,
        token: &str,
        coordinates: Coordinates,
    ) -> Result<MessageResponse> {
        let url = self
            .endpoints
            .main(&format!("/insurance/location-share/{}/submit/", token));
        let coordinates = coordinates.rounded();
        let body = SubmitLocation {
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
        };
        self.public(HttpRequest::post(url, to_body(&body)?)).await
    }

    pub async fn location_share_status(&self, token: &str) -> Result<ShareStatus> {
        let url = self
            .endpoints
            .main(&format!("/insurance/location-share/{}/status/", token));
        self.public(HttpRequest::get(url)).await
    }

    pub async fn pricing_questions(&self) -> Result<PricingQuestions> {
        let url = self.endpoints.main("/pricing/questions/");
        self.public(HttpRequest::get(url)).await
    }

    // -- channel addresses --

    pub fn request_channel_url(&self, tracking_token: &str) -> String {
        format!("{}/ws/requests/{}/", self.endpoints.ws_base, tracking_token)
    }

    /// Credential-qualified address of a location-share channel.
    ///
    /// `ws_path` is the relative path returned by the init call.
    pub fn location_channel_url(&self, ws_path: &str) -> Result<String> {
        let access = self.session.access_token()?.ok_or(Error::NotLoggedIn)?;
        Ok(format!(
            "{}/{}?auth={}",
            self.endpoints.ws_base,
            ws_path.trim_start_matches('/'),
            access
        ))
    }

    // -- plumbing --

    async fn public<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<T> {
        debug!(method = request.method.as_str(), url = %request.url, "http call");
        let response = self.transport.send(request).await?;
        decode(response)
    }

    async fn authed<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<T> {
        let access = self.session.access_token()?.ok_or(Error::NotLoggedIn)?;
        debug!(method = request.method.as_str(), url = %request.url, "http call");
        let response = self
            .transport
            .send(request.clone().with_bearer(access.as_str()))
            .await?;
        if !response.is_unauthorized() {
            return decode(response);
        }

        debug!(url = %request.url, "access token rejected, refreshing");
        let fresh = self
            .session
            .refresh_after(&access, |refresh_token| self.refresh_tokens(refresh_token))
            .await?;
        let response = self.transport.send(request.with_bearer(fresh)).await?;
        if response.is_unauthorized() {
            warn!("renewed access token rejected, ending session");
            self.session.clear()?;
            return Err(Error::SessionExpired);
        }
        decode(response)
    }
}

fn to_body<T: Serialize>(body: &T) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(body)?)
}

/// Decodes a 2xx body, or turns any other status into [`Error::Api`] with the
/// server's own message.
fn decode<T: DeserializeOwned>(response: HttpResponse) -> Result<T> {
    if !response.is_success() {
        let message = serde_json::from_str::<ApiErrorBody>(&response.body)
            .ok()
            .and_then(|body| body.message().map(str::to_string))
            .unwrap_or_else(|| format!("HTTP {}", response.status));
        return Err(Error::Api {
            status: response.status,
            message,
        });
    }
    let body = if response.body.trim().is_empty() {
        "{}"
    } else {
        response.body.as_str()
    };
    Ok(serde_json::from_str(body)?)
}
