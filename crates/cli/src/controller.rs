// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Request lifecycle controller.
//!
//! Folds the REST snapshot of one request and the messages pushed on its
//! channel into a single view. The status is never computed locally: every
//! state-changing event, local or pushed, is followed by a fresh snapshot
//! fetch, and a snapshot that would move the status backwards is dropped as
//! stale.

use std::sync::Arc;

use tracing::{debug, info, warn};
use ys_core::api::PaymentLinkResponse;
use ys_core::{OfferBook, Request, RequestEffect, RequestEvent, RequestStatus};

use crate::error::{Error, Result};
use crate::http::ApiClient;

/// Operations that keep their own progress and error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Load,
    Cancel,
    Accept,
    PaymentLink,
}

/// Progress and last failure of one user-triggered operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionState {
    pub in_flight: bool,
    /// Message of the last failure, cleared when the operation is retried.
    pub error: Option<String>,
}

impl ActionState {
    fn begin(&mut self) {
        self.in_flight = true;
        self.error = None;
    }

    fn finish<T>(&mut self, result: &Result<T>) {
        self.in_flight = false;
        if let Err(e) = result {
            self.error = Some(e.to_string());
        }
    }
}

pub struct RequestController {
    api: Arc<ApiClient>,
    request_id: u64,
    tracking_token: Option<String>,
    request: Option<Request>,
    offers: OfferBook,
    load: ActionState,
    cancel: ActionState,
    accept: ActionState,
    payment_link: ActionState,
}

impl RequestController {
    pub fn new(api: Arc<ApiClient>, request_id: u64) -> Self {
        RequestController {
            api,
            request_id,
            tracking_token: None,
            request: None,
            offers: OfferBook::new(),
            load: ActionState::default(),
            cancel: ActionState::default(),
            accept: ActionState::default(),
            payment_link: ActionState::default(),
        }
    }

    /// Uses the tracking token handed over at creation instead of deriving it
    /// from the snapshot.
    pub fn with_tracking_token(mut self, token: impl Into<String>) -> Self {
        self.tracking_token = Some(token.into());
        self
    }

    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    pub fn request_id(&self) -> u64 {
        self.request_id
    }

    pub fn request(&self) -> Option<&Request> {
        self.request.as_ref()
    }

    pub fn status(&self) -> Option<RequestStatus> {
        self.request.as_ref().map(|r| r.status)
    }

    pub fn tracking_token(&self) -> Option<&str> {
        self.tracking_token.as_deref()
    }

    pub fn offers(&self) -> &OfferBook {
        &self.offers
    }

    pub fn action(&self, action: Action) -> &ActionState {
        match action {
            Action::Load => &self.load,
            Action::Cancel => &self.cancel,
            Action::Accept => &self.accept,
            Action::PaymentLink => &self.payment_link,
        }
    }

    /// Key of the request channel: the tracking token, while the request can
    /// still change.
    pub fn channel_key(&self) -> Option<String> {
        match self.status() {
            Some(status) if status.is_terminal() => None,
            _ => self.tracking_token.clone(),
        }
    }

    /// Fetches the authoritative snapshot and, when the status moved into an
    /// offer-collecting phase, seeds the offer book from the offer list.
    pub async fn refresh(&mut self) -> Result<()> {
        self.load.begin();
        let result = self.api.get_request(self.request_id).await;
        let result = match result {
            Ok(snapshot) => {
                if self.apply_snapshot(snapshot) {
                    self.load_offers().await;
                }
                Ok(())
            }
            Err(e) => Err(e),
        };
        self.load.finish(&result);
        result
    }

    /// Replaces the view with `snapshot` unless it is stale.
    ///
    /// Returns whether a new offer epoch started.
    pub fn apply_snapshot(&mut self, snapshot: Request) -> bool {
        let previous = self.status();
        if let Some(current) = previous {
            if !current.may_advance_to(snapshot.status) {
                debug!(
                    request_id = self.request_id,
                    current = %current,
                    snapshot = %snapshot.status,
                    "dropping stale snapshot"
                );
                return false;
            }
        }
        if let Some(violation) = snapshot.assignment_violation() {
            warn!(request_id = self.request_id, %violation, "inconsistent snapshot");
        }
        if self.tracking_token.is_none() {
            self.tracking_token = snapshot.tracking_token();
        }

        let status = snapshot.status;
        self.request = Some(snapshot);
        if previous == Some(status) {
            return false;
        }
        info!(request_id = self.request_id, status = %status, "request status");
        self.offers.begin_epoch(status);
        self.offers.is_open()
    }

    /// Seeds the open offer book from the offer list. Failures leave the book
    /// to be filled by pushes.
    pub async fn load_offers(&mut self) {
        if !self.offers.is_open() {
            return;
        }
        let Some(token) = self.tracking_token.clone() else {
            return;
        };
        let epoch = self.offers.epoch();
        match self.api.list_offers(&token).await {
            Ok(response) if self.offers.epoch() == epoch => self.offers.seed(response.offers),
            Ok(_) => debug!(request_id = self.request_id, "offer list outlived its epoch"),
            Err(e) => warn!(request_id = self.request_id, error = %e, "failed to load offers"),
        }
    }

    /// Applies one message from the request channel.
    pub async fn handle_event(&mut self, event: RequestEvent) -> Result<()> {
        match event.effect() {
            RequestEffect::Refetch => self.refresh().await,
            RequestEffect::Upsert(offer) => {
                let id = offer.id;
                if !self.offers.upsert_from_push(offer) {
                    debug!(request_id = self.request_id, offer_id = id, "offer not added");
                }
                Ok(())
            }
            RequestEffect::Withdraw(offer_id) => {
                if self.offers.remove(offer_id).is_none() {
                    debug!(request_id = self.request_id, offer_id, "withdrawn offer unknown");
                }
                Ok(())
            }
            RequestEffect::Ignore => Ok(()),
        }
    }

    /// Cancels the request, then refetches. On failure the view is untouched.
    pub async fn cancel(&mut self) -> Result<()> {
        let status = self.loaded_status()?;
        if !status.can_cancel() {
            return Err(Error::InvalidState(format!(
                "cannot cancel a {} request",
                status
            )));
        }

        self.cancel.begin();
        let result = self.api.cancel_request(self.request_id).await.map(|_| ());
        self.cancel.finish(&result);
        result?;
        info!(request_id = self.request_id, "request cancelled");
        self.refresh().await
    }

    /// Accepts an offer. Never retried: a failure, such as the offer having
    /// been taken already, is reported with the server's message.
    pub async fn accept_offer(&mut self, offer_id: u64) -> Result<()> {
        let status = self.loaded_status()?;
        let accepting = status == RequestStatus::AwaitingApproval
            || (status == RequestStatus::Pending && !self.offers.is_empty());
        if !accepting {
            return Err(Error::InvalidState(format!(
                "cannot accept offers while the request is {}",
                status
            )));
        }
        let token = self
            .tracking_token
            .clone()
            .ok_or(Error::NoTrackingToken(self.request_id))?;

        self.accept.begin();
        let result = self.api.accept_offer(&token, offer_id).await.map(|_| ());
        self.accept.finish(&result);
        result?;
        info!(request_id = self.request_id, offer_id, "offer accepted");
        self.offers.reset();
        self.refresh().await
    }

    /// Texts the insured a payment link for the accepted price.
    pub async fn send_payment_link(&mut self) -> Result<PaymentLinkResponse> {
        let status = self.loaded_status()?;
        if status != RequestStatus::AwaitingPayment {
            return Err(Error::InvalidState(format!(
                "payment links are only sent for awaiting_payment requests, this one is {}",
                status
            )));
        }
        let price = self
            .request
            .as_ref()
            .and_then(|r| r.pricing.as_ref())
            .and_then(|p| p.amount())
            .ok_or_else(|| Error::InvalidState("request has no accepted price".to_string()))?;

        self.payment_link.begin();
        let result = self.api.send_payment_link(self.request_id, price).await;
        self.payment_link.finish(&result);
        result
    }

    fn loaded_status(&self) -> Result<RequestStatus> {
        self.status().ok_or_else(|| {
            Error::InvalidState(format!("request {} is not loaded", self.request_id))
        })
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
