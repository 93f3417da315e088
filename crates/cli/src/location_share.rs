// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Agency side of the location-share handshake.
//!
//! ```text
//!   start(phone) ──► POST /location-share/init/ ──► {token, ws_url}
//!                ──► open channel (credential-qualified ws_url)
//!                ──► POST /location-share/send-sms/
//!   customer submits ──► location_received on the channel ──► fix, channel closed
//! ```
//!
//! A token resolves at most once. After the first fix the channel is closed
//! for good; resending only repeats the SMS.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc;
use tracing::{debug, info};
use ys_core::backoff::Backoff;
use ys_core::{Location, LocationFix, LocationShareEvent, LocationShareSession};

use crate::channel::{
    ChannelConfig, ChannelError, ChannelTransport, Forward, KeyedChannel, LiveChannel,
};
use crate::error::{Error, Result};
use crate::http::ApiClient;

pub struct LocationShareHandshake {
    api: Arc<ApiClient>,
    session: Option<LocationShareSession>,
    /// Keyed by channel URL.
    channel: KeyedChannel<String>,
    /// Sender handed to the next channel. Replaced on every start so a
    /// previous share's channel cannot reach the current queue.
    sender: Arc<Mutex<mpsc::UnboundedSender<LocationShareEvent>>>,
    events: mpsc::UnboundedReceiver<LocationShareEvent>,
}

impl LocationShareHandshake {
    /// `transport` builds a fresh channel transport for every session.
    pub fn new<T, F>(api: Arc<ApiClient>, backoff: Backoff, transport: F) -> Self
    where
        T: ChannelTransport + 'static,
        F: Fn() -> T + Send + 'static,
    {
        let (tx, events) = mpsc::unbounded_channel();
        let sender = Arc::new(Mutex::new(tx));
        let next_sender = Arc::clone(&sender);
        let channel = KeyedChannel::new(move |url: &String| {
            let tx = next_sender
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone();
            LiveChannel::spawn(
                ChannelConfig {
                    name: "location",
                    url: url.clone(),
                    backoff: backoff.clone(),
                },
                transport(),
                Forward::until(tx, |e: &LocationShareEvent| e.fix().is_some()),
            )
        });
        LocationShareHandshake {
            api,
            session: None,
            channel,
            sender,
            events,
        }
    }

    pub fn session(&self) -> Option<&LocationShareSession> {
        self.session.as_ref()
    }

    /// The received fix as a pickup location.
    pub fn pickup(&self) -> Option<Location> {
        self.session
            .as_ref()
            .and_then(|s| s.fix())
            .cloned()
            .map(Location::from)
    }

    /// Starts a new share for `insured_phone`, replacing any previous one.
    pub async fn start(&mut self, insured_phone: &str) -> Result<&LocationShareSession> {
        let phone = insured_phone.trim();
        if phone.is_empty() {
            return Err(Error::FieldRequired {
                field: "insured phone",
            });
        }

        let init = self.api.init_location_share(phone).await?;
        let url = self.api.location_channel_url(&init.ws_url)?;
        info!(token = %init.token, "location share started");

        let (tx, events) = mpsc::unbounded_channel();
        *self.sender.lock().unwrap_or_else(PoisonError::into_inner) = tx;
        self.events = events;
        // The old channel feeds the old queue, so it is replaced even when the
        // backend hands out the same channel URL again.
        self.channel.set_key(None);
        self.channel.set_key(Some(url.clone()));
        self.api.send_location_sms(&init.token).await?;

        Ok(self.session.insert(LocationShareSession::new(init.token, url)))
    }

    /// Sends the customer link again for the same token. Never reopens the
    /// channel.
    pub async fn resend_sms(&self) -> Result<()> {
        let session = self.session.as_ref().ok_or(Error::NoLocationShare)?;
        self.api.send_location_sms(session.token()).await?;
        debug!(token = session.token(), "location share sms resent");
        Ok(())
    }

    /// Applies one channel message. Returns the fix if it resolved the share.
    pub fn on_event(&mut self, event: LocationShareEvent) -> Option<LocationFix> {
        let fix = event.fix()?;
        self.resolve(fix)
    }

    /// Checks the status endpoint instead of waiting for a push.
    pub async fn poll_status(&mut self) -> Result<Option<LocationFix>> {
        let session = self.session.as_ref().ok_or(Error::NoLocationShare)?;
        if let Some(fix) = session.fix() {
            return Ok(Some(fix.clone()));
        }
        let status = self.api.location_share_status(session.token()).await?;
        Ok(status.into_fix().and_then(|fix| self.resolve(fix)))
    }

    /// Waits for the fix from the channel.
    pub async fn wait_for_fix(&mut self) -> Result<LocationFix> {
        loop {
            if let Some(fix) = self.session.as_ref().and_then(|s| s.fix()) {
                return Ok(fix.clone());
            }
            if self.session.is_none() {
                return Err(Error::NoLocationShare);
            }
            let event = self
                .events
                .recv()
                .await
                .ok_or(ChannelError::ConnectionClosed)?;
            if let Some(fix) = self.on_event(event) {
                return Ok(fix);
            }
        }
    }

    fn resolve(&mut self, fix: LocationFix) -> Option<LocationFix> {
        let session = self.session.as_mut()?;
        if !session.accept(fix.clone()) {
            return None;
        }
        info!(token = session.token(), address = %fix.address, "location received");
        self.channel.finish();
        Some(fix)
    }
}

#[cfg(test)]
#[path = "location_share_tests.rs"]
mod tests;
