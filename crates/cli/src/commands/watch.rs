// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Live view of one request.
//!
//! The controller is refreshed once, then the request channel is kept open
//! for the tracking token while the request can still change. Every pushed
//! message goes through the controller; the loop ends when the request
//! reaches a terminal status or on interrupt. `ys create --watch` enters the
//! same loop with the token returned at creation.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::debug;
use ys_core::backoff::Backoff;
use ys_core::{Offer, RequestEvent, RequestStatus};

use crate::channel::{
    ChannelConfig, ChannelTransport, Forward, KeyedChannel, LiveChannel, WebSocketTransport,
};
use crate::cli::OutputFormat;
use crate::controller::{Action, RequestController};
use crate::display::{format_offer_line, status_label};
use crate::error::{Error, Result};
use crate::http::ApiClient;

use super::open_context;

/// How often channel connectivity is re-checked between pushes.
const CONNECTION_CHECK: Duration = Duration::from_secs(1);

pub async fn run(config: Option<&Path>, id: u64, output: OutputFormat) -> Result<()> {
    let ctx = open_context(config)?;
    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    run_impl(
        &ctx.api,
        id,
        output,
        ctx.config.request_backoff(),
        WebSocketTransport::new,
        shutdown,
    )
    .await
}

/// Internal implementation that accepts the client and channel transport
/// for testing.
pub(crate) async fn run_impl<T, F>(
    api: &Arc<ApiClient>,
    id: u64,
    output: OutputFormat,
    backoff: Backoff,
    transport: F,
    shutdown: impl Future<Output = ()>,
) -> Result<()>
where
    T: ChannelTransport + 'static,
    F: Fn() -> T + Send + 'static,
{
    let controller = RequestController::new(api.clone(), id);
    follow(controller, output, backoff, transport, shutdown).await
}

/// Follows the request `controller` points at until it settles.
///
/// Channel connectivity is reported as it changes; a failed refresh is shown
/// and the last good view is kept.
pub(crate) async fn follow<T, F>(
    mut controller: RequestController,
    output: OutputFormat,
    backoff: Backoff,
    transport: F,
    shutdown: impl Future<Output = ()>,
) -> Result<()>
where
    T: ChannelTransport + 'static,
    F: Fn() -> T + Send + 'static,
{
    let id = controller.request_id();
    controller.refresh().await?;

    let mut view = WatchView::default();
    view.emit(&controller, false, output)?;

    let is_terminal = controller.status().is_some_and(|s| s.is_terminal());
    if is_terminal {
        return Ok(());
    }
    if controller.tracking_token().is_none() {
        return Err(Error::NoTrackingToken(id));
    }

    let (tx, mut events) = mpsc::unbounded_channel();
    let urls = controller.api().clone();
    let mut channel = KeyedChannel::new(move |token: &String| {
        LiveChannel::spawn(
            ChannelConfig {
                name: "request",
                url: urls.request_channel_url(token),
                backoff: backoff.clone(),
            },
            transport(),
            Forward::<RequestEvent>::new(tx.clone()),
        )
    });
    channel.set_key(controller.channel_key());

    let mut tick = tokio::time::interval(CONNECTION_CHECK);
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tokio::pin!(shutdown);
    while controller.channel_key().is_some() {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = tick.tick() => view.emit(&controller, channel.is_connected(), output)?,
            event = events.recv() => {
                let Some(event) = event else { break };
                if let Err(e) = controller.handle_event(event).await {
                    if e.is_session_fatal() {
                        channel.close();
                        return Err(e);
                    }
                    debug!(request_id = id, error = %e, "failed to apply update");
                }
                view.emit(&controller, channel.is_connected(), output)?;
                channel.set_key(controller.channel_key());
            }
        }
    }
    channel.close();
    Ok(())
}

#[derive(Serialize)]
struct Update<'a> {
    request_id: u64,
    status: Option<RequestStatus>,
    offers: Vec<&'a Offer>,
    connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

/// What the operator has already been shown.
#[derive(Debug, Default)]
pub(crate) struct WatchView {
    status: Option<RequestStatus>,
    offers: Vec<u64>,
    error: Option<String>,
    connected: bool,
}

impl WatchView {
    /// Lines describing what changed since the last call.
    pub(crate) fn changes(&mut self, controller: &RequestController, connected: bool) -> Vec<String> {
        let mut lines = Vec::new();

        if connected != self.connected {
            lines.push(if connected {
                "live: connected".to_string()
            } else {
                "live: disconnected, reconnecting".to_string()
            });
            self.connected = connected;
        }

        let error = &controller.action(Action::Load).error;
        if error != &self.error {
            if let Some(e) = error {
                lines.push(format!("update failed: {}", e));
            }
            self.error = error.clone();
        }

        let status = controller.status();
        let status_changed = status != self.status;
        if let Some(status) = status.filter(|_| status_changed) {
            lines.push(format!("status: {} ({})", status, status_label(status)));
        }
        self.status = status;

        let book = controller.offers();
        let lowest = book.lowest().map(|o| o.id);
        for offer in book.iter().filter(|o| !self.offers.contains(&o.id)) {
            let line = format_offer_line(offer, Some(offer.id) == lowest);
            lines.push(format!("offer: {}", line.trim_start()));
        }
        let current: Vec<u64> = book.iter().map(|o| o.id).collect();
        if !status_changed {
            for id in self.offers.iter().filter(|id| !current.contains(id)) {
                lines.push(format!("offer: #{} withdrawn", id));
            }
        }
        self.offers = current;

        lines
    }

    fn emit(
        &mut self,
        controller: &RequestController,
        connected: bool,
        output: OutputFormat,
    ) -> Result<()> {
        let lines = self.changes(controller, connected);
        if lines.is_empty() {
            return Ok(());
        }
        match output {
            OutputFormat::Text => {
                for line in lines {
                    println!("{}", line);
                }
            }
            OutputFormat::Json => {
                let update = Update {
                    request_id: controller.request_id(),
                    status: controller.status(),
                    offers: controller.offers().iter().collect(),
                    connected,
                    error: controller.action(Action::Load).error.as_deref(),
                };
                println!("{}", serde_json::to_string(&update)?);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
