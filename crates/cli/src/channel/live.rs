// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Reconnecting push channel.
//!
//! A [`LiveChannel`] runs in a background task: it connects, decodes every
//! text frame into the handler's message type and reconnects with capped
//! exponential backoff whenever the connection fails or drops. It stops for
//! good when its handle is closed or dropped, or when the handler reports
//! [`Flow::Done`].

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use ys_core::backoff::Backoff;

use super::transport::ChannelTransport;

/// Where a channel task is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not connected; waiting to retry, or stopped.
    Idle,
    Connecting,
    Open,
    /// Stopped after a final message. Never reconnects.
    Finished,
}

impl ConnectionState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => ConnectionState::Connecting,
            2 => ConnectionState::Open,
            3 => ConnectionState::Finished,
            _ => ConnectionState::Idle,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            ConnectionState::Idle => 0,
            ConnectionState::Connecting => 1,
            ConnectionState::Open => 2,
            ConnectionState::Finished => 3,
        }
    }
}

/// State cell written by the channel task, read through its handle.
#[derive(Default)]
struct StateCell(AtomicU8);

impl StateCell {
    fn get(&self) -> ConnectionState {
        ConnectionState::from_u8(self.0.load(Ordering::Acquire))
    }

    fn set(&self, state: ConnectionState) {
        self.0.store(state.as_u8(), Ordering::Release);
    }
}

/// What the channel does after a message was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Close the channel and never reconnect.
    Done,
}

pub trait ChannelHandler: Send + 'static {
    type Message: DeserializeOwned + Send;

    fn handle(&mut self, message: Self::Message) -> Flow;
}

/// Handler that forwards every decoded message to a queue.
///
/// `is_final` marks the message after which the channel is done.
pub struct Forward<M> {
    tx: mpsc::UnboundedSender<M>,
    is_final: fn(&M) -> bool,
}

impl<M> Forward<M> {
    /// Forward until the receiver goes away.
    pub fn new(tx: mpsc::UnboundedSender<M>) -> Self {
        Forward {
            tx,
            is_final: |_| false,
        }
    }

    /// Forward until the first message matching `is_final`.
    pub fn until(tx: mpsc::UnboundedSender<M>, is_final: fn(&M) -> bool) -> Self {
        Forward { tx, is_final }
    }
}

impl<M: DeserializeOwned + Send + 'static> ChannelHandler for Forward<M> {
    type Message = M;

    fn handle(&mut self, message: M) -> Flow {
        let done = (self.is_final)(&message);
        if self.tx.send(message).is_err() || done {
            Flow::Done
        } else {
            Flow::Continue
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Short label for logs, e.g. `request`.
    pub name: &'static str,
    pub url: String,
    pub backoff: Backoff,
}

/// Why a channel task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelExit {
    Cancelled,
    Finished,
}

pub struct LiveChannel;

impl LiveChannel {
    /// Starts the channel task.
    pub fn spawn<T, H>(config: ChannelConfig, transport: T, handler: H) -> ChannelHandle
    where
        T: ChannelTransport + 'static,
        H: ChannelHandler,
    {
        let state = Arc::new(StateCell::default());
        let cancel = CancellationToken::new();
        let task = tokio::spawn(run(
            config,
            transport,
            handler,
            Arc::clone(&state),
            cancel.clone(),
        ));
        ChannelHandle {
            state,
            cancel,
            task: Some(task),
        }
    }
}

/// Owner of a running channel. Dropping the handle stops the channel.
pub struct ChannelHandle {
    state: Arc<StateCell>,
    cancel: CancellationToken,
    task: Option<JoinHandle<ChannelExit>>,
}

impl ChannelHandle {
    pub fn state(&self) -> ConnectionState {
        self.state.get()
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Open
    }

    pub fn is_finished(&self) -> bool {
        self.state() == ConnectionState::Finished
    }

    pub fn close(&self) {
        self.cancel.cancel();
    }

    /// Waits for the channel task to end.
    pub async fn join(mut self) -> ChannelExit {
        match self.task.take() {
            Some(task) => task.await.unwrap_or(ChannelExit::Cancelled),
            None => ChannelExit::Cancelled,
        }
    }
}

impl Drop for ChannelHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

enum Pump {
    Cancelled,
    Finished,
    Dropped(String),
}

async fn run<T, H>(
    config: ChannelConfig,
    mut transport: T,
    mut handler: H,
    state: Arc<StateCell>,
    cancel: CancellationToken,
) -> ChannelExit
where
    T: ChannelTransport,
    H: ChannelHandler,
{
    let name = config.name;
    let mut backoff = config.backoff;
    let mut attempt = 0u32;

    loop {
        attempt = attempt.saturating_add(1);
        state.set(ConnectionState::Connecting);

        let connected = tokio::select! {
            _ = cancel.cancelled() => {
                state.set(ConnectionState::Idle);
                return ChannelExit::Cancelled;
            }
            result = transport.connect(&config.url) => result,
        };

        match connected {
            Ok(()) => {
                state.set(ConnectionState::Open);
                attempt = 0;
                backoff.reset();
                info!(channel = name, "channel open");

                match pump(name, &mut transport, &mut handler, &cancel).await {
                    Pump::Cancelled => {
                        let _ = transport.close().await;
                        state.set(ConnectionState::Idle);
                        return ChannelExit::Cancelled;
                    }
                    Pump::Finished => {
                        state.set(ConnectionState::Finished);
                        let _ = transport.close().await;
                        info!(channel = name, "channel finished");
                        return ChannelExit::Finished;
                    }
                    Pump::Dropped(reason) => {
                        state.set(ConnectionState::Idle);
                        warn!(channel = name, reason = %reason, "channel dropped");
                    }
                }
            }
            Err(e) => {
                warn!(channel = name, attempt, error = %e, "channel connect failed");
            }
        }

        let delay = backoff.next_delay();
        debug!(channel = name, delay_ms = delay.as_millis() as u64, "reconnecting");
        tokio::select! {
            _ = cancel.cancelled() => {
                state.set(ConnectionState::Idle);
                return ChannelExit::Cancelled;
            }
            _ = tokio::time::sleep(delay) => {}
        }
    }
}

async fn pump<T, H>(
    name: &'static str,
    transport: &mut T,
    handler: &mut H,
    cancel: &CancellationToken,
) -> Pump
where
    T: ChannelTransport,
    H: ChannelHandler,
{
    loop {
        let received = tokio::select! {
            _ = cancel.cancelled() => return Pump::Cancelled,
            result = transport.recv() => result,
        };

        match received {
            Ok(Some(text)) => match serde_json::from_str::<H::Message>(&text) {
                Ok(message) => {
                    if handler.handle(message) == Flow::Done {
                        return Pump::Finished;
                    }
                }
                Err(e) => debug!(channel = name, error = %e, "dropping malformed message"),
            },
            Ok(None) => return Pump::Dropped("closed by peer".to_string()),
            Err(e) => return Pump::Dropped(e.to_string()),
        }
    }
}
