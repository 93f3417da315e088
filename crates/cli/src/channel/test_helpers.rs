// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Scripted channel transport for tests.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;

use super::transport::{ChannelError, ChannelResult, ChannelTransport};

/// Outcome of one connect attempt.
pub(crate) enum Attempt {
    Fail,
    /// Deliver the frames, then close from the server side.
    Open(Vec<String>),
    /// Deliver the frames, then stay open.
    Hold(Vec<String>),
}

/// Connect attempts seen by a [`MockChannel`].
#[derive(Clone, Default)]
pub(crate) struct ConnectLog {
    entries: Arc<Mutex<Vec<(Instant, String)>>>,
}

impl ConnectLog {
    pub(crate) fn count(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Whole seconds from `start` to each attempt.
    pub(crate) fn offsets(&self, start: Instant) -> Vec<u64> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .map(|(at, _)| at.duration_since(start).as_secs())
            .collect()
    }

    pub(crate) fn urls(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .map(|(_, url)| url.clone())
            .collect()
    }
}

/// Channel transport driven by a script of attempts. Once the script runs out
/// every further attempt holds an idle connection.
pub(crate) struct MockChannel {
    script: VecDeque<Attempt>,
    log: ConnectLog,
    frames: VecDeque<String>,
    hold: bool,
    close_delay: Duration,
}

impl MockChannel {
    pub(crate) fn new(script: Vec<Attempt>) -> (Self, ConnectLog) {
        let log = ConnectLog::default();
        (Self::with_log(script, log.clone()), log)
    }

    /// Channel that records into an existing log.
    pub(crate) fn with_log(script: Vec<Attempt>, log: ConnectLog) -> Self {
        MockChannel {
            script: script.into(),
            log,
            frames: VecDeque::new(),
            hold: false,
            close_delay: Duration::ZERO,
        }
    }

    /// Makes `close` take `delay`, like a close handshake over the network.
    pub(crate) fn with_close_delay(mut self, delay: Duration) -> Self {
        self.close_delay = delay;
        self
    }
}

impl ChannelTransport for MockChannel {
    fn connect(
        &mut self,
        url: &str,
    ) -> Pin<Box<dyn Future<Output = ChannelResult<()>> + Send + '_>> {
        let url = url.to_string();
        Box::pin(async move {
            self.log
                .entries
                .lock()
                .unwrap()
                .push((Instant::now(), url));
            match self.script.pop_front().unwrap_or(Attempt::Hold(Vec::new())) {
                Attempt::Fail => Err(ChannelError::ConnectionFailed("refused".into())),
                Attempt::Open(frames) => {
                    self.frames = frames.into();
                    self.hold = false;
                    Ok(())
                }
                Attempt::Hold(frames) => {
                    self.frames = frames.into();
                    self.hold = true;
                    Ok(())
                }
            }
        })
    }

    fn recv(&mut self) -> Pin<Box<dyn Future<Output = ChannelResult<Option<String>>> + Send + '_>> {
        Box::pin(async move {
            if let Some(frame) = self.frames.pop_front() {
                return Ok(Some(frame));
            }
            if self.hold {
                std::future::pending::<()>().await;
            }
            Ok(None)
        })
    }

    fn close(&mut self) -> Pin<Box<dyn Future<Output = ChannelResult<()>> + Send + '_>> {
        Box::pin(async move {
            self.frames.clear();
            if !self.close_delay.is_zero() {
                tokio::time::sleep(self.close_delay).await;
            }
            Ok(())
        })
    }
}
