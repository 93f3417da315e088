// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Push channels from the backend.
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ KeyedChannel│────►│ LiveChannel │────►│  Transport  │◄──── backend push
//! │  (identity) │     │  (backoff)  │     │   (trait)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                            │
//!                            ▼
//!                     ChannelHandler (decoded messages)
//! ```
//!
//! Two channels use this: the per-request channel, keyed by tracking token
//! and capped at 30 s between retries, and the single-shot location-share
//! channel, capped at 15 s and finished by the first fix.

mod keyed;
mod live;
mod transport;

pub use keyed::KeyedChannel;
pub use live::{
    ChannelConfig, ChannelExit, ChannelHandle, ChannelHandler, ConnectionState, Flow, Forward,
    LiveChannel,
};
pub use transport::{ChannelError, ChannelResult, ChannelTransport, WebSocketTransport};

#[cfg(test)]
pub(crate) mod test_helpers;
