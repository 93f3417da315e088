// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;
use ys_core::GeolocationError;

use crate::channel::ChannelError;
use crate::http::TransportError;
use crate::session::StoreError;

/// All possible errors that can occur in the ysrs library.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not logged in\n  hint: run 'ys login' first")]
    NotLoggedIn,

    #[error("session expired, stored credentials were cleared\n  hint: run 'ys login' again")]
    SessionExpired,

    /// A 4xx/5xx response. `message` is the server's text, verbatim.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("{0}")]
    InvalidState(String),

    #[error("no tracking token for request {0}\n  hint: the request has no tracking URL yet")]
    NoTrackingToken(u64),

    #[error("no location share in progress\n  hint: start one with 'ys locate --phone <number>'")]
    NoLocationShare,

    #[error("{field} is required")]
    FieldRequired { field: &'static str },

    #[error("{}", .0.reason())]
    Geolocation(#[from] GeolocationError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("channel error: {0}")]
    Channel(#[from] ChannelError),

    #[error("credential store error: {0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Core(#[from] ys_core::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error ended the login session.
    pub fn is_session_fatal(&self) -> bool {
        matches!(self, Error::SessionExpired | Error::NotLoggedIn)
    }
}

/// A specialized Result type for ysrs operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
