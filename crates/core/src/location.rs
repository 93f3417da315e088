// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Location-share sessions.
//!
//! An operator asks a customer for their position by issuing a one-time
//! token, texting the customer a link built from it and waiting for the
//! customer's device to report back. A session resolves at most once: the
//! first fix wins and everything after it is ignored.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{Error, Result};
use crate::request::{round6, Location};

/// A WGS84 position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Validated coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(Error::InvalidCoordinate(format!(
                "latitude {latitude} is outside -90..90"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(Error::InvalidCoordinate(format!(
                "longitude {longitude} is outside -180..180"
            )));
        }
        Ok(Coordinates {
            latitude,
            longitude,
        })
    }

    pub fn rounded(&self) -> Coordinates {
        Coordinates {
            latitude: round6(self.latitude),
            longitude: round6(self.longitude),
        }
    }
}

/// A position reported by the customer, with the address the backend
/// resolved for it.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationFix {
    pub coordinates: Coordinates,
    pub address: String,
}

impl LocationFix {
    pub fn new(latitude: f64, longitude: f64, address: impl Into<String>) -> Self {
        LocationFix {
            coordinates: Coordinates {
                latitude,
                longitude,
            },
            address: address.into(),
        }
    }
}

impl From<LocationFix> for Location {
    fn from(fix: LocationFix) -> Self {
        Location::new(
            fix.address,
            fix.coordinates.latitude,
            fix.coordinates.longitude,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShareState {
    Waiting,
    /// Terminal.
    Received(LocationFix),
}

/// Client-side state of one location-share token.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationShareSession {
    token: String,
    channel_url: String,
    state: ShareState,
}

impl LocationShareSession {
    pub fn new(token: impl Into<String>, channel_url: impl Into<String>) -> Self {
        LocationShareSession {
            token: token.into(),
            channel_url: channel_url.into(),
            state: ShareState::Waiting,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Credential-qualified channel address for this token.
    pub fn channel_url(&self) -> &str {
        &self.channel_url
    }

    pub fn state(&self) -> &ShareState {
        &self.state
    }

    pub fn is_waiting(&self) -> bool {
        self.state == ShareState::Waiting
    }

    pub fn fix(&self) -> Option<&LocationFix> {
        match &self.state {
            ShareState::Received(fix) => Some(fix),
            ShareState::Waiting => None,
        }
    }

    /// Records the customer's fix. Only the first one counts; returns whether
    /// this call resolved the session.
    pub fn accept(&mut self, fix: LocationFix) -> bool {
        if !self.is_waiting() {
            return false;
        }
        self.state = ShareState::Received(fix);
        true
    }
}

/// Why the customer's device could not produce a position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("position unavailable")]
    PositionUnavailable,
    #[error("location request timed out")]
    Timeout,
    #[error("location unsupported on this device")]
    Unsupported,
    #[error("location error: {0}")]
    Other(String),
}

impl GeolocationError {
    /// Message shown to the customer. All of these are retryable.
    pub fn reason(&self) -> &'static str {
        match self {
            GeolocationError::PermissionDenied => {
                "Konum izni reddedildi. Lutfen tarayici ayarlarindan konum iznini verin."
            }
            GeolocationError::PositionUnavailable => "Konum bilgisi alinamadi.",
            GeolocationError::Timeout => "Konum istegi zaman asimina ugradi.",
            GeolocationError::Unsupported => "Tarayiciniz konum desteklemiyor",
            GeolocationError::Other(_) => "Konum alinirken hata olustu.",
        }
    }
}

#[cfg(test)]
#[path = "location_tests.rs"]
mod tests;
