// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Customer side of a location share: acquire a position and submit it.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tracing::info;
use ys_core::api::MessageResponse;
use ys_core::{Coordinates, GeolocationError};

use crate::error::Result;
use crate::http::ApiClient;

pub type GeolocationResult = std::result::Result<Coordinates, GeolocationError>;

/// Source of the device position.
pub trait Geolocator: Send + Sync {
    fn locate(&self) -> Pin<Box<dyn Future<Output = GeolocationResult> + Send + '_>>;
}

/// Geolocator that reports a position known up front, e.g. from the command
/// line.
pub struct FixedGeolocator {
    result: GeolocationResult,
}

impl FixedGeolocator {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        let result = Coordinates::new(latitude, longitude)
            .map_err(|e| GeolocationError::Other(e.to_string()));
        FixedGeolocator { result }
    }

    pub fn failing(error: GeolocationError) -> Self {
        FixedGeolocator { result: Err(error) }
    }
}

impl Geolocator for FixedGeolocator {
    fn locate(&self) -> Pin<Box<dyn Future<Output = GeolocationResult> + Send + '_>> {
        let result = self.result.clone();
        Box::pin(async move { result })
    }
}

/// Acquires a position, giving up after `timeout`.
pub async fn acquire(geolocator: &dyn Geolocator, timeout: Duration) -> GeolocationResult {
    tokio::time::timeout(timeout, geolocator.locate())
        .await
        .unwrap_or(Err(GeolocationError::Timeout))
}

/// Acquires the position and submits it for `token`. Safe to call again after
/// any failure.
pub async fn share_location(
    api: &ApiClient,
    token: &str,
    geolocator: &dyn Geolocator,
    timeout: Duration,
) -> Result<MessageResponse> {
    let coordinates = acquire(geolocator, timeout).await?;
    let response = api.submit_location(token, coordinates).await?;
    info!(token, "location submitted");
    Ok(response)
}

#[cfg(test)]
#[path = "customer_tests.rs"]
mod tests;
