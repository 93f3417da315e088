// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;
use std::time::Duration;

use crate::customer::{share_location, FixedGeolocator, Geolocator};
use crate::error::Result;
use crate::http::ApiClient;

use super::open_context;

pub async fn run(config: Option<&Path>, token: &str, latitude: f64, longitude: f64) -> Result<()> {
    let ctx = open_context(config)?;
    let geolocator = FixedGeolocator::new(latitude, longitude);
    run_impl(
        &ctx.api,
        token,
        &geolocator,
        ctx.config.geolocation_timeout(),
    )
    .await
}

/// Internal implementation that accepts the client and position source for
/// testing.
pub(crate) async fn run_impl(
    api: &ApiClient,
    token: &str,
    geolocator: &dyn Geolocator,
    timeout: Duration,
) -> Result<()> {
    let response = share_location(api, token.trim(), geolocator, timeout).await?;
    if response.message.is_empty() {
        println!("Location shared");
    } else {
        println!("{}", response.message);
    }
    Ok(())
}

#[cfg(test)]
#[path = "share_tests.rs"]
mod tests;
