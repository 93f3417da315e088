// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use serde_json::json;
use ys_core::LocationFix;

use crate::channel::WebSocketTransport;
use crate::cli::OutputFormat;
use crate::display::format_fix;
use crate::error::Result;
use crate::location_share::LocationShareHandshake;

use super::{open_context, print_json};

/// How the agency learns about the customer's submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitMode {
    /// Listen on the location-share channel.
    Push,
    /// Ask the status endpoint at this interval.
    Poll(Duration),
}

pub async fn run(
    config: Option<&Path>,
    phone: &str,
    mode: WaitMode,
    output: OutputFormat,
) -> Result<()> {
    let ctx = open_context(config)?;
    let mut handshake = LocationShareHandshake::new(
        ctx.api.clone(),
        ctx.config.location_backoff(),
        WebSocketTransport::new,
    );
    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    run_impl(&mut handshake, phone, mode, output, shutdown)
        .await
        .map(|_| ())
}

/// Internal implementation that accepts the handshake for testing.
///
/// Returns the fix, or `None` when interrupted first.
pub(crate) async fn run_impl(
    handshake: &mut LocationShareHandshake,
    phone: &str,
    mode: WaitMode,
    output: OutputFormat,
    shutdown: impl Future<Output = ()>,
) -> Result<Option<LocationFix>> {
    let token = handshake.start(phone).await?.token().to_string();
    if output == OutputFormat::Text {
        println!("Location link sent to {} (token {})", phone.trim(), token);
        println!("Waiting for the customer...");
    }

    tokio::pin!(shutdown);
    let fix = match mode {
        WaitMode::Push => tokio::select! {
            _ = &mut shutdown => None,
            fix = handshake.wait_for_fix() => Some(fix?),
        },
        WaitMode::Poll(interval) => loop {
            if let Some(fix) = handshake.poll_status().await? {
                break Some(fix);
            }
            tokio::select! {
                _ = &mut shutdown => break None,
                _ = tokio::time::sleep(interval) => {}
            }
        },
    };

    match (handshake.pickup(), output) {
        (Some(pickup), OutputFormat::Json) => print_json(&json!({
            "token": token,
            "pickup": pickup,
        }))?,
        (Some(_), OutputFormat::Text) => {
            if let Some(fix) = &fix {
                println!("Location received: {}", format_fix(fix));
            }
            println!(
                "Use it with: ys create <SERVICE> --from-share {} --name <NAME> --phone {}",
                token,
                phone.trim()
            );
        }
        (None, _) => eprintln!("stopped waiting for token {}", token),
    }
    Ok(fix)
}

#[cfg(test)]
#[path = "locate_tests.rs"]
mod tests;
