// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;
use std::sync::Arc;

use crate::controller::RequestController;
use crate::display::{format_price, status_label};
use crate::error::Result;
use crate::http::ApiClient;

use super::open_context;

async fn load(api: &Arc<ApiClient>, id: u64) -> Result<RequestController> {
    let mut controller = RequestController::new(api.clone(), id);
    controller.refresh().await?;
    Ok(controller)
}

fn report_status(controller: &RequestController) {
    if let Some(status) = controller.status() {
        println!(
            "Request #{} is now {} ({})",
            controller.request_id(),
            status,
            status_label(status)
        );
    }
}

pub async fn cancel(config: Option<&Path>, id: u64) -> Result<()> {
    let ctx = open_context(config)?;
    cancel_impl(&ctx.api, id).await
}

/// Internal implementation that accepts the client for testing.
pub(crate) async fn cancel_impl(api: &Arc<ApiClient>, id: u64) -> Result<()> {
    let mut controller = load(api, id).await?;
    controller.cancel().await?;
    report_status(&controller);
    Ok(())
}

pub async fn accept(config: Option<&Path>, id: u64, offer_id: u64) -> Result<()> {
    let ctx = open_context(config)?;
    accept_impl(&ctx.api, id, offer_id).await
}

pub(crate) async fn accept_impl(api: &Arc<ApiClient>, id: u64, offer_id: u64) -> Result<()> {
    let mut controller = load(api, id).await?;
    controller.accept_offer(offer_id).await?;
    println!("Accepted offer #{}", offer_id);
    report_status(&controller);
    Ok(())
}

pub async fn pay_link(config: Option<&Path>, id: u64) -> Result<()> {
    let ctx = open_context(config)?;
    pay_link_impl(&ctx.api, id).await
}

pub(crate) async fn pay_link_impl(api: &Arc<ApiClient>, id: u64) -> Result<()> {
    let mut controller = load(api, id).await?;
    let response = controller.send_payment_link().await?;
    let price = controller
        .request()
        .and_then(|r| r.pricing.as_ref())
        .and_then(|p| p.amount().map(|amount| format_price(amount, &p.currency)));
    match price {
        Some(price) => println!("Payment link for {} sent to the insured", price),
        None => println!("Payment link sent to the insured"),
    }
    if let Some(url) = &response.payment_url {
        println!("  {}", url);
    }
    Ok(())
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
