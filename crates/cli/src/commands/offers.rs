// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;
use std::sync::Arc;

use ys_core::Offer;

use crate::cli::OutputFormat;
use crate::controller::RequestController;
use crate::display::{format_offers, status_label};
use crate::error::Result;
use crate::http::ApiClient;

use super::{open_context, print_json};

pub async fn run(config: Option<&Path>, id: u64, output: OutputFormat) -> Result<()> {
    let ctx = open_context(config)?;
    run_impl(&ctx.api, id, output).await
}

/// Internal implementation that accepts the client for testing.
pub(crate) async fn run_impl(api: &Arc<ApiClient>, id: u64, output: OutputFormat) -> Result<()> {
    let mut controller = RequestController::new(api.clone(), id);
    controller.refresh().await?;

    match output {
        OutputFormat::Json => {
            let offers: Vec<&Offer> = controller.offers().iter().collect();
            print_json(&offers)
        }
        OutputFormat::Text => {
            for line in render(&controller) {
                println!("{}", line);
            }
            Ok(())
        }
    }
}

pub(crate) fn render(controller: &RequestController) -> Vec<String> {
    let book = controller.offers();
    if !book.is_open() {
        let status = controller
            .status()
            .map(|s| format!("{} ({})", s, status_label(s)))
            .unwrap_or_else(|| "not loaded".to_string());
        return vec![format!(
            "Request #{} is {}; it no longer takes offers.",
            controller.request_id(),
            status
        )];
    }
    if book.is_empty() {
        return vec!["No offers yet.".to_string()];
    }
    format_offers(book)
}

#[cfg(test)]
#[path = "offers_tests.rs"]
mod tests;
