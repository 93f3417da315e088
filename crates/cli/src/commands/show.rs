// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use crate::cli::OutputFormat;
use crate::display::format_request_details;
use crate::error::Result;
use crate::http::ApiClient;

use super::{open_context, print_json};

pub async fn run(config: Option<&Path>, id: u64, output: OutputFormat) -> Result<()> {
    let ctx = open_context(config)?;
    run_impl(&ctx.api, id, output).await
}

/// Internal implementation that accepts the client for testing.
pub(crate) async fn run_impl(api: &ApiClient, id: u64, output: OutputFormat) -> Result<()> {
    let request = api.get_request(id).await?;
    if let Some(violation) = request.assignment_violation() {
        tracing::warn!(request_id = id, "{}", violation);
    }
    match output {
        OutputFormat::Json => print_json(&request),
        OutputFormat::Text => {
            println!("{}", format_request_details(&request));
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "show_tests.rs"]
mod tests;
