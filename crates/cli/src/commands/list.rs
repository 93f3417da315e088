// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use ys_core::request::RequestPage;

use crate::cli::OutputFormat;
use crate::display::format_request_line;
use crate::error::Result;
use crate::http::{ApiClient, ListFilter};

use super::{open_context, print_json};

pub async fn run(config: Option<&Path>, filter: ListFilter, output: OutputFormat) -> Result<()> {
    let ctx = open_context(config)?;
    run_impl(&ctx.api, &filter, output).await
}

/// Internal implementation that accepts the client for testing.
pub(crate) async fn run_impl(
    api: &ApiClient,
    filter: &ListFilter,
    output: OutputFormat,
) -> Result<()> {
    let page = api.list_requests(filter).await?;
    match output {
        OutputFormat::Json => print_json(&page),
        OutputFormat::Text => {
            for line in render(&page) {
                println!("{}", line);
            }
            Ok(())
        }
    }
}

pub(crate) fn render(page: &RequestPage) -> Vec<String> {
    if page.results.is_empty() {
        return vec!["No requests found.".to_string()];
    }
    let mut lines: Vec<String> = page.results.iter().map(format_request_line).collect();
    let shown = u64::from(page.page.saturating_sub(1)) * u64::from(page.page_size)
        + page.results.len() as u64;
    if shown < page.count {
        lines.push(format!(
            "\nPage {} ({} of {} requests). Use --page {} for more.",
            page.page,
            shown,
            page.count,
            page.page + 1
        ));
    }
    lines
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
