// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use crate::cli::OutputFormat;
use crate::display::format_question;
use crate::error::Result;
use crate::http::ApiClient;

use super::{open_context, print_json};

pub async fn run(config: Option<&Path>, output: OutputFormat) -> Result<()> {
    let ctx = open_context(config)?;
    run_impl(&ctx.api, output).await
}

pub(crate) async fn run_impl(api: &ApiClient, output: OutputFormat) -> Result<()> {
    let questions = api.pricing_questions().await?;
    match output {
        OutputFormat::Json => print_json(&questions),
        OutputFormat::Text => {
            if questions.questions.is_empty() {
                println!("No pricing questions.");
            }
            for question in &questions.questions {
                for line in format_question(question) {
                    println!("{}", line);
                }
            }
            println!("\nAnswer with 'ys create ... --answer QUESTION:OPTION'.");
            Ok(())
        }
    }
}
