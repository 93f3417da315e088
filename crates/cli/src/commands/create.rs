// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use tracing::warn;
use ys_core::api::{CreateRequestResponse, RequestDraft};
use ys_core::pricing::{PricingQuestion, QuestionAnswer, QuestionAnswers};
use ys_core::{Location, ServiceDetails};

use crate::channel::WebSocketTransport;
use crate::cli::{CreateArgs, OutputFormat};
use crate::controller::RequestController;
use crate::error::{Error, Result};
use crate::http::ApiClient;

use super::{open_context, print_json, watch};

pub async fn run(config: Option<&Path>, args: CreateArgs) -> Result<()> {
    let ctx = open_context(config)?;
    let created = run_impl(&ctx.api, &args).await?;
    if !args.watch {
        return Ok(());
    }
    let controller = RequestController::new(ctx.api.clone(), created.request_id)
        .with_tracking_token(created.tracking_token);
    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    watch::follow(
        controller,
        args.output,
        ctx.config.request_backoff(),
        WebSocketTransport::new,
        shutdown,
    )
    .await
}

/// Internal implementation that accepts the client for testing.
pub(crate) async fn run_impl(
    api: &ApiClient,
    args: &CreateArgs,
) -> Result<CreateRequestResponse> {
    let questions = if args.answers.is_empty() {
        Vec::new()
    } else {
        api.pricing_questions().await?.questions
    };
    let mut draft = build_draft(args, &questions)?;
    if let Some(token) = &args.from_share {
        draft.pickup = Some(shared_pickup(api, token).await?);
    }
    let body = draft.build()?;
    let created = api.create_request(&body).await?;

    match args.output {
        OutputFormat::Json => print_json(&created)?,
        OutputFormat::Text => {
            println!("Created request #{} ({})", created.request_id, created.status);
            if let Some(url) = &created.tracking_url {
                println!("Tracking: {}", url);
            }
        }
    }
    Ok(created)
}

/// The location the customer submitted through the share link for `token`.
async fn shared_pickup(api: &ApiClient, token: &str) -> Result<Location> {
    let status = api.location_share_status(token).await?;
    status.into_fix().map(Location::from).ok_or_else(|| {
        Error::InvalidState(format!(
            "customer has not shared a location for {} yet\n  hint: wait with 'ys locate' or pass --pickup",
            token
        ))
    })
}

/// Collects the command line into a draft. `questions` is the published
/// questionnaire; it is only consulted for `--answer` selections.
pub(crate) fn build_draft(args: &CreateArgs, questions: &[PricingQuestion]) -> Result<RequestDraft> {
    let mut draft = RequestDraft::new(args.service);
    draft.insured_name = args.name.clone();
    draft.insured_phone = args.phone.clone();
    draft.insured_plate = args.plate.clone();
    draft.policy_number = args.policy.clone();
    draft.insurance_name = args.insurer.clone();
    if let (Some(address), Some(lat), Some(lng)) = (&args.pickup, args.pickup_lat, args.pickup_lng) {
        draft.pickup = Some(Location::new(address.clone(), lat, lng));
    }
    if let Some(address) = &args.dropoff {
        if !args.service.needs_dropoff() {
            warn!(service = %args.service, "dropoff is ignored for this service");
        }
        draft.dropoff = Some(Location::new(
            address.clone(),
            args.dropoff_lat.unwrap_or_default(),
            args.dropoff_lng.unwrap_or_default(),
        ));
    }
    draft.estimated_km = args.km;

    let mut answers = Vec::new();
    if let Some(raw) = &args.details {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        let (details, embedded) = ServiceDetails::from_value(args.service, value)?;
        draft.details = details;
        answers = embedded;
    }

    let selected = select_answers(&args.answers, questions)?;
    answers.retain(|a| selected.iter().all(|s| s.question_id != a.question_id));
    answers.extend(selected);
    answers.sort_by_key(|a| a.question_id);
    draft.answers = answers;

    Ok(draft)
}

/// Applies `(question, option)` picks in order, the way clicking through
/// the questionnaire would.
fn select_answers(
    picks: &[(u64, u64)],
    questions: &[PricingQuestion],
) -> Result<Vec<QuestionAnswer>> {
    let mut answers = QuestionAnswers::new();
    for &(question_id, option_id) in picks {
        let question = questions
            .iter()
            .find(|q| q.id == question_id)
            .ok_or_else(|| {
                Error::InvalidState(format!(
                    "unknown pricing question {}\n  hint: list them with 'ys questions'",
                    question_id
                ))
            })?;
        if !question.options.iter().any(|o| o.id == option_id) {
            return Err(Error::InvalidState(format!(
                "question {} has no option {}",
                question_id, option_id
            )));
        }
        answers.select(question_id, option_id, question.question_type);
    }
    Ok(answers.to_answers())
}

#[cfg(test)]
#[path = "create_tests.rs"]
mod tests;
