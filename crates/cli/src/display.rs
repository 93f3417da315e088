// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use chrono::{DateTime, Utc};
use ys_core::api::ShareStatus;
use ys_core::pricing::PricingQuestion;
use ys_core::request::RequestSummary;
use ys_core::{LocationFix, Offer, OfferBook, Request, RequestStatus};

fn timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

/// `1500.00 TRY`
pub fn format_price(amount: f64, currency: &str) -> String {
    format!("{:.2} {}", amount, currency)
}

/// Human label for a status.
pub fn status_label(status: RequestStatus) -> &'static str {
    match status {
        RequestStatus::PendingLocation => "waiting for customer location",
        RequestStatus::Pending => "waiting for offers",
        RequestStatus::AwaitingApproval => "offers received",
        RequestStatus::AwaitingPayment => "awaiting payment",
        RequestStatus::InProgress => "in progress",
        RequestStatus::Completed => "completed",
        RequestStatus::Cancelled => "cancelled",
    }
}

/// Format a single request line for list output
pub fn format_request_line(summary: &RequestSummary) -> String {
    format!(
        "- #{} [{}] ({}) {}  {}",
        summary.request_id,
        summary.service_type,
        summary.status,
        summary.insured_name,
        timestamp(&summary.created_at)
    )
}

/// Format request details for the show command.
pub fn format_request_details(request: &Request) -> String {
    let mut output = Vec::new();

    output.push(format!("[{}] #{}", request.service_type, request.id));
    output.push(format!(
        "Status: {} ({})",
        request.status,
        status_label(request.status)
    ));
    output.push(format!("Created: {}", timestamp(&request.timeline.created_at)));
    if let Some(at) = &request.timeline.accepted_at {
        output.push(format!("Accepted: {}", timestamp(at)));
    }
    if let Some(at) = &request.timeline.completed_at {
        output.push(format!("Completed: {}", timestamp(at)));
    }

    output.push(String::new());
    output.push("Insured:".to_string());
    output.push(format!("  {} ({})", request.insured_name, request.insured_phone));
    if let Some(plate) = request.insured_plate.as_deref().filter(|p| !p.is_empty()) {
        output.push(format!("  Plate: {}", plate));
    }
    if !request.policy_number.is_empty() {
        output.push(format!("  Policy: {}", request.policy_number));
    }
    if let Some(insurer) = request.insurance_name.as_deref().filter(|n| !n.is_empty()) {
        output.push(format!("  Insurer: {}", insurer));
    }

    if let Some(pickup) = &request.pickup_location {
        output.push(String::new());
        output.push(format!(
            "Pickup: {} ({:.6}, {:.6})",
            pickup.address, pickup.latitude, pickup.longitude
        ));
    }
    if let Some(dropoff) = &request.dropoff_location {
        output.push(format!(
            "Dropoff: {} ({:.6}, {:.6})",
            dropoff.address, dropoff.latitude, dropoff.longitude
        ));
    }

    if let Some(driver) = &request.driver {
        output.push(String::new());
        output.push(format!(
            "Driver: {} {}",
            driver.name.as_deref().unwrap_or("-"),
            driver.phone.as_deref().unwrap_or("")
        ));
    }
    if let Some(pricing) = &request.pricing {
        match pricing.amount() {
            Some(amount) => {
                output.push(format!("Price: {}", format_price(amount, &pricing.currency)))
            }
            None => output.push("Price: -".to_string()),
        }
    }
    if let Some(url) = &request.tracking_url {
        output.push(format!("Tracking: {}", url));
    }

    output.join("\n").trim_end().to_string()
}

/// Format one offer. The cheapest pending offer is starred.
pub fn format_offer_line(offer: &Offer, lowest: bool) -> String {
    let marker = if lowest { "*" } else { " " };
    let mut line = format!(
        "{} #{} {}  {}",
        marker,
        offer.id,
        format_price(offer.estimated_price, "TRY"),
        offer.driver_info.name
    );
    if let Some(rating) = offer.driver_info.average_rating {
        line.push_str(&format!(
            " ({:.1}, {} ratings)",
            rating, offer.driver_info.total_ratings
        ));
    }
    if let Some(vehicle) = &offer.vehicle_info {
        line.push_str(&format!("  {}", vehicle.label()));
    }
    if !offer.is_pending() {
        line.push_str(&format!("  [{}]", offer.status));
    }
    line
}

/// Offers in arrival order, with the lowest price starred.
pub fn format_offers(book: &OfferBook) -> Vec<String> {
    let lowest = book.lowest().map(|o| o.id);
    book.iter()
        .map(|offer| format_offer_line(offer, Some(offer.id) == lowest))
        .collect()
}

pub fn format_fix(fix: &LocationFix) -> String {
    let coordinates = format!(
        "{:.6}, {:.6}",
        fix.coordinates.latitude, fix.coordinates.longitude
    );
    if fix.address.is_empty() {
        coordinates
    } else {
        format!("{} ({})", fix.address, coordinates)
    }
}

pub fn format_share_status(token: &str, status: &ShareStatus) -> String {
    if status.is_used {
        format!("{}: location received", token)
    } else {
        format!("{}: waiting for the customer", token)
    }
}

/// Format a pricing question with its numbered options.
///
/// ```text
/// 3. Is the vehicle drivable? (yes/no)
///      7) Yes
///      8) No
/// ```
pub fn format_question(question: &PricingQuestion) -> Vec<String> {
    let kind = match question.question_type {
        ys_core::pricing::QuestionType::SingleChoice => "pick one",
        ys_core::pricing::QuestionType::MultipleChoice => "pick any",
        ys_core::pricing::QuestionType::Boolean => "yes/no",
    };
    let mut lines = vec![format!("{}. {} ({})", question.id, question.text, kind)];
    for option in &question.options {
        lines.push(format!("     {}) {}", option.id, option.text));
    }
    lines
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
