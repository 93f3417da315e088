// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! REST request and response bodies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::details::ServiceDetails;
use crate::error::{Error, Result};
use crate::location::LocationFix;
use crate::offer::Offer;
use crate::pricing::QuestionAnswer;
use crate::request::{Location, RequestStatus, ServiceType};

/// `location_method` for requests whose pickup was entered by the operator.
pub const LOCATION_METHOD_MANUAL: &str = "manual";

/// A request as collected from the operator, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDraft {
    pub service_type: ServiceType,
    pub insured_name: String,
    pub insured_phone: String,
    pub insured_plate: Option<String>,
    pub policy_number: Option<String>,
    pub insurance_name: Option<String>,
    pub pickup: Option<Location>,
    pub dropoff: Option<Location>,
    /// Kilometres between pickup and dropoff, if known.
    pub estimated_km: Option<u32>,
    pub details: ServiceDetails,
    pub answers: Vec<QuestionAnswer>,
}

impl RequestDraft {
    /// An empty draft with default details for `service_type`.
    pub fn new(service_type: ServiceType) -> Self {
        RequestDraft {
            service_type,
            insured_name: String::new(),
            insured_phone: String::new(),
            insured_plate: None,
            policy_number: None,
            insurance_name: None,
            pickup: None,
            dropoff: None,
            estimated_km: None,
            details: ServiceDetails::empty(service_type),
            answers: Vec::new(),
        }
    }

    /// Validates the draft and builds the `POST /requests/create/` body.
    ///
    /// Dropoff and distance are only sent for service types that need a
    /// dropoff. Coordinates are rounded to 6 decimal places.
    pub fn build(&self) -> Result<CreateRequest> {
        if self.insured_name.trim().is_empty() {
            return Err(Error::MissingField("insured_name"));
        }
        if self.insured_phone.trim().is_empty() {
            return Err(Error::MissingField("insured_phone"));
        }
        let pickup = match &self.pickup {
            Some(p) if !p.address.trim().is_empty() && p.has_coordinates() => p.rounded(),
            _ => return Err(Error::MissingField("pickup_location")),
        };
        if self.details.service_type() != self.service_type {
            return Err(Error::DetailsMismatch {
                expected: self.service_type.to_string(),
                found: self.details.service_type().to_string(),
            });
        }
        self.details.validate()?;

        let needs_dropoff = self.service_type.needs_dropoff();
        let dropoff = self
            .dropoff
            .as_ref()
            .filter(|_| needs_dropoff)
            .map(Location::rounded);

        Ok(CreateRequest {
            service_type: self.service_type,
            insured_name: self.insured_name.trim().to_string(),
            insured_phone: self.insured_phone.trim().to_string(),
            insured_plate: non_blank(&self.insured_plate),
            policy_number: non_blank(&self.policy_number),
            insurance_name: non_blank(&self.insurance_name),
            location_method: LOCATION_METHOD_MANUAL.to_string(),
            pickup_address: pickup.address,
            pickup_latitude: pickup.latitude,
            pickup_longitude: pickup.longitude,
            dropoff_address: dropoff
                .as_ref()
                .map(|d| d.address.clone())
                .filter(|a| !a.is_empty()),
            dropoff_latitude: dropoff.as_ref().map(|d| d.latitude).filter(|v| *v != 0.0),
            dropoff_longitude: dropoff.as_ref().map(|d| d.longitude).filter(|v| *v != 0.0),
            estimated_km: self
                .estimated_km
                .filter(|km| needs_dropoff && *km > 0),
            service_details: self.details.to_value(&self.answers)?,
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Body of `POST /requests/create/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRequest {
    pub service_type: ServiceType,
    pub insured_name: String,
    pub insured_phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insured_plate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance_name: Option<String>,
    pub location_method: String,
    pub pickup_address: String,
    pub pickup_latitude: f64,
    pub pickup_longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dropoff_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dropoff_latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dropoff_longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_km: Option<u32>,
    pub service_details: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRequestResponse {
    pub request_id: u64,
    pub status: RequestStatus,
    pub tracking_token: String,
    #[serde(default)]
    pub tracking_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancelResponse {
    pub request_id: u64,
    pub status: RequestStatus,
    #[serde(default)]
    pub message: String,
}

/// Response of the token-scoped offer list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffersResponse {
    pub request_id: u64,
    #[serde(default)]
    pub request_status: Option<String>,
    #[serde(default)]
    pub offers_count: usize,
    pub offers: Vec<Offer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptOfferResponse {
    #[serde(default)]
    pub message: String,
    pub request_id: u64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub driver_name: Option<String>,
    #[serde(default)]
    pub driver_phone: Option<String>,
}

/// Body of `POST /requests/{id}/resend-sms/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentLinkRequest {
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentLinkResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub payment_url: Option<String>,
}

/// Generic `{success, message}` acknowledgement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationShareInit {
    pub insured_phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationShareInitResponse {
    pub token: String,
    /// Channel path relative to the push host, e.g. `ws/location-share/abc/`.
    pub ws_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendLocationSms {
    pub token: String,
}

/// Body of the customer's location submission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubmitLocation {
    pub latitude: f64,
    pub longitude: f64,
}

/// Polling view of a location-share token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareStatus {
    pub is_used: bool,
    #[serde(default, deserialize_with = "crate::number::optional_decimal")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "crate::number::optional_decimal")]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub address: Option<String>,
}

impl ShareStatus {
    /// The submitted fix, once the token is used and carries coordinates.
    pub fn into_fix(self) -> Option<LocationFix> {
        if !self.is_used {
            return None;
        }
        let latitude = self.latitude?;
        let longitude = self.longitude?;
        Some(LocationFix::new(
            latitude,
            longitude,
            self.address.unwrap_or_default(),
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tokens {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub token_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub contact_person: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub company: Company,
    pub tokens: Tokens,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub tokens: Tokens,
    #[serde(default)]
    pub message: String,
}

/// Error body returned with 4xx/5xx responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl ApiErrorBody {
    /// The server's message, preferring `error`, then `message`, then `detail`.
    pub fn message(&self) -> Option<&str> {
        [&self.error, &self.message, &self.detail]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|m| !m.is_empty())
    }
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod tests;
