// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Service request types.
//!
//! A [`Request`] is the snapshot the backend returns for one service job. Its
//! [`RequestStatus`] is server-authoritative: the client never computes the
//! next status, it only folds the snapshots it receives.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::details::ServiceDetails;
use crate::error::{Error, Result};

/// Lifecycle status of a service request.
///
/// ```text
/// pending_location → pending → awaiting_approval → awaiting_payment → in_progress → completed
///        └──────────────┴──────────────┴───────────────────┴───────────────┴──→ cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Created from a customer location share; no pickup coordinates yet.
    PendingLocation,
    /// Waiting for providers to bid.
    Pending,
    /// At least one offer is on the table.
    AwaitingApproval,
    /// An offer was accepted; the customer has to pay.
    AwaitingPayment,
    /// The provider is on the job.
    InProgress,
    /// Finished successfully.
    Completed,
    /// Cancelled by the agency or the platform.
    Cancelled,
}

impl RequestStatus {
    /// Returns the string representation used on the wire and in display.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::PendingLocation => "pending_location",
            RequestStatus::Pending => "pending",
            RequestStatus::AwaitingApproval => "awaiting_approval",
            RequestStatus::AwaitingPayment => "awaiting_payment",
            RequestStatus::InProgress => "in_progress",
            RequestStatus::Completed => "completed",
            RequestStatus::Cancelled => "cancelled",
        }
    }

    /// Completed and cancelled requests never change again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStatus::Completed | RequestStatus::Cancelled)
    }

    /// Statuses during which providers may submit offers.
    pub fn collects_offers(&self) -> bool {
        matches!(self, RequestStatus::Pending | RequestStatus::AwaitingApproval)
    }

    /// Whether the agency may still cancel the request.
    pub fn can_cancel(&self) -> bool {
        !self.is_terminal()
    }

    /// Position along the lifecycle. Both terminal states share the last rank.
    pub fn rank(&self) -> u8 {
        match self {
            RequestStatus::PendingLocation => 0,
            RequestStatus::Pending => 1,
            RequestStatus::AwaitingApproval => 2,
            RequestStatus::AwaitingPayment => 3,
            RequestStatus::InProgress => 4,
            RequestStatus::Completed | RequestStatus::Cancelled => 5,
        }
    }

    /// Whether a snapshot reporting `next` may replace one reporting `self`.
    ///
    /// Statuses only move forward; a terminal status is final. A snapshot
    /// that would move backwards is stale.
    pub fn may_advance_to(&self, next: RequestStatus) -> bool {
        if *self == next {
            return true;
        }
        if self.is_terminal() {
            return false;
        }
        next.rank() >= self.rank()
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pending_location" => Ok(RequestStatus::PendingLocation),
            "pending" => Ok(RequestStatus::Pending),
            "awaiting_approval" => Ok(RequestStatus::AwaitingApproval),
            "awaiting_payment" => Ok(RequestStatus::AwaitingPayment),
            "in_progress" => Ok(RequestStatus::InProgress),
            "completed" => Ok(RequestStatus::Completed),
            "cancelled" => Ok(RequestStatus::Cancelled),
            _ => Err(Error::InvalidStatus(s.to_string())),
        }
    }
}

/// The five fixed kinds of service. Immutable once a request exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ServiceType {
    TowTruck,
    Crane,
    RoadAssistance,
    HomeToHomeMoving,
    CityToCity,
}

impl ServiceType {
    /// All service types, in menu order.
    pub const ALL: [ServiceType; 5] = [
        ServiceType::TowTruck,
        ServiceType::Crane,
        ServiceType::RoadAssistance,
        ServiceType::HomeToHomeMoving,
        ServiceType::CityToCity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::TowTruck => "towTruck",
            ServiceType::Crane => "crane",
            ServiceType::RoadAssistance => "roadAssistance",
            ServiceType::HomeToHomeMoving => "homeToHomeMoving",
            ServiceType::CityToCity => "cityToCity",
        }
    }

    /// Service types that move something somewhere and therefore need a dropoff.
    pub fn needs_dropoff(&self) -> bool {
        matches!(
            self,
            ServiceType::TowTruck | ServiceType::HomeToHomeMoving | ServiceType::CityToCity
        )
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "towtruck" | "tow" => Ok(ServiceType::TowTruck),
            "crane" => Ok(ServiceType::Crane),
            "roadassistance" => Ok(ServiceType::RoadAssistance),
            "hometohomemoving" | "moving" => Ok(ServiceType::HomeToHomeMoving),
            "citytocity" => Ok(ServiceType::CityToCity),
            _ => Err(Error::InvalidServiceType(s.to_string())),
        }
    }
}

/// An address with its resolved coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub address: String,
    #[serde(deserialize_with = "crate::number::decimal")]
    pub latitude: f64,
    #[serde(deserialize_with = "crate::number::decimal")]
    pub longitude: f64,
}

impl Location {
    pub fn new(address: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Location {
            address: address.into(),
            latitude,
            longitude,
        }
    }

    /// Both coordinates set and within range. `(0, 0)` counts as unset.
    pub fn has_coordinates(&self) -> bool {
        let in_range = (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude);
        in_range && self.latitude != 0.0 && self.longitude != 0.0
    }

    /// Coordinates rounded to the 6 decimal places the backend stores.
    pub fn rounded(&self) -> Location {
        Location {
            address: self.address.clone(),
            latitude: round6(self.latitude),
            longitude: round6(self.longitude),
        }
    }
}

pub(crate) fn round6(v: f64) -> f64 {
    (v * 1_000_000.0).round() / 1_000_000.0
}

/// Provider assigned to a request after acceptance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignedDriver {
    pub name: Option<String>,
    pub phone: Option<String>,
}

/// Accepted price of a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    /// Decimal string as sent by the backend, e.g. `"1500.00"`.
    pub estimated_price: Option<String>,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "TRY".to_string()
}

impl Pricing {
    /// The accepted price as a number, if present and well-formed.
    pub fn amount(&self) -> Option<f64> {
        self.estimated_price
            .as_deref()
            .and_then(|p| crate::number::parse_decimal(p).ok())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub created_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Full snapshot of one request as returned by `GET /requests/{id}/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    #[serde(rename = "request_id")]
    pub id: u64,
    pub status: RequestStatus,
    pub service_type: ServiceType,
    pub insured_name: String,
    pub insured_phone: String,
    #[serde(default)]
    pub insured_plate: Option<String>,
    #[serde(default)]
    pub policy_number: String,
    #[serde(default)]
    pub insurance_name: Option<String>,
    #[serde(default)]
    pub tracking_url: Option<String>,
    #[serde(default)]
    pub pickup_location: Option<Location>,
    #[serde(default)]
    pub dropoff_location: Option<Location>,
    /// Raw details; shape depends on `service_type`. See [`Request::details`].
    #[serde(default)]
    pub service_details: Option<serde_json::Value>,
    pub driver: Option<AssignedDriver>,
    pub pricing: Option<Pricing>,
    pub timeline: Timeline,
}

impl Request {
    /// Tracking token embedded in the tracking URL, if any.
    pub fn tracking_token(&self) -> Option<String> {
        self.tracking_url.as_deref().and_then(extract_tracking_token)
    }

    /// Decodes the service details against the request's service type.
    pub fn details(&self) -> Result<Option<ServiceDetails>> {
        match &self.service_details {
            Some(value) if !value.is_null() => {
                ServiceDetails::from_value(self.service_type, value.clone())
                    .map(|(details, _)| Some(details))
            }
            _ => Ok(None),
        }
    }

    /// Checks that driver and pricing agree with the status.
    ///
    /// Both are absent before acceptance and present from `awaiting_payment`
    /// on. A cancelled request may be in either shape. Returns a description of
    /// the first violation.
    pub fn assignment_violation(&self) -> Option<String> {
        let assigned = self.driver.is_some() && self.pricing.is_some();
        let unassigned = self.driver.is_none() && self.pricing.is_none();
        match self.status {
            RequestStatus::PendingLocation
            | RequestStatus::Pending
            | RequestStatus::AwaitingApproval
                if !unassigned =>
            {
                Some(format!("{} request carries driver or pricing", self.status))
            }
            RequestStatus::AwaitingPayment | RequestStatus::InProgress | RequestStatus::Completed
                if !assigned =>
            {
                Some(format!("{} request lacks driver or pricing", self.status))
            }
            _ => None,
        }
    }
}

/// Returns the last path segment of a tracking URL.
pub fn extract_tracking_token(tracking_url: &str) -> Option<String> {
    tracking_url
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty() && !s.contains(':'))
        .map(str::to_string)
}

/// One row of `GET /requests/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestSummary {
    pub request_id: u64,
    pub status: RequestStatus,
    pub service_type: ServiceType,
    pub insured_name: String,
    #[serde(default)]
    pub policy_number: String,
    pub created_at: DateTime<Utc>,
}

/// A page of request summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestPage {
    pub count: u64,
    pub page: u32,
    pub page_size: u32,
    pub results: Vec<RequestSummary>,
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
