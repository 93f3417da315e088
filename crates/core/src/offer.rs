// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Provider offers.
//!
//! Offers reach the client in two layouts: the REST list endpoint returns
//! [`Offer`] directly, while the request channel pushes a [`PushOffer`] with
//! its own provider sub-object and a decimal-string price. Both end up as
//! [`Offer`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    Pending,
    Accepted,
    Rejected,
    Withdrawn,
}

impl OfferStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OfferStatus::Pending => "pending",
            OfferStatus::Accepted => "accepted",
            OfferStatus::Rejected => "rejected",
            OfferStatus::Withdrawn => "withdrawn",
        }
    }
}

impl fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OfferStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(OfferStatus::Pending),
            "accepted" => Ok(OfferStatus::Accepted),
            "rejected" => Ok(OfferStatus::Rejected),
            "withdrawn" => Ok(OfferStatus::Withdrawn),
            _ => Err(Error::InvalidOfferStatus(s.to_string())),
        }
    }
}

/// The provider behind an offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverInfo {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, deserialize_with = "crate::number::optional_decimal")]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub total_ratings: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleInfo {
    pub id: u64,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub plate_number: String,
    #[serde(default)]
    pub vehicle_type: String,
}

impl VehicleInfo {
    /// `"Ford Cargo - 34ABC123"`
    pub fn label(&self) -> String {
        format!("{} {} - {}", self.brand, self.model, self.plate_number)
    }
}

/// One provider's priced bid on a request.
///
/// The breakdown maps are passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub id: u64,
    pub driver_info: DriverInfo,
    #[serde(default)]
    pub vehicle_info: Option<VehicleInfo>,
    #[serde(deserialize_with = "crate::number::decimal")]
    pub estimated_price: f64,
    #[serde(default, deserialize_with = "crate::number::decimal_or_zero")]
    pub driver_earnings: f64,
    #[serde(default, deserialize_with = "crate::number::decimal_or_zero")]
    pub platform_commission: f64,
    #[serde(default)]
    pub pricing_breakdown: Map<String, Value>,
    #[serde(default)]
    pub offer_details: Map<String, Value>,
    pub status: OfferStatus,
    pub created_at: DateTime<Utc>,
}

impl Offer {
    pub fn is_pending(&self) -> bool {
        self.status == OfferStatus::Pending
    }
}

/// Provider sub-object of a pushed offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushDriver {
    pub id: u64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone_number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushVehicle {
    pub id: u64,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub plate_number: String,
}

/// Offer as carried by a `new_offer` push message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushOffer {
    pub id: u64,
    pub driver: PushDriver,
    #[serde(default)]
    pub vehicle: Option<PushVehicle>,
    #[serde(deserialize_with = "crate::number::decimal")]
    pub estimated_price: f64,
    pub status: OfferStatus,
    pub created_at: DateTime<Utc>,
}

impl From<PushOffer> for Offer {
    fn from(push: PushOffer) -> Self {
        let name = format!("{} {}", push.driver.first_name, push.driver.last_name)
            .trim()
            .to_string();
        Offer {
            id: push.id,
            driver_info: DriverInfo {
                id: push.driver.id,
                name,
                phone: push.driver.phone_number,
                average_rating: None,
                total_ratings: 0,
            },
            vehicle_info: push.vehicle.map(|v| VehicleInfo {
                id: v.id,
                brand: v.brand,
                model: v.model,
                plate_number: v.plate_number,
                vehicle_type: String::new(),
            }),
            estimated_price: push.estimated_price,
            driver_earnings: 0.0,
            platform_commission: 0.0,
            pricing_breakdown: Map::new(),
            offer_details: Map::new(),
            status: push.status,
            created_at: push.created_at,
        }
    }
}

#[cfg(test)]
#[path = "offer_tests.rs"]
mod tests;
