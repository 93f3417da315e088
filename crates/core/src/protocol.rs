// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Push channel messages.
//!
//! Every payload is a JSON object with a `type` discriminant. Messages with an
//! unknown `type` decode to an `Unknown` variant; payloads that are not valid
//! JSON, or whose known `type` carries the wrong fields, fail to decode. Both
//! are dropped by the channel consumer.

use serde::{Deserialize, Serialize};

use crate::location::LocationFix;
use crate::offer::{Offer, PushOffer};

/// Messages on a request's channel (`/ws/requests/{tracking_token}/`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequestEvent {
    /// Sent once after the server accepts the subscription.
    ConnectionEstablished {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    /// A provider submitted an offer.
    NewOffer { offer: PushOffer },

    /// A provider took back an offer.
    OfferWithdrawn { offer_id: u64 },

    OfferAccepted {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        offer_id: Option<u64>,
    },

    RequestCompleted {},

    RequestCancelled {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },

    PaymentCompleted {},

    /// Any `type` this client does not know.
    #[serde(other)]
    Unknown,
}

/// What the request controller does with a [`RequestEvent`].
#[derive(Debug, Clone, PartialEq)]
pub enum RequestEffect {
    /// Fetch the authoritative snapshot again.
    Refetch,
    /// Add a normalized offer to the offer book.
    Upsert(Offer),
    /// Drop an offer from the offer book.
    Withdraw(u64),
    Ignore,
}

impl RequestEvent {
    /// Maps the message onto its effect on the request view.
    pub fn effect(self) -> RequestEffect {
        match self {
            RequestEvent::NewOffer { offer } => RequestEffect::Upsert(offer.into()),
            RequestEvent::OfferWithdrawn { offer_id } => RequestEffect::Withdraw(offer_id),
            RequestEvent::ConnectionEstablished { .. }
            | RequestEvent::OfferAccepted { .. }
            | RequestEvent::RequestCompleted {}
            | RequestEvent::RequestCancelled { .. }
            | RequestEvent::PaymentCompleted {} => RequestEffect::Refetch,
            RequestEvent::Unknown => RequestEffect::Ignore,
        }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// Messages on a location-share channel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LocationShareEvent {
    ConnectionEstablished {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    /// The customer submitted a position. Coordinates may arrive as strings.
    LocationReceived {
        #[serde(deserialize_with = "crate::number::decimal")]
        latitude: f64,
        #[serde(deserialize_with = "crate::number::decimal")]
        longitude: f64,
        #[serde(default)]
        address: String,
    },

    #[serde(other)]
    Unknown,
}

impl LocationShareEvent {
    /// The fix carried by a `location_received` message.
    pub fn fix(&self) -> Option<LocationFix> {
        match self {
            LocationShareEvent::LocationReceived {
                latitude,
                longitude,
                address,
            } => Some(LocationFix::new(*latitude, *longitude, address.clone())),
            _ => None,
        }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
