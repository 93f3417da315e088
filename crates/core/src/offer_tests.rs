// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use serde_json::json;
use yare::parameterized;

fn push_json(id: u64, price: &str) -> Value {
    json!({
        "id": id,
        "driver": {"id": 9, "first_name": "Ali", "last_name": "Veli", "phone_number": "05550000000"},
        "vehicle": {"id": 3, "brand": "Ford", "model": "Cargo", "plate_number": "34ABC123"},
        "estimated_price": price,
        "status": "pending",
        "created_at": "2026-02-12T16:05:00+03:00"
    })
}

#[parameterized(
    pending = { "pending", OfferStatus::Pending },
    accepted = { "accepted", OfferStatus::Accepted },
    rejected = { "REJECTED", OfferStatus::Rejected },
    withdrawn = { "withdrawn", OfferStatus::Withdrawn },
)]
fn offer_status_from_str(input: &str, expected: OfferStatus) {
    assert_eq!(input.parse::<OfferStatus>().unwrap(), expected);
}

#[test]
fn offer_status_from_str_invalid() {
    assert!("maybe".parse::<OfferStatus>().is_err());
}

#[test]
fn push_offer_normalizes_into_offer() {
    let push: PushOffer = serde_json::from_value(push_json(7, "1500")).unwrap();
    let offer = Offer::from(push);
    assert_eq!(offer.id, 7);
    assert_eq!(offer.driver_info.name, "Ali Veli");
    assert_eq!(offer.driver_info.phone, "05550000000");
    assert_eq!(offer.driver_info.average_rating, None);
    assert_eq!(offer.driver_info.total_ratings, 0);
    assert_eq!(offer.estimated_price, 1500.0);
    assert_eq!(offer.driver_earnings, 0.0);
    assert_eq!(offer.platform_commission, 0.0);
    assert!(offer.pricing_breakdown.is_empty());
    assert!(offer.offer_details.is_empty());
    assert!(offer.is_pending());
    let vehicle = offer.vehicle_info.unwrap();
    assert_eq!(vehicle.label(), "Ford Cargo - 34ABC123");
    assert_eq!(vehicle.vehicle_type, "");
}

#[test]
fn push_offer_without_last_name_has_no_trailing_space() {
    let mut value = push_json(1, "900.50");
    value["driver"]["last_name"] = json!("");
    value["vehicle"] = Value::Null;
    let offer = Offer::from(serde_json::from_value::<PushOffer>(value).unwrap());
    assert_eq!(offer.driver_info.name, "Ali");
    assert_eq!(offer.estimated_price, 900.5);
    assert!(offer.vehicle_info.is_none());
}

#[test]
fn push_offer_rejects_unparseable_price() {
    assert!(serde_json::from_value::<PushOffer>(push_json(1, "free")).is_err());
}

#[test]
fn rest_offer_deserializes_with_breakdown() {
    let offer: Offer = serde_json::from_value(json!({
        "id": 11,
        "driver_info": {"id": 2, "name": "Mehmet Kaya", "phone": "0555", "average_rating": 4.7, "total_ratings": 31},
        "vehicle_info": null,
        "estimated_price": 1800,
        "driver_earnings": "1530.00",
        "platform_commission": 270,
        "pricing_breakdown": {"base": 1500, "km": 300},
        "offer_details": {},
        "status": "pending",
        "created_at": "2026-02-12T13:00:00Z"
    }))
    .unwrap();
    assert_eq!(offer.estimated_price, 1800.0);
    assert_eq!(offer.driver_earnings, 1530.0);
    assert_eq!(offer.driver_info.average_rating, Some(4.7));
    assert_eq!(offer.pricing_breakdown["km"], json!(300));
}

#[test]
fn rest_offer_tolerates_missing_earnings() {
    let offer: Offer = serde_json::from_value(json!({
        "id": 12,
        "driver_info": {"id": 2, "name": "Mehmet Kaya"},
        "estimated_price": "2000.00",
        "driver_earnings": null,
        "status": "withdrawn",
        "created_at": "2026-02-12T13:00:00Z"
    }))
    .unwrap();
    assert_eq!(offer.driver_earnings, 0.0);
    assert_eq!(offer.platform_commission, 0.0);
    assert!(!offer.is_pending());
}
