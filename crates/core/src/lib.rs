// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! ys-core: domain model for the roadside service request client
//!
//! This crate holds the data types, the request status machine, the offer
//! book, push message schemas and REST bodies. It does no I/O; the `ys`
//! client drives it.

pub mod api;
pub mod backoff;
pub mod details;
pub mod error;
pub mod location;
pub mod number;
pub mod offer;
pub mod offer_book;
pub mod pricing;
pub mod protocol;
pub mod request;

pub use backoff::Backoff;
pub use details::ServiceDetails;
pub use error::{Error, Result};
pub use location::{Coordinates, GeolocationError, LocationFix, LocationShareSession, ShareState};
pub use offer::{Offer, OfferStatus, PushOffer};
pub use offer_book::OfferBook;
pub use pricing::{PricingQuestion, QuestionAnswer, QuestionAnswers};
pub use protocol::{LocationShareEvent, RequestEffect, RequestEvent};
pub use request::{Location, Request, RequestStatus, ServiceType};
