// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for ys-core operations.

use thiserror::Error;

/// All possible errors that can occur in ys-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid request status: '{0}'\n  hint: valid statuses are: pending_location, pending, awaiting_approval, awaiting_payment, in_progress, completed, cancelled")]
    InvalidStatus(String),

    #[error("invalid service type: '{0}'\n  hint: valid types are: towTruck, crane, roadAssistance, homeToHomeMoving, cityToCity")]
    InvalidServiceType(String),

    #[error("invalid offer status: '{0}'")]
    InvalidOfferStatus(String),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("service details are for {found} but the request is {expected}")]
    DetailsMismatch { expected: String, found: String },

    #[error("invalid service details: {0}")]
    InvalidDetails(String),

    #[error("invalid price: '{0}'")]
    InvalidPrice(String),

    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for ys-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
