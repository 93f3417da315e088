// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Lenient numeric fields.
//!
//! The backend is inconsistent about numbers: prices and coordinates arrive as
//! JSON numbers from some endpoints and as decimal strings (`"1500.00"`,
//! `"41.01"`) from others, push messages in particular. These helpers accept
//! both forms and are used through `#[serde(deserialize_with = ...)]`.

use serde::de::{self, Deserializer, Visitor};
use std::fmt;

use crate::error::{Error, Result};

/// Parses a decimal string as sent by the backend.
pub fn parse_decimal(s: &str) -> Result<f64> {
    let trimmed = s.trim();
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(Error::InvalidPrice(s.to_string())),
    }
}

struct DecimalVisitor;

impl<'de> Visitor<'de> for DecimalVisitor {
    type Value = f64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number or a numeric string")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<f64, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<f64, E> {
        Ok(v as f64)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<f64, E> {
        Ok(v as f64)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<f64, E> {
        parse_decimal(v).map_err(E::custom)
    }
}

/// Deserializes a required number that may be encoded as a string.
pub fn decimal<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<f64, D::Error> {
    d.deserialize_any(DecimalVisitor)
}

struct OptionalDecimalVisitor;

impl<'de> Visitor<'de> for OptionalDecimalVisitor {
    type Value = Option<f64>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("null, a number or a numeric string")
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> std::result::Result<Self::Value, D::Error> {
        decimal(d).map(Some)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Self::Value, E> {
        Ok(Some(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Self::Value, E> {
        Ok(Some(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Self::Value, E> {
        Ok(Some(v as f64))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Self::Value, E> {
        if v.trim().is_empty() {
            return Ok(None);
        }
        parse_decimal(v).map(Some).map_err(E::custom)
    }
}

/// Deserializes an optional number; `null`, a missing field and `""` are `None`.
///
/// Combine with `#[serde(default)]` so an absent field is accepted.
pub fn optional_decimal<'de, D: Deserializer<'de>>(
    d: D,
) -> std::result::Result<Option<f64>, D::Error> {
    d.deserialize_any(OptionalDecimalVisitor)
}

/// Deserializes a number that may be a string, null or absent; the latter two
/// become `0.0`.
pub fn decimal_or_zero<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<f64, D::Error> {
    optional_decimal(d).map(|v| v.unwrap_or(0.0))
}

#[cfg(test)]
#[path = "number_tests.rs"]
mod tests;
