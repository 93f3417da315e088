// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Per-service request details.
//!
//! On the wire `service_details` is a flat JSON object whose shape is implied
//! by the request's `service_type`. Here it is a sum type so that every
//! service kind is handled exhaustively. Pricing questionnaire answers ride
//! along inside the same object under `question_answers`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::pricing::QuestionAnswer;
use crate::request::ServiceType;

/// Vehicle type sent when none was chosen for a tow.
pub const DEFAULT_TOW_VEHICLE: &str = "sedan";

/// Valid crane rental durations, in hours.
pub const CRANE_DURATION_HOURS: std::ops::RangeInclusive<u32> = 1..=12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TowTruckDetails {
    /// sedan, suv, pickup, van, motorcycle, truck or bus.
    pub vehicle_type: String,
}

impl Default for TowTruckDetails {
    fn default() -> Self {
        TowTruckDetails {
            vehicle_type: DEFAULT_TOW_VEHICLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CraneDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_type: Option<String>,
    /// Kilograms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_weight: Option<f64>,
    /// Metres.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lift_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<i32>,
    #[serde(default)]
    pub has_obstacles: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obstacle_note: Option<String>,
    /// Hours.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

/// Roadside problem categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemType {
    TireChange,
    BatteryBoost,
    FuelDelivery,
    Lockout,
    MinorRepair,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoadAssistanceDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub problem_types: Vec<ProblemType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem_description: Option<String>,
}

impl RoadAssistanceDetails {
    /// Adds the problem type if absent, removes it otherwise.
    pub fn toggle_problem(&mut self, problem: ProblemType) {
        if let Some(pos) = self.problem_types.iter().position(|p| *p == problem) {
            self.problem_types.remove(pos);
        } else {
            self.problem_types.push(problem);
        }
    }
}

/// Preferred time window for scheduled services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeSlot {
    /// 08:00-12:00
    Morning,
    /// 12:00-17:00
    Afternoon,
    /// 17:00-21:00
    Evening,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovingDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor_from: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor_to: Option<i32>,
    #[serde(default)]
    pub has_elevator_from: bool,
    #[serde(default)]
    pub has_elevator_to: bool,
    #[serde(default)]
    pub has_large_items: bool,
    #[serde(default)]
    pub has_fragile_items: bool,
    #[serde(default)]
    pub needs_packing: bool,
    #[serde(default)]
    pub needs_disassembly: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_time_slot: Option<TimeSlot>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CityToCityDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_time_slot: Option<TimeSlot>,
}

/// Service-specific part of a request.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceDetails {
    TowTruck(TowTruckDetails),
    Crane(CraneDetails),
    RoadAssistance(RoadAssistanceDetails),
    HomeToHomeMoving(MovingDetails),
    CityToCity(CityToCityDetails),
}

impl ServiceDetails {
    /// Empty details for the given service type.
    pub fn empty(service_type: ServiceType) -> Self {
        match service_type {
            ServiceType::TowTruck => ServiceDetails::TowTruck(TowTruckDetails::default()),
            ServiceType::Crane => ServiceDetails::Crane(CraneDetails::default()),
            ServiceType::RoadAssistance => {
                ServiceDetails::RoadAssistance(RoadAssistanceDetails::default())
            }
            ServiceType::HomeToHomeMoving => {
                ServiceDetails::HomeToHomeMoving(MovingDetails::default())
            }
            ServiceType::CityToCity => ServiceDetails::CityToCity(CityToCityDetails::default()),
        }
    }

    pub fn service_type(&self) -> ServiceType {
        match self {
            ServiceDetails::TowTruck(_) => ServiceType::TowTruck,
            ServiceDetails::Crane(_) => ServiceType::Crane,
            ServiceDetails::RoadAssistance(_) => ServiceType::RoadAssistance,
            ServiceDetails::HomeToHomeMoving(_) => ServiceType::HomeToHomeMoving,
            ServiceDetails::CityToCity(_) => ServiceType::CityToCity,
        }
    }

    /// Rejects values the backend would refuse.
    pub fn validate(&self) -> Result<()> {
        match self {
            ServiceDetails::TowTruck(d) if d.vehicle_type.trim().is_empty() => {
                Err(Error::InvalidDetails("vehicle_type cannot be empty".into()))
            }
            ServiceDetails::Crane(d) => {
                if let Some(hours) = d.duration {
                    if !CRANE_DURATION_HOURS.contains(&hours) {
                        return Err(Error::InvalidDetails(format!(
                            "crane duration must be 1-12 hours, got {hours}"
                        )));
                    }
                }
                non_negative("load_weight", d.load_weight)?;
                non_negative("lift_height", d.lift_height)
            }
            ServiceDetails::CityToCity(d) => {
                non_negative("load_weight", d.load_weight)?;
                non_negative("width", d.width)?;
                non_negative("length", d.length)?;
                non_negative("height", d.height)
            }
            _ => Ok(()),
        }
    }

    /// Encodes the details as the flat wire object, with any non-empty
    /// questionnaire answers attached.
    pub fn to_value(&self, answers: &[QuestionAnswer]) -> Result<Value> {
        let mut value = match self {
            ServiceDetails::TowTruck(d) => serde_json::to_value(d)?,
            ServiceDetails::Crane(d) => serde_json::to_value(d)?,
            ServiceDetails::RoadAssistance(d) => serde_json::to_value(d)?,
            ServiceDetails::HomeToHomeMoving(d) => serde_json::to_value(d)?,
            ServiceDetails::CityToCity(d) => serde_json::to_value(d)?,
        };
        let answers: Vec<&QuestionAnswer> =
            answers.iter().filter(|a| !a.option_ids.is_empty()).collect();
        if !answers.is_empty() {
            if let Value::Object(map) = &mut value {
                map.insert("question_answers".into(), serde_json::to_value(answers)?);
            }
        }
        Ok(value)
    }

    /// Decodes a wire object for the given service type.
    pub fn from_value(
        service_type: ServiceType,
        mut value: Value,
    ) -> Result<(Self, Vec<QuestionAnswer>)> {
        let answers = match &mut value {
            Value::Object(map) => match map.remove("question_answers") {
                Some(raw) => serde_json::from_value(raw)?,
                None => Vec::new(),
            },
            _ => return Err(Error::InvalidDetails("expected a JSON object".into())),
        };
        let details = match service_type {
            ServiceType::TowTruck => {
                let d: TowTruckDetails = serde_json::from_value(with_default_vehicle(value))?;
                ServiceDetails::TowTruck(d)
            }
            ServiceType::Crane => ServiceDetails::Crane(serde_json::from_value(value)?),
            ServiceType::RoadAssistance => {
                ServiceDetails::RoadAssistance(serde_json::from_value(value)?)
            }
            ServiceType::HomeToHomeMoving => {
                ServiceDetails::HomeToHomeMoving(serde_json::from_value(value)?)
            }
            ServiceType::CityToCity => ServiceDetails::CityToCity(serde_json::from_value(value)?),
        };
        Ok((details, answers))
    }
}

fn with_default_vehicle(mut value: Value) -> Value {
    if let Value::Object(map) = &mut value {
        map.entry("vehicle_type")
            .or_insert_with(|| Value::String(DEFAULT_TOW_VEHICLE.to_string()));
    }
    value
}

fn non_negative(field: &str, value: Option<f64>) -> Result<()> {
    match value {
        Some(v) if v < 0.0 || !v.is_finite() => Err(Error::InvalidDetails(format!(
            "{field} must be a non-negative number"
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
#[path = "details_tests.rs"]
mod tests;
