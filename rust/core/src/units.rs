// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Length unit conversion
//!
//! Model lengths are stored in internal units (decimal feet). Values are
//! converted to display units only at the edges, e.g. when sizing an opening
//! in meters.

use crate::error::{Error, Result};
use std::str::FromStr;

/// Meters in one internal unit (one foot)
pub const FEET_TO_METERS: f64 = 0.3048;

/// Physical length units understood by the converter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LengthUnit {
    Feet,
    Inches,
    Meters,
    Centimeters,
    Millimeters,
}

impl LengthUnit {
    /// Length of one unit in meters
    #[inline]
    pub fn meters_per_unit(self) -> f64 {
        match self {
            LengthUnit::Feet => FEET_TO_METERS,
            LengthUnit::Inches => FEET_TO_METERS / 12.0,
            LengthUnit::Meters => 1.0,
            LengthUnit::Centimeters => 1e-2,
            LengthUnit::Millimeters => 1e-3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LengthUnit::Feet => "ft",
            LengthUnit::Inches => "in",
            LengthUnit::Meters => "m",
            LengthUnit::Centimeters => "cm",
            LengthUnit::Millimeters => "mm",
        }
    }
}

impl FromStr for LengthUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ft" | "feet" | "foot" => Ok(LengthUnit::Feet),
            "in" | "inch" | "inches" => Ok(LengthUnit::Inches),
            "m" | "meter" | "meters" | "metre" | "metres" => Ok(LengthUnit::Meters),
            "cm" | "centimeter" | "centimeters" => Ok(LengthUnit::Centimeters),
            "mm" | "millimeter" | "millimeters" => Ok(LengthUnit::Millimeters),
            _ => Err(Error::UnknownUnit(s.to_string())),
        }
    }
}

/// Convert a length from internal units (feet) to `unit`
#[inline]
pub fn convert_from_internal_units(value: f64, unit: LengthUnit) -> f64 {
    value * FEET_TO_METERS / unit.meters_per_unit()
}

/// Convert a length given in `unit` to internal units (feet)
#[inline]
pub fn convert_to_internal_units(value: f64, unit: LengthUnit) -> f64 {
    value * unit.meters_per_unit() / FEET_TO_METERS
}
