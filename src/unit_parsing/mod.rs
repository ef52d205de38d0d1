// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to parse strings into plain numbers or some quantity with a unit.

mod error;

pub use error::UnitParseError;

use strum::IntoEnumIterator;
use strum_macros::{EnumIter, EnumString, IntoStaticStr};

#[derive(Debug, Clone, Copy, PartialEq, EnumIter, EnumString, IntoStaticStr)]
#[allow(non_camel_case_types)]
pub enum FreqFormat {
    // Longer units must come before the units they end with (e.g. "GHz" before
    // "Hz"), because units are matched as suffixes.
    /// GigaHertz
    GHz,

    /// MegaHertz
    MHz,

    /// kiloHertz
    kHz,

    /// Hertz
    Hz,

    NoUnit,
}

impl FreqFormat {
    /// Convert a value with this unit into Hz. Values without a unit are
    /// assumed to already be in Hz.
    pub fn to_hz(self, value: f64) -> f64 {
        match self {
            FreqFormat::GHz => value * 1e9,
            FreqFormat::MHz => value * 1e6,
            FreqFormat::kHz => value * 1e3,
            FreqFormat::Hz | FreqFormat::NoUnit => value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, EnumIter, EnumString, IntoStaticStr)]
#[allow(non_camel_case_types)]
pub enum AngleFormat {
    /// Arcseconds
    arcsec,

    /// Arcminutes
    arcmin,

    /// Degrees
    deg,

    /// Radians
    rad,

    NoUnit,
}

impl AngleFormat {
    /// Convert a value with this unit into degrees. Values without a unit are
    /// assumed to be in arcseconds, because that's how beam sizes are usually
    /// quoted.
    pub fn to_degrees(self, value: f64) -> f64 {
        match self {
            AngleFormat::arcsec | AngleFormat::NoUnit => value / 3600.0,
            AngleFormat::arcmin => value / 60.0,
            AngleFormat::deg => value,
            AngleFormat::rad => value.to_degrees(),
        }
    }
}

/// If `s` ends with `unit` (case insensitive), return the (trimmed) part of
/// `s` before the unit.
fn strip_unit<'a>(s: &'a str, unit: &str) -> Option<&'a str> {
    let s = s.trim();
    let split = s.len().checked_sub(unit.len())?;
    if !s.is_char_boundary(split) {
        return None;
    }
    let (prefix, suffix) = s.split_at(split);
    if suffix.eq_ignore_ascii_case(unit) {
        Some(prefix.trim())
    } else {
        None
    }
}

/// Parse a string that may have a unit of frequency attached to it.
pub fn parse_freq(s: &str) -> Result<(f64, FreqFormat), UnitParseError> {
    // Try to parse a naked number.
    let maybe_number: Option<f64> = s.trim().parse().ok();
    if let Some(number) = maybe_number {
        return Ok((number, FreqFormat::NoUnit));
    };

    // That didn't work; let's search over our supported formats.
    for freq_format in FreqFormat::iter().filter(|&ff| ff != FreqFormat::NoUnit) {
        let freq_format_str: &'static str = freq_format.into();
        if let Some(prefix) = strip_unit(s, freq_format_str) {
            return match prefix.parse() {
                Ok(number) => Ok((number, freq_format)),
                Err(_) => Err(UnitParseError::GotFreqUnitButCantParse(s.to_string())),
            };
        }
    }

    // If we made it this far, we don't know how to parse the string.
    Err(UnitParseError::Unknown {
        input: s.to_string(),
        unit_type: "frequency",
    })
}

/// Parse a string that may have a unit of frequency attached to it, and
/// return the value in Hz.
pub fn parse_freq_hz(s: &str) -> Result<f64, UnitParseError> {
    let (number, format) = parse_freq(s)?;
    Ok(format.to_hz(number))
}

/// Parse a string that may have a unit of angle attached to it.
pub fn parse_angle(s: &str) -> Result<(f64, AngleFormat), UnitParseError> {
    let maybe_number: Option<f64> = s.trim().parse().ok();
    if let Some(number) = maybe_number {
        return Ok((number, AngleFormat::NoUnit));
    };

    for angle_format in AngleFormat::iter().filter(|&af| af != AngleFormat::NoUnit) {
        let angle_format_str: &'static str = angle_format.into();
        if let Some(prefix) = strip_unit(s, angle_format_str) {
            return match prefix.parse() {
                Ok(number) => Ok((number, angle_format)),
                Err(_) => Err(UnitParseError::GotAngleUnitButCantParse(s.to_string())),
            };
        }
    }

    Err(UnitParseError::Unknown {
        input: s.to_string(),
        unit_type: "angle",
    })
}

/// Parse a string that may have a unit of angle attached to it, and return
/// the value in degrees.
pub fn parse_angle_deg(s: &str) -> Result<f64, UnitParseError> {
    let (number, format) = parse_angle(s)?;
    Ok(format.to_degrees(number))
}
