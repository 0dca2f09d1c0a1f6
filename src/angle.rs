//! Angle notations used in field books: packed sexagesimal (`dd.mmss`),
//! North American quadrant bearings (`N12.3015E`) and gradians.
//!
//! Everything funnels into radians before any trigonometry happens. The
//! notation in use is an explicit [`BearingConvention`] value handed to the
//! parser, never ambient state.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::error::AngleError;

/// `trunc` lands one unit low when the packed digits are not exactly
/// representable (20.3 * 100 = 2029.999...), so digit extraction is nudged.
const DIGIT_EPSILON: f64 = 1e-9;

/// Seconds may overshoot 60 by floating point noise without being malformed.
const SECONDS_SLACK: f64 = 1e-6;

/// Convert a packed `dd.mmss` value to decimal degrees.
///
/// The sign applies to the whole angle: `-2.1524` is -2°15'24".
pub fn dms_to_decimal(dms: f64) -> Result<f64, AngleError> {
    if !dms.is_finite() {
        return Err(AngleError::InvalidNotation(format!(
            "packed angle must be finite, got {dms}"
        )));
    }
    let sign = if dms < 0.0 { -1.0 } else { 1.0 };
    let abs = dms.abs();

    let degrees = abs.trunc();
    let packed_minutes = (abs - degrees) * 100.0;
    let minutes = (packed_minutes + DIGIT_EPSILON).trunc();
    let seconds = ((packed_minutes - minutes) * 100.0).max(0.0);

    if minutes >= 60.0 {
        return Err(AngleError::InvalidNotation(format!(
            "{dms}: minutes field {minutes} is not below 60"
        )));
    }
    if seconds >= 60.0 + SECONDS_SLACK {
        return Err(AngleError::InvalidNotation(format!(
            "{dms}: seconds field {seconds:.6} is not below 60"
        )));
    }

    Ok(sign * (degrees + minutes / 60.0 + seconds / 3600.0))
}

/// Convert decimal degrees to a packed `dd.mmss` value.
///
/// Non-finite input is passed through unchanged.
pub fn decimal_to_dms(decimal: f64) -> f64 {
    if !decimal.is_finite() {
        return decimal;
    }
    let sign = if decimal < 0.0 { -1.0 } else { 1.0 };
    let abs = decimal.abs();

    let mut degrees = abs.trunc();
    let mut minutes = ((abs - degrees) * 60.0 + DIGIT_EPSILON).trunc();
    if minutes >= 60.0 {
        degrees += 1.0;
        minutes -= 60.0;
    }
    let seconds = ((abs - degrees) * 3600.0 - minutes * 60.0).max(0.0);

    sign * (degrees + minutes / 100.0 + seconds / 10_000.0)
}

/// Packed `dd.mmss` straight to radians.
pub fn dms_to_radians(dms: f64) -> Result<f64, AngleError> {
    Ok(dms_to_decimal(dms)?.to_radians())
}

/// Radians to packed `dd.mmss`.
pub fn radians_to_dms(radians: f64) -> f64 {
    decimal_to_dms(radians.to_degrees())
}

pub fn gradians_to_radians(gradians: f64) -> f64 {
    gradians * (PI / 200.0)
}

pub fn radians_to_gradians(radians: f64) -> f64 {
    radians * (200.0 / PI)
}

/// Wrap an angle in radians to `[0, 2π)`.
pub fn normalize_radians(radians: f64) -> f64 {
    let wrapped = radians.rem_euclid(2.0 * PI);
    // rem_euclid can return exactly 2π for tiny negative inputs
    if wrapped >= 2.0 * PI {
        0.0
    } else {
        wrapped
    }
}

/// Wrap an angle in radians to `(-π, π]`.
pub fn wrap_pi(radians: f64) -> f64 {
    let wrapped = normalize_radians(radians);
    if wrapped > PI {
        wrapped - 2.0 * PI
    } else {
        wrapped
    }
}

/// The quadrant a bearing is reckoned in, named by its reference meridian
/// end and the direction of rotation away from it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Quadrant {
    NorthEast,
    SouthEast,
    SouthWest,
    NorthWest,
}

impl Quadrant {
    fn letters(&self) -> (char, char) {
        match self {
            Self::NorthEast => ('N', 'E'),
            Self::SouthEast => ('S', 'E'),
            Self::SouthWest => ('S', 'W'),
            Self::NorthWest => ('N', 'W'),
        }
    }
}

/// A quadrant bearing such as `S45.3000W`: an angle of at most 90° (packed
/// `dd.mmss`) measured from north or south towards east or west.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuadrantBearing {
    pub quadrant: Quadrant,
    /// Packed `dd.mmss`, `0 <= angle <= 90°`.
    pub angle: f64,
}

impl QuadrantBearing {
    pub fn new(quadrant: Quadrant, angle: f64) -> Result<Self, AngleError> {
        let decimal = dms_to_decimal(angle)?;
        if !(0.0..=90.0).contains(&decimal) {
            return Err(AngleError::InvalidNotation(format!(
                "quadrant bearing angle must lie in [0, 90], got {angle}"
            )));
        }
        Ok(Self { quadrant, angle })
    }

    /// Express a whole-circle bearing (radians, clockwise from north) as a
    /// quadrant bearing.
    pub fn from_radians(radians: f64) -> Self {
        let deg = normalize_radians(radians).to_degrees();
        let (quadrant, decimal) = if deg <= 90.0 {
            (Quadrant::NorthEast, deg)
        } else if deg <= 180.0 {
            (Quadrant::SouthEast, 180.0 - deg)
        } else if deg <= 270.0 {
            (Quadrant::SouthWest, deg - 180.0)
        } else {
            (Quadrant::NorthWest, 360.0 - deg)
        };
        Self {
            quadrant,
            angle: decimal_to_dms(decimal),
        }
    }

    /// Whole-circle bearing in radians, clockwise from north.
    pub fn to_radians(&self) -> Result<f64, AngleError> {
        let dec = dms_to_decimal(self.angle)?;
        let whole_circle = match self.quadrant {
            Quadrant::NorthEast => dec,
            Quadrant::SouthEast => 180.0 - dec,
            Quadrant::SouthWest => 180.0 + dec,
            Quadrant::NorthWest => 360.0 - dec,
        };
        Ok(whole_circle.to_radians())
    }
}

impl FromStr for QuadrantBearing {
    type Err = AngleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let malformed = || AngleError::InvalidNotation(format!("malformed quadrant bearing {s:?}"));

        let mut chars = text.chars();
        let first = chars.next().ok_or_else(malformed)?.to_ascii_uppercase();
        let last = chars.next_back().ok_or_else(malformed)?.to_ascii_uppercase();
        let body = chars.as_str();

        let quadrant = match (first, last) {
            ('N', 'E') => Quadrant::NorthEast,
            ('S', 'E') => Quadrant::SouthEast,
            ('S', 'W') => Quadrant::SouthWest,
            ('N', 'W') => Quadrant::NorthWest,
            _ => return Err(malformed()),
        };
        let angle: f64 = body.trim().parse().map_err(|_| malformed())?;
        if angle < 0.0 {
            return Err(malformed());
        }
        Self::new(quadrant, angle)
    }
}

impl fmt::Display for QuadrantBearing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (from, towards) = self.quadrant.letters();
        write!(f, "{from}{:.4}{towards}", self.angle)
    }
}

/// An angle tagged with the notation it was recorded in.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Angle {
    /// Packed sexagesimal `dd.mmss`.
    Dms(f64),
    /// Decimal degrees.
    Decimal(f64),
    Radians(f64),
    Gradians(f64),
    Quadrant(QuadrantBearing),
}

impl Angle {
    pub fn to_radians(&self) -> Result<f64, AngleError> {
        let radians = match *self {
            Angle::Dms(v) => dms_to_radians(v)?,
            Angle::Decimal(v) => v.to_radians(),
            Angle::Radians(v) => v,
            Angle::Gradians(v) => gradians_to_radians(v),
            Angle::Quadrant(q) => q.to_radians()?,
        };
        if !radians.is_finite() {
            return Err(AngleError::InvalidNotation(format!(
                "{self:?} does not describe a finite angle"
            )));
        }
        Ok(radians)
    }

    pub fn to_decimal(&self) -> Result<f64, AngleError> {
        match *self {
            Angle::Dms(v) => dms_to_decimal(v),
            Angle::Decimal(v) if v.is_finite() => Ok(v),
            _ => Ok(self.to_radians()?.to_degrees()),
        }
    }
}

impl From<QuadrantBearing> for Angle {
    fn from(q: QuadrantBearing) -> Self {
        Angle::Quadrant(q)
    }
}

/// How bearings are written in the field book being reduced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BearingConvention {
    /// Packed `dd.mmss`.
    #[default]
    DegreesMinutesSeconds,
    /// `Ndd.mmssE` style quadrant bearings.
    QuadrantBearing,
    Gradians,
}

impl BearingConvention {
    /// Parse from a string name.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "dms" | "degrees" | "degrees_minutes_seconds" => Some(Self::DegreesMinutesSeconds),
            "quadrant" | "quadrant_bearing" => Some(Self::QuadrantBearing),
            "gradians" | "gon" | "grad" => Some(Self::Gradians),
            _ => None,
        }
    }

    /// Interpret field text written in this convention.
    pub fn parse(&self, text: &str) -> Result<Angle, AngleError> {
        let parse_number = |t: &str| -> Result<f64, AngleError> {
            t.trim()
                .parse::<f64>()
                .map_err(|_| AngleError::InvalidNotation(format!("not a number: {t:?}")))
        };
        match self {
            Self::DegreesMinutesSeconds => Ok(Angle::Dms(parse_number(text)?)),
            Self::QuadrantBearing => Ok(Angle::Quadrant(text.parse()?)),
            Self::Gradians => Ok(Angle::Gradians(parse_number(text)?)),
        }
    }

    pub fn to_radians(&self, text: &str) -> Result<f64, AngleError> {
        self.parse(text)?.to_radians()
    }

    /// Render a whole-circle bearing (radians) in this convention.
    pub fn format(&self, radians: f64) -> String {
        match self {
            Self::DegreesMinutesSeconds => format!("{:.4}", radians_to_dms(normalize_radians(radians))),
            Self::QuadrantBearing => QuadrantBearing::from_radians(radians).to_string(),
            Self::Gradians => format!("{:.4}", radians_to_gradians(normalize_radians(radians))),
        }
    }
}
