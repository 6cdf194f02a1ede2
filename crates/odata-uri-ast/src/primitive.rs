//! Primitive value model for URI literals
//!
//! Temporal values are stored as their parsed components rather than as a
//! timeline instant: the parser is purely lexical, and the components keep
//! exactly what the literal said (including fractional-second precision).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Primitive types a URI literal can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveType {
    Null,
    Boolean,
    SByte,
    Byte,
    Int16,
    Int32,
    Int64,
    Single,
    Double,
    Decimal,
    String,
    Guid,
    Date,
    TimeOfDay,
    DateTimeOffset,
    Duration,
    Binary,
    GeographyPoint,
    GeometryPoint,
}

impl PrimitiveType {
    /// Get the type name as it appears in metadata
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Boolean => "Boolean",
            Self::SByte => "SByte",
            Self::Byte => "Byte",
            Self::Int16 => "Int16",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::Single => "Single",
            Self::Double => "Double",
            Self::Decimal => "Decimal",
            Self::String => "String",
            Self::Guid => "Guid",
            Self::Date => "Date",
            Self::TimeOfDay => "TimeOfDay",
            Self::DateTimeOffset => "DateTimeOffset",
            Self::Duration => "Duration",
            Self::Binary => "Binary",
            Self::GeographyPoint => "GeographyPoint",
            Self::GeometryPoint => "GeometryPoint",
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A calendar date (year, month, day)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateValue {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

impl DateValue {
    pub const fn new(year: i32, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// A time of day with millisecond precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeOfDayValue {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub millisecond: u16,
}

impl TimeOfDayValue {
    pub const fn new(hour: u8, minute: u8, second: u8) -> Self {
        Self {
            hour,
            minute,
            second,
            millisecond: 0,
        }
    }

    pub const fn with_millisecond(mut self, millisecond: u16) -> Self {
        self.millisecond = millisecond;
        self
    }
}

impl fmt::Display for TimeOfDayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)?;
        if self.millisecond != 0 {
            write!(f, ".{:03}", self.millisecond)?;
        }
        Ok(())
    }
}

/// A date and time of day with a signed zone offset in minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateTimeOffsetValue {
    pub date: DateValue,
    pub time: TimeOfDayValue,
    /// Offset from UTC in minutes; 0 renders as `Z`
    pub offset_minutes: i16,
}

impl DateTimeOffsetValue {
    pub const fn new(date: DateValue, time: TimeOfDayValue, offset_minutes: i16) -> Self {
        Self {
            date,
            time,
            offset_minutes,
        }
    }
}

impl fmt::Display for DateTimeOffsetValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}T{}", self.date, self.time)?;
        if self.offset_minutes == 0 {
            f.write_str("Z")
        } else {
            let sign = if self.offset_minutes < 0 { '-' } else { '+' };
            let abs = self.offset_minutes.unsigned_abs();
            write!(f, "{}{:02}:{:02}", sign, abs / 60, abs % 60)
        }
    }
}

/// A fixed-length duration (day/time components only)
///
/// Year and month designators are not representable; the literal parser
/// rejects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DurationValue {
    pub negative: bool,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub milliseconds: u16,
}

impl DurationValue {
    pub const fn from_days(days: u32) -> Self {
        Self {
            negative: false,
            days,
            hours: 0,
            minutes: 0,
            seconds: 0,
            milliseconds: 0,
        }
    }

    /// Render the bare ISO-8601 envelope (`P1DT2H30M`)
    pub fn to_iso_string(&self) -> String {
        let mut out = String::new();
        if self.negative {
            out.push('-');
        }
        out.push('P');
        if self.days != 0 {
            out.push_str(&format!("{}D", self.days));
        }
        let has_time =
            self.hours != 0 || self.minutes != 0 || self.seconds != 0 || self.milliseconds != 0;
        if has_time {
            out.push('T');
            if self.hours != 0 {
                out.push_str(&format!("{}H", self.hours));
            }
            if self.minutes != 0 {
                out.push_str(&format!("{}M", self.minutes));
            }
            if self.seconds != 0 || self.milliseconds != 0 {
                if self.milliseconds != 0 {
                    out.push_str(&format!("{}.{:03}S", self.seconds, self.milliseconds));
                } else {
                    out.push_str(&format!("{}S", self.seconds));
                }
            }
        }
        if self.days == 0 && !has_time {
            out.push_str("T0S");
        }
        out
    }
}

impl fmt::Display for DurationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso_string())
    }
}

/// A geographic point; X maps to longitude, Y to latitude, Z to altitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeographyPoint {
    pub longitude: f64,
    pub latitude: f64,
    pub altitude: Option<f64>,
    pub srid: Option<u32>,
}

/// A geometric point with direct X/Y/Z coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometryPoint {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
    pub srid: Option<u32>,
}

fn write_point(out: &mut String, x: f64, y: f64, z: Option<f64>, srid: Option<u32>) {
    if let Some(srid) = srid {
        out.push_str(&format!("SRID={srid};"));
    }
    out.push_str(&format!("POINT({x} {y}"));
    if let Some(z) = z {
        out.push_str(&format!(" {z}"));
    }
    out.push(')');
}

/// A parsed primitive literal value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PrimitiveValue {
    Null,
    Boolean(bool),
    SByte(i8),
    Byte(u8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Single(f32),
    Double(f64),
    Decimal(Decimal),
    String(String),
    Guid(Uuid),
    Date(DateValue),
    TimeOfDay(TimeOfDayValue),
    DateTimeOffset(DateTimeOffsetValue),
    Duration(DurationValue),
    Binary(Vec<u8>),
    Geography(GeographyPoint),
    Geometry(GeometryPoint),
}

impl PrimitiveValue {
    /// Get the primitive type of this value
    pub const fn primitive_type(&self) -> PrimitiveType {
        match self {
            Self::Null => PrimitiveType::Null,
            Self::Boolean(_) => PrimitiveType::Boolean,
            Self::SByte(_) => PrimitiveType::SByte,
            Self::Byte(_) => PrimitiveType::Byte,
            Self::Int16(_) => PrimitiveType::Int16,
            Self::Int32(_) => PrimitiveType::Int32,
            Self::Int64(_) => PrimitiveType::Int64,
            Self::Single(_) => PrimitiveType::Single,
            Self::Double(_) => PrimitiveType::Double,
            Self::Decimal(_) => PrimitiveType::Decimal,
            Self::String(_) => PrimitiveType::String,
            Self::Guid(_) => PrimitiveType::Guid,
            Self::Date(_) => PrimitiveType::Date,
            Self::TimeOfDay(_) => PrimitiveType::TimeOfDay,
            Self::DateTimeOffset(_) => PrimitiveType::DateTimeOffset,
            Self::Duration(_) => PrimitiveType::Duration,
            Self::Binary(_) => PrimitiveType::Binary,
            Self::Geography(_) => PrimitiveType::GeographyPoint,
            Self::Geometry(_) => PrimitiveType::GeometryPoint,
        }
    }

    /// Render the canonical literal form of this value
    ///
    /// Re-parsing the returned text as the same primitive type yields an
    /// equal value. Duration renders in its bare (key-as-segment) envelope.
    pub fn to_literal_text(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Boolean(b) => b.to_string(),
            Self::SByte(v) => v.to_string(),
            Self::Byte(v) => v.to_string(),
            Self::Int16(v) => v.to_string(),
            Self::Int32(v) => v.to_string(),
            Self::Int64(v) => v.to_string(),
            Self::Single(v) => v.to_string(),
            Self::Double(v) => v.to_string(),
            Self::Decimal(v) => v.to_string(),
            Self::String(s) => format!("'{}'", s.replace('\'', "''")),
            Self::Guid(g) => g.hyphenated().to_string(),
            Self::Date(d) => d.to_string(),
            Self::TimeOfDay(t) => t.to_string(),
            Self::DateTimeOffset(dto) => dto.to_string(),
            Self::Duration(d) => d.to_iso_string(),
            Self::Binary(bytes) => {
                let mut out = String::with_capacity(bytes.len() * 2 + 8);
                out.push_str("binary'");
                for b in bytes {
                    out.push_str(&format!("{b:02X}"));
                }
                out.push('\'');
                out
            }
            Self::Geography(p) => {
                let mut out = String::from("geography'");
                write_point(&mut out, p.longitude, p.latitude, p.altitude, p.srid);
                out.push('\'');
                out
            }
            Self::Geometry(p) => {
                let mut out = String::from("geometry'");
                write_point(&mut out, p.x, p.y, p.z, p.srid);
                out.push('\'');
                out
            }
        }
    }
}
