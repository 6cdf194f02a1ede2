//! Literal parser
//!
//! Converts raw literal text into a strongly-typed primitive value. Failure
//! is an expected, frequent outcome here (callers probe candidate types), so
//! the API is a value-level try-pattern that never panics and never wraps
//! out-of-range numbers.

use crate::KeyDelimiter;
use chrono::NaiveDate;
use odata_uri_ast::{
    DateTimeOffsetValue, DateValue, DurationValue, GeographyPoint, GeometryPoint, PrimitiveType,
    PrimitiveValue, TimeOfDayValue,
};
use rust_decimal::Decimal;
use std::fmt;
use uuid::Uuid;

/// Why a literal failed to parse
///
/// Spatial payload errors are distinguished so callers can surface them;
/// everything else (including a malformed spatial type prefix) is the
/// generic failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralParseFailure {
    /// The text is not a valid literal of the target type
    Malformed,
    /// A recognized spatial literal carries invalid payload data
    InvalidSpatialData,
}

impl fmt::Display for LiteralParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => f.write_str("malformed literal"),
            Self::InvalidSpatialData => f.write_str("invalid spatial data"),
        }
    }
}

type LiteralResult = std::result::Result<PrimitiveValue, LiteralParseFailure>;

/// Literal parser configured for one key-delimiter convention
#[derive(Debug, Clone, Copy)]
pub struct LiteralParser {
    key_delimiter: KeyDelimiter,
}

impl LiteralParser {
    /// Literals as they appear inside parenthesized keys and expressions
    pub const fn for_parenthesized_keys() -> Self {
        Self {
            key_delimiter: KeyDelimiter::Parentheses,
        }
    }

    /// Literals as they appear in key-as-segment routing (bare, unwrapped)
    pub const fn for_keys_as_segments() -> Self {
        Self {
            key_delimiter: KeyDelimiter::Slash,
        }
    }

    pub const fn key_delimiter(&self) -> KeyDelimiter {
        self.key_delimiter
    }

    /// Try to parse `text` as a literal of the target type
    pub fn try_parse(&self, target: PrimitiveType, text: &str) -> LiteralResult {
        match target {
            PrimitiveType::Null => match text {
                "null" => Ok(PrimitiveValue::Null),
                _ => Err(LiteralParseFailure::Malformed),
            },
            PrimitiveType::Boolean => match text {
                "true" => Ok(PrimitiveValue::Boolean(true)),
                "false" => Ok(PrimitiveValue::Boolean(false)),
                _ => Err(LiteralParseFailure::Malformed),
            },
            PrimitiveType::SByte => parse_number(text, PrimitiveValue::SByte),
            PrimitiveType::Byte => parse_number(text, PrimitiveValue::Byte),
            PrimitiveType::Int16 => parse_number(text, PrimitiveValue::Int16),
            PrimitiveType::Int32 => parse_number(text, PrimitiveValue::Int32),
            PrimitiveType::Int64 => {
                parse_number(strip_suffix(text, &['l', 'L']), PrimitiveValue::Int64)
            }
            PrimitiveType::Single => {
                parse_number(strip_suffix(text, &['f', 'F']), PrimitiveValue::Single)
            }
            PrimitiveType::Double => {
                parse_number(strip_suffix(text, &['d', 'D']), PrimitiveValue::Double)
            }
            PrimitiveType::Decimal => strip_suffix(text, &['m', 'M'])
                .parse::<Decimal>()
                .map(PrimitiveValue::Decimal)
                .map_err(|_| LiteralParseFailure::Malformed),
            PrimitiveType::String => self.parse_string(text),
            PrimitiveType::Guid => parse_guid(text),
            PrimitiveType::Date => parse_date(text).map(PrimitiveValue::Date),
            PrimitiveType::TimeOfDay => parse_time_of_day(text).map(PrimitiveValue::TimeOfDay),
            PrimitiveType::DateTimeOffset => parse_date_time_offset(text),
            PrimitiveType::Duration => self.parse_duration(text),
            PrimitiveType::Binary => parse_binary(text),
            PrimitiveType::GeographyPoint => parse_spatial(text, "geography", true),
            PrimitiveType::GeometryPoint => parse_spatial(text, "geometry", false),
        }
    }

    fn parse_string(&self, text: &str) -> LiteralResult {
        match self.key_delimiter {
            KeyDelimiter::Parentheses => {
                unquote(text).map(PrimitiveValue::String).ok_or(LiteralParseFailure::Malformed)
            }
            // Key-as-segment strings arrive already unwrapped
            KeyDelimiter::Slash => Ok(PrimitiveValue::String(text.to_string())),
        }
    }

    fn parse_duration(&self, text: &str) -> LiteralResult {
        let envelope = match self.key_delimiter {
            KeyDelimiter::Parentheses => unwrap_prefixed(text, "duration")
                .ok_or(LiteralParseFailure::Malformed)?
                .to_string(),
            KeyDelimiter::Slash => text.to_string(),
        };
        parse_iso_duration(&envelope)
            .map(PrimitiveValue::Duration)
            .ok_or(LiteralParseFailure::Malformed)
    }
}

/// Parse via `FromStr`, which range-checks for every integer width
fn parse_number<T: std::str::FromStr>(
    text: &str,
    wrap: impl FnOnce(T) -> PrimitiveValue,
) -> LiteralResult {
    text.parse::<T>()
        .map(wrap)
        .map_err(|_| LiteralParseFailure::Malformed)
}

fn strip_suffix<'a>(text: &'a str, suffixes: &[char]) -> &'a str {
    for s in suffixes {
        if let Some(stripped) = text.strip_suffix(*s) {
            return stripped;
        }
    }
    text
}

/// Remove surrounding single quotes and collapse doubled quotes
fn unquote(text: &str) -> Option<String> {
    let inner = text.strip_prefix('\'')?.strip_suffix('\'')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch == '\'' {
            // A lone quote would have terminated the literal early
            if chars.next() != Some('\'') {
                return None;
            }
            out.push('\'');
        } else {
            out.push(ch);
        }
    }
    Some(out)
}

/// Strip a `prefix'...'` wrapper, returning the payload
fn unwrap_prefixed<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    if !head.eq_ignore_ascii_case(prefix) {
        return None;
    }
    let quoted = &text[prefix.len()..];
    quoted.strip_prefix('\'')?.strip_suffix('\'')
}

fn parse_guid(text: &str) -> LiteralResult {
    // Only the canonical hyphenated form is accepted
    let bytes = text.as_bytes();
    if bytes.len() != 36 {
        return Err(LiteralParseFailure::Malformed);
    }
    for (i, &b) in bytes.iter().enumerate() {
        let ok = match i {
            8 | 13 | 18 | 23 => b == b'-',
            _ => b.is_ascii_hexdigit(),
        };
        if !ok {
            return Err(LiteralParseFailure::Malformed);
        }
    }
    Uuid::parse_str(text)
        .map(PrimitiveValue::Guid)
        .map_err(|_| LiteralParseFailure::Malformed)
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn parse_date(text: &str) -> std::result::Result<DateValue, LiteralParseFailure> {
    let parts: Vec<&str> = text.split('-').collect();
    let [year, month, day] = parts.as_slice() else {
        return Err(LiteralParseFailure::Malformed);
    };
    if year.len() != 4 || month.len() != 2 || day.len() != 2 {
        return Err(LiteralParseFailure::Malformed);
    }
    if !(all_digits(year) && all_digits(month) && all_digits(day)) {
        return Err(LiteralParseFailure::Malformed);
    }
    let year: i32 = year.parse().map_err(|_| LiteralParseFailure::Malformed)?;
    let month: u8 = month.parse().map_err(|_| LiteralParseFailure::Malformed)?;
    let day: u8 = day.parse().map_err(|_| LiteralParseFailure::Malformed)?;
    // Calendar validation (month range, day-in-month, leap years)
    if NaiveDate::from_ymd_opt(year, month.into(), day.into()).is_none() {
        return Err(LiteralParseFailure::Malformed);
    }
    Ok(DateValue::new(year, month, day))
}

/// Scale a fraction to milliseconds: "1" -> 100, "12" -> 120, "123" -> 123;
/// further digits are sub-millisecond and dropped
fn fraction_to_milliseconds(fraction: &str) -> Option<u16> {
    if fraction.is_empty() || fraction.len() > 7 || !all_digits(fraction) {
        return None;
    }
    let ms_digits = &fraction[..fraction.len().min(3)];
    let num: u16 = ms_digits.parse().ok()?;
    Some(match ms_digits.len() {
        1 => num * 100,
        2 => num * 10,
        _ => num,
    })
}

fn parse_time_of_day(text: &str) -> std::result::Result<TimeOfDayValue, LiteralParseFailure> {
    let (main, fraction) = match text.split_once('.') {
        Some((main, fraction)) => (main, Some(fraction)),
        None => (text, None),
    };
    let parts: Vec<&str> = main.split(':').collect();
    let [hour, minute, second] = parts.as_slice() else {
        return Err(LiteralParseFailure::Malformed);
    };
    if hour.len() != 2 || minute.len() != 2 || second.len() != 2 {
        return Err(LiteralParseFailure::Malformed);
    }
    if !(all_digits(hour) && all_digits(minute) && all_digits(second)) {
        return Err(LiteralParseFailure::Malformed);
    }
    let hour: u8 = hour.parse().map_err(|_| LiteralParseFailure::Malformed)?;
    let minute: u8 = minute.parse().map_err(|_| LiteralParseFailure::Malformed)?;
    let second: u8 = second.parse().map_err(|_| LiteralParseFailure::Malformed)?;
    if hour >= 24 || minute >= 60 || second >= 60 {
        return Err(LiteralParseFailure::Malformed);
    }
    let millisecond = match fraction {
        Some(f) => fraction_to_milliseconds(f).ok_or(LiteralParseFailure::Malformed)?,
        None => 0,
    };
    Ok(TimeOfDayValue::new(hour, minute, second).with_millisecond(millisecond))
}

fn parse_date_time_offset(text: &str) -> LiteralResult {
    let (date_text, rest) = match text.split_once('T') {
        Some(parts) => parts,
        None => return Err(LiteralParseFailure::Malformed),
    };
    let date = parse_date(date_text)?;

    let (time_text, offset_minutes) = if let Some(time_text) = rest.strip_suffix('Z') {
        (time_text, 0i16)
    } else if let Some(at) = rest.rfind(['+', '-']) {
        let (time_text, zone) = rest.split_at(at);
        let sign: i16 = if zone.starts_with('-') { -1 } else { 1 };
        let zone = &zone[1..];
        let (zh, zm) = zone.split_once(':').ok_or(LiteralParseFailure::Malformed)?;
        if zh.len() != 2 || zm.len() != 2 || !all_digits(zh) || !all_digits(zm) {
            return Err(LiteralParseFailure::Malformed);
        }
        let hours: i16 = zh.parse().map_err(|_| LiteralParseFailure::Malformed)?;
        let minutes: i16 = zm.parse().map_err(|_| LiteralParseFailure::Malformed)?;
        if minutes >= 60 {
            return Err(LiteralParseFailure::Malformed);
        }
        let total = hours * 60 + minutes;
        // ISO 8601 bounds zone offsets at +/-14:00
        if total > 14 * 60 {
            return Err(LiteralParseFailure::Malformed);
        }
        (time_text, sign * total)
    } else {
        return Err(LiteralParseFailure::Malformed);
    };

    let time = parse_time_of_day(time_text)?;
    Ok(PrimitiveValue::DateTimeOffset(DateTimeOffsetValue::new(
        date,
        time,
        offset_minutes,
    )))
}

/// Parse a bare ISO-8601 duration envelope (`[-]P[nD][T[nH][nM][n[.fff]S]]`)
///
/// Year, month, and week designators are rejected: they are not
/// representable in a fixed-length duration.
fn parse_iso_duration(text: &str) -> Option<DurationValue> {
    let bytes = text.as_bytes();
    let mut at = 0;
    let negative = if bytes.first() == Some(&b'-') {
        at = 1;
        true
    } else {
        false
    };
    if bytes.get(at) != Some(&b'P') {
        return None;
    }
    at += 1;

    let mut value = DurationValue {
        negative,
        ..Default::default()
    };
    let mut in_time = false;
    let mut saw_component = false;
    // Designators must appear in order and at most once
    let mut last_rank = 0u8;

    while at < bytes.len() {
        if bytes[at] == b'T' {
            if in_time {
                return None;
            }
            in_time = true;
            at += 1;
            if !bytes.get(at).is_some_and(u8::is_ascii_digit) {
                return None;
            }
            continue;
        }

        let digits_start = at;
        while bytes.get(at).is_some_and(u8::is_ascii_digit) {
            at += 1;
        }
        if at == digits_start {
            return None;
        }
        let number: u32 = text[digits_start..at].parse().ok()?;

        let mut fraction = None;
        if bytes.get(at) == Some(&b'.') {
            let frac_start = at + 1;
            at = frac_start;
            while bytes.get(at).is_some_and(u8::is_ascii_digit) {
                at += 1;
            }
            fraction = Some(fraction_to_milliseconds(&text[frac_start..at])?);
        }

        let designator = *bytes.get(at)?;
        at += 1;
        let rank = match (in_time, designator) {
            (false, b'D') => {
                value.days = number;
                1
            }
            // Years, months and weeks have no fixed length
            (false, b'Y' | b'M' | b'W') => return None,
            (true, b'H') => {
                value.hours = number;
                2
            }
            (true, b'M') => {
                value.minutes = number;
                3
            }
            (true, b'S') => {
                value.seconds = number;
                value.milliseconds = fraction.unwrap_or(0);
                4
            }
            _ => return None,
        };
        // A fraction is only valid on the seconds component
        if fraction.is_some() && designator != b'S' {
            return None;
        }
        if rank <= last_rank {
            return None;
        }
        last_rank = rank;
        saw_component = true;
    }

    if !saw_component {
        return None;
    }
    Some(value)
}

fn parse_binary(text: &str) -> LiteralResult {
    let payload = unwrap_prefixed(text, "binary").ok_or(LiteralParseFailure::Malformed)?;
    if payload.len() % 2 != 0 {
        return Err(LiteralParseFailure::Malformed);
    }
    let mut bytes = Vec::with_capacity(payload.len() / 2);
    for pair in payload.as_bytes().chunks(2) {
        let hex = std::str::from_utf8(pair).map_err(|_| LiteralParseFailure::Malformed)?;
        let byte = u8::from_str_radix(hex, 16).map_err(|_| LiteralParseFailure::Malformed)?;
        bytes.push(byte);
    }
    Ok(PrimitiveValue::Binary(bytes))
}

/// Parse a `geography'...'` / `geometry'...'` literal
///
/// A bad type prefix is a generic failure; once the prefix is recognized,
/// payload problems report invalid spatial data.
fn parse_spatial(text: &str, prefix: &str, is_geography: bool) -> LiteralResult {
    let payload = unwrap_prefixed(text, prefix).ok_or(LiteralParseFailure::Malformed)?;
    let (x, y, z, srid) =
        parse_wkt_point(payload).ok_or(LiteralParseFailure::InvalidSpatialData)?;
    if is_geography {
        Ok(PrimitiveValue::Geography(GeographyPoint {
            longitude: x,
            latitude: y,
            altitude: z,
            srid,
        }))
    } else {
        Ok(PrimitiveValue::Geometry(GeometryPoint { x, y, z, srid }))
    }
}

/// Parse `[SRID=n;]POINT(x y [z])`, consuming the whole payload
fn parse_wkt_point(payload: &str) -> Option<(f64, f64, Option<f64>, Option<u32>)> {
    let mut rest = payload.trim();

    let srid = if rest.get(..5).is_some_and(|head| head.eq_ignore_ascii_case("SRID=")) {
        let semi = rest.find(';')?;
        let value: u32 = rest[5..semi].parse().ok()?;
        rest = rest[semi + 1..].trim_start();
        Some(value)
    } else {
        None
    };

    if !rest.get(..5).is_some_and(|head| head.eq_ignore_ascii_case("POINT")) {
        return None;
    }
    rest = rest[5..].trim_start();

    let inner = rest.strip_prefix('(')?.strip_suffix(')')?;
    let coords: Vec<f64> = inner
        .split_whitespace()
        .map(|c| c.parse::<f64>().ok())
        .collect::<Option<Vec<f64>>>()?;
    match coords.as_slice() {
        [x, y] => Some((*x, *y, None, srid)),
        [x, y, z] => Some((*x, *y, Some(*z), srid)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int32_overflow_is_failure_not_panic() {
        let parser = LiteralParser::for_parenthesized_keys();
        let result = parser.try_parse(PrimitiveType::Int32, "23500000000000000");
        assert_eq!(result, Err(LiteralParseFailure::Malformed));
    }

    #[test]
    fn test_duration_modes() {
        let wrapped = LiteralParser::for_parenthesized_keys();
        assert_eq!(
            wrapped.try_parse(PrimitiveType::Duration, "duration'P1D'"),
            Ok(PrimitiveValue::Duration(DurationValue::from_days(1)))
        );
        // The wrapped form is rejected when keys route as segments
        let bare = LiteralParser::for_keys_as_segments();
        assert!(bare.try_parse(PrimitiveType::Duration, "duration'P1D'").is_err());
        assert_eq!(
            bare.try_parse(PrimitiveType::Duration, "P1D"),
            Ok(PrimitiveValue::Duration(DurationValue::from_days(1)))
        );
    }

    #[test]
    fn test_duration_rejects_year_and_month() {
        assert_eq!(parse_iso_duration("P1Y"), None);
        assert_eq!(parse_iso_duration("P2M"), None);
        assert_eq!(parse_iso_duration("P1Y2M3D"), None);
        // Minutes after T stay valid
        assert!(parse_iso_duration("PT2M").is_some());
    }

    #[test]
    fn test_time_of_day_bounds() {
        assert!(parse_time_of_day("24:00:00").is_err());
        assert!(parse_time_of_day("-1:00:00").is_err());
        assert_eq!(
            parse_time_of_day("19:30:05.1"),
            Ok(TimeOfDayValue::new(19, 30, 5).with_millisecond(100))
        );
    }

    #[test]
    fn test_spatial_prefix_vs_payload_failures() {
        let parser = LiteralParser::for_parenthesized_keys();
        // Typo in the prefix: generic failure, no spatial claim
        assert_eq!(
            parser.try_parse(PrimitiveType::GeographyPoint, "geograph'POINT(1 2)'"),
            Err(LiteralParseFailure::Malformed)
        );
        // Unterminated ring: spatial failure
        assert_eq!(
            parser.try_parse(PrimitiveType::GeographyPoint, "geography'POLYGON((1 2, 3 4'"),
            Err(LiteralParseFailure::InvalidSpatialData)
        );
    }

    #[test]
    fn test_geography_axis_mapping() {
        let parser = LiteralParser::for_parenthesized_keys();
        let value = parser
            .try_parse(PrimitiveType::GeographyPoint, "geography'SRID=4326;POINT(10 30 5)'")
            .unwrap();
        let PrimitiveValue::Geography(point) = value else {
            panic!("expected geography point");
        };
        assert_eq!(point.longitude, 10.0);
        assert_eq!(point.latitude, 30.0);
        assert_eq!(point.altitude, Some(5.0));
        assert_eq!(point.srid, Some(4326));
    }

    #[test]
    fn test_string_unquoting() {
        let parser = LiteralParser::for_parenthesized_keys();
        assert_eq!(
            parser.try_parse(PrimitiveType::String, "'O''Brien'"),
            Ok(PrimitiveValue::String("O'Brien".to_string()))
        );
        assert!(parser.try_parse(PrimitiveType::String, "unquoted").is_err());

        let segment = LiteralParser::for_keys_as_segments();
        assert_eq!(
            segment.try_parse(PrimitiveType::String, "unquoted"),
            Ok(PrimitiveValue::String("unquoted".to_string()))
        );
    }
}
