//! URI literal parser.
//!
//! Turns the literal text found in key predicates and operation parameters
//! into a typed value. The literal forms follow the OData URL conventions:
//!
//! - `null`, `true`, `false`
//! - `'text'` with `''` as the escaped quote
//! - `42`, `-7`, `42L`, `1.5`, `1e3`, `2.5d`, `2.5m`
//! - `01234567-89ab-cdef-0123-456789abcdef` (Guid)
//! - `2024-02-29`, `2024-02-29T10:15:00Z`, `10:15:30.5`
//! - `duration'P1DT2H'`
//! - `NS.Color'Red'` (enum member)

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while_m_n},
    character::complete::{char as pchar, digit1, one_of},
    combinator::{all_consuming, map, map_res, opt, recognize},
    multi::many1,
    sequence::{pair, preceded, terminated, tuple},
    IResult,
};
use uuid::Uuid;

use crate::error::SyntaxError;
use crate::segment::{identifier, quoted};

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Guid(Uuid),
    Date(NaiveDate),
    DateTimeOffset(DateTime<FixedOffset>),
    TimeOfDay(NaiveTime),
    /// ISO 8601 duration text, without the `duration'...'` wrapper.
    Duration(String),
    Enum { type_name: String, member: String },
}

impl LiteralValue {
    /// Short name of the literal form, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            LiteralValue::Null => "null",
            LiteralValue::Boolean(_) => "boolean",
            LiteralValue::Integer(_) => "integer",
            LiteralValue::Double(_) => "decimal",
            LiteralValue::String(_) => "string",
            LiteralValue::Guid(_) => "guid",
            LiteralValue::Date(_) => "date",
            LiteralValue::DateTimeOffset(_) => "datetimeoffset",
            LiteralValue::TimeOfDay(_) => "timeofday",
            LiteralValue::Duration(_) => "duration",
            LiteralValue::Enum { .. } => "enum",
        }
    }
}

fn unquote(text: &str) -> String {
    text[1..text.len() - 1].replace("''", "'")
}

fn hex(n: usize) -> impl FnMut(&str) -> IResult<&str, &str> {
    move |input| take_while_m_n(n, n, |c: char| c.is_ascii_hexdigit())(input)
}

fn digits(n: usize) -> impl FnMut(&str) -> IResult<&str, &str> {
    move |input| take_while_m_n(n, n, |c: char| c.is_ascii_digit())(input)
}

fn null(input: &str) -> IResult<&str, LiteralValue> {
    map(tag("null"), |_| LiteralValue::Null)(input)
}

fn boolean(input: &str) -> IResult<&str, LiteralValue> {
    alt((
        map(tag("true"), |_| LiteralValue::Boolean(true)),
        map(tag("false"), |_| LiteralValue::Boolean(false)),
    ))(input)
}

fn duration(input: &str) -> IResult<&str, LiteralValue> {
    map(preceded(tag("duration"), quoted), |q| {
        LiteralValue::Duration(unquote(q))
    })(input)
}

fn string(input: &str) -> IResult<&str, LiteralValue> {
    map(quoted, |q| LiteralValue::String(unquote(q)))(input)
}

fn qualified_name(input: &str) -> IResult<&str, &str> {
    recognize(pair(identifier, many1(preceded(pchar('.'), identifier))))(input)
}

fn enum_member(input: &str) -> IResult<&str, LiteralValue> {
    map(pair(qualified_name, quoted), |(type_name, q)| {
        LiteralValue::Enum {
            type_name: type_name.to_string(),
            member: unquote(q),
        }
    })(input)
}

fn guid(input: &str) -> IResult<&str, LiteralValue> {
    map_res(
        recognize(tuple((
            hex(8),
            pchar('-'),
            hex(4),
            pchar('-'),
            hex(4),
            pchar('-'),
            hex(4),
            pchar('-'),
            hex(12),
        ))),
        |text: &str| Uuid::parse_str(text).map(LiteralValue::Guid),
    )(input)
}

fn date_text(input: &str) -> IResult<&str, &str> {
    recognize(tuple((digits(4), pchar('-'), digits(2), pchar('-'), digits(2))))(input)
}

fn time_text(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        digits(2),
        pchar(':'),
        digits(2),
        opt(tuple((
            pchar(':'),
            digits(2),
            opt(pair(pchar('.'), digit1)),
        ))),
    )))(input)
}

fn offset_text(input: &str) -> IResult<&str, &str> {
    alt((
        tag("Z"),
        recognize(tuple((one_of("+-"), digits(2), pchar(':'), digits(2)))),
    ))(input)
}

/// Parse an ISO 8601 date-time with offset; seconds are optional.
pub fn parse_date_time_offset(text: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    let normalized = match text.strip_suffix('Z') {
        Some(rest) => format!("{rest}+00:00"),
        None => text.to_string(),
    };
    DateTime::parse_from_rfc3339(&normalized)
        .or_else(|_| DateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M%:z"))
}

/// Parse `HH:MM[:SS[.fff]]`.
pub fn parse_time_of_day(text: &str) -> Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(text, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
}

fn duration_component<'a>(unit: char) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    terminated(
        recognize(pair(digit1, opt(pair(pchar('.'), digit1)))),
        pchar(unit),
    )
}

/// Parse an ISO 8601 day-time duration (`P1DT2H30M`, `-PT0.5S`).
///
/// Year and month designators are not accepted: they have no fixed length.
pub fn parse_duration(text: &str) -> Option<chrono::Duration> {
    let parser = tuple((
        opt(pchar('-')),
        pchar('P'),
        opt(duration_component('D')),
        opt(preceded(
            pchar('T'),
            tuple((
                opt(duration_component('H')),
                opt(duration_component('M')),
                opt(duration_component('S')),
            )),
        )),
    ));
    let (_, (sign, _, days, time)) = all_consuming(parser)(text).ok()?;

    let (hours, minutes, seconds) = match time {
        Some((None, None, None)) => return None,
        Some(parts) => parts,
        None if days.is_none() => return None,
        None => (None, None, None),
    };

    let mut total = 0f64;
    for (part, scale) in [(days, 86_400.0), (hours, 3_600.0), (minutes, 60.0), (seconds, 1.0)] {
        if let Some(part) = part {
            total += part.parse::<f64>().ok()? * scale;
        }
    }
    // Out-of-range durations are invalid, not clamped.
    let nanos = (total * 1e9).round();
    if !nanos.is_finite() || nanos >= i64::MAX as f64 {
        return None;
    }
    let nanos = nanos as i64;
    Some(chrono::Duration::nanoseconds(if sign.is_some() { -nanos } else { nanos }))
}

fn date_time_offset(input: &str) -> IResult<&str, LiteralValue> {
    map_res(
        recognize(tuple((date_text, pchar('T'), time_text, offset_text))),
        |text: &str| parse_date_time_offset(text).map(LiteralValue::DateTimeOffset),
    )(input)
}

fn date(input: &str) -> IResult<&str, LiteralValue> {
    map_res(date_text, |text: &str| {
        NaiveDate::parse_from_str(text, "%Y-%m-%d").map(LiteralValue::Date)
    })(input)
}

fn time_of_day(input: &str) -> IResult<&str, LiteralValue> {
    map_res(time_text, |text: &str| {
        parse_time_of_day(text).map(LiteralValue::TimeOfDay)
    })(input)
}

enum NumberForm {
    Integer,
    Floating,
}

fn number(input: &str) -> IResult<&str, LiteralValue> {
    let (rest, (text, fraction, exponent, suffix)) = tuple((
        recognize(pair(opt(one_of("+-")), digit1)),
        opt(recognize(pair(pchar('.'), digit1))),
        opt(recognize(tuple((one_of("eE"), opt(one_of("+-")), digit1)))),
        opt(one_of("LlDdFfMm")),
    ))(input)?;

    let form = match (fraction, exponent, suffix) {
        (None, None, None) | (None, None, Some('L' | 'l')) => NumberForm::Integer,
        (_, _, Some('L' | 'l')) => {
            return Err(nom::Err::Error(nom::error::Error::new(
                input,
                nom::error::ErrorKind::Digit,
            )))
        }
        _ => NumberForm::Floating,
    };

    let mut numeric = text.to_string();
    numeric.push_str(fraction.unwrap_or(""));
    numeric.push_str(exponent.unwrap_or(""));

    let value = match form {
        NumberForm::Integer => numeric.parse::<i64>().map(LiteralValue::Integer).ok(),
        NumberForm::Floating => numeric.parse::<f64>().map(LiteralValue::Double).ok(),
    };
    match value {
        Some(value) => Ok((rest, value)),
        None => Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Digit,
        ))),
    }
}

fn literal(input: &str) -> IResult<&str, LiteralValue> {
    alt((
        null,
        boolean,
        duration,
        string,
        enum_member,
        guid,
        date_time_offset,
        date,
        time_of_day,
        number,
    ))(input)
}

/// Parse a complete literal; trailing text is an error.
pub fn parse_literal(text: &str) -> Result<LiteralValue, SyntaxError> {
    match all_consuming(literal)(text) {
        Ok((_, value)) => Ok(value),
        Err(_) => Err(SyntaxError::InvalidLiteral {
            text: text.to_string(),
        }),
    }
}
