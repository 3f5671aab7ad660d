//! Typed values of constant expressions.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use odata_syntax::csdl::CsdlConstantKind;
use odata_syntax::literal::{parse_date_time_offset, parse_duration, parse_time_of_day};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub enum EdmValue {
    Binary(Vec<u8>),
    Boolean(bool),
    Date(NaiveDate),
    DateTimeOffset(DateTime<FixedOffset>),
    Decimal(f64),
    Duration(chrono::Duration),
    Floating(f64),
    Guid(Uuid),
    Integer(i64),
    String(String),
    TimeOfDay(NaiveTime),
}

impl EdmValue {
    /// Value reported by a constant whose text failed to parse.
    pub fn zero(kind: CsdlConstantKind) -> Self {
        match kind {
            CsdlConstantKind::Binary => Self::Binary(Vec::new()),
            CsdlConstantKind::Boolean => Self::Boolean(false),
            CsdlConstantKind::Date => Self::Date(NaiveDate::default()),
            CsdlConstantKind::DateTimeOffset => Self::DateTimeOffset(DateTime::default()),
            CsdlConstantKind::Decimal => Self::Decimal(0.0),
            CsdlConstantKind::Duration => Self::Duration(chrono::Duration::zero()),
            CsdlConstantKind::Floating => Self::Floating(0.0),
            CsdlConstantKind::Guid => Self::Guid(Uuid::nil()),
            CsdlConstantKind::Integer => Self::Integer(0),
            CsdlConstantKind::String => Self::String(String::new()),
            CsdlConstantKind::TimeOfDay => Self::TimeOfDay(NaiveTime::default()),
        }
    }

    /// Parse constant text of the given kind. `None` means invalid text.
    pub fn parse(kind: CsdlConstantKind, text: &str) -> Option<Self> {
        match kind {
            CsdlConstantKind::Binary => parse_hex(text).map(Self::Binary),
            CsdlConstantKind::Boolean => match text.to_ascii_lowercase().as_str() {
                "true" => Some(Self::Boolean(true)),
                "false" => Some(Self::Boolean(false)),
                _ => None,
            },
            CsdlConstantKind::Date => NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .map(Self::Date),
            CsdlConstantKind::DateTimeOffset => {
                parse_date_time_offset(text).ok().map(Self::DateTimeOffset)
            }
            CsdlConstantKind::Decimal => text
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Self::Decimal),
            CsdlConstantKind::Duration => parse_duration(text).map(Self::Duration),
            CsdlConstantKind::Floating => parse_floating(text).map(Self::Floating),
            CsdlConstantKind::Guid => Uuid::parse_str(text).ok().map(Self::Guid),
            CsdlConstantKind::Integer => text.parse::<i64>().ok().map(Self::Integer),
            CsdlConstantKind::String => Some(Self::String(text.to_string())),
            CsdlConstantKind::TimeOfDay => parse_time_of_day(text).ok().map(Self::TimeOfDay),
        }
    }
}

fn parse_hex(text: &str) -> Option<Vec<u8>> {
    if text.len() % 2 != 0 || !text.is_ascii() {
        return None;
    }
    (0..text.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&text[i..i + 2], 16).ok())
        .collect()
}

fn parse_floating(text: &str) -> Option<f64> {
    match text {
        "INF" => Some(f64::INFINITY),
        "-INF" => Some(f64::NEG_INFINITY),
        "NaN" => Some(f64::NAN),
        _ => text.parse::<f64>().ok().filter(|v| v.is_finite()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_each_kind() {
        assert_eq!(
            EdmValue::parse(CsdlConstantKind::Binary, "0aFF"),
            Some(EdmValue::Binary(vec![0x0a, 0xff]))
        );
        assert_eq!(
            EdmValue::parse(CsdlConstantKind::Integer, "-12"),
            Some(EdmValue::Integer(-12))
        );
        assert_eq!(
            EdmValue::parse(CsdlConstantKind::Duration, "PT1M"),
            Some(EdmValue::Duration(chrono::Duration::minutes(1)))
        );
        assert!(matches!(
            EdmValue::parse(CsdlConstantKind::Floating, "INF"),
            Some(EdmValue::Floating(v)) if v.is_infinite()
        ));
    }

    #[test]
    fn rejects_bad_text() {
        assert_eq!(EdmValue::parse(CsdlConstantKind::Binary, "abc"), None);
        assert_eq!(EdmValue::parse(CsdlConstantKind::Guid, "not-a-guid"), None);
        assert_eq!(EdmValue::parse(CsdlConstantKind::Date, "2023-02-30"), None);
        assert_eq!(EdmValue::parse(CsdlConstantKind::Boolean, "yes"), None);
    }

    #[test]
    fn zero_values() {
        assert_eq!(EdmValue::zero(CsdlConstantKind::Guid), EdmValue::Guid(Uuid::nil()));
        assert_eq!(EdmValue::zero(CsdlConstantKind::Integer), EdmValue::Integer(0));
    }
}
