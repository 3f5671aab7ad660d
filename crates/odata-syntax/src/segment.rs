//! Splitting one raw path segment into identifier + predicate values.
//!
//! Input is a single, already percent-decoded segment as the path factory
//! receives it (`Orders(1)`, `Lines(OrderId=1,LineNo=2)`, `GetTop(n=5)`,
//! `$count`). Literal text inside the parentheses is kept verbatim.

use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, take_while, take_while1},
    character::complete::char as pchar,
    combinator::{all_consuming, map, opt, recognize},
    multi::{many0, many1, separated_list0},
    sequence::{delimited, pair, preceded},
    IResult,
};

use crate::error::SyntaxError;
use crate::token::{NamedValue, PathSegmentToken, SYSTEM_TOKEN_MARKER};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSegment {
    pub identifier: String,
    pub named_values: Vec<NamedValue>,
}

impl RawSegment {
    pub fn is_system(&self) -> bool {
        self.identifier.starts_with(SYSTEM_TOKEN_MARKER)
    }

    pub fn into_token(self) -> PathSegmentToken {
        if self.is_system() {
            PathSegmentToken::system(self.identifier)
        } else {
            PathSegmentToken::with_values(self.identifier, self.named_values)
        }
    }
}

pub(crate) fn quoted(input: &str) -> IResult<&str, &str> {
    recognize(delimited(
        pchar('\''),
        many0(alt((tag("''"), is_not("'")))),
        pchar('\''),
    ))(input)
}

pub(crate) fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_alphabetic() || c == '_'),
        take_while(|c: char| c.is_alphanumeric() || c == '_'),
    ))(input)
}

fn value(input: &str) -> IResult<&str, &str> {
    recognize(many1(alt((quoted, is_not("',()=")))))(input)
}

fn predicate(input: &str) -> IResult<&str, NamedValue> {
    alt((
        map(pair(identifier, preceded(pchar('='), value)), |(name, v)| {
            NamedValue::named(name, v)
        }),
        map(value, NamedValue::positional),
    ))(input)
}

fn predicates(input: &str) -> IResult<&str, Vec<NamedValue>> {
    delimited(
        pchar('('),
        separated_list0(pchar(','), predicate),
        pchar(')'),
    )(input)
}

fn segment(input: &str) -> IResult<&str, (&str, Option<Vec<NamedValue>>)> {
    pair(take_while1(|c: char| c != '(' && c != ')'), opt(predicates))(input)
}

/// Split `text` into an identifier and its (possibly empty) predicate list.
pub fn parse_segment(text: &str) -> Result<RawSegment, SyntaxError> {
    if text.is_empty() {
        return Err(SyntaxError::InvalidSegment {
            segment: String::new(),
            message: "empty segment".to_string(),
        });
    }

    match all_consuming(segment)(text) {
        Ok((_, (identifier, values))) => Ok(RawSegment {
            identifier: identifier.to_string(),
            named_values: values.unwrap_or_default(),
        }),
        Err(err) => Err(SyntaxError::InvalidSegment {
            segment: text.to_string(),
            message: format!("{err}"),
        }),
    }
}
