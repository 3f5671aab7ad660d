//! Forward-linked path token chain.
//!
//! A raw resource path such as `Orders(1)/Customer/*` arrives from the
//! tokenizer as a chain of tokens, each owning the next one. The chain has a
//! single owner (`TokenChain`), so it is acyclic by construction; the only
//! structural edit is replacing a token's forward link.

use std::fmt;

use crate::error::SyntaxError;
use crate::segment::parse_segment;
use crate::visitor::{EndingTokenAppender, PathSegmentTokenVisitor, WildcardStripper};

/// Prefix of system query options (`$count`, `$ref`, ...).
pub const SYSTEM_TOKEN_MARKER: char = '$';

/// Identifier meaning "discard the remainder of the path".
pub const WILDCARD: &str = "*";

/// One predicate value attached to a segment: `(1)`, `(Id=1)`, `(n=5)`.
///
/// `value` is the raw literal text; it is only interpreted once the binder
/// knows which type it has to convert to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedValue {
    pub name: Option<String>,
    pub value: String,
}

impl NamedValue {
    pub fn positional(value: impl Into<String>) -> Self {
        Self {
            name: None,
            value: value.into(),
        }
    }

    pub fn named(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            value: value.into(),
        }
    }
}

impl fmt::Display for NamedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name}={}", self.value),
            None => f.write_str(&self.value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemToken {
    identifier: String,
    next_token: Option<Box<PathSegmentToken>>,
}

impl SystemToken {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            next_token: None,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn next_token(&self) -> Option<&PathSegmentToken> {
        self.next_token.as_deref()
    }

    pub fn set_next_token(&mut self, next: Option<PathSegmentToken>) {
        self.next_token = next.map(Box::new);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonSystemToken {
    identifier: String,
    named_values: Vec<NamedValue>,
    next_token: Option<Box<PathSegmentToken>>,
}

impl NonSystemToken {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self::with_values(identifier, Vec::new())
    }

    pub fn with_values(identifier: impl Into<String>, named_values: Vec<NamedValue>) -> Self {
        Self {
            identifier: identifier.into(),
            named_values,
            next_token: None,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn named_values(&self) -> &[NamedValue] {
        &self.named_values
    }

    pub fn next_token(&self) -> Option<&PathSegmentToken> {
        self.next_token.as_deref()
    }

    pub fn next_token_mut(&mut self) -> Option<&mut PathSegmentToken> {
        self.next_token.as_deref_mut()
    }

    pub fn set_next_token(&mut self, next: Option<PathSegmentToken>) {
        self.next_token = next.map(Box::new);
    }
}

/// Terminal token: "access property `identifier` on the preceding context".
///
/// It has no forward link. `context` is the token the property is accessed
/// on; when absent the property applies to the implicit current resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndPathToken {
    identifier: String,
    context: Option<Box<PathSegmentToken>>,
}

impl EndPathToken {
    pub fn new(identifier: impl Into<String>, context: Option<PathSegmentToken>) -> Self {
        Self {
            identifier: identifier.into(),
            context: context.map(Box::new),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn context(&self) -> Option<&PathSegmentToken> {
        self.context.as_deref()
    }
}

/// Closed set of raw path tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegmentToken {
    System(SystemToken),
    NonSystem(NonSystemToken),
    EndPath(EndPathToken),
}

impl PathSegmentToken {
    pub fn system(identifier: impl Into<String>) -> Self {
        Self::System(SystemToken::new(identifier))
    }

    pub fn non_system(identifier: impl Into<String>) -> Self {
        Self::NonSystem(NonSystemToken::new(identifier))
    }

    pub fn with_values(identifier: impl Into<String>, values: Vec<NamedValue>) -> Self {
        Self::NonSystem(NonSystemToken::with_values(identifier, values))
    }

    pub fn end_path(identifier: impl Into<String>) -> Self {
        Self::EndPath(EndPathToken::new(identifier, None))
    }

    pub fn identifier(&self) -> &str {
        match self {
            Self::System(t) => t.identifier(),
            Self::NonSystem(t) => t.identifier(),
            Self::EndPath(t) => t.identifier(),
        }
    }

    /// Predicate values; only non-system tokens carry any.
    pub fn named_values(&self) -> &[NamedValue] {
        match self {
            Self::NonSystem(t) => t.named_values(),
            Self::System(_) | Self::EndPath(_) => &[],
        }
    }

    pub fn next_token(&self) -> Option<&PathSegmentToken> {
        match self {
            Self::System(t) => t.next_token(),
            Self::NonSystem(t) => t.next_token(),
            Self::EndPath(_) => None,
        }
    }

    pub fn is_system(&self) -> bool {
        matches!(self, Self::System(_))
    }

    pub fn is_wildcard(&self) -> bool {
        match self {
            Self::NonSystem(t) => t.identifier() == WILDCARD,
            Self::EndPath(t) => t.identifier() == WILDCARD,
            Self::System(_) => false,
        }
    }

    /// Replace the forward link. Fails on `EndPathToken`, which has none.
    pub fn set_next_token(&mut self, next: Option<PathSegmentToken>) -> Result<(), SyntaxError> {
        match self {
            Self::System(t) => t.set_next_token(next),
            Self::NonSystem(t) => t.set_next_token(next),
            Self::EndPath(t) => {
                if next.is_some() {
                    return Err(SyntaxError::TerminalToken {
                        identifier: t.identifier.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Dispatch to the visitor method matching this token's kind.
    pub fn accept<V: PathSegmentTokenVisitor>(&mut self, visitor: &mut V) -> V::Output {
        match self {
            Self::System(t) => visitor.visit_system(t),
            Self::NonSystem(t) => visitor.visit_non_system(t),
            Self::EndPath(t) => visitor.visit_end_path(t),
        }
    }
}

impl fmt::Display for PathSegmentToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())?;
        let values = self.named_values();
        if !values.is_empty() {
            f.write_str("(")?;
            for (i, value) in values.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{value}")?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}

/// Single owner of a token chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenChain {
    head: Option<Box<PathSegmentToken>>,
}

impl TokenChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_head(head: PathSegmentToken) -> Self {
        Self {
            head: Some(Box::new(head)),
        }
    }

    /// Build a chain from raw segment strings (`["Orders(1)", "Customer"]`).
    pub fn from_segments<S: AsRef<str>>(segments: &[S]) -> Result<Self, SyntaxError> {
        let mut chain = Self::new();
        for segment in segments {
            let raw = parse_segment(segment.as_ref())?;
            chain.append(raw.into_token())?;
        }
        Ok(chain)
    }

    pub fn head(&self) -> Option<&PathSegmentToken> {
        self.head.as_deref()
    }

    pub fn head_mut(&mut self) -> Option<&mut PathSegmentToken> {
        self.head.as_deref_mut()
    }

    pub fn into_head(self) -> Option<PathSegmentToken> {
        self.head.map(|b| *b)
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            next: self.head.as_deref(),
        }
    }

    pub fn identifiers(&self) -> Vec<&str> {
        self.iter().map(PathSegmentToken::identifier).collect()
    }

    /// Link `token` after the current tail.
    pub fn append(&mut self, token: PathSegmentToken) -> Result<(), SyntaxError> {
        match self.head.as_deref_mut() {
            None => {
                self.head = Some(Box::new(token));
                Ok(())
            }
            Some(head) => EndingTokenAppender::new(Some(token)).apply(head),
        }
    }

    /// Drop the first wildcard token and everything after it.
    pub fn strip_wildcard(&mut self) -> Result<(), SyntaxError> {
        match self.head.as_deref_mut() {
            None => Ok(()),
            Some(head) => WildcardStripper::new().apply(head),
        }
    }
}

impl fmt::Display for TokenChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{token}")?;
        }
        Ok(())
    }
}

pub struct Iter<'a> {
    next: Option<&'a PathSegmentToken>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a PathSegmentToken;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.next_token();
        Some(current)
    }
}

impl<'a> IntoIterator for &'a TokenChain {
    type Item = &'a PathSegmentToken;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
