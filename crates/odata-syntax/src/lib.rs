//! OData syntactic layer
//!
//! This crate holds everything that exists *before* a path is bound to a
//! schema:
//!
//! - `token`: the forward-linked path token chain (`SystemToken`,
//!   `NonSystemToken`, `EndPathToken`) and its owner `TokenChain`,
//! - `visitor`: the two structural edits applied to a raw chain before binding
//!   (append a terminal token, strip a wildcard tail),
//! - `segment`: splitting one raw segment (`Orders(1)`) into identifier +
//!   predicate values,
//! - `literal`: URI literal text (`'abc'`, `42`, Guids, dates) to typed values,
//! - `csdl`: the syntactic schema AST produced by an external CSDL reader.
//!
//! Nothing in here knows about types; see `odata-edm` for the semantic model
//! and `odata-uri` for the binder.

pub mod csdl;
pub mod error;
pub mod literal;
pub mod segment;
pub mod token;
pub mod visitor;

pub use error::SyntaxError;
pub use literal::{parse_duration, parse_literal, LiteralValue};
pub use segment::{parse_segment, RawSegment};
pub use token::{
    EndPathToken, NamedValue, NonSystemToken, PathSegmentToken, SystemToken, TokenChain,
    SYSTEM_TOKEN_MARKER, WILDCARD,
};
pub use visitor::{EndingTokenAppender, PathSegmentTokenVisitor, WildcardStripper};
