use odata_syntax::SyntaxError;
use thiserror::Error;

/// Why a path could not be bound. Binding stops at the first fault; no
/// partial path is ever returned alongside one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    #[error("the resource path is empty")]
    EmptyPath,

    #[error("segment {index} `{identifier}` is a system token and cannot appear in a resource path")]
    IllegalToken { identifier: String, index: usize },

    #[error("segment {index} `{identifier}` not found on {context}")]
    SegmentNotFound {
        identifier: String,
        index: usize,
        context: String,
    },

    #[error("segment {index} `{identifier}` is ambiguous between {}", candidates.join(", "))]
    AmbiguousSegment {
        identifier: String,
        index: usize,
        candidates: Vec<String>,
    },

    #[error("key predicate on segment {index} `{identifier}`: {reason}")]
    KeyPredicateMismatch {
        identifier: String,
        index: usize,
        reason: String,
    },

    #[error("segment {index}: `{identifier}` is not assignable to `{current_type}`")]
    TypeCastNotAssignable {
        identifier: String,
        index: usize,
        current_type: String,
    },

    #[error("path has {count} segments, more than the allowed {max}")]
    TooManySegments { count: usize, max: usize },

    #[error("the model declares no entity container")]
    NoEntityContainer,

    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

impl BindingError {
    /// Index of the offending segment, when the fault belongs to one.
    pub fn segment_index(&self) -> Option<usize> {
        match self {
            Self::IllegalToken { index, .. }
            | Self::SegmentNotFound { index, .. }
            | Self::AmbiguousSegment { index, .. }
            | Self::KeyPredicateMismatch { index, .. }
            | Self::TypeCastNotAssignable { index, .. } => Some(*index),
            Self::EmptyPath
            | Self::TooManySegments { .. }
            | Self::NoEntityContainer
            | Self::Syntax(_) => None,
        }
    }
}
