use thiserror::Error;

/// Syntax faults raised while editing or splitting a raw path.
///
/// These are always fatal to the current operation; nothing in the syntactic
/// layer tries to recover from them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    /// A control-marker token (`$...`) was found inside a navigable path.
    #[error("illegal system query option `{identifier}` inside a path")]
    IllegalSystemToken { identifier: String },

    /// Tried to link a token after an `EndPathToken`.
    #[error("cannot append after terminal token `{identifier}`")]
    TerminalToken { identifier: String },

    /// The wildcard is the first token: there is no preceding token whose
    /// link could be severed.
    #[error("wildcard `*` cannot be the first segment of a path")]
    WildcardAtHead,

    #[error("invalid path segment `{segment}`: {message}")]
    InvalidSegment { segment: String, message: String },

    #[error("invalid literal `{text}`")]
    InvalidLiteral { text: String },
}
