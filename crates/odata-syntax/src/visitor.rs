//! Structural edits over a raw token chain.
//!
//! Both visitors run before binding. A `SystemToken` is never legal inside a
//! navigable path, so meeting one is an immediate `IllegalSystemToken` fault.

use crate::error::SyntaxError;
use crate::token::{EndPathToken, NonSystemToken, PathSegmentToken, SystemToken};

/// One method per token kind; `PathSegmentToken::accept` picks the method.
pub trait PathSegmentTokenVisitor {
    type Output;

    fn visit_system(&mut self, token: &mut SystemToken) -> Self::Output;
    fn visit_non_system(&mut self, token: &mut NonSystemToken) -> Self::Output;
    fn visit_end_path(&mut self, token: &mut EndPathToken) -> Self::Output;
}

fn illegal(token: &SystemToken) -> SyntaxError {
    SyntaxError::IllegalSystemToken {
        identifier: token.identifier().to_string(),
    }
}

/// Walks to the tail of a chain and links a new token there.
///
/// The walk visits every token before the tail is touched, so a fault leaves
/// the chain unchanged.
#[derive(Debug)]
pub struct EndingTokenAppender {
    new_token: Option<PathSegmentToken>,
}

impl EndingTokenAppender {
    /// `None` turns the walk into a pure legality check.
    pub fn new(new_token: Option<PathSegmentToken>) -> Self {
        Self { new_token }
    }

    pub fn apply(mut self, head: &mut PathSegmentToken) -> Result<(), SyntaxError> {
        head.accept(&mut self)
    }
}

impl PathSegmentTokenVisitor for EndingTokenAppender {
    type Output = Result<(), SyntaxError>;

    fn visit_system(&mut self, token: &mut SystemToken) -> Self::Output {
        Err(illegal(token))
    }

    fn visit_non_system(&mut self, token: &mut NonSystemToken) -> Self::Output {
        match token.next_token_mut() {
            Some(next) => next.accept(self),
            None => {
                if let Some(new_token) = self.new_token.take() {
                    token.set_next_token(Some(new_token));
                }
                Ok(())
            }
        }
    }

    fn visit_end_path(&mut self, token: &mut EndPathToken) -> Self::Output {
        if self.new_token.is_some() {
            return Err(SyntaxError::TerminalToken {
                identifier: token.identifier().to_string(),
            });
        }
        Ok(())
    }
}

/// Severs the chain in front of the first wildcard token.
///
/// The token being visited acts as the cursor: when its successor is the
/// wildcard, its forward link is cleared, discarding the wildcard and every
/// token after it.
#[derive(Debug, Default)]
pub struct WildcardStripper {
    cursor_set: bool,
}

impl WildcardStripper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects a chain containing a system token anywhere, and a chain whose
    /// first token is the wildcard (there is no cursor to cut).
    pub fn apply(&mut self, head: &mut PathSegmentToken) -> Result<(), SyntaxError> {
        ensure_no_system_tokens(head)?;
        self.cursor_set = false;
        head.accept(self)
    }
}

impl PathSegmentTokenVisitor for WildcardStripper {
    type Output = Result<(), SyntaxError>;

    fn visit_system(&mut self, token: &mut SystemToken) -> Self::Output {
        Err(illegal(token))
    }

    fn visit_non_system(&mut self, token: &mut NonSystemToken) -> Self::Output {
        if token.identifier() == crate::token::WILDCARD {
            // Only reachable for the head: successors are checked below.
            debug_assert!(!self.cursor_set);
            return Err(SyntaxError::WildcardAtHead);
        }

        let next_is_wildcard = match token.next_token() {
            None => return Ok(()),
            Some(next) => next.is_wildcard(),
        };
        self.cursor_set = true;
        if next_is_wildcard {
            token.set_next_token(None);
            return Ok(());
        }
        match token.next_token_mut() {
            Some(next) => next.accept(self),
            None => Ok(()),
        }
    }

    fn visit_end_path(&mut self, token: &mut EndPathToken) -> Self::Output {
        if token.identifier() == crate::token::WILDCARD && !self.cursor_set {
            return Err(SyntaxError::WildcardAtHead);
        }
        Ok(())
    }
}

/// Walk the forward links and fail on the first system token.
pub fn ensure_no_system_tokens(head: &PathSegmentToken) -> Result<(), SyntaxError> {
    let mut current = Some(head);
    while let Some(token) = current {
        if let PathSegmentToken::System(system) = token {
            return Err(illegal(system));
        }
        current = token.next_token();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenChain;

    fn chain(ids: &[&str]) -> TokenChain {
        let mut chain = TokenChain::new();
        for id in ids {
            let token = if id.starts_with(crate::token::SYSTEM_TOKEN_MARKER) {
                PathSegmentToken::system(*id)
            } else {
                PathSegmentToken::non_system(*id)
            };
            chain.append(token).unwrap();
        }
        chain
    }

    #[test]
    fn appender_sets_tail_link() {
        let mut c = chain(&["A", "B"]);
        EndingTokenAppender::new(Some(PathSegmentToken::non_system("C")))
            .apply(c.head_mut().unwrap())
            .unwrap();
        assert_eq!(c.identifiers(), vec!["A", "B", "C"]);
    }

    #[test]
    fn appender_without_token_is_noop() {
        let mut c = chain(&["A", "B"]);
        EndingTokenAppender::new(None)
            .apply(c.head_mut().unwrap())
            .unwrap();
        assert_eq!(c.identifiers(), vec!["A", "B"]);
    }

    #[test]
    fn appender_rejects_system_token_at_head() {
        let mut head = PathSegmentToken::system("$count");
        head.set_next_token(Some(PathSegmentToken::non_system("A")))
            .unwrap();
        let err = EndingTokenAppender::new(Some(PathSegmentToken::non_system("B")))
            .apply(&mut head)
            .unwrap_err();
        assert!(matches!(err, SyntaxError::IllegalSystemToken { identifier } if identifier == "$count"));
    }

    #[test]
    fn appender_rejects_after_end_path() {
        let mut head = PathSegmentToken::non_system("A");
        head.set_next_token(Some(PathSegmentToken::end_path("Name")))
            .unwrap();
        let err = EndingTokenAppender::new(Some(PathSegmentToken::non_system("B")))
            .apply(&mut head)
            .unwrap_err();
        assert!(matches!(err, SyntaxError::TerminalToken { .. }));
    }

    #[test]
    fn stripper_cuts_at_wildcard() {
        let mut c = chain(&["A", "B", "*", "C"]);
        c.strip_wildcard().unwrap();
        assert_eq!(c.identifiers(), vec!["A", "B"]);
    }

    #[test]
    fn stripper_leaves_chain_without_wildcard() {
        let mut c = chain(&["A", "B"]);
        c.strip_wildcard().unwrap();
        assert_eq!(c.identifiers(), vec!["A", "B"]);
    }

    #[test]
    fn stripper_handles_end_path_wildcard() {
        let mut c = chain(&["A"]);
        c.append(PathSegmentToken::end_path("*")).unwrap();
        c.strip_wildcard().unwrap();
        assert_eq!(c.identifiers(), vec!["A"]);
    }

    #[test]
    fn stripper_rejects_wildcard_at_head() {
        let mut c = chain(&["*", "A"]);
        assert_eq!(c.strip_wildcard(), Err(SyntaxError::WildcardAtHead));
        assert_eq!(c.identifiers(), vec!["*", "A"]);
    }

    #[test]
    fn stripper_rejects_system_token_after_wildcard() {
        // `A/*/$ref`: the system token sits behind the wildcard.
        let mut head = PathSegmentToken::non_system("A");
        let mut star = PathSegmentToken::non_system("*");
        star.set_next_token(Some(PathSegmentToken::system("$ref")))
            .unwrap();
        head.set_next_token(Some(star)).unwrap();
        let mut c = TokenChain::from_head(head);

        let err = c.strip_wildcard().unwrap_err();
        assert!(matches!(err, SyntaxError::IllegalSystemToken { .. }));
        assert_eq!(c.len(), 3);
    }
}
