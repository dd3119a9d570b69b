use thiserror::Error;

use crate::parse::ParseError;

/// Why a rule could not be evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleErrorKind {
    #[error("environment variable not found: %{{{0}}}")]
    UndefinedVariable(String),

    /// Holds the reference as written, e.g. `$3` or `%1`.
    #[error("back reference not found: {0}")]
    MissingBackReference(String),

    #[error("invalid flag argument: {0}")]
    InvalidFlagArgument(String),

    #[error("invalid pattern: {0}")]
    InvalidPattern(String),
}

/// A rule failed while the pass was at `url`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} (line {line}: `{rule}`, url `{url}`)")]
pub struct RuleEvaluationError {
    pub kind: RuleErrorKind,
    pub line: usize,
    pub rule: String,
    pub url: String,
}

/// Unified error type for an interpretation pass.
///
/// The first error aborts the pass; no partial [`Outcome`](crate::Outcome)
/// is produced.
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("malformed directive on line {line}: `{text}`")]
    MalformedDirective { line: usize, text: String },

    #[error(transparent)]
    Evaluation(#[from] RuleEvaluationError),

    #[error("rewrite did not settle after {processed} directives (url `{url}`)")]
    LoopLimitExceeded { processed: usize, url: String },

    #[error("invalid request url: {0}")]
    InvalidUrl(#[from] http::uri::InvalidUri),
}

impl From<ParseError> for RewriteError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Malformed { line, text } => RewriteError::MalformedDirective { line, text },
        }
    }
}

impl RewriteError {
    /// The evaluation error kind, when there is one.
    #[must_use]
    pub fn kind(&self) -> Option<&RuleErrorKind> {
        match self {
            RewriteError::Evaluation(err) => Some(&err.kind),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_variable_message() {
        let kind = RuleErrorKind::UndefinedVariable("foo".into());
        assert_eq!(kind.to_string(), "environment variable not found: %{foo}");
    }

    #[test]
    fn evaluation_error_message() {
        let err = RuleEvaluationError {
            kind: RuleErrorKind::MissingBackReference("$2".into()),
            line: 3,
            rule: "RewriteRule (a) $2".into(),
            url: "/a".into(),
        };
        assert_eq!(
            err.to_string(),
            "back reference not found: $2 (line 3: `RewriteRule (a) $2`, url `/a`)"
        );
    }

    #[test]
    fn malformed_line_maps_to_malformed_directive() {
        let err = RewriteError::from(ParseError::Malformed {
            line: 1,
            text: "RewriteRule a".into(),
        });
        assert!(matches!(
            err,
            RewriteError::MalformedDirective { line: 1, .. }
        ));
        assert_eq!(err.to_string(), "malformed directive on line 1: `RewriteRule a`");
    }

    #[test]
    fn loop_limit_message() {
        let err = RewriteError::LoopLimitExceeded {
            processed: 64,
            url: "/a".into(),
        };
        assert_eq!(
            err.to_string(),
            "rewrite did not settle after 64 directives (url `/a`)"
        );
        assert!(err.kind().is_none());
    }
}
