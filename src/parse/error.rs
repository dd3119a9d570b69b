use std::fmt;

/// Errors produced when turning rule text into a [`RuleSet`](crate::RuleSet).
///
/// Bad patterns and flag arguments are not parse errors: they are kept on
/// the compiled directive and raised by the pass that reaches it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A condition or rule line with missing or trailing fields. Carries the
    /// 1-based line number and the trimmed line text.
    Malformed { line: usize, text: String },
}

impl ParseError {
    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            ParseError::Malformed { line, .. } => *line,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Malformed { line, text } => {
                write!(f, "parse error on line {line}: malformed directive `{text}`")
            }
        }
    }
}

impl std::error::Error for ParseError {}
