use regex::Regex;

use super::flags::{ConditionFlags, RuleFlags};
use crate::error::RuleErrorKind;
use crate::matcher::Comparator;

/// A `RewriteCond` line split into its fields.
///
/// Produced by [`parse`](crate::parse::parse); flag tokens are kept raw until
/// compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub line: usize,
    pub text: String,
    /// Test string, before `%{VAR}` expansion.
    pub test: String,
    /// Comparator pattern (`=x`, `<x`, `>x` or a regex, optionally `!`-prefixed).
    pub pattern: String,
    pub flags: Vec<String>,
}

/// A `RewriteRule` line split into its fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub line: usize,
    pub text: String,
    /// Match pattern, optionally `!`-prefixed.
    pub pattern: String,
    /// Target string, or `-` to leave the path as is.
    pub substitution: String,
    pub flags: Vec<String>,
}

/// A condition or a rule, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Condition(Condition),
    Rule(Rule),
}

/// Right-hand side of a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Substitution {
    /// `-`: keep the stripped request path.
    Unchanged,
    Target(String),
}

/// A compiled condition. A pattern that failed to compile is kept as the
/// error the pass raises when it evaluates the condition.
#[derive(Debug, Clone)]
pub(crate) struct CompiledCondition {
    pub(crate) line: usize,
    pub(crate) text: String,
    pub(crate) test: String,
    pub(crate) comparator: Result<Comparator, RuleErrorKind>,
    pub(crate) flags: ConditionFlags,
}

#[derive(Debug, Clone)]
pub(crate) struct CompiledRule {
    pub(crate) line: usize,
    pub(crate) text: String,
    pub(crate) pattern: Result<Regex, RuleErrorKind>,
    pub(crate) negated: bool,
    pub(crate) substitution: Substitution,
    pub(crate) flags: RuleFlags,
}

#[derive(Debug, Clone)]
pub(crate) enum CompiledDirective {
    Condition(CompiledCondition),
    Rule(CompiledRule),
}

impl CompiledDirective {
    pub(crate) fn line(&self) -> usize {
        match self {
            CompiledDirective::Condition(c) => c.line,
            CompiledDirective::Rule(r) => r.line,
        }
    }

    pub(crate) fn text(&self) -> &str {
        match self {
            CompiledDirective::Condition(c) => &c.text,
            CompiledDirective::Rule(r) => &r.text,
        }
    }
}
