use std::cmp::Ordering;

use regex::{Captures, Regex, RegexBuilder};

use crate::error::RuleErrorKind;
use crate::types::CompiledRule;

/// Groups captured by the most recent match.
///
/// Index 0 is the whole match. A group that did not take part in the match,
/// or every group of a match that failed, reads as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Groups(Vec<Option<String>>);

impl Groups {
    pub(crate) fn from_captures(captures: &Captures<'_>) -> Self {
        Self(
            captures
                .iter()
                .map(|group| group.map(|m| m.as_str().to_owned()))
                .collect(),
        )
    }

    /// `len` non-participating groups.
    pub(crate) fn unmatched(len: usize) -> Self {
        Self(vec![None; len])
    }

    /// Group `index`, or `None` if the pattern has no such group.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0
            .get(index)
            .map(|group| group.as_deref().unwrap_or_default())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone)]
enum Comparison {
    Equal(String),
    Less(String),
    Greater(String),
    Pattern(Regex),
}

/// A compiled `RewriteCond` pattern.
#[derive(Debug, Clone)]
pub(crate) struct Comparator {
    comparison: Comparison,
    negated: bool,
    no_case: bool,
}

impl Comparator {
    /// Compile `pattern`: an optional leading `!`, then `=text`, `<text`,
    /// `>text` or a regular expression.
    pub(crate) fn parse(pattern: &str, no_case: bool) -> Result<Self, regex::Error> {
        let (negated, pattern) = match pattern.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, pattern),
        };
        let comparison = if let Some(text) = pattern.strip_prefix('=') {
            Comparison::Equal(text.to_owned())
        } else if let Some(text) = pattern.strip_prefix('<') {
            Comparison::Less(text.to_owned())
        } else if let Some(text) = pattern.strip_prefix('>') {
            Comparison::Greater(text.to_owned())
        } else {
            Comparison::Pattern(
                RegexBuilder::new(pattern)
                    .case_insensitive(no_case)
                    .build()?,
            )
        };
        Ok(Self {
            comparison,
            negated,
            no_case,
        })
    }

    /// Test `value`. Only regex comparisons produce groups.
    pub(crate) fn test(&self, value: &str) -> ConditionMatch {
        let (matched, groups) = match &self.comparison {
            Comparison::Equal(text) if self.no_case => {
                (value.to_lowercase() == text.to_lowercase(), None)
            }
            Comparison::Equal(text) => (value == text, None),
            // Ordinal comparisons ignore NC.
            Comparison::Less(text) => (value.cmp(text.as_str()) == Ordering::Less, None),
            Comparison::Greater(text) => (value.cmp(text.as_str()) == Ordering::Greater, None),
            Comparison::Pattern(regex) => match regex.captures(value) {
                Some(captures) => (true, Some(Groups::from_captures(&captures))),
                None => (false, Some(Groups::unmatched(regex.captures_len()))),
            },
        };
        ConditionMatch {
            matched: matched != self.negated,
            groups,
        }
    }
}

/// Result of testing one condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionMatch {
    pub matched: bool,
    /// Groups for `%N`; `None` unless the comparator is a regex.
    pub groups: Option<Groups>,
}

/// Evaluate a condition pattern against an already substituted value.
///
/// ```
/// use rewrite_rules::test_condition;
///
/// assert!(test_condition("WWW.foo.org", "=www.foo.org", true).unwrap().matched);
/// assert!(!test_condition("b", "<a", false).unwrap().matched);
/// let m = test_condition("foo=bar", "foo=(.+)", false).unwrap();
/// assert_eq!(m.groups.unwrap().get(1), Some("bar"));
/// ```
///
/// # Errors
///
/// Returns the regex error when `pattern` is an invalid regular expression.
pub fn test_condition(
    value: &str,
    pattern: &str,
    no_case: bool,
) -> Result<ConditionMatch, regex::Error> {
    Ok(Comparator::parse(pattern, no_case)?.test(value))
}

/// Apply `rule`'s pattern to `subject`. Returns the groups when the rule
/// fires, i.e. when the pattern matched and is not negated, or did not match
/// and is negated.
///
/// A pattern that failed to compile is reported here, when a pass first
/// tries it.
pub(crate) fn match_rule(
    rule: &CompiledRule,
    subject: &str,
) -> Result<Option<Groups>, RuleErrorKind> {
    let pattern = rule.pattern.as_ref().map_err(Clone::clone)?;
    let captures = pattern.captures(subject);
    if captures.is_some() == rule.negated {
        return Ok(None);
    }
    Ok(Some(match captures {
        Some(captures) => Groups::from_captures(&captures),
        None => Groups::unmatched(pattern.captures_len()),
    }))
}
