use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use super::action::Outcome;
use super::directive::{DirectiveLine, LineCategory};
use super::report::EvaluationReport;
use super::request::RequestFacts;
use super::rule::CompiledDirective;
use super::settings::RewriteOptions;
use crate::error::RewriteError;
use crate::parse::ParseError;

/// Builder for rule text.
///
/// Each call appends one line; [`compile`](Self::compile) parses the result
/// exactly as if it had been read from a settings store.
///
/// # Example
///
/// ```
/// use rewrite_rules::{RequestFacts, RuleSetBuilder};
///
/// let ruleset = RuleSetBuilder::new()
///     .comment("canonical host")
///     .condition("%{HTTP_HOST}", "!^www\\.", &["NC"])
///     .rule("^/(.*)$", "http://www.foo.org/$1", &["R=301", "L"])
///     .compile()
///     .unwrap();
///
/// let outcome = ruleset
///     .interpret(&RequestFacts::new("/a").host("foo.org"))
///     .unwrap();
/// assert_eq!(outcome.action().url(), Some("http://www.foo.org/a"));
/// ```
#[derive(Debug, Default, Clone)]
pub struct RuleSetBuilder {
    lines: Vec<String>,
}

fn directive(keyword: &str, first: &str, second: &str, flags: &[&str]) -> String {
    if flags.is_empty() {
        format!("{keyword} {first} {second}")
    } else {
        format!("{keyword} {first} {second} [{}]", flags.join(","))
    }
}

impl RuleSetBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a `RewriteCond` line.
    #[must_use]
    pub fn condition(mut self, test: &str, pattern: &str, flags: &[&str]) -> Self {
        self.lines
            .push(directive("RewriteCond", test, pattern, flags));
        self
    }

    /// Append a `RewriteRule` line.
    #[must_use]
    pub fn rule(mut self, pattern: &str, substitution: &str, flags: &[&str]) -> Self {
        self.lines
            .push(directive("RewriteRule", pattern, substitution, flags));
        self
    }

    #[must_use]
    pub fn comment(mut self, text: &str) -> Self {
        self.lines.push(format!("# {text}"));
        self
    }

    /// The rule text built so far.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }

    /// Parse and compile the built text.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if a line is malformed.
    pub fn compile(self) -> Result<RuleSet, ParseError> {
        RuleSet::parse(&self.to_text())
    }
}

/// Compiled rule text. Immutable, `Send + Sync`, and cheap to share behind
/// `Arc`; every call to [`interpret`](Self::interpret) runs an independent
/// pass.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub(crate) lines: Vec<DirectiveLine>,
    pub(crate) directives: Vec<CompiledDirective>,
}

impl RuleSet {
    /// Parse and compile rule text.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] on the first malformed line. Invalid patterns
    /// and flag arguments are raised later, by a pass that reaches them.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        Ok(crate::compile::compile(crate::parse::parse(text)?))
    }

    /// Run one pass for `facts` with default [`RewriteOptions`].
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError`] when a rule fails to evaluate or the pass
    /// does not settle.
    pub fn interpret(&self, facts: &RequestFacts) -> Result<Outcome, RewriteError> {
        self.interpret_with(facts, &RewriteOptions::default())
    }

    /// Run one pass for `facts`.
    ///
    /// # Errors
    ///
    /// See [`interpret`](Self::interpret).
    pub fn interpret_with(
        &self,
        facts: &RequestFacts,
        options: &RewriteOptions,
    ) -> Result<Outcome, RewriteError> {
        crate::evaluate::interpret(&self.directives, facts, options).map(|trace| trace.outcome)
    }

    /// Run one pass and report which rules fired, how many directives were
    /// processed and how long it took.
    ///
    /// # Errors
    ///
    /// See [`interpret`](Self::interpret).
    pub fn interpret_detailed(&self, facts: &RequestFacts) -> Result<EvaluationReport, RewriteError> {
        self.interpret_detailed_with(facts, &RewriteOptions::default())
    }

    /// [`interpret_detailed`](Self::interpret_detailed) with explicit options.
    ///
    /// # Errors
    ///
    /// See [`interpret`](Self::interpret).
    pub fn interpret_detailed_with(
        &self,
        facts: &RequestFacts,
        options: &RewriteOptions,
    ) -> Result<EvaluationReport, RewriteError> {
        let start = Instant::now();
        let trace = crate::evaluate::interpret(&self.directives, facts, options)?;
        Ok(EvaluationReport::new(
            trace.outcome,
            trace.fired,
            trace.processed,
            trace.restarts,
            start.elapsed(),
        ))
    }

    /// Every line of the source text, classified.
    #[must_use]
    pub fn lines(&self) -> &[DirectiveLine] {
        &self.lines
    }

    /// Number of `RewriteRule` lines.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.count(LineCategory::Rule)
    }

    /// Number of `RewriteCond` lines.
    #[must_use]
    pub fn condition_count(&self) -> usize {
        self.count(LineCategory::Condition)
    }

    /// Whether the text holds no conditions or rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    fn count(&self, category: LineCategory) -> usize {
        self.lines.iter().filter(|l| l.category == category).count()
    }
}

impl FromStr for RuleSet {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RuleSet({} conditions, {} rules, {} lines)",
            self.condition_count(),
            self.rule_count(),
            self.lines.len(),
        )
    }
}
