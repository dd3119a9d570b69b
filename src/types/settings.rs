use tracing::error;

use super::action::Outcome;
use super::request::RequestFacts;
use super::ruleset::RuleSet;
use crate::error::RewriteError;

/// Tuning for an interpretation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RewriteOptions {
    /// How many times the directives may be walked in one pass, `N` restarts
    /// included. A pass processes at most `max(directives, 1) * max_passes`
    /// directives before failing with [`RewriteError::LoopLimitExceeded`].
    pub max_passes: usize,
}

impl RewriteOptions {
    pub const DEFAULT_MAX_PASSES: usize = 32;

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Values below 1 are treated as 1.
    #[must_use]
    pub fn max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes.max(1);
        self
    }
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            max_passes: Self::DEFAULT_MAX_PASSES,
        }
    }
}

/// The stored rewrite configuration: whether rewriting is on and the rule
/// text to run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RewriteSettings {
    pub enabled: bool,
    pub rules: String,
    pub options: RewriteOptions,
}

impl RewriteSettings {
    /// Enabled settings running `rules`.
    #[must_use]
    pub fn new(rules: impl Into<String>) -> Self {
        Self {
            enabled: true,
            rules: rules.into(),
            options: RewriteOptions::default(),
        }
    }

    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[must_use]
    pub fn options(mut self, options: RewriteOptions) -> Self {
        self.options = options;
        self
    }

    /// Whether there is anything to run.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.enabled && !self.rules.trim().is_empty()
    }

    /// Compile and run the rules for `facts`.
    ///
    /// # Errors
    ///
    /// Any [`RewriteError`].
    pub fn try_apply(&self, facts: &RequestFacts) -> Result<Outcome, RewriteError> {
        if !self.is_active() {
            return Ok(Outcome::pass_through());
        }
        RuleSet::parse(&self.rules)?.interpret_with(facts, &self.options)
    }

    /// Run the rules, falling back to a pass-through outcome on any error.
    ///
    /// A broken rule never blocks a request; the error is logged instead.
    pub fn apply(&self, facts: &RequestFacts) -> Outcome {
        self.try_apply(facts).unwrap_or_else(|err| fail_open(&err))
    }
}

pub(crate) fn fail_open(err: &RewriteError) -> Outcome {
    match err {
        RewriteError::Evaluation(e) => error!(
            line = e.line,
            rule = %e.rule,
            url = %e.url,
            "rewrite rule failed: {}",
            e.kind
        ),
        other => error!("rewrite failed: {other}"),
    }
    Outcome::pass_through()
}
