use std::fmt;
use std::time::Duration;

use super::action::Outcome;

/// Diagnostics for one pass, returned by
/// [`RuleSet::interpret_detailed()`](super::ruleset::RuleSet::interpret_detailed).
#[derive(Debug, Clone)]
#[must_use]
pub struct EvaluationReport {
    outcome: Outcome,
    fired: Vec<usize>,
    processed: usize,
    restarts: usize,
    duration: Duration,
}

impl EvaluationReport {
    pub(crate) fn new(
        outcome: Outcome,
        fired: Vec<usize>,
        processed: usize,
        restarts: usize,
        duration: Duration,
    ) -> Self {
        Self {
            outcome,
            fired,
            processed,
            restarts,
            duration,
        }
    }

    /// Same as [`RuleSet::interpret()`](super::ruleset::RuleSet::interpret).
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn into_outcome(self) -> Outcome {
        self.outcome
    }

    /// Line numbers of the rules that fired, in firing order. A line appears
    /// once per firing, so `N` restarts can repeat it.
    #[must_use]
    pub fn fired(&self) -> &[usize] {
        &self.fired
    }

    /// Conditions and rules visited, restarts included.
    #[must_use]
    pub fn processed(&self) -> usize {
        self.processed
    }

    /// How many times an `N` flag restarted the pass.
    #[must_use]
    pub fn restarts(&self) -> usize {
        self.restarts
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "action: {}", self.outcome.action())?;
        let fired: Vec<String> = self.fired.iter().map(ToString::to_string).collect();
        write!(f, ", fired: [{}]", fired.join(", "))?;
        write!(f, ", processed: {}", self.processed)?;
        write!(f, ", restarts: {}", self.restarts)?;
        write!(f, ", duration: {:?}", self.duration)
    }
}
