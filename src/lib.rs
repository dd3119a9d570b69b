//! A request-time interpreter for Apache `mod_rewrite` style rules.
//!
//! Rule text is parsed and compiled once into a [`RuleSet`]; each request
//! then runs an independent pass against [`RequestFacts`] and gets back an
//! [`Outcome`]: an [`Action`] plus cookies and a content type to set.
//!
//! ```
//! use rewrite_rules::{Action, RequestFacts, RuleSet};
//!
//! let rules = "\
//! # old blog links
//! RewriteRule ^/blog/([0-9]+)/(.*)$ /posts/$2?year=$1 [R=301,L]
//! RewriteRule (.*)\\.aspx $1.php [NC]
//! ";
//! let ruleset = RuleSet::parse(rules).unwrap();
//!
//! let outcome = ruleset.interpret(&RequestFacts::new("/blog/2003/nov")).unwrap();
//! assert_eq!(
//!     outcome.action(),
//!     &Action::Redirect { url: "/posts/nov?year=2003".into(), permanent: true }
//! );
//!
//! let outcome = ruleset.interpret(&RequestFacts::new("/Home.ASPX")).unwrap();
//! assert_eq!(outcome.action(), &Action::Transfer { url: "/Home.php".into() });
//! ```

mod compile;
mod error;
mod evaluate;
mod flags;
mod matcher;
pub mod parse;
mod simulate;
mod substitute;
mod types;

pub use error::{RewriteError, RuleErrorKind, RuleEvaluationError};
pub use matcher::{test_condition, ConditionMatch, Groups};
pub use parse::ParseError;
pub use simulate::simulate;
#[cfg(feature = "compiled-cache")]
pub use types::CompiledCache;
pub use types::{
    Action, Condition, ConditionFlags, Cookie, CookieSpec, Directive, DirectiveLine, EnvSpec,
    Environment, EvaluationReport, LineCategory, Outcome, RedirectKind, RequestFacts,
    RewriteOptions, RewriteSettings, Rule, RuleFlags, RuleSet, RuleSetBuilder,
};

/// Parse `rules` and run one pass for `facts`.
///
/// A malformed line fails with [`RewriteError::MalformedDirective`] before
/// the pass starts. An invalid pattern or flag argument only fails the pass
/// that reaches it.
///
/// # Errors
///
/// Returns the first [`RewriteError`] the pass hits; no partial outcome is
/// produced.
pub fn interpret(rules: &str, facts: &RequestFacts) -> Result<Outcome, RewriteError> {
    RuleSet::parse(rules)?.interpret(facts)
}
