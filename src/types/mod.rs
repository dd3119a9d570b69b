mod action;
#[cfg(feature = "compiled-cache")]
mod cache;
mod directive;
mod environment;
mod flags;
mod report;
mod request;
mod rule;
mod ruleset;
mod settings;

pub use action::{Action, Cookie, Outcome};
#[cfg(feature = "compiled-cache")]
pub use cache::CompiledCache;
pub use directive::{DirectiveLine, LineCategory};
pub use environment::Environment;
pub use flags::{ConditionFlags, CookieSpec, EnvSpec, RedirectKind, RuleFlags};
pub use report::EvaluationReport;
pub use request::RequestFacts;
pub use rule::{Condition, Directive, Rule};
pub use ruleset::{RuleSet, RuleSetBuilder};
pub use settings::{RewriteOptions, RewriteSettings};

pub(crate) use request::query_string;
pub(crate) use rule::{CompiledCondition, CompiledDirective, CompiledRule, Substitution};
