use crate::error::RewriteError;
use crate::types::{EvaluationReport, RequestFacts, RuleSet};

/// Try `rules` against an absolute URL, as an admin "test this URL" page
/// would, and report what happened.
///
/// The `Host` variable comes from the URL and `application_path` is the
/// prefix stripped before rules match. Failures are reported as they would
/// be for a live request to `url`.
///
/// ```
/// let report = rewrite_rules::simulate(
///     "http://www.foo.org/homepage.aspx?x=1",
///     "",
///     "RewriteRule (.*)\\.aspx $1.php",
/// )
/// .unwrap();
/// assert_eq!(report.outcome().action().url(), Some("/homepage.php?x=1"));
/// assert_eq!(report.fired(), &[1]);
/// ```
///
/// # Errors
///
/// [`RewriteError::InvalidUrl`] if `url` does not parse, otherwise any error
/// the pass raises.
pub fn simulate(
    url: &str,
    application_path: &str,
    rules: &str,
) -> Result<EvaluationReport, RewriteError> {
    let facts = RequestFacts::from_url(url)?.application_path(application_path);
    RuleSet::parse(rules)?.interpret_detailed(&facts)
}
