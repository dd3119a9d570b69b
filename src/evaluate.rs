use std::rc::Rc;

use tracing::{debug, trace};

use crate::error::{RewriteError, RuleErrorKind, RuleEvaluationError};
use crate::flags::{self, Flow};
use crate::matcher::{match_rule, Groups};
use crate::substitute::{expand_variables, substitute};
use crate::types::{
    query_string, Action, CompiledCondition, CompiledDirective, CompiledRule, Cookie, Environment,
    Outcome, RequestFacts, RewriteOptions, Substitution,
};

/// Mutable state of one interpretation pass.
pub(crate) struct Pass<'a> {
    pub(crate) url: String,
    pub(crate) env: Environment<'a>,
    chain: bool,
    previous_matched: bool,
    pub(crate) skip: usize,
    pub(crate) condition_groups: Option<Rc<Groups>>,
    pub(crate) action: Action,
    pub(crate) cookies: Vec<Cookie>,
    pub(crate) content_type: Option<String>,
}

/// Everything a pass produced, for [`EvaluationReport`](crate::EvaluationReport).
#[derive(Debug)]
pub(crate) struct Trace {
    pub(crate) outcome: Outcome,
    pub(crate) fired: Vec<usize>,
    pub(crate) processed: usize,
    pub(crate) restarts: usize,
}

pub(crate) fn interpret(
    directives: &[CompiledDirective],
    facts: &RequestFacts,
    options: &RewriteOptions,
) -> Result<Trace, RewriteError> {
    let mut pass = Pass {
        url: facts.url.clone(),
        env: Environment::from_request(facts),
        chain: true,
        previous_matched: true,
        skip: 0,
        condition_groups: None,
        action: Action::None,
        cookies: Vec::new(),
        content_type: None,
    };
    let mut fired = Vec::new();
    let mut restarts = 0;
    let mut processed = 0;
    let limit = directives.len().max(1).saturating_mul(options.max_passes.max(1));

    let mut index = 0;
    while let Some(directive) = directives.get(index) {
        if processed == limit {
            return Err(RewriteError::LoopLimitExceeded {
                processed,
                url: pass.url,
            });
        }
        processed += 1;
        index += 1;
        trace!(line = directive.line(), url = %pass.url, "{}", directive.text());

        let flow = match directive {
            CompiledDirective::Condition(condition) => pass.condition(condition).map(|()| Flow::Continue),
            CompiledDirective::Rule(rule) => match pass.rule(rule, &facts.application_path) {
                Ok(Some(flow)) => {
                    fired.push(rule.line);
                    Ok(flow)
                }
                Ok(None) => Ok(Flow::Continue),
                Err(kind) => Err(kind),
            },
        };

        match flow.map_err(|kind| RuleEvaluationError {
            kind,
            line: directive.line(),
            rule: directive.text().to_owned(),
            url: pass.url.clone(),
        })? {
            Flow::Continue => {}
            Flow::Stop => break,
            Flow::Restart => {
                restarts += 1;
                debug!(line = directive.line(), url = %pass.url, "restarting from the first directive");
                index = 0;
            }
        }
    }

    Ok(Trace {
        outcome: Outcome::new(pass.action, pass.cookies, pass.content_type),
        fired,
        processed,
        restarts,
    })
}

impl Pass<'_> {
    fn condition(&mut self, condition: &CompiledCondition) -> Result<(), RuleErrorKind> {
        if !condition.flags.or_next && !self.chain {
            return Ok(());
        }
        let value = expand_variables(&condition.test, &self.env, &self.url)?;
        let comparator = condition.comparator.as_ref().map_err(Clone::clone)?;
        let result = comparator.test(&value);
        self.condition_groups = result.groups.map(Rc::new);
        self.chain = if condition.flags.or_next {
            self.chain || result.matched
        } else {
            self.chain && result.matched
        };
        Ok(())
    }

    /// Returns the flow when the rule fired, `None` when it was skipped,
    /// blocked or did not match.
    fn rule(
        &mut self,
        rule: &CompiledRule,
        application_path: &str,
    ) -> Result<Option<Flow>, RuleErrorKind> {
        if self.skip > 0 {
            self.skip -= 1;
            debug!(line = rule.line, remaining = self.skip, "rule skipped");
            return Ok(None);
        }
        if !self.chain {
            self.chain = true;
            return Ok(None);
        }
        if rule.flags.chain && !self.previous_matched {
            return Ok(None);
        }

        let path = request_path(&self.url, application_path);
        let Some(groups) = match_rule(rule, &path)? else {
            self.previous_matched = false;
            return Ok(None);
        };
        if let Some(token) = &rule.flags.invalid {
            return Err(RuleErrorKind::InvalidFlagArgument(token.clone()));
        }
        let groups = Rc::new(groups);

        self.url = match &rule.substitution {
            Substitution::Unchanged => path,
            Substitution::Target(target) => {
                let rewritten = substitute(
                    target,
                    &self.env,
                    &self.url,
                    self.condition_groups.as_deref(),
                    &groups,
                )?;
                merge_query(rewritten, query_string(&self.url), rule.flags.qs_append)
            }
        };
        self.previous_matched = true;
        Ok(Some(flags::apply(rule, self, &groups)))
    }
}

/// The path rules match against: `url` without the application path prefix
/// and query string, always starting with `/`.
pub(crate) fn request_path(url: &str, application_path: &str) -> String {
    let path = url.strip_prefix(application_path).unwrap_or(url);
    let path = path.split_once('?').map_or(path, |(p, _)| p);
    if path.starts_with('/') {
        path.to_owned()
    } else {
        format!("/{path}")
    }
}

/// Carry the previous query string over to a rewritten URL.
pub(crate) fn merge_query(mut url: String, query: &str, append: bool) -> String {
    if query.is_empty() {
        return url;
    }
    if url.contains('?') {
        if append {
            url.push('&');
            url.push_str(query);
        }
    } else {
        url.push('?');
        url.push_str(query);
    }
    url
}
