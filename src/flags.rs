//! Side effects of a rule that fired, applied in a fixed order:
//! forbidden, gone, cookies, env, next, skip, type, then the result.

use std::rc::Rc;

use tracing::debug;

use crate::evaluate::Pass;
use crate::matcher::Groups;
use crate::substitute::{expand_condition_refs, expand_rule_refs};
use crate::types::{Action, Cookie, CompiledRule, CookieSpec, EnvSpec, RedirectKind};

/// What the interpreter loop does after a rule fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    /// Start again from the first directive.
    Restart,
    /// End the pass with the current action.
    Stop,
}

pub(crate) fn apply(rule: &CompiledRule, pass: &mut Pass<'_>, groups: &Rc<Groups>) -> Flow {
    let flags = &rule.flags;

    if flags.forbidden {
        pass.action = Action::Forbidden;
        return Flow::Stop;
    }
    if flags.gone {
        pass.action = Action::Gone;
        return Flow::Stop;
    }

    for spec in &flags.cookies {
        set_cookie(&mut pass.cookies, spec);
    }

    for spec in &flags.env {
        match spec {
            EnvSpec::Set { name, value } => {
                let value = value.clone();
                let condition = pass.condition_groups.clone();
                let rule_groups = Rc::clone(groups);
                pass.env.define_deferred(
                    name.clone(),
                    Box::new(move |_: &str| {
                        let value = expand_condition_refs(&value, condition.as_deref())?;
                        expand_rule_refs(&value, &rule_groups)
                    }),
                );
            }
            EnvSpec::Remove { name } => {
                pass.env.remove(name);
            }
        }
    }

    if let Some(count) = flags.skip {
        pass.skip = count;
    }
    if let Some(mime) = &flags.content_type {
        pass.content_type = Some(mime.clone());
    }

    pass.action = match flags.redirect {
        Some(kind) => Action::Redirect {
            url: pass.url.clone(),
            permanent: kind == RedirectKind::Permanent,
        },
        None => Action::Transfer {
            url: pass.url.clone(),
        },
    };
    debug!(line = rule.line, action = %pass.action, "rule fired");

    if flags.last {
        Flow::Stop
    } else if flags.next {
        Flow::Restart
    } else {
        Flow::Continue
    }
}

fn set_cookie(cookies: &mut Vec<Cookie>, spec: &CookieSpec) {
    let cookie = Cookie {
        name: spec.name.clone(),
        value: spec.value.clone(),
        domain: spec.domain.clone(),
        path: spec.path.clone(),
    };
    match cookies.iter_mut().find(|c| c.name == cookie.name) {
        Some(existing) => *existing = cookie,
        None => cookies.push(cookie),
    }
}
