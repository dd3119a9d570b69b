//! Expansion of `%{NAME}`, `%N` and `$N` in substitution strings.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::RuleErrorKind;
use crate::matcher::Groups;
use crate::types::Environment;

static VARIABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%\{([^}]*)\}").expect("valid variable pattern"));
static CONDITION_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%(\d)").expect("valid condition reference pattern"));
static RULE_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(\d)").expect("valid rule reference pattern"));

/// Like `Regex::replace_all`, but the replacer may fail.
fn try_replace(
    regex: &Regex,
    input: &str,
    mut replace: impl FnMut(&Captures<'_>) -> Result<String, RuleErrorKind>,
) -> Result<String, RuleErrorKind> {
    let mut out = String::with_capacity(input.len());
    let mut last = 0;
    for captures in regex.captures_iter(input) {
        let whole = captures.get(0).map_or(0..0, |m| m.range());
        out.push_str(&input[last..whole.start]);
        out.push_str(&replace(&captures)?);
        last = whole.end;
    }
    out.push_str(&input[last..]);
    Ok(out)
}

fn index(captures: &Captures<'_>) -> usize {
    captures
        .get(1)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or_default()
}

/// Replace every `%{NAME}` with its value, resolved while the pass is at `url`.
pub(crate) fn expand_variables(
    input: &str,
    env: &Environment<'_>,
    url: &str,
) -> Result<String, RuleErrorKind> {
    if !input.contains("%{") {
        return Ok(input.to_owned());
    }
    try_replace(&VARIABLE, input, |captures| {
        let name = captures.get(1).map_or("", |m| m.as_str());
        env.resolve(name, url)
    })
}

/// Replace every `%N` with group N of the last evaluated condition.
pub(crate) fn expand_condition_refs(
    input: &str,
    groups: Option<&Groups>,
) -> Result<String, RuleErrorKind> {
    if !input.contains('%') {
        return Ok(input.to_owned());
    }
    try_replace(&CONDITION_REF, input, |captures| {
        let n = index(captures);
        groups
            .and_then(|g| g.get(n))
            .map(str::to_owned)
            .ok_or_else(|| RuleErrorKind::MissingBackReference(format!("%{n}")))
    })
}

/// Replace every `$N` with group N of the current rule's match.
pub(crate) fn expand_rule_refs(input: &str, groups: &Groups) -> Result<String, RuleErrorKind> {
    if !input.contains('$') {
        return Ok(input.to_owned());
    }
    try_replace(&RULE_REF, input, |captures| {
        let n = index(captures);
        groups
            .get(n)
            .map(str::to_owned)
            .ok_or_else(|| RuleErrorKind::MissingBackReference(format!("${n}")))
    })
}

/// The full pipeline, in order: variables, condition refs, rule refs.
pub(crate) fn substitute(
    input: &str,
    env: &Environment<'_>,
    url: &str,
    condition: Option<&Groups>,
    rule: &Groups,
) -> Result<String, RuleErrorKind> {
    let expanded = expand_variables(input, env, url)?;
    let expanded = expand_condition_refs(&expanded, condition)?;
    expand_rule_refs(&expanded, rule)
}
