use regex::RegexBuilder;
use tracing::{debug, warn};

use crate::error::RuleErrorKind;
use crate::matcher::Comparator;
use crate::parse::ParsedRuleSet;
use crate::types::{
    CompiledCondition, CompiledDirective, CompiledRule, Condition, ConditionFlags, Directive,
    LineCategory, Rule, RuleFlags, RuleSet, Substitution,
};

/// Build the immutable ruleset. Never fails: a bad pattern or flag argument
/// stays on its directive and fails only the passes that reach it.
pub(crate) fn compile(parsed: ParsedRuleSet) -> RuleSet {
    for line in &parsed.lines {
        if line.category == LineCategory::Unrecognized {
            debug!(line = line.number, text = %line.text, "ignoring unrecognized directive");
        }
    }

    let directives = parsed
        .directives
        .iter()
        .map(|directive| match directive {
            Directive::Condition(condition) => CompiledDirective::Condition(compile_condition(condition)),
            Directive::Rule(rule) => CompiledDirective::Rule(compile_rule(rule)),
        })
        .collect();

    RuleSet {
        lines: parsed.lines,
        directives,
    }
}

fn compile_condition(condition: &Condition) -> CompiledCondition {
    let flags = ConditionFlags::from_tokens(&condition.flags);
    let comparator = Comparator::parse(&condition.pattern, flags.no_case).map_err(|err| {
        warn!(line = condition.line, text = %condition.text, "invalid condition pattern: {err}");
        RuleErrorKind::InvalidPattern(err.to_string())
    });
    CompiledCondition {
        line: condition.line,
        text: condition.text.clone(),
        test: condition.test.clone(),
        comparator,
        flags,
    }
}

fn compile_rule(rule: &Rule) -> CompiledRule {
    let flags = RuleFlags::from_tokens(&rule.flags);
    if let Some(token) = &flags.invalid {
        warn!(line = rule.line, text = %rule.text, "invalid flag argument `{token}`");
    }

    let (negated, pattern) = match rule.pattern.strip_prefix('!') {
        Some(rest) => (true, rest),
        None => (false, rule.pattern.as_str()),
    };
    let pattern = RegexBuilder::new(pattern)
        .case_insensitive(flags.no_case)
        .build()
        .map_err(|err| {
            warn!(line = rule.line, text = %rule.text, "invalid rule pattern: {err}");
            RuleErrorKind::InvalidPattern(err.to_string())
        });

    let substitution = if rule.substitution == "-" {
        Substitution::Unchanged
    } else {
        Substitution::Target(rule.substitution.clone())
    };

    CompiledRule {
        line: rule.line,
        text: rule.text.clone(),
        pattern,
        negated,
        substitution,
        flags,
    }
}
