mod strategies;

use proptest::prelude::*;
use rewrite_rules::{Action, Outcome, RequestFacts, RuleSet};
use strategies::{arb_comment_text, arb_facts, arb_ruleset, GenRuleSet};

/// Helper: run a pass, flattening errors to their message for comparison.
fn run(ruleset: &RuleSet, facts: &RequestFacts) -> Result<Outcome, String> {
    ruleset.interpret(facts).map_err(|e| e.to_string())
}

fn with_comments(gen: &GenRuleSet) -> RuleSet {
    let text = gen.builder().to_text().replace('\n', "\n# interleaved\n\n");
    RuleSet::parse(&text).unwrap()
}

// ---------------------------------------------------------------------------
// Invariant 1: Determinism
//
// The same ruleset and request always produce the same outcome.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn determinism(gen in arb_ruleset(), facts in arb_facts()) {
        let ruleset = gen.compile();
        let first = run(&ruleset, &facts);
        for _ in 0..3 {
            prop_assert_eq!(&first, &run(&ruleset, &facts));
        }
    }

    #[test]
    fn determinism_recompile(gen in arb_ruleset(), facts in arb_facts()) {
        prop_assert_eq!(run(&gen.compile(), &facts), run(&gen.compile(), &facts));
    }
}

// ---------------------------------------------------------------------------
// Invariant 2: Comments and blank lines never rewrite anything.
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn comments_only_pass_through(text in arb_comment_text(), facts in arb_facts()) {
        let ruleset = RuleSet::parse(&text).unwrap();
        prop_assert!(ruleset.is_empty());
        prop_assert_eq!(ruleset.interpret(&facts).unwrap(), Outcome::pass_through());
    }

    #[test]
    fn interleaved_comments_do_not_change_outcome(gen in arb_ruleset(), facts in arb_facts()) {
        let plain = run(&gen.compile(), &facts).map(Outcome::into_action);
        let commented = run(&with_comments(&gen), &facts).map(Outcome::into_action);
        match (plain, commented) {
            (Ok(a), Ok(b)) => prop_assert_eq!(a, b),
            (Err(_), Err(_)) => {}
            (a, b) => prop_assert!(false, "outcomes diverged: {:?} vs {:?}", a, b),
        }
    }
}

// ---------------------------------------------------------------------------
// Invariant 3: Without `N`, every directive is visited at most once.
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn single_walk_without_next(gen in arb_ruleset(), facts in arb_facts()) {
        if let Ok(report) = gen.compile().interpret_detailed(&facts) {
            prop_assert!(report.processed() <= gen.len());
            prop_assert_eq!(report.restarts(), 0);
            let mut fired = report.fired().to_vec();
            fired.dedup();
            prop_assert_eq!(fired.len(), report.fired().len());
        }
    }
}

// ---------------------------------------------------------------------------
// Invariant 4: A leading catch-all `[F]` forbids every request, and rules
// appended after an `[L]` catch-all never change the outcome.
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn leading_forbidden_wins(gen in arb_ruleset(), facts in arb_facts()) {
        let text = format!("RewriteRule .* - [F]\n{}", gen.builder().to_text());
        let outcome = RuleSet::parse(&text).unwrap().interpret(&facts).unwrap();
        prop_assert_eq!(outcome.into_action(), Action::Forbidden);
    }

    #[test]
    fn rules_after_last_catch_all_are_dead(gen in arb_ruleset(), facts in arb_facts()) {
        let text = "RewriteRule ^/(.*)$ /final/$1 [L]";
        let base = RuleSet::parse(text).unwrap().interpret(&facts).unwrap();
        let extended = format!("{text}\n{}", gen.builder().to_text());
        let outcome = RuleSet::parse(&extended).unwrap().interpret(&facts).unwrap();
        prop_assert_eq!(outcome, base);
    }
}
