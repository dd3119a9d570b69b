use proptest::prelude::*;
use rewrite_rules::{RequestFacts, RuleSet, RuleSetBuilder};

// --- Fixed request schema ---
// path segments : one of SEGMENTS, 0..=3 deep
// query string  : optional "k=v" pairs from SEGMENTS
// host          : one of HOSTS

const SEGMENTS: &[&str] = &["a", "b", "blog", "old", "new", "x1"];
const HOSTS: &[&str] = &["foo.org", "www.foo.org", "bar.net"];

const PATTERNS: &[&str] = &[
    "^/$",
    "^/(.*)$",
    "^/a",
    "^/blog/(.*)$",
    "!^/old",
    "(b)",
    "^/([a-z]+)/([a-z0-9]+)$",
];

const SUBSTITUTIONS: &[&str] = &["-", "/new/$1", "/a?q=1", "/b", "http://www.foo.org/$0", "/%{HTTP_HOST}"];

const FLAGS: &[&str] = &["L", "NC", "C", "QSA", "R", "R=301", "S=1", "T=text/plain", "CO=c:v:foo.org"];

const CONDITIONS: &[(&str, &str)] = &[
    ("%{HTTP_HOST}", "^www\\."),
    ("%{HTTP_HOST}", "=foo.org"),
    ("%{QUERY_STRING}", "(.+)"),
    ("%{REQUEST_METHOD}", "!=POST"),
    ("%{TIME_YEAR}", ">2000"),
];

/// Generate request facts that align with the fixed schema.
pub fn arb_facts() -> impl Strategy<Value = RequestFacts> {
    (
        prop::collection::vec(prop::sample::select(SEGMENTS), 0..=3),
        prop::option::of(prop::collection::vec(
            (prop::sample::select(SEGMENTS), prop::sample::select(SEGMENTS)),
            1..=2,
        )),
        prop::sample::select(HOSTS),
    )
        .prop_map(|(segments, query, host)| {
            let mut url = format!("/{}", segments.join("/"));
            if let Some(pairs) = query {
                let pairs: Vec<String> = pairs.iter().map(|(k, v)| format!("{k}={v}")).collect();
                url.push('?');
                url.push_str(&pairs.join("&"));
            }
            RequestFacts::new(url).host(host)
        })
}

/// One generated directive.
#[derive(Debug, Clone)]
pub enum GenDirective {
    Condition {
        test: &'static str,
        pattern: &'static str,
        or_next: bool,
    },
    Rule {
        pattern: &'static str,
        substitution: &'static str,
        flags: Vec<&'static str>,
    },
}

fn arb_directive() -> impl Strategy<Value = GenDirective> {
    prop_oneof![
        1 => (prop::sample::select(CONDITIONS), any::<bool>()).prop_map(|((test, pattern), or_next)| {
            GenDirective::Condition {
                test,
                pattern,
                or_next,
            }
        }),
        3 => (
            prop::sample::select(PATTERNS),
            prop::sample::select(SUBSTITUTIONS),
            prop::sample::subsequence(FLAGS, 0..=3),
        )
            .prop_map(|(pattern, substitution, flags)| GenDirective::Rule {
                pattern,
                substitution,
                flags,
            }),
    ]
}

/// A generated list of directives. Never uses `N`, so passes always settle.
#[derive(Debug, Clone)]
pub struct GenRuleSet {
    pub directives: Vec<GenDirective>,
}

impl GenRuleSet {
    pub fn builder(&self) -> RuleSetBuilder {
        let mut builder = RuleSetBuilder::new();
        for directive in &self.directives {
            builder = match directive {
                GenDirective::Condition {
                    test,
                    pattern,
                    or_next,
                } => {
                    let flags: &[&str] = if *or_next { &["OR"] } else { &[] };
                    builder.condition(test, pattern, flags)
                }
                GenDirective::Rule {
                    pattern,
                    substitution,
                    flags,
                } => builder.rule(pattern, substitution, flags),
            };
        }
        builder
    }

    /// Compile into an actual `RuleSet`.
    ///
    /// # Panics
    ///
    /// Panics if the generated text fails to compile (should not happen
    /// with the fixed pools above).
    #[must_use]
    pub fn compile(&self) -> RuleSet {
        self.builder()
            .compile()
            .expect("generated ruleset should compile")
    }

    /// Number of conditions and rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.directives.len()
    }
}

pub fn arb_ruleset() -> impl Strategy<Value = GenRuleSet> {
    prop::collection::vec(arb_directive(), 1..=8).prop_map(|directives| GenRuleSet { directives })
}

/// Generate rule text made only of comments and blank lines.
pub fn arb_comment_text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just(String::new()),
            "[ \t]{0,4}",
            "[a-zA-Z ]{0,20}".prop_map(|s| format!("  # {s}")),
        ],
        0..=6,
    )
    .prop_map(|lines| lines.join("\n"))
}
