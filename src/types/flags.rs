use tracing::warn;

/// Flags accepted on a `RewriteCond` line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConditionFlags {
    /// `NC` / `nocase`: case-insensitive `=` and regex comparisons.
    pub no_case: bool,
    /// `OR` / `ornext`: combine with the running chain by OR instead of AND.
    pub or_next: bool,
}

/// Kind of HTTP redirect requested by the `R` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectKind {
    /// 302 and every other non-301 code.
    Temporary,
    /// `R=301`.
    Permanent,
}

/// `CO=name:value:domain[:lifetime[:path]]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieSpec {
    pub name: String,
    pub value: String,
    pub domain: String,
    /// Parsed but never applied: the remote time zone is unknown.
    pub lifetime: Option<String>,
    pub path: Option<String>,
}

/// `E=name:value` or `E=!name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvSpec {
    Set { name: String, value: String },
    Remove { name: String },
}

/// Flags accepted on a `RewriteRule` line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleFlags {
    pub chain: bool,
    pub no_case: bool,
    pub last: bool,
    pub forbidden: bool,
    pub gone: bool,
    pub next: bool,
    pub qs_append: bool,
    pub redirect: Option<RedirectKind>,
    pub skip: Option<usize>,
    pub content_type: Option<String>,
    pub cookies: Vec<CookieSpec>,
    pub env: Vec<EnvSpec>,
    /// First token whose argument could not be used. A rule carrying one
    /// fails the pass when it matches.
    pub invalid: Option<String>,
}

fn split_flag(token: &str) -> (String, Option<&str>) {
    match token.split_once('=') {
        Some((name, arg)) => (name.to_ascii_lowercase(), Some(arg)),
        None => (token.to_ascii_lowercase(), None),
    }
}

impl ConditionFlags {
    /// Build from raw flag tokens. Unknown flags are ignored.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Self {
        let mut flags = Self::default();
        for token in tokens {
            let token = token.as_ref();
            match split_flag(token).0.as_str() {
                "nc" | "nocase" => flags.no_case = true,
                "or" | "ornext" => flags.or_next = true,
                _ => warn!(flag = token, "ignoring unsupported condition flag"),
            }
        }
        flags
    }
}

impl RuleFlags {
    /// Build from raw flag tokens.
    ///
    /// A flag with a missing or unusable argument is dropped and its token
    /// kept in [`invalid`](Self::invalid); the other flags still apply.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Self {
        let mut flags = Self::default();
        for token in tokens {
            let token = token.as_ref();
            if !flags.push(token) {
                flags.invalid.get_or_insert_with(|| token.to_owned());
            }
        }
        flags
    }

    /// Apply one token. Returns `false` when its argument is unusable.
    fn push(&mut self, token: &str) -> bool {
        let (name, arg) = split_flag(token);
        match name.as_str() {
            "c" | "chain" => self.chain = true,
            "nc" | "nocase" => self.no_case = true,
            "l" | "last" => self.last = true,
            "f" | "forbidden" => self.forbidden = true,
            "g" | "gone" => self.gone = true,
            "n" | "next" => self.next = true,
            "qsa" | "qsappend" => self.qs_append = true,
            "r" | "redirect" => self.redirect = Some(redirect_kind(arg)),
            "s" | "skip" => match arg.and_then(|a| a.parse::<usize>().ok()) {
                Some(count) => self.skip = Some(count),
                None => return false,
            },
            "t" | "type" => match arg {
                Some(mime) if !mime.is_empty() => self.content_type = Some(mime.to_owned()),
                _ => return false,
            },
            "co" | "cookie" => match arg.and_then(CookieSpec::parse) {
                Some(spec) => self.cookies.push(spec),
                None => return false,
            },
            "e" | "env" => match arg.and_then(EnvSpec::parse) {
                Some(spec) => self.env.push(spec),
                None => return false,
            },
            _ => warn!(flag = token, "ignoring unsupported rule flag"),
        }
        true
    }
}

/// `R=301` is permanent; a bare `R` or any other code is temporary.
fn redirect_kind(arg: Option<&str>) -> RedirectKind {
    match arg {
        Some("301") => RedirectKind::Permanent,
        None | Some("302") => RedirectKind::Temporary,
        Some(code) => {
            if !matches!(code.parse::<u16>(), Ok(300..=399)) {
                warn!(code, "redirect code is not a 3xx status, redirecting with 302");
            }
            RedirectKind::Temporary
        }
    }
}

impl CookieSpec {
    fn parse(arg: &str) -> Option<Self> {
        let fields: Vec<&str> = arg.split(':').collect();
        if fields.len() < 3 {
            return None;
        }
        Some(Self {
            name: fields[0].to_owned(),
            value: fields[1].to_owned(),
            domain: fields[2].to_owned(),
            lifetime: fields.get(3).map(|s| (*s).to_owned()),
            path: fields.get(4).map(|s| (*s).to_owned()),
        })
    }
}

impl EnvSpec {
    fn parse(arg: &str) -> Option<Self> {
        if let Some(name) = arg.strip_prefix('!') {
            return (!name.is_empty()).then(|| Self::Remove {
                name: name.to_owned(),
            });
        }
        let (name, value) = arg.split_once(':')?;
        if name.is_empty() {
            return None;
        }
        Some(Self::Set {
            name: name.to_owned(),
            value: value.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_and_long_forms() {
        let short = RuleFlags::from_tokens(&["C", "NC", "L", "F", "G", "N", "QSA"]);
        let long = RuleFlags::from_tokens(&[
            "chain",
            "nocase",
            "last",
            "forbidden",
            "gone",
            "next",
            "qsappend",
        ]);
        assert_eq!(short, long);
        assert!(short.chain && short.no_case && short.last && short.qs_append);
        assert_eq!(short.invalid, None);
    }

    #[test]
    fn flag_names_are_case_insensitive() {
        let flags = RuleFlags::from_tokens(&["l", "Nc", "t=Text/HTML"]);
        assert!(flags.last);
        assert!(flags.no_case);
        assert_eq!(flags.content_type.as_deref(), Some("Text/HTML"));
    }

    #[test]
    fn redirect_codes() {
        let kind = |token: &str| RuleFlags::from_tokens(&[token]).redirect;
        assert_eq!(kind("R"), Some(RedirectKind::Temporary));
        assert_eq!(kind("redirect=302"), Some(RedirectKind::Temporary));
        assert_eq!(kind("R=301"), Some(RedirectKind::Permanent));
        assert_eq!(kind("redirect=301"), Some(RedirectKind::Permanent));
        assert_eq!(kind("R=303"), Some(RedirectKind::Temporary));
    }

    #[test]
    fn unusual_redirect_codes_are_temporary() {
        for token in ["R=404", "R=abc", "R="] {
            let flags = RuleFlags::from_tokens(&[token]);
            assert_eq!(flags.redirect, Some(RedirectKind::Temporary), "{token}");
            assert_eq!(flags.invalid, None, "{token}");
        }
    }

    #[test]
    fn skip_requires_a_count() {
        assert_eq!(RuleFlags::from_tokens(&["S=2"]).skip, Some(2));
        assert_eq!(RuleFlags::from_tokens(&["skip=1"]).skip, Some(1));
        assert_eq!(RuleFlags::from_tokens(&["S"]).invalid.as_deref(), Some("S"));
        assert_eq!(RuleFlags::from_tokens(&["S=x"]).invalid.as_deref(), Some("S=x"));
    }

    #[test]
    fn cookie_needs_three_fields() {
        let flags = RuleFlags::from_tokens(&["CO=bar:baz:foo.org:0:mypath"]);
        assert_eq!(
            flags.cookies,
            vec![CookieSpec {
                name: "bar".into(),
                value: "baz".into(),
                domain: "foo.org".into(),
                lifetime: Some("0".into()),
                path: Some("mypath".into()),
            }]
        );
        let flags = RuleFlags::from_tokens(&["cookie=foo:bar"]);
        assert!(flags.cookies.is_empty());
        assert_eq!(flags.invalid.as_deref(), Some("cookie=foo:bar"));
    }

    #[test]
    fn env_set_and_remove() {
        let flags = RuleFlags::from_tokens(&["E=foo:$1", "env=!bar", "E=url:http://x"]);
        assert_eq!(
            flags.env,
            vec![
                EnvSpec::Set {
                    name: "foo".into(),
                    value: "$1".into()
                },
                EnvSpec::Remove { name: "bar".into() },
                EnvSpec::Set {
                    name: "url".into(),
                    value: "http://x".into()
                },
            ]
        );
        assert!(RuleFlags::from_tokens(&["E=foo"]).invalid.is_some());
        assert!(RuleFlags::from_tokens(&["E=!"]).invalid.is_some());
    }

    #[test]
    fn invalid_flag_keeps_the_others() {
        let flags = RuleFlags::from_tokens(&["C", "S=x", "T=", "L"]);
        assert!(flags.chain && flags.last);
        assert_eq!(flags.skip, None);
        assert_eq!(flags.invalid.as_deref(), Some("S=x"));
    }

    #[test]
    fn unknown_flags_are_ignored() {
        let flags = RuleFlags::from_tokens(&["NE", "PT", "L"]);
        assert!(flags.last);
        assert_eq!(flags.invalid, None);
    }

    #[test]
    fn condition_flags() {
        let flags = ConditionFlags::from_tokens(&["NC", "OR"]);
        assert!(flags.no_case && flags.or_next);
        let flags = ConditionFlags::from_tokens(&["nocase"]);
        assert!(flags.no_case && !flags.or_next);
    }
}
