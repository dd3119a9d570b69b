use std::collections::HashMap;
use std::fmt;

use chrono::{Datelike, Timelike};

use super::request::{query_string, RequestFacts};
use crate::error::RuleErrorKind;

/// A deferred variable value. Receives the pass's current URL.
pub(crate) type Deferred<'a> = Box<dyn Fn(&str) -> Result<String, RuleErrorKind> + 'a>;

/// Variables visible to `%{NAME}` during one interpretation pass.
///
/// Values are computed on read. An environment borrows the request it was
/// built from and is dropped at the end of the pass.
pub struct Environment<'a> {
    vars: HashMap<String, Deferred<'a>>,
}

/// Placeholders kept so rule text written for Apache still parses.
const EMPTY_VARIABLES: &[&str] = &[
    "HTTP_FORWARDED",
    "HTTP_PROXY_CONNECTION",
    "HTTP_ACCEPT",
    "REMOTE_PORT",
    "REMOTE_IDENT",
    "SCRIPT_FILENAME",
    "PATH_INFO",
    "AUTH_TYPE",
];

fn or_empty(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

impl<'a> Environment<'a> {
    /// An environment with no variables at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            vars: HashMap::new(),
        }
    }

    /// The built-in variables for `facts`, followed by its extra variables.
    #[must_use]
    pub fn from_request(facts: &'a RequestFacts) -> Self {
        let mut env = Self::empty();

        env.define("HTTP_USER_AGENT", move || or_empty(&facts.user_agent));
        env.define("HTTP_REFERER", move || or_empty(&facts.referer));
        env.define("HTTP_COOKIE", move || or_empty(&facts.cookie));
        env.define("HTTP_HOST", move || or_empty(&facts.host));
        env.define("REMOTE_ADDR", move || or_empty(&facts.remote_addr));
        env.define("REMOTE_HOST", move || or_empty(&facts.remote_host));
        env.define("REMOTE_USER", move || or_empty(&facts.remote_user));
        env.define("REQUEST_METHOD", move || facts.method.clone());

        env.define("TIME_YEAR", move || facts.now.year().to_string());
        env.define("TIME_MON", move || facts.now.month().to_string());
        env.define("TIME_DAY", move || facts.now.day().to_string());
        env.define("TIME_HOUR", move || facts.now.hour().to_string());
        env.define("TIME_MIN", move || facts.now.minute().to_string());
        env.define("TIME_SEC", move || facts.now.second().to_string());
        env.define("TIME_WDAY", move || facts.now.format("%A").to_string());
        env.define("TIME", move || facts.now.format("%H:%M:%S").to_string());

        env.define("HTTPS", move || if facts.secure { "on" } else { "off" }.to_owned());
        env.define("REQUEST_URI", move || facts.url.clone());
        env.define_deferred(
            "QUERY_STRING",
            Box::new(|url: &str| Ok(query_string(url).to_owned())),
        );

        for name in EMPTY_VARIABLES {
            env.define(*name, String::new);
        }

        for (name, value) in &facts.extra {
            env.define(name, move || value.clone());
        }
        env
    }

    /// Define (or replace) a lazily computed variable.
    pub fn define(&mut self, name: impl Into<String>, value: impl Fn() -> String + 'a) {
        self.define_deferred(name, Box::new(move |_: &str| Ok(value())));
    }

    pub(crate) fn define_deferred(&mut self, name: impl Into<String>, value: Deferred<'a>) {
        self.vars.insert(name.into(), value);
    }

    /// Remove a variable. Returns whether it existed.
    pub fn remove(&mut self, name: &str) -> bool {
        self.vars.remove(name).is_some()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Compute the value of `name` while the pass is at `url`.
    ///
    /// # Errors
    ///
    /// [`RuleErrorKind::UndefinedVariable`] if no such variable exists, or
    /// whatever error the deferred value raises.
    pub fn resolve(&self, name: &str, url: &str) -> Result<String, RuleErrorKind> {
        match self.vars.get(name) {
            Some(value) => value(url),
            None => Err(RuleErrorKind::UndefinedVariable(name.to_owned())),
        }
    }

    /// Variable names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.vars.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for Environment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("names", &self.names())
            .finish()
    }
}
