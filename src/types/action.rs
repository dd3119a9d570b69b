use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What the caller should do with the request after a pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[must_use]
pub enum Action {
    /// No rule fired: serve the request as is.
    #[default]
    None,
    /// Ask the client to re-request `url` (301 when permanent, else 302).
    Redirect { url: String, permanent: bool },
    /// Re-dispatch internally to `url`.
    Transfer { url: String },
    Forbidden,
    Gone,
}

/// A cookie produced by a `CO` flag.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: Option<String>,
}

/// Result of one interpretation pass: the action plus its side effects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[must_use]
pub struct Outcome {
    action: Action,
    cookies: Vec<Cookie>,
    content_type: Option<String>,
}

impl Action {
    /// Target URL of a redirect or transfer.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Action::Redirect { url, .. } | Action::Transfer { url } => Some(url),
            _ => None,
        }
    }

    /// HTTP status the caller answers with directly, if any.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Action::Redirect { permanent: true, .. } => Some(301),
            Action::Redirect { .. } => Some(302),
            Action::Forbidden => Some(403),
            Action::Gone => Some(410),
            Action::None | Action::Transfer { .. } => None,
        }
    }

    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Action::None)
    }
}

impl Outcome {
    pub(crate) fn new(action: Action, cookies: Vec<Cookie>, content_type: Option<String>) -> Self {
        Self {
            action,
            cookies,
            content_type,
        }
    }

    /// An outcome that leaves the request untouched.
    pub fn pass_through() -> Self {
        Self::default()
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    pub fn into_action(self) -> Action {
        self.action
    }

    #[must_use]
    pub fn cookies(&self) -> &[Cookie] {
        &self.cookies
    }

    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<&Cookie> {
        self.cookies.iter().find(|c| c.name == name)
    }

    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::None => write!(f, "none"),
            Action::Redirect { url, permanent } => {
                let code = if *permanent { 301 } else { 302 };
                write!(f, "redirect {code} -> {url}")
            }
            Action::Transfer { url } => write!(f, "transfer -> {url}"),
            Action::Forbidden => write!(f, "forbidden"),
            Action::Gone => write!(f, "gone"),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.action)?;
        if !self.cookies.is_empty() {
            let names: Vec<&str> = self.cookies.iter().map(|c| c.name.as_str()).collect();
            write!(f, ", cookies: [{}]", names.join(", "))?;
        }
        if let Some(ct) = &self.content_type {
            write!(f, ", content-type: {ct}")?;
        }
        Ok(())
    }
}
