use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use http::header::{COOKIE, HOST, REFERER, USER_AGENT};
use http::uri::InvalidUri;
use http::{HeaderMap, HeaderName, Uri};

/// Facts about the incoming request that rule text can observe.
///
/// Built with chained setters:
///
/// ```
/// use rewrite_rules::RequestFacts;
///
/// let facts = RequestFacts::new("/blog/2003-nov?page=2")
///     .host("www.foo.org")
///     .user_agent("curl/8.0")
///     .secure(true);
/// assert_eq!(facts.query_string(), "page=2");
/// ```
#[derive(Debug, Clone)]
pub struct RequestFacts {
    pub(crate) url: String,
    pub(crate) application_path: String,
    pub(crate) method: String,
    pub(crate) host: Option<String>,
    pub(crate) user_agent: Option<String>,
    pub(crate) referer: Option<String>,
    pub(crate) cookie: Option<String>,
    pub(crate) remote_addr: Option<String>,
    pub(crate) remote_host: Option<String>,
    pub(crate) remote_user: Option<String>,
    pub(crate) secure: bool,
    pub(crate) now: DateTime<Utc>,
    pub(crate) extra: BTreeMap<String, String>,
}

macro_rules! setter {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[must_use]
        pub fn $name(mut self, value: impl Into<String>) -> Self {
            self.$name = Some(value.into());
            self
        }
    };
}

impl RequestFacts {
    /// Facts for a request to `url` (path plus optional query string).
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            application_path: String::new(),
            method: "GET".to_owned(),
            host: None,
            user_agent: None,
            referer: None,
            cookie: None,
            remote_addr: None,
            remote_host: None,
            remote_user: None,
            secure: false,
            now: Utc::now(),
            extra: BTreeMap::new(),
        }
    }

    /// Facts for an absolute URL such as `http://www.foo.org:42/a?b=c`.
    ///
    /// The `Host` header is taken from the URL; the port is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidUri`] if `url` cannot be parsed.
    pub fn from_url(url: &str) -> Result<Self, InvalidUri> {
        let uri: Uri = url.parse()?;
        let mut facts = Self::new(path_and_query(&uri));
        facts.host = uri.host().map(str::to_owned);
        facts.secure = uri.scheme_str() == Some("https");
        Ok(facts)
    }

    setter!(host, "Value of the `Host` header.");
    setter!(user_agent, "Value of the `User-Agent` header.");
    setter!(referer, "Value of the `Referer` header.");
    setter!(cookie, "Raw `Cookie` header.");
    setter!(remote_addr, "Client address.");
    setter!(remote_host, "Client host name.");
    setter!(remote_user, "Authenticated user name.");

    /// Prefix the application is mounted under, stripped before rules match.
    #[must_use]
    pub fn application_path(mut self, path: impl Into<String>) -> Self {
        self.application_path = path.into();
        self
    }

    #[must_use]
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Whether the request arrived over TLS (`HTTPS` = `on`).
    #[must_use]
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Clock reading used for the `TIME*` variables.
    #[must_use]
    pub fn now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Extra variable, overriding a built-in of the same name.
    #[must_use]
    pub fn var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    /// Path and query string of the request.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Query string of the request, without the `?`.
    #[must_use]
    pub fn query_string(&self) -> &str {
        query_string(&self.url)
    }
}

impl<B> From<&http::Request<B>> for RequestFacts {
    fn from(req: &http::Request<B>) -> Self {
        let headers = req.headers();
        let mut facts = Self::new(path_and_query(req.uri())).method(req.method().as_str());
        facts.host = header(headers, &HOST).or_else(|| req.uri().host().map(str::to_owned));
        facts.user_agent = header(headers, &USER_AGENT);
        facts.referer = header(headers, &REFERER);
        facts.cookie = header(headers, &COOKIE);
        facts.secure = req.uri().scheme_str() == Some("https");
        facts
    }
}

fn header(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

fn path_and_query(uri: &Uri) -> String {
    match uri.query() {
        Some(query) => format!("{}?{query}", uri.path()),
        None => uri.path().to_owned(),
    }
}

/// Text after the first `?`, or empty.
pub(crate) fn query_string(url: &str) -> &str {
    url.split_once('?').map_or("", |(_, q)| q)
}
