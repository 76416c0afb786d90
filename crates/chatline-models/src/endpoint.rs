//! Backend base URL.
//!
//! Every request path (`/status`, `/chat`, …) is joined onto a
//! [`BaseUrl`], which is validated once at construction so the client never
//! has to re-check it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ModelError;

/// Default address of a locally running backend.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Root URL of the chat backend.
///
/// Parsed with [`url::Url`], so scheme and host are normalised to lower
/// case. Trailing slashes of the path are dropped; a query string is kept
/// and carried onto every joined endpoint.
///
/// # Examples
///
/// ```
/// use chatline_models::BaseUrl;
///
/// let base = BaseUrl::new("http://localhost:5000/").unwrap();
/// assert_eq!(base.join("/chat"), "http://localhost:5000/chat");
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct BaseUrl(Url);

impl BaseUrl {
    /// Validate and normalise a base URL.
    ///
    /// The scheme must be `http` or `https`, a non-empty host is required
    /// and fragments are rejected.
    pub fn new(raw: &str) -> Result<Self, ModelError> {
        let invalid = |reason: String| ModelError::InvalidBaseUrl {
            value: raw.to_string(),
            reason,
        };

        let mut url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https".into()));
        }
        match url.host_str() {
            Some(host) if !host.is_empty() => {}
            _ => return Err(invalid("missing host".into())),
        }
        if url.fragment().is_some() {
            return Err(invalid("must not contain a fragment".into()));
        }

        let path = url.path().trim_end_matches('/').to_string();
        url.set_path(&path);
        Ok(Self(url))
    }

    /// Append an absolute path (starting with `/`) to the base path. The
    /// base's query string, if any, is kept.
    pub fn join(&self, path: &str) -> String {
        let mut url = self.0.clone();
        let prefix = self.0.path().trim_end_matches('/');
        url.set_path(&format!("{prefix}/{}", path.trim_start_matches('/')));
        url.into()
    }

    /// The normalised URL, without the root path's trailing slash.
    pub fn as_str(&self) -> &str {
        let s = self.0.as_str();
        if self.0.query().is_none() {
            s.strip_suffix('/').unwrap_or(s)
        } else {
            s
        }
    }

    /// The parsed URL.
    pub fn url(&self) -> &Url {
        &self.0
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BaseUrl {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for BaseUrl {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<BaseUrl> for String {
    fn from(value: BaseUrl) -> Self {
        value.as_str().to_string()
    }
}
