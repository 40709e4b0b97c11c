//! Endpoint construction.
//!
//! The display always connects to `/ws` on the page's own host over the
//! non-secure `ws` scheme. [`Endpoint`] validates the host and builds the
//! URL once.

use std::fmt;
use std::str::FromStr;

use tokio_tungstenite::tungstenite::http::uri::Authority;

use crate::error::ViewError;

/// Transport scheme used for the endpoint. Never `wss`.
pub const ENDPOINT_SCHEME: &str = "ws";

/// Path segment the message endpoint is served on.
pub const ENDPOINT_PATH: &str = "/ws";

/// A validated `ws://{host}/ws` connection target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    host: String,
    url: String,
}

impl Endpoint {
    /// Builds the endpoint for a page served from `host`.
    ///
    /// `host` is a network location as a browser reports it: a hostname or
    /// IP literal with an optional port (`example.com`, `10.0.0.5:8000`,
    /// `[::1]:8000`). The host is lowercased.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::InvalidHost`] if the host is empty, carries a
    /// scheme, path, query, fragment or user info, has an empty or
    /// out-of-range port, or is not a valid URI authority.
    pub fn from_host(host: &str) -> Result<Self, ViewError> {
        let host = host.trim().to_ascii_lowercase();
        let host = host.as_str();
        if host.is_empty() {
            return Err(ViewError::invalid_host(host, "host is empty"));
        }
        if host.contains("://") {
            return Err(ViewError::invalid_host(host, "host must not carry a scheme"));
        }
        if host.contains(['/', '?', '#']) {
            return Err(ViewError::invalid_host(
                host,
                "host must not contain a path, query or fragment",
            ));
        }
        if host.contains('@') {
            return Err(ViewError::invalid_host(host, "host must not carry user info"));
        }
        let authority = Authority::from_str(host)
            .map_err(|_| ViewError::invalid_host(host, "not a valid network location"))?;
        if authority.as_str().len() > authority.host().len() && authority.port_u16().is_none() {
            return Err(ViewError::invalid_host(host, "port must be a number up to 65535"));
        }

        let url = format!("{ENDPOINT_SCHEME}://{authority}{ENDPOINT_PATH}");
        Ok(Self {
            host: authority.as_str().to_string(),
            url,
        })
    }

    /// The host the endpoint was derived from, port included.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The full connection URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

impl FromStr for Endpoint {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_host(s)
    }
}
