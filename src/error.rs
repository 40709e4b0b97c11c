//! Error types for the live state view.
//!
//! [`ViewError`] is the central error type. Only setup paths (endpoint
//! construction, configuration) return it to callers; connection and decode
//! failures inside the running display are reported through `tracing` and
//! never surface as return values.

use tokio_tungstenite::tungstenite;

/// Error enum for endpoint, connection, decode and configuration failures.
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    /// The page host cannot be turned into a `ws://{host}/ws` endpoint.
    #[error("invalid host {host:?}: {reason}")]
    InvalidHost {
        /// Host string as supplied.
        host: String,
        /// Why the host was rejected.
        reason: &'static str,
    },

    /// WebSocket handshake or transport failure.
    #[error("connection error: {0}")]
    Connect(#[from] tungstenite::Error),

    /// Payload is not a valid JSON document.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Environment configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ViewError {
    /// Shorthand for [`ViewError::InvalidHost`].
    pub(crate) fn invalid_host(host: &str, reason: &'static str) -> Self {
        Self::InvalidHost {
            host: host.to_string(),
            reason,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn invalid_host_message_names_host_and_reason() {
        let err = ViewError::invalid_host("bad/host", "host must not contain a path");
        assert_eq!(
            err.to_string(),
            "invalid host \"bad/host\": host must not contain a path"
        );
    }

    #[test]
    fn decode_error_converts_from_serde() {
        let Err(source) = serde_json::from_str::<serde_json::Value>("not valid json") else {
            panic!("expected parse failure");
        };
        let err = ViewError::from(source);
        assert!(matches!(err, ViewError::Decode(_)));
        assert!(err.to_string().starts_with("decode error:"));
    }
}
