//! Error types and handling for cms-core operations.
//!
//! Errors fall into two groups that callers treat very differently:
//!
//! - **Returned errors**: problems the caller can act on immediately, such as an
//!   invalid configuration, an empty page id, or using the provider before it
//!   was mounted. These come back as `Err` from the call that caused them.
//! - **Load failures**: network, HTTP status and decoding errors raised while a
//!   page is being fetched. These never escape [`PageLoader::load`]; they are
//!   converted to the `Failed` state of the page store and surfaced through
//!   [`CmsClient::error`].
//!
//! [`PageLoader::load`]: crate::PageLoader::load
//! [`CmsClient::error`]: crate::CmsClient::error
//!
//! ```rust
//! use cms_core::{CmsConfig, Error};
//!
//! match CmsConfig::new("", None) {
//!     Err(Error::InvalidConfiguration(msg)) => eprintln!("bad config: {msg}"),
//!     Err(e) => eprintln!("unexpected: {e}"),
//!     Ok(_) => unreachable!(),
//! }
//! ```

use thiserror::Error;

/// The main error type for cms-core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration is missing a usable base URL or could not be read.
    ///
    /// Fatal to construction: a client must not be built from it.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A page id passed to the loader was empty.
    #[error("Invalid page id: {0}")]
    InvalidPageId(String),

    /// The provider was accessed while no client was mounted.
    ///
    /// This is a programming error on the caller's side and is not retried.
    #[error("CMS client used outside of a mounted provider")]
    UsedOutsideProvider,

    /// HTTP request failed at the transport level or returned an error status.
    ///
    /// The underlying `reqwest::Error` is preserved so timeouts and connection
    /// failures can be told apart from status errors.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The endpoint answered 404 for the requested page.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The endpoint answered with a non-success status that is not an HTTP
    /// error, such as a redirect that was not followed or `304 Not Modified`.
    #[error("Unexpected HTTP status {status} from '{url}'")]
    UnexpectedStatus {
        /// Status code returned by the server.
        status: u16,
        /// URL that was requested.
        url: String,
    },

    /// A response body or config file could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O operation failed (reading a config file).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl Error {
    /// Check whether calling `load()` again might succeed.
    ///
    /// The loader never retries on its own. Consumers that want to offer a
    /// "try again" affordance can use this to decide whether it is worthwhile.
    ///
    /// ```rust
    /// use cms_core::Error;
    ///
    /// assert!(!Error::InvalidPageId("empty".into()).is_recoverable());
    /// assert!(!Error::Serialization("bad json".into()).is_recoverable());
    /// ```
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Network(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || e.status().is_some_and(|status| status.is_server_error())
            },
            Self::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted
            ),
            _ => false,
        }
    }

    /// Get the error category as a string identifier for logging.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::InvalidConfiguration(_) => "config",
            Self::InvalidPageId(_) => "invalid_page_id",
            Self::UsedOutsideProvider => "provider",
            Self::Network(_) => "network",
            Self::NotFound(_) => "not_found",
            Self::UnexpectedStatus { .. } => "http_status",
            Self::Serialization(_) => "serialization",
            Self::Io(_) => "io",
        }
    }
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io;

    #[test]
    fn test_error_display_formatting() {
        let cases = vec![
            (
                Error::InvalidConfiguration("baseURL is required".to_string()),
                "Invalid configuration: baseURL is required",
            ),
            (
                Error::InvalidPageId("page id must not be empty".to_string()),
                "Invalid page id: page id must not be empty",
            ),
            (
                Error::UsedOutsideProvider,
                "CMS client used outside of a mounted provider",
            ),
            (
                Error::NotFound("https://api.test/cms/home".to_string()),
                "Not found: https://api.test/cms/home",
            ),
            (
                Error::UnexpectedStatus {
                    status: 304,
                    url: "https://api.test/cms/home".to_string(),
                },
                "Unexpected HTTP status 304 from 'https://api.test/cms/home'",
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(Error::InvalidConfiguration(String::new()).category(), "config");
        assert_eq!(Error::UsedOutsideProvider.category(), "provider");
        assert_eq!(Error::NotFound(String::new()).category(), "not_found");
        assert_eq!(
            Error::UnexpectedStatus {
                status: 302,
                url: String::new(),
            }
            .category(),
            "http_status"
        );
        assert_eq!(
            Error::Io(io::Error::other("boom")).category(),
            "io"
        );
    }

    #[test]
    fn test_serde_json_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{ not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Serialization(_)));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_io_recoverability() {
        assert!(Error::Io(io::Error::new(io::ErrorKind::TimedOut, "slow")).is_recoverable());
        assert!(Error::Io(io::Error::new(io::ErrorKind::Interrupted, "sig")).is_recoverable());
        assert!(!Error::Io(io::Error::new(io::ErrorKind::NotFound, "gone")).is_recoverable());
    }

    proptest! {
        #[test]
        fn test_caller_errors_never_recoverable(msg in ".*") {
            prop_assert!(!Error::InvalidConfiguration(msg.clone()).is_recoverable());
            prop_assert!(!Error::InvalidPageId(msg.clone()).is_recoverable());
            prop_assert!(!Error::NotFound(msg).is_recoverable());
        }
    }
}
