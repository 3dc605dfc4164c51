//! Connection settings for the CMS endpoint.
//!
//! A [`CmsConfig`] is a validated `{ base_url, api_key }` pair. It can be built
//! directly, from raw [`CmsConfigOptions`] (for example deserialized from JSON),
//! from a TOML file, or from environment variables:
//!
//! | Variable       | Field      |
//! |----------------|------------|
//! | `CMS_BASE_URL` | `base_url` |
//! | `CMS_API_KEY`  | `api_key`  |
//!
//! ```rust
//! use cms_core::CmsConfig;
//!
//! let config = CmsConfig::new("https://api.test/cms", Some("secret".to_string()))?;
//! assert_eq!(config.page_url("home"), "https://api.test/cms/home");
//!
//! let config = CmsConfig::from_toml_str(r#"base_url = "https://api.test/cms""#)?;
//! assert!(config.api_key().is_none());
//! # Ok::<(), cms_core::Error>(())
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::lenient_string;
use crate::{Error, Result};

/// Base URL used by [`CmsConfig::default`].
pub const DEFAULT_BASE_URL: &str = "https://api.myheadless.io/cms";

/// Environment variable holding the base URL.
pub const ENV_BASE_URL: &str = "CMS_BASE_URL";

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "CMS_API_KEY";

/// Raw, unvalidated configuration fields.
///
/// Fields that are missing or not strings deserialize as `None`; validation
/// happens in [`CmsConfig::from_options`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CmsConfigOptions {
    /// Base URL of the CMS, e.g. `https://api.example.com/cms`.
    #[serde(
        default,
        alias = "baseURL",
        alias = "baseUrl",
        deserialize_with = "lenient_string"
    )]
    pub base_url: Option<String>,
    /// Optional key sent as `X-API-Key`.
    #[serde(default, alias = "apiKey", deserialize_with = "lenient_string")]
    pub api_key: Option<String>,
}

/// Validated CMS connection settings.
#[derive(Clone, PartialEq, Eq)]
pub struct CmsConfig {
    base_url: String,
    api_key: Option<String>,
}

impl CmsConfig {
    /// Build a config from a base URL and optional API key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `base_url` is empty.
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self> {
        Self::from_options(CmsConfigOptions {
            base_url: Some(base_url.into()),
            api_key,
        })
    }

    /// Validate raw options.
    ///
    /// An empty API key is treated as no key at all.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `base_url` is missing or empty.
    pub fn from_options(options: CmsConfigOptions) -> Result<Self> {
        let base_url = options
            .base_url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                Error::InvalidConfiguration(
                    "baseURL is required and needs to be a string.".to_string(),
                )
            })?;

        Ok(Self {
            base_url,
            api_key: options.api_key.filter(|key| !key.is_empty()),
        })
    }

    /// Parse a TOML document with `base_url` and optional `api_key` keys.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] for malformed TOML and
    /// [`Error::InvalidConfiguration`] when the base URL is missing.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let options: CmsConfigOptions = toml::from_str(content)?;
        Self::from_options(options)
    }

    /// Load a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, otherwise the errors of
    /// [`CmsConfig::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), base_url = %config.base_url, "loaded cms config");
        Ok(config)
    }

    /// Build a config from `CMS_BASE_URL` and `CMS_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `CMS_BASE_URL` is unset or empty.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Like [`CmsConfig::from_env`], reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the base URL is unset or empty.
    pub fn from_env_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_options(CmsConfigOptions {
            base_url: lookup(ENV_BASE_URL),
            api_key: lookup(ENV_API_KEY),
        })
    }

    /// Base URL pages are fetched from.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// API key, if one is configured.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// URL of the page with the given id: `{base_url}/{page_id}`.
    #[must_use]
    pub fn page_url(&self, page_id: &str) -> String {
        format!("{}/{page_id}", self.base_url)
    }
}

impl std::fmt::Debug for CmsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CmsConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
        }
    }
}
