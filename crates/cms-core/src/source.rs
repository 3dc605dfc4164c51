//! Page sources.
//!
//! [`PageSource`] is the seam between the loader and the network.
//! [`HttpPageSource`] fetches `GET {base_url}/{page_id}`, sending `X-API-Key`
//! when a key is configured. A 404 becomes [`Error::NotFound`], 4xx/5xx
//! statuses become [`Error::Network`], and any other non-success status becomes
//! [`Error::UnexpectedStatus`].

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, info};

use crate::{CmsConfig, Error, PageDocument, Result};

/// Header carrying the configured API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Where page documents come from.
///
/// The loader only needs "give me the page with this id"; the HTTP client is
/// one implementation, tests plug in scripted ones.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch and decode the page with the given id.
    async fn fetch_page(&self, page_id: &str) -> Result<PageDocument>;
}

/// Fetches pages from `GET {base_url}/{page_id}`.
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: Client,
    config: CmsConfig,
}

impl HttpPageSource {
    /// Creates a source with a configured HTTP client.
    ///
    /// No request timeout is set: a request stays outstanding until it
    /// completes or the loader aborts it.
    pub fn new(config: CmsConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("cms-core/", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(Error::Network)?;
        Ok(Self::with_client(client, config))
    }

    /// Creates a source around an existing client.
    #[must_use]
    pub const fn with_client(client: Client, config: CmsConfig) -> Self {
        Self { client, config }
    }

    /// Configuration this source fetches with.
    #[must_use]
    pub const fn config(&self) -> &CmsConfig {
        &self.config
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch_page(&self, page_id: &str) -> Result<PageDocument> {
        let url = self.config.page_url(page_id);
        let mut request = self.client.get(&url);

        if let Some(key) = self.config.api_key() {
            debug!(url = %url, "setting API key header");
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            if status == StatusCode::NOT_FOUND {
                return Err(Error::NotFound(format!("No CMS page at '{url}'")));
            }

            // error_for_status only rejects 4xx/5xx
            return Err(match response.error_for_status() {
                Err(err) => Error::Network(err),
                Ok(_) => Error::UnexpectedStatus {
                    status: status.as_u16(),
                    url,
                },
            });
        }

        let body = response.bytes().await?;
        let document: PageDocument = serde_json::from_slice(&body)?;

        info!("Fetched {} bytes from {}", body.len(), url);

        Ok(document)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path},
    };

    fn source_for(server: &MockServer, api_key: Option<&str>) -> HttpPageSource {
        let config =
            CmsConfig::new(format!("{}/cms", server.uri()), api_key.map(String::from)).unwrap();
        HttpPageSource::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_decodes_page() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cms/home"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "title": "Home",
                "textBlocks": [{"id": "t1", "content": "Hi"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let page = source_for(&server, None).fetch_page("home").await?;

        assert_eq!(page.title.as_deref(), Some("Home"));
        assert_eq!(page.text_content("t1"), Some("Hi"));
        Ok(())
    }

    #[tokio::test]
    async fn test_api_key_header_sent_when_configured() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cms/home"))
            .and(header(API_KEY_HEADER, "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        source_for(&server, Some("secret"))
            .fetch_page("home")
            .await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_no_api_key_header_without_key() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cms/home"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        source_for(&server, None).fetch_page("home").await?;

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(!requests[0].headers.contains_key(API_KEY_HEADER));
        Ok(())
    }

    #[tokio::test]
    async fn test_404_maps_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cms/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let result = source_for(&server, None).fetch_page("missing").await;

        match result {
            Err(Error::NotFound(msg)) => assert!(msg.contains("/cms/missing")),
            Err(e) => panic!("Expected NotFound error, got: {e}"),
            Ok(_) => panic!("Expected error for 404 response"),
        }
    }

    #[tokio::test]
    async fn test_500_maps_to_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cms/home"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = source_for(&server, None).fetch_page("home").await;

        match result {
            Err(err @ Error::Network(_)) => {
                assert!(err.is_recoverable(), "5xx should be worth retrying");
                assert!(!err.to_string().is_empty());
            },
            Err(e) => panic!("Expected Network error, got: {e}"),
            Ok(_) => panic!("Expected error for 500 response"),
        }
    }

    #[tokio::test]
    async fn test_401_maps_to_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cms/home"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let result = source_for(&server, Some("wrong")).fetch_page("home").await;

        match result {
            Err(err @ Error::Network(_)) => {
                assert!(!err.is_recoverable(), "4xx should not be retried");
                assert!(err.to_string().contains("401"));
            },
            Err(e) => panic!("Expected Network error, got: {e}"),
            Ok(_) => panic!("Expected error for 401 response"),
        }
    }

    #[tokio::test]
    async fn test_304_maps_to_unexpected_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cms/home"))
            .respond_with(ResponseTemplate::new(304))
            .mount(&server)
            .await;

        let result = source_for(&server, None).fetch_page("home").await;

        match result {
            Err(Error::UnexpectedStatus { status, url }) => {
                assert_eq!(status, 304);
                assert!(url.ends_with("/cms/home"));
            },
            Err(e) => panic!("Expected UnexpectedStatus error, got: {e}"),
            Ok(_) => panic!("Expected error for 304 response"),
        }
    }

    #[tokio::test]
    async fn test_redirect_without_location_maps_to_unexpected_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cms/home"))
            .respond_with(ResponseTemplate::new(302))
            .mount(&server)
            .await;

        let result = source_for(&server, None).fetch_page("home").await;
        assert!(matches!(
            result,
            Err(Error::UnexpectedStatus { status: 302, .. })
        ));
    }

    #[tokio::test]
    async fn test_malformed_body_is_serialization_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cms/home"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let result = source_for(&server, None).fetch_page("home").await;
        assert!(matches!(result, Err(Error::Serialization(_))));
    }
}
