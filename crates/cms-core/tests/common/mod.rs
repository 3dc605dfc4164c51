#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::time::Duration;

use cms_core::{CmsClient, CmsConfig};
use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Route all tests hit: `{server}/cms/{page_id}`.
pub const BASE_PATH: &str = "/cms";

/// Send loader debug events to the test harness output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Client pointed at the mock server.
pub fn client_for(server: &MockServer, api_key: Option<&str>) -> CmsClient {
    let config = CmsConfig::new(format!("{}{BASE_PATH}", server.uri()), api_key.map(String::from))
        .expect("valid config");
    CmsClient::new(config).expect("http client")
}

/// Serve `body` for `page_id`, optionally after `delay`.
pub async fn mount_page(server: &MockServer, page_id: &str, body: Value, delay: Option<Duration>) {
    let mut response = ResponseTemplate::new(200).set_body_json(body);
    if let Some(delay) = delay {
        response = response.set_delay(delay);
    }
    Mock::given(method("GET"))
        .and(path(format!("{BASE_PATH}/{page_id}")))
        .respond_with(response)
        .mount(server)
        .await;
}
