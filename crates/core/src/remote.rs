//! Remote credential checks
//!
//! Live authentication probes against the third-party platform APIs.
//! A probe only answers "did this key authenticate": network failures,
//! timeouts and non-2xx responses all read as not-valid, so a platform
//! outage is indistinguishable from a bad key. No retries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::platform::Platform;

const PROBE_TIMEOUT: Duration = Duration::from_secs(10);
const BOL_ORDERS_URL: &str = "https://api.bol.com/retailer/orders";

/// Read-only authentication probe for one platform.
#[async_trait]
pub trait RemoteChecker: Send + Sync {
    /// Returns true iff the credentials authenticated against the
    /// live platform API.
    async fn check(&self, platform: Platform, api_key: &str, api_secret: Option<&str>) -> bool;
}

/// Probes the platforms over HTTP with a bounded timeout.
pub struct HttpRemoteChecker {
    client: Client,
}

impl HttpRemoteChecker {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(PROBE_TIMEOUT)
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    async fn check_bol(&self, api_key: &str) -> bool {
        let response = self
            .client
            .get(BOL_ORDERS_URL)
            .bearer_auth(api_key)
            .header("Accept", "application/json")
            .send()
            .await;

        match response {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                debug!("bol.com credential probe failed: {}", err);
                false
            }
        }
    }
}

impl Default for HttpRemoteChecker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteChecker for HttpRemoteChecker {
    async fn check(&self, platform: Platform, api_key: &str, _api_secret: Option<&str>) -> bool {
        match platform {
            Platform::Bol => self.check_bol(api_key).await,
            // Amazon SP-API verification is not wired up; shape checks
            // are the only gate for these two.
            Platform::Amazon | Platform::AmazonUsa => true,
            // No probe implemented; fail closed.
            Platform::Zalando | Platform::Walmart => false,
        }
    }
}
