//! Metrics fetch endpoint

use std::time::Duration;

use async_trait::async_trait;
use pulse_core::{FetchError, FilterState, MetricsSnapshot};
use url::Url;

/// Source of filtered metrics snapshots
#[async_trait]
pub trait MetricsApi: Send + Sync {
    /// Fetch the latest snapshot narrowed by `filters`
    async fn fetch_metrics(&self, filters: &FilterState) -> Result<MetricsSnapshot, FetchError>;
}

/// `GET /api/metrics` over HTTP
#[derive(Debug, Clone)]
pub struct HttpMetricsApi {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpMetricsApi {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl MetricsApi for HttpMetricsApi {
    async fn fetch_metrics(&self, filters: &FilterState) -> Result<MetricsSnapshot, FetchError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&filters.query_pairs())
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response
            .json::<MetricsSnapshot>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreachable_endpoint_is_transport_error() {
        let endpoint = Url::parse("http://127.0.0.1:9/api/metrics").unwrap();
        let api = HttpMetricsApi::new(endpoint, Duration::from_secs(2)).unwrap();
        assert_eq!(api.endpoint().path(), "/api/metrics");

        let result = tokio_test::block_on(api.fetch_metrics(&FilterState::default()));
        assert!(matches!(result, Err(FetchError::Transport(_))));
    }
}
