//! HTTP client abstraction for testability

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use super::types::ProviderError;

/// Boxed future returned by [`AsyncHttpClient`] methods.
pub type HttpFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<u8>, ProviderError>> + Send + 'a>>;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Trait for async HTTP client operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an HTTP POST with a JSON body.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request
    /// * `bearer` - Optional bearer credential for the `Authorization` header
    /// * `body` - JSON request body
    ///
    /// # Returns
    ///
    /// The response body as bytes, or an error for transport failures and
    /// non-2xx responses.
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        bearer: Option<&'a str>,
        body: &'a serde_json::Value,
    ) -> HttpFuture<'a>;
}

/// Real HTTP client implementation using reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a new ReqwestClient with default configuration.
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Creates a new ReqwestClient with custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ProviderError::ClientBuild(e.to_string()))?;

        Ok(Self { client })
    }
}

impl AsyncHttpClient for ReqwestClient {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        bearer: Option<&'a str>,
        body: &'a serde_json::Value,
    ) -> HttpFuture<'a> {
        Box::pin(async move {
            let mut request = self.client.post(url).json(body);
            if let Some(token) = bearer {
                request = request.bearer_auth(token);
            }

            let response = request
                .send()
                .await
                .map_err(|e| ProviderError::HttpError(format!("Request failed: {}", e)))?;

            let status = response.status();
            if !status.is_success() {
                return Err(ProviderError::Status {
                    status: status.as_u16(),
                    url: url.to_string(),
                });
            }

            response
                .bytes()
                .await
                .map(|b| b.to_vec())
                .map_err(|e| ProviderError::HttpError(format!("Failed to read response: {}", e)))
        })
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use parking_lot::Mutex;

    /// A request captured by [`MockHttpClient`].
    #[derive(Debug, Clone)]
    pub struct RecordedRequest {
        pub url: String,
        pub bearer: Option<String>,
        pub body: serde_json::Value,
    }

    /// Mock HTTP client for testing
    #[derive(Debug)]
    pub struct MockHttpClient {
        pub response: Result<Vec<u8>, ProviderError>,
        pub requests: Mutex<Vec<RecordedRequest>>,
    }

    impl MockHttpClient {
        pub fn new(response: Result<Vec<u8>, ProviderError>) -> Self {
            Self {
                response,
                requests: Mutex::new(Vec::new()),
            }
        }

        /// Mock that answers every request with the given JSON body.
        pub fn json(body: &str) -> Self {
            Self::new(Ok(body.as_bytes().to_vec()))
        }

        /// Mock that fails every request.
        pub fn failing() -> Self {
            Self::new(Err(ProviderError::HttpError("connection refused".to_string())))
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock().len()
        }

        pub fn last_request(&self) -> Option<RecordedRequest> {
            self.requests.lock().last().cloned()
        }
    }

    impl AsyncHttpClient for MockHttpClient {
        fn post_json<'a>(
            &'a self,
            url: &'a str,
            bearer: Option<&'a str>,
            body: &'a serde_json::Value,
        ) -> HttpFuture<'a> {
            self.requests.lock().push(RecordedRequest {
                url: url.to_string(),
                bearer: bearer.map(str::to_string),
                body: body.clone(),
            });
            let response = self.response.clone();
            Box::pin(async move { response })
        }
    }

    #[tokio::test]
    async fn test_mock_client_success() {
        let mock = MockHttpClient::new(Ok(vec![1, 2, 3, 4]));

        let body = serde_json::json!({ "a": 1 });
        let result = mock.post_json("http://example.com", None, &body).await;
        assert_eq!(result.unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_client_error() {
        let mock = MockHttpClient::failing();

        let body = serde_json::json!({});
        let result = mock.post_json("http://example.com", Some("k"), &body).await;
        assert!(matches!(result, Err(ProviderError::HttpError(_))));
        assert_eq!(mock.last_request().unwrap().bearer.as_deref(), Some("k"));
    }

    #[test]
    fn test_reqwest_client_builds() {
        assert!(ReqwestClient::with_timeout(5).is_ok());
    }
}
