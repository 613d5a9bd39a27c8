//! Main store client implementation.

use crate::api::{AttributesApi, DomainsApi, SelectBuilder};
use attrstore_core::{
    Attribute, AttributeStore, DomainMetadata, DomainPage, GetAttributesRequest,
    ListDomainsRequest, ReplaceableAttribute, ReplaceableItem, Result, SelectRequest,
    SelectResult, StoreError,
};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// The default store endpoint
const DEFAULT_ENDPOINT: &str = "https://api.attrstore.io";

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP-backed client for the key/attribute store.
///
/// This layer maps each remote operation onto one HTTP call and surfaces
/// every error verbatim; it never retries and never swallows failures.
#[derive(Clone, Debug)]
pub struct StoreClient {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    http: HttpClient,
    base_url: String,
}

impl StoreClient {
    /// Create a client against the default endpoint.
    pub fn new() -> Result<Self> {
        StoreClientBuilder::new().build()
    }

    /// Create a builder for custom configuration.
    #[must_use]
    pub fn builder() -> StoreClientBuilder {
        StoreClientBuilder::new()
    }

    /// Access domain operations.
    #[must_use]
    pub fn domains(&self) -> DomainsApi<'_> {
        DomainsApi::new(self)
    }

    /// Access item attribute operations.
    #[must_use]
    pub fn attributes(&self) -> AttributesApi<'_> {
        AttributesApi::new(self)
    }

    /// Start a select-by-query request.
    #[must_use]
    pub fn select(&self, expression: impl Into<String>) -> SelectBuilder<'_> {
        SelectBuilder::new(self, expression.into())
    }

    /// Run a fully-formed select request.
    pub(crate) async fn select_page(&self, request: SelectRequest) -> Result<SelectResult> {
        self.post("/select", &request).await
    }

    /// Perform a GET request with query parameters
    pub(crate) async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = self.build_url(path, params);
        debug!(url = %url, "GET request");

        let response = self
            .inner
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| StoreError::Http(e.to_string()))?;

        self.handle_response(response).await
    }

    /// Perform a POST request with JSON body, expecting a JSON response
    pub(crate) async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.build_url(path, &[]);
        debug!(url = %url, "POST request");

        let response = self
            .inner
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| StoreError::Http(e.to_string()))?;

        self.handle_response(response).await
    }

    /// Perform a POST request with JSON body, expecting no response body
    pub(crate) async fn post_empty<B: serde::Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let url = self.build_url(path, &[]);
        debug!(url = %url, "POST request");

        let response = self
            .inner
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| StoreError::Http(e.to_string()))?;

        self.handle_empty_response(response).await
    }

    /// Perform a PUT request, optionally with a JSON body
    pub(crate) async fn put<B: serde::Serialize>(&self, path: &str, body: Option<&B>) -> Result<()> {
        let url = self.build_url(path, &[]);
        debug!(url = %url, "PUT request");

        let mut request = self.inner.http.put(&url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Http(e.to_string()))?;

        self.handle_empty_response(response).await
    }

    /// Perform a DELETE request
    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        let url = self.build_url(path, &[]);
        debug!(url = %url, "DELETE request");

        let response = self
            .inner
            .http
            .delete(&url)
            .send()
            .await
            .map_err(|e| StoreError::Http(e.to_string()))?;

        self.handle_empty_response(response).await
    }

    /// Build a URL with query parameters
    fn build_url(&self, path: &str, params: &[(&str, &str)]) -> String {
        let mut url = format!("{}{}", self.inner.base_url, path);

        let mut separator = '?';
        for (key, value) in params {
            url.push(separator);
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
            separator = '&';
        }

        url
    }

    /// Handle an API response that returns JSON
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| StoreError::Http(e.to_string()))?;
            serde_json::from_str(&body).map_err(StoreError::Json)
        } else {
            self.handle_error(status.as_u16(), response).await
        }
    }

    /// Handle an API response that returns no body
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if status.is_success() {
            Ok(())
        } else {
            self.handle_error(status.as_u16(), response).await
        }
    }

    /// Convert an error response to a StoreError
    async fn handle_error<T>(&self, status: u16, response: reqwest::Response) -> Result<T> {
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());

        let body = response.text().await.unwrap_or_default();

        // error payloads carry {"Code": "...", "Message": "..."}
        let parsed = serde_json::from_str::<serde_json::Value>(&body).ok();
        let code = parsed
            .as_ref()
            .and_then(|v| v.get("Code").and_then(|c| c.as_str()))
            .map(String::from);
        let message = parsed
            .as_ref()
            .and_then(|v| v.get("Message").and_then(|m| m.as_str()))
            .map_or(body.clone(), String::from);

        if status == 503 {
            warn!(retry_after, "store is throttling requests");
            return Err(StoreError::ServiceUnavailable { retry_after });
        }

        match code {
            Some(code) => Err(StoreError::from_service_code(&code, message)),
            None => Err(StoreError::Service {
                code: status.to_string(),
                message,
            }),
        }
    }
}

#[async_trait::async_trait]
impl AttributeStore for StoreClient {
    async fn create_domain(&self, domain_name: &str) -> Result<()> {
        self.domains().create(domain_name).await
    }

    async fn delete_domain(&self, domain_name: &str) -> Result<()> {
        self.domains().delete(domain_name).await
    }

    async fn list_domains(&self, request: ListDomainsRequest) -> Result<DomainPage> {
        self.domains().page(request).await
    }

    async fn domain_metadata(&self, domain_name: &str) -> Result<DomainMetadata> {
        self.domains().metadata(domain_name).await
    }

    async fn put_attributes(
        &self,
        domain_name: &str,
        item_name: &str,
        attributes: &[ReplaceableAttribute],
    ) -> Result<()> {
        self.attributes().put(domain_name, item_name, attributes).await
    }

    async fn batch_put_attributes(
        &self,
        domain_name: &str,
        items: &[ReplaceableItem],
    ) -> Result<()> {
        self.attributes().batch_put(domain_name, items).await
    }

    async fn get_attributes(&self, request: GetAttributesRequest) -> Result<Vec<Attribute>> {
        self.attributes().fetch(request).await
    }

    async fn delete_attributes(
        &self,
        domain_name: &str,
        item_name: &str,
        attributes: &[Attribute],
    ) -> Result<()> {
        self.attributes()
            .delete(domain_name, item_name, attributes)
            .await
    }

    async fn select(&self, request: SelectRequest) -> Result<SelectResult> {
        self.select_page(request).await
    }
}

/// Builder for configuring a [`StoreClient`]
pub struct StoreClientBuilder {
    endpoint: String,
    timeout: Duration,
    user_agent: String,
}

impl Default for StoreClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreClientBuilder {
    /// Create a builder against the default endpoint.
    #[must_use]
    pub fn new() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("attrstore-rust/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Override the endpoint.
    ///
    /// Accepts a bare host (`store.internal:8080`) or a full URL; a bare
    /// host gets the default `https` scheme. Validation happens in
    /// [`build`](Self::build).
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Build the client.
    ///
    /// Fails with [`StoreError::InvalidEndpoint`] when the configured
    /// endpoint is not a usable URL.
    pub fn build(self) -> Result<StoreClient> {
        let endpoint = if self.endpoint.contains("://") {
            self.endpoint
        } else {
            format!("https://{}", self.endpoint)
        };
        let parsed = url::Url::parse(&endpoint)
            .map_err(|e| StoreError::InvalidEndpoint(format!("{endpoint}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(StoreError::InvalidEndpoint(format!(
                "unsupported scheme: {}",
                parsed.scheme()
            )));
        }
        let base_url = endpoint.trim_end_matches('/').to_string();

        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .gzip(true)
            .build()
            .map_err(|e| StoreError::Http(e.to_string()))?;

        Ok(StoreClient {
            inner: Arc::new(ClientInner { http, base_url }),
        })
    }
}

// URL encoding helpers
pub(crate) mod urlencoding {
    pub fn encode(s: &str) -> String {
        url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
    }

    /// Encode one path segment, so a `/` or `?` in a name cannot change the
    /// route.
    pub fn encode_segment(s: &str) -> String {
        encode(s).replace('+', "%20")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_gets_https_scheme() {
        let client = StoreClient::builder()
            .endpoint("store.internal:8443")
            .build()
            .unwrap();
        assert_eq!(
            client.build_url("/domains", &[]),
            "https://store.internal:8443/domains"
        );
    }

    #[test]
    fn trailing_slash_is_normalized() {
        let client = StoreClient::builder()
            .endpoint("http://localhost:9000/")
            .build()
            .unwrap();
        assert_eq!(
            client.build_url("/select", &[]),
            "http://localhost:9000/select"
        );
    }

    #[test]
    fn garbage_endpoint_is_rejected() {
        let err = StoreClient::builder().endpoint("http://[half").build().unwrap_err();
        assert!(matches!(err, StoreError::InvalidEndpoint(_)));

        let err = StoreClient::builder().endpoint("ftp://files").build().unwrap_err();
        assert!(matches!(err, StoreError::InvalidEndpoint(_)));
    }

    #[test]
    fn path_segments_are_percent_encoded() {
        assert_eq!(urlencoding::encode_segment("a/b c?"), "a%2Fb%20c%3F");
        assert_eq!(urlencoding::encode_segment("plain-name"), "plain-name");
    }

    #[test]
    fn query_params_are_encoded() {
        let client = StoreClient::builder().endpoint("http://h").build().unwrap();
        let url = client.build_url("/domains", &[("NextToken", "a b&c")]);
        assert_eq!(url, "http://h/domains?NextToken=a+b%26c");
    }
}
