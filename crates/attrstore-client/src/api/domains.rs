//! Domain lifecycle and listing endpoints.

use crate::client::urlencoding::encode_segment;
use crate::StoreClient;
use attrstore_core::{DomainMetadata, DomainPage, ListDomainsRequest, Result};

/// Domain operations
pub struct DomainsApi<'a> {
    client: &'a StoreClient,
}

impl<'a> DomainsApi<'a> {
    pub(crate) fn new(client: &'a StoreClient) -> Self {
        Self { client }
    }

    /// Create a domain. Creating an existing domain is not an error, so the
    /// call is safe to repeat.
    pub async fn create(&self, name: &str) -> Result<()> {
        self.client
            .put::<()>(&format!("/domains/{}", encode_segment(name)), None)
            .await
    }

    /// Delete a domain and everything in it. Idempotent; the service takes a
    /// while to finish large deletions.
    pub async fn delete(&self, name: &str) -> Result<()> {
        self.client.delete(&format!("/domains/{}", encode_segment(name))).await
    }

    /// Size and count statistics for a domain.
    pub async fn metadata(&self, name: &str) -> Result<DomainMetadata> {
        self.client
            .get_with_query(&format!("/domains/{}/metadata", encode_segment(name)), &[])
            .await
    }

    /// Fetch one page of domain names.
    pub async fn page(&self, request: ListDomainsRequest) -> Result<DomainPage> {
        let mut params = Vec::new();

        let max_str;
        if let Some(max) = request.max_number_of_domains {
            max_str = max.to_string();
            params.push(("MaxNumberOfDomains", max_str.as_str()));
        }

        if let Some(ref token) = request.next_token {
            params.push(("NextToken", token.as_str()));
        }

        self.client.get_with_query("/domains", &params).await
    }

    /// Start a paginated listing request.
    #[must_use]
    pub fn list(&self) -> ListDomainsBuilder<'a> {
        ListDomainsBuilder::new(self.client)
    }

    /// List every domain name, following pagination to the end.
    pub async fn all(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut request = ListDomainsRequest::new();

        loop {
            let page = self.page(request.clone()).await?;
            names.extend(page.domain_names);
            match page.next_token {
                Some(token) => request = ListDomainsRequest::new().with_next_token(token),
                None => return Ok(names),
            }
        }
    }
}

/// Builder for paginated domain listing
pub struct ListDomainsBuilder<'a> {
    client: &'a StoreClient,
    request: ListDomainsRequest,
}

impl<'a> ListDomainsBuilder<'a> {
    fn new(client: &'a StoreClient) -> Self {
        Self {
            client,
            request: ListDomainsRequest::new(),
        }
    }

    /// Cap the number of names returned in this page
    #[must_use]
    pub const fn max_domains(mut self, max: u32) -> Self {
        self.request.max_number_of_domains = Some(max);
        self
    }

    /// Resume from a continuation cursor
    #[must_use]
    pub fn next_token(mut self, token: impl Into<String>) -> Self {
        self.request.next_token = Some(token.into());
        self
    }

    /// Execute the request
    pub async fn send(self) -> Result<DomainPage> {
        DomainsApi::new(self.client).page(self.request).await
    }
}
