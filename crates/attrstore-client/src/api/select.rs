//! Select-by-query endpoint.

use crate::StoreClient;
use attrstore_core::{Result, SelectRequest, SelectResult};

/// Builder for select requests.
///
/// The service sizes response pages itself; pass the returned `next_token`
/// back in to continue where the previous page stopped.
pub struct SelectBuilder<'a> {
    client: &'a StoreClient,
    request: SelectRequest,
}

impl<'a> SelectBuilder<'a> {
    pub(crate) fn new(client: &'a StoreClient, expression: String) -> Self {
        Self {
            client,
            request: SelectRequest::new(expression),
        }
    }

    /// Request a strongly consistent read
    #[must_use]
    pub const fn consistent(mut self) -> Self {
        self.request.consistent_read = true;
        self
    }

    /// Resume from a continuation cursor
    #[must_use]
    pub fn next_token(mut self, token: impl Into<String>) -> Self {
        self.request.next_token = Some(token.into());
        self
    }

    /// Execute the request
    pub async fn send(self) -> Result<SelectResult> {
        self.client.select_page(self.request).await
    }
}
