//! Item attribute endpoints.

use crate::client::urlencoding::encode_segment;
use crate::StoreClient;
use attrstore_core::{
    Attribute, GetAttributesRequest, ReplaceableAttribute, ReplaceableItem, Result,
};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct AttributeWrites<'a> {
    #[serde(rename = "Attributes")]
    attributes: &'a [ReplaceableAttribute],
}

#[derive(Serialize)]
struct BatchWrites<'a> {
    #[serde(rename = "Items")]
    items: &'a [ReplaceableItem],
}

#[derive(Serialize)]
struct AttributeDeletes<'a> {
    #[serde(rename = "Attributes")]
    attributes: &'a [Attribute],
}

#[derive(Deserialize)]
struct AttributeList {
    #[serde(default, rename = "Attributes")]
    attributes: Vec<Attribute>,
}

/// Item attribute operations
pub struct AttributesApi<'a> {
    client: &'a StoreClient,
}

impl<'a> AttributesApi<'a> {
    pub(crate) fn new(client: &'a StoreClient) -> Self {
        Self { client }
    }

    /// Create or replace attributes on one item.
    ///
    /// Repeating the same put converges on the same item state, so a failed
    /// call is safe to retry.
    pub async fn put(
        &self,
        domain: &str,
        item: &str,
        attributes: &[ReplaceableAttribute],
    ) -> Result<()> {
        self.client
            .put(
                &format!(
                    "/domains/{}/items/{}/attributes",
                    encode_segment(domain),
                    encode_segment(item)
                ),
                Some(&AttributeWrites { attributes }),
            )
            .await
    }

    /// Create or replace attributes across up to 25 items.
    ///
    /// The service applies the batch in its entirety or not at all; there
    /// are no partial puts.
    pub async fn batch_put(&self, domain: &str, items: &[ReplaceableItem]) -> Result<()> {
        self.client
            .post_empty(&format!("/domains/{}/batch", encode_segment(domain)), &BatchWrites { items })
            .await
    }

    /// Delete attributes from one item. Idempotent; an empty list deletes
    /// the whole item, and a value-less [`Attribute`] deletes every value
    /// under its name.
    pub async fn delete(&self, domain: &str, item: &str, attributes: &[Attribute]) -> Result<()> {
        self.client
            .post_empty(
                &format!(
                    "/domains/{}/items/{}/attributes/delete",
                    encode_segment(domain),
                    encode_segment(item)
                ),
                &AttributeDeletes { attributes },
            )
            .await
    }

    /// Run a fully-formed read request.
    ///
    /// A missing item comes back as an empty set, never an error.
    pub async fn fetch(&self, request: GetAttributesRequest) -> Result<Vec<Attribute>> {
        let mut params: Vec<(&str, &str)> = request
            .attribute_names
            .iter()
            .map(|name| ("AttributeName", name.as_str()))
            .collect();
        if request.consistent_read {
            params.push(("ConsistentRead", "true"));
        }

        let list: AttributeList = self
            .client
            .get_with_query(
                &format!(
                    "/domains/{}/items/{}/attributes",
                    encode_segment(&request.domain_name),
                    encode_segment(&request.item_name)
                ),
                &params,
            )
            .await?;
        Ok(list.attributes)
    }

    /// Start a read of one item's attributes.
    #[must_use]
    pub fn get(&self, domain: impl Into<String>, item: impl Into<String>) -> GetAttributesBuilder<'a> {
        GetAttributesBuilder::new(self.client, GetAttributesRequest::new(domain, item))
    }
}

/// Builder for reading item attributes
pub struct GetAttributesBuilder<'a> {
    client: &'a StoreClient,
    request: GetAttributesRequest,
}

impl<'a> GetAttributesBuilder<'a> {
    fn new(client: &'a StoreClient, request: GetAttributesRequest) -> Self {
        Self { client, request }
    }

    /// Restrict the read to one more attribute name
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.request.attribute_names.push(name.into());
        self
    }

    /// Request a strongly consistent read
    #[must_use]
    pub const fn consistent(mut self) -> Self {
        self.request.consistent_read = true;
        self
    }

    /// Execute the request
    pub async fn send(self) -> Result<Vec<Attribute>> {
        AttributesApi::new(self.client).fetch(self.request).await
    }
}
