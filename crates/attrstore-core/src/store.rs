//! The abstract store capability.
//!
//! [`AttributeStore`] is the seam between callers and a store backend.
//! `attrstore-client` implements it over HTTP; [`MemoryStore`] implements it
//! in-process for unit tests.
//!
//! [`MemoryStore`]: crate::memory::MemoryStore

use crate::error::Result;
use crate::types::{
    Attribute, DomainMetadata, DomainPage, GetAttributesRequest, ListDomainsRequest,
    ReplaceableAttribute, ReplaceableItem, SelectRequest, SelectResult,
};
use async_trait::async_trait;

/// One method per remote operation of the key/attribute store.
///
/// Retry safety is part of the contract each implementation must keep:
/// `create_domain`, `delete_domain` and `delete_attributes` are idempotent,
/// `batch_put_attributes` applies all of its writes or none of them, and
/// `put_attributes` converges when repeated with the same arguments.
#[async_trait]
pub trait AttributeStore: Send + Sync {
    /// Create a domain. Creating an existing domain is not an error.
    async fn create_domain(&self, domain_name: &str) -> Result<()>;

    /// Delete a domain and everything in it. Deleting a missing domain is
    /// not an error.
    async fn delete_domain(&self, domain_name: &str) -> Result<()>;

    /// List domain names one page at a time.
    ///
    /// Supplying the returned `next_token` on a later call yields the next
    /// page; omitting it starts from the beginning.
    async fn list_domains(&self, request: ListDomainsRequest) -> Result<DomainPage>;

    /// Size and count statistics for a domain.
    async fn domain_metadata(&self, domain_name: &str) -> Result<DomainMetadata>;

    /// Create or replace attributes on one item.
    async fn put_attributes(
        &self,
        domain_name: &str,
        item_name: &str,
        attributes: &[ReplaceableAttribute],
    ) -> Result<()>;

    /// Create or replace attributes across up to 25 items, atomically.
    async fn batch_put_attributes(
        &self,
        domain_name: &str,
        items: &[ReplaceableItem],
    ) -> Result<()>;

    /// Read attributes of one item.
    ///
    /// A missing item yields an empty set, never an error: the replica
    /// answering cannot prove the item is absent everywhere.
    async fn get_attributes(&self, request: GetAttributesRequest) -> Result<Vec<Attribute>>;

    /// Delete attributes from one item. An empty attribute list deletes the
    /// whole item; an item left without attributes is removed.
    async fn delete_attributes(
        &self,
        domain_name: &str,
        item_name: &str,
        attributes: &[Attribute],
    ) -> Result<()>;

    /// Evaluate a select expression and return matching items.
    async fn select(&self, request: SelectRequest) -> Result<SelectResult>;
}
