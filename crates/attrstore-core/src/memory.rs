//! In-memory store for unit tests.
//!
//! [`MemoryStore`] implements [`AttributeStore`] against process-local state
//! and enforces the same limits and error codes as the hosted service, so
//! code under test sees realistic failures without a network.

use crate::error::{Result, StoreError};
use crate::query::SelectExpr;
use crate::store::AttributeStore;
use crate::types::{
    Attribute, DomainMetadata, DomainPage, GetAttributesRequest, ListDomainsRequest,
    ReplaceableAttribute, ReplaceableItem, SelectRequest, SelectResult, MAX_BATCH_ITEMS,
    MAX_DOMAINS, MAX_ITEM_ATTRIBUTES, MAX_VALUE_BYTES,
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

/// Page cap the hosted service applies to select responses.
const SELECT_PAGE_LIMIT: usize = 2500;

/// Default page size for list-domains.
const DEFAULT_LIST_PAGE: usize = 100;

type Pairs = Vec<(String, String)>;

#[derive(Debug, Default)]
struct Domain {
    created: u64,
    items: BTreeMap<String, Pairs>,
}

/// An [`AttributeStore`] backed by a mutex-guarded map.
///
/// Cheap to construct per test; safe to share across tasks.
#[derive(Debug, Default)]
pub struct MemoryStore {
    domains: Mutex<BTreeMap<String, Domain>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Domain>> {
        self.domains.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn require(name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(StoreError::MissingParameter(name.to_string()));
    }
    Ok(())
}

fn check_write(attr: &ReplaceableAttribute) -> Result<()> {
    if attr.name.is_empty() {
        return Err(StoreError::InvalidParameterValue(
            "empty attribute name".to_string(),
        ));
    }
    if attr.name.len() > MAX_VALUE_BYTES || attr.value.len() > MAX_VALUE_BYTES {
        return Err(StoreError::InvalidParameterValue(format!(
            "attribute '{}' exceeds {MAX_VALUE_BYTES} bytes",
            attr.name
        )));
    }
    Ok(())
}

/// Apply attribute writes to a copy of the item's pairs.
///
/// Replace drops every prior value under the name; additive writes skip
/// pairs that already exist, so repeating a put converges.
fn apply_writes(mut pairs: Pairs, writes: &[ReplaceableAttribute]) -> Result<Pairs> {
    for write in writes {
        check_write(write)?;
        if write.replace {
            pairs.retain(|(name, _)| name != &write.name);
        }
        let pair = (write.name.clone(), write.value.clone());
        if !pairs.contains(&pair) {
            pairs.push(pair);
        }
    }
    if pairs.len() > MAX_ITEM_ATTRIBUTES {
        return Err(StoreError::NumberItemAttributesExceeded);
    }
    Ok(pairs)
}

fn parse_offset_token(token: Option<&str>) -> Result<usize> {
    match token {
        None => Ok(0),
        Some(t) => t.parse().map_err(|_| StoreError::InvalidNextToken),
    }
}

fn now_epoch() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

#[async_trait]
impl AttributeStore for MemoryStore {
    async fn create_domain(&self, domain_name: &str) -> Result<()> {
        require("DomainName", domain_name)?;
        let mut domains = self.lock();
        if !domains.contains_key(domain_name) {
            if domains.len() >= MAX_DOMAINS {
                return Err(StoreError::NumberDomainsExceeded);
            }
            domains.insert(
                domain_name.to_string(),
                Domain {
                    created: now_epoch(),
                    items: BTreeMap::new(),
                },
            );
        }
        Ok(())
    }

    async fn delete_domain(&self, domain_name: &str) -> Result<()> {
        require("DomainName", domain_name)?;
        // deleting a missing domain is a no-op
        self.lock().remove(domain_name);
        Ok(())
    }

    async fn list_domains(&self, request: ListDomainsRequest) -> Result<DomainPage> {
        let offset = parse_offset_token(request.next_token.as_deref())?;
        // a page size of zero would hand back the caller's own cursor and
        // never make progress
        let page_size = match request.max_number_of_domains {
            None => DEFAULT_LIST_PAGE,
            Some(m) if (1..=DEFAULT_LIST_PAGE as u32).contains(&m) => m as usize,
            Some(m) => {
                return Err(StoreError::InvalidParameterValue(format!(
                    "MaxNumberOfDomains must be between 1 and {DEFAULT_LIST_PAGE}, got {m}"
                )))
            }
        };

        let domains = self.lock();
        let domain_names: Vec<String> =
            domains.keys().skip(offset).take(page_size).cloned().collect();
        let next_token = if offset + domain_names.len() < domains.len() {
            Some((offset + domain_names.len()).to_string())
        } else {
            None
        };

        Ok(DomainPage {
            domain_names,
            next_token,
        })
    }

    async fn domain_metadata(&self, domain_name: &str) -> Result<DomainMetadata> {
        require("DomainName", domain_name)?;
        let domains = self.lock();
        let domain = domains
            .get(domain_name)
            .ok_or_else(|| StoreError::NoSuchDomain {
                domain: domain_name.to_string(),
            })?;

        let mut meta = DomainMetadata {
            timestamp: domain.created,
            ..DomainMetadata::default()
        };
        let mut names = std::collections::BTreeSet::new();
        for (item_name, pairs) in &domain.items {
            meta.item_count += 1;
            meta.item_names_size_bytes += item_name.len() as u64;
            for (name, value) in pairs {
                names.insert(name.as_str());
                meta.attribute_value_count += 1;
                meta.attribute_values_size_bytes += value.len() as u64;
            }
        }
        meta.attribute_name_count = names.len() as u64;
        meta.attribute_names_size_bytes = names.iter().map(|n| n.len() as u64).sum();
        Ok(meta)
    }

    async fn put_attributes(
        &self,
        domain_name: &str,
        item_name: &str,
        attributes: &[ReplaceableAttribute],
    ) -> Result<()> {
        require("DomainName", domain_name)?;
        require("ItemName", item_name)?;
        if attributes.is_empty() {
            return Err(StoreError::MissingParameter("Attribute".to_string()));
        }

        let mut domains = self.lock();
        let domain = domains
            .get_mut(domain_name)
            .ok_or_else(|| StoreError::NoSuchDomain {
                domain: domain_name.to_string(),
            })?;

        let current = domain.items.get(item_name).cloned().unwrap_or_default();
        let updated = apply_writes(current, attributes)?;
        domain.items.insert(item_name.to_string(), updated);
        Ok(())
    }

    async fn batch_put_attributes(
        &self,
        domain_name: &str,
        items: &[ReplaceableItem],
    ) -> Result<()> {
        require("DomainName", domain_name)?;
        if items.is_empty() {
            return Err(StoreError::MissingParameter("Item".to_string()));
        }
        if items.len() > MAX_BATCH_ITEMS {
            return Err(StoreError::NumberSubmittedItemsExceeded);
        }

        let mut domains = self.lock();
        let domain = domains
            .get_mut(domain_name)
            .ok_or_else(|| StoreError::NoSuchDomain {
                domain: domain_name.to_string(),
            })?;

        // validate and stage every item before touching the domain, so the
        // batch applies in its entirety or not at all
        let mut staged: Vec<(String, Pairs)> = Vec::with_capacity(items.len());
        for item in items {
            if item.name.is_empty() {
                return Err(StoreError::InvalidParameterValue(
                    "empty item name".to_string(),
                ));
            }
            if staged.iter().any(|(name, _)| name == &item.name) {
                return Err(StoreError::DuplicateItemName(item.name.clone()));
            }
            let current = domain.items.get(&item.name).cloned().unwrap_or_default();
            staged.push((item.name.clone(), apply_writes(current, &item.attributes)?));
        }

        for (name, pairs) in staged {
            domain.items.insert(name, pairs);
        }
        Ok(())
    }

    async fn get_attributes(&self, request: GetAttributesRequest) -> Result<Vec<Attribute>> {
        require("DomainName", &request.domain_name)?;
        require("ItemName", &request.item_name)?;

        let domains = self.lock();
        let domain = domains
            .get(&request.domain_name)
            .ok_or_else(|| StoreError::NoSuchDomain {
                domain: request.domain_name.clone(),
            })?;

        // a missing item is an empty set, not an error
        let Some(pairs) = domain.items.get(&request.item_name) else {
            return Ok(Vec::new());
        };

        Ok(pairs
            .iter()
            .filter(|(name, _)| {
                request.attribute_names.is_empty() || request.attribute_names.contains(name)
            })
            .map(|(name, value)| Attribute::new(name.clone(), value.clone()))
            .collect())
    }

    async fn delete_attributes(
        &self,
        domain_name: &str,
        item_name: &str,
        attributes: &[Attribute],
    ) -> Result<()> {
        require("DomainName", domain_name)?;
        require("ItemName", item_name)?;

        let mut domains = self.lock();
        let domain = domains
            .get_mut(domain_name)
            .ok_or_else(|| StoreError::NoSuchDomain {
                domain: domain_name.to_string(),
            })?;

        let Some(pairs) = domain.items.get_mut(item_name) else {
            // idempotent: the item may already be gone
            return Ok(());
        };

        if attributes.is_empty() {
            domain.items.remove(item_name);
            return Ok(());
        }

        for attr in attributes {
            match &attr.value {
                Some(value) => pairs.retain(|(n, v)| !(n == &attr.name && v == value)),
                None => pairs.retain(|(n, _)| n != &attr.name),
            }
        }
        if pairs.is_empty() {
            domain.items.remove(item_name);
        }
        Ok(())
    }

    async fn select(&self, request: SelectRequest) -> Result<SelectResult> {
        let expr = SelectExpr::parse(&request.select_expression)?;
        let offset = parse_offset_token(request.next_token.as_deref())?;

        let domains = self.lock();
        let domain = domains
            .get(&expr.domain_name)
            .ok_or_else(|| StoreError::NoSuchDomain {
                domain: expr.domain_name.clone(),
            })?;

        let matching: Vec<_> = domain
            .items
            .iter()
            .map(|(name, pairs)| {
                crate::types::Item::new(
                    name.clone(),
                    pairs
                        .iter()
                        .map(|(n, v)| Attribute::new(n.clone(), v.clone()))
                        .collect(),
                )
            })
            .filter(|item| expr.matches(item))
            .collect();

        let cap = match expr.limit {
            None => SELECT_PAGE_LIMIT,
            Some(l) if (1..=SELECT_PAGE_LIMIT).contains(&l) => l,
            Some(l) => {
                return Err(StoreError::InvalidParameterValue(format!(
                    "limit must be between 1 and {SELECT_PAGE_LIMIT}, got {l}"
                )))
            }
        };
        let items: Vec<_> = matching
            .iter()
            .skip(offset)
            .take(cap)
            .map(|item| expr.project(item))
            .collect();

        let next_token = if offset + items.len() < matching.len() {
            Some((offset + items.len()).to_string())
        } else {
            None
        };

        Ok(SelectResult { items, next_token })
    }
}
