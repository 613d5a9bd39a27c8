use serde::{Deserialize, Serialize};

/// Parameters for a paginated list-domains call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListDomainsRequest {
    /// Maximum number of domain names to return in one page
    pub max_number_of_domains: Option<u32>,

    /// Continuation cursor from a previous page; absent starts over
    pub next_token: Option<String>,
}

impl ListDomainsRequest {
    /// List from the beginning with the service default page size.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_number_of_domains: None,
            next_token: None,
        }
    }

    /// Cap the page size.
    #[must_use]
    pub const fn with_max_domains(mut self, max: u32) -> Self {
        self.max_number_of_domains = Some(max);
        self
    }

    /// Resume from a continuation cursor.
    #[must_use]
    pub fn with_next_token(mut self, token: impl Into<String>) -> Self {
        self.next_token = Some(token.into());
        self
    }
}

/// One page of domain names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DomainPage {
    /// Domain names in this page
    #[serde(default)]
    pub domain_names: Vec<String>,

    /// Cursor for the next page; absent when this is the last page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl DomainPage {
    /// Returns true if another page can be fetched.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.next_token.is_some()
    }
}

/// Size and count statistics for a domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DomainMetadata {
    /// Number of items in the domain
    #[serde(default)]
    pub item_count: u64,

    /// Total bytes of all item names
    #[serde(default)]
    pub item_names_size_bytes: u64,

    /// Number of distinct attribute names in the domain
    #[serde(default)]
    pub attribute_name_count: u64,

    /// Total bytes of all attribute names
    #[serde(default)]
    pub attribute_names_size_bytes: u64,

    /// Number of attribute name/value pairs in the domain
    #[serde(default)]
    pub attribute_value_count: u64,

    /// Total bytes of all attribute values
    #[serde(default)]
    pub attribute_values_size_bytes: u64,

    /// Unix timestamp of domain creation, seconds
    #[serde(default)]
    pub timestamp: u64,
}
