use serde::{Deserialize, Serialize};

/// A single name/value pair on an item.
///
/// Attribute names are not unique within an item: an item can hold
/// `{ "color", "red" }` and `{ "color", "blue" }` at the same time, but
/// never the same name/value pair twice.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Attribute {
    /// Attribute name
    pub name: String,

    /// Attribute value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Attribute {
    /// Create an attribute with a name and value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    /// Create a value-less attribute.
    ///
    /// In a delete request this addresses every value stored under the name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }
}

/// An attribute to write, with optional replace semantics.
///
/// With `replace` set, the write drops every value previously stored under
/// the same name before adding this one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReplaceableAttribute {
    /// Attribute name
    pub name: String,

    /// Attribute value
    pub value: String,

    /// Replace existing values under this name instead of adding
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub replace: bool,
}

impl ReplaceableAttribute {
    /// Create an additive attribute write.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            replace: false,
        }
    }

    /// Create a replacing attribute write.
    #[must_use]
    pub fn replacing(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            replace: true,
        }
    }
}

/// A named item together with its attributes, as returned by reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Item {
    /// Item name
    pub name: String,

    /// Attribute pairs on the item
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
}

impl Item {
    /// Create an item from a name and attribute list.
    #[must_use]
    pub fn new(name: impl Into<String>, attributes: Vec<Attribute>) -> Self {
        Self {
            name: name.into(),
            attributes,
        }
    }

    /// All values stored under an attribute name, in stored order.
    #[must_use]
    pub fn values(&self, name: &str) -> Vec<&str> {
        self.attributes
            .iter()
            .filter(|a| a.name == name)
            .filter_map(|a| a.value.as_deref())
            .collect()
    }

    /// First value stored under an attribute name.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .and_then(|a| a.value.as_deref())
    }
}

/// A named item and the attribute writes to apply to it in a batch put.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReplaceableItem {
    /// Item name
    pub name: String,

    /// Attribute writes for the item
    pub attributes: Vec<ReplaceableAttribute>,
}

impl ReplaceableItem {
    /// Create a batch entry from a name and attribute writes.
    #[must_use]
    pub fn new(name: impl Into<String>, attributes: Vec<ReplaceableAttribute>) -> Self {
        Self {
            name: name.into(),
            attributes,
        }
    }
}

/// Parameters for a get-attributes read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetAttributesRequest {
    /// Domain holding the item
    pub domain_name: String,

    /// Item to read
    pub item_name: String,

    /// Restrict the result to these attribute names; empty returns all
    pub attribute_names: Vec<String>,

    /// Request a strongly consistent read
    pub consistent_read: bool,
}

impl GetAttributesRequest {
    /// Read every attribute of an item.
    #[must_use]
    pub fn new(domain_name: impl Into<String>, item_name: impl Into<String>) -> Self {
        Self {
            domain_name: domain_name.into(),
            item_name: item_name.into(),
            attribute_names: Vec::new(),
            consistent_read: false,
        }
    }

    /// Restrict the read to one more attribute name.
    #[must_use]
    pub fn with_attribute_name(mut self, name: impl Into<String>) -> Self {
        self.attribute_names.push(name.into());
        self
    }

    /// Request a strongly consistent read.
    #[must_use]
    pub const fn consistent(mut self) -> Self {
        self.consistent_read = true;
        self
    }
}
