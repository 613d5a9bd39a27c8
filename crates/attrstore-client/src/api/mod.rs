//! API endpoint modules.

mod attributes;
mod domains;
mod select;

pub use attributes::{AttributesApi, GetAttributesBuilder};
pub use domains::{DomainsApi, ListDomainsBuilder};
pub use select::SelectBuilder;
