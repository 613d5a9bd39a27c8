mod attribute;
mod domain;
mod identity;
mod select;

pub use attribute::*;
pub use domain::*;
pub use identity::*;
pub use select::*;

/// Maximum number of items in a single batch put
pub const MAX_BATCH_ITEMS: usize = 25;

/// Maximum number of attribute name/value pairs per item
pub const MAX_ITEM_ATTRIBUTES: usize = 256;

/// Maximum number of domains per account
pub const MAX_DOMAINS: usize = 100;

/// Maximum byte length of an attribute name or value
pub const MAX_VALUE_BYTES: usize = 1024;
