//! Core types and traits for the attrstore client.
//!
//! This crate provides the foundational pieces used across the workspace:
//!
//! - **Types**: strongly-typed requests and responses for the key/attribute
//!   store, plus the [`IdentityDkimAttributes`] record
//! - **Errors**: the full service error taxonomy as [`StoreError`]
//! - **Trait**: the [`AttributeStore`] capability implemented by the HTTP
//!   client and by [`MemoryStore`] for tests
//! - **Query**: parsing and evaluation of select expressions
//!
//! # Example
//!
//! ```rust,ignore
//! use attrstore_core::{AttributeStore, MemoryStore, ReplaceableAttribute, Result};
//!
//! async fn tag(store: &dyn AttributeStore) -> Result<()> {
//!     store
//!         .put_attributes("users", "u1", &[ReplaceableAttribute::new("tier", "gold")])
//!         .await
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/attrstore-core/0.3.0")]

mod error;
pub mod memory;
pub mod query;
mod store;
pub mod types;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use store::AttributeStore;
pub use types::*;
