//! Rust client for a hosted key/attribute store.
//!
//! Domains hold named items; items hold attribute name/value pairs, not
//! necessarily unique per name. [`StoreClient`] talks to the hosted service
//! over HTTP, and [`MemoryStore`] is an in-process stand-in with the same
//! contract for unit tests. Both implement the
//! [`AttributeStore`] trait, so code can be written against the seam.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use attrstore::{ReplaceableAttribute, StoreClient};
//!
//! #[tokio::main]
//! async fn main() -> attrstore::Result<()> {
//!     let client = StoreClient::builder()
//!         .endpoint("store.internal:8443")
//!         .build()?;
//!
//!     client.domains().create("users").await?;
//!     client
//!         .attributes()
//!         .put("users", "u1", &[ReplaceableAttribute::new("tier", "gold")])
//!         .await?;
//!
//!     let result = client
//!         .select("select * from users where tier = 'gold'")
//!         .send()
//!         .await?;
//!     println!("{} gold users", result.items.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `default` - Uses rustls for TLS
//! - `rustls` - Use rustls for TLS (recommended)
//! - `native-tls` - Use system native TLS

#![doc(html_root_url = "https://docs.rs/attrstore/0.3.0")]

// Re-export core types
pub use attrstore_core::*;

// Re-export client
pub use attrstore_client::{StoreClient, StoreClientBuilder};

// Re-export runtime for convenience
pub use serde;
pub use serde_json;
pub use tokio;
